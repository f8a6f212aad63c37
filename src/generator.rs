//! Checklist Generator
//!
//! Seeded tasks created at onboarding, personalized from the apartment
//! profile. Seeded ids are fixed so that a regenerated checklist lines up with
//! one saved earlier.

use crate::domain::{ApartmentProfile, Checklist, Task};

/// Category preselected for a new task
pub const DEFAULT_CATEGORY: &str = "General";

const FIRST_WEEK: &[(&str, &str, &str, &str)] = &[
    ("week_1", "Change all locks", "Replace or rekey all exterior door locks for security", "Security"),
    ("week_2", "Test all smoke detectors", "Check that all smoke detectors are working properly and replace batteries if needed", "Safety"),
    ("week_3", "Take initial meter readings", "Document electricity, gas, and water meter readings", "Utilities"),
    ("week_4", "Locate circuit breaker and water shut-off", "Find and test the main circuit breaker and water shut-off valve", "Utilities"),
    ("week_5", "Clean all appliances", "Deep clean refrigerator, oven, dishwasher, and other appliances", "Cleaning"),
    ("week_6", "Check for leaks", "Inspect all faucets, pipes, and under sinks for any leaks", "Maintenance"),
    ("week_7", "Test heating and cooling systems", "Verify that HVAC systems are working properly", "Comfort"),
];

const FIRST_MONTH: &[(&str, &str, &str, &str)] = &[
    ("month_1", "Update address with important services", "Notify banks, insurance, government agencies, and subscriptions of your new address", "Administrative"),
    ("month_2", "Register with local services", "Sign up for garbage collection, recycling, and other local services", "Services"),
    ("month_3", "Meet your neighbors", "Introduce yourself to neighbors and exchange contact information", "Community"),
    ("month_4", "Explore the neighborhood", "Find nearby grocery stores, pharmacies, restaurants, and other amenities", "Community"),
    ("month_5", "Check internet and phone reception", "Test internet speeds and phone signal strength in different rooms", "Technology"),
    ("month_6", "Document any issues", "Take photos and document any problems that need landlord attention", "Maintenance"),
    ("month_7", "Plan emergency contacts", "Save important numbers: landlord, maintenance, emergency services", "Safety"),
];

const FIRST_YEAR: &[(&str, &str, &str, &str)] = &[
    ("year_1", "Review lease renewal", "Consider if you want to renew your lease and negotiate terms if needed", "Administrative"),
    ("year_2", "Annual deep cleaning", "Schedule a comprehensive cleaning including carpets, windows, and appliances", "Cleaning"),
    ("year_3", "Check for maintenance needs", "Inspect for any wear and tear that needs attention", "Maintenance"),
    ("year_4", "Update emergency kit", "Refresh first aid supplies, flashlights, and emergency items", "Safety"),
    ("year_5", "Review insurance coverage", "Ensure your renter's insurance still meets your needs", "Administrative"),
    ("year_6", "Plan for next move", "If considering moving, start planning and saving", "Planning"),
];

fn seed(rows: &[(&str, &str, &str, &str)]) -> Vec<Task> {
    rows.iter()
        .map(|(id, title, description, category)| Task::seeded(id, title, description, category))
        .collect()
}

/// The fixed starter checklist
pub fn default_checklist() -> Checklist {
    Checklist {
        first_week: seed(FIRST_WEEK),
        first_month: seed(FIRST_MONTH),
        first_year: seed(FIRST_YEAR),
    }
}

/// Starter checklist plus first-week tasks for bathrooms, the warehouse and
/// parking spaces
pub fn personalized_checklist(profile: &ApartmentProfile) -> Checklist {
    let mut checklist = default_checklist();
    let week = &mut checklist.first_week;

    for i in 1..=profile.bathrooms {
        week.push(Task::seeded(
            &format!("bathroom_{}", i),
            &format!("Inspect bathroom {} thoroughly", i),
            &format!("Check for mold, leaks, water pressure, and ventilation in bathroom {}", i),
            "Maintenance",
        ));
    }

    if profile.warehouse {
        week.push(Task::seeded(
            "warehouse",
            "Organize warehouse",
            "Set up shelving and organize items in your warehouse",
            "Organization",
        ));
    }

    for i in 1..=profile.parking {
        week.push(Task::seeded(
            &format!("parking_{}", i),
            &format!("Test parking space {}", i),
            &format!("Ensure parking space {} is accessible and properly marked", i),
            "Parking",
        ));
    }

    checklist
}

/// Categories offered when adding a task
pub fn available_task_categories(profile: Option<&ApartmentProfile>) -> Vec<String> {
    let mut categories: Vec<&str> = vec![
        "General",
        "Kitchen",
        "Bathroom",
        "Living Room",
        "Bedroom",
        "Cleaning",
        "Maintenance",
    ];

    if let Some(profile) = profile {
        if profile.parking > 0 {
            categories.push("Parking");
        }
        if profile.warehouse {
            categories.push("Storage");
        }
        if profile.balconies > 0 {
            categories.push("Balcony");
        }
        if profile.garden {
            categories.push("Garden");
        }
        if profile.bathrooms > 1 {
            categories.push("Utility");
        }
    }

    categories.into_iter().map(str::to_string).collect()
}

pub fn default_category() -> &'static str {
    DEFAULT_CATEGORY
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_profile() -> ApartmentProfile {
        ApartmentProfile {
            bathrooms: 0,
            parking: 0,
            ..ApartmentProfile::default()
        }
    }

    #[test]
    fn test_default_checklist_sizes() {
        let checklist = default_checklist();
        assert_eq!(checklist.first_week.len(), 7);
        assert_eq!(checklist.first_month.len(), 7);
        assert_eq!(checklist.first_year.len(), 6);
        assert!(checklist.tasks().all(|t| !t.is_user_added && !t.is_completed()));
        assert_eq!(checklist.first_year[5].id, "year_6");
    }

    #[test]
    fn test_personalized_tasks_go_to_first_week() {
        let profile = ApartmentProfile {
            bathrooms: 2,
            parking: 2,
            warehouse: true,
            ..ApartmentProfile::default()
        };
        let checklist = personalized_checklist(&profile);

        let extra: Vec<&str> = checklist.first_week[7..].iter().map(|t| t.id.as_str()).collect();
        assert_eq!(extra, vec!["bathroom_1", "bathroom_2", "warehouse", "parking_1", "parking_2"]);
        assert_eq!(checklist.first_week[8].title, "Inspect bathroom 2 thoroughly");
        assert_eq!(checklist.first_month.len(), 7);
        assert_eq!(checklist.first_year.len(), 6);
    }

    #[test]
    fn test_bare_profile_adds_nothing() {
        assert_eq!(personalized_checklist(&bare_profile()), default_checklist());
    }

    #[test]
    fn test_available_categories() {
        let base = available_task_categories(None);
        assert_eq!(base.len(), 7);
        assert_eq!(base[0], default_category());
        assert_eq!(available_task_categories(Some(&bare_profile())), base);

        let profile = ApartmentProfile {
            bathrooms: 2,
            parking: 1,
            warehouse: true,
            garden: true,
            balconies: 1,
            ..ApartmentProfile::default()
        };
        let categories = available_task_categories(Some(&profile));
        assert_eq!(
            &categories[7..],
            &["Parking", "Storage", "Balcony", "Garden", "Utility"]
        );
    }
}
