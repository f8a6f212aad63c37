//! Predicate sets for tasks and defects
//!
//! An unset field places no constraint. Category, status and priority are
//! accepted sets: calling a builder twice accepts either value. Text matching
//! is a case-insensitive substring search; a blank query matches everything.

use chrono::NaiveDate;

use crate::domain::{Defect, DefectCategory, Priority, Status, Task, Trackable};

/// A predicate over one kind of record
pub trait Filter<T> {
    fn matches(&self, item: &T) -> bool;

    /// Matching items, in input order
    fn apply(&self, items: &[T]) -> Vec<T>
    where
        T: Clone,
    {
        items.iter().filter(|item| self.matches(item)).cloned().collect()
    }
}

/// Case-insensitive substring test against any of `fields`
pub fn matches_text(query: &str, fields: &[&str]) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    fields
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// An empty set accepts everything
fn accepts<V: PartialEq>(set: &[V], value: &V) -> bool {
    set.is_empty() || set.contains(value)
}

fn add<V: PartialEq>(set: &mut Vec<V>, value: V) {
    if !set.contains(&value) {
        set.push(value);
    }
}

fn matches_due_on<T: Trackable>(item: &T, due_on: Option<NaiveDate>) -> bool {
    match due_on {
        Some(date) => item.is_due_on(date),
        None => true,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub text: Option<String>,
    /// Exact category labels
    pub categories: Vec<String>,
    pub statuses: Vec<Status>,
    pub priorities: Vec<Priority>,
    pub due_on: Option<NaiveDate>,
}

impl TaskFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        add(&mut self.categories, category.into());
        self
    }

    pub fn status(mut self, status: Status) -> Self {
        add(&mut self.statuses, status);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        add(&mut self.priorities, priority);
        self
    }

    pub fn due_on(mut self, date: NaiveDate) -> Self {
        self.due_on = Some(date);
        self
    }
}

impl Filter<Task> for TaskFilter {
    fn matches(&self, task: &Task) -> bool {
        if let Some(text) = &self.text {
            let fields = [
                task.title.as_str(),
                task.description.as_str(),
                task.notes.as_str(),
                task.category.as_str(),
            ];
            if !matches_text(text, &fields) {
                return false;
            }
        }
        accepts(&self.categories, &task.category)
            && accepts(&self.statuses, &task.status)
            && accepts(&self.priorities, &task.priority)
            && matches_due_on(task, self.due_on)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefectFilter {
    pub text: Option<String>,
    pub categories: Vec<DefectCategory>,
    pub statuses: Vec<Status>,
    pub priorities: Vec<Priority>,
    pub due_on: Option<NaiveDate>,
}

impl DefectFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn category(mut self, category: DefectCategory) -> Self {
        add(&mut self.categories, category);
        self
    }

    pub fn status(mut self, status: Status) -> Self {
        add(&mut self.statuses, status);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        add(&mut self.priorities, priority);
        self
    }

    pub fn due_on(mut self, date: NaiveDate) -> Self {
        self.due_on = Some(date);
        self
    }
}

impl Filter<Defect> for DefectFilter {
    fn matches(&self, defect: &Defect) -> bool {
        if let Some(text) = &self.text {
            if !matches_text(text, &[defect.location.as_str(), defect.description.as_str()]) {
                return false;
            }
        }
        accepts(&self.categories, &defect.category)
            && accepts(&self.statuses, &defect.status)
            && accepts(&self.priorities, &defect.priority)
            && matches_due_on(defect, self.due_on)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn defect(location: &str, description: &str, priority: Priority, due: Option<&str>) -> Defect {
        let mut defect = Defect::new(
            location,
            DefectCategory::Plumbing,
            priority,
            description,
            ymd(2024, 12, 1),
        );
        defect.due_date = due.map(str::to_string);
        defect
    }

    fn tasks() -> Vec<Task> {
        let mut locks = Task::seeded("week_1", "Change all locks", "Rekey every door", "Security");
        locks.priority = Priority::High;
        let mut internet = Task::seeded("week_2", "Set up internet", "Call provider", "Utilities");
        internet.notes = "Ask about the fiber LOCK-in period".to_string();
        internet.due_date = Some("12/05/2024".to_string());
        let mut paint = Task::seeded("month_1", "Paint hallway", "", "Maintenance");
        paint.set_status(Status::Closed);
        vec![locks, internet, paint]
    }

    #[test]
    fn test_text_search_is_case_insensitive() {
        let result = TaskFilter::new().text("lock").apply(&tasks());
        let ids: Vec<&str> = result.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["week_1", "week_2"]);

        let result = TaskFilter::new().text("  ").apply(&tasks());
        assert_eq!(result.len(), 3);

        let result = TaskFilter::new().text("UTILITIES").apply(&tasks());
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_task_predicates_combine() {
        let all = tasks();
        assert_eq!(TaskFilter::new().status(Status::Closed).apply(&all).len(), 1);
        assert_eq!(TaskFilter::new().priority(Priority::High).apply(&all)[0].id, "week_1");
        assert_eq!(TaskFilter::new().category("Security").apply(&all).len(), 1);
        assert!(TaskFilter::new()
            .category("Security")
            .status(Status::Closed)
            .apply(&all)
            .is_empty());
        assert_eq!(TaskFilter::new().due_on(ymd(2024, 12, 5)).apply(&all)[0].id, "week_2");
    }

    #[test]
    fn test_repeated_builders_accept_any_of_the_values() {
        let mut all = tasks();
        all[1].set_status(Status::InProgress);

        let open_or_progress = TaskFilter::new()
            .status(Status::Open)
            .status(Status::InProgress)
            .apply(&all);
        let ids: Vec<&str> = open_or_progress.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["week_1", "week_2"]);

        let two_categories = TaskFilter::new()
            .category("Maintenance")
            .category("Security")
            .category("Security");
        assert_eq!(two_categories.categories.len(), 2);
        let ids: Vec<String> = two_categories.apply(&all).into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["week_1", "month_1"]);

        let defects = vec![
            defect("Hall", "Scuffed wall", Priority::Low, None),
            defect("Kitchen", "Broken hinge", Priority::Medium, None),
            defect("Bathroom", "Leak", Priority::High, None),
        ];
        let urgent = DefectFilter::new()
            .priority(Priority::High)
            .priority(Priority::Medium)
            .apply(&defects);
        assert_eq!(urgent.len(), 2);
        assert_eq!(urgent[0].location, "Kitchen");
    }

    #[test]
    fn test_defect_due_date_equality() {
        let defects = vec![
            defect("Bathroom", "Leaking faucet", Priority::High, Some("12/25/2024")),
            defect("Kitchen", "Broken hinge", Priority::Low, Some("12/26/2024")),
            defect("Hall", "Scuffed wall", Priority::Low, Some("garbage")),
            defect("Balcony", "Loose railing", Priority::Medium, None),
        ];

        let on_christmas = DefectFilter::new().due_on(ymd(2024, 12, 25)).apply(&defects);
        assert_eq!(on_christmas.len(), 1);
        assert_eq!(on_christmas[0].location, "Bathroom");

        let day_after = DefectFilter::new().due_on(ymd(2024, 12, 26)).apply(&defects);
        assert_eq!(day_after.len(), 1);
        assert_eq!(day_after[0].location, "Kitchen");
    }

    #[test]
    fn test_defect_text_covers_location_and_description() {
        let defects = vec![
            defect("Main Bathroom", "Leaking faucet", Priority::High, None),
            defect("Kitchen", "Bathroom fan wiring visible", Priority::Low, None),
            defect("Hall", "Scuffed wall", Priority::Low, None),
        ];
        assert_eq!(DefectFilter::new().text("bathroom").apply(&defects).len(), 2);
        assert_eq!(DefectFilter::new().priority(Priority::Low).apply(&defects).len(), 2);
        assert_eq!(DefectFilter::new().category(DefectCategory::Windows).apply(&defects).len(), 0);
    }

    #[test]
    fn test_apply_is_idempotent_and_keeps_order() {
        let defects = vec![
            defect("C", "x", Priority::Low, None),
            defect("A", "x", Priority::High, None),
            defect("B", "y", Priority::Medium, None),
            defect("D", "x", Priority::Medium, None),
        ];
        let filter = DefectFilter::new().text("x");
        let once = filter.apply(&defects);
        let twice = filter.apply(&once);
        assert_eq!(once, twice);

        let locations: Vec<&str> = once.iter().map(|d| d.location.as_str()).collect();
        assert_eq!(locations, vec!["C", "A", "D"]);
    }
}
