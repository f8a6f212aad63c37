//! Checklist buckets
//!
//! Tasks live in one of three fixed buckets. A task id is expected to appear
//! in at most one bucket; lookups stop at the first match.

use chrono::{Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::date::parse_date;
use super::task::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Bucket {
    FirstWeek,
    FirstMonth,
    FirstYear,
}

impl Bucket {
    pub const ALL: [Bucket; 3] = [Bucket::FirstWeek, Bucket::FirstMonth, Bucket::FirstYear];

    pub fn label(&self) -> &'static str {
        match self {
            Bucket::FirstWeek => "First Week",
            Bucket::FirstMonth => "First Month",
            Bucket::FirstYear => "First Year",
        }
    }
}

/// Where a new task goes, judged by its due date relative to `today`
///
/// No date or an unparseable one lands in the first week.
pub fn bucket_for_due_date(due_date: Option<&str>, today: NaiveDate) -> Bucket {
    let Some(due) = due_date.and_then(parse_date) else {
        return Bucket::FirstWeek;
    };

    if due < today + Duration::days(7) {
        return Bucket::FirstWeek;
    }

    match today.checked_add_months(Months::new(1)) {
        Some(month_out) if due < month_out => Bucket::FirstMonth,
        _ => Bucket::FirstYear,
    }
}

/// All three buckets; also the legacy combined record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checklist {
    pub first_week: Vec<Task>,
    pub first_month: Vec<Task>,
    pub first_year: Vec<Task>,
}

impl Checklist {
    pub fn bucket(&self, bucket: Bucket) -> &Vec<Task> {
        match bucket {
            Bucket::FirstWeek => &self.first_week,
            Bucket::FirstMonth => &self.first_month,
            Bucket::FirstYear => &self.first_year,
        }
    }

    pub fn bucket_mut(&mut self, bucket: Bucket) -> &mut Vec<Task> {
        match bucket {
            Bucket::FirstWeek => &mut self.first_week,
            Bucket::FirstMonth => &mut self.first_month,
            Bucket::FirstYear => &mut self.first_year,
        }
    }

    /// Every task, bucket by bucket
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.first_week
            .iter()
            .chain(self.first_month.iter())
            .chain(self.first_year.iter())
    }

    pub fn len(&self) -> usize {
        self.first_week.len() + self.first_month.len() + self.first_year.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn find(&self, id: &str) -> Option<(Bucket, &Task)> {
        Bucket::ALL.into_iter().find_map(|bucket| {
            self.bucket(bucket)
                .iter()
                .find(|task| task.id == id)
                .map(|task| (bucket, task))
        })
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.first_week
            .iter_mut()
            .chain(self.first_month.iter_mut())
            .chain(self.first_year.iter_mut())
            .find(|task| task.id == id)
    }

    /// Replace a task in place; false if the id is unknown
    pub fn replace(&mut self, task: Task) -> bool {
        match self.find_mut(&task.id) {
            Some(slot) => {
                *slot = task;
                true
            }
            None => false,
        }
    }

    pub fn push(&mut self, bucket: Bucket, task: Task) {
        self.bucket_mut(bucket).push(task);
    }

    pub fn remove(&mut self, id: &str) -> Option<(Bucket, Task)> {
        for bucket in Bucket::ALL {
            let tasks = self.bucket_mut(bucket);
            if let Some(index) = tasks.iter().position(|task| task.id == id) {
                return Some((bucket, tasks.remove(index)));
            }
        }
        None
    }

    /// Share of closed tasks, 0.0 for an empty checklist
    pub fn progress(&self) -> f32 {
        let total = self.len();
        if total == 0 {
            return 0.0;
        }
        let done = self.tasks().filter(|task| task.is_completed()).count();
        done as f32 / total as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Status;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_bucket_routing() {
        let today = ymd(2024, 12, 1);
        assert_eq!(bucket_for_due_date(None, today), Bucket::FirstWeek);
        assert_eq!(bucket_for_due_date(Some("not a date"), today), Bucket::FirstWeek);
        assert_eq!(bucket_for_due_date(Some("12/07/2024"), today), Bucket::FirstWeek);
        assert_eq!(bucket_for_due_date(Some("12/08/2024"), today), Bucket::FirstMonth);
        assert_eq!(bucket_for_due_date(Some("12/31/2024"), today), Bucket::FirstMonth);
        assert_eq!(bucket_for_due_date(Some("01/01/2025"), today), Bucket::FirstYear);
        assert_eq!(bucket_for_due_date(Some("06/01/2026"), today), Bucket::FirstYear);
    }

    #[test]
    fn test_find_replace_remove() {
        let mut checklist = Checklist::default();
        checklist.push(Bucket::FirstWeek, Task::seeded("a", "A", "", "General"));
        checklist.push(Bucket::FirstYear, Task::seeded("b", "B", "", "General"));

        let (bucket, task) = checklist.find("b").unwrap();
        assert_eq!(bucket, Bucket::FirstYear);
        assert_eq!(task.title, "B");

        let mut updated = task.clone();
        updated.status = Status::Closed;
        assert!(checklist.replace(updated));
        assert!(checklist.find("b").unwrap().1.is_completed());
        assert!((checklist.progress() - 0.5).abs() < f32::EPSILON);

        assert!(!checklist.replace(Task::seeded("zzz", "Z", "", "General")));

        let (bucket, removed) = checklist.remove("a").unwrap();
        assert_eq!(bucket, Bucket::FirstWeek);
        assert_eq!(removed.id, "a");
        assert_eq!(checklist.len(), 1);
        assert!(checklist.remove("a").is_none());
    }
}
