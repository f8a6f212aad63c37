//! Calendar lookups
//!
//! The calendar screen marks days that have something due and lists the
//! tasks and defects due on the selected day.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};

use crate::domain::{Defect, Task, Trackable};

/// Items due exactly on `date`, in input order
pub fn due_on<T: Trackable + Clone>(items: &[T], date: NaiveDate) -> Vec<T> {
    items.iter().filter(|item| item.is_due_on(date)).cloned().collect()
}

/// Distinct due dates falling in the given month
pub fn due_dates_in_month<'a, T, I>(items: I, year: i32, month: u32) -> BTreeSet<NaiveDate>
where
    T: Trackable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items
        .into_iter()
        .filter_map(Trackable::due_date)
        .filter(|date| date.year() == year && date.month() == month)
        .collect()
}

/// Everything due on one day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayAgenda {
    pub date: NaiveDate,
    pub tasks: Vec<Task>,
    pub defects: Vec<Defect>,
}

impl DayAgenda {
    pub fn build<'a>(
        date: NaiveDate,
        tasks: impl IntoIterator<Item = &'a Task>,
        defects: &[Defect],
    ) -> Self {
        Self {
            date,
            tasks: tasks
                .into_iter()
                .filter(|task| task.is_due_on(date))
                .cloned()
                .collect(),
            defects: due_on(defects, date),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty() && self.defects.is_empty()
    }

    /// Items not yet closed
    pub fn open_count(&self) -> usize {
        self.tasks.iter().filter(|t| !t.is_completed()).count()
            + self.defects.iter().filter(|d| !d.status.is_closed()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DefectCategory, Priority, Status};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task_due(id: &str, due: &str) -> Task {
        let mut task = Task::seeded(id, id, "", "General");
        task.due_date = Some(due.to_string());
        task
    }

    fn defect_due(due: &str) -> Defect {
        Defect::new("Hall", DefectCategory::Windows, Priority::Medium, "Draft", ymd(2024, 12, 1))
            .with_due_date(due)
    }

    #[test]
    fn test_due_dates_in_month() {
        let tasks = vec![
            task_due("a", "12/25/2024"),
            task_due("b", "12/5/2024"),
            task_due("c", "12/25/2024"),
            task_due("d", "01/02/2025"),
            task_due("e", "bad"),
        ];
        let dates = due_dates_in_month(&tasks, 2024, 12);
        assert_eq!(dates.into_iter().collect::<Vec<_>>(), vec![ymd(2024, 12, 5), ymd(2024, 12, 25)]);
    }

    #[test]
    fn test_day_agenda() {
        let tasks = vec![task_due("a", "12/25/2024"), task_due("b", "12/26/2024")];
        let mut closed = defect_due("12/25/2024");
        closed.set_status(Status::Closed, ymd(2024, 12, 20));
        let defects = vec![defect_due("12/25/2024"), closed, defect_due("12/24/2024")];

        let agenda = DayAgenda::build(ymd(2024, 12, 25), &tasks, &defects);
        assert_eq!(agenda.tasks.len(), 1);
        assert_eq!(agenda.defects.len(), 2);
        assert_eq!(agenda.open_count(), 2);

        let empty = DayAgenda::build(ymd(2024, 11, 1), &tasks, &defects);
        assert!(empty.is_empty());
    }
}
