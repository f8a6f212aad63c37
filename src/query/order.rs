//! List ordering for tasks and defects
//!
//! Both lists sort by status, then priority, then due state. They differ only
//! in where a due date that does not parse lands.

use chrono::NaiveDate;

use crate::domain::{parse_date, Defect, Task, Trackable};

/// Where a due date places an item relative to today
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DueState {
    /// Not closed and due before today
    Overdue,
    Normal,
    NoDate,
}

/// Items the list views sort
pub trait Ordered: Trackable {
    /// Rank of a due date that is present but does not parse
    const UNPARSEABLE_DUE: DueState;
}

impl Ordered for Defect {
    const UNPARSEABLE_DUE: DueState = DueState::NoDate;
}

impl Ordered for Task {
    const UNPARSEABLE_DUE: DueState = DueState::Normal;
}

impl DueState {
    pub fn of<T: Ordered>(item: &T, today: NaiveDate) -> Self {
        let Some(text) = item.due_date_text() else {
            return DueState::NoDate;
        };
        match parse_date(text) {
            None => T::UNPARSEABLE_DUE,
            Some(due) if due < today && !item.status().is_closed() => DueState::Overdue,
            Some(_) => DueState::Normal,
        }
    }
}

/// Sort by status, then priority, then due state; ties keep input order
pub fn sort_items<T: Ordered>(items: &mut [T], today: NaiveDate) {
    items.sort_by_key(|item| (item.status().rank(), item.priority().rank(), DueState::of(item, today)));
}

/// Partition into (not closed, closed), each in input order
pub fn split_active_closed<T: Trackable>(items: Vec<T>) -> (Vec<T>, Vec<T>) {
    items.into_iter().partition(|item| !item.status().is_closed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DefectCategory, Priority, Status};

    fn task(id: &str, status: Status, priority: Priority, due: Option<&str>) -> Task {
        let mut task = Task::seeded(id, id, "", "General");
        task.set_status(status);
        task.priority = priority;
        task.due_date = due.map(str::to_string);
        task
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn defect(location: &str, status: Status, priority: Priority, due: Option<&str>) -> Defect {
        let mut defect = Defect::new(location, DefectCategory::Other, priority, "", ymd(2024, 12, 1));
        defect.status = status;
        defect.due_date = due.map(str::to_string);
        defect
    }

    #[test]
    fn test_due_state() {
        let today = ymd(2024, 12, 10);
        let late = defect("a", Status::Open, Priority::Low, Some("12/09/2024"));
        let done = defect("b", Status::Closed, Priority::Low, Some("12/09/2024"));
        let soon = defect("c", Status::Open, Priority::Low, Some("12/10/2024"));
        let never = defect("d", Status::Open, Priority::Low, Some("someday"));
        assert_eq!(DueState::of(&late, today), DueState::Overdue);
        assert_eq!(DueState::of(&done, today), DueState::Normal);
        assert_eq!(DueState::of(&soon, today), DueState::Normal);
        assert_eq!(DueState::of(&never, today), DueState::NoDate);
    }

    #[test]
    fn test_sort_defects_by_status_priority_due() {
        let today = ymd(2024, 12, 10);
        let mut defects = vec![
            defect("closed-high", Status::Closed, Priority::High, None),
            defect("open-low", Status::Open, Priority::Low, None),
            defect("open-high-nodate", Status::Open, Priority::High, None),
            defect("progress-high", Status::InProgress, Priority::High, None),
            defect("open-high-late", Status::Open, Priority::High, Some("12/01/2024")),
            defect("open-high-future", Status::Open, Priority::High, Some("12/20/2024")),
            defect("open-low-2", Status::Open, Priority::Low, None),
        ];
        sort_items(&mut defects, today);

        let order: Vec<&str> = defects.iter().map(|d| d.location.as_str()).collect();
        assert_eq!(
            order,
            vec![
                "open-high-late",
                "open-high-future",
                "open-high-nodate",
                "open-low",
                "open-low-2",
                "progress-high",
                "closed-high",
            ]
        );
    }

    #[test]
    fn test_split_active_closed() {
        let defects = vec![
            defect("a", Status::Closed, Priority::Low, None),
            defect("b", Status::Open, Priority::Low, None),
            defect("c", Status::InProgress, Priority::Low, None),
        ];
        let (active, closed) = split_active_closed(defects);
        assert_eq!(active.iter().map(|d| d.location.as_str()).collect::<Vec<_>>(), vec!["b", "c"]);
        assert_eq!(closed.len(), 1);
    }

    #[test]
    fn test_unparseable_due_date_ranks_per_kind() {
        let today = ymd(2024, 12, 10);
        let bad_task = task("t", Status::Open, Priority::Low, Some("soon"));
        let bad_defect = defect("d", Status::Open, Priority::Low, Some("soon"));
        assert_eq!(DueState::of(&bad_task, today), DueState::Normal);
        assert_eq!(DueState::of(&bad_defect, today), DueState::NoDate);
        assert_eq!(DueState::of(&task("n", Status::Open, Priority::Low, None), today), DueState::NoDate);
    }

    #[test]
    fn test_sort_tasks() {
        let today = ymd(2024, 12, 10);
        let mut tasks = vec![
            task("done-high", Status::Closed, Priority::High, Some("12/01/2024")),
            task("open-med-nodate", Status::Open, Priority::Medium, None),
            task("open-med-garbled", Status::Open, Priority::Medium, Some("next week")),
            task("open-med-late", Status::Open, Priority::Medium, Some("12/09/2024")),
            task("progress-low", Status::InProgress, Priority::Low, None),
            task("open-high", Status::Open, Priority::High, None),
        ];
        sort_items(&mut tasks, today);

        let order: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(
            order,
            vec![
                "open-high",
                "open-med-late",
                "open-med-garbled",
                "open-med-nodate",
                "progress-low",
                "done-high",
            ]
        );

        let (active, completed) = split_active_closed(tasks);
        assert_eq!(active.len(), 5);
        assert_eq!(completed[0].id, "done-high");
    }
}
