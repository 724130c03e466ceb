// File: tests/logic_recurrence.rs
use chrono::{Datelike, NaiveDate, Weekday};
use todotxt::TodoError;
use todotxt::model::{Recurrence, RecurrenceUnit, Task, add_business_days};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn next_on(line: &str, today: NaiveDate) -> Option<Task> {
    let task = Task::parse(line).unwrap();
    task.recurrence()?.next_occurrence_on(&task, today)
}

#[test]
fn test_parse_recurrence_descriptors() {
    let rec: Recurrence = "3d".parse().unwrap();
    assert_eq!(rec.unit, RecurrenceUnit::CalendarDays);
    assert_eq!(rec.value, 3);
    assert!(!rec.strict);

    let rec: Recurrence = "+12w".parse().unwrap();
    assert_eq!(rec.unit, RecurrenceUnit::Weeks);
    assert_eq!(rec.value, 12);
    assert!(rec.strict);
    assert_eq!(rec.to_string(), "+12w");

    for bad in ["", "d", "0d", "-1d", "1 d", "1h", "1D", "+", "++1d", "1.5m", "99999999999d"] {
        assert!(
            matches!(bad.parse::<Recurrence>(), Err(TodoError::InvalidFormat(_))),
            "{:?} should be rejected",
            bad
        );
    }
}

#[test]
fn test_is_recurrent() {
    assert!(Task::new("Water plants rec:1w").is_recurrent());
    assert!(!Task::new("Water plants rec:weekly").is_recurrent());
    assert!(!Task::new("Water plants").is_recurrent());
}

#[test]
fn test_open_task_does_not_recur() {
    let task = Task::parse("2024-01-01 Water plants rec:1d").unwrap();
    assert!(task.next_recurrence().is_none());
    assert!(next_on("2024-01-01 Water plants rec:1d", date(2024, 1, 2)).is_none());
}

#[test]
fn test_strict_recurrence_anchors_on_due_date() {
    let today = date(2024, 6, 20);
    let next = next_on(
        "x 2024-06-18 2024-06-01 Pay rent due:2024-06-01 rec:+1m",
        today,
    )
    .unwrap();

    assert_eq!(next.due_date(), Some(date(2024, 7, 1)));
    assert!(!next.is_complete());
    assert_eq!(next.completed(), None);
    assert_eq!(next.created(), Some(date(2024, 6, 1)));
    assert_eq!(next.description(), Some("Pay rent rec:+1m due:2024-07-01"));
}

#[test]
fn test_strict_recurrence_without_due_uses_today() {
    let today = date(2024, 6, 20);
    let next = next_on("x 2024-06-18 2024-06-01 Stretch rec:+2d", today).unwrap();
    assert_eq!(next.due_date(), Some(date(2024, 6, 22)));
}

#[test]
fn test_non_strict_recurrence_anchors_on_completion() {
    let today = date(2024, 6, 18);
    let next = next_on(
        "x 2024-06-18 2024-06-01 Water plants due:2024-06-10 rec:1w",
        today,
    )
    .unwrap();
    assert_eq!(next.due_date(), Some(date(2024, 6, 25)));
}

#[test]
fn test_non_strict_recurrence_skips_missed_occurrences() {
    let today = date(2024, 6, 18);
    let next = next_on("x 2020-01-01 2019-12-01 Water plants rec:1d", today).unwrap();
    let due = next.due_date().unwrap();
    assert!(due >= today, "stale due date {}", due);
    assert_eq!(due, today);
}

#[test]
fn test_non_strict_weekly_skip_lands_in_next_window() {
    // 2024-05-01 plus whole weeks: 05-29 is before 06-01, 06-05 is not.
    let today = date(2024, 6, 1);
    let next = next_on("x 2024-05-01 2024-04-01 Review rec:1w", today).unwrap();
    assert_eq!(next.due_date(), Some(date(2024, 6, 5)));
}

#[test]
fn test_yearly_and_business_day_units() {
    let today = date(2024, 1, 1);
    let next = next_on("x 2024-02-29 2024-01-01 Leap check rec:+1y due:2024-02-29", today).unwrap();
    assert_eq!(next.due_date(), Some(date(2025, 2, 28)));

    // 2024-06-07 is a Friday.
    let next = next_on("x 2024-06-07 2024-06-01 Standup rec:1b", date(2024, 6, 7)).unwrap();
    assert_eq!(next.due_date(), Some(date(2024, 6, 10)));
}

#[test]
fn test_business_day_skip_from_saturday() {
    let saturday = date(2024, 6, 8);
    assert_eq!(saturday.weekday(), Weekday::Sat);
    let monday = add_business_days(0, saturday).unwrap();
    assert_eq!(monday, date(2024, 6, 10));
    assert_eq!(monday.weekday(), Weekday::Mon);
}

#[test]
fn test_business_days_never_land_on_weekend() {
    let start = date(2024, 6, 3);
    for n in -15..=15 {
        let d = add_business_days(n, start).unwrap();
        assert!(
            !matches!(d.weekday(), Weekday::Sat | Weekday::Sun),
            "{} business days from {} landed on {}",
            n,
            start,
            d
        );
    }
}

#[test]
fn test_huge_business_day_interval_yields_none() {
    let today = date(2024, 6, 7);
    assert!(next_on("x 2024-06-07 2024-06-01 Standup rec:+200000000b due:2024-06-07", today).is_none());
    assert!(next_on("x 2024-06-07 2024-06-01 Standup rec:200000000b", today).is_none());
}

#[test]
fn test_large_business_day_interval_is_exact() {
    // 2024-06-07 is a Friday; 500 business days is 100 weeks.
    let next = next_on("x 2024-06-07 2024-06-01 Review rec:+500b due:2024-06-07", date(2024, 6, 7))
        .unwrap();
    assert_eq!(next.due_date(), Some(date(2026, 5, 8)));
}

#[test]
fn test_skip_forward_gives_up_past_step_bound() {
    // Roughly 108,000 monthly steps separate these dates.
    let today = date(9000, 1, 1);
    assert!(next_on("x 0001-01-01 Ancient chore rec:1m", today).is_none());
}

#[test]
fn test_fixed_length_units_skip_any_gap() {
    let today = date(2024, 6, 18);
    let next = next_on("x 0001-01-01 Ancient chore rec:1d", today).unwrap();
    assert_eq!(next.due_date(), Some(today));

    let next = next_on("x 0001-01-01 Ancient chore rec:2w", today).unwrap();
    let due = next.due_date().unwrap();
    assert!(due >= today && (due - today).num_days() < 14, "due {}", due);
}
