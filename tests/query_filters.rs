// Query helpers over task collections.
use chrono::NaiveDate;
use todotxt::TodoError;
use todotxt::model::parser::parse_lines;
use todotxt::model::{DateFilter, Task, TaskList, TaskQuery};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

const SAMPLE: &str = "\
(B) 2024-01-05 Write tests +Crate @laptop due:2024-01-20
(A) 2024-01-01 Fix parser +Crate @laptop
x 2024-01-10 2024-01-02 Buy milk @store
(C) Call plumber @phone t:2024-02-01
2024-01-03 Read book +Leisure id:3
";

fn lines(found: &[&Task]) -> Vec<String> {
    found.iter().map(|t| t.to_string()).collect()
}

#[test]
fn test_priority_filters() {
    let tasks = parse_lines(SAMPLE);

    let a = tasks.with_priority('a').unwrap();
    assert_eq!(lines(&a), vec!["(A) 2024-01-01 Fix parser +Crate @laptop"]);

    assert_eq!(tasks.with_priorities(&['B', 'c', '!']).len(), 2);
    assert_eq!(tasks.priority_at_or_above('B').unwrap().len(), 2);
    assert_eq!(tasks.priority_at_or_below('B').unwrap().len(), 2);
    assert!(matches!(tasks.with_priority('1'), Err(TodoError::InvalidArgument(_))));
}

#[test]
fn test_results_are_ordered_by_canonical_line() {
    let tasks = parse_lines(SAMPLE);
    let laptop = tasks.for_context("laptop");
    assert_eq!(
        lines(&laptop),
        vec![
            "(A) 2024-01-01 Fix parser +Crate @laptop",
            "(B) 2024-01-05 Write tests +Crate @laptop due:2024-01-20",
        ]
    );
}

#[test]
fn test_tag_filters() {
    let tasks = parse_lines(SAMPLE);
    assert_eq!(tasks.for_project("Crate").len(), 2);
    assert_eq!(tasks.for_projects(&["Crate", "Leisure"]).len(), 3);
    assert_eq!(tasks.for_contexts(&["store", "phone"]).len(), 2);
    assert!(tasks.for_project("Nope").is_empty());
}

#[test]
fn test_completion_and_date_filters() {
    let tasks = parse_lines(SAMPLE);
    assert_eq!(tasks.complete().len(), 1);
    assert_eq!(tasks.incomplete().len(), 4);

    assert_eq!(tasks.created(DateFilter::Before(date(2024, 1, 3))).len(), 2);
    assert_eq!(tasks.created(DateFilter::On(date(2024, 1, 3))).len(), 1);
    assert_eq!(tasks.created(DateFilter::After(date(2024, 1, 3))).len(), 1);
    assert_eq!(tasks.completed(DateFilter::On(date(2024, 1, 10))).len(), 1);
    assert_eq!(tasks.due(DateFilter::Before(date(2024, 2, 1))).len(), 1);
    assert_eq!(tasks.threshold(DateFilter::After(date(2024, 1, 1))).len(), 1);
}

#[test]
fn test_extension_filters() {
    let tasks = parse_lines(SAMPLE);
    assert_eq!(tasks.with_extension("id").len(), 1);
    assert_eq!(tasks.with_extension_value("id", "3").len(), 1);
    assert!(tasks.with_extension_value("id", "4").is_empty());
}

#[test]
fn test_queries_work_on_lists() {
    let list = TaskList::parse_str(SAMPLE);
    assert_eq!(list.for_context("laptop").len(), 2);
    assert_eq!(list.matching(|t| t.is_past_due_on(date(2024, 1, 25))).len(), 1);
}
