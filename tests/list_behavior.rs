// TaskList mutation, change notification and rendering.
use std::cell::RefCell;
use std::rc::Rc;
use todotxt::TodoError;
use todotxt::model::{ListChange, ListRender, Task, TaskList, TaskOptions};

fn recording(list: &mut TaskList) -> Rc<RefCell<Vec<ListChange>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    list.subscribe(move |change| sink.borrow_mut().push(change.clone()));
    log
}

#[test]
fn test_parse_str_keeps_file_order() {
    let list = TaskList::parse_str("b second\n\na first\n   \nc third\n");
    assert_eq!(list.len(), 3);
    assert_eq!(list[0].description(), Some("b second"));
    assert_eq!(list[2].description(), Some("c third"));
}

#[test]
fn test_push_insert_remove_notify() {
    let mut list = TaskList::new();
    let log = recording(&mut list);

    list.push(Task::new("one"));
    list.push(Task::new("three"));
    list.insert(1, Task::new("two")).unwrap();
    assert!(list.remove(&Task::new("one")));
    assert!(!list.remove(&Task::new("missing")));

    assert_eq!(
        *log.borrow(),
        vec![
            ListChange::Added { index: 0 },
            ListChange::Added { index: 1 },
            ListChange::Added { index: 1 },
            ListChange::Moved { from: 1, to: 2 },
            ListChange::Removed { index: 0 },
        ]
    );
    let names: Vec<_> = list.iter().map(|t| t.description().unwrap()).collect();
    assert_eq!(names, vec!["two", "three"]);
}

#[test]
fn test_insert_out_of_range() {
    let mut list = TaskList::new();
    assert!(matches!(
        list.insert(1, Task::new("x")),
        Err(TodoError::InvalidArgument(_))
    ));
    list.insert(0, Task::new("first")).unwrap();
    assert_eq!(list.len(), 1);
}

#[test]
fn test_replace_only_notifies_on_change() {
    let mut list = TaskList::from_tasks(vec![Task::new("same")]);
    let log = recording(&mut list);

    let old = list.replace(0, Task::new("same")).unwrap();
    assert_eq!(old, Task::new("same"));
    assert!(log.borrow().is_empty());

    list.replace(0, Task::new("different")).unwrap();
    assert_eq!(*log.borrow(), vec![ListChange::Replaced { index: 0 }]);

    assert!(list.replace(5, Task::new("nope")).is_err());
}

#[test]
fn test_clear_reports_count() {
    let mut list = TaskList::parse_str("a\nb\nc");
    let log = recording(&mut list);
    list.clear();
    assert!(list.is_empty());
    assert_eq!(*log.borrow(), vec![ListChange::Cleared { count: 3 }]);
}

#[test]
fn test_options_propagate_to_tasks() {
    let mut list = TaskList::parse_str("2024-01-01 old");
    let opts = TaskOptions {
        set_completion_date_on_complete: true,
        ..TaskOptions::default()
    };
    list.set_options(opts);
    list.push(Task::new("new"));

    assert!(list.iter().all(|t| t.options() == opts));

    let task = list.get_mut(0).unwrap();
    task.set_complete(true);
    assert!(task.completed().is_some());
}

#[test]
fn test_render_modes() {
    let list = TaskList::parse_str("x 2024-02-01 2024-01-01 done thing\n(A) open thing\n");
    assert_eq!(
        list.render(ListRender::Text),
        "x 2024-02-01 2024-01-01 done thing\n(A) open thing\n"
    );
    assert_eq!(list.render(ListRender::Completed), "x 2024-02-01 2024-01-01 done thing\n");
    assert_eq!(list.render(ListRender::Active), "(A) open thing\n");
    assert_eq!(list.render(ListRender::Summary), "2 to-dos");
    assert_eq!(list.to_string(), "2 to-dos");
    assert_eq!(TaskList::parse_str("one").to_string(), "1 to-do");

    assert_eq!(ListRender::from_specifier("T").unwrap(), ListRender::Text);
    assert_eq!(ListRender::from_specifier("").unwrap(), ListRender::Summary);
    assert!(matches!(
        ListRender::from_specifier("?"),
        Err(TodoError::InvalidFormat(_))
    ));
}

#[test]
fn test_filter_sorts_by_description() {
    let list = TaskList::parse_str("(A) zebra +p\nmango +p\n(B) apple\n");
    let found = list.filter(|t| t.projects().contains(&"p".to_string()));
    let names: Vec<_> = found.iter().map(|t| t.description().unwrap()).collect();
    assert_eq!(names, vec!["mango +p", "zebra +p"]);
}

#[test]
fn test_index_of_and_contains() {
    let list = TaskList::parse_str("a\nb");
    assert_eq!(list.index_of(&Task::new("b")), Some(1));
    assert!(list.contains(&Task::new("a")));
    assert!(!list.contains(&Task::new("c")));
    assert_eq!((&list).into_iter().count(), 2);
}
