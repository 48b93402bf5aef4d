use std::cell::RefCell;
use std::rc::Rc;

use trellis_value::{ArrayChange, ArrayMethod, ObservableArray, Value};

fn nums(values: &[f64]) -> Vec<Value> {
    values.iter().map(|n| Value::Number(*n)).collect()
}

fn record(arr: &ObservableArray) -> Rc<RefCell<Vec<ArrayChange>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    arr.subscribe(move |change| sink.borrow_mut().push(change.clone()));
    log
}

fn single(log: &Rc<RefCell<Vec<ArrayChange>>>) -> ArrayChange {
    let changes = log.borrow();
    assert_eq!(changes.len(), 1, "expected exactly one change");
    changes[0].clone()
}

// ------- push

#[test]
fn test_push_returns_new_length() {
    let arr = ObservableArray::from_vec(nums(&[1.0]));
    assert_eq!(arr.push(nums(&[2.0, 3.0])), 3.0);
    assert_eq!(arr.snapshot(), nums(&[1.0, 2.0, 3.0]));
}

#[test]
fn test_push_change_record() {
    let arr = ObservableArray::from_vec(nums(&[1.0]));
    let log = record(&arr);
    arr.push(nums(&[2.0]));

    let change = single(&log);
    assert_eq!(change.method, ArrayMethod::Push);
    assert_eq!(change.arguments, nums(&[2.0]));
    assert_eq!(change.return_value, Value::Number(2.0));
    assert_eq!(change.old_array, nums(&[1.0]));
    assert!(change.new_array.ptr_eq(&arr));
}

// ------- pop / shift

#[test]
fn test_pop_returns_last_item() {
    let arr = ObservableArray::from_vec(nums(&[1.0, 2.0]));
    let log = record(&arr);
    assert_eq!(arr.pop(), Value::Number(2.0));

    let change = single(&log);
    assert_eq!(change.method, ArrayMethod::Pop);
    assert!(change.arguments.is_empty());
    assert_eq!(change.return_value, Value::Number(2.0));
    assert_eq!(change.old_array, nums(&[1.0, 2.0]));
}

#[test]
fn test_pop_on_empty_returns_undefined() {
    let arr = ObservableArray::new();
    let log = record(&arr);
    assert!(arr.pop().is_undefined());

    let change = single(&log);
    assert!(change.return_value.is_undefined());
    assert!(change.old_array.is_empty());
}

#[test]
fn test_shift_removes_first_item() {
    let arr = ObservableArray::from_vec(nums(&[1.0, 2.0, 3.0]));
    assert_eq!(arr.shift(), Value::Number(1.0));
    assert_eq!(arr.snapshot(), nums(&[2.0, 3.0]));
}

// ------- unshift

#[test]
fn test_unshift_prepends_in_argument_order() {
    let arr = ObservableArray::from_vec(nums(&[3.0]));
    let log = record(&arr);
    assert_eq!(arr.unshift(nums(&[1.0, 2.0])), 3.0);
    assert_eq!(arr.snapshot(), nums(&[1.0, 2.0, 3.0]));

    let change = single(&log);
    assert_eq!(change.method, ArrayMethod::Unshift);
    assert_eq!(change.arguments, nums(&[1.0, 2.0]));
    assert_eq!(change.return_value, Value::Number(3.0));
}

// ------- reverse / sort

#[test]
fn test_reverse_returns_same_handle() {
    let arr = ObservableArray::from_vec(nums(&[1.0, 2.0, 3.0]));
    let log = record(&arr);
    let returned = arr.reverse();
    assert!(returned.ptr_eq(&arr));
    assert_eq!(arr.snapshot(), nums(&[3.0, 2.0, 1.0]));

    let change = single(&log);
    assert_eq!(change.method, ArrayMethod::Reverse);
    match change.return_value {
        Value::Array(ref result) => assert!(result.ptr_eq(&arr)),
        ref other => panic!("expected array, got {}", other.type_name()),
    }
}

#[test]
fn test_default_sort_compares_string_forms() {
    let arr = ObservableArray::from_vec(nums(&[10.0, 2.0, 1.0]));
    arr.sort();
    assert_eq!(arr.snapshot(), nums(&[1.0, 10.0, 2.0]));
}

#[test]
fn test_default_sort_puts_undefined_last() {
    let arr = ObservableArray::from_vec(vec![
        Value::Undefined,
        Value::from("b"),
        Value::from("a"),
    ]);
    arr.sort();
    assert_eq!(
        arr.snapshot(),
        vec![Value::from("a"), Value::from("b"), Value::Undefined]
    );
}

#[test]
fn test_sort_by_custom_comparator() {
    let arr = ObservableArray::from_vec(nums(&[10.0, 2.0, 1.0]));
    let log = record(&arr);
    arr.sort_by(|a, b| {
        trellis_value::coerce::to_number(a)
            .partial_cmp(&trellis_value::coerce::to_number(b))
            .unwrap()
    });
    assert_eq!(arr.snapshot(), nums(&[1.0, 2.0, 10.0]));
    assert_eq!(single(&log).method, ArrayMethod::Sort);
}

// ------- splice

#[test]
fn test_splice_removes_and_inserts() {
    let arr = ObservableArray::from_vec(nums(&[1.0, 2.0, 3.0, 4.0]));
    let log = record(&arr);
    let removed = arr.splice(1, 2, nums(&[9.0]));

    assert_eq!(removed.snapshot(), nums(&[2.0, 3.0]));
    assert_eq!(arr.snapshot(), nums(&[1.0, 9.0, 4.0]));

    let change = single(&log);
    assert_eq!(change.method, ArrayMethod::Splice);
    assert_eq!(change.arguments, nums(&[1.0, 2.0, 9.0]));
    match change.return_value {
        Value::Array(ref result) => assert!(result.ptr_eq(&removed)),
        ref other => panic!("expected array, got {}", other.type_name()),
    }
}

#[test]
fn test_splice_negative_start_counts_from_end() {
    let arr = ObservableArray::from_vec(nums(&[1.0, 2.0, 3.0]));
    let removed = arr.splice(-2, 1, Vec::new());
    assert_eq!(removed.snapshot(), nums(&[2.0]));
    assert_eq!(arr.snapshot(), nums(&[1.0, 3.0]));
}

#[test]
fn test_splice_clamps_out_of_range_arguments() {
    let arr = ObservableArray::from_vec(nums(&[1.0, 2.0]));
    let removed = arr.splice(10, 10, nums(&[3.0]));
    assert!(removed.is_empty());
    assert_eq!(arr.snapshot(), nums(&[1.0, 2.0, 3.0]));

    let removed = arr.splice(-10, -5, Vec::new());
    assert!(removed.is_empty());
    assert_eq!(arr.len(), 3);
}

// ------- listener behavior

#[test]
fn test_listener_may_mutate_the_array() {
    let arr = ObservableArray::new();
    let seeded = arr.clone();
    arr.subscribe(move |change| {
        if change.method == ArrayMethod::Push && seeded.len() < 3 {
            seeded.push(vec![Value::from("again")]);
        }
    });
    arr.push(vec![Value::from("first")]);
    assert_eq!(arr.len(), 3);
}

#[test]
fn test_listener_may_subscribe_during_notification() {
    let arr = ObservableArray::new();
    let late_calls = Rc::new(RefCell::new(0));
    let observed = arr.clone();
    let counter = late_calls.clone();
    arr.subscribe(move |_| {
        let inner = counter.clone();
        observed.subscribe(move |_| *inner.borrow_mut() += 1);
    });
    arr.push(nums(&[1.0]));
    arr.push(nums(&[2.0]));
    // the listener added during the first push sees the second one
    assert!(*late_calls.borrow() >= 1);
}

#[test]
fn test_length_notification_reports_replacement() {
    let arr = ObservableArray::from_vec(nums(&[1.0, 2.0, 3.0]));
    let log = record(&arr);
    arr.notify_length(nums(&[9.0]));

    let change = single(&log);
    assert_eq!(change.method, ArrayMethod::Length);
    assert!(change.arguments.is_empty());
    assert_eq!(change.return_value, Value::Number(3.0));
    assert_eq!(change.old_array, nums(&[9.0]));
    assert!(change.new_array.ptr_eq(&arr));
}
