use super::*;
use pretty_assertions::assert_eq;

fn pair(key: Value, value: Value) -> Value {
    [key, value].into_iter().collect()
}

#[test]
fn empty_list_has_nothing() {
    let list = Value::list();
    let mut it = list.iter();
    assert!(!it.has_next());
    assert_eq!(it.next(), None);
}

#[test]
fn list_yields_elements_in_order() {
    let list: Value = (1..=3).map(Value::int).collect();
    let mut it = list.iter();
    let mut seen = Vec::new();
    while it.has_next() {
        seen.push(it.get_next());
    }
    assert_eq!(seen, vec![Value::int(1), Value::int(2), Value::int(3)]);
    assert!(!it.has_next());
}

#[test]
fn has_next_does_not_consume() {
    let list: Value = [Value::TRUE].into_iter().collect();
    let mut it = list.iter();
    assert!(it.has_next());
    assert!(it.has_next());
    assert_eq!(it.get_next(), Value::TRUE);
    assert!(!it.has_next());
}

#[test]
fn map_yields_key_value_pairs() {
    let mut map = Value::map();
    map.map_set(&Value::string("a"), &Value::int(1));
    map.map_set(&Value::string("b"), &Value::int(2));
    let mut items: Vec<Value> = map.iter().collect();
    items.sort_by(|x, y| {
        let key = |v: &Value| v.list_get(0).map(|k| k.string_of().to_owned());
        key(x).cmp(&key(y))
    });
    assert_eq!(
        items,
        vec![
            pair(Value::string("a"), Value::int(1)),
            pair(Value::string("b"), Value::int(2)),
        ]
    );
}

#[test]
fn map_iteration_follows_slot_order() {
    let mut map = Value::map();
    for i in [9, 3, 12, 0] {
        map.map_set(&Value::int(i), &Value::NONE);
    }
    // small non-negative ints land in their home slot
    let keys: Vec<i64> = map
        .iter()
        .filter_map(|item| item.list_get(0))
        .map(|key| key.int_of())
        .collect();
    assert_eq!(keys, vec![0, 3, 9, 12]);
}

#[test]
fn map_iteration_reaches_the_last_slot() {
    let mut map = Value::map();
    let last = i64::try_from(crate::INITIAL_CAPACITY - 1).unwrap_or(15);
    map.map_set(&Value::int(last), &Value::string("end"));
    let mut it = map.iter();
    assert!(it.has_next());
    assert_eq!(it.get_next(), pair(Value::int(last), Value::string("end")));
    assert!(!it.has_next());
}

#[test]
fn next_entry_borrows() {
    let list: Value = [Value::string("x")].into_iter().collect();
    let mut it = list.iter();
    match it.next_entry() {
        Some(Entry::Element(value)) => assert_eq!(value.string_of(), "x"),
        other => panic!("unexpected entry {other:?}"),
    }
    assert_eq!(it.next_entry(), None);

    let mut map = Value::map();
    map.map_set(&Value::int(1), &Value::FALSE);
    assert_eq!(
        map.iter().next_entry(),
        Some(Entry::Pair(&Value::int(1), &Value::FALSE))
    );
}

#[test]
fn items_are_copies() {
    let inner: Value = [Value::int(1)].into_iter().collect();
    let list: Value = [inner.clone()].into_iter().collect();
    let mut item = list.iter().get_next();
    item.list_push(&Value::int(2));
    assert_eq!(list.list_get(0), Some(inner));
}

#[test]
#[should_panic(expected = "iterator is exhausted")]
fn get_next_past_end_panics() {
    let list = Value::list();
    list.iter().get_next();
}

#[test]
#[should_panic(expected = "cannot iterate over a string value")]
fn iterating_a_string_panics() {
    Value::string("abc").iter();
}
