#![cfg(feature = "list")]
//! Unit tests for VersionedList.
//!
//! These tests exercise every read at past and current versions, the
//! splicing mutations, batch operations and the read-only cursor.

use fatnode::versioned::{ErrorKind, VersionedError, VersionedList};
use rstest::{fixture, rstest};

const SET_SIZE: usize = 26;

/// List of `0..26`, all at version 0.
#[fixture]
fn seeded() -> VersionedList<i32> {
    (0..SET_SIZE as i32).collect()
}

fn strings(values: &[&'static str]) -> VersionedList<&'static str> {
    let mut list = VersionedList::new();
    for value in values {
        list.add(*value);
    }
    list
}

// =============================================================================
// Size and emptiness
// =============================================================================

#[rstest]
fn test_new_list_is_empty() {
    let list: VersionedList<i32> = VersionedList::new();
    assert_eq!(list.len(), 0);
    assert!(list.is_empty());
    assert_eq!(list.current_version(), 0);
}

#[rstest]
fn test_remove_shares_structure_with_seed(mut seeded: VersionedList<i32>) {
    assert_eq!(seeded.len(), SET_SIZE);
    assert_eq!(seeded.len_at(0), Ok(SET_SIZE));
    seeded.remove(0).unwrap();
    assert_eq!(seeded.len(), SET_SIZE - 1);
    assert_eq!(seeded.len_at(1), Ok(SET_SIZE - 1));
    assert_eq!(seeded.len_at(0), Ok(SET_SIZE));
    assert_eq!(seeded.get_at(0, 0), Ok(&0));
    assert_eq!(seeded.get(0), Ok(&1));
}

#[rstest]
fn test_len_at_future_version_fails() {
    let list: VersionedList<i32> = VersionedList::new();
    assert_eq!(list.len_at(3), Err(VersionedError::VersionNotFound(3)));
    assert_eq!(
        list.is_empty_at(3).unwrap_err().kind(),
        ErrorKind::VersionNotFound
    );
}

#[rstest]
fn test_is_empty_across_versions() {
    let mut list = VersionedList::new();
    list.add(1);
    assert!(!list.is_empty());
    assert_eq!(list.is_empty_at(0), Ok(true));
    list.remove(0).unwrap();
    assert!(list.is_empty());
    assert_eq!(list.is_empty_at(1), Ok(false));
}

// =============================================================================
// Search
// =============================================================================

#[rstest]
fn test_contains_across_versions() {
    let mut list = VersionedList::new();
    assert!(!list.contains(&"1"));
    list.add("1");
    assert!(list.contains(&"1"));
    assert!(list.remove_value(&"1"));
    assert!(!list.contains(&"1"));
    assert_eq!(list.contains_at(&"1", 1), Ok(true));
    assert_eq!(list.contains_at(&"1", 3).unwrap_err().kind(), ErrorKind::VersionNotFound);
}

#[rstest]
fn test_contains_option_values() {
    let mut list = VersionedList::new();
    list.add(Some(1));
    list.add(None);
    assert!(list.contains(&None));
    assert!(!list.contains(&Some(2)));
}

#[rstest]
fn test_contains_all(mut seeded: VersionedList<i32>) {
    let all: Vec<i32> = (0..SET_SIZE as i32).collect();
    assert!(seeded.contains_all(&all));
    seeded.remove(0).unwrap();
    assert!(!seeded.contains_all(&all));
    assert_eq!(seeded.contains_all_at(&all, 0), Ok(true));
}

#[rstest]
fn test_index_of_and_last_index_of() {
    let mut list = VersionedList::new();
    assert_eq!(list.index_of(&"object"), None);
    assert_eq!(list.last_index_of(&"object"), None);
    list.add("object");
    list.add("object1");
    list.add("object");
    assert_eq!(list.index_of(&"object"), Some(0));
    assert_eq!(list.last_index_of(&"object"), Some(2));
    assert_eq!(list.last_index_of_at(&"object", 2), Ok(Some(0)));
    assert_eq!(list.index_of_at(&"object1", 1), Ok(None));
    assert_eq!(
        list.index_of_at(&"object", 26).unwrap_err().kind(),
        ErrorKind::VersionNotFound
    );
}

// =============================================================================
// Positional reads
// =============================================================================

#[rstest]
fn test_get_at_every_index(seeded: VersionedList<i32>) {
    for index in 0..SET_SIZE {
        assert_eq!(seeded.get(index), Ok(&(index as i32)));
    }
}

#[rstest]
fn test_get_wrong_version(seeded: VersionedList<i32>) {
    assert_eq!(seeded.get_at(0, 6), Err(VersionedError::VersionNotFound(6)));
}

#[rstest]
fn test_get_wrong_index(seeded: VersionedList<i32>) {
    assert_eq!(
        seeded.get_at(SET_SIZE + 1, 0),
        Err(VersionedError::ListIndexOutOfRange {
            index: SET_SIZE + 1,
            size: SET_SIZE
        })
    );
}

#[rstest]
fn test_iter_visits_elements_in_order(seeded: VersionedList<i32>) {
    let collected: Vec<i32> = seeded.iter().copied().collect();
    assert_eq!(collected, (0..SET_SIZE as i32).collect::<Vec<_>>());
    assert_eq!(seeded.iter().len(), SET_SIZE);
    assert_eq!(seeded.iter().rev().next(), Some(&25));
}

#[rstest]
fn test_iter_at_wrong_version(seeded: VersionedList<i32>) {
    assert!(seeded.iter_at(1).is_err());
}

#[rstest]
fn test_for_loop_over_reference(seeded: VersionedList<i32>) {
    let mut expected = 0;
    for value in &seeded {
        assert_eq!(*value, expected);
        expected += 1;
    }
}

#[rstest]
fn test_sub_list(seeded: VersionedList<i32>) {
    let sub = seeded.sub_list(0, SET_SIZE - 1).unwrap();
    assert_eq!(sub.len(), SET_SIZE - 1);
    assert_eq!(sub.first(), seeded.get(0).ok());
    assert_eq!(seeded.sub_list(3, 6), Ok(vec![3, 4, 5]));
    assert_eq!(seeded.sub_list(4, 4), Ok(vec![]));
}

#[rstest]
fn test_sub_list_wrong_bounds(seeded: VersionedList<i32>) {
    assert_eq!(
        seeded.sub_list(2, 1).unwrap_err().kind(),
        ErrorKind::ListIndexOutOfRange
    );
    assert_eq!(
        seeded.sub_list(0, SET_SIZE + 1).unwrap_err().kind(),
        ErrorKind::ListIndexOutOfRange
    );
    assert_eq!(
        seeded.sub_list_at(1, SET_SIZE - 1, 10).unwrap_err().kind(),
        ErrorKind::VersionNotFound
    );
}

// =============================================================================
// Single mutations
// =============================================================================

#[rstest]
fn test_insert_at_front_middle_and_back() {
    let mut list = VersionedList::new();
    list.insert(0, 2).unwrap();
    list.insert(0, 0).unwrap();
    list.insert(1, 1).unwrap();
    list.insert(3, 3).unwrap();
    assert_eq!(list.to_vec(), vec![0, 1, 2, 3]);
    assert_eq!(list.to_vec_at(1), Ok(vec![2]));
    assert_eq!(list.to_vec_at(2), Ok(vec![0, 2]));
    assert_eq!(list.to_vec_at(3), Ok(vec![0, 1, 2]));
}

#[rstest]
fn test_insert_wrong_index(mut seeded: VersionedList<i32>) {
    assert_eq!(
        seeded.insert(SET_SIZE + 5, 0),
        Err(VersionedError::ListIndexOutOfRange {
            index: SET_SIZE + 5,
            size: SET_SIZE
        })
    );
    assert_eq!(seeded.current_version(), 0);
}

#[rstest]
fn test_remove_value_sequence() {
    let mut list = strings(&["object", "object2", "object3", "object"]);
    assert!(!VersionedList::<&str>::new().remove_value(&"Nothing"));
    assert!(list.remove_value(&"object2"));
    assert_eq!(list.get(1), Ok(&"object3"));
    assert!(list.remove_value(&"object"));
    assert!(list.contains(&"object"));
    assert!(!list.remove_value(&"Nothing"));
    assert!(list.remove_value(&"object"));
    assert!(list.remove_value(&"object3"));
    assert!(list.is_empty());
    assert_eq!(list.current_version(), 8);
    assert_eq!(
        list.to_vec_at(4),
        Ok(vec!["object", "object2", "object3", "object"])
    );
}

#[rstest]
fn test_remove_index(mut seeded: VersionedList<i32>) {
    assert_eq!(seeded.remove(SET_SIZE - 1), Ok(1));
    assert_eq!(seeded.len(), SET_SIZE - 1);
    assert_eq!(
        seeded.remove(SET_SIZE + 1).unwrap_err().kind(),
        ErrorKind::ListIndexOutOfRange
    );
    assert_eq!(seeded.current_version(), 1);
}

#[rstest]
fn test_remove_last_until_underflow() {
    let mut list: VersionedList<i32> = (0..2).collect();
    assert_eq!(list.remove_last(), Ok(1));
    assert_eq!(list.remove_last(), Ok(2));
    assert_eq!(list.remove_last(), Err(VersionedError::Underflow));
    assert_eq!(list.current_version(), 2);
    assert_eq!(list.to_vec_at(1), Ok(vec![0]));
}

#[rstest]
fn test_add_after_removing_tail_links_new_tail() {
    let mut list: VersionedList<i32> = (0..3).collect();
    list.remove_last().unwrap();
    list.add(9);
    assert_eq!(list.to_vec(), vec![0, 1, 9]);
    assert_eq!(list.iter().rev().copied().collect::<Vec<_>>(), vec![9, 1, 0]);
    assert_eq!(list.to_vec_at(0), Ok(vec![0, 1, 2]));
}

#[rstest]
fn test_set_writes_new_value_version(mut seeded: VersionedList<i32>) {
    assert_eq!(seeded.set(5, 500), Ok(1));
    assert_eq!(seeded.get(5), Ok(&500));
    assert_eq!(seeded.get_at(5, 0), Ok(&5));
}

#[rstest]
fn test_set_wrong_index(mut seeded: VersionedList<i32>) {
    assert_eq!(
        seeded.set(SET_SIZE + 1, 0).unwrap_err().kind(),
        ErrorKind::ListIndexOutOfRange
    );
    assert_eq!(seeded.current_version(), 0);
}

#[rstest]
fn test_clear_always_publishes(mut seeded: VersionedList<i32>) {
    assert_eq!(seeded.clear(), 1);
    assert!(seeded.is_empty());
    assert_eq!(seeded.clear(), 2);
    assert_eq!(seeded.len_at(0), Ok(SET_SIZE));
}

// =============================================================================
// Batch mutations
// =============================================================================

#[rstest]
fn test_add_all_uses_one_version() {
    let mut list = strings(&["object", "other object"]);
    assert!(!list.add_all(Vec::new()));
    assert_eq!(list.current_version(), 2);
    assert!(list.add_all(vec!["a", "b", "c"]));
    assert_eq!(list.current_version(), 3);
    assert_eq!(list.to_vec(), vec!["object", "other object", "a", "b", "c"]);
    assert_eq!(list.len_at(2), Ok(2));
}

#[rstest]
fn test_add_all_at_inserts_in_order() {
    let mut list: VersionedList<i32> = vec![0, 4].into_iter().collect();
    assert_eq!(list.add_all_at(1, 1..4), Ok(true));
    assert_eq!(list.to_vec(), vec![0, 1, 2, 3, 4]);
    assert_eq!(list.add_all_at(0, [-2, -1]), Ok(true));
    assert_eq!(list.add_all_at(7, [5]), Ok(true));
    assert_eq!(list.to_vec(), vec![-2, -1, 0, 1, 2, 3, 4, 5]);
    assert_eq!(list.current_version(), 3);
    assert_eq!(list.to_vec_at(1), Ok(vec![0, 1, 2, 3, 4]));
}

#[rstest]
fn test_add_all_at_wrong_index() {
    let mut list: VersionedList<i32> = VersionedList::new();
    assert_eq!(
        list.add_all_at(SET_SIZE, 0..SET_SIZE as i32),
        Err(VersionedError::ListIndexOutOfRange {
            index: SET_SIZE,
            size: 0
        })
    );
    assert_eq!(list.add_all_at(0, Vec::new()), Ok(false));
    assert_eq!(list.current_version(), 0);
}

#[rstest]
fn test_retain_all() {
    let all: Vec<String> = (0..SET_SIZE).map(|value| value.to_string()).collect();
    let mut list = VersionedList::new();
    list.add("object".to_string());
    list.add_all(all.clone());
    assert!(list.retain_all(&all));
    assert_eq!(list.len(), SET_SIZE);
    assert!(!list.retain_all(&all));
    assert!(!list.retain_all(&[]));
    assert!(!VersionedList::<String>::new().retain_all(&all));
    assert_eq!(list.current_version(), 3);
    assert!(list.contains_at(&"object".to_string(), 2).unwrap());
}

#[rstest]
fn test_remove_all(mut seeded: VersionedList<i32>) {
    assert!(!seeded.remove_all(&[]));
    assert_eq!(seeded.current_version(), 0);
    let all: Vec<i32> = (0..SET_SIZE as i32).collect();
    assert!(seeded.remove_all(&all));
    assert!(seeded.is_empty());
    assert_eq!(seeded.current_version(), 1);
    assert_eq!(seeded.len_at(0), Ok(SET_SIZE));
}

#[rstest]
fn test_remove_all_removes_every_duplicate() {
    let mut list: VersionedList<i32> = vec![1, 2, 1, 1, 3, 1].into_iter().collect();
    assert!(list.remove_all(&[1]));
    assert_eq!(list.to_vec(), vec![2, 3]);
    assert_eq!(list.iter().rev().copied().collect::<Vec<_>>(), vec![3, 2]);
}

#[rstest]
fn test_replace_all(mut seeded: VersionedList<i32>) {
    assert!(seeded.replace_all(|value| value * value));
    for index in 0..SET_SIZE {
        let value = index as i32;
        assert_eq!(seeded.get(index), Ok(&(value * value)));
        assert_eq!(seeded.get_at(index, 0), Ok(&value));
    }
    assert_eq!(seeded.current_version(), 1);
    assert!(!VersionedList::<i32>::new().replace_all(|value| *value));
}

// =============================================================================
// Cursor
// =============================================================================

#[rstest]
fn test_cursor_at_version_and_index() {
    let mut list = VersionedList::new();
    list.add_all(0..SET_SIZE as i32);
    let mut cursor = list.cursor_at(1, 1).unwrap();
    assert!(cursor.has_next());
    assert_eq!(cursor.next_element(), Ok(&1));
    assert_eq!(cursor.next_element(), Ok(&2));
    assert_eq!(cursor.next_index(), 3);
    assert_eq!(cursor.previous_index(), Some(2));
}

#[rstest]
fn test_cursor_from_start() {
    let list: VersionedList<i32> = (0..3).collect();
    let mut cursor = list.cursor(0).unwrap();
    assert!(!cursor.has_previous());
    assert_eq!(cursor.previous_index(), None);
    assert_eq!(cursor.previous_element(), Err(VersionedError::ElementNotFound));
    assert_eq!(cursor.next_element(), Ok(&0));
}

#[rstest]
fn test_cursor_walks_back_from_end() {
    let list: VersionedList<i32> = (0..3).collect();
    let mut cursor = list.cursor(3).unwrap();
    assert!(!cursor.has_next());
    assert_eq!(cursor.next_element(), Err(VersionedError::ElementNotFound));
    assert_eq!(cursor.previous_element(), Ok(&2));
    assert_eq!(cursor.previous_element(), Ok(&1));
    assert_eq!(cursor.previous_element(), Ok(&0));
    assert_eq!(cursor.previous_element().unwrap_err().kind(), ErrorKind::ElementNotFound);
}

#[rstest]
fn test_cursor_reads_its_own_version_only() {
    let mut list: VersionedList<i32> = (0..3).collect();
    list.remove(1).unwrap();
    list.add(7);
    let mut cursor = list.cursor_at(0, 0).unwrap();
    let mut seen = Vec::new();
    while cursor.has_next() {
        seen.push(*cursor.next_element().unwrap());
    }
    assert_eq!(seen, vec![0, 1, 2]);
    assert_eq!(cursor.version(), 0);
}

#[rstest]
fn test_cursor_wrong_index_and_version() {
    let mut list = VersionedList::new();
    list.add_all(0..SET_SIZE as i32);
    assert_eq!(
        list.cursor_at(1, SET_SIZE + 1).err().map(|error| error.kind()),
        Some(ErrorKind::ListIndexOutOfRange)
    );
    assert_eq!(
        list.cursor_at(10, 1).err().map(|error| error.kind()),
        Some(ErrorKind::VersionNotFound)
    );
}
