//! Cursor over the items of a list or map value.
//!
//! Lists yield their elements in index order. Maps yield one `[key, value]`
//! list per live record, in physical slot order. Callers that only need to
//! look at items (the JSON writer, for one) use [`ValueIter::next_entry`],
//! which borrows instead of copying.

use crate::sequence;
use crate::table::Table;
use crate::Value;

/// A borrowed item produced by [`ValueIter::next_entry`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Entry<'a> {
    /// A list element.
    Element(&'a Value),
    /// A map record.
    Pair(&'a Value, &'a Value),
}

impl Entry<'_> {
    /// Owned form of the item: a copy of the element, or a two-element
    /// `[key, value]` list for a map record.
    pub fn to_value(self) -> Value {
        match self {
            Entry::Element(value) => value.clone(),
            Entry::Pair(key, value) => [key.clone(), value.clone()].into_iter().collect(),
        }
    }
}

enum Cursor<'a> {
    List(std::iter::Peekable<sequence::Iter<'a>>),
    Map { table: &'a Table, pos: usize },
}

/// Iterator over a list's elements or a map's records.
///
/// Not restartable; ask the source for a fresh one instead.
pub struct ValueIter<'a> {
    cursor: Cursor<'a>,
}

impl<'a> ValueIter<'a> {
    /// # Panics
    ///
    /// When `source` is neither a list nor a map.
    pub fn new(source: &'a Value) -> Self {
        let cursor = match source {
            Value::List(seq) => Cursor::List(seq.iter().peekable()),
            Value::Map(table) => Cursor::Map { table, pos: 0 },
            other => panic!("cannot iterate over a {} value", other.kind()),
        };
        ValueIter { cursor }
    }

    /// Whether another item remains. Does not consume anything.
    pub fn has_next(&mut self) -> bool {
        match &mut self.cursor {
            Cursor::List(items) => items.peek().is_some(),
            Cursor::Map { table, pos } => {
                (*pos..table.capacity()).any(|slot| table.slot(slot).is_some())
            }
        }
    }

    /// Borrow the next item and advance past it.
    pub fn next_entry(&mut self) -> Option<Entry<'a>> {
        match &mut self.cursor {
            Cursor::List(items) => items.next().map(Entry::Element),
            Cursor::Map { table, pos } => {
                while *pos < table.capacity() {
                    let slot = *pos;
                    *pos += 1;
                    if let Some((key, value)) = table.slot(slot) {
                        return Some(Entry::Pair(key, value));
                    }
                }
                None
            }
        }
    }

    /// Copy of the next item.
    ///
    /// # Panics
    ///
    /// When the iterator is exhausted.
    #[track_caller]
    pub fn get_next(&mut self) -> Value {
        match self.next_entry() {
            Some(entry) => entry.to_value(),
            None => panic!("iterator is exhausted"),
        }
    }
}

impl Iterator for ValueIter<'_> {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        self.next_entry().map(Entry::to_value)
    }
}

#[cfg(test)]
mod tests;
