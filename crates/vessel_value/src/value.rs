//! The dynamic value type.
//!
//! # Ownership
//!
//! A `Value` exclusively owns everything reachable from it. `Clone` is a
//! deep copy: strings are duplicated and lists and maps duplicate their whole
//! backing tree or table, so two values never observe each other's
//! mutations. Containers copy what they are given (`list_set`, `map_set`,
//! ...) and the caller keeps its own handle. Release is plain `Drop`.
//!
//! # Precondition Violations
//!
//! Kind-specific accessors, key operations on unhashable kinds and index
//! operations outside the documented range are programmer errors and panic.
//! The `as_*` accessors are the non-panicking alternative.

use std::fmt;

use crate::iter::ValueIter;
use crate::sequence::Sequence;
use crate::stack::ensure_sufficient_stack;
use crate::table::Table;
use crate::text;

/// A dynamically typed value.
#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Sequence),
    Map(Table),
}

/// The kind of a [`Value`], without its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    None,
    Bool,
    Int,
    Float,
    String,
    List,
    Map,
}

impl ValueKind {
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::None => "none",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::List => "list",
            ValueKind::Map => "map",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cold]
#[track_caller]
fn kind_mismatch(expected: ValueKind, found: &Value) -> ! {
    panic!("expected a {expected} value, found {}", found.kind())
}

/// djb2 over codepoints.
fn string_hash(s: &str) -> u32 {
    let mut hash: u32 = 5381;
    let mut pos = 0;
    while let Some(c) = text::next_codepoint(s, &mut pos) {
        hash = hash.wrapping_mul(33).wrapping_add(u32::from(c));
    }
    hash
}

// Factory Methods

impl Value {
    /// The `none` value. Owns nothing, so every use is free.
    pub const NONE: Value = Value::None;
    /// The `true` value.
    pub const TRUE: Value = Value::Bool(true);
    /// The `false` value.
    pub const FALSE: Value = Value::Bool(false);

    #[inline]
    pub const fn none() -> Self {
        Value::None
    }

    #[inline]
    pub const fn bool(b: bool) -> Self {
        if b {
            Value::TRUE
        } else {
            Value::FALSE
        }
    }

    #[inline]
    pub const fn int(n: i64) -> Self {
        Value::Int(n)
    }

    #[inline]
    pub const fn float(f: f64) -> Self {
        Value::Float(f)
    }

    /// Create a string value.
    ///
    /// ```text
    /// let greeting = Value::string("hello");
    /// let label = Value::string(format!("item {n}"));
    /// ```
    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    /// Create an empty list.
    #[inline]
    pub const fn list() -> Self {
        Value::List(Sequence::new())
    }

    /// Create an empty map.
    #[inline]
    pub fn map() -> Self {
        Value::Map(Table::new())
    }
}

// Kind Queries, Hashing and Key Equality

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::None => ValueKind::None,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Str(_) => ValueKind::String,
            Value::List(_) => ValueKind::List,
            Value::Map(_) => ValueKind::Map,
        }
    }

    /// Whether this value may be used as a map key.
    ///
    /// Lists and maps are mutable containers; floats are excluded because
    /// IEEE equality is not a usable key equality.
    pub fn is_hashable(&self) -> bool {
        !matches!(self, Value::Float(_) | Value::List(_) | Value::Map(_))
    }

    pub fn is_iterable(&self) -> bool {
        matches!(self, Value::List(_) | Value::Map(_))
    }

    /// Key hash.
    ///
    /// # Panics
    ///
    /// When the value is not hashable.
    pub fn hash(&self) -> u32 {
        match self {
            Value::None => 0,
            Value::Bool(true) => 1,
            Value::Bool(false) => 2,
            Value::Int(n) => {
                #[allow(clippy::cast_sign_loss, reason = "folds the two's-complement bits")]
                let bits = *n as u64;
                (bits ^ (bits >> 32)) as u32
            }
            Value::Str(s) => string_hash(s),
            Value::Float(_) | Value::List(_) | Value::Map(_) => {
                panic!("cannot hash a {} value", self.kind())
            }
        }
    }

    /// Key equality: same kind and same scalar payload.
    ///
    /// # Panics
    ///
    /// When either side is not hashable.
    pub fn equals(&self, other: &Value) -> bool {
        assert!(
            self.is_hashable() && other.is_hashable(),
            "cannot compare {} with {} as keys",
            self.kind(),
            other.kind()
        );
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => text::compare(a, b).is_eq(),
            _ => false,
        }
    }

    /// Cursor over a list's elements or a map's `[key, value]` pairs.
    ///
    /// # Panics
    ///
    /// When the value is not a list or map.
    pub fn iter(&self) -> ValueIter<'_> {
        ValueIter::new(self)
    }
}

// Accessors

impl Value {
    #[track_caller]
    pub fn bool_of(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            other => kind_mismatch(ValueKind::Bool, other),
        }
    }

    #[track_caller]
    pub fn int_of(&self) -> i64 {
        match self {
            Value::Int(n) => *n,
            other => kind_mismatch(ValueKind::Int, other),
        }
    }

    #[track_caller]
    pub fn float_of(&self) -> f64 {
        match self {
            Value::Float(f) => *f,
            other => kind_mismatch(ValueKind::Float, other),
        }
    }

    #[track_caller]
    pub fn string_of(&self) -> &str {
        match self {
            Value::Str(s) => s,
            other => kind_mismatch(ValueKind::String, other),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&Sequence> {
        match self {
            Value::List(seq) => Some(seq),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Table> {
        match self {
            Value::Map(table) => Some(table),
            _ => None,
        }
    }
}

// List Operations

impl Value {
    #[track_caller]
    fn seq(&self) -> &Sequence {
        match self {
            Value::List(seq) => seq,
            other => kind_mismatch(ValueKind::List, other),
        }
    }

    #[track_caller]
    fn seq_mut(&mut self) -> &mut Sequence {
        match self {
            Value::List(seq) => seq,
            other => kind_mismatch(ValueKind::List, other),
        }
    }

    /// Copy of element `index`, or `None` when out of range.
    #[track_caller]
    pub fn list_get(&self, index: usize) -> Option<Value> {
        self.seq().get(index).cloned()
    }

    /// Store a copy of `value` at `index`; `index == list_length()` appends.
    #[track_caller]
    pub fn list_set(&mut self, index: usize, value: &Value) {
        self.seq_mut().set(index, value.clone());
    }

    /// Insert a copy of `value` at `index`, shifting later elements right.
    #[track_caller]
    pub fn list_insert(&mut self, index: usize, value: &Value) {
        self.seq_mut().insert(index, value.clone());
    }

    /// Append a copy of `value`.
    #[track_caller]
    pub fn list_push(&mut self, value: &Value) {
        self.seq_mut().push(value.clone());
    }

    #[track_caller]
    pub fn list_remove(&mut self, index: usize) -> Value {
        self.seq_mut().remove(index)
    }

    #[track_caller]
    pub fn list_length(&self) -> usize {
        self.seq().len()
    }
}

// Map Operations

impl Value {
    #[track_caller]
    fn table(&self) -> &Table {
        match self {
            Value::Map(table) => table,
            other => kind_mismatch(ValueKind::Map, other),
        }
    }

    #[track_caller]
    fn table_mut(&mut self) -> &mut Table {
        match self {
            Value::Map(table) => table,
            other => kind_mismatch(ValueKind::Map, other),
        }
    }

    /// Copy of the value stored under `key`.
    #[track_caller]
    pub fn map_get(&self, key: &Value) -> Option<Value> {
        self.table().get(key).cloned()
    }

    /// Store copies of `key` and `value`, overwriting an equal key.
    #[track_caller]
    pub fn map_set(&mut self, key: &Value, value: &Value) {
        self.table_mut().set(key, value);
    }

    #[track_caller]
    pub fn map_remove(&mut self, key: &Value) -> Option<Value> {
        self.table_mut().remove(key)
    }

    #[track_caller]
    pub fn map_clear(&mut self) {
        self.table_mut().clear();
    }

    #[track_caller]
    pub fn map_length(&self) -> usize {
        self.table().len()
    }
}

// Join

impl Value {
    /// Concatenate a string, or a list whose elements (recursively) are all
    /// strings or such lists, into one string.
    ///
    /// The exact length is measured first so the result is allocated once.
    ///
    /// # Panics
    ///
    /// When any value reached is neither a string nor a list.
    pub fn join(&self) -> String {
        let len = self.join_len();
        let mut out = String::with_capacity(len);
        self.join_into(&mut out);
        debug_assert_eq!(out.len(), len, "join length pass disagrees with write pass");
        out
    }

    fn join_len(&self) -> usize {
        ensure_sufficient_stack(|| match self {
            Value::Str(s) => text::length(s),
            Value::List(seq) => seq.iter().map(Value::join_len).sum(),
            other => panic!("cannot join a {} value", other.kind()),
        })
    }

    fn join_into(&self, out: &mut String) {
        ensure_sufficient_stack(|| match self {
            Value::Str(s) => out.push_str(s),
            Value::List(seq) => seq.iter().for_each(|item| item.join_into(out)),
            other => panic!("cannot join a {} value", other.kind()),
        });
    }
}

// Structural Equality

impl PartialEq for Value {
    /// Structural equality over every kind: lists element-wise, maps as
    /// key/value sets, floats by IEEE comparison. Unlike [`Value::equals`]
    /// this never panics.
    fn eq(&self, other: &Self) -> bool {
        ensure_sufficient_stack(|| match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            #[allow(clippy::float_cmp, reason = "values compare floats exactly")]
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            _ => false,
        })
    }
}

// Conversions

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(text::duplicate(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Sequence> for Value {
    fn from(seq: Sequence) -> Self {
        Value::List(seq)
    }
}

impl From<Table> for Value {
    fn from(table: Table) -> Self {
        Value::Map(table)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::List(iter.into_iter().collect())
    }
}
