//! Vessel Value - dynamically typed values for Vessel.
//!
//! This crate provides:
//! - The tagged [`Value`] type (none, bool, int, float, string, list, map)
//! - [`Sequence`], the leaf/branch tree behind lists
//! - [`Table`], the bounded-probe open-addressing hash table behind maps
//! - [`ValueIter`], a cursor over list elements and map records
//! - Codepoint-level [`text`] primitives shared with the JSON codec
//!
//! # Value Semantics
//!
//! Values own their contents outright. Cloning is a deep copy and containers
//! store copies of what they are handed, so no two values ever share
//! mutable state. Recursive operations (copy, equality, join) run under
//! [`ensure_sufficient_stack`] so arbitrarily deep nesting is safe.

mod iter;
mod sequence;
mod stack;
mod table;
pub mod text;
mod value;

pub use iter::{Entry, ValueIter};
pub use sequence::{Iter as SequenceIter, Sequence};
pub use stack::ensure_sufficient_stack;
pub use table::{Table, INITIAL_CAPACITY, MIN_CAPACITY, PROBE_BOUND};
pub use value::{Value, ValueKind};
