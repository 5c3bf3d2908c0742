//! Stack growth for recursive walks over values.
//!
//! Nothing bounds how deep a value nests, and the tree under one list is as
//! deep as the list is long when it only ever grew at one end. Sequence
//! updates, deep copies, structural equality, `join` and both JSON passes
//! recurse once per level, each level inside [`ensure_sufficient_stack`].
//! On wasm32 the guard is a plain call.

/// Headroom below which a level moves to a fresh segment.
const HEADROOM: usize = 100 * 1024;

/// Size of each fresh segment. One segment holds a few thousand levels of
/// value recursion.
const SEGMENT_SIZE: usize = 1024 * 1024;

/// Run one level of a recursive walk, moving to a fresh stack segment first
/// when fewer than 100KB remain.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(HEADROOM, SEGMENT_SIZE, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
