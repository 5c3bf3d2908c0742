//! Open-addressing hash table backing `Value::Map`.
//!
//! # Probing
//!
//! A key's home slot is `hash(key) % capacity`. When that slot is taken by a
//! different key the hash is passed through a fixed 32-bit avalanche mix and
//! the result picks the next candidate, for at most [`PROBE_BOUND`] candidates.
//! Lookups never stop early at an empty slot: removal clears slots outright
//! (no tombstones), so the only safe rule is "walk the whole bounded probe
//! sequence, stop on an equal key". Insertion follows the same rule before
//! it claims the first empty candidate it saw, which keeps a cleared slot
//! from ever producing a second record for a key that lives further along.
//!
//! # Resizing
//!
//! - Insertion that finds neither an equal key nor an empty candidate doubles
//!   the capacity and retries.
//! - Removal that leaves `count * 4 < capacity` halves the capacity, but never
//!   below [`MIN_CAPACITY`].
//!
//! Either way every live record is placed again under the new capacity. If
//! some record cannot be placed within the probe bound, the target capacity
//! doubles and placement starts over.
//!
//! # Overflow
//!
//! A key's candidates depend only on its full 32-bit hash, so no capacity
//! separates more keys sharing one hash than there are distinct candidates.
//! Growing cannot help such a group. A key whose group outnumbers its
//! distinct candidates overflows instead: it takes the first empty slot
//! found by stepping linearly past the last candidate. While any record has
//! overflowed, lookups extend their walk the same way over the whole table.

use std::fmt;
use std::mem;

use tracing::{debug, trace};

use crate::stack::ensure_sufficient_stack;
use crate::Value;

/// Capacity of a freshly created table.
pub const INITIAL_CAPACITY: usize = 16;

/// Capacity below which a table never shrinks.
pub const MIN_CAPACITY: usize = 16;

/// Candidate slots tried per operation before the table grows.
pub const PROBE_BOUND: usize = 5;

/// Key/value store over hashable values.
#[derive(Clone)]
pub struct Table {
    records: Vec<Option<Record>>,
    /// Number of occupied records.
    count: usize,
    /// Records living outside their bounded candidates.
    overflowed: usize,
}

#[derive(Clone)]
struct Record {
    key: Value,
    value: Value,
}

/// Outcome of walking a key's probe sequence for insertion.
enum Claim {
    /// A record with an equal key lives here.
    Occupied(usize),
    /// No equal key; this is the first empty candidate.
    Vacant(usize),
    /// Too many keys share the hash for its candidates; this empty slot lies
    /// past them.
    Overflow(usize),
    /// No equal key and no empty candidate.
    Exhausted,
}

/// Next probe hash: Robert Jenkins' 32-bit integer mix.
#[inline]
fn avalanche(mut a: u32) -> u32 {
    a = a.wrapping_add(0x7ed5_5d16).wrapping_add(a << 12);
    a = (a ^ 0xc761_c23c) ^ (a >> 19);
    a = a.wrapping_add(0x1656_67b1).wrapping_add(a << 5);
    a = a.wrapping_add(0xd3a2_646c) ^ (a << 9);
    a = a.wrapping_add(0xfd70_46c5).wrapping_add(a << 3);
    a = (a ^ 0xb55a_4f09) ^ (a >> 16);
    a
}

/// The sequence of candidate slots for one hash: [`PROBE_BOUND`] mixed
/// candidates, optionally followed by a linear walk over the whole table.
struct Probe {
    hash: u32,
    capacity: usize,
    remaining: usize,
    linear: usize,
    slot: usize,
}

impl Probe {
    /// Continue past the bounded candidates, one slot at a time.
    fn with_overflow(mut self) -> Self {
        self.linear = self.capacity;
        self
    }
}

impl Iterator for Probe {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining > 0 {
            self.remaining -= 1;
            self.slot = self.hash as usize % self.capacity;
            self.hash = avalanche(self.hash);
            return Some(self.slot);
        }
        if self.linear > 0 {
            self.linear -= 1;
            self.slot = (self.slot + 1) % self.capacity;
            return Some(self.slot);
        }
        None
    }
}

#[inline]
fn probe(hash: u32, capacity: usize) -> Probe {
    Probe {
        hash,
        capacity,
        remaining: PROBE_BOUND,
        linear: 0,
        slot: 0,
    }
}

/// Number of different slots among the bounded candidates of `hash`.
fn distinct_candidates(hash: u32, capacity: usize) -> usize {
    let mut slots: Vec<usize> = probe(hash, capacity).collect();
    slots.sort_unstable();
    slots.dedup();
    slots.len()
}

/// Empty slot past the bounded candidates of `hash`.
fn overflow_slot(hash: u32, capacity: usize, is_free: impl Fn(usize) -> bool) -> Option<usize> {
    probe(hash, capacity)
        .with_overflow()
        .skip(PROBE_BOUND)
        .find(|&slot| is_free(slot))
}

#[track_caller]
fn assert_key(key: &Value) {
    assert!(
        key.is_hashable(),
        "{} values cannot be used as table keys",
        key.kind()
    );
}

/// Where each record lands after a resize.
struct Placement {
    /// Slot of each record, by record index.
    slots: Vec<usize>,
    overflowed: usize,
}

/// Assign each hash a slot in a table of `capacity` slots, or `None` when one
/// of them runs out of candidates and doubling could still separate it.
fn place(hashes: &[u32], capacity: usize) -> Option<Placement> {
    let mut owners: Vec<Option<usize>> = vec![None; capacity];
    let mut slots = vec![0; hashes.len()];
    let mut deferred = Vec::new();
    for (entry, &hash) in hashes.iter().enumerate() {
        match probe(hash, capacity).find(|&slot| owners[slot].is_none()) {
            Some(slot) => {
                owners[slot] = Some(entry);
                slots[entry] = slot;
            }
            None => deferred.push(entry),
        }
    }

    // Overflow only once every bounded placement is settled.
    let overflowed = deferred.len();
    for entry in deferred {
        let hash = hashes[entry];
        let group = hashes.iter().filter(|&&other| other == hash).count();
        if group <= distinct_candidates(hash, capacity) {
            return None;
        }
        let slot = overflow_slot(hash, capacity, |slot| owners[slot].is_none())?;
        owners[slot] = Some(entry);
        slots[entry] = slot;
    }
    Some(Placement { slots, overflowed })
}

impl Table {
    /// Create an empty table with [`INITIAL_CAPACITY`] slots.
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    /// Create an empty table with at least `capacity` slots (never fewer
    /// than [`MIN_CAPACITY`]).
    pub fn with_capacity(capacity: usize) -> Self {
        Table {
            records: vec![None; capacity.max(MIN_CAPACITY)],
            count: 0,
            overflowed: 0,
        }
    }

    /// Number of live records.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.records.len()
    }

    /// Slots where a key with `hash` may live, including the linear tail
    /// while any record has overflowed.
    fn candidates(&self, hash: u32) -> Probe {
        let probe = probe(hash, self.capacity());
        if self.overflowed > 0 {
            probe.with_overflow()
        } else {
            probe
        }
    }

    /// Slot holding a key equal to `key`, if any.
    fn find(&self, key: &Value) -> Option<usize> {
        assert_key(key);
        self.candidates(key.hash()).find(|&slot| {
            self.records[slot]
                .as_ref()
                .is_some_and(|record| record.key.equals(key))
        })
    }

    fn claim(&self, key: &Value, hash: u32) -> Claim {
        let mut vacant = None;
        for (step, slot) in self.candidates(hash).enumerate() {
            match &self.records[slot] {
                Some(record) if record.key.equals(key) => return Claim::Occupied(slot),
                Some(_) => {}
                None if step < PROBE_BOUND => {
                    vacant.get_or_insert(slot);
                }
                None => {}
            }
        }
        if let Some(slot) = vacant {
            return Claim::Vacant(slot);
        }
        let group = 1 + self
            .records
            .iter()
            .flatten()
            .filter(|record| record.key.hash() == hash)
            .count();
        if group > distinct_candidates(hash, self.capacity()) {
            if let Some(slot) = overflow_slot(hash, self.capacity(), |slot| {
                self.records[slot].is_none()
            }) {
                return Claim::Overflow(slot);
            }
        }
        Claim::Exhausted
    }

    /// Borrow the value stored under `key`.
    ///
    /// # Panics
    ///
    /// When `key` is not hashable.
    pub fn get(&self, key: &Value) -> Option<&Value> {
        let slot = self.find(key)?;
        self.records[slot].as_ref().map(|record| &record.value)
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.find(key).is_some()
    }

    /// Store `value` under `key`, taking ownership of both. Returns the value
    /// previously stored under an equal key.
    ///
    /// # Panics
    ///
    /// When `key` is not hashable.
    pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
        assert_key(&key);
        let hash = key.hash();
        loop {
            match self.claim(&key, hash) {
                Claim::Occupied(slot) => {
                    let Some(record) = self.records[slot].as_mut() else {
                        unreachable!("claimed slot {slot} is empty");
                    };
                    return Some(mem::replace(&mut record.value, value));
                }
                Claim::Vacant(slot) => {
                    self.records[slot] = Some(Record { key, value });
                    self.count += 1;
                    return None;
                }
                Claim::Overflow(slot) => {
                    debug!(hash, slot, "too many keys share one hash, overflowing");
                    self.records[slot] = Some(Record { key, value });
                    self.count += 1;
                    self.overflowed += 1;
                    return None;
                }
                Claim::Exhausted => {
                    debug!(
                        capacity = self.capacity(),
                        count = self.count,
                        "probe sequence exhausted, growing table"
                    );
                    self.resize(self.capacity() * 2);
                }
            }
        }
    }

    /// Store copies of `key` and `value`; the caller keeps its own handles.
    pub fn set(&mut self, key: &Value, value: &Value) {
        self.insert(key.clone(), value.clone());
    }

    /// Remove the record stored under `key` and return its value.
    ///
    /// # Panics
    ///
    /// When `key` is not hashable.
    pub fn remove(&mut self, key: &Value) -> Option<Value> {
        let slot = self.find(key)?;
        let record = self.records[slot].take()?;
        self.count -= 1;
        if !probe(record.key.hash(), self.capacity()).any(|home| home == slot) {
            self.overflowed -= 1;
        }
        if self.count * 4 < self.capacity() {
            self.shrink();
        }
        Some(record.value)
    }

    /// Drop every record. Capacity is unchanged.
    pub fn clear(&mut self) {
        self.records.iter_mut().for_each(|slot| *slot = None);
        self.count = 0;
        self.overflowed = 0;
    }

    /// Key and value at physical slot `pos`, if that slot is occupied.
    pub fn slot(&self, pos: usize) -> Option<(&Value, &Value)> {
        self.records
            .get(pos)?
            .as_ref()
            .map(|record| (&record.key, &record.value))
    }

    /// Live records in physical slot order.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> + '_ {
        self.records
            .iter()
            .flatten()
            .map(|record| (&record.key, &record.value))
    }

    fn shrink(&mut self) {
        let half = self.capacity() / 2;
        if half >= MIN_CAPACITY {
            self.resize(half);
        }
    }

    fn resize(&mut self, capacity: usize) {
        let from = self.capacity();
        let entries: Vec<Record> = mem::take(&mut self.records).into_iter().flatten().collect();
        let hashes: Vec<u32> = entries.iter().map(|record| record.key.hash()).collect();

        let mut to = capacity;
        let placement = loop {
            if let Some(placement) = place(&hashes, to) {
                break placement;
            }
            to *= 2;
        };

        let mut records = vec![None; to];
        for (record, slot) in entries.into_iter().zip(placement.slots) {
            records[slot] = Some(record);
        }
        self.records = records;
        self.overflowed = placement.overflowed;
        trace!(from, to, count = self.count, overflowed = self.overflowed, "resized table");
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Table {
    fn drop(&mut self) {
        let records = mem::take(&mut self.records);
        ensure_sufficient_stack(move || drop(records));
    }
}

impl PartialEq for Table {
    /// Same keys mapped to equal values; slot placement is irrelevant.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key) == Some(value))
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl FromIterator<(Value, Value)> for Table {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        let mut table = Table::new();
        for (key, value) in iter {
            table.insert(key, value);
        }
        table
    }
}
