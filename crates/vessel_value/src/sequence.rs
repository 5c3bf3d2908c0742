//! Index-addressed sequence backing `Value::List`.
//!
//! # Shape
//!
//! A sequence is a binary tree of leaves and branches:
//!
//! ```text
//!              Branch(count = 3)
//!             /                 \
//!      Branch(count = 2)       Leaf(y)
//!       /           \
//!   Leaf(z)       Leaf(x)
//! ```
//!
//! Every branch caches the number of leaves beneath it and always has two
//! live children; removing one child collapses the branch into the other.
//! Index operations descend by comparing the index against the left
//! subtree's cached size, so they cost O(depth).
//!
//! There is no rebalancing. The shape depends on the order of operations and
//! a sequence that only ever grows at one end degenerates into a chain of
//! depth O(n). Recursive descents run under
//! [`ensure_sufficient_stack`](crate::ensure_sufficient_stack) and dropping
//! the tree is iterative, so deep chains are slow but never overflow.

use std::fmt;
use std::mem;

use crate::stack::ensure_sufficient_stack;
use crate::Value;

/// Ordered, index-addressable collection of values.
#[derive(Clone, Default)]
pub struct Sequence {
    root: Option<Box<Node>>,
}

enum Node {
    Leaf(Value),
    Branch(Box<Branch>),
}

struct Branch {
    left: Node,
    right: Node,
    /// Number of leaves in this subtree.
    count: usize,
}

impl Node {
    /// Placeholder swapped in while a node is being rebuilt. Owns no heap.
    const VACANT: Node = Node::Leaf(Value::NONE);

    #[inline]
    fn len(&self) -> usize {
        match self {
            Node::Leaf(_) => 1,
            Node::Branch(branch) => branch.count,
        }
    }

    fn branch(left: Node, right: Node) -> Node {
        let count = left.len() + right.len();
        Node::Branch(Box::new(Branch { left, right, count }))
    }

    /// Overwrite element `index`, or append when `index == self.len()`.
    fn set(&mut self, index: usize, value: Value) {
        ensure_sufficient_stack(|| match self {
            Node::Leaf(slot) if index == 0 => *slot = value,
            Node::Leaf(_) => {
                debug_assert_eq!(index, 1);
                let old = mem::replace(self, Node::VACANT);
                *self = Node::branch(old, Node::Leaf(value));
            }
            Node::Branch(branch) => {
                if index == branch.count {
                    branch.count += 1;
                }
                let left_len = branch.left.len();
                if index < left_len {
                    branch.left.set(index, value);
                } else {
                    branch.right.set(index - left_len, value);
                }
            }
        });
    }

    /// Insert before element `index`, shifting it and everything after it
    /// one position right. `index == self.len()` appends.
    fn insert(&mut self, index: usize, value: Value) {
        ensure_sufficient_stack(|| match self {
            Node::Leaf(_) => {
                let old = mem::replace(self, Node::VACANT);
                *self = if index == 0 {
                    Node::branch(Node::Leaf(value), old)
                } else {
                    Node::branch(old, Node::Leaf(value))
                };
            }
            Node::Branch(branch) => {
                branch.count += 1;
                let left_len = branch.left.len();
                if index < left_len {
                    branch.left.insert(index, value);
                } else {
                    branch.right.insert(index - left_len, value);
                }
            }
        });
    }

    /// Detach element `index`. Returns what is left of this subtree (`None`
    /// when the subtree was the removed leaf) and the removed value.
    fn remove(self, index: usize) -> (Option<Node>, Value) {
        ensure_sufficient_stack(move || match self {
            Node::Leaf(value) => (None, value),
            Node::Branch(mut branch) => {
                let left_len = branch.left.len();
                let (rest, removed) = if index < left_len {
                    mem::replace(&mut branch.left, Node::VACANT).remove(index)
                } else {
                    mem::replace(&mut branch.right, Node::VACANT).remove(index - left_len)
                };
                let remaining = match rest {
                    Some(child) if index < left_len => {
                        branch.left = child;
                        branch.count -= 1;
                        Node::Branch(branch)
                    }
                    Some(child) => {
                        branch.right = child;
                        branch.count -= 1;
                        Node::Branch(branch)
                    }
                    // One child left: the branch collapses into it.
                    None if index < left_len => branch.right,
                    None => branch.left,
                };
                (Some(remaining), removed)
            }
        })
    }
}

impl Clone for Node {
    fn clone(&self) -> Self {
        ensure_sufficient_stack(|| match self {
            Node::Leaf(value) => Node::Leaf(value.clone()),
            Node::Branch(branch) => Node::Branch(Box::new(Branch {
                left: branch.left.clone(),
                right: branch.right.clone(),
                count: branch.count,
            })),
        })
    }
}

impl Sequence {
    /// Create an empty sequence.
    pub const fn new() -> Self {
        Sequence { root: None }
    }

    /// Number of elements. O(1).
    #[inline]
    pub fn len(&self) -> usize {
        self.root.as_deref().map_or(0, Node::len)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Borrow element `index`, or `None` when `index >= len()`.
    pub fn get(&self, index: usize) -> Option<&Value> {
        if index >= self.len() {
            return None;
        }
        let mut node = self.root.as_deref()?;
        let mut index = index;
        loop {
            match node {
                Node::Leaf(value) => return Some(value),
                Node::Branch(branch) => {
                    let left_len = branch.left.len();
                    if index < left_len {
                        node = &branch.left;
                    } else {
                        index -= left_len;
                        node = &branch.right;
                    }
                }
            }
        }
    }

    /// Replace element `index`, or append when `index == len()`.
    ///
    /// # Panics
    ///
    /// When `index > len()`.
    pub fn set(&mut self, index: usize, value: Value) {
        let len = self.len();
        assert!(
            index <= len,
            "set index {index} out of range for sequence of length {len}"
        );
        if let Some(root) = self.root.as_mut() {
            root.set(index, value);
        } else {
            self.root = Some(Box::new(Node::Leaf(value)));
        }
    }

    /// Insert `value` at `index`, shifting later elements right.
    /// `index == len()` appends.
    ///
    /// # Panics
    ///
    /// When `index > len()`.
    pub fn insert(&mut self, index: usize, value: Value) {
        let len = self.len();
        assert!(
            index <= len,
            "insert index {index} out of range for sequence of length {len}"
        );
        if let Some(root) = self.root.as_mut() {
            root.insert(index, value);
        } else {
            self.root = Some(Box::new(Node::Leaf(value)));
        }
    }

    /// Remove and return element `index`, shifting later elements left.
    ///
    /// # Panics
    ///
    /// When `index >= len()`.
    pub fn remove(&mut self, index: usize) -> Value {
        let len = self.len();
        assert!(
            index < len,
            "remove index {index} out of range for sequence of length {len}"
        );
        let Some(root) = self.root.take() else {
            unreachable!("non-empty sequence has a root");
        };
        let (rest, removed) = (*root).remove(index);
        self.root = rest.map(Box::new);
        removed
    }

    /// Append `value` at the end.
    #[inline]
    pub fn push(&mut self, value: Value) {
        self.set(self.len(), value);
    }

    /// Borrowing in-order iterator.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            pending: self.root.as_deref().into_iter().collect(),
            remaining: self.len(),
        }
    }

    /// Depth of the tree; 0 for an empty sequence, 1 for a single leaf.
    #[cfg(test)]
    pub(crate) fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending: Vec<(&Node, usize)> =
            self.root.as_deref().into_iter().map(|node| (node, 1)).collect();
        while let Some((node, depth)) = pending.pop() {
            deepest = deepest.max(depth);
            if let Node::Branch(branch) = node {
                pending.push((&branch.left, depth + 1));
                pending.push((&branch.right, depth + 1));
            }
        }
        deepest
    }

    /// Check every cached count against the leaves actually present.
    #[cfg(test)]
    pub(crate) fn assert_well_formed(&self) {
        fn count(node: &Node) -> usize {
            match node {
                Node::Leaf(_) => 1,
                Node::Branch(branch) => {
                    let actual = count(&branch.left) + count(&branch.right);
                    assert_eq!(branch.count, actual, "stale cached branch count");
                    actual
                }
            }
        }
        if let Some(root) = self.root.as_deref() {
            count(root);
        }
    }
}

impl Drop for Sequence {
    fn drop(&mut self) {
        let Some(root) = self.root.take() else {
            return;
        };
        // Dismantle iteratively; a degenerate tree is as deep as it is long.
        ensure_sufficient_stack(move || {
            let mut pending = vec![*root];
            while let Some(node) = pending.pop() {
                if let Node::Branch(branch) = node {
                    let Branch { left, right, .. } = *branch;
                    pending.push(left);
                    pending.push(right);
                }
            }
        });
    }
}

impl PartialEq for Sequence {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl FromIterator<Value> for Sequence {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let mut seq = Sequence::new();
        for value in iter {
            seq.push(value);
        }
        seq
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a Value;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order iterator over a [`Sequence`].
///
/// Walks the tree with an explicit stack instead of re-descending from the
/// root for every index.
#[derive(Clone)]
pub struct Iter<'a> {
    pending: Vec<&'a Node>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.pending.pop() {
            match node {
                Node::Leaf(value) => {
                    self.remaining -= 1;
                    return Some(value);
                }
                Node::Branch(branch) => {
                    self.pending.push(&branch.right);
                    self.pending.push(&branch.left);
                }
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}
