//! Trie node model.
//!
//! Every node owns the edge label leading into it and its children, sorted by
//! label. A child with an empty label is a terminal marker: it is always the
//! first child, has no children of its own, and holds the value of the key
//! spelled by the path down to its parent.

use smallvec::SmallVec;
use tracing::trace;

use crate::error::{Result, TrieError};

/// Labels up to this many bytes are stored inline in the node.
pub(crate) const INLINE_PREFIX_LEN: usize = 16;

pub(crate) type Prefix = SmallVec<[u8; INLINE_PREFIX_LEN]>;

/// Length of the longest common prefix of `a` and `b`.
#[inline]
pub(crate) fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

/// Builds an edge label without aborting on allocation failure.
fn try_prefix(bytes: &[u8]) -> Result<Prefix> {
    let mut prefix = Prefix::new();
    prefix
        .try_reserve_exact(bytes.len())
        .map_err(|_| TrieError::PrefixAlloc { bytes: bytes.len() })?;
    prefix.extend_from_slice(bytes);
    Ok(prefix)
}

#[derive(Clone)]
pub(crate) struct Node<V> {
    /// Edge label consumed on the way into this node. Empty for the root and
    /// for terminal markers.
    pub(crate) prefix: Prefix,
    /// Only ever `Some` on terminal markers.
    pub(crate) value: Option<V>,
    pub(crate) children: Vec<Node<V>>,
}

impl<V> Node<V> {
    pub(crate) fn root() -> Self {
        Self {
            prefix: Prefix::new(),
            value: None,
            children: Vec::new(),
        }
    }

    fn terminal(value: V) -> Self {
        Self {
            prefix: Prefix::new(),
            value: Some(value),
            children: Vec::new(),
        }
    }

    /// An edge labelled `label` that ends in a terminal marker for `value`.
    fn try_leaf(label: &[u8], value: V) -> Result<Self> {
        let prefix = try_prefix(label)?;
        let mut children = Vec::new();
        children.try_reserve_exact(1)?;
        children.push(Self::terminal(value));
        Ok(Self {
            prefix,
            value: None,
            children,
        })
    }

    /// Only meaningful for children; the root also has an empty label.
    #[inline]
    pub(crate) fn is_terminal(&self) -> bool {
        self.prefix.is_empty()
    }

    #[inline]
    pub(crate) fn has_terminal(&self) -> bool {
        self.children.first().is_some_and(Node::is_terminal)
    }

    pub(crate) fn terminal_value(&self) -> Option<&V> {
        self.children
            .first()
            .filter(|c| c.is_terminal())
            .and_then(|c| c.value.as_ref())
    }

    pub(crate) fn terminal_value_mut(&mut self) -> Option<&mut V> {
        self.children
            .first_mut()
            .filter(|c| c.is_terminal())
            .and_then(|c| c.value.as_mut())
    }

    /// Detaches this node's terminal marker, if any, and returns its value.
    pub(crate) fn take_terminal(&mut self) -> Option<V> {
        if !self.has_terminal() {
            return None;
        }
        self.children.remove(0).value
    }

    /// Finds the child that is the only plausible home for `key`.
    ///
    /// Returns `Ok(i)` when child `i` shares at least one leading byte with
    /// `key`, or `Err(i)` with the position a new child labelled `key` would
    /// take. `key` must be non-empty.
    ///
    /// Sibling labels never share a first byte, so the sharing child is either
    /// the first label `>= key` or the one just before it (`"sam"` sorts before
    /// `"samuel"` but after `"sally"`).
    pub(crate) fn locate(&self, key: &[u8]) -> std::result::Result<usize, usize> {
        debug_assert!(!key.is_empty());
        let idx = self
            .children
            .partition_point(|c| c.prefix.as_slice() < key);
        if let Some(left) = idx.checked_sub(1) {
            if common_prefix_len(key, &self.children[left].prefix) > 0 {
                return Ok(left);
            }
        }
        match self.children.get(idx) {
            Some(child) if common_prefix_len(key, &child.prefix) > 0 => Ok(idx),
            _ => Err(idx),
        }
    }

    /// Inserts a terminal marker for `value` in front of the other children.
    pub(crate) fn try_push_terminal(&mut self, value: V) -> Result<()> {
        debug_assert!(!self.has_terminal());
        self.children.try_reserve(1)?;
        self.children.insert(0, Self::terminal(value));
        Ok(())
    }

    /// Inserts a new `label -> value` edge at sorted position `idx`.
    pub(crate) fn try_insert_leaf(&mut self, idx: usize, label: &[u8], value: V) -> Result<()> {
        let leaf = Self::try_leaf(label, value)?;
        self.children.try_reserve(1)?;
        trace!(idx, label_len = label.len(), "trie.store.insert");
        self.children.insert(idx, leaf);
        Ok(())
    }

    /// Splits this node's label after `at` bytes, where `rest` diverges from
    /// it (or ends), and attaches `value` for `rest` on the new branch.
    ///
    /// The node stays in its parent's slot and becomes the branch point; its
    /// old contents move into a child labelled with the unmatched tail.
    pub(crate) fn try_split(&mut self, at: usize, rest: &[u8], value: V) -> Result<()> {
        debug_assert!(at < self.prefix.len());
        debug_assert_eq!(common_prefix_len(rest, &self.prefix), at);

        let shared = try_prefix(&self.prefix[..at])?;
        let tail = try_prefix(&self.prefix[at..])?;
        let branch = if at == rest.len() {
            Self::terminal(value)
        } else {
            Self::try_leaf(&rest[at..], value)?
        };
        let mut children = Vec::new();
        children.try_reserve_exact(2)?;

        trace!(at, tail_len = tail.len(), "trie.store.split");
        let old = Self {
            prefix: tail,
            value: self.value.take(),
            children: std::mem::take(&mut self.children),
        };
        self.prefix = shared;
        if branch.prefix.as_slice() < old.prefix.as_slice() {
            children.push(branch);
            children.push(old);
        } else {
            children.push(old);
            children.push(branch);
        }
        self.children = children;
        Ok(())
    }

    /// Folds the single remaining child into this node: labels concatenate and
    /// the child's children are adopted.
    pub(crate) fn absorb_only_child(&mut self) {
        debug_assert_eq!(self.children.len(), 1);
        debug_assert!(!self.children[0].is_terminal());
        // Grow first so a failed allocation leaves the node linked as before.
        self.prefix.reserve(self.children[0].prefix.len());
        let Some(child) = self.children.pop() else {
            return;
        };
        trace!(
            prefix_len = self.prefix.len(),
            child_len = child.prefix.len(),
            "trie.delete.merge"
        );
        self.prefix.extend_from_slice(&child.prefix);
        self.value = child.value;
        self.children = child.children;
    }

    pub(crate) fn count_nodes(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }
}
