//! # radix-rs
//!
//! An ordered map from byte-string keys to values, stored as a compressed
//! radix trie. Chains of single-child nodes are folded into one edge label, so
//! the node count is bounded by the number of keys rather than their total
//! length.
//!
//! ## Example
//!
//! ```rust
//! use radix_rs::RadixTrie;
//!
//! let mut trie: RadixTrie<u64> = RadixTrie::new();
//! trie.store(b"sam", 1);
//! trie.store(b"sally", 2);
//! trie.store(b"samuel", 3);
//!
//! assert_eq!(trie.load(b"sally"), Some(&2));
//! assert_eq!(trie.keys(b"sam", 0), vec![b"sam".to_vec(), b"samuel".to_vec()]);
//!
//! trie.delete(b"sam");
//! assert_eq!(trie.load(b"sam"), None);
//! ```
//!
//! The trie is not synchronized. Use [`SharedTrie`] or another external lock
//! when it must be reached from several threads.

mod debug;
mod error;
mod iter;
mod node;
mod shared;

pub use error::{Result, TrieError};
pub use iter::Iter;
pub use shared::SharedTrie;

use tracing::trace;

use node::{common_prefix_len, Node};

/// Compressed radix trie keyed by byte strings.
///
/// Every stored key is a path of edge labels from the root ending in a
/// terminal marker that carries the value. Siblings are kept sorted, so
/// iteration and [`keys`](Self::keys) yield keys in ascending byte order.
pub struct RadixTrie<V> {
    root: Node<V>,
    len: usize,
}

impl<V> RadixTrie<V> {
    pub fn new() -> Self {
        Self {
            root: Node::root(),
            len: 0,
        }
    }

    /// Number of stored keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of nodes in the trie, including the root and terminal markers.
    pub fn node_count(&self) -> usize {
        self.root.count_nodes()
    }

    pub fn clear(&mut self) {
        self.root = Node::root();
        self.len = 0;
    }

    /// Returns the value stored for `key`.
    pub fn load(&self, key: &[u8]) -> Option<&V> {
        let mut node = &self.root;
        let mut rest = key;
        loop {
            let shared = common_prefix_len(rest, &node.prefix);
            if shared < node.prefix.len() {
                return None;
            }
            rest = &rest[shared..];
            if rest.is_empty() {
                return node.terminal_value();
            }
            node = &node.children[node.locate(rest).ok()?];
        }
    }

    pub fn load_mut(&mut self, key: &[u8]) -> Option<&mut V> {
        let path = self.terminal_path(key)?;
        self.node_at_mut(&path).terminal_value_mut()
    }

    #[inline]
    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.load(key).is_some()
    }

    /// Stores `value` under `key`, returning the previous value if the key was
    /// already present.
    ///
    /// # Panics
    ///
    /// Panics if a node allocation fails. Use [`try_store`](Self::try_store)
    /// to handle that case.
    pub fn store(&mut self, key: &[u8], value: V) -> Option<V> {
        match self.try_store(key, value) {
            Ok(old) => old,
            Err(err) => panic!("radix trie store failed: {err}"),
        }
    }

    /// Like [`store`](Self::store), but reports allocation failure instead of
    /// panicking. On error the trie is left exactly as it was.
    pub fn try_store(&mut self, key: &[u8], value: V) -> Result<Option<V>> {
        let mut node = &mut self.root;
        let mut rest = key;
        loop {
            let shared = common_prefix_len(rest, &node.prefix);

            // The key leaves this node's label partway through.
            if shared < node.prefix.len() {
                node.try_split(shared, rest, value)?;
                self.len += 1;
                return Ok(None);
            }

            rest = &rest[shared..];
            if rest.is_empty() {
                if let Some(slot) = node.terminal_value_mut() {
                    trace!(key_len = key.len(), "trie.store.update");
                    return Ok(Some(std::mem::replace(slot, value)));
                }
                node.try_push_terminal(value)?;
                self.len += 1;
                return Ok(None);
            }

            match node.locate(rest) {
                Ok(idx) => node = &mut node.children[idx],
                Err(idx) => {
                    node.try_insert_leaf(idx, rest, value)?;
                    self.len += 1;
                    return Ok(None);
                }
            }
        }
    }

    /// Removes `key` and compacts the nodes around it. Absent keys are ignored.
    pub fn delete(&mut self, key: &[u8]) {
        self.remove(key);
    }

    /// Removes `key`, returning its value if it was present.
    pub fn remove(&mut self, key: &[u8]) -> Option<V> {
        let Some(path) = self.terminal_path(key) else {
            trace!(key_len = key.len(), "trie.delete.miss");
            return None;
        };

        let removed = match path.split_last() {
            // The empty key lives on the root, which is never merged.
            None => self.root.take_terminal(),
            Some((&idx, ancestors)) => {
                let parent_is_root = ancestors.is_empty();
                let parent = self.node_at_mut(ancestors);
                Self::remove_below(parent, idx, parent_is_root)
            }
        };

        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// Drops the terminal marker of `parent.children[idx]` and restores
    /// canonical form around it.
    fn remove_below(parent: &mut Node<V>, idx: usize, parent_is_root: bool) -> Option<V> {
        let target = &parent.children[idx];
        match target.children.len() {
            // Only the marker is left: unlink the whole edge.
            1 => {
                let survivor = (!parent_is_root && parent.children.len() == 2)
                    .then(|| &parent.children[1 - idx])
                    .filter(|s| !s.is_terminal());
                if let Some(survivor) = survivor {
                    let extra = survivor.prefix.len();
                    parent.prefix.reserve(extra);
                }

                trace!(idx, "trie.delete.unlink");
                let removed = parent.children.remove(idx).take_terminal();
                if needs_merge(parent, parent_is_root) {
                    parent.absorb_only_child();
                }
                removed
            }
            // The marker and one edge: fold the edge into the target.
            2 => {
                let target = &mut parent.children[idx];
                let extra = target.children[1].prefix.len();
                target.prefix.reserve(extra);
                let removed = target.take_terminal();
                target.absorb_only_child();
                removed
            }
            _ => parent.children[idx].take_terminal(),
        }
    }

    /// Child indices from the root down to the node whose terminal marker
    /// holds `key`, or `None` if `key` is not stored.
    fn terminal_path(&self, key: &[u8]) -> Option<Vec<usize>> {
        let mut path = Vec::new();
        let mut node = &self.root;
        let mut rest = key;
        loop {
            let shared = common_prefix_len(rest, &node.prefix);
            if shared < node.prefix.len() {
                return None;
            }
            rest = &rest[shared..];
            if rest.is_empty() {
                return node.has_terminal().then_some(path);
            }
            let idx = node.locate(rest).ok()?;
            path.push(idx);
            node = &node.children[idx];
        }
    }

    fn node_at_mut(&mut self, path: &[usize]) -> &mut Node<V> {
        path.iter()
            .fold(&mut self.root, |node, &idx| &mut node.children[idx])
    }

    /// Returns up to `limit` stored keys starting with `prefix`, in ascending
    /// order. A `limit` of `0` returns every match; an empty `prefix` matches
    /// all keys.
    pub fn keys(&self, prefix: &[u8], limit: usize) -> Vec<Vec<u8>> {
        let matches = self.prefix_iter(prefix).map(|(key, _)| key);
        if limit == 0 {
            matches.collect()
        } else {
            matches.take(limit).collect()
        }
    }

    /// Iterates `(key, &value)` pairs whose key starts with `prefix`, in
    /// ascending key order.
    pub fn prefix_iter(&self, prefix: &[u8]) -> Iter<'_, V> {
        match self.anchor(prefix) {
            Some((node, extra)) => {
                let mut key = Vec::with_capacity(prefix.len() + extra);
                key.extend_from_slice(prefix);
                key.extend_from_slice(&node.prefix[node.prefix.len() - extra..]);
                Iter::below(node, key)
            }
            None => Iter::empty(),
        }
    }

    pub fn iter(&self) -> Iter<'_, V> {
        Iter::below(&self.root, Vec::new())
    }

    /// Finds the topmost node whose subtree holds every key starting with
    /// `prefix`, along with how many bytes of its label lie past the end of
    /// `prefix`.
    fn anchor(&self, prefix: &[u8]) -> Option<(&Node<V>, usize)> {
        let mut node = &self.root;
        let mut rest = prefix;
        loop {
            let shared = common_prefix_len(rest, &node.prefix);
            if shared == rest.len() {
                return Some((node, node.prefix.len() - shared));
            }
            if shared < node.prefix.len() {
                return None;
            }
            rest = &rest[shared..];
            node = &node.children[node.locate(rest).ok()?];
        }
    }
}

/// A non-root node left with one non-terminal child must absorb it.
fn needs_merge<V>(node: &Node<V>, is_root: bool) -> bool {
    !is_root && node.children.len() == 1 && !node.children[0].is_terminal()
}

impl<V> Default for RadixTrie<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> Clone for RadixTrie<V> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            len: self.len,
        }
    }
}

impl<V: std::fmt::Debug> std::fmt::Debug for RadixTrie<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(k, v)| (String::from_utf8_lossy(&k).into_owned(), v)))
            .finish()
    }
}

impl<K: AsRef<[u8]>, V> Extend<(K, V)> for RadixTrie<V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.store(key.as_ref(), value);
        }
    }
}

impl<K: AsRef<[u8]>, V> FromIterator<(K, V)> for RadixTrie<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut trie = Self::new();
        trie.extend(iter);
        trie
    }
}

impl<'a, V> IntoIterator for &'a RadixTrie<V> {
    type Item = (Vec<u8>, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}


#[cfg(test)]
mod proptests;
