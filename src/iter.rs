use crate::node::Node;

/// Ordered iterator over `(key, &value)` pairs below a prefix.
///
/// Created by [`RadixTrie::iter`](crate::RadixTrie::iter) and
/// [`RadixTrie::prefix_iter`](crate::RadixTrie::prefix_iter). Traversal is
/// pre-order over sorted children using an explicit stack, so deep tries do
/// not grow the call stack.
pub struct Iter<'a, V> {
    /// Pending nodes with the key length at which their label starts.
    stack: Vec<(&'a Node<V>, usize)>,
    key: Vec<u8>,
}

impl<'a, V> Iter<'a, V> {
    pub(crate) fn empty() -> Self {
        Self {
            stack: Vec::new(),
            key: Vec::new(),
        }
    }

    /// Iterates the subtree of `anchor`, where `key` already spells the full
    /// path to it (including any label bytes past the searched prefix).
    pub(crate) fn below(anchor: &'a Node<V>, key: Vec<u8>) -> Self {
        let depth = key.len();
        let stack = anchor.children.iter().rev().map(|c| (c, depth)).collect();
        Self { stack, key }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (Vec<u8>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, depth)) = self.stack.pop() {
            self.key.truncate(depth);

            if node.is_terminal() {
                if let Some(ref value) = node.value {
                    return Some((self.key.clone(), value));
                }
                continue;
            }

            self.key.extend_from_slice(&node.prefix);
            let depth = self.key.len();
            for child in node.children.iter().rev() {
                self.stack.push((child, depth));
            }
        }
        None
    }
}
