//! Debug renderings and shape verification.

use std::fmt::Display;
use std::io::{self, Write};

use crate::node::Node;
use crate::RadixTrie;

const INDENT: &str = "    ";

impl<V: Display> RadixTrie<V> {
    /// Writes the trie as a box-drawing hierarchy, one node per line.
    ///
    /// ```text
    /// .
    ///     └── sa
    ///         ├── lly
    ///             └── . = 2
    ///         └── m
    ///             └── . = 1
    /// ```
    ///
    /// Edge lines carry the raw label bytes; terminal markers are written as
    /// `. = <value>`.
    pub fn write_tree<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(b".\n")?;
        let mut stack: Vec<(&Node<V>, usize, bool)> = Vec::new();
        push_children(&mut stack, &self.root, 1);

        while let Some((node, level, last)) = stack.pop() {
            for _ in 0..level {
                w.write_all(INDENT.as_bytes())?;
            }
            w.write_all(if last { "└── " } else { "├── " }.as_bytes())?;
            match node.value {
                Some(ref value) if node.is_terminal() => writeln!(w, ". = {value}")?,
                _ => {
                    w.write_all(&node.prefix)?;
                    w.write_all(b"\n")?;
                }
            }
            push_children(&mut stack, node, level + 1);
        }
        Ok(())
    }

    /// [`write_tree`](Self::write_tree) collected into a buffer.
    pub fn tree_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.write_tree(&mut out);
        out
    }

    /// Writes a plain outline: four spaces per level, quoted labels, and
    /// terminal values after a single space.
    pub fn write_outline<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(b".\n")?;
        let mut stack: Vec<(&Node<V>, usize, bool)> = Vec::new();
        push_children(&mut stack, &self.root, 1);

        while let Some((node, level, _)) = stack.pop() {
            let indent = INDENT.repeat(level);
            match node.value {
                Some(ref value) if node.is_terminal() => writeln!(w, "{indent} {value}")?,
                _ => writeln!(w, "{indent}{:?}", String::from_utf8_lossy(&node.prefix))?,
            }
            push_children(&mut stack, node, level + 1);
        }
        Ok(())
    }
}

fn push_children<'a, V>(
    stack: &mut Vec<(&'a Node<V>, usize, bool)>,
    node: &'a Node<V>,
    level: usize,
) {
    let n = node.children.len();
    for (i, child) in node.children.iter().enumerate().rev() {
        stack.push((child, level, i + 1 == n));
    }
}

impl<V> RadixTrie<V> {
    /// Checks the shape invariants of every node. Returns one message per
    /// violation; an empty list means the trie is well-formed.
    pub fn verify_integrity(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !self.root.prefix.is_empty() {
            issues.push(format!("root has non-empty label {:?}", self.root.prefix));
        }
        if self.root.value.is_some() {
            issues.push("root carries a value".to_string());
        }

        let mut terminals = 0usize;
        let mut stack: Vec<(&Node<V>, Vec<u8>, bool)> = vec![(&self.root, Vec::new(), true)];
        while let Some((node, path, is_root)) = stack.pop() {
            for (i, child) in node.children.iter().enumerate() {
                if child.is_terminal() {
                    terminals += 1;
                    if i != 0 {
                        issues.push(format!("terminal marker at index {i} below {path:?}"));
                    }
                    if child.value.is_none() {
                        issues.push(format!("terminal marker without value below {path:?}"));
                    }
                    if !child.children.is_empty() {
                        issues.push(format!("terminal marker with children below {path:?}"));
                    }
                } else if child.value.is_some() {
                    issues.push(format!(
                        "edge {:?} below {path:?} carries a value",
                        child.prefix
                    ));
                }
            }

            for pair in node.children.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                if a.prefix >= b.prefix {
                    issues.push(format!(
                        "children of {path:?} out of order: {:?} >= {:?}",
                        a.prefix, b.prefix
                    ));
                }
                if !a.is_terminal() && a.prefix.first() == b.prefix.first() {
                    issues.push(format!(
                        "siblings {:?} and {:?} below {path:?} share a prefix",
                        a.prefix, b.prefix
                    ));
                }
            }

            if !is_root {
                match node.children.as_slice() {
                    [] => issues.push(format!("edge {path:?} has no children")),
                    [only] if !only.is_terminal() => {
                        issues.push(format!("edge {path:?} has a single child and no marker"))
                    }
                    _ => {}
                }
            }

            for child in node.children.iter().filter(|c| !c.is_terminal()) {
                let mut child_path = path.clone();
                child_path.extend_from_slice(&child.prefix);
                stack.push((child, child_path, false));
            }
        }

        if terminals != self.len {
            issues.push(format!(
                "found {terminals} terminal markers but len is {}",
                self.len
            ));
        }
        issues
    }
}
