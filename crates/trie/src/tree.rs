//! In-memory reference trie.
//!
//! Builds the same node layout a keytree server keeps and serves the same
//! audit paths, so the fold in [`crate::proof`] can be checked against real
//! trie shapes. Not meant for production use.

use keytree_core::{Hash, HASH_BITS};

use crate::node::{hash_of, Node};
use crate::proof::TrieLookup;

/// A sparse binary trie keyed by 512-bit digests.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTrie {
    root: Option<Box<Node>>,
    len: usize,
}

impl ReferenceTrie {
    /// Create an empty trie.
    pub fn new() -> Self {
        Self::default()
    }

    /// Root digest; [`Hash::EMPTY`] for an empty trie.
    pub fn root(&self) -> Hash {
        hash_of(&self.root)
    }

    /// Number of keys stored.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the trie holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bind `key` to `value`, replacing any previous value.
    ///
    /// An empty `value` removes the key.
    pub fn insert(&mut self, key: Hash, value: Hash) {
        let value = (!value.is_empty()).then_some(value);
        let existed = self.lookup(&key).1.is_some();
        self.root = set(self.root.take(), &key, 0, value);
        match (existed, value.is_some()) {
            (false, true) => self.len += 1,
            (true, false) => self.len -= 1,
            _ => {}
        }
    }

    /// Remove `key`; no-op if absent.
    pub fn remove(&mut self, key: &Hash) {
        self.insert(*key, Hash::EMPTY);
    }

    /// Audit path for `key`, and its value if present.
    pub fn lookup(&self, key: &Hash) -> (TrieLookup, Option<Hash>) {
        let mut path = TrieLookup::new(*key);
        let value = lookup(self.root.as_deref(), key, 0, &mut path);
        (path, value)
    }
}

fn set(
    node: Option<Box<Node>>,
    key: &Hash,
    depth: usize,
    value: Option<Hash>,
) -> Option<Box<Node>> {
    let node = match node {
        None => return value.map(|value| Box::new(Node::leaf(*key, value))),
        Some(node) => node,
    };

    let mut children = match *node {
        Node::Leaf { key: leaf_key, .. } if leaf_key == *key => {
            return value.map(|value| Box::new(Node::leaf(*key, value)));
        }
        Node::Leaf { key: leaf_key, .. } => {
            // Distinct keys always differ before HASH_BITS.
            debug_assert!(depth < HASH_BITS);
            let mut children: [Option<Box<Node>>; 2] = [None, None];
            children[usize::from(leaf_key.bit(depth))] = Some(node);
            children
        }
        Node::Internal { children, .. } => children,
    };

    let side = usize::from(key.bit(depth));
    children[side] = set(children[side].take(), key, depth + 1, value);
    Node::merge(children)
}

fn lookup(
    node: Option<&Node>,
    key: &Hash,
    depth: usize,
    path: &mut TrieLookup,
) -> Option<Hash> {
    match node? {
        Node::Leaf {
            key: leaf_key,
            value,
        } => {
            if leaf_key == key {
                return Some(*value);
            }
            path.leaf_key = *leaf_key;
            path.hashes.record(key.first_difference(leaf_key), *value);
            None
        }
        Node::Internal { children, .. } => {
            let side = usize::from(key.bit(depth));
            let other = children[1 - side].as_deref();
            path.hashes.record(depth, other.map_or(Hash::EMPTY, Node::hash));

            let found = lookup(children[side].as_deref(), key, depth + 1, path);

            // The deepest leaf sibling travels as LeafKey plus its raw value.
            if path.leaf_key == *key {
                if let Some(Node::Leaf {
                    key: other_key,
                    value: other_value,
                }) = other
                {
                    path.leaf_key = *other_key;
                    path.hashes.record(depth, *other_value);
                }
            }
            found
        }
    }
}
