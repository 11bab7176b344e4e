//! Node types for the reference trie.

use keytree_core::{combine_hashes, Hash};

/// A node in the reference trie. An absent child is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Node {
    /// A single key with the digest of its value.
    Leaf {
        /// Trie key.
        key: Hash,
        /// Value digest (an entry hash).
        value: Hash,
    },

    /// Two subtrees split on the key bit at this node's depth.
    Internal {
        /// Children for key bit 0 and bit 1.
        children: [Option<Box<Node>>; 2],
        /// Cached `combine(children[0], children[1])`.
        hash: Hash,
    },
}

impl Node {
    pub(crate) fn leaf(key: Hash, value: Hash) -> Self {
        Node::Leaf { key, value }
    }

    /// Rebuild a parent from its children, floating a lone leaf upward.
    ///
    /// A lone internal child is kept as is, so chains of one-child internal
    /// nodes hash as `combine(child, EMPTY)` at every level.
    pub(crate) fn merge(children: [Option<Box<Node>>; 2]) -> Option<Box<Node>> {
        match children {
            [None, None] => None,
            [Some(leaf), None] | [None, Some(leaf)] if leaf.is_leaf() => Some(leaf),
            children => {
                let hash = combine_hashes(&hash_of(&children[0]), &hash_of(&children[1]));
                Some(Box::new(Node::Internal { children, hash }))
            }
        }
    }

    pub(crate) fn hash(&self) -> Hash {
        match self {
            Node::Leaf { key, value } => combine_hashes(key, value),
            Node::Internal { hash, .. } => *hash,
        }
    }

    pub(crate) fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}

/// Digest of an optional subtree.
pub(crate) fn hash_of(node: &Option<Box<Node>>) -> Hash {
    node.as_ref().map_or(Hash::EMPTY, |node| node.hash())
}
