//! Stable path keys for inspector nodes.
//!
//! Expansion state is keyed by the node's path: the property names (or
//! array indices) from the root, joined with the ASCII unit separator.
//! That byte cannot appear in reasonable object keys, so `a.b` as a single
//! key and `a` → `b` as a nested pair never collide.

/// Delimiter joining path segments.
pub const SEPARATOR: char = '\u{001F}';

/// A node's position in the value tree.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct NodePath {
    key: String,
}

impl NodePath {
    /// The root value's path (empty key).
    pub fn root() -> Self {
        Self::default()
    }

    /// Descend into a property.
    pub fn child(&self, segment: &str) -> Self {
        if self.key.is_empty() {
            Self {
                key: segment.to_string(),
            }
        } else {
            Self {
                key: format!("{}{}{}", self.key, SEPARATOR, segment),
            }
        }
    }

    /// Descend into an array element.
    pub fn index(&self, i: usize) -> Self {
        self.child(&i.to_string())
    }

    /// The joined key, usable as a map key.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_root(&self) -> bool {
        self.key.is_empty()
    }

    /// The segments from the root, in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.key.split(SEPARATOR).filter(|s| !s.is_empty())
    }
}
