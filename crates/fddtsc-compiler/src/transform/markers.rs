//! Sentinel comments that drive the rewrite.

/// Namespace of the sentinels this build recognizes.
pub const DEFAULT_NAMESPACE: &str = "fddtsc";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// Replace the alias body with its fully expanded type.
    Bake,
    /// Opaque alias: references become `unknown`.
    Newtype,
    /// Transparent wrapper: references become their first type argument.
    Unwrap,
}

impl Marker {
    pub const ALL: [Marker; 3] = [Marker::Bake, Marker::Newtype, Marker::Unwrap];

    pub fn name(self) -> &'static str {
        match self {
            Marker::Bake => "bake",
            Marker::Newtype => "newtype",
            Marker::Unwrap => "unwrap",
        }
    }
}

/// The sentinel texts of one namespace: `//! <namespace>::<marker>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerSet {
    bake: String,
    newtype: String,
    unwrap: String,
}

impl MarkerSet {
    pub fn new(namespace: &str) -> Self {
        let sentinel = |marker: Marker| format!("//! {namespace}::{}", marker.name());
        Self {
            bake: sentinel(Marker::Bake),
            newtype: sentinel(Marker::Newtype),
            unwrap: sentinel(Marker::Unwrap),
        }
    }

    pub fn sentinel(&self, marker: Marker) -> &str {
        match marker {
            Marker::Bake => &self.bake,
            Marker::Newtype => &self.newtype,
            Marker::Unwrap => &self.unwrap,
        }
    }

    /// Whether `comments` carry the sentinel of `marker`.
    pub fn is_marked(&self, comments: &[String], marker: Marker) -> bool {
        has_marker(comments, self.sentinel(marker))
    }
}

impl Default for MarkerSet {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}

/// Exact membership of `sentinel` among `comments`, ignoring surrounding
/// whitespace.
pub fn has_marker(comments: &[String], sentinel: &str) -> bool {
    comments.iter().any(|comment| comment.trim() == sentinel)
}
