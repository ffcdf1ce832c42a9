//! Field resolution over a document tree
//!
//! - presence: does an element "have text" under a whitespace policy
//! - leaf: deepest matching element below a container, preferring populated ones
//! - candidates: narrowing same-identifier duplicates down to one element
//!
//! Everything here is generic over [`DocumentAccess`](crate::dom::DocumentAccess)
//! and holds no state between calls.

pub mod candidates;
pub mod leaf;
pub mod presence;

pub use candidates::{pick_one, reduce_candidates, write_candidates, Pick, PickOutcome};
pub use leaf::resolve_leaf;
pub use presence::has_text;

/// Whitespace policy shared by every field operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PresencePolicy {
    /// Only accept elements that carry text
    pub skip_empty: bool,
    /// Whitespace-only text counts as text
    pub spacing: bool,
}

impl PresencePolicy {
    pub const fn new(skip_empty: bool, spacing: bool) -> Self {
        PresencePolicy { skip_empty, spacing }
    }

    /// Populated elements only, whitespace counting as content
    pub const fn populated() -> Self {
        PresencePolicy::new(true, true)
    }
}

/// Strip a `{uri}` or `prefix:` qualifier from a tag
pub fn local_name(tag: &str) -> &str {
    if let Some(rest) = tag.strip_prefix('{') {
        if let Some((_, local)) = rest.split_once('}') {
            return local;
        }
    }
    tag.rsplit(':').next().unwrap_or(tag)
}

/// Compare two tags by local name, ignoring case
pub fn tag_matches(tag: &str, wanted: &str) -> bool {
    let (tag, wanted) = (local_name(tag), local_name(wanted));
    tag.chars()
        .flat_map(char::to_lowercase)
        .eq(wanted.chars().flat_map(char::to_lowercase))
}
