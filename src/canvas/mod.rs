//! Inkscape drawing (one SVG document) with field, group and metadata access
//!
//! [`Canvas`] owns the parsed [`XmlDocument`] and layers the fixed queries of
//! [`crate::query`] and the field resolution of [`crate::field`] on top of
//! it. Identifier lookups are memoized in an LRU cache that is dropped on
//! every structural change.

mod fields;
mod group;
mod lookup;
mod metadata;

pub use group::Group;
pub use lookup::{Leaves, Resolution};
pub use metadata::{CanvasInfo, ViewBox};

use crate::dom::{NodeId, ParseOptions, XmlDocument};
use crate::error::{FormError, Result};
use crate::query::{select, Axis, Selector};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// Built-in A4 template used by [`Canvas::blank`]
const BLANK_SVG: &str = include_str!("../../data/blank.svg");

/// Source label for documents that did not come from a named file
pub const MEMORY_SOURCE: &str = ":memory:";

const DEFAULT_CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(256) {
    Some(n) => n,
    None => NonZeroUsize::MIN,
};

pub struct Canvas {
    doc: XmlDocument,
    root: NodeId,
    source: String,
    /// identifier -> every element carrying it, in document order
    id_cache: Mutex<LruCache<String, Vec<NodeId>>>,
}

impl Canvas {
    /// Parse leniently, dropping blank text the way Inkscape tooling does
    pub fn parse(input: &[u8]) -> Result<Self> {
        Self::parse_with(input, &ParseOptions::default())
    }

    pub fn parse_with(input: &[u8], options: &ParseOptions) -> Result<Self> {
        let doc = XmlDocument::parse_with(input, options)?;
        Self::from_document(doc)
    }

    /// New drawing from the built-in A4 template (one layer, `layer1`)
    pub fn blank() -> Result<Self> {
        Self::parse(BLANK_SVG.as_bytes())
    }

    pub fn from_document(doc: XmlDocument) -> Result<Self> {
        let root = doc
            .root_element_id()
            .ok_or_else(|| FormError::InvalidInput("document has no root element".to_string()))?;
        Ok(Canvas {
            doc,
            root,
            source: MEMORY_SOURCE.to_string(),
            id_cache: Mutex::new(LruCache::new(DEFAULT_CACHE_CAPACITY)),
        })
    }

    /// Name the document (usually its path) in diagnostics and errors
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.set_source(source);
        self
    }

    pub fn set_source(&mut self, source: impl Into<String>) {
        self.source = source.into();
    }

    /// Resize the identifier cache; a capacity of 0 keeps a single entry
    pub fn with_cache_capacity(self, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Canvas {
            id_cache: Mutex::new(LruCache::new(capacity)),
            ..self
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn document(&self) -> &XmlDocument {
        &self.doc
    }

    pub fn into_document(self) -> XmlDocument {
        self.doc
    }

    /// The `<svg>` element
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn to_xml(&self) -> String {
        self.doc.to_xml()
    }

    /// Every element carrying `id`, in document order
    pub(crate) fn elements_with_id(&self, id: &str) -> Vec<NodeId> {
        let mut cache = self.id_cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(hit) = cache.get(id) {
            debug!(id, "id cache hit");
            return hit.clone();
        }
        debug!(id, "id cache miss");
        let found = select(&self.doc, self.root, Axis::Descendant, &Selector::any().with_id(id));
        cache.put(id.to_string(), found.clone());
        found
    }

    /// Drop memoized lookups after elements were added, moved or removed
    fn invalidate(&mut self) {
        self.id_cache.get_mut().unwrap_or_else(PoisonError::into_inner).clear();
    }

    /// Mutable document for text and attribute edits, which never change
    /// which elements carry which identifier
    fn doc_mut(&mut self) -> &mut XmlDocument {
        &mut self.doc
    }
}

impl Clone for Canvas {
    fn clone(&self) -> Self {
        let capacity = self.id_cache.lock().unwrap_or_else(PoisonError::into_inner).cap();
        Canvas {
            doc: self.doc.clone(),
            root: self.root,
            source: self.source.clone(),
            id_cache: Mutex::new(LruCache::new(capacity)),
        }
    }
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("source", &self.source)
            .field("nodes", &self.doc.node_count())
            .finish()
    }
}
