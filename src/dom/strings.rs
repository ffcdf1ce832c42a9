//! String Interning Pool
//!
//! Storage with deduplication for element names, attribute names and values,
//! namespace URIs and text content. Every string is copied into one buffer so
//! a parsed document owns its data and can be cloned or edited freely.
//!
//! Uses hash-based lookup to avoid storing duplicate string data.

use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};

/// String interning pool
///
/// Memory layout:
/// - `entries`: (offset, len) into `data` for each interned string ID
/// - `data`: one contiguous byte buffer
/// - `hash_index`: hash -> list of IDs (handles rare collisions)
///
/// ID 0 is reserved for the empty string.
#[derive(Debug, Clone)]
pub struct StringPool {
    entries: Vec<(u32, u32)>,
    data: Vec<u8>,
    hash_index: HashMap<u64, Vec<u32>>,
}

impl Default for StringPool {
    fn default() -> Self {
        Self::new()
    }
}

impl StringPool {
    pub fn new() -> Self {
        let mut pool = StringPool {
            entries: Vec::with_capacity(256),
            data: Vec::with_capacity(4096),
            hash_index: HashMap::new(),
        };
        pool.entries.push((0, 0));
        pool
    }

    #[inline]
    fn compute_hash(s: &[u8]) -> u64 {
        let mut hasher = DefaultHasher::new();
        s.hash(&mut hasher);
        hasher.finish()
    }

    /// Intern a string, returning the ID of an identical existing entry if any
    pub fn intern(&mut self, s: &[u8]) -> u32 {
        if s.is_empty() {
            return 0;
        }

        let hash = Self::compute_hash(s);
        if let Some(ids) = self.hash_index.get(&hash) {
            for &id in ids {
                if self.get(id) == Some(s) {
                    return id;
                }
            }
        }

        let offset = self.data.len() as u32;
        self.data.extend_from_slice(s);

        let id = self.entries.len() as u32;
        self.entries.push((offset, s.len() as u32));
        self.hash_index.entry(hash).or_default().push(id);
        id
    }

    #[inline]
    pub fn intern_str(&mut self, s: &str) -> u32 {
        self.intern(s.as_bytes())
    }

    /// Look up an already interned string without inserting it
    pub fn find(&self, s: &[u8]) -> Option<u32> {
        if s.is_empty() {
            return Some(0);
        }
        self.hash_index
            .get(&Self::compute_hash(s))?
            .iter()
            .copied()
            .find(|&id| self.get(id) == Some(s))
    }

    pub fn get(&self, id: u32) -> Option<&[u8]> {
        let &(offset, len) = self.entries.get(id as usize)?;
        let start = offset as usize;
        self.data.get(start..start + len as usize)
    }

    /// Get a string by ID as &str (None for invalid UTF-8)
    pub fn get_str(&self, id: u32) -> Option<&str> {
        self.get(id).and_then(|b| std::str::from_utf8(b).ok())
    }

    /// Number of interned strings (including the reserved empty entry)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_dedup() {
        let mut pool = StringPool::new();
        let a = pool.intern(b"tspan");
        let b = pool.intern(b"text");
        let c = pool.intern(b"tspan");
        assert_eq!(a, c);
        assert_ne!(a, b);
        assert_eq!(pool.get_str(a), Some("tspan"));
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn test_empty_is_zero() {
        let mut pool = StringPool::new();
        assert_eq!(pool.intern(b""), 0);
        assert_eq!(pool.get(0), Some(b"" as &[u8]));
        assert!(pool.is_empty());
    }

    #[test]
    fn test_find_does_not_insert() {
        let mut pool = StringPool::new();
        let id = pool.intern_str("inkscape:label");
        assert_eq!(pool.find(b"inkscape:label"), Some(id));
        assert_eq!(pool.find(b"sodipodi:docname"), None);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_long_strings() {
        let mut pool = StringPool::new();
        let long = vec![b'x'; 70_000];
        let id = pool.intern(&long);
        assert_eq!(pool.get(id).map(<[u8]>::len), Some(70_000));
    }
}
