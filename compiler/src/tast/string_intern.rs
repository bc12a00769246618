//! String interning for member and classifier names
//!
//! Names enumerated by scopes are `InternedString`s: O(1) comparison and
//! hashing, with the interner holding the only copy of each string.

use fxhash::FxHashMap;
use std::fmt;

/// An interned string represented as a unique ID
///
/// Two InternedString values are equal if and only if they represent
/// the same string content within one interner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InternedString(u32);

impl InternedString {
    /// Get the raw ID of this interned string
    pub const fn as_raw(self) -> u32 {
        self.0
    }

    /// Check if this is a valid (non-null) interned string
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

impl Default for InternedString {
    fn default() -> Self {
        // Use max value as "null" sentinel
        Self(u32::MAX)
    }
}

/// Deduplicating string interner
#[derive(Default)]
pub struct StringInterner {
    /// Map from string content to interned ID
    intern_map: FxHashMap<Box<str>, InternedString>,
    /// Reverse map from ID to string
    strings: Vec<Box<str>>,
}

impl StringInterner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            intern_map: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            strings: Vec::with_capacity(capacity),
        }
    }

    /// Intern a string, returning its unique ID
    ///
    /// If the string has been interned before, returns the existing ID.
    pub fn intern(&mut self, s: &str) -> InternedString {
        if let Some(&existing) = self.intern_map.get(s) {
            return existing;
        }

        let id = InternedString(self.strings.len() as u32);
        self.strings.push(s.into());
        self.intern_map.insert(s.into(), id);
        id
    }

    /// Get the string content for an interned string ID
    pub fn get(&self, id: InternedString) -> Option<&str> {
        if !id.is_valid() {
            return None;
        }
        self.strings.get(id.0 as usize).map(|s| &**s)
    }

    /// Resolve a name for display, falling back to a placeholder
    pub fn resolve(&self, id: InternedString) -> &str {
        self.get(id).unwrap_or("<unknown>")
    }

    /// Get the ID of an already-interned string without interning it
    pub fn get_id(&self, s: &str) -> Option<InternedString> {
        self.intern_map.get(s).copied()
    }

    pub fn contains(&self, s: &str) -> bool {
        self.intern_map.contains_key(s)
    }

    /// Number of unique strings interned
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl fmt::Debug for StringInterner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringInterner")
            .field("unique_strings", &self.strings.len())
            .finish()
    }
}
