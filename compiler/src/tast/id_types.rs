//! Core ID Types for the scope layer
//!
//! Lightweight `u32` wrappers that give symbols and scopes a stable identity.
//! Callable symbols compare and hash through their `SymbolId`, so two handles
//! denote the same declaration exactly when their ids match.

use std::fmt;

/// Macro to define ID types with consistent behavior
macro_rules! define_id_type {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub(crate) u32);

        impl $name {
            /// Create a new ID from a raw u32 value
            pub const fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            /// Get the raw u32 value of this ID
            pub const fn as_raw(self) -> u32 {
                self.0
            }

            /// Check if this ID is valid (not the sentinel value)
            pub const fn is_valid(self) -> bool {
                self.0 != u32::MAX
            }

            /// Get an invalid/null sentinel value
            pub const fn invalid() -> Self {
                Self(u32::MAX)
            }

            /// Create the first valid ID
            pub const fn first() -> Self {
                Self(0)
            }

            /// Get the next ID in sequence
            pub const fn next(self) -> Self {
                Self(self.0.wrapping_add(1))
            }

            pub(crate) fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::invalid()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}({})", stringify!($name), self.0)
                } else {
                    write!(f, "{}(<invalid>)", stringify!($name))
                }
            }
        }

        impl From<u32> for $name {
            fn from(raw: u32) -> Self {
                Self::from_raw(raw)
            }
        }

        impl From<$name> for u32 {
            fn from(id: $name) -> u32 {
                id.as_raw()
            }
        }
    };
}

define_id_type! {
    /// Unique identifier for callable symbols (functions and properties)
    ///
    /// Issued by the `SymbolTable`; the identity every override traversal
    /// deduplicates on.
    SymbolId
}

define_id_type! {
    /// Unique identifier for type scopes
    ///
    /// Only used for logging and debugging; scopes are shared by `Rc`, not
    /// looked up by id.
    ScopeId
}

/// Sequential generator for ids of one kind.
#[derive(Debug)]
pub struct IdGenerator<T> {
    next: u32,
    make: fn(u32) -> T,
}

impl<T> IdGenerator<T> {
    pub const fn new(make: fn(u32) -> T) -> Self {
        Self { next: 0, make }
    }

    /// Hand out the next id. Never returns the invalid sentinel.
    pub fn next_id(&mut self) -> T {
        debug_assert!(self.next != u32::MAX, "id space exhausted");
        let id = (self.make)(self.next);
        self.next += 1;
        id
    }

    /// Number of ids handed out so far
    pub fn issued(&self) -> usize {
        self.next as usize
    }
}

impl Default for IdGenerator<ScopeId> {
    fn default() -> Self {
        Self::new(ScopeId::from_raw)
    }
}

impl Default for IdGenerator<SymbolId> {
    fn default() -> Self {
        Self::new(SymbolId::from_raw)
    }
}
