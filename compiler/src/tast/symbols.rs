//! Callable Symbols
//!
//! Functions and properties are referred to through small `Copy` handles
//! (`FunctionSymbol`, `PropertySymbol`) issued by the `SymbolTable`. A handle
//! carries its `SymbolId` and the origin it was created with; equality and
//! hashing only look at the id, so a handle behaves like a reference to the
//! declaration it was issued for.

use super::{IdGenerator, InternedString, StringInterner, SymbolId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// The kind of callable member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallableKind {
    /// Function or method
    Function,
    /// Property (with get/set)
    Property,
}

impl fmt::Display for CallableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CallableKind::Function => "function",
            CallableKind::Property => "property",
        };
        write!(f, "{}", name)
    }
}

/// Where a callable declaration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CallableOrigin {
    /// Declared in source
    #[default]
    Source,
    /// Loaded from a compiled library
    Library,
    /// Copy of an inherited member with supertype arguments substituted
    SubstitutionOverride,
    /// Synthetic merge of several inherited members that collapse into one
    IntersectionOverride,
    /// Generated by delegation to another member
    Delegated,
}

impl CallableOrigin {
    /// Synthetic origins never correspond to a declaration in source
    pub fn is_synthetic(self) -> bool {
        matches!(
            self,
            CallableOrigin::SubstitutionOverride
                | CallableOrigin::IntersectionOverride
                | CallableOrigin::Delegated
        )
    }
}

impl fmt::Display for CallableOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CallableOrigin::Source => "source",
            CallableOrigin::Library => "library",
            CallableOrigin::SubstitutionOverride => "substitution override",
            CallableOrigin::IntersectionOverride => "intersection override",
            CallableOrigin::Delegated => "delegated",
        };
        write!(f, "{}", name)
    }
}

/// Common interface of callable symbol handles
pub trait CallableSymbol: Copy + Eq + Hash + fmt::Debug + fmt::Display {
    /// Which kind of callable this handle type denotes
    const KIND: CallableKind;

    fn id(self) -> SymbolId;

    fn origin(self) -> CallableOrigin;

    /// True for the synthetic merge points of diamond inheritance
    fn is_intersection_override(self) -> bool {
        self.origin() == CallableOrigin::IntersectionOverride
    }
}

/// Macro to define callable handle types with id-based identity
macro_rules! define_callable_symbol {
    (
        $(#[$meta:meta])*
        $name:ident => $kind:expr
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name {
            id: SymbolId,
            origin: CallableOrigin,
        }

        impl $name {
            pub(crate) const fn new(id: SymbolId, origin: CallableOrigin) -> Self {
                Self { id, origin }
            }
        }

        impl CallableSymbol for $name {
            const KIND: CallableKind = $kind;

            fn id(self) -> SymbolId {
                self.id
            }

            fn origin(self) -> CallableOrigin {
                self.origin
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.id == other.id
            }
        }

        impl Eq for $name {}

        impl Hash for $name {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.id.hash(state);
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", stringify!($name), self.id.as_raw())
            }
        }
    };
}

define_callable_symbol! {
    /// Handle to a function-like declaration
    FunctionSymbol => CallableKind::Function
}

define_callable_symbol! {
    /// Handle to a property-like declaration
    PropertySymbol => CallableKind::Property
}

/// Metadata recorded for every callable symbol
#[derive(Debug, Clone)]
pub struct CallableInfo {
    pub id: SymbolId,
    /// Member name
    pub name: InternedString,
    pub kind: CallableKind,
    pub origin: CallableOrigin,
    /// Name of the class this member belongs to
    pub owner: InternedString,
}

impl CallableInfo {
    /// Get a human-readable description of this symbol
    pub fn description(&self, interner: &StringInterner) -> String {
        format!(
            "{} {}.{} ({})",
            self.kind,
            interner.resolve(self.owner),
            interner.resolve(self.name),
            self.origin
        )
    }
}

/// Storage for callable symbols, indexed by `SymbolId`
#[derive(Debug, Default)]
pub struct SymbolTable {
    callables: Vec<CallableInfo>,
    ids: IdGenerator<SymbolId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn add_callable(
        &mut self,
        name: InternedString,
        owner: InternedString,
        kind: CallableKind,
        origin: CallableOrigin,
    ) -> SymbolId {
        let id = self.ids.next_id();
        debug_assert_eq!(id.index(), self.callables.len());
        self.callables.push(CallableInfo {
            id,
            name,
            kind,
            origin,
            owner,
        });
        id
    }

    /// Create a function symbol owned by `owner`
    pub fn add_function(
        &mut self,
        name: InternedString,
        owner: InternedString,
        origin: CallableOrigin,
    ) -> FunctionSymbol {
        let id = self.add_callable(name, owner, CallableKind::Function, origin);
        FunctionSymbol::new(id, origin)
    }

    /// Create a property symbol owned by `owner`
    pub fn add_property(
        &mut self,
        name: InternedString,
        owner: InternedString,
        origin: CallableOrigin,
    ) -> PropertySymbol {
        let id = self.add_callable(name, owner, CallableKind::Property, origin);
        PropertySymbol::new(id, origin)
    }

    /// Get a symbol's metadata by its ID
    pub fn get(&self, id: SymbolId) -> Option<&CallableInfo> {
        if !id.is_valid() {
            return None;
        }
        self.callables.get(id.index())
    }

    /// Re-issue the function handle for an id
    pub fn function(&self, id: SymbolId) -> Option<FunctionSymbol> {
        self.get(id)
            .filter(|info| info.kind == CallableKind::Function)
            .map(|info| FunctionSymbol::new(info.id, info.origin))
    }

    /// Re-issue the property handle for an id
    pub fn property(&self, id: SymbolId) -> Option<PropertySymbol> {
        self.get(id)
            .filter(|info| info.kind == CallableKind::Property)
            .map(|info| PropertySymbol::new(info.id, info.origin))
    }

    pub fn len(&self) -> usize {
        self.callables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callables.is_empty()
    }

    /// Get all symbols (for iteration)
    pub fn iter(&self) -> impl Iterator<Item = &CallableInfo> {
        self.callables.iter()
    }
}
