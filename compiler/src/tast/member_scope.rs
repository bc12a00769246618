//! Use-site member scope of a single class
//!
//! Holds what the class declares itself plus the direct-override maps for its
//! members. Everything inherited is answered by the base scope, which is the
//! scope of the class's supertypes (or the empty scope for a root class).

use super::type_scope::{
    do_process_direct_overridden_callables, BaseScopeProcessor, ContainingNamesAwareScope,
    DirectOverriddenMap, EmptyTypeScope, TypeScope,
};
use super::{FunctionSymbol, InternedString, ProcessorAction, PropertySymbol, ScopeId};
use fxhash::FxHashSet;
use indexmap::IndexMap;
use log::debug;
use smallvec::SmallVec;
use std::rc::Rc;

/// Members declared by one class, with their direct overrides
pub struct ClassMemberScope {
    id: ScopeId,
    /// Name of the class this scope belongs to
    owner: InternedString,
    functions: IndexMap<InternedString, SmallVec<[FunctionSymbol; 1]>>,
    properties: IndexMap<InternedString, SmallVec<[PropertySymbol; 1]>>,
    classifiers: FxHashSet<InternedString>,
    direct_overridden_functions: DirectOverriddenMap<FunctionSymbol>,
    direct_overridden_properties: DirectOverriddenMap<PropertySymbol>,
    /// Scope of the supertypes
    base_scope: Rc<dyn TypeScope>,
}

impl ClassMemberScope {
    pub fn builder(id: ScopeId, owner: InternedString) -> ClassMemberScopeBuilder {
        ClassMemberScopeBuilder::new(id, owner)
    }

    pub fn id(&self) -> ScopeId {
        self.id
    }

    pub fn owner(&self) -> InternedString {
        self.owner
    }

    pub fn base_scope(&self) -> &Rc<dyn TypeScope> {
        &self.base_scope
    }

    /// Functions declared in this class under `name`
    pub fn declared_functions(&self, name: InternedString) -> &[FunctionSymbol] {
        self.functions.get(&name).map(|f| f.as_slice()).unwrap_or(&[])
    }

    /// Properties declared in this class under `name`
    pub fn declared_properties(&self, name: InternedString) -> &[PropertySymbol] {
        self.properties.get(&name).map(|p| p.as_slice()).unwrap_or(&[])
    }

    /// Every function declared in this class, in declaration order
    pub fn all_declared_functions(&self) -> impl Iterator<Item = FunctionSymbol> + '_ {
        self.functions.values().flatten().copied()
    }

    /// Every property declared in this class, in declaration order
    pub fn all_declared_properties(&self) -> impl Iterator<Item = PropertySymbol> + '_ {
        self.properties.values().flatten().copied()
    }
}

impl std::fmt::Debug for ClassMemberScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassMemberScope")
            .field("id", &self.id)
            .field("owner", &self.owner)
            .field("functions", &self.functions.len())
            .field("properties", &self.properties.len())
            .finish()
    }
}

impl ContainingNamesAwareScope for ClassMemberScope {
    fn callable_names(&self) -> FxHashSet<InternedString> {
        let mut names = self.base_scope.callable_names();
        names.extend(self.functions.keys().copied());
        names.extend(self.properties.keys().copied());
        names
    }

    fn classifier_names(&self) -> FxHashSet<InternedString> {
        let mut names = self.base_scope.classifier_names();
        names.extend(self.classifiers.iter().copied());
        names
    }
}

impl TypeScope for ClassMemberScope {
    fn process_direct_overridden_functions_with_base_scope(
        &self,
        function_symbol: FunctionSymbol,
        processor: &mut BaseScopeProcessor<'_, FunctionSymbol>,
    ) -> ProcessorAction {
        do_process_direct_overridden_callables(
            function_symbol,
            processor,
            &self.direct_overridden_functions,
            &*self.base_scope,
        )
    }

    fn process_direct_overridden_properties_with_base_scope(
        &self,
        property_symbol: PropertySymbol,
        processor: &mut BaseScopeProcessor<'_, PropertySymbol>,
    ) -> ProcessorAction {
        do_process_direct_overridden_callables(
            property_symbol,
            processor,
            &self.direct_overridden_properties,
            &*self.base_scope,
        )
    }
}

/// Incremental construction of a `ClassMemberScope`
pub struct ClassMemberScopeBuilder {
    scope: ClassMemberScope,
}

impl ClassMemberScopeBuilder {
    pub fn new(id: ScopeId, owner: InternedString) -> Self {
        Self {
            scope: ClassMemberScope {
                id,
                owner,
                functions: IndexMap::new(),
                properties: IndexMap::new(),
                classifiers: FxHashSet::default(),
                direct_overridden_functions: DirectOverriddenMap::default(),
                direct_overridden_properties: DirectOverriddenMap::default(),
                base_scope: Rc::new(EmptyTypeScope),
            },
        }
    }

    /// Scope of the supertypes. Defaults to the empty scope.
    pub fn base_scope(mut self, base_scope: Rc<dyn TypeScope>) -> Self {
        self.scope.base_scope = base_scope;
        self
    }

    pub fn declare_function(&mut self, name: InternedString, symbol: FunctionSymbol) -> &mut Self {
        self.scope.functions.entry(name).or_default().push(symbol);
        self
    }

    pub fn declare_property(&mut self, name: InternedString, symbol: PropertySymbol) -> &mut Self {
        self.scope.properties.entry(name).or_default().push(symbol);
        self
    }

    pub fn declare_classifier(&mut self, name: InternedString) -> &mut Self {
        self.scope.classifiers.insert(name);
        self
    }

    /// Record that `symbol` directly overrides each of `overridden`
    pub fn function_overrides(
        &mut self,
        symbol: FunctionSymbol,
        overridden: impl IntoIterator<Item = FunctionSymbol>,
    ) -> &mut Self {
        self.scope
            .direct_overridden_functions
            .entry(symbol)
            .or_default()
            .extend(overridden);
        self
    }

    /// Record that `symbol` directly overrides each of `overridden`
    pub fn property_overrides(
        &mut self,
        symbol: PropertySymbol,
        overridden: impl IntoIterator<Item = PropertySymbol>,
    ) -> &mut Self {
        self.scope
            .direct_overridden_properties
            .entry(symbol)
            .or_default()
            .extend(overridden);
        self
    }

    pub fn build(self) -> ClassMemberScope {
        debug!(
            "built member scope {} with {} function and {} property override entries",
            self.scope.id,
            self.scope.direct_overridden_functions.len(),
            self.scope.direct_overridden_properties.len()
        );
        self.scope
    }
}
