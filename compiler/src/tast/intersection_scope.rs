//! Scope over the intersection of several supertypes
//!
//! When a class has more than one supertype, the members it inherits are seen
//! through this scope. Members that several supertypes contribute under one
//! signature collapse into an intersection override symbol owned here; each
//! merged member is paired with the scope of the supertype it came from.

use super::type_scope::{BaseScopeProcessor, ContainingNamesAwareScope, OverridableCallable, TypeScope};
use super::{FunctionSymbol, InternedString, ProcessorAction, PropertySymbol, ScopeId};
use crate::tast::symbols::CallableSymbol;
use fxhash::{FxHashMap, FxHashSet};
use log::{debug, warn};
use std::rc::Rc;

/// An overridden member paired with the scope it should be queried in
#[derive(Clone)]
pub struct MemberWithBaseScope<S> {
    pub member: S,
    pub base_scope: Rc<dyn TypeScope>,
}

impl<S> MemberWithBaseScope<S> {
    pub fn new(member: S, base_scope: Rc<dyn TypeScope>) -> Self {
        Self { member, base_scope }
    }
}

/// Supertype scopes seen as one
pub struct IntersectionTypeScope {
    id: ScopeId,
    scopes: Vec<Rc<dyn TypeScope>>,
    intersection_functions: FxHashMap<FunctionSymbol, Vec<MemberWithBaseScope<FunctionSymbol>>>,
    intersection_properties: FxHashMap<PropertySymbol, Vec<MemberWithBaseScope<PropertySymbol>>>,
}

impl IntersectionTypeScope {
    pub fn new(id: ScopeId, scopes: Vec<Rc<dyn TypeScope>>) -> Self {
        debug!("intersection scope {} over {} supertype scopes", id, scopes.len());
        Self {
            id,
            scopes,
            intersection_functions: FxHashMap::default(),
            intersection_properties: FxHashMap::default(),
        }
    }

    pub fn id(&self) -> ScopeId {
        self.id
    }

    /// Supertype scopes, in declaration order
    pub fn scopes(&self) -> &[Rc<dyn TypeScope>] {
        &self.scopes
    }

    /// Register `symbol` as the merge of `members`.
    ///
    /// `symbol` is expected to carry the intersection override origin; other
    /// symbols are still accepted but logged, since the driver will not
    /// expand them eagerly.
    pub fn add_intersection_function(
        &mut self,
        symbol: FunctionSymbol,
        members: Vec<MemberWithBaseScope<FunctionSymbol>>,
    ) {
        if !symbol.is_intersection_override() {
            warn!("{} registered as intersection without intersection origin", symbol);
        }
        self.intersection_functions.insert(symbol, members);
    }

    /// Register `symbol` as the merge of `members`.
    pub fn add_intersection_property(
        &mut self,
        symbol: PropertySymbol,
        members: Vec<MemberWithBaseScope<PropertySymbol>>,
    ) {
        if !symbol.is_intersection_override() {
            warn!("{} registered as intersection without intersection origin", symbol);
        }
        self.intersection_properties.insert(symbol, members);
    }

    /// Intersection functions owned by this scope
    pub fn intersection_functions(&self) -> impl Iterator<Item = FunctionSymbol> + '_ {
        self.intersection_functions.keys().copied()
    }

    /// Intersection properties owned by this scope
    pub fn intersection_properties(&self) -> impl Iterator<Item = PropertySymbol> + '_ {
        self.intersection_properties.keys().copied()
    }

    fn process_direct_overridden_members_with_base_scope<S: OverridableCallable>(
        &self,
        member: S,
        processor: &mut BaseScopeProcessor<'_, S>,
        intersections: &FxHashMap<S, Vec<MemberWithBaseScope<S>>>,
    ) -> ProcessorAction {
        if let Some(merged) = intersections.get(&member) {
            for overridden in merged {
                if processor(overridden.member, &*overridden.base_scope).is_stop() {
                    return ProcessorAction::Stop;
                }
            }
            return ProcessorAction::Unhandled;
        }

        // Not ours: the member came from one of the supertypes
        let mut result = ProcessorAction::Unhandled;
        for scope in &self.scopes {
            let action = S::process_direct_overridden_with_base_scope(&**scope, member, processor);
            if action.is_stop() {
                return ProcessorAction::Stop;
            }
            result = result.merge(action);
        }
        result
    }
}

impl std::fmt::Debug for IntersectionTypeScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntersectionTypeScope")
            .field("id", &self.id)
            .field("scopes", &self.scopes.len())
            .field("intersection_functions", &self.intersection_functions.len())
            .field("intersection_properties", &self.intersection_properties.len())
            .finish()
    }
}

impl ContainingNamesAwareScope for IntersectionTypeScope {
    fn callable_names(&self) -> FxHashSet<InternedString> {
        self.scopes.iter().flat_map(|scope| scope.callable_names()).collect()
    }

    fn classifier_names(&self) -> FxHashSet<InternedString> {
        self.scopes.iter().flat_map(|scope| scope.classifier_names()).collect()
    }
}

impl TypeScope for IntersectionTypeScope {
    fn process_direct_overridden_functions_with_base_scope(
        &self,
        function_symbol: FunctionSymbol,
        processor: &mut BaseScopeProcessor<'_, FunctionSymbol>,
    ) -> ProcessorAction {
        self.process_direct_overridden_members_with_base_scope(
            function_symbol,
            processor,
            &self.intersection_functions,
        )
    }

    fn process_direct_overridden_properties_with_base_scope(
        &self,
        property_symbol: PropertySymbol,
        processor: &mut BaseScopeProcessor<'_, PropertySymbol>,
    ) -> ProcessorAction {
        self.process_direct_overridden_members_with_base_scope(
            property_symbol,
            processor,
            &self.intersection_properties,
        )
    }
}
