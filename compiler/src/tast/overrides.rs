//! Walks over the overridden-member tree of a callable
//!
//! `TypeScopeExt` is implemented for every `TypeScope` (including
//! `dyn TypeScope`) and provides the transitive walk plus direct-only
//! wrappers that drop the base scope.

use super::type_scope::{OverridableCallable, TypeScope};
use super::{FunctionSymbol, ProcessorAction, PropertySymbol};
use fxhash::FxHashSet;
use indexmap::IndexSet;
use log::trace;

/// Override queries layered on top of the direct `TypeScope` operations
pub trait TypeScopeExt: TypeScope {
    /// Visit every function `function_symbol` overrides, directly or not.
    ///
    /// Returns `Stop` when the processor stopped the walk.
    fn process_overridden_functions<P>(
        &self,
        function_symbol: FunctionSymbol,
        mut processor: P,
    ) -> ProcessorAction
    where
        P: FnMut(FunctionSymbol) -> ProcessorAction,
    {
        let mut visited = FxHashSet::default();
        do_process_all_overridden_callables(self, function_symbol, &mut processor, &mut visited)
    }

    /// Visit every property `property_symbol` overrides, directly or not.
    fn process_overridden_properties<P>(
        &self,
        property_symbol: PropertySymbol,
        mut processor: P,
    ) -> ProcessorAction
    where
        P: FnMut(PropertySymbol) -> ProcessorAction,
    {
        let mut visited = FxHashSet::default();
        do_process_all_overridden_callables(self, property_symbol, &mut processor, &mut visited)
    }

    /// Visit only the functions `function_symbol` overrides directly
    fn process_directly_overridden_functions<P>(
        &self,
        function_symbol: FunctionSymbol,
        mut processor: P,
    ) -> ProcessorAction
    where
        P: FnMut(FunctionSymbol) -> ProcessorAction,
    {
        self.process_direct_overridden_functions_with_base_scope(function_symbol, &mut |overridden, _| {
            processor(overridden)
        })
    }

    /// Visit only the properties `property_symbol` overrides directly
    fn process_directly_overridden_properties<P>(
        &self,
        property_symbol: PropertySymbol,
        mut processor: P,
    ) -> ProcessorAction
    where
        P: FnMut(PropertySymbol) -> ProcessorAction,
    {
        self.process_direct_overridden_properties_with_base_scope(property_symbol, &mut |overridden, _| {
            processor(overridden)
        })
    }

    /// All overridden functions, in first-report order and without repeats
    fn overridden_functions(&self, function_symbol: FunctionSymbol) -> Vec<FunctionSymbol> {
        let mut result = IndexSet::new();
        self.process_overridden_functions(function_symbol, |overridden| {
            result.insert(overridden);
            ProcessorAction::Continue
        });
        result.into_iter().collect()
    }

    /// All overridden properties, in first-report order and without repeats
    fn overridden_properties(&self, property_symbol: PropertySymbol) -> Vec<PropertySymbol> {
        let mut result = IndexSet::new();
        self.process_overridden_properties(property_symbol, |overridden| {
            result.insert(overridden);
            ProcessorAction::Continue
        });
        result.into_iter().collect()
    }

    fn directly_overridden_functions(&self, function_symbol: FunctionSymbol) -> Vec<FunctionSymbol> {
        let mut result = Vec::new();
        self.process_directly_overridden_functions(function_symbol, |overridden| {
            result.push(overridden);
            ProcessorAction::Continue
        });
        result
    }

    fn directly_overridden_properties(&self, property_symbol: PropertySymbol) -> Vec<PropertySymbol> {
        let mut result = Vec::new();
        self.process_directly_overridden_properties(property_symbol, |overridden| {
            result.push(overridden);
            ProcessorAction::Continue
        });
        result
    }
}

impl<T: TypeScope + ?Sized> TypeScopeExt for T {}

/// Transitive walk shared by functions and properties.
///
/// `callable_symbol` is marked visited before its direct overrides are
/// expanded, so cycles in the override graph terminate. Visited members are
/// still reported when reached again; they are only not expanded twice.
fn do_process_all_overridden_callables<S, P, T>(
    scope: &T,
    callable_symbol: S,
    processor: &mut P,
    visited: &mut FxHashSet<S>,
) -> ProcessorAction
where
    S: OverridableCallable,
    P: FnMut(S) -> ProcessorAction,
    T: TypeScope + ?Sized,
{
    if !visited.insert(callable_symbol) {
        return ProcessorAction::Unhandled;
    }

    S::process_direct_overridden_with_base_scope(
        scope,
        callable_symbol,
        &mut |overridden: S, base_scope: &dyn TypeScope| {
            trace!("{} overrides {}", callable_symbol, overridden);
            if processor(overridden).is_stop() {
                return ProcessorAction::Stop;
            }

            do_process_all_overridden_callables(base_scope, overridden, &mut *processor, &mut *visited)
        },
    )
}
