//! Override-aware type scopes
//!
//! A `TypeScope` is the member set of a type as seen from a use site. Besides
//! enumerating names, it can report the *direct* overridden members of a
//! callable, each paired with the scope in which that overridden member
//! should be queried further (its base scope).
//!
//! Guarantees are intentionally weak:
//! - a symbol that did not originate from the queried scope instance may
//!   silently yield nothing
//! - the same overridden symbol may be reported more than once when it is
//!   reachable through an intersection override
//! - no traversal order is promised
//!
//! When the queried instance is the one the symbol came from, every member of
//! the overridden tree is reachable.

use super::{FunctionSymbol, InternedString, ProcessorAction, PropertySymbol};
use crate::tast::symbols::CallableSymbol;
use fxhash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

/// Callback receiving an overridden member together with its base scope
pub type BaseScopeProcessor<'a, S> = dyn FnMut(S, &dyn TypeScope) -> ProcessorAction + 'a;

/// Direct overridden members of each callable, as computed by a concrete scope
pub type DirectOverriddenMap<S> = FxHashMap<S, SmallVec<[S; 2]>>;

/// Scopes that can enumerate the names they contain
pub trait ContainingNamesAwareScope {
    /// Names of every function and property visible in this scope
    fn callable_names(&self) -> FxHashSet<InternedString>;

    /// Names of every classifier visible in this scope
    fn classifier_names(&self) -> FxHashSet<InternedString>;
}

/// Member scope of a type that knows its members' direct overrides
pub trait TypeScope: ContainingNamesAwareScope {
    fn process_direct_overridden_functions_with_base_scope(
        &self,
        function_symbol: FunctionSymbol,
        processor: &mut BaseScopeProcessor<'_, FunctionSymbol>,
    ) -> ProcessorAction;

    fn process_direct_overridden_properties_with_base_scope(
        &self,
        property_symbol: PropertySymbol,
        processor: &mut BaseScopeProcessor<'_, PropertySymbol>,
    ) -> ProcessorAction;
}

/// Selects the kind-specific direct override query of a `TypeScope`.
///
/// Lets the resolution algorithm and the transitive driver be written once
/// for both functions and properties.
pub trait OverridableCallable: CallableSymbol {
    fn process_direct_overridden_with_base_scope<T: TypeScope + ?Sized>(
        scope: &T,
        symbol: Self,
        processor: &mut BaseScopeProcessor<'_, Self>,
    ) -> ProcessorAction;
}

impl OverridableCallable for FunctionSymbol {
    fn process_direct_overridden_with_base_scope<T: TypeScope + ?Sized>(
        scope: &T,
        symbol: Self,
        processor: &mut BaseScopeProcessor<'_, Self>,
    ) -> ProcessorAction {
        scope.process_direct_overridden_functions_with_base_scope(symbol, processor)
    }
}

impl OverridableCallable for PropertySymbol {
    fn process_direct_overridden_with_base_scope<T: TypeScope + ?Sized>(
        scope: &T,
        symbol: Self,
        processor: &mut BaseScopeProcessor<'_, Self>,
    ) -> ProcessorAction {
        scope.process_direct_overridden_properties_with_base_scope(symbol, processor)
    }
}

/// Report the direct overrides of `callable_symbol` recorded in
/// `direct_overridden_map`, all paired with `base_scope`.
///
/// Without an entry (or with an empty one) the query is handed to
/// `base_scope` as a whole. Intersection overrides have their own direct
/// overrides reported before themselves, so the real declarations behind a
/// diamond merge are never hidden from the processor.
pub fn do_process_direct_overridden_callables<S: OverridableCallable>(
    callable_symbol: S,
    processor: &mut BaseScopeProcessor<'_, S>,
    direct_overridden_map: &DirectOverriddenMap<S>,
    base_scope: &dyn TypeScope,
) -> ProcessorAction {
    let direct_overridden = match direct_overridden_map.get(&callable_symbol) {
        Some(overridden) if !overridden.is_empty() => overridden,
        _ => return S::process_direct_overridden_with_base_scope(base_scope, callable_symbol, processor),
    };

    for &overridden in direct_overridden {
        if overridden.is_intersection_override()
            && S::process_direct_overridden_with_base_scope(base_scope, overridden, processor).is_stop()
        {
            return ProcessorAction::Stop;
        }
        if processor(overridden, base_scope).is_stop() {
            return ProcessorAction::Stop;
        }
    }

    ProcessorAction::Unhandled
}

/// Scope with no members and no overrides
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyTypeScope;

/// Shared instance of the empty scope
pub static EMPTY_TYPE_SCOPE: EmptyTypeScope = EmptyTypeScope;

impl ContainingNamesAwareScope for EmptyTypeScope {
    fn callable_names(&self) -> FxHashSet<InternedString> {
        FxHashSet::default()
    }

    fn classifier_names(&self) -> FxHashSet<InternedString> {
        FxHashSet::default()
    }
}

impl TypeScope for EmptyTypeScope {
    fn process_direct_overridden_functions_with_base_scope(
        &self,
        _function_symbol: FunctionSymbol,
        _processor: &mut BaseScopeProcessor<'_, FunctionSymbol>,
    ) -> ProcessorAction {
        ProcessorAction::Continue
    }

    fn process_direct_overridden_properties_with_base_scope(
        &self,
        _property_symbol: PropertySymbol,
        _processor: &mut BaseScopeProcessor<'_, PropertySymbol>,
    ) -> ProcessorAction {
        ProcessorAction::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tast::{CallableOrigin, StringInterner, SymbolTable};
    use smallvec::smallvec;

    struct Fixture {
        table: SymbolTable,
        interner: StringInterner,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                table: SymbolTable::new(),
                interner: StringInterner::new(),
            }
        }

        fn function(&mut self, name: &str, origin: CallableOrigin) -> FunctionSymbol {
            let owner = self.interner.intern("Owner");
            let name = self.interner.intern(name);
            self.table.add_function(name, owner, origin)
        }
    }

    /// Base scope recording every symbol it is asked about
    struct RecordingScope {
        answers: DirectOverriddenMap<FunctionSymbol>,
        asked: std::cell::RefCell<Vec<FunctionSymbol>>,
    }

    impl ContainingNamesAwareScope for RecordingScope {
        fn callable_names(&self) -> FxHashSet<InternedString> {
            FxHashSet::default()
        }

        fn classifier_names(&self) -> FxHashSet<InternedString> {
            FxHashSet::default()
        }
    }

    impl TypeScope for RecordingScope {
        fn process_direct_overridden_functions_with_base_scope(
            &self,
            function_symbol: FunctionSymbol,
            processor: &mut BaseScopeProcessor<'_, FunctionSymbol>,
        ) -> ProcessorAction {
            self.asked.borrow_mut().push(function_symbol);
            for &overridden in self.answers.get(&function_symbol).into_iter().flatten() {
                if processor(overridden, &EMPTY_TYPE_SCOPE).is_stop() {
                    return ProcessorAction::Stop;
                }
            }
            ProcessorAction::Continue
        }

        fn process_direct_overridden_properties_with_base_scope(
            &self,
            _property_symbol: PropertySymbol,
            _processor: &mut BaseScopeProcessor<'_, PropertySymbol>,
        ) -> ProcessorAction {
            ProcessorAction::Continue
        }
    }

    #[test]
    fn test_empty_scope_never_calls_processor() {
        let mut fixture = Fixture::new();
        let f = fixture.function("f", CallableOrigin::Source);
        let mut calls = 0;

        let action = EMPTY_TYPE_SCOPE
            .process_direct_overridden_functions_with_base_scope(f, &mut |_, _| {
                calls += 1;
                ProcessorAction::Stop
            });

        assert_eq!(action, ProcessorAction::Continue);
        assert_eq!(calls, 0);
        assert!(EMPTY_TYPE_SCOPE.callable_names().is_empty());
        assert!(EMPTY_TYPE_SCOPE.classifier_names().is_empty());
    }

    #[test]
    fn test_missing_and_empty_entries_delegate_to_base() {
        let mut fixture = Fixture::new();
        let f = fixture.function("f", CallableOrigin::Source);
        let h = fixture.function("h", CallableOrigin::Source);
        let x = fixture.function("x", CallableOrigin::Source);

        let base = RecordingScope {
            answers: [(f, smallvec![x]), (h, smallvec![x])].into_iter().collect(),
            asked: Default::default(),
        };
        let map: DirectOverriddenMap<FunctionSymbol> = [(h, smallvec![])].into_iter().collect();

        let mut seen = Vec::new();
        let action = do_process_direct_overridden_callables(
            f,
            &mut |overridden, _| {
                seen.push(overridden);
                ProcessorAction::Continue
            },
            &map,
            &base,
        );
        assert_eq!(action, ProcessorAction::Continue, "result comes from the base scope");

        do_process_direct_overridden_callables(
            h,
            &mut |overridden, _| {
                seen.push(overridden);
                ProcessorAction::Continue
            },
            &map,
            &base,
        );

        assert_eq!(seen, vec![x, x]);
        assert_eq!(*base.asked.borrow(), vec![f, h]);
    }

    #[test]
    fn test_recorded_entries_are_reported_with_base_scope() {
        let mut fixture = Fixture::new();
        let f = fixture.function("f", CallableOrigin::Source);
        let g = fixture.function("g", CallableOrigin::Source);
        let h = fixture.function("h", CallableOrigin::Source);

        let base = RecordingScope {
            answers: DirectOverriddenMap::default(),
            asked: Default::default(),
        };
        let map: DirectOverriddenMap<FunctionSymbol> = [(f, smallvec![g, h])].into_iter().collect();

        let mut seen = Vec::new();
        let action = do_process_direct_overridden_callables(
            f,
            &mut |overridden, _| {
                seen.push(overridden);
                ProcessorAction::Continue
            },
            &map,
            &base,
        );

        assert_eq!(action, ProcessorAction::Unhandled);
        assert_eq!(seen, vec![g, h]);
        assert!(base.asked.borrow().is_empty(), "plain members are not expanded here");
    }

    #[test]
    fn test_intersection_members_are_expanded_first() {
        let mut fixture = Fixture::new();
        let f = fixture.function("f", CallableOrigin::Source);
        let merged = fixture.function("g", CallableOrigin::IntersectionOverride);
        let j = fixture.function("j", CallableOrigin::Source);
        let k = fixture.function("k", CallableOrigin::Source);

        let base = RecordingScope {
            answers: [(merged, smallvec![j, k])].into_iter().collect(),
            asked: Default::default(),
        };
        let map: DirectOverriddenMap<FunctionSymbol> = [(f, smallvec![merged])].into_iter().collect();

        let mut seen = Vec::new();
        do_process_direct_overridden_callables(
            f,
            &mut |overridden, _| {
                seen.push(overridden);
                ProcessorAction::Continue
            },
            &map,
            &base,
        );

        assert_eq!(seen, vec![j, k, merged]);
    }

    #[test]
    fn test_stop_inside_intersection_expansion() {
        let mut fixture = Fixture::new();
        let f = fixture.function("f", CallableOrigin::Source);
        let merged = fixture.function("g", CallableOrigin::IntersectionOverride);
        let j = fixture.function("j", CallableOrigin::Source);
        let h = fixture.function("h", CallableOrigin::Source);

        let base = RecordingScope {
            answers: [(merged, smallvec![j])].into_iter().collect(),
            asked: Default::default(),
        };
        let map: DirectOverriddenMap<FunctionSymbol> =
            [(f, smallvec![merged, h])].into_iter().collect();

        let mut seen = Vec::new();
        let action = do_process_direct_overridden_callables(
            f,
            &mut |overridden, _| {
                seen.push(overridden);
                ProcessorAction::Stop
            },
            &map,
            &base,
        );

        assert_eq!(action, ProcessorAction::Stop);
        assert_eq!(seen, vec![j]);
    }
}
