#[cfg(test)]
mod override_traversal_tests {
    use crate::tast::*;
    use std::rc::Rc;

    /// Derived declares `f` overriding `g` and `h`; Base declares `g`
    /// overriding `i`, and `h` with an empty override list.
    struct Hierarchy {
        table: SymbolTable,
        interner: StringInterner,
        derived: ClassMemberScope,
        base: Rc<ClassMemberScope>,
        f: FunctionSymbol,
        g: FunctionSymbol,
        h: FunctionSymbol,
        i: FunctionSymbol,
    }

    fn function(
        table: &mut SymbolTable,
        interner: &mut StringInterner,
        owner: &str,
        name: &str,
        origin: CallableOrigin,
    ) -> FunctionSymbol {
        let owner = interner.intern(owner);
        let name = interner.intern(name);
        table.add_function(name, owner, origin)
    }

    fn hierarchy() -> Hierarchy {
        let mut table = SymbolTable::new();
        let mut interner = StringInterner::new();

        let f = function(&mut table, &mut interner, "Derived", "f", CallableOrigin::Source);
        let g = function(&mut table, &mut interner, "Base", "g", CallableOrigin::Source);
        let h = function(&mut table, &mut interner, "Base", "h", CallableOrigin::Source);
        let i = function(&mut table, &mut interner, "Root", "i", CallableOrigin::Library);

        let base_name = interner.intern("Base");
        let mut base = ClassMemberScope::builder(ScopeId::from_raw(0), base_name);
        base.function_overrides(g, [i])
            .function_overrides(h, Vec::<FunctionSymbol>::new());
        let base = Rc::new(base.build());

        let derived_name = interner.intern("Derived");
        let mut derived = ClassMemberScope::builder(ScopeId::from_raw(1), derived_name)
            .base_scope(base.clone());
        derived.function_overrides(f, [g, h]);
        let derived = derived.build();

        Hierarchy {
            table,
            interner,
            derived,
            base,
            f,
            g,
            h,
            i,
        }
    }

    fn collect_all(scope: &dyn TypeScope, symbol: FunctionSymbol) -> Vec<FunctionSymbol> {
        let mut seen = Vec::new();
        scope.process_overridden_functions(symbol, |overridden| {
            seen.push(overridden);
            ProcessorAction::Continue
        });
        seen
    }

    #[test]
    fn test_walk_from_originating_scope_is_complete() {
        crate::logging::init_test();
        let h = hierarchy();

        let mut seen = collect_all(&h.derived, h.f);
        seen.sort_by_key(|s| s.id());

        assert_eq!(seen, vec![h.g, h.h, h.i]);
    }

    #[test]
    fn test_stop_on_first_member_ends_walk() {
        let h = hierarchy();
        let mut seen = Vec::new();

        let action = h.derived.process_overridden_functions(h.f, |overridden| {
            seen.push(overridden);
            if overridden == h.g {
                ProcessorAction::Stop
            } else {
                ProcessorAction::Continue
            }
        });

        assert_eq!(action, ProcessorAction::Stop);
        assert_eq!(seen, vec![h.g]);
    }

    #[test]
    fn test_stop_deep_in_tree_skips_siblings() {
        let h = hierarchy();
        let mut seen = Vec::new();

        let action = h.derived.process_overridden_functions(h.f, |overridden| {
            seen.push(overridden);
            if overridden == h.i {
                ProcessorAction::Stop
            } else {
                ProcessorAction::Continue
            }
        });

        assert!(action.is_stop());
        assert_eq!(seen, vec![h.g, h.i], "h is a later sibling of g and must not be reached");
    }

    #[test]
    fn test_missing_entry_delegates_to_base_scope() {
        let h = hierarchy();

        // Derived has no entry for g, so its answer must be Base's answer
        assert_eq!(collect_all(&h.derived, h.g), collect_all(&*h.base, h.g));
        assert_eq!(
            h.derived.directly_overridden_functions(h.g),
            h.base.directly_overridden_functions(h.g)
        );
        assert_eq!(h.derived.directly_overridden_functions(h.g), vec![h.i]);
    }

    #[test]
    fn test_direct_only_wrapper_is_not_transitive() {
        let h = hierarchy();

        assert_eq!(h.derived.directly_overridden_functions(h.f), vec![h.g, h.h]);
        assert!(h.derived.directly_overridden_functions(h.i).is_empty());
    }

    #[test]
    fn test_independent_walks_give_identical_results() {
        let h = hierarchy();

        let first = collect_all(&h.derived, h.f);
        let second = collect_all(&h.derived, h.f);

        assert_eq!(first, second);
        assert_eq!(h.derived.overridden_functions(h.f).len(), 3);
    }

    #[test]
    fn test_foreign_symbol_yields_nothing() {
        let mut h = hierarchy();
        let stranger = function(
            &mut h.table,
            &mut h.interner,
            "Unrelated",
            "f",
            CallableOrigin::Source,
        );

        let action = h.derived.process_overridden_functions(stranger, |_| ProcessorAction::Stop);

        assert!(action.is_next());
        assert!(h.derived.overridden_functions(stranger).is_empty());
    }

    #[test]
    fn test_walk_result_when_nothing_stops() {
        let h = hierarchy();

        let action = h.derived.process_overridden_functions(h.f, |_| ProcessorAction::Continue);
        assert_eq!(action, ProcessorAction::Unhandled);

        let action = EMPTY_TYPE_SCOPE.process_overridden_functions(h.f, |_| ProcessorAction::Stop);
        assert_eq!(action, ProcessorAction::Continue);
    }

    #[test]
    fn test_properties_walk_like_functions() {
        let mut table = SymbolTable::new();
        let mut interner = StringInterner::new();
        let owner = interner.intern("Widget");
        let width = interner.intern("width");

        let leaf = table.add_property(width, owner, CallableOrigin::Source);
        let middle = table.add_property(width, owner, CallableOrigin::SubstitutionOverride);
        let top = table.add_property(width, owner, CallableOrigin::Library);

        let mut base = ClassMemberScope::builder(ScopeId::from_raw(0), owner);
        base.property_overrides(middle, [top]);
        let base: Rc<dyn TypeScope> = Rc::new(base.build());

        let mut scope = ClassMemberScope::builder(ScopeId::from_raw(1), owner).base_scope(base);
        scope.property_overrides(leaf, [middle]);
        let scope = scope.build();

        assert_eq!(scope.overridden_properties(leaf), vec![middle, top]);
        assert_eq!(scope.directly_overridden_properties(leaf), vec![middle]);

        let mut seen = Vec::new();
        let action = scope.process_overridden_properties(leaf, |overridden| {
            seen.push(overridden);
            ProcessorAction::Stop
        });
        assert_eq!(action, ProcessorAction::Stop);
        assert_eq!(seen, vec![middle]);
    }
}
