//! Scope construction for hierarchy fixtures
//!
//! Classes are built supertypes first so every base scope exists by the time
//! a subclass needs it. Symbols are allocated for the whole fixture before
//! any scope is built, which lets override edges point anywhere (including
//! forward references and cycles between members).

use super::manifest::{ClassManifest, HierarchyManifest, MemberKind};
use super::{parse_manifest, HierarchyError, MemberRef};
use crate::tast::{
    CallableOrigin, ClassMemberScope, ClassMemberScopeBuilder, EmptyTypeScope, FunctionSymbol,
    IdGenerator, InternedString, IntersectionTypeScope, MemberWithBaseScope, OverridableCallable,
    PropertySymbol, ScopeId, StringInterner, SymbolId, SymbolTable, TypeScope,
};
use fxhash::FxHashMap;
use indexmap::IndexMap;
use log::{debug, info};
use std::path::Path;
use std::rc::Rc;

/// Member symbols of one class, split by how a reference reaches them
struct MemberTable<S> {
    /// `Class.member`
    declared: IndexMap<InternedString, S>,
    /// `Class.super.member`
    merged: IndexMap<InternedString, S>,
}

impl<S> Default for MemberTable<S> {
    fn default() -> Self {
        Self {
            declared: IndexMap::new(),
            merged: IndexMap::new(),
        }
    }
}

#[derive(Default)]
struct ClassSymbols {
    functions: MemberTable<FunctionSymbol>,
    properties: MemberTable<PropertySymbol>,
}

/// Per-kind plumbing so fixture handling is written once for both kinds
trait FixtureCallable: OverridableCallable {
    fn table(members: &ClassSymbols) -> &MemberTable<Self>;

    fn table_mut(members: &mut ClassSymbols) -> &mut MemberTable<Self>;

    fn allocate(
        symbols: &mut SymbolTable,
        name: InternedString,
        owner: InternedString,
        origin: CallableOrigin,
    ) -> Self;

    fn declare(builder: &mut ClassMemberScopeBuilder, name: InternedString, symbol: Self);

    fn record_overrides(builder: &mut ClassMemberScopeBuilder, symbol: Self, overridden: Vec<Self>);

    fn register_intersection(
        scope: &mut IntersectionTypeScope,
        symbol: Self,
        members: Vec<MemberWithBaseScope<Self>>,
    );
}

impl FixtureCallable for FunctionSymbol {
    fn table(members: &ClassSymbols) -> &MemberTable<Self> {
        &members.functions
    }

    fn table_mut(members: &mut ClassSymbols) -> &mut MemberTable<Self> {
        &mut members.functions
    }

    fn allocate(
        symbols: &mut SymbolTable,
        name: InternedString,
        owner: InternedString,
        origin: CallableOrigin,
    ) -> Self {
        symbols.add_function(name, owner, origin)
    }

    fn declare(builder: &mut ClassMemberScopeBuilder, name: InternedString, symbol: Self) {
        builder.declare_function(name, symbol);
    }

    fn record_overrides(builder: &mut ClassMemberScopeBuilder, symbol: Self, overridden: Vec<Self>) {
        builder.function_overrides(symbol, overridden);
    }

    fn register_intersection(
        scope: &mut IntersectionTypeScope,
        symbol: Self,
        members: Vec<MemberWithBaseScope<Self>>,
    ) {
        scope.add_intersection_function(symbol, members);
    }
}

impl FixtureCallable for PropertySymbol {
    fn table(members: &ClassSymbols) -> &MemberTable<Self> {
        &members.properties
    }

    fn table_mut(members: &mut ClassSymbols) -> &mut MemberTable<Self> {
        &mut members.properties
    }

    fn allocate(
        symbols: &mut SymbolTable,
        name: InternedString,
        owner: InternedString,
        origin: CallableOrigin,
    ) -> Self {
        symbols.add_property(name, owner, origin)
    }

    fn declare(builder: &mut ClassMemberScopeBuilder, name: InternedString, symbol: Self) {
        builder.declare_property(name, symbol);
    }

    fn record_overrides(builder: &mut ClassMemberScopeBuilder, symbol: Self, overridden: Vec<Self>) {
        builder.property_overrides(symbol, overridden);
    }

    fn register_intersection(
        scope: &mut IntersectionTypeScope,
        symbol: Self,
        members: Vec<MemberWithBaseScope<Self>>,
    ) {
        scope.add_intersection_property(symbol, members);
    }
}

/// Scopes built for one class
struct ClassEntry {
    scope: Rc<ClassMemberScope>,
    /// Base scope of `scope`; owns the class's intersection members
    supertype_scope: Rc<dyn TypeScope>,
}

/// A loaded class hierarchy
pub struct Hierarchy {
    interner: StringInterner,
    symbols: SymbolTable,
    members: FxHashMap<InternedString, ClassSymbols>,
    /// Supertypes before subtypes
    classes: IndexMap<InternedString, ClassEntry>,
}

impl Hierarchy {
    /// Read and build a fixture file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, HierarchyError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| HierarchyError::Io(path.to_path_buf(), e))?;
        info!("loading hierarchy from {}", path.display());
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, HierarchyError> {
        Self::from_manifest(&parse_manifest(content)?)
    }

    pub fn from_manifest(manifest: &HierarchyManifest) -> Result<Self, HierarchyError> {
        let mut hierarchy = Hierarchy {
            interner: StringInterner::new(),
            symbols: SymbolTable::new(),
            members: FxHashMap::default(),
            classes: IndexMap::with_capacity(manifest.classes.len()),
        };

        let mut positions = FxHashMap::default();
        for (index, class) in manifest.classes.iter().enumerate() {
            if positions.insert(class.name.as_str(), index).is_some() {
                return Err(HierarchyError::DuplicateClass(class.name.clone()));
            }
        }

        for class in &manifest.classes {
            hierarchy.allocate_members(class)?;
        }

        let mut scope_ids = IdGenerator::<ScopeId>::default();
        for index in build_order(&manifest.classes, &positions)? {
            hierarchy.build_class(&manifest.classes[index], &mut scope_ids)?;
        }

        info!(
            "built hierarchy: {} classes, {} callables, {} scopes",
            hierarchy.classes.len(),
            hierarchy.symbols.len(),
            scope_ids.issued()
        );
        Ok(hierarchy)
    }

    fn allocate_members(&mut self, class: &ClassManifest) -> Result<(), HierarchyError> {
        let owner = self.interner.intern(&class.name);
        let mut members = ClassSymbols::default();

        for function in &class.functions {
            self.allocate_member::<FunctionSymbol>(&mut members, class, &function.name, function.origin.into(), false)?;
        }
        for property in &class.properties {
            self.allocate_member::<PropertySymbol>(&mut members, class, &property.name, property.origin.into(), false)?;
        }
        for intersection in &class.intersections {
            if class.supertypes.is_empty() {
                return Err(HierarchyError::IntersectionWithoutSupertypes {
                    class: class.name.clone(),
                    name: intersection.name.clone(),
                });
            }
            let origin = CallableOrigin::IntersectionOverride;
            match intersection.kind {
                MemberKind::Function => {
                    self.allocate_member::<FunctionSymbol>(&mut members, class, &intersection.name, origin, true)?
                }
                MemberKind::Property => {
                    self.allocate_member::<PropertySymbol>(&mut members, class, &intersection.name, origin, true)?
                }
            }
        }

        self.members.insert(owner, members);
        Ok(())
    }

    fn allocate_member<S: FixtureCallable>(
        &mut self,
        members: &mut ClassSymbols,
        class: &ClassManifest,
        name: &str,
        origin: CallableOrigin,
        merged: bool,
    ) -> Result<(), HierarchyError> {
        let owner = self.interner.intern(&class.name);
        let interned = self.interner.intern(name);
        let table = S::table_mut(members);
        let slot = if merged { &mut table.merged } else { &mut table.declared };
        if slot.contains_key(&interned) {
            return Err(HierarchyError::DuplicateMember {
                class: class.name.clone(),
                kind: S::KIND,
                name: name.to_string(),
            });
        }
        slot.insert(interned, S::allocate(&mut self.symbols, interned, owner, origin));
        Ok(())
    }

    fn build_class(
        &mut self,
        class: &ClassManifest,
        scope_ids: &mut IdGenerator<ScopeId>,
    ) -> Result<(), HierarchyError> {
        let owner = self.interner.intern(&class.name);

        let supertypes = class
            .supertypes
            .iter()
            .map(|name| self.built_scope(name))
            .collect::<Result<Vec<_>, _>>()?;

        let supertype_scope: Rc<dyn TypeScope> = if supertypes.is_empty() {
            Rc::new(EmptyTypeScope)
        } else if supertypes.len() == 1 && class.intersections.is_empty() {
            supertypes[0].clone()
        } else {
            let mut intersection = IntersectionTypeScope::new(scope_ids.next_id(), supertypes);
            for merge in &class.intersections {
                match merge.kind {
                    MemberKind::Function => {
                        self.register_merge::<FunctionSymbol>(&mut intersection, owner, &merge.name, &merge.merges)?
                    }
                    MemberKind::Property => {
                        self.register_merge::<PropertySymbol>(&mut intersection, owner, &merge.name, &merge.merges)?
                    }
                }
            }
            Rc::new(intersection)
        };

        let mut builder = ClassMemberScope::builder(scope_ids.next_id(), owner).base_scope(supertype_scope.clone());
        for classifier in &class.classifiers {
            let name = self.interner.intern(classifier);
            builder.declare_classifier(name);
        }
        for function in &class.functions {
            self.declare_member::<FunctionSymbol>(&mut builder, owner, &function.name, &function.overrides)?;
        }
        for property in &class.properties {
            self.declare_member::<PropertySymbol>(&mut builder, owner, &property.name, &property.overrides)?;
        }

        let scope = Rc::new(builder.build());
        debug!(
            "class {} built with {} supertype(s) and {} intersection member(s)",
            class.name,
            class.supertypes.len(),
            class.intersections.len()
        );
        self.classes.insert(
            owner,
            ClassEntry {
                scope,
                supertype_scope,
            },
        );
        Ok(())
    }

    /// Class scope of an already built class
    fn built_scope(&self, name: &str) -> Result<Rc<dyn TypeScope>, HierarchyError> {
        self.class_scope(name)
            .map(|scope| -> Rc<dyn TypeScope> { scope.clone() })
            .ok_or_else(|| HierarchyError::UnknownClass(name.to_string()))
    }

    fn register_merge<S: FixtureCallable>(
        &self,
        intersection: &mut IntersectionTypeScope,
        owner: InternedString,
        name: &str,
        merges: &[String],
    ) -> Result<(), HierarchyError> {
        let symbol = self
            .interner
            .get_id(name)
            .and_then(|name| self.members.get(&owner).and_then(|m| S::table(m).merged.get(&name)))
            .copied()
            .ok_or_else(|| HierarchyError::UnknownMember {
                kind: S::KIND,
                reference: format!("{}.super.{}", self.interner.resolve(owner), name),
            })?;

        let mut members = Vec::with_capacity(merges.len());
        for reference in merges {
            let (member, base_scope) = self.resolve_with_scope::<S>(reference)?;
            members.push(MemberWithBaseScope::new(member, base_scope));
        }
        S::register_intersection(intersection, symbol, members);
        Ok(())
    }

    fn declare_member<S: FixtureCallable>(
        &mut self,
        builder: &mut ClassMemberScopeBuilder,
        owner: InternedString,
        name: &str,
        overrides: &[String],
    ) -> Result<(), HierarchyError> {
        let member = self.interner.intern(name);
        let symbol = self
            .members
            .get(&owner)
            .and_then(|members| S::table(members).declared.get(&member))
            .copied()
            .ok_or_else(|| HierarchyError::UnknownMember {
                kind: S::KIND,
                reference: format!("{}.{}", self.interner.resolve(owner), name),
            })?;
        S::declare(builder, member, symbol);

        let overridden = overrides
            .iter()
            .map(|reference| lookup::<S>(&self.members, &self.interner, reference).map(|(s, _)| s))
            .collect::<Result<Vec<_>, _>>()?;
        if !overridden.is_empty() {
            S::record_overrides(builder, symbol, overridden);
        }
        Ok(())
    }

    /// Resolve a reference and pair it with the scope that declares it.
    ///
    /// The owning class must already be built.
    fn resolve_with_scope<S: FixtureCallable>(
        &self,
        reference: &str,
    ) -> Result<(S, Rc<dyn TypeScope>), HierarchyError> {
        let (symbol, member_ref) = lookup::<S>(&self.members, &self.interner, reference)?;
        let entry = self
            .interner
            .get_id(member_ref.class)
            .and_then(|class| self.classes.get(&class))
            .ok_or_else(|| HierarchyError::InvalidReference {
                reference: reference.to_string(),
                reason: format!("class '{}' is not a supertype", member_ref.class),
            })?;
        let scope: Rc<dyn TypeScope> = if member_ref.through_super {
            entry.supertype_scope.clone()
        } else {
            entry.scope.clone()
        };
        Ok((symbol, scope))
    }

    /// Function named by `Class.member` or `Class.super.member`, with the
    /// scope it is declared in
    pub fn resolve_function(
        &self,
        reference: &str,
    ) -> Result<(FunctionSymbol, Rc<dyn TypeScope>), HierarchyError> {
        self.resolve_with_scope(reference)
    }

    /// Property named by `Class.member` or `Class.super.member`, with the
    /// scope it is declared in
    pub fn resolve_property(
        &self,
        reference: &str,
    ) -> Result<(PropertySymbol, Rc<dyn TypeScope>), HierarchyError> {
        self.resolve_with_scope(reference)
    }

    pub fn class_scope(&self, class: &str) -> Option<&Rc<ClassMemberScope>> {
        let name = self.interner.get_id(class)?;
        self.classes.get(&name).map(|entry| &entry.scope)
    }

    /// Base scope of a class: empty, its single supertype's scope, or the
    /// intersection of its supertypes
    pub fn supertype_scope(&self, class: &str) -> Option<&Rc<dyn TypeScope>> {
        let name = self.interner.get_id(class)?;
        self.classes.get(&name).map(|entry| &entry.supertype_scope)
    }

    /// `Class.member`, or `Class.super.member` for intersection members
    pub fn qualified_name(&self, id: SymbolId) -> Option<String> {
        let info = self.symbols.get(id)?;
        let owner = self.interner.resolve(info.owner);
        let name = self.interner.resolve(info.name);
        Some(if info.origin == CallableOrigin::IntersectionOverride {
            format!("{}.super.{}", owner, name)
        } else {
            format!("{}.{}", owner, name)
        })
    }

    /// Class names, supertypes before subtypes
    pub fn class_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.classes.keys().map(move |&name| self.interner.resolve(name))
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }
}

impl std::fmt::Debug for Hierarchy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hierarchy")
            .field("classes", &self.class_names().collect::<Vec<_>>())
            .field("callables", &self.symbols.len())
            .finish()
    }
}

fn lookup<'r, S: FixtureCallable>(
    members: &FxHashMap<InternedString, ClassSymbols>,
    interner: &StringInterner,
    reference: &'r str,
) -> Result<(S, MemberRef<'r>), HierarchyError> {
    let member_ref = MemberRef::parse(reference)?;
    let class = interner
        .get_id(member_ref.class)
        .and_then(|class| members.get(&class))
        .ok_or_else(|| HierarchyError::UnknownClass(member_ref.class.to_string()))?;

    let table = S::table(class);
    let names = if member_ref.through_super {
        &table.merged
    } else {
        &table.declared
    };
    interner
        .get_id(member_ref.member)
        .and_then(|member| names.get(&member))
        .map(|&symbol| (symbol, member_ref))
        .ok_or_else(|| HierarchyError::UnknownMember {
            kind: S::KIND,
            reference: reference.to_string(),
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    InProgress,
    Done,
}

/// Manifest indices ordered supertypes first
fn build_order(
    classes: &[ClassManifest],
    positions: &FxHashMap<&str, usize>,
) -> Result<Vec<usize>, HierarchyError> {
    let mut state = vec![VisitState::Unvisited; classes.len()];
    let mut path = Vec::new();
    let mut order = Vec::with_capacity(classes.len());
    for index in 0..classes.len() {
        visit(index, classes, positions, &mut state, &mut path, &mut order)?;
    }
    Ok(order)
}

fn visit(
    index: usize,
    classes: &[ClassManifest],
    positions: &FxHashMap<&str, usize>,
    state: &mut [VisitState],
    path: &mut Vec<usize>,
    order: &mut Vec<usize>,
) -> Result<(), HierarchyError> {
    match state[index] {
        VisitState::Done => return Ok(()),
        VisitState::InProgress => {
            let start = path.iter().position(|&i| i == index).unwrap_or(0);
            let mut chain: Vec<String> = path[start..].iter().map(|&i| classes[i].name.clone()).collect();
            chain.push(classes[index].name.clone());
            return Err(HierarchyError::CyclicSupertypes(chain));
        }
        VisitState::Unvisited => {}
    }

    state[index] = VisitState::InProgress;
    path.push(index);
    for supertype in &classes[index].supertypes {
        let next = *positions
            .get(supertype.as_str())
            .ok_or_else(|| HierarchyError::UnknownClass(supertype.clone()))?;
        visit(next, classes, positions, state, path, order)?;
    }
    path.pop();
    state[index] = VisitState::Done;
    order.push(index);
    Ok(())
}
