pub mod string_intern;
pub mod id_types;
pub mod symbols;
pub mod processor_action;
pub mod type_scope;
pub mod overrides;
pub mod member_scope;
pub mod intersection_scope;

#[cfg(test)]
mod tests;

pub use string_intern::*;
pub use id_types::*;
pub use symbols::*;
pub use processor_action::ProcessorAction;
pub use type_scope::{
    do_process_direct_overridden_callables, BaseScopeProcessor, ContainingNamesAwareScope,
    DirectOverriddenMap, EmptyTypeScope, OverridableCallable, TypeScope, EMPTY_TYPE_SCOPE,
};
pub use overrides::TypeScopeExt;
pub use member_scope::{ClassMemberScope, ClassMemberScopeBuilder};
pub use intersection_scope::{IntersectionTypeScope, MemberWithBaseScope};
