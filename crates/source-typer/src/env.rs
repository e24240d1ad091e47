use indexmap::IndexMap;
use std::fmt;

use source_tree::DeclKind;

use crate::types::{Type, TypeScheme, VarSupply};

/// What an identifier is bound to: a plain term during its own
/// declaration (supporting recursion), or a scheme after generalisation.
///
/// Bare schemes never reach the unifier; every lookup instantiates.
#[derive(Debug, Clone, PartialEq)]
pub enum BindingType {
    Mono(Type),
    Forall(TypeScheme),
}

impl BindingType {
    /// Wraps a fully-applied term at its generalisation point. Primitive
    /// terms are never wrapped.
    pub fn generalized(ty: Type) -> Self {
        match ty {
            Type::Primitive(_) => Self::Mono(ty),
            other => Self::Forall(TypeScheme::new(other)),
        }
    }

    pub fn instantiate(&self, supply: &mut VarSupply) -> Type {
        match self {
            Self::Mono(ty) => ty.clone(),
            Self::Forall(scheme) => scheme.instantiate(supply),
        }
    }
}

impl fmt::Display for BindingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mono(ty) => ty.fmt(f),
            Self::Forall(scheme) => scheme.fmt(f),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub ty: BindingType,
    pub decl: DeclKind,
}

/// The lexically scoped type environment: identifier name to type and to
/// declaration kind.
///
/// Environments are immutable by contract between scopes; entering a
/// lexical scope clones the current one and mutates only the clone.
#[derive(Debug, Clone, Default)]
pub struct TypeEnv {
    bindings: IndexMap<String, Binding>,
}

impl TypeEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    pub fn decl_kind(&self, name: &str) -> Option<DeclKind> {
        self.bindings.get(name).map(|b| b.decl)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Binds or rebinds a name in this scope.
    pub fn bind(&mut self, name: impl Into<String>, ty: BindingType, decl: DeclKind) {
        self.bindings.insert(name.into(), Binding { ty, decl });
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Binding)> {
        self.bindings.iter()
    }
}

impl fmt::Display for TypeEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, binding) in &self.bindings {
            writeln!(f, "{name} : {}", binding.ty)?;
        }

        Ok(())
    }
}
