use derive_more::From;
use enum_as_inner::EnumAsInner;
use serde::{Deserialize, Serialize};
use std::{fmt, ops::ControlFlow};

use super::{ArrayType, FuncType, ListType, PairType, Primitive, TypeVar, TypeVisitor};

/// A type term.
/// τ ::= primitive | α | (τ1, .., τn) -> τ | Pair τ τ | List τ | Array τ
#[derive(Debug, From, EnumAsInner, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Type {
    Primitive(Primitive),
    Var(TypeVar),
    Func(Box<FuncType>),
    Pair(Box<PairType>),
    List(Box<ListType>),
    Array(Box<ArrayType>),
}

impl Type {
    pub const BOOLEAN: Self = Self::Primitive(Primitive::Boolean);
    pub const NUMBER: Self = Self::Primitive(Primitive::Number);
    pub const STRING: Self = Self::Primitive(Primitive::String);
    pub const UNDEFINED: Self = Self::Primitive(Primitive::Undefined);
}

impl Type {
    pub fn func(params: Vec<Self>, ret: Self) -> Self {
        Self::Func(Box::new(FuncType::new(params, ret)))
    }

    pub fn pair(head: Self, tail: Self) -> Self {
        Self::Pair(Box::new(PairType::new(head, tail)))
    }

    pub fn list(el: Self) -> Self {
        Self::List(Box::new(ListType(el)))
    }

    pub fn array(el: Self) -> Self {
        Self::Array(Box::new(ArrayType(el)))
    }

    /// occurs check
    pub fn contains(&self, var: &TypeVar) -> bool {
        struct Occured;
        struct OccursChecker<'t>(&'t TypeVar);

        impl<'t> TypeVisitor for OccursChecker<'t> {
            type BreakValue = Occured;

            fn visit_var(&mut self, var: &TypeVar) -> ControlFlow<Self::BreakValue> {
                if var.id() == self.0.id() {
                    ControlFlow::Break(Occured)
                } else {
                    ControlFlow::Continue(())
                }
            }
        }

        let mut checker = OccursChecker(var);
        checker.visit(self).is_break()
    }

    /// Every variable occurring in the term, in visit order, deduplicated.
    pub fn type_vars(&self) -> Vec<TypeVar> {
        let mut vars = Vec::new();
        self.extend_type_vars(&mut vars);
        vars
    }

    pub fn extend_type_vars(&self, vars: &mut Vec<TypeVar>) {
        struct VarsFinder<'t>(&'t mut Vec<TypeVar>);

        impl<'t> TypeVisitor for VarsFinder<'t> {
            type BreakValue = std::convert::Infallible;

            fn visit_var(&mut self, var: &TypeVar) -> ControlFlow<Self::BreakValue> {
                if !self.0.iter().any(|v| v.id() == var.id()) {
                    self.0.push(*var);
                }
                ControlFlow::Continue(())
            }
        }

        let mut finder = VarsFinder(vars);
        let _ = finder.visit(self);
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(p) => p.fmt(f),
            Self::Var(v) => v.fmt(f),
            Self::Func(func) => func.fmt(f),
            Self::Pair(p) => p.fmt(f),
            Self::List(l) => l.fmt(f),
            Self::Array(a) => a.fmt(f),
        }
    }
}

impl From<FuncType> for Type {
    fn from(value: FuncType) -> Self {
        Self::Func(Box::new(value))
    }
}

impl From<PairType> for Type {
    fn from(value: PairType) -> Self {
        Self::Pair(Box::new(value))
    }
}

impl From<ListType> for Type {
    fn from(value: ListType) -> Self {
        Self::List(Box::new(value))
    }
}

impl From<ArrayType> for Type {
    fn from(value: ArrayType) -> Self {
        Self::Array(Box::new(value))
    }
}
