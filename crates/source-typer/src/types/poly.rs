use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt};

use super::{Type, TypeVar, VarSupply};

/// A universally quantified type.
///
/// The quantifier binds exactly the variables free in the wrapped term at
/// the instant of generalisation, so instantiation replaces every variable
/// occurring in the term. Schemes never nest and never wrap a bare
/// primitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeScheme(pub Type);

impl TypeScheme {
    pub fn new(ty: Type) -> Self {
        Self(ty)
    }

    /// The procedure inst(σ): copies the wrapped term, replacing each
    /// variable consistently with a freshly minted one of the same kind.
    pub fn instantiate(&self, supply: &mut VarSupply) -> Type {
        let mut mapping = HashMap::new();
        freshen(&self.0, supply, &mut mapping)
    }
}

fn freshen(ty: &Type, supply: &mut VarSupply, mapping: &mut HashMap<u32, TypeVar>) -> Type {
    match ty {
        Type::Primitive(p) => Type::Primitive(*p),
        Type::Var(v) => {
            let fresh = *mapping
                .entry(v.id())
                .or_insert_with(|| supply.fresh_like(v));
            Type::Var(fresh)
        }
        Type::Func(f) => {
            let params = f
                .params
                .iter()
                .map(|p| freshen(p, supply, mapping))
                .collect();
            let ret = freshen(&f.ret, supply, mapping);
            Type::func(params, ret)
        }
        Type::Pair(p) => Type::pair(
            freshen(&p.head, supply, mapping),
            freshen(&p.tail, supply, mapping),
        ),
        Type::List(l) => Type::list(freshen(&l.0, supply, mapping)),
        Type::Array(a) => Type::array(freshen(&a.0, supply, mapping)),
    }
}

impl From<Type> for TypeScheme {
    fn from(ty: Type) -> Self {
        Self::new(ty)
    }
}

impl fmt::Display for TypeScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let vars = self.0.type_vars();

        if !vars.is_empty() {
            write!(f, "forall")?;

            for tv in vars {
                write!(f, " {tv}")?;
            }

            write!(f, " . ")?;
        }

        self.0.fmt(f)
    }
}
