use std::collections::HashSet;

use crate::{
    error::TypeFault,
    store::ConstraintStore,
    types::{Type, TypeVar},
    unify::add_constraint,
};

/// Transitive substitution without normalisation.
///
/// Follows store bindings through variables until no bound variable
/// remains. Used to keep right-hand sides in solved form when they enter
/// the store, and as the cheap fallback when a full `apply` faults.
pub fn resolve(ty: &Type, store: &ConstraintStore) -> Type {
    resolve_inner(ty, store, &mut HashSet::new())
}

fn resolve_inner(ty: &Type, store: &ConstraintStore, seen: &mut HashSet<u32>) -> Type {
    match ty {
        Type::Primitive(p) => Type::Primitive(*p),
        Type::Var(v) => match store.lookup(v) {
            Some(bound) if seen.insert(v.id()) => {
                let bound = bound.clone();
                let result = resolve_inner(&bound, store, seen);
                seen.remove(&v.id());
                result
            }
            _ => Type::Var(store.current_var(v)),
        },
        Type::Func(f) => {
            let params = f
                .params
                .iter()
                .map(|p| resolve_inner(p, store, seen))
                .collect();
            let ret = resolve_inner(&f.ret, store, seen);
            Type::func(params, ret)
        }
        Type::Pair(p) => Type::pair(
            resolve_inner(&p.head, store, seen),
            resolve_inner(&p.tail, store, seen),
        ),
        Type::List(l) => Type::list(resolve_inner(&l.0, store, seen)),
        Type::Array(a) => Type::array(resolve_inner(&a.0, store, seen)),
    }
}

/// The canonical form operator: replaces variables transitively and then
/// normalises list shapes.
///
/// Two rewrites run post-order on the structural result:
///
/// - `List e` unrolls one step into `Pair e (List e)`.
/// - `Pair h1 (Pair h2 (List h3))` records `h2 = h3` and `h2 = h1` in the
///   store (every element of a list is identical) and collapses to the
///   applied tail `Pair h2 (List h3)`.
///
/// Following a binding back into a variable already on the path is a
/// cycle; only the pair shapes describing a cyclic list survive it.
pub fn apply(ty: &Type, store: &mut ConstraintStore) -> Result<Type, TypeFault> {
    apply_inner(ty, store, &mut Vec::new())
}

fn apply_inner(
    ty: &Type,
    store: &mut ConstraintStore,
    visiting: &mut Vec<u32>,
) -> Result<Type, TypeFault> {
    let applied = match ty {
        Type::Primitive(p) => Type::Primitive(*p),
        Type::Var(v) => match store.lookup(v).cloned() {
            None => Type::Var(store.current_var(v)),
            Some(bound) => {
                if visiting.contains(&v.id()) {
                    if cyclic_list_head(&bound, v).is_some() {
                        return Ok(Type::Var(store.current_var(v)));
                    }
                    return Err(TypeFault::Cyclic {
                        var: *v,
                        ty: bound,
                    });
                }

                visiting.push(v.id());
                let result = apply_inner(&bound, store, visiting);
                visiting.pop();
                result?
            }
        },
        Type::Func(f) => {
            let mut params = Vec::with_capacity(f.params.len());
            for param in &f.params {
                params.push(apply_inner(param, store, visiting)?);
            }
            let ret = apply_inner(&f.ret, store, visiting)?;
            Type::func(params, ret)
        }
        Type::Pair(p) => {
            let head = apply_inner(&p.head, store, visiting)?;
            let tail = apply_inner(&p.tail, store, visiting)?;
            Type::pair(head, tail)
        }
        Type::List(l) => Type::list(apply_inner(&l.0, store, visiting)?),
        Type::Array(a) => Type::array(apply_inner(&a.0, store, visiting)?),
    };

    normalize(applied, store)
}

fn normalize(ty: Type, store: &mut ConstraintStore) -> Result<Type, TypeFault> {
    match ty {
        Type::List(l) => {
            let el = l.0;
            Ok(Type::pair(el.clone(), Type::list(el)))
        }
        Type::Pair(p) => {
            if let Type::Pair(inner) = &p.tail {
                if let Type::List(el) = &inner.tail {
                    let el = el.0.clone();
                    add_constraint(store, &inner.head, &el)?;
                    add_constraint(store, &inner.head, &p.head)?;

                    return Ok(Type::pair(
                        resolve(&inner.head, store),
                        Type::list(resolve(&el, store)),
                    ));
                }
            }
            Ok(Type::Pair(p))
        }
        other => Ok(other),
    }
}

/// Matches the pair shapes that legally describe a cyclic list,
/// `Pair h v` and `Pair h (Pair _ v)`, returning the element term `h`.
pub(crate) fn cyclic_list_head<'t>(ty: &'t Type, var: &TypeVar) -> Option<&'t Type> {
    let Type::Pair(p) = ty else {
        return None;
    };

    match &p.tail {
        Type::Var(u) if u.id() == var.id() => Some(&p.head),
        Type::Pair(inner) => match &inner.tail {
            Type::Var(u) if u.id() == var.id() => Some(&p.head),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VarSupply;

    #[test]
    fn resolves_variables_transitively() {
        let mut supply = VarSupply::new();
        let mut store = ConstraintStore::new();

        let a = supply.fresh();
        let b = supply.fresh();

        add_constraint(&mut store, &Type::Var(a), &Type::Var(b)).unwrap();
        add_constraint(&mut store, &Type::Var(b), &Type::NUMBER).unwrap();

        assert_eq!(resolve(&Type::Var(a), &store), Type::NUMBER);
    }

    #[test]
    fn unrolls_a_list_one_step() {
        let mut store = ConstraintStore::new();

        let applied = apply(&Type::list(Type::NUMBER), &mut store).unwrap();

        assert_eq!(
            applied,
            Type::pair(Type::NUMBER, Type::list(Type::NUMBER))
        );
    }

    #[test]
    fn folds_a_uniform_pair_chain() {
        let mut supply = VarSupply::new();
        let mut store = ConstraintStore::new();

        let el = supply.fresh();
        let chain = Type::pair(
            Type::NUMBER,
            Type::pair(Type::NUMBER, Type::list(Type::Var(el))),
        );

        let applied = apply(&chain, &mut store).unwrap();

        assert_eq!(
            applied,
            Type::pair(Type::NUMBER, Type::list(Type::NUMBER))
        );
        assert_eq!(store.lookup(&el), Some(&Type::NUMBER));
    }

    #[test]
    fn rejects_a_heterogeneous_pair_chain() {
        let mut supply = VarSupply::new();
        let mut store = ConstraintStore::new();

        let el = supply.fresh();
        let chain = Type::pair(
            Type::NUMBER,
            Type::pair(Type::STRING, Type::list(Type::Var(el))),
        );

        let fault = apply(&chain, &mut store).unwrap_err();
        assert!(matches!(fault, TypeFault::CannotUnify { .. }));
    }

    #[test]
    fn detects_a_cycle_through_the_store() {
        let mut supply = VarSupply::new();
        let mut store = ConstraintStore::new();

        let v = supply.fresh();
        let w = supply.fresh();

        // v = (w) -> number, then w = v closes the loop.
        add_constraint(
            &mut store,
            &Type::Var(v),
            &Type::func(vec![Type::Var(w)], Type::NUMBER),
        )
        .unwrap();
        add_constraint(&mut store, &Type::Var(w), &Type::Var(v)).unwrap();

        let fault = apply(&Type::Var(w), &mut store).unwrap_err();
        assert!(fault.is_cyclic());
    }
}
