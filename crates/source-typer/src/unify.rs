use log::trace;

use crate::{
    error::TypeFault,
    store::ConstraintStore,
    substitute::{cyclic_list_head, resolve},
    types::{Type, TypeVar, VarKind},
};

/// Attempts to extend the store with the equation `lhs = rhs`.
///
/// On success the store has grown into a solution of the extended set; on
/// failure it is exactly as it was before the call, so surrounding
/// inference can continue with the un-unified variables.
pub fn add_constraint(
    store: &mut ConstraintStore,
    lhs: &Type,
    rhs: &Type,
) -> Result<(), TypeFault> {
    trace!("unify {lhs} = {rhs}");

    let mark = store.mark();
    let mut unifier = Unifier { store };
    let result = unifier.unify(lhs, rhs);

    if let Err(fault) = &result {
        trace!("unify failed: {fault}");
        unifier.store.rollback(mark);
    }

    result
}

struct Unifier<'s> {
    store: &'s mut ConstraintStore,
}

impl<'s> Unifier<'s> {
    /// Structural unification, rules tried top to bottom. Variables come
    /// before functions so a variable against a function term binds rather
    /// than mismatches.
    fn unify(&mut self, lhs: &Type, rhs: &Type) -> Result<(), TypeFault> {
        match (lhs, rhs) {
            (Type::Primitive(a), Type::Primitive(b)) if a == b => Ok(()),
            (Type::Array(a), Type::Array(b)) => self.unify(&a.0, &b.0),
            (Type::List(a), Type::List(b)) => self.unify(&a.0, &b.0),
            (Type::Pair(_), Type::List(_)) => self.unify(rhs, lhs),
            (Type::List(l), Type::Pair(_)) => {
                // A list meeting a pair folds into the pair equation
                // `rhs = Pair el (List el)`.
                let folded = Type::pair(l.0.clone(), lhs.clone());
                self.unify(rhs, &folded)
            }
            (Type::Pair(a), Type::Pair(b)) => {
                self.unify(&a.head, &b.head)?;
                self.unify(&a.tail, &b.tail)
            }
            (Type::Var(v), _) => self.bind(v, rhs),
            (_, Type::Var(v)) => self.bind(v, lhs),
            (Type::Func(f), Type::Func(g)) => {
                if f.arity() != g.arity() {
                    return Err(TypeFault::Arity {
                        expected: g.arity(),
                        received: f.arity(),
                    });
                }

                for (a, b) in f.params.iter().zip(&g.params) {
                    self.unify(a, b)?;
                }
                self.unify(&f.ret, &g.ret)
            }
            _ => Err(TypeFault::CannotUnify {
                expected: lhs.clone(),
                actual: rhs.clone(),
            }),
        }
    }

    fn bind(&mut self, var: &TypeVar, rhs: &Type) -> Result<(), TypeFault> {
        if let Type::Var(u) = rhs {
            if u.id() == var.id() {
                return Ok(());
            }
        }

        if rhs.contains(var) {
            // A pair whose tail loops back onto the variable describes a
            // cyclic list and is legalised as one.
            if let Some(head) = cyclic_list_head(rhs, var) {
                let head = head.clone();
                return self.unify(&Type::Var(*var), &Type::list(head));
            }

            return Err(TypeFault::Cyclic {
                var: *var,
                ty: rhs.clone(),
            });
        }

        if self.store.kind_of(var) == VarKind::Addable {
            if let Type::Primitive(p) = rhs {
                if !p.is_addable() {
                    return Err(TypeFault::NotAddable {
                        var: self.store.current_var(var),
                        actual: rhs.clone(),
                    });
                }
            }
        }

        // Shortcut through an existing solution: first-wins.
        if let Some(bound) = self.store.lookup(var).cloned() {
            return self.unify(rhs, &bound);
        }

        // Widening transfer: an addable variable tightens the variable it
        // is bound to.
        if self.store.kind_of(var) == VarKind::Addable {
            if let Type::Var(u) = rhs {
                if self.store.kind_of(u) == VarKind::None {
                    self.store.tighten(*u);
                }
            }
        }

        // Keep the store in solved form up to traversal.
        let solved = resolve(rhs, self.store);
        self.store.bind(*var, solved);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Primitive, VarSupply};

    fn fresh(supply: &mut VarSupply) -> Type {
        Type::Var(supply.fresh())
    }

    #[test]
    fn identical_primitives_unify_without_bindings() {
        let mut store = ConstraintStore::new();

        add_constraint(&mut store, &Type::NUMBER, &Type::NUMBER).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn distinct_primitives_do_not_unify() {
        let mut store = ConstraintStore::new();

        let fault = add_constraint(&mut store, &Type::NUMBER, &Type::STRING).unwrap_err();
        assert!(matches!(fault, TypeFault::CannotUnify { .. }));
    }

    #[test]
    fn a_variable_binds_and_chains() {
        let mut supply = VarSupply::new();
        let mut store = ConstraintStore::new();

        let a = supply.fresh();
        let b = supply.fresh();

        add_constraint(&mut store, &Type::Var(a), &Type::Var(b)).unwrap();
        add_constraint(&mut store, &Type::Var(b), &Type::STRING).unwrap();

        assert_eq!(resolve(&Type::Var(a), &store), Type::STRING);
    }

    #[test]
    fn the_first_binding_wins() {
        let mut supply = VarSupply::new();
        let mut store = ConstraintStore::new();

        let a = supply.fresh();

        add_constraint(&mut store, &Type::Var(a), &Type::NUMBER).unwrap();
        let fault = add_constraint(&mut store, &Type::Var(a), &Type::BOOLEAN).unwrap_err();

        assert!(matches!(fault, TypeFault::CannotUnify { .. }));
        assert_eq!(store.lookup(&a), Some(&Type::NUMBER));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn a_failed_equation_leaves_the_store_unchanged() {
        let mut supply = VarSupply::new();
        let mut store = ConstraintStore::new();

        let a = supply.fresh();

        // The first parameter binds before the second mismatches; the
        // rollback must drop the partial binding.
        let lhs = Type::func(vec![fresh(&mut supply), Type::NUMBER], Type::NUMBER);
        let rhs = Type::func(vec![Type::Var(a), Type::STRING], Type::NUMBER);

        let fault = add_constraint(&mut store, &lhs, &rhs).unwrap_err();
        assert!(matches!(fault, TypeFault::CannotUnify { .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn arity_mismatch_carries_both_arities() {
        let mut store = ConstraintStore::new();

        let lhs = Type::func(vec![Type::NUMBER], Type::NUMBER);
        let rhs = Type::func(vec![Type::NUMBER, Type::NUMBER], Type::NUMBER);

        let fault = add_constraint(&mut store, &lhs, &rhs).unwrap_err();
        assert_eq!(
            fault,
            TypeFault::Arity {
                expected: 2,
                received: 1
            }
        );
    }

    #[test]
    fn an_addable_variable_rejects_boolean() {
        let mut supply = VarSupply::new();
        let mut store = ConstraintStore::new();

        let a = supply.fresh_kinded(VarKind::Addable);

        let fault = add_constraint(&mut store, &Type::Var(a), &Type::BOOLEAN).unwrap_err();
        assert!(matches!(fault, TypeFault::NotAddable { .. }));

        add_constraint(&mut store, &Type::Var(a), &Type::STRING).unwrap();
        assert_eq!(store.lookup(&a), Some(&Type::STRING));
    }

    #[test]
    fn widening_transfer_tightens_the_bound_variable() {
        let mut supply = VarSupply::new();
        let mut store = ConstraintStore::new();

        let a = supply.fresh_kinded(VarKind::Addable);
        let b = supply.fresh();

        add_constraint(&mut store, &Type::Var(a), &Type::Var(b)).unwrap();
        assert_eq!(store.kind_of(&b), VarKind::Addable);

        let fault = add_constraint(&mut store, &Type::Var(b), &Type::BOOLEAN).unwrap_err();
        assert!(matches!(fault, TypeFault::NotAddable { .. }));
    }

    #[test]
    fn occurs_check_rejects_a_recursive_function_type() {
        let mut supply = VarSupply::new();
        let mut store = ConstraintStore::new();

        let v = supply.fresh();
        let recursive = Type::func(vec![Type::Var(v)], Type::NUMBER);

        let fault = add_constraint(&mut store, &Type::Var(v), &recursive).unwrap_err();
        assert!(fault.is_cyclic());
        assert!(store.is_empty());
    }

    #[test]
    fn a_self_referential_pair_becomes_a_cyclic_list() {
        let mut supply = VarSupply::new();
        let mut store = ConstraintStore::new();

        let v = supply.fresh();
        let looped = Type::pair(Type::NUMBER, Type::Var(v));

        add_constraint(&mut store, &Type::Var(v), &looped).unwrap();
        assert_eq!(store.lookup(&v), Some(&Type::list(Type::NUMBER)));
    }

    #[test]
    fn a_list_unifies_with_an_equivalent_pair_shape() {
        let mut supply = VarSupply::new();
        let mut store = ConstraintStore::new();

        let el = supply.fresh();
        let list = Type::list(Type::Var(el));
        let pair = Type::pair(Type::NUMBER, Type::list(Type::NUMBER));

        add_constraint(&mut store, &list, &pair).unwrap();
        assert_eq!(resolve(&Type::Var(el), &store), Type::NUMBER);
    }

    #[test]
    fn the_store_stays_in_solved_form() {
        let mut supply = VarSupply::new();
        let mut store = ConstraintStore::new();

        let a = supply.fresh();
        let b = supply.fresh();
        let c = supply.fresh();

        let lhs = Type::func(vec![Type::Var(a), Type::Var(b)], Type::Var(c));
        let rhs = Type::func(vec![Type::NUMBER, Type::Var(a)], Type::list(Type::Var(b)));
        add_constraint(&mut store, &lhs, &rhs).unwrap();

        // Resolving both sides of every stored equation agrees.
        let entries: Vec<_> = store.iter().cloned().collect();
        for (var, ty) in entries {
            assert_eq!(
                resolve(&Type::Var(var), &store),
                resolve(&ty, &store),
                "entry for {var} is not in solved form"
            );
        }
    }

    #[test]
    fn a_list_does_not_unify_with_a_mismatched_pair() {
        let mut store = ConstraintStore::new();

        let list = Type::list(Type::NUMBER);
        let pair = Type::pair(Type::Primitive(Primitive::String), Type::list(Type::STRING));

        let fault = add_constraint(&mut store, &list, &pair).unwrap_err();
        assert!(matches!(fault, TypeFault::CannotUnify { .. }));
    }
}
