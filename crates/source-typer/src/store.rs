use owo_colors::OwoColorize;
use std::{
    collections::{HashMap, HashSet},
    fmt,
};

use crate::types::{Type, TypeVar, VarKind};

/// The accumulating solved-form set of `(variable, term)` equations.
///
/// Entries are kept in emission order: earlier entries take precedence, a
/// variable is never bound twice, and the folding rewrites rely on in-order
/// traversal. A side index gives O(1) first-wins lookup without giving up
/// the ordered contract.
#[derive(Debug, Clone, Default)]
pub struct ConstraintStore {
    entries: Vec<(TypeVar, Type)>,
    index: HashMap<u32, usize>,
    tightened: HashSet<u32>,
    tighten_log: Vec<u32>,
}

/// A rollback point; a failed `add_constraint` restores the store to it.
#[derive(Debug, Clone, Copy)]
pub struct StoreMark {
    entries: usize,
    tightened: usize,
}

impl ConstraintStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (TypeVar, Type)> {
        self.entries.iter()
    }

    /// The first (and only) binding for the variable, if any.
    pub fn lookup(&self, var: &TypeVar) -> Option<&Type> {
        self.index.get(&var.id()).map(|&i| &self.entries[i].1)
    }

    pub fn is_bound(&self, var: &TypeVar) -> bool {
        self.index.contains_key(&var.id())
    }

    /// The variable's current kind, accounting for widening transfer.
    pub fn kind_of(&self, var: &TypeVar) -> VarKind {
        if var.kind() == VarKind::Addable || self.tightened.contains(&var.id()) {
            VarKind::Addable
        } else {
            VarKind::None
        }
    }

    /// The variable as currently kinded.
    pub fn current_var(&self, var: &TypeVar) -> TypeVar {
        match self.kind_of(var) {
            VarKind::Addable => var.tightened(),
            VarKind::None => *var,
        }
    }

    /// Widens the variable's kind to `addable`.
    pub(crate) fn tighten(&mut self, var: TypeVar) {
        if self.tightened.insert(var.id()) {
            self.tighten_log.push(var.id());
        }
    }

    /// Appends a binding. First-wins is an invariant of the caller: binding
    /// an already-bound variable is a bug in the unifier.
    pub(crate) fn bind(&mut self, var: TypeVar, ty: Type) {
        debug_assert!(
            !self.is_bound(&var),
            "variable {var} bound twice in the store"
        );
        let idx = self.entries.len();
        self.entries.push((var, ty));
        self.index.entry(var.id()).or_insert(idx);
    }

    pub fn mark(&self) -> StoreMark {
        StoreMark {
            entries: self.entries.len(),
            tightened: self.tighten_log.len(),
        }
    }

    /// Undoes every binding and widening recorded since the mark.
    pub fn rollback(&mut self, mark: StoreMark) {
        for i in mark.entries..self.entries.len() {
            let id = self.entries[i].0.id();
            if self.index.get(&id) == Some(&i) {
                self.index.remove(&id);
            }
        }
        self.entries.truncate(mark.entries);

        for id in self.tighten_log.drain(mark.tightened..) {
            self.tightened.remove(&id);
        }
    }
}

impl fmt::Display for ConstraintStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (var, ty) in &self.entries {
            writeln!(f, "{var}\t{}", ty.green())?;
        }

        Ok(())
    }
}
