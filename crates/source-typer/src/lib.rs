//! Constraint-based type inference for Source programs.
//!
//! The checker runs as a second pass over a parsed [`source_tree::SyntaxTree`]:
//! every node is decorated with a fresh type variable, a tree walk emits
//! equality constraints into an incrementally solved store, and a final pass
//! substitutes solved terms back onto the nodes. Ill-typed constructs become
//! structured diagnostics; the program is never executed.

pub mod annotate;
pub mod builtins;
pub mod check;
pub mod diagnostic;
pub mod env;
pub mod error;
pub mod store;
pub mod substitute;
pub mod typer;
pub mod types;
pub mod unify;

pub mod prelude {
    pub use crate::annotate::{Annotations, TypeMeta, Typability};
    pub use crate::builtins::initial_env;
    pub use crate::check::{type_check, TypeCheckOutput};
    pub use crate::diagnostic::{TypeDiagnostic, TypeDiagnosticKind};
    pub use crate::env::{Binding, BindingType, TypeEnv};
    pub use crate::error::TypeFault;
    pub use crate::store::ConstraintStore;
    pub use crate::substitute::{apply, resolve};
    pub use crate::typer::Typer;
    pub use crate::types::*;
    pub use crate::unify::add_constraint;
}
