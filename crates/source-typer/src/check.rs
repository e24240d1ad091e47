use log::debug;

use source_tree::{NodeId, Program, SyntaxTree};

use crate::{
    annotate::Annotations, builtins::initial_env, diagnostic::TypeDiagnostic, typer::Typer,
    types::VarSupply,
};

/// The result of checking one program: annotations for every node and the
/// diagnostics in emission order. The constraint store does not outlive
/// the check.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TypeCheckOutput {
    pub annotations: Annotations,
    pub diagnostics: Vec<TypeDiagnostic>,
}

impl TypeCheckOutput {
    pub fn is_well_typed(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Checks a program against the initial environment.
///
/// The variable counter starts from zero on every invocation, so checking
/// the same program twice yields identical annotations and diagnostics.
pub fn type_check(tree: &SyntaxTree, root: NodeId<Program>) -> TypeCheckOutput {
    let mut supply = VarSupply::new();
    let env = initial_env(&mut supply);

    debug!("checking with {} predeclared names", env.len());

    Typer::new(tree, supply).check(root, &env)
}
