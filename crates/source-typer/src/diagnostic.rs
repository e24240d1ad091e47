use std::fmt;

use source_span::{Diagnostic, Severity, Span};
use source_tree::SyntaxTree;

use crate::{error::TypeFault, types::Type};

/// The closed set of type diagnostics, each carrying enough data for a
/// formatter to build a message without re-walking the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDiagnosticKind {
    InvalidArgumentTypes {
        args: Vec<usize>,
        expected: Vec<Type>,
        received: Vec<Type>,
    },
    DifferentNumberArguments {
        expected: usize,
        received: usize,
    },
    InvalidTestCondition {
        received: Type,
    },
    ConsequentAlternateMismatch {
        consequent: Type,
        alternate: Type,
    },
    CyclicReference,
    ReassignConst,
    DifferentAssignment {
        expected: Type,
        received: Type,
    },
    ArrayAssignment {
        array: Type,
        received: Type,
    },
    InvalidArrayIndexType {
        received: Type,
    },
    UndefinedIdentifier {
        name: String,
    },
    /// Escape hatch for faults no dedicated rule claims.
    InternalTypeError {
        fault: TypeFault,
    },
}

/// One structured diagnostic, referencing the offending node by its pool
/// index. Every type diagnostic is a warning of category `type`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDiagnostic {
    pub node: usize,
    pub kind: TypeDiagnosticKind,
}

impl TypeDiagnostic {
    pub fn new(node: usize, kind: TypeDiagnosticKind) -> Self {
        Self { node, kind }
    }

    pub fn severity(&self) -> Severity {
        Severity::Warning
    }

    pub fn category(&self) -> &'static str {
        "type"
    }

    /// The node's source location, when the parser provided one.
    pub fn span(&self, tree: &SyntaxTree) -> Option<Span> {
        tree.span(self.node)
    }

    /// Lowers into the rendering layer's diagnostic.
    pub fn to_diagnostic(&self, tree: &SyntaxTree) -> Diagnostic {
        Diagnostic::warn(self.span(tree), self.to_string())
    }
}

fn type_list(types: &[Type]) -> String {
    let rendered: Vec<String> = types.iter().map(Type::to_string).collect();
    format!("({})", rendered.join(", "))
}

impl fmt::Display for TypeDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TypeDiagnosticKind::InvalidArgumentTypes {
                expected, received, ..
            } => write!(
                f,
                "expected arguments of types {} but received {}",
                type_list(expected),
                type_list(received)
            ),
            TypeDiagnosticKind::DifferentNumberArguments { expected, received } => {
                write!(f, "expected {expected} arguments but received {received}")
            }
            TypeDiagnosticKind::InvalidTestCondition { received } => write!(
                f,
                "expected the test condition to be a boolean but received `{received}`"
            ),
            TypeDiagnosticKind::ConsequentAlternateMismatch {
                consequent,
                alternate,
            } => write!(
                f,
                "the consequent has type `{consequent}` but the alternative has type `{alternate}`"
            ),
            TypeDiagnosticKind::CyclicReference => write!(
                f,
                "the function declaration refers to itself in a way that never resolves to a type"
            ),
            TypeDiagnosticKind::ReassignConst => {
                write!(f, "cannot reassign a constant")
            }
            TypeDiagnosticKind::DifferentAssignment { expected, received } => write!(
                f,
                "cannot assign `{received}` where `{expected}` was declared"
            ),
            TypeDiagnosticKind::ArrayAssignment { array, received } => {
                write!(f, "cannot place `{received}` into `{array}`")
            }
            TypeDiagnosticKind::InvalidArrayIndexType { received } => write!(
                f,
                "an array index must be a number but received `{received}`"
            ),
            TypeDiagnosticKind::UndefinedIdentifier { name } => {
                write!(f, "undefined identifier `{name}`")
            }
            TypeDiagnosticKind::InternalTypeError { fault } => {
                write!(f, "internal type error: {fault}")
            }
        }
    }
}
