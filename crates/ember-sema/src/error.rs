//! Diagnostics produced by collection and analysis.
//!
//! None of these are fatal: each one is recorded and the offending subtree
//! is abandoned. Whether the pass then continues is decided by
//! [`ErrorPolicy`](crate::ErrorPolicy).

use std::fmt;

use ember_syntax::BinaryOperator;
use thiserror::Error;

/// What kind of entity a missing name was expected to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Variable,
    Function,
    Class,
    Object,
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameKind::Variable => f.write_str("Variable"),
            NameKind::Function => f.write_str("Function"),
            NameKind::Class => f.write_str("Class"),
            NameKind::Object => f.write_str("Object"),
        }
    }
}

/// Where a type comparison happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeContext {
    Initializer(String),
    Assignment,
    Operation(BinaryOperator),
    /// 1-based argument position.
    Argument { position: usize, function: String },
}

impl fmt::Display for TypeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeContext::Initializer(name) => {
                write!(f, "Incompatible types when initializing '{}'", name)
            }
            TypeContext::Assignment => f.write_str("Incompatible types in assignment"),
            TypeContext::Operation(op) => {
                write!(f, "Incompatible types in binary operation '{}'", op)
            }
            TypeContext::Argument { position, function } => {
                write!(f, "Argument {} in the call to '{}'", position, function)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticErrorKind {
    #[error("{what} '{name}' is not declared")]
    UndeclaredName { what: NameKind, name: String },

    #[error("The symbol '{name}' is already declared")]
    DuplicateDeclaration { name: String },

    #[error("Unknown type '{ty}' for '{name}'")]
    UnknownType { ty: String, name: String },

    #[error("Function '{function}' expects {expected} arguments, but got {found}")]
    ArityMismatch {
        function: String,
        expected: usize,
        found: usize,
    },

    #[error("{context}: expected '{expected}', found '{found}'")]
    TypeIncompatibility {
        context: TypeContext,
        expected: String,
        found: String,
    },

    #[error("Only members of plain objects can be assigned (target member '{member}')")]
    InvalidAssignmentTarget { member: String },

    #[error("'{ty}' does not have a member called '{member}'")]
    UnresolvedMember { ty: String, member: String },

    #[error("'{keyword}' used outside the context of a class")]
    MissingContext { keyword: &'static str },

    #[error("'{name}' is not a function")]
    NotCallable { name: String },

    #[error("Type '{ty}' is not a class")]
    NotAClass { ty: String },

    #[error("Cyclic inheritance detected involving '{class}'")]
    CyclicInheritance { class: String },

    #[error("Symbol table is full ({capacity} symbols)")]
    TableFull { capacity: usize },

    #[error("Nesting exceeds the maximum depth of {limit}")]
    NestingTooDeep { limit: usize },
}

impl SemanticErrorKind {
    /// Stable name of the diagnostic category.
    pub fn code(&self) -> &'static str {
        match self {
            SemanticErrorKind::UndeclaredName { .. } => "UndeclaredName",
            SemanticErrorKind::DuplicateDeclaration { .. } => "DuplicateDeclaration",
            SemanticErrorKind::UnknownType { .. } => "UnknownType",
            SemanticErrorKind::ArityMismatch { .. } => "ArityMismatch",
            SemanticErrorKind::TypeIncompatibility { .. } => "TypeIncompatibility",
            SemanticErrorKind::InvalidAssignmentTarget { .. } => "InvalidAssignmentTarget",
            SemanticErrorKind::UnresolvedMember { .. } => "UnresolvedMember",
            SemanticErrorKind::MissingContext { .. } => "MissingContext",
            SemanticErrorKind::NotCallable { .. } => "NotCallable",
            SemanticErrorKind::NotAClass { .. } => "NotAClass",
            SemanticErrorKind::CyclicInheritance { .. } => "CyclicInheritance",
            SemanticErrorKind::TableFull { .. } => "TableFull",
            SemanticErrorKind::NestingTooDeep { .. } => "NestingTooDeep",
        }
    }
}

/// A diagnostic together with the item it was found in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticError {
    pub kind: SemanticErrorKind,
    /// Enclosing class and/or function, e.g. `Dog::bark`.
    pub within: Option<String>,
}

impl fmt::Display for SemanticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.within {
            Some(item) => write!(f, "{} (in {})", self.kind, item),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for SemanticError {}

/// Failure of a symbol table insertion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("The symbol '{0}' is already declared")]
    Duplicate(String),
    #[error("Symbol table is full ({0} symbols)")]
    Full(usize),
}

impl From<TableError> for SemanticErrorKind {
    fn from(e: TableError) -> Self {
        match e {
            TableError::Duplicate(name) => SemanticErrorKind::DuplicateDeclaration { name },
            TableError::Full(capacity) => SemanticErrorKind::TableFull { capacity },
        }
    }
}
