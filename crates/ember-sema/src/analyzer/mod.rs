//! Tree-walking semantic analyzer.
//!
//! The walk is split the way the checks are: `collect` registers top-level
//! declarations, `decl` handles classes, functions and declarations, `stmt`
//! control flow, `expr` expressions, and `infer` computes expression types.

mod collect;
mod decl;
mod expr;
mod infer;
mod stmt;

use std::fmt;

use ember_syntax::Node;

use crate::error::{SemanticError, SemanticErrorKind};
use crate::options::{ErrorPolicy, Options};
use crate::symbol::{ClassInfo, SymbolKind};
use crate::table::SymbolTable;
use crate::types::TypeId;

/// Name of the implicit root class.
pub const ROOT_CLASS: &str = "Object";

/// Marker returned once a diagnostic has been recorded for a subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Failed;

impl fmt::Display for Failed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("semantic analysis failed")
    }
}

impl std::error::Error for Failed {}

pub type Outcome<T = ()> = Result<T, Failed>;

#[derive(Debug, Clone, Copy)]
struct ClassContext {
    ty: TypeId,
    parent: TypeId,
}

pub struct Analyzer<'t> {
    table: &'t mut SymbolTable,
    options: Options,
    errors: Vec<SemanticError>,
    /// Class whose members are being analyzed, if any.
    class: Option<ClassContext>,
    /// Names of the enclosing class and function, for diagnostics.
    path: Vec<String>,
    depth: usize,
    halted: bool,
    /// Set once registering the root class has been attempted.
    root_checked: bool,
}

impl<'t> Analyzer<'t> {
    pub fn new(table: &'t mut SymbolTable, options: Options) -> Self {
        Self {
            table,
            options,
            errors: Vec::new(),
            class: None,
            path: Vec::new(),
            depth: 0,
            halted: false,
            root_checked: false,
        }
    }

    pub fn table(&self) -> &SymbolTable {
        &*self.table
    }

    pub fn diagnostics(&self) -> &[SemanticError] {
        &self.errors
    }

    /// True once fail-fast mode has seen an error, or a structural limit
    /// was hit. Nothing further is analyzed.
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn finish(self) -> Vec<SemanticError> {
        self.errors
    }

    /// Analyzes any node. Returns `Err` if this node or something under it
    /// was rejected; the reasons are in [`diagnostics`](Self::diagnostics).
    pub fn analyze(&mut self, node: &Node) -> Outcome {
        if self.halted {
            return Err(Failed);
        }
        self.descend(|a| a.analyze_node(node))
    }

    fn analyze_node(&mut self, node: &Node) -> Outcome {
        match node {
            Node::Program(p) => self.analyze_program(p),
            Node::Class(c) => self.analyze_class(c),
            Node::Function(f) => self.analyze_function(f),
            Node::Declaration(d) => self.analyze_declaration(d),
            Node::Block(b) => self.analyze_block(b),
            Node::If(i) => self.analyze_if(i),
            Node::While(w) => self.analyze_while(w),
            Node::Return(r) => self.analyze_return(r),
            Node::Print(p) => self.analyze_print(p),
            Node::BinaryOp(b) => self.analyze_binary(b),
            Node::UnaryOp(u) => self.analyze(&u.operand),
            Node::Literal(_) | Node::StringLiteral { .. } => Ok(()),
            Node::Variable { name } => self.analyze_variable(name),
            Node::New(n) => self.analyze_new(n),
            Node::FunctionCall(c) => self.analyze_call(c),
            Node::MemberAccess(m) => self.analyze_member_access(m),
            Node::MethodCall(m) => self.analyze_method_call(m),
            Node::IdentifierList { names } => self.walk(names, |a, n| a.analyze_variable(n)),
            Node::Super | Node::This => self.type_of(node).map(drop),
            Node::TypeCast(c) => self.analyze_cast(c),
        }
    }

    /// Records a diagnostic and returns the failure marker.
    fn report(&mut self, kind: SemanticErrorKind) -> Failed {
        let within = (!self.path.is_empty()).then(|| self.path.join("::"));
        log::debug!("{}: {}", kind.code(), kind);
        let structural = matches!(kind, SemanticErrorKind::NestingTooDeep { .. });
        self.errors.push(SemanticError { kind, within });
        if structural || self.options.policy == ErrorPolicy::FailFast {
            self.halted = true;
        }
        Failed
    }

    fn fail<T>(&mut self, kind: SemanticErrorKind) -> Outcome<T> {
        Err(self.report(kind))
    }

    /// Applies `f` to every item of a sibling list. Under the collecting
    /// policy a failed item does not stop the walk.
    fn walk<T>(&mut self, items: &[T], mut f: impl FnMut(&mut Self, &T) -> Outcome) -> Outcome {
        let mut result = Ok(());
        for item in items {
            if self.halted {
                return Err(Failed);
            }
            if f(self, item).is_err() {
                result = Err(Failed);
            }
        }
        result
    }

    /// Runs `f` one nesting level deeper, refusing past `max_depth`.
    fn descend<T>(&mut self, f: impl FnOnce(&mut Self) -> Outcome<T>) -> Outcome<T> {
        if self.depth >= self.options.max_depth {
            let limit = self.options.max_depth;
            return self.fail(SemanticErrorKind::NestingTooDeep { limit });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Runs `f` inside a fresh scope.
    fn scoped<T>(&mut self, f: impl FnOnce(&mut Self) -> Outcome<T>) -> Outcome<T> {
        self.table.push_scope();
        let result = f(self);
        self.table.pop_scope();
        result
    }

    /// Makes sure the implicit root class is registered.
    /// A clash with a user declaration named `Object` is reported once.
    fn ensure_root_class(&mut self) {
        if std::mem::replace(&mut self.root_checked, true) {
            return;
        }
        if self.table.find_class(ROOT_CLASS).is_some() {
            return;
        }
        let kind = SymbolKind::Class(ClassInfo::default());
        match self.table.add_global(ROOT_CLASS, TypeId::CLASS, kind) {
            Ok(_) => log::debug!("Class '{}' added to the symbol table", ROOT_CLASS),
            Err(e) => {
                self.report(e.into());
            }
        }
    }

    fn type_name(&self, ty: TypeId) -> String {
        self.table.type_name(ty).to_string()
    }
}
