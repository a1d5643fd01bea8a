use ember_syntax::{Callee, Node};

use super::{Analyzer, Outcome};
use crate::error::{NameKind, SemanticErrorKind, TypeContext};
use crate::types::TypeId;

impl Analyzer<'_> {
    /// Static type of an expression.
    ///
    /// Operators do not change types: a binary operation has the type of its
    /// left operand, and a member access or method call has the type of its
    /// object. Call this after [`analyze`](Self::analyze) has accepted the
    /// node, otherwise lookup failures are reported twice.
    pub fn type_of(&mut self, node: &Node) -> Outcome<TypeId> {
        if self.halted {
            return Err(super::Failed);
        }
        let ty = self.descend(|a| a.infer(node))?;
        log::trace!("type of {} is '{}'", node.kind_name(), self.table.type_name(ty));
        Ok(ty)
    }

    fn infer(&mut self, node: &Node) -> Outcome<TypeId> {
        match node {
            Node::Program(_) => Ok(TypeId::VOID),
            Node::Class(_) => Ok(TypeId::CLASS),
            Node::Function(f) => Ok(self.table.intern(&f.return_type)),
            Node::Declaration(d) => Ok(self.table.intern(&d.ty)),
            Node::Block(_) => Ok(TypeId::BLOCK),
            Node::If(stmt) => self.type_of(&stmt.condition),
            Node::While(stmt) => self.type_of(&stmt.condition),
            Node::Return(stmt) => match &stmt.value {
                Some(value) => self.type_of(value),
                None => Ok(TypeId::VOID),
            },
            Node::Print(stmt) => match stmt.args.first() {
                Some(arg) => self.type_of(arg),
                None => Ok(TypeId::VOID),
            },
            Node::BinaryOp(bin) => self.type_of(&bin.left),
            Node::UnaryOp(un) => self.type_of(&un.operand),
            Node::Literal(lit) => Ok(self.table.intern(&lit.ty)),
            Node::StringLiteral { .. } => Ok(TypeId::STRING),
            Node::Variable { name } => match self.variable_type(name) {
                Some(ty) => Ok(ty),
                None => self.fail(SemanticErrorKind::UndeclaredName {
                    what: NameKind::Variable,
                    name: name.clone(),
                }),
            },
            Node::New(new) => Ok(self.table.intern(&new.class)),
            Node::FunctionCall(call) => match &call.callee {
                Callee::Named(name) => Ok(self.resolve_callable(name)?.ret),
                Callee::Context(context) => self.type_of(context),
            },
            Node::MemberAccess(access) => self.type_of(&access.object),
            Node::MethodCall(call) => self.type_of(&call.object),
            Node::IdentifierList { .. } => Ok(TypeId::IDENTIFIER_LIST),
            Node::Super => self.super_type(),
            Node::This => self.this_type(),
            Node::TypeCast(cast) => Ok(self.table.intern(&cast.ty)),
        }
    }

    /// Type of a bare name: a symbol in scope, or else an attribute the
    /// enclosing class declares or inherits.
    pub(super) fn variable_type(&self, name: &str) -> Option<TypeId> {
        if let Some(symbol) = self.table.lookup(name) {
            return Some(symbol.ty);
        }
        let ctx = self.class?;
        self.table.attribute_type(ctx.ty, name)
    }

    /// Exact type equality.
    pub(super) fn expect_same(
        &mut self,
        context: TypeContext,
        expected: TypeId,
        found: TypeId,
    ) -> Outcome {
        log::trace!(
            "{:?}: '{}' == '{}'",
            context,
            self.table.type_name(expected),
            self.table.type_name(found)
        );
        if expected == found {
            return Ok(());
        }
        self.incompatible(context, expected, found)
    }

    /// Equality, or `found` is a subclass of `expected`.
    pub(super) fn expect_assignable(
        &mut self,
        context: TypeContext,
        expected: TypeId,
        found: TypeId,
    ) -> Outcome {
        log::trace!(
            "{:?}: '{}' <- '{}'",
            context,
            self.table.type_name(expected),
            self.table.type_name(found)
        );
        if self.table.is_assignable(expected, found) {
            return Ok(());
        }
        self.incompatible(context, expected, found)
    }

    fn incompatible(&mut self, context: TypeContext, expected: TypeId, found: TypeId) -> Outcome {
        let expected = self.type_name(expected);
        let found = self.type_name(found);
        self.fail(SemanticErrorKind::TypeIncompatibility {
            context,
            expected,
            found,
        })
    }
}
