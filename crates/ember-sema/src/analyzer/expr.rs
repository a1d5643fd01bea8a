use ember_syntax::{
    Binary, BinaryOperator, Callee, FunctionCall, MemberAccess, MethodCall, New, Node, TypeCast,
};

use super::{Analyzer, Outcome};
use crate::error::{NameKind, SemanticErrorKind, TypeContext};
use crate::types::TypeId;

/// What the analyzer needs to know about a callable.
pub(super) struct Signature {
    pub params: Vec<TypeId>,
    pub ret: TypeId,
}

impl Analyzer<'_> {
    /// The right operand is analyzed first for every operator.
    pub(super) fn analyze_binary(&mut self, bin: &Binary) -> Outcome {
        self.analyze(&bin.right)?;
        if bin.op == BinaryOperator::Assign {
            return self.check_assignment(&bin.left, &bin.right);
        }
        self.analyze(&bin.left)?;
        let left = self.type_of(&bin.left)?;
        let right = self.type_of(&bin.right)?;
        self.expect_same(TypeContext::Operation(bin.op), left, right)
    }

    fn check_assignment(&mut self, target: &Node, value: &Node) -> Outcome {
        let expected = match target {
            Node::MemberAccess(access) => self.member_target_type(access)?,
            other => self.type_of(other)?,
        };
        let found = self.type_of(value)?;
        self.expect_assignable(TypeContext::Assignment, expected, found)
    }

    /// Type of the field written by `object.member = ...`. Only a plain
    /// variable may stand on the left of the dot.
    fn member_target_type(&mut self, access: &MemberAccess) -> Outcome<TypeId> {
        let class = match access.object.as_ref() {
            Node::Variable { name } => match self.variable_type(name) {
                Some(ty) => ty,
                None => {
                    return self.fail(SemanticErrorKind::UndeclaredName {
                        what: NameKind::Object,
                        name: name.clone(),
                    })
                }
            },
            _ => {
                return self.fail(SemanticErrorKind::InvalidAssignmentTarget {
                    member: access.member.clone(),
                })
            }
        };
        match self.table.member_type(class, &access.member) {
            Some(ty) => Ok(ty),
            None => self.unresolved_member(class, &access.member),
        }
    }

    pub(super) fn analyze_call(&mut self, call: &FunctionCall) -> Outcome {
        match &call.callee {
            Callee::Named(name) => {
                let sig = self.resolve_callable(name)?;
                self.check_arguments(name, &sig.params, &call.args)
            }
            Callee::Context(context) => match context.as_ref() {
                Node::MemberAccess(access) => {
                    self.check_method(&access.object, &access.member, &call.args)
                }
                other => {
                    self.analyze(other)?;
                    self.fail(SemanticErrorKind::NotCallable {
                        name: other.kind_name().to_string(),
                    })
                }
            },
        }
    }

    /// Resolves a bare callee name: a function in scope, or a method the
    /// enclosing class inherits.
    pub(super) fn resolve_callable(&mut self, name: &str) -> Outcome<Signature> {
        let scoped = self.table.lookup(name).map(|symbol| {
            symbol.as_function().map(|sig| Signature {
                params: sig.params.clone(),
                ret: symbol.ty,
            })
        });
        match scoped {
            Some(Some(sig)) => return Ok(sig),
            Some(None) => {
                return self.fail(SemanticErrorKind::NotCallable {
                    name: name.to_string(),
                })
            }
            None => {}
        }
        let inherited = self
            .class
            .and_then(|ctx| self.table.find_method(ctx.ty, name))
            .map(|m| Signature {
                params: m.params.clone(),
                ret: m.ret,
            });
        match inherited {
            Some(sig) => Ok(sig),
            None => self.fail(SemanticErrorKind::UndeclaredName {
                what: NameKind::Function,
                name: name.to_string(),
            }),
        }
    }

    /// Arity first, then each argument is analyzed, then argument types are
    /// matched positionally. Every mismatching position is reported.
    fn check_arguments(&mut self, function: &str, params: &[TypeId], args: &[Node]) -> Outcome {
        if args.len() != params.len() {
            return self.fail(SemanticErrorKind::ArityMismatch {
                function: function.to_string(),
                expected: params.len(),
                found: args.len(),
            });
        }
        for arg in args {
            self.analyze(arg)?;
        }
        let mut result = Ok(());
        for (i, (arg, &expected)) in args.iter().zip(params).enumerate() {
            if self.halted {
                return Err(super::Failed);
            }
            let found = self.type_of(arg)?;
            let context = TypeContext::Argument {
                position: i + 1,
                function: function.to_string(),
            };
            if self.expect_same(context, expected, found).is_err() {
                result = Err(super::Failed);
            }
        }
        result
    }

    fn check_method(&mut self, object: &Node, method: &str, args: &[Node]) -> Outcome {
        let class = self.object_class(object)?;
        let Some(params) = self.table.find_method(class, method).map(|m| m.params.clone()) else {
            if self.table.member_exists(class, method) {
                return self.fail(SemanticErrorKind::NotCallable {
                    name: method.to_string(),
                });
            }
            return self.unresolved_member(class, method);
        };
        self.check_arguments(method, &params, args)
    }

    pub(super) fn analyze_method_call(&mut self, call: &MethodCall) -> Outcome {
        self.check_method(&call.object, &call.method, &call.args)
    }

    pub(super) fn analyze_member_access(&mut self, access: &MemberAccess) -> Outcome {
        let class = self.object_class(&access.object)?;
        if self.table.member_exists(class, &access.member) {
            return Ok(());
        }
        self.unresolved_member(class, &access.member)
    }

    /// Class of the object on the left of a dot. `this` resolves to the
    /// enclosing class without further analysis.
    fn object_class(&mut self, object: &Node) -> Outcome<TypeId> {
        if let Node::This = object {
            return self.this_type();
        }
        self.analyze(object)?;
        let ty = self.type_of(object)?;
        if self.table.is_class(ty) {
            return Ok(ty);
        }
        let ty = self.type_name(ty);
        self.fail(SemanticErrorKind::NotAClass { ty })
    }

    fn unresolved_member<T>(&mut self, class: TypeId, member: &str) -> Outcome<T> {
        let ty = self.type_name(class);
        self.fail(SemanticErrorKind::UnresolvedMember {
            ty,
            member: member.to_string(),
        })
    }

    pub(super) fn analyze_new(&mut self, new: &New) -> Outcome {
        if self.table.find_class(&new.class).is_none() {
            return self.fail(SemanticErrorKind::UndeclaredName {
                what: NameKind::Class,
                name: new.class.clone(),
            });
        }
        self.walk(&new.args, |a, arg| a.analyze(arg))
    }

    pub(super) fn analyze_cast(&mut self, cast: &TypeCast) -> Outcome {
        if self.table.known_type(&cast.ty).is_none() {
            return self.fail(SemanticErrorKind::UnknownType {
                ty: cast.ty.clone(),
                name: "cast".to_string(),
            });
        }
        self.analyze(&cast.expr)
    }

    pub(super) fn this_type(&mut self) -> Outcome<TypeId> {
        match self.class {
            Some(ctx) => Ok(ctx.ty),
            None => self.fail(SemanticErrorKind::MissingContext { keyword: "this" }),
        }
    }

    pub(super) fn super_type(&mut self) -> Outcome<TypeId> {
        match self.class {
            Some(ctx) => Ok(ctx.parent),
            None => self.fail(SemanticErrorKind::MissingContext { keyword: "super" }),
        }
    }
}
