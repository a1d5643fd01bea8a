use ember_syntax::{Class, Declaration, Function, Member, Node, Program};

use super::{Analyzer, ClassContext, Outcome};
use crate::error::{NameKind, SemanticErrorKind, TypeContext};
use crate::symbol::{FunctionSig, Method, SymbolKind};
use crate::types::TypeId;

impl Analyzer<'_> {
    /// Analyzes every class, then every free function. Classes and
    /// functions are independent of each other; no scope is shared.
    pub fn analyze_program(&mut self, program: &Program) -> Outcome {
        let classes = self.walk(&program.classes, |a, c| a.analyze_class(c));
        let functions = self.walk(&program.functions, |a, f| a.analyze_function(f));
        classes.and(functions)
    }

    pub(super) fn analyze_class(&mut self, class: &Class) -> Outcome {
        log::debug!("Analyzing class '{}'", class.name);
        self.ensure_root_class();

        let Some(id) = self.table.find_class(&class.name) else {
            return self.fail(SemanticErrorKind::UndeclaredName {
                what: NameKind::Class,
                name: class.name.clone(),
            });
        };
        let parent = match class.parent.as_deref() {
            Some(parent) if self.table.find_class(parent).is_some() => self.table.intern(parent),
            Some(parent) => {
                return self.fail(SemanticErrorKind::UndeclaredName {
                    what: NameKind::Class,
                    name: parent.to_string(),
                })
            }
            None => TypeId::OBJECT,
        };
        let ty = self.table.intern(&class.name);

        let outer = self.class.replace(ClassContext { ty, parent });
        self.path.push(class.name.clone());
        let result = self.scoped(|a| {
            let methods = a.declare_methods(ty);
            let members = a.walk(&class.members, |a, member| match member {
                Member::Field(decl) => a.analyze_declaration(decl),
                Member::Method(func) => a.analyze_function(func),
            });
            methods.and(members)
        });
        self.path.pop();
        self.class = outer;

        if result.is_ok() {
            self.table.mark_defined(id);
        }
        result
    }

    /// Makes every method of `class` callable by bare name inside its body.
    fn declare_methods(&mut self, class: TypeId) -> Outcome {
        let methods: Vec<Method> = self
            .table
            .class_info(class)
            .map(|info| info.methods.clone())
            .unwrap_or_default();
        self.walk(&methods, |a, method| {
            let kind = SymbolKind::Function(FunctionSig {
                params: method.params.clone(),
            });
            match a.table.add(&method.name, method.ret, kind) {
                Ok(_) => Ok(()),
                Err(e) => a.fail(e.into()),
            }
        })
    }

    pub(super) fn analyze_function(&mut self, func: &Function) -> Outcome {
        log::debug!("Analyzing function '{}'", func.name);
        self.path.push(func.name.clone());
        // Parameters and top-level body statements share one frame.
        let result = self.scoped(|a| {
            let ret = match a.table.known_type(&func.return_type) {
                Some(_) => Ok(()),
                None => a.fail(SemanticErrorKind::UnknownType {
                    ty: func.return_type.clone(),
                    name: func.name.clone(),
                }),
            };
            let params = a.walk(&func.params, |a, p| a.analyze_declaration(p));
            let body = match &func.body {
                Some(body) => a.walk(&body.statements, |a, s| a.analyze(s)),
                None => Ok(()),
            };
            ret.and(params).and(body)
        });
        self.path.pop();

        if result.is_ok() {
            if let Some(id) = self.table.find(&func.name) {
                if self.table.get(id).is_function() {
                    self.table.mark_defined(id);
                }
            }
        }
        result
    }

    /// Checks the declared type, the name, and the initializer, then
    /// registers the name in the innermost scope.
    pub(super) fn analyze_declaration(&mut self, decl: &Declaration) -> Outcome {
        let declared = match self.table.known_type(&decl.ty) {
            Some(ty) => Ok(ty),
            None => self.fail(SemanticErrorKind::UnknownType {
                ty: decl.ty.clone(),
                name: decl.name.clone(),
            }),
        };
        if self.table.find_in_current(&decl.name).is_some() {
            return self.fail(SemanticErrorKind::DuplicateDeclaration {
                name: decl.name.clone(),
            });
        }

        let init = match (decl.init.as_deref(), declared) {
            (Some(init), Ok(ty)) => self.check_initializer(&decl.name, ty, init),
            (Some(init), Err(_)) => self.analyze(init),
            (None, _) => Ok(()),
        };

        // Registered even when a check above failed, so later uses of the
        // name do not cascade into undeclared-variable errors.
        let ty = match declared {
            Ok(ty) => ty,
            Err(_) => self.table.intern(&decl.ty),
        };
        let registered = match self.table.add(&decl.name, ty, SymbolKind::Object) {
            Ok(_) => Ok(()),
            Err(e) => self.fail(e.into()),
        };

        declared.map(drop).and(init).and(registered)
    }

    fn check_initializer(&mut self, name: &str, declared: TypeId, init: &Node) -> Outcome {
        self.analyze(init)?;
        let found = self.type_of(init)?;
        self.expect_same(TypeContext::Initializer(name.to_string()), declared, found)
    }
}
