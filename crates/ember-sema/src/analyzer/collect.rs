use std::collections::HashSet;

use ember_syntax::{Class, Function, Program};

use super::{Analyzer, Outcome};
use crate::error::SemanticErrorKind;
use crate::symbol::{Attribute, ClassInfo, FunctionSig, Method, SymbolKind};
use crate::types::TypeId;

impl Analyzer<'_> {
    /// Registers every class and free function of `program` in the global
    /// scope, then rejects cyclic parent chains.
    ///
    /// Must run before [`analyze_program`](Self::analyze_program): the
    /// analyzer only resolves names that are already in the table.
    pub fn collect(&mut self, program: &Program) -> Outcome {
        let classes = self.walk(&program.classes, |a, c| a.register_class(c));
        let functions = self.walk(&program.functions, |a, f| a.register_function(f));
        let cycles = self.check_cycles(&program.classes);
        classes.and(functions).and(cycles)
    }

    fn register_class(&mut self, class: &Class) -> Outcome {
        let parent = class.parent.as_deref().map(|p| self.table.intern(p));
        let attributes = class
            .fields()
            .map(|field| Attribute {
                name: field.name.clone(),
                ty: self.table.intern(&field.ty),
            })
            .collect();
        let methods = class.methods().map(|m| self.signature(m)).collect();
        self.table.intern(&class.name);

        let info = ClassInfo { parent, attributes, methods };
        match self.table.add_global(&class.name, TypeId::CLASS, SymbolKind::Class(info)) {
            Ok(_) => {
                log::debug!("Class '{}' added to the symbol table", class.name);
                Ok(())
            }
            Err(e) => self.fail(e.into()),
        }
    }

    fn register_function(&mut self, function: &Function) -> Outcome {
        let Method { params, ret, .. } = self.signature(function);
        let kind = SymbolKind::Function(FunctionSig { params });
        match self.table.add_global(&function.name, ret, kind) {
            Ok(_) => {
                log::debug!("Function '{}' added to the symbol table", function.name);
                Ok(())
            }
            Err(e) => self.fail(e.into()),
        }
    }

    fn signature(&mut self, function: &Function) -> Method {
        Method {
            name: function.name.clone(),
            params: function.params.iter().map(|p| self.table.intern(&p.ty)).collect(),
            ret: self.table.intern(&function.return_type),
        }
    }

    fn check_cycles(&mut self, classes: &[Class]) -> Outcome {
        let mut seen = HashSet::new();
        let mut result = Ok(());
        for class in classes {
            if self.halted {
                return Err(super::Failed);
            }
            if !seen.insert(class.name.as_str()) {
                continue;
            }
            let ty = self.table.intern(&class.name);
            if self.table.in_cycle(ty) {
                result = self.fail(SemanticErrorKind::CyclicInheritance {
                    class: class.name.clone(),
                });
            }
        }
        result
    }
}
