//! Symbol records stored in the [`SymbolTable`](crate::SymbolTable).

use crate::types::TypeId;

/// Index of a symbol in the table's arena. Stable for the table's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(pub(crate) usize);

impl SymbolId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    /// Declared type for objects, return type for functions, `class` for classes.
    pub ty: TypeId,
    /// Set once the body of a class or function has been analyzed.
    pub defined: bool,
    pub kind: SymbolKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SymbolKind {
    /// A variable, parameter or attribute.
    Object,
    Function(FunctionSig),
    Class(ClassInfo),
}

impl SymbolKind {
    pub fn label(&self) -> &'static str {
        match self {
            SymbolKind::Object => "Object",
            SymbolKind::Function(_) => "Function",
            SymbolKind::Class(_) => "Class",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FunctionSig {
    /// Parameter types in declaration order.
    pub params: Vec<TypeId>,
}

impl FunctionSig {
    pub fn param_count(&self) -> usize {
        self.params.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassInfo {
    pub parent: Option<TypeId>,
    pub attributes: Vec<Attribute>,
    pub methods: Vec<Method>,
}

/// A `name:type` attribute entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub ty: TypeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: String,
    pub params: Vec<TypeId>,
    pub ret: TypeId,
}

impl Symbol {
    pub fn is_function(&self) -> bool {
        matches!(self.kind, SymbolKind::Function(_))
    }

    pub fn is_class(&self) -> bool {
        matches!(self.kind, SymbolKind::Class(_))
    }

    pub fn as_function(&self) -> Option<&FunctionSig> {
        match &self.kind {
            SymbolKind::Function(sig) => Some(sig),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<&ClassInfo> {
        match &self.kind {
            SymbolKind::Class(info) => Some(info),
            _ => None,
        }
    }
}
