//! The symbol table: an append-only arena of symbols plus a stack of scopes.
//!
//! Frame 0 is the global scope and holds classes and free functions. The
//! analyzer pushes a frame per class body, function and nested block. Popping
//! a frame only hides its names; the symbols stay in the arena, so ids remain
//! valid and the whole table can still be dumped after analysis.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::error::TableError;
use crate::symbol::{ClassInfo, Method, Symbol, SymbolId, SymbolKind};
use crate::types::{TypeId, TypeInterner};

type Scope = HashMap<String, SymbolId>;

#[derive(Debug, Clone)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    scopes: Vec<Scope>,
    types: TypeInterner,
    capacity: Option<usize>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            symbols: Vec::new(),
            scopes: vec![Scope::new()],
            types: TypeInterner::new(),
            capacity: None,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::new()
        }
    }

    /// Total number of symbols ever added, visible or not.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn types(&self) -> &TypeInterner {
        &self.types
    }

    pub fn intern(&mut self, name: &str) -> TypeId {
        self.types.intern(name)
    }

    pub fn type_name(&self, ty: TypeId) -> &str {
        self.types.name(ty)
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::new());
    }

    /// Leaves the innermost scope. The global scope is never popped.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub fn scope_depth(&self) -> usize {
        self.scopes.len()
    }

    /// Adds a symbol to the innermost scope with `defined = false`.
    ///
    /// Fails if the table is at capacity or the innermost scope already has
    /// a symbol with this name.
    pub fn add(
        &mut self,
        name: &str,
        ty: TypeId,
        kind: SymbolKind,
    ) -> Result<SymbolId, TableError> {
        let frame = self.scopes.len() - 1;
        self.insert(frame, name, ty, kind)
    }

    /// Like [`add`](Self::add), but always targets the global scope.
    pub fn add_global(
        &mut self,
        name: &str,
        ty: TypeId,
        kind: SymbolKind,
    ) -> Result<SymbolId, TableError> {
        self.insert(0, name, ty, kind)
    }

    fn insert(
        &mut self,
        frame: usize,
        name: &str,
        ty: TypeId,
        kind: SymbolKind,
    ) -> Result<SymbolId, TableError> {
        if let Some(cap) = self.capacity {
            if self.symbols.len() >= cap {
                return Err(TableError::Full(cap));
            }
        }
        if self.scopes[frame].contains_key(name) {
            return Err(TableError::Duplicate(name.to_string()));
        }
        let id = SymbolId(self.symbols.len());
        self.symbols.push(Symbol {
            name: name.to_string(),
            ty,
            defined: false,
            kind,
        });
        self.scopes[frame].insert(name.to_string(), id);
        Ok(id)
    }

    /// Resolves a name, innermost scope first.
    pub fn find(&self, name: &str) -> Option<SymbolId> {
        self.scopes.iter().rev().find_map(|s| s.get(name).copied())
    }

    pub fn find_in_current(&self, name: &str) -> Option<SymbolId> {
        self.scopes.last().and_then(|s| s.get(name).copied())
    }

    /// Resolves a class by name. Classes only live in the global scope, so
    /// locals cannot hide them.
    pub fn find_class(&self, name: &str) -> Option<SymbolId> {
        let id = self.scopes[0].get(name).copied()?;
        self.get(id).is_class().then_some(id)
    }

    pub fn get(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.0]
    }

    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.find(name).map(|id| self.get(id))
    }

    pub fn mark_defined(&mut self, id: SymbolId) {
        self.symbols[id.0].defined = true;
    }

    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols.iter().enumerate().map(|(i, s)| (SymbolId(i), s))
    }

    /// Metadata of a registered class type.
    pub fn class_info(&self, class: TypeId) -> Option<&ClassInfo> {
        let id = self.find_class(self.types.name(class))?;
        self.get(id).as_class()
    }

    pub fn is_class(&self, ty: TypeId) -> bool {
        self.class_info(ty).is_some()
    }

    /// Resolves a type name usable in a declaration: a built-in scalar or a
    /// registered class.
    pub fn known_type(&self, name: &str) -> Option<TypeId> {
        let ty = self.types.get(name)?;
        (ty.is_builtin_scalar() || self.is_class(ty)).then_some(ty)
    }

    /// Parent chain of `class`, nearest first. A class without a declared
    /// parent descends from `Object`. Stops at unregistered classes and never
    /// revisits a class, so cyclic chains terminate.
    pub fn ancestors(&self, class: TypeId) -> Ancestors<'_> {
        let start = self.is_class(class).then_some(class);
        Ancestors {
            table: self,
            current: start,
            seen: HashSet::from([class]),
        }
    }

    /// True if following declared parents from `class` leads back to it.
    pub fn in_cycle(&self, class: TypeId) -> bool {
        let mut seen = HashSet::new();
        let mut current = class;
        while let Some(parent) = self.class_info(current).and_then(|info| info.parent) {
            if parent == class {
                return true;
            }
            if !seen.insert(parent) {
                return false;
            }
            current = parent;
        }
        false
    }

    fn lineage(&self, class: TypeId) -> impl Iterator<Item = &ClassInfo> {
        std::iter::once(class)
            .chain(self.ancestors(class))
            .filter_map(move |c| self.class_info(c))
    }

    /// Type of a member of `class`, searching attributes, then methods, then
    /// the parent chain. Methods report [`TypeId::FUNCTION`].
    pub fn member_type(&self, class: TypeId, member: &str) -> Option<TypeId> {
        self.lineage(class).find_map(|info| {
            if let Some(attr) = info.attributes.iter().find(|a| a.name == member) {
                Some(attr.ty)
            } else if info.methods.iter().any(|m| m.name == member) {
                Some(TypeId::FUNCTION)
            } else {
                None
            }
        })
    }

    /// Type of an attribute declared by `class` or inherited from an ancestor.
    /// Methods are not considered.
    pub fn attribute_type(&self, class: TypeId, name: &str) -> Option<TypeId> {
        self.lineage(class)
            .find_map(|info| info.attributes.iter().find(|a| a.name == name))
            .map(|a| a.ty)
    }

    pub fn member_exists(&self, class: TypeId, member: &str) -> bool {
        self.lineage(class).any(|info| {
            info.attributes.iter().any(|a| a.name == member)
                || info.methods.iter().any(|m| m.name == member)
        })
    }

    /// Signature of a method of `class` or one of its ancestors.
    pub fn find_method(&self, class: TypeId, name: &str) -> Option<&Method> {
        self.lineage(class)
            .find_map(|info| info.methods.iter().find(|m| m.name == name))
    }

    /// Nominal compatibility: identical types, or `right` descends from `left`.
    pub fn is_assignable(&self, left: TypeId, right: TypeId) -> bool {
        left == right || self.ancestors(right).any(|a| a == left)
    }

    pub fn dump(&self) -> TableDump<'_> {
        TableDump { table: self }
    }
}

pub struct Ancestors<'a> {
    table: &'a SymbolTable,
    current: Option<TypeId>,
    seen: HashSet<TypeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = TypeId;

    fn next(&mut self) -> Option<TypeId> {
        let current = self.current.take()?;
        let info = self.table.class_info(current)?;
        let next = info.parent.unwrap_or(TypeId::OBJECT);
        if !self.seen.insert(next) {
            return None;
        }
        self.current = Some(next);
        Some(next)
    }
}

/// Human-readable listing of every symbol in the table.
pub struct TableDump<'a> {
    table: &'a SymbolTable,
}

impl fmt::Display for TableDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let types = &self.table.types;
        writeln!(f, "------ Symbol Table ------")?;
        for (_, sym) in self.table.iter() {
            writeln!(f, "Name: {}", sym.name)?;
            writeln!(f, "  Type: {}", types.display(sym.ty))?;
            writeln!(f, "  Defined: {}", if sym.defined { "Yes" } else { "No" })?;
            writeln!(f, "  Symbol Type: {}", sym.kind.label())?;
            match &sym.kind {
                SymbolKind::Function(sig) => {
                    writeln!(f, "  Parameters ({}):", sig.param_count())?;
                    for p in &sig.params {
                        writeln!(f, "    - {}", types.display(*p))?;
                    }
                }
                SymbolKind::Class(info) => {
                    let parent = info.parent.map(|p| types.name(p)).unwrap_or("None");
                    writeln!(f, "  Parent Class: {}", parent)?;
                    writeln!(f, "  Attributes ({}):", info.attributes.len())?;
                    for a in &info.attributes {
                        writeln!(f, "    - {}:{}", a.name, types.display(a.ty))?;
                    }
                    writeln!(f, "  Methods ({}):", info.methods.len())?;
                    for m in &info.methods {
                        writeln!(f, "    - {}", m.name)?;
                    }
                }
                SymbolKind::Object => {}
            }
            writeln!(f, "--------------------------")?;
        }
        write!(f, "------ End of Table ------")
    }
}
