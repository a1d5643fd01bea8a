//! Interned type identifiers.
//!
//! Every type name the analyzer sees (built-in scalars, class names, and the
//! handful of pseudo types produced by inference) is interned once. Type
//! equality is then a `u32` comparison.

use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    pub const INT: TypeId = TypeId(0);
    pub const FLOAT: TypeId = TypeId(1);
    pub const CHAR: TypeId = TypeId(2);
    pub const VOID: TypeId = TypeId(3);
    pub const STRING: TypeId = TypeId(4);
    /// Type of a statement block used as a value.
    pub const BLOCK: TypeId = TypeId(5);
    /// Type of a class definition used as a value; also the type of class symbols.
    pub const CLASS: TypeId = TypeId(6);
    /// Member type reported for methods by member lookup.
    pub const FUNCTION: TypeId = TypeId(7);
    pub const IDENTIFIER_LIST: TypeId = TypeId(8);
    /// The synthetic root of every class hierarchy.
    pub const OBJECT: TypeId = TypeId(9);

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// One of the scalar types a declaration may name without a class.
    pub fn is_builtin_scalar(self) -> bool {
        self.0 <= TypeId::STRING.0
    }
}

const PREINTERNED: [&str; 10] = [
    "int",
    "float",
    "char",
    "void",
    "string",
    "block",
    "class",
    "function",
    "identifier_list",
    "Object",
];

/// The built-in scalar type names, in `TypeId` order.
pub const BUILTIN_SCALARS: [&str; 5] = ["int", "float", "char", "void", "string"];

#[derive(Debug, Clone)]
pub struct TypeInterner {
    map: HashMap<String, TypeId>,
    names: Vec<String>,
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeInterner {
    pub fn new() -> Self {
        let mut interner = Self {
            map: HashMap::new(),
            names: Vec::with_capacity(PREINTERNED.len()),
        };
        for name in PREINTERNED {
            interner.intern(name);
        }
        interner
    }

    pub fn intern(&mut self, name: &str) -> TypeId {
        if let Some(&id) = self.map.get(name) {
            return id;
        }
        let id = TypeId(self.names.len() as u32);
        self.names.push(name.to_string());
        self.map.insert(name.to_string(), id);
        id
    }

    /// Looks a name up without interning it.
    pub fn get(&self, name: &str) -> Option<TypeId> {
        self.map.get(name).copied()
    }

    pub fn name(&self, id: TypeId) -> &str {
        &self.names[id.index()]
    }

    /// Adapter for `{}` formatting of a type id.
    pub fn display(&self, id: TypeId) -> DisplayType<'_> {
        DisplayType { interner: self, id }
    }
}

pub struct DisplayType<'a> {
    interner: &'a TypeInterner,
    id: TypeId,
}

impl fmt::Display for DisplayType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.interner.name(self.id))
    }
}
