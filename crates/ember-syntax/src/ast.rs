//! AST (abstract syntax tree) types for the Ember language.
//!
//! The tree is produced by an external parser and consumed by the semantic
//! analyzer. Ownership is strictly top-down: a [`Program`] owns its classes
//! and functions, every node owns its children, and sibling sequences are
//! plain vectors. There are no back links.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Binary operators, including assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOperator {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
}

impl BinaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Assign => "=",
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Lt => "<",
            BinaryOperator::Gt => ">",
            BinaryOperator::Le => "<=",
            BinaryOperator::Ge => ">=",
            BinaryOperator::Eq => "==",
            BinaryOperator::Ne => "!=",
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOperator {
    Negate,
    Not,
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOperator::Negate => f.write_str("-"),
            UnaryOperator::Not => f.write_str("!"),
        }
    }
}

/// Entire compilation unit: classes first, then free functions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    #[serde(default)]
    pub classes: Vec<Class>,
    #[serde(default)]
    pub functions: Vec<Function>,
}

impl Program {
    pub fn new(classes: Vec<Class>, functions: Vec<Function>) -> Self {
        Self { classes, functions }
    }
}

/// Class definition with an optional parent class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default)]
    pub members: Vec<Member>,
}

impl Class {
    pub fn new(name: impl Into<String>, parent: Option<&str>, members: Vec<Member>) -> Self {
        Self {
            name: name.into(),
            parent: parent.map(str::to_string),
            members,
        }
    }

    /// Field declarations in member order.
    pub fn fields(&self) -> impl Iterator<Item = &Declaration> {
        self.members.iter().filter_map(|m| match m {
            Member::Field(d) => Some(d),
            Member::Method(_) => None,
        })
    }

    /// Method definitions in member order.
    pub fn methods(&self) -> impl Iterator<Item = &Function> {
        self.members.iter().filter_map(|m| match m {
            Member::Method(f) => Some(f),
            Member::Field(_) => None,
        })
    }
}

/// A class member: either an attribute declaration or a method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Member {
    Field(Declaration),
    Method(Function),
}

/// Function or method definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub return_type: String,
    #[serde(default)]
    pub params: Vec<Declaration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Block>,
}

impl Function {
    pub fn new(
        name: impl Into<String>,
        return_type: impl Into<String>,
        params: Vec<Declaration>,
        body: Option<Block>,
    ) -> Self {
        Self {
            name: name.into(),
            return_type: return_type.into(),
            params,
            body,
        }
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }
}

/// Variable, parameter or attribute declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declaration {
    #[serde(rename = "type")]
    pub ty: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub init: Option<Box<Node>>,
}

impl Declaration {
    pub fn new(ty: impl Into<String>, name: impl Into<String>, init: Option<Node>) -> Self {
        Self {
            ty: ty.into(),
            name: name.into(),
            init: init.map(Box::new),
        }
    }
}

/// Sequence of statements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    #[serde(default)]
    pub statements: Vec<Node>,
}

impl Block {
    pub fn new(statements: Vec<Node>) -> Self {
        Self { statements }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct If {
    pub condition: Box<Node>,
    pub then_block: Block,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub else_block: Option<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct While {
    pub condition: Box<Node>,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Return {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Box<Node>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Print {
    #[serde(default)]
    pub args: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binary {
    pub op: BinaryOperator,
    pub left: Box<Node>,
    pub right: Box<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unary {
    pub op: UnaryOperator,
    pub operand: Box<Node>,
}

/// Literal with its raw text and the literal's type name (`int`, `float`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Literal {
    pub value: String,
    #[serde(rename = "type")]
    pub ty: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct New {
    pub class: String,
    #[serde(default)]
    pub args: Vec<Node>,
}

/// What a call is made on: a plain name, or a compound expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Callee {
    Named(String),
    Context(Box<Node>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub callee: Callee,
    #[serde(default)]
    pub args: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberAccess {
    pub object: Box<Node>,
    pub member: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    pub object: Box<Node>,
    pub method: String,
    #[serde(default)]
    pub args: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeCast {
    #[serde(rename = "type")]
    pub ty: String,
    pub expr: Box<Node>,
}

/// Every kind of node the parser can produce.
///
/// Statements and expressions share this type: a block holds arbitrary
/// nodes, and the analyzer decides per variant what is meaningful.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Program(Program),
    Class(Class),
    Function(Function),
    Declaration(Declaration),
    Block(Block),
    If(If),
    While(While),
    Return(Return),
    Print(Print),
    BinaryOp(Binary),
    UnaryOp(Unary),
    Literal(Literal),
    StringLiteral { value: String },
    Variable { name: String },
    New(New),
    FunctionCall(FunctionCall),
    MemberAccess(MemberAccess),
    MethodCall(MethodCall),
    IdentifierList { names: Vec<String> },
    Super,
    This,
    TypeCast(TypeCast),
}

impl Node {
    pub fn declaration(ty: impl Into<String>, name: impl Into<String>, init: Option<Node>) -> Self {
        Node::Declaration(Declaration::new(ty, name, init))
    }

    pub fn block(statements: Vec<Node>) -> Self {
        Node::Block(Block::new(statements))
    }

    pub fn if_stmt(condition: Node, then_block: Block, else_block: Option<Block>) -> Self {
        Node::If(If {
            condition: Box::new(condition),
            then_block,
            else_block,
        })
    }

    pub fn while_loop(condition: Node, body: Block) -> Self {
        Node::While(While {
            condition: Box::new(condition),
            body,
        })
    }

    pub fn ret(value: Option<Node>) -> Self {
        Node::Return(Return {
            value: value.map(Box::new),
        })
    }

    pub fn print(args: Vec<Node>) -> Self {
        Node::Print(Print { args })
    }

    pub fn binary(op: BinaryOperator, left: Node, right: Node) -> Self {
        Node::BinaryOp(Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn assign(target: Node, value: Node) -> Self {
        Node::binary(BinaryOperator::Assign, target, value)
    }

    pub fn unary(op: UnaryOperator, operand: Node) -> Self {
        Node::UnaryOp(Unary {
            op,
            operand: Box::new(operand),
        })
    }

    pub fn literal(value: impl Into<String>, ty: impl Into<String>) -> Self {
        Node::Literal(Literal {
            value: value.into(),
            ty: ty.into(),
        })
    }

    pub fn int(value: i64) -> Self {
        Node::literal(value.to_string(), "int")
    }

    pub fn float(value: f64) -> Self {
        Node::literal(value.to_string(), "float")
    }

    pub fn string(value: impl Into<String>) -> Self {
        Node::StringLiteral {
            value: value.into(),
        }
    }

    pub fn var(name: impl Into<String>) -> Self {
        Node::Variable { name: name.into() }
    }

    pub fn new_object(class: impl Into<String>, args: Vec<Node>) -> Self {
        Node::New(New {
            class: class.into(),
            args,
        })
    }

    pub fn call(name: impl Into<String>, args: Vec<Node>) -> Self {
        Node::FunctionCall(FunctionCall {
            callee: Callee::Named(name.into()),
            args,
        })
    }

    /// A call whose callee is itself an expression, e.g. `a.b(...)` as the
    /// parser sees it before method resolution.
    pub fn call_on(context: Node, args: Vec<Node>) -> Self {
        Node::FunctionCall(FunctionCall {
            callee: Callee::Context(Box::new(context)),
            args,
        })
    }

    pub fn member(object: Node, member: impl Into<String>) -> Self {
        Node::MemberAccess(MemberAccess {
            object: Box::new(object),
            member: member.into(),
        })
    }

    pub fn method_call(object: Node, method: impl Into<String>, args: Vec<Node>) -> Self {
        Node::MethodCall(MethodCall {
            object: Box::new(object),
            method: method.into(),
            args,
        })
    }

    pub fn identifiers<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Node::IdentifierList {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn cast(ty: impl Into<String>, expr: Node) -> Self {
        Node::TypeCast(TypeCast {
            ty: ty.into(),
            expr: Box::new(expr),
        })
    }

    /// Short lowercase name of the variant, used in traces and diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Program(_) => "program",
            Node::Class(_) => "class",
            Node::Function(_) => "function",
            Node::Declaration(_) => "declaration",
            Node::Block(_) => "block",
            Node::If(_) => "if",
            Node::While(_) => "while",
            Node::Return(_) => "return",
            Node::Print(_) => "print",
            Node::BinaryOp(_) => "binary_op",
            Node::UnaryOp(_) => "unary_op",
            Node::Literal(_) => "literal",
            Node::StringLiteral { .. } => "string_literal",
            Node::Variable { .. } => "variable",
            Node::New(_) => "new",
            Node::FunctionCall(_) => "function_call",
            Node::MemberAccess(_) => "member_access",
            Node::MethodCall(_) => "method_call",
            Node::IdentifierList { .. } => "identifier_list",
            Node::Super => "super",
            Node::This => "this",
            Node::TypeCast(_) => "type_cast",
        }
    }
}

impl From<Program> for Node {
    fn from(p: Program) -> Self {
        Node::Program(p)
    }
}

impl From<Class> for Node {
    fn from(c: Class) -> Self {
        Node::Class(c)
    }
}

impl From<Function> for Node {
    fn from(f: Function) -> Self {
        Node::Function(f)
    }
}

/// Appends `node` to the end of a sibling list and hands the list back.
///
/// Grammar actions build lists incrementally with this.
pub fn append<T>(mut list: Vec<T>, node: T) -> Vec<T> {
    list.push(node);
    list
}
