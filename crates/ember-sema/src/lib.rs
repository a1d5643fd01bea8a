//! Ember semantic analysis: symbol table, declaration collection and the
//! type-checking pass over the AST.
//!
//! The usual entry point is [`check`], which builds a fresh [`SymbolTable`],
//! registers every class and free function, and then analyzes the program.
//! Diagnostics are collected in a [`Report`] rather than printed.

pub mod analyzer;
pub mod error;
pub mod options;
pub mod symbol;
pub mod table;
pub mod types;

pub use analyzer::{Analyzer, Failed, Outcome, ROOT_CLASS};
pub use error::{NameKind, SemanticError, SemanticErrorKind, TableError, TypeContext};
pub use options::{ErrorPolicy, Options, DEFAULT_MAX_DEPTH};
pub use symbol::{Attribute, ClassInfo, FunctionSig, Method, Symbol, SymbolId, SymbolKind};
pub use table::SymbolTable;
pub use types::{TypeId, TypeInterner};

use ember_syntax::Program;

/// Result of checking one program.
#[derive(Debug)]
pub struct Report {
    pub diagnostics: Vec<SemanticError>,
    /// The table as it stood when analysis ended.
    pub table: SymbolTable,
}

impl Report {
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// `0` when the program was accepted, `-1` otherwise.
    pub fn status(&self) -> i32 {
        if self.is_ok() {
            0
        } else {
            -1
        }
    }
}

/// Collects declarations from `program` and analyzes it.
pub fn check(program: &Program, options: Options) -> Report {
    let mut table = match options.capacity {
        Some(capacity) => SymbolTable::with_capacity(capacity),
        None => SymbolTable::new(),
    };
    let mut analyzer = Analyzer::new(&mut table, options);
    let verdict = analyzer.collect(program).and(analyzer.analyze_program(program));
    let diagnostics = analyzer.finish();
    log::debug!(
        "analysis {} with {} diagnostic(s)",
        if verdict.is_ok() { "passed" } else { "failed" },
        diagnostics.len()
    );
    Report { diagnostics, table }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_syntax::{
        BinaryOperator, Block, Class, Declaration, Function, Member, Node, UnaryOperator,
    };

    fn func(name: &str, ret: &str, params: &[(&str, &str)], body: Vec<Node>) -> Function {
        let params = params
            .iter()
            .map(|(ty, name)| Declaration::new(*ty, *name, None))
            .collect();
        Function::new(name, ret, params, Some(Block::new(body)))
    }

    fn main(body: Vec<Node>) -> Function {
        func("main", "void", &[], body)
    }

    fn field(ty: &str, name: &str) -> Member {
        Member::Field(Declaration::new(ty, name, None))
    }

    fn method(f: Function) -> Member {
        Member::Method(f)
    }

    /// `Animal { string name; void speak(); int legs(int n) }` and an empty
    /// `Dog : Animal`.
    fn animals() -> Vec<Class> {
        vec![
            Class::new(
                "Animal",
                None,
                vec![
                    field("string", "name"),
                    method(func("speak", "void", &[], vec![])),
                    method(func(
                        "legs",
                        "int",
                        &[("int", "n")],
                        vec![Node::ret(Some(Node::var("n")))],
                    )),
                ],
            ),
            Class::new("Dog", Some("Animal"), vec![]),
        ]
    }

    fn codes(report: &Report) -> Vec<&'static str> {
        report.diagnostics.iter().map(|d| d.kind.code()).collect()
    }

    fn expect_ok(program: &Program) -> Report {
        let report = check(program, Options::default());
        assert!(report.is_ok(), "unexpected diagnostics: {:?}", report.diagnostics);
        report
    }

    fn expect_codes(program: &Program, expected: &[&str]) -> Report {
        let report = check(program, Options::default());
        assert_eq!(codes(&report), expected, "diagnostics: {:?}", report.diagnostics);
        report
    }

    #[test]
    fn test_empty_program_is_accepted() {
        let report = expect_ok(&Program::default());
        assert_eq!(report.status(), 0);
        assert!(report.table.is_empty());
    }

    #[test]
    fn test_unknown_declared_type() {
        let program = Program::new(
            vec![],
            vec![main(vec![Node::declaration("Widget", "w", None)])],
        );
        let report = expect_codes(&program, &["UnknownType"]);
        assert_eq!(report.status(), -1);
        assert_eq!(report.diagnostics[0].within.as_deref(), Some("main"));
    }

    #[test]
    fn test_initializer_types_are_nominal() {
        let program = Program::new(
            vec![],
            vec![main(vec![Node::declaration("int", "x", Some(Node::float(1.5)))])],
        );
        let report = expect_codes(&program, &["TypeIncompatibility"]);
        assert_eq!(
            report.diagnostics[0].kind.to_string(),
            "Incompatible types when initializing 'x': expected 'int', found 'float'"
        );

        let program = Program::new(
            vec![],
            vec![main(vec![
                Node::declaration("float", "y", Some(Node::float(1.5))),
                Node::declaration("string", "s", Some(Node::string("hi"))),
            ])],
        );
        expect_ok(&program);
    }

    #[test]
    fn test_locals_are_scoped_per_function() {
        let program = Program::new(
            vec![],
            vec![
                func("f", "void", &[], vec![Node::declaration("int", "x", None)]),
                func("g", "void", &[], vec![Node::declaration("int", "x", None)]),
            ],
        );
        expect_ok(&program);

        let program = Program::new(
            vec![],
            vec![func(
                "f",
                "void",
                &[("int", "x")],
                vec![Node::declaration("int", "x", None)],
            )],
        );
        expect_codes(&program, &["DuplicateDeclaration"]);
    }

    #[test]
    fn test_undeclared_variable() {
        let program = Program::new(vec![], vec![main(vec![Node::print(vec![Node::var("y")])])]);
        let report = expect_codes(&program, &["UndeclaredName"]);
        assert_eq!(report.diagnostics[0].kind.to_string(), "Variable 'y' is not declared");
    }

    #[test]
    fn test_block_scope_hides_inner_names() {
        let program = Program::new(
            vec![],
            vec![main(vec![
                Node::declaration("int", "x", Some(Node::int(1))),
                Node::if_stmt(
                    Node::var("x"),
                    Block::new(vec![Node::declaration("float", "x", Some(Node::float(2.0)))]),
                    None,
                ),
                Node::block(vec![Node::declaration("int", "t", Some(Node::int(1)))]),
                Node::print(vec![Node::var("t")]),
            ])],
        );
        expect_codes(&program, &["UndeclaredName"]);
    }

    fn add_function() -> Function {
        func(
            "add",
            "int",
            &[("int", "a"), ("int", "b")],
            vec![Node::ret(Some(Node::binary(
                BinaryOperator::Add,
                Node::var("a"),
                Node::var("b"),
            )))],
        )
    }

    #[test]
    fn test_arity_is_exact() {
        let program = Program::new(
            vec![],
            vec![
                add_function(),
                main(vec![
                    Node::call("add", vec![Node::int(1)]),
                    Node::call("add", vec![Node::int(1), Node::int(2), Node::int(3)]),
                    Node::call("add", vec![Node::int(1), Node::int(2)]),
                ]),
            ],
        );
        let report = expect_codes(&program, &["ArityMismatch", "ArityMismatch"]);
        assert_eq!(
            report.diagnostics[0].kind,
            SemanticErrorKind::ArityMismatch {
                function: "add".to_string(),
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_argument_types_match_by_position() {
        let program = Program::new(
            vec![],
            vec![
                add_function(),
                main(vec![Node::declaration(
                    "int",
                    "r",
                    Some(Node::call("add", vec![Node::int(1), Node::string("two")])),
                )]),
            ],
        );
        let report = expect_codes(&program, &["TypeIncompatibility"]);
        let message = report.diagnostics[0].to_string();
        assert!(message.contains("Argument 2 in the call to 'add'"), "{}", message);
        assert!(message.contains("expected 'int', found 'string'"), "{}", message);
    }

    #[test]
    fn test_calling_a_variable() {
        let program = Program::new(
            vec![],
            vec![main(vec![
                Node::declaration("int", "x", Some(Node::int(1))),
                Node::call("x", vec![Node::int(2)]),
                Node::call("nothing", vec![]),
            ])],
        );
        expect_codes(&program, &["NotCallable", "UndeclaredName"]);
    }

    fn point_program(statements: Vec<Node>) -> Program {
        let p = Node::declaration("Point", "p", Some(Node::new_object("Point", vec![])));
        Program::new(
            vec![Class::new("Point", None, vec![field("int", "x")])],
            vec![main(std::iter::once(p).chain(statements).collect())],
        )
    }

    #[test]
    fn test_member_assignment() {
        let px = || Node::member(Node::var("p"), "x");
        expect_ok(&point_program(vec![Node::assign(px(), Node::int(3))]));

        expect_codes(
            &point_program(vec![Node::assign(px(), Node::string("3"))]),
            &["TypeIncompatibility"],
        );
        expect_codes(
            &point_program(vec![Node::assign(Node::member(Node::var("p"), "y"), Node::int(3))]),
            &["UnresolvedMember"],
        );
        expect_codes(
            &point_program(vec![Node::assign(Node::member(Node::var("ghost"), "x"), Node::int(3))]),
            &["UndeclaredName"],
        );
    }

    #[test]
    fn test_chained_member_assignment_is_rejected() {
        let target = Node::member(Node::member(Node::var("p"), "inner"), "x");
        let program = point_program(vec![Node::assign(target, Node::int(3))]);
        let report = expect_codes(&program, &["InvalidAssignmentTarget"]);
        assert_eq!(
            report.diagnostics[0].kind,
            SemanticErrorKind::InvalidAssignmentTarget { member: "x".to_string() }
        );
    }

    #[test]
    fn test_inherited_member_access() {
        let program = Program::new(
            animals(),
            vec![main(vec![
                Node::declaration("Dog", "d", Some(Node::new_object("Dog", vec![]))),
                Node::print(vec![Node::member(Node::var("d"), "name")]),
                Node::print(vec![Node::member(Node::var("d"), "weight")]),
            ])],
        );
        let report = expect_codes(&program, &["UnresolvedMember"]);
        assert_eq!(
            report.diagnostics[0].kind.to_string(),
            "'Dog' does not have a member called 'weight'"
        );
        // created lazily by the first analyzed class
        assert!(report.table.find_class(ROOT_CLASS).is_some());
    }

    #[test]
    fn test_subclass_is_assignable_to_parent() {
        let program = Program::new(
            animals(),
            vec![main(vec![
                Node::declaration("Animal", "a", Some(Node::new_object("Animal", vec![]))),
                Node::declaration("Dog", "d", Some(Node::new_object("Dog", vec![]))),
                Node::assign(Node::var("a"), Node::new_object("Dog", vec![])),
                Node::assign(Node::var("a"), Node::var("d")),
            ])],
        );
        expect_ok(&program);

        let program = Program::new(
            animals(),
            vec![main(vec![
                Node::declaration("Dog", "d", Some(Node::new_object("Dog", vec![]))),
                Node::assign(Node::var("d"), Node::new_object("Animal", vec![])),
            ])],
        );
        let report = expect_codes(&program, &["TypeIncompatibility"]);
        assert_eq!(
            report.diagnostics[0].kind.to_string(),
            "Incompatible types in assignment: expected 'Dog', found 'Animal'"
        );
    }

    #[test]
    fn test_initializers_need_the_exact_class() {
        let program = Program::new(
            animals(),
            vec![main(vec![
                Node::declaration("Animal", "a", Some(Node::new_object("Dog", vec![]))),
                Node::declaration("Dog", "d", Some(Node::new_object("Animal", vec![]))),
            ])],
        );
        let report = expect_codes(&program, &["TypeIncompatibility", "TypeIncompatibility"]);
        assert_eq!(
            report.diagnostics[0].kind.to_string(),
            "Incompatible types when initializing 'a': expected 'Animal', found 'Dog'"
        );
    }

    #[test]
    fn test_binary_operands_must_match() {
        let program = Program::new(
            vec![],
            vec![main(vec![
                Node::declaration(
                    "int",
                    "x",
                    Some(Node::binary(BinaryOperator::Add, Node::int(1), Node::float(2.5))),
                ),
                // comparisons keep the left operand's type
                Node::declaration(
                    "int",
                    "r",
                    Some(Node::binary(BinaryOperator::Lt, Node::int(1), Node::int(2))),
                ),
            ])],
        );
        let report = expect_codes(&program, &["TypeIncompatibility"]);
        assert!(report.diagnostics[0].to_string().contains("binary operation '+'"));
    }

    #[test]
    fn test_this_inside_and_outside_a_class() {
        let counter = Class::new(
            "Counter",
            None,
            vec![
                field("int", "count"),
                method(func(
                    "bump",
                    "void",
                    &[],
                    vec![
                        Node::assign(Node::var("count"), Node::int(5)),
                        Node::print(vec![Node::member(Node::This, "count")]),
                        Node::print(vec![Node::var("count")]),
                        Node::call("reset", vec![]),
                    ],
                )),
                method(func("reset", "void", &[], vec![])),
            ],
        );
        expect_ok(&Program::new(vec![counter], vec![]));

        let program = Program::new(vec![], vec![main(vec![Node::print(vec![Node::This])])]);
        let report = expect_codes(&program, &["MissingContext"]);
        assert_eq!(
            report.diagnostics[0].kind,
            SemanticErrorKind::MissingContext { keyword: "this" }
        );

        let program = Program::new(vec![], vec![main(vec![Node::print(vec![Node::Super])])]);
        let report = expect_codes(&program, &["MissingContext"]);
        assert_eq!(
            report.diagnostics[0].kind,
            SemanticErrorKind::MissingContext { keyword: "super" }
        );
        assert_eq!(
            report.diagnostics[0].kind.to_string(),
            "'super' used outside the context of a class"
        );
    }

    #[test]
    fn test_assignment_through_this_is_rejected() {
        let counter = Class::new(
            "Counter",
            None,
            vec![
                field("int", "count"),
                method(func(
                    "bump",
                    "void",
                    &[],
                    vec![Node::assign(Node::member(Node::This, "count"), Node::int(5))],
                )),
            ],
        );
        let program = Program::new(vec![counter], vec![]);
        let report = expect_codes(&program, &["InvalidAssignmentTarget"]);
        assert_eq!(
            report.diagnostics[0].kind,
            SemanticErrorKind::InvalidAssignmentTarget { member: "count".to_string() }
        );
        assert_eq!(report.diagnostics[0].within.as_deref(), Some("Counter::bump"));
    }

    #[test]
    fn test_inherited_fields_by_bare_name() {
        let mut classes = animals();
        classes[1] = Class::new(
            "Dog",
            Some("Animal"),
            vec![method(func(
                "bark",
                "void",
                &[],
                vec![
                    Node::print(vec![Node::var("name")]),
                    Node::assign(Node::var("name"), Node::string("Rex")),
                    Node::identifiers(["name"]),
                ],
            ))],
        );
        expect_ok(&Program::new(classes.clone(), vec![]));

        // the inherited field keeps its declared type
        classes[1] = Class::new(
            "Dog",
            Some("Animal"),
            vec![method(func(
                "bark",
                "void",
                &[],
                vec![Node::assign(Node::var("name"), Node::int(1))],
            ))],
        );
        expect_codes(&Program::new(classes, vec![]), &["TypeIncompatibility"]);

        // not visible outside the class
        let program = Program::new(
            animals(),
            vec![main(vec![Node::print(vec![Node::var("name")])])],
        );
        expect_codes(&program, &["UndeclaredName"]);
    }

    #[test]
    fn test_root_class_clash_is_reported_once() {
        let program = Program::new(
            vec![
                Class::new("A", None, vec![]),
                Class::new("B", None, vec![]),
                Class::new("C", None, vec![]),
            ],
            vec![func("Object", "void", &[], vec![])],
        );
        let report = expect_codes(&program, &["DuplicateDeclaration"]);
        assert_eq!(
            report.diagnostics[0].kind,
            SemanticErrorKind::DuplicateDeclaration { name: ROOT_CLASS.to_string() }
        );
    }

    #[test]
    fn test_undeclared_parent_class() {
        let program = Program::new(vec![Class::new("Cat", Some("Feline"), vec![])], vec![]);
        let report = expect_codes(&program, &["UndeclaredName"]);
        assert_eq!(report.diagnostics[0].kind.to_string(), "Class 'Feline' is not declared");
    }

    #[test]
    fn test_cyclic_inheritance_terminates() {
        let program = Program::new(
            vec![
                Class::new("A", Some("B"), vec![field("int", "a")]),
                Class::new("B", Some("A"), vec![]),
            ],
            vec![main(vec![
                Node::declaration("A", "x", Some(Node::new_object("A", vec![]))),
                Node::print(vec![Node::member(Node::var("x"), "missing")]),
            ])],
        );
        expect_codes(&program, &["CyclicInheritance", "CyclicInheritance", "UnresolvedMember"]);
    }

    #[test]
    fn test_fail_fast_stops_at_first_error() {
        let program = Program::new(
            vec![],
            vec![main(vec![
                Node::print(vec![Node::var("a")]),
                Node::print(vec![Node::var("b")]),
            ])],
        );
        let collected = check(&program, Options::default());
        assert_eq!(codes(&collected), ["UndeclaredName", "UndeclaredName"]);
        assert_eq!(codes(&check(&program, Options::fail_fast())), ["UndeclaredName"]);
    }

    #[test]
    fn test_deep_nesting_is_bounded() {
        let mut expr = Node::int(1);
        for _ in 0..64 {
            expr = Node::unary(UnaryOperator::Negate, expr);
        }
        let program = Program::new(vec![], vec![main(vec![Node::print(vec![expr])])]);
        let options = Options {
            max_depth: 16,
            ..Options::default()
        };
        let report = check(&program, options);
        assert_eq!(codes(&report), ["NestingTooDeep"]);

        // the default bound is far above this
        assert!(check(&program, Options::default()).is_ok());
    }

    #[test]
    fn test_method_calls() {
        let d = || Node::var("d");
        let program = Program::new(
            animals(),
            vec![main(vec![
                Node::declaration("Dog", "d", Some(Node::new_object("Dog", vec![]))),
                Node::method_call(d(), "speak", vec![]),
                Node::method_call(d(), "legs", vec![Node::int(4)]),
                Node::method_call(d(), "legs", vec![]),
                Node::method_call(d(), "fly", vec![]),
                Node::method_call(d(), "name", vec![]),
                Node::declaration("int", "n", Some(Node::int(4))),
                Node::method_call(Node::var("n"), "speak", vec![]),
            ])],
        );
        expect_codes(&program, &["ArityMismatch", "UnresolvedMember", "NotCallable", "NotAClass"]);
    }

    #[test]
    fn test_inherited_methods_and_super() {
        let mut classes = animals();
        classes[1] = Class::new(
            "Dog",
            Some("Animal"),
            vec![method(func(
                "bark",
                "void",
                &[],
                vec![
                    Node::call("speak", vec![]),
                    Node::method_call(Node::Super, "speak", vec![]),
                    Node::method_call(Node::This, "legs", vec![Node::int(4)]),
                ],
            ))],
        );
        expect_ok(&Program::new(classes, vec![]));
    }

    #[test]
    fn test_context_calls() {
        let program = Program::new(
            animals(),
            vec![main(vec![
                Node::declaration("Dog", "d", Some(Node::new_object("Dog", vec![]))),
                Node::call_on(Node::member(Node::var("d"), "speak"), vec![]),
                Node::call_on(Node::int(1), vec![]),
            ])],
        );
        expect_codes(&program, &["NotCallable"]);
    }

    #[test]
    fn test_new_and_cast_need_known_types() {
        let program = Program::new(
            vec![],
            vec![main(vec![
                Node::print(vec![Node::new_object("Ghost", vec![])]),
                Node::print(vec![Node::cast("Ghost", Node::int(1))]),
                Node::declaration("float", "f", Some(Node::cast("float", Node::int(1)))),
            ])],
        );
        expect_codes(&program, &["UndeclaredName", "UnknownType"]);
    }

    #[test]
    fn test_unknown_return_type() {
        let program = Program::new(vec![], vec![func("make", "Ghost", &[], vec![])]);
        let report = expect_codes(&program, &["UnknownType"]);
        assert_eq!(report.diagnostics[0].to_string(), "Unknown type 'Ghost' for 'make' (in make)");
    }

    #[test]
    fn test_identifier_list_names_must_exist() {
        let program = Program::new(
            vec![],
            vec![main(vec![
                Node::declaration("int", "a", None),
                Node::identifiers(["a", "b"]),
            ])],
        );
        expect_codes(&program, &["UndeclaredName"]);
    }

    #[test]
    fn test_diagnostics_name_the_enclosing_method() {
        let mut classes = animals();
        classes[1] = Class::new(
            "Dog",
            Some("Animal"),
            vec![method(func("bark", "void", &[], vec![Node::print(vec![Node::var("volume")])]))],
        );
        let report = expect_codes(&Program::new(classes, vec![]), &["UndeclaredName"]);
        assert_eq!(report.diagnostics[0].within.as_deref(), Some("Dog::bark"));
    }

    #[test]
    fn test_duplicates_and_capacity_from_collection() {
        let program = Program::new(
            vec![],
            vec![func("f", "void", &[], vec![]), func("f", "void", &[], vec![])],
        );
        expect_codes(&program, &["DuplicateDeclaration"]);

        let program = Program::new(
            vec![],
            vec![
                func("f1", "void", &[], vec![]),
                func("f2", "void", &[], vec![]),
                func("f3", "void", &[], vec![]),
            ],
        );
        let options = Options {
            capacity: Some(2),
            ..Options::default()
        };
        assert_eq!(codes(&check(&program, options)), ["TableFull"]);
    }

    #[test]
    fn test_bodies_are_marked_defined() {
        let program = Program::new(animals(), vec![main(vec![])]);
        let report = expect_ok(&program);
        let table = &report.table;
        for name in ["Animal", "Dog"] {
            let id = table.find_class(name).expect("class registered");
            assert!(table.get(id).defined, "{} not defined", name);
        }
        let main = table.find("main").expect("main registered");
        assert!(table.get(main).defined);
        assert_eq!(table.get(main).kind.label(), "Function");
    }

    #[test]
    fn test_type_of_expressions() {
        let program = Program::new(animals(), vec![add_function()]);
        let mut table = SymbolTable::new();
        let mut analyzer = Analyzer::new(&mut table, Options::default());
        analyzer.collect(&program).expect("collected");

        assert_eq!(analyzer.type_of(&Node::int(1)), Ok(TypeId::INT));
        assert_eq!(analyzer.type_of(&Node::string("s")), Ok(TypeId::STRING));
        assert_eq!(analyzer.type_of(&Node::block(vec![])), Ok(TypeId::BLOCK));
        assert_eq!(analyzer.type_of(&Node::ret(None)), Ok(TypeId::VOID));
        assert_eq!(analyzer.type_of(&Node::print(vec![])), Ok(TypeId::VOID));
        assert_eq!(analyzer.type_of(&Node::identifiers(["a"])), Ok(TypeId::IDENTIFIER_LIST));
        assert_eq!(analyzer.type_of(&Node::cast("float", Node::int(1))), Ok(TypeId::FLOAT));
        assert_eq!(
            analyzer.type_of(&Node::binary(BinaryOperator::Lt, Node::float(1.0), Node::int(2))),
            Ok(TypeId::FLOAT)
        );
        assert_eq!(analyzer.type_of(&Node::call("add", vec![])), Ok(TypeId::INT));

        let dog = analyzer.type_of(&Node::new_object("Dog", vec![])).expect("typed");
        assert_eq!(analyzer.table().type_name(dog), "Dog");
        assert!(analyzer.diagnostics().is_empty());

        assert_eq!(analyzer.type_of(&Node::var("nobody")), Err(Failed));
        assert_eq!(analyzer.finish().len(), 1);
    }
}
