use ember_sema::{NameKind, SemanticErrorKind, TypeContext};
use owo_colors::OwoColorize;

pub fn provide_error_suggestions(kind: &SemanticErrorKind) {
    match kind {
        SemanticErrorKind::UndeclaredName { what: NameKind::Class, .. } => {
            eprintln!(
                "{}",
                "💡 Help: Classes must be defined in the program before they are used.".yellow()
            );
            eprintln!(
                "    {}",
                "Check the spelling of the class and of any parent class".bright_black()
            );
        }
        SemanticErrorKind::UndeclaredName { what: NameKind::Function, .. } => {
            eprintln!(
                "{}",
                "💡 Help: Check if the function name is spelled correctly or if it's defined."
                    .yellow()
            );
            eprintln!(
                "    {}",
                "Methods of the enclosing class and its parents can also be called by name"
                    .bright_black()
            );
        }
        SemanticErrorKind::UndeclaredName { .. } => {
            eprintln!("{}", "💡 Help: Did you forget to declare this variable?".yellow());
            eprintln!(
                "    {}",
                "Variables declared inside a block are not visible after it".bright_black()
            );
        }
        SemanticErrorKind::DuplicateDeclaration { .. } => {
            eprintln!("{}", "💡 Help: A name can only be declared once per scope.".yellow());
            eprintln!(
                "    {}",
                "Rename one of the declarations or move it into its own block".bright_black()
            );
        }
        SemanticErrorKind::UnknownType { .. } => {
            eprintln!(
                "{}",
                "💡 Help: Types are int, float, char, string, void, or a class name.".yellow()
            );
        }
        SemanticErrorKind::ArityMismatch { .. } => {
            eprintln!("{}", "💡 Help: Function called with wrong number of arguments.".yellow());
            eprintln!(
                "    {}",
                "Check the function signature and provide the correct number of arguments"
                    .bright_black()
            );
        }
        SemanticErrorKind::TypeIncompatibility { context, .. } => {
            eprintln!(
                "{}",
                "💡 Help: Types must match exactly; there are no implicit conversions.".yellow()
            );
            match context {
                TypeContext::Initializer(_) => {
                    eprintln!(
                        "    {}",
                        "Declare it with its own class, then assign it to a parent-typed variable"
                            .bright_black()
                    );
                }
                TypeContext::Assignment => {
                    eprintln!(
                        "    {}",
                        "An object of a subclass may be assigned where its parent class is expected"
                            .bright_black()
                    );
                }
                TypeContext::Operation(_) => {
                    eprintln!(
                        "    {}",
                        "Use a cast to convert one operand: (float) x + 1.5".bright_black()
                    );
                }
                TypeContext::Argument { .. } => {
                    eprintln!(
                        "    {}",
                        "Arguments are matched to parameters by position".bright_black()
                    );
                }
            }
        }
        SemanticErrorKind::InvalidAssignmentTarget { .. } => {
            eprintln!(
                "{}",
                "💡 Help: Only 'name.field = value' can be assigned.".yellow()
            );
            eprintln!("    {}", "Store the inner object in a variable first".bright_black());
        }
        SemanticErrorKind::UnresolvedMember { .. } => {
            eprintln!(
                "{}",
                "💡 Help: Members are looked up in the class and then in its parent classes."
                    .yellow()
            );
        }
        SemanticErrorKind::MissingContext { .. } => {
            eprintln!(
                "{}",
                "💡 Help: 'this' and 'super' can only be used inside a method.".yellow()
            );
        }
        SemanticErrorKind::NotCallable { .. } => {
            eprintln!("{}", "💡 Help: Only functions and methods can be called.".yellow());
        }
        SemanticErrorKind::NotAClass { .. } => {
            eprintln!(
                "{}",
                "💡 Help: Members can only be accessed on objects of a class type.".yellow()
            );
        }
        SemanticErrorKind::CyclicInheritance { .. } => {
            eprintln!("{}", "💡 Help: A class cannot be its own ancestor.".yellow());
        }
        SemanticErrorKind::TableFull { .. } => {
            eprintln!("{}", "💡 Help: Raise the limit with --capacity, or omit it.".yellow());
        }
        SemanticErrorKind::NestingTooDeep { .. } => {
            eprintln!(
                "{}",
                "💡 Help: Raise the limit with --max-depth, or split the expression.".yellow()
            );
        }
    }
}
