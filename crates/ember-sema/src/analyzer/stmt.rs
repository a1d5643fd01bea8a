use ember_syntax::{Block, If, Print, Return, While};

use super::{Analyzer, Outcome};
use crate::error::{NameKind, SemanticErrorKind};

impl Analyzer<'_> {
    pub(super) fn analyze_block(&mut self, block: &Block) -> Outcome {
        self.scoped(|a| a.walk(&block.statements, |a, s| a.analyze(s)))
    }

    pub(super) fn analyze_if(&mut self, stmt: &If) -> Outcome {
        let condition = self.analyze(&stmt.condition);
        let then_block = self.analyze_block(&stmt.then_block);
        let else_block = match &stmt.else_block {
            Some(block) => self.analyze_block(block),
            None => Ok(()),
        };
        condition.and(then_block).and(else_block)
    }

    pub(super) fn analyze_while(&mut self, stmt: &While) -> Outcome {
        let condition = self.analyze(&stmt.condition);
        let body = self.analyze_block(&stmt.body);
        condition.and(body)
    }

    /// The value is not checked against the function's return type.
    pub(super) fn analyze_return(&mut self, stmt: &Return) -> Outcome {
        match &stmt.value {
            Some(value) => self.analyze(value),
            None => Ok(()),
        }
    }

    pub(super) fn analyze_print(&mut self, stmt: &Print) -> Outcome {
        self.walk(&stmt.args, |a, arg| a.analyze(arg))
    }

    pub(super) fn analyze_variable(&mut self, name: &str) -> Outcome {
        if self.variable_type(name).is_some() {
            return Ok(());
        }
        self.fail(SemanticErrorKind::UndeclaredName {
            what: NameKind::Variable,
            name: name.to_string(),
        })
    }
}
