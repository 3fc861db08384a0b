use crate::diagnostics::{Diagnostic, Severity};
use crate::lexer::TokenKind;

use super::{Rule, RuleContext};

pub const ONE_STMT_ID: &str = "R-ONE-STMT-PER-LINE";
pub const SEMI_NEWLINE_ID: &str = "R-SEMI-NEWLINE";

/// At most one statement-terminating `;` per line.
pub struct OneStatementPerLine;

/// A statement-terminating `;` ends its line (trailing line comments aside).
pub struct SemicolonNewline;

impl Rule for OneStatementPerLine {
    fn id(&self) -> &'static str {
        ONE_STMT_ID
    }

    fn priority(&self) -> u8 {
        30
    }

    fn check(&self, ctx: &RuleContext<'_>, diags: &mut Vec<Diagnostic>) {
        let mut current_line = 0;
        let mut semis_on_line = 0;
        for (i, tok) in ctx.tokens.iter().enumerate() {
            if !tok.is_punct(";") || ctx.in_for_header(i) {
                continue;
            }
            if tok.line != current_line {
                current_line = tok.line;
                semis_on_line = 1;
                continue;
            }
            semis_on_line += 1;
            if semis_on_line == 2 {
                diags.push(
                    Diagnostic::new(ONE_STMT_ID, Severity::Style, ctx.file, tok.start, tok.end,
                        "multiple statements on one line")
                        .with_priority(self.priority()),
                );
            }
        }
    }
}

impl Rule for SemicolonNewline {
    fn id(&self) -> &'static str {
        SEMI_NEWLINE_ID
    }

    fn priority(&self) -> u8 {
        31
    }

    fn check(&self, ctx: &RuleContext<'_>, diags: &mut Vec<Diagnostic>) {
        for (i, tok) in ctx.tokens.iter().enumerate() {
            if !tok.is_punct(";") || ctx.in_for_header(i) {
                continue;
            }
            if !has_code_after_on_line(ctx, i) {
                continue;
            }
            diags.push(
                Diagnostic::new(SEMI_NEWLINE_ID, Severity::Style, ctx.file, tok.start, tok.end,
                    "`;` should be followed by a newline")
                    .with_priority(self.priority()),
            );
        }
    }
}

fn has_code_after_on_line(ctx: &RuleContext<'_>, i: usize) -> bool {
    for tok in &ctx.tokens[i + 1..] {
        match tok.kind {
            TokenKind::Newline => return false,
            TokenKind::Whitespace | TokenKind::LineComment => {}
            _ => return true,
        }
    }
    false
}

#[cfg(test)]
#[path = "statements_tests.rs"]
mod tests;
