use crate::diagnostics::{Diagnostic, Edit, Severity};
use crate::lexer::{TokenKind, is_type_keyword};

use super::{Rule, RuleContext};

pub const NO_VERTICAL_ALIGN_ID: &str = "R-NO-VERTICAL-ALIGN";

/// Forbid runs of internal spaces used to column-align declarations and
/// assignments.
pub struct NoVerticalAlign;

impl Rule for NoVerticalAlign {
    fn id(&self) -> &'static str {
        NO_VERTICAL_ALIGN_ID
    }

    fn priority(&self) -> u8 {
        23
    }

    fn check(&self, ctx: &RuleContext<'_>, diags: &mut Vec<Diagnostic>) {
        for line in 1..=ctx.file.line_count() {
            let Some((start, end)) = ctx.line_tokens(line) else {
                continue;
            };
            if !is_decl_or_assign_shape(ctx, start, end) {
                continue;
            }

            for i in start..end {
                let tok = &ctx.tokens[i];
                if tok.kind != TokenKind::Whitespace
                    || tok.text.len() < 2
                    || tok.text.contains('\t')
                {
                    continue;
                }
                // Leading indentation belongs to the indent rule.
                if i == start || (i > 0 && ctx.tokens[i - 1].kind == TokenKind::Newline) {
                    continue;
                }
                // Whitespace before a trailing comment or the line break is
                // not alignment of code.
                let next_is_code = ctx.tokens.get(i + 1).is_some_and(|t| {
                    !matches!(
                        t.kind,
                        TokenKind::Newline | TokenKind::LineComment | TokenKind::BlockComment
                    )
                });
                if !next_is_code {
                    continue;
                }

                diags.push(
                    Diagnostic::new(NO_VERTICAL_ALIGN_ID, Severity::Style, ctx.file, tok.start,
                        tok.end, "alignment whitespace; use a single space")
                        .with_fix(Edit::new(tok.start, tok.end, " "))
                        .with_priority(self.priority()),
                );
            }
        }
    }
}

/// Declarations and assignments are the statement shapes people align:
/// either the line contains a top-level `=`, or it starts with two word
/// tokens (`int value`, `CFoo instance`).
fn is_decl_or_assign_shape(ctx: &RuleContext<'_>, start: usize, end: usize) -> bool {
    let mut words = 0;
    for i in start..end {
        let tok = &ctx.tokens[i];
        if tok.kind.is_trivia() {
            continue;
        }
        if tok.is_punct("=") {
            return true;
        }
        match tok.kind {
            TokenKind::Keyword => {
                let decl_keyword = is_type_keyword(&tok.text)
                    || matches!(tok.text.as_str(), "const" | "constexpr" | "static");
                if !decl_keyword {
                    return false;
                }
                words += 1;
            }
            TokenKind::Identifier => {
                words += 1;
                if words >= 2 {
                    return true;
                }
            }
            TokenKind::Punct if matches!(tok.text.as_str(), "*" | "&" | "::") => {}
            _ => return false,
        }
        if words >= 2 {
            return true;
        }
    }
    false
}

#[cfg(test)]
#[path = "alignment_tests.rs"]
mod tests;
