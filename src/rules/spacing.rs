use crate::diagnostics::{Diagnostic, Edit, Severity};
use crate::lexer::TokenKind;

use super::{Rule, RuleContext};

pub const OP_SPACING_ID: &str = "R-OP-SPACING";
pub const KEYWORD_PAREN_ID: &str = "R-KEYWORD-PAREN-SPACE";
pub const COMMA_SPACE_ID: &str = "R-COMMA-SPACE";

/// Binary operators carry exactly one space on each side.
pub struct OpSpacing;

/// Control keywords are separated from `(` by exactly one space.
pub struct KeywordParenSpace;

/// Commas have no space before and whitespace after.
pub struct CommaSpace;

const BINARY_OPS: &[&str] = &[
    "=", "+", "-", "*", "/", "%", "<", ">", "<=", ">=", "==", "!=", "&&", "||", "&", "|", "^",
    "<<", ">>", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<=", ">>=",
];

const CONTROL_KEYWORDS: &[&str] = &["if", "for", "while", "switch", "catch"];

impl Rule for OpSpacing {
    fn id(&self) -> &'static str {
        OP_SPACING_ID
    }

    fn priority(&self) -> u8 {
        20
    }

    fn check(&self, ctx: &RuleContext<'_>, diags: &mut Vec<Diagnostic>) {
        for (i, tok) in ctx.tokens.iter().enumerate() {
            if tok.kind != TokenKind::Punct || !BINARY_OPS.contains(&tok.text.as_str()) {
                continue;
            }
            if !is_binary_here(ctx, i) {
                continue;
            }

            let leading_ok = side_ok(ctx, i, Side::Before);
            let trailing_ok = side_ok(ctx, i, Side::After);
            if leading_ok && trailing_ok {
                continue;
            }

            let (start, prefix) = if leading_ok {
                (tok.start, "")
            } else {
                let Some(prev) = ctx.prev_skip_ws(i) else {
                    continue;
                };
                (ctx.tokens[prev].end, " ")
            };
            let (end, suffix) = if trailing_ok {
                (tok.end, "")
            } else {
                let Some(next) = ctx.next_skip_ws(i) else {
                    continue;
                };
                (ctx.tokens[next].start, " ")
            };

            let replacement = format!("{prefix}{}{suffix}", tok.text);
            let message = format!("operator `{}` should have one space on each side", tok.text);
            diags.push(
                Diagnostic::new(OP_SPACING_ID, Severity::Style, ctx.file, tok.start, tok.end,
                    message)
                    .with_fix(Edit::new(start, end, replacement))
                    .with_priority(self.priority()),
            );
        }
    }
}

enum Side {
    Before,
    After,
}

/// One space, or a line break, on the given side of token `i`.
fn side_ok(ctx: &RuleContext<'_>, i: usize, side: Side) -> bool {
    match side {
        Side::Before => {
            if i == 0 {
                return true;
            }
            let prev = &ctx.tokens[i - 1];
            match prev.kind {
                TokenKind::Newline => true,
                TokenKind::Whitespace => {
                    // Leading indentation of a wrapped line is fine.
                    prev.text == " " || (i >= 2 && ctx.tokens[i - 2].kind == TokenKind::Newline)
                }
                _ => false,
            }
        }
        Side::After => match ctx.tokens.get(i + 1) {
            None => true,
            Some(next) => match next.kind {
                TokenKind::Newline => true,
                TokenKind::Whitespace => {
                    next.text == " "
                        || ctx
                            .tokens
                            .get(i + 2)
                            .is_some_and(|t| t.kind == TokenKind::Newline)
                }
                _ => false,
            },
        },
    }
}

/// Decide whether the operator token at `i` is a binary use worth checking.
/// Unary operators, declarator sigils, scope resolution, and anything inside
/// template angle brackets are left alone. Ambiguity resolves to "skip".
fn is_binary_here(ctx: &RuleContext<'_>, i: usize) -> bool {
    if ctx.in_template(i) {
        return false;
    }
    let tok = &ctx.tokens[i];
    let Some(prev) = ctx.prev_code(i) else {
        return false;
    };
    let prev_tok = &ctx.tokens[prev];

    // Preceded by another operator, an opening bracket, or a statement
    // boundary: a unary use.
    let prev_is_operand = matches!(
        prev_tok.kind,
        TokenKind::Identifier | TokenKind::Number | TokenKind::String | TokenKind::Char
    ) || prev_tok.is_punct(")")
        || prev_tok.is_punct("]")
        || prev_tok.is_keyword("this")
        || prev_tok.is_keyword("true")
        || prev_tok.is_keyword("false")
        || prev_tok.is_keyword("nullptr");
    if !prev_is_operand {
        return false;
    }

    // `*` and `&` after a possible type name are declarator sigils; only a
    // literal or closing parenthesis on the left makes them unambiguously
    // binary.
    if tok.text == "*" || tok.text == "&" {
        return matches!(prev_tok.kind, TokenKind::Number | TokenKind::String | TokenKind::Char)
            || prev_tok.is_punct(")")
            || prev_tok.is_punct("]");
    }

    // `<`/`>` inside detected template spans were excluded above; what
    // remains is comparison.
    true
}

impl Rule for KeywordParenSpace {
    fn id(&self) -> &'static str {
        KEYWORD_PAREN_ID
    }

    fn priority(&self) -> u8 {
        21
    }

    fn check(&self, ctx: &RuleContext<'_>, diags: &mut Vec<Diagnostic>) {
        for (i, tok) in ctx.tokens.iter().enumerate() {
            if tok.kind != TokenKind::Keyword || !CONTROL_KEYWORDS.contains(&tok.text.as_str()) {
                continue;
            }
            let Some(paren) = ctx.next_skip_ws(i) else {
                continue;
            };
            if !ctx.tokens[paren].is_punct("(") {
                continue;
            }
            let gap = &ctx.file.text()[tok.end..ctx.tokens[paren].start];
            if gap == " " {
                continue;
            }
            let message = format!("`{}` should be followed by a single space before `(`", tok.text);
            diags.push(
                Diagnostic::new(KEYWORD_PAREN_ID, Severity::Style, ctx.file, tok.start,
                    ctx.tokens[paren].start, message)
                    .with_fix(Edit::new(tok.end, ctx.tokens[paren].start, " "))
                    .with_priority(self.priority()),
            );
        }
    }
}

impl Rule for CommaSpace {
    fn id(&self) -> &'static str {
        COMMA_SPACE_ID
    }

    fn priority(&self) -> u8 {
        22
    }

    fn check(&self, ctx: &RuleContext<'_>, diags: &mut Vec<Diagnostic>) {
        for (i, tok) in ctx.tokens.iter().enumerate() {
            if !tok.is_punct(",") || tok.line_start {
                continue;
            }

            let space_before = i > 0 && ctx.tokens[i - 1].kind == TokenKind::Whitespace;
            let space_after = ctx
                .tokens
                .get(i + 1)
                .is_none_or(|t| matches!(t.kind, TokenKind::Whitespace | TokenKind::Newline));
            if !space_before && space_after {
                continue;
            }

            let start = if space_before {
                ctx.prev_skip_ws(i)
                    .map_or(tok.start, |p| ctx.tokens[p].end)
            } else {
                tok.start
            };
            let replacement = if space_after { "," } else { ", " };
            let message = if space_before {
                "no space before `,`"
            } else {
                "`,` should be followed by whitespace"
            };
            diags.push(
                Diagnostic::new(COMMA_SPACE_ID, Severity::Style, ctx.file, tok.start, tok.end,
                    message)
                    .with_fix(Edit::new(start, tok.end, replacement))
                    .with_priority(self.priority()),
            );
        }
    }
}

#[cfg(test)]
#[path = "spacing_tests.rs"]
mod tests;
