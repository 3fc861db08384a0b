use crate::diagnostics::{Diagnostic, Edit, Severity};
use crate::lexer::{TokenKind, is_type_keyword};

use super::{Rule, RuleContext};

pub const CAST_STYLE_ID: &str = "R-CAST-STYLE";
pub const NULLPTR_ID: &str = "R-NULLPTR";

/// C-style casts are forbidden outside allow-listed files.
pub struct CastStyle;

/// `NULL` should be `nullptr`.
pub struct NullptrRule;

impl Rule for CastStyle {
    fn id(&self) -> &'static str {
        CAST_STYLE_ID
    }

    fn priority(&self) -> u8 {
        70
    }

    fn check(&self, ctx: &RuleContext<'_>, diags: &mut Vec<Diagnostic>) {
        if ctx.config.cast_allowed(ctx.file.path()) {
            return;
        }
        for (i, tok) in ctx.tokens.iter().enumerate() {
            if !tok.is_punct("(") {
                continue;
            }
            let Some(close) = cast_like_paren(ctx, i) else {
                continue;
            };
            let close_tok = &ctx.tokens[close];
            diags.push(
                Diagnostic::new(CAST_STYLE_ID, Severity::Style, ctx.file, tok.start,
                    close_tok.end,
                    "C-style cast; use static_cast, dynamic_cast, reinterpret_cast, or \
                     const_cast")
                    .with_priority(self.priority()),
            );
        }
    }
}

/// If the `(` at `open` starts a C-style cast, return the index of its `)`.
///
/// Heuristic: the parentheses hold only type-ish tokens, the token before
/// the `(` is not a callee or control keyword, and the token after the `)`
/// is an identifier, a literal, or another `(`.
fn cast_like_paren(ctx: &RuleContext<'_>, open: usize) -> Option<usize> {
    if let Some(prev) = ctx.prev_code(open) {
        let prev_tok = &ctx.tokens[prev];
        let callee_like = matches!(prev_tok.kind, TokenKind::Identifier)
            || prev_tok.is_punct(")")
            || prev_tok.is_punct("]")
            || prev_tok.is_punct(">");
        let control = prev_tok.kind == TokenKind::Keyword
            && matches!(
                prev_tok.text.as_str(),
                "if" | "for" | "while" | "switch" | "catch" | "sizeof"
            );
        if callee_like || control {
            return None;
        }
    }

    let mut sigils = 0usize;
    let mut words = 0usize;
    let mut close = None;
    let mut j = open + 1;
    while j < ctx.tokens.len() {
        let tok = &ctx.tokens[j];
        if tok.kind.is_trivia() {
            j += 1;
            continue;
        }
        match tok.kind {
            TokenKind::Punct => match tok.text.as_str() {
                ")" => {
                    close = Some(j);
                    break;
                }
                "*" | "&" => sigils += 1,
                "::" | "<" | ">" => {}
                _ => return None,
            },
            TokenKind::Identifier => {
                // A name after a sigil is a declarator (`(*fn)`), not a type.
                if sigils > 0 {
                    return None;
                }
                words += 1;
            }
            TokenKind::Keyword => {
                if !(is_type_keyword(&tok.text) || tok.text == "const") {
                    return None;
                }
                if sigils > 0 && tok.text != "const" {
                    return None;
                }
                words += 1;
            }
            _ => return None,
        }
        j += 1;
    }

    let close = close?;
    if words == 0 {
        return None;
    }

    let next = ctx.next_code(close)?;
    let next_tok = &ctx.tokens[next];
    let operand = match next_tok.kind {
        TokenKind::Identifier | TokenKind::Number | TokenKind::String | TokenKind::Char => true,
        TokenKind::Punct => next_tok.text == "(",
        _ => false,
    };
    if !operand {
        return None;
    }
    // `(x)(y)` is more likely a call through a parenthesized expression than
    // a cast; require a sigil or a keyword type for that shape.
    if next_tok.is_punct("(") && sigils == 0 {
        return None;
    }
    Some(close)
}

impl Rule for NullptrRule {
    fn id(&self) -> &'static str {
        NULLPTR_ID
    }

    fn priority(&self) -> u8 {
        10
    }

    fn check(&self, ctx: &RuleContext<'_>, diags: &mut Vec<Diagnostic>) {
        for tok in ctx.tokens {
            if tok.kind != TokenKind::Identifier || tok.text != "NULL" {
                continue;
            }
            diags.push(
                Diagnostic::new(NULLPTR_ID, Severity::Style, ctx.file, tok.start, tok.end,
                    "use nullptr instead of NULL")
                    .with_fix(Edit::new(tok.start, tok.end, "nullptr"))
                    .with_priority(self.priority()),
            );
        }
    }
}

#[cfg(test)]
#[path = "casts_tests.rs"]
mod tests;
