use crate::diagnostics::{Diagnostic, Edit, Severity};
use crate::lexer::TokenKind;
use crate::structure::FrameKind;

use super::{Rule, RuleContext};

pub const BRACE_NEWLINE_ID: &str = "R-BRACE-NEWLINE";
pub const ELSE_CATCH_WHILE_ID: &str = "R-ELSE-CATCH-WHILE-NEWLINE";

/// Opening braces of namespaces, classes, enums, functions, and control
/// blocks start their own line.
pub struct BraceNewline;

/// `else`, `catch`, and the `while` of do-while start a new line.
pub struct ElseCatchWhileNewline;

impl Rule for BraceNewline {
    fn id(&self) -> &'static str {
        BRACE_NEWLINE_ID
    }

    fn priority(&self) -> u8 {
        40
    }

    fn check(&self, ctx: &RuleContext<'_>, diags: &mut Vec<Diagnostic>) {
        for frame in &ctx.structure.frames {
            if !matches!(
                frame.kind,
                FrameKind::Namespace
                    | FrameKind::Class
                    | FrameKind::Enum
                    | FrameKind::Function
                    | FrameKind::Switch
                    | FrameKind::ControlHeader
            ) {
                continue;
            }
            let brace = &ctx.tokens[frame.open];
            if first_on_line(ctx, frame.open) {
                continue;
            }

            let Some(prev) = ctx.prev_code(frame.open) else {
                continue;
            };
            let level = frame
                .parent
                .map_or(0, |p| ctx.structure.indent_level(p));
            let indent = " ".repeat(level * 2);
            diags.push(
                Diagnostic::new(BRACE_NEWLINE_ID, Severity::Style, ctx.file, brace.start,
                    brace.end, "`{` should be the first token on its line")
                    .with_fix(Edit::new(
                        ctx.tokens[prev].end,
                        brace.start,
                        format!("\n{indent}"),
                    ))
                    .with_priority(self.priority()),
            );
        }
    }
}

/// No token other than whitespace precedes `idx` on its physical line.
fn first_on_line(ctx: &RuleContext<'_>, idx: usize) -> bool {
    let tok = &ctx.tokens[idx];
    let Some((start, _)) = ctx.line_tokens(tok.line) else {
        return false;
    };
    ctx.tokens[start..idx]
        .iter()
        .all(|t| t.kind == TokenKind::Whitespace)
}

impl Rule for ElseCatchWhileNewline {
    fn id(&self) -> &'static str {
        ELSE_CATCH_WHILE_ID
    }

    fn priority(&self) -> u8 {
        41
    }

    fn check(&self, ctx: &RuleContext<'_>, diags: &mut Vec<Diagnostic>) {
        for (i, tok) in ctx.tokens.iter().enumerate() {
            if tok.kind != TokenKind::Keyword
                || !matches!(tok.text.as_str(), "else" | "catch" | "while")
            {
                continue;
            }
            let Some(prev) = ctx.prev_code(i) else {
                continue;
            };
            let prev_tok = &ctx.tokens[prev];
            if !prev_tok.is_punct("}") || prev_tok.line != tok.line {
                continue;
            }
            // Only the `while` that closes a do-while is a keyword
            // continuation; any other `while` after `}` on one line is a new
            // statement and R-SEMI-NEWLINE territory.
            if tok.text == "while" && !closes_do_body(ctx, prev) {
                continue;
            }

            let closed = ctx.structure.frame_of_token(prev);
            let level = ctx.structure.frames[closed]
                .parent
                .map_or(0, |p| ctx.structure.indent_level(p));
            let indent = " ".repeat(level * 2);
            let message = format!("`{}` should start a new line", tok.text);
            diags.push(
                Diagnostic::new(ELSE_CATCH_WHILE_ID, Severity::Style, ctx.file, tok.start,
                    tok.end, message)
                    .with_fix(Edit::new(prev_tok.end, tok.start, format!("\n{indent}")))
                    .with_priority(self.priority()),
            );
        }
    }
}

fn closes_do_body(ctx: &RuleContext<'_>, brace_idx: usize) -> bool {
    ctx.structure.frame_closed_by(brace_idx).is_some_and(|id| {
        let frame = &ctx.structure.frames[id];
        frame.kind == FrameKind::ControlHeader && frame.name.as_deref() == Some("do")
    })
}

#[cfg(test)]
#[path = "braces_tests.rs"]
mod tests;
