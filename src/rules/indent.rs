use crate::diagnostics::{Diagnostic, Edit, Severity};
use crate::lexer::TokenKind;
use crate::structure::FrameKind;

use super::{Rule, RuleContext};

pub const INDENT_ID: &str = "R-INDENT-2";
pub const NS_INDENT_ID: &str = "R-NS-INDENT";

const UNIT: usize = 2;

/// Two-space indentation, no tabs.
pub struct IndentTwo;

/// Namespace contents do not add an indentation level.
pub struct NamespaceIndent;

impl Rule for IndentTwo {
    fn id(&self) -> &'static str {
        INDENT_ID
    }

    fn priority(&self) -> u8 {
        50
    }

    fn check(&self, ctx: &RuleContext<'_>, diags: &mut Vec<Diagnostic>) {
        for violation in analyze_lines(ctx) {
            match violation.kind {
                ViolationKind::Tabs => diags.push(violation.into_diagnostic(
                    ctx,
                    INDENT_ID,
                    self.priority(),
                    "tab characters in indentation".to_string(),
                )),
                ViolationKind::Misindented { actual, expected } => {
                    diags.push(violation.into_diagnostic(
                        ctx,
                        INDENT_ID,
                        self.priority(),
                        format!("indentation is {actual} columns, expected {expected}"),
                    ));
                }
                ViolationKind::NamespaceIndented => {}
            }
        }
    }
}

impl Rule for NamespaceIndent {
    fn id(&self) -> &'static str {
        NS_INDENT_ID
    }

    fn priority(&self) -> u8 {
        51
    }

    fn check(&self, ctx: &RuleContext<'_>, diags: &mut Vec<Diagnostic>) {
        for violation in analyze_lines(ctx) {
            if matches!(violation.kind, ViolationKind::NamespaceIndented) {
                diags.push(violation.into_diagnostic(
                    ctx,
                    NS_INDENT_ID,
                    self.priority(),
                    "namespace contents should not be indented".to_string(),
                ));
            }
        }
    }
}

enum ViolationKind {
    Tabs,
    Misindented { actual: usize, expected: usize },
    /// The indentation matches exactly one extra level per enclosing
    /// namespace; reported by the namespace rule instead.
    NamespaceIndented,
}

struct LineViolation {
    kind: ViolationKind,
    /// Byte range of the leading whitespace (empty when there is none).
    ws_start: usize,
    ws_end: usize,
    expected_cols: usize,
}

impl LineViolation {
    fn into_diagnostic(
        self,
        ctx: &RuleContext<'_>,
        id: &'static str,
        priority: u8,
        message: String,
    ) -> Diagnostic {
        let fix = Edit::new(self.ws_start, self.ws_end, " ".repeat(self.expected_cols));
        Diagnostic::new(id, Severity::Style, ctx.file, self.ws_start, self.ws_end, message)
            .with_fix(fix)
            .with_priority(priority)
    }
}

fn analyze_lines(ctx: &RuleContext<'_>) -> Vec<LineViolation> {
    let mut violations = Vec::new();

    for line in 1..=ctx.file.line_count() {
        let Some((first, end)) = ctx.line_tokens(line) else {
            continue;
        };
        // A first token past column 1 means the line begins inside a
        // multi-line construct; its layout is not ours to judge.
        if ctx.tokens[first].col != 1 {
            continue;
        }

        let (ws, real) = if ctx.tokens[first].kind == TokenKind::Whitespace {
            if first + 1 >= end {
                continue;
            }
            (Some(first), first + 1)
        } else {
            (None, first)
        };

        let real_tok = &ctx.tokens[real];
        if matches!(real_tok.kind, TokenKind::Newline | TokenKind::Preprocessor) {
            continue;
        }
        // Continuation lines spliced with a trailing backslash keep their
        // alignment.
        if !real_tok.line_start {
            continue;
        }

        let (expected, ns_extra) = expected_level(ctx, real);
        let expected_cols = expected * UNIT;
        let ws_start = ctx.file.line_start(line);
        let ws_end = real_tok.start;

        let kind = match ws {
            Some(w) if ctx.tokens[w].text.contains('\t') => ViolationKind::Tabs,
            _ => {
                let actual = ws_end - ws_start;
                if actual == expected_cols {
                    continue;
                }
                if ns_extra > 0 && actual == (expected + ns_extra) * UNIT {
                    ViolationKind::NamespaceIndented
                } else {
                    ViolationKind::Misindented {
                        actual,
                        expected: expected_cols,
                    }
                }
            }
        };

        violations.push(LineViolation {
            kind,
            ws_start,
            ws_end,
            expected_cols,
        });
    }

    violations
}

/// Expected indentation level (in units) for the first token of a line, and
/// the number of enclosing namespaces (used to recognize namespace-indented
/// files).
fn expected_level(ctx: &RuleContext<'_>, token_idx: usize) -> (usize, usize) {
    let tok = &ctx.tokens[token_idx];
    let frame_id = ctx.structure.frame_of_token(token_idx);
    let frame = &ctx.structure.frames[frame_id];

    // Braces sit at the level of the line that opened their frame.
    if tok.is_punct("{") || tok.is_punct("}") {
        let parent = frame.parent.unwrap_or(frame_id);
        return (
            ctx.structure.indent_level(parent),
            ctx.structure.namespace_depth(parent),
        );
    }

    // Access specifiers outdent to the class header level.
    if matches!(tok.text.as_str(), "public" | "protected" | "private")
        && tok.kind == TokenKind::Keyword
        && frame.kind == FrameKind::Class
        && ctx.next_code(token_idx)
            .is_some_and(|i| ctx.tokens[i].is_punct(":"))
    {
        return (
            ctx.structure.indent_level(frame_id).saturating_sub(1),
            ctx.structure.namespace_depth(frame_id),
        );
    }

    (
        ctx.structure.indent_level(frame_id),
        ctx.structure.namespace_depth(frame_id),
    )
}

#[cfg(test)]
#[path = "indent_tests.rs"]
mod tests;
