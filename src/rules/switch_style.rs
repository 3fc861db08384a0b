use crate::diagnostics::{Diagnostic, Severity};
use crate::lexer::TokenKind;
use crate::structure::FrameKind;

use super::{Rule, RuleContext};

pub const SWITCH_STYLE_ID: &str = "R-SWITCH-STYLE";

/// Case labels indent one level beyond the `switch`; a braced case body
/// keeps its `break;` inside the braces.
pub struct SwitchStyle;

impl Rule for SwitchStyle {
    fn id(&self) -> &'static str {
        SWITCH_STYLE_ID
    }

    fn priority(&self) -> u8 {
        52
    }

    fn check(&self, ctx: &RuleContext<'_>, diags: &mut Vec<Diagnostic>) {
        for (id, frame) in ctx.structure.frames.iter().enumerate() {
            if frame.kind != FrameKind::SwitchCase {
                continue;
            }
            self.check_label_indent(ctx, frame.open, diags);
            self.check_break_placement(ctx, id, diags);
        }
    }
}

impl SwitchStyle {
    fn check_label_indent(
        &self,
        ctx: &RuleContext<'_>,
        label_idx: usize,
        diags: &mut Vec<Diagnostic>,
    ) {
        let label = &ctx.tokens[label_idx];
        if !label.line_start {
            return;
        }
        let Some((first, _)) = ctx.line_tokens(label.line) else {
            return;
        };
        // Only judge labels that begin their line.
        let lead_ws = ctx.tokens[first].kind == TokenKind::Whitespace && first + 1 == label_idx;
        if !(first == label_idx || lead_ws) || ctx.tokens[first].col != 1 {
            return;
        }

        // The label token is attributed to the switch frame, whose content
        // level is exactly one past the `switch` statement.
        let expected = ctx.structure.indent_level(ctx.structure.frame_of_token(label_idx)) * 2;
        let actual = label.col - 1;
        if actual != expected {
            diags.push(
                Diagnostic::new(SWITCH_STYLE_ID, Severity::Style, ctx.file, label.start,
                    label.end,
                    format!(
                        "`{}` label should be indented one level beyond the switch",
                        label.text
                    ))
                    .with_priority(self.priority()),
            );
        }
    }

    fn check_break_placement(
        &self,
        ctx: &RuleContext<'_>,
        case_id: usize,
        diags: &mut Vec<Diagnostic>,
    ) {
        let case = &ctx.structure.frames[case_id];
        let Some(block_id) = ctx
            .structure
            .children(case_id)
            .find(|&c| ctx.structure.frames[c].kind == FrameKind::Block)
        else {
            return;
        };
        let block_close = ctx.structure.frames[block_id].close;

        let mut i = block_close + 1;
        while i <= case.close && i < ctx.tokens.len() {
            let tok = &ctx.tokens[i];
            if tok.is_keyword("break") {
                diags.push(
                    Diagnostic::new(SWITCH_STYLE_ID, Severity::Style, ctx.file, tok.start,
                        tok.end, "`break;` should live inside the case block")
                        .with_priority(self.priority()),
                );
                return;
            }
            if !tok.kind.is_trivia() && !tok.is_punct(";") {
                return;
            }
            i += 1;
        }
    }
}

#[cfg(test)]
#[path = "switch_style_tests.rs"]
mod tests;
