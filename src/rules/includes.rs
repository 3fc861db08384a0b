use std::cmp::Ordering;
use std::path::Path;

use crate::diagnostics::{Diagnostic, Edit, Severity};
use crate::lexer::TokenKind;
use crate::structure::{IncludeBlock, IncludeClass};

use super::{Rule, RuleContext};

pub const INCLUDE_ORDER_ID: &str = "R-INCLUDE-ORDER";
pub const HEADER_FWD_DECL_ID: &str = "R-HEADER-FWD-DECL";

/// Includes are sorted within each block; the own header comes first.
pub struct IncludeOrder;

/// Suggest forward declarations for headers used only by pointer/reference.
pub struct HeaderForwardDecl;

impl Rule for IncludeOrder {
    fn id(&self) -> &'static str {
        INCLUDE_ORDER_ID
    }

    fn priority(&self) -> u8 {
        80
    }

    fn check(&self, ctx: &RuleContext<'_>, diags: &mut Vec<Diagnostic>) {
        self.check_group_sequence(ctx, diags);
        for block in ctx.includes {
            if block.directives.len() < 2 {
                continue;
            }
            let mut desired: Vec<usize> = (0..block.directives.len()).collect();
            desired.sort_by(|&a, &b| directive_order(block, a, b));
            if desired.iter().enumerate().all(|(pos, &idx)| pos == idx) {
                continue;
            }

            let first_misplaced = desired
                .iter()
                .enumerate()
                .find(|&(pos, &idx)| pos != idx)
                .map_or(0, |(pos, _)| pos);
            let at = &block.directives[first_misplaced];

            let region_start = block.directives[0].start;
            let region_end = block.directives[block.directives.len() - 1].end;
            let lines: Vec<&str> = desired
                .iter()
                .map(|&idx| {
                    let d = &block.directives[idx];
                    &ctx.file.text()[d.start..d.end]
                })
                .collect();

            diags.push(
                Diagnostic::new(INCLUDE_ORDER_ID, Severity::Style, ctx.file, at.start, at.end,
                    "includes are not in sorted order")
                    .with_fix(Edit::new(region_start, region_end, lines.join("\n")))
                    .with_priority(self.priority()),
            );
        }
    }
}

impl IncludeOrder {
    /// Groups follow the sequence own-header, project, system, third-party.
    /// Lines are never moved across groups, so this is diagnostic-only.
    fn check_group_sequence(&self, ctx: &RuleContext<'_>, diags: &mut Vec<Diagnostic>) {
        let mut prev_rank = 0;
        for (i, block) in ctx.includes.iter().enumerate() {
            let rank = group_rank(block);
            if i > 0 && rank < prev_rank {
                let at = &block.directives[0];
                diags.push(
                    Diagnostic::new(INCLUDE_ORDER_ID, Severity::Style, ctx.file, at.start,
                        at.end, "include group out of order")
                        .with_priority(self.priority()),
                );
            }
            prev_rank = rank;
        }
    }
}

fn group_rank(block: &IncludeBlock) -> u8 {
    match block.directives[0].class {
        IncludeClass::OwnHeader => 0,
        IncludeClass::ProjectHeader => 1,
        IncludeClass::SystemCCpp => 2,
        IncludeClass::ThirdParty => 3,
    }
}

/// Own header first; then case-sensitive lexicographic order with directory
/// components sorting before plain files at the same depth.
fn directive_order(block: &IncludeBlock, a: usize, b: usize) -> Ordering {
    let da = &block.directives[a];
    let db = &block.directives[b];
    let own_a = da.class == IncludeClass::OwnHeader;
    let own_b = db.class == IncludeClass::OwnHeader;
    own_b
        .cmp(&own_a)
        .then_with(|| compare_paths(&da.path, &db.path))
}

fn compare_paths(a: &str, b: &str) -> Ordering {
    let mut components_a = a.split('/').peekable();
    let mut components_b = b.split('/').peekable();
    loop {
        match (components_a.next(), components_b.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(ca), Some(cb)) => {
                let dir_a = components_a.peek().is_some();
                let dir_b = components_b.peek().is_some();
                if dir_a != dir_b {
                    return if dir_a { Ordering::Less } else { Ordering::Greater };
                }
                match ca.cmp(cb) {
                    Ordering::Equal => {}
                    other => return other,
                }
            }
        }
    }
}

impl Rule for HeaderForwardDecl {
    fn id(&self) -> &'static str {
        HEADER_FWD_DECL_ID
    }

    fn priority(&self) -> u8 {
        81
    }

    fn check(&self, ctx: &RuleContext<'_>, diags: &mut Vec<Diagnostic>) {
        let is_header = ctx
            .file
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| matches!(e, "h" | "hh" | "hpp"));
        if !is_header {
            return;
        }

        for block in ctx.includes {
            for directive in &block.directives {
                if directive.class != IncludeClass::ProjectHeader {
                    continue;
                }
                let stem = Path::new(&directive.path)
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or_default();
                if stem.is_empty() || !only_used_by_pointer_or_ref(ctx, stem) {
                    continue;
                }
                diags.push(
                    Diagnostic::new(HEADER_FWD_DECL_ID, Severity::Style, ctx.file,
                        directive.start, directive.end,
                        format!(
                            "`{}` is only used by pointer or reference; consider a forward \
                             declaration of `{stem}`",
                            directive.path
                        ))
                        .with_priority(self.priority()),
                );
            }
        }
    }
}

/// Every use of `name` in the file is followed by `*` or `&`.
fn only_used_by_pointer_or_ref(ctx: &RuleContext<'_>, name: &str) -> bool {
    let mut uses = 0usize;
    for (i, tok) in ctx.tokens.iter().enumerate() {
        if tok.kind != TokenKind::Identifier || tok.text != name {
            continue;
        }
        uses += 1;
        let pointer_like = ctx
            .next_code(i)
            .is_some_and(|n| ctx.tokens[n].is_punct("*") || ctx.tokens[n].is_punct("&"));
        if !pointer_like {
            return false;
        }
    }
    uses > 0
}

#[cfg(test)]
#[path = "includes_rules_tests.rs"]
mod tests;
