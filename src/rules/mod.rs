pub mod alignment;
pub mod braces;
pub mod casts;
pub mod includes;
pub mod indent;
pub mod naming;
pub mod spacing;
pub mod statements;
pub mod switch_style;

use crate::config::Config;
use crate::diagnostics::Diagnostic;
use crate::lexer::{Token, TokenKind, is_type_keyword};
use crate::source::SourceFile;
use crate::structure::{IncludeBlock, Structure};

/// A single style rule. Rules are independent: disabling one removes exactly
/// the diagnostics carrying its id.
pub trait Rule: Sync {
    fn id(&self) -> &'static str;

    /// Priority for edit-conflict resolution; lower numbers win. Token-level
    /// rules use lower numbers than structure-level rules.
    fn priority(&self) -> u8;

    fn check(&self, ctx: &RuleContext<'_>, diags: &mut Vec<Diagnostic>);
}

/// Everything a rule may consult, plus shared shallow analyses computed once
/// per file.
pub struct RuleContext<'a> {
    pub file: &'a SourceFile,
    pub tokens: &'a [Token],
    pub structure: &'a Structure,
    pub includes: &'a [IncludeBlock],
    pub config: &'a Config,
    /// Per-token flag: the token sits inside the parentheses of a `for`.
    for_header: Vec<bool>,
    /// Token-index ranges (inclusive) of heuristically detected template
    /// argument lists, delimiters included.
    template_spans: Vec<(usize, usize)>,
    /// Token-index range per 1-based line; `None` for lines without tokens
    /// (interior lines of multi-line constructs).
    line_ranges: Vec<Option<(usize, usize)>>,
}

impl<'a> RuleContext<'a> {
    #[must_use]
    pub fn new(
        file: &'a SourceFile,
        tokens: &'a [Token],
        structure: &'a Structure,
        includes: &'a [IncludeBlock],
        config: &'a Config,
    ) -> Self {
        Self {
            file,
            tokens,
            structure,
            includes,
            config,
            for_header: mark_for_headers(tokens),
            template_spans: find_template_spans(tokens),
            line_ranges: index_lines(tokens, file.line_count()),
        }
    }

    #[must_use]
    pub fn in_for_header(&self, idx: usize) -> bool {
        self.for_header.get(idx).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn in_template(&self, idx: usize) -> bool {
        self.template_spans
            .iter()
            .any(|&(s, e)| s <= idx && idx <= e)
    }

    /// Token index range for a 1-based line, if the line starts any tokens.
    #[must_use]
    pub fn line_tokens(&self, line: usize) -> Option<(usize, usize)> {
        self.line_ranges.get(line - 1).copied().flatten()
    }

    /// Previous token skipping horizontal whitespace only.
    #[must_use]
    pub fn prev_skip_ws(&self, idx: usize) -> Option<usize> {
        let mut i = idx;
        while i > 0 {
            i -= 1;
            if self.tokens[i].kind != TokenKind::Whitespace {
                return Some(i);
            }
        }
        None
    }

    /// Next token skipping horizontal whitespace only.
    #[must_use]
    pub fn next_skip_ws(&self, idx: usize) -> Option<usize> {
        self.tokens
            .iter()
            .enumerate()
            .skip(idx + 1)
            .find(|(_, t)| t.kind != TokenKind::Whitespace)
            .map(|(i, _)| i)
    }

    /// Previous non-trivia token.
    #[must_use]
    pub fn prev_code(&self, idx: usize) -> Option<usize> {
        let mut i = idx;
        while i > 0 {
            i -= 1;
            let tok = &self.tokens[i];
            if !tok.kind.is_trivia() && tok.kind != TokenKind::Preprocessor {
                return Some(i);
            }
        }
        None
    }

    /// Next non-trivia token.
    #[must_use]
    pub fn next_code(&self, idx: usize) -> Option<usize> {
        self.tokens
            .iter()
            .enumerate()
            .skip(idx + 1)
            .find(|(_, t)| !t.kind.is_trivia() && t.kind != TokenKind::Preprocessor)
            .map(|(i, _)| i)
    }
}

/// All rules, in fixed registry order.
#[must_use]
pub fn all_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(casts::NullptrRule),
        Box::new(spacing::OpSpacing),
        Box::new(spacing::KeywordParenSpace),
        Box::new(spacing::CommaSpace),
        Box::new(alignment::NoVerticalAlign),
        Box::new(statements::OneStatementPerLine),
        Box::new(statements::SemicolonNewline),
        Box::new(braces::BraceNewline),
        Box::new(braces::ElseCatchWhileNewline),
        Box::new(indent::IndentTwo),
        Box::new(indent::NamespaceIndent),
        Box::new(switch_style::SwitchStyle),
        Box::new(naming::NamespaceNaming::new()),
        Box::new(naming::ClassNaming::new()),
        Box::new(naming::MethodNaming),
        Box::new(naming::MemberNaming),
        Box::new(naming::ConstNaming::new()),
        Box::new(casts::CastStyle),
        Box::new(includes::IncludeOrder),
        Box::new(includes::HeaderForwardDecl),
    ]
}

#[must_use]
pub fn is_known_rule(id: &str) -> bool {
    all_rules().iter().any(|r| r.id() == id)
}

fn mark_for_headers(tokens: &[Token]) -> Vec<bool> {
    let mut marks = vec![false; tokens.len()];
    let mut i = 0;
    while i < tokens.len() {
        if tokens[i].is_keyword("for") {
            if let Some(open) = next_code_idx(tokens, i)
                && tokens[open].is_punct("(")
            {
                let mut depth = 0usize;
                let mut j = open;
                while j < tokens.len() {
                    if tokens[j].is_punct("(") {
                        depth += 1;
                    } else if tokens[j].is_punct(")") {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                    marks[j] = true;
                    j += 1;
                }
                i = j;
            }
        }
        i += 1;
    }
    marks
}

fn next_code_idx(tokens: &[Token], idx: usize) -> Option<usize> {
    tokens
        .iter()
        .enumerate()
        .skip(idx + 1)
        .find(|(_, t)| !t.kind.is_trivia() && t.kind != TokenKind::Preprocessor)
        .map(|(i, _)| i)
}

/// Heuristic template-argument detection: `ident<...>` where the angle
/// brackets enclose only type-ish tokens. Conservative by design; a span
/// that cannot be confirmed is simply not recorded.
fn find_template_spans(tokens: &[Token]) -> Vec<(usize, usize)> {
    const SCAN_LIMIT: usize = 64;

    let mut spans = Vec::new();
    for i in 0..tokens.len() {
        if !tokens[i].is_punct("<") {
            continue;
        }
        // The template name abuts the `<` with no whitespace.
        if i == 0 || tokens[i - 1].kind != TokenKind::Identifier {
            continue;
        }

        let mut depth = 1i32;
        let mut j = i + 1;
        let mut scanned = 0usize;
        while j < tokens.len() && scanned < SCAN_LIMIT {
            let tok = &tokens[j];
            if tok.kind.is_trivia() {
                j += 1;
                continue;
            }
            scanned += 1;
            match tok.kind {
                TokenKind::Punct => match tok.text.as_str() {
                    "<" => depth += 1,
                    ">" => {
                        depth -= 1;
                        if depth == 0 {
                            spans.push((i, j));
                            break;
                        }
                    }
                    ">>" => {
                        depth -= 2;
                        if depth <= 0 {
                            spans.push((i, j));
                            break;
                        }
                    }
                    "::" | "," | "*" | "&" => {}
                    _ => break,
                },
                TokenKind::Identifier | TokenKind::Number => {}
                TokenKind::Keyword => {
                    let allowed = is_type_keyword(&tok.text)
                        || matches!(tok.text.as_str(), "const" | "typename" | "class" | "struct");
                    if !allowed {
                        break;
                    }
                }
                _ => break,
            }
            j += 1;
        }
    }
    spans
}

fn index_lines(tokens: &[Token], line_count: usize) -> Vec<Option<(usize, usize)>> {
    let mut ranges: Vec<Option<(usize, usize)>> = vec![None; line_count];
    for (idx, tok) in tokens.iter().enumerate() {
        let slot = &mut ranges[tok.line - 1];
        match slot {
            Some((_, end)) => *end = idx + 1,
            None => *slot = Some((idx, idx + 1)),
        }
    }
    ranges
}

#[cfg(test)]
mod test_fixtures;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
