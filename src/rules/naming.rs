use regex::Regex;

use crate::diagnostics::{Diagnostic, Severity};
use crate::lexer::{TokenKind, is_type_keyword};
use crate::structure::FrameKind;

use super::{Rule, RuleContext};

pub const NAMESPACE_ID: &str = "R-NAMING-NAMESPACE";
pub const CLASS_ID: &str = "R-NAMING-CLASS";
pub const METHOD_ID: &str = "R-NAMING-METHOD";
pub const MEMBER_ID: &str = "R-NAMING-MEMBER";
pub const CONST_ID: &str = "R-NAMING-CONST";

/// Namespace identifiers are all-uppercase with underscores.
pub struct NamespaceNaming {
    pattern: Regex,
}

impl Default for NamespaceNaming {
    fn default() -> Self {
        Self::new()
    }
}

impl NamespaceNaming {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"^[A-Z][A-Z0-9_]*$").expect("Invalid regex"),
        }
    }
}

impl Rule for NamespaceNaming {
    fn id(&self) -> &'static str {
        NAMESPACE_ID
    }

    fn priority(&self) -> u8 {
        60
    }

    fn check(&self, ctx: &RuleContext<'_>, diags: &mut Vec<Diagnostic>) {
        if ctx.config.naming_allowed(ctx.file.path()) {
            return;
        }
        for frame in &ctx.structure.frames {
            if frame.kind != FrameKind::Namespace {
                continue;
            }
            let (Some(name), Some(idx)) = (&frame.name, frame.name_token) else {
                continue;
            };
            if !self.pattern.is_match(name) {
                let tok = &ctx.tokens[idx];
                diags.push(
                    Diagnostic::new(NAMESPACE_ID, Severity::Style, ctx.file, tok.start, tok.end,
                        format!("namespace `{name}` should be all-uppercase with underscores"))
                        .with_priority(self.priority()),
                );
            }
        }
    }
}

/// Class names `CName`, interface names `IName`, enum types `Name` without a
/// `C` prefix, enumerators `ALL_CAPS`.
pub struct ClassNaming {
    class_pattern: Regex,
    interface_pattern: Regex,
    enum_pattern: Regex,
    enumerator_pattern: Regex,
}

impl Default for ClassNaming {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassNaming {
    #[must_use]
    pub fn new() -> Self {
        Self {
            class_pattern: Regex::new(r"^C[A-Z][A-Za-z0-9]*$").expect("Invalid regex"),
            interface_pattern: Regex::new(r"^I[A-Z][A-Za-z0-9]*$").expect("Invalid regex"),
            enum_pattern: Regex::new(r"^[A-Z][A-Za-z0-9]*$").expect("Invalid regex"),
            enumerator_pattern: Regex::new(r"^[A-Z_][A-Z0-9_]*$").expect("Invalid regex"),
        }
    }

    fn check_class(&self, ctx: &RuleContext<'_>, frame_id: usize, diags: &mut Vec<Diagnostic>) {
        let frame = &ctx.structure.frames[frame_id];
        let (Some(name), Some(idx)) = (&frame.name, frame.name_token) else {
            return;
        };
        let tok = &ctx.tokens[idx];

        let looks_interface = name.starts_with('I')
            && name.chars().nth(1).is_some_and(|c| c.is_ascii_uppercase());
        if looks_interface || body_is_pure_interface(ctx, frame_id) {
            if !self.interface_pattern.is_match(name) {
                diags.push(
                    Diagnostic::new(CLASS_ID, Severity::Style, ctx.file, tok.start, tok.end,
                        format!("interface `{name}` should match I[A-Z][A-Za-z0-9]*"))
                        .with_priority(self.priority()),
                );
            }
            return;
        }
        if !self.class_pattern.is_match(name) {
            diags.push(
                Diagnostic::new(CLASS_ID, Severity::Style, ctx.file, tok.start, tok.end,
                    format!("class `{name}` should match C[A-Z][A-Za-z0-9]*"))
                    .with_priority(self.priority()),
            );
        }
    }

    fn check_enum(&self, ctx: &RuleContext<'_>, frame_id: usize, diags: &mut Vec<Diagnostic>) {
        let frame = &ctx.structure.frames[frame_id];
        if let (Some(name), Some(idx)) = (&frame.name, frame.name_token) {
            let tok = &ctx.tokens[idx];
            if !self.enum_pattern.is_match(name) {
                diags.push(
                    Diagnostic::new(CLASS_ID, Severity::Style, ctx.file, tok.start, tok.end,
                        format!("enum `{name}` should match [A-Z][A-Za-z0-9]*"))
                        .with_priority(self.priority()),
                );
            } else if name.len() > 1
                && name.starts_with('C')
                && name.chars().nth(1).is_some_and(|c| c.is_ascii_uppercase())
            {
                diags.push(
                    Diagnostic::new(CLASS_ID, Severity::Style, ctx.file, tok.start, tok.end,
                        format!("enum `{name}` should not carry a C prefix"))
                        .with_priority(self.priority()),
                );
            }
        }

        for i in frame.open..=frame.close.min(ctx.tokens.len().saturating_sub(1)) {
            if ctx.structure.frame_of_token(i) != frame_id {
                continue;
            }
            let tok = &ctx.tokens[i];
            if tok.kind != TokenKind::Identifier {
                continue;
            }
            let starts_entry = ctx
                .prev_code(i)
                .is_some_and(|p| ctx.tokens[p].is_punct("{") || ctx.tokens[p].is_punct(","));
            if starts_entry && !self.enumerator_pattern.is_match(&tok.text) {
                diags.push(
                    Diagnostic::new(CLASS_ID, Severity::Style, ctx.file, tok.start, tok.end,
                        format!("enumerator `{}` should be all-uppercase", tok.text))
                        .with_priority(self.priority()),
                );
            }
        }
    }
}

impl Rule for ClassNaming {
    fn id(&self) -> &'static str {
        CLASS_ID
    }

    fn priority(&self) -> u8 {
        61
    }

    fn check(&self, ctx: &RuleContext<'_>, diags: &mut Vec<Diagnostic>) {
        if ctx.config.naming_allowed(ctx.file.path()) {
            return;
        }
        for id in 0..ctx.structure.frames.len() {
            match ctx.structure.frames[id].kind {
                FrameKind::Class => self.check_class(ctx, id, diags),
                FrameKind::Enum => self.check_enum(ctx, id, diags),
                _ => {}
            }
        }
    }
}

/// Every method declaration in the body is pure virtual (`= 0;`).
fn body_is_pure_interface(ctx: &RuleContext<'_>, frame_id: usize) -> bool {
    let frame = &ctx.structure.frames[frame_id];
    let mut pure = 0usize;
    let mut plain = 0usize;

    for i in frame.open..=frame.close.min(ctx.tokens.len().saturating_sub(1)) {
        if ctx.structure.frame_of_token(i) != frame_id || !ctx.tokens[i].is_punct(")") {
            continue;
        }
        let mut j = i;
        // Skip cv-qualifiers after the parameter list.
        while let Some(n) = ctx.next_code(j) {
            let tok = &ctx.tokens[n];
            if tok.is_keyword("const") || tok.is_keyword("noexcept") {
                j = n;
            } else {
                break;
            }
        }
        match ctx.next_code(j) {
            Some(eq) if ctx.tokens[eq].is_punct("=") => {
                let zero = ctx.next_code(eq);
                if zero.is_some_and(|z| ctx.tokens[z].text == "0") {
                    pure += 1;
                } else {
                    plain += 1;
                }
            }
            Some(semi) if ctx.tokens[semi].is_punct(";") => plain += 1,
            _ => {}
        }
    }
    pure > 0 && plain == 0
}

/// Method names begin with an uppercase letter.
pub struct MethodNaming;

impl Rule for MethodNaming {
    fn id(&self) -> &'static str {
        METHOD_ID
    }

    fn priority(&self) -> u8 {
        62
    }

    fn check(&self, ctx: &RuleContext<'_>, diags: &mut Vec<Diagnostic>) {
        if ctx.config.naming_allowed(ctx.file.path()) {
            return;
        }
        for frame in &ctx.structure.frames {
            if frame.kind != FrameKind::Function {
                continue;
            }
            let at_scope = frame.parent.is_some_and(|p| {
                matches!(
                    ctx.structure.frames[p].kind,
                    FrameKind::File | FrameKind::Namespace | FrameKind::Class
                )
            });
            if !at_scope {
                continue;
            }
            let (Some(name), Some(idx)) = (&frame.name, frame.name_token) else {
                continue;
            };
            // `main` has its signature dictated by the language.
            if name == "main" {
                continue;
            }
            if name.chars().next().is_some_and(|c| c.is_ascii_uppercase()) {
                continue;
            }
            let tok = &ctx.tokens[idx];
            diags.push(
                Diagnostic::new(METHOD_ID, Severity::Style, ctx.file, tok.start, tok.end,
                    format!("method `{name}` should begin with an uppercase letter"))
                    .with_priority(self.priority()),
            );
        }
    }
}

/// Data members carry `m_`; globals carry `g_` and are discouraged outright.
pub struct MemberNaming;

impl Rule for MemberNaming {
    fn id(&self) -> &'static str {
        MEMBER_ID
    }

    fn priority(&self) -> u8 {
        63
    }

    fn check(&self, ctx: &RuleContext<'_>, diags: &mut Vec<Diagnostic>) {
        if ctx.config.naming_allowed(ctx.file.path()) {
            return;
        }
        for (id, frame) in ctx.structure.frames.iter().enumerate() {
            match frame.kind {
                FrameKind::Class => {
                    for stmt in frame_statements(ctx, id) {
                        let Some(decl) = variable_decl(ctx, &stmt) else {
                            continue;
                        };
                        if decl.is_const {
                            continue;
                        }
                        let name = &ctx.tokens[decl.name_idx];
                        if !name.text.starts_with("m_") {
                            diags.push(
                                Diagnostic::new(MEMBER_ID, Severity::Style, ctx.file, name.start,
                                    name.end,
                                    format!("member `{}` should be prefixed with m_", name.text))
                                    .with_priority(self.priority()),
                            );
                        }
                    }
                }
                FrameKind::File | FrameKind::Namespace => {
                    for stmt in frame_statements(ctx, id) {
                        let Some(decl) = variable_decl(ctx, &stmt) else {
                            continue;
                        };
                        if decl.is_const {
                            continue;
                        }
                        let name = &ctx.tokens[decl.name_idx];
                        if !name.text.starts_with("g_") {
                            diags.push(
                                Diagnostic::new(MEMBER_ID, Severity::Style, ctx.file, name.start,
                                    name.end,
                                    format!("global `{}` should be prefixed with g_", name.text))
                                    .with_priority(self.priority()),
                            );
                        }
                        diags.push(
                            Diagnostic::new(MEMBER_ID, Severity::Warning, ctx.file, name.start,
                                name.end,
                                format!("global variable `{}` is discouraged", name.text))
                                .with_priority(self.priority()),
                        );
                    }
                }
                _ => {}
            }
        }
    }
}

/// File-scope const primitives are all-uppercase.
pub struct ConstNaming {
    pattern: Regex,
}

impl Default for ConstNaming {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstNaming {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"^[A-Z][A-Z0-9_]*$").expect("Invalid regex"),
        }
    }
}

impl Rule for ConstNaming {
    fn id(&self) -> &'static str {
        CONST_ID
    }

    fn priority(&self) -> u8 {
        64
    }

    fn check(&self, ctx: &RuleContext<'_>, diags: &mut Vec<Diagnostic>) {
        if ctx.config.naming_allowed(ctx.file.path()) {
            return;
        }
        for (id, frame) in ctx.structure.frames.iter().enumerate() {
            if !matches!(frame.kind, FrameKind::File | FrameKind::Namespace) {
                continue;
            }
            for stmt in frame_statements(ctx, id) {
                let Some(decl) = variable_decl(ctx, &stmt) else {
                    continue;
                };
                if !decl.is_const || !decl.is_primitive {
                    continue;
                }
                let name = &ctx.tokens[decl.name_idx];
                if !self.pattern.is_match(&name.text) {
                    diags.push(
                        Diagnostic::new(CONST_ID, Severity::Style, ctx.file, name.start, name.end,
                            format!("constant `{}` should be all-uppercase", name.text))
                            .with_priority(self.priority()),
                    );
                }
            }
        }
    }
}

/// Token indices of statements lying directly in a frame: runs separated by
/// `;`, labels, braces, preprocessor lines, and nested frames.
fn frame_statements(ctx: &RuleContext<'_>, frame_id: usize) -> Vec<Vec<usize>> {
    if ctx.tokens.is_empty() {
        return Vec::new();
    }
    let frame = &ctx.structure.frames[frame_id];
    let last = ctx.tokens.len().saturating_sub(1);
    let mut statements = Vec::new();
    let mut current: Vec<usize> = Vec::new();

    for i in frame.open..=frame.close.min(last) {
        if ctx.structure.frame_of_token(i) != frame_id {
            flush(&mut statements, &mut current);
            continue;
        }
        let tok = &ctx.tokens[i];
        if tok.kind.is_trivia() {
            continue;
        }
        if tok.kind == TokenKind::Preprocessor
            || tok.is_punct(";")
            || tok.is_punct(":")
            || tok.is_punct("{")
            || tok.is_punct("}")
        {
            flush(&mut statements, &mut current);
            continue;
        }
        current.push(i);
    }
    flush(&mut statements, &mut current);
    statements
}

fn flush(statements: &mut Vec<Vec<usize>>, current: &mut Vec<usize>) {
    if !current.is_empty() {
        statements.push(std::mem::take(current));
    }
}

struct VariableDecl {
    name_idx: usize,
    is_const: bool,
    is_primitive: bool,
}

/// Interpret a statement as a simple variable declaration, if it is one.
/// Anything with parentheses, declaration keywords, or too few tokens is
/// skipped; rules that cannot evaluate a construct stay silent about it.
fn variable_decl(ctx: &RuleContext<'_>, stmt: &[usize]) -> Option<VariableDecl> {
    if stmt.len() < 2 {
        return None;
    }

    let mut is_const = false;
    let mut is_primitive = false;
    let mut name_idx = None;

    for &i in stmt {
        let tok = &ctx.tokens[i];
        match tok.kind {
            TokenKind::Punct => match tok.text.as_str() {
                "(" | ")" => return None,
                "=" => break,
                _ => {}
            },
            TokenKind::Keyword => match tok.text.as_str() {
                "const" | "constexpr" => is_const = true,
                "static" | "mutable" | "volatile" | "inline" => {}
                "using" | "typedef" | "friend" | "class" | "struct" | "enum" | "namespace"
                | "template" | "operator" | "public" | "protected" | "private" | "extern"
                | "return" | "throw" | "delete" | "new" | "goto" | "break" | "continue"
                | "case" | "default" | "virtual" | "typename" | "union" | "explicit" => {
                    return None;
                }
                _ if is_type_keyword(&tok.text) => is_primitive = true,
                _ => return None,
            },
            TokenKind::Identifier => name_idx = Some(i),
            TokenKind::Number | TokenKind::String | TokenKind::Char => {}
            _ => return None,
        }
    }

    name_idx.map(|idx| VariableDecl {
        name_idx: idx,
        is_const,
        is_primitive,
    })
}

#[cfg(test)]
#[path = "naming_tests.rs"]
mod tests;
