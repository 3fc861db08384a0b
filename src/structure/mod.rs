mod includes;

pub use includes::{IncludeBlock, IncludeClass, IncludeDirective, collect_include_blocks,
    is_system_header};

use crate::lexer::{Token, TokenKind, is_type_keyword};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    File,
    Namespace,
    Class,
    Enum,
    Function,
    Block,
    Switch,
    SwitchCase,
    ControlHeader,
}

/// One scope in the shallow structure.
///
/// `open` is the token index of the opening `{` (for switch-case frames, the
/// `case`/`default` keyword); `close` is the matching `}` (for switch-case
/// frames, the last token of the case body).
#[derive(Debug, Clone)]
pub struct Frame {
    pub kind: FrameKind,
    /// Namespace/class/enum/function name; the introducing keyword for
    /// control headers (`if`, `for`, `do`, ...).
    pub name: Option<String>,
    pub name_token: Option<usize>,
    pub open: usize,
    pub close: usize,
    pub parent: Option<usize>,
}

#[derive(Debug)]
pub struct Structure {
    pub frames: Vec<Frame>,
    /// Innermost frame id per token index.
    token_frame: Vec<usize>,
}

impl Structure {
    #[must_use]
    pub fn build(tokens: &[Token]) -> Self {
        Builder::new(tokens).run()
    }

    #[must_use]
    pub fn frame_of_token(&self, idx: usize) -> usize {
        self.token_frame[idx]
    }

    /// Indentation depth of content in a frame: ancestors including the frame
    /// itself, with file and namespace frames excluded.
    #[must_use]
    pub fn indent_level(&self, frame_id: usize) -> usize {
        let mut level = 0;
        let mut id = frame_id;
        loop {
            let frame = &self.frames[id];
            if !matches!(frame.kind, FrameKind::File | FrameKind::Namespace) {
                level += 1;
            }
            match frame.parent {
                Some(parent) => id = parent,
                None => break,
            }
        }
        level
    }

    /// Number of namespace frames enclosing (or at) `frame_id`.
    #[must_use]
    pub fn namespace_depth(&self, frame_id: usize) -> usize {
        let mut count = 0;
        let mut id = frame_id;
        loop {
            let frame = &self.frames[id];
            if frame.kind == FrameKind::Namespace {
                count += 1;
            }
            match frame.parent {
                Some(parent) => id = parent,
                None => break,
            }
        }
        count
    }

    /// The brace-delimited frame whose closing `}` is at `token_idx`.
    #[must_use]
    pub fn frame_closed_by(&self, token_idx: usize) -> Option<usize> {
        self.frames
            .iter()
            .position(|f| f.close == token_idx && f.kind != FrameKind::SwitchCase)
    }

    /// Direct children of a frame.
    pub fn children(&self, frame_id: usize) -> impl Iterator<Item = usize> + '_ {
        self.frames
            .iter()
            .enumerate()
            .filter(move |(_, f)| f.parent == Some(frame_id))
            .map(|(i, _)| i)
    }
}

struct Builder<'a> {
    tokens: &'a [Token],
    frames: Vec<Frame>,
    token_frame: Vec<usize>,
    stack: Vec<usize>,
}

impl<'a> Builder<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        let file = Frame {
            kind: FrameKind::File,
            name: None,
            name_token: None,
            open: 0,
            close: tokens.len().saturating_sub(1),
            parent: None,
        };
        Self {
            tokens,
            frames: vec![file],
            token_frame: Vec::with_capacity(tokens.len()),
            stack: vec![0],
        }
    }

    fn run(mut self) -> Structure {
        for i in 0..self.tokens.len() {
            let is_open = self.tokens[i].is_punct("{");
            let is_close = self.tokens[i].is_punct("}");
            let is_label =
                self.tokens[i].is_keyword("case") || self.tokens[i].is_keyword("default");

            if is_open {
                self.open_brace(i);
            } else if is_close {
                self.close_brace(i);
            } else if is_label {
                self.switch_label(i);
            } else {
                self.token_frame.push(self.top());
            }
        }

        let last = self.tokens.len().saturating_sub(1);
        for &id in self.stack.iter().skip(1) {
            self.frames[id].close = last;
        }
        Structure {
            frames: self.frames,
            token_frame: self.token_frame,
        }
    }

    fn top(&self) -> usize {
        *self.stack.last().expect("file frame never popped")
    }

    fn open_brace(&mut self, i: usize) {
        let (kind, name_token) = self.classify_brace(i);
        let name = name_token.map(|idx| self.tokens[idx].text.clone());
        let id = self.frames.len();
        self.frames.push(Frame {
            kind,
            name,
            name_token,
            open: i,
            close: i,
            parent: Some(self.top()),
        });
        self.token_frame.push(id);
        self.stack.push(id);
    }

    fn close_brace(&mut self, i: usize) {
        if self.frames[self.top()].kind == FrameKind::SwitchCase {
            let id = self.stack.pop().expect("stack not empty");
            self.frames[id].close = i.saturating_sub(1);
        }
        if self.stack.len() > 1 {
            let id = self.stack.pop().expect("stack not empty");
            self.frames[id].close = i;
            self.token_frame.push(id);
        } else {
            // Unbalanced closing brace; attribute it to the file frame.
            self.token_frame.push(0);
        }
    }

    fn switch_label(&mut self, i: usize) {
        if self.frames[self.top()].kind == FrameKind::SwitchCase {
            let id = self.stack.pop().expect("stack not empty");
            self.frames[id].close = i.saturating_sub(1);
        }
        if self.frames[self.top()].kind == FrameKind::Switch {
            // The label itself belongs to the switch frame; the case body
            // opens one level deeper.
            self.token_frame.push(self.top());
            let id = self.frames.len();
            self.frames.push(Frame {
                kind: FrameKind::SwitchCase,
                name: Some(self.tokens[i].text.clone()),
                name_token: Some(i),
                open: i,
                close: i,
                parent: Some(self.top()),
            });
            self.stack.push(id);
        } else {
            self.token_frame.push(self.top());
        }
    }

    /// Previous token that is neither trivia nor a preprocessor line.
    fn prev_code(&self, idx: usize) -> Option<usize> {
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

    /// Index of the `(` matching the `)` at `close_idx`.
    fn find_open_paren(&self, close_idx: usize) -> Option<usize> {
        let mut depth = 1usize;
        let mut i = close_idx;
        while i > 0 {
            i -= 1;
            let tok = &self.tokens[i];
            if tok.is_punct(")") {
                depth += 1;
            } else if tok.is_punct("(") {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
        }
        None
    }

    fn classify_brace(&self, brace_idx: usize) -> (FrameKind, Option<usize>) {
        let Some(p1) = self.prev_code(brace_idx) else {
            return (FrameKind::Block, None);
        };
        let t1 = &self.tokens[p1];

        if t1.is_keyword("else") || t1.is_keyword("do") || t1.is_keyword("try") {
            return (FrameKind::ControlHeader, Some(p1));
        }
        if t1.is_keyword("namespace") {
            return (FrameKind::Namespace, None);
        }
        if t1.kind == TokenKind::Identifier
            && let Some(p2) = self.prev_code(p1)
            && self.tokens[p2].is_keyword("namespace")
        {
            return (FrameKind::Namespace, Some(p1));
        }

        if let Some(close) = self.signature_close_paren(p1) {
            return self.classify_after_paren(close);
        }

        if let Some(result) = self.classify_type_head(p1) {
            return result;
        }

        (FrameKind::Block, None)
    }

    /// If the tokens before the brace end a parameter list (possibly with
    /// cv-qualifiers, specifiers, or a trailing return type after it),
    /// return the index of that list's `)`.
    fn signature_close_paren(&self, mut idx: usize) -> Option<usize> {
        // Skip qualifiers and specifiers that may follow the parameter list.
        let mut steps = 0;
        while steps < 8 {
            let tok = &self.tokens[idx];
            let skip = tok.is_keyword("const")
                || tok.is_keyword("noexcept")
                || tok.is_keyword("override")
                || (tok.kind == TokenKind::Identifier && tok.text == "final");
            if !skip {
                break;
            }
            idx = self.prev_code(idx)?;
            steps += 1;
        }

        if self.tokens[idx].is_punct(")") {
            return Some(idx);
        }

        // Trailing return type: `) -> Type`.
        let mut j = idx;
        let mut steps = 0;
        while steps < 16 {
            let tok = &self.tokens[j];
            let type_ish = tok.kind == TokenKind::Identifier
                || (tok.kind == TokenKind::Keyword && is_type_keyword(&tok.text))
                || tok.is_punct("::")
                || tok.is_punct("<")
                || tok.is_punct(">")
                || tok.is_punct("*")
                || tok.is_punct("&");
            if !type_ish {
                break;
            }
            j = self.prev_code(j)?;
            steps += 1;
        }
        if self.tokens[j].is_punct("->") {
            let before = self.prev_code(j)?;
            if self.tokens[before].is_punct(")") {
                return Some(before);
            }
        }
        None
    }

    fn classify_after_paren(&self, mut close_idx: usize) -> (FrameKind, Option<usize>) {
        // Walk leftward across constructor-initializer entries:
        // `CFoo::CFoo() : m_a(0), m_b(1) {`.
        let mut steps = 0;
        while steps < 64 {
            steps += 1;
            let Some(open) = self.find_open_paren(close_idx) else {
                return (FrameKind::Block, None);
            };
            let Some(head) = self.prev_code(open) else {
                return (FrameKind::Block, None);
            };
            let head_tok = &self.tokens[head];

            if head_tok.kind == TokenKind::Keyword {
                return match head_tok.text.as_str() {
                    "switch" => (FrameKind::Switch, Some(head)),
                    "if" | "for" | "while" | "catch" => (FrameKind::ControlHeader, Some(head)),
                    _ => (FrameKind::Block, None),
                };
            }
            if head_tok.kind != TokenKind::Identifier {
                return (FrameKind::Block, None);
            }

            if let Some(before) = self.prev_code(head) {
                let before_tok = &self.tokens[before];
                if before_tok.is_punct(":") || before_tok.is_punct(",") {
                    if let Some(prev_close) = self.prev_code(before)
                        && self.tokens[prev_close].is_punct(")")
                    {
                        close_idx = prev_close;
                        continue;
                    }
                    return (FrameKind::Block, None);
                }
            }

            // A signature at file, namespace, or class scope is a function
            // definition; anywhere else a parenthesized construct followed by
            // `{` is treated as a plain block.
            let enclosing = self.frames[self.top()].kind;
            if matches!(
                enclosing,
                FrameKind::File | FrameKind::Namespace | FrameKind::Class
            ) {
                return (FrameKind::Function, Some(head));
            }
            return (FrameKind::Block, None);
        }
        (FrameKind::Block, None)
    }

    /// Scan back through a class/enum head (`class CFoo : public CBase {`).
    fn classify_type_head(&self, mut idx: usize) -> Option<(FrameKind, Option<usize>)> {
        let mut steps = 0;
        loop {
            let tok = &self.tokens[idx];
            if tok.kind == TokenKind::Keyword {
                match tok.text.as_str() {
                    "class" | "struct" => {
                        if let Some(p) = self.prev_code(idx)
                            && self.tokens[p].is_keyword("enum")
                        {
                            return Some((FrameKind::Enum, self.name_after(p)));
                        }
                        return Some((FrameKind::Class, self.name_after(idx)));
                    }
                    "enum" => return Some((FrameKind::Enum, self.name_after(idx))),
                    "public" | "protected" | "private" | "virtual" | "const" => {}
                    _ if is_type_keyword(&tok.text) => {}
                    _ => return None,
                }
            } else {
                let head_ish = tok.kind == TokenKind::Identifier
                    || tok.kind == TokenKind::Number
                    || tok.is_punct("::")
                    || tok.is_punct("<")
                    || tok.is_punct(">")
                    || tok.is_punct(",")
                    || tok.is_punct(":");
                if !head_ish {
                    return None;
                }
            }
            idx = self.prev_code(idx)?;
            steps += 1;
            if steps > 48 {
                return None;
            }
        }
    }

    /// First identifier after a `class`/`struct`/`enum` keyword, skipping
    /// `enum class` and attribute-free heads.
    fn name_after(&self, kw_idx: usize) -> Option<usize> {
        let mut i = kw_idx;
        let mut steps = 0;
        while steps < 4 {
            i = self.next_code(i)?;
            let tok = &self.tokens[i];
            if tok.kind == TokenKind::Identifier {
                return Some(i);
            }
            if !(tok.is_keyword("class") || tok.is_keyword("struct")) {
                return None;
            }
            steps += 1;
        }
        None
    }

    fn next_code(&self, idx: usize) -> Option<usize> {
        let mut i = idx + 1;
        while i < self.tokens.len() {
            let tok = &self.tokens[i];
            if !tok.kind.is_trivia() && tok.kind != TokenKind::Preprocessor {
                return Some(i);
            }
            i += 1;
        }
        None
    }
}

#[cfg(test)]
#[path = "structure_tests.rs"]
mod tests;
