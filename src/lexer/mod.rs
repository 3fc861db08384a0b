mod token;

pub use token::{KEYWORDS, MULTI_PUNCT, TYPE_KEYWORDS, Token, TokenKind, is_keyword,
    is_type_keyword};

use crate::source::SourceFile;

/// Fatal lexer failure. The file is skipped for rule evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexErrorKind {
    UnterminatedString,
    UnterminatedChar,
    UnterminatedBlockComment,
    UnterminatedRawString,
}

impl LexErrorKind {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::UnterminatedString => "unterminated string literal",
            Self::UnterminatedChar => "unterminated character literal",
            Self::UnterminatedBlockComment => "unterminated block comment",
            Self::UnterminatedRawString => "unterminated raw string literal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexError {
    pub kind: LexErrorKind,
    /// Offset of the opening delimiter.
    pub offset: usize,
}

/// Tokenize a whole file.
///
/// Token byte ranges cover the normalized text exactly once, in order.
///
/// # Errors
/// Returns a `LexError` at the opening position of an unterminated string,
/// character, raw string, or block comment.
pub fn lex(file: &SourceFile) -> Result<Vec<Token>, LexError> {
    Lexer::new(file).run()
}

/// Raw string prefixes: `R"`, `LR"`, `uR"`, `UR"`, `u8R"`.
const RAW_PREFIXES: &[&str] = &["R", "LR", "uR", "UR", "u8R"];

struct Lexer<'a> {
    file: &'a SourceFile,
    bytes: &'a [u8],
    pos: usize,
    /// No non-trivia token emitted since the last newline token.
    at_line_start: bool,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(file: &'a SourceFile) -> Self {
        Self {
            file,
            bytes: file.text().as_bytes(),
            pos: 0,
            at_line_start: true,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<Token>, LexError> {
        while self.pos < self.bytes.len() {
            let start = self.pos;
            let b = self.bytes[start];

            match b {
                b'\n' => {
                    self.pos += 1;
                    self.emit(TokenKind::Newline, start, false);
                    self.at_line_start = true;
                }
                b' ' | b'\t' => self.lex_whitespace(start),
                b'\\' if self.peek(1) == Some(b'\n') => self.lex_whitespace(start),
                b'#' if self.at_line_start => self.lex_preprocessor(start),
                b'/' if self.peek(1) == Some(b'/') => self.lex_line_comment(start),
                b'/' if self.peek(1) == Some(b'*') => self.lex_block_comment(start)?,
                b'"' => self.lex_string(start, b'"')?,
                b'\'' => self.lex_string(start, b'\'')?,
                b'0'..=b'9' => self.lex_number(start),
                b'.' if self.peek(1).is_some_and(|c| c.is_ascii_digit()) => self.lex_number(start),
                _ if is_word_start(b) => self.lex_word(start)?,
                _ => self.lex_punct(start),
            }
        }
        Ok(self.tokens)
    }

    fn peek(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    fn emit(&mut self, kind: TokenKind, start: usize, raw_string: bool) {
        let end = self.pos;
        let (line, col) = self.file.position(start);
        let text = self.file.text()[start..end].to_string();
        self.tokens.push(Token {
            kind,
            text,
            start,
            end,
            line,
            col,
            line_start: self.at_line_start,
            raw_string,
        });
        if !kind.is_trivia() {
            self.at_line_start = false;
        }
    }

    fn lex_whitespace(&mut self, start: usize) {
        loop {
            match self.bytes.get(self.pos) {
                Some(b' ' | b'\t') => self.pos += 1,
                // Backslash-newline splices lines; the continuation is not a
                // new logical line, so no newline token is emitted for it.
                Some(b'\\') if self.peek(1) == Some(b'\n') => self.pos += 2,
                _ => break,
            }
        }
        self.emit(TokenKind::Whitespace, start, false);
    }

    fn lex_preprocessor(&mut self, start: usize) {
        while let Some(b) = self.bytes.get(self.pos) {
            match b {
                b'\n' => break,
                b'\\' if self.peek(1) == Some(b'\n') => self.pos += 2,
                _ => self.pos += 1,
            }
        }
        self.emit(TokenKind::Preprocessor, start, false);
    }

    fn lex_line_comment(&mut self, start: usize) {
        while let Some(&b) = self.bytes.get(self.pos) {
            if b == b'\n' {
                break;
            }
            self.pos += 1;
        }
        self.emit(TokenKind::LineComment, start, false);
    }

    fn lex_block_comment(&mut self, start: usize) -> Result<(), LexError> {
        self.pos += 2;
        while self.pos < self.bytes.len() {
            if self.bytes[self.pos] == b'*' && self.peek(1) == Some(b'/') {
                self.pos += 2;
                self.emit(TokenKind::BlockComment, start, false);
                return Ok(());
            }
            self.pos += 1;
        }
        Err(LexError {
            kind: LexErrorKind::UnterminatedBlockComment,
            offset: start,
        })
    }

    fn lex_string(&mut self, start: usize, quote: u8) -> Result<(), LexError> {
        self.pos += 1;
        while let Some(&b) = self.bytes.get(self.pos) {
            match b {
                b'\\' => self.pos += 2,
                b'\n' => break,
                _ if b == quote => {
                    self.pos += 1;
                    let kind = if quote == b'"' {
                        TokenKind::String
                    } else {
                        TokenKind::Char
                    };
                    self.emit(kind, start, false);
                    return Ok(());
                }
                _ => self.pos += 1,
            }
        }
        let kind = if quote == b'"' {
            LexErrorKind::UnterminatedString
        } else {
            LexErrorKind::UnterminatedChar
        };
        Err(LexError {
            kind,
            offset: start,
        })
    }

    fn lex_number(&mut self, start: usize) {
        while let Some(&b) = self.bytes.get(self.pos) {
            match b {
                b'0'..=b'9'
                | b'a'..=b'z'
                | b'A'..=b'Z'
                | b'_'
                | b'.'
                | b'\'' => self.pos += 1,
                b'+' | b'-'
                    if matches!(
                        self.bytes.get(self.pos - 1),
                        Some(b'e' | b'E' | b'p' | b'P')
                    ) =>
                {
                    self.pos += 1;
                }
                _ => break,
            }
        }
        self.emit(TokenKind::Number, start, false);
    }

    fn lex_word(&mut self, start: usize) -> Result<(), LexError> {
        while let Some(&b) = self.bytes.get(self.pos) {
            if is_word_continue(b) {
                self.pos += 1;
            } else {
                break;
            }
        }
        let word = &self.file.text()[start..self.pos];

        if self.bytes.get(self.pos) == Some(&b'"') && RAW_PREFIXES.contains(&word) {
            return self.lex_raw_string(start);
        }

        let kind = if is_keyword(word) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };
        self.emit(kind, start, false);
        Ok(())
    }

    /// `self.pos` is at the opening quote of `R"delim( ... )delim"`.
    fn lex_raw_string(&mut self, start: usize) -> Result<(), LexError> {
        self.pos += 1;
        let delim_start = self.pos;
        while let Some(&b) = self.bytes.get(self.pos) {
            if b == b'(' {
                break;
            }
            self.pos += 1;
        }
        if self.bytes.get(self.pos) != Some(&b'(') {
            return Err(LexError {
                kind: LexErrorKind::UnterminatedRawString,
                offset: start,
            });
        }
        let delim = self.file.text()[delim_start..self.pos].to_string();
        self.pos += 1;

        let closer = format!("){delim}\"");
        let closer = closer.as_bytes();
        while self.pos < self.bytes.len() {
            if self.bytes[self.pos..].starts_with(closer) {
                self.pos += closer.len();
                self.emit(TokenKind::String, start, true);
                return Ok(());
            }
            self.pos += 1;
        }
        Err(LexError {
            kind: LexErrorKind::UnterminatedRawString,
            offset: start,
        })
    }

    fn lex_punct(&mut self, start: usize) {
        let rest = &self.file.text()[start..];
        let len = MULTI_PUNCT
            .iter()
            .find(|p| rest.starts_with(**p))
            .map_or(1, |p| p.len());
        self.pos += len;
        self.emit(TokenKind::Punct, start, false);
    }
}

const fn is_word_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b >= 0x80
}

const fn is_word_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}

#[cfg(test)]
#[path = "lexer_tests.rs"]
mod tests;
