use std::path::Path;

use crate::lexer::{Token, TokenKind};
use crate::source::SourceFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncludeClass {
    OwnHeader,
    ProjectHeader,
    SystemCCpp,
    ThirdParty,
}

#[derive(Debug, Clone)]
pub struct IncludeDirective {
    /// Index of the preprocessor token.
    pub token: usize,
    /// The path between quotes or angle brackets.
    pub path: String,
    pub quoted: bool,
    /// Byte range of the directive line (start of line to end of token).
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub class: IncludeClass,
}

/// A contiguous run of `#include` lines; runs are separated by blank lines
/// or by any other content.
#[derive(Debug, Clone)]
pub struct IncludeBlock {
    pub directives: Vec<IncludeDirective>,
}

const HEADER_EXTENSIONS: &[&str] = &["h", "hh", "hpp"];

/// Standard C and C++ header names recognized as the system group. Extended
/// at runtime by `include.system-headers` configuration entries.
pub const SYSTEM_HEADERS: &[&str] = &[
    "algorithm",
    "any",
    "array",
    "atomic",
    "bitset",
    "cassert",
    "cctype",
    "cerrno",
    "cfloat",
    "chrono",
    "cinttypes",
    "climits",
    "clocale",
    "cmath",
    "condition_variable",
    "csetjmp",
    "csignal",
    "cstdarg",
    "cstddef",
    "cstdint",
    "cstdio",
    "cstdlib",
    "cstring",
    "ctime",
    "cwchar",
    "cwctype",
    "deque",
    "exception",
    "filesystem",
    "fstream",
    "functional",
    "future",
    "initializer_list",
    "iomanip",
    "ios",
    "iosfwd",
    "iostream",
    "istream",
    "iterator",
    "limits",
    "list",
    "locale",
    "map",
    "memory",
    "mutex",
    "new",
    "numeric",
    "optional",
    "ostream",
    "queue",
    "random",
    "ratio",
    "regex",
    "set",
    "shared_mutex",
    "sstream",
    "stack",
    "stdexcept",
    "string",
    "string_view",
    "system_error",
    "thread",
    "tuple",
    "type_traits",
    "typeinfo",
    "unordered_map",
    "unordered_set",
    "utility",
    "variant",
    "vector",
    "assert.h",
    "ctype.h",
    "errno.h",
    "float.h",
    "inttypes.h",
    "limits.h",
    "locale.h",
    "math.h",
    "setjmp.h",
    "signal.h",
    "stdarg.h",
    "stdbool.h",
    "stddef.h",
    "stdint.h",
    "stdio.h",
    "stdlib.h",
    "string.h",
    "time.h",
    "wchar.h",
];

#[must_use]
pub fn is_system_header(name: &str, extra: &[String]) -> bool {
    SYSTEM_HEADERS.contains(&name) || extra.iter().any(|h| h == name)
}

/// Collect the file's include blocks, classifying each directive.
#[must_use]
pub fn collect_include_blocks(
    file: &SourceFile,
    tokens: &[Token],
    extra_system: &[String],
) -> Vec<IncludeBlock> {
    let own_stem = file
        .path()
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();

    let mut blocks: Vec<IncludeBlock> = Vec::new();
    let mut current: Vec<IncludeDirective> = Vec::new();
    let mut newlines_since = 0usize;

    for (idx, tok) in tokens.iter().enumerate() {
        match tok.kind {
            TokenKind::Preprocessor => {
                if let Some((path, quoted)) = parse_include(&tok.text) {
                    if !current.is_empty() && newlines_since > 1 {
                        blocks.push(IncludeBlock {
                            directives: std::mem::take(&mut current),
                        });
                    }
                    let class = classify(&path, quoted, &own_stem, extra_system);
                    current.push(IncludeDirective {
                        token: idx,
                        path,
                        quoted,
                        start: file.line_start(tok.line),
                        end: tok.end,
                        line: tok.line,
                        class,
                    });
                    newlines_since = 0;
                } else if !current.is_empty() {
                    blocks.push(IncludeBlock {
                        directives: std::mem::take(&mut current),
                    });
                }
            }
            TokenKind::Newline => newlines_since += 1,
            TokenKind::Whitespace => {}
            _ => {
                if !current.is_empty() {
                    blocks.push(IncludeBlock {
                        directives: std::mem::take(&mut current),
                    });
                }
            }
        }
    }
    if !current.is_empty() {
        blocks.push(IncludeBlock { directives: current });
    }
    blocks
}

/// Parse `#include <...>` or `#include "..."` from a preprocessor line.
fn parse_include(text: &str) -> Option<(String, bool)> {
    let rest = text.strip_prefix('#')?.trim_start();
    let rest = rest.strip_prefix("include")?.trim_start();
    if let Some(inner) = rest.strip_prefix('<') {
        let end = inner.find('>')?;
        return Some((inner[..end].to_string(), false));
    }
    if let Some(inner) = rest.strip_prefix('"') {
        let end = inner.find('"')?;
        return Some((inner[..end].to_string(), true));
    }
    None
}

fn classify(path: &str, quoted: bool, own_stem: &str, extra_system: &[String]) -> IncludeClass {
    if quoted {
        let p = Path::new(path);
        let stem = p.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
        let ext = p.extension().and_then(|s| s.to_str()).unwrap_or_default();
        if stem == own_stem && HEADER_EXTENSIONS.contains(&ext) {
            return IncludeClass::OwnHeader;
        }
        return IncludeClass::ProjectHeader;
    }
    if is_system_header(path, extra_system) {
        IncludeClass::SystemCCpp
    } else {
        IncludeClass::ThirdParty
    }
}

#[cfg(test)]
#[path = "includes_tests.rs"]
mod tests;
