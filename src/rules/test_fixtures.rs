//! Shared fixtures for rule tests.
//!
//! A `Fixture` owns everything a `RuleContext` borrows, so individual tests
//! can lex a snippet once and run any rule against it.

use std::path::PathBuf;

use crate::config::Config;
use crate::diagnostics::Diagnostic;
use crate::lexer::{self, Token};
use crate::source::SourceFile;
use crate::structure::{IncludeBlock, Structure, collect_include_blocks};

use super::{Rule, RuleContext};

pub struct Fixture {
    pub file: SourceFile,
    pub tokens: Vec<Token>,
    pub structure: Structure,
    pub includes: Vec<IncludeBlock>,
    pub config: Config,
}

impl Fixture {
    pub fn new(source: &str) -> Self {
        Self::with_path("test.cpp", source)
    }

    pub fn with_path(path: &str, source: &str) -> Self {
        Self::with_config(path, source, Config::default())
    }

    pub fn with_config(path: &str, source: &str, config: Config) -> Self {
        let file = SourceFile::from_bytes(PathBuf::from(path), source.as_bytes().to_vec())
            .expect("fixture source is UTF-8");
        let tokens = lexer::lex(&file).expect("fixture source lexes");
        let structure = Structure::build(&tokens);
        let includes = collect_include_blocks(&file, &tokens, &config.system_headers);
        Self {
            file,
            tokens,
            structure,
            includes,
            config,
        }
    }

    pub fn ctx(&self) -> RuleContext<'_> {
        RuleContext::new(
            &self.file,
            &self.tokens,
            &self.structure,
            &self.includes,
            &self.config,
        )
    }

    /// Run one rule, returning its diagnostics in file order.
    pub fn run(&self, rule: &dyn Rule) -> Vec<Diagnostic> {
        let mut diags = Vec::new();
        rule.check(&self.ctx(), &mut diags);
        diags.sort_by_key(|d| (d.start, d.end));
        diags
    }
}

/// The rule ids of the returned diagnostics (with duplicates).
pub fn rule_ids(diags: &[Diagnostic]) -> Vec<&'static str> {
    diags.iter().map(|d| d.rule).collect()
}
