use std::fs;
use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};
use indexmap::IndexMap;

use crate::diagnostics::Severity;
use crate::error::{Result, StyleGuardError};

/// Per-rule settings from `rule.<id>.enabled` / `rule.<id>.severity` lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuleOverride {
    pub enabled: Option<bool>,
    pub severity: Option<Severity>,
}

/// Parsed configuration.
///
/// The on-disk format is line-oriented `key = value`; `#` starts a comment.
/// Unknown keys are reported as warnings rather than errors so that configs
/// remain forward-compatible.
#[derive(Debug, Default)]
pub struct Config {
    pub rules: IndexMap<String, RuleOverride>,
    /// Extra header names treated as the system include group.
    pub system_headers: Vec<String>,
    /// Files exempt from naming rules.
    pub naming_allow: Vec<String>,
    /// Files exempt from the cast-style rule.
    pub cast_allow: Vec<String>,
    /// Warnings produced while parsing (unknown keys, ignored values).
    pub warnings: Vec<String>,
    naming_allow_set: Option<GlobSet>,
    cast_allow_set: Option<GlobSet>,
}

impl Config {
    /// Load and parse a configuration file.
    ///
    /// # Errors
    /// Returns `FileRead` if the file cannot be read and `InvalidPattern` if
    /// an allow-list glob does not compile.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| StyleGuardError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&text)
    }

    /// Parse configuration text.
    ///
    /// # Errors
    /// Returns `InvalidPattern` if an allow-list glob does not compile.
    pub fn parse(text: &str) -> Result<Self> {
        let mut config = Self::default();

        for (lineno, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                config
                    .warnings
                    .push(format!("line {}: expected `key = value`", lineno + 1));
                continue;
            };
            config.apply(key.trim(), value.trim(), lineno + 1);
        }

        config.naming_allow_set = compile_globs(&config.naming_allow)?;
        config.cast_allow_set = compile_globs(&config.cast_allow)?;
        Ok(config)
    }

    fn apply(&mut self, key: &str, value: &str, lineno: usize) {
        let parts: Vec<&str> = key.split('.').collect();
        match parts.as_slice() {
            ["rule", id, "enabled"] => match value.parse::<bool>() {
                Ok(enabled) => {
                    self.rules.entry((*id).to_string()).or_default().enabled = Some(enabled);
                }
                Err(_) => self
                    .warnings
                    .push(format!("line {lineno}: `{value}` is not a boolean")),
            },
            ["rule", id, "severity"] => match value.parse::<Severity>() {
                Ok(severity) => {
                    self.rules.entry((*id).to_string()).or_default().severity = Some(severity);
                }
                Err(_) => self
                    .warnings
                    .push(format!("line {lineno}: `{value}` is not a severity")),
            },
            ["include", "system-headers"] => {
                self.system_headers.extend(split_list(value));
            }
            ["naming", "allow-files"] => {
                self.naming_allow.extend(split_list(value));
            }
            ["cast", "allow-files"] => {
                self.cast_allow.extend(split_list(value));
            }
            ["indent", "size"] => {
                if value != "2" {
                    self.warnings.push(format!(
                        "line {lineno}: indent.size = {value} is not supported; using 2"
                    ));
                }
            }
            _ => self
                .warnings
                .push(format!("line {lineno}: unknown key `{key}`")),
        }
    }

    /// Config-level enablement; rules default to enabled.
    #[must_use]
    pub fn rule_enabled(&self, id: &str) -> bool {
        self.rules
            .get(id)
            .and_then(|o| o.enabled)
            .unwrap_or(true)
    }

    #[must_use]
    pub fn severity_override(&self, id: &str) -> Option<Severity> {
        self.rules.get(id).and_then(|o| o.severity)
    }

    #[must_use]
    pub fn naming_allowed(&self, path: &Path) -> bool {
        self.naming_allow_set
            .as_ref()
            .is_some_and(|set| set.is_match(path))
    }

    #[must_use]
    pub fn cast_allowed(&self, path: &Path) -> bool {
        self.cast_allow_set
            .as_ref()
            .is_some_and(|set| set.is_match(path))
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn compile_globs(patterns: &[String]) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| StyleGuardError::InvalidPattern {
            pattern: pattern.clone(),
            source: e,
        })?;
        builder.add(glob);
    }
    let set = builder.build().map_err(|e| StyleGuardError::InvalidPattern {
        pattern: "combined patterns".to_string(),
        source: e,
    })?;
    Ok(Some(set))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
