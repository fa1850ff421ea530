//! Miette-based error diagnostics for CLI error presentation.
//!
//! Configuration failures are rendered with the offending file content and a
//! label on the problematic key when one can be located.

use std::path::Path;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::error::ConfigError as SettingsError;

/// Configuration error with source location context.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(pumpwatch::config))]
pub struct ConfigError {
    pub message: String,

    #[source_code]
    pub src: NamedSource<String>,

    #[label("here")]
    pub span: Option<SourceSpan>,

    #[help]
    pub help: Option<String>,
}

impl ConfigError {
    #[must_use]
    pub fn new(message: impl Into<String>, name: &str, src: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            src: NamedSource::new(name, src.into()),
            span: None,
            help: None,
        }
    }

    #[must_use]
    pub fn with_span(mut self, offset: usize, len: usize) -> Self {
        self.span = Some((offset, len).into());
        self
    }

    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

/// Build a diagnostic for `err` raised while loading `path`.
///
/// Returns `None` when the error has no useful source context (for example
/// the file could not be read at all).
#[must_use]
pub fn config_diagnostic(path: &Path, err: &SettingsError) -> Option<ConfigError> {
    let src = std::fs::read_to_string(path).ok()?;
    let name = path.display().to_string();

    let diagnostic = match err {
        SettingsError::Parse(parse) => {
            let base = ConfigError::new(parse.message(), &name, src);
            match parse.span() {
                Some(range) => base.with_span(range.start, range.end.saturating_sub(range.start)),
                None => base,
            }
        }
        SettingsError::InvalidValue { field, reason } => {
            let span = locate_key(&src, field);
            let base = ConfigError::new(format!("invalid value for {field}: {reason}"), &name, src)
                .with_help(format!("fix `{}` in {name} or remove it to use the default", leaf(field)));
            match span {
                Some((offset, len)) => base.with_span(offset, len),
                None => base,
            }
        }
        SettingsError::MissingField { field } => {
            ConfigError::new(format!("missing required field: {field}"), &name, src)
                .with_help(format!("add `{}` to {name}", leaf(field)))
        }
        SettingsError::ReadFile(_) | SettingsError::Other(_) => return None,
    };
    Some(diagnostic)
}

fn leaf(field: &str) -> &str {
    field.rsplit('.').next().unwrap_or(field)
}

/// Byte span of the first `key = ...` line for the last segment of `field`.
fn locate_key(src: &str, field: &str) -> Option<(usize, usize)> {
    let key = leaf(field);
    let mut offset = 0;
    for line in src.split_inclusive('\n') {
        let trimmed = line.trim_start();
        let indent = line.len() - trimmed.len();
        if let Some(rest) = trimmed.strip_prefix(key) {
            if rest.trim_start().starts_with('=') {
                let len = line.trim_end().len() - indent;
                return Some((offset + indent, len));
            }
        }
        offset += line.len();
    }
    None
}
