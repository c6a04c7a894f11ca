// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Config errors as miette diagnostics, with typo suggestions.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Minimum Jaro-Winkler similarity for a "did you mean" hint.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration problem, rendered by miette.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(wanglai::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        suggestion: Option<String>,
        valid_keys: String,
        #[label("not a recognized key")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(code(wanglai::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        key: String,
        detail: String,
        expected: String,
    },

    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(wanglai::config::missing_key),
        help("set `{key}` in wanglai.toml or export {}", env_var_for(key))
    )]
    MissingKey { key: String },

    #[error("validation error: {message}")]
    #[diagnostic(code(wanglai::config::validation))]
    Validation { message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(wanglai::config::other))]
    Other(String),
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

/// Environment variable that overrides a dotted config key.
pub fn env_var_for(key: &str) -> String {
    format!("WANGLAI_{}", key.replace('.', "_").to_uppercase())
}

/// Turn every error inside a `figment::Error` into a [`ConfigError`].
///
/// `toml_sources` pairs file paths with their contents so unknown keys can be
/// underlined in the offending file.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    err.into_iter()
        .map(|error| {
            let section: Vec<String> = error.path.iter().map(ToString::to_string).collect();
            match &error.kind {
                Kind::UnknownField(field, expected) => {
                    let (span, src) = locate(&error, &section, field, toml_sources);
                    ConfigError::UnknownKey {
                        key: field.clone(),
                        suggestion: suggest_key(field, expected),
                        valid_keys: expected.join(", "),
                        span,
                        src,
                    }
                }
                Kind::MissingField(field) => {
                    let mut path = section.clone();
                    path.push(field.to_string());
                    ConfigError::MissingKey {
                        key: path.join("."),
                    }
                }
                Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
                    key: section.join("."),
                    detail: format!("found {actual}"),
                    expected: expected.to_string(),
                },
                _ => ConfigError::Other(error.to_string()),
            }
        })
        .collect()
}

/// Find the span of `field` in whichever source file produced `error`.
fn locate(
    error: &figment::error::Error,
    section: &[String],
    field: &str,
    toml_sources: &[(String, String)],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let Some(figment::Source::File(path)) = error.metadata.as_ref().and_then(|m| m.source.as_ref())
    else {
        return (None, None);
    };
    let path = path.display().to_string();
    let Some((name, content)) = toml_sources.iter().find(|(p, _)| *p == path) else {
        return (None, None);
    };
    match find_key_offset(content, section, field) {
        Some(offset) => (
            Some(SourceSpan::new(offset.into(), field.len())),
            Some(NamedSource::new(name, content.clone())),
        ),
        None => (None, None),
    }
}

/// Byte offset of `field` inside the TOML table named by `section[0]`.
///
/// Top-level fields are searched from the start of the document.
pub fn find_key_offset(content: &str, section: &[String], field: &str) -> Option<usize> {
    let start = match section.first() {
        Some(table) => {
            let header = format!("[{table}]");
            content.find(&header)? + header.len()
        }
        None => 0,
    };

    let mut offset = start;
    for line in content[start..].split_inclusive('\n') {
        let trimmed = line.trim_start();
        if trimmed.starts_with('[') && offset != start {
            // Next table: the key is not in this section.
            return None;
        }
        if let Some(after) = trimmed.strip_prefix(field)
            && after.trim_start().starts_with('=')
        {
            return Some(offset + (line.len() - trimmed.len()));
        }
        offset += line.len();
    }
    None
}

/// Best-scoring valid key above [`SUGGESTION_THRESHOLD`], if any.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Render diagnostics to stderr using miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        match handler.render_report(&mut buf, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{buf}"),
            Err(_) => eprintln!("Error: {error}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_channel_secret_for_typo() {
        let valid = &["channel_secret", "channel_access_token", "api_base"];
        assert_eq!(
            suggest_key("chanel_secret", valid),
            Some("channel_secret".to_string())
        );
    }

    #[test]
    fn suggests_liff_id() {
        let valid = &["liff_id", "max_segments", "quick_replies"];
        assert_eq!(suggest_key("lif_id", valid), Some("liff_id".to_string()));
    }

    #[test]
    fn no_suggestion_for_distant_typo() {
        let valid = &["host", "port", "log_level"];
        assert_eq!(suggest_key("zzzzzz", valid), None);
    }

    #[test]
    fn finds_key_inside_its_section_only() {
        let content = "[server]\nport = 80\n\n[line]\nchanel_secret = \"x\"\n";
        let path = vec!["line".to_string()];
        let o = find_key_offset(content, &path, "chanel_secret").unwrap();
        assert_eq!(&content[o..o + 13], "chanel_secret");

        let server = vec!["server".to_string()];
        assert_eq!(find_key_offset(content, &server, "chanel_secret"), None);
    }

    #[test]
    fn env_var_names_follow_prefix_convention() {
        assert_eq!(
            env_var_for("line.channel_secret"),
            "WANGLAI_LINE_CHANNEL_SECRET"
        );
    }
}
