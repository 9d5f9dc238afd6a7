// src/diagnostics.rs

//! Turning failed build output into structured diagnostics.
//!
//! A diagnostic starts with a `<path>:<line>:<column>:` header at the
//! beginning of a line. Its message is everything from the end of that header
//! up to the next header (or the end of the output), so multi-line messages
//! and any interleaved noise stay attached to the diagnostic before them.

use regex::Regex;

use crate::errors::{CocoError, Result};

/// One diagnostic extracted from build output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileLine {
    pub file_name: String,
    pub line: usize,
    /// Raw message text, untrimmed.
    pub message: String,
}

/// Compiled diagnostic header matcher.
#[derive(Debug, Clone)]
pub struct DiagnosticParser {
    header: Regex,
}

impl DiagnosticParser {
    /// Build a parser that only recognises headers whose path starts with the
    /// literal `root` prefix. An empty `root` accepts any path.
    pub fn new(root: &str) -> Result<Self> {
        let pattern = format!(r"(?m)^({}.+?):(\d+):\d+:", regex::escape(root));
        let header = Regex::new(&pattern).map_err(|e| {
            CocoError::ConfigError(format!("invalid diagnostic root '{root}': {e}"))
        })?;
        Ok(Self { header })
    }

    /// Extract every diagnostic in order of appearance.
    ///
    /// Output without any recognisable header yields an empty vector.
    pub fn parse(&self, output: &str) -> Vec<CompileLine> {
        let headers: Vec<_> = self.header.captures_iter(output).collect();
        let mut lines = Vec::with_capacity(headers.len());

        for (i, caps) in headers.iter().enumerate() {
            let (Some(whole), Some(file), Some(line)) = (caps.get(0), caps.get(1), caps.get(2))
            else {
                continue;
            };

            let message_end = headers
                .get(i + 1)
                .and_then(|next| next.get(0))
                .map(|m| m.start())
                .unwrap_or(output.len());

            lines.push(CompileLine {
                file_name: file.as_str().to_string(),
                line: line.as_str().parse().unwrap_or(0),
                message: output[whole.end()..message_end].to_string(),
            });
        }

        lines
    }
}

/// Parse with no path prefix.
pub fn parse(output: &str) -> Vec<CompileLine> {
    match DiagnosticParser::new("") {
        Ok(parser) => parser.parse(output),
        Err(_) => Vec::new(),
    }
}
