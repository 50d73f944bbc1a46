/*
 * Copyright 2024 The Twelve-Factor Authors
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::Result;
use log::{debug, trace};
use regex::Regex;

use crate::env::{placeholder, VariableTable};

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid")
});

/// Replace every `${NAME}` token for the names in `table` with its value.
///
/// Matching is plain substring comparison, and the text is scanned once from
/// left to right, so substituted values are copied verbatim and never
/// re-expanded. Tokens for names outside the table are left untouched.
#[must_use]
pub fn substitute(text: &str, table: &VariableTable) -> String {
    let tokens: Vec<(String, &str)> = table
        .iter()
        .map(|(name, value)| (placeholder(name), value))
        .collect();

    let mut output = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find("${") {
        output.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match tokens.iter().find(|(token, _)| rest.starts_with(token.as_str())) {
            Some((token, value)) => {
                output.push_str(value);
                rest = &rest[token.len()..];
            }
            None => {
                output.push('$');
                rest = &rest[1..];
            }
        }
    }
    output.push_str(rest);
    output
}

/// Names of `${NAME}` tokens in `text` that `table` does not know about,
/// deduplicated in the order they first appear.
#[must_use]
pub fn unknown_placeholders(text: &str, table: &VariableTable) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in PLACEHOLDER_RE.captures_iter(text) {
        let name = &caps[1];
        if !table.contains(name) && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Render `template_path` into `output_path`, creating or truncating it.
///
/// # Errors
///
/// Returns `anyhow::Error` if:
///
/// - The template cannot be read as UTF-8 text
/// - The output file cannot be written (e.g., missing parent directory,
///   insufficient permissions)
pub fn substitute_file(
    template_path: &Path,
    output_path: &Path,
    table: &VariableTable,
) -> Result<()> {
    let content = fs::read_to_string(template_path).map_err(|e| {
        anyhow::anyhow!(
            "Failed to read template at {}: {}",
            template_path.display(),
            e
        )
    })?;
    trace!(
        "Read {} bytes from {}",
        content.len(),
        template_path.display()
    );

    for name in unknown_placeholders(&content, table) {
        debug!("Leaving unknown placeholder ${{{name}}} in place");
    }

    let rendered = substitute(&content, table);
    fs::write(output_path, rendered).map_err(|e| {
        anyhow::anyhow!(
            "Failed to write output to {}: {}",
            output_path.display(),
            e
        )
    })?;
    debug!("Wrote rendered template to {}", output_path.display());
    Ok(())
}
