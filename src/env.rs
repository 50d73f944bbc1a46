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
use std::collections::HashMap;

use log::debug;

/// The closed set of variables a template may reference, in substitution order.
pub const VARIABLE_NAMES: [&str; 4] = [
    "KRATOS_DSN",
    "KRATOS_CIPHER_SECRET",
    "KRATOS_COOKIE_SECRET",
    "KRATOS_SMTP_CONNECTION_URI",
];

/// `Vars` is an immutable reflection of the raw environment variables supplied
/// by the operating system. It will not update if the environment is changed
/// from within the process.
#[derive(Debug, Default, Clone)]
pub struct Vars {
    inner: HashMap<String, String>,
}

impl Vars {
    /// Snapshot the current process environment. Entries whose key or value
    /// is not valid UTF-8 are skipped.
    #[must_use]
    pub fn physical() -> Self {
        Self {
            inner: std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
        }
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            inner: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn has(&self, key: impl AsRef<str>) -> bool {
        self.inner.contains_key(key.as_ref())
    }

    pub fn get(&self, key: impl AsRef<str>) -> Option<&str> {
        self.inner.get(key.as_ref()).map(String::as_str)
    }
}

/// Build the literal `${NAME}` token for a variable name.
#[must_use]
pub fn placeholder(name: &str) -> String {
    format!("${{{name}}}")
}

/// Values for every name in [`VARIABLE_NAMES`], resolved once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableTable {
    entries: Vec<(&'static str, String)>,
}

impl VariableTable {
    /// Resolve each known name against `vars`. Unset names become the empty
    /// string.
    #[must_use]
    pub fn resolve(vars: &Vars) -> Self {
        let entries = VARIABLE_NAMES
            .iter()
            .map(|&name| {
                let value = vars.get(name).unwrap_or_default();
                if value.is_empty() {
                    // values are secrets, so only the name is ever logged
                    debug!("{name} is unset or empty, substituting an empty string");
                }
                (name, value.to_string())
            })
            .collect();
        Self { entries }
    }

    #[must_use]
    pub fn from_env() -> Self {
        Self::resolve(&Vars::physical())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.entries
            .iter()
            .map(|(name, value)| (*name, value.as_str()))
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_keeps_declaration_order() {
        let vars = Vars::from_pairs([
            ("KRATOS_SMTP_CONNECTION_URI", "smtp://mail"),
            ("KRATOS_DSN", "postgres://x"),
        ]);
        let table = VariableTable::resolve(&vars);

        let names: Vec<_> = table.iter().map(|(name, _)| name).collect();
        assert_eq!(names, VARIABLE_NAMES);
        assert_eq!(table.get("KRATOS_DSN"), Some("postgres://x"));
        assert_eq!(table.get("KRATOS_SMTP_CONNECTION_URI"), Some("smtp://mail"));
    }

    #[test]
    fn test_missing_vars_resolve_to_empty() {
        let table = VariableTable::resolve(&Vars::default());

        for name in VARIABLE_NAMES {
            assert_eq!(table.get(name), Some(""));
        }
    }

    #[test]
    fn test_unknown_names_are_not_in_table() {
        let vars = Vars::from_pairs([("UNKNOWN_VAR", "nope")]);
        let table = VariableTable::resolve(&vars);

        assert!(vars.has("UNKNOWN_VAR"));
        assert!(!table.contains("UNKNOWN_VAR"));
        assert_eq!(table.get("UNKNOWN_VAR"), None);
    }

    #[test]
    fn test_placeholder() {
        assert_eq!(placeholder("KRATOS_DSN"), "${KRATOS_DSN}");
    }
}
