//! Build-variable placeholders (`${name}`) in build-file paths

use crate::error::{PipelineError, PipelineResult};
use indexmap::IndexMap;
use regex::Regex;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\$\{|\$\{([^}]*)\}").expect("valid placeholder regex"));

/// Ordered set of `name -> value` substitutions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildVariables {
    values: IndexMap<String, String>,
}

impl BuildVariables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parse `name=value` definitions as given with `-D` on the command line
    pub fn from_definitions<I, S>(definitions: I) -> PipelineResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut vars = Self::new();
        for definition in definitions {
            let definition = definition.as_ref();
            let (name, value) = definition.split_once('=').ok_or_else(|| {
                PipelineError::invalid_config(format!(
                    "Build variable '{definition}' must be written as name=value"
                ))
            })?;
            let name = name.trim();
            if name.is_empty() {
                return Err(PipelineError::invalid_config(format!(
                    "Build variable '{definition}' has an empty name"
                )));
            }
            vars.insert(name, value);
        }
        Ok(vars)
    }

    /// Replace every `${name}` in `input`; `$${` stands for a literal `${`
    pub fn substitute(&self, input: &str) -> PipelineResult<String> {
        let mut output = String::with_capacity(input.len());
        let mut last = 0;

        for caps in PLACEHOLDER.captures_iter(input) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            output.push_str(&input[last..whole.start()]);

            match caps.get(1) {
                Some(name) => {
                    let name = name.as_str().trim();
                    let value = self.get(name).ok_or_else(|| {
                        PipelineError::invalid_config(format!(
                            "Unresolved build variable '${{{name}}}' in '{input}'"
                        ))
                    })?;
                    output.push_str(value);
                }
                None => output.push_str("${"),
            }
            last = whole.end();
        }

        output.push_str(&input[last..]);
        Ok(output)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for BuildVariables {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut vars = Self::new();
        for (k, v) in iter {
            vars.insert(k, v);
        }
        vars
    }
}
