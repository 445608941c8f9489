//! Textual pattern checks over generated files

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

/// Smallest number of distinct error kinds an errors file must define
pub const MIN_ERROR_KINDS: usize = 8;

/// READMEs shorter than this get a warning
pub const MIN_README_BYTES: usize = 200;

static ENUM_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^\s*([A-Z][A-Z0-9_]*)\s*=\s*['"]"#).expect("enum literal pattern")
});
static ERROR_CLASS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bclass\s+([A-Za-z_$][\w$]*)\s+extends\s+[\w$.]*Error\b").expect("error class pattern")
});
static SERVICE_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bclass\s+[A-Za-z_$][\w$]*Service\b").expect("service class pattern"));
static WILDCARD_EXPORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"export\s*\*\s*from\s*['"]"#).expect("wildcard export pattern"));
static DEFAULT_EXPORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bexport\s+default\b").expect("default export pattern"));

/// Lifecycle members a service class must have, with their patterns
static LIFECYCLE_MEMBERS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    ["initialize", "execute", "cleanup"]
        .into_iter()
        .map(|member| {
            let pattern = format!(r"\b{member}\s*(<[^>]*>)?\s*\(");
            (member, Regex::new(&pattern).expect("lifecycle member pattern"))
        })
        .collect()
});

static GET_STATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bgetState\s*\(").expect("getState pattern"));

/// Distinct error kinds: the larger of the enum-literal and the
/// class-extends counts
pub fn count_error_kinds(content: &str) -> usize {
    let literals: BTreeSet<&str> = ENUM_LITERAL
        .captures_iter(content)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();
    let classes: BTreeSet<&str> = ERROR_CLASS
        .captures_iter(content)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();
    literals.len().max(classes.len())
}

/// Lifecycle shape of a service file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceShape {
    pub has_service_class: bool,
    pub missing_members: Vec<&'static str>,
    pub has_get_state: bool,
}

impl ServiceShape {
    pub fn is_complete(&self) -> bool {
        self.has_service_class && self.missing_members.is_empty()
    }
}

pub fn service_shape(content: &str) -> ServiceShape {
    ServiceShape {
        has_service_class: SERVICE_CLASS.is_match(content),
        missing_members: LIFECYCLE_MEMBERS
            .iter()
            .filter(|(_, pattern)| !pattern.is_match(content))
            .map(|(member, _)| *member)
            .collect(),
        has_get_state: GET_STATE.is_match(content),
    }
}

/// Export surface of an index file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexShape {
    pub has_wildcard_export: bool,
    pub has_metadata: bool,
    pub has_default_export: bool,
}

pub fn index_shape(content: &str) -> IndexShape {
    IndexShape {
        has_wildcard_export: WILDCARD_EXPORT.is_match(content),
        has_metadata: content.contains("CAPSULE_METADATA"),
        has_default_export: DEFAULT_EXPORT.is_match(content),
    }
}

/// Required section headers missing from a README
pub fn missing_readme_sections<'a>(content: &str, sections: &[&'a str]) -> Vec<&'a str> {
    sections
        .iter()
        .filter(|section| {
            !content.lines().any(|line| {
                let line = line.trim_end();
                line == **section
                    || line
                        .strip_prefix(**section)
                        .map(|rest| rest.starts_with(char::is_whitespace))
                        .unwrap_or(false)
            })
        })
        .copied()
        .collect()
}
