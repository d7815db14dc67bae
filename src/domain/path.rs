//! Attribute paths: the grouping order of a hierarchy

use std::fmt;

/// Token that marks a path position as "reuse a real attribute".
pub const DEFAULT_PLACEHOLDER: &str = "_placeholder";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathEntry {
    Attribute(String),
    Placeholder,
}

/// Ordered grouping fields, possibly containing placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributePath {
    entries: Vec<PathEntry>,
}

impl AttributePath {
    pub fn new(entries: Vec<PathEntry>) -> Self {
        Self { entries }
    }

    /// Split raw field names into entries, treating `placeholder` as the marker.
    pub fn parse<I, S>(items: I, placeholder: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = items
            .into_iter()
            .map(|item| {
                let item = item.as_ref();
                if item == placeholder {
                    PathEntry::Placeholder
                } else {
                    PathEntry::Attribute(item.to_string())
                }
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[PathEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn real_attributes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|e| match e {
            PathEntry::Attribute(a) => Some(a.as_str()),
            PathEntry::Placeholder => None,
        })
    }

    /// Effective field name for every position.
    ///
    /// A placeholder takes the nearest preceding real attribute. With none
    /// before it, it takes the first real attribute of the whole path, even
    /// when that one sits further right. Returns `None` when the path holds
    /// no real attribute at all.
    pub fn resolve(&self) -> Option<Vec<String>> {
        let first_real = self.real_attributes().next()?;

        let mut last_real: Option<&str> = None;
        let mut resolved = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            match entry {
                PathEntry::Attribute(attr) => {
                    last_real = Some(attr.as_str());
                    resolved.push(attr.clone());
                }
                PathEntry::Placeholder => {
                    resolved.push(last_real.unwrap_or(first_real).to_string());
                }
            }
        }
        Some(resolved)
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = self
            .entries
            .iter()
            .map(|e| match e {
                PathEntry::Attribute(a) => a.as_str(),
                PathEntry::Placeholder => "*",
            })
            .collect();
        write!(f, "{}", parts.join(" > "))
    }
}
