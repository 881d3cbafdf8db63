use serde::{Deserialize, Serialize};

/// Row shown in a selectable table, identified by a string key.
pub trait SelectableRow {
    /// Returns the key stored in the selection.
    fn row_key(&self) -> &str;

    /// Returns true when the row matches a lowercase search needle.
    fn matches_search(&self, needle: &str) -> bool {
        self.row_key().to_lowercase().contains(needle)
    }
}

impl<R: SelectableRow + ?Sized> SelectableRow for &R {
    fn row_key(&self) -> &str {
        (**self).row_key()
    }

    fn matches_search(&self, needle: &str) -> bool {
        (**self).matches_search(needle)
    }
}

/// Project reported by a provider, offered by the project selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderProject {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    href: Option<String>,
    #[serde(default)]
    missing: bool,
}

impl ProviderProject {
    /// Creates a provider project row.
    #[must_use]
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            name: name.into(),
            description,
            href: None,
            missing: false,
        }
    }

    /// Returns the project name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the provider link.
    #[must_use]
    pub fn href(&self) -> Option<&str> {
        self.href.as_deref()
    }
}

impl SelectableRow for ProviderProject {
    fn row_key(&self) -> &str {
        self.name.as_str()
    }

    fn matches_search(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self
                .description
                .as_deref()
                .is_some_and(|description| description.to_lowercase().contains(needle))
    }
}

#[cfg(test)]
mod tests {
    use super::{ProviderProject, SelectableRow};

    #[test]
    fn search_covers_name_and_description() {
        let project = ProviderProject::new("Alpha", Some("Payments Gateway".to_owned()));

        assert!(project.matches_search("alp"));
        assert!(project.matches_search("gateway"));
        assert!(!project.matches_search("beta"));
    }
}
