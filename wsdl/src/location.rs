use std::fmt;

/// Resolved location (URL or filesystem path) of a schema document.
///
/// Locations are compared verbatim; two spellings of the same document
/// only count as one visit if they resolve to the same string. This is
/// the key of the per-run visited set that stops cyclic imports.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaLocation(String);

impl SchemaLocation {
    pub fn new(location: impl Into<String>) -> Self {
        Self(location.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_remote(&self) -> bool {
        self.0.starts_with("http://") || self.0.starts_with("https://")
    }

    /// Resolve a `schemaLocation` reference found in the document at
    /// `self`. Absolute references (scheme-qualified or rooted) pass
    /// through; relative ones are joined onto this location's parent.
    pub fn resolve(&self, reference: &str) -> SchemaLocation {
        if reference.contains("://") || reference.starts_with('/') {
            return SchemaLocation(reference.to_string());
        }
        let reference = reference.strip_prefix("./").unwrap_or(reference);
        match self.0.rfind('/') {
            Some(slash) => SchemaLocation(format!("{}/{}", &self.0[..slash], reference)),
            None => SchemaLocation(reference.to_string()),
        }
    }
}

impl fmt::Display for SchemaLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
