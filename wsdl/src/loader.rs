use thiserror::Error;
use tracing::{debug, warn};

use crate::context::RunContext;
use crate::document::{SchemaDocument, TypeElement};
use crate::location::SchemaLocation;

/// A referenced schema document could not be turned into a
/// [`SchemaDocument`]. Fatal only for the root document; references
/// that fail are skipped with a warning.
#[derive(Debug, Error)]
pub enum SchemaLoadError {
    #[error("failed to fetch schema document {location}: {reason}")]
    Fetch { location: String, reason: String },
    #[error("failed to parse schema document {location}: {source}")]
    Parse {
        location: String,
        #[source]
        source: roxmltree::Error,
    },
}

/// Fetches the raw text of a schema document. Implementations decide
/// the transport (filesystem, HTTP, in-memory fixtures); the loader
/// only sees resolved locations.
pub trait DocumentResolver {
    fn fetch(&self, location: &SchemaLocation) -> Result<String, SchemaLoadError>;
}

/// Single logical index over the root document and everything it
/// transitively imports or includes, in load order.
#[derive(Clone, Debug, Default)]
pub struct SchemaIndex {
    documents: Vec<SchemaDocument>,
}

impl SchemaIndex {
    /// An index with no documents; every lookup misses. Used when no
    /// schema root is available and classification must run on raw
    /// strings alone.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn documents(&self) -> &[SchemaDocument] {
        &self.documents
    }

    /// Find the schema element for a type name, searching the root
    /// document first and then referenced documents in load order.
    pub fn find_type_element(&self, name: &str) -> Option<&TypeElement> {
        self.documents
            .iter()
            .find_map(|doc| doc.find_type_element(name))
    }
}

/// Loads a root schema document and the transitive closure of its
/// references. The visited set in the run context is keyed by resolved
/// location and is the sole guard against cyclic imports.
pub struct SchemaGraphLoader<'a> {
    resolver: &'a dyn DocumentResolver,
}

impl<'a> SchemaGraphLoader<'a> {
    pub fn new(resolver: &'a dyn DocumentResolver) -> Self {
        Self { resolver }
    }

    pub fn load(
        &self,
        root: SchemaLocation,
        ctx: &mut RunContext,
    ) -> Result<SchemaIndex, SchemaLoadError> {
        let mut index = SchemaIndex::default();
        ctx.visited.insert(root.clone());
        let document = self.load_document(&root)?;
        index.documents.push(document);
        self.load_references(0, &mut index, ctx);
        Ok(index)
    }

    /// Depth-first over the references of `index.documents[position]`,
    /// so the index ends up in load order: root, then each reference
    /// and its own references before the next sibling.
    fn load_references(&self, position: usize, index: &mut SchemaIndex, ctx: &mut RunContext) {
        let document = &index.documents[position];
        let base = document.location.clone();
        let referenced: Vec<SchemaLocation> = document
            .references
            .iter()
            .filter_map(|r| r.location.as_deref())
            .map(|location| base.resolve(location))
            .collect();

        for location in referenced {
            if !ctx.visited.insert(location.clone()) {
                debug!(%location, "schema document already visited, skipping");
                continue;
            }
            match self.load_document(&location) {
                Ok(document) => {
                    index.documents.push(document);
                    self.load_references(index.documents.len() - 1, index, ctx);
                }
                Err(error) => {
                    warn!(%location, %error, "skipping unloadable schema reference");
                }
            }
        }
    }

    fn load_document(&self, location: &SchemaLocation) -> Result<SchemaDocument, SchemaLoadError> {
        let text = self.resolver.fetch(location)?;
        let doc = roxmltree::Document::parse(&text).map_err(|source| SchemaLoadError::Parse {
            location: location.to_string(),
            source,
        })?;
        Ok(SchemaDocument::map_from_xml(location.clone(), &doc))
    }
}
