use thiserror::Error;

use crate::loader::SchemaLoadError;

/// A raw operation string matched neither accepted signature form.
/// Fatal for the run: an unparseable operation means the introspection
/// contract was violated. Carries the originating input verbatim.
#[derive(Debug, Error)]
#[error("operation signature {signature:?} matches no accepted form")]
pub struct SignatureParseError {
    pub signature: String,
}

/// Uniquification did not terminate within the defensive attempt
/// bound. Signals pathological input, not an ordinary collision.
#[derive(Debug, Error)]
#[error("failed to allocate a unique name for {name:?} within {attempts} attempts")]
pub struct NameResolutionError {
    pub name: String,
    pub attempts: u32,
}

/// Fatal errors of one generation run. Reference-level schema load
/// failures and unclassifiable type entries are recovered locally and
/// never surface here; no partial service descriptor escapes on error.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    SchemaLoad(#[from] SchemaLoadError),
    #[error(transparent)]
    SignatureParse(#[from] SignatureParseError),
    #[error(transparent)]
    NameResolution(#[from] NameResolutionError),
}
