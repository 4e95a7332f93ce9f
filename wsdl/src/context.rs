use std::collections::HashSet;

use crate::location::SchemaLocation;
use crate::naming::NameBindingTable;

/// All mutable state of one generation run: the name binding table and
/// the schema visited set. Created fresh per run and passed by
/// reference into every component, so independent runs never share
/// state. A host parallelizing across WSDL inputs gives each run its
/// own context.
#[derive(Debug, Default)]
pub struct RunContext {
    pub names: NameBindingTable,
    pub visited: HashSet<SchemaLocation>,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }
}
