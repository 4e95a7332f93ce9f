/// Configuration surface of one generation run. Values only; how they
/// are parsed (CLI, config file) is the caller's concern.
#[derive(Clone, Debug, Default)]
pub struct GeneratorConfig {
    /// Binding scope for minted identifiers. Empty means the single
    /// global scope.
    pub namespace_name: String,
    /// When set, duplicate raw identifiers collapse onto the first
    /// registered descriptor; otherwise every entry is retained and
    /// naming disambiguates.
    pub shared_types: bool,
    /// Operations to keep; empty means no operation filtering.
    pub operation_names: Vec<String>,
    /// Types to keep; empty means no type filtering.
    pub class_names: Vec<String>,
}
