use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::classify::{classify, RawTypeEntry};
use crate::config::GeneratorConfig;
use crate::context::RunContext;
use crate::descriptor::{TypeKind, TypeRef, TypeTable};
use crate::error::Error;
use crate::loader::SchemaIndex;

/// Output of the graph builder: every retained descriptor in
/// registration order, plus the identifier lookup the assembler and
/// filter resolve raw type strings against.
#[derive(Clone, Debug, Default)]
pub struct TypeRegistry {
    pub table: TypeTable,
    /// First-registered descriptor per raw identifier, in registration
    /// order. This becomes the service's `types` map.
    pub by_identifier: IndexMap<String, TypeRef>,
    /// Every retained descriptor in registration order, including
    /// identifier collisions kept under `shared_types = false`.
    pub order: Vec<TypeRef>,
}

/// Builds the type graph in two explicit phases. Two passes are
/// mandatory: an extension base may name a type declared later in the
/// input, so links can only be resolved once registration is complete.
/// Names are minted strictly after both phases, in registration order,
/// so allocation is reproducible across runs on the same input.
pub struct TypeGraphBuilder<'a> {
    index: &'a SchemaIndex,
    config: &'a GeneratorConfig,
}

impl<'a> TypeGraphBuilder<'a> {
    pub fn new(index: &'a SchemaIndex, config: &'a GeneratorConfig) -> Self {
        Self { index, config }
    }

    pub fn build(
        &self,
        raw_entries: &[String],
        ctx: &mut RunContext,
    ) -> Result<TypeRegistry, Error> {
        let mut registry = TypeRegistry::default();
        self.register_all(raw_entries, &mut registry);
        self.link_bases(&mut registry);
        self.allocate_names(&mut registry, ctx)?;
        Ok(registry)
    }

    /// Phase 1: classify every raw entry in input order and register
    /// the descriptors. With `shared_types`, a duplicate raw
    /// identifier is discarded in favor of the first registration.
    fn register_all(&self, raw_entries: &[String], registry: &mut TypeRegistry) {
        for raw in raw_entries {
            let Some(entry) = RawTypeEntry::parse(raw) else {
                debug!(entry = raw.as_str(), "skipping unparseable type entry");
                continue;
            };
            let Some(descriptor) = classify(&entry, self.index) else {
                continue;
            };

            if registry.by_identifier.contains_key(&descriptor.identifier) {
                if self.config.shared_types {
                    debug!(
                        identifier = %descriptor.identifier,
                        "duplicate identifier, keeping first registration"
                    );
                    continue;
                }
                // Retained independently; naming disambiguates later.
                let ref_ = registry.table.insert(descriptor);
                registry.order.push(ref_);
                continue;
            }

            let identifier = descriptor.identifier.clone();
            let ref_ = registry.table.insert(descriptor);
            registry.by_identifier.insert(identifier, ref_);
            registry.order.push(ref_);
        }
    }

    /// Phase 2: resolve extension-base identifiers against the phase-1
    /// registry. Only adds links; no already-set field is touched. An
    /// unresolved or non-complex base stays unlinked (non-fatal). A
    /// self-reference is attached as-is; consumers read it through
    /// `resolved_base`, which masks it to "no base".
    fn link_bases(&self, registry: &mut TypeRegistry) {
        for position in 0..registry.order.len() {
            let ref_ = registry.order[position];
            let descriptor = ref_.get(&registry.table);
            if descriptor.kind != TypeKind::Complex {
                continue;
            }
            let Some(base_name) = descriptor.extension_base.clone() else {
                continue;
            };

            match registry.by_identifier.get(&base_name).copied() {
                Some(base) if base.get(&registry.table).kind == TypeKind::Complex => {
                    registry.table.get_mut(ref_).base_type = Some(base);
                }
                Some(_) => warn!(
                    identifier = %ref_.get(&registry.table).identifier,
                    base = %base_name,
                    "extension base is not a complex type, leaving unlinked"
                ),
                None => warn!(
                    identifier = %ref_.get(&registry.table).identifier,
                    base = %base_name,
                    "extension base not registered, leaving unlinked"
                ),
            }
        }
    }

    /// Mint validated names in registration order through the run's
    /// binding table.
    fn allocate_names(&self, registry: &mut TypeRegistry, ctx: &mut RunContext) -> Result<(), Error> {
        for &ref_ in &registry.order {
            let raw = ref_.get(&registry.table).identifier.clone();
            let validated = ctx
                .names
                .allocate(&raw, &self.config.namespace_name)?;
            registry.table.get_mut(ref_).validated_name = validated;
        }
        Ok(())
    }
}
