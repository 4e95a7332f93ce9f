//! Turns raw, loosely-structured WSDL introspection output (type and
//! operation strings plus XML Schema annotations) into a consistent,
//! uniquely-named, dependency-resolved object model a code emitter can
//! render.

pub mod assemble;
pub mod classify;
pub mod config;
pub mod context;
pub mod descriptor;
pub mod document;
pub mod error;
pub mod filter;
pub mod graph;
pub mod loader;
pub mod location;
pub mod naming;
pub mod signature;

pub use config::GeneratorConfig;
pub use context::RunContext;
pub use descriptor::{
    Member, OperationDescriptor, Param, ServiceDescriptor, TypeDescriptor, TypeKind, TypeRef,
    TypeTable,
};
pub use error::{Error, NameResolutionError, SignatureParseError};
pub use loader::{DocumentResolver, SchemaGraphLoader, SchemaIndex, SchemaLoadError};
pub use location::SchemaLocation;
pub use naming::NameBindingTable;

use graph::TypeGraphBuilder;

/// Raw introspection output of one service, as handed over by the
/// SOAP client abstraction: one string per type, one per operation.
#[derive(Clone, Debug, Default)]
pub struct Introspection {
    pub service_name: String,
    pub description: Option<String>,
    pub raw_types: Vec<String>,
    pub raw_operations: Vec<String>,
}

/// Run the whole pipeline: classify and register the types, link base
/// types, mint names, parse the operations, assemble the service and
/// apply the configured reachability filter. Fails atomically; no
/// partial descriptor is ever returned.
pub fn resolve_service(
    introspection: &Introspection,
    index: &SchemaIndex,
    config: &GeneratorConfig,
    ctx: &mut RunContext,
) -> Result<ServiceDescriptor, Error> {
    let registry = TypeGraphBuilder::new(index, config).build(&introspection.raw_types, ctx)?;

    let mut operations = Vec::with_capacity(introspection.raw_operations.len());
    for raw in &introspection.raw_operations {
        let mut op = signature::parse(raw)?;
        op.validated_name = ctx.names.validate(&op.name, &config.namespace_name)?;
        operations.push(op);
    }

    let service = assemble::assemble(
        introspection.service_name.clone(),
        registry,
        operations,
        introspection.description.clone(),
    );
    Ok(filter::filter(
        service,
        &config.operation_names,
        &config.class_names,
    ))
}
