mod cli;
mod introspect;
mod render;
mod resolvers;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use dt_wsdl as wsdl;
use wsdl::{GeneratorConfig, Introspection, SchemaGraphLoader, SchemaIndex, SchemaLocation};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: cli::Cli) -> Result<(), Box<dyn std::error::Error>> {
    let dump = std::fs::read_to_string(&cli.input)?;
    let (raw_types, raw_operations) = introspect::parse_dump(&dump);
    debug!(
        types = raw_types.len(),
        operations = raw_operations.len(),
        "parsed introspection dump"
    );

    let mut ctx = wsdl::RunContext::new();
    let index = match &cli.schema {
        Some(root) => {
            let root = SchemaLocation::new(root.as_str());
            info!(root = %root, "loading schema graph");
            let resolver = resolvers::resolver_for(&root);
            let index = SchemaGraphLoader::new(resolver.as_ref()).load(root, &mut ctx)?;
            debug!(documents = index.documents().len(), "schema graph loaded");
            index
        }
        None => SchemaIndex::empty(),
    };

    let config = GeneratorConfig {
        namespace_name: cli.namespace,
        shared_types: cli.shared_types,
        operation_names: cli.operations,
        class_names: cli.classes,
    };
    let introspection = Introspection {
        service_name: cli.service_name,
        description: None,
        raw_types,
        raw_operations,
    };

    let service = wsdl::resolve_service(&introspection, &index, &config, &mut ctx)?;
    print!("{}", render::render(&service));
    Ok(())
}
