use clap::Parser;

#[derive(Parser)]
#[clap(version, about)]
pub struct Cli {
    #[clap(
        value_parser,
        help = "Introspection dump: one raw type block or operation signature per entry"
    )]
    pub input: String,

    #[clap(
        long,
        help = "Root WSDL/XSD document (file or URL) supplying schema annotations"
    )]
    pub schema: Option<String>,

    #[clap(long, help = "Name of the resolved service", default_value = "Service")]
    pub service_name: String,

    #[clap(
        long,
        default_value = "",
        help = "Namespace isolating minted identifiers (empty = global scope)"
    )]
    pub namespace: String,

    #[clap(
        long,
        help = "Collapse duplicate raw identifiers onto the first registered type"
    )]
    pub shared_types: bool,

    #[clap(
        long,
        value_delimiter = ',',
        help = "Restrict the output to these operations and their reachable types"
    )]
    pub operations: Vec<String>,

    #[clap(
        long,
        value_delimiter = ',',
        help = "Restrict the output to these types and their reachable closure"
    )]
    pub classes: Vec<String>,
}
