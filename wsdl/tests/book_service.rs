//! End-to-end run over a small book service: schema loading with an
//! include, classification of all four kinds, base linking, naming
//! under both binding regimes, and operation filtering.

use std::collections::HashMap;

use dt_wsdl::{
    resolve_service, DocumentResolver, GeneratorConfig, Introspection, RunContext,
    SchemaGraphLoader, SchemaIndex, SchemaLoadError, SchemaLocation, TypeKind,
};

struct MapResolver(HashMap<&'static str, String>);

impl DocumentResolver for MapResolver {
    fn fetch(&self, location: &SchemaLocation) -> Result<String, SchemaLoadError> {
        self.0
            .get(location.as_str())
            .cloned()
            .ok_or_else(|| SchemaLoadError::Fetch {
                location: location.to_string(),
                reason: "not found".into(),
            })
    }
}

fn load_index() -> SchemaIndex {
    let root = r#"
        <schema xmlns="http://www.w3.org/2001/XMLSchema" targetNamespace="urn:books">
            <include schemaLocation="facets.xsd"/>
            <complexType name="Get_Book_Type_Request">
                <sequence>
                    <element name="book" type="tns:Method_Get_Book_Request_BOOK"/>
                    <element name="note" type="xsd:string" minOccurs="0"/>
                </sequence>
            </complexType>
            <complexType name="Get_Book_Type_Response">
                <sequence>
                    <element name="status" type="xsd:string" nillable="true"/>
                </sequence>
            </complexType>
            <complexType name="Method_Get_Book_Request_BOOK">
                <sequence>
                    <element name="kind" type="tns:Book_Type_Enumeration"/>
                    <element name="tags" type="xsd:string" maxOccurs="unbounded"/>
                </sequence>
            </complexType>
            <complexType name="Special_Request">
                <complexContent>
                    <extension base="tns:Get_Book_Type_Request">
                        <sequence>
                            <element name="priority" type="xsd:int"/>
                        </sequence>
                    </extension>
                </complexContent>
            </complexType>
        </schema>"#
        .to_string();
    let facets = r#"
        <schema xmlns="http://www.w3.org/2001/XMLSchema" targetNamespace="urn:books">
            <simpleType name="Book_Type_Enumeration">
                <restriction base="xsd:string">
                    <enumeration value="novel"/>
                    <enumeration value="reference"/>
                </restriction>
            </simpleType>
            <simpleType name="Isbn_Pattern">
                <restriction base="xsd:string">
                    <pattern value="[0-9]{13}"/>
                </restriction>
            </simpleType>
        </schema>"#
        .to_string();

    let resolver = MapResolver(HashMap::from([
        ("books.wsdl", root),
        ("facets.xsd", facets),
    ]));
    let mut ctx = RunContext::new();
    SchemaGraphLoader::new(&resolver)
        .load(SchemaLocation::new("books.wsdl"), &mut ctx)
        .unwrap()
}

fn introspection() -> Introspection {
    Introspection {
        service_name: "BookService".into(),
        description: Some("Catalogue lookup".into()),
        raw_types: [
            "struct Get_Book_Type_Request {\n Method_Get_Book_Request_BOOK book;\n string note;\n}",
            "struct Get_Book_Type_Response {\n string status;\n}",
            "struct Method_Get_Book_Request_BOOK {\n Book_Type_Enumeration kind;\n string tags;\n}",
            "string Book_Type_Enumeration",
            "string Isbn_Pattern",
            "struct Special_Request {\n int priority;\n}",
            "struct ArrayOfBook {\n Book_Type_Enumeration Book[];\n}",
            "struct Get_Author_Type_Request {\n string name;\n}",
            "struct Get_Author_Type_Response {\n string biography;\n}",
            "string anyURI",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
        raw_operations: vec![
            "Get_Book_Type_Response GetBook(Get_Book_Type_Request $request)".into(),
            "Get_Author_Type_Response GetAuthor(Get_Author_Type_Request $request)".into(),
        ],
    }
}

#[test]
fn full_pipeline_resolves_all_kinds() {
    let index = load_index();
    let config = GeneratorConfig::default();
    let mut ctx = RunContext::new();
    let service = resolve_service(&introspection(), &index, &config, &mut ctx).unwrap();

    // The bare anyURI restriction is unclassifiable and dropped.
    assert!(!service.types.contains_key("anyURI"));

    let enum_ref = service.types["Book_Type_Enumeration"];
    let enumeration = service.type_descriptor(enum_ref);
    assert_eq!(enumeration.kind, TypeKind::Enum);
    assert_eq!(enumeration.enumeration_values, vec!["novel", "reference"]);

    let pattern = service.type_descriptor(service.types["Isbn_Pattern"]);
    assert_eq!(pattern.kind, TypeKind::Pattern);
    assert_eq!(pattern.pattern_value.as_deref(), Some("[0-9]{13}"));

    let array = service.type_descriptor(service.types["ArrayOfBook"]);
    assert_eq!(array.kind, TypeKind::Array);
    assert_eq!(array.members[0].raw_type, "Book_Type_Enumeration");

    let request = service.type_descriptor(service.types["Get_Book_Type_Request"]);
    assert_eq!(request.kind, TypeKind::Complex);
    // minOccurs=0 without nillable still reads as nullable.
    assert!(request.members[1].nullable);

    let book = service.type_descriptor(service.types["Method_Get_Book_Request_BOOK"]);
    // maxOccurs=unbounded makes the member array-typed.
    assert!(book.members[1].is_array);
    assert_eq!(book.members[1].raw_type, "string[]");

    // Extension base resolved through the schema, across passes.
    let special_ref = service.types["Special_Request"];
    let special = service.type_descriptor(special_ref);
    assert_eq!(
        special.resolved_base(special_ref),
        Some(service.types["Get_Book_Type_Request"])
    );

    // Every validated name is populated.
    for &type_ref in service.types.values() {
        assert!(!service.type_descriptor(type_ref).validated_name.is_empty());
    }
    for op in service.operations.values() {
        assert!(!op.validated_name.is_empty());
    }
}

#[test]
fn operation_filter_retains_exactly_the_book_closure() {
    let index = load_index();
    let config = GeneratorConfig {
        operation_names: vec!["GetBook".into()],
        ..GeneratorConfig::default()
    };
    let mut ctx = RunContext::new();
    let service = resolve_service(&introspection(), &index, &config, &mut ctx).unwrap();

    let ops: Vec<&str> = service.operations.keys().map(String::as_str).collect();
    assert_eq!(ops, vec!["GetBook"]);

    let types: Vec<&str> = service.types.keys().map(String::as_str).collect();
    assert_eq!(
        types,
        vec![
            "Get_Book_Type_Request",
            "Get_Book_Type_Response",
            "Method_Get_Book_Request_BOOK",
            "Book_Type_Enumeration",
        ]
    );
}

#[test]
fn namespace_scope_isolates_reserved_names() {
    let introspection = Introspection {
        service_name: "S".into(),
        description: None,
        raw_types: vec!["struct Iterator {\n string position;\n}".into()],
        raw_operations: Vec::new(),
    };
    let index = SchemaIndex::empty();

    let mut ctx = RunContext::new();
    let global = resolve_service(
        &introspection,
        &index,
        &GeneratorConfig::default(),
        &mut ctx,
    )
    .unwrap();
    let iterator = global.type_descriptor(global.types["Iterator"]);
    assert_eq!(iterator.validated_name, "IteratorCustom");

    let namespaced_config = GeneratorConfig {
        namespace_name: "Books".into(),
        ..GeneratorConfig::default()
    };
    let mut ctx = RunContext::new();
    let namespaced =
        resolve_service(&introspection, &index, &namespaced_config, &mut ctx).unwrap();
    let iterator = namespaced.type_descriptor(namespaced.types["Iterator"]);
    assert_eq!(iterator.validated_name, "Iterator");
}

#[test]
fn bogus_operation_signature_aborts_the_run() {
    let introspection = Introspection {
        service_name: "S".into(),
        description: None,
        raw_types: Vec::new(),
        raw_operations: vec!["bogus***".into()],
    };
    let mut ctx = RunContext::new();
    let result = resolve_service(
        &introspection,
        &SchemaIndex::empty(),
        &GeneratorConfig::default(),
        &mut ctx,
    );
    assert!(matches!(
        result,
        Err(dt_wsdl::Error::SignatureParse(e)) if e.signature == "bogus***"
    ));
}
