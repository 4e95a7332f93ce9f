use roxmltree::Node;

use crate::location::SchemaLocation;

/// Kind of a schema-document reference.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ReferenceKind {
    Import,
    Include,
}

/// An `import` or `include` found in a schema document. An import is
/// allowed to carry no `schemaLocation` at all, in which case there is
/// nothing to load and the reference is inert.
#[derive(Clone, Debug)]
pub struct SchemaReference {
    pub kind: ReferenceKind,
    pub location: Option<String>,
}

/// Upper occurrence bound of an element particle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MaxOccurs {
    Count(u64),
    Unbounded,
}

impl MaxOccurs {
    /// True when the element may occur more than once, which makes the
    /// owning member array-typed.
    pub fn is_multiple(&self) -> bool {
        match self {
            Self::Unbounded => true,
            Self::Count(n) => *n >= 2,
        }
    }
}

/// One element particle inside a type's content model, reduced to the
/// facts the classifier consumes.
#[derive(Clone, Debug)]
pub struct ElementOccurrence {
    pub name: String,
    pub type_name: String,
    pub nillable: bool,
    pub min_occurs: u64,
    pub max_occurs: MaxOccurs,
}

/// Schema-side view of one named type: the annotations the raw
/// introspected string does not carry (nillability, occurrence bounds,
/// abstractness, facets, extension base).
#[derive(Clone, Debug)]
pub struct TypeElement {
    pub name: String,
    /// True for `complexType` (and inline complex content), i.e. the
    /// element describes a structural type rather than a restriction.
    pub structural: bool,
    pub abstract_: bool,
    /// Local name of the `extension` base, if any.
    pub base: Option<String>,
    /// Local name of the `restriction` base datatype, if any.
    pub restriction_base: Option<String>,
    pub enumeration: Vec<String>,
    pub pattern: Option<String>,
    pub elements: Vec<ElementOccurrence>,
}

/// One loaded schema document, reduced to owned data. Extraction is
/// eager because `roxmltree` nodes borrow the backing string.
#[derive(Clone, Debug)]
pub struct SchemaDocument {
    pub location: SchemaLocation,
    pub target_namespace: Option<String>,
    pub references: Vec<SchemaReference>,
    pub types: Vec<TypeElement>,
}

impl SchemaDocument {
    /// Map a parsed document into the owned model. The document may be
    /// a bare schema or a WSDL embedding one or more schemas under its
    /// `types` section; every `schema` element found is harvested.
    pub fn map_from_xml(location: SchemaLocation, doc: &roxmltree::Document) -> Self {
        let mut target_namespace = None;
        let mut references = Vec::new();
        let mut types = Vec::new();

        for schema in doc
            .root()
            .descendants()
            .filter(|n| n.is_element() && n.tag_name().name() == "schema")
        {
            if target_namespace.is_none() {
                target_namespace = schema.attribute("targetNamespace").map(str::to_string);
            }
            for child in schema.children().filter(Node::is_element) {
                match child.tag_name().name() {
                    "import" => references.push(SchemaReference {
                        kind: ReferenceKind::Import,
                        location: child.attribute("schemaLocation").map(str::to_string),
                    }),
                    "include" => references.push(SchemaReference {
                        kind: ReferenceKind::Include,
                        location: child.attribute("schemaLocation").map(str::to_string),
                    }),
                    "complexType" => {
                        if let Some(element) = map_complex_type(child, None) {
                            types.push(element);
                        }
                    }
                    "simpleType" => {
                        if let Some(element) = map_simple_type(child, None) {
                            types.push(element);
                        }
                    }
                    "element" => {
                        // A top-level element with an inline complexType is
                        // registered under the element name; WSDL wrappers
                        // commonly take this shape.
                        if let Some(name) = child.attribute("name") {
                            if let Some(inline) = child
                                .children()
                                .find(|n| n.is_element() && n.tag_name().name() == "complexType")
                            {
                                if let Some(element) = map_complex_type(inline, Some(name)) {
                                    types.push(element);
                                }
                            }
                        }
                    }
                    _ => {}
                }
            }
        }

        SchemaDocument {
            location,
            target_namespace,
            references,
            types,
        }
    }

    pub fn find_type_element(&self, name: &str) -> Option<&TypeElement> {
        self.types.iter().find(|t| t.name == name)
    }
}

fn map_complex_type(node: Node, name_override: Option<&str>) -> Option<TypeElement> {
    let name = match name_override {
        Some(name) => name.to_string(),
        None => node.attribute("name")?.to_string(),
    };
    let abstract_ = bool_attribute(node, "abstract");

    // The content model is either directly a sequence/all/choice, or
    // wrapped in complexContent/extension when the type inherits.
    let mut base = None;
    let mut content = node;
    if let Some(complex_content) = child_element(node, "complexContent") {
        if let Some(extension) = child_element(complex_content, "extension") {
            base = extension.attribute("base").map(local_name);
            content = extension;
        } else if let Some(restriction) = child_element(complex_content, "restriction") {
            content = restriction;
        }
    }

    let mut elements = Vec::new();
    for group in ["sequence", "all", "choice"] {
        if let Some(group_node) = child_element(content, group) {
            for element in group_node
                .children()
                .filter(|n| n.is_element() && n.tag_name().name() == "element")
            {
                if let Some(occurrence) = map_element_occurrence(element) {
                    elements.push(occurrence);
                }
            }
        }
    }

    Some(TypeElement {
        name,
        structural: true,
        abstract_,
        base,
        restriction_base: None,
        enumeration: Vec::new(),
        pattern: None,
        elements,
    })
}

fn map_simple_type(node: Node, name_override: Option<&str>) -> Option<TypeElement> {
    let name = match name_override {
        Some(name) => name.to_string(),
        None => node.attribute("name")?.to_string(),
    };
    let restriction = child_element(node, "restriction");

    let mut restriction_base = None;
    let mut enumeration = Vec::new();
    let mut pattern = None;
    if let Some(restriction) = restriction {
        restriction_base = restriction.attribute("base").map(local_name);
        for facet in restriction.children().filter(Node::is_element) {
            match facet.tag_name().name() {
                "enumeration" => {
                    if let Some(value) = facet.attribute("value") {
                        enumeration.push(value.to_string());
                    }
                }
                "pattern" => {
                    if pattern.is_none() {
                        pattern = facet.attribute("value").map(str::to_string);
                    }
                }
                _ => {}
            }
        }
    }

    Some(TypeElement {
        name,
        structural: false,
        abstract_: false,
        base: None,
        restriction_base,
        enumeration,
        pattern,
        elements: Vec::new(),
    })
}

fn map_element_occurrence(element: Node) -> Option<ElementOccurrence> {
    let name = element.attribute("name")?.to_string();
    let type_name = element
        .attribute("type")
        .map(local_name)
        .unwrap_or_default();
    let nillable = bool_attribute(element, "nillable");
    let min_occurs = element
        .attribute("minOccurs")
        .and_then(|v| v.parse().ok())
        .unwrap_or(1);
    let max_occurs = match element.attribute("maxOccurs") {
        Some("unbounded") => MaxOccurs::Unbounded,
        Some(count) => MaxOccurs::Count(count.parse().ok()?),
        None => MaxOccurs::Count(1),
    };
    Some(ElementOccurrence {
        name,
        type_name,
        nillable,
        min_occurs,
        max_occurs,
    })
}

fn child_element<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

fn bool_attribute(node: Node, name: &str) -> bool {
    matches!(node.attribute(name), Some("true") | Some("1"))
}

/// Strip any namespace prefix off a QName attribute value.
fn local_name(qname: &str) -> String {
    qname.rsplit(':').next().unwrap_or(qname).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> SchemaDocument {
        let doc = roxmltree::Document::parse(xml).unwrap();
        SchemaDocument::map_from_xml(SchemaLocation::new("test.xsd"), &doc)
    }

    const SCHEMA: &str = r#"
        <schema xmlns="http://www.w3.org/2001/XMLSchema"
                targetNamespace="urn:books">
            <include schemaLocation="common.xsd"/>
            <complexType name="Book" abstract="true">
                <sequence>
                    <element name="title" type="xsd:string" nillable="true"/>
                    <element name="tags" type="xsd:string" minOccurs="0" maxOccurs="unbounded"/>
                </sequence>
            </complexType>
            <complexType name="Novel">
                <complexContent>
                    <extension base="tns:Book">
                        <sequence>
                            <element name="plot" type="xsd:string"/>
                        </sequence>
                    </extension>
                </complexContent>
            </complexType>
            <simpleType name="BookKind">
                <restriction base="xsd:string">
                    <enumeration value="paperback"/>
                    <enumeration value="hardcover"/>
                </restriction>
            </simpleType>
            <simpleType name="Isbn">
                <restriction base="xsd:string">
                    <pattern value="[0-9]{13}"/>
                </restriction>
            </simpleType>
            <element name="GetBookRequest">
                <complexType>
                    <sequence>
                        <element name="id" type="xsd:int"/>
                    </sequence>
                </complexType>
            </element>
        </schema>"#;

    #[test]
    fn complex_type_carries_occurrence_facts() {
        let doc = parse(SCHEMA);
        let book = doc.find_type_element("Book").unwrap();
        assert!(book.structural);
        assert!(book.abstract_);
        let title = &book.elements[0];
        assert!(title.nillable);
        assert_eq!(title.min_occurs, 1);
        let tags = &book.elements[1];
        assert_eq!(tags.min_occurs, 0);
        assert_eq!(tags.max_occurs, MaxOccurs::Unbounded);
        assert!(tags.max_occurs.is_multiple());
    }

    #[test]
    fn extension_base_uses_local_name() {
        let doc = parse(SCHEMA);
        let novel = doc.find_type_element("Novel").unwrap();
        assert_eq!(novel.base.as_deref(), Some("Book"));
        assert_eq!(novel.elements[0].name, "plot");
    }

    #[test]
    fn simple_type_facets_are_captured() {
        let doc = parse(SCHEMA);
        let kind = doc.find_type_element("BookKind").unwrap();
        assert_eq!(kind.enumeration, vec!["paperback", "hardcover"]);
        assert_eq!(kind.restriction_base.as_deref(), Some("string"));
        let isbn = doc.find_type_element("Isbn").unwrap();
        assert_eq!(isbn.pattern.as_deref(), Some("[0-9]{13}"));
    }

    #[test]
    fn inline_element_type_registered_under_element_name() {
        let doc = parse(SCHEMA);
        let request = doc.find_type_element("GetBookRequest").unwrap();
        assert!(request.structural);
        assert_eq!(request.elements[0].name, "id");
    }

    #[test]
    fn references_are_collected() {
        let doc = parse(SCHEMA);
        assert_eq!(doc.references.len(), 1);
        assert_eq!(doc.references[0].kind, ReferenceKind::Include);
        assert_eq!(doc.references[0].location.as_deref(), Some("common.xsd"));
    }
}
