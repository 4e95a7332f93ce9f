use indexmap::IndexSet;
use tracing::debug;

use crate::descriptor::{resolve_raw_type, ServiceDescriptor, TypeRef};

/// Prune a service to the transitive closure of types reachable from
/// the requested operations and types. An empty selection is the
/// identity. Iteration follows insertion order throughout, so repeated
/// runs over identical input retain an identical set in identical
/// order, and filtering an already-filtered service is a no-op.
pub fn filter(
    service: ServiceDescriptor,
    operation_names: &[String],
    class_names: &[String],
) -> ServiceDescriptor {
    if operation_names.is_empty() && class_names.is_empty() {
        return service;
    }

    let mut worklist: Vec<TypeRef> = Vec::new();

    // Seed with the selected types, in the service's insertion order.
    for (identifier, &ref_) in &service.types {
        if class_names.iter().any(|c| c == identifier) {
            worklist.push(ref_);
        }
    }
    // Seed with everything the selected operations touch.
    for (name, op) in &service.operations {
        if operation_names.iter().any(|o| o == name) {
            worklist.extend(op.linked_types());
        }
    }

    // Transitive-closure fixpoint over members and base types.
    let mut reachable: IndexSet<TypeRef> = IndexSet::new();
    while let Some(ref_) = worklist.pop() {
        if !reachable.insert(ref_) {
            continue;
        }
        let descriptor = service.type_descriptor(ref_);
        for member in &descriptor.members {
            if let Some(member_ref) = resolve_raw_type(&service.types, &member.raw_type) {
                worklist.push(member_ref);
            }
        }
        if let Some(base) = descriptor.resolved_base(ref_) {
            worklist.push(base);
        }
    }

    let types = service
        .types
        .iter()
        .filter(|(_, ref_)| reachable.contains(*ref_))
        .map(|(identifier, &ref_)| (identifier.clone(), ref_))
        .collect();

    let operations = service
        .operations
        .iter()
        .filter(|(name, op)| {
            if operation_names.iter().any(|o| o == *name) {
                return true;
            }
            if !operation_names.is_empty() {
                return false;
            }
            // Type-only selection: keep operations whose every linked
            // type landed inside the closure, so the output stays
            // closed.
            op.linked_types().all(|ref_| reachable.contains(&ref_))
        })
        .map(|(name, op)| (name.clone(), op.clone()))
        .collect();

    debug!(
        retained_types = reachable.len(),
        "reachability filter applied"
    );

    ServiceDescriptor {
        name: service.name,
        operations,
        types,
        table: service.table,
        description: service.description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::assemble;
    use crate::config::GeneratorConfig;
    use crate::context::RunContext;
    use crate::graph::TypeGraphBuilder;
    use crate::loader::SchemaIndex;
    use crate::signature;

    /// The book service from the reachability example: GetBook pulls a
    /// request/response pair with transitive members, GetAuthor owns a
    /// disjoint set of types.
    fn book_service() -> ServiceDescriptor {
        let raw_entries: Vec<String> = [
            "struct Get_Book_Type_Request {\n Method_Get_Book_Request_BOOK book;\n}",
            "struct Get_Book_Type_Response {\n string status;\n}",
            "struct Method_Get_Book_Request_BOOK {\n Book_Type_Enumeration kind;\n}",
            "struct Book_Type_Enumeration {\n string value;\n}",
            "struct Get_Author_Type_Request {\n string name;\n}",
            "struct Get_Author_Type_Response {\n string biography;\n}",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let config = GeneratorConfig::default();
        let mut ctx = RunContext::new();
        let registry = TypeGraphBuilder::new(&SchemaIndex::empty(), &config)
            .build(&raw_entries, &mut ctx)
            .unwrap();
        let operations = vec![
            signature::parse("Get_Book_Type_Response GetBook(Get_Book_Type_Request $request)")
                .unwrap(),
            signature::parse(
                "Get_Author_Type_Response GetAuthor(Get_Author_Type_Request $request)",
            )
            .unwrap(),
        ];
        assemble("BookService".into(), registry, operations, None)
    }

    #[test]
    fn empty_selection_is_identity() {
        let service = book_service();
        let filtered = filter(service.clone(), &[], &[]);
        assert_eq!(filtered.operations.len(), service.operations.len());
        assert_eq!(filtered.types.len(), service.types.len());
    }

    #[test]
    fn operation_selection_retains_exactly_the_reachable_closure() {
        let filtered = filter(book_service(), &["GetBook".to_string()], &[]);

        let ops: Vec<&str> = filtered.operations.keys().map(String::as_str).collect();
        assert_eq!(ops, vec!["GetBook"]);
        let types: Vec<&str> = filtered.types.keys().map(String::as_str).collect();
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
    fn output_is_closed_over_references() {
        let filtered = filter(book_service(), &["GetBook".to_string()], &[]);
        for (_, &ref_) in &filtered.types {
            let descriptor = filtered.type_descriptor(ref_);
            for member in &descriptor.members {
                if let Some(member_ref) = resolve_raw_type(&filtered.types, &member.raw_type) {
                    assert!(filtered.types.values().any(|&r| r == member_ref));
                }
            }
        }
        for op in filtered.operations.values() {
            for ref_ in op.linked_types() {
                assert!(filtered.types.values().any(|&r| r == ref_));
            }
        }
    }

    #[test]
    fn filtering_is_idempotent() {
        let selection = vec!["GetBook".to_string()];
        let once = filter(book_service(), &selection, &[]);
        let twice = filter(once.clone(), &selection, &[]);
        let once_types: Vec<&String> = once.types.keys().collect();
        let twice_types: Vec<&String> = twice.types.keys().collect();
        assert_eq!(once_types, twice_types);
        assert_eq!(
            once.operations.keys().collect::<Vec<_>>(),
            twice.operations.keys().collect::<Vec<_>>()
        );
    }

    #[test]
    fn type_selection_keeps_closed_operations() {
        let filtered = filter(
            book_service(),
            &[],
            &[
                "Get_Book_Type_Request".to_string(),
                "Get_Book_Type_Response".to_string(),
            ],
        );
        let ops: Vec<&str> = filtered.operations.keys().map(String::as_str).collect();
        assert_eq!(ops, vec!["GetBook"]);
        assert!(filtered.types.contains_key("Book_Type_Enumeration"));
        assert!(!filtered.types.contains_key("Get_Author_Type_Request"));
    }

    #[test]
    fn base_types_are_pulled_into_the_closure() {
        let raw_entries: Vec<String> = vec![
            "struct Novel {\n string plot;\n}".to_string(),
            "struct Book {\n string title;\n}".to_string(),
        ];
        let config = GeneratorConfig::default();
        let mut ctx = RunContext::new();
        let mut registry = TypeGraphBuilder::new(&SchemaIndex::empty(), &config)
            .build(&raw_entries, &mut ctx)
            .unwrap();
        let novel = registry.by_identifier["Novel"];
        let book = registry.by_identifier["Book"];
        registry.table.get_mut(novel).base_type = Some(book);
        let op = signature::parse("Novel GetNovel()").unwrap();
        let service = assemble("S".into(), registry, vec![op], None);

        let filtered = filter(service, &["GetNovel".to_string()], &[]);
        assert!(filtered.types.contains_key("Book"));
    }
}
