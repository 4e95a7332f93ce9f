use indexmap::IndexMap;

use crate::descriptor::{resolve_raw_type, OperationDescriptor, ServiceDescriptor};
use crate::graph::TypeRegistry;

/// Compose the final service descriptor. Pure composition: the only
/// work is linking every operation parameter and return slot whose raw
/// type matches a registered identifier to its descriptor reference.
/// Unmatched raw types stay opaque strings (primitives or
/// target-language natives).
pub fn assemble(
    name: String,
    registry: TypeRegistry,
    operations: Vec<OperationDescriptor>,
    description: Option<String>,
) -> ServiceDescriptor {
    let TypeRegistry {
        table,
        by_identifier,
        order,
    } = registry;

    let mut linked = IndexMap::with_capacity(operations.len());
    for mut op in operations {
        for slot in op.params.iter_mut().chain(op.returns.iter_mut()) {
            slot.type_ref = resolve_raw_type(&by_identifier, &slot.raw_type);
        }
        linked.insert(op.name.clone(), op);
    }

    // Every retained descriptor survives composition, including
    // identifier collisions kept without shared types. The first
    // registration keeps its raw identifier as the map key, so raw
    // type strings still resolve to it; a retained duplicate is keyed
    // by its validated name, which naming already made unique.
    let mut types = IndexMap::with_capacity(order.len());
    for ref_ in order {
        let descriptor = ref_.get(&table);
        let key = if types.contains_key(&descriptor.identifier) {
            descriptor.validated_name.clone()
        } else {
            descriptor.identifier.clone()
        };
        types.insert(key, ref_);
    }

    ServiceDescriptor {
        name,
        operations: linked,
        types,
        table,
        description,
    }
}
