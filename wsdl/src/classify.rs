use tracing::debug;

use crate::descriptor::{Member, TypeDescriptor, TypeKind, ARRAY_PREFIX, ARRAY_SUFFIX};
use crate::document::TypeElement;
use crate::loader::SchemaIndex;

/// The introspected string form of one type, before classification:
/// a `"<restriction-or-kind> <Name>"` header plus zero or more
/// `"<type> <member>;"` lines.
#[derive(Clone, Debug)]
pub struct RawTypeEntry {
    /// First header token: a struct marker or the restriction
    /// datatype.
    pub kind_hint: String,
    pub name: String,
    pub members: Vec<RawMember>,
}

#[derive(Clone, Debug)]
pub struct RawMember {
    pub raw_type: String,
    pub name: String,
}

impl RawTypeEntry {
    /// Parse one raw type string. `None` means the header does not
    /// have the two-token shape; such entries are skipped, never an
    /// error. Malformed member lines are dropped individually.
    pub fn parse(raw: &str) -> Option<RawTypeEntry> {
        let mut lines = raw.lines();
        let header = lines.next()?.trim();
        let header = header.strip_suffix('{').unwrap_or(header).trim_end();

        let mut tokens = header.split_whitespace();
        let kind_hint = tokens.next()?.to_string();
        let name = tokens.next()?.to_string();
        if tokens.next().is_some() {
            return None;
        }

        let mut members = Vec::new();
        for line in lines {
            let line = line.trim();
            if line.is_empty() || line == "}" {
                continue;
            }
            let Some(line) = line.strip_suffix(';') else {
                debug!(line, "ignoring malformed member line");
                continue;
            };
            let mut tokens = line.split_whitespace();
            match (tokens.next(), tokens.next(), tokens.next()) {
                (Some(raw_type), Some(member), None) => members.push(RawMember {
                    raw_type: raw_type.to_string(),
                    name: member.to_string(),
                }),
                _ => debug!(line, "ignoring malformed member line"),
            }
        }

        Some(RawTypeEntry {
            kind_hint,
            name,
            members,
        })
    }
}

/// Decide the structural kind of one raw entry and produce its
/// descriptor. `None` drops the entry: introspection is known to emit
/// entries unrelated to user-visible types, and the run degrades
/// gracefully instead of failing. Naming is deferred to the resolver.
pub fn classify(entry: &RawTypeEntry, index: &SchemaIndex) -> Option<TypeDescriptor> {
    let element = index.find_type_element(&entry.name);

    if let Some(descriptor) = classify_array(entry, element) {
        return Some(descriptor);
    }

    if let Some(element) = element {
        if !element.enumeration.is_empty() {
            let mut descriptor = TypeDescriptor::new(&entry.name, TypeKind::Enum);
            descriptor.enumeration_values = element.enumeration.clone();
            descriptor.restriction_datatype = element
                .restriction_base
                .clone()
                .unwrap_or_else(|| entry.kind_hint.clone());
            return Some(descriptor);
        }
        if let Some(pattern) = &element.pattern {
            let mut descriptor = TypeDescriptor::new(&entry.name, TypeKind::Pattern);
            descriptor.pattern_value = Some(pattern.clone());
            descriptor.restriction_datatype = element
                .restriction_base
                .clone()
                .unwrap_or_else(|| entry.kind_hint.clone());
            return Some(descriptor);
        }
    }

    if !entry.members.is_empty() || element.is_some_and(|e| e.structural) {
        return Some(classify_complex(entry, element));
    }

    debug!(name = %entry.name, "dropping unclassifiable type entry");
    None
}

/// Step 1 of the decision procedure: a header name carrying the `[]`
/// suffix, or a schema element that is a bare array-of wrapper (the
/// `ArrayOf` naming convention with a single repeated member).
fn classify_array(entry: &RawTypeEntry, element: Option<&TypeElement>) -> Option<TypeDescriptor> {
    if let Some(identifier) = entry.name.strip_suffix(ARRAY_SUFFIX) {
        let element_type = entry
            .members
            .first()
            .map(|m| m.raw_type.as_str())
            .unwrap_or(entry.kind_hint.as_str());
        return Some(array_descriptor(
            identifier,
            element_type.trim_end_matches(ARRAY_SUFFIX),
            entry
                .members
                .first()
                .map(|m| m.name.trim_end_matches(ARRAY_SUFFIX)),
        ));
    }

    // The introspected form of the same wrapper: a single `[]`-marked
    // member line under an ArrayOf-prefixed name.
    if entry.name.starts_with(ARRAY_PREFIX) && entry.members.len() == 1 {
        let member = &entry.members[0];
        if member.name.ends_with(ARRAY_SUFFIX) || member.raw_type.ends_with(ARRAY_SUFFIX) {
            return Some(array_descriptor(
                &entry.name,
                member.raw_type.trim_end_matches(ARRAY_SUFFIX),
                Some(member.name.trim_end_matches(ARRAY_SUFFIX)),
            ));
        }
    }

    let element = element?;
    if entry.name.starts_with(ARRAY_PREFIX)
        && element.elements.len() == 1
        && element.elements[0].max_occurs.is_multiple()
    {
        let occurrence = &element.elements[0];
        return Some(array_descriptor(
            &entry.name,
            occurrence.type_name.trim_end_matches(ARRAY_SUFFIX),
            Some(occurrence.name.as_str()),
        ));
    }
    None
}

fn array_descriptor(identifier: &str, element_type: &str, member_name: Option<&str>) -> TypeDescriptor {
    let mut descriptor = TypeDescriptor::new(identifier, TypeKind::Array);
    descriptor.members.push(Member {
        name: member_name.unwrap_or("item").to_string(),
        raw_type: element_type.to_string(),
        nullable: false,
        is_array: true,
    });
    descriptor
}

fn classify_complex(entry: &RawTypeEntry, element: Option<&TypeElement>) -> TypeDescriptor {
    let mut descriptor = TypeDescriptor::new(&entry.name, TypeKind::Complex);
    descriptor.restriction_datatype = entry.kind_hint.clone();
    if let Some(element) = element {
        descriptor.is_abstract = element.abstract_;
        descriptor.extension_base = element.base.clone();
    }

    if entry.members.is_empty() {
        // No member lines; fall back to the schema content model.
        if let Some(element) = element {
            for occurrence in &element.elements {
                descriptor.members.push(make_member(
                    &occurrence.name,
                    &occurrence.type_name,
                    occurrence.nillable,
                    occurrence.min_occurs,
                    occurrence.max_occurs.is_multiple(),
                ));
            }
        }
        return descriptor;
    }

    for raw in &entry.members {
        let occurrence = element.and_then(|e| e.elements.iter().find(|o| o.name == raw.name));
        let (nillable, min_occurs, multiple) = match occurrence {
            Some(o) => (o.nillable, o.min_occurs, o.max_occurs.is_multiple()),
            None => (false, 1, false),
        };
        descriptor.members.push(make_member(
            &raw.name,
            &raw.raw_type,
            nillable,
            min_occurs,
            multiple,
        ));
    }
    descriptor
}

fn make_member(
    name: &str,
    raw_type: &str,
    nillable: bool,
    min_occurs: u64,
    multiple: bool,
) -> Member {
    let is_array = multiple || raw_type.ends_with(ARRAY_SUFFIX);
    let mut raw_type = raw_type.to_string();
    if is_array && !raw_type.ends_with(ARRAY_SUFFIX) {
        raw_type.push_str(ARRAY_SUFFIX);
    }
    Member {
        name: name.to_string(),
        raw_type,
        // minOccurs=0 makes a member optional even without nillable.
        nullable: nillable || min_occurs == 0,
        is_array,
    }
}
