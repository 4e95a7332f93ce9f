use std::fmt::Write;

use dt_wsdl::{ServiceDescriptor, TypeKind};

/// Plain-text listing of a resolved service. This is the hand-off
/// boundary: a language emitter consumes the descriptor itself, the
/// listing exists so the model can be inspected without one.
pub fn render(service: &ServiceDescriptor) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "service {}", service.name);
    if let Some(description) = &service.description {
        let _ = writeln!(out, "  // {description}");
    }

    for op in service.operations.values() {
        let params: Vec<String> = op
            .params
            .iter()
            .map(|p| {
                if p.raw_type.is_empty() {
                    p.name.clone()
                } else {
                    format!("{} {}", p.raw_type, p.name)
                }
            })
            .collect();
        let return_part = if op.return_type.is_empty() {
            String::new()
        } else {
            format!(" -> {}", op.return_type)
        };
        let _ = writeln!(
            out,
            "  operation {}({}){}",
            op.validated_name,
            params.join(", "),
            return_part
        );
    }

    for (identifier, &type_ref) in &service.types {
        let descriptor = service.type_descriptor(type_ref);
        match descriptor.kind {
            TypeKind::Complex => {
                let base = descriptor
                    .resolved_base(type_ref)
                    .map(|b| format!(" extends {}", service.type_descriptor(b).validated_name))
                    .unwrap_or_default();
                let abstract_ = if descriptor.is_abstract {
                    "abstract "
                } else {
                    ""
                };
                let _ = writeln!(
                    out,
                    "  {}type {}{} ({})",
                    abstract_, descriptor.validated_name, base, identifier
                );
                for member in &descriptor.members {
                    let nullable = if member.nullable { "?" } else { "" };
                    let _ = writeln!(
                        out,
                        "    {} {}{}",
                        member.raw_type, member.name, nullable
                    );
                }
            }
            TypeKind::Array => {
                let _ = writeln!(
                    out,
                    "  array {} of {}",
                    descriptor.validated_name, descriptor.members[0].raw_type
                );
            }
            TypeKind::Enum => {
                let _ = writeln!(
                    out,
                    "  enum {}: {} {{ {} }}",
                    descriptor.validated_name,
                    descriptor.restriction_datatype,
                    descriptor.enumeration_values.join(", ")
                );
            }
            TypeKind::Pattern => {
                let _ = writeln!(
                    out,
                    "  pattern {}: {} /{}/",
                    descriptor.validated_name,
                    descriptor.restriction_datatype,
                    descriptor.pattern_value.as_deref().unwrap_or("")
                );
            }
        }
    }

    out
}
