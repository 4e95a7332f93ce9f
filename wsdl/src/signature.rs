use crate::descriptor::{OperationDescriptor, Param};
use crate::error::SignatureParseError;

/// Parse one raw operation signature.
///
/// Accepted forms:
/// - `<returnType> <name>(<params>)`
/// - `<name>(<params>)` (no return type)
/// - `list(<params>) <name>(<params>)` (multi-value return)
///
/// Parameters are `<type> <name>` or a bare `<name>` recorded with an
/// empty type; order is preserved and a leading `$` sigil on names is
/// stripped. Anything else fails with [`SignatureParseError`] carrying
/// the raw input.
pub fn parse(raw: &str) -> Result<OperationDescriptor, SignatureParseError> {
    let fail = || SignatureParseError {
        signature: raw.to_string(),
    };

    let trimmed = raw.trim();
    let body = trimmed.strip_suffix(')').ok_or_else(fail)?;
    let open = matching_open_paren(body).ok_or_else(fail)?;
    let (prefix, params) = body.split_at(open);
    let params = &params[1..];

    let prefix = prefix.trim_end();
    let (return_part, name) = match prefix.rsplit_once(char::is_whitespace) {
        Some((return_part, name)) => (return_part.trim(), name),
        None => ("", prefix),
    };
    if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(fail());
    }

    let returns = if let Some(inner) = return_part
        .strip_prefix("list(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        parse_params(inner).ok_or_else(fail)?
    } else if return_part.is_empty() {
        Vec::new()
    } else {
        if return_part.contains(['(', ')']) || return_part.contains(char::is_whitespace) {
            return Err(fail());
        }
        vec![Param {
            name: String::new(),
            raw_type: return_part.to_string(),
            type_ref: None,
        }]
    };

    let params = parse_params(params).ok_or_else(fail)?;

    Ok(OperationDescriptor {
        name: name.to_string(),
        validated_name: String::new(),
        params,
        return_type: return_part.to_string(),
        returns,
        description: None,
    })
}

/// Position of the `(` opening the final parenthesized group of
/// `body`, scanning from the end so a `list(...)` return form is
/// stepped over.
fn matching_open_paren(body: &str) -> Option<usize> {
    let mut depth = 1u32;
    for (idx, c) in body.char_indices().rev() {
        match c {
            ')' => depth += 1,
            '(' => {
                depth -= 1;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

fn parse_params(list: &str) -> Option<Vec<Param>> {
    let mut params = Vec::new();
    for item in list.split(',') {
        let item = item.trim();
        if item.is_empty() {
            if list.trim().is_empty() {
                break;
            }
            return None;
        }
        let mut tokens = item.split_whitespace();
        let param = match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(name), None, _) => Param {
                name: name.trim_start_matches('$').to_string(),
                raw_type: String::new(),
                type_ref: None,
            },
            (Some(raw_type), Some(name), None) => Param {
                name: name.trim_start_matches('$').to_string(),
                raw_type: raw_type.to_string(),
                type_ref: None,
            },
            _ => return None,
        };
        params.push(param);
    }
    Some(params)
}
