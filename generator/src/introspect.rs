/// Split an introspection dump into raw type blocks and raw operation
/// signatures.
///
/// The dump is the textual output of the client's type and function
/// introspection: operation signatures are single lines containing a
/// parenthesized parameter list; type entries are either a single
/// header line or a `{ ... }` block closed by a lone `}`.
pub fn parse_dump(text: &str) -> (Vec<String>, Vec<String>) {
    let mut raw_types = Vec::new();
    let mut raw_operations = Vec::new();

    let mut lines = text.lines();
    while let Some(line) = lines.next() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.contains('(') {
            raw_operations.push(trimmed.to_string());
            continue;
        }
        if trimmed.ends_with('{') {
            let mut block = vec![trimmed.to_string()];
            for inner in lines.by_ref() {
                let inner = inner.trim();
                block.push(inner.to_string());
                if inner == "}" {
                    break;
                }
            }
            raw_types.push(block.join("\n"));
        } else {
            raw_types.push(trimmed.to_string());
        }
    }

    (raw_types, raw_operations)
}
