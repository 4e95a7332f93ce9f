use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;

use crate::error::NameResolutionError;

/// Suffix appended when a candidate collides with a keyword or an
/// already-bound name.
const COLLISION_SUFFIX: &str = "Custom";

/// Prepended when transliteration leaves a name starting with
/// something other than a letter or underscore.
const FALLBACK_PREFIX: char = 'a';

/// Defensive bound on suffix attempts; exhausting it is a fatal
/// [`NameResolutionError`].
const MAX_UNIQUIFY_ATTEMPTS: u32 = 1000;

lazy_static! {
    /// Reserved words and engine-level class names of the target
    /// ecosystem, matched case-insensitively. A candidate equal to one
    /// of these is suffixed unless a configured namespace isolates it.
    static ref KEYWORDS: HashSet<&'static str> = [
        "abstract", "and", "array", "arrayaccess", "arrayobject", "as", "break",
        "callable", "case", "catch", "class", "clone", "closure", "const",
        "continue", "declare", "default", "die", "do", "echo", "else", "elseif",
        "empty", "enddeclare", "endfor", "endforeach", "endif", "endswitch",
        "endwhile", "eval", "exception", "exit", "extends", "final", "finally",
        "fn", "for", "foreach", "function", "generator", "global", "goto", "if",
        "implements", "include", "include_once", "instanceof", "insteadof",
        "interface", "isset", "iterator", "iteratoraggregate", "list", "match",
        "namespace", "new", "or", "print", "private", "protected", "public",
        "readonly", "require", "require_once", "return", "serializable",
        "static", "stdclass", "switch", "this", "throw", "throwable", "trait",
        "traversable", "try", "unset", "use", "var", "while", "xor", "yield",
    ]
    .into_iter()
    .collect();
}

/// Per-run allocation state for one binding scope.
#[derive(Debug, Default)]
struct Scope {
    allocated: HashSet<String>,
    /// Raw name to already-minted result, making validation of the
    /// same raw name idempotent.
    memo: HashMap<String, String>,
}

/// Process-scoped (per generation run) table of allocated validated
/// names: one scope when no namespace is configured, one scope per
/// namespace otherwise. Created fresh per run and discarded after it.
#[derive(Debug, Default)]
pub struct NameBindingTable {
    scopes: HashMap<String, Scope>,
}

impl NameBindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and uniquify `raw` within the binding scope named by
    /// `namespace` (empty = global scope). The returned name is
    /// registered; re-validating the same raw name returns the name it
    /// was first bound to.
    pub fn validate(&mut self, raw: &str, namespace: &str) -> Result<String, NameResolutionError> {
        if let Some(existing) = self
            .scopes
            .get(namespace)
            .and_then(|scope| scope.memo.get(raw))
        {
            return Ok(existing.clone());
        }
        self.allocate(raw, namespace)
    }

    /// Like [`validate`](Self::validate), but always mints a fresh
    /// binding. Registering two distinct types that happen to share a
    /// raw identifier must yield two distinct names, so type
    /// registration goes through this entry point.
    pub fn allocate(&mut self, raw: &str, namespace: &str) -> Result<String, NameResolutionError> {
        let scope = self.scopes.entry(namespace.to_string()).or_default();

        let candidate = transliterate(raw);
        // Engine-level names only clash in the global scope; a
        // configured namespace isolates user types from them.
        let reserved = namespace.is_empty() && KEYWORDS.contains(candidate.to_lowercase().as_str());

        let mut name = candidate.clone();
        if reserved || scope.allocated.contains(&name) {
            name = format!("{candidate}{COLLISION_SUFFIX}");
        }
        let mut attempt = 2u32;
        while scope.allocated.contains(&name) {
            if attempt > MAX_UNIQUIFY_ATTEMPTS {
                return Err(NameResolutionError {
                    name: raw.to_string(),
                    attempts: MAX_UNIQUIFY_ATTEMPTS,
                });
            }
            name = format!("{candidate}{COLLISION_SUFFIX}{attempt}");
            attempt += 1;
        }

        scope.allocated.insert(name.clone());
        scope
            .memo
            .entry(raw.to_string())
            .or_insert_with(|| name.clone());
        Ok(name)
    }
}

/// Reduce a raw name to the portable identifier alphabet: ASCII
/// letters, digits and underscore. Common accented letters are folded,
/// everything else is stripped, and a name left starting with a
/// non-letter gains the fallback prefix.
fn transliterate(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            out.push(c);
        } else if let Some(folded) = fold_accent(c) {
            out.push_str(folded);
        }
    }
    if !out.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        out.insert(0, FALLBACK_PREFIX);
    }
    out
}

fn fold_accent(c: char) -> Option<&'static str> {
    Some(match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => "a",
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => "A",
        'è' | 'é' | 'ê' | 'ë' => "e",
        'È' | 'É' | 'Ê' | 'Ë' => "E",
        'ì' | 'í' | 'î' | 'ï' => "i",
        'Ì' | 'Í' | 'Î' | 'Ï' => "I",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => "o",
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' => "O",
        'ù' | 'ú' | 'û' | 'ü' => "u",
        'Ù' | 'Ú' | 'Û' | 'Ü' => "U",
        'ç' => "c",
        'Ç' => "C",
        'ñ' => "n",
        'Ñ' => "N",
        'ý' | 'ÿ' => "y",
        'ß' => "ss",
        'æ' => "ae",
        'Æ' => "Ae",
        _ => return None,
    })
}
