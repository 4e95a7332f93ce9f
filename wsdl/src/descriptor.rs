use indexmap::IndexMap;

/// Array marker carried by introspected type and member names.
pub const ARRAY_SUFFIX: &str = "[]";

/// Naming convention marking a wrapper type as array-of.
pub const ARRAY_PREFIX: &str = "ArrayOf";

/// Handle into a [`TypeTable`]. Copyable, so base-type links and
/// operation references never form ownership cycles.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeRef(u32);

impl TypeRef {
    pub fn get(self, table: &TypeTable) -> &TypeDescriptor {
        &table.entries[self.0 as usize]
    }
}

/// Arena of every classified type descriptor of one run. Descriptors
/// are addressed by [`TypeRef`] and never removed; filtering prunes
/// the identifier maps, not the table.
#[derive(Clone, Debug, Default)]
pub struct TypeTable {
    entries: Vec<TypeDescriptor>,
}

impl TypeTable {
    pub fn insert(&mut self, descriptor: TypeDescriptor) -> TypeRef {
        let ref_ = TypeRef(self.entries.len() as u32);
        self.entries.push(descriptor);
        ref_
    }

    pub fn get_mut(&mut self, ref_: TypeRef) -> &mut TypeDescriptor {
        &mut self.entries[ref_.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Structural kind of a resolved type. Classification is total: every
/// retained raw entry has exactly one kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TypeKind {
    Complex,
    Array,
    Enum,
    Pattern,
}

/// One member of a complex (or array) type, in declaration order.
#[derive(Clone, Debug)]
pub struct Member {
    pub name: String,
    /// Declared type as introspected; gains the `[]` marker when the
    /// member is array-typed.
    pub raw_type: String,
    pub nullable: bool,
    pub is_array: bool,
}

/// A classified type. Created once by the classifier; the graph
/// builder attaches `base_type` and the name resolver fills
/// `validated_name`. Not mutated after assembly.
#[derive(Clone, Debug)]
pub struct TypeDescriptor {
    /// Raw identifier the type is registered under.
    pub identifier: String,
    pub kind: TypeKind,
    /// Collision-free identifier within the binding scope; empty until
    /// naming has run.
    pub validated_name: String,
    pub members: Vec<Member>,
    /// Raw identifier of the extension base, as found in the schema.
    /// Resolved to `base_type` by the graph builder's second pass.
    pub extension_base: Option<String>,
    pub base_type: Option<TypeRef>,
    pub restriction_datatype: String,
    pub enumeration_values: Vec<String>,
    pub pattern_value: Option<String>,
    pub is_abstract: bool,
}

impl TypeDescriptor {
    pub fn new(identifier: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            identifier: identifier.into(),
            kind,
            validated_name: String::new(),
            members: Vec::new(),
            extension_base: None,
            base_type: None,
            restriction_datatype: String::new(),
            enumeration_values: Vec::new(),
            pattern_value: None,
            is_abstract: false,
        }
    }

    /// A degenerate schema can declare a type as extending itself.
    pub fn is_self_extending(&self, self_ref: TypeRef) -> bool {
        self.base_type == Some(self_ref)
    }

    /// Base link with the self-extension edge masked out, so walking
    /// bases always terminates. Consumers must use this instead of
    /// reading `base_type` directly.
    pub fn resolved_base(&self, self_ref: TypeRef) -> Option<TypeRef> {
        self.base_type.filter(|base| *base != self_ref)
    }
}

/// One operation parameter or return slot.
#[derive(Clone, Debug)]
pub struct Param {
    /// Empty for a return slot, and for parameters introspected
    /// without a name.
    pub name: String,
    /// Empty when the signature gave no type hint.
    pub raw_type: String,
    /// Link to the registered type, when `raw_type` matches one.
    /// Filled by the assembler; `None` means the type is opaque to the
    /// model (a primitive or target-language native).
    pub type_ref: Option<TypeRef>,
}

#[derive(Clone, Debug)]
pub struct OperationDescriptor {
    pub name: String,
    pub validated_name: String,
    pub params: Vec<Param>,
    /// Raw return expression as introspected; may be empty or a
    /// `list(...)` multi-value form.
    pub return_type: String,
    /// Structured return slots: one entry for a plain return type,
    /// several for the `list(...)` form, none when the signature had
    /// no return type.
    pub returns: Vec<Param>,
    pub description: Option<String>,
}

impl OperationDescriptor {
    /// Every linked type the operation touches, params then returns.
    pub fn linked_types(&self) -> impl Iterator<Item = TypeRef> + '_ {
        self.params
            .iter()
            .chain(self.returns.iter())
            .filter_map(|p| p.type_ref)
    }
}

/// The fully resolved model handed to the emitter: operations and
/// types in insertion order, every validated name populated, every
/// in-scope reference resolved to a [`TypeRef`].
#[derive(Clone, Debug)]
pub struct ServiceDescriptor {
    pub name: String,
    pub operations: IndexMap<String, OperationDescriptor>,
    pub types: IndexMap<String, TypeRef>,
    pub table: TypeTable,
    pub description: Option<String>,
}

impl ServiceDescriptor {
    pub fn type_descriptor(&self, ref_: TypeRef) -> &TypeDescriptor {
        ref_.get(&self.table)
    }
}

/// Match a raw type string against the registered identifiers, first
/// verbatim and then with the array marker stripped.
pub(crate) fn resolve_raw_type(types: &IndexMap<String, TypeRef>, raw: &str) -> Option<TypeRef> {
    if raw.is_empty() {
        return None;
    }
    types
        .get(raw)
        .or_else(|| types.get(raw.strip_suffix(ARRAY_SUFFIX)?))
        .copied()
}
