//! Interned type representation.
//!
//! Every type lives in one arena and is addressed by [`TypeId`]. Structurally
//! equal types (alias included) share an id, so ids double as identity for
//! union normalization and caching. Ids are handed out in creation order, and
//! unions sort their members by id.

use std::rc::Rc;

use indexmap::IndexSet;

use crate::program::{NodeKey, SymbolId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeId(u32);

impl TypeId {
    pub const ANY: TypeId = TypeId(0);
    pub const ERROR: TypeId = TypeId(1);
    pub const UNKNOWN: TypeId = TypeId(2);
    pub const UNDEFINED: TypeId = TypeId(3);
    pub const NULL: TypeId = TypeId(4);
    pub const STRING: TypeId = TypeId(5);
    pub const NUMBER: TypeId = TypeId(6);
    pub const BIGINT: TypeId = TypeId(7);
    pub const FALSE: TypeId = TypeId(8);
    pub const TRUE: TypeId = TypeId(9);
    pub const BOOLEAN: TypeId = TypeId(10);
    pub const SYMBOL: TypeId = TypeId(11);
    pub const VOID: TypeId = TypeId(12);
    pub const NEVER: TypeId = TypeId(13);
    pub const NON_PRIMITIVE: TypeId = TypeId(14);
    pub const THIS: TypeId = TypeId(15);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle to an interned type-parameter substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MapperId(u32);

/// Handle to a synthesized object shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShapeId(u32);

/// The alias a type was reached through, with its type arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AliasRef {
    pub symbol: SymbolId,
    pub args: Vec<TypeId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeData {
    pub kind: TypeKind,
    pub alias: Option<AliasRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Any,
    Error,
    Unknown,
    Undefined,
    Null,
    String,
    Number,
    BigInt,
    False,
    True,
    Symbol,
    Void,
    Never,
    /// The `object` keyword.
    NonPrimitive,
    This,
    StringLiteral(String),
    /// Bits of an `f64`; `-0` is stored as `0`.
    NumberLiteral(u64),
    /// Decimal digits, sign included.
    BigIntLiteral(String),
    /// `texts.len() == types.len() + 1`.
    TemplateLiteral {
        texts: Vec<String>,
        types: Vec<TypeId>,
    },
    StringMapping {
        mapping: StringMapping,
        ty: TypeId,
    },
    /// Members are flattened, deduplicated and sorted by id.
    Union(Vec<TypeId>),
    /// Members are flattened and deduplicated, in source order.
    Intersection(Vec<TypeId>),
    Param(SymbolId),
    Interface {
        symbol: SymbolId,
        args: Vec<TypeId>,
    },
    Tuple {
        elements: Vec<TupleElement>,
        readonly: bool,
    },
    /// Object literal, function or constructor type written in source.
    /// Members are lowered on demand and instantiated through `mapper`.
    Anonymous {
        decl: NodeKey,
        mapper: Option<MapperId>,
    },
    /// Object computed by the checker, e.g. a resolved mapped type.
    Object(ShapeId),
    /// `typeof f` for a function declaration.
    FunctionValue(SymbolId),
    /// Deferred `keyof T`.
    Index(TypeId),
    /// Deferred `T[K]`.
    IndexedAccess {
        object: TypeId,
        index: TypeId,
    },
    /// Deferred conditional type.
    Conditional {
        decl: NodeKey,
        mapper: Option<MapperId>,
    },
    /// Deferred mapped type.
    Mapped {
        decl: NodeKey,
        mapper: Option<MapperId>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringMapping {
    Uppercase,
    Lowercase,
    Capitalize,
    Uncapitalize,
}

impl StringMapping {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "Uppercase" => StringMapping::Uppercase,
            "Lowercase" => StringMapping::Lowercase,
            "Capitalize" => StringMapping::Capitalize,
            "Uncapitalize" => StringMapping::Uncapitalize,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            StringMapping::Uppercase => "Uppercase",
            StringMapping::Lowercase => "Lowercase",
            StringMapping::Capitalize => "Capitalize",
            StringMapping::Uncapitalize => "Uncapitalize",
        }
    }

    pub fn apply(self, text: &str) -> String {
        match self {
            StringMapping::Uppercase => text.to_uppercase(),
            StringMapping::Lowercase => text.to_lowercase(),
            StringMapping::Capitalize => map_first(text, |c| c.to_uppercase().collect()),
            StringMapping::Uncapitalize => map_first(text, |c| c.to_lowercase().collect()),
        }
    }
}

fn map_first(text: &str, f: impl Fn(char) -> String) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => f(first) + chars.as_str(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Required,
    Optional,
    /// `...T[]`; the element stores `T`.
    Rest,
    /// `...T` with `T` generic.
    Variadic,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TupleElement {
    pub ty: TypeId,
    pub kind: ElementKind,
    pub name: Option<String>,
}

/// Resolved members of an object-like type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectShape {
    pub properties: Vec<Property>,
    pub call_signatures: Vec<Signature>,
    pub construct_signatures: Vec<Signature>,
    pub index_infos: Vec<IndexInfo>,
}

impl ObjectShape {
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn index_info(&self, key: TypeId) -> Option<&IndexInfo> {
        self.index_infos.iter().find(|i| i.key == key)
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
            && self.call_signatures.is_empty()
            && self.construct_signatures.is_empty()
            && self.index_infos.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub ty: TypeId,
    pub optional: bool,
    pub readonly: bool,
    /// Declared with method syntax; `ty` then holds the call signatures.
    pub method: bool,
    /// Declared with a numeric-literal name, so `keyof` yields a number literal.
    pub numeric: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    pub type_params: Vec<SymbolId>,
    pub params: Vec<SignatureParam>,
    pub return_type: TypeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignatureParam {
    pub name: String,
    pub ty: TypeId,
    pub optional: bool,
    pub rest: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexInfo {
    pub key: TypeId,
    pub ty: TypeId,
    pub readonly: bool,
}

/// Storage behind the checker's interior mutability.
#[derive(Debug, Default)]
pub(crate) struct TypeTable {
    types: IndexSet<TypeData>,
    mappers: IndexSet<Vec<(SymbolId, TypeId)>>,
    shapes: Vec<Rc<ObjectShape>>,
}

impl TypeTable {
    pub(crate) fn new() -> Self {
        let mut table = Self::default();
        let intrinsics = [
            TypeKind::Any,
            TypeKind::Error,
            TypeKind::Unknown,
            TypeKind::Undefined,
            TypeKind::Null,
            TypeKind::String,
            TypeKind::Number,
            TypeKind::BigInt,
            TypeKind::False,
            TypeKind::True,
            TypeKind::Union(vec![TypeId::FALSE, TypeId::TRUE]),
            TypeKind::Symbol,
            TypeKind::Void,
            TypeKind::Never,
            TypeKind::NonPrimitive,
            TypeKind::This,
        ];
        for kind in intrinsics {
            table.intern(TypeData { kind, alias: None });
        }
        table
    }

    pub(crate) fn intern(&mut self, data: TypeData) -> TypeId {
        let (index, _) = self.types.insert_full(data);
        TypeId(index as u32)
    }

    pub(crate) fn len(&self) -> usize {
        self.types.len()
    }

    pub(crate) fn get(&self, id: TypeId) -> &TypeData {
        self.types
            .get_index(id.index())
            .expect("type ids are only minted by the table")
    }

    pub(crate) fn intern_mapper(&mut self, mut pairs: Vec<(SymbolId, TypeId)>) -> MapperId {
        pairs.sort_by_key(|(symbol, _)| *symbol);
        pairs.dedup_by_key(|(symbol, _)| *symbol);
        let (index, _) = self.mappers.insert_full(pairs);
        MapperId(index as u32)
    }

    pub(crate) fn mapper(&self, id: MapperId) -> &[(SymbolId, TypeId)] {
        self.mappers
            .get_index(id.0 as usize)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub(crate) fn add_shape(&mut self, shape: ObjectShape) -> ShapeId {
        let id = ShapeId(self.shapes.len() as u32);
        self.shapes.push(Rc::new(shape));
        id
    }

    pub(crate) fn shape(&self, id: ShapeId) -> Rc<ObjectShape> {
        Rc::clone(&self.shapes[id.0 as usize])
    }
}

/// Canonical bits for a number literal.
pub fn number_bits(value: f64) -> u64 {
    if value == 0.0 { 0f64.to_bits() } else { value.to_bits() }
}
