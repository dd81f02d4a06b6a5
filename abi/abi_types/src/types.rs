use indexmap::IndexMap;
use serde_derive::Serialize;
use std::fmt;

/// Primitive wire types understood by the MultiversX codec.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum PrimitiveKind {
    Bool,
    U8,
    U16,
    U32,
    U64,
    BigUint,
    BigInt,
    Bytes,
    Utf8String,
    Address,
    TokenIdentifier,
    EgldOrEsdtTokenIdentifier,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 12] = [
        PrimitiveKind::Bool,
        PrimitiveKind::U8,
        PrimitiveKind::U16,
        PrimitiveKind::U32,
        PrimitiveKind::U64,
        PrimitiveKind::BigUint,
        PrimitiveKind::BigInt,
        PrimitiveKind::Bytes,
        PrimitiveKind::Utf8String,
        PrimitiveKind::Address,
        PrimitiveKind::TokenIdentifier,
        PrimitiveKind::EgldOrEsdtTokenIdentifier,
    ];

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.keyword() == keyword)
    }

    /// The keyword used for this primitive in ABI type expressions.
    pub fn keyword(self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::U8 => "u8",
            PrimitiveKind::U16 => "u16",
            PrimitiveKind::U32 => "u32",
            PrimitiveKind::U64 => "u64",
            PrimitiveKind::BigUint => "BigUint",
            PrimitiveKind::BigInt => "BigInt",
            PrimitiveKind::Bytes => "bytes",
            PrimitiveKind::Utf8String => "utf-8 string",
            PrimitiveKind::Address => "Address",
            PrimitiveKind::TokenIdentifier => "TokenIdentifier",
            PrimitiveKind::EgldOrEsdtTokenIdentifier => "EgldOrEsdtTokenIdentifier",
        }
    }

    /// Primitives that bindings declare as a named alias once per file.
    pub fn is_custom_alias(self) -> bool {
        matches!(
            self,
            PrimitiveKind::Address
                | PrimitiveKind::TokenIdentifier
                | PrimitiveKind::EgldOrEsdtTokenIdentifier
        )
    }

    /// Width in bytes of the nested encoding, `None` for length-prefixed kinds.
    pub fn fixed_width(self) -> Option<usize> {
        match self {
            PrimitiveKind::Bool | PrimitiveKind::U8 => Some(1),
            PrimitiveKind::U16 => Some(2),
            PrimitiveKind::U32 => Some(4),
            PrimitiveKind::U64 => Some(8),
            PrimitiveKind::Address => Some(32),
            _ => None,
        }
    }
}

/// A synthetic composite: an anonymous tuple or multi-value group that the
/// generator names on the caller's behalf.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompositeRef {
    pub name: String,
    pub members: Vec<ResolvedType>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ResolvedType {
    Primitive { primitive: PrimitiveKind },
    NamedRecord { name: String },
    NamedEnum { name: String },
    List { inner: Box<ResolvedType> },
    SimpleVariadic { inner: Box<ResolvedType> },
    MultiVariadic { composite: CompositeRef },
    Multi { composite: CompositeRef },
    Tuple { composite: CompositeRef },
}

impl ResolvedType {
    pub fn primitive(primitive: PrimitiveKind) -> Self {
        ResolvedType::Primitive { primitive }
    }

    pub fn list(inner: ResolvedType) -> Self {
        ResolvedType::List { inner: Box::new(inner) }
    }

    pub fn simple_variadic(inner: ResolvedType) -> Self {
        ResolvedType::SimpleVariadic { inner: Box::new(inner) }
    }

    /// Named records and tuples: values laid out field after field.
    pub fn is_record_like(&self) -> bool {
        matches!(self, ResolvedType::NamedRecord { .. } | ResolvedType::Tuple { .. })
    }

    /// Types that decode from exactly one whole wire slot.
    pub fn is_top_decodable(&self) -> bool {
        matches!(
            self,
            ResolvedType::Primitive { .. }
                | ResolvedType::NamedRecord { .. }
                | ResolvedType::NamedEnum { .. }
                | ResolvedType::Tuple { .. }
        )
    }

    /// Multi-value types spread one logical value over several wire slots.
    pub fn is_multi_value(&self) -> bool {
        matches!(
            self,
            ResolvedType::SimpleVariadic { .. }
                | ResolvedType::MultiVariadic { .. }
                | ResolvedType::Multi { .. }
        )
    }
}

impl fmt::Display for ResolvedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn members(f: &mut fmt::Formatter<'_>, members: &[ResolvedType]) -> fmt::Result {
            for (i, member) in members.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{}", member)?;
            }
            Ok(())
        }

        match self {
            ResolvedType::Primitive { primitive } => write!(f, "{}", primitive.keyword()),
            ResolvedType::NamedRecord { name } | ResolvedType::NamedEnum { name } => {
                write!(f, "{}", name)
            }
            ResolvedType::List { inner } => write!(f, "List<{}>", inner),
            ResolvedType::SimpleVariadic { inner } => write!(f, "variadic<{}>", inner),
            ResolvedType::MultiVariadic { composite } => {
                write!(f, "variadic<multi<")?;
                members(f, &composite.members)?;
                write!(f, ">>")
            }
            ResolvedType::Multi { composite } => {
                write!(f, "multi<")?;
                members(f, &composite.members)?;
                write!(f, ">")
            }
            ResolvedType::Tuple { composite } => {
                write!(f, "tuple<")?;
                members(f, &composite.members)?;
                write!(f, ">")
            }
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedField {
    pub name: String,
    pub field_type: ResolvedType,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVariant {
    pub name: String,
    pub discriminant: u8,
}

/// Every declaration produced by one resolution run: named records and enums
/// in document order, then synthetic composites in registration order.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeCatalog {
    pub records: IndexMap<String, Vec<ResolvedField>>,
    pub enums: IndexMap<String, Vec<ResolvedVariant>>,
    pub composites: IndexMap<String, Vec<ResolvedField>>,
}

impl TypeCatalog {
    pub fn record_fields(&self, name: &str) -> Option<&[ResolvedField]> {
        self.records.get(name).map(Vec::as_slice)
    }

    pub fn composite_fields(&self, name: &str) -> Option<&[ResolvedField]> {
        self.composites.get(name).map(Vec::as_slice)
    }

    pub fn enum_variants(&self, name: &str) -> Option<&[ResolvedVariant]> {
        self.enums.get(name).map(Vec::as_slice)
    }

    /// Field list of a record-like type (named record or tuple).
    pub fn fields_of(&self, ty: &ResolvedType) -> Option<&[ResolvedField]> {
        match ty {
            ResolvedType::NamedRecord { name } => self.record_fields(name),
            ResolvedType::Tuple { composite } => self.composite_fields(&composite.name),
            _ => None,
        }
    }
}
