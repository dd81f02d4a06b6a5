/* Helper utilities for Rust code generation */

use crate::errors::ConvertError;
use abi_types::{PrimitiveKind, ResolvedType, ResolvedVariant, TypeCatalog};

/* Rust reserved keywords, escaped with r# */
const RUST_KEYWORDS: &[&str] = &[
  "as", "break", "const", "continue", "else", "enum", "extern", "false", "fn", "for", "if", "impl",
  "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return", "static", "struct",
  "trait", "true", "type", "unsafe", "use", "where", "while", "async", "await", "dyn", "abstract",
  "become", "box", "do", "final", "macro", "override", "priv", "typeof", "unsized", "virtual",
  "yield", "try", "gen",
];

/* Keywords that cannot be raw identifiers */
const NON_RAW_KEYWORDS: &[&str] = &["self", "Self", "super", "crate"];

/* Escape Rust keywords to valid identifiers */
pub fn escape_rust_keyword(name: &str) -> String {
  if NON_RAW_KEYWORDS.contains(&name) {
    format!("{}_", name)
  } else if RUST_KEYWORDS.contains(&name) {
    format!("r#{}", name)
  } else if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
    format!("_{}", name)
  } else {
    name.to_string()
  }
}

/* getUserUndelegations -> get_user_undelegations, getEGLDReserve -> get_egld_reserve */
pub fn to_snake_case(name: &str) -> String {
  let chars: Vec<char> = name.chars().collect();
  let mut out = String::with_capacity(name.len() + 4);

  for (i, &ch) in chars.iter().enumerate() {
    if ch == '-' || ch == ' ' || ch == '_' {
      if !out.is_empty() && !out.ends_with('_') {
        out.push('_');
      }
      continue;
    }
    if ch.is_ascii_uppercase() && i > 0 {
      let prev = chars[i - 1];
      let next_is_lower = chars.get(i + 1).is_some_and(|c| c.is_ascii_lowercase());
      let boundary = prev.is_ascii_lowercase() || prev.is_ascii_digit() || (prev.is_ascii_uppercase() && next_is_lower);
      if boundary && !out.is_empty() && !out.ends_with('_') {
        out.push('_');
      }
    }
    out.push(ch.to_ascii_lowercase());
  }

  out
}

/* unbond_epoch -> UnbondEpoch, getReserveInfo -> GetReserveInfo */
pub fn to_pascal_case(name: &str) -> String {
  name
    .split(['_', '-', ' '])
    .filter(|part| !part.is_empty())
    .map(|part| {
      let mut chars = part.chars();
      match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
      }
    })
    .collect()
}

/* SalsaContract -> salsaContract */
pub fn lower_first(name: &str) -> String {
  let mut chars = name.chars();
  match chars.next() {
    Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
    None => String::new(),
  }
}

pub fn field_ident(name: &str) -> String {
  escape_rust_keyword(&to_snake_case(name))
}

pub fn type_ident(name: &str) -> String {
  escape_rust_keyword(name)
}

/* Name of a primitive in generated code; custom aliases use their alias */
pub fn primitive_to_rust_type(kind: PrimitiveKind) -> &'static str {
  match kind {
    PrimitiveKind::Bool => "bool",
    PrimitiveKind::U8 => "u8",
    PrimitiveKind::U16 => "u16",
    PrimitiveKind::U32 => "u32",
    PrimitiveKind::U64 => "u64",
    PrimitiveKind::BigUint => "BigUint",
    PrimitiveKind::BigInt => "BigInt",
    PrimitiveKind::Bytes => "Vec<u8>",
    PrimitiveKind::Utf8String => "String",
    PrimitiveKind::Address => "Address",
    PrimitiveKind::TokenIdentifier => "TokenIdentifier",
    PrimitiveKind::EgldOrEsdtTokenIdentifier => "EgldOrEsdtTokenIdentifier",
  }
}

/* Underlying type of a custom alias declaration */
pub fn alias_target(kind: PrimitiveKind) -> &'static str {
  match kind {
    PrimitiveKind::Address => "[u8; 32]",
    _ => "String",
  }
}

/* Owned Rust type of a resolved type */
pub fn rust_type(ty: &ResolvedType) -> String {
  match ty {
    ResolvedType::Primitive { primitive } => primitive_to_rust_type(*primitive).to_string(),
    ResolvedType::NamedRecord { name } | ResolvedType::NamedEnum { name } => type_ident(name),
    ResolvedType::List { inner } | ResolvedType::SimpleVariadic { inner } => {
      format!("Vec<{}>", rust_type(inner))
    }
    ResolvedType::MultiVariadic { composite } => format!("Vec<{}>", composite.name),
    ResolvedType::Multi { composite } | ResolvedType::Tuple { composite } => composite.name.clone(),
  }
}

/* Parameter type: small copyable values by value, the rest borrowed */
pub fn param_type(ty: &ResolvedType) -> String {
  match ty {
    ResolvedType::Primitive { primitive } => match primitive {
      PrimitiveKind::Bool
      | PrimitiveKind::U8
      | PrimitiveKind::U16
      | PrimitiveKind::U32
      | PrimitiveKind::U64 => primitive_to_rust_type(*primitive).to_string(),
      PrimitiveKind::Utf8String | PrimitiveKind::TokenIdentifier | PrimitiveKind::EgldOrEsdtTokenIdentifier => {
        "&str".to_string()
      }
      PrimitiveKind::Bytes => "&[u8]".to_string(),
      PrimitiveKind::BigUint | PrimitiveKind::BigInt | PrimitiveKind::Address => {
        format!("&{}", primitive_to_rust_type(*primitive))
      }
    },
    ResolvedType::NamedEnum { name } => type_ident(name),
    ResolvedType::NamedRecord { name } => format!("&{}", type_ident(name)),
    ResolvedType::Multi { composite } | ResolvedType::Tuple { composite } => format!("&{}", composite.name),
    ResolvedType::List { inner } | ResolvedType::SimpleVariadic { inner } => format!("&[{}]", rust_type(inner)),
    ResolvedType::MultiVariadic { composite } => format!("&[{}]", composite.name),
  }
}

/* Variant used for Default: discriminant 0 if declared, else the first */
pub fn default_variant(variants: &[ResolvedVariant]) -> Option<&ResolvedVariant> {
  variants.iter().find(|v| v.discriminant == 0).or_else(|| variants.first())
}

/* The zero value of a type as a Rust expression. Every Default impl in the
 * generated file is built from this, and the resolver runs it over all record
 * fields so an undefaultable type is caught before emission. */
pub fn zero_value(ty: &ResolvedType, catalog: &TypeCatalog) -> Result<String, ConvertError> {
  let value = match ty {
    ResolvedType::Primitive { primitive } => match primitive {
      PrimitiveKind::Bool => "false".to_string(),
      PrimitiveKind::U8 | PrimitiveKind::U16 | PrimitiveKind::U32 | PrimitiveKind::U64 => "0".to_string(),
      PrimitiveKind::BigUint => "BigUint::default()".to_string(),
      PrimitiveKind::BigInt => "BigInt::default()".to_string(),
      PrimitiveKind::Bytes => "Vec::new()".to_string(),
      PrimitiveKind::Utf8String | PrimitiveKind::TokenIdentifier | PrimitiveKind::EgldOrEsdtTokenIdentifier => {
        "String::new()".to_string()
      }
      PrimitiveKind::Address => "[0u8; 32]".to_string(),
    },
    ResolvedType::NamedEnum { name } => {
      let variants = catalog.enum_variants(name).unwrap_or(&[]);
      let variant = default_variant(variants).ok_or_else(|| ConvertError::InvalidEnum {
        name: name.clone(),
        reason: "enum has no variants".to_string(),
      })?;
      format!("{}::{}", type_ident(name), type_ident(&variant.name))
    }
    ResolvedType::NamedRecord { .. } | ResolvedType::Tuple { .. } | ResolvedType::Multi { .. } => {
      format!("{}::default()", rust_type(ty))
    }
    ResolvedType::List { .. } | ResolvedType::SimpleVariadic { .. } | ResolvedType::MultiVariadic { .. } => {
      "Vec::new()".to_string()
    }
  };
  Ok(value)
}

#[cfg(test)]
mod tests {
  use super::*;
  use abi_types::CompositeRef;

  #[test]
  fn test_snake_case() {
    assert_eq!(to_snake_case("getUserUndelegations"), "get_user_undelegations");
    assert_eq!(to_snake_case("unDelegateNow"), "un_delegate_now");
    assert_eq!(to_snake_case("getEGLDReserve"), "get_egld_reserve");
    assert_eq!(to_snake_case("unbond_epoch"), "unbond_epoch");
    assert_eq!(to_snake_case("getV2Pairs"), "get_v2_pairs");
    assert_eq!(to_snake_case("set-fee"), "set_fee");
  }

  #[test]
  fn test_pascal_and_lower_first() {
    assert_eq!(to_pascal_case("getReserveInfo"), "GetReserveInfo");
    assert_eq!(to_pascal_case("unbond_epoch"), "UnbondEpoch");
    assert_eq!(lower_first("SalsaContract"), "salsaContract");
    assert_eq!(lower_first(""), "");
  }

  #[test]
  fn test_keyword_escaping() {
    assert_eq!(field_ident("type"), "r#type");
    assert_eq!(field_ident("self"), "self_");
    assert_eq!(type_ident("Self"), "Self_");
    assert_eq!(field_ident("amount"), "amount");
    assert_eq!(escape_rust_keyword("2fa"), "_2fa");
  }

  #[test]
  fn test_param_types() {
    let address = ResolvedType::primitive(PrimitiveKind::Address);
    assert_eq!(param_type(&address), "&Address");
    assert_eq!(param_type(&ResolvedType::primitive(PrimitiveKind::U64)), "u64");
    assert_eq!(param_type(&ResolvedType::primitive(PrimitiveKind::TokenIdentifier)), "&str");
    assert_eq!(param_type(&ResolvedType::simple_variadic(address)), "&[Address]");
    let pair = CompositeRef {
      name: "ComplexType1".to_string(),
      members: vec![ResolvedType::primitive(PrimitiveKind::U32), ResolvedType::primitive(PrimitiveKind::U8)],
    };
    assert_eq!(param_type(&ResolvedType::MultiVariadic { composite: pair.clone() }), "&[ComplexType1]");
    assert_eq!(rust_type(&ResolvedType::list(ResolvedType::Tuple { composite: pair })), "Vec<ComplexType1>");
  }

  #[test]
  fn test_zero_values() {
    let mut catalog = TypeCatalog::default();
    catalog.enums.insert(
      "State".to_string(),
      vec![
        ResolvedVariant { name: "Active".to_string(), discriminant: 1 },
        ResolvedVariant { name: "Inactive".to_string(), discriminant: 0 },
      ],
    );
    catalog.enums.insert("Empty".to_string(), Vec::new());

    let state = ResolvedType::NamedEnum { name: "State".to_string() };
    assert_eq!(zero_value(&state, &catalog).unwrap(), "State::Inactive");
    assert_eq!(zero_value(&ResolvedType::primitive(PrimitiveKind::Address), &catalog).unwrap(), "[0u8; 32]");
    assert_eq!(zero_value(&ResolvedType::list(state), &catalog).unwrap(), "Vec::new()");

    let empty = ResolvedType::NamedEnum { name: "Empty".to_string() };
    assert!(matches!(zero_value(&empty, &catalog), Err(ConvertError::InvalidEnum { .. })));
  }
}
