/* Output decoder synthesis
 *
 * Every output is decoded by one statement over the `data: ReturnData` of the
 * call. The statement shape follows the strategy chosen in abi_types, and the
 * failure policy (abort, skip, stop) lives in the ReturnData method it calls,
 * so the generated code only supplies per-value readers.
 */

use crate::codegen::rust_gen::helpers::type_ident;
use crate::errors::ConvertError;
use abi_types::{CompositeRef, DecodeStrategy, OutputPlan, PrimitiveKind, ResolvedType, ShapeError};

fn primitive_suffix(kind: PrimitiveKind) -> &'static str {
  match kind {
    PrimitiveKind::Bool => "bool",
    PrimitiveKind::U8 => "u8",
    PrimitiveKind::U16 => "u16",
    PrimitiveKind::U32 => "u32",
    PrimitiveKind::U64 => "u64",
    PrimitiveKind::BigUint => "big_uint",
    PrimitiveKind::BigInt => "big_int",
    PrimitiveKind::Bytes => "bytes",
    PrimitiveKind::Utf8String | PrimitiveKind::TokenIdentifier | PrimitiveKind::EgldOrEsdtTokenIdentifier => "string",
    PrimitiveKind::Address => "address",
  }
}

fn unsupported(ty: &ResolvedType, reason: &'static str) -> ConvertError {
  ConvertError::UnsupportedDecodeShape {
    context: "generated decoder".to_string(),
    source: ShapeError { shape: ty.to_string(), reason },
  }
}

/* Expression reading one nested value from `decoder`, without the trailing `?` */
pub fn nested_read_expr(ty: &ResolvedType, decoder: &str) -> String {
  match ty {
    ResolvedType::Primitive { primitive } => format!("{}.read_{}()", decoder, primitive_suffix(*primitive)),
    ResolvedType::NamedRecord { name } | ResolvedType::NamedEnum { name } => {
      format!("{}::decode_nested({})", type_ident(name), decoder)
    }
    ResolvedType::Tuple { composite } => format!("{}::decode_nested({})", composite.name, decoder),
    ResolvedType::List { inner } => format!("{}.read_list({})", decoder, nested_item_fn(inner)),
    /* multi-value shapes never pass the nested check */
    other => format!("Err(WireError::UnsupportedShape {{ shape: \"{}\".to_string() }})", other),
  }
}

/* Callable reading one nested list element */
pub fn nested_item_fn(ty: &ResolvedType) -> String {
  match ty {
    ResolvedType::NamedRecord { name } | ResolvedType::NamedEnum { name } => {
      format!("{}::decode_nested", type_ident(name))
    }
    ResolvedType::Tuple { composite } => format!("{}::decode_nested", composite.name),
    other => format!("|item| {}", nested_read_expr(other, "item")),
  }
}

/* Function decoding a value that owns a whole slot */
pub fn top_decode_fn(ty: &ResolvedType) -> Result<String, ConvertError> {
  match ty {
    ResolvedType::Primitive { primitive } => Ok(format!("wire::top_decode_{}", primitive_suffix(*primitive))),
    ResolvedType::NamedRecord { name } | ResolvedType::NamedEnum { name } => {
      Ok(format!("{}::top_decode", type_ident(name)))
    }
    ResolvedType::Tuple { composite } => Ok(format!("{}::top_decode", composite.name)),
    other => Err(unsupported(other, "value does not fit a single return slot")),
  }
}

/* `ComplexTypeN { var0: ..., var1: ... }` built from one group of slots */
fn group_constructor(composite: &CompositeRef) -> Result<String, ConvertError> {
  let mut fields = Vec::with_capacity(composite.members.len());
  for (index, member) in composite.members.iter().enumerate() {
    let value = match member {
      ResolvedType::List { inner } if inner.is_record_like() => {
        format!("wire::decode_self_terminating(&group[{}], {})", index, nested_item_fn(inner))
      }
      other => format!("{}(&group[{}])?", top_decode_fn(other)?, index),
    };
    fields.push(format!("var{}: {}", index, value));
  }
  Ok(format!("{} {{ {} }}", composite.name, fields.join(", ")))
}

/* `let outN = ...;` for one planned output */
pub fn emit_output_decode(
  index: usize,
  ty: &ResolvedType,
  plan: &OutputPlan,
  level: usize,
) -> Result<String, ConvertError> {
  let pad = " ".repeat(level);
  let slot = plan.first_slot;
  let value = match (plan.strategy, ty) {
    (DecodeStrategy::Scalar, _) => format!("data.scalar({}, {})?", slot, top_decode_fn(ty)?),
    (DecodeStrategy::SelfTerminating, ResolvedType::List { inner }) => {
      format!("data.self_terminating({}, {})", slot, nested_item_fn(inner))
    }
    (DecodeStrategy::EachSlot, ResolvedType::List { inner })
    | (DecodeStrategy::EachSlot, ResolvedType::SimpleVariadic { inner }) => {
      format!("data.each_slot({}, {})", slot, top_decode_fn(inner)?)
    }
    (DecodeStrategy::Groups { width }, ResolvedType::MultiVariadic { composite }) => {
      format!("data.groups({}, {}, |group| Ok({}))", slot, width, group_constructor(composite)?)
    }
    (DecodeStrategy::Group { width }, ResolvedType::Multi { composite }) => {
      format!("data.group({}, {}, |group| Ok({}))?", slot, width, group_constructor(composite)?)
    }
    (_, other) => return Err(unsupported(other, "strategy does not match the output shape")),
  };
  Ok(format!("{}let out{} = {};\n", pad, index, value))
}
