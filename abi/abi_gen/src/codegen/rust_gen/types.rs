use crate::codegen::rust_gen::decode::nested_read_expr;
use crate::codegen::rust_gen::helpers::{
  alias_target, default_variant, field_ident, primitive_to_rust_type, rust_type, type_ident, zero_value,
};
use crate::errors::ConvertError;
use abi_types::{PrimitiveKind, ResolvedField, ResolvedType, ResolvedVariant, TypeCatalog, check_nested};

/* Indentation constants */
const INDENT_BASE: usize = 2;
const INDENT_FIELD: usize = 4;

fn indent(level: usize) -> String {
  " ".repeat(level)
}

pub fn emit_docs(output: &mut String, docs: &[String], level: usize) {
  for line in docs {
    if line.trim().is_empty() {
      output.push_str(&format!("{}///\n", indent(level)));
    } else {
      output.push_str(&format!("{}/// {}\n", indent(level), line.trim_end()));
    }
  }
}

/* `pub type Address = [u8; 32];` for each custom primitive in use */
pub fn emit_aliases(custom_types: &[PrimitiveKind]) -> String {
  let mut output = String::new();
  for kind in custom_types {
    output.push_str(&format!("pub type {} = {};\n", primitive_to_rust_type(*kind), alias_target(*kind)));
  }
  output
}

/* A record-like declaration: a named struct or a synthetic composite */
pub fn emit_record(
  name: &str,
  fields: &[ResolvedField],
  docs: &[String],
  catalog: &TypeCatalog,
) -> Result<String, ConvertError> {
  let type_name = type_ident(name);
  let mut output = String::new();

  emit_docs(&mut output, docs, 0);
  output.push_str("#[derive(Debug, Clone, PartialEq, Eq)]\n");
  output.push_str(&format!("pub struct {} {{\n", type_name));
  for field in fields {
    output.push_str(&format!(
      "{}pub {}: {},\n",
      indent(INDENT_BASE),
      field_ident(&field.name),
      rust_type(&field.field_type)
    ));
  }
  output.push_str("}\n\n");

  /* composites built for call arguments may hold multi-value members that
   * have no byte layout; those get no decoders */
  if fields.iter().all(|f| check_nested(&f.field_type).is_ok()) {
    output.push_str(&format!("impl {} {{\n", type_name));
    output.push_str(&format!(
      "{}pub fn decode_nested(decoder: &mut NestedDecoder<'_>) -> Result<Self, WireError> {{\n",
      indent(INDENT_BASE)
    ));
    output.push_str(&format!("{}decoder.read_with(|decoder| {{\n", indent(INDENT_FIELD)));
    output.push_str(&format!("{}Ok(Self {{\n", indent(INDENT_FIELD + 2)));
    for field in fields {
      output.push_str(&format!(
        "{}{}: {}?,\n",
        indent(INDENT_FIELD + 4),
        field_ident(&field.name),
        nested_read_expr(&field.field_type, "decoder")
      ));
    }
    output.push_str(&format!("{}}})\n", indent(INDENT_FIELD + 2)));
    output.push_str(&format!("{}}})\n", indent(INDENT_FIELD)));
    output.push_str(&format!("{}}}\n\n", indent(INDENT_BASE)));

    output.push_str(&format!(
      "{}pub fn top_decode(slot: &[u8]) -> Result<Self, WireError> {{\n",
      indent(INDENT_BASE)
    ));
    output.push_str(&format!("{}wire::decode_record(slot, Self::decode_nested)\n", indent(INDENT_FIELD)));
    output.push_str(&format!("{}}}\n", indent(INDENT_BASE)));
    output.push_str("}\n\n");
  }

  output.push_str(&format!("impl Default for {} {{\n", type_name));
  output.push_str(&format!("{}fn default() -> Self {{\n", indent(INDENT_BASE)));
  output.push_str(&format!("{}Self {{\n", indent(INDENT_FIELD)));
  for field in fields {
    output.push_str(&format!(
      "{}{}: {},\n",
      indent(INDENT_FIELD + 2),
      field_ident(&field.name),
      zero_value(&field.field_type, catalog)?
    ));
  }
  output.push_str(&format!("{}}}\n", indent(INDENT_FIELD)));
  output.push_str(&format!("{}}}\n", indent(INDENT_BASE)));
  output.push_str("}\n");

  Ok(output)
}

/* One-byte discriminant enum with decoders and argument encoding */
pub fn emit_enum(name: &str, variants: &[ResolvedVariant], docs: &[String]) -> Result<String, ConvertError> {
  let type_name = type_ident(name);
  let default = default_variant(variants)
    .ok_or_else(|| ConvertError::InvalidEnum { name: name.to_string(), reason: "enum has no variants".to_string() })?;
  let mut output = String::new();

  emit_docs(&mut output, docs, 0);
  output.push_str("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]\n");
  output.push_str("#[repr(u8)]\n");
  output.push_str(&format!("pub enum {} {{\n", type_name));
  for variant in variants {
    output.push_str(&format!("{}{} = {},\n", indent(INDENT_BASE), type_ident(&variant.name), variant.discriminant));
  }
  output.push_str("}\n\n");

  output.push_str(&format!("impl {} {{\n", type_name));
  output.push_str(&format!(
    "{}pub fn try_from_discriminant(value: u8) -> Result<Self, WireError> {{\n",
    indent(INDENT_BASE)
  ));
  output.push_str(&format!("{}match value {{\n", indent(INDENT_FIELD)));
  for variant in variants {
    output.push_str(&format!(
      "{}{} => Ok({}::{}),\n",
      indent(INDENT_FIELD + 2),
      variant.discriminant,
      type_name,
      type_ident(&variant.name)
    ));
  }
  output.push_str(&format!(
    "{}_ => Err(WireError::UnknownDiscriminant {{ type_name: \"{}\".to_string(), value }}),\n",
    indent(INDENT_FIELD + 2),
    name
  ));
  output.push_str(&format!("{}}}\n", indent(INDENT_FIELD)));
  output.push_str(&format!("{}}}\n\n", indent(INDENT_BASE)));

  output.push_str(&format!("{}pub fn discriminant(self) -> u8 {{\n", indent(INDENT_BASE)));
  output.push_str(&format!("{}self as u8\n", indent(INDENT_FIELD)));
  output.push_str(&format!("{}}}\n\n", indent(INDENT_BASE)));

  output.push_str(&format!(
    "{}pub fn decode_nested(decoder: &mut NestedDecoder<'_>) -> Result<Self, WireError> {{\n",
    indent(INDENT_BASE)
  ));
  output.push_str(&format!(
    "{}decoder.read_with(|decoder| Self::try_from_discriminant(decoder.read_u8()?))\n",
    indent(INDENT_FIELD)
  ));
  output.push_str(&format!("{}}}\n\n", indent(INDENT_BASE)));

  output.push_str(&format!(
    "{}pub fn top_decode(slot: &[u8]) -> Result<Self, WireError> {{\n",
    indent(INDENT_BASE)
  ));
  output.push_str(&format!("{}Self::try_from_discriminant(wire::top_decode_u8(slot)?)\n", indent(INDENT_FIELD)));
  output.push_str(&format!("{}}}\n", indent(INDENT_BASE)));
  output.push_str("}\n\n");

  output.push_str(&format!("impl Default for {} {{\n", type_name));
  output.push_str(&format!("{}fn default() -> Self {{\n", indent(INDENT_BASE)));
  output.push_str(&format!("{}{}::{}\n", indent(INDENT_FIELD), type_name, type_ident(&default.name)));
  output.push_str(&format!("{}}}\n", indent(INDENT_BASE)));
  output.push_str("}\n\n");

  output.push_str(&format!("impl WireArg for {} {{\n", type_name));
  output.push_str(&format!("{}fn to_wire_arg(&self) -> String {{\n", indent(INDENT_BASE)));
  output.push_str(&format!("{}self.discriminant().to_wire_arg()\n", indent(INDENT_FIELD)));
  output.push_str(&format!("{}}}\n", indent(INDENT_BASE)));
  output.push_str("}\n");

  Ok(output)
}

/* Struct returned by an endpoint with several named outputs */
pub fn emit_output_struct(name: &str, fields: &[(String, ResolvedType)]) -> String {
  let mut output = String::new();
  output.push_str("#[derive(Debug, Clone, PartialEq, Eq)]\n");
  output.push_str(&format!("pub struct {} {{\n", name));
  for (field, ty) in fields {
    output.push_str(&format!("{}pub {}: {},\n", indent(INDENT_BASE), field_ident(field), rust_type(ty)));
  }
  output.push_str("}\n");
  output
}
