/* Input encoder synthesis: every argument is flattened into `args`, one hex
 * string per wire argument, in declaration order */

use crate::codegen::rust_gen::helpers::field_ident;
use abi_types::{ResolvedType, TypeCatalog};

/* Statements appending the wire arguments of `expr` to `args` */
pub fn emit_encode(expr: &str, ty: &ResolvedType, catalog: &TypeCatalog, level: usize) -> String {
  let mut output = String::new();
  encode_into(&mut output, expr, ty, catalog, level, 0);
  output
}

fn encode_into(
  output: &mut String,
  expr: &str,
  ty: &ResolvedType,
  catalog: &TypeCatalog,
  level: usize,
  depth: usize,
) {
  let pad = " ".repeat(level);
  match ty {
    ResolvedType::Primitive { .. } | ResolvedType::NamedEnum { .. } => {
      output.push_str(&format!("{}args.push({}.to_wire_arg());\n", pad, expr));
    }
    ResolvedType::NamedRecord { .. } | ResolvedType::Tuple { .. } => {
      for field in catalog.fields_of(ty).unwrap_or(&[]) {
        let field_expr = format!("{}.{}", expr, field_ident(&field.name));
        encode_into(output, &field_expr, &field.field_type, catalog, level, depth);
      }
    }
    ResolvedType::Multi { composite } => {
      for (index, member) in composite.members.iter().enumerate() {
        let field_expr = format!("{}.var{}", expr, index);
        encode_into(output, &field_expr, member, catalog, level, depth);
      }
    }
    ResolvedType::List { inner } | ResolvedType::SimpleVariadic { inner } => {
      let item = format!("item{}", depth);
      output.push_str(&format!("{}for {} in {}.iter() {{\n", pad, item, expr));
      encode_into(output, &item, inner, catalog, level + 2, depth + 1);
      output.push_str(&format!("{}}}\n", pad));
    }
    ResolvedType::MultiVariadic { composite } => {
      let item = format!("item{}", depth);
      output.push_str(&format!("{}for {} in {}.iter() {{\n", pad, item, expr));
      for (index, member) in composite.members.iter().enumerate() {
        let field_expr = format!("{}.var{}", item, index);
        encode_into(output, &field_expr, member, catalog, level + 2, depth + 1);
      }
      output.push_str(&format!("{}}}\n", pad));
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use abi_types::{CompositeRef, PrimitiveKind, ResolvedField};

  fn prim(kind: PrimitiveKind) -> ResolvedType {
    ResolvedType::primitive(kind)
  }

  #[test]
  fn test_scalar_argument() {
    let out = emit_encode("amount", &prim(PrimitiveKind::BigUint), &TypeCatalog::default(), 4);
    assert_eq!(out, "    args.push(amount.to_wire_arg());\n");
  }

  #[test]
  fn test_variadic_argument_is_flattened() {
    let ty = ResolvedType::simple_variadic(prim(PrimitiveKind::Address));
    let out = emit_encode("addresses", &ty, &TypeCatalog::default(), 0);
    assert_eq!(out, "for item0 in addresses.iter() {\n  args.push(item0.to_wire_arg());\n}\n");
  }

  #[test]
  fn test_record_list_flattens_fields() {
    let mut catalog = TypeCatalog::default();
    catalog.records.insert(
      "EsdtTokenPayment".to_string(),
      vec![
        ResolvedField { name: "token_identifier".to_string(), field_type: prim(PrimitiveKind::TokenIdentifier) },
        ResolvedField { name: "token_nonce".to_string(), field_type: prim(PrimitiveKind::U64) },
        ResolvedField { name: "amount".to_string(), field_type: prim(PrimitiveKind::BigUint) },
      ],
    );
    let ty = ResolvedType::list(ResolvedType::NamedRecord { name: "EsdtTokenPayment".to_string() });
    let out = emit_encode("payments", &ty, &catalog, 0);
    assert_eq!(
      out,
      "for item0 in payments.iter() {\n  args.push(item0.token_identifier.to_wire_arg());\n  \
       args.push(item0.token_nonce.to_wire_arg());\n  args.push(item0.amount.to_wire_arg());\n}\n"
    );
  }

  #[test]
  fn test_variadic_multi_uses_member_fields() {
    let ty = ResolvedType::MultiVariadic {
      composite: CompositeRef {
        name: "ComplexType0".to_string(),
        members: vec![prim(PrimitiveKind::U32), ResolvedType::list(prim(PrimitiveKind::U8))],
      },
    };
    let out = emit_encode("slots", &ty, &TypeCatalog::default(), 0);
    assert_eq!(
      out,
      "for item0 in slots.iter() {\n  args.push(item0.var0.to_wire_arg());\n  for item1 in item0.var1.iter() {\n    \
       args.push(item1.to_wire_arg());\n  }\n}\n"
    );
  }
}
