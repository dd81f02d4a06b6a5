use crate::abi::endpoints::{ClassifiedEndpoint, EndpointKind};
use crate::codegen::rust_gen::decode::emit_output_decode;
use crate::codegen::rust_gen::encode::emit_encode;
use crate::codegen::rust_gen::helpers::{field_ident, param_type, rust_type, to_pascal_case};
use crate::codegen::rust_gen::types::emit_docs;
use crate::errors::ConvertError;
use abi_types::{ResolvedType, TypeCatalog};

/* Local names used by generated method bodies */
const BODY_LOCALS: &[&str] = &["options", "payment", "args", "slots", "data", "outcome"];

const INDENT_METHOD: usize = 2;
const INDENT_BODY: usize = 4;

pub fn param_ident(name: &str) -> String {
  let ident = field_ident(name);
  let is_output_local = ident.len() > 3 && ident.starts_with("out") && ident[3..].chars().all(|c| c.is_ascii_digit());
  if BODY_LOCALS.contains(&ident.as_str()) || is_output_local {
    format!("{}_arg", ident)
  } else {
    ident
  }
}

pub fn output_struct_name(endpoint: &ClassifiedEndpoint) -> String {
  format!("{}Output", to_pascal_case(&endpoint.name))
}

/* Field list of the output struct, for endpoints with several named outputs */
pub fn output_struct_fields(endpoint: &ClassifiedEndpoint) -> Option<Vec<(String, ResolvedType)>> {
  if !endpoint.is_readonly() || !endpoint.has_named_outputs() {
    return None;
  }
  Some(endpoint.outputs.iter().map(|o| (o.name.clone().unwrap_or_default(), o.ty.clone())).collect())
}

fn return_type(endpoint: &ClassifiedEndpoint) -> String {
  match endpoint.kind {
    EndpointKind::Mutable => "String".to_string(),
    EndpointKind::Readonly => match endpoint.outputs.as_slice() {
      [] => "()".to_string(),
      [single] => rust_type(&single.ty),
      _ if endpoint.has_named_outputs() => output_struct_name(endpoint),
      many => format!("({})", many.iter().map(|o| rust_type(&o.ty)).collect::<Vec<_>>().join(", ")),
    },
  }
}

fn return_value(endpoint: &ClassifiedEndpoint) -> String {
  match endpoint.outputs.len() {
    0 => "()".to_string(),
    1 => "out0".to_string(),
    _ if endpoint.has_named_outputs() => {
      let fields: Vec<String> = endpoint
        .outputs
        .iter()
        .enumerate()
        .map(|(i, o)| format!("{}: out{}", field_ident(o.name.as_deref().unwrap_or_default()), i))
        .collect();
      format!("{} {{ {} }}", output_struct_name(endpoint), fields.join(", "))
    }
    count => format!("({})", (0..count).map(|i| format!("out{}", i)).collect::<Vec<_>>().join(", ")),
  }
}

/* One accessor method for one endpoint */
pub fn emit_endpoint_method(endpoint: &ClassifiedEndpoint, catalog: &TypeCatalog) -> Result<String, ConvertError> {
  let method_pad = " ".repeat(INDENT_METHOD);
  let body_pad = " ".repeat(INDENT_BODY);
  let mut output = String::new();

  emit_docs(&mut output, &endpoint.docs, INDENT_METHOD);
  if endpoint.only_owner {
    if !endpoint.docs.is_empty() {
      output.push_str(&format!("{}///\n", method_pad));
    }
    output.push_str(&format!("{}/// Only the contract owner may call this endpoint.\n", method_pad));
  }

  let mut params = vec!["&self".to_string()];
  if endpoint.kind == EndpointKind::Mutable {
    params.push("options: &CallOptions".to_string());
    if endpoint.accepts_token_payment {
      params.push("payment: Option<&TokenPayment>".to_string());
    }
  }
  for input in &endpoint.inputs {
    params.push(format!("{}: {}", param_ident(&input.name), param_type(&input.ty)));
  }

  output.push_str(&format!(
    "{}pub fn {}({}) -> Result<{}, BindingError> {{\n",
    method_pad,
    endpoint.method_name,
    params.join(", "),
    return_type(endpoint)
  ));

  let has_args = !endpoint.inputs.is_empty();
  if has_args {
    output.push_str(&format!("{}let mut args: Vec<String> = Vec::new();\n", body_pad));
    for input in &endpoint.inputs {
      output.push_str(&emit_encode(&param_ident(&input.name), &input.ty, catalog, INDENT_BODY));
    }
  }

  match endpoint.kind {
    EndpointKind::Readonly => {
      let args_expr = if has_args { "&args" } else { "&[]" };
      if endpoint.outputs.is_empty() {
        output.push_str(&format!(
          "{}self.transport.query(&self.contract_address, \"{}\", {})?;\n",
          body_pad, endpoint.name, args_expr
        ));
      } else {
        output.push_str(&format!(
          "{}let slots = self.transport.query(&self.contract_address, \"{}\", {})?;\n",
          body_pad, endpoint.name, args_expr
        ));
        output.push_str(&format!("{}let data = ReturnData::new(\"{}\", &slots);\n", body_pad, endpoint.name));
        for (index, (out, plan)) in endpoint.outputs.iter().zip(&endpoint.plans).enumerate() {
          output.push_str(&emit_output_decode(index, &out.ty, plan, INDENT_BODY)?);
        }
      }
      output.push_str(&format!("{}Ok({})\n", body_pad, return_value(endpoint)));
    }
    EndpointKind::Mutable => {
      let args_expr = if has_args { "args" } else { "Vec::new()" };
      let payment_field = if endpoint.accepts_token_payment { "payment" } else { "payment: None" };
      output.push_str(&format!("{}let outcome = self.transport.call(CallRequest {{\n", body_pad));
      output.push_str(&format!("{}  contract_address: &self.contract_address,\n", body_pad));
      output.push_str(&format!("{}  endpoint: \"{}\",\n", body_pad, endpoint.name));
      output.push_str(&format!("{}  args: {},\n", body_pad, args_expr));
      output.push_str(&format!("{}  options,\n", body_pad));
      output.push_str(&format!("{}  {},\n", body_pad, payment_field));
      output.push_str(&format!("{}}})?;\n", body_pad));
      output.push_str(&format!("{}outcome.into_result(\"{}\")\n", body_pad, endpoint.name));
    }
  }

  output.push_str(&format!("{}}}\n", method_pad));
  Ok(output)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::abi::endpoints::{ResolvedInput, ResolvedOutput};
  use abi_types::{DecodeStrategy, OutputPlan, PrimitiveKind};

  fn prim(kind: PrimitiveKind) -> ResolvedType {
    ResolvedType::primitive(kind)
  }

  fn readonly(name: &str, outputs: Vec<ResolvedOutput>) -> ClassifiedEndpoint {
    let plans = (0..outputs.len()).map(|i| OutputPlan { strategy: DecodeStrategy::Scalar, first_slot: i }).collect();
    ClassifiedEndpoint {
      name: name.to_string(),
      method_name: crate::abi::endpoints::method_name(name),
      docs: Vec::new(),
      kind: EndpointKind::Readonly,
      only_owner: false,
      accepts_token_payment: false,
      inputs: Vec::new(),
      outputs,
      plans,
    }
  }

  fn output(name: Option<&str>, ty: ResolvedType) -> ResolvedOutput {
    ResolvedOutput { name: name.map(str::to_string), ty, multi_result: false }
  }

  #[test]
  fn test_readonly_single_output() {
    let endpoint = readonly("getUnbondPeriod", vec![output(None, prim(PrimitiveKind::U64))]);
    let out = emit_endpoint_method(&endpoint, &TypeCatalog::default()).unwrap();
    assert_eq!(
      out,
      "  pub fn get_unbond_period(&self) -> Result<u64, BindingError> {\n\
       \x20   let slots = self.transport.query(&self.contract_address, \"getUnbondPeriod\", &[])?;\n\
       \x20   let data = ReturnData::new(\"getUnbondPeriod\", &slots);\n\
       \x20   let out0 = data.scalar(0, wire::top_decode_u64)?;\n\
       \x20   Ok(out0)\n\
       \x20 }\n"
    );
  }

  #[test]
  fn test_named_outputs_build_struct() {
    let endpoint = readonly(
      "getReserveInfo",
      vec![output(Some("points"), prim(PrimitiveKind::BigUint)), output(Some("last_epoch"), prim(PrimitiveKind::U64))],
    );
    let out = emit_endpoint_method(&endpoint, &TypeCatalog::default()).unwrap();
    assert!(out.contains("-> Result<GetReserveInfoOutput, BindingError>"));
    assert!(out.contains("Ok(GetReserveInfoOutput { points: out0, last_epoch: out1 })"));
    assert!(output_struct_fields(&endpoint).is_some());
  }

  #[test]
  fn test_unnamed_outputs_build_tuple() {
    let endpoint =
      readonly("getEpochs", vec![output(None, prim(PrimitiveKind::U64)), output(None, prim(PrimitiveKind::U32))]);
    let out = emit_endpoint_method(&endpoint, &TypeCatalog::default()).unwrap();
    assert!(out.contains("-> Result<(u64, u32), BindingError>"));
    assert!(out.contains("Ok((out0, out1))"));
    assert!(output_struct_fields(&endpoint).is_none());
  }

  #[test]
  fn test_mutable_with_payment() {
    let endpoint = ClassifiedEndpoint {
      name: "unDelegateNow".to_string(),
      method_name: "un_delegate_now".to_string(),
      docs: vec!["Instant unbond.".to_string()],
      kind: EndpointKind::Mutable,
      only_owner: true,
      accepts_token_payment: true,
      inputs: vec![ResolvedInput { name: "min_amount_out".to_string(), ty: prim(PrimitiveKind::BigUint) }],
      outputs: Vec::new(),
      plans: Vec::new(),
    };
    let out = emit_endpoint_method(&endpoint, &TypeCatalog::default()).unwrap();
    assert!(out.starts_with("  /// Instant unbond.\n  ///\n  /// Only the contract owner may call this endpoint.\n"));
    assert!(out.contains(
      "pub fn un_delegate_now(&self, options: &CallOptions, payment: Option<&TokenPayment>, min_amount_out: &BigUint) \
       -> Result<String, BindingError> {"
    ));
    assert!(out.contains("    args.push(min_amount_out.to_wire_arg());\n"));
    assert!(out.contains("      payment,\n"));
    assert!(out.contains("    outcome.into_result(\"unDelegateNow\")\n"));
  }

  #[test]
  fn test_param_names_avoid_body_locals() {
    assert_eq!(param_ident("data"), "data_arg");
    assert_eq!(param_ident("out0"), "out0_arg");
    assert_eq!(param_ident("outcome"), "outcome_arg");
    assert_eq!(param_ident("output"), "output");
    assert_eq!(param_ident("userAddress"), "user_address");
  }
}
