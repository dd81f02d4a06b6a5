use crate::abi::resolved::{ResolutionContext, TypeResolver};
use crate::errors::ConvertError;
use abi_types::{EndpointDescriptor, Mutability, OutputPlan, ResolvedType, plan_outputs};
use serde_derive::Serialize;
use tracing::{debug, warn};

/* Method names the generated accessor already defines */
const RESERVED_METHOD_NAMES: &[&str] = &["new", "transport", "contract_address"];

/* Native token marker in payableInTokens; paid through CallOptions::value */
const NATIVE_TOKEN: &str = "EGLD";

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EndpointKind {
  Readonly,
  Mutable,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInput {
  pub name: String,
  pub ty: ResolvedType,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutput {
  pub name: Option<String>,
  pub ty: ResolvedType,
  pub multi_result: bool,
}

/* An endpoint ready for emission */
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedEndpoint {
  pub name: String,
  pub method_name: String,
  pub docs: Vec<String>,
  pub kind: EndpointKind,
  pub only_owner: bool,
  pub accepts_token_payment: bool,
  pub inputs: Vec<ResolvedInput>,
  /* Declared outputs; for mutable endpoints these are validated but unused */
  pub outputs: Vec<ResolvedOutput>,
  /* Slot plan of each output, readonly endpoints only */
  pub plans: Vec<OutputPlan>,
}

impl ClassifiedEndpoint {
  pub fn is_readonly(&self) -> bool {
    self.kind == EndpointKind::Readonly
  }

  /* True when every output carries a name and there is more than one */
  pub fn has_named_outputs(&self) -> bool {
    self.outputs.len() > 1 && self.outputs.iter().all(|o| o.name.is_some())
  }
}

/* Classify and resolve one endpoint. Returns Ok(None) for endpoints whose
 * mutability is neither readonly nor mutable. */
pub fn classify_endpoint(
  resolver: &TypeResolver<'_>,
  endpoint: &EndpointDescriptor,
  ctx: &mut ResolutionContext,
) -> Result<Option<ClassifiedEndpoint>, ConvertError> {
  let kind = match &endpoint.mutability {
    Mutability::Readonly => EndpointKind::Readonly,
    Mutability::Mutable => EndpointKind::Mutable,
    Mutability::Other(other) => {
      warn!(endpoint = %endpoint.name, mutability = %other, "skipping endpoint with unknown mutability");
      return Ok(None);
    }
  };

  /* structural checks before anything touches the context */
  if let Some(index) = endpoint.inputs.iter().position(|input| input.name.trim().is_empty()) {
    return Err(ConvertError::UnnamedInput { endpoint: endpoint.name.clone(), index });
  }
  let named_outputs = endpoint.outputs.iter().filter(|o| !o.name.trim().is_empty()).count();
  if named_outputs != 0 && named_outputs != endpoint.outputs.len() {
    return Err(ConvertError::MixedNamedAndUnnamedOutputs { endpoint: endpoint.name.clone() });
  }

  let mut inputs = Vec::with_capacity(endpoint.inputs.len());
  for input in &endpoint.inputs {
    let ty = resolver.resolve(&input.type_expr, ctx)?;
    inputs.push(ResolvedInput { name: input.name.clone(), ty });
  }

  let (outputs, plans) = match kind {
    EndpointKind::Readonly => {
      let outputs = resolve_outputs(resolver, endpoint, ctx)?;
      let types: Vec<ResolvedType> = outputs.iter().map(|o| o.ty.clone()).collect();
      let plans = plan_outputs(&types).map_err(|source| ConvertError::UnsupportedDecodeShape {
        context: format!("outputs of '{}'", endpoint.name),
        source,
      })?;
      (outputs, plans)
    }
    EndpointKind::Mutable => {
      /* outputs are not decoded for mutable calls, so they must not leave
       * composites or aliases behind in the emitted file */
      let mut scratch = ctx.clone();
      let outputs = resolve_outputs(resolver, endpoint, &mut scratch)?;
      (outputs, Vec::new())
    }
  };

  let accepts_token_payment = endpoint.payable_in_tokens.iter().any(|token| token != NATIVE_TOKEN);

  debug!(
    endpoint = %endpoint.name,
    kind = ?kind,
    inputs = inputs.len(),
    outputs = outputs.len(),
    "classified endpoint"
  );

  Ok(Some(ClassifiedEndpoint {
    name: endpoint.name.clone(),
    method_name: method_name(&endpoint.name),
    docs: endpoint.docs.clone(),
    kind,
    only_owner: endpoint.only_owner,
    accepts_token_payment,
    inputs,
    outputs,
    plans,
  }))
}

fn resolve_outputs(
  resolver: &TypeResolver<'_>,
  endpoint: &EndpointDescriptor,
  ctx: &mut ResolutionContext,
) -> Result<Vec<ResolvedOutput>, ConvertError> {
  endpoint
    .outputs
    .iter()
    .map(|output| {
      let ty = resolver.resolve(&output.type_expr, ctx)?;
      let name = Some(output.name.trim()).filter(|n| !n.is_empty()).map(str::to_string);
      Ok(ResolvedOutput { name, ty, multi_result: output.multi_result })
    })
    .collect()
}

/* Snake-case method name that cannot clash with the accessor's own methods */
pub fn method_name(endpoint: &str) -> String {
  let snake = crate::codegen::rust_gen::helpers::to_snake_case(endpoint);
  if RESERVED_METHOD_NAMES.contains(&snake.as_str()) {
    format!("{}_endpoint", snake)
  } else {
    crate::codegen::rust_gen::helpers::escape_rust_keyword(&snake)
  }
}
