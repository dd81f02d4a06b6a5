use crate::codegen::rust_gen::endpoints::{emit_endpoint_method, output_struct_fields, output_struct_name};
use crate::codegen::rust_gen::types::{emit_aliases, emit_docs, emit_enum, emit_output_struct, emit_record};
use crate::convert::ContractModel;
use crate::errors::ConvertError;

/* Items every generated file uses from the runtime crate */
const RUNTIME_ITEMS: &[&str] =
  &["BindingError", "CallOptions", "CallRequest", "NetworkTransport", "ReturnData", "TokenPayment", "WireError"];

pub struct RustCodeGenerator {
  options: RustCodeGeneratorOptions,
}

#[derive(Debug, Clone)]
pub struct RustCodeGeneratorOptions {
  /* Crate the bindings import the wire runtime from */
  pub runtime_crate: String,
  pub emit_docs: bool,
}

impl Default for RustCodeGeneratorOptions {
  fn default() -> Self {
    Self { runtime_crate: "abi_reflect".to_string(), emit_docs: true }
  }
}

impl RustCodeGenerator {
  pub fn new(options: RustCodeGeneratorOptions) -> Self {
    Self { options }
  }

  /* Assemble the bindings file. Validation has already happened upstream;
   * errors here mean the model was built by hand and is inconsistent. */
  pub fn emit(&self, model: &ContractModel) -> Result<String, ConvertError> {
    let mut output = String::new();

    self.emit_header(&mut output, model);

    let aliases = emit_aliases(&model.custom_types);
    if !aliases.is_empty() {
      output.push('\n');
      output.push_str(&aliases);
    }

    /* named types in document order */
    for (name, docs) in &model.type_docs {
      let docs = self.docs(docs);
      let declaration = if let Some(fields) = model.catalog.record_fields(name) {
        emit_record(name, fields, docs, &model.catalog)?
      } else if let Some(variants) = model.catalog.enum_variants(name) {
        emit_enum(name, variants, docs)?
      } else {
        continue;
      };
      output.push('\n');
      output.push_str(&declaration);
    }

    for (name, fields) in &model.catalog.composites {
      output.push('\n');
      output.push_str(&emit_record(name, fields, &[], &model.catalog)?);
    }

    for endpoint in &model.endpoints {
      if let Some(fields) = output_struct_fields(endpoint) {
        output.push('\n');
        output.push_str(&emit_output_struct(&output_struct_name(endpoint), &fields));
      }
    }

    output.push('\n');
    self.emit_accessor(&mut output, model)?;

    Ok(output)
  }

  fn docs<'d>(&self, docs: &'d [String]) -> &'d [String] {
    if self.options.emit_docs { docs } else { &[] }
  }

  fn emit_header(&self, output: &mut String, model: &ContractModel) {
    output.push_str(&format!("//! Client bindings for the `{}` contract.\n", model.name));
    output.push_str("//!\n");
    output.push_str(&format!(
      "//! Generated by abi_gen from a {} {} ABI. Do not edit.\n",
      model.framework, model.framework_version
    ));
    output.push_str("#![allow(dead_code, unused_imports, unused_mut, clippy::all)]\n\n");

    let runtime = &self.options.runtime_crate;
    output.push_str(&format!("use {}::wire::{{self, NestedDecoder, WireArg}};\n", runtime));
    let mut items: Vec<&str> = RUNTIME_ITEMS.iter().copied().chain(model.imports.iter().copied()).collect();
    items.sort_unstable();
    items.dedup();
    output.push_str(&format!("use {}::{{{}}};\n", runtime, items.join(", ")));
  }

  fn emit_accessor(&self, output: &mut String, model: &ContractModel) -> Result<(), ConvertError> {
    let name = &model.accessor_name;

    emit_docs(output, self.docs(&model.docs), 0);
    output.push_str(&format!("/// Client for the `{}` contract.\n", model.name));
    output.push_str(&format!("pub struct {}<T> {{\n", name));
    output.push_str("  transport: T,\n");
    output.push_str("  contract_address: String,\n");
    output.push_str("}\n\n");

    output.push_str(&format!("impl<T: NetworkTransport> {}<T> {{\n", name));
    output.push_str("  pub fn new(transport: T, contract_address: impl Into<String>) -> Self {\n");
    output.push_str("    Self { transport, contract_address: contract_address.into() }\n");
    output.push_str("  }\n\n");
    output.push_str("  pub fn transport(&self) -> &T {\n");
    output.push_str("    &self.transport\n");
    output.push_str("  }\n\n");
    output.push_str("  pub fn contract_address(&self) -> &str {\n");
    output.push_str("    &self.contract_address\n");
    output.push_str("  }\n");

    for endpoint in &model.endpoints {
      output.push('\n');
      if self.options.emit_docs {
        output.push_str(&emit_endpoint_method(endpoint, &model.catalog)?);
      } else {
        let mut stripped = endpoint.clone();
        stripped.docs.clear();
        output.push_str(&emit_endpoint_method(&stripped, &model.catalog)?);
      }
    }

    output.push_str("}\n");
    Ok(())
  }
}

/* `mod.rs` placed next to the bindings file */
pub fn emit_mod_file(module_name: &str) -> String {
  format!("#[allow(non_snake_case)]\nmod {0};\n\npub use {0}::*;\n", module_name)
}
