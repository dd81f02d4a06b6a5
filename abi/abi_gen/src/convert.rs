/* Conversion pipeline: document -> resolved model -> Rust source
 *
 * Named types are resolved first, in document order. Each endpoint is then
 * resolved as a unit: the resolution context is snapshotted before the
 * endpoint and restored if it fails, so a dropped endpoint leaves no aliases
 * or composites behind in the emitted file.
 */

use crate::abi::endpoints::{ClassifiedEndpoint, classify_endpoint};
use crate::abi::resolved::{ResolutionContext, TypeResolver};
use crate::codegen::rust::{RustCodeGenerator, RustCodeGeneratorOptions};
use crate::codegen::rust_gen::endpoints::{output_struct_fields, output_struct_name};
use crate::codegen::rust_gen::helpers::{lower_first, to_pascal_case, type_ident};
use crate::errors::ConvertError;
use abi_types::{AbiDocument, PrimitiveKind, TypeCatalog};
use indexmap::IndexMap;
use serde::Serializer;
use std::collections::HashMap;
use serde_derive::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/* What to do when a single endpoint cannot be converted */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndpointPolicy {
  /* The first failing endpoint fails the whole document */
  #[default]
  Strict,
  /* Failing endpoints are dropped and reported */
  SkipFailed,
}

#[derive(Serialize, Debug)]
pub struct EndpointFailure {
  pub endpoint: String,
  #[serde(serialize_with = "serialize_error")]
  pub error: ConvertError,
}

fn serialize_error<S: Serializer>(error: &ConvertError, serializer: S) -> Result<S::Ok, S::Error> {
  serializer.collect_str(error.root())
}

/* Everything the emitter needs, fully resolved and validated */
#[derive(Serialize, Debug)]
pub struct ContractModel {
  pub name: String,
  pub module_name: String,
  pub accessor_name: String,
  pub framework: String,
  pub framework_version: String,
  pub docs: Vec<String>,
  /* Named type docs, keyed in document order */
  pub type_docs: IndexMap<String, Vec<String>>,
  pub catalog: TypeCatalog,
  pub custom_types: Vec<PrimitiveKind>,
  pub imports: Vec<&'static str>,
  pub endpoints: Vec<ClassifiedEndpoint>,
  /* Endpoints with a mutability that is neither readonly nor mutable */
  pub skipped: Vec<String>,
  pub failures: Vec<EndpointFailure>,
}

/* Generated item names handed out so far, each with the ABI item that owns it */
#[derive(Debug, Default)]
struct ItemNames {
  methods: HashMap<String, String>,
  types: HashMap<String, String>,
}

impl ItemNames {
  fn for_document(document: &AbiDocument) -> Self {
    let types = document.types.keys().map(|name| (type_ident(name), name.clone())).collect();
    Self { methods: HashMap::new(), types }
  }

  /* Records the endpoint's method and output struct, refusing names already taken */
  fn claim(&mut self, endpoint: &ClassifiedEndpoint) -> Result<(), ConvertError> {
    if let Some(owner) = self.methods.get(&endpoint.method_name) {
      return Err(ConvertError::DuplicateItemName {
        kind: "method",
        name: endpoint.method_name.clone(),
        owner: owner.clone(),
      });
    }
    let output_struct = output_struct_fields(endpoint).map(|_| output_struct_name(endpoint));
    if let Some(name) = &output_struct {
      if let Some(owner) = self.types.get(name) {
        return Err(ConvertError::DuplicateItemName { kind: "type", name: name.clone(), owner: owner.clone() });
      }
      self.types.insert(name.clone(), endpoint.name.clone());
    }
    self.methods.insert(endpoint.method_name.clone(), endpoint.name.clone());
    Ok(())
  }

  fn contains_type(&self, name: &str) -> bool {
    self.types.contains_key(name)
  }
}

pub struct AbiConverter<'a> {
  document: &'a AbiDocument,
}

impl<'a> AbiConverter<'a> {
  pub fn new(document: &'a AbiDocument) -> Result<Self, ConvertError> {
    if !document.has_supported_framework() {
      return Err(ConvertError::UnsupportedFramework { name: document.framework_name().to_string() });
    }
    Ok(Self { document })
  }

  /* Resolve and classify the whole document without emitting code */
  pub fn analyze(&self, policy: EndpointPolicy) -> Result<ContractModel, ConvertError> {
    let document = self.document;
    info!(contract = %document.name, endpoints = document.endpoints.len(), "converting abi");

    let mut ctx = ResolutionContext::for_document(document);
    let mut names = ItemNames::for_document(document);
    let mut resolver = TypeResolver::new(document);
    resolver.resolve_named_types(&mut ctx)?;

    let mut endpoints = Vec::with_capacity(document.endpoints.len());
    let mut skipped = Vec::new();
    let mut failures = Vec::new();

    for endpoint in &document.endpoints {
      let snapshot = ctx.clone();
      let classified = classify_endpoint(&resolver, endpoint, &mut ctx)
        .and_then(|classified| classified.map(|c| names.claim(&c).map(|_| c)).transpose());
      match classified {
        Ok(Some(classified)) => endpoints.push(classified),
        Ok(None) => skipped.push(endpoint.name.clone()),
        Err(err) => {
          ctx = snapshot;
          let err = err.in_endpoint(&endpoint.name);
          match policy {
            EndpointPolicy::Strict => return Err(err),
            EndpointPolicy::SkipFailed => {
              warn!(endpoint = %endpoint.name, error = %err.root(), "skipping endpoint");
              failures.push(EndpointFailure { endpoint: endpoint.name.clone(), error: err });
            }
          }
        }
      }
    }

    let catalog = resolver.catalog(&ctx);
    let mut accessor_name = type_ident(&to_pascal_case(&document.name));
    if names.contains_type(&accessor_name) || catalog.composites.contains_key(&accessor_name) {
      accessor_name.push_str("Client");
    }

    info!(
      contract = %document.name,
      endpoints = endpoints.len(),
      composites = catalog.composites.len(),
      failed = failures.len(),
      "resolved abi"
    );

    Ok(ContractModel {
      name: document.name.clone(),
      module_name: lower_first(&document.name),
      accessor_name,
      framework: document.framework_name().to_string(),
      framework_version: document.build_info.framework.version.clone(),
      docs: document.docs.clone(),
      type_docs: document.types.iter().map(|(name, def)| (name.clone(), def.docs().to_vec())).collect(),
      catalog,
      custom_types: ctx.custom_types.into_iter().collect(),
      imports: ctx.imports.into_iter().collect(),
      endpoints,
      skipped,
      failures,
    })
  }

  pub fn convert(&self, policy: EndpointPolicy, options: RustCodeGeneratorOptions) -> Result<Conversion, ConvertError> {
    let model = self.analyze(policy)?;
    let source = RustCodeGenerator::new(options).emit(&model)?;
    Ok(Conversion { model, source })
  }
}

/* Generated source for one document, not yet on disk */
#[derive(Debug)]
pub struct Conversion {
  pub model: ContractModel,
  pub source: String,
}

impl Conversion {
  pub fn failures(&self) -> &[EndpointFailure] {
    &self.model.failures
  }

  /* Module directory the bindings are written to */
  pub fn module_dir(&self, output_dir: &Path) -> PathBuf {
    output_dir.join(&self.model.module_name)
  }

  /* Writes `<dir>/<module>/<module>.rs` and its `mod.rs`; returns the source path */
  pub fn write_to(&self, output_dir: &Path) -> Result<PathBuf, ConvertError> {
    let module_dir = self.module_dir(output_dir);
    std::fs::create_dir_all(&module_dir)
      .map_err(|source| ConvertError::Io { path: module_dir.clone(), source })?;

    let source_path = module_dir.join(format!("{}.rs", self.model.module_name));
    write_atomic(&source_path, &self.source)?;
    write_atomic(&module_dir.join("mod.rs"), &crate::codegen::rust::emit_mod_file(&self.model.module_name))?;

    info!(path = %source_path.display(), "wrote bindings");
    Ok(source_path)
  }
}

fn write_atomic(path: &Path, contents: &str) -> Result<(), ConvertError> {
  use std::io::Write;

  let io_err = |source: std::io::Error| ConvertError::Io { path: path.to_path_buf(), source };
  let dir = path.parent().unwrap_or_else(|| Path::new("."));
  let mut file = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
  file.write_all(contents.as_bytes()).map_err(io_err)?;
  file.persist(path).map_err(|err| io_err(err.error))?;
  Ok(())
}
