use abi_types::{ExprError, ShapeError};
use std::path::PathBuf;
use thiserror::Error;

/* Errors raised while turning an ABI document into bindings */
#[derive(Debug, Error)]
pub enum ConvertError {
  #[error("unrecognized type expression '{expr}'")]
  UnrecognizedTypeExpression { expr: String },

  #[error("unknown abi field type '{name}'")]
  UnknownAbiFieldType { name: String },

  #[error("input {index} of endpoint '{endpoint}' has no name")]
  UnnamedInput { endpoint: String, index: usize },

  #[error("endpoint '{endpoint}' mixes named and unnamed outputs")]
  MixedNamedAndUnnamedOutputs { endpoint: String },

  #[error("unsupported decode shape in {context}: {source}")]
  UnsupportedDecodeShape {
    context: String,
    #[source]
    source: ShapeError,
  },

  #[error("unsupported contract framework '{name}'")]
  UnsupportedFramework { name: String },

  #[error("invalid enum '{name}': {reason}")]
  InvalidEnum { name: String, reason: String },

  #[error("{kind} '{name}' is already generated for '{owner}'")]
  DuplicateItemName { kind: &'static str, name: String, owner: String },

  #[error("endpoint '{endpoint}': {source}")]
  Endpoint {
    endpoint: String,
    #[source]
    source: Box<ConvertError>,
  },

  #[error("failed to write {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

impl From<ExprError> for ConvertError {
  fn from(err: ExprError) -> Self {
    match err {
      ExprError::UnrecognizedTypeExpression(expr) => ConvertError::UnrecognizedTypeExpression { expr },
    }
  }
}

impl ConvertError {
  pub fn in_endpoint(self, endpoint: &str) -> Self {
    ConvertError::Endpoint { endpoint: endpoint.to_string(), source: Box::new(self) }
  }

  /* The innermost error, unwrapping endpoint context */
  pub fn root(&self) -> &ConvertError {
    match self {
      ConvertError::Endpoint { source, .. } => source.root(),
      other => other,
    }
  }
}
