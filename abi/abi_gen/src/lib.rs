//! Rust client binding generator for MultiversX contract ABIs.
//!
//! [`AbiConverter`] resolves every type expression of an ABI document into a
//! structural model, deduplicates anonymous composites, classifies endpoints
//! and hands the result to [`RustCodeGenerator`], which emits bindings that
//! link against the `abi_reflect` runtime.

pub mod abi;
pub mod codegen;
pub mod convert;
pub mod errors;

pub use abi::endpoints::{ClassifiedEndpoint, EndpointKind, ResolvedInput, ResolvedOutput};
pub use abi::resolved::{CompositeRegistry, ResolutionContext, TypeResolver};
pub use codegen::{OUTPUT_DIR, RustCodeGenerator, RustCodeGeneratorOptions};
pub use convert::{AbiConverter, ContractModel, Conversion, EndpointFailure, EndpointPolicy};
pub use errors::ConvertError;
