//! ABI File Loading
//!
//! This crate reads contract ABI documents from disk (JSON as produced by the
//! MultiversX build tooling, or a YAML rendition of the same shape) and checks
//! that they come from a supported contract framework before any code
//! generation or reflection touches them.

pub mod file;

// Re-export commonly used items at the crate root
pub use file::{
    ensure_supported_framework, load_abi_file, load_contract_abi, parse_abi, AbiFormat, LoadError,
};

// Re-export abi_types for convenience
pub use abi_types;
