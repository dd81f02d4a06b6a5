pub mod rust;
pub mod rust_gen;

pub use rust::{RustCodeGenerator, RustCodeGeneratorOptions};

pub const OUTPUT_DIR: &str = "generated";
