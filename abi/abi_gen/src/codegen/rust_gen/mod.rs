pub mod decode;
pub mod encode;
pub mod endpoints;
pub mod helpers;
pub mod types;

/* Re-export main public functions */
pub use decode::emit_output_decode;
pub use encode::emit_encode;
pub use endpoints::emit_endpoint_method;
pub use types::{emit_aliases, emit_enum, emit_record};
