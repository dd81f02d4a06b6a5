pub mod endpoints;
pub mod resolved;
