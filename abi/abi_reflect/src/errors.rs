use abi_types::ShapeError;
use std::fmt;
use thiserror::Error;

/// Failure to read one value from the MultiversX wire encoding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WireError {
    #[error("not enough data: need {needed} bytes, have {available}")]
    InsufficientData { needed: usize, available: usize },

    #[error("{bytes}-byte value does not fit in {type_name}")]
    Overflow { type_name: &'static str, bytes: usize },

    #[error("invalid utf-8 in string value")]
    InvalidUtf8,

    #[error("invalid boolean encoding {value:#04x}")]
    InvalidBool { value: u8 },

    #[error("unknown discriminant {value} for enum '{type_name}'")]
    UnknownDiscriminant { type_name: String, value: u8 },

    #[error("address must be 32 bytes, got {length}")]
    InvalidAddressLength { length: usize },

    #[error("return slot {index} missing, only {available} slots returned")]
    MissingSlot { index: usize, available: usize },

    #[error("type '{type_name}' is not declared")]
    UndeclaredType { type_name: String },

    #[error("'{shape}' cannot be decoded here")]
    UnsupportedShape { shape: String },
}

/* Error reported by a network transport implementation */
#[derive(Debug)]
pub struct TransportError {
    message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), source: None }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self { message: message.into(), source: Some(Box::new(source)) }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transport error: {}", self.message)
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_deref().map(|err| err as &(dyn std::error::Error + 'static))
    }
}

/// Errors surfaced by generated contract bindings.
#[derive(Debug, Error)]
pub enum BindingError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The contract answered but a return slot could not be decoded where the
    /// decode policy is to abort.
    #[error("invalid response from '{endpoint}' at slot {slot}: {source}")]
    InvalidWireResponse {
        endpoint: String,
        slot: usize,
        #[source]
        source: WireError,
    },

    #[error("call to '{endpoint}' failed in transaction {tx_hash}: {reason}")]
    CallFailed { endpoint: String, tx_hash: String, reason: String },
}

impl BindingError {
    pub fn invalid_response(endpoint: &str, slot: usize, source: WireError) -> Self {
        BindingError::InvalidWireResponse { endpoint: endpoint.to_string(), slot, source }
    }
}

/// Errors from the dynamic reflector.
#[derive(Debug, Error)]
pub enum ReflectError {
    #[error("type '{type_name}' referenced by '{endpoint}' is not declared")]
    UnknownType { endpoint: String, type_name: String },

    #[error("endpoint '{endpoint}' has an undecodable output: {source}")]
    Shape {
        endpoint: String,
        #[source]
        source: ShapeError,
    },

    #[error(transparent)]
    Binding(#[from] BindingError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn transport_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "gateway timed out");
        let err = TransportError::with_source("query failed", io);
        assert_eq!(err.to_string(), "transport error: query failed");
        assert_eq!(err.source().map(|s| s.to_string()), Some("gateway timed out".to_string()));
        assert!(TransportError::new("x").source().is_none());
    }

    #[test]
    fn invalid_response_message_names_endpoint() {
        let err = BindingError::invalid_response(
            "getState",
            0,
            WireError::UnknownDiscriminant { type_name: "State".to_string(), value: 7 },
        );
        assert_eq!(
            err.to_string(),
            "invalid response from 'getState' at slot 0: unknown discriminant 7 for enum 'State'"
        );
    }
}
