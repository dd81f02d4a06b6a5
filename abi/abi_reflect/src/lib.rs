/* ABI Reflection Library
 *
 * Runtime support for MultiversX contract bindings: the wire codec, the
 * return-data decode strategies, the network transport boundary and the
 * errors generated bindings surface. It also provides a reflector that
 * decodes raw return slots against resolved ABI types without generated code.
 */

pub mod errors;
pub mod reflect;
pub mod return_data;
pub mod transport;
pub mod value;
pub mod wire;

pub use errors::{BindingError, ReflectError, TransportError, WireError};
pub use reflect::Reflector;
pub use return_data::ReturnData;
pub use transport::{CallOptions, CallOutcome, CallRequest, CallStatus, NetworkTransport, TokenPayment};
pub use value::Value;
pub use wire::{NestedDecoder, WireArg};

/* Big integer types used in generated signatures */
pub use num_bigint::{BigInt, BigUint};
