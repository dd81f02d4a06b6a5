/* Reflected values - decoded return data without generated code */

use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Value {
    Bool {
        value: bool,
    },

    /* u8 through u64 */
    Unsigned {
        value: u64,
    },

    /* BigUint / BigInt, rendered in decimal */
    BigInteger {
        value: String,
    },

    /* utf-8 strings and token identifiers */
    Text {
        value: String,
    },

    Bytes {
        hex: String,
    },

    Address {
        hex: String,
    },

    Enum {
        type_name: String,
        variant: String,
        discriminant: u8,
    },

    /* Named records, tuples and multi-value groups */
    Record {
        type_name: String,
        fields: IndexMap<String, Value>,
    },

    List {
        elements: Vec<Value>,
    },
}

impl Value {
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Unsigned { value } => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text { value } | Value::BigInteger { value } => Some(value),
            _ => None,
        }
    }

    pub fn elements(&self) -> Option<&[Value]> {
        match self {
            Value::List { elements } => Some(elements),
            _ => None,
        }
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Record { fields, .. } => fields.get(name),
            _ => None,
        }
    }
}
