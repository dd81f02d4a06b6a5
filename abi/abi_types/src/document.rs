use indexmap::IndexMap;
use serde_derive::{Deserialize, Serialize};

/// Contract-authoring frameworks whose ABI output this toolchain understands.
pub const SUPPORTED_FRAMEWORKS: &[&str] = &["multiversx-sc", "elrond-wasm"];

/// A contract ABI document as emitted by the MultiversX build tooling.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AbiDocument {
    pub build_info: BuildInfo,
    #[serde(default)]
    pub docs: Vec<String>,
    pub name: String,
    #[serde(default)]
    pub constructor: Option<Constructor>,
    #[serde(default)]
    pub endpoints: Vec<EndpointDescriptor>,
    #[serde(default)]
    pub events: Vec<EventDescriptor>,
    #[serde(default)]
    pub has_callbacks: bool,
    /// Named types in document order.
    #[serde(default)]
    pub types: IndexMap<String, TypeDefinition>,
}

impl AbiDocument {
    pub fn framework_name(&self) -> &str {
        &self.build_info.framework.name
    }

    pub fn has_supported_framework(&self) -> bool {
        SUPPORTED_FRAMEWORKS.contains(&self.framework_name())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_crate: Option<CrateInfo>,
    pub framework: FrameworkInfo,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CrateInfo {
    pub name: String,
    #[serde(default)]
    pub version: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FrameworkInfo {
    pub name: String,
    #[serde(default)]
    pub version: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Constructor {
    #[serde(default)]
    pub docs: Vec<String>,
    #[serde(default)]
    pub inputs: Vec<EndpointInput>,
    #[serde(default)]
    pub outputs: Vec<EndpointOutput>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EndpointDescriptor {
    pub name: String,
    #[serde(default)]
    pub docs: Vec<String>,
    #[serde(default)]
    pub only_owner: bool,
    #[serde(default)]
    pub mutability: Mutability,
    #[serde(default)]
    pub payable_in_tokens: Vec<String>,
    #[serde(default)]
    pub inputs: Vec<EndpointInput>,
    #[serde(default)]
    pub outputs: Vec<EndpointOutput>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EndpointInput {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub type_expr: String,
    #[serde(default)]
    pub multi_arg: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EndpointOutput {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub type_expr: String,
    #[serde(default)]
    pub multi_result: bool,
}

/// Endpoint mutability. Values other than `readonly` and `mutable` are kept
/// verbatim so callers can report them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(from = "String", into = "String")]
pub enum Mutability {
    Readonly,
    #[default]
    Mutable,
    Other(String),
}

impl From<String> for Mutability {
    fn from(value: String) -> Self {
        match value.as_str() {
            "readonly" => Mutability::Readonly,
            "mutable" => Mutability::Mutable,
            _ => Mutability::Other(value),
        }
    }
}

impl From<Mutability> for String {
    fn from(value: Mutability) -> Self {
        match value {
            Mutability::Readonly => "readonly".to_string(),
            Mutability::Mutable => "mutable".to_string(),
            Mutability::Other(other) => other,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EventDescriptor {
    pub identifier: String,
    #[serde(default)]
    pub inputs: Vec<EventInput>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EventInput {
    pub name: String,
    #[serde(rename = "type")]
    pub type_expr: String,
    #[serde(default)]
    pub indexed: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TypeDefinition {
    Struct {
        #[serde(default)]
        docs: Vec<String>,
        #[serde(default)]
        fields: Vec<StructFieldDef>,
    },
    Enum {
        #[serde(default)]
        docs: Vec<String>,
        #[serde(default)]
        variants: Vec<EnumVariantDef>,
    },
}

impl TypeDefinition {
    pub fn docs(&self) -> &[String] {
        match self {
            TypeDefinition::Struct { docs, .. } | TypeDefinition::Enum { docs, .. } => docs,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StructFieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub type_expr: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EnumVariantDef {
    pub name: String,
    pub discriminant: u64,
}
