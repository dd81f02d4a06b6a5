use abi_types::{AbiDocument, SUPPORTED_FRAMEWORKS};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read ABI file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON ABI document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML ABI document: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("unsupported contract framework '{name}' (expected one of: {expected})")]
    UnsupportedFramework { name: String, expected: String },
}

/// On-disk encoding of an ABI document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbiFormat {
    Json,
    Yaml,
}

impl AbiFormat {
    /* `.yaml` / `.yml` files are YAML, everything else is treated as JSON */
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                AbiFormat::Yaml
            }
            _ => AbiFormat::Json,
        }
    }
}

pub fn parse_abi(contents: &str, format: AbiFormat) -> Result<AbiDocument, LoadError> {
    let document = match format {
        AbiFormat::Json => serde_json::from_str(contents)?,
        AbiFormat::Yaml => serde_yml::from_str(contents)?,
    };
    Ok(document)
}

/// Reads and deserializes an ABI document without checking its framework.
pub fn load_abi_file(path: &Path) -> Result<AbiDocument, LoadError> {
    let format = AbiFormat::from_path(path);
    debug!(path = %path.display(), ?format, "loading ABI document");

    let contents = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let document = parse_abi(&contents, format)?;

    debug!(
        contract = %document.name,
        endpoints = document.endpoints.len(),
        types = document.types.len(),
        "loaded ABI document"
    );
    Ok(document)
}

pub fn ensure_supported_framework(document: &AbiDocument) -> Result<(), LoadError> {
    if document.has_supported_framework() {
        Ok(())
    } else {
        Err(LoadError::UnsupportedFramework {
            name: document.framework_name().to_string(),
            expected: SUPPORTED_FRAMEWORKS.join(", "),
        })
    }
}

/// Loads an ABI document and rejects it unless it was produced by a supported
/// contract framework.
pub fn load_contract_abi(path: &Path) -> Result<AbiDocument, LoadError> {
    let document = load_abi_file(path)?;
    ensure_supported_framework(&document)?;
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(AbiFormat::from_path(Path::new("a.abi.json")), AbiFormat::Json);
        assert_eq!(AbiFormat::from_path(Path::new("a.yaml")), AbiFormat::Yaml);
        assert_eq!(AbiFormat::from_path(Path::new("a.YML")), AbiFormat::Yaml);
        assert_eq!(AbiFormat::from_path(Path::new("noext")), AbiFormat::Json);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(parse_abi("{", AbiFormat::Json), Err(LoadError::Json(_))));
        assert!(matches!(
            parse_abi("name: [unclosed", AbiFormat::Yaml),
            Err(LoadError::Yaml(_))
        ));
    }

    #[test]
    fn test_framework_check() {
        let doc = parse_abi(
            r#"{"buildInfo":{"framework":{"name":"solana"}},"name":"X"}"#,
            AbiFormat::Json,
        )
        .unwrap();
        match ensure_supported_framework(&doc) {
            Err(LoadError::UnsupportedFramework { name, expected }) => {
                assert_eq!(name, "solana");
                assert_eq!(expected, "multiversx-sc, elrond-wasm");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
