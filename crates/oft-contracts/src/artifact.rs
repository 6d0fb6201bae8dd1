use alloy::{hex, primitives::Bytes};
use serde_json::Value;
use snafu::prelude::*;
use std::path::{Path, PathBuf};

#[derive(Debug, Snafu)]
pub enum ArtifactError {
    #[snafu(display("Failed to read artifact {}: {}", path.display(), source))]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Invalid JSON artifact {}: {}", path.display(), source))]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[snafu(display("Artifact {} has no bytecode field", path.display()))]
    MissingBytecode { path: PathBuf },

    #[snafu(display("Invalid bytecode hex in {}: {}", path.display(), source))]
    Hex {
        path: PathBuf,
        source: hex::FromHexError,
    },
}

pub type Result<T, E = ArtifactError> = std::result::Result<T, E>;

const PLACEHOLDER_MARKERS: [&str; 3] = ["placeholder", "todo", "your_bytecode"];

/// Creation bytecode of the OFT contract deployed through the factory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenArtifact {
    pub bytecode: Bytes,
}

impl TokenArtifact {
    /// Loads bytecode from a raw hex file or a Foundry/Hardhat JSON artifact.
    ///
    /// Returns `Ok(None)` for an empty or placeholder artifact so the caller
    /// can refuse deployments while still serving bridge requests.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let contents = std::fs::read_to_string(path).context(ReadSnafu { path })?;
        Self::parse(&contents, path)
    }

    pub fn parse(contents: &str, path: &Path) -> Result<Option<Self>> {
        let trimmed = contents.trim();
        let bytecode = if trimmed.starts_with('{') {
            let json: Value = serde_json::from_str(trimmed).context(JsonSnafu { path })?;
            match &json["bytecode"] {
                Value::String(code) => code.clone(),
                Value::Object(object) => match object.get("object") {
                    Some(Value::String(code)) => code.clone(),
                    _ => return MissingBytecodeSnafu { path }.fail(),
                },
                _ => return MissingBytecodeSnafu { path }.fail(),
            }
        } else {
            trimmed.to_string()
        };

        if is_placeholder(&bytecode) {
            return Ok(None);
        }

        let bytes = hex::decode(bytecode.trim()).context(HexSnafu { path })?;
        Ok(Some(Self {
            bytecode: bytes.into(),
        }))
    }
}

fn is_placeholder(bytecode: &str) -> bool {
    let code = bytecode.trim();
    let lowered = code.to_ascii_lowercase();
    code.is_empty()
        || code == "0x"
        || PLACEHOLDER_MARKERS
            .iter()
            .any(|marker| lowered.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(contents: &str) -> Result<Option<TokenArtifact>> {
        TokenArtifact::parse(contents, Path::new("artifact.json"))
    }

    #[test]
    fn test_raw_hex_artifact() {
        let artifact = parse("0x60806040\n").unwrap().unwrap();
        assert_eq!(artifact.bytecode.to_vec(), vec![0x60, 0x80, 0x60, 0x40]);
    }

    #[test]
    fn test_foundry_and_hardhat_artifacts() {
        let foundry = parse(r#"{"abi": [], "bytecode": {"object": "0x6080"}}"#)
            .unwrap()
            .unwrap();
        let hardhat = parse(r#"{"abi": [], "bytecode": "0x6080"}"#).unwrap().unwrap();
        assert_eq!(foundry, hardhat);
    }

    #[test]
    fn test_placeholder_artifacts_are_not_configured() {
        assert!(parse("").unwrap().is_none());
        assert!(parse("0x").unwrap().is_none());
        assert!(parse(r#"{"bytecode": "0xPLACEHOLDER"}"#).unwrap().is_none());
    }

    #[test]
    fn test_malformed_artifacts() {
        assert!(matches!(
            parse(r#"{"abi": []}"#),
            Err(ArtifactError::MissingBytecode { .. })
        ));
        assert!(matches!(parse("0xzz"), Err(ArtifactError::Hex { .. })));
        assert!(matches!(parse("{not json"), Err(ArtifactError::Json { .. })));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"bytecode\": {{\"object\": \"0x6080\"}}}}").unwrap();
        let artifact = TokenArtifact::load(file.path()).unwrap().unwrap();
        assert_eq!(artifact.bytecode.len(), 2);

        let missing = TokenArtifact::load(Path::new("/nonexistent/oft.json"));
        assert!(matches!(missing, Err(ArtifactError::Read { .. })));
    }
}
