use std::fmt;

use serde::{Deserialize, Serialize};

use super::{CatalogDocument, ContainerMappings, FieldMappings};
use crate::error::SinkError;

/// Default zstd compression level (3 = good balance of speed/size).
pub const DEFAULT_COMPRESSION_LEVEL: i32 = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Encoding {
    /// Pretty-printed JSON.
    Json,
    /// JSON compressed with zstd.
    #[default]
    JsonZstd,
    /// TOON structured text.
    Toon,
}

impl Encoding {
    pub fn extension(self) -> &'static str {
        match self {
            Encoding::Json => "json",
            Encoding::JsonZstd => "json.zst",
            Encoding::Toon => "toon",
        }
    }

    pub fn is_compressed(self) -> bool {
        matches!(self, Encoding::JsonZstd)
    }

    pub fn encode(self, document: &CatalogDocument) -> Result<Vec<u8>, SinkError> {
        let encode_err = |message: String| SinkError::Encode { encoding: self, message };
        match self {
            Encoding::Json => serde_json::to_vec_pretty(document).map_err(|e| encode_err(e.to_string())),
            Encoding::JsonZstd => {
                let json = serde_json::to_vec(document).map_err(|e| encode_err(e.to_string()))?;
                zstd::encode_all(&json[..], DEFAULT_COMPRESSION_LEVEL).map_err(|e| encode_err(e.to_string()))
            }
            Encoding::Toon => toon_format::encode_default(document)
                .map(String::into_bytes)
                .map_err(|e| encode_err(e.to_string())),
        }
    }

    pub fn decode(self, bytes: &[u8]) -> Result<CatalogDocument, SinkError> {
        let decode_err = |message: String| SinkError::Decode { encoding: self, message };
        match self {
            Encoding::Json => serde_json::from_slice(bytes).map_err(|e| decode_err(e.to_string())),
            Encoding::JsonZstd => {
                let json = zstd::decode_all(bytes).map_err(|e| decode_err(e.to_string()))?;
                serde_json::from_slice(&json).map_err(|e| decode_err(e.to_string()))
            }
            Encoding::Toon => {
                let text = std::str::from_utf8(bytes).map_err(|e| decode_err(e.to_string()))?;
                toon_format::decode_default(text)
                    .map(strip_quoted_key_markers)
                    .map_err(|e| decode_err(e.to_string()))
            }
        }
    }
}

//toon hands quoted keys back with a leading NUL marker, on every level
fn strip_quoted_key_markers(document: CatalogDocument) -> CatalogDocument {
    fn clean(key: String) -> String {
        match key.strip_prefix('\0') {
            Some(k) => k.to_string(),
            None => key,
        }
    }

    let mappings = document
        .mappings
        .into_iter()
        .map(|(catalog, containers)| {
            let containers: ContainerMappings = containers
                .into_iter()
                .map(|(container, fields)| {
                    let fields: FieldMappings = fields.into_iter().map(|(f, v)| (clean(f), v)).collect();
                    (clean(container), fields)
                })
                .collect();
            (clean(catalog), containers)
        })
        .collect();

    CatalogDocument { version: document.version, mappings }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Json => f.write_str("json"),
            Encoding::JsonZstd => f.write_str("json+zstd"),
            Encoding::Toon => f.write_str("toon"),
        }
    }
}
