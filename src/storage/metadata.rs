//! Token metadata documents.
//!
//! Field order is fixed by the struct layout, so serialization is stable.

use serde::{Deserialize, Serialize};

use crate::config::MetadataConfig;
use crate::relic::RelicId;

/// ERC-721 style metadata for one relic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub description: String,
    pub image: String,
    pub attributes: Vec<Attribute>,
}

/// A single `{trait_type, value}` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub trait_type: String,
    pub value: String,
}

impl Attribute {
    pub fn new(trait_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            trait_type: trait_type.into(),
            value: value.into(),
        }
    }
}

impl TokenMetadata {
    /// Compact JSON without extraneous whitespace.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Look up an attribute value by trait name.
    pub fn attribute(&self, trait_type: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.trait_type == trait_type)
            .map(|a| a.value.as_str())
    }
}

/// Fixed parts of every relic's metadata.
#[derive(Debug, Clone)]
pub struct MetadataTemplate {
    name_prefix: String,
    description: String,
    artist_name: String,
}

impl MetadataTemplate {
    pub fn new(config: &MetadataConfig) -> Self {
        Self {
            name_prefix: config.name_prefix.clone(),
            description: config.description.clone(),
            artist_name: config.artist_name.clone(),
        }
    }

    pub fn build(&self, relic_id: RelicId, created: &str, image_uri: &str) -> TokenMetadata {
        let id = relic_id.to_string();
        TokenMetadata {
            name: format!("{} #{}", self.name_prefix, id),
            description: self.description.clone(),
            image: image_uri.to_string(),
            attributes: vec![
                Attribute::new("Relic Number", id),
                Attribute::new("Artist", &self.artist_name),
                Attribute::new("Created", created),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template() -> MetadataTemplate {
        MetadataTemplate::new(&MetadataConfig::default())
    }

    #[test]
    fn test_metadata_parses_back() {
        let metadata = template().build(
            RelicId::new(7),
            "2025-03-01 19:45",
            "https://arweave.net/abc",
        );
        let bytes = metadata.to_json_bytes().unwrap();

        let parsed: TokenMetadata = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed.name, "Blockchain Bimbo Relic #007");
        assert_eq!(parsed.attribute("Relic Number"), Some("007"));
        assert_eq!(parsed.attribute("Artist"), Some("Blockchain Bimbo Makeover"));
        assert_eq!(parsed.attribute("Created"), Some("2025-03-01 19:45"));
        assert_eq!(parsed.image, "https://arweave.net/abc");
    }

    #[test]
    fn test_serialization_is_compact_and_ordered() {
        let config = MetadataConfig {
            name_prefix: "Relic".into(),
            description: "d".into(),
            artist_name: "a".into(),
        };
        let metadata = MetadataTemplate::new(&config).build(RelicId::new(12), "t", "i");
        let json = String::from_utf8(metadata.to_json_bytes().unwrap()).unwrap();
        assert_eq!(
            json,
            r#"{"name":"Relic #012","description":"d","image":"i","attributes":[{"trait_type":"Relic Number","value":"012"},{"trait_type":"Artist","value":"a"},{"trait_type":"Created","value":"t"}]}"#
        );
    }
}
