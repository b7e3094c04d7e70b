//! Body encoding and decoding.

use bytes::Bytes;
use serde::{Serialize, de::DeserializeOwned};

use crate::error::ClientError;

/// Encodes request payloads and decodes response bodies.
///
/// The codec is the only place a generated client touches the wire format;
/// swapping it with [`ClientCore::with_codec`](crate::ClientCore::with_codec)
/// changes the naming policy or the format without regenerating.
pub trait Codec: Send + Sync {
    /// The `Content-Type` sent with encoded payloads.
    fn content_type(&self) -> &'static str;

    /// Encodes a request payload.
    fn encode<V: Serialize + ?Sized>(&self, value: &V) -> Result<Bytes, ClientError>;

    /// Decodes a response body.
    fn decode<V: DeserializeOwned>(&self, body: &[u8]) -> Result<V, ClientError>;
}

/// JSON via `serde_json`, using each type's own serde naming.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn encode<V: Serialize + ?Sized>(&self, value: &V) -> Result<Bytes, ClientError> {
        serde_json::to_vec(value)
            .map(Bytes::from)
            .map_err(|e| ClientError::Encode(e.to_string()))
    }

    fn decode<V: DeserializeOwned>(&self, body: &[u8]) -> Result<V, ClientError> {
        serde_json::from_slice(body).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Repo {
        full_name: String,
        stargazers_count: u32,
    }

    #[test]
    fn encodes_with_type_naming() {
        let repo = Repo {
            full_name: "rust-lang/rust".into(),
            stargazers_count: 7,
        };
        let bytes = JsonCodec.encode(&repo).unwrap();
        assert_eq!(
            &bytes[..],
            br#"{"fullName":"rust-lang/rust","stargazersCount":7}"#
        );
    }

    #[test]
    fn decode_reports_malformed_bodies() {
        let result: Result<Repo, _> = JsonCodec.decode(b"{\"fullName\":");
        assert!(matches!(result, Err(ClientError::Decode(_))));
    }

    #[test]
    fn decode_round_trips() {
        let repo: Repo = JsonCodec
            .decode(br#"{"fullName":"tokio-rs/tokio","stargazersCount":3}"#)
            .unwrap();
        assert_eq!(repo.full_name, "tokio-rs/tokio");
    }
}
