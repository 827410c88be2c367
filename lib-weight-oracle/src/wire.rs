//! On-the-wire JSON request/response shapes and the decimal-string `u64`
//! codec (spec §6: "All numeric values on the wire are decimal strings, not
//! JSON numbers, to preserve the full `uint64` range").

use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

/// Serializes/deserializes a `u64` as a decimal string.
pub mod dec_u64 {
    use super::*;

    pub fn serialize<S: Serializer>(value: &u64, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        let raw = String::deserialize(d)?;
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(D::Error::custom(format!("not a decimal uint64 string: {raw:?}")));
        }
        raw.parse::<u64>()
            .map_err(|e| D::Error::custom(format!("uint64 out of range: {raw:?} ({e})")))
    }
}

#[derive(Debug, Serialize)]
pub struct EmptyRequest {}

#[derive(Debug, Deserialize)]
pub struct PingResponse {
    pub pong: bool,
}

#[derive(Debug, Deserialize)]
pub struct IdentityResponse {
    pub genesis_hash: String,
    pub protocol_version: String,
    pub algorithm_version: String,
}

#[derive(Debug, Serialize)]
pub struct WeightRequest {
    pub address: String,
    pub selection_id: String,
    #[serde(with = "dec_u64")]
    pub balance_round: u64,
}

#[derive(Debug, Deserialize)]
pub struct WeightResponse {
    #[serde(with = "dec_u64")]
    pub weight: u64,
}

#[derive(Debug, Serialize)]
pub struct TotalWeightRequest {
    #[serde(with = "dec_u64")]
    pub balance_round: u64,
    #[serde(with = "dec_u64")]
    pub vote_round: u64,
}

#[derive(Debug, Deserialize)]
pub struct TotalWeightResponse {
    #[serde(with = "dec_u64")]
    pub total_weight: u64,
}

/// The shape of a daemon error body: `{"error":"<msg>","code":"<code>"}`.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
}
