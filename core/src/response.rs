//! Wire types produced by the council.
//!
//! Every field the council may omit is an `Option`, so "missing" and
//! "present but wrong" stay distinguishable all the way into the
//! validator.
//!
//! Decoding is lenient about field types: a non-string `rank`, `card_id`
//! or `autopick` is kept as its compact JSON text (`1`, `true`, `{}`) and
//! left for the validator to reject. `null` counts as missing. A
//! `recommendations` value that is not an array decodes as an empty list,
//! and a list element that is not an object as an empty recommendation.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One ranked card suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Recommendation {
    /// Priority tag ("A", "B", "C"). Encodes priority, not position.
    #[serde(default, deserialize_with = "lenient_text")]
    pub rank: Option<String>,
    /// Catalog id of the suggested card.
    #[serde(default, deserialize_with = "lenient_text")]
    pub card_id: Option<String>,
}

impl Recommendation {
    /// Builds a fully populated recommendation.
    pub fn new(rank: impl Into<String>, card_id: impl Into<String>) -> Self {
        Self {
            rank: Some(rank.into()),
            card_id: Some(card_id.into()),
        }
    }

    fn from_wire(value: Value) -> Self {
        match value {
            Value::Object(_) => serde_json::from_value(value).unwrap_or_default(),
            _ => Self::default(),
        }
    }
}

/// A complete council answer: ranked recommendations plus the autopick.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CouncilResponse {
    /// Recommendations in presentation order.
    #[serde(default, deserialize_with = "lenient_recommendations")]
    pub recommendations: Vec<Recommendation>,
    /// Rank the client selects by default.
    #[serde(default, deserialize_with = "lenient_text")]
    pub autopick: Option<String>,
}

impl CouncilResponse {
    /// Builds a response with an explicit autopick.
    pub fn new(recommendations: Vec<Recommendation>, autopick: impl Into<String>) -> Self {
        Self {
            recommendations,
            autopick: Some(autopick.into()),
        }
    }

    /// Decodes the JSON wire shape.
    ///
    /// Fails only on malformed JSON or a root that is not an object.
    pub fn from_json_str(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    })
}

fn lenient_recommendations<'de, D>(deserializer: D) -> Result<Vec<Recommendation>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().map(Recommendation::from_wire).collect(),
        _ => Vec::new(),
    })
}
