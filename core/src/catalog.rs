//! Card catalog lookup.
//!
//! The catalog is owned by the caller; the validator only reads from it
//! through [`CardLookup`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A recommendable action card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Unique catalog key.
    pub card_id: String,
    /// Category label, e.g. the recovery label.
    pub label: String,
}

impl Card {
    /// Creates a card.
    pub fn new(card_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            card_id: card_id.into(),
            label: label.into(),
        }
    }
}

/// Failures while building a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The same id was listed twice.
    #[error("duplicate card_id in catalog: {0}")]
    DuplicateCard(String),

    /// Catalog JSON could not be decoded.
    #[error("catalog decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Read-only card resolution by id.
pub trait CardLookup {
    /// Returns the card for `card_id`, if catalogued.
    fn card(&self, card_id: &str) -> Option<&Card>;
}

impl CardLookup for HashMap<String, Card> {
    fn card(&self, card_id: &str) -> Option<&Card> {
        self.get(card_id)
    }
}

/// In-memory catalog keyed by `card_id`.
#[derive(Debug, Clone, Default)]
pub struct CardCatalog {
    cards: HashMap<String, Card>,
}

impl CardCatalog {
    /// Builds a catalog, rejecting duplicate ids.
    pub fn from_cards<I>(cards: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = Card>,
    {
        let mut by_id = HashMap::new();
        for card in cards {
            if by_id.contains_key(&card.card_id) {
                return Err(CatalogError::DuplicateCard(card.card_id));
            }
            by_id.insert(card.card_id.clone(), card);
        }
        Ok(Self { cards: by_id })
    }

    /// Decodes a JSON array of `{"card_id", "label"}` records.
    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let cards: Vec<Card> = serde_json::from_str(raw)?;
        Self::from_cards(cards)
    }

    /// Number of catalogued cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// `true` when no card is catalogued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl CardLookup for CardCatalog {
    fn card(&self, card_id: &str) -> Option<&Card> {
        self.cards.get(card_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_id() {
        let catalog = CardCatalog::from_cards([
            Card::new("card_recover_001", "回復"),
            Card::new("card_explore_001", "探索"),
        ])
        .expect("catalog");

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.card("card_explore_001").map(|c| c.label.as_str()), Some("探索"));
        assert!(catalog.card("ghost").is_none());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = CardCatalog::from_cards([Card::new("dup", "回復"), Card::new("dup", "探索")])
            .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateCard(id) if id == "dup"));
    }

    #[test]
    fn decodes_json_array() {
        let raw = r#"[{"card_id": "card_recover_001", "label": "回復"}]"#;
        let catalog = CardCatalog::from_json_str(raw).expect("catalog");
        assert!(!catalog.is_empty());
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        let err = CardCatalog::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, CatalogError::Decode(_)));
    }

    #[test]
    fn plain_hash_map_is_a_lookup() {
        let mut map = HashMap::new();
        map.insert("c1".to_string(), Card::new("c1", "回復"));
        assert!(map.card("c1").is_some());
    }
}
