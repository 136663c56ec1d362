//! Deck recipe data model as returned by the Bandai TCG+ recipe API

use serde::{Deserialize, Serialize};

/// Single card entry in a deck zone
///
/// The API sends many more fields per card; only the two needed to locate
/// and classify the artwork are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    /// Card number in `<set>-<index>[suffix]` form, e.g. `OP01-001`
    pub card_number: String,
    pub image_url: String,
}

impl CardRecord {
    pub fn new(card_number: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            card_number: card_number.into(),
            image_url: image_url.into(),
        }
    }

    /// Set code: everything before the first `-` of the card number
    pub fn set_code(&self) -> &str {
        self.card_number
            .split('-')
            .next()
            .unwrap_or(&self.card_number)
    }
}

/// Deck partition in the upstream deck format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    Main,
    Extra,
    Side,
}

impl Zone {
    /// All zones in scan order
    pub const ALL: [Zone; 3] = [Zone::Main, Zone::Extra, Zone::Side];
}

/// A resolved deck list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckRecipe {
    #[serde(default)]
    pub main_deck: Vec<CardRecord>,
    #[serde(default)]
    pub extra_deck: Vec<CardRecord>,
    #[serde(default)]
    pub side_deck: Vec<CardRecord>,
}

impl DeckRecipe {
    /// Cards of one zone
    pub fn zone(&self, zone: Zone) -> &[CardRecord] {
        match zone {
            Zone::Main => &self.main_deck,
            Zone::Extra => &self.extra_deck,
            Zone::Side => &self.side_deck,
        }
    }

    /// Every card in main, extra, side order, keeping each zone's own order
    pub fn cards(&self) -> impl Iterator<Item = &CardRecord> + '_ {
        Zone::ALL.into_iter().flat_map(move |zone| self.zone(zone).iter())
    }

    /// Total number of card entries across all zones
    pub fn len(&self) -> usize {
        self.main_deck.len() + self.extra_deck.len() + self.side_deck.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Top-level body of a successful recipe response: `{"success": {...}}`
#[derive(Debug, Deserialize)]
pub struct RecipeEnvelope {
    pub success: DeckRecipe,
}
