//! Deck submission pipeline
//!
//! share link -> recipe code -> deck list -> alt-art filter -> session files

use crate::alt_art::is_alt_art;
use crate::materializer::{AssetMaterializer, CardOutcome, ImageSource};
use crate::recipe_link::resolve_recipe_code;
use optcg_common::{validate_session_id, DeckRecipe, Result, SessionLayout};

/// Source of deck recipes
pub trait DeckSource {
    fn fetch_deck(&self, recipe_code: &str) -> Result<DeckRecipe>;
}

/// What happened to one alt-art card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardReport {
    pub card_number: String,
    pub outcome: CardOutcome,
}

/// Result of a pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    /// Alt-art card numbers in deck scan order, downloaded or not
    pub alt_arts: Vec<String>,
    pub cards: Vec<CardReport>,
}

impl PipelineReport {
    pub fn saved_count(&self) -> usize {
        self.cards.iter().filter(|c| c.outcome.is_saved()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.cards.len() - self.saved_count()
    }
}

pub struct DeckPipeline<S: DeckSource + ImageSource> {
    source: S,
    layout: SessionLayout,
}

impl<S: DeckSource + ImageSource> DeckPipeline<S> {
    pub fn new(source: S, layout: SessionLayout) -> Self {
        Self { source, layout }
    }

    /// Alt-art card numbers of the linked deck, in scan order
    pub fn run(&self, share_url: &str, session_id: &str) -> Result<Vec<String>> {
        self.run_report(share_url, session_id)
            .map(|report| report.alt_arts)
    }

    /// Like [`run`](Self::run), keeping the per-card outcomes
    pub fn run_report(&self, share_url: &str, session_id: &str) -> Result<PipelineReport> {
        validate_session_id(session_id)?;

        let recipe_code = resolve_recipe_code(share_url)?;
        log::info!(
            "Session {}: resolved share link to recipe {}",
            session_id,
            recipe_code
        );

        let deck = self.source.fetch_deck(&recipe_code)?;
        let materializer = AssetMaterializer::new(&self.layout, &self.source);

        let mut report = PipelineReport::default();
        for card in deck.cards().filter(|card| is_alt_art(card)) {
            let outcome = materializer.materialize(session_id, card)?;
            report.alt_arts.push(card.card_number.clone());
            report.cards.push(CardReport {
                card_number: card.card_number.clone(),
                outcome,
            });
        }

        log::info!(
            "Session {}: {} of {} cards are alt art ({} saved, {} skipped)",
            session_id,
            report.alt_arts.len(),
            deck.len(),
            report.saved_count(),
            report.skipped_count()
        );

        Ok(report)
    }
}
