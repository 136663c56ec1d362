//! Shared types for OPTCG deck tooling
//!
//! Holds the deck recipe data model returned by the Bandai TCG+ API, the
//! on-disk layout of a session's card images, and the unified error type.

pub mod error;
pub mod layout;
pub mod models;

pub use error::{DeckError, Result};
pub use layout::{is_safe_component, validate_session_id, CardPaths, SessionLayout};
pub use models::{CardRecord, DeckRecipe, RecipeEnvelope, Zone};
