use wasm_bindgen::prelude::*;

pub mod board;
pub mod config;
pub mod editor;
pub mod error;
pub mod formation;
pub mod provider;
pub mod reconcile;
pub mod roster;
pub mod session;
pub mod types;
pub mod wasm;

pub use board::FormationBoard;
pub use config::EditorConfig;
pub use editor::{LoadOutcome, LoadTicket, SlotClick, SquadEditor};
pub use error::{BoardError, ErrorKind, ProviderError};
pub use formation::{FormationTemplate, TacticalCategory};

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}
