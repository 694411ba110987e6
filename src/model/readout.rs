//! Readout electronics properties: cards and crates.

use serde::{Deserialize, Serialize};

/// Properties of one readout card.
///
/// A card serves exactly one wafer slot and lives in a crate slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardProps {
    /// Number of bias lines
    pub nbias: u32,
    /// Number of coaxial readout lines
    pub ncoax: u32,
    /// Number of readout channels
    pub nchannel: u32,
    /// Name of the crate slot holding this card
    pub crate_slot: String,
}

/// Properties of one readout crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrateProps {
    /// Names of the card slots in this crate, in slot order
    pub card_slots: Vec<String>,
}
