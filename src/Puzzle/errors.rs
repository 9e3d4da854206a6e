//! Error types of the reaction-set and puzzle-draft layers.
//!
//! Formula parsing itself never fails in the lenient mode; the variants here cover editing
//! a reaction set by index, reading typed reaction lines and preparing a puzzle for saving.

use super::formula::FormulaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PuzzleError {
    /// Puzzle names become file names on the server, so only letters, digits,
    /// underscores, dashes and spaces are accepted.
    #[error(
        "invalid puzzle name '{0}': use only letters, numbers, spaces, dashes, and underscores"
    )]
    InvalidPuzzleName(String),

    #[error("reaction row {index} does not exist (the set has {len} rows)")]
    RowOutOfRange { index: usize, len: usize },

    #[error("slot {0} does not exist, an elementary reaction has 4 slots")]
    SlotOutOfRange(usize),

    #[error("species '{0}' is not part of any balanced reaction")]
    UnknownSpecies(String),

    #[error("species '{species}' does not take part in reaction {row}")]
    NotInReaction { species: String, row: usize },

    #[error("the reaction set needs at least one balanced and no unbalanced reaction")]
    NotReady,

    #[error("at least one species must be marked as a reactant before saving")]
    NoReactantSpecies,

    /// Typed reaction line could not be split into reactants and products.
    #[error("cannot read reaction '{line}': {reason}")]
    MalformedReaction { line: String, reason: String },

    /// Strict validation of a balanced reaction failed.
    #[error("reaction row {row}: {source}")]
    InvalidFormula {
        row: usize,
        #[source]
        source: FormulaError,
    },

    #[error("cannot serialize puzzle draft: {0}")]
    Serialization(#[from] serde_json::Error),
}
