//! Mass-balance check of elementary reactions.
//!
//! An elementary reaction has four slots: `reactant1 + reactant2 = product1 + product2`.
//! Any slot may be empty. The verdict of a reaction is recomputed from its slots every time
//! they change, and the verdicts of all rows decide whether a reaction set may proceed.
use super::errors::PuzzleError;
use super::formula::{ElementCount, Side};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const SLOTS: usize = 4;

/// Four formula slots of one elementary reaction, serialized as a plain array of 4 strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ReactionSlots([String; SLOTS]);

impl ReactionSlots {
    pub fn new(reactant1: &str, reactant2: &str, product1: &str, product2: &str) -> Self {
        Self([
            reactant1.to_string(),
            reactant2.to_string(),
            product1.to_string(),
            product2.to_string(),
        ])
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// slots 0 and 1 are reactants, slots 2 and 3 are products
    pub fn side_of(slot: usize) -> Side {
        if slot < 2 { Side::Reactant } else { Side::Product }
    }

    pub fn slot(&self, slot: usize) -> Option<&str> {
        self.0.get(slot).map(String::as_str)
    }

    pub fn set_slot(&mut self, slot: usize, formula: &str) -> Result<(), PuzzleError> {
        let target = self
            .0
            .get_mut(slot)
            .ok_or(PuzzleError::SlotOutOfRange(slot))?;
        *target = formula.to_string();
        Ok(())
    }

    pub fn as_array(&self) -> &[String; SLOTS] {
        &self.0
    }

    pub fn reactants(&self) -> [&str; 2] {
        [self.0[0].as_str(), self.0[1].as_str()]
    }

    pub fn products(&self) -> [&str; 2] {
        [self.0[2].as_str(), self.0[3].as_str()]
    }

    /// non-empty slots in slot order, duplicates kept
    pub fn species(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str).filter(|s| !s.is_empty())
    }

    pub fn contains(&self, species: &str) -> bool {
        !species.is_empty() && self.0.iter().any(|s| s == species)
    }

    /// Net atom balance: reactant atoms counted positive, product atoms negative.
    pub fn element_balance(&self) -> ElementCount {
        let mut balance = ElementCount::new();
        for (slot, formula) in self.0.iter().enumerate() {
            balance.add_species(formula, Self::side_of(slot));
        }
        balance
    }

    /// "A + B = A + B" or "A + B = B + A", compared as literal strings.
    pub fn is_trivial_identity(&self) -> bool {
        let [r1, r2, p1, p2] = &self.0;
        (r1 == p1 && r2 == p2) || (r1 == p2 && r2 == p1)
    }

    /// comma-joined slots; the sort key of balanced reactions handed on to the puzzle
    pub fn joined(&self) -> String {
        self.0.join(",")
    }
}

impl From<[&str; SLOTS]> for ReactionSlots {
    fn from(slots: [&str; SLOTS]) -> Self {
        Self(slots.map(str::to_string))
    }
}

impl fmt::Display for ReactionSlots {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = |pair: [&str; 2]| {
            pair.into_iter()
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" + ")
        };
        write!(f, "{} = {}", side(self.reactants()), side(self.products()))
    }
}

/// Reads a typed reaction such as `"H2 + O2 = H2O"` or `"NO + NO -> N2O2"`.
/// Each side holds at most two species; a side may be left empty.
impl FromStr for ReactionSlots {
    type Err = PuzzleError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let malformed = |reason: &str| PuzzleError::MalformedReaction {
            line: line.to_string(),
            reason: reason.to_string(),
        };
        let normalized = line.replace("->", "=");
        let sides: Vec<&str> = normalized.split('=').collect();
        if sides.len() != 2 {
            return Err(malformed("expected exactly one '=' or '->'"));
        }

        let mut slots = Self::empty();
        for (offset, side) in [(0, sides[0]), (2, sides[1])] {
            let species: Vec<&str> = side
                .split('+')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();
            if species.len() > 2 {
                return Err(malformed("an elementary reaction has at most two species per side"));
            }
            for (i, formula) in species.into_iter().enumerate() {
                slots.0[offset + i] = formula.to_string();
            }
        }
        Ok(slots)
    }
}

/// Tri-state outcome of checking one reaction row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BalanceVerdict {
    /// nothing entered, or a trivial identity reaction
    #[default]
    Unset,
    Balanced,
    Unbalanced,
}

impl BalanceVerdict {
    pub fn is_balanced(self) -> bool {
        self == BalanceVerdict::Balanced
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BalanceVerdict::Unset => "unset",
            BalanceVerdict::Balanced => "balanced",
            BalanceVerdict::Unbalanced => "unbalanced",
        }
    }
}

impl fmt::Display for BalanceVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decides whether an elementary reaction conserves every element.
///
/// Rows where no atom was entered at all, and rows whose products literally repeat the
/// reactants, are `Unset`: they neither count as balanced nor block the set.
/// A reaction with reactants only (or products only) is `Unbalanced`.
///
/// # Examples
/// ```
/// use ckwatson::Puzzle::balance::{evaluate_reaction, BalanceVerdict, ReactionSlots};
/// let slots = ReactionSlots::new("NO", "NO", "N2O2", "");
/// assert_eq!(evaluate_reaction(&slots), BalanceVerdict::Balanced);
/// ```
pub fn evaluate_reaction(slots: &ReactionSlots) -> BalanceVerdict {
    let balance = slots.element_balance();
    let verdict = if balance.is_empty() || slots.is_trivial_identity() {
        BalanceVerdict::Unset
    } else if balance.is_balanced() {
        BalanceVerdict::Balanced
    } else {
        BalanceVerdict::Unbalanced
    };
    debug!("reaction '{}': net {} -> {}", slots, balance, verdict);
    verdict
}

/// A set is ready when at least one reaction is balanced and none is unbalanced.
/// `Unset` rows are placeholders and are ignored.
pub fn is_reaction_set_ready(verdicts: &[BalanceVerdict]) -> bool {
    verdicts.iter().any(|v| *v == BalanceVerdict::Balanced)
        && !verdicts.iter().any(|v| *v == BalanceVerdict::Unbalanced)
}

/// Best-effort autofill: the single product that collects every atom of both reactants.
/// Elements come out in the order they were first seen, e.g. "NO" + "NO" gives "N2O2".
pub fn suggest_product(reactant1: &str, reactant2: &str) -> String {
    let mut balance = ElementCount::new();
    balance.add_species(reactant1, Side::Reactant);
    balance.add_species(reactant2, Side::Reactant);
    balance.to_formula()
}

/// Guess for the last product slot given the other three: whatever atoms of the reactants
/// are not yet accounted for by the first product.
pub fn guess_missing_product(slots: &ReactionSlots) -> String {
    let mut balance = ElementCount::new();
    for (slot, formula) in slots.as_array().iter().take(3).enumerate() {
        balance.add_species(formula, ReactionSlots::side_of(slot));
    }
    balance.to_formula()
}
