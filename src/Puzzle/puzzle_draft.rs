//! Puzzle draft: the balanced reactions of a reaction set plus the per-species data an author
//! fills in before saving (energy, reactant flag, and the reactions a reactant goes through
//! during its pre-equilibrium). The draft is turned into the request body sent to the server.
use super::balance::ReactionSlots;
use super::errors::PuzzleError;
use super::reaction_set::ReactionSet;
use crate::settings::Settings;
use log::{info, warn};
use nalgebra::DMatrix;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

fn puzzle_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[\w\- ]+$").expect("puzzle name pattern is valid"))
}

/// Puzzle names are used as file names: letters, digits, underscores, dashes and spaces only.
pub fn validate_puzzle_name(name: &str) -> Result<(), PuzzleError> {
    if puzzle_name_regex().is_match(name) {
        Ok(())
    } else {
        Err(PuzzleError::InvalidPuzzleName(name.to_string()))
    }
}

/// One row of the species table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesEntry {
    pub name: String,
    pub energy: f64,
    pub is_reactant: bool,
    /// one flag per reaction of the draft: does this species go through that reaction
    /// during its pre-equilibrium
    pub participation: Vec<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PuzzleDraft {
    name: String,
    reactions: Vec<ReactionSlots>,
    species: Vec<SpeciesEntry>,
}

/// Body of the "save puzzle" request; field names follow the server's JSON schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    #[serde(rename = "auth_code")]
    pub auth_code: String,
    pub puzzle_name: String,
    pub reactions: Vec<ReactionSlots>,
    pub species_names: Vec<String>,
    pub species_if_reactants: Vec<bool>,
    pub species_energies: Vec<f64>,
    /// participation flags of reactant species only
    #[serde(rename = "reagentPERs")]
    pub reagent_pers: BTreeMap<String, Vec<bool>>,
}

impl PuzzleDraft {
    /// Builds the draft from a ready reaction set ("proceed" step).
    ///
    /// `current_name` is the name typed so far; while it is still the configured placeholder,
    /// the name is derived from the species. With `strict_submission` on, every balanced
    /// reaction must also pass the strict formula parser.
    pub fn from_reaction_set(
        set: &ReactionSet,
        current_name: &str,
        settings: &Settings,
    ) -> Result<Self, PuzzleError> {
        if !set.is_ready() {
            return Err(PuzzleError::NotReady);
        }
        if settings.strict_submission() {
            set.validate_strict()?;
        }
        let reactions = set.balanced_reactions();
        let species = set
            .species()
            .into_iter()
            .map(|name| {
                let participation = reactions.iter().map(|r| r.contains(&name)).collect();
                SpeciesEntry {
                    name,
                    energy: settings.default_energy(),
                    is_reactant: true,
                    participation,
                }
            })
            .collect::<Vec<_>>();
        let name = if current_name == settings.default_puzzle_name() {
            set.suggested_puzzle_name()
        } else {
            current_name.to_string()
        };
        info!(
            "puzzle draft '{}' with {} reactions and {} species",
            name,
            reactions.len(),
            species.len()
        );
        Ok(Self {
            name,
            reactions,
            species,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) -> Result<(), PuzzleError> {
        validate_puzzle_name(name)?;
        self.name = name.to_string();
        Ok(())
    }

    pub fn reactions(&self) -> &[ReactionSlots] {
        &self.reactions
    }

    pub fn species(&self) -> &[SpeciesEntry] {
        &self.species
    }

    fn entry_mut(&mut self, species: &str) -> Result<&mut SpeciesEntry, PuzzleError> {
        self.species
            .iter_mut()
            .find(|entry| entry.name == species)
            .ok_or_else(|| PuzzleError::UnknownSpecies(species.to_string()))
    }

    pub fn set_energy(&mut self, species: &str, energy: f64) -> Result<(), PuzzleError> {
        self.entry_mut(species)?.energy = energy;
        Ok(())
    }

    pub fn set_reactant(&mut self, species: &str, is_reactant: bool) -> Result<(), PuzzleError> {
        self.entry_mut(species)?.is_reactant = is_reactant;
        Ok(())
    }

    /// Only reactions the species takes part in can be toggled.
    pub fn set_participation(
        &mut self,
        species: &str,
        row: usize,
        participates: bool,
    ) -> Result<(), PuzzleError> {
        let len = self.reactions.len();
        let takes_part = self
            .reactions
            .get(row)
            .ok_or(PuzzleError::RowOutOfRange { index: row, len })?
            .contains(species);
        let entry = self.entry_mut(species)?;
        if !takes_part {
            return Err(PuzzleError::NotInReaction {
                species: species.to_string(),
                row,
            });
        }
        entry.participation[row] = participates;
        Ok(())
    }

    /// Saving needs at least one species marked as a reactant.
    pub fn can_save(&self) -> bool {
        self.species.iter().any(|entry| entry.is_reactant)
    }

    /// Stoichiometric matrix: one row per reaction, one column per species (in species order).
    /// A species in a reactant slot contributes -1, in a product slot +1.
    pub fn coefficient_matrix(&self) -> DMatrix<f64> {
        let mut matrix = DMatrix::zeros(self.reactions.len(), self.species.len());
        for (i, reaction) in self.reactions.iter().enumerate() {
            for (slot, formula) in reaction.as_array().iter().enumerate() {
                if formula.is_empty() {
                    continue;
                }
                match self.species.iter().position(|entry| &entry.name == formula) {
                    Some(j) => matrix[(i, j)] += if slot > 1 { 1.0 } else { -1.0 },
                    None => warn!("species '{}' of reaction {} has no column", formula, i),
                }
            }
        }
        matrix
    }

    pub fn to_save_request(&self, auth_code: &str) -> Result<SaveRequest, PuzzleError> {
        validate_puzzle_name(&self.name)?;
        if !self.can_save() {
            return Err(PuzzleError::NoReactantSpecies);
        }
        let reagent_pers = self
            .species
            .iter()
            .filter(|entry| entry.is_reactant)
            .map(|entry| (entry.name.clone(), entry.participation.clone()))
            .collect();
        Ok(SaveRequest {
            auth_code: auth_code.to_string(),
            puzzle_name: self.name.clone(),
            reactions: self.reactions.clone(),
            species_names: self.species.iter().map(|e| e.name.clone()).collect(),
            species_if_reactants: self.species.iter().map(|e| e.is_reactant).collect(),
            species_energies: self.species.iter().map(|e| e.energy).collect(),
            reagent_pers,
        })
    }

    pub fn to_json(&self, auth_code: &str) -> Result<String, PuzzleError> {
        let request = self.to_save_request(auth_code)?;
        Ok(serde_json::to_string_pretty(&request)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serde_json::{Value, json};

    fn ready_set() -> ReactionSet {
        let mut set = ReactionSet::new();
        set.add_reaction_with(ReactionSlots::new("NO", "NO", "N2O2", ""));
        set.add_reaction_with(ReactionSlots::new("N2O2", "Br2", "NOBr", "NOBr"));
        set.add_reaction();
        set
    }

    fn draft() -> PuzzleDraft {
        PuzzleDraft::from_reaction_set(&ready_set(), "Untitled Puzzle", &Settings::default())
            .unwrap()
    }

    #[test]
    fn test_validate_puzzle_name() {
        assert!(validate_puzzle_name("NO Br2 test_1-b").is_ok());
        assert!(matches!(
            validate_puzzle_name("../etc/passwd"),
            Err(PuzzleError::InvalidPuzzleName(_))
        ));
        assert!(validate_puzzle_name("").is_err());
        assert!(validate_puzzle_name("a.puz").is_err());
    }

    #[test]
    fn test_draft_from_reaction_set() {
        let draft = draft();
        assert_eq!(
            draft.reactions(),
            &[
                ReactionSlots::new("N2O2", "Br2", "NOBr", "NOBr"),
                ReactionSlots::new("NO", "NO", "N2O2", ""),
            ]
        );
        let names: Vec<&str> = draft.species().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["NO", "N2O2", "Br2", "NOBr"]);
        assert_eq!(draft.name(), "NO N2O2 Br2 NOBr");

        let no = &draft.species()[0];
        assert_eq!(no.participation, vec![false, true]);
        assert_eq!(no.energy, 250.0);
        assert!(no.is_reactant);
        let n2o2 = &draft.species()[1];
        assert_eq!(n2o2.participation, vec![true, true]);
    }

    #[test]
    fn test_typed_name_is_kept() {
        let draft =
            PuzzleDraft::from_reaction_set(&ready_set(), "Bromine", &Settings::default()).unwrap();
        assert_eq!(draft.name(), "Bromine");
    }

    #[test]
    fn test_not_ready_set_is_rejected() {
        let mut set = ready_set();
        set.set_slot(2, 0, "H2").unwrap();
        assert!(matches!(
            PuzzleDraft::from_reaction_set(&set, "x", &Settings::default()),
            Err(PuzzleError::NotReady)
        ));
    }

    #[test]
    fn test_strict_submission() {
        let mut set = ready_set();
        set.set_slot(0, 0, "NO ").unwrap();
        set.set_slot(0, 1, "NO ").unwrap();
        assert!(set.is_ready());
        assert!(PuzzleDraft::from_reaction_set(&set, "x", &Settings::default()).is_ok());

        let mut settings = Settings::default();
        settings.set_strict_submission(true);
        assert!(matches!(
            PuzzleDraft::from_reaction_set(&set, "x", &settings),
            Err(PuzzleError::InvalidFormula { row: 0, .. })
        ));
    }

    #[test]
    fn test_edit_species() {
        let mut draft = draft();
        draft.set_energy("NOBr", 120.5).unwrap();
        draft.set_reactant("NOBr", false).unwrap();
        draft.set_participation("N2O2", 1, false).unwrap();
        assert_eq!(draft.species()[3].energy, 120.5);
        assert!(!draft.species()[3].is_reactant);
        assert_eq!(draft.species()[1].participation, vec![true, false]);

        assert!(matches!(
            draft.set_energy("H2O", 1.0),
            Err(PuzzleError::UnknownSpecies(_))
        ));
        assert!(matches!(
            draft.set_participation("NO", 0, true),
            Err(PuzzleError::NotInReaction { row: 0, .. })
        ));
        assert!(matches!(
            draft.set_participation("NO", 9, true),
            Err(PuzzleError::RowOutOfRange { index: 9, len: 2 })
        ));
        assert!(draft.set_name("bad/name").is_err());
        draft.set_name("Nitrosyl bromide").unwrap();
        assert_eq!(draft.name(), "Nitrosyl bromide");
    }

    #[test]
    fn test_can_save() {
        let mut draft = draft();
        assert!(draft.can_save());
        for name in ["NO", "N2O2", "Br2", "NOBr"] {
            draft.set_reactant(name, false).unwrap();
        }
        assert!(!draft.can_save());
        assert!(matches!(
            draft.to_save_request("123"),
            Err(PuzzleError::NoReactantSpecies)
        ));
    }

    #[test]
    fn test_coefficient_matrix() {
        let matrix = draft().coefficient_matrix();
        // columns: NO, N2O2, Br2, NOBr
        let expected = DMatrix::from_row_slice(
            2,
            4,
            &[
                0.0, -1.0, -1.0, 2.0, //
                -2.0, 1.0, 0.0, 0.0,
            ],
        );
        assert_relative_eq!(matrix, expected);
    }

    #[test]
    fn test_save_request_json() {
        let mut draft = draft();
        draft.set_reactant("NOBr", false).unwrap();
        draft.set_energy("NO", 10.0).unwrap();
        let json_text = draft.to_json("secret").unwrap();
        let value: Value = serde_json::from_str(&json_text).unwrap();
        assert_eq!(value["auth_code"], json!("secret"));
        assert_eq!(value["puzzleName"], json!("NO N2O2 Br2 NOBr"));
        assert_eq!(
            value["reactions"],
            json!([["N2O2", "Br2", "NOBr", "NOBr"], ["NO", "NO", "N2O2", ""]])
        );
        assert_eq!(value["speciesNames"], json!(["NO", "N2O2", "Br2", "NOBr"]));
        assert_eq!(value["speciesIfReactants"], json!([true, true, true, false]));
        assert_eq!(value["speciesEnergies"], json!([10.0, 250.0, 250.0, 250.0]));
        assert_eq!(
            value["reagentPERs"],
            json!({"NO": [false, true], "N2O2": [true, true], "Br2": [true, false]})
        );

        let request: SaveRequest = serde_json::from_str(&json_text).unwrap();
        assert_eq!(request, draft.to_save_request("secret").unwrap());
    }
}
