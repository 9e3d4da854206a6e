//! Ordered set of elementary reactions being edited by an author or a player.
//!
//! Every row keeps its slots together with the verdict computed from them. The verdict is
//! refreshed inside each mutating method, so a stale verdict can never be observed.
use super::balance::{
    BalanceVerdict, ReactionSlots, evaluate_reaction, guess_missing_product,
    is_reaction_set_ready,
};
use super::errors::PuzzleError;
use super::formula::parse_formula_strict;
use log::{debug, info};
use prettytable::{Cell, Row, Table};

/// one row of the reaction table
#[derive(Debug, Clone, PartialEq)]
pub struct ReactionRow {
    slots: ReactionSlots,
    verdict: BalanceVerdict,
}

impl ReactionRow {
    pub fn new(slots: ReactionSlots) -> Self {
        let verdict = evaluate_reaction(&slots);
        Self { slots, verdict }
    }

    pub fn slots(&self) -> &ReactionSlots {
        &self.slots
    }

    pub fn verdict(&self) -> BalanceVerdict {
        self.verdict
    }

    fn refresh(&mut self) {
        self.verdict = evaluate_reaction(&self.slots);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReactionSet {
    rows: Vec<ReactionRow>,
}

impl ReactionSet {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[ReactionRow] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&ReactionRow> {
        self.rows.get(index)
    }

    fn row_mut(&mut self, index: usize) -> Result<&mut ReactionRow, PuzzleError> {
        let len = self.rows.len();
        self.rows
            .get_mut(index)
            .ok_or(PuzzleError::RowOutOfRange { index, len })
    }

    /////////////////////////////////EDITING ROWS///////////////////////////////////////////

    /// Appends an empty placeholder row and returns its index.
    pub fn add_reaction(&mut self) -> usize {
        self.add_reaction_with(ReactionSlots::empty())
    }

    pub fn add_reaction_with(&mut self, slots: ReactionSlots) -> usize {
        self.rows.push(ReactionRow::new(slots));
        debug!("row {} added", self.rows.len() - 1);
        self.rows.len() - 1
    }

    pub fn remove_reaction(&mut self, index: usize) -> Result<ReactionSlots, PuzzleError> {
        let len = self.rows.len();
        if index >= len {
            return Err(PuzzleError::RowOutOfRange { index, len });
        }
        debug!("row {} removed", index);
        Ok(self.rows.remove(index).slots)
    }

    /// Changes one slot of a row and returns the new verdict of that row.
    pub fn set_slot(
        &mut self,
        row: usize,
        slot: usize,
        formula: &str,
    ) -> Result<BalanceVerdict, PuzzleError> {
        let reaction = self.row_mut(row)?;
        reaction.slots.set_slot(slot, formula)?;
        reaction.refresh();
        Ok(reaction.verdict)
    }

    pub fn set_reaction(
        &mut self,
        row: usize,
        slots: ReactionSlots,
    ) -> Result<BalanceVerdict, PuzzleError> {
        let reaction = self.row_mut(row)?;
        reaction.slots = slots;
        reaction.refresh();
        Ok(reaction.verdict)
    }

    /// Moves a row to another position, the way drag-and-drop reordering does.
    pub fn move_reaction(&mut self, from: usize, to: usize) -> Result<(), PuzzleError> {
        let len = self.rows.len();
        for index in [from, to] {
            if index >= len {
                return Err(PuzzleError::RowOutOfRange { index, len });
            }
        }
        let row = self.rows.remove(from);
        self.rows.insert(to, row);
        Ok(())
    }

    /// "Balance" button: fills the last product slot with the atoms that the first three
    /// slots leave unaccounted for, then re-checks the row.
    pub fn balance_reaction(&mut self, row: usize) -> Result<BalanceVerdict, PuzzleError> {
        let reaction = self.row_mut(row)?;
        let guessed = guess_missing_product(&reaction.slots);
        info!("row {}: guessed product '{}'", row, guessed);
        reaction.slots.set_slot(3, &guessed)?;
        reaction.refresh();
        Ok(reaction.verdict)
    }

    /////////////////////////////////READING VERDICTS///////////////////////////////////////////

    pub fn verdict(&self, index: usize) -> Option<BalanceVerdict> {
        self.rows.get(index).map(ReactionRow::verdict)
    }

    pub fn verdicts(&self) -> Vec<BalanceVerdict> {
        self.rows.iter().map(ReactionRow::verdict).collect()
    }

    /// true if the "proceed" action may be enabled
    pub fn is_ready(&self) -> bool {
        is_reaction_set_ready(&self.verdicts())
    }

    /// Slots of all balanced rows, sorted by their comma-joined text.
    pub fn balanced_reactions(&self) -> Vec<ReactionSlots> {
        let mut reactions: Vec<ReactionSlots> = self
            .rows
            .iter()
            .filter(|row| row.verdict.is_balanced())
            .map(|row| row.slots.clone())
            .collect();
        reactions.sort_by_key(ReactionSlots::joined);
        reactions
    }

    /// Unique species of the balanced rows in the order they first appear in the table.
    pub fn species(&self) -> Vec<String> {
        let mut species: Vec<String> = Vec::new();
        for row in self.rows.iter().filter(|row| row.verdict.is_balanced()) {
            for formula in row.slots.species() {
                if !species.iter().any(|s| s == formula) {
                    species.push(formula.to_string());
                }
            }
        }
        species
    }

    pub fn suggested_puzzle_name(&self) -> String {
        self.species().join(" ")
    }

    /// Runs the strict formula parser over every slot of every balanced row.
    pub fn validate_strict(&self) -> Result<(), PuzzleError> {
        for (index, row) in self.rows.iter().enumerate() {
            if !row.verdict.is_balanced() {
                continue;
            }
            for formula in row.slots.species() {
                parse_formula_strict(formula)
                    .map_err(|source| PuzzleError::InvalidFormula { row: index, source })?;
            }
        }
        Ok(())
    }

    /// Table of all rows with their verdicts, for terminal output.
    pub fn summary_table(&self) -> Table {
        let mut table = Table::new();
        table.add_row(Row::new(vec![
            Cell::new("#"),
            Cell::new("Reactant 1"),
            Cell::new("Reactant 2"),
            Cell::new("Product 1"),
            Cell::new("Product 2"),
            Cell::new("Verdict"),
        ]));
        for (index, row) in self.rows.iter().enumerate() {
            let mut cells = vec![Cell::new(&index.to_string())];
            cells.extend(row.slots.as_array().iter().map(|s| Cell::new(s)));
            cells.push(Cell::new(row.verdict.as_str()));
            table.add_row(Row::new(cells));
        }
        table
    }
}

impl FromIterator<ReactionSlots> for ReactionSet {
    fn from_iter<I: IntoIterator<Item = ReactionSlots>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().map(ReactionRow::new).collect(),
        }
    }
}
