/// Module to parse informal chemical formulae into their atomic composition
///
///  # Examples
/// ```
/// use ckwatson::Puzzle::formula::{parse_formula, ElementCount};
/// let atoms = parse_formula("NaCl");
/// println!("{:?}", atoms);
/// let composition = ElementCount::from_formula("N2O2");
/// assert_eq!(composition.get("N"), 2);
/// ```
pub mod formula;
/// Mass balance of a single elementary reaction `A + B = C + D`, readiness of a whole set of
/// reactions, and product suggestions used to autofill the last slot.
///
///  # Examples
/// ```
/// use ckwatson::Puzzle::balance::{evaluate_reaction, is_reaction_set_ready, ReactionSlots};
/// let first: ReactionSlots = "NO + NO = N2O2".parse().unwrap();
/// let second = ReactionSlots::new("N2O2", "Br2", "NOBr", "NOBr");
/// let verdicts = vec![evaluate_reaction(&first), evaluate_reaction(&second)];
/// assert!(is_reaction_set_ready(&verdicts));
/// ```
pub mod balance;
/// Ordered, editable set of reaction rows with their verdicts kept up to date
pub mod reaction_set;
/// Species data and the request body of a puzzle about to be saved
pub mod puzzle_draft;
pub mod errors;

#[cfg(test)]
mod balance_tests;
