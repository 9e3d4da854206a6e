//! Module to turn an informal chemical formula into its atomic composition
//!
//! Formulae are plain concatenations of element symbols and counts ("H2O", "NaCl", "N2O2").
//! There are no brackets, phase marks, charges or leading coefficients: one slot of a reaction
//! holds exactly one formula unit, so "two oxygen atoms" is written "O2", never "2O".
use log::trace;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

/// element symbol: one uppercase letter, optionally one lowercase letter, then an optional run of digits
fn element_token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([A-Z][a-z]?)(\d*)").expect("element token pattern is valid"))
}

/// errors of the strict formula parser
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormulaError {
    #[error("unrecognised fragment '{fragment}' at position {position} in formula '{formula}'")]
    UnrecognisedFragment {
        formula: String,
        fragment: String,
        position: usize,
    },
    #[error("element '{element}' has zero count in formula '{formula}'")]
    ZeroCount { formula: String, element: String },
    #[error("count '{digits}' of element '{element}' is out of range in formula '{formula}'")]
    CountOutOfRange {
        formula: String,
        element: String,
        digits: String,
    },
}

/// Side of an elementary reaction. Reactants add their atoms to the balance, products subtract them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Reactant,
    Product,
}

impl Side {
    pub fn sign(self) -> i64 {
        match self {
            Side::Reactant => 1,
            Side::Product => -1,
        }
    }
}

// a missing, zero or unparsable count means one atom
fn lenient_count(digits: &str) -> i64 {
    digits
        .parse::<i64>()
        .ok()
        .filter(|&n| n != 0)
        .unwrap_or(1)
}

/// Parses a chemical formula and returns the sequence of (element, count) pairs in the order they appear.
///
/// The parser is lenient: characters that are not part of an element token are skipped, so a half-typed
/// formula never produces an error. An empty string gives an empty sequence (the slot is not used).
/// The same element may appear more than once in the result ("C5H6OOH" gives two "O" and two "H" entries),
/// use [`ElementCount`] to aggregate them.
///
/// # Examples
/// ```
/// use ckwatson::Puzzle::formula::parse_formula;
/// let atoms = parse_formula("H2O");
/// assert_eq!(atoms, vec![("H".to_string(), 2), ("O".to_string(), 1)]);
/// ```
pub fn parse_formula(formula: &str) -> Vec<(String, i64)> {
    let atoms: Vec<(String, i64)> = element_token_regex()
        .captures_iter(formula)
        .map(|cap| (cap[1].to_string(), lenient_count(&cap[2])))
        .collect();
    trace!("formula '{}' parsed into {:?}", formula, atoms);
    atoms
}

/// Strict counterpart of [`parse_formula`] meant for final submission of a puzzle.
///
/// Every character of the formula must belong to an element token, and explicit counts must be
/// positive numbers that fit into an `i64`.
pub fn parse_formula_strict(formula: &str) -> Result<Vec<(String, i64)>, FormulaError> {
    let mut atoms = Vec::new();
    let mut cursor = 0;
    for cap in element_token_regex().captures_iter(formula) {
        let whole = cap.get(0).expect("group 0 is always present");
        if whole.start() != cursor {
            return Err(FormulaError::UnrecognisedFragment {
                formula: formula.to_string(),
                fragment: formula[cursor..whole.start()].to_string(),
                position: cursor,
            });
        }
        cursor = whole.end();

        let element = cap[1].to_string();
        let digits = &cap[2];
        let count = if digits.is_empty() {
            1
        } else {
            match digits.parse::<i64>() {
                Ok(0) => {
                    return Err(FormulaError::ZeroCount {
                        formula: formula.to_string(),
                        element,
                    });
                }
                Ok(n) => n,
                Err(_) => {
                    return Err(FormulaError::CountOutOfRange {
                        formula: formula.to_string(),
                        element,
                        digits: digits.to_string(),
                    });
                }
            }
        };
        atoms.push((element, count));
    }
    if cursor != formula.len() {
        return Err(FormulaError::UnrecognisedFragment {
            formula: formula.to_string(),
            fragment: formula[cursor..].to_string(),
            position: cursor,
        });
    }
    Ok(atoms)
}

/// Signed number of atoms of every element.
///
/// Entries keep the order in which elements were first seen. An element with count 0 is
/// equivalent to an absent element for comparison and for [`ElementCount::is_balanced`],
/// but it still counts as an entry for [`ElementCount::is_empty`]: "H2 = H2" has entries, "" has none.
#[derive(Debug, Clone, Default)]
pub struct ElementCount {
    counts: Vec<(String, i64)>,
}

impl ElementCount {
    pub fn new() -> Self {
        Self { counts: Vec::new() }
    }

    /// composition of a single formula taken as a reactant
    pub fn from_formula(formula: &str) -> Self {
        let mut counts = Self::new();
        counts.add_species(formula, Side::Reactant);
        counts
    }

    pub fn add(&mut self, element: &str, count: i64) {
        match self.counts.iter().position(|(el, _)| el == element) {
            Some(i) => self.counts[i].1 += count,
            None => self.counts.push((element.to_string(), count)),
        }
    }

    /// Folds all atoms of a formula into the balance with the sign of the given side.
    /// Empty formulas leave the balance untouched.
    pub fn add_species(&mut self, formula: &str, side: Side) {
        if formula.is_empty() {
            return;
        }
        for (element, count) in parse_formula(formula) {
            self.add(&element, side.sign() * count);
        }
    }

    pub fn get(&self, element: &str) -> i64 {
        self.counts
            .iter()
            .find(|(el, _)| el == element)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    /// true if no element was ever recorded
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// true if every recorded count is exactly zero
    pub fn is_balanced(&self) -> bool {
        self.counts.iter().all(|(_, n)| *n == 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.counts.iter().map(|(el, n)| (el.as_str(), *n))
    }

    /// Serializes the strictly positive part of the balance back into a formula:
    /// the element symbol followed by its count when the count is greater than one.
    pub fn to_formula(&self) -> String {
        self.counts
            .iter()
            .filter(|(_, n)| *n > 0)
            .map(|(el, n)| {
                if *n > 1 {
                    format!("{}{}", el, n)
                } else {
                    el.clone()
                }
            })
            .collect()
    }
}

impl PartialEq for ElementCount {
    fn eq(&self, other: &Self) -> bool {
        self.iter().all(|(el, n)| other.get(el) == n) && other.iter().all(|(el, n)| self.get(el) == n)
    }
}

impl Eq for ElementCount {}

impl FromIterator<(String, i64)> for ElementCount {
    fn from_iter<I: IntoIterator<Item = (String, i64)>>(iter: I) -> Self {
        let mut counts = Self::new();
        for (element, count) in iter {
            counts.add(&element, count);
        }
        counts
    }
}

impl fmt::Display for ElementCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(el, n)| format!("{}: {}", el, n)).collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(&str, i64)]) -> ElementCount {
        pairs.iter().map(|(el, n)| (el.to_string(), *n)).collect()
    }

    #[test]
    fn test_parse_formula() {
        assert_eq!(
            parse_formula("H2O"),
            vec![("H".to_string(), 2), ("O".to_string(), 1)]
        );
        assert_eq!(
            parse_formula("NaCl"),
            vec![("Na".to_string(), 1), ("Cl".to_string(), 1)]
        );
        assert_eq!(
            parse_formula("C6H8O6"),
            vec![
                ("C".to_string(), 6),
                ("H".to_string(), 8),
                ("O".to_string(), 6)
            ]
        );
        assert!(parse_formula("").is_empty());
    }

    #[test]
    fn test_parse_formula_is_deterministic() {
        for formula in ["N2O2", "NOBr", "Br2", "x(y)", ""] {
            assert_eq!(parse_formula(formula), parse_formula(formula));
        }
    }

    #[test]
    fn test_lenient_parser_skips_garbage() {
        // brackets, spaces, lowercase starts and charges are simply dropped
        assert_eq!(
            parse_formula("2 H2O+"),
            vec![("H".to_string(), 2), ("O".to_string(), 1)]
        );
        assert_eq!(
            parse_formula("(OH)2"),
            vec![("O".to_string(), 1), ("H".to_string(), 1)]
        );
        assert!(parse_formula("abc 123 ++").is_empty());
        // zero count is read as one atom
        assert_eq!(parse_formula("H0"), vec![("H".to_string(), 1)]);
        // oversized count is read as one atom
        assert_eq!(
            parse_formula("C99999999999999999999999"),
            vec![("C".to_string(), 1)]
        );
    }

    #[test]
    fn test_repeated_elements_aggregate() {
        let composition: ElementCount = parse_formula("C5H6OOH").into_iter().collect();
        assert_eq!(composition, counts(&[("C", 5), ("H", 7), ("O", 2)]));
    }

    #[test]
    fn test_parse_formula_strict() {
        assert_eq!(
            parse_formula_strict("NOBr").unwrap(),
            vec![
                ("N".to_string(), 1),
                ("O".to_string(), 1),
                ("Br".to_string(), 1)
            ]
        );
        assert!(parse_formula_strict("").unwrap().is_empty());

        let err = parse_formula_strict("2H2O").unwrap_err();
        assert_eq!(
            err,
            FormulaError::UnrecognisedFragment {
                formula: "2H2O".to_string(),
                fragment: "2".to_string(),
                position: 0,
            }
        );
        let err = parse_formula_strict("H2O(g)").unwrap_err();
        assert!(matches!(
            err,
            FormulaError::UnrecognisedFragment { position: 3, .. }
        ));
        let err = parse_formula_strict("NaCl ").unwrap_err();
        assert!(matches!(
            err,
            FormulaError::UnrecognisedFragment { ref fragment, .. } if fragment == " "
        ));
        assert!(matches!(
            parse_formula_strict("H0").unwrap_err(),
            FormulaError::ZeroCount { .. }
        ));
        assert!(matches!(
            parse_formula_strict("C99999999999999999999999").unwrap_err(),
            FormulaError::CountOutOfRange { .. }
        ));
    }

    #[test]
    fn test_element_count_sides() {
        let mut balance = ElementCount::new();
        balance.add_species("H2", Side::Reactant);
        balance.add_species("O2", Side::Reactant);
        balance.add_species("H2O", Side::Product);
        assert_eq!(balance.get("H"), 0);
        assert_eq!(balance.get("O"), 1);
        assert_eq!(balance.get("N"), 0);
        assert!(!balance.is_balanced());

        balance.add_species("", Side::Product);
        assert_eq!(balance, counts(&[("O", 1)]));
    }

    #[test]
    fn test_zero_entries_compare_as_absent() {
        let mut balance = ElementCount::new();
        balance.add_species("H2", Side::Reactant);
        balance.add_species("H2", Side::Product);
        assert!(!balance.is_empty());
        assert!(balance.is_balanced());
        assert_eq!(balance, ElementCount::new());
        assert!(ElementCount::new().is_empty());
        assert!(ElementCount::new().is_balanced());
    }

    #[test]
    fn test_to_formula() {
        let mut balance = ElementCount::from_formula("NO");
        balance.add_species("NO", Side::Reactant);
        assert_eq!(balance.to_formula(), "N2O2");

        let balance = counts(&[("Br", 1), ("Cl", -2), ("K", 0), ("O", 3)]);
        assert_eq!(balance.to_formula(), "BrO3");
        assert_eq!(ElementCount::new().to_formula(), "");
    }

    #[test]
    fn test_display() {
        let balance = counts(&[("H", 2), ("O", -1)]);
        assert_eq!(balance.to_string(), "{H: 2, O: -1}");
    }
}
