//////////////////////////////////////////////////////////////////////////////////////////////////
// TESTS OF THE MASS-BALANCE CHECKER
//////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use crate::Puzzle::balance::{
        BalanceVerdict, ReactionSlots, evaluate_reaction, guess_missing_product,
        is_reaction_set_ready, suggest_product,
    };
    use crate::Puzzle::formula::{ElementCount, parse_formula};
    use crate::Puzzle::balance::BalanceVerdict::{Balanced, Unbalanced, Unset};

    fn verdict(slots: [&str; 4]) -> BalanceVerdict {
        evaluate_reaction(&ReactionSlots::from(slots))
    }

    #[test]
    fn test_balanced_reactions() {
        assert_eq!(verdict(["NO", "NO", "N2O2", ""]), Balanced);
        assert_eq!(verdict(["N2O2", "Br2", "NOBr", "NOBr"]), Balanced);
        assert_eq!(verdict(["H2", "", "H", "H"]), Balanced);
        // order of elements inside a formula does not matter
        assert_eq!(verdict(["ON", "", "NO", ""]), Balanced);
        // reactant may sit in the second slot, product in the last one
        assert_eq!(verdict(["", "Cl2", "", "ClCl"]), Balanced);
    }

    #[test]
    fn test_water_is_unbalanced() {
        // H: 2 - 2 = 0, O: 2 - 1 = 1
        assert_eq!(verdict(["H2", "O2", "H2O", ""]), Unbalanced);
        // H: 2 - 4 = -2, O: 2 - 2 = 0
        assert_eq!(verdict(["H2", "O2", "H2O", "H2O"]), Unbalanced);
    }

    #[test]
    fn test_one_sided_reactions_are_unbalanced() {
        assert_eq!(verdict(["NO", "", "", ""]), Unbalanced);
        assert_eq!(verdict(["", "", "", "N2O2"]), Unbalanced);
        assert_eq!(verdict(["A", "B", "", ""]), Unbalanced);
    }

    #[test]
    fn test_unset_rows() {
        assert_eq!(verdict(["", "", "", ""]), Unset);
        assert_eq!(verdict(["A", "B", "A", "B"]), Unset);
        assert_eq!(verdict(["A", "B", "B", "A"]), Unset);
        assert_eq!(verdict(["A", "", "A", ""]), Unset);
        assert_eq!(verdict(["", "A", "A", ""]), Unset);
        // nothing parsable in any slot
        assert_eq!(verdict(["abc", "", "123", ""]), Unset);
    }

    #[test]
    fn test_identity_is_literal() {
        // same atoms but different strings: a real rearrangement, not an identity
        assert_eq!(verdict(["AB", "", "BA", ""]), Balanced);
        assert_eq!(verdict(["A", "B", "A", "C"]), Unbalanced);
    }

    #[test]
    fn test_garbage_degrades_gracefully() {
        // lowercase typo drops the atom and the row turns unbalanced instead of failing
        assert_eq!(verdict(["NO", "NO", "n2O2", ""]), Unbalanced);
        assert_eq!(verdict(["NO", "NO", "N2O2 ", ""]), Balanced);
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let slots = ReactionSlots::new("N2O2", "Br2", "NOBr", "NOBr");
        let first = evaluate_reaction(&slots);
        for _ in 0..3 {
            assert_eq!(evaluate_reaction(&slots), first);
        }
    }

    #[test]
    fn test_reaction_set_readiness() {
        assert!(is_reaction_set_ready(&[Unset, Balanced]));
        assert!(is_reaction_set_ready(&[Balanced, Balanced]));
        assert!(!is_reaction_set_ready(&[Balanced, Unbalanced]));
        assert!(!is_reaction_set_ready(&[Unset, Unset]));
        assert!(!is_reaction_set_ready(&[Unbalanced]));
        assert!(!is_reaction_set_ready(&[]));
    }

    #[test]
    fn test_suggest_product() {
        let product = suggest_product("NO", "NO");
        assert_eq!(product, "N2O2");
        let composition: ElementCount = parse_formula(&product).into_iter().collect();
        assert_eq!(composition, ElementCount::from_formula("N2O2"));

        assert_eq!(suggest_product("N2O2", "Br2"), "N2O2Br2");
        assert_eq!(suggest_product("H", ""), "H");
        assert_eq!(suggest_product("", ""), "");

        let slots = ReactionSlots::new("NO", "NO", &suggest_product("NO", "NO"), "");
        assert_eq!(evaluate_reaction(&slots), Balanced);
    }

    #[test]
    fn test_guess_missing_product() {
        let slots = ReactionSlots::new("N2O2", "Br2", "NOBr", "");
        assert_eq!(guess_missing_product(&slots), "NOBr");
        // the last slot is ignored when guessing
        let slots = ReactionSlots::new("N2O2", "Br2", "NOBr", "XYZ");
        assert_eq!(guess_missing_product(&slots), "NOBr");
        // product already takes everything
        let slots = ReactionSlots::new("NO", "NO", "N2O2", "");
        assert_eq!(guess_missing_product(&slots), "");
    }
}
