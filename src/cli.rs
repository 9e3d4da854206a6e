/// main menu of the terminal front end
pub mod cli_main;
/// menu for assembling a puzzle row by row
pub mod cli_reaction_set;
