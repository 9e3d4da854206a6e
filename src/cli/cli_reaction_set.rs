use super::cli_main::{colored_verdict, prompt, read_line};
use crate::Puzzle::balance::ReactionSlots;
use crate::Puzzle::puzzle_draft::PuzzleDraft;
use crate::Puzzle::reaction_set::ReactionSet;
use crate::settings::Settings;
use log::info;
use std::io::{self, BufRead, Write};

pub fn reaction_set_menu(
    input: &mut impl BufRead,
    output: &mut impl Write,
    settings: &Settings,
) -> io::Result<()> {
    let mut set = ReactionSet::new();
    set.add_reaction();
    loop {
        writeln!(output, "\n=== Build a puzzle ===")?;
        writeln!(output, "\x1b[33m1. Add reaction\x1b[0m")?;
        writeln!(output, "\x1b[33m2. Edit a slot\x1b[0m")?;
        writeln!(output, "\x1b[33m3. Remove reaction\x1b[0m")?;
        writeln!(output, "\x1b[33m4. Move reaction\x1b[0m")?;
        writeln!(output, "\x1b[33m5. Balance reaction\x1b[0m")?;
        writeln!(output, "\x1b[33m6. Show reactions\x1b[0m")?;
        writeln!(output, "\x1b[33m7. Proceed\x1b[0m")?;
        writeln!(output, "\x1b[33m0. Back to main menu\x1b[0m")?;
        prompt(output, "Enter your choice: ")?;

        let Some(choice) = read_line(input)? else {
            break;
        };
        match choice.as_str() {
            "1" => add_reaction(input, output, &mut set)?,
            "2" => edit_slot(input, output, &mut set)?,
            "3" => {
                let Some(row) = read_index(input, output, "Row: ")? else {
                    continue;
                };
                if let Err(e) = set.remove_reaction(row) {
                    writeln!(output, "{}", e)?;
                }
            }
            "4" => {
                let Some(from) = read_index(input, output, "Move row: ")? else {
                    continue;
                };
                let Some(to) = read_index(input, output, "To position: ")? else {
                    continue;
                };
                if let Err(e) = set.move_reaction(from, to) {
                    writeln!(output, "{}", e)?;
                }
            }
            "5" => {
                let Some(row) = read_index(input, output, "Row: ")? else {
                    continue;
                };
                match set.balance_reaction(row) {
                    Ok(verdict) => writeln!(output, "row {} is {}", row, colored_verdict(verdict))?,
                    Err(e) => writeln!(output, "{}", e)?,
                }
            }
            "6" => writeln!(output, "{}", set.summary_table())?,
            "7" => proceed(input, output, &set, settings)?,
            "0" => break,
            _ => writeln!(output, "Invalid choice. Please try again.")?,
        }
        writeln!(
            output,
            "ready to proceed: {}",
            if set.is_ready() { "yes" } else { "no" }
        )?;
    }
    Ok(())
}

fn read_index(
    input: &mut impl BufRead,
    output: &mut impl Write,
    text: &str,
) -> io::Result<Option<usize>> {
    prompt(output, text)?;
    let line = read_line(input)?.unwrap_or_default();
    match line.parse::<usize>() {
        Ok(index) => Ok(Some(index)),
        Err(_) => {
            writeln!(output, "'{}' is not a row number", line)?;
            Ok(None)
        }
    }
}

fn add_reaction(
    input: &mut impl BufRead,
    output: &mut impl Write,
    set: &mut ReactionSet,
) -> io::Result<()> {
    prompt(output, "Reaction (empty line for a blank row): ")?;
    let line = read_line(input)?.unwrap_or_default();
    if line.is_empty() {
        set.add_reaction();
        return Ok(());
    }
    match line.parse::<ReactionSlots>() {
        Ok(slots) => {
            let row = set.add_reaction_with(slots);
            if let Some(verdict) = set.verdict(row) {
                writeln!(output, "row {} is {}", row, colored_verdict(verdict))?;
            }
        }
        Err(e) => writeln!(output, "{}", e)?,
    }
    Ok(())
}

fn edit_slot(
    input: &mut impl BufRead,
    output: &mut impl Write,
    set: &mut ReactionSet,
) -> io::Result<()> {
    let Some(row) = read_index(input, output, "Row: ")? else {
        return Ok(());
    };
    let Some(slot) = read_index(input, output, "Slot (0-1 reactants, 2-3 products): ")? else {
        return Ok(());
    };
    prompt(output, "Formula: ")?;
    let formula = read_line(input)?.unwrap_or_default();
    match set.set_slot(row, slot, &formula) {
        Ok(verdict) => writeln!(output, "row {} is {}", row, colored_verdict(verdict)),
        Err(e) => writeln!(output, "{}", e),
    }
}

fn proceed(
    input: &mut impl BufRead,
    output: &mut impl Write,
    set: &ReactionSet,
    settings: &Settings,
) -> io::Result<()> {
    let draft = match PuzzleDraft::from_reaction_set(set, settings.default_puzzle_name(), settings)
    {
        Ok(draft) => draft,
        Err(e) => return writeln!(output, "{}", e),
    };
    writeln!(output, "puzzle name: {}", draft.name())?;
    for entry in draft.species() {
        writeln!(output, "  {} (energy {})", entry.name, entry.energy)?;
    }
    writeln!(output, "coefficients:{}", draft.coefficient_matrix())?;

    prompt(output, "Auth code: ")?;
    let auth_code = read_line(input)?.unwrap_or_default();
    match draft.to_json(&auth_code) {
        Ok(json) => {
            info!("save request prepared for '{}'", draft.name());
            writeln!(output, "{}", json)
        }
        Err(e) => writeln!(output, "{}", e),
    }
}
