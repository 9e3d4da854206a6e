use super::cli_reaction_set::reaction_set_menu;
use crate::Puzzle::balance::{BalanceVerdict, ReactionSlots, evaluate_reaction, suggest_product};
use crate::settings::Settings;
use std::io::{self, BufRead, Write};

/// Runs the menu on stdin/stdout until the user quits.
pub fn run_interactive_menu(settings: &Settings) -> io::Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    main_menu(&mut input, &mut output, settings)
}

pub fn main_menu(
    input: &mut impl BufRead,
    output: &mut impl Write,
    settings: &Settings,
) -> io::Result<()> {
    loop {
        show_main_menu(output)?;
        let Some(choice) = read_line(input)? else {
            break;
        };
        match choice.as_str() {
            "1" => check_reaction(input, output)?,
            "2" => suggest(input, output)?,
            "3" => reaction_set_menu(input, output, settings)?,
            "0" => {
                writeln!(output, "Goodbye!")?;
                break;
            }
            _ => writeln!(output, "Invalid choice. Please try again.")?,
        }
    }
    Ok(())
}
/* colors
Blue (\x1b[34m) - header text
Yellow (\x1b[33m) - menu options
Cyan (\x1b[36m) - prompts
Green/Red (\x1b[32m / \x1b[31m) - balanced / unbalanced verdicts
*/
fn show_main_menu(output: &mut impl Write) -> io::Result<()> {
    writeln!(
        output,
        "\x1b[34m\n CKWatson: build and check chemical kinetics puzzles \n\x1b[0m"
    )?;
    writeln!(output, "\x1b[33m1. Check a reaction\x1b[0m")?;
    writeln!(output, "\x1b[33m2. Suggest a product\x1b[0m")?;
    writeln!(output, "\x1b[33m3. Build a puzzle\x1b[0m")?;
    writeln!(output, "\x1b[33m0. Exit\x1b[0m")?;
    prompt(output, "Enter your choice: ")
}

pub(crate) fn prompt(output: &mut impl Write, text: &str) -> io::Result<()> {
    write!(output, "\x1b[36m{}\x1b[0m", text)?;
    output.flush()
}

/// Reads one trimmed line; `None` at end of input.
pub(crate) fn read_line(input: &mut impl BufRead) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

pub(crate) fn colored_verdict(verdict: BalanceVerdict) -> String {
    match verdict {
        BalanceVerdict::Balanced => format!("\x1b[32m{}\x1b[0m", verdict),
        BalanceVerdict::Unbalanced => format!("\x1b[31m{}\x1b[0m", verdict),
        BalanceVerdict::Unset => verdict.to_string(),
    }
}

fn check_reaction(input: &mut impl BufRead, output: &mut impl Write) -> io::Result<()> {
    prompt(output, "Reaction (e.g. NO + NO = N2O2): ")?;
    let line = read_line(input)?.unwrap_or_default();
    match line.parse::<ReactionSlots>() {
        Ok(slots) => {
            let verdict = evaluate_reaction(&slots);
            writeln!(output, "{} is {}", slots, colored_verdict(verdict))?;
            if verdict == BalanceVerdict::Unbalanced {
                writeln!(output, "net atoms: {}", slots.element_balance())?;
            }
        }
        Err(e) => writeln!(output, "{}", e)?,
    }
    Ok(())
}

fn suggest(input: &mut impl BufRead, output: &mut impl Write) -> io::Result<()> {
    prompt(output, "First reactant: ")?;
    let first = read_line(input)?.unwrap_or_default();
    prompt(output, "Second reactant: ")?;
    let second = read_line(input)?.unwrap_or_default();
    writeln!(output, "suggested product: {}", suggest_product(&first, &second))
}
