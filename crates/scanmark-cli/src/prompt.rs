//! Interactive prompts

use std::io::{self, IsTerminal, Write};

use anyhow::Result;

/// Whether stdin is a terminal someone can answer from
pub fn is_interactive() -> bool {
    io::stdin().is_terminal()
}

/// Ask a yes/no question on stdin
///
/// Answers no without asking when stdin is not a terminal.
pub fn confirm(prompt: &str) -> Result<bool> {
    if !is_interactive() {
        return Ok(false);
    }

    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(is_yes(&input))
}

fn is_yes(input: &str) -> bool {
    let input = input.trim().to_lowercase();
    input == "y" || input == "yes"
}
