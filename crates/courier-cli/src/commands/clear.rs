//! Clear command implementation.

use super::Service;
use crate::cli::ClearArgs;
use crate::error::Result;
use crate::output::Formatter;
use std::io::{self, Write};

/// Execute the clear command.
pub fn execute_clear(args: ClearArgs, service: &Service, formatter: &Formatter) -> Result<()> {
    let count = service.list_all().len();
    if count == 0 {
        println!("{}", formatter.info("Nothing to clear"));
        return Ok(());
    }

    // Confirm unless --yes is specified
    if !args.yes {
        print!("About to delete {} record(s). Continue? [y/N] ", count);
        io::stdout().flush()?;

        let mut response = String::new();
        io::stdin().read_line(&mut response)?;

        if !confirmed(&response) {
            println!("{}", formatter.info("Operation cancelled"));
            return Ok(());
        }
    }

    service.clear();
    println!("{}", formatter.success(&format!("Cleared {} record(s)", count)));
    Ok(())
}

fn confirmed(response: &str) -> bool {
    matches!(response.trim().to_lowercase().as_str(), "y" | "yes")
}
