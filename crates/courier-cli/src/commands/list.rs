//! List command implementation.

use super::Service;
use crate::cli::ListArgs;
use crate::error::Result;
use crate::output::Formatter;

/// Execute the list command.
pub fn execute_list(args: ListArgs, service: &Service, formatter: &Formatter) -> Result<()> {
    let records = service.list_all();
    println!("{}", formatter.format_records(&records, args.json)?);
    Ok(())
}
