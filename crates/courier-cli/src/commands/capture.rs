//! Capture command implementation.

use super::Service;
use crate::cli::CaptureArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use courier_domain::Fields;

/// Execute the capture command.
pub fn execute_capture(args: CaptureArgs, service: &Service, formatter: &Formatter) -> Result<()> {
    let fields = collect_fields(args.fields)?;
    let record = service.capture(fields, !args.no_dispatch);
    println!("{}", formatter.record_captured(&record));
    Ok(())
}

/// Build the field map; a repeated key is rejected.
fn collect_fields(pairs: Vec<(String, String)>) -> Result<Fields> {
    if pairs.is_empty() {
        return Err(CliError::InvalidInput("No fields provided".to_string()));
    }

    let mut fields = Fields::new();
    for (key, value) in pairs {
        if fields.contains_key(&key) {
            return Err(CliError::InvalidInput(format!("Field '{}' given twice", key)));
        }
        fields.insert(key, value);
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    #[test]
    fn test_collect_fields() {
        let fields = collect_fields(vec![pair("event", "signup"), pair("plan", "pro")]).unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get("plan").map(String::as_str), Some("pro"));
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let result = collect_fields(vec![pair("event", "a"), pair("event", "b")]);
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn test_no_fields_rejected() {
        assert!(collect_fields(Vec::new()).is_err());
    }
}
