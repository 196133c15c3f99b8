//! CLI command definitions and argument parsing.

use clap::{Args, Parser, Subcommand};

/// Courier - capture event records locally and forward them to a collector.
#[derive(Debug, Parser)]
#[command(name = "courier")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (default: ~/.courier/config.toml)
    #[arg(short, long, global = true, env = "COURIER_CONFIG")]
    pub config: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Capture one record
    Capture(CaptureArgs),

    /// List stored records
    List(ListArgs),

    /// Remove every stored record
    Clear(ClearArgs),
}

/// Arguments for the capture command.
#[derive(Debug, Args)]
pub struct CaptureArgs {
    /// Record field as key=value (repeatable)
    #[arg(short, long = "field", value_parser = parse_field)]
    pub fields: Vec<(String, String)>,

    /// Store and enrich the record without delivering it
    #[arg(long)]
    pub no_dispatch: bool,
}

/// Arguments for the list command.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Print records as JSON, in the stored format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the clear command.
#[derive(Debug, Args)]
pub struct ClearArgs {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Parse a `key=value` pair. The value may contain further `=`.
pub fn parse_field(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        Some(_) => Err(format!("missing key in '{}'", raw)),
        None => Err(format!("expected key=value, got '{}'", raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field() {
        assert_eq!(
            parse_field("event=signup").unwrap(),
            ("event".to_string(), "signup".to_string())
        );
        assert_eq!(
            parse_field("query=a=b").unwrap(),
            ("query".to_string(), "a=b".to_string())
        );
        assert_eq!(parse_field("note=").unwrap(), ("note".to_string(), String::new()));
        assert!(parse_field("=value").is_err());
        assert!(parse_field("novalue").is_err());
    }

    #[test]
    fn test_capture_command() {
        let cli = Cli::try_parse_from([
            "courier",
            "capture",
            "-f",
            "event=signup",
            "--field",
            "plan=pro",
            "--no-dispatch",
        ])
        .unwrap();

        match cli.command {
            Command::Capture(args) => {
                assert_eq!(args.fields.len(), 2);
                assert_eq!(args.fields[1], ("plan".to_string(), "pro".to_string()));
                assert!(args.no_dispatch);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_config_flag() {
        let cli =
            Cli::try_parse_from(["courier", "list", "--json", "--config", "/tmp/c.toml"]).unwrap();
        assert_eq!(cli.config.as_deref(), Some("/tmp/c.toml"));
        assert!(matches!(cli.command, Command::List(ListArgs { json: true })));
    }

    #[test]
    fn test_bad_field_rejected() {
        assert!(Cli::try_parse_from(["courier", "capture", "-f", "oops"]).is_err());
    }
}
