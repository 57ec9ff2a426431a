//! Command line handling shared by both binaries.
//!
//! `[<device serial>] [-help] [-version]`: a token made only of digits is
//! the serial (the last one wins), the help / version flags end the program
//! with exit code 0, anything else is reported and ignored.

const HELP_FLAGS: [&str; 3] = ["-help", "--help", "-h"];
const VERSION_FLAGS: [&str; 3] = ["-v", "-version", "--version"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliAction {
    Run { serial: Option<String> },
    Help,
    Version,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub action: CliAction,
    /// Tokens that were neither a flag nor a serial
    pub unknown: Vec<String>,
}

pub fn is_serial(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

/// Parses the arguments after the program name.
pub fn parse_args<I, S>(args: I) -> CliArgs
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut serial = None;
    let mut unknown = Vec::new();

    for arg in args {
        let arg = arg.into();
        if HELP_FLAGS.contains(&arg.as_str()) {
            return CliArgs {
                action: CliAction::Help,
                unknown,
            };
        }
        if VERSION_FLAGS.contains(&arg.as_str()) {
            return CliArgs {
                action: CliAction::Version,
                unknown,
            };
        }
        if is_serial(&arg) {
            serial = Some(arg);
        } else {
            unknown.push(arg);
        }
    }

    CliArgs {
        action: CliAction::Run { serial },
        unknown,
    }
}

pub fn usage(program: &str) -> String {
    format!("Usage: {} [<device serial>] [-help] [-version]", program)
}

pub fn version() -> String {
    format!("Version: {}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_runs_default_device() {
        let args = parse_args(Vec::<String>::new());
        assert_eq!(args.action, CliAction::Run { serial: None });
        assert!(args.unknown.is_empty());
    }

    #[test]
    fn test_last_serial_wins() {
        let args = parse_args(["123", "456789"]);
        assert_eq!(
            args.action,
            CliAction::Run {
                serial: Some("456789".to_string())
            }
        );
    }

    #[test]
    fn test_unknown_tokens_are_collected() {
        let args = parse_args(["--fast", "12a", "007"]);
        assert_eq!(
            args.action,
            CliAction::Run {
                serial: Some("007".to_string())
            }
        );
        assert_eq!(args.unknown, vec!["--fast".to_string(), "12a".to_string()]);
    }

    #[test]
    fn test_help_and_version_stop_parsing() {
        assert_eq!(parse_args(["1", "-help", "2"]).action, CliAction::Help);
        assert_eq!(parse_args(["-h"]).action, CliAction::Help);
        assert_eq!(parse_args(["--version"]).action, CliAction::Version);
        assert_eq!(parse_args(["-v", "-help"]).action, CliAction::Version);
    }

    #[test]
    fn test_is_serial() {
        assert!(is_serial("000000000001"));
        assert!(!is_serial(""));
        assert!(!is_serial("-1"));
        assert!(!is_serial("12 3"));
    }

    #[test]
    fn test_usage_and_version_text() {
        assert_eq!(usage("depth-cloud"), "Usage: depth-cloud [<device serial>] [-help] [-version]");
        assert!(version().starts_with("Version: "));
    }
}
