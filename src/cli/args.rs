//! Command-line argument parsing for chatstream.
//!
//! This module handles parsing command-line arguments and determining
//! which CLI command to execute.

/// Options for a chat session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatOptions {
    /// Override the backend origin from `CHATSTREAM_URL`
    pub url: Option<String>,
    /// Ask one question, print the answer and exit
    pub once: Option<String>,
}

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Chat with the agent (default)
    Chat(ChatOptions),
    /// The arguments could not be understood
    Invalid(String),
}

/// Parse command-line arguments and return the appropriate command.
///
/// # Arguments
///
/// * `args` - Iterator of command-line arguments (typically `std::env::args()`)
///
/// # Examples
///
/// ```
/// use chatstream::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["chatstream".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    let mut options = ChatOptions::default();
    // Skip the program name
    let mut args = args.skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => return CliCommand::Version,
            "--help" | "-h" => return CliCommand::Help,
            "--url" => match args.next() {
                Some(url) => options.url = Some(url),
                None => return CliCommand::Invalid("--url needs a value".to_string()),
            },
            "--once" => match args.next() {
                Some(query) => options.once = Some(query),
                None => return CliCommand::Invalid("--once needs a query".to_string()),
            },
            other => return CliCommand::Invalid(format!("unknown argument '{}'", other)),
        }
    }

    CliCommand::Chat(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliCommand {
        let mut all = vec!["chatstream".to_string()];
        all.extend(args.iter().map(|a| a.to_string()));
        parse_args(all.into_iter())
    }

    #[test]
    fn test_parse_version_flags() {
        assert_eq!(parse(&["--version"]), CliCommand::Version);
        assert_eq!(parse(&["-V"]), CliCommand::Version);
    }

    #[test]
    fn test_parse_help_flags() {
        assert_eq!(parse(&["--help"]), CliCommand::Help);
        assert_eq!(parse(&["-h"]), CliCommand::Help);
    }

    #[test]
    fn test_parse_no_args() {
        assert_eq!(parse(&[]), CliCommand::Chat(ChatOptions::default()));
    }

    #[test]
    fn test_parse_url_and_once() {
        assert_eq!(
            parse(&["--url", "http://agent:8000", "--once", "What is a net premium?"]),
            CliCommand::Chat(ChatOptions {
                url: Some("http://agent:8000".to_string()),
                once: Some("What is a net premium?".to_string()),
            })
        );
    }

    #[test]
    fn test_parse_missing_value() {
        assert!(matches!(parse(&["--url"]), CliCommand::Invalid(_)));
        assert!(matches!(parse(&["--once"]), CliCommand::Invalid(_)));
    }

    #[test]
    fn test_parse_unknown_flag() {
        assert_eq!(
            parse(&["--unknown"]),
            CliCommand::Invalid("unknown argument '--unknown'".to_string())
        );
    }
}
