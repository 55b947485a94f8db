#![forbid(unsafe_code)]

//! Command-line argument parsing for the demo.
//!
//! Parses args manually to keep the binary lean. Supports environment
//! variable overrides via the `DROPNEG_DEMO_*` prefix.

use std::env;
use std::path::PathBuf;
use std::process;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const HELP_TEXT: &str = "\
dropneg-demo: negotiate a drag-and-drop in the terminal

USAGE:
    dropneg-demo [OPTIONS]

OPTIONS:
    --offer=FILE       Read the offer from a JSON file (default: built-in sample)
    --save-dir=DIR     Directory the file chooser answers with (default: .)
    --log-file=FILE    Write tracing output to FILE (default: no logging)
    --help, -h         Show this help message
    --version, -V      Show version

KEYBINDINGS:
    Tab / Shift-Tab    Move between controls
    Left / Right       Pick the previous / next menu entry
    Enter / Space      Toggle, press, or advance the focused control
    Esc / q / Ctrl+C   Close the dialog (declines the drop)

OUTPUT:
    The outcome is printed to stdout as JSON.
    Exit status 0 when accepted, 1 when declined, 2 for an invalid offer.

ENVIRONMENT VARIABLES:
    DROPNEG_DEMO_OFFER      Override --offer
    DROPNEG_DEMO_SAVE_DIR   Override --save-dir
    DROPNEG_DEMO_LOG        Override --log-file
    RUST_LOG                Log filter (default: info)";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    /// JSON offer file; `None` uses the built-in sample.
    pub offer: Option<PathBuf>,
    /// Directory returned by the file chooser.
    pub save_dir: PathBuf,
    /// Tracing output file.
    pub log_file: Option<PathBuf>,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            offer: None,
            save_dir: PathBuf::from("."),
            log_file: None,
        }
    }
}

/// What the command line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(Opts),
    Help,
    Version,
}

impl Opts {
    /// Parse command-line arguments and environment variables, exiting on
    /// `--help`, `--version`, or a bad argument.
    pub fn parse() -> Self {
        match Self::parse_from(env::args().skip(1), |key| env::var(key).ok()) {
            Ok(Command::Run(opts)) => opts,
            Ok(Command::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Command::Version) => {
                println!("dropneg-demo {VERSION}");
                process::exit(0);
            }
            Err(msg) => {
                eprintln!("{msg}");
                eprintln!("Run with --help for usage information.");
                process::exit(2);
            }
        }
    }

    /// Parse from explicit sources.
    ///
    /// Environment variables take precedence over defaults but are overridden
    /// by explicit command-line flags.
    pub fn parse_from<I, E>(args: I, env_var: E) -> Result<Command, String>
    where
        I: IntoIterator<Item = String>,
        E: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        if let Some(val) = env_var("DROPNEG_DEMO_OFFER") {
            opts.offer = Some(val.into());
        }
        if let Some(val) = env_var("DROPNEG_DEMO_SAVE_DIR") {
            opts.save_dir = val.into();
        }
        if let Some(val) = env_var("DROPNEG_DEMO_LOG") {
            opts.log_file = Some(val.into());
        }

        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Ok(Command::Help),
                "--version" | "-V" => return Ok(Command::Version),
                other => {
                    if let Some(val) = other.strip_prefix("--offer=") {
                        opts.offer = Some(non_empty("--offer", val)?.into());
                    } else if let Some(val) = other.strip_prefix("--save-dir=") {
                        opts.save_dir = non_empty("--save-dir", val)?.into();
                    } else if let Some(val) = other.strip_prefix("--log-file=") {
                        opts.log_file = Some(non_empty("--log-file", val)?.into());
                    } else {
                        return Err(format!("Unknown argument: {other}"));
                    }
                }
            }
        }

        Ok(Command::Run(opts))
    }
}

fn non_empty<'a>(flag: &str, val: &'a str) -> Result<&'a str, String> {
    if val.is_empty() {
        Err(format!("Invalid {flag} value: (empty)"))
    } else {
        Ok(val)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str], env: &[(&str, &str)]) -> Result<Command, String> {
        Opts::parse_from(args.iter().map(|s| s.to_string()), |key| {
            env.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        })
    }

    #[test]
    fn default_opts() {
        let opts = Opts::default();
        assert_eq!(opts.offer, None);
        assert_eq!(opts.save_dir, PathBuf::from("."));
        assert_eq!(opts.log_file, None);
        assert_eq!(parse(&[], &[]), Ok(Command::Run(Opts::default())));
    }

    #[test]
    fn flags_override_env() {
        let cmd = parse(
            &["--offer=cli.json", "--log-file=demo.log"],
            &[("DROPNEG_DEMO_OFFER", "env.json"), ("DROPNEG_DEMO_SAVE_DIR", "/tmp")],
        )
        .unwrap();
        assert_eq!(
            cmd,
            Command::Run(Opts {
                offer: Some("cli.json".into()),
                save_dir: "/tmp".into(),
                log_file: Some("demo.log".into()),
            })
        );
    }

    #[test]
    fn help_and_version() {
        assert_eq!(parse(&["--offer=x", "-h"], &[]), Ok(Command::Help));
        assert_eq!(parse(&["--version"], &[]), Ok(Command::Version));
    }

    #[test]
    fn rejects_unknown_and_empty() {
        assert!(parse(&["--screen=2"], &[]).unwrap_err().contains("--screen=2"));
        assert!(parse(&["--save-dir="], &[]).is_err());
    }

    #[test]
    fn version_string_nonempty() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn help_text_contains_env_vars() {
        assert!(HELP_TEXT.contains("DROPNEG_DEMO_OFFER"));
        assert!(HELP_TEXT.contains("DROPNEG_DEMO_SAVE_DIR"));
        assert!(HELP_TEXT.contains("DROPNEG_DEMO_LOG"));
    }
}
