//! Signal Calculator terminal keypad
//!
//! Presses keypad keys given on the command line, or line by line from
//! stdin, and prints what the calculator shows.
//!
//! ## Usage
//!
//! ```bash
//! signal-calc 4 + 6 =                # prints 10
//! signal-calc --json 12 × 3 =        # prints the full state as JSON
//! echo "2 M+ 5 M- MR" | signal-calc  # one result line per input line
//! signal-calc 12 + 3 long:⌫          # long press on backspace clears input
//! ```

#![deny(missing_docs)]

pub mod error;

pub use error::{CliError, CliResult};

use clap::Parser;
use signal_calc::feedback::NoFeedback;
use signal_calc::keypad::{press, KeypadAction, Press};
use signal_calc::{Calculator, EngineConfig};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Prefix that turns a key into a long press
pub const LONG_PRESS_PREFIX: &str = "long:";

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "signal-calc", version, about = "Keypad calculator for the terminal")]
pub struct Cli {
    /// Engine configuration file (JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of history entries to keep (overrides the config file)
    #[arg(long)]
    pub history_limit: Option<usize>,

    /// Print the full calculator state as JSON
    #[arg(long)]
    pub json: bool,

    /// Print the history after the result
    #[arg(long)]
    pub history: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Keys to press, e.g. `4 + 6 =`; reads stdin when omitted
    #[arg(allow_hyphen_values = true)]
    pub keys: Vec<String>,
}

/// One key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    /// The key
    pub action: KeypadAction,
    /// Tap or long press
    pub how: Press,
}

impl KeyPress {
    /// A tap on `action`
    #[must_use]
    pub const fn tap(action: KeypadAction) -> Self {
        Self {
            action,
            how: Press::Tap,
        }
    }
}

/// Installs the stderr log subscriber
///
/// `RUST_LOG` controls the filter unless `verbose` forces debug output.
pub fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // A subscriber may already be installed (tests); keep the existing one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Builds the engine configuration from the config file and flags
pub fn load_config(cli: &Cli) -> CliResult<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| CliError::config(format!("{}: {e}", path.display())))?;
            EngineConfig::from_json(&text)?
        }
        None => EngineConfig::default(),
    };
    if let Some(limit) = cli.history_limit {
        config = config.with_history_limit(limit);
    }
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

/// Parses whitespace-separated key labels
///
/// A run of digits such as `125` expands to one tap per digit, and a
/// `long:` prefix turns a key into a long press.
pub fn parse_keys<S: AsRef<str>>(words: &[S]) -> CliResult<Vec<KeyPress>> {
    let mut presses = Vec::new();
    for word in words.iter().flat_map(|w| w.as_ref().split_whitespace()) {
        if let Some(label) = word.strip_prefix(LONG_PRESS_PREFIX) {
            let action =
                KeypadAction::from_label(label).ok_or_else(|| CliError::unknown_key(word))?;
            presses.push(KeyPress {
                action,
                how: Press::LongPress,
            });
        } else if let Some(action) = KeypadAction::from_label(word) {
            presses.push(KeyPress::tap(action));
        } else if word.chars().all(|c| c.is_ascii_digit() || c == '.') {
            for c in word.chars() {
                let label = c.to_string();
                let action =
                    KeypadAction::from_label(&label).ok_or_else(|| CliError::unknown_key(word))?;
                presses.push(KeyPress::tap(action));
            }
        } else {
            return Err(CliError::unknown_key(word));
        }
    }
    Ok(presses)
}

/// Presses each key in order; returns how many keys ran an action
pub fn apply_keys(calc: &mut Calculator, presses: &[KeyPress]) -> usize {
    presses
        .iter()
        .filter(|p| press(calc, p.action, p.how, &mut NoFeedback))
        .count()
}

/// Renders what the calculator shows
pub fn render(calc: &Calculator, cli: &Cli) -> CliResult<String> {
    if cli.json {
        return Ok(serde_json::to_string_pretty(&calc.state().snapshot())?);
    }
    let mut out = calc.state().shown_text().to_string();
    if cli.history && !calc.history().is_empty() {
        out.push('\n');
        out.push_str(&calc.history().export_formatted());
    }
    Ok(out)
}

/// Runs the CLI against the given input and output streams
pub fn run_with<R: BufRead, W: Write>(cli: &Cli, input: R, mut output: W) -> CliResult<()> {
    let config = load_config(cli)?;
    let mut calc = Calculator::with_config(&config);

    if !cli.keys.is_empty() {
        let presses = parse_keys(&cli.keys)?;
        apply_keys(&mut calc, &presses);
        writeln!(output, "{}", render(&calc, cli)?)?;
        return Ok(());
    }

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_keys(&[line.as_str()]) {
            Ok(presses) => {
                apply_keys(&mut calc, &presses);
                writeln!(output, "{}", render(&calc, cli)?)?;
            }
            Err(err @ CliError::UnknownKey { .. }) => {
                tracing::warn!(%err, "skipping line");
                writeln!(output, "{err}")?;
            }
            Err(err) => return Err(err),
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("signal-calc").chain(args.iter().copied()))
    }

    fn run_to_string(cli: &Cli, input: &str) -> String {
        let mut out = Vec::new();
        run_with(cli, input.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_keys_labels() {
        let presses = parse_keys(&["4", "×", "(", "M+", "="]).unwrap();
        let actions: Vec<_> = presses.iter().map(|p| p.action.label()).collect();
        assert_eq!(actions, vec!["4", "×", "(", "M+", "="]);
    }

    #[test]
    fn test_parse_keys_expands_numbers() {
        let presses = parse_keys(&["12.5"]).unwrap();
        assert_eq!(
            presses,
            vec![
                KeyPress::tap(KeypadAction::Digit(1)),
                KeyPress::tap(KeypadAction::Digit(2)),
                KeyPress::tap(KeypadAction::Decimal),
                KeyPress::tap(KeypadAction::Digit(5)),
            ]
        );
    }

    #[test]
    fn test_parse_keys_long_press() {
        let presses = parse_keys(&["long:⌫"]).unwrap();
        assert_eq!(presses[0].how, Press::LongPress);
        assert_eq!(presses[0].action, KeypadAction::Backspace);
    }

    #[test]
    fn test_parse_keys_unknown() {
        assert!(matches!(
            parse_keys(&["sqrt"]),
            Err(CliError::UnknownKey { label }) if label == "sqrt"
        ));
        assert!(matches!(
            parse_keys(&["long:x"]),
            Err(CliError::UnknownKey { .. })
        ));
    }

    #[test]
    fn test_parse_keys_splits_whitespace() {
        let presses = parse_keys(&["4 + 6", "="]).unwrap();
        assert_eq!(presses.len(), 4);
    }

    #[test]
    fn test_apply_keys_counts_disabled_equals() {
        let mut calc = Calculator::new();
        let presses = parse_keys(&["3", "+", "="]).unwrap();
        assert_eq!(apply_keys(&mut calc, &presses), 2);
        assert_eq!(calc.tokens(), ["3", "+"]);
    }

    #[test]
    fn test_run_with_keys_prints_display() {
        let cli = cli(&["4", "+", "6", "="]);
        assert_eq!(run_to_string(&cli, ""), "10\n");
    }

    #[test]
    fn test_run_with_hyphen_keys() {
        let cli = cli(&["2", "M+", "5", "M-", "MR"]);
        assert_eq!(run_to_string(&cli, ""), "-23\n");
    }

    #[test]
    fn test_run_with_error_shows_message() {
        let cli = cli(&["5", "÷", "0", "="]);
        assert_eq!(run_to_string(&cli, ""), "Error\n");
    }

    #[test]
    fn test_run_with_stdin_lines() {
        let cli = cli(&[]);
        let out = run_to_string(&cli, "4 + 6 =\n\n× 2 =\nfoo\n");
        assert_eq!(out, "10\n20\nUnknown key: foo\n");
    }

    #[test]
    fn test_run_with_json() {
        let cli = cli(&["--json", "4", "+"]);
        let out = run_to_string(&cli, "");
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["tokens"], serde_json::json!(["4", "+"]));
        assert_eq!(value["can_evaluate"], false);
    }

    #[test]
    fn test_run_with_history() {
        let cli = cli(&["--history", "2", "×", "3", "="]);
        assert_eq!(run_to_string(&cli, ""), "6\n1. 2 × 3 = 6\n");
    }

    #[test]
    fn test_load_config_file_and_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calc.json");
        std::fs::write(&path, r#"{"history_limit": 9}"#).unwrap();

        let path_arg = path.to_str().unwrap();
        let config = load_config(&cli(&["--config", path_arg])).unwrap();
        assert_eq!(config.history_limit, 9);

        let config = load_config(&cli(&["--config", path_arg, "--history-limit", "2"])).unwrap();
        assert_eq!(config.history_limit, 2);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config(&cli(&["--config", "/nonexistent/calc.json"]));
        assert!(matches!(result, Err(CliError::Config { .. })));
    }

    #[test]
    fn test_load_config_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calc.json");
        std::fs::write(&path, "not json").unwrap();
        let result = load_config(&cli(&["--config", path.to_str().unwrap()]));
        assert!(matches!(result, Err(CliError::Json(_))));
    }
}
