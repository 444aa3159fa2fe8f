//! Command-line parsing for the interactive loop

use bmi_calculator_shared::{FormInput, HistoryLog, UnitSystem};
use std::str::FromStr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::presenter;
use crate::services::SessionService;

/// One line of user input
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `metric <cm> <kg>`
    Metric { height: String, weight: String },
    /// `imperial <ft> [in] <lbs>`
    Imperial {
        feet: String,
        inches: Option<String>,
        weight: String,
    },
    /// `units` toggles, `units <system>` selects
    Units(Option<UnitSystem>),
    Theme,
    History,
    Clear,
    Chart,
    Faq,
    Cancel,
    Help,
    Quit,
}

impl Command {
    /// Form submission carried by a calculate command
    ///
    /// Arguments stay raw; validation happens in the controller so bad
    /// numbers surface as an invalid-input notification.
    pub fn form(&self) -> Option<(UnitSystem, FormInput)> {
        match self {
            Command::Metric { height, weight } => {
                Some((UnitSystem::Metric, FormInput::metric(height.clone(), weight.clone())))
            }
            Command::Imperial { feet, inches, weight } => Some((
                UnitSystem::Imperial,
                FormInput::imperial(feet.clone(), inches.clone(), weight.clone()),
            )),
            _ => None,
        }
    }
}

fn usage(text: &str) -> AppError {
    AppError::InvalidCommand(format!("Usage: {}", text))
}

impl FromStr for Command {
    type Err = AppError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words
            .next()
            .ok_or_else(|| AppError::InvalidCommand("Empty command".to_string()))?
            .to_lowercase();
        let args: Vec<&str> = words.collect();

        let no_args = |command: Command| {
            if args.is_empty() {
                Ok(command)
            } else {
                Err(usage(&name))
            }
        };

        match name.as_str() {
            "metric" | "m" => match args.as_slice() {
                [height, weight] => Ok(Command::Metric {
                    height: height.to_string(),
                    weight: weight.to_string(),
                }),
                _ => Err(usage("metric <cm> <kg>")),
            },
            "imperial" | "i" => match args.as_slice() {
                [feet, weight] => Ok(Command::Imperial {
                    feet: feet.to_string(),
                    inches: None,
                    weight: weight.to_string(),
                }),
                [feet, inches, weight] => Ok(Command::Imperial {
                    feet: feet.to_string(),
                    inches: Some(inches.to_string()),
                    weight: weight.to_string(),
                }),
                _ => Err(usage("imperial <ft> [in] <lbs>")),
            },
            "units" | "u" => match args.as_slice() {
                [] => Ok(Command::Units(None)),
                [system] => system
                    .parse::<UnitSystem>()
                    .map(|s| Command::Units(Some(s)))
                    .map_err(AppError::InvalidCommand),
                _ => Err(usage("units [metric|imperial]")),
            },
            "theme" | "dark" => no_args(Command::Theme),
            "history" => no_args(Command::History),
            "clear" => no_args(Command::Clear),
            "chart" => no_args(Command::Chart),
            "faq" => no_args(Command::Faq),
            "cancel" => no_args(Command::Cancel),
            "help" | "?" => no_args(Command::Help),
            "quit" | "exit" | "q" => no_args(Command::Quit),
            other => Err(AppError::InvalidCommand(format!("Unknown command '{}'", other))),
        }
    }
}

/// What the loop should do after a command
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Print this text
    Print(String),
    /// Nothing to print; the presenter picks up the new snapshot
    Silent,
    Quit,
}

/// Run one command against the session
pub async fn execute(session: &mut SessionService, command: Command) -> AppResult<Reply> {
    if let Some((unit_system, form)) = command.form() {
        session.submit(Some(unit_system), form).await?;
        return Ok(Reply::Silent);
    }

    let reply = match command {
        Command::Units(Some(unit_system)) => {
            session.set_unit_system(unit_system).await;
            Reply::Silent
        }
        Command::Units(None) => {
            session.toggle_unit_system().await;
            Reply::Silent
        }
        Command::Theme => {
            session.toggle_theme().await;
            Reply::Silent
        }
        Command::History => {
            let snapshot = session.snapshot();
            if snapshot.history.is_empty() {
                Reply::Print("No calculations yet.".to_string())
            } else {
                let log = HistoryLog::from_entries(snapshot.history.clone());
                let recent = session.state().config().display.recent_entries;
                Reply::Print(presenter::render_history(&log, recent))
            }
        }
        Command::Clear => {
            session.clear_history().await;
            Reply::Silent
        }
        Command::Chart => Reply::Print(presenter::render_chart_for(&session.snapshot())),
        Command::Faq => Reply::Print(presenter::render_faq()),
        Command::Cancel => {
            session.cancel().await?;
            Reply::Silent
        }
        Command::Help => Reply::Print(presenter::render_help(session.snapshot().unit_system)),
        Command::Quit => Reply::Quit,
        Command::Metric { .. } | Command::Imperial { .. } => Reply::Silent,
    };

    debug!(?reply, "Command executed");
    Ok(reply)
}

/// Read commands from `input` until EOF or `quit`
///
/// Replies and error messages go to stdout. A calculation still pending
/// when input ends is allowed to finish, so piped input is computed and
/// saved.
pub async fn run<R>(session: &mut SessionService, input: R) -> AppResult<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let outcome = match line.parse::<Command>() {
            Ok(command) => execute(session, command).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(Reply::Print(text)) => println!("{}", text),
            Ok(Reply::Silent) => {}
            Ok(Reply::Quit) => break,
            Err(e) => println!("{}", e.user_message()),
        }
    }

    if session.snapshot().calculating {
        debug!("Input ended with a calculation pending, waiting for it");
    }
    session.wait_idle().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("theme", Command::Theme)]
    #[case("HISTORY", Command::History)]
    #[case("  clear  ", Command::Clear)]
    #[case("chart", Command::Chart)]
    #[case("faq", Command::Faq)]
    #[case("cancel", Command::Cancel)]
    #[case("?", Command::Help)]
    #[case("exit", Command::Quit)]
    #[case("units", Command::Units(None))]
    #[case("units imperial", Command::Units(Some(UnitSystem::Imperial)))]
    fn test_simple_commands(#[case] line: &str, #[case] expected: Command) {
        assert_eq!(line.parse::<Command>().unwrap(), expected);
    }

    #[test]
    fn test_metric_keeps_raw_arguments() {
        let command: Command = "metric 175 abc".parse().unwrap();
        let (system, form) = command.form().unwrap();
        assert_eq!(system, UnitSystem::Metric);
        assert_eq!(form.height, "175");
        assert_eq!(form.weight, "abc");
    }

    #[rstest]
    #[case("imperial 5 154", None)]
    #[case("imperial 5 7 154", Some("7"))]
    fn test_imperial_optional_inches(#[case] line: &str, #[case] inches: Option<&str>) {
        let (system, form) = line.parse::<Command>().unwrap().form().unwrap();
        assert_eq!(system, UnitSystem::Imperial);
        assert_eq!(form.feet, "5");
        assert_eq!(form.inches.as_deref(), inches);
        assert_eq!(form.weight, "154");
    }

    #[rstest]
    #[case("")]
    #[case("bogus")]
    #[case("metric 175")]
    #[case("imperial 5 7 1 154")]
    #[case("units kelvin")]
    #[case("theme now")]
    fn test_invalid_commands(#[case] line: &str) {
        let err = line.parse::<Command>().unwrap_err();
        assert!(matches!(err, AppError::InvalidCommand(_)));
    }

    #[test]
    fn test_non_calculate_commands_carry_no_form() {
        assert!(Command::Theme.form().is_none());
    }
}
