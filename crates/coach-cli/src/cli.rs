use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Text,
}

impl OutputFormat {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "text",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Generate {
        answers: PathBuf,
        format: OutputFormat,
    },
    Ask {
        answers: PathBuf,
        plan: PathBuf,
        question: String,
        history: Option<PathBuf>,
    },
    Export {
        plan: PathBuf,
        out_dir: PathBuf,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("missing subcommand")]
    MissingCommand,
    #[error("unknown subcommand: {0}")]
    UnknownCommand(String),
    #[error("unknown argument: {0}")]
    UnknownArgument(String),
    #[error("missing value for argument: {0}")]
    MissingValue(String),
    #[error("missing required argument: {0}")]
    MissingArgument(&'static str),
    #[error("invalid --format value: {0}")]
    InvalidFormat(String),
    #[error("--question must not be empty")]
    EmptyQuestion,
    #[error("help requested")]
    HelpRequested,
}

impl Command {
    pub fn parse<I>(args: I) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut iter = args.into_iter();
        let command = iter.next().ok_or(CliError::MissingCommand)?;

        match command.as_str() {
            "--help" | "-h" | "help" => Err(CliError::HelpRequested),
            "generate" => parse_generate(iter),
            "ask" => parse_ask(iter),
            "export" => parse_export(iter),
            unknown => Err(CliError::UnknownCommand(unknown.to_string())),
        }
    }
}

fn parse_generate(mut iter: impl Iterator<Item = String>) -> Result<Command, CliError> {
    let mut answers = None;
    let mut format = OutputFormat::Json;

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => return Err(CliError::HelpRequested),
            "--answers" => answers = Some(PathBuf::from(next_value(&mut iter, &arg)?)),
            "--format" => format = parse_format(&next_value(&mut iter, &arg)?)?,
            unknown => return Err(CliError::UnknownArgument(unknown.to_string())),
        }
    }

    Ok(Command::Generate {
        answers: answers.ok_or(CliError::MissingArgument("--answers"))?,
        format,
    })
}

fn parse_ask(mut iter: impl Iterator<Item = String>) -> Result<Command, CliError> {
    let mut answers = None;
    let mut plan = None;
    let mut question = None;
    let mut history = None;

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => return Err(CliError::HelpRequested),
            "--answers" => answers = Some(PathBuf::from(next_value(&mut iter, &arg)?)),
            "--plan" => plan = Some(PathBuf::from(next_value(&mut iter, &arg)?)),
            "--question" => question = Some(next_value(&mut iter, &arg)?),
            "--history" => history = Some(PathBuf::from(next_value(&mut iter, &arg)?)),
            unknown => return Err(CliError::UnknownArgument(unknown.to_string())),
        }
    }

    let question = question.ok_or(CliError::MissingArgument("--question"))?;
    if question.trim().is_empty() {
        return Err(CliError::EmptyQuestion);
    }

    Ok(Command::Ask {
        answers: answers.ok_or(CliError::MissingArgument("--answers"))?,
        plan: plan.ok_or(CliError::MissingArgument("--plan"))?,
        question,
        history,
    })
}

fn parse_export(mut iter: impl Iterator<Item = String>) -> Result<Command, CliError> {
    let mut plan = None;
    let mut out_dir = PathBuf::from(".");

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => return Err(CliError::HelpRequested),
            "--plan" => plan = Some(PathBuf::from(next_value(&mut iter, &arg)?)),
            "--out" => out_dir = PathBuf::from(next_value(&mut iter, &arg)?),
            unknown => return Err(CliError::UnknownArgument(unknown.to_string())),
        }
    }

    Ok(Command::Export {
        plan: plan.ok_or(CliError::MissingArgument("--plan"))?,
        out_dir,
    })
}

fn next_value(iter: &mut impl Iterator<Item = String>, arg: &str) -> Result<String, CliError> {
    iter.next()
        .ok_or_else(|| CliError::MissingValue(arg.to_string()))
}

fn parse_format(value: &str) -> Result<OutputFormat, CliError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "json" => Ok(OutputFormat::Json),
        "text" => Ok(OutputFormat::Text),
        _ => Err(CliError::InvalidFormat(value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command, CliError> {
        Command::parse(args.iter().map(|arg| arg.to_string()))
    }

    #[test]
    fn parses_generate_with_default_json_format() {
        let command = parse(&["generate", "--answers", "survey.json"]).expect("parse");

        assert_eq!(
            command,
            Command::Generate {
                answers: PathBuf::from("survey.json"),
                format: OutputFormat::Json,
            }
        );
    }

    #[test]
    fn parses_generate_text_format_case_insensitively() {
        let command =
            parse(&["generate", "--format", "TEXT", "--answers", "a.json"]).expect("parse");

        assert!(matches!(
            command,
            Command::Generate {
                format: OutputFormat::Text,
                ..
            }
        ));
    }

    #[test]
    fn parses_ask_with_optional_history() {
        let command = parse(&[
            "ask",
            "--answers",
            "a.json",
            "--plan",
            "p.json",
            "--question",
            "Can I swap squats?",
            "--history",
            "h.json",
        ])
        .expect("parse");

        assert_eq!(
            command,
            Command::Ask {
                answers: PathBuf::from("a.json"),
                plan: PathBuf::from("p.json"),
                question: "Can I swap squats?".to_string(),
                history: Some(PathBuf::from("h.json")),
            }
        );
    }

    #[test]
    fn export_defaults_to_current_directory() {
        let command = parse(&["export", "--plan", "p.json"]).expect("parse");

        assert_eq!(
            command,
            Command::Export {
                plan: PathBuf::from("p.json"),
                out_dir: PathBuf::from("."),
            }
        );
    }

    #[test]
    fn reports_usage_errors() {
        assert!(matches!(parse(&[]), Err(CliError::MissingCommand)));
        assert!(matches!(parse(&["--help"]), Err(CliError::HelpRequested)));
        assert!(matches!(
            parse(&["generate", "--help"]),
            Err(CliError::HelpRequested)
        ));
        assert!(matches!(
            parse(&["train"]),
            Err(CliError::UnknownCommand(ref command)) if command == "train"
        ));
        assert!(matches!(
            parse(&["generate"]),
            Err(CliError::MissingArgument("--answers"))
        ));
        assert!(matches!(
            parse(&["generate", "--answers"]),
            Err(CliError::MissingValue(ref arg)) if arg == "--answers"
        ));
        assert!(matches!(
            parse(&["generate", "--answers", "a.json", "--format", "yaml"]),
            Err(CliError::InvalidFormat(ref value)) if value == "yaml"
        ));
        assert!(matches!(
            parse(&["export", "--plan", "p.json", "--verbose"]),
            Err(CliError::UnknownArgument(ref arg)) if arg == "--verbose"
        ));
    }

    #[test]
    fn ask_requires_a_non_empty_question() {
        assert!(matches!(
            parse(&["ask", "--answers", "a.json", "--plan", "p.json"]),
            Err(CliError::MissingArgument("--question"))
        ));
        assert!(matches!(
            parse(&[
                "ask",
                "--answers",
                "a.json",
                "--plan",
                "p.json",
                "--question",
                "   "
            ]),
            Err(CliError::EmptyQuestion)
        ));
    }
}
