mod cli;
mod io;

use coach_core::config::log_format_from_env;
use coach_core::llm::GroqGateway;
use coach_core::{
    CoachConfig, ConfigError, LogFormat, SurveyAnswers, SurveyError, WorkoutChatMessage,
    WorkoutPlan, answer_question_with_source, chat_greeting, export_file_name,
    generate_plan_with_source, load_dotenv, plan_to_text,
};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{CliError, Command, OutputFormat};
use io::{FileIoError, read_json, write_text};

const DEFAULT_LOG_FILTER: &str = "workout_coach=info,coach_core=info";

#[derive(Debug, Error)]
enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    File(#[from] FileIoError),
    #[error("invalid survey answers: {0}")]
    Survey(#[from] SurveyError),
    #[error("failed to encode plan as JSON: {0}")]
    EncodePlan(#[from] serde_json::Error),
}

#[tokio::main]
async fn main() {
    let command = match Command::parse(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(CliError::HelpRequested) => {
            print_usage();
            std::process::exit(0);
        }
        Err(err) => {
            eprintln!("error: {err}");
            eprintln!();
            print_usage();
            std::process::exit(2);
        }
    };

    if let Err(err) = load_dotenv() {
        eprintln!("error: {err}");
        std::process::exit(2);
    }

    let log_format = match log_format_from_env() {
        Ok(format) => format,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(2);
        }
    };
    init_tracing(log_format);

    if let Err(err) = run(command).await {
        eprintln!("error: {err}");
        std::process::exit(2);
    }
}

fn init_tracing(log_format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match log_format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn run(command: Command) -> Result<(), RunError> {
    match command {
        Command::Generate { answers, format } => {
            let answers = load_answers(&answers)?;
            let gateway = gateway_from_env()?;

            let generated = generate_plan_with_source(&gateway, &answers).await;
            info!(
                source = generated.source.as_str(),
                format = format.as_str(),
                days = generated.plan.weekly_schedule.len(),
                "workout plan ready"
            );

            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&generated.plan)?)
                }
                OutputFormat::Text => println!("{}", plan_to_text(&generated.plan)),
            }
        }
        Command::Ask {
            answers,
            plan,
            question,
            history,
        } => {
            let answers = load_answers(&answers)?;
            let plan = read_json::<WorkoutPlan>(&plan)?;
            let history = match history {
                Some(path) => read_json::<Vec<WorkoutChatMessage>>(&path)?,
                None => Vec::new(),
            };
            let gateway = gateway_from_env()?;

            if history.is_empty() {
                eprintln!("{}", chat_greeting(&plan));
            }

            let answer =
                answer_question_with_source(&gateway, &plan, &answers, &question, &history).await;
            info!(
                source = answer.source.as_str(),
                history_turns = history.len(),
                "workout chat answer ready"
            );
            println!("{}", answer.text);
        }
        Command::Export { plan, out_dir } => {
            let plan = read_json::<WorkoutPlan>(&plan)?;
            let path = write_text(
                &out_dir,
                &export_file_name(&plan.title),
                &plan_to_text(&plan),
            )?;
            info!(path = %path.display(), "exported workout plan");
            println!("{}", path.display());
        }
    }

    Ok(())
}

fn load_answers(path: &std::path::Path) -> Result<SurveyAnswers, RunError> {
    let answers = read_json::<SurveyAnswers>(path)?;
    answers.validate()?;
    Ok(answers)
}

fn gateway_from_env() -> Result<GroqGateway, RunError> {
    let config = CoachConfig::from_env()?;
    let timeout_ms = config.groq.timeout_ms;
    let gateway = GroqGateway::new(config.groq)?;
    info!(
        model = gateway.model(),
        timeout_ms = ?timeout_ms,
        "configured groq gateway"
    );
    Ok(gateway)
}

fn print_usage() {
    eprintln!(
        "Usage: workout-coach <command> [options]\n\
         \n\
         Commands:\n\
         - generate --answers <file> [--format json|text]\n\
         \x20   Generate a weekly plan from a survey-answers JSON file\n\
         - ask --answers <file> --plan <file> --question <text> [--history <file>]\n\
         \x20   Ask the coach a question about a saved plan\n\
         - export --plan <file> [--out <dir>]\n\
         \x20   Write a plan as a plain-text report\n\
         \n\
         Environment:\n\
         - GROQ_API_KEY               Required for generate and ask\n\
         - GROQ_CHAT_COMPLETIONS_URL  Override the chat-completions endpoint\n\
         - GROQ_MODEL                 Override the model name\n\
         - GROQ_TIMEOUT_MS            Optional request timeout\n\
         - LOG_FORMAT                 text (default) or json\n\
         \n\
         Options:\n\
         - --help            Show this help text"
    );
}
