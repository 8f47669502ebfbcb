pub mod chat;
pub mod config;
pub mod export;
pub mod generator;
pub mod llm;
pub mod models;
pub mod survey;

pub use chat::{
    ChatAnswer, ChatError, MAX_HISTORY_MESSAGES, answer_question, answer_question_with_source,
    build_chat_request, chat_greeting, fallback_answer,
};
pub use config::{CoachConfig, ConfigError, LogFormat, load_dotenv};
pub use export::{export_file_name, plan_to_text};
pub use generator::{
    GeneratedPlan, PlanGenerationError, fallback_plan, generate_plan, generate_plan_with_source,
};
pub use models::{ChatRole, DayPlan, Exercise, WorkoutChatMessage, WorkoutPlan};
pub use survey::{
    DaysPerWeek, Equipment, FitnessGoal, FitnessLevel, SessionDuration, SurveyAnswers,
    SurveyError, Weekday,
};
