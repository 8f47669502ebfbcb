use thiserror::Error;
use tracing::{info, warn};

use crate::llm::{
    CoachCapability, LlmGateway, LlmGatewayError, LlmGatewayRequest, LlmMessage, OutputSource,
    generate_with_telemetry, plan_chat_user_prompt, template_for_capability,
};
use crate::models::{WorkoutChatMessage, WorkoutPlan};
use crate::survey::SurveyAnswers;

/// Number of prior turns forwarded to the model; older turns are dropped.
pub const MAX_HISTORY_MESSAGES: usize = 8;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("failed to serialize workout plan for chat context: {0}")]
    SerializePlan(#[from] serde_json::Error),
    #[error(transparent)]
    Gateway(#[from] LlmGatewayError),
    #[error("llm provider returned no answer content")]
    EmptyResponse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatAnswer {
    pub text: String,
    pub source: OutputSource,
}

/// Never fails: any error yields [`fallback_answer`].
pub async fn answer_question(
    llm_gateway: &dyn LlmGateway,
    plan: &WorkoutPlan,
    answers: &SurveyAnswers,
    question: &str,
    history: &[WorkoutChatMessage],
) -> String {
    answer_question_with_source(llm_gateway, plan, answers, question, history)
        .await
        .text
}

pub async fn answer_question_with_source(
    llm_gateway: &dyn LlmGateway,
    plan: &WorkoutPlan,
    answers: &SurveyAnswers,
    question: &str,
    history: &[WorkoutChatMessage],
) -> ChatAnswer {
    match request_model_answer(llm_gateway, plan, answers, question, history).await {
        Ok(text) => {
            info!(
                history_turns = history.len().min(MAX_HISTORY_MESSAGES),
                "answered workout plan question from model output"
            );
            ChatAnswer {
                text,
                source: OutputSource::ModelOutput,
            }
        }
        Err(err) => {
            warn!(error = %err, "workout chat failed; using fallback answer");
            ChatAnswer {
                text: fallback_answer(answers),
                source: OutputSource::DeterministicFallback,
            }
        }
    }
}

pub fn build_chat_request(
    plan: &WorkoutPlan,
    answers: &SurveyAnswers,
    question: &str,
    history: &[WorkoutChatMessage],
) -> Result<LlmGatewayRequest, ChatError> {
    let plan_json = serde_json::to_string(plan)?;

    let mut turns = recent_history(history)
        .iter()
        .map(LlmMessage::from)
        .collect::<Vec<_>>();
    turns.push(LlmMessage::user(plan_chat_user_prompt(
        answers, &plan_json, question,
    )));

    Ok(LlmGatewayRequest::from_template(
        template_for_capability(CoachCapability::PlanChat),
        turns,
    ))
}

pub fn recent_history(history: &[WorkoutChatMessage]) -> &[WorkoutChatMessage] {
    let start = history.len().saturating_sub(MAX_HISTORY_MESSAGES);
    &history[start..]
}

pub fn fallback_answer(answers: &SurveyAnswers) -> String {
    format!(
        "I can still help based on your plan. Since your goal is {} and you're training {}, \
         focus on progressive overload week to week and keep exercise form strict. \
         Ask me something specific like \"How should I progress Day 2?\" or \
         \"What can I swap for squats with my equipment?\".",
        answers.goal, answers.days_per_week,
    )
}

pub fn chat_greeting(plan: &WorkoutPlan) -> String {
    format!(
        "I’m your coach for \"{}\". Ask anything about this exact plan—progression, swaps, \
         scheduling, intensity, recovery, or form cues.",
        plan.title
    )
}

async fn request_model_answer(
    llm_gateway: &dyn LlmGateway,
    plan: &WorkoutPlan,
    answers: &SurveyAnswers,
    question: &str,
    history: &[WorkoutChatMessage],
) -> Result<String, ChatError> {
    let request = build_chat_request(plan, answers, question, history)?;
    let (result, telemetry) = generate_with_telemetry(llm_gateway, request).await;
    telemetry.log();

    let response = result?;
    let text = response
        .content
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .ok_or(ChatError::EmptyResponse)?;

    Ok(text.to_string())
}
