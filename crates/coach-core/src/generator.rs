use thiserror::Error;
use tracing::{info, warn};

use crate::llm::{
    CoachCapability, LlmGateway, LlmGatewayError, LlmGatewayRequest, LlmMessage, OutputSource,
    PlanValidationError, generate_with_telemetry, parse_plan_output, plan_generation_prompt,
    template_for_capability,
};
use crate::models::{DayPlan, Exercise, WorkoutPlan};
use crate::survey::{SurveyAnswers, Weekday};

const FALLBACK_FOCUS_ROTATION: [&str; 5] = [
    "Upper Body Push",
    "Lower Body",
    "Upper Body Pull",
    "Full Body",
    "Core & Cardio",
];

#[derive(Debug, Error)]
pub enum PlanGenerationError {
    #[error(transparent)]
    Gateway(#[from] LlmGatewayError),
    #[error(transparent)]
    Validation(#[from] PlanValidationError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPlan {
    pub plan: WorkoutPlan,
    pub source: OutputSource,
}

/// Never fails: any provider or validation error yields [`fallback_plan`].
pub async fn generate_plan(llm_gateway: &dyn LlmGateway, answers: &SurveyAnswers) -> WorkoutPlan {
    generate_plan_with_source(llm_gateway, answers).await.plan
}

pub async fn generate_plan_with_source(
    llm_gateway: &dyn LlmGateway,
    answers: &SurveyAnswers,
) -> GeneratedPlan {
    match request_model_plan(llm_gateway, answers).await {
        Ok(plan) => {
            info!(
                days = plan.weekly_schedule.len(),
                "generated workout plan from model output"
            );
            GeneratedPlan {
                plan,
                source: OutputSource::ModelOutput,
            }
        }
        Err(err) => {
            warn!(
                error = %err,
                days_per_week = answers.days_per_week.label(),
                "workout plan generation failed; using deterministic fallback plan"
            );
            GeneratedPlan {
                plan: fallback_plan(answers),
                source: OutputSource::DeterministicFallback,
            }
        }
    }
}

pub fn plan_generation_request(answers: &SurveyAnswers) -> LlmGatewayRequest {
    LlmGatewayRequest::from_template(
        template_for_capability(CoachCapability::PlanGeneration),
        vec![LlmMessage::user(plan_generation_prompt(answers))],
    )
}

async fn request_model_plan(
    llm_gateway: &dyn LlmGateway,
    answers: &SurveyAnswers,
) -> Result<WorkoutPlan, PlanGenerationError> {
    let (result, telemetry) =
        generate_with_telemetry(llm_gateway, plan_generation_request(answers)).await;
    telemetry.log();

    let response = result?;
    let text = response.content.unwrap_or_default();
    let plan = parse_plan_output(&text, usize::from(answers.days_per_week.count()))?;

    Ok(plan)
}

/// Template plan used whenever the model cannot produce a valid one.
///
/// Pure function of the answers. Days always run Monday onward; preferred
/// weekdays are not consulted.
pub fn fallback_plan(answers: &SurveyAnswers) -> WorkoutPlan {
    let day_count = answers.days_per_week.count();
    let notes = format!(
        "Adjust intensity based on {} level. Focus on proper form.",
        answers.fitness_level
    );

    let weekly_schedule = Weekday::ALL
        .into_iter()
        .take(usize::from(day_count))
        .enumerate()
        .map(|(index, weekday)| DayPlan {
            day: weekday.label().to_string(),
            focus: FALLBACK_FOCUS_ROTATION[index % FALLBACK_FOCUS_ROTATION.len()].to_string(),
            exercises: fallback_exercises(),
            notes: Some(notes.clone()),
        })
        .collect();

    WorkoutPlan {
        title: format!("{day_count}-Day {} Plan", answers.goal),
        description: format!(
            "Personalized {} workout plan focusing on {} with {}.",
            answers.fitness_level,
            answers.goal.label().to_lowercase(),
            answers.equipment.label().to_lowercase(),
        ),
        weekly_schedule,
    }
}

fn fallback_exercises() -> Vec<Exercise> {
    vec![
        Exercise::new("Warm-up: 5-10 min cardio", "1", "5-10 min", Some("-")),
        Exercise::new("Push-ups", "3", "10-15", Some("60s")),
        Exercise::new("Squats", "3", "12-15", Some("60s")),
        Exercise::new("Plank", "3", "30-60s", Some("45s")),
    ]
}
