use jsonschema::JSONSchema;
use serde_json::Value;
use std::sync::LazyLock;
use thiserror::Error;

use super::contracts::plan_output_schema;
use crate::models::WorkoutPlan;

#[derive(Debug, Error)]
pub enum PlanValidationError {
    #[error("plan output is not valid json: {0}")]
    InvalidJson(#[source] serde_json::Error),
    #[error("plan schema failed to compile: {0}")]
    SchemaCompile(String),
    #[error("plan output failed schema validation: {errors:?}")]
    SchemaViolation { errors: Vec<String> },
    #[error("plan output could not be decoded: {0}")]
    Deserialize(#[source] serde_json::Error),
    #[error("plan has {actual} training days but {expected} were requested")]
    DayCountMismatch { expected: usize, actual: usize },
    #[error("exercise {exercise_index} on day {day_index} has an empty {field}")]
    EmptyExerciseField {
        day_index: usize,
        exercise_index: usize,
        field: &'static str,
    },
}

// Only strips when the trimmed text opens with a fence; every marker is then
// dropped wherever it appears.
pub fn strip_code_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("```json") {
        return trimmed
            .replace("```json\n", "")
            .replace("```json", "")
            .replace("```\n", "")
            .replace("```", "");
    }

    if trimmed.starts_with("```") {
        return trimmed.replace("```\n", "").replace("```", "");
    }

    trimmed.to_string()
}

pub fn parse_plan_output(raw: &str, expected_days: usize) -> Result<WorkoutPlan, PlanValidationError> {
    let cleaned = strip_code_fences(raw);
    let payload: Value = serde_json::from_str(&cleaned).map_err(PlanValidationError::InvalidJson)?;
    validate_plan_value(&payload, expected_days)
}

pub fn validate_plan_value(
    payload: &Value,
    expected_days: usize,
) -> Result<WorkoutPlan, PlanValidationError> {
    let validator = plan_validator()?;

    if let Err(validation_errors) = validator.validate(payload) {
        let errors = validation_errors
            .map(|err| err.to_string())
            .collect::<Vec<_>>();
        return Err(PlanValidationError::SchemaViolation { errors });
    }

    let plan: WorkoutPlan =
        serde_json::from_value(payload.clone()).map_err(PlanValidationError::Deserialize)?;
    ensure_plan_structure(&plan, expected_days)?;

    Ok(plan)
}

pub fn ensure_plan_structure(
    plan: &WorkoutPlan,
    expected_days: usize,
) -> Result<(), PlanValidationError> {
    let actual = plan.weekly_schedule.len();
    if actual != expected_days {
        return Err(PlanValidationError::DayCountMismatch {
            expected: expected_days,
            actual,
        });
    }

    for (day_index, day) in plan.weekly_schedule.iter().enumerate() {
        for (exercise_index, exercise) in day.exercises.iter().enumerate() {
            let empty_field = [
                ("name", exercise.name.as_str()),
                ("sets", exercise.sets.as_str()),
                ("reps", exercise.reps.as_str()),
            ]
            .into_iter()
            .find(|(_, value)| value.trim().is_empty());

            if let Some((field, _)) = empty_field {
                return Err(PlanValidationError::EmptyExerciseField {
                    day_index,
                    exercise_index,
                    field,
                });
            }
        }
    }

    Ok(())
}

static PLAN_VALIDATOR: LazyLock<Result<JSONSchema, String>> = LazyLock::new(|| {
    JSONSchema::compile(&plan_output_schema()).map_err(|err| err.to_string())
});

fn plan_validator() -> Result<&'static JSONSchema, PlanValidationError> {
    PLAN_VALIDATOR
        .as_ref()
        .map_err(|message| PlanValidationError::SchemaCompile(message.clone()))
}
