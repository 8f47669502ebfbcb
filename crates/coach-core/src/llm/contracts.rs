use schemars::schema_for;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::WorkoutPlan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoachCapability {
    PlanGeneration,
    PlanChat,
}

impl CoachCapability {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PlanGeneration => "plan_generation",
            Self::PlanChat => "plan_chat",
        }
    }
}

/// Where a pipeline result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputSource {
    ModelOutput,
    DeterministicFallback,
}

impl OutputSource {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ModelOutput => "model_output",
            Self::DeterministicFallback => "deterministic_fallback",
        }
    }
}

pub fn plan_output_schema() -> Value {
    serde_json::to_value(schema_for!(WorkoutPlan))
        .expect("workout plan schema should be serializable")
}
