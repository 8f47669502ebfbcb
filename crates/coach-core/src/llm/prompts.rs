use super::contracts::CoachCapability;
use crate::survey::SurveyAnswers;

pub const PLAN_GENERATION_TEMPERATURE: f64 = 0.7;
pub const PLAN_GENERATION_MAX_TOKENS: u32 = 2000;
pub const PLAN_CHAT_TEMPERATURE: f64 = 0.4;
pub const PLAN_CHAT_MAX_TOKENS: u32 = 800;

const PLAN_CHAT_SYSTEM_PROMPT: &str = "You are a dedicated workout coach for one specific user.

Your job:
- Answer questions ONLY using the user's workout plan and profile context.
- Be highly personalized: reference specific days, exercises, sets/reps/rest, and progression ideas from the given plan.
- Keep answers practical and concise (2-5 short paragraphs or bullet points).
- If asked for substitutions, keep the same training intent and equipment constraints.
- If nutrition/medical/injury advice is requested beyond scope, provide safe general guidance and recommend a professional when needed.

Never invent details that conflict with the plan.";

const PLAN_SHAPE_EXAMPLE: &str = r#"{
  "title": "Descriptive plan title",
  "description": "Brief overview of the plan",
  "weeklySchedule": [
    {
      "day": "Monday",
      "focus": "e.g., Upper Body Push",
      "exercises": [
        {
          "name": "Exercise name",
          "sets": "3-4",
          "reps": "8-12",
          "rest": "60-90s"
        }
      ],
      "notes": "Optional tips for the day"
    }
  ]
}"#;

#[derive(Debug, Clone)]
pub struct PromptTemplate {
    pub capability: CoachCapability,
    pub system_prompt: Option<&'static str>,
    pub temperature: f64,
    pub max_tokens: u32,
}

pub fn template_for_capability(capability: CoachCapability) -> PromptTemplate {
    match capability {
        // Plan generation is a single user turn with no system framing.
        CoachCapability::PlanGeneration => PromptTemplate {
            capability,
            system_prompt: None,
            temperature: PLAN_GENERATION_TEMPERATURE,
            max_tokens: PLAN_GENERATION_MAX_TOKENS,
        },
        CoachCapability::PlanChat => PromptTemplate {
            capability,
            system_prompt: Some(PLAN_CHAT_SYSTEM_PROMPT),
            temperature: PLAN_CHAT_TEMPERATURE,
            max_tokens: PLAN_CHAT_MAX_TOKENS,
        },
    }
}

pub fn plan_generation_prompt(answers: &SurveyAnswers) -> String {
    let mut preferences = format!(
        "Fitness Level: {}\nGoal: {}\nDays per Week: {}\nAvailable Equipment: {}\nWorkout Duration: {}",
        answers.fitness_level,
        answers.goal,
        answers.days_per_week,
        answers.equipment,
        answers.duration,
    );
    if !answers.preferred_days.is_empty() {
        let days = answers
            .preferred_days
            .iter()
            .map(|day| day.label())
            .collect::<Vec<_>>()
            .join(", ");
        preferences.push_str(&format!("\nPreferred Days: {days}"));
    }

    format!(
        "You are a professional fitness trainer. Create a detailed weekly workout plan based on these preferences:\n\n\
         {preferences}\n\n\
         Generate a comprehensive workout plan in JSON format with this exact structure:\n\
         {PLAN_SHAPE_EXAMPLE}\n\n\
         Include exactly {count} workout days ({label}). Make exercises specific to the equipment available and appropriate for the fitness level. \
         Include warm-up suggestions in notes where relevant. Return ONLY valid JSON, no markdown formatting.",
        count = answers.days_per_week.count(),
        label = answers.days_per_week,
    )
}

pub fn profile_context(answers: &SurveyAnswers) -> String {
    [
        format!("Fitness Level: {}", answers.fitness_level),
        format!("Primary Goal: {}", answers.goal),
        format!("Days Per Week: {}", answers.days_per_week),
        format!("Equipment: {}", answers.equipment),
        format!("Session Duration: {}", answers.duration),
    ]
    .join("\n")
}

pub fn plan_chat_user_prompt(answers: &SurveyAnswers, plan_json: &str, question: &str) -> String {
    let profile = profile_context(answers);
    [
        "USER PROFILE:",
        profile.as_str(),
        "",
        "WORKOUT PLAN JSON:",
        plan_json,
        "",
        "USER QUESTION:",
        question,
        "",
        "Respond as their personal coach and base your answer on this exact plan.",
    ]
    .join("\n")
}
