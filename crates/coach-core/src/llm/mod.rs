pub mod contracts;
pub mod gateway;
pub mod groq;
pub mod observability;
pub mod prompts;
pub mod validation;

pub use contracts::{CoachCapability, OutputSource, plan_output_schema};
pub use gateway::{
    LlmGateway, LlmGatewayError, LlmGatewayFuture, LlmGatewayRequest, LlmGatewayResponse,
    LlmMessage, LlmTokenUsage, MessageRole,
};
pub use groq::{GroqGateway, GroqGatewayConfig};
pub use observability::{LlmTelemetryEvent, generate_with_telemetry};
pub use prompts::{
    PromptTemplate, plan_chat_user_prompt, plan_generation_prompt, profile_context,
    template_for_capability,
};
pub use validation::{
    PlanValidationError, ensure_plan_structure, parse_plan_output, strip_code_fences,
    validate_plan_value,
};
