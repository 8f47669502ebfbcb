use std::time::{Duration, Instant};

use tracing::{info, warn};

use super::{
    CoachCapability, LlmGateway, LlmGatewayError, LlmGatewayRequest, LlmGatewayResponse,
};

const PROVIDER_LABEL: &str = "groq";

#[derive(Debug, Clone)]
pub struct LlmTelemetryEvent {
    pub capability: &'static str,
    pub outcome: &'static str,
    pub latency_ms: u64,
    pub provider: &'static str,
    pub model: Option<String>,
    pub provider_request_id: Option<String>,
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
    pub total_tokens: Option<u32>,
    pub estimated_cost_usd: Option<f64>,
    pub error_type: Option<&'static str>,
}

impl LlmTelemetryEvent {
    pub fn log(&self) {
        match self.error_type {
            None => info!(
                capability = self.capability,
                outcome = self.outcome,
                latency_ms = self.latency_ms,
                provider = self.provider,
                model = self.model.as_deref().unwrap_or("unknown"),
                provider_request_id = self.provider_request_id.as_deref().unwrap_or(""),
                prompt_tokens = self.prompt_tokens,
                completion_tokens = self.completion_tokens,
                total_tokens = self.total_tokens,
                estimated_cost_usd = self.estimated_cost_usd,
                "llm request completed"
            ),
            Some(error_type) => warn!(
                capability = self.capability,
                outcome = self.outcome,
                latency_ms = self.latency_ms,
                provider = self.provider,
                error_type,
                "llm request failed"
            ),
        }
    }
}

pub async fn generate_with_telemetry(
    llm_gateway: &dyn LlmGateway,
    request: LlmGatewayRequest,
) -> (
    Result<LlmGatewayResponse, LlmGatewayError>,
    LlmTelemetryEvent,
) {
    let capability = request.capability;
    let started_at = Instant::now();
    let result = llm_gateway.generate(request).await;
    let telemetry = telemetry_for_result(capability, started_at.elapsed(), &result);
    (result, telemetry)
}

fn telemetry_for_result(
    capability: CoachCapability,
    latency: Duration,
    result: &Result<LlmGatewayResponse, LlmGatewayError>,
) -> LlmTelemetryEvent {
    let latency_ms = duration_to_millis(latency);
    match result {
        Ok(response) => {
            let usage = response.usage.clone().unwrap_or_default();
            let has_usage = response.usage.is_some();
            let estimated_cost_usd = if has_usage {
                estimate_cost_usd(
                    &response.model,
                    usage.prompt_tokens,
                    usage.completion_tokens,
                )
            } else {
                None
            };

            LlmTelemetryEvent {
                capability: capability.as_str(),
                outcome: "success",
                latency_ms,
                provider: PROVIDER_LABEL,
                model: Some(response.model.clone()),
                provider_request_id: response.provider_request_id.clone(),
                prompt_tokens: has_usage.then_some(usage.prompt_tokens),
                completion_tokens: has_usage.then_some(usage.completion_tokens),
                total_tokens: has_usage.then_some(usage.total_tokens),
                estimated_cost_usd,
                error_type: None,
            }
        }
        Err(err) => LlmTelemetryEvent {
            capability: capability.as_str(),
            outcome: "failure",
            latency_ms,
            provider: PROVIDER_LABEL,
            model: None,
            provider_request_id: None,
            prompt_tokens: None,
            completion_tokens: None,
            total_tokens: None,
            estimated_cost_usd: None,
            error_type: Some(error_type(err)),
        },
    }
}

fn duration_to_millis(duration: Duration) -> u64 {
    let millis = duration.as_millis();
    u64::try_from(millis).unwrap_or(u64::MAX)
}

fn error_type(error: &LlmGatewayError) -> &'static str {
    match error {
        LlmGatewayError::Timeout => "timeout",
        LlmGatewayError::ProviderFailure(_) => "provider_failure",
        LlmGatewayError::InvalidProviderPayload(_) => "invalid_provider_payload",
    }
}

fn estimate_cost_usd(model: &str, prompt_tokens: u32, completion_tokens: u32) -> Option<f64> {
    let pricing = pricing_for_model(model)?;
    let prompt = f64::from(prompt_tokens);
    let completion = f64::from(completion_tokens);
    let total = (prompt * pricing.input_per_million + completion * pricing.output_per_million)
        / 1_000_000.0;
    Some((total * 1_000_000.0).round() / 1_000_000.0)
}

#[derive(Debug, Clone, Copy)]
struct ModelPricing {
    input_per_million: f64,
    output_per_million: f64,
}

fn pricing_for_model(model: &str) -> Option<ModelPricing> {
    let normalized = model.trim().to_ascii_lowercase();
    if normalized.starts_with("llama-3.3-70b-versatile") {
        return Some(ModelPricing {
            input_per_million: 0.59,
            output_per_million: 0.79,
        });
    }

    if normalized.starts_with("llama-3.1-8b-instant") {
        return Some(ModelPricing {
            input_per_million: 0.05,
            output_per_million: 0.08,
        });
    }

    None
}
