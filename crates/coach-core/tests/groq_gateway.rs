use std::collections::VecDeque;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use axum::routing::post;
use axum::{Json, Router};
use coach_core::llm::{
    CoachCapability, GroqGateway, GroqGatewayConfig, LlmGateway, LlmGatewayError,
    LlmGatewayRequest, LlmMessage, OutputSource, template_for_capability,
};
use coach_core::{
    DaysPerWeek, Equipment, FitnessGoal, FitnessLevel, SessionDuration, SurveyAnswers,
    generate_plan_with_source,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::{Mutex, oneshot};

#[derive(Debug, Clone)]
struct MockReply {
    status: StatusCode,
    body: Value,
}

#[derive(Debug, Clone)]
struct TestServerState {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    seen_payloads: Arc<Mutex<Vec<Value>>>,
    seen_auth_headers: Arc<Mutex<Vec<String>>>,
}

impl TestServerState {
    fn with_replies(replies: Vec<MockReply>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::from(replies))),
            seen_payloads: Arc::new(Mutex::new(Vec::new())),
            seen_auth_headers: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[tokio::test]
async fn sends_openai_compatible_request_and_reads_first_choice() {
    let state = TestServerState::with_replies(vec![MockReply {
        status: StatusCode::OK,
        body: success_response_body("llama-3.3-70b-versatile", json!("Keep rest at 90s.")),
    }]);
    let (url, shutdown_tx, server_task) = spawn_test_server(state.clone()).await;

    let gateway = GroqGateway::new(config_for(url)).expect("gateway should build");
    assert_eq!(gateway.model(), "test-model");
    let response = gateway
        .generate(chat_request())
        .await
        .expect("request should succeed");

    shutdown_tx.send(()).expect("shutdown signal should send");
    server_task.await.expect("server task should join");

    assert_eq!(response.model, "llama-3.3-70b-versatile");
    assert_eq!(response.provider_request_id.as_deref(), Some("req-success"));
    assert_eq!(response.content.as_deref(), Some("Keep rest at 90s."));
    assert_eq!(response.usage.map(|usage| usage.total_tokens), Some(20));

    let payloads = state.seen_payloads.lock().await.clone();
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0]["model"], "test-model");
    assert_eq!(payloads[0]["temperature"], 0.4);
    assert_eq!(payloads[0]["max_tokens"], 800);
    assert_eq!(payloads[0]["messages"][0]["role"], "system");
    assert_eq!(payloads[0]["messages"][1]["role"], "user");
    assert_eq!(payloads[0]["messages"][1]["content"], "How long should I rest?");

    let seen_auth_headers = state.seen_auth_headers.lock().await.clone();
    assert_eq!(seen_auth_headers, vec!["Bearer test-groq-key".to_string()]);
}

#[tokio::test]
async fn does_not_retry_transient_provider_failures() {
    let state = TestServerState::with_replies(vec![
        provider_error_reply(StatusCode::SERVICE_UNAVAILABLE, "overloaded"),
        MockReply {
            status: StatusCode::OK,
            body: success_response_body("llama-3.3-70b-versatile", json!("unused")),
        },
    ]);
    let (url, shutdown_tx, server_task) = spawn_test_server(state.clone()).await;

    let gateway = GroqGateway::new(config_for(url)).expect("gateway should build");
    let err = gateway
        .generate(chat_request())
        .await
        .expect_err("first failure should be returned");

    shutdown_tx.send(()).expect("shutdown signal should send");
    server_task.await.expect("server task should join");

    assert!(
        matches!(err, LlmGatewayError::ProviderFailure(ref message) if message == "status=503 code=overloaded"),
        "expected structured provider error, got {err:?}"
    );
    assert_eq!(state.seen_payloads.lock().await.len(), 1);
}

#[tokio::test]
async fn reports_unauthorized_credential_as_provider_failure() {
    let state = TestServerState::with_replies(vec![provider_error_reply(
        StatusCode::UNAUTHORIZED,
        "invalid_api_key",
    )]);
    let (url, shutdown_tx, server_task) = spawn_test_server(state.clone()).await;

    let gateway = GroqGateway::new(config_for(url)).expect("gateway should build");
    let err = gateway
        .generate(chat_request())
        .await
        .expect_err("unauthorized errors should fail");

    shutdown_tx.send(()).expect("shutdown signal should send");
    server_task.await.expect("server task should join");

    assert!(
        matches!(err, LlmGatewayError::ProviderFailure(ref message) if message.contains("status=401")),
        "expected unauthorized provider error, got {err:?}"
    );
}

#[tokio::test]
async fn rejects_response_without_choices() {
    let state = TestServerState::with_replies(vec![MockReply {
        status: StatusCode::OK,
        body: json!({ "id": "req-empty", "choices": [] }),
    }]);
    let (url, shutdown_tx, server_task) = spawn_test_server(state.clone()).await;

    let gateway = GroqGateway::new(config_for(url)).expect("gateway should build");
    let err = gateway
        .generate(chat_request())
        .await
        .expect_err("missing choices should fail");

    shutdown_tx.send(()).expect("shutdown signal should send");
    server_task.await.expect("server task should join");

    assert!(
        matches!(err, LlmGatewayError::InvalidProviderPayload(ref code) if code == "missing_choice"),
        "expected missing choice error, got {err:?}"
    );
}

#[tokio::test]
async fn null_content_is_returned_as_missing_content() {
    let state = TestServerState::with_replies(vec![MockReply {
        status: StatusCode::OK,
        body: success_response_body("llama-3.3-70b-versatile", Value::Null),
    }]);
    let (url, shutdown_tx, server_task) = spawn_test_server(state.clone()).await;

    let gateway = GroqGateway::new(config_for(url)).expect("gateway should build");
    let response = gateway
        .generate(chat_request())
        .await
        .expect("null content is still a well-formed completion");

    shutdown_tx.send(()).expect("shutdown signal should send");
    server_task.await.expect("server task should join");

    assert_eq!(response.content, None);
}

#[tokio::test]
async fn generator_parses_fenced_plan_from_provider() {
    let plan = json!({
        "title": "3-Day Fat Loss Circuit",
        "description": "Bodyweight circuits.",
        "weeklySchedule": [
            { "day": "Monday", "focus": "Full Body", "exercises": [{ "name": "Burpees", "sets": "3", "reps": "12" }] },
            { "day": "Wednesday", "focus": "Legs", "exercises": [{ "name": "Lunges", "sets": "3", "reps": "10", "rest": "45s" }] },
            { "day": "Friday", "focus": "Core", "exercises": [{ "name": "Plank", "sets": "3", "reps": "45s" }], "notes": "Breathe." }
        ]
    });
    let state = TestServerState::with_replies(vec![MockReply {
        status: StatusCode::OK,
        body: success_response_body(
            "llama-3.3-70b-versatile",
            Value::String(format!("```json\n{plan}\n```")),
        ),
    }]);
    let (url, shutdown_tx, server_task) = spawn_test_server(state.clone()).await;

    let gateway = GroqGateway::new(config_for(url)).expect("gateway should build");
    let generated = generate_plan_with_source(&gateway, &beginner_answers()).await;

    shutdown_tx.send(()).expect("shutdown signal should send");
    server_task.await.expect("server task should join");

    assert_eq!(generated.source, OutputSource::ModelOutput);
    assert_eq!(generated.plan.title, "3-Day Fat Loss Circuit");
    assert_eq!(generated.plan.weekly_schedule[2].notes.as_deref(), Some("Breathe."));

    let payloads = state.seen_payloads.lock().await.clone();
    assert_eq!(payloads[0]["temperature"], 0.7);
    assert_eq!(payloads[0]["max_tokens"], 2000);
    assert_eq!(payloads[0]["messages"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn generator_falls_back_when_provider_is_unreachable() {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let local_addr = listener
        .local_addr()
        .expect("listener address should resolve");
    drop(listener);

    let gateway = GroqGateway::new(config_for(format!(
        "http://{local_addr}/chat/completions"
    )))
    .expect("gateway should build");
    let generated = generate_plan_with_source(&gateway, &beginner_answers()).await;

    assert_eq!(generated.source, OutputSource::DeterministicFallback);
    assert_eq!(generated.plan.title, "3-Day Lose Weight Plan");
    let days = generated
        .plan
        .weekly_schedule
        .iter()
        .map(|day| day.day.as_str())
        .collect::<Vec<_>>();
    assert_eq!(days, ["Monday", "Tuesday", "Wednesday"]);
    let focuses = generated
        .plan
        .weekly_schedule
        .iter()
        .map(|day| day.focus.as_str())
        .collect::<Vec<_>>();
    assert_eq!(focuses, ["Upper Body Push", "Lower Body", "Upper Body Pull"]);
}

fn beginner_answers() -> SurveyAnswers {
    SurveyAnswers {
        fitness_level: FitnessLevel::Beginner,
        goal: FitnessGoal::LoseWeight,
        days_per_week: DaysPerWeek::from_label("3 days"),
        preferred_days: Vec::new(),
        equipment: Equipment::BodyweightOnly,
        duration: SessionDuration::ThirtyMinutes,
    }
}

fn chat_request() -> LlmGatewayRequest {
    LlmGatewayRequest::from_template(
        template_for_capability(CoachCapability::PlanChat),
        vec![LlmMessage::user("How long should I rest?")],
    )
}

fn config_for(chat_completions_url: String) -> GroqGatewayConfig {
    GroqGatewayConfig {
        chat_completions_url,
        api_key: "test-groq-key".to_string(),
        model: "test-model".to_string(),
        timeout_ms: Some(5_000),
    }
}

fn success_response_body(model: &str, content: Value) -> Value {
    json!({
        "id": "req-success",
        "model": model,
        "choices": [
            {
                "message": {
                    "role": "assistant",
                    "content": content
                }
            }
        ],
        "usage": {
            "prompt_tokens": 12,
            "completion_tokens": 8,
            "total_tokens": 20
        }
    })
}

fn provider_error_reply(status: StatusCode, code: &str) -> MockReply {
    MockReply {
        status,
        body: json!({
            "error": {
                "code": code
            }
        }),
    }
}

async fn spawn_test_server(
    state: TestServerState,
) -> (String, oneshot::Sender<()>, tokio::task::JoinHandle<()>) {
    let app = Router::new()
        .route("/chat/completions", post(test_chat_completions_handler))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let local_addr = listener
        .local_addr()
        .expect("listener address should resolve");
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let server_task = tokio::spawn(async move {
        let server = axum::serve(listener, app).with_graceful_shutdown(async move {
            let _ = shutdown_rx.await;
        });

        server.await.expect("test server should run");
    });

    (
        format!("http://{local_addr}/chat/completions"),
        shutdown_tx,
        server_task,
    )
}

async fn test_chat_completions_handler(
    State(state): State<TestServerState>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.seen_payloads.lock().await.push(payload);

    if let Some(value) = headers
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
    {
        state.seen_auth_headers.lock().await.push(value.to_string());
    }

    let reply = state.replies.lock().await.pop_front().unwrap_or(MockReply {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: json!({
            "error": {
                "code": "exhausted_test_replies"
            }
        }),
    });

    (reply.status, Json(reply.body))
}
