//! Fulfillment webhook for the conversational platform.
//!
//! `POST {webhook.path}` accepts the platform's fulfillment request, resolves
//! the classified intent and topic parameter, and answers with one simple
//! response per reply segment.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use speakmark_core::{
    ApplicationError, Intent, IntentDispatcher, InterfaceError, Reply, RequestContext,
    RequestError,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Diagnostic switches handed to the webhook explicitly at construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Diagnostics {
    pub log_payloads: bool,
}

#[derive(Clone)]
pub struct WebhookState {
    dispatcher: Arc<IntentDispatcher>,
    topic_parameter: Arc<str>,
    diagnostics: Diagnostics,
}

impl WebhookState {
    pub fn new(
        dispatcher: Arc<IntentDispatcher>,
        topic_parameter: impl Into<Arc<str>>,
        diagnostics: Diagnostics,
    ) -> Self {
        Self { dispatcher, topic_parameter: topic_parameter.into(), diagnostics }
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRequest {
    #[serde(default)]
    pub response_id: Option<String>,
    #[serde(default)]
    pub session: Option<String>,
    #[serde(default)]
    pub query_result: Option<QueryResult>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    #[serde(default)]
    pub query_text: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub intent: Option<IntentRef>,
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentRef {
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    pub fulfillment_text: String,
    pub payload: ResponsePayload,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResponsePayload {
    pub google: GooglePayload,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GooglePayload {
    pub expect_user_response: bool,
    pub rich_response: RichResponse,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct RichResponse {
    pub items: Vec<RichResponseItem>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RichResponseItem {
    pub simple_response: SimpleResponse,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleResponse {
    pub text_to_speech: String,
}

#[derive(Debug, Serialize)]
pub struct WebhookError {
    pub error: &'static str,
    pub detail: String,
    pub correlation_id: String,
}

impl From<Reply> for WebhookResponse {
    fn from(reply: Reply) -> Self {
        let fulfillment_text = reply.segments.first().cloned().unwrap_or_default();
        let items = reply
            .segments
            .into_iter()
            .map(|segment| RichResponseItem {
                simple_response: SimpleResponse { text_to_speech: segment },
            })
            .collect();

        Self {
            fulfillment_text,
            payload: ResponsePayload {
                google: GooglePayload {
                    expect_user_response: reply.expect_user_response,
                    rich_response: RichResponse { items },
                },
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router(path: &str, state: WebhookState) -> Router {
    Router::new().route(path, post(fulfill)).with_state(state)
}

async fn fulfill(
    State(state): State<WebhookState>,
    payload: Result<Json<WebhookRequest>, JsonRejection>,
) -> Result<Json<WebhookResponse>, (StatusCode, Json<WebhookError>)> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            let correlation_id = Uuid::new_v4().to_string();
            let error = ApplicationError::from(RequestError::MalformedPayload(
                rejection.body_text(),
            ))
            .into_interface(correlation_id);
            return Err(interface_error(error));
        }
    };

    handle(&state, &request).map(Json).map_err(interface_error)
}

/// Runs one fulfillment request through the dispatcher.
pub fn handle(
    state: &WebhookState,
    request: &WebhookRequest,
) -> Result<WebhookResponse, InterfaceError> {
    let correlation_id = correlation_id(request);

    if state.diagnostics.log_payloads {
        debug!(
            event_name = "webhook.request.received",
            correlation_id = %correlation_id,
            session = request.session.as_deref().unwrap_or("unknown"),
            payload = %serde_json::to_string(request).unwrap_or_default(),
            "webhook request payload"
        );
    }

    let context = request_context(request, &state.topic_parameter)
        .map_err(|error| ApplicationError::from(error).into_interface(correlation_id.clone()))?;
    let (reply, outcome) = state.dispatcher.dispatch_with_outcome(&context);

    info!(
        event_name = "webhook.dispatch.completed",
        correlation_id = %correlation_id,
        intent = context.intent.display_name(),
        topic = context.topic.as_deref().unwrap_or("none"),
        outcome = ?outcome,
        segments = reply.segments.len(),
        "webhook request fulfilled"
    );

    let response = WebhookResponse::from(reply);
    if state.diagnostics.log_payloads {
        debug!(
            event_name = "webhook.response.sent",
            correlation_id = %correlation_id,
            payload = %serde_json::to_string(&response).unwrap_or_default(),
            "webhook response payload"
        );
    }

    Ok(response)
}

/// Extracts the intent and the configured topic parameter. Non-string
/// parameter values count as absent.
pub fn request_context(
    request: &WebhookRequest,
    topic_parameter: &str,
) -> Result<RequestContext, RequestError> {
    let query = request.query_result.as_ref().ok_or(RequestError::MissingIntent)?;

    let name = query
        .intent
        .as_ref()
        .and_then(|intent| intent.display_name.as_deref())
        .filter(|name| !name.trim().is_empty())
        .or(query.action.as_deref())
        .unwrap_or_default();
    let intent = name.parse::<Intent>()?;

    let context = RequestContext::new(intent);
    Ok(match query.parameters.get(topic_parameter).and_then(Value::as_str) {
        Some(topic) => context.with_topic(topic),
        None => context,
    })
}

fn correlation_id(request: &WebhookRequest) -> String {
    request
        .response_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

fn interface_error(error: InterfaceError) -> (StatusCode, Json<WebhookError>) {
    let status = match error {
        InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
    };

    warn!(
        event_name = "webhook.request.rejected",
        correlation_id = %error.correlation_id(),
        status = status.as_u16(),
        error = %error,
        "webhook request rejected"
    );

    let detail = match &error {
        InterfaceError::BadRequest { message, .. } => message.clone(),
    };

    (
        status,
        Json(WebhookError {
            error: error.user_message(),
            detail,
            correlation_id: error.correlation_id().to_string(),
        }),
    )
}
