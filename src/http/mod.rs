//! HTTP surface: the WhatsApp gateway webhook, its verification probe and
//! a health check.
//!
//! The gateway treats anything other than `200` with a valid XML envelope as
//! a delivery failure, so every webhook response is `200 text/xml`, falling
//! back to a fixed apology when the message cannot be handled.

use std::sync::Arc;

use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Form, Json, Router};
use serde::Deserialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::conversation::templates::APOLOGY;
use crate::conversation::{ConversationEngine, InboundMessage};
use crate::domain::value_objects::CustomerId;
use crate::IntakeError;

pub const WEBHOOK_PATH: &str = "/webhook/whatsapp";

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ConversationEngine>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "oxiva-whatsapp"})) }))
        .route(WEBHOOK_PATH, get(verify).post(webhook))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Form fields posted by the gateway. Everything else it sends is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct WebhookForm {
    #[serde(rename = "From")]
    pub from: Option<String>,
    #[serde(rename = "Body")]
    pub body: Option<String>,
    #[serde(rename = "ProfileName")]
    pub profile_name: Option<String>,
}

impl WebhookForm {
    fn into_message(self) -> Result<InboundMessage, IntakeError> {
        let from = self.from.ok_or(IntakeError::MissingField("From"))?;
        let customer_id = CustomerId::new(from).map_err(|_| IntakeError::MissingField("From"))?;
        let body = self.body.ok_or(IntakeError::MissingField("Body"))?;
        Ok(InboundMessage { customer_id, body, profile_name: self.profile_name })
    }
}

async fn webhook(State(s): State<AppState>, form: Result<Form<WebhookForm>, FormRejection>) -> Response {
    let form = match form {
        Ok(Form(form)) => form,
        Err(e) => {
            tracing::warn!(error = %e, "unreadable webhook payload");
            return xml_reply(APOLOGY);
        }
    };
    let message = match form.into_message() {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!(error = %e, "malformed webhook payload");
            return xml_reply(APOLOGY);
        }
    };
    let customer = message.customer_id.clone();
    match s.engine.handle(message).await {
        Ok(outcome) => xml_reply(&outcome.text),
        Err(e) => {
            tracing::error!(customer = %customer, error = %e, "failed to handle WhatsApp message");
            xml_reply(APOLOGY)
        }
    }
}

async fn verify() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "WhatsApp webhook is active",
        "instructions": format!("Configure your WhatsApp gateway to POST incoming messages (form-encoded From, Body, ProfileName) to {WEBHOOK_PATH}"),
    }))
}

/// Wraps `text` in the gateway's reply envelope. Characters XML 1.0 does not
/// allow are dropped, since customer text is echoed back in summaries.
pub fn message_envelope(text: &str) -> String {
    let text: String = text.chars().filter(|&c| is_xml_char(c)).collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<Response>\n  <Message>{}</Message>\n</Response>",
        quick_xml::escape::escape(&text)
    )
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..=char::MAX)
}

fn xml_reply(text: &str) -> Response {
    (StatusCode::OK, [(header::CONTENT_TYPE, "text/xml")], message_envelope(text)).into_response()
}
