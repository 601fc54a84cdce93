use actix_web::{web, HttpResponse, Responder};
use log::{error, info, warn};
use serde_json::json;
use tera::Context;

use crate::conversation::reply;
use crate::error::ApiError;
use crate::notify::Inquiry;
use crate::web::models::{ChatRequest, ChatResponse, ContactRequest, ContactResponse};
use crate::AppState;

// Index page handler
pub async fn index(data: web::Data<AppState>) -> impl Responder {
    let mut context = Context::new();
    context.insert("booking_url", &data.site.booking_url);
    context.insert("public_email", &data.site.public_email);

    match data.tera.render("index.html", &context) {
        Ok(html) => HttpResponse::Ok().content_type("text/html").body(html),
        Err(e) => {
            error!("Template error: {}", e);
            HttpResponse::InternalServerError().body("Template error")
        }
    }
}

// Health check endpoint
pub async fn health_check(data: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "relay": data.dispatcher.is_configured(),
        "model": data.responder.is_configured(),
    }))
}

// Chat API endpoint
pub async fn chat(
    data: web::Data<AppState>,
    req: web::Json<ChatRequest>,
) -> Result<HttpResponse, ApiError> {
    let history = req.into_inner().into_history()?;
    info!("Chat request with {} messages", history.len());

    let answer = data.responder.respond(&history).await?;
    let text = answer.text();

    let unknown = reply::unknown_anchors(text);
    if !unknown.is_empty() {
        warn!("Model reply links to unknown sections: {:?}", unknown);
    }

    Ok(HttpResponse::Ok().json(ChatResponse {
        reply: text.to_string(),
        html: reply::to_html(text),
    }))
}

// Contact form endpoint
pub async fn contact(
    data: web::Data<AppState>,
    req: web::Json<ContactRequest>,
) -> Result<HttpResponse, ApiError> {
    let ContactRequest {
        name,
        email,
        subject,
        message,
    } = req.into_inner();
    let inquiry = Inquiry::new(name, email, subject, message)?;

    let result = data.dispatcher.dispatch(inquiry).await?;
    info!(
        "Contact form {} handled (delivered: {}, report: {:?})",
        result.reference, result.delivered, result.report
    );

    Ok(HttpResponse::Ok().json(ContactResponse {
        success: true,
        message: result.detail.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use actix_web::{http::StatusCode, test, App};
    use async_trait::async_trait;
    use serde_json::Value;
    use tera::Tera;

    use super::*;
    use crate::config::SiteConfig;
    use crate::conversation::{ContextWindow, Responder};
    use crate::error::{ModelError, RelayError};
    use crate::model::prompt::REDIRECT_REPLY;
    use crate::model::ChatModel;
    use crate::notify::mail::{MailComposer, RelayRoute};
    use crate::notify::relay::{OutgoingEmail, Relay};
    use crate::notify::{Dispatcher, PENDING_DETAIL, SENT_DETAIL};
    use crate::web::routes;

    struct StubModel {
        reply: Result<String, u16>,
        calls: Mutex<Vec<ContextWindow>>,
    }

    impl StubModel {
        fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn failing(status: u16) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(status),
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ChatModel for StubModel {
        fn name(&self) -> &str {
            "stub"
        }

        async fn generate(
            &self,
            _system: &str,
            window: &ContextWindow,
        ) -> Result<String, ModelError> {
            self.calls.lock().unwrap().push(window.clone());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(ModelError::Api {
                    status: *status,
                    body: "quota exceeded".into(),
                }),
            }
        }
    }

    #[derive(Default)]
    struct CountingRelay {
        sent: Mutex<Vec<OutgoingEmail>>,
        fail: bool,
    }

    impl Relay for CountingRelay {
        fn send(&self, email: &OutgoingEmail) -> Result<(), RelayError> {
            self.sent.lock().unwrap().push(email.clone());
            if self.fail {
                return Err(RelayError::Transport("connection refused".into()));
            }
            Ok(())
        }
    }

    fn state(model: Option<Arc<StubModel>>, relay: Option<Arc<CountingRelay>>) -> web::Data<AppState> {
        let site = SiteConfig::default();
        let route = RelayRoute {
            sender: "relay@example.com".into(),
            operator: "mida@example.com".into(),
        };
        let tera = Tera::new(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/**/*")).unwrap();

        web::Data::new(AppState {
            tera,
            site: site.clone(),
            responder: Responder::new(model.map(|m| m as Arc<dyn ChatModel>)),
            dispatcher: Dispatcher::new(
                relay.map(|r| (r as Arc<dyn Relay>, route)),
                MailComposer::new(site).unwrap(),
            ),
        })
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(App::new().app_data($state).configure(routes::configure)).await
        };
    }

    fn jane() -> Value {
        json!({
            "name": "Jane",
            "email": "jane@x.com",
            "subject": "Pricing",
            "message": "How much for email mgmt?"
        })
    }

    #[actix_web::test]
    async fn contact_with_relay_sends_two_emails() {
        let relay = Arc::new(CountingRelay::default());
        let app = app!(state(None, Some(relay.clone())));

        let req = test::TestRequest::post()
            .uri("/api/contact")
            .set_json(jane())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "success": true, "message": SENT_DETAIL }));
        assert_eq!(relay.sent.lock().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn contact_without_relay_is_pending_success() {
        let app = app!(state(None, None));

        let req = test::TestRequest::post()
            .uri("/api/contact")
            .set_json(jane())
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({ "success": true, "message": PENDING_DETAIL }));
    }

    #[actix_web::test]
    async fn contact_missing_field_is_rejected_before_sending() {
        let relay = Arc::new(CountingRelay::default());
        let app = app!(state(None, Some(relay.clone())));

        for field in ["name", "email", "subject", "message"] {
            let mut body = jane();
            body[field] = json!("");
            let req = test::TestRequest::post()
                .uri("/api/contact")
                .set_json(&body)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "field {field}");

            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body, json!({ "error": "All fields are required" }));
        }
        assert!(relay.sent.lock().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn contact_with_wrong_field_types_is_a_validation_error() {
        let app = app!(state(None, None));
        let req = test::TestRequest::post()
            .uri("/api/contact")
            .set_json(json!({ "name": 7, "email": [], "subject": "a", "message": "b" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn contact_relay_failure_reports_each_send() {
        let relay = Arc::new(CountingRelay {
            fail: true,
            ..Default::default()
        });
        let app = app!(state(None, Some(relay.clone())));

        let req = test::TestRequest::post()
            .uri("/api/contact")
            .set_json(jane())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body,
            json!({
                "error": "Failed to send message",
                "delivery": { "notification": "failed", "confirmation": "failed" }
            })
        );
        assert_eq!(relay.sent.lock().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn chat_without_model_returns_redirect() {
        let app = app!(state(None, None));

        let req = test::TestRequest::post()
            .uri("/api/chat")
            .set_json(json!({ "messages": [{ "role": "user", "content": "Hi" }] }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: ChatResponse = test::read_body_json(resp).await;
        assert_eq!(body.reply, REDIRECT_REPLY);
    }

    #[actix_web::test]
    async fn chat_first_turn_reaches_model_without_history() {
        let model = StubModel::replying("Check out her [portfolio](#portfolio)!");
        let app = app!(state(Some(model.clone()), None));

        let req = test::TestRequest::post()
            .uri("/api/chat")
            .set_json(json!({
                "messages": [
                    { "role": "assistant", "content": "Hi there! What would you like to know?" },
                    { "role": "user", "content": "Hi" }
                ]
            }))
            .to_request();
        let body: ChatResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.reply, "Check out her [portfolio](#portfolio)!");
        assert_eq!(
            body.html,
            "Check out her <a href=\"#portfolio\" class=\"chat-link\">portfolio</a>!"
        );

        let calls = model.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].prior.is_empty());
        assert_eq!(calls[0].live, "Hi");
    }

    #[actix_web::test]
    async fn chat_missing_messages_is_bad_request() {
        let model = StubModel::replying("unused");
        let app = app!(state(Some(model.clone()), None));

        for body in [json!({}), json!({ "messages": "Hi" })] {
            let req = test::TestRequest::post()
                .uri("/api/chat")
                .set_json(body)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body, json!({ "error": "Messages are required" }));
        }
        assert!(model.calls.lock().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn chat_invalid_json_is_bad_request() {
        let app = app!(state(None, None));
        let req = test::TestRequest::post()
            .uri("/api/chat")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "Messages are required" }));
    }

    #[actix_web::test]
    async fn chat_model_failure_is_generic_server_error() {
        let app = app!(state(Some(StubModel::failing(429)), None));

        let req = test::TestRequest::post()
            .uri("/api/chat")
            .set_json(json!({ "messages": [{ "role": "user", "content": "Hi" }] }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "Failed to generate response" }));
    }

    #[actix_web::test]
    async fn health_reports_configured_integrations() {
        let app = app!(state(Some(StubModel::replying("ok")), None));
        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({ "status": "ok", "relay": false, "model": true }));
    }

    #[actix_web::test]
    async fn index_renders_booking_link() {
        let app = app!(state(None, None));
        let req = test::TestRequest::get().uri("/").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = test::read_body(resp).await;
        let html = std::str::from_utf8(&body).unwrap();
        assert!(html.contains("https://calendly.com/your-link"));
        assert!(html.contains("id=\"contact\""));
        assert!(!html.contains("NAV_ANCHORS"));
    }
}
