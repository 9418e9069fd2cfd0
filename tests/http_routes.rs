use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use symptom_scribe::clients::{ModelError, SymptomModel, ToolCall};
use symptom_scribe::config::Config;
use symptom_scribe::http::{HttpState, router};
use symptom_scribe::render::{
    EMPTY_INPUT_WARNING, FAILED_MESSAGE, NO_SYMPTOMS_MESSAGE, PROCESSING_ERROR, RESULTS_HEADING,
};
use tower::ServiceExt;

enum Reply {
    Calls(Vec<ToolCall>),
    Fail,
}

struct FakeModel {
    reply: Reply,
    calls: AtomicUsize,
}

#[async_trait]
impl SymptomModel for FakeModel {
    async fn extract(&self, _input: &str) -> Result<Vec<ToolCall>, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Reply::Calls(calls) => Ok(calls.clone()),
            Reply::Fail => Err(ModelError::Api {
                status: 500,
                body: "upstream exploded".to_string(),
            }),
        }
    }
}

fn symptom(names: &[&str], severity: &str) -> ToolCall {
    ToolCall {
        name: "Symptom".to_string(),
        args: json!({
            "names": names,
            "description": "reported on the phone",
            "duration": "4 days",
            "severity": severity,
            "notes": "no medication taken"
        }),
    }
}

fn build_app(reply: Reply) -> (Router, Arc<FakeModel>) {
    let model = Arc::new(FakeModel {
        reply,
        calls: AtomicUsize::new(0),
    });
    let state = HttpState {
        config: Arc::new(Config::default()),
        model: model.clone(),
    };
    (router(state), model)
}

fn form_post(input: &str) -> Request<Body> {
    let body = serde_urlencoded::to_string(&[("input", input)]).unwrap();
    Request::builder()
        .method("POST")
        .uri("/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

fn json_post(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/extract")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_string(resp: axum::response::Response) -> String {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn health_is_ok() {
    let (app, _) = build_app(Reply::Calls(vec![]));
    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_string(resp).await, "ok");
}

#[tokio::test]
async fn info_does_not_expose_the_key() {
    let (app, _) = build_app(Reply::Calls(vec![]));
    let req = Request::builder().uri("/info").body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_string(resp).await).unwrap();
    assert_eq!(body["model"]["name"], "gpt-3.5-turbo");
    assert!(body.to_string().find("api_key").is_none());
}

#[tokio::test]
async fn index_serves_the_form() {
    let (app, model) = build_app(Reply::Calls(vec![]));
    let req = Request::builder().uri("/").body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let page = body_string(resp).await;
    assert!(page.contains("<form method=\"post\""));
    assert!(page.contains("Process Symptoms"));
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn blank_form_warns_without_calling_the_model() {
    let (app, model) = build_app(Reply::Calls(vec![symptom(&["cough"], "mild")]));
    let resp = app.oneshot(form_post("   ")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let page = body_string(resp).await;
    assert!(page.contains(EMPTY_INPUT_WARNING));
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn form_renders_each_symptom_in_order() {
    let (app, model) = build_app(Reply::Calls(vec![
        symptom(&["headache", "light sensitivity"], "severe"),
        symptom(&["nausea"], "moderate"),
    ]));
    let resp = app
        .oneshot(form_post("Terrible headache and I feel sick"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let page = body_string(resp).await;

    assert!(page.contains(RESULTS_HEADING));
    assert_eq!(page.matches("<section class=\"symptom\">").count(), 2);
    let first = page.find("headache, light sensitivity").unwrap();
    let second = page.find("<strong>Symptom Names:</strong> nausea").unwrap();
    assert!(first < second);
    assert!(page.contains("Terrible headache and I feel sick</textarea>"));
    assert_eq!(model.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn form_reports_no_symptoms() {
    let (app, _) = build_app(Reply::Calls(vec![]));
    let page = body_string(app.oneshot(form_post("How is the weather")).await.unwrap()).await;
    assert!(page.contains(NO_SYMPTOMS_MESSAGE));
    assert!(!page.contains(RESULTS_HEADING));
}

#[tokio::test]
async fn form_reports_missing_field() {
    let mut broken = symptom(&["fever"], "high");
    broken.args.as_object_mut().unwrap().remove("severity");
    let (app, _) = build_app(Reply::Calls(vec![broken]));
    let page = body_string(app.oneshot(form_post("fever")).await.unwrap()).await;
    assert!(page.contains("missing key &#39;severity&#39;"));
}

#[tokio::test]
async fn form_shows_non_string_values_as_written() {
    let call = ToolCall {
        name: "Symptom".to_string(),
        args: json!({
            "names": ["migraine"],
            "description": "throbbing on the left side",
            "duration": "2 days",
            "severity": 7,
            "notes": null
        }),
    };
    let (app, _) = build_app(Reply::Calls(vec![call]));
    let page = body_string(app.oneshot(form_post("migraine, 7 out of 10")).await.unwrap()).await;
    assert!(page.contains(RESULTS_HEADING));
    assert!(page.contains("<strong>Severity:</strong> 7</p>"));
    assert!(page.contains("<strong>Notes:</strong> </p>"));
    assert!(!page.contains("missing key"));
}

#[tokio::test]
async fn form_keeps_a_leading_newline_in_the_input() {
    let (app, _) = build_app(Reply::Calls(vec![]));
    let page = body_string(app.oneshot(form_post("\nfever since Monday")).await.unwrap()).await;
    assert!(page.contains("name=\"input\">\n\nfever since Monday</textarea>"));
}

#[tokio::test]
async fn form_reports_generic_error_on_model_failure() {
    let (app, _) = build_app(Reply::Fail);
    let page = body_string(app.oneshot(form_post("back pain")).await.unwrap()).await;
    assert!(page.contains(PROCESSING_ERROR));
    assert!(page.contains(FAILED_MESSAGE));
    assert!(!page.contains("upstream exploded"));
}

#[tokio::test]
async fn api_returns_tagged_outcomes() {
    let (app, _) = build_app(Reply::Calls(vec![symptom(&["rash"], "mild")]));
    let resp = app
        .oneshot(json_post(json!({ "input": "itchy rash on my arm" })))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_string(resp).await).unwrap();
    assert_eq!(body["status"], "symptoms");
    assert_eq!(body["symptoms"][0]["names"], json!(["rash"]));
    assert_eq!(body["symptoms"][0]["duration"], "4 days");
}

#[tokio::test]
async fn api_status_codes_follow_outcome() {
    let (app, model) = build_app(Reply::Calls(vec![]));
    let resp = app.oneshot(json_post(json!({ "input": "" }))).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);

    let (app, _) = build_app(Reply::Calls(vec![]));
    let resp = app.oneshot(json_post(json!({ "input": "hello" }))).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_string(resp).await).unwrap();
    assert_eq!(body, json!({ "status": "no_symptoms" }));

    let (app, _) = build_app(Reply::Fail);
    let resp = app.oneshot(json_post(json!({ "input": "hello" }))).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body: Value = serde_json::from_str(&body_string(resp).await).unwrap();
    assert_eq!(body["status"], "failed");
}
