use actix_web::{cookie::Cookie, http::StatusCode, test, web, App};
use async_trait::async_trait;
use rcanvas::{
    presets::SAVED_PROMPTS,
    server::{configure, AppState, SESSION_COOKIE},
    BedrockClient, CanvasError, ImageGenerator, ModelInvoker, Result,
};
use serde_json::{json, Value};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;

const PNG_B64: &str = "iVBORw0KGgo=";

/// Stands in for Bedrock: answers every call with the same body or error.
struct FakeInvoker {
    fail_with: Option<String>,
    calls: AtomicUsize,
}

impl FakeInvoker {
    fn ok() -> Arc<Self> {
        Arc::new(Self {
            fail_with: None,
            calls: AtomicUsize::new(0),
        })
    }

    fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            fail_with: Some(message.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelInvoker for FakeInvoker {
    async fn invoke_model(&self, _model_id: &str, body: Vec<u8>) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let request: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(request["taskType"], "TEXT_IMAGE");

        match &self.fail_with {
            Some(message) => Err(CanvasError::AwsServiceError(message.clone())),
            None => Ok(json!({ "images": [PNG_B64] }).to_string().into_bytes()),
        }
    }
}

fn app_state(invoker: Arc<FakeInvoker>) -> web::Data<AppState> {
    let client = BedrockClient::with_invoker(invoker, "amazon.nova-canvas-v1:0");
    let generator: Arc<dyn ImageGenerator> = Arc::new(client.image().clone());
    web::Data::new(AppState::new(generator, 0.01, Duration::from_secs(3600)))
}

fn session_cookie<B>(resp: &actix_web::dev::ServiceResponse<B>) -> Cookie<'static> {
    resp.response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .expect("session cookie")
        .into_owned()
}

#[actix_web::test]
async fn test_health() {
    let app = test::init_service(
        App::new()
            .app_data(app_state(FakeInvoker::ok()))
            .configure(configure),
    )
    .await;
    let resp: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/health").to_request(),
    )
    .await;
    assert_eq!(resp, json!({"status": "ok"}));
}

#[actix_web::test]
async fn test_prompts_listing() {
    let app = test::init_service(
        App::new()
            .app_data(app_state(FakeInvoker::ok()))
            .configure(configure),
    )
    .await;
    let resp: Vec<String> = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/prompts").to_request(),
    )
    .await;
    assert_eq!(resp, SAVED_PROMPTS.to_vec());
}

#[actix_web::test]
async fn test_preset_then_generate() {
    let invoker = FakeInvoker::ok();
    let app = test::init_service(
        App::new()
            .app_data(app_state(invoker.clone()))
            .configure(configure),
    )
    .await;

    let resp =
        test::call_service(&app, test::TestRequest::post().uri("/prompts/0").to_request()).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get("location").unwrap(), "/");
    let cookie = session_cookie(&resp);

    let session: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/session").cookie(cookie.clone()).to_request(),
    )
    .await;
    assert_eq!(session["prompt"], "A futuristic city skyline at sunset");
    assert_eq!(session["metrics"]["total_cost"], "$0.00");
    assert_eq!(session["metrics"]["average_latency"], "-");
    assert_eq!(invoker.calls(), 0);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/generate")
            .cookie(cookie.clone())
            .set_json(json!({ "prompt": "A futuristic city skyline at sunset" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["image"], PNG_B64);
    assert!(body["seed"].as_u64().unwrap() <= 858_993_460);

    let session: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/session").cookie(cookie).to_request(),
    )
    .await;
    assert_eq!(session["gallery"], json!([PNG_B64]));
    assert_eq!(session["metrics"]["total_cost"], "$0.01");
    assert_eq!(session["metrics"]["images_generated"], 1);
    assert_eq!(invoker.calls(), 1);
}

#[actix_web::test]
async fn test_whitespace_prompt_is_a_bad_request() {
    let invoker = FakeInvoker::ok();
    let app = test::init_service(
        App::new()
            .app_data(app_state(invoker.clone()))
            .configure(configure),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/generate")
            .set_json(json!({ "prompt": "   " }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Please enter a prompt.");
    assert_eq!(invoker.calls(), 0);
}

#[actix_web::test]
async fn test_invocation_failure_surfaces_message() {
    let invoker = FakeInvoker::failing("Too many requests, please wait before trying again.");
    let app = test::init_service(
        App::new()
            .app_data(app_state(invoker.clone()))
            .configure(configure),
    )
    .await;

    let resp =
        test::call_service(&app, test::TestRequest::post().uri("/prompts/1").to_request()).await;
    let cookie = session_cookie(&resp);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/generate")
            .cookie(cookie.clone())
            .set_json(json!({ "prompt": "A koala" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Too many requests, please wait before trying again.");

    let session: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/session").cookie(cookie).to_request(),
    )
    .await;
    assert_eq!(session["prompt"], SAVED_PROMPTS[1]);
    assert_eq!(session["gallery"], json!([]));
    assert_eq!(session["metrics"]["total_cost"], "$0.00");
    assert_eq!(invoker.calls(), 1);
}

#[actix_web::test]
async fn test_html_flow() {
    let app = test::init_service(
        App::new()
            .app_data(app_state(FakeInvoker::ok()))
            .configure(configure),
    )
    .await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = session_cookie(&resp);
    let page = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(page.contains("No images generated yet."));

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/generate")
            .cookie(cookie.clone())
            .set_form([("prompt", "<b>bold</b> koala")])
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.response().cookies().next().is_none());
    let page = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(page.contains("Generated by Nova Canvas"));
    assert!(page.contains("&lt;b&gt;bold&lt;/b&gt; koala"));
    assert!(page.contains("<strong>$0.01</strong>"));

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/generate")
            .cookie(cookie)
            .set_form([("prompt", "")])
            .to_request(),
    )
    .await;
    let page = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(page.contains("Please enter a prompt."));
    assert!(page.contains("<strong>$0.01</strong>"));
}

#[actix_web::test]
async fn test_unknown_preset() {
    let app = test::init_service(
        App::new()
            .app_data(app_state(FakeInvoker::ok()))
            .configure(configure),
    )
    .await;
    let resp =
        test::call_service(&app, test::TestRequest::post().uri("/prompts/5").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_sessions_do_not_share_state() {
    let app = test::init_service(
        App::new()
            .app_data(app_state(FakeInvoker::ok()))
            .configure(configure),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/generate")
            .set_json(json!({ "prompt": "Abstract art" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let other: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/session").to_request(),
    )
    .await;
    assert_eq!(other["gallery"], json!([]));
    assert_eq!(other["metrics"]["total_cost"], "$0.00");
}
