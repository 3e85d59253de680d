use crate::{
    models::MetricsSnapshot,
    presets::{select_preset, SAVED_PROMPTS},
    server::{page, AppState, SessionHandle, SESSION_COOKIE},
    studio::{submit, SubmitOutcome},
};
use actix_web::{cookie::Cookie, http::header, web, HttpRequest, HttpResponse, HttpResponseBuilder};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct PromptForm {
    #[serde(default)]
    pub prompt: String,
}

#[derive(Serialize)]
struct GenerateResponse {
    image: String,
    seed: u32,
    latency: f64,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Serialize)]
struct SessionResponse<'a> {
    prompt: &'a str,
    metrics: MetricsSnapshot,
    gallery: Vec<&'a String>,
}

fn session_for(req: &HttpRequest, state: &AppState) -> SessionHandle {
    let cookie = req.cookie(SESSION_COOKIE);
    state
        .sessions
        .get_or_create(cookie.as_ref().map(|c| c.value()))
}

/// Starts a response, attaching the session cookie when the session is new.
fn respond(builder: &mut HttpResponseBuilder, handle: &SessionHandle) {
    if handle.is_new {
        builder.cookie(
            Cookie::build(SESSION_COOKIE, handle.id.clone())
                .path("/")
                .http_only(true)
                .finish(),
        );
    }
}

fn html(handle: &SessionHandle, body: String) -> HttpResponse {
    let mut builder = HttpResponse::Ok();
    respond(&mut builder, handle);
    builder.content_type("text/html; charset=utf-8").body(body)
}

pub async fn index(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    let handle = session_for(&req, &state);
    let session = handle.state.lock().await;
    let body = page::render(&session, None, None);
    drop(session);
    html(&handle, body)
}

pub async fn generate_form(
    req: HttpRequest,
    state: web::Data<AppState>,
    form: web::Form<PromptForm>,
) -> HttpResponse {
    let handle = session_for(&req, &state);
    let mut session = handle.state.lock().await;
    let outcome = submit(&mut session, state.generator.as_ref(), &form.prompt).await;
    let body = page::render(&session, Some(&outcome), Some(&form.prompt));
    drop(session);
    html(&handle, body)
}

pub async fn select_prompt(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<usize>,
) -> HttpResponse {
    let index = path.into_inner();
    let handle = session_for(&req, &state);
    let selected = select_preset(&mut *handle.state.lock().await, index);

    let mut builder = match selected {
        Some(_) => {
            let mut builder = HttpResponse::SeeOther();
            builder.insert_header((header::LOCATION, "/"));
            builder
        }
        None => HttpResponse::NotFound(),
    };
    respond(&mut builder, &handle);
    match selected {
        Some(_) => builder.finish(),
        None => builder.json(ErrorResponse {
            error: format!("No saved prompt #{}", index),
        }),
    }
}

pub async fn api_generate(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<PromptForm>,
) -> HttpResponse {
    let handle = session_for(&req, &state);
    let mut session = handle.state.lock().await;
    let outcome = submit(&mut session, state.generator.as_ref(), &body.prompt).await;
    drop(session);

    let mut builder = match &outcome {
        SubmitOutcome::Generated { .. } => HttpResponse::Ok(),
        SubmitOutcome::Warning(_) => HttpResponse::BadRequest(),
        SubmitOutcome::Failed(_) => HttpResponse::InternalServerError(),
    };
    respond(&mut builder, &handle);

    match outcome {
        SubmitOutcome::Generated {
            image_data,
            latency_seconds,
            seed,
        } => builder.json(GenerateResponse {
            image: image_data,
            seed,
            latency: latency_seconds,
        }),
        SubmitOutcome::Warning(error) | SubmitOutcome::Failed(error) => {
            builder.json(ErrorResponse { error })
        }
    }
}

pub async fn api_session(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    let handle = session_for(&req, &state);
    let session = handle.state.lock().await;
    let body = SessionResponse {
        prompt: session.selected_prompt(),
        metrics: session.metrics(),
        gallery: session.gallery_newest_first().collect(),
    };

    let mut builder = HttpResponse::Ok();
    respond(&mut builder, &handle);
    builder.json(body)
}

pub async fn api_prompts() -> HttpResponse {
    HttpResponse::Ok().json(SAVED_PROMPTS)
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"status": "ok"}))
}
