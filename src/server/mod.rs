pub mod handlers;
pub mod page;

use crate::{config::Config, session::SessionState, studio::ImageGenerator};
use actix_web::{middleware, web, App, HttpServer};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tokio::sync::Mutex as AsyncMutex;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "rcanvas_session";

pub type SharedSession = Arc<AsyncMutex<SessionState>>;

struct SessionEntry {
    state: SharedSession,
    last_seen: Instant,
}

/// Live UI sessions keyed by the session cookie. Each session sits behind its
/// own async lock, held for the whole submit so one session never has two
/// requests in flight. Sessions idle for longer than `ttl` are dropped on the
/// next lookup.
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, SessionEntry>>,
    cost_per_image: f64,
    ttl: Duration,
}

pub struct SessionHandle {
    pub id: String,
    pub state: SharedSession,
    pub is_new: bool,
}

impl SessionRegistry {
    pub fn new(cost_per_image: f64, ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            cost_per_image,
            ttl,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, SessionEntry>> {
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Looks up `id`, or opens a fresh session when it is missing, unknown or
    /// expired.
    pub fn get_or_create(&self, id: Option<&str>) -> SessionHandle {
        let mut sessions = self.lock();
        let now = Instant::now();
        evict_idle(&mut sessions, now, self.ttl);

        if let Some(id) = id {
            if let Some(entry) = sessions.get_mut(id) {
                entry.last_seen = now;
                return SessionHandle {
                    id: id.to_string(),
                    state: Arc::clone(&entry.state),
                    is_new: false,
                };
            }
        }

        let id = Uuid::new_v4().to_string();
        let state = Arc::new(AsyncMutex::new(SessionState::new(self.cost_per_image)));
        sessions.insert(
            id.clone(),
            SessionEntry {
                state: Arc::clone(&state),
                last_seen: now,
            },
        );
        log::info!("Opened session {} ({} live)", id, sessions.len());

        SessionHandle {
            id,
            state,
            is_new: true,
        }
    }

    /// Drops every session idle for longer than the TTL and returns how many
    /// went.
    pub fn evict_expired(&self) -> usize {
        evict_idle(&mut self.lock(), Instant::now(), self.ttl)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn evict_idle(sessions: &mut HashMap<String, SessionEntry>, now: Instant, ttl: Duration) -> usize {
    let before = sessions.len();
    sessions.retain(|_, entry| now.duration_since(entry.last_seen) <= ttl);
    let evicted = before - sessions.len();
    if evicted > 0 {
        log::info!("Evicted {} idle session(s) ({} live)", evicted, sessions.len());
    }
    evicted
}

pub struct AppState {
    pub generator: Arc<dyn ImageGenerator>,
    pub sessions: SessionRegistry,
}

impl AppState {
    pub fn new(
        generator: Arc<dyn ImageGenerator>,
        cost_per_image: f64,
        session_ttl: Duration,
    ) -> Self {
        Self {
            generator,
            sessions: SessionRegistry::new(cost_per_image, session_ttl),
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::index))
        .route("/generate", web::post().to(handlers::generate_form))
        .route("/prompts/{index}", web::post().to(handlers::select_prompt))
        .route("/api/generate", web::post().to(handlers::api_generate))
        .route("/api/session", web::get().to(handlers::api_session))
        .route("/api/prompts", web::get().to(handlers::api_prompts))
        .route("/api/health", web::get().to(handlers::health));
}

pub async fn run(config: &Config, generator: Arc<dyn ImageGenerator>) -> std::io::Result<()> {
    let state = web::Data::new(AppState::new(
        generator,
        config.cost_per_image,
        config.session_ttl,
    ));

    log::info!("Listening on {}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(config.bind_address())?
    .run()
    .await
}
