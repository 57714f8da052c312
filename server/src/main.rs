use axum::{routing::{get, post}, Json, Router};
use std::sync::Arc;
use engine::{init_logging, vlog, ELoggingVerbosity, GameConfig, GameSession, Presenter, RoundController, SessionError};
use axum::extract::Extension;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tokio::net::TcpListener;
use axum::http::StatusCode;
use axum::extract::Path;
use axum::response::IntoResponse;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::signal;

mod view;

use view::{card_face_svg, TableView, WebPresenter};

#[derive(Clone)]
struct AppState
{
    controller: Arc<RoundController>,
    presenter: Arc<WebPresenter>,
}

#[tokio::main]
async fn main()
{
    dotenv::dotenv().ok();
    init_logging(ELoggingVerbosity::Normal);

    let config = match GameConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            vlog!(ELoggingVerbosity::Error, "Configuration error: {}", e);
            return;
        }
    };

    let presenter = Arc::new(WebPresenter::new(Duration::from_millis(400)));
    let session = GameSession::new(config, presenter.clone() as Arc<dyn Presenter>);
    let controller = Arc::new(RoundController::from_session(session));

    if let Err(e) = controller.new_session().await {
        vlog!(ELoggingVerbosity::Error, "Could not start a game: {}", e);
        return;
    }

    let state = AppState { controller, presenter };
    let shutdown_flag = Arc::new(AtomicBool::new(false));

    // API routes
    let api = Router::new()
        .route("/state", get(get_state))
        .route("/draw", post(post_draw))
        .route("/restart", post(post_restart))
        .route("/shutdown", post({
            let flag = shutdown_flag.clone();
            move || {
                let flag = flag.clone();
                async move {
                    flag.store(true, Ordering::Relaxed);
                    StatusCode::OK
                }
            }
        }))
        .layer(Extension(state));

    // Static routes for the web/ directory (simple handlers)
    let app = Router::new()
        .nest("/api", api)
        .route("/", get(index))
        .route("/app.js", get(js))
        .route("/style.css", get(css))
        .route("/cards/*file", get(serve_card));

    let addr: SocketAddr = match std::env::var("WAR_ADDR").unwrap_or_else(|_| String::from("0.0.0.0:3000")).parse() {
        Ok(addr) => addr,
        Err(e) => {
            vlog!(ELoggingVerbosity::Error, "Invalid WAR_ADDR: {}", e);
            return;
        }
    };
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            vlog!(ELoggingVerbosity::Error, "Could not bind {}: {}", addr, e);
            return;
        }
    };

    vlog!(ELoggingVerbosity::Normal, "Server running at http://{}", addr);
    vlog!(ELoggingVerbosity::Normal, "Press Ctrl+C to stop the server, or click 'Stop Server' on the page");

    // Spawn a background task to check for shutdown flag
    let shutdown_flag_clone = shutdown_flag.clone();
    tokio::spawn(async move {
        loop {
            if shutdown_flag_clone.load(Ordering::Relaxed) {
                vlog!(ELoggingVerbosity::Normal, "Shutdown signal received, exiting gracefully...");
                std::process::exit(0);
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
        }
    });

    let server = axum::serve(listener, app);

    // Handle Ctrl+C (SIGINT) for graceful shutdown
    tokio::select! {
        result = server => {
            if let Err(e) = result {
                vlog!(ELoggingVerbosity::Error, "Server error: {}", e);
            }
        }
        _ = signal::ctrl_c() => {
            vlog!(ELoggingVerbosity::Normal, "Received Ctrl+C, shutting down gracefully...");
        }
    }
}

async fn get_state(Extension(state): Extension<AppState>) -> Json<TableView> {
    Json(state.presenter.snapshot())
}

async fn post_draw(Extension(state): Extension<AppState>) -> Json<serde_json::Value> {
    let report = state.controller.start_round().await;

    serde_json::json!({
        "report": report,
        "state": state.presenter.snapshot()
    })
    .into()
}

async fn post_restart(Extension(state): Extension<AppState>) -> impl IntoResponse {
    match state.controller.new_session().await {
        Ok(mode) => Json(serde_json::json!({
            "mode": mode,
            "state": state.presenter.snapshot()
        }))
        .into_response(),
        Err(SessionError::RoundInProgress) => (StatusCode::CONFLICT, "A round is still being played").into_response(),
        Err(e) => (StatusCode::SERVICE_UNAVAILABLE, e.to_string()).into_response(),
    }
}

/// Finds the web directory by searching upward from the current directory
fn web_dir() -> PathBuf {
    let mut current = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    loop {
        let web_path = current.join("web");
        if web_path.is_dir() {
            return web_path;
        }
        if !current.pop() {
            break;
        }
    }

    PathBuf::from("web")
}

async fn index() -> impl IntoResponse {
    match tokio::fs::read_to_string(web_dir().join("index.html")).await {
        Ok(s) => ([("content-type", "text/html; charset=utf-8")], s).into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

async fn js() -> impl IntoResponse {
    match tokio::fs::read_to_string(web_dir().join("app.js")).await {
        Ok(s) => ([("content-type", "application/javascript")], s).into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

async fn css() -> impl IntoResponse {
    match tokio::fs::read_to_string(web_dir().join("style.css")).await {
        Ok(s) => ([("content-type", "text/css")], s).into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

async fn serve_card(Path(file): Path<String>) -> impl IntoResponse
{
    if file.contains("..") || file.starts_with('/')
    {
        return (StatusCode::BAD_REQUEST, "Invalid path").into_response();
    }

    let path = web_dir().join("cards").join(&file);
    match tokio::fs::read(path).await {
        Ok(bytes) => ([("content-type", "image/png")], bytes).into_response(),
        Err(_) => match card_face_svg(&file) {
            Some(svg) => ([("content-type", "image/svg+xml")], svg).into_response(),
            None => (StatusCode::NOT_FOUND, "Not Found").into_response(),
        },
    }
}
