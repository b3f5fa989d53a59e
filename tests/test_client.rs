//! End-to-end tests for the blocking client against a live server.
//!
//! The server runs on its own runtime in a background thread, bound to an
//! ephemeral local port, so the blocking client never runs inside tokio.

use std::sync::Arc;
use std::time::Duration;

use velocity::client::{
    ApiClient, ClientError, Credentials, PendingSubmission, RetryPolicy, ScoreApi,
    SubmissionOutcome,
};
use velocity::server::{create_router, AppState, JwtAuth, MemoryStore};

fn spawn_server() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    listener.set_nonblocking(true).unwrap();
    let auth = JwtAuth::new(b"client-tests", Duration::from_secs(3600), 4);
    let app = create_router(AppState::new(Arc::new(MemoryStore::new()), auth));

    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            axum::serve(listener, app).await.unwrap();
        });
    });
    format!("http://{addr}")
}

fn client(base_url: &str) -> ApiClient {
    ApiClient::new(base_url, Duration::from_secs(5)).unwrap()
}

fn register_creds() -> Credentials {
    Credentials::Register {
        name: "Ada".into(),
        email: "ada@example.com".into(),
        password: "hunter22".into(),
    }
}

#[test]
fn register_then_reconnect_logs_in() {
    let url = spawn_server();

    let mut first = client(&url);
    assert_eq!(first.connect(&register_creds()), Ok(Some(0)));
    assert_eq!(first.submit_score(120).unwrap().best_score, 120);

    // the email is taken now, so the same settings fall back to login
    let mut second = client(&url);
    assert_eq!(second.connect(&register_creds()), Ok(Some(120)));
    assert!(second.token().is_some());
}

#[test]
fn token_connect_reads_best_score() {
    let url = spawn_server();
    let mut registered = client(&url);
    registered.register("Ada", "ada@example.com", "hunter22").unwrap();
    registered.submit_score(75).unwrap();
    let token = registered.token().unwrap().to_string();

    let mut reused = client(&url);
    assert_eq!(reused.connect(&Credentials::Token(token)), Ok(Some(75)));
}

#[test]
fn bad_credentials_are_not_transient() {
    let url = spawn_server();

    let err = client(&url)
        .connect(&Credentials::Token("garbage".into()))
        .unwrap_err();
    assert_eq!(err, ClientError::Unauthorized);
    assert!(!err.is_transient());

    let err = client(&url)
        .connect(&Credentials::Login {
            email: "nobody@example.com".into(),
            password: "pw".into(),
        })
        .unwrap_err();
    assert_eq!(err, ClientError::Unauthorized);
}

#[test]
fn background_submission_reports_best() {
    let url = spawn_server();
    let mut api = client(&url);
    api.connect(&register_creds()).unwrap();
    api.submit_score(100).unwrap();

    let mut pending = PendingSubmission::spawn(Arc::new(api), 50, RetryPolicy::none());
    assert_eq!(
        pending.wait(Duration::from_secs(10)),
        Some(SubmissionOutcome::Accepted {
            current_score: 50,
            best_score: 100
        })
    );
}
