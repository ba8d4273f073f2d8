/// API integration tests
/// Tests complete HTTP request/response cycles against real session workers
mod common;

use common::{create_test_app, send};
use serde_json::json;

/// Test GET /api/health
#[tokio::test]
async fn test_health() {
    let (app, _) = create_test_app();

    let (status, body) = send(&app, "GET", "/api/health", None).await;

    assert_eq!(status, 200);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["sessions"], 0);
}

/// Test a full control session: join, queue, pause, skip, previous, leave
#[tokio::test]
async fn test_session_flow() {
    let (app, _) = create_test_app();

    let (status, body) = send(&app, "POST", "/api/sessions/guild/join", None).await;
    assert_eq!(status, 200);
    assert_eq!(body["outcome"], "joined");

    let (status, body) = send(
        &app,
        "POST",
        "/api/sessions/guild/play",
        Some(json!({"query": "first song"})),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["outcome"], "queued");
    assert_eq!(body["started"], true);
    assert_eq!(body["track"]["title"], "first song");
    assert_eq!(body["warnings"], json!([]));

    let (_, body) = send(
        &app,
        "POST",
        "/api/sessions/guild/play",
        Some(json!({"query": "second song"})),
    )
    .await;
    assert_eq!(body["started"], false);

    let (status, body) = send(&app, "GET", "/api/sessions/guild/queue", None).await;
    assert_eq!(status, 200);
    assert_eq!(body["outcome"], "queue");
    assert_eq!(body["current"]["title"], "first song");
    assert_eq!(body["pending"][0]["title"], "second song");

    let (status, body) = send(&app, "POST", "/api/sessions/guild/pause", None).await;
    assert_eq!(status, 200);
    assert_eq!(body["outcome"], "paused");

    // Pausing twice is rejected by state
    let (status, body) = send(&app, "POST", "/api/sessions/guild/pause", None).await;
    assert_eq!(status, 409);
    assert!(body["error"].as_str().unwrap().contains("pause"));

    let (status, _) = send(&app, "POST", "/api/sessions/guild/resume", None).await;
    assert_eq!(status, 200);

    let (status, body) = send(&app, "POST", "/api/sessions/guild/skip", None).await;
    assert_eq!(status, 200);
    assert_eq!(body["outcome"], "skipped");
    assert_eq!(body["now_playing"]["title"], "second song");

    let (status, body) = send(&app, "POST", "/api/sessions/guild/previous", None).await;
    assert_eq!(status, 200);
    assert_eq!(body["outcome"], "previous");
    assert_eq!(body["now_playing"]["title"], "first song");

    let (status, body) = send(&app, "POST", "/api/sessions/guild/leave", None).await;
    assert_eq!(status, 200);
    assert_eq!(body["outcome"], "left");

    let (status, _) = send(&app, "POST", "/api/sessions/guild/pause", None).await;
    assert_eq!(status, 404);
}

/// Test commands against a session that was never joined
#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let (app, _) = create_test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/sessions/nobody/play",
        Some(json!({"query": "song"})),
    )
    .await;
    assert_eq!(status, 404);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, "POST", "/api/sessions/nobody/leave", None).await;
    assert_eq!(status, 404);
}

/// Test state rejections map to 409
#[tokio::test]
async fn test_skip_while_idle_conflicts() {
    let (app, _) = create_test_app();
    send(&app, "POST", "/api/sessions/guild/join", None).await;

    let (status, _) = send(&app, "POST", "/api/sessions/guild/skip", None).await;
    assert_eq!(status, 409);

    // Previous with no history is a no-op, not an error
    let (status, body) = send(&app, "POST", "/api/sessions/guild/previous", None).await;
    assert_eq!(status, 200);
    assert_eq!(body["outcome"], "no_previous");
}

/// Test resolve failures map to 422 and leave the queue alone
#[tokio::test]
async fn test_unresolvable_query() {
    let (app, _) = create_test_app();
    send(&app, "POST", "/api/sessions/guild/join", None).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/sessions/guild/play",
        Some(json!({"query": "missing track"})),
    )
    .await;
    assert_eq!(status, 422);

    let (_, body) = send(&app, "GET", "/api/sessions/guild/queue", None).await;
    assert_eq!(body["current"], serde_json::Value::Null);
    assert_eq!(body["pending"], json!([]));
}

/// Test empty queries are rejected before reaching the session
#[tokio::test]
async fn test_empty_query_is_bad_request() {
    let (app, sessions) = create_test_app();
    send(&app, "POST", "/api/sessions/guild/join", None).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/sessions/guild/play",
        Some(json!({"query": "   "})),
    )
    .await;
    assert_eq!(status, 400);

    let session = sessions.get(&"guild".into()).await.unwrap();
    assert!(session.snapshot().await.is_empty());
}

/// Test the `!`-prefixed chat command endpoint
#[tokio::test]
async fn test_chat_commands() {
    let (app, _) = create_test_app();
    let uri = "/api/sessions/guild/command";

    let (status, body) = send(&app, "POST", uri, Some(json!({"text": "!join"}))).await;
    assert_eq!(status, 200);
    assert_eq!(body["outcome"], "joined");

    let (status, body) = send(
        &app,
        "POST",
        uri,
        Some(json!({"text": "!play never gonna give you up"})),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["track"]["title"], "never gonna give you up");

    let (_, body) = send(&app, "POST", uri, Some(json!({"text": "!queue"}))).await;
    assert_eq!(body["current"]["title"], "never gonna give you up");

    let (status, _) = send(&app, "POST", uri, Some(json!({"text": "!prev"}))).await;
    assert_eq!(status, 200);

    let (status, body) = send(&app, "POST", uri, Some(json!({"text": "!dance"}))).await;
    assert_eq!(status, 400);
    assert!(body["error"].as_str().unwrap().contains("dance"));

    let (status, _) = send(&app, "POST", uri, Some(json!({"text": "skip"}))).await;
    assert_eq!(status, 400);

    let (status, _) = send(&app, "POST", uri, Some(json!({"text": "!leave"}))).await;
    assert_eq!(status, 200);
}

/// Test GET /api/sessions lists joined sessions in order
#[tokio::test]
async fn test_list_sessions() {
    let (app, _) = create_test_app();
    send(&app, "POST", "/api/sessions/b/join", None).await;
    send(&app, "POST", "/api/sessions/a/join", None).await;
    // Joining again is idempotent
    send(&app, "POST", "/api/sessions/a/join", None).await;

    let (status, body) = send(&app, "GET", "/api/sessions", None).await;
    assert_eq!(status, 200);
    assert_eq!(body["sessions"], json!(["a", "b"]));

    send(&app, "POST", "/api/sessions/a/leave", None).await;
    let (_, body) = send(&app, "GET", "/api/sessions", None).await;
    assert_eq!(body["sessions"], json!(["b"]));
}
