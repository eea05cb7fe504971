use std::{
    sync::{Arc, atomic::Ordering},
    time::Duration,
};

use hustings::{CreatePollRequest, EngineConfig, PollEngine};

use crate::{RecordingRenderSink, ScriptedMarkerSink, settle};

fn rig() -> (PollEngine, Arc<RecordingRenderSink>, Arc<ScriptedMarkerSink>) {
    let render = Arc::new(RecordingRenderSink::default());
    let markers = Arc::new(ScriptedMarkerSink::reliable());
    let engine = PollEngine::new(EngineConfig::default(), render.clone(), markers.clone());
    (engine, render, markers)
}

fn request(labels: &[&str], duration_minutes: u32) -> CreatePollRequest {
    CreatePollRequest {
        question: "Which mascot?".to_string(),
        options: labels.iter().map(|label| label.to_string()).collect(),
        duration_minutes,
        created_by: Some("quizmaster".to_string()),
        ..CreatePollRequest::default()
    }
}

#[tokio::test(start_paused = true)]
async fn given_zero_duration_then_no_expiry_timer_is_armed() {
    let (engine, render, _markers) = rig();
    let poll_id = "poll-open".to_string();

    engine
        .start_poll(poll_id.clone(), request(&["A", "B"], 0))
        .await
        .expect("poll starts");

    tokio::time::advance(Duration::from_secs(24 * 3600)).await;
    settle().await;
    assert!(engine.is_live(&poll_id).await, "unbounded poll stays open");

    engine.close(&poll_id).await;
    settle().await;
    assert!(!engine.is_live(&poll_id).await);
    assert!(render.last().ended);
}

#[tokio::test(start_paused = true)]
async fn given_duration_elapses_then_poll_freezes_and_markers_clear() {
    let (engine, render, markers) = rig();
    let poll_id = "poll-timed".to_string();

    engine
        .start_poll(poll_id.clone(), request(&["A", "B"], 1))
        .await
        .expect("poll starts");
    engine
        .vote(&poll_id, 0, "ada".to_string())
        .await
        .expect("vote routed");
    settle().await;

    tokio::time::advance(Duration::from_secs(61)).await;
    settle().await;

    assert!(!engine.is_live(&poll_id).await, "expired poll is gone");
    let last = render.last();
    assert!(last.ended);
    assert!(last.fields[0].value.contains("(1)"));
    assert_eq!(markers.cleared.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn given_explicit_close_then_second_close_and_late_timer_are_noops() {
    let (engine, render, markers) = rig();
    let poll_id = "poll-closed-early".to_string();

    engine
        .start_poll(poll_id.clone(), request(&["A", "B"], 1))
        .await
        .expect("poll starts");

    engine.close(&poll_id).await;
    settle().await;
    assert!(!engine.is_live(&poll_id).await);
    assert_eq!(markers.cleared.load(Ordering::SeqCst), 1);

    engine.close(&poll_id).await;
    tokio::time::advance(Duration::from_secs(120)).await;
    settle().await;

    assert_eq!(markers.cleared.load(Ordering::SeqCst), 1);
    let ended_payloads = render
        .payloads
        .lock()
        .expect("payload lock")
        .iter()
        .filter(|payload| payload.ended)
        .count();
    assert_eq!(ended_payloads, 1);
}

#[tokio::test(start_paused = true)]
async fn given_render_sink_outage_then_ledger_state_survives() {
    let (engine, render, _markers) = rig();
    let poll_id = "poll-outage".to_string();

    engine
        .start_poll(poll_id.clone(), request(&["A", "B"], 0))
        .await
        .expect("poll starts");
    settle().await;
    assert_eq!(render.pushed(), 1, "initial render only");

    render.fail_next.store(1, Ordering::SeqCst);
    engine
        .vote(&poll_id, 0, "ada".to_string())
        .await
        .expect("vote routed");
    settle().await;
    assert_eq!(render.pushed(), 1, "failed update pushes nothing");

    engine
        .vote(&poll_id, 0, "bob".to_string())
        .await
        .expect("vote routed");
    settle().await;
    assert_eq!(render.pushed(), 2);
    assert!(
        render.last().fields[0].value.contains("(2)"),
        "both votes survive the outage: {}",
        render.last().fields[0].value
    );
}
