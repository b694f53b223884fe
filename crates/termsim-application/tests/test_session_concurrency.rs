mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{BarrierGenerator, CounterGenerator, StalledGenerator, in_memory_service};
use serde_json::json;
use termsim_application::CommandRequest;
use termsim_core::state::default_environment;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_same_session_commands_are_serialized() {
    let service = Arc::new(in_memory_service(Arc::new(CounterGenerator)));
    let session = service.create_session(None).await.unwrap();

    let run = |service: Arc<termsim_application::SessionService>, id: String| async move {
        service
            .process_command(CommandRequest::new("kubectl apply -f x.yaml").for_session(id))
            .await
    };

    let (a, b) = futures::join!(
        tokio::spawn(run(service.clone(), session.session_id.clone())),
        tokio::spawn(run(service.clone(), session.session_id.clone())),
    );
    a.unwrap().unwrap();
    b.unwrap().unwrap();

    let stored = service.get_session(&session.session_id).await.unwrap().unwrap();
    assert_eq!(
        stored.environment_state.get("counter"),
        Some(&json!(2)),
        "Both increments should be kept"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_different_sessions_run_in_parallel() {
    let service = Arc::new(in_memory_service(Arc::new(BarrierGenerator::new(2))));
    let first = service.create_session(None).await.unwrap();
    let second = service.create_session(None).await.unwrap();

    // Each cycle waits for the other inside output generation, so this only
    // finishes if the two sessions do not block each other.
    let both = async {
        futures::join!(
            service.process_command(CommandRequest::new("git status").for_session(&first.session_id)),
            service.process_command(CommandRequest::new("git status").for_session(&second.session_id)),
        )
    };
    let (a, b) = tokio::time::timeout(Duration::from_secs(5), both)
        .await
        .expect("Sessions should not serialize each other");

    assert_eq!(a.unwrap().output, "On branch main");
    assert_eq!(b.unwrap().output, "On branch main");
}

#[tokio::test]
async fn test_cancelled_cycle_leaves_state_and_releases_lock() {
    let service = in_memory_service(Arc::new(StalledGenerator));
    let session = service.create_session(None).await.unwrap();

    let cancelled = tokio::time::timeout(
        Duration::from_millis(50),
        service.process_command(CommandRequest::new("git status").for_session(&session.session_id)),
    )
    .await;
    assert!(cancelled.is_err(), "Cycle should still be waiting on output");

    let stored = service.get_session(&session.session_id).await.unwrap().unwrap();
    assert_eq!(stored.environment_state, default_environment());
    assert_eq!(stored.updated_at, session.updated_at);

    // Reset takes the session lock, so it only completes if the lock was released.
    let reset = tokio::time::timeout(Duration::from_secs(1), service.reset_session(&session.session_id))
        .await
        .expect("Lock should be released after cancellation");
    assert!(reset.unwrap());
}
