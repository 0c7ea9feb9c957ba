//! Lifecycle, pause and admission tests for the generation service.

use std::{collections::BTreeSet, sync::Arc, time::Duration};

use crossbeam_channel::{RecvTimeoutError, bounded};
use graphgen_test_support::tracing::CaptureLayer;
use rstest::{fixture, rstest};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

use super::{GenerationService, PauseGate, ServiceBuilder, ServiceState, Worker};
use crate::{
    error::{GenerationErrorCode, ServiceError, ServiceOperation},
    graph::Graph,
    request::{GraphKind, GraphRequest},
};

const PATIENCE: Duration = Duration::from_secs(10);

fn complete(id: u32) -> GraphRequest {
    GraphRequest::new(id, GraphKind::Complete, 4, u64::from(id))
}

fn service(workers: usize, capacity: usize) -> GenerationService {
    let config = ServiceBuilder::new()
        .with_workers(workers)
        .with_queue_capacity(capacity)
        .with_max_batch_size(4)
        .build()
        .expect("configuration is valid");
    GenerationService::new(config)
}

#[fixture]
fn running() -> GenerationService {
    let service = service(2, 16);
    service.start().expect("fresh service starts");
    service
}

fn assert_invalid_state(
    result: Result<(), ServiceError>,
    expected_operation: ServiceOperation,
    expected_state: ServiceState,
) {
    match result {
        Err(ServiceError::InvalidState { operation, state }) => {
            assert_eq!(operation, expected_operation);
            assert_eq!(state, expected_state);
        }
        other => panic!("expected an invalid-state error, got {other:?}"),
    }
}

#[test]
fn operations_before_start_are_rejected() {
    let service = service(1, 4);
    assert_eq!(service.state(), ServiceState::Created);
    assert_invalid_state(
        service.push(complete(1)),
        ServiceOperation::Push,
        ServiceState::Created,
    );
    assert_invalid_state(service.stop(), ServiceOperation::Stop, ServiceState::Created);
    assert_invalid_state(service.pause(), ServiceOperation::Pause, ServiceState::Created);
}

#[rstest]
fn lifecycle_transitions_are_enforced(running: GenerationService) {
    assert_invalid_state(running.start(), ServiceOperation::Start, ServiceState::Running);
    assert_invalid_state(running.resume(), ServiceOperation::Resume, ServiceState::Running);

    running.pause().expect("running service pauses");
    assert_eq!(running.state(), ServiceState::Paused);
    assert_invalid_state(running.pause(), ServiceOperation::Pause, ServiceState::Paused);
    running.resume().expect("paused service resumes");

    running.stop().expect("running service stops");
    assert_eq!(running.state(), ServiceState::Stopped);
    assert_invalid_state(running.stop(), ServiceOperation::Stop, ServiceState::Stopped);
    assert_invalid_state(
        running.push(complete(1)),
        ServiceOperation::Push,
        ServiceState::Stopped,
    );
}

#[test]
fn single_worker_publishes_the_requested_graph() {
    let service = service(1, 4);
    service.start().expect("starts");
    service
        .push(GraphRequest::new(2233, GraphKind::Complete, 3, 255))
        .expect("request is valid");

    let result = service.results().recv_timeout(PATIENCE).expect("result arrives");
    assert_eq!(result.id, 2233);
    assert_eq!(result.graph.node_count(), 3);
    assert!((0..3).all(|node| result.graph.degree(node) == 2));
    service.stop().expect("stops");
}

#[rstest]
fn paused_workers_publish_nothing_until_resumed(running: GenerationService) {
    running.pause().expect("pauses");
    for id in 0..6 {
        running.push(complete(id)).expect("pushes are accepted while paused");
    }
    assert_eq!(running.queued(), 6);

    let results = running.results();
    assert_eq!(
        results.recv_timeout(Duration::from_millis(200)).map(|result| result.id),
        Err(RecvTimeoutError::Timeout)
    );

    running.resume().expect("resumes");
    let ids: BTreeSet<u32> = (0..6)
        .map(|_| results.recv_timeout(PATIENCE).expect("result arrives").id)
        .collect();
    assert_eq!(ids, (0..6).collect());
    running.stop().expect("stops");
}

#[test]
fn pausing_with_work_in_flight_holds_back_the_rest() {
    const REQUESTS: usize = 24;
    let dense = GraphKind::ExactDegree { degree: 40 };
    let service = service(2, 32);
    service.start().expect("starts");
    for id in 0..REQUESTS as u32 {
        let request = GraphRequest::new(id, dense, 100, u64::from(id)).with_connected(true);
        service.push(request).expect("request is valid");
    }

    service.pause().expect("pauses with requests in flight");
    let results = service.results();
    let mut ids: BTreeSet<u32> = results.try_iter().map(|result| result.id).collect();
    let published_before_pause = ids.len();
    assert_eq!(
        results.recv_timeout(Duration::from_millis(300)).map(|result| result.id),
        Err(RecvTimeoutError::Timeout),
        "{published_before_pause} results were published before the pause"
    );
    assert_eq!(service.queued() + published_before_pause, REQUESTS);

    service.resume().expect("resumes");
    while ids.len() < REQUESTS {
        let result = results.recv_timeout(PATIENCE).expect("result arrives after resume");
        assert!(ids.insert(result.id), "request {} published twice", result.id);
    }
    assert_eq!(ids, (0..REQUESTS as u32).collect());
    service.stop().expect("stops");
}

#[test]
fn stop_drains_queued_requests_even_when_paused() {
    let service = service(1, 16);
    service.start().expect("starts");
    service.pause().expect("pauses");
    for id in 0..10 {
        service.push(complete(id)).expect("valid request");
    }

    service.stop().expect("stop releases and drains");

    let results = service.results();
    let ids: BTreeSet<u32> = results.try_iter().map(|result| result.id).collect();
    assert_eq!(ids, (0..10).collect());
    assert!(results.recv().is_err(), "queue disconnects once workers exit");
}

#[rstest]
fn invalid_requests_are_rejected_synchronously(running: GenerationService) {
    let err = running
        .push(GraphRequest::new(5, GraphKind::Complete, 0, 1))
        .expect_err("zero nodes are invalid");
    assert!(matches!(err, ServiceError::InvalidRequest { id: 5, .. }));
    assert_eq!(err.generation_code(), Some(GenerationErrorCode::EmptyGraph));
    assert_eq!(running.queued(), 0);
}

#[rstest]
fn oversized_batches_are_rejected(running: GenerationService) {
    let batch = (0..5).map(complete).collect();
    let err = running.push_batch(batch).expect_err("limit is four");
    assert!(matches!(
        err,
        ServiceError::BatchTooLarge {
            requested: 5,
            max_batch_size: 4
        }
    ));
}

#[test]
fn batches_need_room_in_the_queue() {
    let service = service(1, 3);
    service.start().expect("starts");
    service.pause().expect("pauses");
    service.push(complete(0)).expect("valid request");
    service.push(complete(1)).expect("valid request");
    assert_eq!(service.free_band(), 1);

    let err = service
        .push_batch(vec![complete(2), complete(3)])
        .expect_err("only one slot is free");
    assert!(matches!(
        err,
        ServiceError::InsufficientCapacity {
            requested: 2,
            free: 1
        }
    ));
    assert_eq!(service.queued(), 2);

    service.push_batch(vec![complete(4)]).expect("one request fits");
    assert_eq!(service.free_band(), 0);
    service.stop().expect("stops");
    assert_eq!(service.results().try_iter().count(), 3);
}

#[rstest]
fn batches_with_an_invalid_request_enqueue_nothing(running: GenerationService) {
    running.pause().expect("pauses");
    let batch = vec![complete(1), GraphRequest::new(2, GraphKind::Complete, 500, 0)];
    let err = running.push_batch(batch).expect_err("second request is too large");
    assert!(matches!(err, ServiceError::InvalidRequest { id: 2, .. }));
    assert_eq!(running.queued(), 0);
    running.stop().expect("stops");
}

#[test]
fn failed_generation_is_logged_and_dropped() {
    let (_requests_tx, requests) = bounded(1);
    let (results_tx, results) = bounded(1);
    let (_pause_tx, pause) = bounded(0);
    let worker = Worker {
        index: 0,
        requests,
        results: results_tx,
        pause,
        gate: Arc::new(PauseGate::default()),
    };
    // Workers trust admission; three nodes cannot all have degree one.
    let request = GraphRequest::new(41, GraphKind::BetweenDegree { min: 1, max: 1 }, 3, 8);

    let layer = CaptureLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    tracing::subscriber::with_default(subscriber, || worker.process(&request));

    assert!(results.try_recv().is_err(), "no result is published");
    let event = layer
        .find("generation failed, dropping request")
        .expect("drop is logged");
    assert_eq!(event.level, Level::WARN);
    assert_eq!(event.fields.get("id").map(String::as_str), Some("41"));
    assert_eq!(
        event.fields.get("code").map(String::as_str),
        Some("GENERATION_INVALID_PARAMETERS")
    );
}

#[test]
fn dropping_a_running_service_detaches_workers() {
    let service = service(2, 4);
    service.start().expect("starts");
    let results = service.results();
    service.push(complete(9)).expect("valid request");
    drop(service);

    let ids: Vec<u32> = results.iter().map(|result| result.id).collect();
    assert_eq!(ids, vec![9]);
}
