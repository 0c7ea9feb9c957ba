//! End-to-end scenarios driven through the public service API.

use std::{collections::BTreeMap, sync::Arc, thread, time::Duration};

use graphgen_core::{
    GenerationService, Graph, GraphKind, GraphRequest, GraphResult, ServiceBuilder,
    WeightBounds, generate,
};
use graphgen_test_support::{assert_simple_graph, degree_sequence, is_connected};
use rstest::rstest;

const PATIENCE: Duration = Duration::from_secs(30);

fn started(workers: usize) -> GenerationService {
    let config = ServiceBuilder::new()
        .with_workers(workers)
        .build()
        .expect("configuration is valid");
    let service = GenerationService::new(config);
    service.start().expect("fresh service starts");
    service
}

fn collect(service: &GenerationService, count: usize) -> BTreeMap<u32, GraphResult> {
    let results = service.results();
    (0..count)
        .map(|_| {
            let result = results.recv_timeout(PATIENCE).expect("result arrives");
            (result.id, result)
        })
        .collect()
}

#[test]
fn complete_graph_round_trips_through_one_worker() {
    let service = started(1);
    service
        .push(GraphRequest::new(2233, GraphKind::Complete, 3, 255))
        .expect("valid request");

    let results = collect(&service, 1);
    let graph = &results[&2233].graph;
    assert_eq!(graph.node_count(), 3);
    assert_eq!(degree_sequence(graph.adjacency()), vec![2, 2, 2]);
    service.stop().expect("stops");
}

#[test]
fn connected_regular_graph_is_generated_by_the_pool() {
    let service = started(4);
    let request =
        GraphRequest::new(1, GraphKind::ExactDegree { degree: 5 }, 20, 12).with_connected(true);
    service.push(request).expect("valid request");

    let results = collect(&service, 1);
    let graph = &results[&1].graph;
    assert_simple_graph(graph.adjacency());
    assert!(degree_sequence(graph.adjacency()).iter().all(|&degree| degree == 5));
    assert!(is_connected(graph.adjacency()));
    service.stop().expect("stops");
}

#[test]
fn unit_weight_bounds_weigh_every_edge_one() {
    let service = started(2);
    let request =
        GraphRequest::new(3, GraphKind::Complete, 5, 9).with_weights(WeightBounds::new(1, 1));
    service.push(request).expect("valid request");

    let results = collect(&service, 1);
    let graph = &results[&3].graph;
    assert!(graph.properties().weighted());
    let weights = graph.weights().expect("weighted graph exposes weights");
    assert_eq!(weights.len(), 10);
    assert!(weights.values().all(|&weight| weight == 1));
    service.stop().expect("stops");
}

#[rstest]
#[case::regular(GraphKind::ExactDegree { degree: 3 }, 16, true)]
#[case::at_least(GraphKind::AtLeastDegree { min: 2 }, 25, false)]
#[case::between(GraphKind::BetweenDegree { min: 1, max: 4 }, 30, true)]
#[case::average(GraphKind::AverageDegree { average: 3.5 }, 40, true)]
fn service_output_matches_direct_generation(
    #[case] kind: GraphKind,
    #[case] nodes: usize,
    #[case] connected: bool,
) {
    let request = GraphRequest::new(77, kind, nodes, 4_242).with_connected(connected);
    let direct = generate(&request).expect("request is satisfiable");

    let service = started(3);
    service.push(request).expect("valid request");
    let results = collect(&service, 1);
    service.stop().expect("stops");

    assert_eq!(results[&77].graph.adjacency(), direct.graph.adjacency());
}

#[test]
fn concurrent_producers_each_get_their_results() {
    let service = Arc::new(started(4));
    let producers: Vec<_> = (0..4_u32)
        .map(|producer| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                for offset in 0..10 {
                    let id = producer * 100 + offset;
                    let kind = GraphKind::BetweenDegree { min: 1, max: 3 };
                    let request = GraphRequest::new(id, kind, 12, u64::from(id));
                    service.push(request).expect("valid request");
                }
            })
        })
        .collect();

    let results = collect(&service, 40);
    for producer in producers {
        producer.join().expect("producer finishes");
    }
    service.stop().expect("stops");

    let expected: Vec<u32> = (0..4)
        .flat_map(|producer| (0..10).map(move |offset| producer * 100 + offset))
        .collect();
    assert_eq!(results.keys().copied().collect::<Vec<_>>(), expected);
    for result in results.values() {
        assert_simple_graph(result.graph.adjacency());
        assert!(
            degree_sequence(result.graph.adjacency())
                .iter()
                .all(|degree| (1..=3).contains(degree))
        );
    }
}
