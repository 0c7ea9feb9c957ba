//! Shared test utilities used across graphgen crates.
//!
//! Graph helpers operate on plain adjacency slices so they can be used with
//! any graph type without depending on the core crate.

use std::collections::{BTreeSet, VecDeque};

/// Panics unless `adjacency` describes a simple undirected graph: no
/// self-loops, no references to missing nodes, and a symmetric relation.
///
/// # Examples
/// ```
/// use std::collections::BTreeSet;
/// use graphgen_test_support::assert_simple_graph;
///
/// let adjacency = vec![BTreeSet::from([1]), BTreeSet::from([0])];
/// assert_simple_graph(&adjacency);
/// ```
pub fn assert_simple_graph(adjacency: &[BTreeSet<usize>]) {
    for (node, neighbours) in adjacency.iter().enumerate() {
        assert!(!neighbours.contains(&node), "node {node} has a self-loop");
        for &other in neighbours {
            let back = adjacency
                .get(other)
                .unwrap_or_else(|| panic!("node {node} links to missing node {other}"));
            assert!(
                back.contains(&node),
                "edge {node} -- {other} is missing its reverse"
            );
        }
    }
}

/// Returns the degree of every node.
#[must_use]
pub fn degree_sequence(adjacency: &[BTreeSet<usize>]) -> Vec<usize> {
    adjacency.iter().map(BTreeSet::len).collect()
}

/// Returns `true` when a breadth-first walk from node 0 reaches every node.
/// Graphs with fewer than two nodes count as connected.
#[must_use]
pub fn is_connected(adjacency: &[BTreeSet<usize>]) -> bool {
    if adjacency.len() < 2 {
        return true;
    }
    let mut seen = vec![false; adjacency.len()];
    let mut queue = VecDeque::from([0]);
    seen[0] = true;
    let mut reached = 1;
    while let Some(node) = queue.pop_front() {
        for &next in &adjacency[node] {
            if !seen[next] {
                seen[next] = true;
                reached += 1;
                queue.push_back(next);
            }
        }
    }
    reached == adjacency.len()
}

pub mod tracing {
    //! Event capture for asserting structured diagnostics in tests.
    use std::{
        collections::BTreeMap,
        fmt,
        sync::{Arc, Mutex},
    };

    use tracing::{
        Event, Level, Subscriber,
        field::{Field, Visit},
    };
    use tracing_subscriber::{Layer, layer::Context};

    /// Layer that records every event it sees.
    ///
    /// Clones share one buffer, so a test can keep a handle while the layer
    /// itself is moved into a subscriber.
    ///
    /// # Examples
    /// ```
    /// use graphgen_test_support::tracing::CaptureLayer;
    /// use tracing_subscriber::layer::SubscriberExt;
    ///
    /// let layer = CaptureLayer::default();
    /// let subscriber = tracing_subscriber::registry().with(layer.clone());
    /// tracing::subscriber::with_default(subscriber, || {
    ///     tracing::warn!(id = 7, "request dropped");
    /// });
    /// let event = layer.find("request dropped").expect("event was captured");
    /// assert_eq!(event.fields.get("id").map(String::as_str), Some("7"));
    /// ```
    #[derive(Clone, Default)]
    pub struct CaptureLayer {
        events: Arc<Mutex<Vec<CapturedEvent>>>,
    }

    impl CaptureLayer {
        /// Returns a snapshot of the captured events in emission order.
        #[must_use]
        pub fn events(&self) -> Vec<CapturedEvent> {
            self.events.lock().expect("lock poisoned").clone()
        }

        /// Returns the first event whose message contains `fragment`.
        #[must_use]
        pub fn find(&self, fragment: &str) -> Option<CapturedEvent> {
            self.events
                .lock()
                .expect("lock poisoned")
                .iter()
                .find(|event| event.message().is_some_and(|message| message.contains(fragment)))
                .cloned()
        }
    }

    /// Snapshot of one emitted event.
    #[derive(Clone, Debug, Eq, PartialEq)]
    pub struct CapturedEvent {
        /// Level of the event.
        pub level: Level,
        /// Target from the event metadata.
        pub target: String,
        /// Every recorded field, including `message`, rendered as text.
        pub fields: BTreeMap<String, String>,
    }

    impl CapturedEvent {
        /// Returns the formatted message, if the event carried one.
        #[must_use]
        pub fn message(&self) -> Option<&str> {
            self.fields.get("message").map(String::as_str)
        }
    }

    impl<S: Subscriber> Layer<S> for CaptureLayer {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut fields = BTreeMap::new();
            event.record(&mut FieldRecorder {
                fields: &mut fields,
            });
            self.events
                .lock()
                .expect("lock poisoned")
                .push(CapturedEvent {
                    level: *event.metadata().level(),
                    target: event.metadata().target().to_owned(),
                    fields,
                });
        }
    }

    struct FieldRecorder<'a> {
        fields: &'a mut BTreeMap<String, String>,
    }

    impl Visit for FieldRecorder<'_> {
        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            self.fields
                .insert(field.name().to_owned(), format!("{value:?}"));
        }

        fn record_str(&mut self, field: &Field, value: &str) {
            self.fields
                .insert(field.name().to_owned(), value.to_owned());
        }

        fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
            self.fields
                .insert(field.name().to_owned(), value.to_string());
        }

        fn record_u64(&mut self, field: &Field, value: u64) {
            self.fields
                .insert(field.name().to_owned(), value.to_string());
        }

        fn record_i64(&mut self, field: &Field, value: i64) {
            self.fields
                .insert(field.name().to_owned(), value.to_string());
        }

        fn record_bool(&mut self, field: &Field, value: bool) {
            self.fields
                .insert(field.name().to_owned(), value.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rstest::rstest;

    use super::*;

    fn adjacency(edges: &[(usize, usize)], nodes: usize) -> Vec<BTreeSet<usize>> {
        let mut sets = vec![BTreeSet::new(); nodes];
        for &(u, v) in edges {
            sets[u].insert(v);
            sets[v].insert(u);
        }
        sets
    }

    #[rstest]
    #[case::empty(&[], 0, true)]
    #[case::single(&[], 1, true)]
    #[case::path(&[(0, 1), (1, 2)], 3, true)]
    #[case::split(&[(0, 1), (2, 3)], 4, false)]
    fn connectivity_matches_components(
        #[case] edges: &[(usize, usize)],
        #[case] nodes: usize,
        #[case] expected: bool,
    ) {
        assert_eq!(is_connected(&adjacency(edges, nodes)), expected);
    }

    #[test]
    fn degrees_count_neighbours() {
        assert_eq!(degree_sequence(&adjacency(&[(0, 1), (0, 2)], 3)), vec![2, 1, 1]);
    }

    #[test]
    #[should_panic(expected = "missing its reverse")]
    fn asymmetric_adjacency_is_rejected() {
        let sets = vec![BTreeSet::from([1]), BTreeSet::new()];
        assert_simple_graph(&sets);
    }

    #[test]
    #[should_panic(expected = "self-loop")]
    fn self_loops_are_rejected() {
        assert_simple_graph(&[BTreeSet::from([0])]);
    }
}
