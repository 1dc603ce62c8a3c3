use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};

use contact_binding::{
    merge, ContactDirectory, ContactId, ContactRecord, DirectoryError, Orchestrator,
    ResolverConfig, ResolverEvent, SearchController,
};

const WAIT: Duration = Duration::from_secs(2);

/// Holds queries listed in `gated` until the test releases them, and
/// reports every query as it reaches the directory.
struct GatedDirectory {
    gated: Vec<String>,
    release: Mutex<Receiver<()>>,
    started: Sender<String>,
}

impl GatedDirectory {
    fn new(gated: &[&str]) -> (Arc<Self>, Sender<()>, Receiver<String>) {
        let (release_tx, release_rx) = bounded(8);
        let (started_tx, started_rx) = unbounded();
        let directory = Arc::new(Self {
            gated: gated.iter().map(|q| (*q).to_string()).collect(),
            release: Mutex::new(release_rx),
            started: started_tx,
        });
        (directory, release_tx, started_rx)
    }
}

impl ContactDirectory for GatedDirectory {
    fn search_global(&self, query: &str) -> Result<Vec<ContactRecord>, DirectoryError> {
        let _ = self.started.send(query.to_string());
        if self.gated.iter().any(|q| q == query) {
            // Blocks until released, or forever while the test holds the sender.
            let _ = self.release.lock().unwrap().recv();
        }
        let id = 100 + i64::try_from(query.len()).unwrap();
        Ok(vec![ContactRecord::new(id, format!("match for {query}")).with_origin_scope("Elsewhere")])
    }
}

fn ids(records: &[ContactRecord]) -> Vec<i64> {
    records.iter().filter_map(|r| r.id).map(ContactId::get).collect()
}

fn type_and_issue(resolver: &mut Orchestrator, text: &str, at: Instant, debounce: Duration) {
    resolver
        .dispatch(ResolverEvent::TextInput(text.to_string()), at)
        .unwrap();
    resolver.pump(at + debounce);
}

#[test]
fn earlier_query_arriving_after_later_one_is_discarded() {
    let (directory, release, started) = GatedDirectory::new(&["Al"]);
    let config = ResolverConfig::default();
    let debounce = config.debounce();
    let mut resolver = Orchestrator::new(config, directory).unwrap();
    let t0 = Instant::now();

    type_and_issue(&mut resolver, "Al", t0, debounce);
    assert_eq!(started.recv_timeout(WAIT).unwrap(), "Al");

    type_and_issue(&mut resolver, "Ali", t0 + Duration::from_millis(300), debounce);

    // "Ali" completes while "Al" is still in flight.
    assert!(resolver.wait_for_search(WAIT));
    assert_eq!(ids(resolver.suggestions()), vec![103]);
    assert_eq!(resolver.search().results().query.as_deref(), Some("Ali"));

    // "Al" lands afterwards and is dropped.
    release.send(()).unwrap();
    assert!(!resolver.wait_for_search(WAIT));
    assert_eq!(ids(resolver.suggestions()), vec![103]);
    assert_eq!(resolver.search().results().query.as_deref(), Some("Ali"));
}

#[test]
fn query_that_never_returns_does_not_block_later_queries() {
    let (directory, _release, started) = GatedDirectory::new(&["A"]);
    let config = ResolverConfig::default();
    let debounce = config.debounce();
    let mut resolver = Orchestrator::new(config, directory).unwrap();
    let t0 = Instant::now();

    type_and_issue(&mut resolver, "A", t0, debounce);
    assert_eq!(started.recv_timeout(WAIT).unwrap(), "A");

    type_and_issue(&mut resolver, "Al", t0 + Duration::from_millis(300), debounce);
    assert!(resolver.wait_for_search(WAIT));
    assert_eq!(ids(resolver.suggestions()), vec![102]);

    type_and_issue(&mut resolver, "Ali", t0 + Duration::from_millis(600), debounce);
    assert!(resolver.wait_for_search(WAIT));
    assert_eq!(ids(resolver.suggestions()), vec![103]);

    assert!(!resolver.wait_for_search(Duration::from_millis(100)));
}

#[test]
fn selection_discards_in_flight_search() {
    let (directory, release, started) = GatedDirectory::new(&["Jo"]);
    let mut resolver = Orchestrator::new(ResolverConfig::default(), directory).unwrap();
    resolver.set_scope_candidates(vec![ContactRecord::new(5, "John Tan")]);
    let t0 = Instant::now();

    resolver.dispatch(ResolverEvent::TextInput("Jo".to_string()), t0).unwrap();
    resolver.pump(t0 + Duration::from_millis(250));
    assert_eq!(started.recv_timeout(WAIT).unwrap(), "Jo");
    resolver
        .dispatch(
            ResolverEvent::SelectRecord(ContactRecord::new(5, "John Tan")),
            t0 + Duration::from_millis(260),
        )
        .unwrap();

    release.send(()).unwrap();
    assert!(!resolver.wait_for_search(WAIT));
    assert_eq!(ids(resolver.suggestions()), vec![5]);
}

#[test]
fn out_of_order_arrival_applies_only_latest_issued() {
    let mut search = SearchController::new(ResolverConfig::default());
    let t0 = Instant::now();

    search.on_query_change("Q1", false, t0);
    let q1 = search.poll(t0 + Duration::from_millis(250)).unwrap();
    search.on_query_change("Q2", false, t0 + Duration::from_millis(260));
    let q2 = search.poll(t0 + Duration::from_millis(510)).unwrap();
    assert!(q2.generation > q1.generation);

    assert!(search.complete(&q2, Ok(vec![ContactRecord::new(2, "from Q2")])));
    assert!(!search.complete(&q1, Ok(vec![ContactRecord::new(1, "from Q1")])));

    let merged = merge(None, &[], &search.results().records, None);
    assert_eq!(ids(&merged), vec![2]);
}

#[test]
fn emptying_the_input_drops_results_and_pending_query() {
    let mut search = SearchController::new(ResolverConfig::default());
    let t0 = Instant::now();

    search.on_query_change("Ali", false, t0);
    let ticket = search.poll(t0 + Duration::from_millis(250)).unwrap();
    assert!(search.complete(&ticket, Ok(vec![ContactRecord::new(41, "Ali Hassan")])));

    search.on_query_change("", false, t0 + Duration::from_millis(300));
    assert!(search.results().records.is_empty());
    assert!(search.poll(t0 + Duration::from_secs(5)).is_none());
}
