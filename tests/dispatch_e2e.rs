use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ntverify::{
    Channel, ChannelUnavailableError, Client, DemoConfig, DemoResult, Dispatcher,
    InMemoryRecordService, PutRequest, RecordService, Registry, Structure, TransportError,
    UriVerifier, Verification, Verifier,
};

/// In-memory host that counts connection attempts.
#[derive(Default)]
struct CountingService {
    inner: InMemoryRecordService,
    connects: AtomicUsize,
}

impl CountingService {
    fn standard() -> Self {
        Self {
            inner: InMemoryRecordService::with_standard_database(),
            connects: AtomicUsize::new(0),
        }
    }

    fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

impl RecordService for CountingService {
    fn connect(&self, name: &str) -> Result<(), ChannelUnavailableError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        self.inner.connect(name)
    }

    fn get(&self, name: &str) -> Result<Structure, TransportError> {
        self.inner.get(name)
    }

    fn put_get(&self, request: &PutRequest) -> Result<Structure, TransportError> {
        self.inner.put_get(request)
    }

    fn record_names(&self) -> Vec<String> {
        self.inner.record_names()
    }
}

/// Records every invocation; always passes.
struct CountingVerifier(Arc<AtomicUsize>);

impl Verifier for CountingVerifier {
    fn schema(&self) -> &'static str {
        "test:counting"
    }

    fn run(&self, _channel: &Channel) -> DemoResult<Verification> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(Verification::new())
    }
}

fn dispatcher(svc: Arc<CountingService>) -> Dispatcher {
    Dispatcher::new(Client::new(svc), Registry::standard(), &DemoConfig::default())
}

#[test]
fn unrecognized_channel_never_connects() {
    let svc = Arc::new(CountingService::standard());
    let d = dispatcher(svc.clone());

    let out = d.demo("not_a_record", true);
    assert!(!out.success);
    assert!(out.diagnostics.contains("Channel 'not_a_record' not recognised"));
    assert_eq!(svc.connects(), 0);
}

#[test]
fn reserved_name_bypasses_registry() {
    let calls = Arc::new(AtomicUsize::new(0));
    let registry = Registry::builder()
        .register("multi_channel", CountingVerifier(calls.clone()))
        .build();
    let svc = Arc::new(CountingService::standard());
    let d = Dispatcher::new(Client::new(svc.clone()), registry, &DemoConfig::default());

    let out = d.demo("multi_channel", false);
    assert!(out.success, "{}", out.diagnostics);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let stored = svc.get("multi_channel").unwrap();
    assert_eq!(stored.view::<bool>("isConnected").unwrap(), &[true, true]);
}

#[test]
fn aggregator_with_missing_auxiliary_fails_but_writes() {
    let svc = Arc::new(CountingService::standard());
    svc.inner.remove("double").unwrap();
    let d = dispatcher(svc.clone());

    let out = d.demo("multi_channel", true);
    assert!(!out.success);
    assert!(out.diagnostics.contains("not connected: double"));

    let stored = svc.get("multi_channel").unwrap();
    assert_eq!(stored.view::<String>("channelName").unwrap(), ["long", "double"]);
    assert_eq!(stored.view::<bool>("isConnected").unwrap(), &[true, false]);
    assert_eq!(stored.union_array("value").unwrap()[0].get::<i64>().unwrap(), 0);
}

#[test]
fn aggregator_follows_configured_names() {
    let svc = Arc::new(CountingService::standard());
    let config = DemoConfig::from_json_str(
        r#"{"multi_channel": "agg", "auxiliary_channels": ["int", "string", "short"]}"#,
    )
    .unwrap();
    svc.inner
        .host("agg", ntverify::nt::nt_multi_channel())
        .unwrap();
    let d = Dispatcher::new(Client::new(svc.clone()), Registry::standard(), &config);

    assert!(d.demo("agg", false).success);
    assert_eq!(
        svc.get("agg").unwrap().view::<String>("channelName").unwrap(),
        ["int", "string", "short"]
    );
    // Under a custom config the default name is just an unknown channel.
    assert!(!d.demo("multi_channel", false).success);
}

#[test]
fn unavailable_channel_does_not_stop_the_run() {
    let svc = Arc::new(CountingService::standard());
    svc.inner.remove("uri").unwrap();
    let d = dispatcher(svc);

    let outcomes: Vec<_> = ["uri", "matrix", "table"]
        .iter()
        .map(|name| d.demo(name, false))
        .collect();
    assert!(!outcomes[0].success);
    assert!(outcomes[0].diagnostics.contains("uri"));
    assert!(outcomes[1].success && outcomes[2].success);
}

#[test]
fn every_default_channel_passes_twice() {
    let svc = Arc::new(CountingService::standard());
    let d = dispatcher(svc);
    for _ in 0..2 {
        for name in d.channel_names() {
            let out = d.demo(&name, false);
            assert!(out.success, "{out}: {}", out.diagnostics);
            assert!(out.diagnostics.is_empty());
        }
    }
}

#[test]
fn schema_mismatch_is_reported_as_failure() {
    let svc = Arc::new(CountingService::standard());
    let registry = Registry::builder()
        .register("matrix", UriVerifier::default())
        .build();
    let d = Dispatcher::new(Client::new(svc), registry, &DemoConfig::default());

    let out = d.demo("matrix", false);
    assert!(!out.success);
    assert!(out.diagnostics.contains("Field access error"));
}

#[test]
fn quiet_aggregator_failure_names_missing_channel() {
    let svc = Arc::new(CountingService::standard());
    svc.inner.remove("double").unwrap();
    let d = dispatcher(svc);

    let out = d.demo("multi_channel", false);
    assert!(!out.success);
    assert_eq!(out.diagnostics.trim(), "not connected: double");
}
