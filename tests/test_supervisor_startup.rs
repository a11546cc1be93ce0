use std::sync::Arc;
use std::time::Duration;

use contactdesk::store::{MemoryConnector, MemoryStore};
use contactdesk::{
    AttemptOutcome, ConnectionSupervisor, ContactError, ContactRecord, ContactSubmission,
    DocumentStore, StoreConnector, StoreDescriptor, SupervisorConfig, SupervisorState,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn submission() -> ContactSubmission {
    ContactSubmission {
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        phone: "555-0100".to_string(),
        message: "Hello".to_string(),
    }
}

#[tokio::test(start_paused = true)]
async fn test_unreachable_store_exhausts_after_default_policy() {
    let connector = MemoryConnector::new(MemoryStore::new()).failing_first(u32::MAX);
    let supervisor = ConnectionSupervisor::new(SupervisorConfig::default());

    let started = tokio::time::Instant::now();
    let err = supervisor.supervise(&connector).await.err().unwrap();

    assert_eq!(connector.attempts(), 5);
    // Four waits of 2s between five attempts, none after the last.
    assert_eq!(started.elapsed(), Duration::from_millis(8000));
    assert!(err.is_fatal());
    match err {
        ContactError::ExhaustedRetries {
            attempts,
            last_error,
        } => {
            assert_eq!(attempts, 5);
            assert!(last_error.contains("ECONNREFUSED"));
        }
        other => panic!("expected exhaustion, got {other:?}"),
    }
    assert_eq!(supervisor.state(), SupervisorState::Exhausted { attempts: 5 });
}

#[tokio::test(start_paused = true)]
async fn test_store_recovering_on_third_attempt() {
    let store = MemoryStore::new();
    let connector = MemoryConnector::new(Arc::clone(&store)).failing_first(2);
    let supervisor = Arc::new(ConnectionSupervisor::new(SupervisorConfig::default()));
    let mut states = supervisor.subscribe();

    let started = tokio::time::Instant::now();
    let connected = Arc::clone(&supervisor)
        .spawn(connector)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(started.elapsed(), Duration::from_millis(4000));
    assert_eq!(connected.attempts.len(), 3);
    assert_eq!(
        connected
            .attempts
            .iter()
            .map(|a| a.attempt_number)
            .collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
    assert_eq!(connected.attempts[2].outcome, AttemptOutcome::Success);
    assert_eq!(
        *states.borrow_and_update(),
        SupervisorState::Connected { attempts: 3 }
    );

    // The supervised handle is the same store the connector hands out.
    let handle: Arc<dyn DocumentStore> = connected.handle;
    let record = ContactRecord::new(submission());
    let id = handle.insert_contact(&record).await.unwrap();
    assert_eq!(store.get(&id).unwrap().email, "ada@example.com");
}

#[tokio::test]
async fn test_http_store_connects_after_transient_errors() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/contactdesk"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .with_priority(1)
        .expect(2)
        .mount(&mock)
        .await;
    Mock::given(method("GET"))
        .and(path("/contactdesk"))
        .respond_with(ResponseTemplate::new(200))
        .with_priority(2)
        .expect(1)
        .mount(&mock)
        .await;
    Mock::given(method("POST"))
        .and(path("/contactdesk/contacts"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({"id": "doc-1"})))
        .expect(1)
        .mount(&mock)
        .await;

    let descriptor = StoreDescriptor {
        address: mock.uri(),
        ..StoreDescriptor::default()
    };
    let connector = StoreConnector::from_descriptor(descriptor).unwrap();
    let supervisor =
        ConnectionSupervisor::new(SupervisorConfig::new(5, Duration::from_millis(20)));

    let connected = supervisor.supervise(&connector).await.unwrap();
    assert_eq!(connected.attempts.len(), 3);
    assert!(connected.attempts[0]
        .error
        .as_deref()
        .unwrap()
        .contains("503"));

    let record = ContactRecord::new(submission());
    let id = connected.handle.insert_contact(&record).await.unwrap();
    assert_eq!(id, "doc-1");
}

#[tokio::test]
async fn test_http_store_down_is_fatal() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&mock)
        .await;

    let descriptor = StoreDescriptor {
        address: mock.uri(),
        ..StoreDescriptor::default()
    };
    let connector = StoreConnector::from_descriptor(descriptor).unwrap();
    let supervisor =
        ConnectionSupervisor::new(SupervisorConfig::new(2, Duration::from_millis(10)));

    let err = supervisor.supervise(&connector).await.err().unwrap();
    assert!(matches!(
        err,
        ContactError::ExhaustedRetries { attempts: 2, .. }
    ));
    assert_eq!(err.status_code(), 503);
}
