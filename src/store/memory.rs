use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use super::DocumentStore;
use crate::error::{ContactError, Result};
use crate::supervisor::Connector;
use crate::types::ContactRecord;

/// In-process store for development and tests. Contents die with the process.
#[derive(Default)]
pub struct MemoryStore {
    records: DashMap<String, ContactRecord>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<ContactRecord> {
        self.records.get(id).map(|r| r.clone())
    }

    /// All records, oldest first.
    pub fn records(&self) -> Vec<ContactRecord> {
        let mut records: Vec<ContactRecord> =
            self.records.iter().map(|r| r.value().clone()).collect();
        records.sort_by_key(|r| r.submitted_at);
        records
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    async fn insert_contact(&self, record: &ContactRecord) -> Result<String> {
        self.records.insert(record.id.clone(), record.clone());
        Ok(record.id.clone())
    }
}

/// Hands out a shared [`MemoryStore`], optionally refusing the first
/// `fail_first` attempts (`memory://?fail=N`) to exercise startup retries.
pub struct MemoryConnector {
    store: Arc<MemoryStore>,
    fail_first: u32,
    attempts: AtomicU32,
}

impl MemoryConnector {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self {
            store,
            fail_first: 0,
            attempts: AtomicU32::new(0),
        }
    }

    pub fn failing_first(mut self, fail_first: u32) -> Self {
        self.fail_first = fail_first;
        self
    }

    pub fn from_address(address: &str) -> Result<Self> {
        let rest = address.strip_prefix("memory://").ok_or_else(|| {
            ContactError::Config(format!("Not a memory store address: {}", address))
        })?;
        let mut connector = Self::new(MemoryStore::new());

        let query = rest.split_once('?').map(|(_, q)| q).unwrap_or("");
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            match pair.split_once('=') {
                Some(("fail", n)) => {
                    let n = n.parse().map_err(|_| {
                        ContactError::Config(format!("Invalid fail count in {}", address))
                    })?;
                    connector = connector.failing_first(n);
                }
                _ => {
                    return Err(ContactError::Config(format!(
                        "Unknown memory store option '{}'",
                        pair
                    )))
                }
            }
        }
        Ok(connector)
    }

    pub fn store(&self) -> Arc<MemoryStore> {
        Arc::clone(&self.store)
    }

    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for MemoryConnector {
    type Handle = Arc<MemoryStore>;

    fn target(&self) -> String {
        "memory://".to_string()
    }

    async fn connect(&self) -> Result<Self::Handle> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt <= self.fail_first {
            return Err(ContactError::Connect("ECONNREFUSED".to_string()));
        }
        Ok(self.store())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ContactSubmission;

    fn record(name: &str) -> ContactRecord {
        ContactRecord::new(ContactSubmission {
            name: name.to_string(),
            email: "a@b.c".to_string(),
            phone: "1".to_string(),
            message: "hi".to_string(),
        })
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = MemoryStore::new();
        let r = record("Ada");
        let id = store.insert_contact(&r).await.unwrap();
        assert_eq!(id, r.id);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&id).unwrap().name, "Ada");
    }

    #[tokio::test]
    async fn test_records_oldest_first() {
        let store = MemoryStore::new();
        let first = record("Ada");
        let mut second = record("Grace");
        second.submitted_at = first.submitted_at + chrono::Duration::seconds(1);

        store.insert_contact(&second).await.unwrap();
        store.insert_contact(&first).await.unwrap();

        let names: Vec<String> = store.records().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Ada", "Grace"]);
    }

    #[tokio::test]
    async fn test_fail_option_refuses_first_attempts() {
        let connector = MemoryConnector::from_address("memory://?fail=2").unwrap();
        assert!(connector.connect().await.is_err());
        assert!(connector.connect().await.is_err());
        assert!(connector.connect().await.is_ok());
        assert_eq!(connector.attempts(), 3);
    }

    #[test]
    fn test_bad_options_rejected() {
        assert!(MemoryConnector::from_address("memory://?fail=x").is_err());
        assert!(MemoryConnector::from_address("memory://?color=red").is_err());
        assert!(MemoryConnector::from_address("http://x").is_err());
    }

    #[tokio::test]
    async fn test_connections_share_one_store() {
        let connector = MemoryConnector::new(MemoryStore::new());
        let a = connector.connect().await.unwrap();
        let b = connector.connect().await.unwrap();
        a.insert_contact(&record("Ada")).await.unwrap();
        assert_eq!(b.len(), 1);
    }
}
