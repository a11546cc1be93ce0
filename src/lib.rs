//! # contactdesk
//!
//! Core of a contact-form backend: submissions are validated, persisted to a
//! document store, then relayed to a spreadsheet and a chat destination by
//! the companion `contactdesk-relay` crate. `contactdesk-http` serves the
//! form endpoint and `contactdesk-server` is the binary.
//!
//! The store connection is established through a [`ConnectionSupervisor`],
//! which retries a fixed number of times with a constant delay and reports
//! exhaustion as a distinguished error the binary turns into a process exit.
//!
//! ```rust,no_run
//! use contactdesk::store::{StoreConnector, StoreDescriptor};
//! use contactdesk::{ConnectionSupervisor, SupervisorConfig};
//!
//! # async fn run() -> contactdesk::Result<()> {
//! let connector = StoreConnector::from_descriptor(StoreDescriptor::from_env())?;
//! let supervisor = ConnectionSupervisor::new(SupervisorConfig::from_env());
//! let connected = supervisor.supervise(&connector).await?;
//! println!("store ready after {} attempts", connected.attempts.len());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod store;
pub mod supervisor;
pub mod types;

pub use error::{ContactError, Result};
pub use store::{DocumentStore, StoreConnector, StoreDescriptor};
pub use supervisor::{
    AttemptOutcome, ConnectionAttempt, ConnectionSupervisor, Connector, Supervised,
    SupervisorConfig, SupervisorState,
};
pub use types::{ContactRecord, ContactSubmission};
