//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod clock;
mod signals;
mod storage;
mod token;
mod transport;

pub use clock::Clock;
pub use signals::{ActivityKind, EnvironmentEvent, EnvironmentSignals};
pub use storage::{KeyValueStore, StorageError};
pub use token::{Anonymous, TokenSource};
pub use transport::{Transport, TransportError};
