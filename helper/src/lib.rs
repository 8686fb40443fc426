//! Background helper that relays Todoist tasks to a dashboard front-end.
//!
//! # Overview
//! The front-end sends `FETCH_TODOIST` and `COMPLETE_TODO` notifications; the
//! helper answers with `TASKS` or `FETCH_ERROR`. Requests are built and parsed
//! by `todoist-core`; this crate owns the held session config, the network
//! transport, and the asynchronous dispatch.

pub mod config;
pub mod error;
pub mod notification;
pub mod service;
pub mod session;
pub mod transport;

pub use error::{HelperError, Result};
pub use notification::{CompleteTodo, FetchError, Inbound, Outbound};
pub use service::TodoistHelper;
pub use session::Session;
pub use transport::{Transport, TransportError, UreqTransport};
