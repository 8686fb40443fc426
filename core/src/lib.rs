//! Synchronous client core for the Todoist sync API.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round-trip, making the core fully deterministic and testable.
//!
//! # Design
//! - `TodoistClient` is stateless; it holds only the endpoint URL.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - Sync responses come back as a `TaskSnapshot` whose tasks already carry
//!   `contentHtml` rendered from their Markdown `content`.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod command;
pub mod error;
pub mod http;
pub mod markdown;
pub mod types;

pub use client::TodoistClient;
pub use command::{CommandOutcome, CompleteCommand};
pub use error::ApiError;
pub use http::{HttpRequest, HttpResponse};
pub use markdown::render_markdown;
pub use types::{ClientConfig, ResourceTypes, Task, TaskSnapshot};
