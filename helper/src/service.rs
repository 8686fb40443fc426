//! The background helper: turns front-end notifications into sync and
//! command requests and pushes results back to the front-end.
//!
//! # Design
//! - `TodoistHelper` owns the `Session` (held config), the `Transport`, and
//!   the sending half of the outbound channel. Clones share all three.
//! - Every operation is spawned as its own tokio task and returns the
//!   `JoinHandle`; callers may await it or drop it. Nothing serializes
//!   concurrent operations and nothing is retried or timed out.
//! - A fetch closes over the config snapshot it was started with. The refresh
//!   after a completion reads the session again, so it sees any replacement
//!   that landed while the command was in flight.
//! - Non-200 statuses are logged and never reach the front-end.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use todoist_core::{
    ApiError, ClientConfig, CommandOutcome, CompleteCommand, HttpRequest, HttpResponse,
    TodoistClient,
};

use crate::notification::{CompleteTodo, FetchError, Inbound, Outbound};
use crate::session::Session;
use crate::transport::{Transport, TransportError};

pub struct TodoistHelper<T> {
    session: Session,
    transport: Arc<T>,
    events: UnboundedSender<Outbound>,
}

impl<T> Clone for TodoistHelper<T> {
    fn clone(&self) -> Self {
        Self {
            session: self.session.clone(),
            transport: Arc::clone(&self.transport),
            events: self.events.clone(),
        }
    }
}

impl<T: Transport> TodoistHelper<T> {
    pub fn new(transport: T, events: UnboundedSender<Outbound>) -> Self {
        Self::with_session(Session::new(), transport, events)
    }

    pub fn with_session(session: Session, transport: T, events: UnboundedSender<Outbound>) -> Self {
        Self {
            session,
            transport: Arc::new(transport),
            events,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Dispatch one inbound notification.
    pub fn handle(&self, notification: Inbound) -> JoinHandle<()> {
        match notification {
            Inbound::FetchTodoist(config) => {
                let config = self.session.replace(config);
                debug!(?config, "client config replaced");
                self.fetch_snapshot(config)
            }
            Inbound::CompleteTodo(CompleteTodo {
                access_token,
                item_id,
            }) => self.complete_task(access_token, item_id),
        }
    }

    /// Fetch a full snapshot with `config` and emit `TASKS` or `FETCH_ERROR`.
    pub fn fetch_snapshot(&self, config: Arc<ClientConfig>) -> JoinHandle<()> {
        let helper = self.clone();
        tokio::spawn(async move { helper.run_fetch(&config).await })
    }

    /// Complete `item_id` using `access_token`, then refresh with the held
    /// config on success.
    pub fn complete_task(&self, access_token: String, item_id: String) -> JoinHandle<()> {
        let helper = self.clone();
        tokio::spawn(async move { helper.run_complete(&access_token, &item_id).await })
    }

    async fn run_fetch(&self, config: &ClientConfig) {
        let client = TodoistClient::new(config);
        let request = client.build_sync(&config.access_token, &config.resource_types);

        let response = match self.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, endpoint = client.endpoint(), "sync request failed");
                self.emit(Outbound::FetchError(FetchError::new(e)));
                return;
            }
        };

        if config.debug {
            info!(status = response.status, body = %response.body, "sync response");
        }

        match client.parse_sync(response, &config.access_token) {
            Ok(snapshot) => {
                info!(items = snapshot.items.len(), "tasks fetched");
                self.emit(Outbound::Tasks(snapshot));
            }
            Err(ApiError::HttpError { status, .. }) => {
                warn!(status, "Todoist sync request failed");
            }
            Err(e) => {
                error!(error = %e, "malformed sync response");
                self.emit(Outbound::FetchError(FetchError::new(e)));
            }
        }
    }

    async fn run_complete(&self, access_token: &str, item_id: &str) {
        let Some(config) = self.session.current() else {
            warn!(item_id, "no client config held yet; dropping completion");
            return;
        };
        let client = TodoistClient::new(&config);
        let command = CompleteCommand::item_complete(item_id);

        let request = match client.build_complete(access_token, &command) {
            Ok(request) => request,
            Err(e) => {
                error!(item_id, error = %e, "could not build completion request");
                return;
            }
        };

        let response = match self.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                error!(item_id, error = %e, "completion request failed");
                return;
            }
        };

        match client.parse_complete(response, &command) {
            Ok(CommandOutcome::Rejected(detail)) => {
                warn!(item_id, uuid = %command.uuid, %detail, "Todoist rejected completion");
                self.refresh_after_completion(access_token).await;
            }
            Ok(_) => {
                info!(item_id, "task completed");
                self.refresh_after_completion(access_token).await;
            }
            Err(ApiError::HttpError { status, body }) => {
                warn!(item_id, status, %body, "Todoist completion request failed");
            }
            Err(e) => {
                error!(item_id, error = %e, "malformed completion response");
            }
        }
    }

    async fn refresh_after_completion(&self, access_token: &str) {
        let Some(config) = self.session.current() else {
            return;
        };
        if config.access_token != access_token {
            warn!("refreshing with the held access token, which differs from the completion token");
        }
        self.run_fetch(&config).await;
    }

    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let transport = Arc::clone(&self.transport);
        tokio::task::spawn_blocking(move || transport.execute(request))
            .await
            .unwrap_or_else(|e| Err(TransportError::new(format!("transport task failed: {e}"))))
    }

    fn emit(&self, event: Outbound) {
        if self.events.send(event).is_err() {
            debug!("front-end channel closed; dropping notification");
        }
    }
}
