//! Dashboard screen.

use std::sync::Arc;

use domain::models::{Chat, Group, Terminal};
use domain::services::DashboardSummary;

use super::ViewGuard;
use crate::client::RemoteCollection;
use crate::error::{Action, ConsoleError};

/// Read-only overview of all three collections.
pub struct DashboardView<R> {
    remote: Arc<R>,
    terminals: Vec<Terminal>,
    groups: Vec<Group>,
    chats: Vec<Chat>,
    error: Option<String>,
    view: ViewGuard,
}

impl<R> DashboardView<R>
where
    R: RemoteCollection<Terminal> + RemoteCollection<Group> + RemoteCollection<Chat>,
{
    pub fn new(remote: Arc<R>) -> Self {
        Self {
            remote,
            terminals: Vec::new(),
            groups: Vec::new(),
            chats: Vec::new(),
            error: None,
            view: ViewGuard::new(),
        }
    }

    pub fn terminals(&self) -> &[Terminal] {
        &self.terminals
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn chats(&self) -> &[Chat] {
        &self.chats
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn close(&self) {
        self.view.close();
    }

    pub fn summary(&self) -> DashboardSummary {
        DashboardSummary::from_collections(&self.terminals, &self.groups, &self.chats)
    }

    /// Fetches the three collections concurrently.
    ///
    /// All three must succeed; otherwise the previous data stays and the
    /// dashboard shows its error message.
    pub async fn load(&mut self) -> Result<(), ConsoleError> {
        let remote = Arc::clone(&self.remote);
        let terminals = <R as RemoteCollection<Terminal>>::list(&*remote);
        let groups = <R as RemoteCollection<Group>>::list(&*remote);
        let chats = <R as RemoteCollection<Chat>>::list(&*remote);

        let result = self
            .view
            .run(async { tokio::try_join!(terminals, groups, chats) })
            .await;

        match result {
            Ok((terminals, groups, chats)) => {
                self.terminals = terminals;
                self.groups = groups;
                self.chats = chats;
                self.error = None;
                tracing::debug!(summary = ?self.summary(), "Loaded dashboard");
                Ok(())
            }
            Err(ConsoleError::Cancelled) => Err(ConsoleError::Cancelled),
            Err(_) if self.view.is_closed() => Err(ConsoleError::Cancelled),
            Err(e) => {
                tracing::error!(error = %e, "Failed to load dashboard");
                self.error = Some(e.user_message(Action::LoadDashboard));
                Err(e)
            }
        }
    }
}
