//! Collection editors.
//!
//! An editor is one screen of the console: it loads its collections, holds a
//! typed form, and submits or deletes through a [`RemoteCollection`]. Every
//! failure is logged and turned into the single message the screen shows.
//!
//! Editors own a [`ViewGuard`]. Once the view is closed, pending requests are
//! abandoned and their results never reach the editor state.

pub mod assignment;
pub mod dashboard;

pub use assignment::{AssignmentEditor, ChatEditor, GroupEditor};
pub use dashboard::DashboardView;

use std::future::Future;
use std::sync::Arc;

use domain::forms::{EditorForm, TerminalForm};
use domain::models::Record;
use tokio_util::sync::CancellationToken;

use crate::client::{RemoteCollection, Resource};
use crate::error::{Action, ConsoleError};

/// Lifetime of one view.
#[derive(Debug, Clone, Default)]
pub struct ViewGuard {
    token: CancellationToken,
}

impl ViewGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Closes the view, abandoning any request still in flight.
    pub fn close(&self) {
        self.token.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Runs `fut` unless the view closes first.
    pub async fn run<T, F>(&self, fut: F) -> Result<T, ConsoleError>
    where
        F: Future<Output = Result<T, ConsoleError>>,
    {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(ConsoleError::Cancelled),
            result = fut => result,
        }
    }
}

/// Editor for a single collection.
pub struct CollectionEditor<F, R>
where
    F: EditorForm,
{
    remote: Arc<R>,
    records: Vec<F::Record>,
    form: F,
    error: Option<String>,
    view: ViewGuard,
}

/// The terminal screen.
pub type TerminalEditor<R> = CollectionEditor<TerminalForm, R>;

impl<F, R> CollectionEditor<F, R>
where
    F: EditorForm,
    F::Record: Resource<Request = F::Request>,
    R: RemoteCollection<F::Record>,
{
    pub fn new(remote: Arc<R>) -> Self {
        Self {
            remote,
            records: Vec::new(),
            form: F::default(),
            error: None,
            view: ViewGuard::new(),
        }
    }

    pub fn remote(&self) -> &Arc<R> {
        &self.remote
    }

    pub fn records(&self) -> &[F::Record] {
        &self.records
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut F {
        &mut self.form
    }

    /// Message to show inline, if the last action failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn view(&self) -> &ViewGuard {
        &self.view
    }

    pub fn close(&self) {
        self.view.close();
    }

    pub fn find(&self, id: &<F::Record as Record>::Id) -> Option<&F::Record> {
        self.records.iter().find(|record| record.id() == id)
    }

    /// Initial load of the screen.
    pub async fn load(&mut self) -> Result<(), ConsoleError> {
        self.fetch(Action::Load).await
    }

    /// Re-fetches the record list.
    pub async fn refresh(&mut self) -> Result<(), ConsoleError> {
        self.fetch(Action::Fetch(<F::Record as Resource>::PLURAL)).await
    }

    async fn fetch(&mut self, action: Action) -> Result<(), ConsoleError> {
        let remote = Arc::clone(&self.remote);
        let result = self.view.run(remote.list()).await;
        match result {
            Ok(records) => {
                self.records = records;
                Ok(())
            }
            Err(e) => Err(self.fail(action, e)),
        }
    }

    /// Copies the saved record with `id` into the form.
    ///
    /// Returns false when no loaded record has that id.
    pub fn begin_edit(&mut self, id: &<F::Record as Record>::Id) -> bool {
        match self.records.iter().find(|record| record.id() == id) {
            Some(record) => {
                self.form.begin_edit(record);
                true
            }
            None => false,
        }
    }

    pub fn reset_form(&mut self) {
        self.form.reset();
    }

    /// Validates the form, then creates or updates the record.
    ///
    /// Once the service accepts the write the form is cleared, then the list
    /// is refreshed. A failed refresh only sets its own message: the record
    /// is saved, so the call still succeeds. Validation failures never reach
    /// the service.
    pub async fn submit(&mut self) -> Result<(), ConsoleError> {
        let action = Action::Save(<F::Record as Record>::ENTITY);

        let request = match self.form.to_request() {
            Ok(request) => request,
            Err(e) => return Err(self.fail(action, ConsoleError::Validation(e))),
        };
        self.error = None;

        let remote = Arc::clone(&self.remote);
        let editing = self.form.editing().cloned();
        let result = match &editing {
            Some(id) => self.view.run(remote.update(id, &request)).await,
            None => self.view.run(remote.create(&request)).await,
        };

        if let Err(e) = result {
            return Err(self.fail(action, e));
        }

        let entity = <F::Record as Record>::ENTITY;
        tracing::info!(entity, id = ?editing, "Saved record");

        self.form.reset();
        if let Err(e) = self.refresh().await {
            tracing::warn!(entity, error = %e, "Saved record but could not refresh the list");
        }
        Ok(())
    }

    /// Deletes the record with `id` and refreshes the list.
    pub async fn delete(&mut self, id: &<F::Record as Record>::Id) -> Result<(), ConsoleError> {
        let action = Action::Delete(<F::Record as Record>::ENTITY);

        let remote = Arc::clone(&self.remote);
        let result = self.view.run(remote.delete(id)).await;
        if let Err(e) = result {
            return Err(self.fail(action, e));
        }

        let entity = <F::Record as Record>::ENTITY;
        tracing::info!(entity, id = %id, "Deleted record");
        self.refresh().await
    }

    /// Records the failure on the screen and hands the error back.
    ///
    /// A closed view is left untouched.
    fn fail(&mut self, action: Action, err: ConsoleError) -> ConsoleError {
        let entity = <F::Record as Record>::ENTITY;

        if matches!(err, ConsoleError::Cancelled) || self.view.is_closed() {
            tracing::debug!(entity, "Dropped result for closed view");
            return err;
        }

        if err.is_validation() {
            tracing::debug!(entity, error = %err, "Form rejected");
        } else {
            tracing::error!(entity, error = %err, ?action, "Action failed");
        }

        self.error = Some(err.user_message(action));
        err
    }
}
