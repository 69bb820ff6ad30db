//! Group and chat screens.
//!
//! Both assign terminals to a record, so both carry the terminal catalog next
//! to their own collection and offer a picklist filtered by availability.
//! Only terminals the picklist offers can be checked or submitted.

use std::sync::Arc;

use domain::forms::{AssignmentForm, ChatForm, EditorForm, FormError, GroupForm};
use domain::models::{Record, Terminal, TerminalId};
use domain::services::{available_terminals, TerminalAssignment};

use super::CollectionEditor;
use crate::client::{RemoteCollection, Resource};
use crate::error::{Action, ConsoleError};

/// Editor for a collection whose records reference terminals.
pub struct AssignmentEditor<F, R>
where
    F: EditorForm,
{
    inner: CollectionEditor<F, R>,
    catalog: Vec<Terminal>,
}

/// The group screen.
pub type GroupEditor<R> = AssignmentEditor<GroupForm, R>;

/// The chat screen.
pub type ChatEditor<R> = AssignmentEditor<ChatForm, R>;

impl<F, R> AssignmentEditor<F, R>
where
    F: AssignmentForm,
    F::Record: Resource<Request = F::Request> + TerminalAssignment<Id = <F::Record as Record>::Id>,
    R: RemoteCollection<F::Record> + RemoteCollection<Terminal>,
{
    pub fn new(remote: Arc<R>) -> Self {
        Self {
            inner: CollectionEditor::new(remote),
            catalog: Vec::new(),
        }
    }

    pub fn records(&self) -> &[F::Record] {
        self.inner.records()
    }

    /// Every terminal known to the service.
    pub fn catalog(&self) -> &[Terminal] {
        &self.catalog
    }

    pub fn form(&self) -> &F {
        self.inner.form()
    }

    pub fn form_mut(&mut self) -> &mut F {
        self.inner.form_mut()
    }

    pub fn error(&self) -> Option<&str> {
        self.inner.error()
    }

    pub fn close(&self) {
        self.inner.close();
    }

    pub fn view(&self) -> &super::ViewGuard {
        self.inner.view()
    }

    /// Loads the records and the terminal catalog concurrently.
    ///
    /// If either request fails, neither result is kept.
    pub async fn load(&mut self) -> Result<(), ConsoleError> {
        let remote = Arc::clone(&self.inner.remote);
        let records = <R as RemoteCollection<F::Record>>::list(&*remote);
        let catalog = <R as RemoteCollection<Terminal>>::list(&*remote);

        let result = self
            .inner
            .view
            .run(async { tokio::try_join!(records, catalog) })
            .await;

        match result {
            Ok((records, catalog)) => {
                tracing::debug!(
                    kind = %<F::Record as TerminalAssignment>::KIND,
                    records = records.len(),
                    terminals = catalog.len(),
                    "Loaded assignment screen"
                );
                self.inner.records = records;
                self.catalog = catalog;
                Ok(())
            }
            Err(e) => Err(self.inner.fail(Action::Load, e)),
        }
    }

    pub async fn refresh(&mut self) -> Result<(), ConsoleError> {
        self.inner.refresh().await
    }

    pub fn begin_edit(&mut self, id: &<F::Record as Record>::Id) -> bool {
        self.inner.begin_edit(id)
    }

    pub fn reset_form(&mut self) {
        self.inner.reset_form();
    }

    /// Checks or unchecks a terminal in the form.
    ///
    /// Unchecking always succeeds. Checking a terminal the picklist does not
    /// offer leaves the form untouched and sets the screen's message.
    pub fn toggle_terminal(&mut self, id: &TerminalId) -> Result<(), ConsoleError> {
        if !self.inner.form().fields().is_checked(id) {
            if let Err(e) = self.assignable(id) {
                return Err(self.reject(e));
            }
        }
        self.inner.form_mut().fields_mut().toggle_terminal(id);
        Ok(())
    }

    /// Whether `id` may be assigned to the record in the form.
    fn assignable(&self, id: &TerminalId) -> Result<(), FormError> {
        let entity = <F::Record as Record>::ENTITY;
        let offered = available_terminals(
            &self.catalog,
            self.inner.records(),
            &[],
            self.inner.form().editing(),
        );
        if offered.iter().any(|terminal| terminal.id == *id) {
            return Ok(());
        }

        let message = if self.catalog.iter().any(|terminal| terminal.id == *id) {
            format!("Terminal {} is already assigned to another {}.", id, entity)
        } else {
            format!("Terminal {} does not exist.", id)
        };
        Err(FormError {
            field: "terminals".to_string(),
            message,
        })
    }

    fn reject(&mut self, err: FormError) -> ConsoleError {
        let action = Action::Save(<F::Record as Record>::ENTITY);
        self.inner.fail(action, ConsoleError::Validation(err))
    }

    /// Terminals the picklist offers for the record in the form.
    pub fn available_terminals(&self) -> Vec<&Terminal> {
        let form = self.inner.form();
        available_terminals(
            &self.catalog,
            self.inner.records(),
            &form.fields().terminals,
            form.editing(),
        )
    }

    /// Submits the form unless it holds a terminal the picklist would not
    /// offer, in which case nothing is sent.
    pub async fn submit(&mut self) -> Result<(), ConsoleError> {
        let unavailable = self
            .inner
            .form()
            .fields()
            .terminals
            .iter()
            .find_map(|id| self.assignable(id).err());
        if let Some(err) = unavailable {
            return Err(self.reject(err));
        }
        self.inner.submit().await
    }

    pub async fn delete(&mut self, id: &<F::Record as Record>::Id) -> Result<(), ConsoleError> {
        self.inner.delete(id).await
    }
}
