//! Typed editor forms.
//!
//! Each editor holds one of these records while the user fills it in. A form
//! turns itself into a request payload only when every field rule holds; the
//! rules live on the request types, so all three editors share them.

use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::models::{
    Chat, ChatId, ChatRequest, Group, GroupId, GroupRequest, Record, Terminal, TerminalId,
    TerminalRequest,
};

/// Client-side validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FormError {
    pub field: String,
    pub message: String,
}

impl FormError {
    /// Picks the first failing field in `order`, falling back to any other.
    pub fn from_validation(errors: &ValidationErrors, order: &[&str]) -> Self {
        let field_errors = errors.field_errors();

        let first = order
            .iter()
            .find_map(|field| field_errors.get(*field).map(|errs| (field.to_string(), *errs)))
            .or_else(|| {
                field_errors
                    .iter()
                    .next()
                    .map(|(field, errs)| (field.to_string(), *errs))
            });

        match first {
            Some((field, errs)) => {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {}", field));
                FormError { field, message }
            }
            None => FormError {
                field: String::new(),
                message: "Invalid form".to_string(),
            },
        }
    }
}

/// A typed form backing one collection editor.
pub trait EditorForm: Default {
    type Record: Record;
    type Request: Validate;

    /// Field order used to pick the message shown when several rules fail.
    const FIELD_ORDER: &'static [&'static str];

    /// Identifier of the saved record under edit, if any.
    fn editing(&self) -> Option<&<Self::Record as Record>::Id>;

    /// Copies a saved record into the form and marks it as under edit.
    fn begin_edit(&mut self, record: &Self::Record);

    /// Builds the payload without checking it.
    fn build_request(&self) -> Self::Request;

    /// Builds the payload, applying every field rule.
    fn to_request(&self) -> Result<Self::Request, FormError> {
        let request = self.build_request();
        request
            .validate()
            .map_err(|errors| FormError::from_validation(&errors, Self::FIELD_ORDER))?;
        Ok(request)
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Form state for the terminal editor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TerminalForm {
    pub name: String,
    pub battery_level: i32,
    pub wifi_level: i32,
    pub editing: Option<TerminalId>,
}

impl EditorForm for TerminalForm {
    type Record = Terminal;
    type Request = TerminalRequest;

    const FIELD_ORDER: &'static [&'static str] = &["name", "battery_level", "wifi_level"];

    fn editing(&self) -> Option<&TerminalId> {
        self.editing.as_ref()
    }

    fn begin_edit(&mut self, record: &Terminal) {
        self.name = record.name.clone();
        self.battery_level = record.battery_level;
        self.wifi_level = record.wifi_level;
        self.editing = Some(record.id.clone());
    }

    fn build_request(&self) -> TerminalRequest {
        TerminalRequest {
            name: self.name.clone(),
            battery_level: self.battery_level,
            wifi_level: self.wifi_level,
        }
    }
}

/// Fields shared by the group and chat forms.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentFields {
    pub name: String,
    /// Checked terminals, in the order they were checked.
    pub terminals: Vec<TerminalId>,
    /// `isConnected` for groups, `isActive` for chats.
    pub flag: bool,
}

impl AssignmentFields {
    /// Unchecks the terminal if checked, otherwise appends it.
    pub fn toggle_terminal(&mut self, id: &TerminalId) {
        if let Some(pos) = self.terminals.iter().position(|t| t == id) {
            self.terminals.remove(pos);
        } else {
            self.terminals.push(id.clone());
        }
    }

    pub fn is_checked(&self, id: &TerminalId) -> bool {
        self.terminals.contains(id)
    }

    fn load<'a>(&mut self, name: &str, terminals: impl Iterator<Item = &'a TerminalId>, flag: bool) {
        self.name = name.to_string();
        self.terminals = terminals.cloned().collect();
        self.flag = flag;
    }
}

/// A form that assigns terminals to its record.
pub trait AssignmentForm: EditorForm {
    fn fields(&self) -> &AssignmentFields;

    fn fields_mut(&mut self) -> &mut AssignmentFields;
}

/// Form state for the group editor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupForm {
    pub fields: AssignmentFields,
    pub editing: Option<GroupId>,
}

impl EditorForm for GroupForm {
    type Record = Group;
    type Request = GroupRequest;

    const FIELD_ORDER: &'static [&'static str] = &["terminals", "name"];

    fn editing(&self) -> Option<&GroupId> {
        self.editing.as_ref()
    }

    fn begin_edit(&mut self, record: &Group) {
        self.fields
            .load(&record.name, record.terminal_ids(), record.is_connected);
        self.editing = Some(record.id.clone());
    }

    fn build_request(&self) -> GroupRequest {
        GroupRequest {
            name: self.fields.name.clone(),
            terminals: self.fields.terminals.clone(),
            is_connected: self.fields.flag,
        }
    }
}

impl AssignmentForm for GroupForm {
    fn fields(&self) -> &AssignmentFields {
        &self.fields
    }

    fn fields_mut(&mut self) -> &mut AssignmentFields {
        &mut self.fields
    }
}

/// Form state for the chat editor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatForm {
    pub fields: AssignmentFields,
    pub editing: Option<ChatId>,
}

impl EditorForm for ChatForm {
    type Record = Chat;
    type Request = ChatRequest;

    const FIELD_ORDER: &'static [&'static str] = &["terminals", "name"];

    fn editing(&self) -> Option<&ChatId> {
        self.editing.as_ref()
    }

    fn begin_edit(&mut self, record: &Chat) {
        self.fields
            .load(&record.name, record.terminal_ids(), record.is_active);
        self.editing = Some(record.id.clone());
    }

    fn build_request(&self) -> ChatRequest {
        ChatRequest::new(
            self.fields.name.clone(),
            self.fields.terminals.clone(),
            self.fields.flag,
        )
    }
}

impl AssignmentForm for ChatForm {
    fn fields(&self) -> &AssignmentFields {
        &self.fields
    }

    fn fields_mut(&mut self) -> &mut AssignmentFields {
        &mut self.fields
    }
}
