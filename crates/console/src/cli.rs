//! Command-line surface of the console.
//!
//! Each command belongs to a route and goes through the login guard before
//! its screen is opened. Commands return their output as text; `main` prints
//! it.

use std::sync::Arc;

use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use domain::forms::{AssignmentForm, ChatForm, GroupForm};
use domain::models::{LoginRequest, Record, Terminal, TerminalId};
use domain::services::TerminalAssignment;
use serde::Serialize;
use thiserror::Error;

use crate::client::auth::login_failure_message;
use crate::client::{ApiClient, Resource};
use crate::config::Config;
use crate::editor::{AssignmentEditor, DashboardView, TerminalEditor};
use crate::error::ConsoleError;
use crate::render;
use crate::routes::{resolve, Navigation, Route};
use crate::session::{Session, SessionStore, StoredSession};

#[derive(Debug, Parser)]
#[command(name = "fleet-console", version)]
#[command(about = "Operator console for terminals, groups and chats")]
#[command(
    after_help = "Environment:\n  FC__SERVICE__BASE_URL   Service base URL\n  RUST_LOG                Log filter override"
)]
pub struct Cli {
    /// Print records as JSON instead of text.
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and store the session token.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "FLEET_CONSOLE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session token.
    Logout,
    /// Show record counts and all three collections.
    Dashboard,
    Terminals {
        #[command(subcommand)]
        command: TerminalCommand,
    },
    Groups {
        #[command(subcommand)]
        command: GroupCommand,
    },
    Chats {
        #[command(subcommand)]
        command: ChatCommand,
    },
}

impl Command {
    pub fn route(&self) -> Route {
        match self {
            Command::Login { .. } | Command::Logout => Route::Login,
            Command::Dashboard => Route::Dashboard,
            Command::Terminals { .. } => Route::Terminals,
            Command::Groups { .. } => Route::Groups,
            Command::Chats { .. } => Route::Chats,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum TerminalCommand {
    List,
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        battery: i32,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        wifi: i32,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, allow_negative_numbers = true)]
        battery: Option<i32>,
        #[arg(long, allow_negative_numbers = true)]
        wifi: Option<i32>,
    },
    Delete {
        id: String,
    },
}

/// Terminals checked in the form.
#[derive(Debug, Clone, Default, Args)]
pub struct Selection {
    /// Terminal to check; repeat for several.
    #[arg(long = "terminal", value_name = "ID")]
    pub terminals: Vec<String>,
}

#[derive(Debug, Subcommand)]
pub enum GroupCommand {
    List,
    /// Show the terminals a group may still take.
    Available {
        /// Group being edited.
        #[arg(long)]
        editing: Option<String>,
        #[command(flatten)]
        selection: Selection,
    },
    Create {
        #[arg(long)]
        name: String,
        #[command(flatten)]
        selection: Selection,
        #[arg(long, default_value_t = false)]
        connected: bool,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        /// Check or uncheck a terminal; repeat for several.
        #[arg(long = "toggle", value_name = "ID")]
        toggle: Vec<String>,
        #[arg(long)]
        connected: Option<bool>,
    },
    Delete {
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum ChatCommand {
    List,
    /// Show the terminals a chat may still take.
    Available {
        /// Chat being edited.
        #[arg(long)]
        editing: Option<String>,
        #[command(flatten)]
        selection: Selection,
    },
    Create {
        #[arg(long)]
        name: String,
        #[command(flatten)]
        selection: Selection,
        #[arg(long, default_value_t = false)]
        active: bool,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        /// Check or uncheck a terminal; repeat for several.
        #[arg(long = "toggle", value_name = "ID")]
        toggle: Vec<String>,
        #[arg(long)]
        active: Option<bool>,
    },
    Delete {
        id: String,
    },
}

/// What a group or chat command asks of its screen.
#[derive(Debug, Clone, PartialEq)]
pub enum AssignmentAction {
    List,
    Available {
        editing: Option<String>,
        checked: Vec<String>,
    },
    Create {
        name: String,
        checked: Vec<String>,
        flag: bool,
    },
    Update {
        id: String,
        name: Option<String>,
        toggle: Vec<String>,
        flag: Option<bool>,
    },
    Delete {
        id: String,
    },
}

impl From<GroupCommand> for AssignmentAction {
    fn from(command: GroupCommand) -> Self {
        match command {
            GroupCommand::List => AssignmentAction::List,
            GroupCommand::Available { editing, selection } => AssignmentAction::Available {
                editing,
                checked: selection.terminals,
            },
            GroupCommand::Create {
                name,
                selection,
                connected,
            } => AssignmentAction::Create {
                name,
                checked: selection.terminals,
                flag: connected,
            },
            GroupCommand::Update {
                id,
                name,
                toggle,
                connected,
            } => AssignmentAction::Update {
                id,
                name,
                toggle,
                flag: connected,
            },
            GroupCommand::Delete { id } => AssignmentAction::Delete { id },
        }
    }
}

impl From<ChatCommand> for AssignmentAction {
    fn from(command: ChatCommand) -> Self {
        match command {
            ChatCommand::List => AssignmentAction::List,
            ChatCommand::Available { editing, selection } => AssignmentAction::Available {
                editing,
                checked: selection.terminals,
            },
            ChatCommand::Create {
                name,
                selection,
                active,
            } => AssignmentAction::Create {
                name,
                checked: selection.terminals,
                flag: active,
            },
            ChatCommand::Update {
                id,
                name,
                toggle,
                active,
            } => AssignmentAction::Update {
                id,
                name,
                toggle,
                flag: active,
            },
            ChatCommand::Delete { id } => AssignmentAction::Delete { id },
        }
    }
}

/// A command that did not complete.
///
/// `message` is what the screen would show; `source` keeps the full error for
/// logs.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CommandFailed {
    pub message: String,
    #[source]
    pub source: ConsoleError,
}

impl CommandFailed {
    fn new(source: ConsoleError, shown: Option<&str>) -> Self {
        Self {
            message: shown.map(str::to_string).unwrap_or_else(|| source.to_string()),
            source,
        }
    }
}

impl From<ConsoleError> for CommandFailed {
    fn from(source: ConsoleError) -> Self {
        Self::new(source, None)
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, CommandFailed> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ConsoleError::Decode(format!("Failed to encode output: {}", e)).into())
}

/// Runs console commands against one service and one stored session.
pub struct Console {
    client: Arc<ApiClient>,
    store: SessionStore,
    json: bool,
}

impl Console {
    pub fn new(client: ApiClient, store: SessionStore, json: bool) -> Self {
        Self {
            client: Arc::new(client),
            store,
            json,
        }
    }

    /// Builds a console from configuration, restoring any stored session.
    pub async fn open(config: &Config, json: bool) -> Result<Self, ConsoleError> {
        let store = SessionStore::new(&config.session.path);
        let session = store.restore().await?;
        let client = ApiClient::new(&config.service, session)?;
        Ok(Self::new(client, store, json))
    }

    pub fn session(&self) -> &Session {
        self.client.session()
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    pub async fn execute(&self, command: Command) -> Result<String, CommandFailed> {
        let route = command.route();
        if let Navigation::Redirect(Route::Login) = resolve(route.path(), self.session()) {
            return Err(CommandFailed {
                message: "Not logged in. Run `fleet-console login` first.".to_string(),
                source: ConsoleError::Unauthenticated,
            });
        }

        tracing::debug!(route = %route, "Running command");

        match command {
            Command::Login { email, password } => self.login(email, password).await,
            Command::Logout => self.logout().await,
            Command::Dashboard => self.dashboard().await,
            Command::Terminals { command } => self.terminals(command).await,
            Command::Groups { command } => {
                self.assignment::<GroupForm>(command.into(), render::groups)
                    .await
            }
            Command::Chats { command } => {
                self.assignment::<ChatForm>(command.into(), render::chats)
                    .await
            }
        }
    }

    async fn login(&self, email: String, password: String) -> Result<String, CommandFailed> {
        let request = LoginRequest { email, password };

        let response = match self.client.login(&request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(email = %request.email, error = %e, "Login failed");
                let message = login_failure_message(&e);
                return Err(CommandFailed::new(e, Some(&message)));
            }
        };

        self.store
            .save(&StoredSession {
                token: response.token,
                email: request.email.clone(),
                logged_in_at: Utc::now(),
            })
            .await?;

        Ok(format!("Logged in as {}", request.email))
    }

    async fn logout(&self) -> Result<String, CommandFailed> {
        self.client.logout();
        self.store.clear().await?;
        Ok("Logged out".to_string())
    }

    async fn dashboard(&self) -> Result<String, CommandFailed> {
        let mut view = DashboardView::new(Arc::clone(&self.client));
        if let Err(e) = view.load().await {
            return Err(CommandFailed::new(e, view.error()));
        }

        if self.json {
            return to_json(&view.summary());
        }
        Ok(render::dashboard(
            &view.summary(),
            view.terminals(),
            view.groups(),
            view.chats(),
        ))
    }

    async fn terminals(&self, command: TerminalCommand) -> Result<String, CommandFailed> {
        let mut editor = TerminalEditor::new(Arc::clone(&self.client));

        let outcome = match command {
            TerminalCommand::List => editor.load().await,
            TerminalCommand::Create {
                name,
                battery,
                wifi,
            } => {
                let form = editor.form_mut();
                form.name = name;
                form.battery_level = battery;
                form.wifi_level = wifi;
                editor.submit().await
            }
            TerminalCommand::Update {
                id,
                name,
                battery,
                wifi,
            } => {
                let id = TerminalId::from(id);
                if let Err(e) = editor.load().await {
                    return Err(CommandFailed::new(e, editor.error()));
                }
                if !editor.begin_edit(&id) {
                    return Err(ConsoleError::not_found(not_found::<Terminal>(&id)).into());
                }

                let form = editor.form_mut();
                if let Some(name) = name {
                    form.name = name;
                }
                if let Some(battery) = battery {
                    form.battery_level = battery;
                }
                if let Some(wifi) = wifi {
                    form.wifi_level = wifi;
                }
                editor.submit().await
            }
            TerminalCommand::Delete { id } => editor.delete(&TerminalId::from(id)).await,
        };

        if let Err(e) = outcome {
            return Err(CommandFailed::new(e, editor.error()));
        }

        if self.json {
            return to_json(editor.records());
        }
        Ok(with_notice(render::terminals(editor.records()), editor.error()))
    }

    async fn assignment<F>(
        &self,
        action: AssignmentAction,
        render_records: fn(&[F::Record]) -> String,
    ) -> Result<String, CommandFailed>
    where
        F: AssignmentForm,
        F::Record: Resource<Request = F::Request>
            + TerminalAssignment<Id = <F::Record as Record>::Id>
            + Serialize,
        <F::Record as Record>::Id: From<String>,
    {
        let mut editor: AssignmentEditor<F, ApiClient> =
            AssignmentEditor::new(Arc::clone(&self.client));

        if let Err(e) = editor.load().await {
            return Err(CommandFailed::new(e, editor.error()));
        }

        let outcome = match action {
            AssignmentAction::List => Ok(()),
            AssignmentAction::Available { editing, checked } => {
                if let Some(id) = editing {
                    let id = <F::Record as Record>::Id::from(id);
                    if !editor.begin_edit(&id) {
                        return Err(ConsoleError::not_found(not_found::<F::Record>(&id)).into());
                    }
                }
                if let Err(e) = check_all(&mut editor, checked) {
                    return Err(CommandFailed::new(e, editor.error()));
                }

                let available = editor.available_terminals();
                if self.json {
                    return to_json(&available);
                }
                return Ok(render::picklist(
                    &available,
                    &editor.form().fields().terminals,
                ));
            }
            AssignmentAction::Create {
                name,
                checked,
                flag,
            } => {
                editor.form_mut().fields_mut().name = name;
                editor.form_mut().fields_mut().flag = flag;
                match check_all(&mut editor, checked) {
                    Ok(()) => editor.submit().await,
                    Err(e) => Err(e),
                }
            }
            AssignmentAction::Update {
                id,
                name,
                toggle,
                flag,
            } => {
                let id = <F::Record as Record>::Id::from(id);
                if !editor.begin_edit(&id) {
                    return Err(ConsoleError::not_found(not_found::<F::Record>(&id)).into());
                }
                let fields = editor.form_mut().fields_mut();
                if let Some(name) = name {
                    fields.name = name;
                }
                if let Some(flag) = flag {
                    fields.flag = flag;
                }
                let toggled = toggle
                    .into_iter()
                    .try_for_each(|terminal| editor.toggle_terminal(&TerminalId::from(terminal)));
                match toggled {
                    Ok(()) => editor.submit().await,
                    Err(e) => Err(e),
                }
            }
            AssignmentAction::Delete { id } => {
                editor.delete(&<F::Record as Record>::Id::from(id)).await
            }
        };

        if let Err(e) = outcome {
            return Err(CommandFailed::new(e, editor.error()));
        }

        if self.json {
            return to_json(editor.records());
        }
        Ok(with_notice(render_records(editor.records()), editor.error()))
    }
}

fn not_found<R: Record>(id: &R::Id) -> String {
    format!("{} {}", R::ENTITY, id)
}

/// Checks every listed terminal that is not checked yet, stopping at the
/// first one the picklist refuses.
fn check_all<F, R>(editor: &mut AssignmentEditor<F, R>, ids: Vec<String>) -> Result<(), ConsoleError>
where
    F: AssignmentForm,
    F::Record: Resource<Request = F::Request> + TerminalAssignment<Id = <F::Record as Record>::Id>,
    R: crate::client::RemoteCollection<F::Record> + crate::client::RemoteCollection<Terminal>,
{
    for id in ids.into_iter().map(TerminalId::from) {
        if !editor.form().fields().is_checked(&id) {
            editor.toggle_terminal(&id)?;
        }
    }
    Ok(())
}

/// Appends the screen's message, if any, below the rendered records.
fn with_notice(rendered: String, notice: Option<&str>) -> String {
    match notice {
        Some(message) => format!("{}\n\n{}", rendered, message),
        None => rendered,
    }
}
