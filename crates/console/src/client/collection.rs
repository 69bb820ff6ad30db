//! Remote collections.
//!
//! Terminals, groups and chats share one CRUD shape. [`Resource`] ties a
//! record type to its endpoint and payload; [`RemoteCollection`] is the seam
//! the editors talk through.

use async_trait::async_trait;
use domain::models::{
    Chat, ChatRequest, Group, GroupRequest, Record, Terminal, TerminalRequest,
};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::ApiClient;
use crate::error::ConsoleError;

/// A record type served by one REST collection.
pub trait Resource: Record + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Body sent on create and update.
    type Request: Serialize + Send + Sync;

    /// Collection path, e.g. `/api/grupos`.
    const PATH: &'static str;

    /// Plural noun used in messages.
    const PLURAL: &'static str;

    fn item_path(id: &Self::Id) -> String {
        format!("{}/{}", Self::PATH, id)
    }
}

impl Resource for Terminal {
    type Request = TerminalRequest;

    const PATH: &'static str = "/api/terminales";
    const PLURAL: &'static str = "terminals";
}

impl Resource for Group {
    type Request = GroupRequest;

    const PATH: &'static str = "/api/grupos";
    const PLURAL: &'static str = "groups";
}

impl Resource for Chat {
    type Request = ChatRequest;

    const PATH: &'static str = "/api/chats";
    const PLURAL: &'static str = "chats";
}

/// CRUD operations on one remote collection.
#[async_trait]
pub trait RemoteCollection<T: Resource>: Send + Sync {
    async fn list(&self) -> Result<Vec<T>, ConsoleError>;

    async fn create(&self, body: &T::Request) -> Result<(), ConsoleError>;

    async fn update(&self, id: &T::Id, body: &T::Request) -> Result<(), ConsoleError>;

    async fn delete(&self, id: &T::Id) -> Result<(), ConsoleError>;
}

#[async_trait]
impl<T: Resource> RemoteCollection<T> for ApiClient {
    async fn list(&self) -> Result<Vec<T>, ConsoleError> {
        self.get_json(T::PATH).await
    }

    async fn create(&self, body: &T::Request) -> Result<(), ConsoleError> {
        self.write(Method::POST, T::PATH, Some(body)).await
    }

    async fn update(&self, id: &T::Id, body: &T::Request) -> Result<(), ConsoleError> {
        self.write(Method::PUT, &T::item_path(id), Some(body)).await
    }

    async fn delete(&self, id: &T::Id) -> Result<(), ConsoleError> {
        self.write(Method::DELETE, &T::item_path(id), None::<&()>).await
    }
}
