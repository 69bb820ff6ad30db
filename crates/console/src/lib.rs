//! Fleet Console library.
//!
//! Typed client and screens for the terminal/group/chat service:
//! - [`client`]: REST client with session token and request IDs
//! - [`editor`]: collection editors, assignment picklists and the dashboard
//! - [`routes`]: navigable routes and the login guard
//! - [`cli`]: the `fleet-console` command surface

pub mod cli;
pub mod client;
pub mod config;
pub mod editor;
pub mod error;
pub mod logging;
pub mod render;
pub mod routes;
pub mod session;
