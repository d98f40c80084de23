//! `userdesk-console`
//!
//! **Responsibility:** Operator console over a remote user directory.
//!
//! This crate provides:
//! - A session store with durable token persistence
//! - A typed client for the directory REST API
//! - The user-list controller (paging, local search, stale-response guard)
//! - Edit and delete workflows that reconcile the roster on acknowledgement
//!
//! The directory is the authority; everything held here is a cache of the
//! currently loaded page.

pub mod client;
pub mod config;
pub mod console;
pub mod error;
pub mod list;
pub mod login;
pub mod mutation;
pub mod notification;
pub mod session;
pub mod shell;
pub mod store;
pub mod types;

#[cfg(test)]
mod testing;

pub use client::{DirectoryApi, DirectoryClient};
pub use config::ConsoleConfig;
pub use console::Console;
pub use error::{ConfigError, ConsoleError, DirectoryError, StoreError, SurfaceError};
pub use list::{FetchOutcome, FetchPhase, FetchTicket, ListController};
pub use login::LoginSurface;
pub use mutation::{DeleteWorkflow, EditForm, EditWorkflow, MutationOutcome, Surface};
pub use notification::{Notification, Notifications, Severity};
pub use session::{MemoryTokenStore, Session, SessionHandle, TokenStore};
pub use shell::Route;
pub use store::SqliteTokenStore;
