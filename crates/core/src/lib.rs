//! `userdesk-core`: domain model of the user directory console.
//!
//! This crate contains **pure domain** types (no I/O): user records, the
//! roster of the loaded page, its filtered view, and pagination state.

pub mod error;
pub mod id;
pub mod pagination;
pub mod roster;
pub mod user;

pub use error::{DomainError, DomainResult};
pub use id::UserId;
pub use pagination::PaginationState;
pub use roster::{Roster, filter_roster};
pub use user::{UserPatch, UserRecord};
