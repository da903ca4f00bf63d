//! Read-only user directory: the identity provider owns the accounts, this
//! module keeps the copy used for admin listings and record summaries.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;


pub use domain::{User, UserSummary};
pub use repository::UserStore;
pub use router::user_router;
pub use service::{UserDirectory, UserDirectoryError};
