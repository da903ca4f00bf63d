use std::sync::Arc;

use crate::identity::UserId;
use crate::store::StoreError;

use super::domain::User;
use super::repository::UserStore;

/// Thin facade over the directory store.
pub struct UserDirectory<S> {
    store: Arc<S>,
}

impl<S> UserDirectory<S>
where
    S: UserStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Directory record for a principal, `None` when not provisioned.
    pub fn find(&self, id: &UserId) -> Result<Option<User>, UserDirectoryError> {
        Ok(self.store.user(id)?)
    }

    pub fn list(&self) -> Result<Vec<User>, UserDirectoryError> {
        Ok(self.store.users()?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UserDirectoryError {
    #[error(transparent)]
    Store(#[from] StoreError),
}
