use crate::identity::UserId;
use crate::store::StoreError;

use super::domain::User;

/// Storage abstraction for the user directory. `insert_user` rejects a taken
/// email with `Conflict`; `users` lists newest first.
pub trait UserStore: Send + Sync {
    fn insert_user(&self, user: User) -> Result<User, StoreError>;
    fn user(&self, id: &UserId) -> Result<Option<User>, StoreError>;
    fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    fn users(&self) -> Result<Vec<User>, StoreError>;
}
