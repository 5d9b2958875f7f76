//! Key-value store port - persistence abstraction

use uuid::Uuid;

use crate::domain::result::Result;

/// Well-known keys of the persisted layout
pub mod keys {
    use super::Uuid;

    /// Ordered list of registered users
    pub const USERS: &str = "users";

    /// The logged-in user's identity, absent when logged out
    pub const CURRENT_USER: &str = "currentUser";

    /// `"dark"` or `"light"`
    pub const THEME: &str = "theme";

    /// One user's ledger, budgets, goals and reminders
    pub fn workspace(user_id: Uuid) -> String {
        format!("workspace:{}", user_id)
    }
}

/// String-keyed storage of serialized records
///
/// No transactional guarantees: each call stands alone. Values are JSON
/// documents produced by the services; the store never interprets them.
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` when the key is absent
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or overwrite a value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a key; deleting an absent key is not an error
    fn remove(&self, key: &str) -> Result<()>;

    /// All keys currently stored, sorted
    fn keys(&self) -> Result<Vec<String>>;
}
