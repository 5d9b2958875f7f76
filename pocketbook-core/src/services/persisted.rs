//! JSON (de)serialization of store entries
//!
//! An entry that no longer parses is removed from the store and reported as
//! absent, so a corrupt record can never block the session. Services pass an
//! optional hook so the front end can record each discard in its event log.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::result::Result;
use crate::ports::KeyValueStore;

/// Called with the store key of every entry discarded as unreadable
pub type DiscardHook = Arc<dyn Fn(&str) + Send + Sync>;

/// Read and parse `key`, discarding it if unparseable
pub(crate) fn load_or_discard<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
    on_discard: Option<&DiscardHook>,
) -> Result<Option<T>> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            eprintln!("[pocketbook] Discarding unreadable '{}' entry: {}", key, e);
            store.remove(key)?;
            if let Some(hook) = on_discard {
                hook(key);
            }
            Ok(None)
        }
    }
}

pub(crate) fn save<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<()> {
    store.set(key, &serde_json::to_string(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;
    use std::sync::Mutex;

    #[test]
    fn test_corrupt_entry_is_removed() {
        let store = MemoryStore::new();
        store.set("users", "{not json").unwrap();

        let users: Option<Vec<String>> = load_or_discard(&store, "users", None).unwrap();
        assert!(users.is_none());
        assert_eq!(store.get("users").unwrap(), None);
    }

    #[test]
    fn test_discard_hook_sees_each_removed_key() {
        let store = MemoryStore::new();
        store.set("currentUser", "{broken").unwrap();
        store.set("theme", "\"dark\"").unwrap();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let hook: DiscardHook = {
            let seen = Arc::clone(&seen);
            Arc::new(move |key: &str| seen.lock().unwrap().push(key.to_string()))
        };

        let user: Option<Vec<String>> =
            load_or_discard(&store, "currentUser", Some(&hook)).unwrap();
        let theme: Option<String> = load_or_discard(&store, "theme", Some(&hook)).unwrap();
        let missing: Option<String> = load_or_discard(&store, "users", Some(&hook)).unwrap();

        assert!(user.is_none());
        assert_eq!(theme.as_deref(), Some("dark"));
        assert!(missing.is_none());
        assert_eq!(*seen.lock().unwrap(), vec!["currentUser".to_string()]);
    }

    #[test]
    fn test_save_then_load() {
        let store = MemoryStore::new();
        save(&store, "numbers", &vec![1, 2, 3]).unwrap();
        let numbers: Option<Vec<i32>> = load_or_discard(&store, "numbers", None).unwrap();
        assert_eq!(numbers, Some(vec![1, 2, 3]));
    }
}
