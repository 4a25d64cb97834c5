//! Process-global environment mutation helpers for tests.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

/// Return the global lock used to serialize environment mutations in tests.
pub fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

// Rust toolchains differ on whether env mutation APIs are `unsafe`.
#[allow(unused_unsafe)]
fn write_var(key: &str, value: Option<&str>) {
    // SAFETY: callers hold `env_lock` while tests mutate the environment.
    unsafe {
        match value {
            Some(value) => std::env::set_var(key, value),
            None => std::env::remove_var(key),
        }
    }
}

/// Overrides a set of environment variables and restores them on drop.
///
/// Hold [`env_lock`] for as long as the guard is alive.
#[derive(Default)]
pub struct ScopedEnv {
    saved: HashMap<String, Option<String>>,
}

impl ScopedEnv {
    /// Start a scope with every key in `keys` removed.
    pub fn clear(keys: &[&str]) -> Self {
        let mut scope = Self::default();
        for key in keys {
            scope.remove(key);
        }
        scope
    }

    /// Set `key=value` for the lifetime of the scope.
    pub fn set(&mut self, key: &str, value: &str) -> &mut Self {
        self.remember(key);
        write_var(key, Some(value));
        self
    }

    /// Remove `key` for the lifetime of the scope.
    pub fn remove(&mut self, key: &str) -> &mut Self {
        self.remember(key);
        write_var(key, None);
        self
    }

    fn remember(&mut self, key: &str) {
        self.saved
            .entry(key.to_string())
            .or_insert_with(|| std::env::var(key).ok());
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (key, previous) in self.saved.drain() {
            write_var(&key, previous.as_deref());
        }
    }
}
