//! Helpers for tests that touch process environment variables.

use std::fs;
use std::sync::{Mutex, MutexGuard};

use tempfile::TempDir;

/// Serializes tests that read or write `STUDY_*` variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

pub fn lock_env() -> MutexGuard<'static, ()> {
    ENV_MUTEX.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Creates a temporary config directory holding the given files.
pub fn setup_config_dir(files: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    for (name, content) in files {
        fs::write(temp_dir.path().join(name), content).expect("Failed to write config file");
    }
    temp_dir
}

/// Sets or removes environment variables and restores them on drop.
pub struct EnvGuard {
    vars_to_restore: Vec<(String, Option<String>)>,
}

impl EnvGuard {
    pub fn new() -> Self {
        Self {
            vars_to_restore: Vec::new(),
        }
    }

    /// Starts from a clean slate for the loader's own variables.
    pub fn clean() -> Self {
        let mut guard = Self::new();
        guard.remove("STUDY_CONFIG_DIR");
        guard.remove("STUDY_CONFIG_FILE");
        guard.remove("STUDY_APP_ENV");
        guard
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.vars_to_restore
            .push((key.to_string(), std::env::var(key).ok()));
        unsafe {
            std::env::set_var(key, value);
        }
    }

    pub fn remove(&mut self, key: &str) {
        self.vars_to_restore
            .push((key.to_string(), std::env::var(key).ok()));
        unsafe {
            std::env::remove_var(key);
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        // Reverse order so a key touched twice ends at its first saved value
        for (key, original_value) in self.vars_to_restore.iter().rev() {
            unsafe {
                match original_value {
                    Some(value) => std::env::set_var(key, value),
                    None => std::env::remove_var(key),
                }
            }
        }
    }
}
