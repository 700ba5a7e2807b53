//! CLI command handlers.
//!
//! Each command is implemented in its own submodule. Data commands share the
//! login gate and the class loading below.

pub mod attendance;
pub mod config;
pub mod report;
pub mod stats;
pub mod student;

use crate::args::ClassSection;
use school_attendance::config::Config;
use school_attendance::core::store::{load_into, ClassFileStore};
use school_attendance::core::{Result, Session, StudentRegistry};
use school_attendance::verbose;
use std::io::{self, Write};

/// Store configured from the `[storage]` section
pub fn open_store(config: &Config) -> ClassFileStore {
    ClassFileStore::new(&config.storage.data_dir)
        .with_backups(config.storage.backup_on_save)
        .with_stats(config.storage.write_stats)
}

/// Log in with the given password, or prompt for one
///
/// # Errors
/// Returns `Unauthorized` when the password does not match
pub fn login(password: Option<&str>, config: &Config) -> Result<Session> {
    if let Some(password) = password {
        return Session::login(password, &config.auth.password);
    }
    print!("Password: ");
    io::stdout().flush().ok();
    let mut response = String::new();
    io::stdin().read_line(&mut response).ok();
    Session::login(response.trim_end_matches(['\r', '\n']), &config.auth.password)
}

/// Registry holding the stored students of one class and section
///
/// # Errors
/// Propagates load failures
pub fn load_class(store: &ClassFileStore, target: ClassSection) -> Result<StudentRegistry> {
    let mut registry = StudentRegistry::new();
    let count = load_into(store, &mut registry, target.class, target.section)?;
    verbose!(
        "Loaded {count} students for class {}-{}",
        target.class,
        target.section
    );
    Ok(registry)
}
