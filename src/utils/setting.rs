// subtreerestore/src/utils/setting.rs
use postgres::{Client, NoTls};

use crate::config::redact_database_url;

/// Pre-flight connectivity check with the blocking client, before any pool
/// or restore work starts.
pub fn check_db_connection(db_url: &str) -> bool {
    match Client::connect(db_url, NoTls) {
        Ok(_) => {
            println!("✅ Successfully connected to {}", redact_database_url(db_url));
            true
        }
        Err(e) => {
            eprintln!(
                "❌ Failed to connect to {}: {}",
                redact_database_url(db_url),
                e
            );
            false
        }
    }
}
