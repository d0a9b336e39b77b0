//! One-shot removal of expired refresh-token records.
//!
//! Expiry is always re-checked when a token is presented, so lingering
//! records are harmless; purging only reclaims space.

use crate::db::Database;
use crate::jwt::now_secs;
use tracing::{error, info};

/// Delete every refresh-token record that has expired. Returns the number removed.
pub async fn run_cleanup(db: &Database) -> u64 {
    let now = match now_secs() {
        Ok(now) => now,
        Err(e) => {
            error!(error = %e, "Failed to read the clock");
            return 0;
        }
    };

    match db.tokens().delete_expired(now).await {
        Ok(count) => {
            if count > 0 {
                info!(count, "Cleaned up expired refresh tokens");
            }
            count
        }
        Err(e) => {
            error!(error = %e, "Failed to clean up expired refresh tokens");
            0
        }
    }
}
