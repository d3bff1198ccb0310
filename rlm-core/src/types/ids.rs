//! Entity id generation

use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Retention policy id prefix
pub const POLICY_ID_PREFIX: &str = "RP";
/// Legal hold id prefix
pub const HOLD_ID_PREFIX: &str = "LH";

/// Generates `<prefix>-<unix millis>` ids.
///
/// Timestamps are made strictly increasing per generator so two ids
/// requested within the same millisecond never collide.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last_millis: AtomicI64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id for the given prefix
    pub fn next(&self, prefix: &str) -> String {
        format!("{}-{}", prefix, self.next_millis())
    }

    fn next_millis(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let mut last = self.last_millis.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(last + 1);
            match self.last_millis.compare_exchange_weak(
                last,
                candidate,
                Ordering::SeqCst,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate,
                Err(actual) => last = actual,
            }
        }
    }
}

/// Check that `id` has the form `<prefix>-<digits>`
pub fn is_well_formed(id: &str, prefix: &str) -> bool {
    id.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('-'))
        .map(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
        .unwrap_or(false)
}
