//! Nullable whitelist source: an in-memory allow-list.

use quadfund_whitelist::{WhitelistError, WhitelistSource};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Serves a configurable list, counts fetches and can be told to fail.
pub struct NullWhitelistSource {
    members: Mutex<Vec<String>>,
    failing: AtomicBool,
    fetches: AtomicUsize,
}

impl NullWhitelistSource {
    pub fn new<I, T>(members: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            members: Mutex::new(members.into_iter().map(Into::into).collect()),
            failing: AtomicBool::new(false),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Replace the served list.
    pub fn set_members<I, T>(&self, members: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        *self.members.lock().unwrap() = members.into_iter().map(Into::into).collect();
    }

    /// Make subsequent fetches fail (`true`) or succeed (`false`).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// How many times `fetch` has been called.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl WhitelistSource for NullWhitelistSource {
    async fn fetch(&self) -> Result<Vec<String>, WhitelistError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(WhitelistError::Unreachable("null source set to fail".into()));
        }
        let members = self.members.lock().unwrap().clone();
        Ok(members)
    }
}

impl Default for NullWhitelistSource {
    fn default() -> Self {
        Self::new(Vec::<String>::new())
    }
}
