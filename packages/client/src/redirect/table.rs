use std::sync::{Mutex, MutexGuard, PoisonError};

use hashbrown::HashMap;
use url::Url;

/// Memo of 301 redirects keyed by the original URL
///
/// Entries live as long as the session; nothing is ever evicted.
#[derive(Debug, Default)]
pub struct PermanentRedirectTable {
    targets: Mutex<HashMap<String, Url>>,
}

impl PermanentRedirectTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Url>> {
        self.targets.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, url: &Url) -> Option<Url> {
        self.lock().get(url.as_str()).cloned()
    }

    pub fn insert(&self, from: &Url, to: Url) {
        tracing::debug!(
            target: "sofa_client::redirect",
            from = %from,
            to = %to,
            "Recorded permanent redirect"
        );
        self.lock().insert(from.as_str().to_owned(), to);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_target_is_returned() {
        let table = PermanentRedirectTable::new();
        let from = Url::parse("http://a.example/old").expect("url");
        let to = Url::parse("http://a.example/new").expect("url");
        assert!(table.get(&from).is_none());
        table.insert(&from, to.clone());
        assert_eq!(table.get(&from), Some(to));
        assert_eq!(table.len(), 1);
    }
}
