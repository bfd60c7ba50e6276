//! In-memory store for temporary `blob:` clips.
//!
//! Content input registers recorded bytes here and stores the returned URL
//! on the word. The clip backend resolves the URL when playing. Only the
//! owner of the content revokes a blob; playback never does.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use dictation_core::ports::clip::BLOB_SCHEME;

/// Shared audio bytes behind a `blob:` URL.
pub type ClipBytes = Arc<[u8]>;

/// Registry of temporary clip handles.
#[derive(Debug, Default)]
pub struct ClipRegistry {
    clips: RwLock<HashMap<String, ClipBytes>>,
}

impl ClipRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `bytes` and return a fresh `blob:<uuid>` URL for them.
    pub fn register(&self, bytes: impl Into<ClipBytes>) -> String {
        let url = format!("{BLOB_SCHEME}{}", uuid::Uuid::new_v4());
        self.clips
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.clone(), bytes.into());
        tracing::debug!(%url, "Registered clip");
        url
    }

    /// Bytes behind `url`, if still registered.
    pub fn resolve(&self, url: &str) -> Option<ClipBytes> {
        self.clips
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(url)
            .cloned()
    }

    /// Drop the bytes behind `url`. Returns whether anything was removed.
    pub fn revoke(&self, url: &str) -> bool {
        self.clips
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(url)
            .is_some()
    }

    pub fn len(&self) -> usize {
        self.clips.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_resolve_revoke() {
        let registry = ClipRegistry::new();
        let url = registry.register(vec![1u8, 2, 3]);
        assert!(url.starts_with("blob:"));
        assert_eq!(&*registry.resolve(&url).unwrap(), &[1, 2, 3]);

        assert!(registry.revoke(&url));
        assert!(registry.resolve(&url).is_none());
        assert!(!registry.revoke(&url));
        assert!(registry.is_empty());
    }

    #[test]
    fn urls_are_unique() {
        let registry = ClipRegistry::new();
        let a = registry.register(vec![0u8]);
        let b = registry.register(vec![0u8]);
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
    }
}
