//! `ClipOutput` backed by rodio on the dedicated audio thread.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::oneshot;

use dictation_core::{ClipError, ClipOutput, ClipSource};

use crate::audio_thread::{AudioThreadHandle, ClipData};
use crate::clip_registry::{ClipBytes, ClipRegistry};

/// Plays clip files and registered `blob:` clips on the default output device.
pub struct RodioClipOutput {
    audio: Option<AudioThreadHandle>,
    registry: Arc<ClipRegistry>,
    /// Blob bytes held while a temporary clip is in use.
    acquired: Mutex<HashMap<String, ClipBytes>>,
}

impl RodioClipOutput {
    /// Open the default output device. Without one the output reports itself
    /// unavailable.
    pub fn open(registry: Arc<ClipRegistry>) -> Self {
        let audio = match AudioThreadHandle::spawn() {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::warn!(error = %e, "No audio output device; recorded clips disabled");
                None
            }
        };
        Self {
            audio,
            registry,
            acquired: Mutex::new(HashMap::new()),
        }
    }

    /// An output with no device, e.g. for headless runs.
    pub fn unavailable(registry: Arc<ClipRegistry>) -> Self {
        Self {
            audio: None,
            registry,
            acquired: Mutex::new(HashMap::new()),
        }
    }

    /// Number of temporary clips currently held.
    pub fn acquired_count(&self) -> usize {
        self.acquired
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn acquire(&self, url: &str) -> Result<ClipBytes, ClipError> {
        let bytes = self
            .registry
            .resolve(url)
            .ok_or_else(|| ClipError::NotFound(url.to_string()))?;
        self.acquired
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.to_string(), Arc::clone(&bytes));
        Ok(bytes)
    }
}

#[async_trait]
impl ClipOutput for RodioClipOutput {
    fn is_available(&self) -> bool {
        self.audio.is_some()
    }

    async fn play(&self, source: &ClipSource) -> Result<(), ClipError> {
        let Some(audio) = &self.audio else {
            return Err(ClipError::Unavailable);
        };

        let data = match source {
            ClipSource::File(path) => ClipData::File(path.clone()),
            ClipSource::Blob(url) => ClipData::Bytes(self.acquire(url)?),
        };

        let (done_tx, done_rx) = oneshot::channel();
        audio
            .play(data, done_tx)
            .map_err(|e| ClipError::Output(e.to_string()))?;

        done_rx
            .await
            .unwrap_or_else(|_| Err(ClipError::Output("clip halted".to_string())))
    }

    fn halt(&self) {
        if let Some(audio) = &self.audio {
            audio.halt();
        }
    }

    fn release(&self, source: &ClipSource) {
        if let ClipSource::Blob(url) = source {
            self.acquired
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(url);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unavailable_output_refuses_play() {
        let output = RodioClipOutput::unavailable(Arc::new(ClipRegistry::new()));
        assert!(!output.is_available());
        let result = output.play(&ClipSource::parse("/tmp/a.wav")).await;
        assert!(matches!(result, Err(ClipError::Unavailable)));
    }

    #[test]
    fn acquire_and_release_blob() {
        let registry = Arc::new(ClipRegistry::new());
        let url = registry.register(vec![0u8; 8]);
        let output = RodioClipOutput::unavailable(Arc::clone(&registry));

        output.acquire(&url).unwrap();
        assert_eq!(output.acquired_count(), 1);

        output.release(&ClipSource::parse(&url));
        assert_eq!(output.acquired_count(), 0);
        assert!(registry.resolve(&url).is_some());
    }

    #[test]
    fn acquire_unknown_blob_is_not_found() {
        let output = RodioClipOutput::unavailable(Arc::new(ClipRegistry::new()));
        assert!(matches!(
            output.acquire("blob:gone"),
            Err(ClipError::NotFound(_))
        ));
    }
}
