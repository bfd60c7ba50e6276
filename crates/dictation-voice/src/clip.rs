//! Recorded-clip player.
//!
//! Wraps the platform [`ClipOutput`] the same way [`crate::speech`] wraps
//! the synthesizer: one clip at a time, cancellable, never an error.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio_util::sync::CancellationToken;

use dictation_core::{ClipError, ClipOutput, ClipSource};

/// How a `play` call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipOutcome {
    /// The clip played to its end.
    Completed,

    /// The clip could not start or decode (already logged).
    Failed,

    /// `stop()` or a newer `play` superseded this one.
    Cancelled,

    /// No audio output on this platform.
    Unavailable,
}

struct ActiveClip {
    id: u64,
    source: ClipSource,
    token: CancellationToken,
}

/// Single owner of the platform clip output.
pub struct ClipPlayer {
    output: Arc<dyn ClipOutput>,
    current: Mutex<Option<ActiveClip>>,
    next_id: AtomicU64,
}

impl ClipPlayer {
    pub fn new(output: Arc<dyn ClipOutput>) -> Self {
        Self {
            output,
            current: Mutex::new(None),
            next_id: AtomicU64::new(1),
        }
    }

    /// Whether the platform can play clips at all.
    pub fn is_available(&self) -> bool {
        self.output.is_available()
    }

    /// Play `source` to its end, stopping any clip already playing.
    pub async fn play(&self, source: &ClipSource) -> ClipOutcome {
        if !self.output.is_available() {
            tracing::debug!(%source, "Audio output unavailable; skipping clip");
            return ClipOutcome::Unavailable;
        }

        self.stop();

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();
        *self.lock() = Some(ActiveClip {
            id,
            source: source.clone(),
            token: token.clone(),
        });

        let outcome = tokio::select! {
            biased;
            () = token.cancelled() => ClipOutcome::Cancelled,
            result = self.output.play(source) => match result {
                Ok(()) => ClipOutcome::Completed,
                Err(ClipError::Unavailable) => ClipOutcome::Unavailable,
                Err(e) => {
                    tracing::warn!(error = %e, %source, "Clip playback failed");
                    ClipOutcome::Failed
                }
            },
        };

        self.finish(id);
        outcome
    }

    /// Halt the clip in flight and release its temporary source. Idempotent.
    pub fn stop(&self) {
        let active = self.lock().take();
        if let Some(active) = active {
            active.token.cancel();
            self.output.halt();
            if active.source.is_temporary() {
                self.output.release(&active.source);
            }
            tracing::debug!(id = active.id, source = %active.source, "Clip stopped");
        }
    }

    /// End the scoped acquisition of clip `id` if it is still current.
    fn finish(&self, id: u64) {
        let mut current = self.lock();
        if current.as_ref().is_some_and(|a| a.id == id) {
            let finished = current.take();
            drop(current);
            if let Some(active) = finished.filter(|a| a.source.is_temporary()) {
                self.output.release(&active.source);
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<ActiveClip>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for ClipPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingOutput {
        available: bool,
        fail: bool,
        halts: AtomicUsize,
        released: Mutex<Vec<ClipSource>>,
    }

    #[async_trait]
    impl ClipOutput for RecordingOutput {
        fn is_available(&self) -> bool {
            self.available
        }

        async fn play(&self, source: &ClipSource) -> Result<(), ClipError> {
            if self.fail {
                return Err(ClipError::Decode(source.to_string()));
            }
            tokio::time::sleep(Duration::from_millis(500)).await;
            Ok(())
        }

        fn halt(&self) {
            self.halts.fetch_add(1, Ordering::SeqCst);
        }

        fn release(&self, source: &ClipSource) {
            self.released.lock().unwrap().push(source.clone());
        }
    }

    fn output() -> Arc<RecordingOutput> {
        Arc::new(RecordingOutput {
            available: true,
            ..Default::default()
        })
    }

    #[tokio::test(start_paused = true)]
    async fn natural_completion_releases_blob() {
        let out = output();
        let player = ClipPlayer::new(out.clone());
        let source = ClipSource::parse("blob:abc");

        assert_eq!(player.play(&source).await, ClipOutcome::Completed);
        assert_eq!(*out.released.lock().unwrap(), vec![source]);
        assert_eq!(out.halts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn files_are_never_released() {
        let out = output();
        let player = ClipPlayer::new(out.clone());

        let outcome = player.play(&ClipSource::parse("/tmp/cat.wav")).await;
        assert_eq!(outcome, ClipOutcome::Completed);
        assert!(out.released.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_halts_and_releases() {
        let out = output();
        let player = Arc::new(ClipPlayer::new(out.clone()));
        let source = ClipSource::parse("blob:xyz");

        let task = {
            let player = Arc::clone(&player);
            let source = source.clone();
            tokio::spawn(async move { player.play(&source).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        player.stop();
        player.stop();

        assert_eq!(task.await.unwrap(), ClipOutcome::Cancelled);
        assert_eq!(out.halts.load(Ordering::SeqCst), 1);
        assert_eq!(*out.released.lock().unwrap(), vec![source]);
    }

    #[tokio::test]
    async fn failure_and_unavailable_are_outcomes() {
        let failing = Arc::new(RecordingOutput {
            available: true,
            fail: true,
            ..Default::default()
        });
        let player = ClipPlayer::new(failing);
        assert_eq!(
            player.play(&ClipSource::parse("/missing.wav")).await,
            ClipOutcome::Failed
        );

        let player = ClipPlayer::new(Arc::new(RecordingOutput::default()));
        assert!(!player.is_available());
        assert_eq!(
            player.play(&ClipSource::parse("/a.wav")).await,
            ClipOutcome::Unavailable
        );
    }
}
