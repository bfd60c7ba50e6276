//! Speech engine adapter.
//!
//! Wraps the single platform [`SpeechSynthesizer`] and turns its loose
//! contract into one cancellable `speak` call:
//!
//! ```text
//!   speak ─► cancel previous ─► resolve voice ─► synth.speak ─┬─► Completed
//!                                 (bounded retries)           ├─► Failed
//!                                                             ├─► TimedOut (safety timer)
//!                                     stop / newer speak ─────┴─► Cancelled
//! ```
//!
//! At most one utterance is in flight. Every superseded utterance gets an
//! engine-level `cancel`, not just a dropped future.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use dictation_core::settings::SPEED_RANGE;
use dictation_core::{PlaybackSettings, SpeechSynthesizer, SynthError, SynthVoice, Utterance};

use crate::voices::select_voice;

// ── Configuration ──────────────────────────────────────────────────

/// Reliability tuning for [`SpeechEngine`].
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechEngineConfig {
    /// Extra attempts to read the voice list when it is still empty.
    pub voice_retry_attempts: u32,

    /// Delay between voice-list attempts.
    pub voice_retry_delay: Duration,

    /// Lower bound of the safety timeout.
    pub min_timeout: Duration,

    /// Fixed part of the safety timeout at rate 1.0.
    pub base_timeout: Duration,

    /// Per-character part of the safety timeout at rate 1.0.
    pub per_char_timeout: Duration,
}

impl Default for SpeechEngineConfig {
    fn default() -> Self {
        Self {
            voice_retry_attempts: 10,
            voice_retry_delay: Duration::from_millis(100),
            min_timeout: Duration::from_secs(2),
            base_timeout: Duration::from_secs(1),
            per_char_timeout: Duration::from_millis(100),
        }
    }
}

impl SpeechEngineConfig {
    /// How long to wait for the engine before forcing resolution.
    ///
    /// `max(min_timeout, (base + per_char * chars) / rate)`.
    pub fn safety_timeout(&self, text: &str, rate: f32) -> Duration {
        let chars = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
        let at_normal_rate = self.base_timeout + self.per_char_timeout.saturating_mul(chars);
        let rate = if rate.is_finite() {
            rate.max(*SPEED_RANGE.start())
        } else {
            1.0
        };
        at_normal_rate.div_f32(rate).max(self.min_timeout)
    }
}

// ── Requests and outcomes ──────────────────────────────────────────

/// Per-call speech parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeakOptions {
    /// Rate multiplier (1.0 = normal).
    pub rate: f32,

    /// BCP-47 tag of the language to speak in.
    pub language_tag: String,
}

impl SpeakOptions {
    pub fn from_settings(settings: &PlaybackSettings) -> Self {
        Self {
            rate: settings.speed,
            language_tag: settings.pronunciation.language_tag().to_string(),
        }
    }
}

/// How a `speak` call ended. Never an error: the caller moves on either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeakOutcome {
    /// The engine finished the utterance.
    Completed,

    /// The engine reported an error (already logged).
    Failed,

    /// `stop()` or a newer `speak` superseded this one.
    Cancelled,

    /// The engine never reported back; the safety timer fired.
    TimedOut,

    /// No speech capability on this platform.
    Unavailable,
}

// ── Engine ─────────────────────────────────────────────────────────

struct ActiveUtterance {
    id: u64,
    token: CancellationToken,
}

/// Single owner of the platform speech synthesizer.
pub struct SpeechEngine {
    synth: Arc<dyn SpeechSynthesizer>,
    config: SpeechEngineConfig,
    current: Mutex<Option<ActiveUtterance>>,
    next_id: AtomicU64,
}

impl SpeechEngine {
    pub fn new(synth: Arc<dyn SpeechSynthesizer>) -> Self {
        Self::with_config(synth, SpeechEngineConfig::default())
    }

    pub fn with_config(synth: Arc<dyn SpeechSynthesizer>, config: SpeechEngineConfig) -> Self {
        Self {
            synth,
            config,
            current: Mutex::new(None),
            next_id: AtomicU64::new(1),
        }
    }

    /// Whether the platform can speak at all.
    pub fn is_available(&self) -> bool {
        self.synth.is_available()
    }

    /// Voices the engine currently reports.
    pub fn voices(&self) -> Vec<SynthVoice> {
        self.synth.voices()
    }

    pub const fn config(&self) -> &SpeechEngineConfig {
        &self.config
    }

    /// Speak `text`, cancelling whatever was being said before.
    pub async fn speak(&self, text: &str, options: &SpeakOptions) -> SpeakOutcome {
        if !self.synth.is_available() {
            tracing::debug!("Speech synthesis unavailable; skipping utterance");
            return SpeakOutcome::Unavailable;
        }

        let (id, token) = self.begin();

        let voice = tokio::select! {
            biased;
            () = token.cancelled() => return SpeakOutcome::Cancelled,
            voice = self.resolve_voice(&options.language_tag) => voice,
        };

        let utterance = Utterance {
            text: text.to_string(),
            lang: options.language_tag.clone(),
            rate: options.rate,
            voice,
        };
        let limit = self.config.safety_timeout(text, options.rate);

        let outcome = tokio::select! {
            biased;
            () = token.cancelled() => SpeakOutcome::Cancelled,
            result = tokio::time::timeout(limit, self.synth.speak(&utterance)) => match result {
                Ok(Ok(())) => SpeakOutcome::Completed,
                Ok(Err(SynthError::Interrupted)) => SpeakOutcome::Cancelled,
                Ok(Err(SynthError::Unavailable)) => SpeakOutcome::Unavailable,
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, text, "Speech engine reported an error");
                    SpeakOutcome::Failed
                }
                Err(_) => {
                    tracing::warn!(?limit, text, "Speech engine never finished; forcing completion");
                    SpeakOutcome::TimedOut
                }
            },
        };

        self.finish(id, outcome == SpeakOutcome::TimedOut);
        outcome
    }

    /// Cancel the utterance in flight, if any. Idempotent.
    pub fn stop(&self) {
        let active = self.lock().take();
        if let Some(active) = active {
            active.token.cancel();
            self.synth.cancel();
            tracing::debug!(id = active.id, "Utterance cancelled");
        }
    }

    /// Register a new utterance, cancelling the previous one.
    fn begin(&self) -> (u64, CancellationToken) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();
        let previous = self.lock().replace(ActiveUtterance {
            id,
            token: token.clone(),
        });
        if let Some(previous) = previous {
            previous.token.cancel();
            self.synth.cancel();
            tracing::debug!(id = previous.id, "Utterance superseded");
        }
        (id, token)
    }

    /// Clear the active slot if it still belongs to utterance `id`.
    fn finish(&self, id: u64, cancel_engine: bool) {
        let mut current = self.lock();
        if current.as_ref().is_some_and(|a| a.id == id) {
            *current = None;
            drop(current);
            if cancel_engine {
                self.synth.cancel();
            }
        }
    }

    /// Voice for `tag`, waiting a bounded time for the voice list to load.
    async fn resolve_voice(&self, tag: &str) -> Option<String> {
        for attempt in 0..=self.config.voice_retry_attempts {
            let voices = self.synth.voices();
            if !voices.is_empty() {
                return select_voice(&voices, tag).map(|v| v.name.clone());
            }
            if attempt < self.config.voice_retry_attempts {
                tokio::time::sleep(self.config.voice_retry_delay).await;
            }
        }
        tracing::debug!(tag, "Voice list still empty; using engine default voice");
        None
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<ActiveUtterance>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for SpeechEngine {
    fn drop(&mut self) {
        self.stop();
    }
}
