//! Dictation playback controller: the word-by-word state machine.
//!
//! ```text
//!            play                    rep < reps              last word
//!   Idle ─────────► Speaking ───────► Waiting ──► Speaking ... ─────────► Idle
//!    ▲              PlayingClip          │
//!    │                                   │ rep == reps, more words
//!    │                                   └──► Waiting ──► next word, rep 1
//!    └──────────── stop / next / previous / delete (from any state)
//! ```
//!
//! Commands are synchronous and callable from any task. `play()` spawns one
//! driving task per run. Every run carries a generation number, and the
//! driving task only writes state while its generation is still current, so
//! a completion that arrives after `stop()` can never move the index.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use dictation_core::{
    AuthGate, ClipSource, PlaybackPhase, PlaybackSettings, PlaybackSnapshot, SettingsStore, Word,
    WordListStore,
};

use crate::clip::{ClipOutcome, ClipPlayer};
use crate::speech::{SpeakOptions, SpeakOutcome, SpeechEngine};

// ── State ──────────────────────────────────────────────────────────

/// The active driving task of a run.
struct Run {
    token: CancellationToken,
    task: JoinHandle<()>,
}

#[derive(Default)]
struct ControllerState {
    index: usize,
    is_playing: bool,
    phase: PlaybackPhase,
    repetition: u32,
    generation: u64,
    playback_unavailable: bool,
    run: Option<Run>,
}

struct Inner {
    words: Arc<WordListStore>,
    settings: Arc<SettingsStore>,
    speech: SpeechEngine,
    clips: ClipPlayer,
    auth: Arc<dyn AuthGate>,
    state: Mutex<ControllerState>,
    events: watch::Sender<PlaybackSnapshot>,
    unavailable_reported: AtomicBool,
}

// ── Controller ─────────────────────────────────────────────────────

/// Sequences playback of the word list with repetitions and intervals.
///
/// The controller is the only writer of the current index and the
/// is-playing flag. UIs render from [`subscribe`](Self::subscribe).
pub struct PlaybackController {
    inner: Arc<Inner>,
}

impl PlaybackController {
    pub fn new(
        words: Arc<WordListStore>,
        settings: Arc<SettingsStore>,
        speech: SpeechEngine,
        clips: ClipPlayer,
        auth: Arc<dyn AuthGate>,
    ) -> Self {
        let (events, _) = watch::channel(PlaybackSnapshot::default());
        let inner = Arc::new(Inner {
            words,
            settings,
            speech,
            clips,
            auth,
            state: Mutex::new(ControllerState::default()),
            events,
            unavailable_reported: AtomicBool::new(false),
        });
        inner.publish(&inner.lock());
        Self { inner }
    }

    /// Start playing from the current word.
    ///
    /// No-op when signed out, when the list is empty, when already playing,
    /// or when neither speech nor clip output is available.
    pub fn play(&self) {
        let inner = &self.inner;
        if !inner.auth.is_authenticated() {
            tracing::debug!("play ignored: not signed in");
            return;
        }

        let count = inner.words.word_count();
        let mut state = inner.lock();
        if state.is_playing {
            tracing::debug!("play ignored: already playing");
            return;
        }
        if count == 0 {
            tracing::debug!("play ignored: word list is empty");
            return;
        }
        if !inner.speech.is_available() && !inner.clips.is_available() {
            state.playback_unavailable = true;
            if !inner.unavailable_reported.swap(true, Ordering::SeqCst) {
                tracing::error!("No speech engine or audio output available; playback disabled");
            }
            inner.publish(&state);
            return;
        }
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("play ignored: no async runtime");
            return;
        };

        if state.index >= count {
            state.index = 0;
        }
        state.playback_unavailable = false;
        inner.unavailable_reported.store(false, Ordering::SeqCst);
        state.generation += 1;
        state.is_playing = true;
        state.repetition = 0;
        state.phase = PlaybackPhase::Idle;

        let generation = state.generation;
        let start = state.index;
        let token = CancellationToken::new();
        let task = runtime.spawn(Arc::clone(inner).run(generation, start, token.clone()));
        state.run = Some(Run { token, task });
        inner.publish(&state);
        drop(state);

        tracing::info!(index = start, generation, total = count, "Dictation started");
    }

    /// Stop playback immediately. Safe to call at any time, any number of times.
    pub fn stop(&self) {
        self.inner.stop();
    }

    /// Stop and move to the next word. No-op at the last word.
    pub fn next(&self) {
        self.move_by(1);
    }

    /// Stop and move to the previous word. No-op at the first word.
    pub fn previous(&self) {
        self.move_by(-1);
    }

    /// Stop and select the word at `index` (clamped to the list).
    pub fn set_current_index(&self, index: usize) {
        if !self.inner.auth.is_authenticated() {
            return;
        }
        self.inner.stop();
        let mut state = self.inner.lock();
        state.index = clamp_index(index, self.inner.words.word_count());
        self.inner.publish(&state);
    }

    /// Stop and delete the word at `index`.
    ///
    /// Deleting the last word clamps the current index to the new last word.
    /// Deleting any other word leaves the current index unchanged.
    pub fn delete_word(&self, index: usize) -> Option<Word> {
        if !self.inner.auth.is_authenticated() {
            tracing::debug!("delete ignored: not signed in");
            return None;
        }
        self.inner.stop();
        let removed = self.inner.words.remove(index);
        self.refresh();
        if let Some(word) = &removed {
            tracing::debug!(index, word = word.text(), "Deleted word");
        }
        removed
    }

    /// Stop and delete the current word.
    pub fn delete_current_word(&self) -> Option<Word> {
        let index = self.inner.lock().index;
        self.delete_word(index)
    }

    /// Stop and delete every word.
    pub fn delete_all_words(&self) {
        if !self.inner.auth.is_authenticated() {
            tracing::debug!("delete ignored: not signed in");
            return;
        }
        self.inner.stop();
        self.inner.words.clear();
        let mut state = self.inner.lock();
        state.index = 0;
        self.inner.publish(&state);
    }

    /// Re-clamp the index and republish after the word list changed elsewhere.
    pub fn refresh(&self) {
        let mut state = self.inner.lock();
        state.index = clamp_index(state.index, self.inner.words.word_count());
        self.inner.publish(&state);
    }

    /// Current state.
    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.inner.snapshot_of(&self.inner.lock())
    }

    /// Receive every published state change.
    pub fn subscribe(&self) -> watch::Receiver<PlaybackSnapshot> {
        self.inner.events.subscribe()
    }

    pub fn is_playing(&self) -> bool {
        self.inner.lock().is_playing
    }

    pub fn current_index(&self) -> usize {
        self.inner.lock().index
    }

    /// Stop everything. Called on drop as well.
    pub fn shutdown(&self) {
        self.inner.stop();
        tracing::debug!("Playback controller shut down");
    }

    fn move_by(&self, delta: isize) {
        if !self.inner.auth.is_authenticated() {
            return;
        }
        self.inner.stop();

        let count = self.inner.words.word_count();
        let mut state = self.inner.lock();
        let current = clamp_index(state.index, count);
        let target = current
            .checked_add_signed(delta)
            .filter(|&i| i < count)
            .unwrap_or(current);
        if target == state.index {
            tracing::debug!(index = target, "Already at the end of the list");
        }
        state.index = target;
        self.inner.publish(&state);
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.inner.stop();
    }
}

fn clamp_index(index: usize, count: usize) -> usize {
    if count == 0 { 0 } else { index.min(count - 1) }
}

// ── Driving task ───────────────────────────────────────────────────

impl Inner {
    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn snapshot_of(&self, state: &ControllerState) -> PlaybackSnapshot {
        PlaybackSnapshot {
            current_word_index: state.index,
            is_playing: state.is_playing,
            phase: state.phase,
            repetition: state.repetition,
            current_word: self.words.get(state.index),
            total_words: self.words.word_count(),
            playback_unavailable: state.playback_unavailable,
        }
    }

    /// Publish under the state lock so observers never see stale states
    /// arrive out of order.
    fn publish(&self, state: &ControllerState) {
        self.events.send_replace(self.snapshot_of(state));
    }

    fn stop(&self) {
        let mut state = self.lock();
        let was_playing = state.is_playing;
        state.generation += 1;
        state.is_playing = false;
        state.phase = PlaybackPhase::Idle;
        state.repetition = 0;
        let run = state.run.take();
        self.publish(&state);
        let index = state.index;
        drop(state);

        if let Some(run) = run {
            run.token.cancel();
            run.task.abort();
        }
        self.speech.stop();
        self.clips.stop();

        if was_playing {
            tracing::info!(index, "Dictation stopped");
        }
    }

    /// Apply `f` only while run `generation` is still the live one.
    fn update(&self, generation: u64, f: impl FnOnce(&mut ControllerState)) -> bool {
        let mut state = self.lock();
        if state.generation != generation || !state.is_playing {
            return false;
        }
        f(&mut state);
        self.publish(&state);
        true
    }

    async fn run(self: Arc<Self>, generation: u64, start: usize, token: CancellationToken) {
        let mut index = start;
        loop {
            let Some(word) = self.words.get(index) else {
                break;
            };

            let mut repetition = 1;
            loop {
                let settings = self.settings.settings();
                if repetition > settings.effective_repetitions() {
                    break;
                }

                let phase = if word.has_audio() {
                    PlaybackPhase::PlayingClip
                } else {
                    PlaybackPhase::Speaking
                };
                if !self.update(generation, |s| {
                    s.index = index;
                    s.repetition = repetition;
                    s.phase = phase;
                }) {
                    return;
                }

                tracing::debug!(index, repetition, generation, word = word.text(), "Playing word");
                self.play_word(&word, &settings, index, repetition).await;
                if token.is_cancelled() {
                    return;
                }

                let settings = self.settings.settings();
                if repetition >= settings.effective_repetitions() {
                    break;
                }
                if !self.wait(generation, settings.interval_duration(), &token).await {
                    return;
                }
                repetition += 1;
            }

            if index + 1 >= self.words.word_count() {
                break;
            }
            let interval = self.settings.settings().interval_duration();
            if !self.wait(generation, interval, &token).await {
                return;
            }
            index += 1;
        }

        if self.update(generation, |s| {
            s.is_playing = false;
            s.phase = PlaybackPhase::Idle;
            s.repetition = 0;
            s.run = None;
        }) {
            tracing::info!(index, generation, "Dictation finished");
        }
    }

    /// One repetition. Failures count as a played repetition.
    async fn play_word(&self, word: &Word, settings: &PlaybackSettings, index: usize, repetition: u32) {
        if let Some(url) = word.audio_url() {
            let source = ClipSource::parse(url);
            match self.clips.play(&source).await {
                ClipOutcome::Completed | ClipOutcome::Cancelled => {}
                outcome => tracing::warn!(
                    index,
                    repetition,
                    ?outcome,
                    "Clip did not play; counting the repetition as played"
                ),
            }
        } else {
            let options = SpeakOptions::from_settings(settings);
            match self.speech.speak(word.text(), &options).await {
                SpeakOutcome::Completed | SpeakOutcome::Cancelled => {}
                outcome => tracing::warn!(
                    index,
                    repetition,
                    ?outcome,
                    "Speech did not complete; counting the repetition as played"
                ),
            }
        }
    }

    /// Cancellable pause. Returns `false` if the run was stopped.
    async fn wait(&self, generation: u64, interval: Duration, token: &CancellationToken) -> bool {
        if !self.update(generation, |s| s.phase = PlaybackPhase::Waiting) {
            return false;
        }
        tokio::select! {
            biased;
            () = token.cancelled() => false,
            () = tokio::time::sleep(interval) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_index_bounds() {
        assert_eq!(clamp_index(5, 0), 0);
        assert_eq!(clamp_index(5, 3), 2);
        assert_eq!(clamp_index(1, 3), 1);
    }
}
