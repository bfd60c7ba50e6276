//! Fake platform backends shared by the integration tests.
//!
//! Both fakes record what they were asked to do, with timestamps taken from
//! the tokio clock so tests running on a paused clock can assert exact
//! schedules.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use dictation_core::{
    AlwaysAuthenticated, AuthGate, ClipError, ClipOutput, ClipSource, PlaybackSettings,
    SettingsStore, SpeechSynthesizer, SynthError, SynthVoice, Utterance, Word, WordList,
    WordListStore,
};
use dictation_voice::{ClipPlayer, PlaybackController, SpeechEngine};

// ── Fake speech synthesizer ────────────────────────────────────────

/// How the fake engine behaves for every utterance.
#[derive(Debug, Clone, Copy)]
pub enum SpeakBehavior {
    /// Finish after the given time. Ignores `cancel`.
    Finish(Duration),
    /// Never report completion.
    Hang,
    /// Report an engine error straight away.
    Fail,
}

/// One recorded `speak` call.
#[derive(Debug, Clone)]
pub struct Spoken {
    pub utterance: Utterance,
    pub at: Duration,
}

pub struct FakeSynth {
    available: AtomicBool,
    pub behavior: SpeakBehavior,
    voices: Vec<SynthVoice>,
    voices_ready_after: Option<Duration>,
    start: Instant,
    spoken: Mutex<Vec<Spoken>>,
    cancels: AtomicUsize,
}

impl FakeSynth {
    pub fn new(behavior: SpeakBehavior) -> Self {
        Self {
            available: AtomicBool::new(true),
            behavior,
            voices: default_voices(),
            voices_ready_after: Some(Duration::ZERO),
            start: Instant::now(),
            spoken: Mutex::new(Vec::new()),
            cancels: AtomicUsize::new(0),
        }
    }

    pub fn unavailable() -> Self {
        let synth = Self::new(SpeakBehavior::Finish(Duration::ZERO));
        synth.set_available(false);
        synth
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Voice list appears only after `delay`; `None` means never.
    pub fn with_voices_after(mut self, delay: Option<Duration>) -> Self {
        self.voices_ready_after = delay;
        self
    }

    pub fn spoken(&self) -> Vec<Spoken> {
        self.spoken.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.spoken().into_iter().map(|s| s.utterance.text).collect()
    }

    pub fn cancels(&self) -> usize {
        self.cancels.load(Ordering::SeqCst)
    }
}

pub fn default_voices() -> Vec<SynthVoice> {
    vec![
        SynthVoice::new("Samantha", "en-US").as_default(),
        SynthVoice::new("Sin-ji", "zh-HK"),
        SynthVoice::new("Ting-Ting", "zh-CN"),
    ]
}

#[async_trait]
impl SpeechSynthesizer for FakeSynth {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn voices(&self) -> Vec<SynthVoice> {
        match self.voices_ready_after {
            Some(delay) if self.start.elapsed() >= delay => self.voices.clone(),
            _ => Vec::new(),
        }
    }

    async fn speak(&self, utterance: &Utterance) -> Result<(), SynthError> {
        self.spoken.lock().unwrap().push(Spoken {
            utterance: utterance.clone(),
            at: self.start.elapsed(),
        });
        match self.behavior {
            SpeakBehavior::Finish(duration) => {
                if !duration.is_zero() {
                    tokio::time::sleep(duration).await;
                }
                Ok(())
            }
            SpeakBehavior::Hang => std::future::pending().await,
            SpeakBehavior::Fail => Err(SynthError::Engine("synthesis-failed".to_string())),
        }
    }

    fn cancel(&self) {
        self.cancels.fetch_add(1, Ordering::SeqCst);
    }
}

// ── Fake clip output ───────────────────────────────────────────────

pub struct FakeClips {
    available: AtomicBool,
    pub duration: Duration,
    plays: Mutex<Vec<ClipSource>>,
    released: Mutex<Vec<ClipSource>>,
    halts: AtomicUsize,
}

impl FakeClips {
    pub fn new(duration: Duration) -> Self {
        Self {
            available: AtomicBool::new(true),
            duration,
            plays: Mutex::new(Vec::new()),
            released: Mutex::new(Vec::new()),
            halts: AtomicUsize::new(0),
        }
    }

    pub fn unavailable() -> Self {
        let clips = Self::new(Duration::ZERO);
        clips.set_available(false);
        clips
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn plays(&self) -> Vec<ClipSource> {
        self.plays.lock().unwrap().clone()
    }

    pub fn released(&self) -> Vec<ClipSource> {
        self.released.lock().unwrap().clone()
    }

    pub fn halts(&self) -> usize {
        self.halts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClipOutput for FakeClips {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn play(&self, source: &ClipSource) -> Result<(), ClipError> {
        self.plays.lock().unwrap().push(source.clone());
        if !self.duration.is_zero() {
            tokio::time::sleep(self.duration).await;
        }
        Ok(())
    }

    fn halt(&self) {
        self.halts.fetch_add(1, Ordering::SeqCst);
    }

    fn release(&self, source: &ClipSource) {
        self.released.lock().unwrap().push(source.clone());
    }
}

// ── Harness ────────────────────────────────────────────────────────

pub struct Harness {
    pub controller: PlaybackController,
    pub synth: Arc<FakeSynth>,
    pub clips: Arc<FakeClips>,
    pub words: Arc<WordListStore>,
    pub settings: Arc<SettingsStore>,
}

pub fn words(texts: &[&str]) -> WordList {
    WordList::from_words(texts.iter().map(|t| Word::new(t).unwrap()))
}

pub fn settings(repetitions: u32, interval: f32) -> PlaybackSettings {
    PlaybackSettings {
        repetitions,
        interval,
        ..PlaybackSettings::with_defaults()
    }
}

pub fn harness(list: WordList, settings: PlaybackSettings, synth: FakeSynth) -> Harness {
    harness_with(
        list,
        settings,
        synth,
        FakeClips::new(Duration::ZERO),
        Arc::new(AlwaysAuthenticated::default()),
    )
}

pub fn harness_with(
    list: WordList,
    settings: PlaybackSettings,
    synth: FakeSynth,
    clips: FakeClips,
    auth: Arc<dyn AuthGate>,
) -> Harness {
    let synth = Arc::new(synth);
    let clips = Arc::new(clips);
    let words = Arc::new(WordListStore::from_list(list));
    let settings = Arc::new(SettingsStore::new(settings));
    let controller = PlaybackController::new(
        Arc::clone(&words),
        Arc::clone(&settings),
        SpeechEngine::new(synth.clone()),
        ClipPlayer::new(clips.clone()),
        auth,
    );
    Harness {
        controller,
        synth,
        clips,
        words,
        settings,
    }
}

/// Wait (on the tokio clock) until the controller reports it is idle.
pub async fn wait_until_idle(controller: &PlaybackController) {
    let mut rx = controller.subscribe();
    tokio::time::timeout(Duration::from_secs(600), rx.wait_for(|s| !s.is_playing))
        .await
        .expect("playback never finished")
        .expect("controller dropped");
}

/// Assert `actual` is `expected` give or take the timer's millisecond rounding.
pub fn assert_near(actual: Duration, expected: Duration) {
    let slack = Duration::from_millis(5);
    assert!(
        actual >= expected && actual <= expected + slack,
        "expected ~{expected:?}, got {actual:?}"
    );
}
