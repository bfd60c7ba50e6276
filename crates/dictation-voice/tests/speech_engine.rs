//! Integration tests for the `SpeechEngine` adapter's reliability policy.
//!
//! Covers the safety timeout, supersession, voice selection and the bounded
//! wait for a voice list that loads late.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{FakeSynth, SpeakBehavior, assert_near};
use dictation_voice::{SpeakOptions, SpeakOutcome, SpeechEngine, SpeechEngineConfig};

fn options(tag: &str) -> SpeakOptions {
    SpeakOptions {
        rate: 1.0,
        language_tag: tag.to_string(),
    }
}

#[tokio::test(start_paused = true)]
async fn completes_when_the_engine_finishes() {
    let synth = Arc::new(FakeSynth::new(SpeakBehavior::Finish(Duration::from_millis(700))));
    let engine = SpeechEngine::new(synth.clone());

    assert_eq!(engine.speak("cat", &options("en-US")).await, SpeakOutcome::Completed);
    assert_eq!(synth.cancels(), 0);
}

#[tokio::test(start_paused = true)]
async fn hanging_engine_times_out_and_is_cancelled() {
    let synth = Arc::new(FakeSynth::new(SpeakBehavior::Hang));
    let engine = SpeechEngine::new(synth.clone());
    let start = tokio::time::Instant::now();

    let text = "a".repeat(25);
    let outcome = engine.speak(&text, &options("en-US")).await;

    assert_eq!(outcome, SpeakOutcome::TimedOut);
    assert_near(start.elapsed(), Duration::from_millis(3500));
    assert_eq!(synth.cancels(), 1);
}

#[tokio::test(start_paused = true)]
async fn engine_errors_resolve_as_failed() {
    let synth = Arc::new(FakeSynth::new(SpeakBehavior::Fail));
    let engine = SpeechEngine::new(synth);

    assert_eq!(engine.speak("cat", &options("en-US")).await, SpeakOutcome::Failed);
}

#[tokio::test(start_paused = true)]
async fn unavailable_engine_resolves_without_speaking() {
    let synth = Arc::new(FakeSynth::unavailable());
    let engine = SpeechEngine::new(synth.clone());
    let start = tokio::time::Instant::now();

    assert_eq!(
        engine.speak("cat", &options("en-US")).await,
        SpeakOutcome::Unavailable
    );
    assert_eq!(start.elapsed(), Duration::ZERO);
    assert!(synth.spoken().is_empty());
}

#[tokio::test(start_paused = true)]
async fn newer_utterance_supersedes_the_old_one() {
    let synth = Arc::new(FakeSynth::new(SpeakBehavior::Hang));
    let engine = Arc::new(SpeechEngine::new(synth.clone()));

    let first = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move { engine.speak("first", &options("en-US")).await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;

    let second = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move { engine.speak("second", &options("en-US")).await })
    };

    assert_eq!(first.await.unwrap(), SpeakOutcome::Cancelled);
    assert!(synth.cancels() >= 1);

    engine.stop();
    assert_eq!(second.await.unwrap(), SpeakOutcome::Cancelled);
}

#[tokio::test(start_paused = true)]
async fn stop_is_safe_when_silent_and_cancels_when_speaking() {
    let synth = Arc::new(FakeSynth::new(SpeakBehavior::Hang));
    let engine = Arc::new(SpeechEngine::new(synth.clone()));

    engine.stop();
    assert_eq!(synth.cancels(), 0);

    let task = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move { engine.speak("cat", &options("en-US")).await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;

    engine.stop();
    engine.stop();

    assert_eq!(task.await.unwrap(), SpeakOutcome::Cancelled);
    assert_eq!(synth.cancels(), 1);
}

#[tokio::test(start_paused = true)]
async fn voice_follows_the_language_tag() {
    let synth = Arc::new(FakeSynth::new(SpeakBehavior::Finish(Duration::ZERO)));
    let engine = SpeechEngine::new(synth.clone());

    engine.speak("你好", &options("zh_hk")).await;
    engine.speak("hallo", &options("de-DE")).await;

    let spoken = synth.spoken();
    assert_eq!(spoken[0].utterance.voice.as_deref(), Some("Sin-ji"));
    assert_eq!(spoken[1].utterance.voice.as_deref(), Some("Samantha"));
    assert_eq!(spoken[1].utterance.lang, "de-DE");
}

#[tokio::test(start_paused = true)]
async fn waits_briefly_for_a_late_voice_list() {
    let synth = Arc::new(
        FakeSynth::new(SpeakBehavior::Finish(Duration::ZERO))
            .with_voices_after(Some(Duration::from_millis(250))),
    );
    let engine = SpeechEngine::new(synth.clone());

    engine.speak("cat", &options("en-US")).await;

    let spoken = synth.spoken();
    assert_eq!(spoken[0].utterance.voice.as_deref(), Some("Samantha"));
    assert_near(spoken[0].at, Duration::from_millis(300));
}

#[tokio::test(start_paused = true)]
async fn falls_back_to_engine_default_when_voices_never_load() {
    let synth = Arc::new(
        FakeSynth::new(SpeakBehavior::Finish(Duration::ZERO)).with_voices_after(None),
    );
    let config = SpeechEngineConfig {
        voice_retry_attempts: 3,
        voice_retry_delay: Duration::from_millis(50),
        ..SpeechEngineConfig::default()
    };
    let engine = SpeechEngine::with_config(synth.clone(), config);

    let outcome = engine.speak("cat", &options("zh-CN")).await;

    assert_eq!(outcome, SpeakOutcome::Completed);
    let spoken = synth.spoken();
    assert_eq!(spoken[0].utterance.voice, None);
    assert_eq!(spoken[0].utterance.lang, "zh-CN");
    assert_near(spoken[0].at, Duration::from_millis(150));
}
