//! `SpeechSynthesizer` backed by the `espeak-ng` (or `espeak`) command.
//!
//! Each utterance runs one child process. Cancelling kills it. The voice
//! list comes from `espeak-ng --voices`, loaded in the background, so it is
//! empty for a short while after construction.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use async_trait::async_trait;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use dictation_core::{SpeechSynthesizer, SynthError, SynthVoice, Utterance};

use crate::error::VoiceError;

/// Binaries tried, in order.
const ENGINE_CANDIDATES: [&str; 2] = ["espeak-ng", "espeak"];

/// espeak's default speaking rate in words per minute.
const BASE_WPM: f32 = 175.0;
const MIN_WPM: f32 = 80.0;
const MAX_WPM: f32 = 450.0;

/// Speech through an espeak child process.
pub struct EspeakSynthesizer {
    program: Option<PathBuf>,
    voices: Arc<RwLock<Vec<SynthVoice>>>,
    current: Mutex<Option<(u64, CancellationToken)>>,
    next_id: AtomicU64,
}

impl EspeakSynthesizer {
    /// Locate espeak on `PATH` and start loading its voices.
    ///
    /// When no binary is found the synthesizer reports itself unavailable.
    pub fn detect() -> Self {
        let program = match find_engine() {
            Ok(path) => {
                tracing::info!(path = %path.display(), "Using speech engine");
                Some(path)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Speech synthesis disabled");
                None
            }
        };
        Self::with_program(program)
    }

    /// Use a specific binary (or none).
    pub fn with_program(program: Option<PathBuf>) -> Self {
        let synth = Self {
            program,
            voices: Arc::new(RwLock::new(Vec::new())),
            current: Mutex::new(None),
            next_id: AtomicU64::new(1),
        };
        if let Some(program) = &synth.program {
            synth.spawn_voice_loader(program.clone());
        }
        synth
    }

    /// Path of the engine binary, if one was found.
    pub fn program(&self) -> Option<&Path> {
        self.program.as_deref()
    }

    fn spawn_voice_loader(&self, program: PathBuf) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::debug!("No async runtime; espeak voice list not loaded");
            return;
        };
        let voices = Arc::clone(&self.voices);
        runtime.spawn(async move {
            match list_voices(&program).await {
                Ok(list) => {
                    tracing::debug!(count = list.len(), "Loaded espeak voices");
                    *voices.write().unwrap_or_else(PoisonError::into_inner) = list;
                }
                Err(e) => tracing::warn!(error = %e, "Failed to list espeak voices"),
            }
        });
    }

    fn clear_current(&self, id: u64) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if current.as_ref().is_some_and(|(active, _)| *active == id) {
            *current = None;
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for EspeakSynthesizer {
    fn is_available(&self) -> bool {
        self.program.is_some()
    }

    fn voices(&self) -> Vec<SynthVoice> {
        self.voices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn speak(&self, utterance: &Utterance) -> Result<(), SynthError> {
        let Some(program) = &self.program else {
            return Err(SynthError::Unavailable);
        };

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();
        let previous = self
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace((id, token.clone()));
        if let Some((_, previous)) = previous {
            previous.cancel();
        }

        let voice = utterance
            .voice
            .clone()
            .unwrap_or_else(|| espeak_voice_for(&utterance.lang));

        let mut child = Command::new(program)
            .arg("-v")
            .arg(&voice)
            .arg("-s")
            .arg(words_per_minute(utterance.rate).to_string())
            .arg("--")
            .arg(&utterance.text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SynthError::Engine(e.to_string()))?;

        let result = tokio::select! {
            status = child.wait() => match status {
                Ok(status) if status.success() => Ok(()),
                Ok(status) => Err(SynthError::Engine(format!("espeak exited with {status}"))),
                Err(e) => Err(SynthError::Engine(e.to_string())),
            },
            () = token.cancelled() => {
                if let Err(e) = child.kill().await {
                    tracing::debug!(error = %e, "espeak already exited");
                }
                Err(SynthError::Interrupted)
            }
        };

        self.clear_current(id);
        result
    }

    fn cancel(&self) {
        let current = self
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some((_, token)) = current {
            token.cancel();
        }
    }
}

/// Find the first espeak binary on `PATH`.
pub fn find_engine() -> Result<PathBuf, VoiceError> {
    for candidate in ENGINE_CANDIDATES {
        if let Ok(path) = which::which(candidate) {
            return Ok(path);
        }
    }
    Err(VoiceError::EngineNotFound(ENGINE_CANDIDATES.join(", ")))
}

async fn list_voices(program: &Path) -> Result<Vec<SynthVoice>, VoiceError> {
    let output = Command::new(program).arg("--voices").output().await?;
    if !output.status.success() {
        return Err(VoiceError::EngineProcess(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }
    Ok(parse_voice_list(&String::from_utf8_lossy(&output.stdout)))
}

/// Parse the table printed by `espeak-ng --voices`.
///
/// ```text
/// Pty Language       Age/Gender VoiceName          File          Other Languages
///  5  en-us           --/M      English_(America)  gmw/en-US     (en 2)
///  5  yue             --/M      Chinese_Cantonese  sit/yue       (zh-yue 5)(zh 8)
/// ```
///
/// The language column doubles as the `-v` argument.
pub fn parse_voice_list(output: &str) -> Vec<SynthVoice> {
    output
        .lines()
        .filter(|line| !line.trim_start().starts_with("Pty"))
        .filter_map(|line| {
            let mut columns = line.split_whitespace();
            let _priority = columns.next()?;
            let code = columns.next()?;
            let voice = SynthVoice::new(code, language_tag_for(code));
            Some(if code == "en" { voice.as_default() } else { voice })
        })
        .collect()
}

/// BCP-47 tag for an espeak language code.
fn language_tag_for(code: &str) -> String {
    match code {
        "yue" | "zh-yue" => "zh-HK".to_string(),
        "cmn" | "zh" | "zh-cmn" => "zh-CN".to_string(),
        _ => code
            .split('-')
            .enumerate()
            .map(|(i, part)| {
                if i == 1 && part.len() == 2 {
                    part.to_ascii_uppercase()
                } else {
                    part.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("-"),
    }
}

/// espeak voice to request when no installed voice was selected.
fn espeak_voice_for(tag: &str) -> String {
    match tag.replace('_', "-").to_ascii_lowercase().as_str() {
        "zh-hk" | "zh-tw" | "yue" => "yue".to_string(),
        "zh-cn" | "zh" | "cmn" => "cmn".to_string(),
        other => other.to_string(),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn words_per_minute(rate: f32) -> u32 {
    let rate = if rate.is_finite() { rate } else { 1.0 };
    (BASE_WPM * rate).clamp(MIN_WPM, MAX_WPM).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Pty Language       Age/Gender VoiceName          File                 Other Languages
 5  af              --/M      Afrikaans          gmw/af
 5  en              --/M      English            gmw/en
 2  en-us           --/M      English_(America)  gmw/en-US            (en 3)
 5  yue             --/M      Chinese_Cantonese  sit/yue              (zh-yue 5)(zh 8)
 5  cmn             --/M      Chinese_Mandarin   sit/cmn              (zh-cmn 5)(zh 5)
";

    #[test]
    fn parses_voice_table() {
        let voices = parse_voice_list(SAMPLE);
        let tags: Vec<_> = voices.iter().map(|v| v.lang.as_str()).collect();
        assert_eq!(tags, vec!["af", "en", "en-US", "zh-HK", "zh-CN"]);
        assert_eq!(voices[3].name, "yue");
        assert!(voices[1].is_default);
        assert_eq!(voices.iter().filter(|v| v.is_default).count(), 1);
    }

    #[test]
    fn maps_tags_to_espeak_voices() {
        assert_eq!(espeak_voice_for("zh-HK"), "yue");
        assert_eq!(espeak_voice_for("zh_CN"), "cmn");
        assert_eq!(espeak_voice_for("en-US"), "en-us");
    }

    #[test]
    fn rate_maps_to_clamped_wpm() {
        assert_eq!(words_per_minute(1.0), 175);
        assert_eq!(words_per_minute(2.0), 350);
        assert_eq!(words_per_minute(0.1), 80);
        assert_eq!(words_per_minute(10.0), 450);
        assert_eq!(words_per_minute(f32::NAN), 175);
    }

    #[tokio::test]
    async fn missing_engine_is_unavailable() {
        let synth = EspeakSynthesizer::with_program(None);
        assert!(!synth.is_available());
        assert!(synth.voices().is_empty());

        let utterance = Utterance {
            text: "cat".to_string(),
            lang: "en-US".to_string(),
            rate: 1.0,
            voice: None,
        };
        assert!(matches!(
            synth.speak(&utterance).await,
            Err(SynthError::Unavailable)
        ));
        synth.cancel();
    }
}
