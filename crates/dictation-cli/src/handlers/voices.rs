//! Voices command handler.
//!
//! Shows which installed voice each pronunciation resolves to, using the
//! same selection the player uses.

use anyhow::Result;

use dictation_core::{Pronunciation, SynthVoice};
use dictation_voice::{SpeechEngine, select_voice};

use crate::bootstrap::CliContext;
use crate::utils::presentation::print_separator;

pub async fn execute(ctx: &CliContext) -> Result<()> {
    let synth = ctx.synthesizer();
    if synth.program().is_none() {
        println!("No speech engine found. Install espeak-ng (or espeak) to hear words read aloud.");
        return Ok(());
    }

    let engine = SpeechEngine::new(synth);
    let voices = wait_for_voices(&engine).await;
    if voices.is_empty() {
        println!("The speech engine reported no voices; its default voice will be used.");
        return Ok(());
    }

    for pronunciation in Pronunciation::ALL {
        let tag = pronunciation.language_tag();
        let chosen = select_voice(&voices, tag).map_or("(engine default)", |v| v.name.as_str());
        println!("{:<10} {tag:<6} -> {chosen}", pronunciation.to_string());
    }

    println!();
    println!("{} voice(s) installed:", voices.len());
    print_separator(40);
    for voice in &voices {
        let marker = if voice.is_default { " (default)" } else { "" };
        println!("{:<24} {}{marker}", voice.name, voice.lang);
    }
    Ok(())
}

/// The voice list, polled the same bounded number of times `speak` would.
async fn wait_for_voices(engine: &SpeechEngine) -> Vec<SynthVoice> {
    let config = engine.config();
    for _ in 0..config.voice_retry_attempts {
        let voices = engine.voices();
        if !voices.is_empty() {
            return voices;
        }
        tokio::time::sleep(config.voice_retry_delay).await;
    }
    engine.voices()
}
