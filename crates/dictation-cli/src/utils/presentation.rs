//! Formatting helpers for terminal output. Format-only; no domain logic.

use dictation_core::{PlaybackPhase, PlaybackSettings, PlaybackSnapshot, Word};

/// Truncates a string to at most `max_chars` characters, adding "..." if needed.
///
/// ```rust
/// use dictation_cli::utils::presentation::truncate_string;
///
/// assert_eq!(truncate_string("Hello", 10), "Hello");
/// assert_eq!(truncate_string("Hello World", 8), "Hello...");
/// ```
pub fn truncate_string(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Print a horizontal separator line.
pub fn print_separator(width: usize) {
    println!("{}", "-".repeat(width));
}

/// One row of `list`: 1-based position, text and the clip if there is one.
pub fn format_word_row(position: usize, word: &Word) -> String {
    match word.audio_url() {
        Some(url) => format!("{position:>4}  {:<30} [clip: {url}]", truncate_string(word.text(), 30)),
        None => format!("{position:>4}  {}", word.text()),
    }
}

pub fn format_settings(settings: &PlaybackSettings) -> String {
    format!(
        "Repetitions:   {}\nInterval:      {}s\nSpeed:         {}x\nPronunciation: {} ({})",
        settings.repetitions,
        settings.interval,
        settings.speed,
        settings.pronunciation,
        settings.pronunciation.language_tag(),
    )
}

/// Single status line for a snapshot, e.g. `[3 of 10] 22% speaking "apple" (2)`.
pub fn format_status(snapshot: &PlaybackSnapshot) -> String {
    let word = snapshot
        .current_word
        .as_ref()
        .map_or_else(String::new, |w| format!(" \"{}\"", w.text()));
    let activity = match snapshot.phase {
        PlaybackPhase::Idle if snapshot.is_playing => "starting",
        PlaybackPhase::Idle => "stopped",
        PlaybackPhase::Speaking => "speaking",
        PlaybackPhase::PlayingClip => "playing clip",
        PlaybackPhase::Waiting => "waiting",
    };
    let repetition = if snapshot.repetition > 0 {
        format!(" ({})", snapshot.repetition)
    } else {
        String::new()
    };
    format!(
        "[{}] {:.0}% {activity}{word}{repetition}",
        snapshot.position_label(),
        snapshot.progress_percent(),
    )
}
