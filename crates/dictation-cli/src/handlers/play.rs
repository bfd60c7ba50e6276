//! Play command handler.
//!
//! Reads the signed-in user's list aloud through the playback controller.
//! Plain runs go from the start word to the end of the list; interactive
//! runs take single-letter commands from stdin:
//!
//! ```text
//!   enter / s   play or stop
//!   n / p       next / previous word
//!   d           delete the current word
//!   q           quit
//! ```
//!
//! Ctrl-C stops playback. In interactive mode a second Ctrl-C while stopped
//! quits.

use std::io::BufRead;

use anyhow::Result;
use tokio::sync::{mpsc, watch};

use dictation_core::{ClipSource, PlaybackPhase, PlaybackSnapshot, Word, WordList};

use crate::bootstrap::{CliContext, Playback};
use crate::error::CliError;
use crate::utils::presentation::format_status;

/// Execute the play command.
///
/// `from` is a 1-based position. With `preload`, recorded clips are read
/// into memory first and played from there.
pub async fn execute(
    ctx: &CliContext,
    from: Option<usize>,
    interactive: bool,
    preload: bool,
) -> Result<()> {
    let user = ctx.require_user()?;
    let mut words = ctx.load_words(&user).await?;
    if words.is_empty() {
        println!("The word list is empty. Add words with 'dictation add <word>'.");
        return Ok(());
    }
    let start = start_index(from, words.len())?;
    let settings = ctx.load_settings(&user).await?;

    let playback = ctx.playback(words.clone(), settings);
    if preload {
        let loaded = preload_clips(&playback).await;
        if loaded > 0 {
            println!("Loaded {loaded} clip(s) into memory.");
        }
    }
    playback.controller.set_current_index(start);

    let result = if interactive {
        run_interactive(ctx, &user, &playback, &mut words).await
    } else {
        run_to_end(&playback).await
    };

    playback.controller.shutdown();
    release_clips(&playback);
    result
}

/// 0-based start index for a 1-based `--from` position.
pub fn start_index(from: Option<usize>, len: usize) -> Result<usize, CliError> {
    match from {
        None => Ok(0),
        Some(position) if (1..=len).contains(&position) => Ok(position - 1),
        Some(position) => Err(CliError::Arguments(format!(
            "--from {position} is out of range (the list has {len} word(s))"
        ))),
    }
}

/// Play once from the current word to the end of the list.
async fn run_to_end(playback: &Playback) -> Result<()> {
    let controller = &playback.controller;
    let mut rx = controller.subscribe();
    controller.play();

    let first = rx.borrow_and_update().clone();
    if first.playback_unavailable {
        return Err(CliError::Core(
            "no speech engine or audio output is available".to_string(),
        )
        .into());
    }
    if !first.is_playing {
        return Ok(());
    }

    let mut progress = Progress::default();
    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = rx.borrow_and_update().clone();
                progress.report(&snapshot);
                if !snapshot.is_playing {
                    println!("Finished.");
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                controller.stop();
                println!("\nStopped at word {}.", controller.current_index() + 1);
                break;
            }
        }
    }
    Ok(())
}

/// A keyboard command in interactive mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Toggle,
    Next,
    Previous,
    Delete,
    Quit,
    Unknown(String),
}

impl Key {
    pub fn parse(line: &str) -> Self {
        match line.trim().to_ascii_lowercase().as_str() {
            "" | "s" | "space" => Self::Toggle,
            "n" => Self::Next,
            "p" => Self::Previous,
            "d" => Self::Delete,
            "q" | "quit" | "exit" => Self::Quit,
            other => Self::Unknown(other.to_string()),
        }
    }
}

async fn run_interactive(
    ctx: &CliContext,
    user: &str,
    playback: &Playback,
    stored: &mut WordList,
) -> Result<()> {
    let controller = &playback.controller;
    let mut rx = controller.subscribe();
    let mut keys = spawn_key_reader();

    println!("Keys: [enter]/s play/stop, n next, p previous, d delete word, q quit");
    println!("{}", format_status(&rx.borrow_and_update()));

    loop {
        tokio::select! {
            key = keys.recv() => {
                let Some(key) = key else { break };
                match key {
                    Key::Toggle if controller.is_playing() => controller.stop(),
                    Key::Toggle => {
                        controller.play();
                        if controller.snapshot().playback_unavailable {
                            println!("No speech engine or audio output is available.");
                        }
                    }
                    Key::Next => controller.next(),
                    Key::Previous => controller.previous(),
                    Key::Delete => delete_current(ctx, user, playback, stored).await?,
                    Key::Quit => break,
                    Key::Unknown(other) => println!("Unknown command '{other}'."),
                }
            }
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                print_transition(&mut rx);
            }
            _ = tokio::signal::ctrl_c() => {
                if controller.is_playing() {
                    controller.stop();
                } else {
                    break;
                }
            }
        }
    }
    Ok(())
}

/// Print the new state when the word, the play state or the repetition changed.
fn print_transition(rx: &mut watch::Receiver<PlaybackSnapshot>) {
    let snapshot = rx.borrow_and_update().clone();
    if snapshot.phase != PlaybackPhase::Waiting {
        println!("{}", format_status(&snapshot));
    }
}

/// Delete the current word from the running list and from storage.
async fn delete_current(
    ctx: &CliContext,
    user: &str,
    playback: &Playback,
    stored: &mut WordList,
) -> Result<()> {
    let controller = &playback.controller;
    let index = controller.current_index();
    let Some(removed) = controller.delete_word(index) else {
        println!("Nothing to delete.");
        return Ok(());
    };
    if let Some(url) = removed.audio_url() {
        if ClipSource::parse(url).is_temporary() {
            playback.registry.revoke(url);
        }
    }
    stored.remove(index);
    ctx.save_words(user, stored).await?;
    println!("✓ Deleted '{}'.", removed.text());
    Ok(())
}

/// Read stdin on a plain thread; tokio's stdin cannot be cancelled on exit.
fn spawn_key_reader() -> mpsc::UnboundedReceiver<Key> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(Key::parse(&line)).is_err() {
                break;
            }
        }
    });
    rx
}

/// Swap file clips for in-memory copies. Returns how many were loaded.
async fn preload_clips(playback: &Playback) -> usize {
    let mut loaded = 0;
    let mut words = Vec::new();
    for word in playback.words.words().iter() {
        let preloaded = match word.audio_url().map(ClipSource::parse) {
            Some(ClipSource::File(path)) => match tokio::fs::read(&path).await {
                Ok(bytes) => {
                    let url = playback.registry.register(bytes);
                    Word::with_audio(word.text(), url).ok()
                }
                Err(e) => {
                    tracing::warn!(error = %e, path = %path.display(), "Clip not preloaded");
                    None
                }
            },
            _ => None,
        };
        if preloaded.is_some() {
            loaded += 1;
        }
        words.push(preloaded.unwrap_or_else(|| word.clone()));
    }
    playback.words.replace(WordList::from_words(words));
    playback.controller.refresh();
    loaded
}

fn release_clips(playback: &Playback) {
    for word in playback.words.words().iter() {
        if let Some(url) = word.audio_url() {
            playback.registry.revoke(url);
        }
    }
}

#[derive(Default)]
struct Progress {
    last: Option<(usize, u32)>,
}

impl Progress {
    /// Print one line per word repetition as it starts.
    fn report(&mut self, snapshot: &PlaybackSnapshot) {
        let audible = matches!(
            snapshot.phase,
            PlaybackPhase::Speaking | PlaybackPhase::PlayingClip
        );
        let key = (snapshot.current_word_index, snapshot.repetition);
        if audible && self.last != Some(key) {
            self.last = Some(key);
            println!("{}", format_status(snapshot));
        }
    }
}
