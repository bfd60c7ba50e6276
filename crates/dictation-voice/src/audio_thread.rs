//! Dedicated audio output thread. Keeps the `!Send` rodio stream off the async runtime.
//!
//! `rodio::OutputStream` is `!Send` on some platforms. Instead of wrapping it
//! in `unsafe impl Send`, the stream lives on one OS thread for its whole
//! life and the rest of the crate talks to it through [`AudioThreadHandle`],
//! a `Send + Sync` proxy that routes every call through an [`AudioCommand`].

use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use tokio::sync::oneshot;

use dictation_core::ClipError;

use crate::clip_registry::ClipBytes;
use crate::error::VoiceError;

/// Reply sent when a clip ends naturally or fails to start.
pub type ClipDone = oneshot::Sender<Result<(), ClipError>>;

/// Audio data for one clip.
pub enum ClipData {
    /// Decode from a file on disk.
    File(PathBuf),

    /// Decode from registered in-memory bytes.
    Bytes(ClipBytes),
}

// ── Commands ───────────────────────────────────────────────────────

enum AudioCommand {
    /// Replace whatever is playing with a new clip.
    Play { data: ClipData, done: ClipDone },

    /// Stop the current clip (fire-and-forget).
    Halt,

    /// Shut down the audio thread, releasing the output stream.
    Shutdown,
}

// ── Handle (Send + Sync proxy) ─────────────────────────────────────

/// `Send + Sync` handle to the dedicated audio output thread.
pub struct AudioThreadHandle {
    cmd_tx: mpsc::Sender<AudioCommand>,
    thread: Option<thread::JoinHandle<()>>,
}

impl AudioThreadHandle {
    /// Spawn the audio thread and open the default output device on it.
    ///
    /// Errors opening the device are propagated back through a one-shot
    /// init channel.
    pub fn spawn() -> Result<Self, VoiceError> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<AudioCommand>();
        let (init_tx, init_rx) = mpsc::channel::<Result<(), VoiceError>>();

        let thread = thread::Builder::new()
            .name("dictation-audio".into())
            .spawn(move || Self::run(&cmd_rx, &init_tx))
            .map_err(|e| {
                VoiceError::OutputStreamError(format!("failed to spawn audio thread: {e}"))
            })?;

        init_rx.recv().map_err(|_| VoiceError::AudioThreadDied)??;

        Ok(Self {
            cmd_tx,
            thread: Some(thread),
        })
    }

    /// Start playing `data`. `done` fires when it ends naturally or fails.
    ///
    /// If the clip is halted first, `done` is dropped without a value.
    pub fn play(&self, data: ClipData, done: ClipDone) -> Result<(), VoiceError> {
        self.cmd_tx
            .send(AudioCommand::Play { data, done })
            .map_err(|_| VoiceError::AudioThreadDied)
    }

    /// Stop the current clip.
    pub fn halt(&self) {
        let _ = self.cmd_tx.send(AudioCommand::Halt);
    }

    // ── Audio thread event loop ────────────────────────────────────

    fn run(cmd_rx: &mpsc::Receiver<AudioCommand>, init_tx: &mpsc::Sender<Result<(), VoiceError>>) {
        let (stream, handle) = match OutputStream::try_default() {
            Ok(pair) => pair,
            Err(e) => {
                let _ = init_tx.send(Err(VoiceError::OutputStreamError(e.to_string())));
                return;
            }
        };

        if init_tx.send(Ok(())).is_err() {
            return;
        }
        tracing::info!("Audio output initialized on default device");

        let mut current: Option<PlayingClip> = None;

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                AudioCommand::Play { data, done } => {
                    if let Some(previous) = current.take() {
                        previous.stop();
                    }
                    match start_clip(&handle, data) {
                        Ok(sink) => {
                            let clip = PlayingClip::new(sink);
                            clip.watch(done);
                            current = Some(clip);
                        }
                        Err(e) => {
                            let _ = done.send(Err(e));
                        }
                    }
                }

                AudioCommand::Halt => {
                    if let Some(clip) = current.take() {
                        clip.stop();
                    }
                }

                AudioCommand::Shutdown => break,
            }
        }

        if let Some(clip) = current.take() {
            clip.stop();
        }
        drop(stream);
        tracing::debug!("Audio thread shutting down");
    }
}

impl Drop for AudioThreadHandle {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(AudioCommand::Shutdown);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

// ── Playing clip ───────────────────────────────────────────────────

struct PlayingClip {
    sink: Arc<Sink>,
    is_playing: Arc<AtomicBool>,
}

impl PlayingClip {
    fn new(sink: Sink) -> Self {
        Self {
            sink: Arc::new(sink),
            is_playing: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Block a helper thread until the sink drains, then report completion
    /// unless the clip was stopped first.
    fn watch(&self, done: ClipDone) {
        let sink = Arc::clone(&self.sink);
        let is_playing = Arc::clone(&self.is_playing);
        thread::spawn(move || {
            sink.sleep_until_end();
            if is_playing.swap(false, Ordering::SeqCst) {
                tracing::debug!("Clip finished naturally");
                let _ = done.send(Ok(()));
            }
        });
    }

    fn stop(&self) {
        self.is_playing.store(false, Ordering::SeqCst);
        self.sink.stop();
    }
}

fn start_clip(handle: &OutputStreamHandle, data: ClipData) -> Result<Sink, ClipError> {
    let sink = Sink::try_new(handle).map_err(|e| ClipError::Output(e.to_string()))?;

    match data {
        ClipData::File(path) => {
            let file = File::open(&path)
                .map_err(|e| ClipError::NotFound(format!("{}: {e}", path.display())))?;
            let source =
                Decoder::new(BufReader::new(file)).map_err(|e| ClipError::Decode(e.to_string()))?;
            sink.append(source);
        }
        ClipData::Bytes(bytes) => {
            let source =
                Decoder::new(Cursor::new(bytes)).map_err(|e| ClipError::Decode(e.to_string()))?;
            sink.append(source);
        }
    }

    Ok(sink)
}
