//! Platform backends for the speech and clip ports.
//!
//! | Module          | Port                  | Engine                         |
//! |-----------------|-----------------------|--------------------------------|
//! | [`espeak`]      | `SpeechSynthesizer`   | `espeak-ng` / `espeak` process |
//! | [`rodio_clip`]  | `ClipOutput`          | rodio on the audio thread      |
//!
//! Both report themselves unavailable instead of failing construction when
//! the platform lacks the capability, so the controller can degrade.

pub mod espeak;
pub mod rodio_clip;

pub use espeak::EspeakSynthesizer;
pub use rodio_clip::RodioClipOutput;
