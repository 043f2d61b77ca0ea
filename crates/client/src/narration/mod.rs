//! Sequential narration: the audio queue and the speech synthesis port.

pub mod queue;
pub mod speech;

pub use queue::NarrationQueue;
pub use speech::{SpeechError, SpeechSettings, SpeechSynthesizer, VisualAlertSynthesizer};
