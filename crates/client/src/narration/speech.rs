//! Speech synthesis port.

use async_trait::async_trait;
use thiserror::Error;

/// Voice parameters for narration.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechSettings {
    pub lang: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            lang: "vi-VN".to_string(),
            rate: 0.8,
            pitch: 1.0,
            volume: 1.0,
        }
    }
}

/// Errors from a speech backend.
///
/// The narration queue treats these the same as successful completion; a
/// bad message never stalls the queue.
#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("Speech synthesis unavailable")]
    Unavailable,
    #[error("Speech backend error: {0}")]
    Backend(String),
}

/// A backend that can speak one message to completion.
///
/// `speak` returns when playback has finished (or failed); the queue relies
/// on this to serialize narration on the single audio device.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn speak(&self, message: &str, settings: &SpeechSettings) -> Result<(), SpeechError>;
}

/// Fallback when no speech backend exists: surface the message as a visual
/// alert (here, a log line) instead of audio.
pub struct VisualAlertSynthesizer;

#[async_trait]
impl SpeechSynthesizer for VisualAlertSynthesizer {
    async fn speak(&self, message: &str, _settings: &SpeechSettings) -> Result<(), SpeechError> {
        tracing::warn!("[NARRATION] {}", message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_voice_settings() {
        let settings = SpeechSettings::default();
        assert_eq!(settings.lang, "vi-VN");
        assert!((settings.rate - 0.8).abs() < f32::EPSILON);
        assert!((settings.pitch - 1.0).abs() < f32::EPSILON);
        assert!((settings.volume - 1.0).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_visual_alert_always_completes() {
        let synthesizer = VisualAlertSynthesizer;
        let settings = SpeechSettings::default();
        assert!(synthesizer.speak("Trời tối rồi", &settings).await.is_ok());
    }
}
