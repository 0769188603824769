//! Text-to-speech playback.
//!
//! Playback is fire-and-forget: a failure is logged and otherwise ignored.
//! Desktop speech goes through whichever system synthesizer is installed.

use std::process::{Child, Command, Stdio};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Synthesizers probed in order when no command is configured.
const CANDIDATE_PROGRAMS: &[&str] = &["espeak-ng", "espeak", "say"];

/// Words per minute at rate 1.0 for espeak and say.
const BASE_WORDS_PER_MINUTE: f32 = 175.0;

/// Playback settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechOptions {
    /// Speed multiplier, 1.0 is normal. Slower helps learners.
    pub rate: f32,
    /// 0.0 to 1.0
    pub volume: f32,
    /// Pitch multiplier, 1.0 is normal.
    pub pitch: f32,
    /// Language tag such as "en-US".
    pub lang: String,
}

impl Default for SpeechOptions {
    fn default() -> Self {
        Self {
            rate: 0.6,
            volume: 1.0,
            pitch: 1.0,
            lang: "en-US".to_string(),
        }
    }
}

/// Something that can read words aloud.
pub trait Speaker {
    /// Start speaking `text`, interrupting anything already playing.
    fn speak(&self, text: &str, options: &SpeechOptions);

    fn stop(&self);

    fn is_supported(&self) -> bool;
}

/// Speaker used when speech is disabled or no synthesizer exists.
#[derive(Debug, Default)]
pub struct SilentSpeaker;

impl Speaker for SilentSpeaker {
    fn speak(&self, text: &str, _options: &SpeechOptions) {
        debug!(text, "Speech unavailable, skipping playback");
    }

    fn stop(&self) {}

    fn is_supported(&self) -> bool {
        false
    }
}

/// Speaks by spawning a system synthesizer program.
pub struct CommandSpeaker {
    program: String,
    playing: Mutex<Option<Child>>,
}

impl CommandSpeaker {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            playing: Mutex::new(None),
        }
    }

    /// First known synthesizer found on `PATH`.
    pub fn detect() -> Option<Self> {
        CANDIDATE_PROGRAMS
            .iter()
            .find(|program| on_path(program))
            .map(|program| Self::new(*program))
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Command-line arguments for `text` in the synthesizer's dialect.
    pub fn args(&self, text: &str, options: &SpeechOptions) -> Vec<String> {
        let wpm = ((BASE_WORDS_PER_MINUTE * options.rate).round() as u32).max(80);
        let name = std::path::Path::new(&self.program)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.program);

        match name {
            "say" => vec!["-r".into(), wpm.to_string(), text.to_string()],
            "espeak" | "espeak-ng" => {
                let amplitude = (options.volume.clamp(0.0, 1.0) * 100.0).round() as u32;
                let pitch = (options.pitch * 50.0).clamp(0.0, 99.0).round() as u32;
                vec![
                    "-v".into(),
                    espeak_voice(&options.lang),
                    "-s".into(),
                    wpm.to_string(),
                    "-a".into(),
                    amplitude.to_string(),
                    "-p".into(),
                    pitch.to_string(),
                    text.to_string(),
                ]
            }
            _ => vec![text.to_string()],
        }
    }
}

impl Speaker for CommandSpeaker {
    fn speak(&self, text: &str, options: &SpeechOptions) {
        self.stop();

        let spawned = Command::new(&self.program)
            .args(self.args(text, options))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        match spawned {
            Ok(child) => {
                debug!(program = %self.program, text, "Started playback");
                if let Ok(mut playing) = self.playing.lock() {
                    *playing = Some(child);
                }
            }
            Err(e) => warn!(program = %self.program, error = %e, "Failed to start speech"),
        }
    }

    fn stop(&self) {
        if let Ok(mut playing) = self.playing.lock() {
            if let Some(mut child) = playing.take() {
                // Already finished is fine.
                let _ = child.kill();
                let _ = child.wait();
            }
        }
    }

    fn is_supported(&self) -> bool {
        true
    }
}

impl Drop for CommandSpeaker {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Build the speaker for the current settings.
pub fn speaker_for(enabled: bool, command: Option<&str>) -> Box<dyn Speaker> {
    if !enabled {
        return Box::new(SilentSpeaker);
    }

    let speaker = match command {
        Some(program) => Some(CommandSpeaker::new(program)),
        None => CommandSpeaker::detect(),
    };

    match speaker {
        Some(speaker) => {
            debug!(program = speaker.program(), "Using speech synthesizer");
            Box::new(speaker)
        }
        None => {
            warn!("No speech synthesizer found, audio disabled");
            Box::new(SilentSpeaker)
        }
    }
}

/// espeak voice name for a BCP 47 tag.
fn espeak_voice(lang: &str) -> String {
    match lang.to_lowercase().as_str() {
        "en-us" => "en-us".to_string(),
        "en-gb" | "en-uk" => "en-gb".to_string(),
        other => other.split('-').next().unwrap_or("en").to_string(),
    }
}

fn on_path(program: &str) -> bool {
    std::env::var_os("PATH")
        .map(|paths| std::env::split_paths(&paths).any(|dir| dir.join(program).is_file()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_are_slow_english() {
        let options = SpeechOptions::default();
        assert_eq!(options.rate, 0.6);
        assert_eq!(options.lang, "en-US");
    }

    #[test]
    fn test_espeak_args() {
        let speaker = CommandSpeaker::new("/usr/bin/espeak-ng");
        let args = speaker.args("hurry up", &SpeechOptions::default());
        assert_eq!(
            args,
            vec!["-v", "en-us", "-s", "105", "-a", "100", "-p", "50", "hurry up"]
        );
    }

    #[test]
    fn test_say_args_have_minimum_rate() {
        let speaker = CommandSpeaker::new("say");
        let options = SpeechOptions {
            rate: 0.1,
            ..Default::default()
        };
        assert_eq!(speaker.args("met", &options), vec!["-r", "80", "met"]);
    }

    #[test]
    fn test_unknown_program_gets_text_only() {
        let speaker = CommandSpeaker::new("my-tts");
        assert_eq!(speaker.args("ground", &SpeechOptions::default()), vec!["ground"]);
    }

    #[test]
    fn test_disabled_speech_is_silent() {
        assert!(!speaker_for(false, Some("espeak")).is_supported());
    }

    #[test]
    fn test_missing_program_does_not_panic() {
        let speaker = CommandSpeaker::new("definitely-not-a-real-tts-program");
        speaker.speak("above", &SpeechOptions::default());
        speaker.stop();
    }

    #[test]
    fn test_espeak_voice() {
        assert_eq!(espeak_voice("en-US"), "en-us");
        assert_eq!(espeak_voice("en-GB"), "en-gb");
        assert_eq!(espeak_voice("zh-CN"), "zh");
    }
}
