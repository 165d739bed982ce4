use std::io::{self, Write};
use std::process::{Child, Command, Stdio};

use crate::words::Side;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundEvent {
    Click,
    Correct,
    Incorrect,
    LevelComplete,
}

impl SoundEvent {
    /// Terminal bells rung for the cue. Quiet cues ring none.
    fn bells(self) -> usize {
        match self {
            SoundEvent::Click => 0,
            SoundEvent::Correct => 1,
            SoundEvent::Incorrect => 2,
            SoundEvent::LevelComplete => 3,
        }
    }
}

/// Sound cues and text-to-speech. Cues ring the terminal bell; speech is
/// delegated to an optional external program that receives the locale and
/// text as arguments. Nothing here blocks the UI thread.
#[derive(Debug)]
pub struct AudioService {
    enabled: bool,
    ready: bool,
    speech_program: Option<String>,
    source_locale: String,
    target_locale: String,
    /// Speech processes still running or not yet reaped.
    speaking: Vec<Child>,
}

impl AudioService {
    pub fn new(
        enabled: bool,
        speech_program: Option<String>,
        source_locale: String,
        target_locale: String,
    ) -> Self {
        Self {
            enabled,
            ready: false,
            speech_program,
            source_locale,
            target_locale,
            speaking: Vec::new(),
        }
    }

    /// Silent service for tests and headless runs.
    pub fn muted() -> Self {
        Self::new(false, None, String::new(), String::new())
    }

    pub fn init(&mut self) {
        self.ready = true;
        tracing::debug!(
            enabled = self.enabled,
            speech = self.speech_program.as_deref().unwrap_or("none"),
            "Audio initialized"
        );
    }

    /// Stops any speech still playing and reaps every child.
    pub fn dispose(&mut self) {
        self.ready = false;
        for mut child in self.speaking.drain(..) {
            if let Err(err) = child.kill().and_then(|_| child.wait().map(|_| ())) {
                tracing::debug!(%err, "Speech process already gone");
            }
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn active(&self) -> bool {
        self.ready && self.enabled
    }

    /// Collect finished speech processes.
    fn reap(&mut self) {
        self.speaking.retain_mut(|child| match child.try_wait() {
            Ok(Some(_)) => false,
            Ok(None) => true,
            Err(err) => {
                tracing::debug!(%err, "Lost track of speech process");
                false
            }
        });
    }

    pub fn play(&mut self, sound: SoundEvent) {
        self.reap();
        if !self.active() || sound.bells() == 0 {
            return;
        }
        let mut out = io::stdout();
        let bells = "\x07".repeat(sound.bells());
        if let Err(err) = out.write_all(bells.as_bytes()).and_then(|_| out.flush()) {
            tracing::debug!(%err, "Failed to ring terminal bell");
        }
    }

    pub fn locale_for(&self, side: Side) -> &str {
        match side {
            Side::Source => &self.source_locale,
            Side::Target => &self.target_locale,
        }
    }

    pub fn speak(&mut self, text: &str, side: Side) {
        self.reap();
        if !self.active() {
            return;
        }
        let Some(program) = self.speech_program.as_deref() else {
            return;
        };
        let spawned = Command::new(program)
            .arg(self.locale_for(side))
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        match spawned {
            Ok(child) => self.speaking.push(child),
            Err(err) => tracing::warn!(program, %err, "Speech program failed to start"),
        }
    }
}

impl Drop for AudioService {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locales_follow_side() {
        let audio = AudioService::new(true, None, "ru-RU".into(), "en-US".into());
        assert_eq!(audio.locale_for(Side::Source), "ru-RU");
        assert_eq!(audio.locale_for(Side::Target), "en-US");
    }

    #[test]
    fn inactive_until_initialized() {
        let mut audio = AudioService::new(true, None, String::new(), String::new());
        assert!(!audio.active());
        audio.init();
        assert!(audio.active());
        audio.set_enabled(false);
        assert!(!audio.active());
        audio.set_enabled(true);
        audio.dispose();
        assert!(!audio.active());
    }

    #[test]
    fn muted_service_never_speaks() {
        let mut audio = AudioService::muted();
        audio.init();
        audio.speak("кот", Side::Source);
        audio.play(SoundEvent::Correct);
        assert!(audio.speaking.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn finished_speech_processes_are_reaped() {
        use std::time::Duration;

        let mut audio = AudioService::new(true, Some("true".into()), "ru-RU".into(), "en-US".into());
        audio.init();
        for word in ["кот", "собака", "дом", "лес", "море"] {
            audio.speak(word, Side::Source);
        }
        assert!(!audio.speaking.is_empty());

        for _ in 0..200 {
            audio.reap();
            if audio.speaking.is_empty() {
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        assert!(audio.speaking.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn dispose_stops_running_speech() {
        let mut audio = AudioService::new(true, Some("sleep".into()), String::new(), String::new());
        audio.init();
        // `sleep <locale> <text>` with a numeric text keeps running.
        audio.source_locale = "30".into();
        audio.speak("30", Side::Source);
        assert_eq!(audio.speaking.len(), 1);
        audio.dispose();
        assert!(audio.speaking.is_empty());
    }
}
