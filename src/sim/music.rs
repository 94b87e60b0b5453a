//! Background music state machine
//!
//! Pure bookkeeping for the looping track. The platform layer executes the
//! emitted [`MusicCommand`]s against the audio element and reports promise
//! results and media events back. Autoplay rejection is expected: the first
//! audible attempt falls back to a muted start that unmutes on the first
//! click, touch or key press.

use serde::{Deserialize, Serialize};

/// Which kind of play() call is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayAttempt {
    /// Autoplay at full volume
    Audible,
    /// Autoplay fallback at zero volume
    Muted,
    /// Started from the toggle button
    Manual,
}

/// Work for the audio element
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MusicCommand {
    SetVolume(f32),
    Play(PlayAttempt),
    /// Listen for the first interaction to unmute
    ArmUnmute,
    /// Remove the interaction listeners
    DisarmUnmute,
}

/// Reports from the audio element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaEvent {
    PlayResolved(PlayAttempt),
    PlayRejected(PlayAttempt),
    Play,
    Pause,
    Ended,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MusicState {
    volume: f32,
    started: bool,
    muted: bool,
    playing: bool,
    unmute_armed: bool,
    pending: Vec<MusicCommand>,
}

impl MusicState {
    pub fn new(volume: f32) -> Self {
        Self {
            volume,
            started: false,
            muted: false,
            playing: false,
            unmute_armed: false,
            pending: Vec::new(),
        }
    }

    pub fn has_started(&self) -> bool {
        self.started
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Volume the element should currently have
    pub fn current_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }

    /// Take the commands queued since the last call
    pub fn drain(&mut self) -> Vec<MusicCommand> {
        std::mem::take(&mut self.pending)
    }

    fn play(&mut self, attempt: PlayAttempt) {
        let volume = if attempt == PlayAttempt::Muted { 0.0 } else { self.volume };
        self.pending.push(MusicCommand::SetVolume(volume));
        self.pending.push(MusicCommand::Play(attempt));
    }

    /// First autoplay attempt, shortly after mount
    pub fn begin_autoplay(&mut self) {
        if !self.started {
            self.play(PlayAttempt::Audible);
        }
    }

    /// play() promise resolved
    pub fn play_resolved(&mut self, attempt: PlayAttempt) {
        self.started = true;
        self.playing = true;
        match attempt {
            PlayAttempt::Audible | PlayAttempt::Manual => self.muted = false,
            PlayAttempt::Muted => {
                self.muted = true;
                self.unmute_armed = true;
                self.pending.push(MusicCommand::ArmUnmute);
                log::info!("Music started muted; unmuting on first interaction");
            }
        }
    }

    /// play() promise rejected
    pub fn play_rejected(&mut self, attempt: PlayAttempt) {
        match attempt {
            // A manual start may already have won the race
            PlayAttempt::Audible if self.started => {
                log::debug!("Late autoplay rejection ignored");
            }
            PlayAttempt::Audible => {
                log::info!("Autoplay blocked, retrying muted");
                self.play(PlayAttempt::Muted);
            }
            PlayAttempt::Muted => log::warn!("Music autoplay blocked"),
            PlayAttempt::Manual => log::warn!("Failed to start music"),
        }
    }

    /// First click/touch/key anywhere after a muted start
    pub fn interaction(&mut self) {
        if !self.unmute_armed {
            return;
        }
        self.unmute_armed = false;
        self.pending.push(MusicCommand::DisarmUnmute);
        if self.started {
            self.muted = false;
            self.pending.push(MusicCommand::SetVolume(self.volume));
        }
    }

    /// Mute button
    pub fn toggle(&mut self) {
        if !self.started {
            self.play(PlayAttempt::Manual);
            return;
        }
        if self.unmute_armed {
            self.unmute_armed = false;
            self.pending.push(MusicCommand::DisarmUnmute);
        }
        if self.muted {
            self.muted = false;
            self.pending.push(MusicCommand::SetVolume(self.volume));
            if !self.playing {
                self.pending.push(MusicCommand::Play(PlayAttempt::Manual));
            }
        } else {
            self.muted = true;
            self.pending.push(MusicCommand::SetVolume(0.0));
        }
    }

    /// Dispatch an audio element report
    pub fn apply(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::PlayResolved(attempt) => self.play_resolved(attempt),
            MediaEvent::PlayRejected(attempt) => self.play_rejected(attempt),
            MediaEvent::Play => self.on_play(),
            MediaEvent::Pause => self.on_pause(),
            MediaEvent::Ended => self.on_ended(),
            MediaEvent::Error => self.on_error(),
        }
    }

    pub fn on_play(&mut self) {
        self.playing = true;
    }

    pub fn on_pause(&mut self) {
        self.playing = false;
    }

    pub fn on_ended(&mut self) {
        self.playing = false;
    }

    pub fn on_error(&mut self) {
        log::warn!("Audio element error");
        self.playing = false;
    }
}
