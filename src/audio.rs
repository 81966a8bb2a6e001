//! Audio collaborator
//!
//! The core only tells the audio side what happened; playback lives behind
//! the `AudioSink` trait.

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ground jump
    Jump,
    /// Mid-air jump
    DoubleJump,
    /// Downward stomp from the air
    PowerStomp,
    /// Runner hit by an enemy
    Hit,
}

/// Audio backend
pub trait AudioSink {
    /// Called once per process, before anything else
    fn init(&mut self);

    fn set_sound_enabled(&mut self, enabled: bool);

    fn set_music_enabled(&mut self, enabled: bool);

    /// Effective 0..=1 levels, already folded with master volume and mutes
    fn set_volumes(&mut self, sfx: f32, music: f32);

    fn play(&mut self, effect: SoundEffect);
}

/// Silent backend (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn init(&mut self) {}

    fn set_sound_enabled(&mut self, _enabled: bool) {}

    fn set_music_enabled(&mut self, _enabled: bool) {}

    fn set_volumes(&mut self, _sfx: f32, _music: f32) {}

    fn play(&mut self, _effect: SoundEffect) {}
}

/// Backend that remembers what it was asked to do
#[derive(Debug, Default, Clone)]
pub struct RecordingAudio {
    pub inits: u32,
    pub sound_enabled: bool,
    pub music_enabled: bool,
    pub sfx_volume: f32,
    pub music_volume: f32,
    pub played: Vec<SoundEffect>,
}

impl AudioSink for RecordingAudio {
    fn init(&mut self) {
        self.inits += 1;
    }

    fn set_sound_enabled(&mut self, enabled: bool) {
        self.sound_enabled = enabled;
    }

    fn set_music_enabled(&mut self, enabled: bool) {
        self.music_enabled = enabled;
    }

    fn set_volumes(&mut self, sfx: f32, music: f32) {
        self.sfx_volume = sfx;
        self.music_volume = music;
    }

    fn play(&mut self, effect: SoundEffect) {
        self.played.push(effect);
    }
}
