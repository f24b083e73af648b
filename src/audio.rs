//! Sound cues emitted by gameplay.
//!
//! Systems never call into an audio backend; they write [`AudioCue`] messages.
//! [`AudioCuePlugin`] drains them every frame.  No playback backend is wired
//! in, so cues are only traced, and a missing backend can never stall or fail
//! a frame.

use bevy::prelude::*;

/// Background music tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicTrack {
    Intro,
    Chapter,
    Boss,
    Victory,
}

/// A one-shot sound or a music change requested by gameplay.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    Laser,
    Explosion,
    PowerUp,
    Coin,
    Hit,
    Music(MusicTrack),
    StopMusic,
}

pub struct AudioCuePlugin;

impl Plugin for AudioCuePlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<AudioCue>()
            .add_systems(Last, drain_audio_cues_system);
    }
}

fn drain_audio_cues_system(mut cues: MessageReader<AudioCue>) {
    for cue in cues.read() {
        match cue {
            AudioCue::Music(track) => debug!("music -> {track:?}"),
            AudioCue::StopMusic => debug!("music stopped"),
            other => trace!("sfx {other:?}"),
        }
    }
}
