use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source, source::Buffered};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::world::WorldEvent;

pub const FIRE_SOUND: &str = "sounds/fire.wav";
pub const EXPLOSION_SOUND: &str = "sounds/explosion.wav";

type Sound = Buffered<Decoder<BufReader<File>>>;

/// Audio manager for playing sound effects
pub struct AudioManager {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    volume: f32,
    /// Pre-loaded and buffered sounds
    fire_sound: Sound,
    explosion_sound: Sound,
}

impl AudioManager {
    /// Opens the default output device and pre-loads every sound under `assets_dir`
    pub fn new(assets_dir: &Path, volume: f32) -> Result<Self, Box<dyn std::error::Error>> {
        let (stream, stream_handle) = OutputStream::try_default()?;

        Ok(Self {
            _stream: stream,
            stream_handle,
            volume,
            fire_sound: load_sound(&assets_dir.join(FIRE_SOUND))?,
            explosion_sound: load_sound(&assets_dir.join(EXPLOSION_SOUND))?,
        })
    }

    /// Sound is a nicety: any failure is logged and the game runs silently
    pub fn try_new(assets_dir: &Path, volume: f32) -> Option<Self> {
        if volume <= 0.0 {
            log::info!("audio muted");
            return None;
        }

        match Self::new(assets_dir, volume) {
            Ok(audio) => Some(audio),
            Err(err) => {
                log::warn!("failed to initialize audio, continuing without sound: {err}");
                None
            }
        }
    }

    /// Plays the effect tied to a world event, if any
    pub fn play_event(&self, event: &WorldEvent) {
        match event {
            WorldEvent::PlayerFired => self.play(&self.fire_sound, self.volume),
            WorldEvent::EnemyFired => self.play(&self.fire_sound, self.volume * 0.3),
            WorldEvent::EnemyDestroyed { .. } | WorldEvent::PlayerDefeated => {
                self.play(&self.explosion_sound, self.volume)
            }
            WorldEvent::FormationSpawned { .. } | WorldEvent::FormationCleared { .. } => {}
        }
    }

    fn play(&self, sound: &Sound, volume: f32) {
        // Ignore errors for sound playback - don't want to crash the game
        if let Ok(sink) = Sink::try_new(&self.stream_handle) {
            sink.set_volume(volume);
            // Clone the buffered source (fast - just clones references)
            sink.append(sound.clone());
            sink.detach();
        }
    }
}

fn load_sound(path: &Path) -> Result<Sound, Box<dyn std::error::Error>> {
    let file = File::open(path)?;
    let source = Decoder::new(BufReader::new(file))?;
    Ok(source.buffered())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::bundled_dir;

    #[test]
    fn test_bundled_sounds_decode() {
        assert!(load_sound(&bundled_dir().join(FIRE_SOUND)).is_ok());
        assert!(load_sound(&bundled_dir().join(EXPLOSION_SOUND)).is_ok());
    }

    #[test]
    fn test_missing_sound_is_an_error() {
        assert!(load_sound(Path::new("/no/such/sound.wav")).is_err());
    }

    #[test]
    fn test_muted_audio_never_opens_a_device() {
        assert!(AudioManager::try_new(&bundled_dir(), 0.0).is_none());
    }
}
