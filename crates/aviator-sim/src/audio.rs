//! Loop cue on a real output device via rodio
//!
//! The clip is decoded once and appended as an infinite repeat to a paused
//! sink. "Stop" pauses the sink so the loop can be resumed without decoding
//! the file again.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use aviator_rotor::{LoopSettings, ResolveError};
use rodio::{Decoder, OutputStream, Sink, Source};

pub struct DeviceLoop {
    /// rodio output stream (must be kept alive)
    _stream: OutputStream,
    sink: Sink,
}

impl DeviceLoop {
    pub fn open(path: &Path, settings: &LoopSettings) -> Result<Self, ResolveError> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| ResolveError::Backend(format!("audio output: {}", e)))?;
        tracing::info!("Audio output initialized");

        let file = File::open(path)
            .map_err(|_| ResolveError::ClipNotFound(path.display().to_string()))?;
        let source = Decoder::new(BufReader::new(file))
            .map_err(|e| ResolveError::Backend(format!("decode {}: {}", path.display(), e)))?;
        let sink = Sink::try_new(&handle)
            .map_err(|e| ResolveError::Backend(format!("sink: {}", e)))?;

        sink.pause();
        sink.set_volume(settings.initial_volume);
        if settings.looping {
            sink.append(source.repeat_infinite());
        } else {
            sink.append(source);
        }

        Ok(Self { _stream: stream, sink })
    }

    pub fn is_playing(&self) -> bool {
        !self.sink.is_paused() && !self.sink.empty()
    }

    pub fn play(&mut self) {
        self.sink.play();
    }

    pub fn stop(&mut self) {
        self.sink.pause();
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.sink.set_volume(volume.clamp(0.0, 1.0));
    }
}
