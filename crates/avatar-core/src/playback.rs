//! Audio-clock bridge: keeps the lip-sync cursor locked to the audio device
//! clock across play, pause and resume.

/// The audio resource as seen by the bridge.
///
/// `clock_now` is the device clock in seconds (monotonic, independent of the
/// render loop). `position` is how far into the clip playback has got, used
/// to rebase the start timestamp on resume.
pub trait AudioTrack {
    fn is_playing(&self) -> bool;
    fn clock_now(&self) -> f64;
    fn position(&self) -> f64;
    /// Start, or resume from `position`.
    fn play(&mut self);
    /// Stop output, keeping `position`.
    fn pause(&mut self);
    /// Stop output and rewind to the start of the clip.
    fn stop(&mut self);
    /// True exactly once after the clip reached its natural end. Pausing or
    /// stopping never reports an end.
    fn take_ended(&mut self) -> bool;
}

/// `floor(elapsed * fps)`; negative elapsed gives a negative index.
#[inline]
pub fn frame_index(elapsed: f64, fps: f64) -> i64 {
    (elapsed * fps).floor() as i64
}

pub struct PlaybackBridge<T: AudioTrack> {
    track: Option<T>,
    intent: bool,
    start_timestamp: Option<f64>,
    on_complete: Option<Box<dyn FnMut()>>,
}

impl<T: AudioTrack> Default for PlaybackBridge<T> {
    fn default() -> Self {
        Self {
            track: None,
            intent: false,
            start_timestamp: None,
            on_complete: None,
        }
    }
}

impl<T: AudioTrack> PlaybackBridge<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called once per finished take, never on a manual pause.
    pub fn set_on_complete(&mut self, callback: impl FnMut() + 'static) {
        self.on_complete = Some(Box::new(callback));
    }

    /// Replace the audio resource. The previous track is stopped and dropped
    /// first; the new one starts immediately if play is already intended.
    pub fn load(&mut self, mut track: T) {
        self.unload();
        if self.intent {
            track.play();
            self.start_timestamp = Some(track.clock_now());
        }
        self.track = Some(track);
    }

    pub fn unload(&mut self) -> Option<T> {
        self.start_timestamp = None;
        let mut track = self.track.take()?;
        track.stop();
        Some(track)
    }

    /// Apply a play/pause intent. Only transitions act on the track.
    pub fn set_playing(&mut self, playing: bool) {
        if playing == self.intent {
            return;
        }
        self.intent = playing;
        let Some(track) = self.track.as_mut() else {
            return;
        };
        if playing {
            if !track.is_playing() {
                let offset = track.position();
                track.play();
                self.start_timestamp = Some(track.clock_now() - offset);
                log::info!("audio playing from {:.2}s", offset);
            }
        } else if track.is_playing() {
            track.pause();
            log::info!("audio paused at {:.2}s", track.position());
        }
    }

    pub fn is_playing_intent(&self) -> bool {
        self.intent
    }

    pub fn track(&self) -> Option<&T> {
        self.track.as_ref()
    }

    pub fn start_timestamp(&self) -> Option<f64> {
        self.start_timestamp
    }

    /// Play is intended and the audio is actually running.
    pub fn is_active(&self) -> bool {
        self.intent && self.track.as_ref().is_some_and(|t| t.is_playing())
    }

    /// Seconds of the current take played so far.
    pub fn elapsed(&self) -> Option<f64> {
        let track = self.track.as_ref()?;
        Some(track.clock_now() - self.start_timestamp.unwrap_or(0.0))
    }

    pub fn frame_index(&self, fps: f64) -> Option<i64> {
        self.elapsed().map(|e| frame_index(e, fps))
    }

    /// End the current take: drop the intent, rewind the track and fire the
    /// completion callback. Returns false if no take was in progress.
    pub fn complete(&mut self) -> bool {
        if !self.intent {
            return false;
        }
        self.intent = false;
        self.start_timestamp = None;
        if let Some(track) = self.track.as_mut() {
            track.stop();
        }
        log::debug!("take complete");
        if let Some(callback) = self.on_complete.as_mut() {
            callback();
        }
        true
    }

    /// Complete the take if the track reported its natural end.
    pub fn poll_natural_end(&mut self) -> bool {
        let ended = self.track.as_mut().is_some_and(|t| t.take_ended());
        ended && self.complete()
    }
}
