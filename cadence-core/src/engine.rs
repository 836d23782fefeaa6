use rand::{SeedableRng, rngs::StdRng};
use tokio::sync::watch;

use crate::{
    AudioDriver, AudioPrimitive, DriverEvent, PlaybackError, PlaybackSession, RepeatMode, Track,
    TransportState,
};

/// Owns the [`PlaybackSession`] and the [`AudioDriver`], and is the only thing that changes either.
///
/// Commands update the session immediately. What the primitive does about them arrives later as
/// events, which are applied by [`PlaybackEngine::pump`]; call it regularly from the same thread
/// that issues commands.
pub struct PlaybackEngine {
    session: PlaybackSession,
    driver: AudioDriver,
    rng: StdRng,
    /// A `play` has been issued and not yet confirmed or refused.
    pending_play: bool,
    /// The primitive has confirmed playback of the current source at least once.
    source_started: bool,
    state_tx: watch::Sender<PlaybackSession>,
}

impl PlaybackEngine {
    pub fn new(primitive: Box<dyn AudioPrimitive>) -> Self {
        Self::with_rng(primitive, StdRng::from_os_rng())
    }

    /// As [`Self::new`], but shuffles with `rng`.
    pub fn with_rng(primitive: Box<dyn AudioPrimitive>, rng: StdRng) -> Self {
        let session = PlaybackSession::default();
        let mut driver = AudioDriver::new(primitive);
        driver.set_volume(session.effective_volume());
        let (state_tx, _) = watch::channel(session.clone());

        Self {
            session,
            driver,
            rng,
            pending_play: false,
            source_started: false,
            state_tx,
        }
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    /// A receiver that always holds the latest session, and is notified whenever it changes.
    pub fn subscribe(&self) -> watch::Receiver<PlaybackSession> {
        self.state_tx.subscribe()
    }

    /// Attaches `primitive` in place of the current one, and brings it up to date with the session.
    /// The current track is loaded but not started.
    pub fn attach(&mut self, primitive: Box<dyn AudioPrimitive>) {
        self.driver.attach(primitive);
        self.stop_tracking_playback();
        self.driver.set_volume(self.session.effective_volume());
        if let Some(track) = &self.session.current_track {
            self.driver.set_source(&track.url);
        }
        self.publish();
    }

    /// Detaches the primitive. Until another is attached, commands only change the session.
    pub fn detach(&mut self) -> Option<Box<dyn AudioPrimitive>> {
        let primitive = self.driver.detach()?;
        self.stop_tracking_playback();
        self.publish();
        Some(primitive)
    }

    pub fn is_attached(&self) -> bool {
        self.driver.is_attached()
    }

    /// Binds `track` to the primitive without starting it. Tracks without a URL are ignored.
    pub fn load_track(&mut self, track: Track) {
        self.load_track_internal(track);
        self.publish();
    }

    pub fn play(&mut self) {
        self.play_internal();
        self.publish();
    }

    /// Load `track` and start it.
    pub fn play_now(&mut self, track: Track) {
        if self.load_track_internal(track) {
            self.play_internal();
        }
        self.publish();
    }

    pub fn pause(&mut self) {
        if !self.driver.pause() {
            return;
        }
        // A confirmation for an earlier play is no longer wanted
        self.pending_play = false;
        self.session.transport = TransportState::Paused;
        self.publish();
    }

    /// Moves playback to `seconds`. The new time is shown straight away but is provisional until
    /// the primitive reports its own.
    pub fn seek(&mut self, seconds: f64) {
        if !self.driver.seek(seconds) {
            return;
        }
        self.session.current_time = seconds;
        self.publish();
    }

    /// Sets the volume, clamped to `[0, 1]`, and unmutes.
    pub fn set_volume(&mut self, volume: f32) {
        let volume = if volume.is_nan() {
            0.0
        } else {
            volume.clamp(0.0, 1.0)
        };
        self.session.volume = volume;
        self.session.is_muted = false;
        self.driver.set_volume(volume);
        self.publish();
    }

    pub fn toggle_mute(&mut self) {
        self.session.is_muted = !self.session.is_muted;
        self.driver.set_volume(self.session.effective_volume());
        self.publish();
    }

    pub fn add_to_queue(&mut self, track: Track) {
        self.session.queue.push(track);
        self.publish();
    }

    /// Removes a queued track. Playback is not interrupted, even if it was the current one.
    pub fn remove_from_queue(&mut self, index: usize) {
        match self.session.queue.remove(index) {
            Some(track) => tracing::debug!("Removed {} from the queue", track.id),
            None => tracing::debug!("No queue entry at {index} to remove"),
        }
        self.publish();
    }

    /// Toggles shuffle. Each toggle reshuffles the queue; the previous order is not kept.
    pub fn shuffle(&mut self) {
        self.session.is_shuffled = !self.session.is_shuffled;
        let current = self.session.current_track.as_ref().map(|t| t.id.clone());
        self.session.queue.shuffle(&mut self.rng, current.as_ref());
        self.publish();
    }

    pub fn next(&mut self) {
        self.advance();
        self.publish();
    }

    pub fn previous(&mut self) {
        if let Some(index) = self.session.queue.previous_index() {
            self.play_queue_index(index);
        }
        self.publish();
    }

    pub fn set_repeat_mode(&mut self, repeat_mode: RepeatMode) {
        self.session.repeat_mode = repeat_mode;
        self.publish();
    }

    /// Off → All → One → Off.
    pub fn cycle_repeat_mode(&mut self) {
        self.session.repeat_mode = self.session.repeat_mode.cycle();
        self.publish();
    }

    /// Applies every event the primitive has sent since the last call.
    pub fn pump(&mut self) {
        while let Some(event) = self.driver.poll() {
            self.handle_event(event);
        }
        self.publish();
    }
}
impl PlaybackEngine {
    fn load_track_internal(&mut self, track: Track) -> bool {
        if track.url.is_empty() {
            tracing::debug!("Not loading {}: it has no URL", track.id);
            return false;
        }
        tracing::debug!("Loading {} ({})", track.id, track.title);
        self.driver.set_source(&track.url);
        self.session.current_track = Some(track);
        // Replacing the source abandons any play still in flight
        self.pending_play = false;
        self.source_started = false;
        true
    }

    /// Nothing is playing any more, and nothing will be confirmed.
    fn stop_tracking_playback(&mut self) {
        self.pending_play = false;
        self.source_started = false;
        self.session.transport = TransportState::Paused;
    }

    fn play_internal(&mut self) {
        let Some(track) = &self.session.current_track else {
            tracing::debug!("Not playing: no track loaded");
            return;
        };
        tracing::debug!("Requesting playback of {}", track.id);
        if self.driver.play() {
            self.pending_play = true;
        } else {
            tracing::debug!("Not playing: no audio primitive attached");
        }
    }

    /// Runs the `next` algorithm. Returns whether it moved to (or restarted) a track.
    fn advance(&mut self) -> bool {
        match self.session.queue.next_index(self.session.repeat_mode) {
            Some(index) => {
                self.play_queue_index(index);
                true
            }
            None => {
                tracing::debug!("No next track to advance to");
                false
            }
        }
    }

    fn play_queue_index(&mut self, index: usize) {
        if !self.session.queue.set_current_index(index) {
            return;
        }
        let Some(track) = self.session.queue.current().cloned() else {
            return;
        };
        if self.load_track_internal(track) {
            self.play_internal();
        }
    }

    fn handle_event(&mut self, event: DriverEvent) {
        match event {
            DriverEvent::Position {
                current_time,
                duration,
            } => {
                self.session.current_time = current_time;
                self.session.duration = duration;
            }
            DriverEvent::PlayStarted => {
                if !self.pending_play {
                    tracing::debug!("Ignoring start confirmation for an abandoned play");
                    return;
                }
                self.pending_play = false;
                self.source_started = true;
                self.session.transport = TransportState::Playing;
                self.session.last_error = None;
            }
            DriverEvent::PlayFailed(error) => {
                tracing::warn!("Playback failed: {error}");
                let was_pending = std::mem::take(&mut self.pending_play);
                // Only a refused start on a source that has already played can leave it playing
                let source_alive = was_pending
                    && self.source_started
                    && matches!(error, PlaybackError::StartFailed(_));
                if !source_alive {
                    self.session.transport = TransportState::Paused;
                }
                self.session.last_error = Some(error);
            }
            DriverEvent::Ended => {
                tracing::debug!("Track ended");
                if !self.advance() {
                    self.session.transport = TransportState::Paused;
                }
            }
        }
    }

    fn publish(&self) {
        let session = &self.session;
        self.state_tx.send_if_modified(|current| {
            if current == session {
                return false;
            }
            *current = session.clone();
            true
        });
    }
}
