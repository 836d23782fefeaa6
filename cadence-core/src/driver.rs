use std::sync::mpsc;

use crate::{AudioPrimitive, PlaybackError, PrimitiveEvent, SourceEvent, SourceId};

/// Binds one [`AudioPrimitive`] to the engine.
///
/// Commands go straight to the primitive; its events are queued on a channel and handed out,
/// cleaned up, by [`AudioDriver::poll`]. Events about a source that has since been replaced are
/// dropped there.
pub struct AudioDriver {
    primitive: Option<Box<dyn AudioPrimitive>>,
    events: Option<mpsc::Receiver<SourceEvent>>,
    source: SourceId,
}

/// A primitive event, as the engine sees it.
#[derive(Debug, Clone, PartialEq)]
pub enum DriverEvent {
    /// Time or metadata changed. Both values are finite and non-negative.
    Position { current_time: f64, duration: f64 },
    Ended,
    PlayStarted,
    PlayFailed(PlaybackError),
}

impl AudioDriver {
    /// A driver with nothing attached. Every command is a no-op until [`Self::attach`].
    fn detached() -> Self {
        Self {
            primitive: None,
            events: None,
            source: SourceId::default(),
        }
    }

    pub fn new(primitive: Box<dyn AudioPrimitive>) -> Self {
        let mut driver = Self::detached();
        driver.attach(primitive);
        driver
    }

    /// Attach `primitive`, detaching (and dropping) the previous one.
    pub fn attach(&mut self, mut primitive: Box<dyn AudioPrimitive>) {
        self.detach();
        let (tx, rx) = mpsc::channel();
        primitive.subscribe(tx);
        self.primitive = Some(primitive);
        self.events = Some(rx);
        self.source = SourceId::default();
    }

    /// Detach the primitive. Its listeners are removed and anything it has queued is discarded.
    pub fn detach(&mut self) -> Option<Box<dyn AudioPrimitive>> {
        self.events = None;
        let mut primitive = self.primitive.take()?;
        primitive.unsubscribe();
        Some(primitive)
    }

    pub fn is_attached(&self) -> bool {
        self.primitive.is_some()
    }

    /// Returns `false` if nothing is attached; likewise for the other commands.
    pub fn set_source(&mut self, url: &str) -> bool {
        if !self.is_attached() {
            return false;
        }
        self.source = self.source.next();
        let source = self.source;
        self.with_primitive(|p| p.set_source(source, url))
    }

    pub fn play(&mut self) -> bool {
        self.with_primitive(|p| p.play())
    }

    pub fn pause(&mut self) -> bool {
        self.with_primitive(|p| p.pause())
    }

    pub fn seek(&mut self, seconds: f64) -> bool {
        self.with_primitive(|p| p.set_current_time(seconds))
    }

    pub fn set_volume(&mut self, volume: f32) -> bool {
        self.with_primitive(|p| p.set_volume(volume))
    }

    /// The next pending event for the current source, if any.
    pub fn poll(&mut self) -> Option<DriverEvent> {
        let events = self.events.as_ref()?;
        let event = loop {
            let SourceEvent { source, event } = events.try_recv().ok()?;
            if source == self.source {
                break event;
            }
            tracing::debug!("Dropping {event:?} from replaced source {}", source.0);
        };
        Some(match event {
            PrimitiveEvent::TimeUpdate {
                current_time,
                duration,
            }
            | PrimitiveEvent::MetadataLoaded {
                current_time,
                duration,
            } => DriverEvent::Position {
                current_time: sanitize_seconds(current_time),
                duration: sanitize_seconds(duration),
            },
            PrimitiveEvent::Ended => DriverEvent::Ended,
            PrimitiveEvent::PlayStarted => DriverEvent::PlayStarted,
            PrimitiveEvent::PlayFailed(error) => DriverEvent::PlayFailed(error),
        })
    }

    fn with_primitive(&mut self, f: impl FnOnce(&mut dyn AudioPrimitive)) -> bool {
        match self.primitive.as_deref_mut() {
            Some(primitive) => {
                f(primitive);
                true
            }
            None => false,
        }
    }
}
impl Drop for AudioDriver {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Durations are NaN before metadata loads.
fn sanitize_seconds(seconds: f64) -> f64 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    }
}
