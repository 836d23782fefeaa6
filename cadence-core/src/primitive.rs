use crate::PlaybackError;

/// Where a primitive sends its events.
pub type PrimitiveEventTx = std::sync::mpsc::Sender<SourceEvent>;

/// Identifies one [`AudioPrimitive::set_source`] call. The default ID means no source has been set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceId(pub u64);
impl SourceId {
    /// The ID after this one.
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// A [`PrimitiveEvent`], tagged with the source that was current when it happened.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceEvent {
    pub source: SourceId,
    pub event: PrimitiveEvent,
}

/// Raw events from an audio primitive. Times are in seconds and may be non-finite.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveEvent {
    TimeUpdate { current_time: f64, duration: f64 },
    MetadataLoaded { current_time: f64, duration: f64 },
    Ended,
    /// A `play` request took effect.
    PlayStarted,
    /// A `play` request, or the source it depended on, failed.
    PlayFailed(PlaybackError),
}

/// Something that can actually make sound.
///
/// All operations return immediately. Anything that takes time (loading, starting) reports back
/// through the events sent to the subscribed channel.
pub trait AudioPrimitive: Send {
    /// Replace the source. Playback does not start until [`AudioPrimitive::play`].
    ///
    /// Every event sent from then on, until the next call, is tagged with `id`.
    fn set_source(&mut self, id: SourceId, url: &str);
    /// Request playback. Answered by [`PrimitiveEvent::PlayStarted`] or [`PrimitiveEvent::PlayFailed`],
    /// even when the source has already failed.
    fn play(&mut self);
    fn pause(&mut self);
    fn set_current_time(&mut self, seconds: f64);
    fn set_volume(&mut self, volume: f32);

    /// Start sending events to `events`, replacing any previous subscriber.
    fn subscribe(&mut self, events: PrimitiveEventTx);
    /// Stop sending events.
    fn unsubscribe(&mut self);
}
