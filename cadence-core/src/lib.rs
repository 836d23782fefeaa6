//! The playback core: one session, its queue, and the engine that keeps both in step with an
//! audio primitive.

pub use cadence_youtube as yt;

pub use cadence_state::{RepeatMode, Track, TrackId};

pub mod util;

mod session;
pub use session::{PlaybackError, PlaybackSession, TransportState};

mod queue;
pub use queue::Queue;

mod primitive;
pub use primitive::{AudioPrimitive, PrimitiveEvent, PrimitiveEventTx, SourceEvent, SourceId};

mod driver;
pub use driver::{AudioDriver, DriverEvent};

mod engine;
pub use engine::PlaybackEngine;

mod catalog;
pub use catalog::{Catalog, CatalogError, parse_video_id};

#[cfg(feature = "audio")]
mod tokio_thread;

#[cfg(feature = "audio")]
mod rodio_primitive;
#[cfg(feature = "audio")]
pub use rodio_primitive::RodioPrimitive;
