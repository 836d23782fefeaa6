//! A scripted audio primitive for driving the engine without a sound card.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use cadence_core::{
    AudioPrimitive, PlaybackEngine, PlaybackError, PrimitiveEvent, PrimitiveEventTx, SourceEvent,
    SourceId, Track, TrackId,
};
use rand::{SeedableRng, rngs::StdRng};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SetSource(String),
    Play,
    Pause,
    SetCurrentTime(f64),
    SetVolume(f32),
}

/// How the fake answers `play`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayResponse {
    Start,
    Fail,
    /// Say nothing; the test confirms by hand.
    Silent,
}

struct Shared {
    calls: Vec<Call>,
    events: Option<PrimitiveEventTx>,
    play_response: PlayResponse,
    source: SourceId,
}

/// Clones share state, so a test can keep one while the engine owns another.
#[derive(Clone)]
pub struct FakePrimitive(Arc<Mutex<Shared>>);
impl FakePrimitive {
    pub fn new() -> Self {
        Self(Arc::new(Mutex::new(Shared {
            calls: vec![],
            events: None,
            play_response: PlayResponse::Start,
            source: SourceId::default(),
        })))
    }

    pub fn respond_to_play(&self, response: PlayResponse) {
        self.0.lock().unwrap().play_response = response;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.0.lock().unwrap().calls.clear();
    }

    pub fn last_volume(&self) -> Option<f32> {
        self.calls().into_iter().rev().find_map(|call| match call {
            Call::SetVolume(volume) => Some(volume),
            _ => None,
        })
    }

    pub fn is_subscribed(&self) -> bool {
        self.0.lock().unwrap().events.is_some()
    }

    /// Sends `event` about the current source.
    pub fn emit(&self, event: PrimitiveEvent) {
        let shared = self.0.lock().unwrap();
        if let Some(events) = &shared.events {
            events
                .send(SourceEvent {
                    source: shared.source,
                    event,
                })
                .unwrap();
        }
    }

    fn record(&self, call: Call) {
        self.0.lock().unwrap().calls.push(call);
    }
}
impl AudioPrimitive for FakePrimitive {
    fn set_source(&mut self, id: SourceId, url: &str) {
        self.record(Call::SetSource(url.to_string()));
        self.0.lock().unwrap().source = id;
    }

    fn play(&mut self) {
        self.record(Call::Play);
        let response = self.0.lock().unwrap().play_response;
        match response {
            PlayResponse::Start => self.emit(PrimitiveEvent::PlayStarted),
            PlayResponse::Fail => self.emit(PrimitiveEvent::PlayFailed(
                PlaybackError::StartFailed("autoplay blocked".to_string()),
            )),
            PlayResponse::Silent => {}
        }
    }

    fn pause(&mut self) {
        self.record(Call::Pause);
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.record(Call::SetCurrentTime(seconds));
    }

    fn set_volume(&mut self, volume: f32) {
        self.record(Call::SetVolume(volume));
    }

    fn subscribe(&mut self, events: PrimitiveEventTx) {
        self.0.lock().unwrap().events = Some(events);
    }

    fn unsubscribe(&mut self) {
        self.0.lock().unwrap().events = None;
    }
}

pub fn track(id: &str) -> Track {
    Track {
        id: TrackId(id.to_string()),
        title: format!("Track {id}"),
        artist: "Artist".to_string(),
        album: None,
        duration: 200,
        thumbnail: String::new(),
        url: format!("https://cdn.example/{id}.m4a"),
        video_id: id.to_string(),
    }
}

/// An engine with a seeded shuffle and `ids` queued. Nothing is loaded.
pub fn engine_with_queue(ids: &[&str]) -> (PlaybackEngine, FakePrimitive) {
    let primitive = FakePrimitive::new();
    let mut engine =
        PlaybackEngine::with_rng(Box::new(primitive.clone()), StdRng::seed_from_u64(42));
    for id in ids {
        engine.add_to_queue(track(id));
    }
    (engine, primitive)
}

pub fn current_id(engine: &PlaybackEngine) -> Option<String> {
    engine
        .session()
        .current_track
        .as_ref()
        .map(|t| t.id.0.clone())
}
