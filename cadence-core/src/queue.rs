use rand::{Rng, seq::SliceRandom};

use crate::{RepeatMode, Track, TrackId};

/// An ordered list of tracks with a position into it.
///
/// `current_index < len()` whenever the queue is non-empty. An empty queue keeps its index at 0,
/// which becomes valid again as soon as a track is added.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Queue {
    tracks: Vec<Track>,
    current_index: usize,
}
impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current(&self) -> Option<&Track> {
        self.tracks.get(self.current_index)
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn push(&mut self, track: Track) {
        self.tracks.push(track);
    }

    /// Removes the track at `index`, keeping the current index on the same track when an earlier
    /// one is removed. Removing the current track leaves the index where it is, which then names
    /// the following track, or the new last one if the current track was last.
    pub fn remove(&mut self, index: usize) -> Option<Track> {
        if index >= self.tracks.len() {
            return None;
        }
        let track = self.tracks.remove(index);
        if index < self.current_index {
            self.current_index -= 1;
        }
        self.current_index = self.current_index.min(self.tracks.len().saturating_sub(1));
        Some(track)
    }

    /// Moves to `index`. Returns `false`, leaving the queue untouched, if it is out of range.
    pub fn set_current_index(&mut self, index: usize) -> bool {
        if index >= self.tracks.len() {
            return false;
        }
        self.current_index = index;
        true
    }

    /// Uniformly permutes the queue, then points the index at wherever `current` ended up
    /// (or 0 if it is not in the queue).
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R, current: Option<&TrackId>) {
        self.tracks.shuffle(rng);
        self.current_index = current
            .and_then(|id| self.tracks.iter().position(|t| &t.id == id))
            .unwrap_or(0);
    }

    /// The index `next` should move to, or `None` if playback should stop.
    pub fn next_index(&self, repeat_mode: RepeatMode) -> Option<usize> {
        if self.tracks.is_empty() {
            return None;
        }
        match repeat_mode {
            RepeatMode::One => Some(self.current_index),
            _ if self.current_index + 1 < self.tracks.len() => Some(self.current_index + 1),
            RepeatMode::All => Some(0),
            RepeatMode::Off => None,
        }
    }

    /// The index `previous` should move to; wraps from the first track to the last.
    pub fn previous_index(&self) -> Option<usize> {
        let len = self.tracks.len();
        (len > 0).then(|| (self.current_index + len - 1) % len)
    }
}
