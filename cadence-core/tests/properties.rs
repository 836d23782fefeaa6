//! Property-based tests for the playback engine's queue and volume invariants.

mod common;

use cadence_core::RepeatMode;
use common::{engine_with_queue, track};
use proptest::prelude::*;

fn queue_ids(len: std::ops::Range<usize>) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z0-9]{1,8}", len)
}

fn sorted(mut ids: Vec<String>) -> Vec<String> {
    ids.sort();
    ids
}

fn engine_for(ids: &[String]) -> (cadence_core::PlaybackEngine, common::FakePrimitive) {
    let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
    engine_with_queue(&refs)
}

fn session_ids(engine: &cadence_core::PlaybackEngine) -> Vec<String> {
    engine
        .session()
        .queue
        .tracks()
        .iter()
        .map(|t| t.id.0.clone())
        .collect()
}

proptest! {
    /// Property: any loaded track with a URL becomes the current track
    #[test]
    fn loading_binds_the_track(id in "[a-z0-9]{1,11}") {
        let (mut engine, _primitive) = engine_with_queue(&[]);
        engine.load_track(track(&id));
        prop_assert_eq!(engine.session().current_track.as_ref(), Some(&track(&id)));
    }

    /// Property: stored volume is the clamped input and is never muted afterwards
    #[test]
    fn volume_is_clamped(volume in prop::num::f32::ANY, muted_first in any::<bool>()) {
        let (mut engine, _primitive) = engine_with_queue(&[]);
        if muted_first {
            engine.toggle_mute();
        }
        engine.set_volume(volume);

        let expected = if volume.is_nan() { 0.0 } else { volume.clamp(0.0, 1.0) };
        prop_assert_eq!(engine.session().volume, expected);
        prop_assert!(!engine.session().is_muted);
    }

    /// Property: muting twice is a no-op on the stored volume
    #[test]
    fn double_mute_restores_volume(volume in 0.0f32..=1.0) {
        let (mut engine, primitive) = engine_with_queue(&[]);
        engine.set_volume(volume);
        engine.toggle_mute();
        engine.toggle_mute();
        prop_assert_eq!(engine.session().volume, volume);
        prop_assert_eq!(primitive.last_volume(), Some(volume));
    }

    /// Property: with repeat off, `next` walks to the end and stays there
    #[test]
    fn repeat_off_stops_at_the_end(ids in queue_ids(2..20)) {
        let (mut engine, _primitive) = engine_for(&ids);
        for _ in 0..ids.len() - 1 {
            engine.next();
        }
        prop_assert_eq!(engine.session().queue.current_index(), ids.len() - 1);
        engine.next();
        prop_assert_eq!(engine.session().queue.current_index(), ids.len() - 1);
    }

    /// Property: with repeat all, `len` calls to `next` come back around
    #[test]
    fn repeat_all_cycles(ids in queue_ids(1..20)) {
        let (mut engine, _primitive) = engine_for(&ids);
        engine.set_repeat_mode(RepeatMode::All);
        for _ in 0..ids.len() {
            engine.next();
        }
        prop_assert_eq!(engine.session().queue.current_index(), 0);
    }

    /// Property: with repeat one, `next` never moves
    #[test]
    fn repeat_one_stays(ids in queue_ids(1..20), start in any::<prop::sample::Index>(), steps in 1usize..10) {
        let (mut engine, _primitive) = engine_for(&ids);
        let start = start.index(ids.len());
        for _ in 0..start {
            engine.next();
        }
        engine.set_repeat_mode(RepeatMode::One);
        for _ in 0..steps {
            engine.next();
            prop_assert_eq!(engine.session().queue.current_index(), start);
        }
    }

    /// Property: `previous` from the start wraps to the last track
    #[test]
    fn previous_wraps(ids in queue_ids(1..20)) {
        let (mut engine, _primitive) = engine_for(&ids);
        engine.previous();
        prop_assert_eq!(engine.session().queue.current_index(), ids.len() - 1);
    }

    /// Property: removing keeps the index on the same track when possible, and always in range
    #[test]
    fn removal_keeps_the_index_valid(
        ids in queue_ids(1..20),
        start in any::<prop::sample::Index>(),
        remove in any::<prop::sample::Index>()
    ) {
        let (mut engine, _primitive) = engine_for(&ids);
        let start = start.index(ids.len());
        let remove = remove.index(ids.len());
        for _ in 0..start {
            engine.next();
        }

        engine.remove_from_queue(remove);
        let queue = &engine.session().queue;
        prop_assert_eq!(queue.len(), ids.len() - 1);

        let expected = if remove < start {
            start - 1
        } else {
            start.min(queue.len().saturating_sub(1))
        };
        prop_assert_eq!(queue.current_index(), expected);
        if remove < start {
            prop_assert_eq!(&queue.tracks()[expected].id.0, &ids[start]);
        }
    }

    /// Property: shuffling permutes the queue and follows the current track
    #[test]
    fn shuffle_preserves_contents(ids in queue_ids(1..30), start in any::<prop::sample::Index>()) {
        let (mut engine, _primitive) = engine_for(&ids);
        let start = start.index(ids.len());
        // Move through the queue so there is a current track
        engine.set_repeat_mode(RepeatMode::All);
        for _ in 0..=start {
            engine.next();
        }
        let current = engine.session().current_track.clone().map(|t| t.id);

        engine.shuffle();
        prop_assert_eq!(sorted(session_ids(&engine)), sorted(ids.clone()));

        let queue = &engine.session().queue;
        let landed = queue.current().map(|t| t.id.clone());
        prop_assert_eq!(landed, current);
    }
}
