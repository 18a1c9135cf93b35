mod common;

use cadence_core::{
    error::{Notice, NoticeLevel, PlaybackError},
    output::{OutputEvent, OutputEventKind},
    queue::{Enqueued, RepeatMode},
    transport::TransportPhase,
};
use common::{Call, finish_load, ids, player, track};

#[test]
fn enqueue_on_an_empty_player_loads_without_playing() {
    let (mut p, remote) = player();

    assert_eq!(p.enqueue(track("a")).unwrap(), Enqueued::Started);
    assert_eq!(
        p.take_notices(),
        vec![
            Notice::success("Added \"A\" into queue."),
            Notice::info("Playing \"A\"."),
        ]
    );
    assert_eq!(remote.take_calls(), vec![Call::Load("/music/a.mp3".into())]);

    finish_load(&mut p, &remote, 10.0);
    assert_eq!(remote.take_calls(), vec![Call::Volume(1.0), Call::Pause]);

    let snapshot = p.snapshot();
    assert_eq!(snapshot.phase, TransportPhase::Paused);
    assert!(!snapshot.is_playing);
    assert!(snapshot.pending.is_empty());
    assert_eq!(snapshot.duration, Some(10.0));
}

#[test]
fn play_now_starts_once_media_is_ready() {
    let (mut p, remote) = player();

    p.play_now(track("a")).unwrap();
    assert_eq!(p.take_notices(), vec![Notice::info("Now playing \"A\".")]);
    assert_eq!(p.snapshot().phase, TransportPhase::Loading);

    finish_load(&mut p, &remote, 120.0);
    assert_eq!(
        remote.take_calls(),
        vec![Call::Load("/music/a.mp3".into()), Call::Volume(1.0), Call::Play]
    );
    assert_eq!(p.snapshot().phase, TransportPhase::Playing);
}

#[test]
fn duplicates_are_reported_and_ignored() {
    let (mut p, _remote) = player();
    p.play_now(track("a")).unwrap();
    p.enqueue(track("b")).unwrap();
    p.take_notices();

    assert_eq!(p.enqueue(track("b")).unwrap(), Enqueued::Duplicate);
    assert_eq!(p.enqueue(track("a")).unwrap(), Enqueued::Duplicate);
    assert_eq!(ids(&p.snapshot().pending), vec!["b"]);

    let notices = p.take_notices();
    assert_eq!(notices.len(), 2);
    assert!(notices.iter().all(|n| n.level == NoticeLevel::Info));
    assert_eq!(notices[0].message, "\"B\" Already in queue.");
}

#[test]
fn natural_end_advances_to_the_next_track() {
    let (mut p, remote) = player();
    p.play_now(track("a")).unwrap();
    p.enqueue(track("b")).unwrap();
    finish_load(&mut p, &remote, 3.0);
    remote.take_calls();

    p.handle_output_event(remote.event(OutputEventKind::Ended));

    let snapshot = p.snapshot();
    assert_eq!(snapshot.current.as_ref().map(|t| t.id().as_str()), Some("b"));
    assert_eq!(ids(&snapshot.history), vec!["a"]);
    assert!(snapshot.pending.is_empty());
    assert!(snapshot.is_playing);
    assert_eq!(remote.take_calls(), vec![Call::Load("/music/b.mp3".into())]);

    finish_load(&mut p, &remote, 3.0);
    assert_eq!(remote.take_calls(), vec![Call::Volume(1.0), Call::Play]);
}

#[test]
fn natural_end_with_repeat_restarts_in_place() {
    let (mut p, remote) = player();
    p.play_now(track("a")).unwrap();
    p.enqueue(track("b")).unwrap();
    assert_eq!(p.toggle_repeat(), RepeatMode::One);
    finish_load(&mut p, &remote, 30.0);
    remote.take_calls();

    p.handle_output_event(remote.event(OutputEventKind::Ended));

    assert_eq!(remote.take_calls(), vec![Call::Seek(0.0), Call::Play]);
    let snapshot = p.snapshot();
    assert_eq!(snapshot.current.as_ref().map(|t| t.id().as_str()), Some("a"));
    assert_eq!(ids(&snapshot.pending), vec!["b"]);
    assert!(snapshot.history.is_empty());
    assert_eq!(snapshot.elapsed, 0.0);
}

#[test]
fn exhausting_the_queue_stops_the_output() {
    let (mut p, remote) = player();
    p.play_now(track("a")).unwrap();
    finish_load(&mut p, &remote, 3.0);
    remote.take_calls();

    p.handle_output_event(remote.event(OutputEventKind::Ended));

    let snapshot = p.snapshot();
    assert_eq!(snapshot.current, None);
    assert!(!snapshot.is_playing);
    assert_eq!(ids(&snapshot.history), vec!["a"]);
    assert_eq!(snapshot.phase, TransportPhase::Idle);
    assert_eq!(remote.take_calls(), vec![Call::Stop]);

    // going back from the end replays the last track
    assert!(p.previous());
    assert_eq!(
        p.snapshot().current.as_ref().map(|t| t.id().as_str()),
        Some("a")
    );
}

#[test]
fn events_from_a_superseded_load_are_ignored() {
    let (mut p, remote) = player();
    p.play_now(track("a")).unwrap();
    let stale = remote.ticket();
    p.play_now(track("b")).unwrap();
    remote.take_calls();

    p.handle_output_event(OutputEvent::new(
        stale.clone(),
        OutputEventKind::Loaded { duration: 99.0 },
    ));
    p.handle_output_event(OutputEvent::new(stale, OutputEventKind::Ended));

    let snapshot = p.snapshot();
    assert_eq!(snapshot.phase, TransportPhase::Loading);
    assert_eq!(snapshot.duration, None);
    assert_eq!(snapshot.current.as_ref().map(|t| t.id().as_str()), Some("b"));
    assert!(remote.take_calls().is_empty());
}

#[test]
fn refused_start_keeps_intent_and_waits_for_play() {
    let (mut p, remote) = player();
    remote.refuse_play(true);
    p.play_now(track("a")).unwrap();
    p.take_notices();

    finish_load(&mut p, &remote, 60.0);

    let snapshot = p.snapshot();
    assert!(snapshot.is_playing);
    assert!(snapshot.output_blocked);
    assert_eq!(snapshot.phase, TransportPhase::Paused);
    let notices = p.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Warning);

    remote.refuse_play(false);
    remote.take_calls();
    p.play();

    assert_eq!(remote.take_calls(), vec![Call::Play]);
    let snapshot = p.snapshot();
    assert!(!snapshot.output_blocked);
    assert_eq!(snapshot.phase, TransportPhase::Playing);
}

#[test]
fn media_failure_is_reported_and_skippable() {
    let (mut p, remote) = player();
    p.play_now(track("a")).unwrap();
    p.enqueue(track("b")).unwrap();
    p.take_notices();

    p.handle_output_event(remote.event(OutputEventKind::Failed("decoder exploded".into())));

    let snapshot = p.snapshot();
    assert_eq!(snapshot.phase, TransportPhase::Failed);
    assert_eq!(
        snapshot.last_error,
        Some(PlaybackError::MediaLoad("decoder exploded".into()))
    );
    let notices = p.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);

    remote.take_calls();
    p.next();
    assert_eq!(remote.take_calls(), vec![Call::Load("/music/b.mp3".into())]);
    assert_eq!(p.snapshot().last_error, None);
}

#[test]
fn play_after_a_failure_reloads_the_track() {
    let (mut p, remote) = player();
    p.play_now(track("a")).unwrap();
    p.handle_output_event(remote.event(OutputEventKind::Failed("io".into())));
    remote.take_calls();

    p.play();

    assert_eq!(remote.take_calls(), vec![Call::Load("/music/a.mp3".into())]);
    assert_eq!(p.snapshot().phase, TransportPhase::Loading);
}

#[test]
fn play_all_after_a_failure_reloads() {
    let (mut p, remote) = player();
    p.play_now(track("a")).unwrap();
    p.handle_output_event(remote.event(OutputEventKind::Failed("io".into())));
    assert_eq!(p.snapshot().phase, TransportPhase::Failed);
    remote.take_calls();

    p.play_all(vec![track("a"), track("b")]).unwrap();

    assert_eq!(remote.take_calls(), vec![Call::Load("/music/a.mp3".into())]);
    let snapshot = p.snapshot();
    assert_eq!(snapshot.phase, TransportPhase::Loading);
    assert_eq!(ids(&snapshot.pending), vec!["b"]);
    assert_eq!(snapshot.last_error, None);
}

#[test]
fn seek_is_validated_then_clamped() {
    let (mut p, remote) = player();
    p.play_now(track("a")).unwrap();

    assert_eq!(p.seek(-1.0), Err(PlaybackError::InvalidSeek(-1.0)));
    assert!(matches!(p.seek(f32::NAN), Err(PlaybackError::InvalidSeek(_))));

    // duration unknown: accepted but nothing happens
    remote.take_calls();
    p.seek(5.0).unwrap();
    assert!(remote.take_calls().is_empty());

    finish_load(&mut p, &remote, 100.0);
    remote.take_calls();
    p.seek(250.0).unwrap();
    assert_eq!(remote.take_calls(), vec![Call::Seek(100.0)]);
    assert_eq!(p.snapshot().elapsed, 100.0);
}

#[test]
fn volume_and_mute() {
    let (mut p, remote) = player();

    assert_eq!(p.set_volume(1.5), Err(PlaybackError::InvalidVolume(1.5)));
    assert!(p.set_volume(f32::INFINITY).is_err());

    p.set_volume(0.0).unwrap();
    let snapshot = p.snapshot();
    assert!(!snapshot.is_muted);
    assert_eq!(snapshot.effective_volume, 0.0);

    p.toggle_mute();
    assert!(p.snapshot().is_muted);
    p.toggle_mute();
    let snapshot = p.snapshot();
    assert!(!snapshot.is_muted);
    assert_eq!(snapshot.volume, 0.5);

    p.set_volume(0.8).unwrap();
    p.toggle_mute();
    assert_eq!(p.snapshot().effective_volume, 0.0);
    p.toggle_mute();
    assert_eq!(p.snapshot().effective_volume, 0.8);

    assert_eq!(
        remote.take_calls(),
        vec![
            Call::Volume(0.0),
            Call::Volume(0.5),
            Call::Volume(0.8),
            Call::Volume(0.0),
            Call::Volume(0.8),
        ]
    );
}

#[test]
fn jumping_within_the_queue_and_removing_the_focus() {
    let (mut p, remote) = player();
    p.play_all(vec![track("a"), track("b"), track("c"), track("d")])
        .unwrap();
    assert_eq!(
        p.take_notices(),
        vec![Notice::info("Playing playlist. Starting with \"A\".")]
    );

    p.play_from_queue(1).unwrap();
    let snapshot = p.snapshot();
    assert_eq!(snapshot.current.as_ref().map(|t| t.id().as_str()), Some("c"));
    assert_eq!(snapshot.focus, Some(1));
    assert_eq!(ids(&snapshot.pending), vec!["b", "c", "d"]);

    assert!(matches!(
        p.play_from_queue(7),
        Err(PlaybackError::InvalidIndex { index: 7, len: 3 })
    ));

    remote.take_calls();
    p.remove_from_queue(1).unwrap();
    let snapshot = p.snapshot();
    assert_eq!(snapshot.current.as_ref().map(|t| t.id().as_str()), Some("b"));
    assert_eq!(snapshot.focus, Some(0));
    assert_eq!(remote.take_calls(), vec![Call::Load("/music/b.mp3".into())]);
}

#[test]
fn empty_playlist_changes_nothing() {
    let (mut p, _remote) = player();
    p.play_now(track("a")).unwrap();
    p.take_notices();

    p.play_all(Vec::new()).unwrap();

    assert_eq!(p.take_notices(), vec![Notice::warning("Playlist is empty.")]);
}

#[test]
fn previous_without_history_is_a_noop() {
    let (mut p, remote) = player();
    p.enqueue(track("a")).unwrap();
    remote.take_calls();

    assert!(!p.previous());
    assert!(remote.take_calls().is_empty());
    assert_eq!(
        p.snapshot().current.as_ref().map(|t| t.id().as_str()),
        Some("a")
    );
}

#[test]
fn clear_and_reset() {
    let (mut p, remote) = player();
    p.play_now(track("a")).unwrap();
    p.enqueue(track("b")).unwrap();
    p.toggle_repeat();
    p.set_volume(0.3).unwrap();
    finish_load(&mut p, &remote, 10.0);
    p.take_notices();
    remote.take_calls();

    p.clear();
    assert_eq!(p.take_notices(), vec![Notice::warning("Queue cleared.")]);
    assert_eq!(remote.take_calls(), vec![Call::Stop]);
    let snapshot = p.snapshot();
    assert_eq!(snapshot.current, None);
    assert_eq!(snapshot.repeat, RepeatMode::One);
    assert_eq!(snapshot.volume, 0.3);

    p.reset();
    let snapshot = p.snapshot();
    assert_eq!(snapshot.repeat, RepeatMode::Off);
    assert_eq!(snapshot.volume, 1.0);
    assert_eq!(snapshot.phase, TransportPhase::Idle);
}

#[test]
fn play_and_pause_need_a_current_track() {
    let (mut p, remote) = player();
    p.play();
    p.toggle_play();
    assert!(!p.snapshot().is_playing);
    assert!(remote.take_calls().is_empty());

    p.enqueue(track("a")).unwrap();
    finish_load(&mut p, &remote, 10.0);
    remote.take_calls();

    p.toggle_play();
    assert_eq!(remote.take_calls(), vec![Call::Play]);
    p.toggle_play();
    assert_eq!(remote.take_calls(), vec![Call::Pause]);
    assert!(!p.snapshot().is_playing);
}

#[test]
fn time_updates_move_elapsed_and_progress() {
    let (mut p, remote) = player();
    p.play_now(track("a")).unwrap();
    finish_load(&mut p, &remote, 200.0);

    p.handle_output_event(remote.event(OutputEventKind::TimeUpdate { position: 50.0 }));

    let snapshot = p.snapshot();
    assert_eq!(snapshot.elapsed, 50.0);
    assert_eq!(snapshot.progress(), 0.25);
}
