use super::degraded::{DECODE_REMEDIATION, DegradedBackend, Mixer};
use super::full::{FullBackend, MediaPlayer};
use super::select::select_backend;
use super::types::{Backend, BackendKind, NativeError};
use crate::config::BackendPreference;
use crate::error::PlaybackError;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

#[derive(Default)]
struct PlayerLog {
    opened: Vec<PathBuf>,
    toggles: usize,
    stops: usize,
    volume_percent: Option<u8>,
}

/// Media player whose toggle really flips, like the real thing.
struct FakePlayer {
    log: Rc<RefCell<PlayerLog>>,
    playing: bool,
    open_error: Option<fn() -> NativeError>,
    unplayable: Vec<PathBuf>,
}

impl FakePlayer {
    fn new(log: Rc<RefCell<PlayerLog>>) -> Self {
        Self {
            log,
            playing: false,
            open_error: None,
            unplayable: Vec::new(),
        }
    }
}

impl MediaPlayer for FakePlayer {
    fn open(&mut self, path: &Path) -> Result<(), NativeError> {
        if let Some(make) = self.open_error {
            return Err(make());
        }
        if self.unplayable.iter().any(|p| p == path) {
            return Err(decode_error());
        }
        self.log.borrow_mut().opened.push(path.to_path_buf());
        self.playing = true;
        Ok(())
    }
    fn toggle_pause(&mut self) {
        self.log.borrow_mut().toggles += 1;
        self.playing = !self.playing;
    }
    fn stop(&mut self) {
        self.log.borrow_mut().stops += 1;
        self.playing = false;
    }
    fn set_volume_percent(&mut self, percent: u8) {
        self.log.borrow_mut().volume_percent = Some(percent);
    }
    fn is_playing(&self) -> bool {
        self.playing
    }
    fn time_ms(&self) -> i64 {
        1_500
    }
    fn length_ms(&self) -> i64 {
        180_000
    }
}

#[derive(Default)]
struct MixerLog {
    calls: Vec<&'static str>,
    volume: Option<f32>,
}

struct FakeMixer {
    log: Rc<RefCell<MixerLog>>,
    load_error: Option<fn() -> NativeError>,
}

impl Mixer for FakeMixer {
    fn load(&mut self, path: &Path) -> Result<(), NativeError> {
        self.log.borrow_mut().calls.push("load");
        if path.extension().is_some_and(|e| e == "xm") {
            return Err(decode_error());
        }
        match self.load_error {
            Some(make) => Err(make()),
            None => Ok(()),
        }
    }
    fn play(&mut self) {
        self.log.borrow_mut().calls.push("play");
    }
    fn pause(&mut self) {
        self.log.borrow_mut().calls.push("pause");
    }
    fn unpause(&mut self) {
        self.log.borrow_mut().calls.push("unpause");
    }
    fn stop(&mut self) {
        self.log.borrow_mut().calls.push("stop");
    }
    fn set_volume(&mut self, volume: f32) {
        self.log.borrow_mut().volume = Some(volume);
    }
    fn busy(&self) -> bool {
        true
    }
    fn pos_ms(&self) -> i64 {
        -1
    }
}

fn fixed_duration(_: &Path) -> Option<Duration> {
    Some(Duration::from_millis(212_500))
}

fn no_duration(_: &Path) -> Option<Duration> {
    None
}

fn decode_error() -> NativeError {
    NativeError::Decode("unrecognized format".into())
}

fn not_found() -> NativeError {
    NativeError::Open {
        path: "/gone.mp3".into(),
        source: std::io::Error::from(std::io::ErrorKind::NotFound),
    }
}

#[test]
fn full_pause_and_resume_toggle_only_on_change() {
    let log = Rc::new(RefCell::new(PlayerLog::default()));
    let mut backend = FullBackend::new(FakePlayer::new(log.clone()));

    // Nothing loaded: both halves are no-ops.
    backend.pause();
    backend.resume();
    assert_eq!(log.borrow().toggles, 0);

    backend.load_and_play(Path::new("/m/a.mp3")).unwrap();
    assert!(backend.is_busy());

    backend.pause();
    backend.pause();
    assert_eq!(log.borrow().toggles, 1);
    assert!(!backend.is_busy());

    backend.resume();
    backend.resume();
    assert_eq!(log.borrow().toggles, 2);
    assert!(backend.is_busy());
}

#[test]
fn full_load_resets_commanded_pause_state() {
    let log = Rc::new(RefCell::new(PlayerLog::default()));
    let mut backend = FullBackend::new(FakePlayer::new(log.clone()));

    backend.load_and_play(Path::new("/m/a.mp3")).unwrap();
    backend.pause();
    backend.load_and_play(Path::new("/m/b.mp3")).unwrap();

    // A fresh track plays, so the next pause must toggle again.
    backend.pause();
    assert_eq!(log.borrow().toggles, 2);
    assert_eq!(
        log.borrow().opened,
        vec![PathBuf::from("/m/a.mp3"), PathBuf::from("/m/b.mp3")]
    );
}

#[test]
fn full_reports_native_position_and_duration_only_when_loaded() {
    let log = Rc::new(RefCell::new(PlayerLog::default()));
    let mut backend = FullBackend::new(FakePlayer::new(log.clone()));
    assert_eq!(backend.position_seconds(), 0.0);
    assert_eq!(backend.duration_seconds(None), 0.0);

    backend.load_and_play(Path::new("/m/a.mp3")).unwrap();
    assert_eq!(backend.position_seconds(), 1.5);
    assert_eq!(backend.duration_seconds(None), 180.0);
    assert_eq!(backend.kind(), BackendKind::Full);

    backend.stop();
    backend.stop();
    // Loading never stops the native player; only the two explicit calls do.
    assert_eq!(log.borrow().stops, 2);
    assert_eq!(backend.position_seconds(), 0.0);
    assert!(!backend.is_busy());
}

#[test]
fn full_volume_is_clamped_to_percent() {
    let log = Rc::new(RefCell::new(PlayerLog::default()));
    let mut backend = FullBackend::new(FakePlayer::new(log.clone()));
    backend.set_volume(1.7);
    assert_eq!(log.borrow().volume_percent, Some(100));
    backend.set_volume(-0.5);
    assert_eq!(log.borrow().volume_percent, Some(0));
    backend.set_volume(0.42);
    assert_eq!(log.borrow().volume_percent, Some(42));
}

#[test]
fn full_maps_missing_file_and_decode_errors() {
    let log = Rc::new(RefCell::new(PlayerLog::default()));
    let mut player = FakePlayer::new(log.clone());
    player.open_error = Some(not_found);
    let mut backend = FullBackend::new(player);
    assert!(matches!(
        backend.load_and_play(Path::new("/gone.mp3")),
        Err(PlaybackError::ResourceMissing(_))
    ));

    let mut player = FakePlayer::new(log);
    player.open_error = Some(decode_error);
    let mut backend = FullBackend::new(player);
    match backend.load_and_play(Path::new("/m/a.xm")) {
        Err(PlaybackError::UnplayableFormat { message, .. }) => {
            assert!(!message.contains(DECODE_REMEDIATION));
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(!backend.is_busy());
}

#[test]
fn degraded_uses_distinct_pause_and_unpause() {
    let log = Rc::new(RefCell::new(MixerLog::default()));
    let mixer = FakeMixer {
        log: log.clone(),
        load_error: None,
    };
    let mut backend = DegradedBackend::new(mixer, no_duration);

    backend.load_and_play(Path::new("/m/a.ogg")).unwrap();
    backend.pause();
    backend.pause();
    backend.resume();
    backend.resume();

    assert_eq!(
        log.borrow().calls,
        vec!["load", "play", "pause", "unpause"]
    );
    assert_eq!(backend.kind(), BackendKind::Degraded);
}

#[test]
fn degraded_duration_comes_from_metadata_hint() {
    let log = Rc::new(RefCell::new(MixerLog::default()));
    let mixer = FakeMixer {
        log,
        load_error: None,
    };
    let backend = DegradedBackend::new(mixer, fixed_duration);
    assert_eq!(backend.duration_seconds(None), 0.0);
    assert_eq!(backend.duration_seconds(Some(Path::new("/m/a.ogg"))), 212.5);
    // Unknown native position reads as zero.
    assert_eq!(backend.position_seconds(), 0.0);
}

#[test]
fn degraded_decode_failure_carries_remediation() {
    let log = Rc::new(RefCell::new(MixerLog::default()));
    let mixer = FakeMixer {
        log: log.clone(),
        load_error: Some(decode_error),
    };
    let mut backend = DegradedBackend::new(mixer, no_duration);

    let err = backend.load_and_play(Path::new("/m/track.xm")).unwrap_err();
    match &err {
        PlaybackError::UnplayableFormat { path, message } => {
            assert_eq!(path, Path::new("/m/track.xm"));
            assert!(message.contains(DECODE_REMEDIATION));
            assert!(message.contains("unrecognized format"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("audio.backend"));
    assert!(!log.borrow().calls.contains(&"play"));
    assert!(!backend.is_busy());
}

#[test]
fn degraded_volume_is_clamped() {
    let log = Rc::new(RefCell::new(MixerLog::default()));
    let mixer = FakeMixer {
        log: log.clone(),
        load_error: None,
    };
    let mut backend = DegradedBackend::new(mixer, no_duration);
    backend.set_volume(3.0);
    assert_eq!(log.borrow().volume, Some(1.0));
    backend.set_volume(f32::NAN);
    assert_eq!(log.borrow().volume, Some(1.0));
}

fn boxed_full() -> Result<Box<dyn Backend>, NativeError> {
    let log = Rc::new(RefCell::new(PlayerLog::default()));
    Ok(Box::new(FullBackend::new(FakePlayer::new(log))))
}

fn boxed_degraded() -> Result<Box<dyn Backend>, NativeError> {
    let log = Rc::new(RefCell::new(MixerLog::default()));
    Ok(Box::new(DegradedBackend::new(
        FakeMixer {
            log,
            load_error: None,
        },
        no_duration,
    )))
}

fn no_device() -> Result<Box<dyn Backend>, NativeError> {
    Err(NativeError::Device("no default output".into()))
}

#[test]
fn auto_selection_prefers_full_backend() {
    let backend = select_backend(BackendPreference::Auto, boxed_full, boxed_degraded).unwrap();
    assert_eq!(backend.kind(), BackendKind::Full);
}

#[test]
fn auto_selection_falls_back_to_degraded() {
    let backend = select_backend(BackendPreference::Auto, no_device, boxed_degraded).unwrap();
    assert_eq!(backend.kind(), BackendKind::Degraded);
}

#[test]
fn selection_fails_when_no_backend_can_be_built() {
    let err = select_backend(BackendPreference::Auto, no_device, no_device)
        .err()
        .unwrap();
    match err {
        PlaybackError::NoAudioBackend { full, degraded } => {
            assert!(full.contains("no default output"));
            assert!(degraded.contains("no default output"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn explicit_preference_never_tries_the_other_backend() {
    let err = select_backend(BackendPreference::Full, no_device, boxed_degraded)
        .err()
        .unwrap();
    assert!(matches!(err, PlaybackError::NoAudioBackend { .. }));

    let backend =
        select_backend(BackendPreference::Degraded, boxed_full, boxed_degraded).unwrap();
    assert_eq!(backend.kind(), BackendKind::Degraded);
}

fn always(_: &Path) -> bool {
    true
}

#[test]
fn engine_surfaces_degraded_decode_failure_with_remediation() {
    use crate::engine::{Engine, TransportState};

    let log = Rc::new(RefCell::new(MixerLog::default()));
    let mixer = FakeMixer {
        log,
        load_error: Some(decode_error),
    };
    let backend = DegradedBackend::new(mixer, no_duration);
    let mut engine = Engine::with_backend(Box::new(backend), 0.7).with_exists_probe(always);
    engine.select_playlist(vec![PathBuf::from("/m/module.xm")]);

    match engine.play_current() {
        Err(PlaybackError::UnplayableFormat { message, .. }) => {
            assert!(message.contains(DECODE_REMEDIATION));
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(engine.state(), TransportState::Stopped);
}

#[test]
fn full_failed_load_keeps_previous_track_playing() {
    let log = Rc::new(RefCell::new(PlayerLog::default()));
    let mut player = FakePlayer::new(log.clone());
    player.unplayable.push(PathBuf::from("/m/b.xm"));
    let mut backend = FullBackend::new(player);

    backend.load_and_play(Path::new("/m/a.mp3")).unwrap();
    assert!(backend.load_and_play(Path::new("/m/b.xm")).is_err());

    assert!(backend.is_busy());
    assert_eq!(backend.position_seconds(), 1.5);
    assert_eq!(log.borrow().stops, 0);
    backend.pause();
    assert_eq!(log.borrow().toggles, 1);
}

#[test]
fn degraded_failed_load_keeps_previous_track_playing() {
    let log = Rc::new(RefCell::new(MixerLog::default()));
    let mixer = FakeMixer {
        log: log.clone(),
        load_error: None,
    };
    let mut backend = DegradedBackend::new(mixer, no_duration);

    backend.load_and_play(Path::new("/m/a.ogg")).unwrap();
    assert!(backend.load_and_play(Path::new("/m/b.xm")).is_err());
    assert!(backend.is_busy());
    backend.pause();

    assert_eq!(log.borrow().calls, vec!["load", "play", "load", "pause"]);
}

fn full_engine(unplayable: &[&str]) -> (crate::engine::Engine, Rc<RefCell<PlayerLog>>) {
    use crate::engine::Engine;

    let log = Rc::new(RefCell::new(PlayerLog::default()));
    let mut player = FakePlayer::new(log.clone());
    player.unplayable = unplayable.iter().map(PathBuf::from).collect();
    let mut engine = Engine::with_backend(Box::new(FullBackend::new(player)), 0.7)
        .with_exists_probe(always)
        .with_start_grace(Duration::ZERO);
    engine.select_playlist(vec![
        PathBuf::from("/m/a.mp3"),
        PathBuf::from("/m/b.xm"),
        PathBuf::from("/m/c.mp3"),
    ]);
    (engine, log)
}

#[test]
fn engine_failed_next_keeps_current_track_and_does_not_skip() {
    use crate::engine::{TickOutcome, TransportState};

    let (mut engine, log) = full_engine(&["/m/b.xm"]);
    engine.play_current().unwrap();

    assert!(matches!(
        engine.next(),
        Err(PlaybackError::UnplayableFormat { .. })
    ));
    assert_eq!(engine.state(), TransportState::Playing);
    assert_eq!(engine.current_track(), Some(Path::new("/m/a.mp3")));

    // The old track is still audible, so the tick must not auto-advance.
    assert_eq!(engine.tick(), TickOutcome::Progress);
    assert_eq!(log.borrow().opened, vec![PathBuf::from("/m/a.mp3")]);
}

#[test]
fn engine_failed_select_while_paused_can_still_resume() {
    use crate::engine::TransportState;

    let (mut engine, log) = full_engine(&["/m/b.xm"]);
    engine.play_current().unwrap();
    engine.toggle_play_pause().unwrap();
    assert_eq!(engine.state(), TransportState::Paused);

    assert!(engine.select_index(1).is_err());
    assert_eq!(engine.state(), TransportState::Paused);

    engine.toggle_play_pause().unwrap();
    assert_eq!(engine.state(), TransportState::Playing);
    assert_eq!(log.borrow().toggles, 2);
}
