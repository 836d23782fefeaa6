use std::{
    sync::mpsc::{self, TryRecvError},
    time::{Duration, Instant},
};

use rodio::Source as _;

use crate::{
    AudioPrimitive, PlaybackError, PrimitiveEvent, PrimitiveEventTx, SourceEvent, SourceId,
    tokio_thread::{TokioHandle, TokioThread},
};

/// An [`AudioPrimitive`] that plays through the default output device.
///
/// Sources are downloaded in full, then decoded and played from memory. Output happens on a
/// dedicated playback thread; this handle only sends it commands.
pub struct RodioPrimitive {
    tx: mpsc::Sender<Command>,
    _playback_thread_handle: std::thread::JoinHandle<()>,
    _tokio_thread: TokioThread,
}

enum Command {
    SetSource(SourceId, String),
    Play,
    Pause,
    Seek(f64),
    SetVolume(f32),
    Subscribe(PrimitiveEventTx),
    Unsubscribe,
}

/// A finished download, tagged with the source it was started for.
struct Loaded {
    source: SourceId,
    result: Result<Vec<u8>, String>,
}

impl RodioPrimitive {
    const POSITION_UPDATE_INTERVAL: Duration = Duration::from_millis(250);
    const TICK: Duration = Duration::from_millis(10);

    /// Opens the default output device. Fails if there is none.
    pub fn new() -> Result<Self, PlaybackError> {
        let tokio_thread =
            TokioThread::new().map_err(|e| PlaybackError::StartFailed(e.to_string()))?;
        let tokio = tokio_thread.handle();

        let (tx, rx) = mpsc::channel();
        let (ready_tx, ready_rx) = mpsc::channel();
        let playback_thread_handle = std::thread::Builder::new()
            .name("cadence-playback".to_string())
            .spawn(move || {
                let stream = match rodio::OutputStreamBuilder::open_default_stream() {
                    Ok(stream) => stream,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e.to_string()));
                        return;
                    }
                };
                let _ = ready_tx.send(Ok(()));
                let sink = rodio::Sink::connect_new(stream.mixer());
                PlaybackThread::new(sink, tokio).run(rx);
            })
            .map_err(|e| PlaybackError::StartFailed(e.to_string()))?;

        match ready_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(PlaybackError::StartFailed(e)),
            Err(_) => {
                return Err(PlaybackError::StartFailed(
                    "playback thread exited during startup".to_string(),
                ));
            }
        }
        tracing::info!("Opened default audio output");

        Ok(Self {
            tx,
            _playback_thread_handle: playback_thread_handle,
            _tokio_thread: tokio_thread,
        })
    }

    fn send(&self, command: Command) {
        if self.tx.send(command).is_err() {
            tracing::warn!("Playback thread has exited; dropping command");
        }
    }
}
impl AudioPrimitive for RodioPrimitive {
    fn set_source(&mut self, id: SourceId, url: &str) {
        self.send(Command::SetSource(id, url.to_string()));
    }

    fn play(&mut self) {
        self.send(Command::Play);
    }

    fn pause(&mut self) {
        self.send(Command::Pause);
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.send(Command::Seek(seconds));
    }

    fn set_volume(&mut self, volume: f32) {
        self.send(Command::SetVolume(volume));
    }

    fn subscribe(&mut self, events: PrimitiveEventTx) {
        self.send(Command::Subscribe(events));
    }

    fn unsubscribe(&mut self) {
        self.send(Command::Unsubscribe);
    }
}

/// Where the current source is in its lifecycle.
#[derive(Debug, Default)]
enum SourceState {
    #[default]
    Empty,
    Loading {
        /// `play` arrived before the download finished.
        wants_play: bool,
    },
    /// Kept so the source can be replayed after it ends.
    Ready(Vec<u8>),
    /// Every later `play` is refused with this, until the source is replaced.
    Failed(PlaybackError),
}

#[derive(Debug, PartialEq)]
enum PlayRequest {
    Start,
    Deferred,
    Refused(PlaybackError),
}

impl SourceState {
    fn request_play(&mut self) -> PlayRequest {
        match self {
            SourceState::Empty => PlayRequest::Refused(PlaybackError::NoSource),
            SourceState::Loading { wants_play } => {
                *wants_play = true;
                PlayRequest::Deferred
            }
            SourceState::Ready(_) => PlayRequest::Start,
            SourceState::Failed(error) => PlayRequest::Refused(error.clone()),
        }
    }

    fn cancel_play(&mut self) {
        if let SourceState::Loading { wants_play } = self {
            *wants_play = false;
        }
    }

    fn is_ready(&self) -> bool {
        matches!(self, SourceState::Ready(_))
    }
}

struct PlaybackThread {
    sink: rodio::Sink,
    tokio: TokioHandle,
    http: reqwest::Client,
    loaded_tx: mpsc::Sender<Loaded>,
    loaded_rx: mpsc::Receiver<Loaded>,
    events: Option<PrimitiveEventTx>,

    /// Downloads for any other source are discarded.
    source: SourceId,
    state: SourceState,
    duration: f64,
    ended_reported: bool,
    last_position_update: Instant,
}
impl PlaybackThread {
    fn new(sink: rodio::Sink, tokio: TokioHandle) -> Self {
        let (loaded_tx, loaded_rx) = mpsc::channel();
        sink.pause();
        Self {
            sink,
            tokio,
            http: reqwest::Client::new(),
            loaded_tx,
            loaded_rx,
            events: None,
            source: SourceId::default(),
            state: SourceState::Empty,
            duration: f64::NAN,
            ended_reported: false,
            last_position_update: Instant::now(),
        }
    }

    fn run(mut self, rx: mpsc::Receiver<Command>) {
        loop {
            // Process all available messages without blocking
            loop {
                match rx.try_recv() {
                    Ok(command) => self.handle_command(command),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => return,
                }
            }
            while let Ok(loaded) = self.loaded_rx.try_recv() {
                self.handle_loaded(loaded);
            }

            self.tick();
            std::thread::sleep(RodioPrimitive::TICK);
        }
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::SetSource(source, url) => {
                self.source = source;
                self.sink.clear();
                self.state = SourceState::Loading { wants_play: false };
                self.duration = f64::NAN;
                self.ended_reported = false;
                self.download(url);
            }
            Command::Play => match self.state.request_play() {
                PlayRequest::Start => {
                    if self.sink.empty()
                        && let Err(error) = self.append_current()
                    {
                        self.fail(error);
                        return;
                    }
                    self.sink.play();
                    self.emit(PrimitiveEvent::PlayStarted);
                }
                PlayRequest::Deferred => {}
                PlayRequest::Refused(error) => {
                    tracing::debug!("Refusing play: {error}");
                    self.emit(PrimitiveEvent::PlayFailed(error));
                }
            },
            Command::Pause => {
                self.state.cancel_play();
                self.sink.pause();
            }
            Command::Seek(seconds) => match Duration::try_from_secs_f64(seconds) {
                Ok(position) => {
                    if let Err(e) = self.sink.try_seek(position) {
                        tracing::warn!("Failed to seek to position {position:?}: {e}");
                    }
                }
                Err(e) => tracing::warn!("Ignoring seek to {seconds}: {e}"),
            },
            Command::SetVolume(volume) => self.sink.set_volume(volume),
            Command::Subscribe(events) => self.events = Some(events),
            Command::Unsubscribe => self.events = None,
        }
    }

    fn download(&self, url: String) {
        let source = self.source;
        let http = self.http.clone();
        let loaded_tx = self.loaded_tx.clone();
        tracing::debug!("Downloading source {}", source.0);
        self.tokio.spawn(async move {
            let result = async {
                let response = http.get(&url).send().await?.error_for_status()?;
                Ok::<_, reqwest::Error>(response.bytes().await?.to_vec())
            }
            .await
            .map_err(|e| e.to_string());
            let _ = loaded_tx.send(Loaded { source, result });
        });
    }

    fn handle_loaded(&mut self, loaded: Loaded) {
        if loaded.source != self.source {
            tracing::debug!("Discarding stale download for source {}", loaded.source.0);
            return;
        }
        let wants_play = matches!(self.state, SourceState::Loading { wants_play: true });
        let data = match loaded.result {
            Ok(data) => data,
            Err(e) => {
                self.fail(PlaybackError::LoadFailed(e));
                return;
            }
        };

        self.state = SourceState::Ready(data);
        if let Err(error) = self.append_current() {
            self.fail(error);
            return;
        }
        self.emit(PrimitiveEvent::MetadataLoaded {
            current_time: 0.0,
            duration: self.duration,
        });

        if wants_play {
            self.sink.play();
            self.emit(PrimitiveEvent::PlayStarted);
        }
    }

    /// Marks the current source as unplayable and reports it.
    fn fail(&mut self, error: PlaybackError) {
        tracing::warn!("Source {} failed: {error}", self.source.0);
        self.sink.clear();
        self.state = SourceState::Failed(error.clone());
        self.emit(PrimitiveEvent::PlayFailed(error));
    }

    /// Decodes the current source into the sink.
    fn append_current(&mut self) -> Result<(), PlaybackError> {
        let SourceState::Ready(data) = &self.state else {
            return Err(PlaybackError::NoSource);
        };
        let data = data.clone();
        let decoder = rodio::decoder::DecoderBuilder::new()
            .with_byte_len(data.len() as u64)
            .with_data(std::io::Cursor::new(data))
            .build()
            .map_err(|e| PlaybackError::DecodeFailed(e.to_string()))?;
        if let Some(duration) = decoder.total_duration() {
            self.duration = duration.as_secs_f64();
        }
        self.sink.append(decoder);
        self.ended_reported = false;
        Ok(())
    }

    fn tick(&mut self) {
        if !self.state.is_ready() {
            return;
        }

        if self.sink.empty() {
            if !self.ended_reported {
                self.ended_reported = true;
                self.emit(PrimitiveEvent::TimeUpdate {
                    current_time: self.duration,
                    duration: self.duration,
                });
                self.emit(PrimitiveEvent::Ended);
            }
            return;
        }

        let now = Instant::now();
        if !self.sink.is_paused()
            && now.duration_since(self.last_position_update)
                >= RodioPrimitive::POSITION_UPDATE_INTERVAL
        {
            self.last_position_update = now;
            self.emit(PrimitiveEvent::TimeUpdate {
                current_time: self.sink.get_pos().as_secs_f64(),
                duration: self.duration,
            });
        }
    }

    fn emit(&self, event: PrimitiveEvent) {
        if let Some(events) = &self.events {
            let _ = events.send(SourceEvent {
                source: self.source,
                event,
            });
        }
    }
}
