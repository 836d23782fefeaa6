use std::{
    io::Write as _,
    sync::mpsc::{self, TryRecvError},
    time::Duration,
};

use cadence_core::{self as cc, util::format_time};

use crate::config::Config;

const TICK: Duration = Duration::from_millis(50);
const VOLUME_STEP: f32 = 0.1;
const SEEK_STEP: f64 = 10.0;

/// Resolves every track's stream, dropping the ones that fail.
pub async fn resolve_all(catalog: &cc::Catalog, tracks: Vec<cc::Track>) -> Vec<cc::Track> {
    let total = tracks.len();
    let mut resolved = Vec::with_capacity(total);
    for (i, track) in tracks.into_iter().enumerate() {
        eprint!("\rResolving streams {}/{total}", i + 1);
        if let Ok(track) = catalog.resolve(&track).await {
            resolved.push(track);
        }
    }
    eprintln!();
    resolved
}

#[derive(Debug, Clone, PartialEq)]
enum Action {
    TogglePlayback,
    Next,
    Previous,
    Shuffle,
    ToggleMute,
    VolumeUp,
    VolumeDown,
    CycleRepeat,
    SeekForward,
    SeekBackward,
    SeekTo(f64),
    Jump(usize),
    Remove(usize),
    List,
    Help,
    Quit,
}
impl Action {
    /// Queue positions are typed 1-based.
    fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let command = parts.next()?;
        let argument = parts.next();
        let position = || {
            argument
                .and_then(|a| a.parse::<usize>().ok())
                .and_then(|n| n.checked_sub(1))
        };

        Some(match command {
            "p" | "play" | "pause" => Action::TogglePlayback,
            "n" | "next" => Action::Next,
            "b" | "prev" | "previous" => Action::Previous,
            "s" | "shuffle" => Action::Shuffle,
            "m" | "mute" => Action::ToggleMute,
            "+" => Action::VolumeUp,
            "-" => Action::VolumeDown,
            "r" | "repeat" => Action::CycleRepeat,
            "f" => Action::SeekForward,
            "w" => Action::SeekBackward,
            "g" | "seek" => Action::SeekTo(argument?.parse().ok()?),
            "j" | "jump" => Action::Jump(position()?),
            "d" | "remove" => Action::Remove(position()?),
            "l" | "list" => Action::List,
            "h" | "?" | "help" => Action::Help,
            "q" | "quit" => Action::Quit,
            _ => return None,
        })
    }

    fn apply(self, engine: &mut cc::PlaybackEngine) {
        let session = engine.session();
        match self {
            Action::TogglePlayback => {
                if session.is_playing() {
                    engine.pause();
                } else {
                    engine.play();
                }
            }
            Action::Next => engine.next(),
            Action::Previous => engine.previous(),
            Action::Shuffle => engine.shuffle(),
            Action::ToggleMute => engine.toggle_mute(),
            Action::VolumeUp => engine.set_volume(session.volume + VOLUME_STEP),
            Action::VolumeDown => engine.set_volume(session.volume - VOLUME_STEP),
            Action::CycleRepeat => engine.cycle_repeat_mode(),
            Action::SeekForward => engine.seek(session.current_time + SEEK_STEP),
            Action::SeekBackward => engine.seek((session.current_time - SEEK_STEP).max(0.0)),
            Action::SeekTo(seconds) => engine.seek(seconds),
            Action::Jump(index) => {
                if let Some(track) = session.queue.get(index).cloned() {
                    engine.play_now(track);
                }
            }
            Action::Remove(index) => engine.remove_from_queue(index),
            Action::List => print_queue(session),
            Action::Help => print_help(),
            Action::Quit => {}
        }
    }
}

/// Plays `tracks` until the user quits, returning the final session.
pub fn run(
    config: &Config,
    tracks: Vec<cc::Track>,
    shuffle: bool,
) -> anyhow::Result<cc::PlaybackSession> {
    let primitive = cc::RodioPrimitive::new()?;
    let mut engine = cc::PlaybackEngine::new(Box::new(primitive));
    engine.set_volume(config.general.volume);
    engine.set_repeat_mode(config.general.repeat_mode);

    for track in tracks {
        engine.add_to_queue(track);
    }
    if shuffle {
        engine.shuffle();
    }
    if let Some(first) = engine.session().queue.current().cloned() {
        engine.play_now(first);
    }

    // Read commands off the main thread so playback keeps updating while we wait
    let (input_tx, input_rx) = mpsc::channel::<String>();
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let Ok(line) = line else { break };
            if input_tx.send(line).is_err() {
                break;
            }
        }
    });

    print_help();
    let mut last_status = String::new();
    loop {
        match input_rx.try_recv() {
            Ok(line) => match Action::parse(&line) {
                Some(Action::Quit) => break,
                Some(action) => {
                    action.apply(&mut engine);
                    // The prompt line was consumed by the input
                    last_status.clear();
                }
                None if line.trim().is_empty() => last_status.clear(),
                None => println!("Unknown command `{}`; `h` for help", line.trim()),
            },
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => break,
        }

        engine.pump();

        let status = status_line(engine.session());
        if status != last_status {
            print!("\r{status}\x1b[K");
            std::io::stdout().flush()?;
            last_status = status;
        }

        std::thread::sleep(TICK);
    }
    println!();

    Ok(engine.session().clone())
}

fn status_line(session: &cc::PlaybackSession) -> String {
    let Some(track) = &session.current_track else {
        return "Nothing loaded".to_string();
    };
    let icon = if session.is_playing() { ">" } else { "||" };
    let volume = if session.is_muted {
        "muted".to_string()
    } else {
        format!("{:.0}%", session.volume * 100.0)
    };
    let mut status = format!(
        "{icon} {} - {}  {} / {}  vol {volume}  repeat {}{}",
        track.title,
        track.artist,
        format_time(session.current_time),
        format_time(session.duration),
        session.repeat_mode,
        if session.is_shuffled { "  shuffled" } else { "" },
    );
    if let Some(error) = &session.last_error {
        status.push_str(&format!("  [{}]", error.display_name()));
    }
    status
}

fn print_queue(session: &cc::PlaybackSession) {
    println!();
    for (i, track) in session.queue.tracks().iter().enumerate() {
        let marker = if i == session.queue.current_index() {
            "*"
        } else {
            " "
        };
        println!(
            "{marker}{:>3}. {} - {} [{}]",
            i + 1,
            track.title,
            track.artist,
            format_time(track.duration as f64)
        );
    }
}

fn print_help() {
    println!();
    println!("p play/pause   n next   b previous   s shuffle   r repeat   m mute   +/- volume");
    println!("f/w seek ±10s   g <secs> seek   j <n> jump   d <n> remove   l list   q quit");
}
