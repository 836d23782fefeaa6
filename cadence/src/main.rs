mod config;
#[cfg(feature = "audio")]
mod player;

use anyhow::Context as _;
use cadence_core::{self as cc, util::format_time, yt};
use clap::{Parser, Subcommand};
use config::Config;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search YouTube for music
    Search {
        /// What to search for
        #[arg(required = true)]
        query: Vec<String>,

        /// The kind of result to look for: video, playlist or channel
        #[arg(long, default_value_t = yt::SearchKind::Video)]
        kind: yt::SearchKind,

        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// List trending music for the configured region
    Trending {
        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Resolve the audio stream for a video ID or URL
    Resolve {
        /// A video ID or watch URL
        video: String,
    },
    /// Queue up search results, or trending music if no query is given, and play them
    Play {
        /// What to search for
        query: Vec<String>,

        /// Maximum number of tracks to queue
        #[arg(short, long)]
        limit: Option<u32>,

        /// Shuffle the queue before starting
        #[arg(long)]
        shuffle: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("cadence=info,cadence_core=info,warn")
            }),
        )
        .init();

    let args = Args::parse();

    // Load and save config at startup
    let config = Config::load()?;
    config.save()?;

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let client = yt::Client::new(config.youtube.api_key(), &config.youtube.stream_base_url);
    let has_api_key = client.has_api_key();
    let catalog = cc::Catalog::new(client, &config.youtube.region_code);
    let require_api_key = || -> anyhow::Result<()> {
        anyhow::ensure!(
            has_api_key,
            "No YouTube API key configured: set `youtube.api_key` in {} or {}",
            Config::FILENAME,
            config::Youtube::API_KEY_ENV
        );
        Ok(())
    };

    match args.command {
        Command::Search { query, kind, limit } => {
            require_api_key()?;
            let limit = limit.unwrap_or(config.general.search_limit);
            let tracks = runtime.block_on(catalog.search(&query.join(" "), kind, limit))?;
            print_tracks(&tracks);
        }
        Command::Trending { limit } => {
            require_api_key()?;
            let limit = limit.unwrap_or(config.general.search_limit);
            let tracks = runtime.block_on(catalog.trending(limit));
            print_tracks(&tracks);
        }
        Command::Resolve { video } => {
            let video_id = cc::parse_video_id(&video)?;
            let stream = runtime
                .block_on(catalog.resolve_stream(&video_id))
                .with_context(|| format!("Failed to resolve {video_id}"))?;
            println!("{} - {}", stream.details.title, stream.details.author);
            println!(
                "length: {}",
                format_time(stream.details.length_seconds as f64)
            );
            if let Some(container) = &stream.container {
                println!("container: {container}");
            }
            if let Some(bitrate) = stream.bitrate_kbps {
                println!("bitrate: {bitrate} kbps");
            }
            if let Some(length) = stream.content_length {
                println!("size: {length} bytes");
            }
            println!("{}", stream.stream_url);
        }
        Command::Play {
            query,
            limit,
            shuffle,
        } => {
            require_api_key()?;
            let limit = limit.unwrap_or(config.general.search_limit);
            let query = query.join(" ");
            let tracks = runtime.block_on(async {
                if query.trim().is_empty() {
                    Ok(catalog.trending(limit).await)
                } else {
                    catalog.search(&query, yt::SearchKind::Video, limit).await
                }
            })?;
            anyhow::ensure!(!tracks.is_empty(), "Nothing found to play");

            #[cfg(feature = "audio")]
            {
                let mut config = config;
                let tracks = runtime.block_on(player::resolve_all(&catalog, tracks));
                anyhow::ensure!(!tracks.is_empty(), "None of the tracks could be resolved");
                let session = player::run(&config, tracks, shuffle)?;
                config.general.volume = session.volume;
                config.general.repeat_mode = session.repeat_mode;
                config.save()?;
            }
            #[cfg(not(feature = "audio"))]
            {
                let _ = (tracks, shuffle);
                anyhow::bail!("cadence was built without audio support");
            }
        }
    }

    Ok(())
}

fn print_tracks(tracks: &[cc::Track]) {
    if tracks.is_empty() {
        println!("No results.");
        return;
    }
    for (i, track) in tracks.iter().enumerate() {
        println!(
            "{:>3}. {} - {} [{}] ({})",
            i + 1,
            track.title,
            track.artist,
            format_time(track.duration as f64),
            track.video_id
        );
    }
}
