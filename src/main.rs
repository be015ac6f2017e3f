use crate::AppError::ConfigError;
use biab_decoder::{
    parse_biab_data_with, BiabError as LibBiabError, DecoderConfig, LogDiagnostics, Song,
};
use clap::Parser;
use std::io;
use std::path::PathBuf;

fn main() {
    let result = main_result();
    std::process::exit(match result {
        Ok(()) => 0,
        Err(err) => {
            // use Display instead of Debug for user friendly error messages
            log::error!("{err}");
            1
        }
    });
}

pub fn main_result() -> Result<(), AppError> {
    // setup logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("biab_decoder=info"),
    )
    .init();

    // args
    let args = CliArgs::parse();
    let song_file = PathBuf::from(&args.song_file);
    let config_file = args.config_file.map(PathBuf::from);

    // check if song file exists
    if !song_file.exists() {
        let err = ConfigError(format!("Song file not found {song_file:?}"));
        return Err(err);
    }

    // read optional decoder config
    let config = match &config_file {
        Some(config_file) => {
            log::info!("Using decoder configuration {config_file:?}");
            DecoderConfig::read_config(config_file)?
        }
        None => DecoderConfig::default(),
    };

    // go!
    let file_data = std::fs::read(&song_file)?;
    let song = parse_biab_data_with(&file_data, &config, &mut LogDiagnostics)?;
    if args.json {
        let json = serde_json::to_string_pretty(&song)
            .map_err(|err| AppError::OtherError(format!("Could not serialize song {err:}")))?;
        println!("{json}");
    } else {
        print_summary(&song, &config);
    }
    Ok(())
}

fn print_summary(song: &Song, config: &DecoderConfig) {
    println!("{}", song.title());
    println!(
        "style {} ({}) key offset {} tempo {}",
        song.header.style_index,
        song.time_signature,
        song.key_offset,
        song.tempo().value
    );
    println!("{} measures, {} chords", song.measure_count, song.chords.len());
    for chord in &song.chords {
        let root = chord.root.map_or_else(|| "-".to_string(), |r| r.to_string());
        println!(
            "  beat {:>6} root {root:>2} bass {:>2} ext {:>3}",
            chord.beat.to_string(),
            chord.bass,
            chord.extension
        );
    }
    match song.chorus {
        Some(chorus) => println!(
            "chorus {}-{} x{}",
            chorus.start, chorus.end, chorus.repeats
        ),
        None => println!("no chorus"),
    }
    println!("style file {}", song.style_name());
    let length = biab_decoder::ticks_to_seconds(
        u64::from(song.end_tick),
        song.tempo().bpm(),
        config.ticks_per_quarter,
    );
    println!("{} note events, {length:.1}s", song.note_events.len());
    if !song.warnings.is_empty() {
        println!("{} warnings", song.warnings.len());
    }
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the Band-in-a-Box song file.
    song_file: String,
    /// Optional path to a JSON decoder configuration.
    #[arg(long)]
    config_file: Option<String>,
    /// Print the whole song as JSON.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    ConfigError(String),
    #[error("parsing error: {0}")]
    ParsingError(String),
    #[error("other error: {0}")]
    OtherError(String),
}

impl From<LibBiabError> for AppError {
    fn from(error: LibBiabError) -> Self {
        match error {
            LibBiabError::ConfigError(s) => Self::ConfigError(s),
            LibBiabError::IoError(s) => Self::OtherError(s),
            other => Self::ParsingError(other.to_string()),
        }
    }
}

impl From<io::Error> for AppError {
    fn from(error: io::Error) -> Self {
        Self::OtherError(error.to_string())
    }
}
