use std::io::BufRead;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use log::{error, info, warn};
use serde::Serialize;

use subidy::config::{self, Config};
use subidy::{credentials, InitError, SearchQuery, SubidyBackend};

#[derive(Parser, Debug)]
#[command(name = "subidy", version, about = "Browse and search a Subsonic music server")]
struct CliArgs {
    /// Config file, defaults to `<config dir>/subidy/config.toml`.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output; repeat for trace level.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log warnings and errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the server answers.
    Ping,
    /// List the children of a URI (root when omitted).
    Browse { uri: Option<String> },
    /// Resolve URIs to artists or tracks.
    Lookup {
        #[arg(required = true)]
        uris: Vec<String>,
    },
    /// Search with FIELD=VALUE terms (artist, album, track_name, comment, any).
    Search {
        #[arg(long)]
        exact: bool,
        #[arg(value_parser = parse_term)]
        terms: Vec<(String, String)>,
    },
    /// Distinct values of one field over a search.
    Distinct {
        field: String,
        #[arg(value_parser = parse_term)]
        terms: Vec<(String, String)>,
    },
    /// List playlists.
    Playlists,
    /// Show one playlist with its tracks.
    Playlist { uri: String },
    /// List the track references of a playlist.
    PlaylistItems { uri: String },
    /// Create an empty playlist.
    CreatePlaylist { name: String },
    /// Delete a playlist.
    DeletePlaylist { uri: String },
    /// Replace the contents of a playlist with the given song URIs, in order.
    SavePlaylist {
        uri: String,
        track_uris: Vec<String>,
    },
    /// Print the stream URL of a song.
    Stream { song_uri: String },
    /// Print the cover art URL for a cover art id.
    CoverArt { id: String },
    /// Store the server password read from stdin in the system keyring.
    SetPassword,
}

fn parse_term(term: &str) -> Result<(String, String), String> {
    let (field, value) = term
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{term}'"))?;
    if field.trim().is_empty() {
        return Err(format!("missing field name in '{term}'"));
    }
    Ok((field.trim().to_string(), value.to_string()))
}

fn build_query(terms: Vec<(String, String)>) -> SearchQuery {
    let mut query = SearchQuery::new();
    for (field, value) in terms {
        query.entry(field).or_default().push(value);
    }
    query
}

fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("Failed to serialize output: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => log::LevelFilter::Warn,
        (false, 0) => log::LevelFilter::Info,
        (false, 1) => log::LevelFilter::Debug,
        (false, _) => log::LevelFilter::Trace,
    };
    let mut clog = colog::default_builder();
    clog.filter(None, level);
    clog.init();
}

fn load_config(path: Option<PathBuf>) -> Option<(PathBuf, Config)> {
    let config_file = match path {
        Some(path) => path,
        None => match config::default_config_path() {
            Ok(path) => path,
            Err(err) => {
                error!("{}", err);
                return None;
            }
        },
    };
    match config::load_or_create(&config_file) {
        Ok(config) => Some((config_file, config)),
        Err(err) => {
            error!("{}", err);
            None
        }
    }
}

fn read_password() -> std::io::Result<String> {
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn set_password(config: &Config) -> ExitCode {
    let password = match read_password() {
        Ok(password) if !password.is_empty() => password,
        Ok(_) => {
            error!("No password given on stdin");
            return ExitCode::FAILURE;
        }
        Err(err) => {
            error!("Failed to read password: {}", err);
            return ExitCode::FAILURE;
        }
    };
    match credentials::set_password(&config.subsonic, &password) {
        Ok(()) => {
            info!(
                "Stored password for {}",
                credentials::account_name(&config.subsonic)
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn connect(config_file: &std::path::Path, config: &Config) -> Result<SubidyBackend, InitError> {
    if !config.subsonic.is_configured() {
        return Err(InitError::Unconfigured(config_file.display().to_string()));
    }
    let password = credentials::resolve_password(&config.subsonic)?;
    SubidyBackend::connect(config, password)
}

fn save_playlist(backend: &SubidyBackend, uri: &str, track_uris: &[String]) -> ExitCode {
    match backend.playlists().save_track_uris(uri, track_uris) {
        Some(saved) => print_json(&saved),
        None => {
            warn!("Playlist was not saved");
            ExitCode::FAILURE
        }
    }
}

fn run(backend: &SubidyBackend, command: Command) -> ExitCode {
    match command {
        Command::Ping | Command::SetPassword => ExitCode::SUCCESS,
        Command::Browse { uri } => {
            let uri = uri.unwrap_or_else(|| backend.root_uri().to_string());
            print_json(&backend.browse(&uri))
        }
        Command::Lookup { uris } => print_json(&backend.lookup_many(&uris)),
        Command::Search { exact, terms } => print_json(&backend.search(&build_query(terms), exact)),
        Command::Distinct { field, terms } => {
            print_json(&backend.get_distinct(&field, &build_query(terms)))
        }
        Command::Playlists => print_json(&backend.playlists().as_list()),
        Command::Playlist { uri } => print_json(&backend.playlists().lookup(&uri)),
        Command::PlaylistItems { uri } => print_json(&backend.playlists().get_items(&uri)),
        Command::CreatePlaylist { name } => print_json(&backend.playlists().create(&name)),
        Command::DeletePlaylist { uri } => {
            backend.playlists().delete(&uri);
            ExitCode::SUCCESS
        }
        Command::SavePlaylist { uri, track_uris } => save_playlist(backend, &uri, &track_uris),
        Command::Stream { song_uri } => print_json(&backend.resolve_stream_uri(&song_uri)),
        Command::CoverArt { id } => print_json(&backend.resolve_cover_art_uri(&id)),
    }
}

fn main() -> ExitCode {
    let cli_args = CliArgs::parse();
    setup_logging(cli_args.verbose, cli_args.quiet);

    let Some((config_file, config)) = load_config(cli_args.config) else {
        return ExitCode::FAILURE;
    };

    if matches!(cli_args.command, Command::SetPassword) {
        if !config.subsonic.is_configured() {
            error!("{}", InitError::Unconfigured(config_file.display().to_string()));
            return ExitCode::FAILURE;
        }
        return set_password(&config);
    }

    let backend = match connect(&config_file, &config) {
        Ok(backend) => backend,
        Err(err) => {
            error!("{}", err);
            return ExitCode::FAILURE;
        }
    };
    run(&backend, cli_args.command)
}
