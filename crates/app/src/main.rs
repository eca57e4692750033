mod input;
mod terminal;

use std::fmt;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use quiz_core::model::{QuizSettings, SessionPhase};
use services::question_source::{builtin_bank, load_bank};
use services::{AppServices, Clock, ControllerStep, SessionController, SessionError};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use crate::input::PlayerCommand;
use crate::terminal::TerminalSignals;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidTimeLimit { raw: String },
    InvalidSeed { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidTimeLimit { raw } => write!(f, "invalid --time-limit value: {raw}"),
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!(
        "  quiz [--db <sqlite_url>] [--no-persist] [--questions <file.json>] \
         [--time-limit <secs>] [--no-shuffle] [--seed <n>]"
    );
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite://quiz.sqlite3");
    eprintln!("  --time-limit 30");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_QUESTIONS, QUIZ_TIME_LIMIT, RUST_LOG");
}

#[derive(Debug)]
struct Args {
    db_url: String,
    persist: bool,
    questions: Option<PathBuf>,
    time_limit_secs: u32,
    shuffle: bool,
    seed: Option<u64>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("QUIZ_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://quiz.sqlite3".into(), normalize_sqlite_url);
        let mut questions = std::env::var_os("QUIZ_QUESTIONS").map(PathBuf::from);
        let mut time_limit_secs = match std::env::var("QUIZ_TIME_LIMIT") {
            Ok(raw) => parse_time_limit(raw)?,
            Err(_) => QuizSettings::DEFAULT_TIME_LIMIT_SECS,
        };
        let mut persist = true;
        let mut shuffle = true;
        let mut seed = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--no-persist" => persist = false,
                "--questions" => {
                    questions = Some(PathBuf::from(require_value(args, "--questions")?));
                }
                "--time-limit" => {
                    time_limit_secs = parse_time_limit(require_value(args, "--time-limit")?)?;
                }
                "--no-shuffle" => shuffle = false,
                "--seed" => {
                    let value = require_value(args, "--seed")?;
                    let parsed = value
                        .parse::<u64>()
                        .map_err(|_| ArgsError::InvalidSeed { raw: value.clone() })?;
                    seed = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            persist,
            questions,
            time_limit_secs,
            shuffle,
            seed,
        })
    }
}

fn parse_time_limit(raw: String) -> Result<u32, ArgsError> {
    match raw.trim().parse::<u32>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ArgsError::InvalidTimeLimit { raw }),
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

fn init_tracing() {
    // Logs share the terminal with the quiz, so they go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Open persistent storage, or fall back to a session without a high score.
async fn build_services(
    args: &Args,
    clock: Clock,
    settings: QuizSettings,
) -> Result<AppServices, Box<dyn std::error::Error>> {
    let bank = match &args.questions {
        Some(path) => load_bank(path)?,
        None => builtin_bank(),
    };

    if !args.persist {
        tracing::info!("persistence disabled");
        return Ok(AppServices::detached(clock, bank, settings));
    }

    if let Err(err) = prepare_sqlite_file(&args.db_url) {
        tracing::warn!(%err, db = %args.db_url, "database file unavailable; high score disabled");
        return Ok(AppServices::detached(clock, bank, settings));
    }

    match AppServices::new_sqlite(&args.db_url, clock, bank.clone(), settings.clone()).await {
        Ok(services) => Ok(services),
        Err(err) => {
            tracing::warn!(%err, db = %args.db_url, "storage unavailable; high score disabled");
            Ok(AppServices::detached(clock, bank, settings))
        }
    }
}

/// Apply one line of player input. Returns `false` once the player quits.
async fn handle_line<W: Write + Send>(
    controller: &mut SessionController,
    signals: &TerminalSignals<W>,
    line: &str,
) -> Result<bool, SessionError> {
    match PlayerCommand::parse(line) {
        PlayerCommand::Quit => return Ok(false),
        PlayerCommand::Restart => {
            controller.request_restart().await?;
        }
        PlayerCommand::Advance => {
            if controller.phase() == SessionPhase::Completed {
                signals.notice("The quiz is over. Press r to play again or q to quit.");
            } else if controller.request_advance().await? == ControllerStep::Ignored {
                signals.notice("Pick an answer first, or wait for the timer.");
            }
        }
        PlayerCommand::Select(slot) => match controller.submit_answer(slot) {
            Ok(ControllerStep::Ignored) => match controller.phase() {
                SessionPhase::Completed => {
                    signals.notice("The quiz is over. Press r to play again or q to quit.");
                }
                _ => signals.notice("Already answered. Press Enter to continue."),
            },
            Ok(_) => {}
            Err(err @ SessionError::InvalidOption { .. }) => signals.notice(&err.to_string()),
            Err(err) => return Err(err),
        },
        PlayerCommand::Unknown(raw) => {
            signals.notice(&format!("Unrecognised input: {raw}"));
        }
    }
    Ok(true)
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    init_tracing();

    let clock = Clock::system();
    let settings = QuizSettings::new(args.time_limit_secs, args.shuffle)?;
    let services = build_services(&args, clock, settings).await?.with_seed(args.seed);
    tracing::info!(
        questions = services.bank().len(),
        persistent = services.high_scores().is_persistent(),
        "quiz ready"
    );

    let signals = Arc::new(TerminalSignals::new(std::io::stdout()));
    let (timer_tx, mut timer_rx) = mpsc::unbounded_channel();
    let mut controller = services.session_controller(signals.clone(), timer_tx);
    controller.start().await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            Some(signal) = timer_rx.recv() => {
                controller.handle_timer(signal).await?;
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if !handle_line(&mut controller, &*signals, &line).await? {
                    break;
                }
            }
        }
    }

    let progress = controller.session().progress();
    tracing::info!(
        score = progress.score,
        position = progress.position,
        total = progress.total,
        complete = progress.is_complete,
        "quiz closed"
    );
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
