use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use homework_watch::config::{self, Credentials, WatchConfig};
use homework_watch::poll_loop::StopReason;
use homework_watch::{logging, PollCycle, PollLoop, PracticumClient, TelegramBot};

#[derive(Parser)]
#[command(name = "homework-watch")]
#[command(about = "Watch homework review status and report changes to Telegram", long_about = None)]
#[command(version)]
struct Cli {
    /// Seconds between polls (at least 1)
    #[arg(
        long,
        env = "WATCH_INTERVAL",
        default_value_t = config::DEFAULT_POLL_INTERVAL_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    interval: u64,

    /// Homework status endpoint
    #[arg(long, env = "WATCH_ENDPOINT", default_value = config::DEFAULT_ENDPOINT)]
    endpoint: String,

    /// HTTP request timeout in seconds
    #[arg(long, env = "WATCH_TIMEOUT", default_value_t = config::DEFAULT_REQUEST_TIMEOUT_SECS)]
    timeout: u64,

    /// Initial from_date (unix seconds); defaults to now
    #[arg(long, env = "WATCH_FROM_DATE")]
    from_date: Option<i64>,

    /// Run a single poll cycle and exit
    #[arg(long)]
    once: bool,
}

impl Cli {
    fn watch_config(&self) -> WatchConfig {
        WatchConfig {
            endpoint: self.endpoint.clone(),
            poll_interval: Duration::from_secs(self.interval),
            request_timeout: Duration::from_secs(self.timeout),
            from_date: self.from_date,
            max_cycles: self.once.then_some(1),
            ..Default::default()
        }
    }
}

fn main() -> Result<ExitCode> {
    config::load_env_file(&config::default_env_file()).context("Failed to read .env file")?;
    logging::init();

    let cli = Cli::parse();
    let watch_config = cli.watch_config();
    let credentials = Credentials::from_env();

    let api = PracticumClient::new(&watch_config, &credentials.practicum_token)
        .context("Failed to create homework API client")?;
    let bot = TelegramBot::new(&watch_config, &credentials.telegram_token)
        .context("Failed to create Telegram client")?;

    let shutdown = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&shutdown);
    ctrlc::set_handler(move || {
        tracing::info!("Received interrupt signal, stopping after the current cycle");
        handler_flag.store(true, Ordering::SeqCst);
    })
    .context("Failed to install signal handler")?;

    let cycle = PollCycle::new(api, bot, credentials.telegram_chat_id.clone());
    let mut poll_loop = PollLoop::new(
        cycle,
        watch_config.poll_interval,
        watch_config.from_date,
        shutdown,
    )
    .with_max_cycles(watch_config.max_cycles);

    match poll_loop.run(&credentials) {
        StopReason::MissingCredentials => Ok(ExitCode::FAILURE),
        StopReason::Shutdown | StopReason::CycleLimit => Ok(ExitCode::SUCCESS),
    }
}
