//! seltrack entrypoint: replay a scripted selection session headlessly.
use anyhow::Result;
use clap::Parser;
use core_config::load_from;
use core_events::signal_counters;
use core_selection::EngineConfig;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

mod replay;
mod script;

use script::Script;

const DEFAULT_LOG_FILE: &str = "seltrack.log";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "seltrack", version, about = "Selection tracking replay")]
struct Args {
    /// Replay script (TOML): a `[widget]` table and `[[step]]` entries.
    pub script: PathBuf,
    /// Optional configuration file path (overrides discovery of `seltrack.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Log file (defaults to `./seltrack.log`). Level comes from `RUST_LOG`.
    #[arg(long = "log")]
    pub log: Option<PathBuf>,
}

struct Startup {
    log_guard: Option<WorkerGuard>,
}

impl Startup {
    fn new() -> Self {
        Self { log_guard: None }
    }

    fn configure_logging(&mut self, path: Option<&Path>) -> Result<()> {
        let log_path = path.map_or_else(|| PathBuf::from(DEFAULT_LOG_FILE), Path::to_path_buf);
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }
        let log_dir = match log_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let file_name = log_path
            .file_name()
            .map_or_else(|| DEFAULT_LOG_FILE.into(), |n| n.to_os_string());

        let file_appender = tracing_appender::rolling::never(log_dir, file_name);
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        match tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .with_ansi(false)
            .try_init()
        {
            Ok(_) => {
                self.log_guard = Some(guard);
            }
            Err(_err) => {
                // Global subscriber already installed; dropping the guard shuts the writer down.
            }
        }
        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut startup = Startup::new();
    startup.configure_logging(args.log.as_deref())?;
    Startup::install_panic_hook();

    info!(target: "runtime", script = %args.script.display(), config_override = args.config.is_some(), "startup");
    let config = load_from(args.config.clone())?;
    let script = Script::load(&args.script)?;
    info!(
        target: "runtime",
        steps = script.steps.len(),
        debounce_ms = config.debounce().as_millis() as u64,
        "script_loaded"
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let published = replay::run(&script, EngineConfig::from(&config), &mut out)?;
    out.flush()?;
    let signals = signal_counters();
    info!(
        target: "runtime",
        published,
        signals_emitted = signals.emitted,
        signal_send_failures = signals.send_failures,
        "shutdown"
    );
    Ok(())
}
