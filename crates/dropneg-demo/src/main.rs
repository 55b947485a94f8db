#![forbid(unsafe_code)]

//! Drop negotiation demo binary entry point.

use std::fs::File;
use std::process;
use std::sync::Mutex;

use dropneg_core::RawOffer;
use dropneg_demo::cli::Opts;
use dropneg_demo::sample::sample_offer;
use dropneg_demo::terminal::TerminalFrontend;
use dropneg_runtime::{FixedChooser, NegotiationError, Negotiator};
use tracing_subscriber::EnvFilter;

const EXIT_DECLINED: i32 = 1;
const EXIT_INVALID_OFFER: i32 = 2;

fn init_tracing(opts: &Opts) {
    let Some(path) = &opts.log_file else {
        return;
    };
    let file = match File::create(path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to open log file {}: {e}", path.display());
            process::exit(1);
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_thread_names(true)
        .try_init();
}

fn load_offer(opts: &Opts) -> RawOffer {
    let loaded = match &opts.offer {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(text) => RawOffer::from_json(&text),
            Err(e) => {
                eprintln!("Failed to read offer {}: {e}", path.display());
                process::exit(EXIT_INVALID_OFFER);
            }
        },
        None => sample_offer(),
    };
    loaded.unwrap_or_else(|e| {
        eprintln!("Invalid offer: {e}");
        process::exit(EXIT_INVALID_OFFER);
    })
}

fn main() {
    let opts = Opts::parse();
    init_tracing(&opts);
    let offer = load_offer(&opts);

    let negotiator = Negotiator::new(|| Box::new(TerminalFrontend::new()))
        .with_file_chooser(FixedChooser::new(opts.save_dir.clone(), "untitled"));

    match negotiator.negotiate(&offer) {
        Ok(outcome) => {
            match serde_json::to_string_pretty(&outcome) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("Failed to encode outcome: {e}");
                    process::exit(1);
                }
            }
            if outcome.is_declined() {
                process::exit(EXIT_DECLINED);
            }
        }
        Err(NegotiationError::InvalidOffer(e)) => {
            eprintln!("Invalid offer: {e}");
            process::exit(EXIT_INVALID_OFFER);
        }
        Err(e) => {
            eprintln!("Runtime error: {e}");
            process::exit(1);
        }
    }
}
