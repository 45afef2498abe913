use std::env;
use std::process;

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use git2_cli::application::CancellationToken;
use git2_cli::cli::{self, output};
use git2_cli::exitcode;
use git2_cli::infrastructure::signal::install_interrupt_handler;

fn main() {
    setup_logging();

    let cancel = CancellationToken::new();
    if let Err(e) = install_interrupt_handler(cancel.clone()) {
        output::warning(&e);
    }

    let args: Vec<String> = env::args_os()
        .skip(1)
        .map(|a| a.to_string_lossy().into_owned())
        .collect();

    let code = match cli::run(&args, cancel) {
        Ok(()) => exitcode::OK,
        Err(e) => {
            cli::report_error(&e);
            e.exit_code()
        }
    };
    process::exit(code);
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();

    tracing::debug!("setup_logging: initialised");
}
