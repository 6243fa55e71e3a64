#![allow(clippy::result_large_err)]

use clap::Parser;
use human_panic::{Metadata, setup_panic};
use miette::GraphicalReportHandler;
use std::process::ExitCode;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use unionize_cli::cli::Cli;

fn main() -> ExitCode {
    miette::set_hook(Box::new(|_| {
        Box::new(
            GraphicalReportHandler::new()
                .with_theme(miette::GraphicalTheme::unicode())
                .with_context_lines(3),
        )
    }))
    .ok();

    setup_panic!(
        Metadata::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")).support(
            "Please open an issue and attach the report file referenced above."
        )
    );

    let cli = Cli::parse();

    let log_level: tracing::Level = cli.log_level.clone().into();
    let init = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_file(false)
                .with_line_number(false),
        )
        .with(LevelFilter::from_level(log_level))
        .try_init();
    if let Err(err) = init {
        eprintln!("unable to initialize logging: {err}");
    }

    match cli.run() {
        Ok(code) => code,
        Err(e) => {
            let compiler_error: unionize_errors::CompilerError = e.into();
            eprintln!("{:?}", compiler_error.to_report());
            ExitCode::FAILURE
        },
    }
}
