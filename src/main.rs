//! speedtest-sink - append a speedtest report to CSV and Google Sheets
//!
//! Exit status is 0 after a reported failure unless `--fail-on-error` is set;
//! configuration errors always exit non-zero.

use clap::Parser;
use speedtest_sink::{
    cli::Cli,
    config::{display_config_summary, load_config, EnvManager},
    error::ErrorReporter,
    App, PKG_NAME, VERSION,
};
use std::process;

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        process::exit(99);
    }));

    // Env-backed arguments read the process environment during parsing
    let env_loaded = EnvManager::load_env_file();

    let cli = Cli::parse();
    let reporter = ErrorReporter::new(cli.use_colors(), cli.verbose);

    if let Err(e) = env_loaded {
        reporter.report_error(&e);
        process::exit(e.exit_code());
    }

    let config = match load_config(cli) {
        Ok(config) => config,
        Err(e) => {
            reporter.report_error(&e);
            process::exit(e.exit_code());
        }
    };

    if !config.enable_color {
        colored::control::set_override(false);
    }

    if config.debug {
        eprintln!("{} v{}", PKG_NAME, VERSION);
        eprintln!("{}", display_config_summary(&config));
    }

    let fail_on_error = config.fail_on_error;
    let app = App::new(config);

    if let Err(e) = app.run().await {
        app.report_failure(&e);
        if fail_on_error {
            process::exit(e.exit_code());
        }
    }
}
