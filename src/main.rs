use clap::Parser;
use tracing::error;

use ref_version::cli::{Cli, Command, EnvRef, effective_config, run_command};
use ref_version::logging::{self, LogOptions};

fn main() {
    let cli = Cli::parse();

    let _guard = logging::init(&LogOptions {
        verbose: cli.verbose,
        json: cli.log_json,
        file: cli.log_file.as_deref(),
    });

    let config = effective_config(&cli.resolve);
    let env_ref = EnvRef::read(&config.ref_variable);
    let command = cli.command.unwrap_or(Command::PrintVersion);

    // Never fail the build over an output error.
    if let Err(e) = run_command(command, &config, &env_ref, &mut std::io::stdout()) {
        error!("Failed to write output: {}", e);
    }
}
