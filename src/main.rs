use clap::Parser;
use cssopt::cli::{Cli, dispatch};
use cssopt::logging;
use tracing::error;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose, cli.log_file.as_deref()) {
        eprintln!("Failed to initialize logging: {e}");
        std::process::exit(1);
    }

    if let Err(e) = dispatch(cli) {
        error!("{}", e);
        std::process::exit(1);
    }
}
