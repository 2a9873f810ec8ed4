//! helm-inspect CLI
//!
//! Detects drift between a Helm release and the live cluster, or
//! calibrates the ignore rules for a freshly installed release.

use clap::Parser;
use helminspect_core::logging_facility::{init, Profile};

mod commands;

use commands::run::{LogFormat, RunArgs};

#[derive(Debug, Parser)]
#[command(name = "helm-inspect")]
#[command(
    about = "helm-inspect - Detect drift between Helm releases and live Kubernetes state",
    long_about = None
)]
struct Cli {
    #[command(flatten)]
    run: RunArgs,
}

fn main() {
    let cli = Cli::parse();

    init(logging_profile(&cli.run));

    if let Err(e) = commands::run::execute(cli.run) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn logging_profile(args: &RunArgs) -> Profile {
    if args.verbose {
        Profile::Development
    } else if args.log_format == LogFormat::Json {
        Profile::Production
    } else {
        Profile::Standard
    }
}
