use clap::Parser;
use log::error;

mod cli;

/*-------------------------------------------------------------------------------------------------
  prefixopt Binary
-------------------------------------------------------------------------------------------------*/

fn main() {
    let args = cli::Args::parse();

    stderrlog::new()
        .verbosity(args.verbose.log_level_filter())
        .init()
        .ok();

    if let Err(error) = cli::commands::run(&args) {
        error!("{error}");
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}
