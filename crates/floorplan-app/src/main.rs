//! Command-line entry point.

use clap::Parser;
use floorplan_app::Cli;

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    match floorplan_app::run(&cli) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            log::error!("{e}");
            eprintln!("floorplan: {e}");
            std::process::exit(1);
        }
    }
}
