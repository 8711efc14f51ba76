use clap::Parser;
use log::info;
use snafu::ErrorCompat;

mod args;
mod sched;

use crate::args::Args;

fn main() {
    let args = Args::parse();
    if args.verbose {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::init();
    }
    match sched::run_schedule(&args) {
        Ok(stats) => {
            info!("run complete: {:?}", stats);
            println!(
                "Analyzed {} tables ({} assignments, {} rows skipped); {} tables with issues",
                stats.tables, stats.assignments, stats.skipped, stats.tables_with_issues
            );
        }
        Err(e) => {
            eprintln!("An error occured {}", e);
            match ErrorCompat::backtrace(&e) {
                Some(trace) => {
                    eprintln!("trace: {}", trace);
                }
                None => {
                    eprintln!("No trace found");
                }
            }
            std::process::exit(1);
        }
    }
}
