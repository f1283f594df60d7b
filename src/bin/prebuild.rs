use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use hashflood::{prebuilt, CollisionGenerator, LogProgressMonitor, Platform};
use log::{error, info};

const USAGE: &str = "usage: prebuild <java|php|asp|v8> <number of keys> [output file] [seed]";

fn main() -> ExitCode {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() < 2 {
        eprintln!("{USAGE}");
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> hashflood::Result<()> {
    let platform: Platform = args[0].parse()?;
    let count: usize = args[1]
        .parse()
        .map_err(|_| hashflood::Error::invalid_argument(format!("not a number: {}", args[1])))?;
    let seed = args.get(3).map_or("hashes", String::as_str);

    let generator = CollisionGenerator::for_platform(platform, seed)?;
    let output = args
        .get(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(generator.hash_function().resource_name()));

    let monitor = LogProgressMonitor::new("Generating keys", Some(count));
    let keys = generator.generate_fresh(count, Some(&monitor))?;
    prebuilt::write_lines(&output, &keys)?;

    info!("Wrote {} {} keys to {}", keys.len(), platform, output.display());
    Ok(())
}
