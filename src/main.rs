//! `transpose <iterations> <matrix order> [key=value ...]`

use std::process::ExitCode;
use transpose::{Config, Result, Schedule, bench};

fn main() -> ExitCode {
    println!("Parallel Research Kernels");
    println!("Rust Matrix transpose: B = A^T");

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let config = Config::from_args(std::env::args().skip(1))?;
    let schedule = Schedule::from_config(&config)?;
    bench::print_configuration(&config, &schedule);

    let report = bench::run(&config, &schedule)?;
    bench::print_report(&report);
    Ok(())
}
