//! Benchmark driver: initialize, time the transposes, validate.

use crate::config::Config;
use crate::error::Result;
use crate::matrix::{self, Matrices};
use crate::schedule::Schedule;
use std::time::{Duration, Instant};

/// Timing and accuracy of a validated run.
#[derive(Debug, Clone, Copy)]
pub struct Report {
    pub iterations: usize,
    pub order: usize,
    /// Wall time of the `iterations` timed passes (the warm-up is excluded).
    pub transpose_time: Duration,
    pub abserr: f64,
}

impl Report {
    pub fn avg_time(&self) -> f64 {
        self.transpose_time.as_secs_f64() / self.iterations as f64
    }

    pub fn bytes(&self) -> usize {
        2 * self.order * self.order * size_of::<f64>()
    }

    /// Achieved bandwidth in MB/s.
    pub fn rate(&self) -> f64 {
        1.0e-6 * self.bytes() as f64 / self.avg_time()
    }
}

/// Run `iterations + 1` transposes (the first one untimed) and validate.
///
/// The warm-up pass still updates both buffers and is part of the
/// closed-form check.
pub fn run(config: &Config, schedule: &Schedule) -> Result<Report> {
    let mut matrices = Matrices::new(config.order)?;

    let start = Instant::now();
    matrix::initialize(schedule, &mut matrices);
    crate::log!(
        "Initialized {0}x{0} matrices in {1:.6} s",
        config.order,
        start.elapsed().as_secs_f64()
    );

    let mut timer = None;
    for iter in 0..=config.iterations {
        if iter == 1 {
            timer = Some(Instant::now());
        }
        matrix::transpose(schedule, &mut matrices);
    }
    let transpose_time = timer.map(|t| t.elapsed()).unwrap_or_default();

    let abserr = matrix::validate(schedule, &matrices, config.iterations)?;
    if config.verbose {
        crate::log!("Sum of absolute differences: {:30.15}", abserr);
    }

    Ok(Report {
        iterations: config.iterations,
        order: config.order,
        transpose_time,
        abserr,
    })
}

/// Echo the resolved configuration.
pub fn print_configuration(config: &Config, schedule: &Schedule) {
    let yes_no = |flag: bool| if flag { "yes" } else { "no" };

    println!("Number of iterations  = {}", config.iterations);
    println!("Matrix order          = {}", config.order);
    match schedule.tile() {
        Some(tile) => println!("Tile size             = {}", tile),
        None => println!("Tile size             = {} (untiled)", config.tile_size),
    }
    println!("Threading             = {}", schedule.backend().threading().label());
    if schedule.backend().num_threads() > 1 || config.threads.is_some() {
        println!("Worker threads        = {}", schedule.backend().num_threads());
    }
    println!("Use nested 2D loop    = {}", yes_no(config.nested));
    println!("Use simd              = {}", yes_no(config.simd));
    println!("Use tiling            = {}", yes_no(config.tiled));
    match config.permute {
        Some(permute) => println!("Use permute           = {}", permute),
        None => println!("Use permute           = no"),
    }
}

pub fn print_report(report: &Report) {
    println!("Solution validates");
    println!(
        "Rate (MB/s): {:10.3} Avg time (s): {:10.6}",
        report.rate(),
        report.avg_time()
    );
}
