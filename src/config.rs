//! Command-line configuration.
//!
//! Two positional integers followed by free-form `key=value` variant flags.
//! Tokens that are not `key=value`, unknown keys and unknown values for the
//! switch-style keys are ignored.

use crate::error::{Result, TransposeError};
use std::fmt;

/// Largest order whose square still fits a signed 32-bit linear index.
pub const MAX_ORDER: usize = i32::MAX.isqrt() as usize;

/// Tile edge length used when `tile=` is not given.
pub const DEFAULT_TILE_SIZE: usize = 32;

/// Which loop backend runs the kernels (`for=`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Threading {
    #[default]
    Sequential,
    /// `for=omp`: fixed contiguous chunk per worker.
    Static,
    /// `for=tbb`: recursively split ranges with work stealing.
    WorkStealing,
}

impl Threading {
    pub fn label(self) -> &'static str {
        match self {
            Threading::Sequential => "Sequential",
            Threading::Static => "Static (rayon)",
            Threading::WorkStealing => "Work-stealing (rayon)",
        }
    }

    /// Whether this build can run the backend.
    pub fn is_available(self) -> bool {
        match self {
            Threading::Sequential => true,
            Threading::Static | Threading::WorkStealing => cfg!(feature = "parallel"),
        }
    }
}

/// Requested loop permutation (`permute=`).
///
/// Parsed and echoed only; no loop order depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permute {
    Ij,
    Ji,
}

impl fmt::Display for Permute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Permute::Ij => write!(f, "ij"),
            Permute::Ji => write!(f, "ji"),
        }
    }
}

/// Fully resolved run configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub iterations: usize,
    pub order: usize,
    pub threading: Threading,
    pub simd: bool,
    pub nested: bool,
    pub tiled: bool,
    pub permute: Option<Permute>,
    /// Worker count for threaded backends; `None` means one per physical core.
    pub threads: Option<usize>,
    pub tile_size: usize,
    pub verbose: bool,
}

impl Config {
    /// Configuration with every variant flag at its default.
    pub fn new(iterations: usize, order: usize) -> Self {
        Self {
            iterations,
            order,
            threading: Threading::Sequential,
            simd: true,
            nested: true,
            tiled: false,
            permute: None,
            threads: None,
            tile_size: DEFAULT_TILE_SIZE,
            verbose: false,
        }
    }

    /// Parse the arguments that follow the program name.
    ///
    /// # Example
    ///
    /// ```
    /// use transpose::config::{Config, Threading};
    ///
    /// let config = Config::from_args(["10", "1024", "for=omp", "tiled=y"]).unwrap();
    /// assert_eq!(config.iterations, 10);
    /// assert_eq!(config.order, 1024);
    /// assert_eq!(config.threading, Threading::Static);
    /// assert!(config.tiled);
    /// ```
    pub fn from_args<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut args = args.into_iter();
        let (Some(iterations), Some(order)) = (args.next(), args.next()) else {
            return Err(TransposeError::Usage);
        };

        let iterations = parse_int("iterations", iterations.as_ref())?;
        if iterations < 1 {
            return Err(TransposeError::InvalidIterations(iterations));
        }

        let order = parse_int("matrix order", order.as_ref())?;
        if order <= 0 {
            return Err(TransposeError::InvalidOrder(order));
        }
        let order = order as usize;
        if order > MAX_ORDER {
            return Err(TransposeError::OrderOverflow {
                order,
                max: MAX_ORDER,
            });
        }

        let mut config = Config::new(iterations as usize, order);
        for token in args {
            config.apply_flag(token.as_ref())?;
        }
        Ok(config)
    }

    fn apply_flag(&mut self, token: &str) -> Result<()> {
        let Some((key, value)) = token.split_once('=') else {
            return Ok(());
        };

        match key {
            "for" => match value {
                "seq" => self.threading = Threading::Sequential,
                "omp" | "openmp" => self.threading = Threading::Static,
                "tbb" => self.threading = Threading::WorkStealing,
                _ => {}
            },
            "simd" => set_switch(&mut self.simd, value),
            "nested" => set_switch(&mut self.nested, value),
            "tiled" => set_switch(&mut self.tiled, value),
            "verbose" => set_switch(&mut self.verbose, value),
            "permute" => match value {
                "ij" => self.permute = Some(Permute::Ij),
                "ji" => self.permute = Some(Permute::Ji),
                _ => {}
            },
            "threads" => match value.parse::<usize>() {
                Ok(n) if n >= 1 => self.threads = Some(n),
                _ => return Err(TransposeError::InvalidThreads(value.to_string())),
            },
            "tile" => match value.parse::<usize>() {
                Ok(n) if n >= 1 => self.tile_size = n,
                _ => return Err(TransposeError::InvalidTile(value.to_string())),
            },
            _ => {}
        }
        Ok(())
    }
}

fn parse_int(name: &'static str, value: &str) -> Result<i64> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| TransposeError::NotAnInteger {
            name,
            value: value.to_string(),
        })
}

fn set_switch(flag: &mut bool, value: &str) {
    match value {
        "y" | "yes" => *flag = true,
        "n" | "no" | "np" => *flag = false,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_args(["5", "10"]).unwrap();
        assert_eq!(config, Config::new(5, 10));
        assert_eq!(config.threading, Threading::Sequential);
        assert!(config.simd);
        assert!(config.nested);
        assert!(!config.tiled);
        assert_eq!(config.permute, None);
        assert_eq!(config.tile_size, DEFAULT_TILE_SIZE);
    }

    #[test]
    fn test_max_order() {
        assert_eq!(MAX_ORDER, 46340);
        assert!(MAX_ORDER * MAX_ORDER <= i32::MAX as usize);
        assert!((MAX_ORDER + 1) * (MAX_ORDER + 1) > i32::MAX as usize);
    }

    #[test]
    fn test_missing_arguments() {
        assert!(matches!(
            Config::from_args(Vec::<String>::new()),
            Err(TransposeError::Usage)
        ));
        assert!(matches!(
            Config::from_args(["5"]),
            Err(TransposeError::Usage)
        ));
    }

    #[test]
    fn test_rejects_bad_iterations() {
        assert!(matches!(
            Config::from_args(["0", "10"]),
            Err(TransposeError::InvalidIterations(0))
        ));
        assert!(matches!(
            Config::from_args(["-3", "10"]),
            Err(TransposeError::InvalidIterations(-3))
        ));
        assert!(matches!(
            Config::from_args(["ten", "10"]),
            Err(TransposeError::NotAnInteger { name: "iterations", .. })
        ));
    }

    #[test]
    fn test_rejects_bad_order() {
        assert!(matches!(
            Config::from_args(["5", "0"]),
            Err(TransposeError::InvalidOrder(0))
        ));
        assert!(matches!(
            Config::from_args(["5", "50000"]),
            Err(TransposeError::OrderOverflow { order: 50000, max: 46340 })
        ));
        assert!(Config::from_args(["5", "46340"]).is_ok());
    }

    #[test]
    fn test_variant_flags() {
        let config = Config::from_args([
            "3", "64", "for=tbb", "simd=n", "nested=no", "tiled=yes", "permute=ji", "threads=3",
            "tile=8", "verbose=y",
        ])
        .unwrap();

        assert_eq!(config.threading, Threading::WorkStealing);
        assert!(!config.simd);
        assert!(!config.nested);
        assert!(config.tiled);
        assert_eq!(config.permute, Some(Permute::Ji));
        assert_eq!(config.threads, Some(3));
        assert_eq!(config.tile_size, 8);
        assert!(config.verbose);
    }

    #[test]
    fn test_openmp_alias() {
        let config = Config::from_args(["3", "64", "for=openmp"]).unwrap();
        assert_eq!(config.threading, Threading::Static);
    }

    #[test]
    fn test_unknown_tokens_are_ignored() {
        let config =
            Config::from_args(["3", "64", "bogus", "colour=blue", "for=cuda", "simd=maybe"])
                .unwrap();
        assert_eq!(config, Config::new(3, 64));
    }

    #[test]
    fn test_rejects_bad_numeric_flags() {
        assert!(matches!(
            Config::from_args(["3", "64", "threads=0"]),
            Err(TransposeError::InvalidThreads(_))
        ));
        assert!(matches!(
            Config::from_args(["3", "64", "tile=x"]),
            Err(TransposeError::InvalidTile(_))
        ));
    }
}
