//! symnmf CLI: similarity matrices, SymNMF factors, K-means centroids, and
//! the silhouette comparison of both algorithms.
//!
//! Every failure prints a single generic line and exits with status 1. The
//! underlying error is logged (`RUST_LOG=debug` to see it on stderr).

use clap::{error::ErrorKind, Parser, Subcommand};
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use symnmf::cluster::{DEFAULT_EPSILON, DEFAULT_MAX_ITER, DEFAULT_SEED, KMEANS_CLI_MAX_ITER};
use symnmf::io::write_matrix;
use symnmf::{
    compare, degree_from, degree_matrix, normalize, read_points, read_points_from_path,
    similarity, AnalysisConfig, Kmeans, PointSet, SymNmf,
};
use tracing::error;

const GENERIC_ERROR: &str = "An Error Has Occurred";

#[derive(Parser)]
#[command(name = "symnmf")]
#[command(version, about = "K-means and SymNMF clustering", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the similarity matrix W
    Sym {
        /// Points file
        file: PathBuf,
    },

    /// Print the diagonal degree matrix D
    Ddg {
        /// Points file
        file: PathBuf,
    },

    /// Print the normalized similarity matrix A
    Norm {
        /// Points file
        file: PathBuf,
    },

    /// Print the final SymNMF factor H
    Symnmf {
        /// Number of clusters, 1 < k < n
        k: usize,
        /// Points file
        file: PathBuf,
        /// Maximum update iterations
        #[arg(long, default_value_t = DEFAULT_MAX_ITER)]
        max_iter: usize,
        /// Frobenius-change convergence threshold
        #[arg(long, default_value_t = DEFAULT_EPSILON)]
        epsilon: f64,
        /// Damping of the multiplicative update, in (0, 1]
        #[arg(long, default_value_t = 1.0)]
        beta: f64,
        /// Seed for the initial factor
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,
    },

    /// Print final K-means centroids (points from stdin unless --input is given)
    Kmeans {
        /// Number of clusters, 1 < k < n
        k: usize,
        /// Maximum iterations, 1 < max_iter < 1000
        max_iter: Option<usize>,
        /// Centroid-shift convergence threshold
        #[arg(long, default_value_t = DEFAULT_EPSILON)]
        epsilon: f64,
        /// Read points from this file instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Print silhouette scores of SymNMF and K-means
    Analysis {
        /// Number of clusters, 1 < k < n
        k: usize,
        /// Points file
        file: PathBuf,
    },
}

enum Failure {
    ClusterCount,
    MaxIter,
    Core(symnmf::Error),
}

impl Failure {
    fn message(&self) -> &'static str {
        match self {
            Failure::ClusterCount => "Incorrect number of clusters!",
            Failure::MaxIter => "Incorrect maximum iteration!",
            Failure::Core(_) => GENERIC_ERROR,
        }
    }
}

impl From<symnmf::Error> for Failure {
    fn from(e: symnmf::Error) -> Self {
        Failure::Core(e)
    }
}

impl From<io::Error> for Failure {
    fn from(e: io::Error) -> Self {
        Failure::Core(e.into())
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            error!(error = %e, "invalid arguments");
            println!("{GENERIC_ERROR}");
            return ExitCode::FAILURE;
        }
    };

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            if let Failure::Core(e) = &failure {
                error!(error = %e, "command failed");
            }
            println!("{}", failure.message());
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), Failure> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Command::Sym { file } => {
            let points = read_points_from_path(file)?;
            write_matrix(&mut out, &similarity(&points)?)?;
        }
        Command::Ddg { file } => {
            let points = read_points_from_path(file)?;
            let w = similarity(&points)?;
            let d = degree_from(w.view())?;
            drop(w);
            write_matrix(&mut out, &degree_matrix(&d))?;
        }
        Command::Norm { file } => {
            let points = read_points_from_path(file)?;
            write_matrix(&mut out, &normalize(&points)?)?;
        }
        Command::Symnmf {
            k,
            file,
            max_iter,
            epsilon,
            beta,
            seed,
        } => {
            let points = read_points_from_path(file)?;
            let fit = SymNmf::new(k)
                .with_max_iter(max_iter)
                .with_epsilon(epsilon)
                .with_beta(beta)
                .with_seed(seed)
                .fit(&points)?;
            write_matrix(&mut out, &fit.h)?;
        }
        Command::Kmeans {
            k,
            max_iter,
            epsilon,
            input,
        } => {
            let points = match input {
                Some(path) => read_points_from_path(path)?,
                None => read_points(BufReader::new(io::stdin().lock()))?,
            };
            check_kmeans_args(&points, k, max_iter)?;
            let fit = Kmeans::new(k)
                .with_max_iter(max_iter.unwrap_or(KMEANS_CLI_MAX_ITER))
                .with_epsilon(epsilon)
                .fit(&points)?;
            write_matrix(&mut out, &fit.centroids)?;
        }
        Command::Analysis { k, file } => {
            let points = read_points_from_path(file)?;
            let scores = compare(&points, k, &AnalysisConfig::default())?;
            writeln!(out, "nmf: {:.4}", scores.nmf)?;
            writeln!(out, "kmeans: {:.4}", scores.kmeans)?;
        }
    }

    out.flush()?;
    Ok(())
}

fn check_kmeans_args(points: &PointSet, k: usize, max_iter: Option<usize>) -> Result<(), Failure> {
    if k <= 1 || k >= points.len() {
        return Err(Failure::ClusterCount);
    }
    if let Some(it) = max_iter {
        if it <= 1 || it >= 1000 {
            return Err(Failure::MaxIter);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn four_points() -> PointSet {
        PointSet::new(vec![vec![0.0], vec![1.0], vec![2.0], vec![3.0]]).unwrap()
    }

    #[test]
    fn test_kmeans_cluster_count_message() {
        for k in [0, 1, 4, 9] {
            let failure = check_kmeans_args(&four_points(), k, None).unwrap_err();
            assert_eq!(failure.message(), "Incorrect number of clusters!");
        }
    }

    #[test]
    fn test_kmeans_iteration_message() {
        for it in [0, 1, 1000, 5000] {
            let failure = check_kmeans_args(&four_points(), 2, Some(it)).unwrap_err();
            assert_eq!(failure.message(), "Incorrect maximum iteration!");
        }
        assert!(check_kmeans_args(&four_points(), 2, Some(2)).is_ok());
        assert!(check_kmeans_args(&four_points(), 3, Some(999)).is_ok());
    }

    #[test]
    fn test_core_errors_use_generic_message() {
        let failure = Failure::from(symnmf::Error::EmptyInput);
        assert_eq!(failure.message(), GENERIC_ERROR);
    }
}
