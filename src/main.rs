use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::process::ExitCode;
use symnmf::{io, Analysis, Result, SymNmf};
use tracing::error;
use tracing_subscriber::EnvFilter;

const GENERIC_ERROR: &str = "An Error Has Occurred";

/// Clusters points with SymNMF and compares the result against k-means.
#[derive(Parser)]
#[command(name = "symnmf", version, about)]
struct Cli {
    /// Seed for the random initialization of H (and of random k-means centroids).
    #[arg(long, global = true, default_value_t = 1234)]
    seed: u64,

    /// Compute the pairwise stages on all cores.
    #[cfg(feature = "parallel")]
    #[arg(long, global = true)]
    parallel: bool,

    #[command(subcommand)]
    goal: Goal,
}

#[derive(Subcommand)]
enum Goal {
    /// Print the similarity matrix.
    Sym { file: PathBuf },
    /// Print the diagonal degree matrix.
    Ddg { file: PathBuf },
    /// Print the normalized similarity matrix.
    Norm { file: PathBuf },
    /// Print the SymNMF factor H for k clusters.
    Symnmf { k: usize, file: PathBuf },
    /// Print the silhouette scores of SymNMF and k-means for k clusters.
    Analysis { k: usize, file: PathBuf },
}

impl Cli {
    #[cfg(feature = "parallel")]
    fn parallel(&self) -> bool {
        self.parallel
    }

    #[cfg(not(feature = "parallel"))]
    fn parallel(&self) -> bool {
        false
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            error!(error = %e, "invalid arguments");
            println!("{GENERIC_ERROR}");
            return ExitCode::FAILURE;
        }
    };

    match run(&cli) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "symnmf failed");
            println!("{GENERIC_ERROR}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<String> {
    let mut rng = StdRng::seed_from_u64(cli.seed);
    let parallel = cli.parallel();
    let output = match &cli.goal {
        Goal::Sym { file } => {
            let data = io::read_points(file)?;
            let model = SymNmf::default_hyper_params(&data);
            let matrix = if parallel { similarity_par(&model)? } else { model.similarity()? };
            matrix.to_string()
        }
        Goal::Ddg { file } => {
            let data = io::read_points(file)?;
            let model = SymNmf::default_hyper_params(&data);
            let matrix = if parallel { degree_par(&model)? } else { model.degree()? };
            matrix.to_string()
        }
        Goal::Norm { file } => {
            let data = io::read_points(file)?;
            let model = SymNmf::default_hyper_params(&data);
            let matrix = if parallel { normalize_par(&model)? } else { model.normalize()? };
            matrix.to_string()
        }
        Goal::Symnmf { k, file } => {
            let data = io::read_points(file)?;
            let model = SymNmf::default_hyper_params(&data);
            let factorization = if parallel {
                factorize_par(&model, *k, &mut rng)?
            } else {
                model.factorize(*k, &mut rng)?
            };
            factorization.h.to_string()
        }
        Goal::Analysis { k, file } => {
            let data = io::read_points(file)?;
            let analysis = Analysis::new(&data, *k);
            let report = if parallel {
                analysis_par(&analysis, &mut rng)?
            } else {
                analysis.run(&mut rng)?
            };
            report.to_string()
        }
    };
    Ok(output)
}

#[cfg(feature = "parallel")]
mod dispatch {
    use rand::rngs::StdRng;
    use symnmf::{Analysis, AnalysisReport, Factorization, Matrix, Result, SymNmf};

    pub(crate) fn similarity_par(model: &SymNmf<f64>) -> Result<Matrix<f64>> {
        model.similarity_par()
    }

    pub(crate) fn degree_par(model: &SymNmf<f64>) -> Result<Matrix<f64>> {
        model.degree_par()
    }

    pub(crate) fn normalize_par(model: &SymNmf<f64>) -> Result<Matrix<f64>> {
        model.normalize_par()
    }

    pub(crate) fn factorize_par(
        model: &SymNmf<f64>,
        k: usize,
        rng: &mut StdRng,
    ) -> Result<Factorization<f64>> {
        model.factorize_par(k, rng)
    }

    pub(crate) fn analysis_par(
        analysis: &Analysis<f64>,
        rng: &mut StdRng,
    ) -> Result<AnalysisReport<f64>> {
        analysis.run_par(rng)
    }
}

// Without the parallel feature `Cli::parallel` is always false and these fall back to serial.
#[cfg(not(feature = "parallel"))]
mod dispatch {
    use rand::rngs::StdRng;
    use symnmf::{Analysis, AnalysisReport, Factorization, Matrix, Result, SymNmf};

    pub(crate) fn similarity_par(model: &SymNmf<f64>) -> Result<Matrix<f64>> {
        model.similarity()
    }

    pub(crate) fn degree_par(model: &SymNmf<f64>) -> Result<Matrix<f64>> {
        model.degree()
    }

    pub(crate) fn normalize_par(model: &SymNmf<f64>) -> Result<Matrix<f64>> {
        model.normalize()
    }

    pub(crate) fn factorize_par(
        model: &SymNmf<f64>,
        k: usize,
        rng: &mut StdRng,
    ) -> Result<Factorization<f64>> {
        model.factorize(k, rng)
    }

    pub(crate) fn analysis_par(
        analysis: &Analysis<f64>,
        rng: &mut StdRng,
    ) -> Result<AnalysisReport<f64>> {
        analysis.run(rng)
    }
}

use dispatch::{analysis_par, degree_par, factorize_par, normalize_par, similarity_par};
