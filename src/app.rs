//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and initialises logging
//! - parses CLI arguments
//! - runs the fit pipeline or the sample generator
//! - prints tables or JSON and writes optional exports

use std::io::Write;

use clap::Parser;
use env_logger::Env;

use crate::cli::{Command, FitArgs, SampleArgs};
use crate::data::{SampleConfig, generate_sample};
use crate::domain::InitialGuess;
use crate::error::AppError;
use crate::fit::FitOptions;
use crate::math::LmConfig;
use crate::report::{FitReportJson, format_fit_summary, format_models_table, format_predictions};

pub mod pipeline;

pub use pipeline::FitConfig;

/// Entry point for the `sfit` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Models => {
            print!("{}", format_models_table());
            Ok(())
        }
        Command::Fit(args) => handle_fit(args),
        Command::Sample(args) => handle_sample(args),
    }
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(&args);
    let run = pipeline::run_fit(&config)?;

    if config.json {
        let report = FitReportJson::new(&run.outcome, &run.points, &run.predictions);
        let text = serde_json::to_string_pretty(&report)
            .map_err(|e| AppError::new(4, format!("Failed to encode JSON report: {e}")))?;
        println!("{text}");
    } else {
        println!("{}", format_fit_summary(&run.outcome, run.n_obs));
        if !run.points.is_empty() {
            println!("{}", format_predictions(&run.points, &run.predictions));
        }
    }

    if let Some(path) = &config.export_predictions {
        crate::io::write_predictions_csv(path, &run.points, &run.predictions)?;
    }

    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let config = SampleConfig {
        count: args.count,
        noise_sigma: args.noise,
        seed: args.seed,
        x_min: args.x_min,
        x_max: args.x_max,
    };
    let obs = generate_sample(args.model, &args.coefs, &config)?;

    match &args.out {
        Some(path) => crate::io::write_observations_csv(path, &obs),
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            crate::io::write_observations(&mut lock, &obs)?;
            lock.flush()
                .map_err(|e| AppError::new(2, format!("Failed to write to stdout: {e}")))
        }
    }
}

pub fn fit_config_from_args(args: &FitArgs) -> FitConfig {
    let initial_guess = match &args.initial {
        Some(values) => InitialGuess::Explicit(values.clone()),
        None => InitialGuess::Ones,
    };

    FitConfig {
        model: args.model,
        data_path: args.data.clone(),
        eval_points: args.eval.clone(),
        points_path: args.points.clone(),
        export_predictions: args.export.clone(),
        options: FitOptions {
            initial_guess,
            solver: LmConfig {
                max_iters: args.solver.max_iters,
                ftol: args.solver.ftol,
                xtol: args.solver.xtol,
                gtol: args.solver.gtol,
                ..LmConfig::default()
            },
        },
        json: args.json,
    }
}
