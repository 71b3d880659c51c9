use std::io;
use std::process::ExitCode;

use highs_bridge::{Config, Error, Model};

fn main() -> ExitCode {
    // RUST_LOG controls verbosity, e.g. RUST_LOG=highs_bridge=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(io::stderr)
        .init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: highs-bridge <model-file>");
        return ExitCode::from(2);
    };

    match solve(&path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(component = "cli", error = %err, "Solve failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn solve(path: &str) -> Result<(), Error> {
    let config = Config::from_env()?;
    let mut model = Model::with_config(&config)?;
    model.read_model(path)?;
    let run_status = model.run()?;

    println!("Run status: {run_status}");
    println!("Status: {}", model.model_status());
    println!("Obj val: {}", model.objective_value());
    println!("N vars: {}", model.num_variables());
    println!("N conss: {}", model.num_constraints());
    println!("{:?}", model.solution()?);
    Ok(())
}
