use std::path::{Path, PathBuf};
use std::process::ExitCode;

use outcar_compare::cli::{exit_status, parse_dos_args};
use outcar_compare::error::UsageError;
use outcar_compare::pipeline::run_dos;
use outcar_compare::render::BitmapSink;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = run(&args);
    match &result {
        Ok(out) => log::info!("DOS plot written to {}", out.display()),
        Err(e) if e.is::<UsageError>() => eprintln!("{e}"),
        Err(e) => log::error!("{e:#}"),
    }
    ExitCode::from(exit_status(&result))
}

fn run(args: &[String]) -> anyhow::Result<PathBuf> {
    let invocation = parse_dos_args(args)?;
    run_dos(&mut BitmapSink, Path::new(""), &invocation)
}
