use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use dotenvy::dotenv;
use kratos_subst::{template, VariableTable};
use log::trace;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Template file containing `${KRATOS_*}` placeholders
    template_file: PathBuf,

    /// Where to write the rendered file (created or truncated)
    output_file: PathBuf,
}

fn main() -> Result<(), anyhow::Error> {
    dotenv().ok();
    // Initialize the logger from the environment
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    trace!(
        "Rendering {} into {}",
        cli.template_file.display(),
        cli.output_file.display()
    );

    let table = VariableTable::from_env();
    template::substitute_file(&cli.template_file, &cli.output_file, &table)?;

    println!(
        "Substituted variables in {} -> {}",
        cli.template_file.display(),
        cli.output_file.display()
    );
    Ok(())
}
