//! Polyxtal command-line interface.
//!
//! Generate polycrystalline atomistic structures from TOML job files:
//! ```sh
//! polyxtal run job.toml
//! polyxtal validate job.toml
//! polyxtal sample > job.toml
//! ```

mod config;
mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "polyxtal")]
#[command(about = "Polyxtal: polycrystalline atomistic structure generator")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a structure from a TOML job file.
    Run {
        /// Path to the job configuration file.
        config: PathBuf,
        /// Output directory (overrides config file setting).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a job file without running the generation.
    Validate {
        /// Path to the job configuration file.
        config: PathBuf,
    },
    /// Print an annotated sample job file.
    Sample,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, output } => {
            println!("Polyxtal structure generator");
            println!("============================");
            let job = config::load_config(&config)?;
            println!("Configuration: {}", config.display());

            let result = runner::run_generation(&job)?;

            // Determine output directory
            let out_dir = output.unwrap_or_else(|| PathBuf::from(&job.output.directory));

            let xyz_path = out_dir.join(&job.output.structure_file);
            runner::write_xyz(&result, &job, &xyz_path)?;

            let grain_path = out_dir.join(&job.output.grain_file);
            runner::write_grains_csv(&result, &job, &grain_path)?;

            // JSON grain table (optional)
            if job.output.save_json {
                let json_path = out_dir.join("grains.json");
                runner::write_grains_json(&result, &json_path)?;
            }

            println!("Completed");
            Ok(())
        }
        Commands::Validate { config } => {
            let job = config::load_config(&config)?;
            runner::build_packer(&job)?;
            println!("Configuration is valid: {}", config.display());
            Ok(())
        }
        Commands::Sample => {
            print!("{}", config::SAMPLE_JOB);
            Ok(())
        }
    }
}
