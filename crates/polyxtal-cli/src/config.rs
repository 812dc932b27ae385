//! TOML job configuration for structure generation.

use serde::Deserialize;

/// Top-level job configuration.
#[derive(Debug, Deserialize)]
pub struct JobConfig {
    /// Seed for the random generator.
    pub seed: u64,
    /// Periodic cell extents (angstroms).
    pub cell: [f64; 3],
    #[serde(default)]
    pub packing: PackingConfig,
    #[serde(rename = "grain")]
    pub grains: Vec<GrainConfig>,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Placement loop parameters.
#[derive(Debug, Deserialize)]
pub struct PackingConfig {
    /// Placement attempts per grain before the run is abandoned.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u64,
}

impl Default for PackingConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
        }
    }
}

fn default_max_attempts() -> u64 {
    polyxtal_core::packing::DEFAULT_MAX_ATTEMPTS
}

/// One grain species from the job file.
#[derive(Debug, Deserialize)]
pub struct GrainConfig {
    /// Target number of grains.
    pub count: usize,
    /// Sphere radius (angstroms).
    pub radius: f64,
    /// Radial shrinkage applied when filling (angstroms, default 0).
    #[serde(default)]
    pub padding: f64,
    /// Extra excluded separation between grains of this species
    /// (angstroms, default 0).
    #[serde(default)]
    pub exclusion: f64,
    /// c-axis lattice constant (angstroms).
    pub lattice_c: f64,
    /// a-axis lattice constant (angstroms).
    pub lattice_a: f64,
    /// Anisotropy spread (default 0). Above 1e-4 an `orientation` triple is
    /// required.
    #[serde(default)]
    pub spread: f64,
    /// Preferred lattice orientation angles (radians).
    pub orientation: Option<[f64; 3]>,
    /// Element label written for this species' atoms (default "C").
    #[serde(default = "default_element")]
    pub element: String,
}

fn default_element() -> String {
    "C".into()
}

/// Output configuration.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Output directory (default: "./output").
    #[serde(default = "default_output_dir")]
    pub directory: String,
    /// Structure file name, XYZ format (default: "structure.xyz").
    #[serde(default = "default_structure_file")]
    pub structure_file: String,
    /// Grain table file name, CSV (default: "grains.csv").
    #[serde(default = "default_grain_file")]
    pub grain_file: String,
    /// Whether to also save the grain table as JSON (default: false).
    #[serde(default)]
    pub save_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            structure_file: default_structure_file(),
            grain_file: default_grain_file(),
            save_json: false,
        }
    }
}

fn default_output_dir() -> String {
    "./output".into()
}
fn default_structure_file() -> String {
    "structure.xyz".into()
}
fn default_grain_file() -> String {
    "grains.csv".into()
}

/// Load and parse a TOML job configuration file.
pub fn load_config(path: &std::path::Path) -> anyhow::Result<JobConfig> {
    use anyhow::Context;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read job file: {}", path.display()))?;
    let config: JobConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse job file: {}", path.display()))?;
    Ok(config)
}

/// An annotated sample job file, printed by `polyxtal sample`.
pub const SAMPLE_JOB: &str = r#"# polyxtal job file
# Lengths are in angstroms, angles in radians.

seed = 1
cell = [100.0, 100.0, 100.0]

[packing]
max_attempts = 1000000

# One table per grain species, packed in file order.
[[grain]]
count = 2        # grains to place
radius = 10.0    # sphere radius
padding = 1.0    # empty shell at the sphere border
exclusion = 0.0  # extra excluded separation (stored, reported)
lattice_c = 3.35 # graphite c-axis constant
lattice_a = 2.46 # graphite a-axis constant
spread = 0.0     # above 1e-4, an orientation triple is required
# orientation = [0.0, 0.0, 1.5708]
element = "C"

[output]
directory = "./output"
structure_file = "structure.xyz"
grain_file = "grains.csv"
save_json = false
"#;
