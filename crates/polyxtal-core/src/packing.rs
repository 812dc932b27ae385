//! The packing driver and its collaborators.
//!
//! [`Packer`] owns the run state: the periodic cell, the species list, the
//! seeded random generator, and the ever-growing sequence of placed grains.
//! Each grain moves through place → fill → rotate → wrap before being handed
//! to the [`StructureSink`]. Errors are returned as values; the engine never
//! terminates the process.

use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use thiserror::Error;

use polyxtal_geometry::cell::PeriodicCell;
use polyxtal_geometry::rotation::Rotation;

use crate::grain::{Grain, GrainSpecies};

/// Default placement attempt budget per grain.
pub const DEFAULT_MAX_ATTEMPTS: u64 = 1_000_000;

/// Errors from configuration validation or the packing run.
#[derive(Debug, Error)]
pub enum PackingError {
    #[error("Radius {radius} is smaller than a lattice constant (a = {lattice_a}, c = {lattice_c})")]
    RadiusBelowLattice {
        radius: f64,
        lattice_a: f64,
        lattice_c: f64,
    },

    #[error("Padding ({padding}) and exclusion ({exclusion}) must not be negative")]
    NegativeMargin { padding: f64, exclusion: f64 },

    #[error("Lattice constants must be positive (a = {lattice_a}, c = {lattice_c})")]
    InvalidLatticeConstant { lattice_a: f64, lattice_c: f64 },

    #[error("Cell extents must be positive ({x} x {y} x {z})")]
    InvalidCell { x: f64, y: f64, z: f64 },

    #[error("No grain species configured")]
    NoSpecies,

    #[error("Placement attempt budget must be at least 1")]
    InvalidAttemptBudget,

    #[error(
        "Grain {grain} of species {species} (radius {radius}) could not be placed in {attempts} attempts"
    )]
    PlacementExhausted {
        grain: usize,
        species: usize,
        radius: f64,
        attempts: u64,
    },
}

/// Receives each placed grain and its finished atom buffer as the run
/// progresses.
///
/// The driver owns the buffer and reuses it between grains; implementations
/// copy whatever they need to keep.
pub trait StructureSink {
    fn accept(&mut self, grain: &Grain, atoms: &[[f64; 3]]);
}

/// An in-memory sink that collects the complete structure.
#[derive(Debug, Default)]
pub struct CollectedStructure {
    /// Placed grains, in placement order.
    pub grains: Vec<Grain>,
    /// All atom positions, in emission order.
    pub atoms: Vec<[f64; 3]>,
    /// Atom count per grain, in placement order.
    pub atoms_per_grain: Vec<usize>,
}

impl StructureSink for CollectedStructure {
    fn accept(&mut self, grain: &Grain, atoms: &[[f64; 3]]) {
        self.grains.push(grain.clone());
        self.atoms.extend_from_slice(atoms);
        self.atoms_per_grain.push(atoms.len());
    }
}

/// Per-species outcome of a packing run.
#[derive(Debug, Clone, Serialize)]
pub struct SpeciesSummary {
    pub species: usize,
    pub radius: f64,
    pub grains: usize,
    pub atoms: u64,
}

/// Totals for a completed packing run.
#[derive(Debug, Clone, Serialize)]
pub struct PackingSummary {
    pub species: Vec<SpeciesSummary>,
    pub total_grains: usize,
    pub total_atoms: u64,
    /// Fraction of the cell volume occupied by grain spheres.
    pub packing_fraction: f64,
}

/// Orchestrates placement, filling, rotation, and wrapping for every grain
/// of every species.
#[derive(Debug)]
pub struct Packer {
    cell: PeriodicCell,
    species: Vec<GrainSpecies>,
    max_attempts: u64,
    rng: StdRng,
    placed: Vec<Grain>,
}

impl Packer {
    /// Validate the run parameters and seed the random generator.
    ///
    /// The generator is seeded here, once; no reseeding happens between
    /// grains, so a given seed reproduces the whole run.
    pub fn new(
        extents: [f64; 3],
        species: Vec<GrainSpecies>,
        seed: u64,
        max_attempts: u64,
    ) -> Result<Self, PackingError> {
        if extents.iter().any(|&e| !(e > 0.0)) {
            return Err(PackingError::InvalidCell {
                x: extents[0],
                y: extents[1],
                z: extents[2],
            });
        }
        if species.is_empty() {
            return Err(PackingError::NoSpecies);
        }
        if max_attempts == 0 {
            return Err(PackingError::InvalidAttemptBudget);
        }
        Ok(Self {
            cell: PeriodicCell::new(extents),
            species,
            max_attempts,
            rng: StdRng::seed_from_u64(seed),
            placed: Vec::new(),
        })
    }

    /// The periodic cell of this run.
    pub fn cell(&self) -> &PeriodicCell {
        &self.cell
    }

    /// The configured species.
    pub fn species(&self) -> &[GrainSpecies] {
        &self.species
    }

    /// Grains placed so far, in placement order.
    pub fn placed(&self) -> &[Grain] {
        &self.placed
    }

    /// Place and fill every grain of every species.
    ///
    /// Grains are handed to the sink in placement order, each with its
    /// rotated, translated, and wrapped atom buffer. Placement failure is
    /// fatal for the run: no retry at another radius, no skip-and-continue.
    pub fn run(&mut self, sink: &mut dyn StructureSink) -> Result<PackingSummary, PackingError> {
        let mut summaries = Vec::with_capacity(self.species.len());
        let mut total_atoms = 0u64;
        let mut atoms: Vec<[f64; 3]> = Vec::new();

        for species_index in 0..self.species.len() {
            let species = &self.species[species_index];
            let mut species_atoms = 0u64;

            for grain_index in 0..species.count() {
                let grain = species
                    .place(
                        &mut self.rng,
                        &self.cell,
                        &self.placed,
                        species_index,
                        self.max_attempts,
                    )
                    .ok_or(PackingError::PlacementExhausted {
                        grain: grain_index,
                        species: species_index,
                        radius: species.radius(),
                        attempts: self.max_attempts,
                    })?;

                atoms.clear();
                atoms.extend(species.fill(&grain));

                let rotation = Rotation::from_orientation(&grain.orientation);
                for atom in &mut atoms {
                    let rotated = rotation.apply(*atom);
                    *atom = [
                        rotated[0] + grain.centre[0],
                        rotated[1] + grain.centre[1],
                        rotated[2] + grain.centre[2],
                    ];
                }
                for atom in &mut atoms {
                    *atom = self.cell.wrap(*atom);
                }

                species_atoms += atoms.len() as u64;
                sink.accept(&grain, &atoms);
                self.placed.push(grain);
            }

            summaries.push(SpeciesSummary {
                species: species_index,
                radius: species.radius(),
                grains: species.count(),
                atoms: species_atoms,
            });
            total_atoms += species_atoms;
        }

        let grain_volume: f64 = self
            .placed
            .iter()
            .map(|grain| 4.0 / 3.0 * PI * grain.radius.powi(3))
            .sum();

        Ok(PackingSummary {
            species: summaries,
            total_grains: self.placed.len(),
            total_atoms,
            packing_fraction: grain_volume / self.cell.volume(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graphite(count: usize, radius: f64) -> GrainSpecies {
        GrainSpecies::new(count, radius, 1.0, 0.0, 3.35, 2.46, 0.0).unwrap()
    }

    #[test]
    fn test_invalid_cell_is_rejected() {
        let result = Packer::new([0.0, 10.0, 10.0], vec![graphite(1, 5.0)], 1, 10);
        assert!(matches!(result, Err(PackingError::InvalidCell { .. })));
    }

    #[test]
    fn test_nan_cell_extent_is_rejected() {
        let result = Packer::new([f64::NAN, 10.0, 10.0], vec![graphite(1, 5.0)], 1, 10);
        assert!(matches!(result, Err(PackingError::InvalidCell { .. })));
    }

    #[test]
    fn test_empty_species_list_is_rejected() {
        let result = Packer::new([10.0, 10.0, 10.0], Vec::new(), 1, 10);
        assert!(matches!(result, Err(PackingError::NoSpecies)));
    }

    #[test]
    fn test_zero_attempt_budget_is_rejected() {
        let result = Packer::new([10.0, 10.0, 10.0], vec![graphite(1, 5.0)], 1, 0);
        assert!(matches!(result, Err(PackingError::InvalidAttemptBudget)));
    }

    #[test]
    fn test_single_grain_run_reaches_the_sink_once() {
        let mut packer =
            Packer::new([60.0, 60.0, 60.0], vec![graphite(1, 8.0)], 5, 1000).unwrap();
        let mut structure = CollectedStructure::default();
        let summary = packer.run(&mut structure).unwrap();

        assert_eq!(summary.total_grains, 1);
        assert_eq!(structure.grains.len(), 1);
        assert_eq!(structure.atoms_per_grain.len(), 1);
        assert_eq!(structure.atoms.len(), structure.atoms_per_grain[0]);
        assert_eq!(summary.total_atoms, structure.atoms.len() as u64);
        assert!(summary.packing_fraction > 0.0 && summary.packing_fraction < 1.0);
    }
}
