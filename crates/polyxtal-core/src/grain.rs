//! Placed grains and grain species.
//!
//! A [`Grain`] is one placed sphere: centre, radius, species index, and the
//! lattice orientation assigned at placement time. A [`GrainSpecies`] holds
//! the per-type parameters and the derived unit cell, and implements the
//! placement and fill steps of the pipeline.

use std::f64::consts::PI;

use rand::Rng;
use serde::Serialize;

use polyxtal_geometry::cell::PeriodicCell;
use polyxtal_geometry::lattice::HexagonalLattice;
use polyxtal_geometry::rotation::Orientation;

use crate::packing::PackingError;

/// A placed spherical grain. Immutable once appended to the run's sequence.
#[derive(Debug, Clone, Serialize)]
pub struct Grain {
    /// Centre position in the cell (angstroms).
    pub centre: [f64; 3],
    /// Sphere radius (angstroms).
    pub radius: f64,
    /// Index of the species this grain belongs to.
    pub species: usize,
    /// Lattice orientation assigned at placement time.
    pub orientation: Orientation,
}

impl Grain {
    /// Minimum-image separation between this grain's centre and another's.
    pub fn separation(&self, other: &Grain, cell: &PeriodicCell) -> f64 {
        cell.min_image_distance(self.centre, other.centre)
    }

    /// Whether the two spheres overlap under periodic boundaries.
    pub fn overlaps(&self, other: &Grain, cell: &PeriodicCell) -> bool {
        self.separation(other, cell) < self.radius + other.radius
    }
}

/// Per-species packing parameters and the derived hexagonal unit cell.
///
/// Immutable after construction; the preferred orientation may be recorded
/// exactly once, before any placement, via
/// [`with_preferred_orientation`](GrainSpecies::with_preferred_orientation).
#[derive(Debug, Clone)]
pub struct GrainSpecies {
    count: usize,
    radius: f64,
    padding: f64,
    /// Extra excluded separation between grains of this species. Stored and
    /// reported; the overlap test compares against the sum of radii only.
    exclusion: f64,
    /// Anisotropy spread. Above the configured threshold a preferred
    /// orientation accompanies the species.
    spread: f64,
    lattice: HexagonalLattice,
    preferred: Option<Orientation>,
}

impl GrainSpecies {
    /// Validate the parameters and derive the unit cell.
    ///
    /// Checks run in a fixed order: the radius must not be smaller than
    /// either lattice constant, the padding and exclusion margins must not
    /// be negative, and the lattice constants must be positive. Any
    /// violation is a configuration error; nothing is placed.
    pub fn new(
        count: usize,
        radius: f64,
        padding: f64,
        exclusion: f64,
        lattice_c: f64,
        lattice_a: f64,
        spread: f64,
    ) -> Result<Self, PackingError> {
        if radius < lattice_c || radius < lattice_a {
            return Err(PackingError::RadiusBelowLattice {
                radius,
                lattice_a,
                lattice_c,
            });
        }
        if padding < 0.0 || exclusion < 0.0 {
            return Err(PackingError::NegativeMargin { padding, exclusion });
        }
        if !(lattice_a > 0.0) || !(lattice_c > 0.0) {
            return Err(PackingError::InvalidLatticeConstant {
                lattice_a,
                lattice_c,
            });
        }
        Ok(Self {
            count,
            radius,
            padding,
            exclusion,
            spread,
            lattice: HexagonalLattice::new(lattice_a, lattice_c),
            preferred: None,
        })
    }

    /// Record the preferred lattice orientation for an anisotropic species.
    pub fn with_preferred_orientation(mut self, orientation: Orientation) -> Self {
        self.preferred = Some(orientation);
        self
    }

    /// Target number of grains.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Sphere radius (angstroms).
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Radial shrinkage applied when filling (angstroms).
    pub fn padding(&self) -> f64 {
        self.padding
    }

    /// Extra excluded separation margin (angstroms).
    pub fn exclusion(&self) -> f64 {
        self.exclusion
    }

    /// Anisotropy spread.
    pub fn spread(&self) -> f64 {
        self.spread
    }

    /// The derived hexagonal unit cell.
    pub fn lattice(&self) -> &HexagonalLattice {
        &self.lattice
    }

    /// Preferred orientation, when one was recorded.
    pub fn preferred_orientation(&self) -> Option<Orientation> {
        self.preferred
    }

    /// Try to place one grain of this species.
    ///
    /// The candidate centre is drawn uniformly inside the cell and the
    /// orientation uniformly in [0, π) per axis, both once, before the
    /// retry loop. Each attempt tests the centre against every placed grain
    /// with the minimum-image overlap criterion; on rejection only the
    /// centre is redrawn, so the final orientation is the one fixed at the
    /// first trial. Returns `None` when the attempt budget is exhausted.
    pub fn place(
        &self,
        rng: &mut impl Rng,
        cell: &PeriodicCell,
        placed: &[Grain],
        species: usize,
        max_attempts: u64,
    ) -> Option<Grain> {
        let centre = random_centre(rng, cell);
        let orientation = Orientation {
            x: rng.gen::<f64>() * PI,
            y: rng.gen::<f64>() * PI,
            z: rng.gen::<f64>() * PI,
        };
        let mut candidate = Grain {
            centre,
            radius: self.radius,
            species,
            orientation,
        };

        for _ in 0..max_attempts {
            let too_close = placed
                .iter()
                .any(|other| other.overlaps(&candidate, cell));
            if !too_close {
                return Some(candidate);
            }
            candidate.centre = random_centre(rng, cell);
        }
        None
    }

    /// Fill a placed grain with lattice atoms, centred at the origin.
    ///
    /// The caller rotates, translates, and wraps the returned buffer.
    pub fn fill(&self, grain: &Grain) -> Vec<[f64; 3]> {
        self.lattice.fill_sphere(grain.radius, self.padding)
    }
}

fn random_centre(rng: &mut impl Rng, cell: &PeriodicCell) -> [f64; 3] {
    [
        cell.extents[0] * rng.gen::<f64>(),
        cell.extents[1] * rng.gen::<f64>(),
        cell.extents[2] * rng.gen::<f64>(),
    ]
}
