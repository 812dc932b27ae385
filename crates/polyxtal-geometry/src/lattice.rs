//! The hexagonal-prism unit cell and its replication into spherical grains.
//!
//! The motif is the fixed 8-atom hexagonal-prism cell of graphite-like
//! crystals, expressed in an orthorhombic setting with repeat vectors
//! $(a, a\sqrt{3}, c)$. [`HexagonalLattice::fill_sphere`] tiles the motif
//! over enough repeats to cover a sphere and keeps the atoms that fall
//! inside the truncation radius.

/// A hexagonal-prism lattice derived from the constants `a` and `c`.
///
/// The motif and repeat vectors are fixed at construction; the emission
/// order of [`fill_sphere`](HexagonalLattice::fill_sphere) is part of the
/// reproducibility contract.
#[derive(Debug, Clone)]
pub struct HexagonalLattice {
    a: f64,
    c: f64,
    /// The 8-point unit-cell motif, in emission order (angstroms).
    motif: [[f64; 3]; 8],
    /// Orthorhombic repeat vector (a, a·√3, c).
    repeat: [f64; 3],
}

impl HexagonalLattice {
    /// Build the unit cell for lattice constants `a` and `c` (angstroms).
    ///
    /// The motif coordinates are closed forms in `a` and `c`: the four
    /// basal-plane points of the hexagonal cell and the same four shifted by
    /// half the c-axis repeat with the in-plane stacking offset.
    pub fn new(a: f64, c: f64) -> Self {
        assert!(a > 0.0 && c > 0.0, "Lattice constants must be positive");
        let rt3 = 3.0_f64.sqrt();
        let motif = [
            [0.0, 0.0, 0.0],
            [0.5 * a, a / (2.0 * rt3), 0.0],
            [0.5 * a, a * rt3 / 2.0, 0.0],
            [0.0, 2.0 * a / rt3, 0.0],
            [0.0, 0.0, 0.5 * c],
            [0.0, a / rt3, 0.5 * c],
            [0.5 * a, a * rt3 / 2.0, 0.5 * c],
            [0.5 * a, a * rt3 / 2.0 + a / rt3, 0.5 * c],
        ];
        Self {
            a,
            c,
            motif,
            repeat: [a, a * rt3, c],
        }
    }

    /// a-axis lattice constant.
    pub fn a(&self) -> f64 {
        self.a
    }

    /// c-axis lattice constant.
    pub fn c(&self) -> f64 {
        self.c
    }

    /// Orthorhombic repeat vector.
    pub fn repeat(&self) -> [f64; 3] {
        self.repeat
    }

    /// Atoms of the unit-cell motif, in emission order.
    pub fn motif(&self) -> &[[f64; 3]; 8] {
        &self.motif
    }

    /// Replicate the unit cell to fill a sphere centred at the origin.
    ///
    /// The repetition bound along each axis is `⌈radius / repeat⌉ + 1`,
    /// which guarantees the tiled lattice fully covers the sphere. An atom
    /// is kept when its distance from the origin is below
    /// `radius - padding`, so the outermost shell of the grain stays empty.
    ///
    /// The scan order (x offsets, then y, then z, then the 8 motif points)
    /// is fixed; downstream output order depends on it.
    pub fn fill_sphere(&self, radius: f64, padding: f64) -> Vec<[f64; 3]> {
        let cutoff = radius - padding;
        let nx = (radius / self.repeat[0]).ceil() as i64 + 1;
        let ny = (radius / self.repeat[1]).ceil() as i64 + 1;
        let nz = (radius / self.repeat[2]).ceil() as i64 + 1;

        let mut atoms = Vec::new();
        for ix in -nx..=nx {
            for iy in -ny..=ny {
                for iz in -nz..=nz {
                    for point in &self.motif {
                        let x = ix as f64 * self.repeat[0] + point[0];
                        let y = iy as f64 * self.repeat[1] + point[1];
                        let z = iz as f64 * self.repeat[2] + point[2];
                        if (x * x + y * y + z * z).sqrt() < cutoff {
                            atoms.push([x, y, z]);
                        }
                    }
                }
            }
        }
        atoms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Graphite lattice constants (angstroms).
    const A: f64 = 2.46;
    const C: f64 = 3.35;

    #[test]
    fn test_motif_matches_closed_forms() {
        let lattice = HexagonalLattice::new(A, C);
        let rt3 = 3.0_f64.sqrt();
        let motif = lattice.motif();
        // Basal plane at z = 0, stacked plane at z = c/2.
        assert_eq!(motif[0], [0.0, 0.0, 0.0]);
        assert!((motif[1][1] - A / (2.0 * rt3)).abs() < 1e-12);
        assert!((motif[3][1] - 2.0 * A / rt3).abs() < 1e-12);
        assert!(motif[4..].iter().all(|p| (p[2] - C / 2.0).abs() < 1e-12));
        let repeat = lattice.repeat();
        assert!((repeat[1] - A * rt3).abs() < 1e-12);
    }

    #[test]
    fn test_fill_sphere_count_tracks_density() {
        let lattice = HexagonalLattice::new(A, C);
        let radius = 10.0;
        let atoms = lattice.fill_sphere(radius, 0.0);

        // 8 atoms per orthorhombic cell of volume a · a√3 · c gives the
        // expected count (4/3 π r³) · 8 / (a²√3·c) ≈ 955. Allow generous
        // tolerance for surface truncation.
        let cell_volume = A * A * 3.0_f64.sqrt() * C;
        let expected = 4.0 / 3.0 * std::f64::consts::PI * radius.powi(3) * 8.0 / cell_volume;
        assert!(
            (atoms.len() as f64) > 0.8 * expected,
            "Too few atoms: {} vs expected ~{:.0}",
            atoms.len(),
            expected
        );
        assert!(
            (atoms.len() as f64) < 1.2 * expected,
            "Too many atoms: {} vs expected ~{:.0}",
            atoms.len(),
            expected
        );
    }

    #[test]
    fn test_all_atoms_inside_truncation_radius() {
        let lattice = HexagonalLattice::new(A, C);
        let radius = 12.0;
        let padding = 1.0;
        for atom in lattice.fill_sphere(radius, padding) {
            let r = (atom[0] * atom[0] + atom[1] * atom[1] + atom[2] * atom[2]).sqrt();
            assert!(
                r < radius - padding,
                "Atom at r = {} exceeds cutoff {}",
                r,
                radius - padding
            );
        }
    }

    #[test]
    fn test_padding_strictly_shrinks_the_fill() {
        let lattice = HexagonalLattice::new(A, C);
        let unpadded = lattice.fill_sphere(10.0, 0.0).len();
        let padded = lattice.fill_sphere(10.0, 1.5).len();
        assert!(padded < unpadded);
        assert!(padded > 0);
    }

    #[test]
    fn test_emission_order_is_deterministic() {
        let lattice = HexagonalLattice::new(A, C);
        let first = lattice.fill_sphere(8.0, 0.5);
        let second = lattice.fill_sphere(8.0, 0.5);
        assert_eq!(first, second);
    }

    #[test]
    fn test_padding_larger_than_radius_yields_no_atoms() {
        let lattice = HexagonalLattice::new(A, C);
        assert!(lattice.fill_sphere(5.0, 6.0).is_empty());
    }
}
