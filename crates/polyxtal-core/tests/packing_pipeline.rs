//! Integration tests: the full place → fill → rotate → wrap pipeline.
//!
//! These exercise the properties a generated structure must satisfy:
//! non-overlap under periodic images, atom containment, reproducibility
//! from the seed, and clean termination on over-dense configurations.

use polyxtal_core::grain::GrainSpecies;
use polyxtal_core::packing::{CollectedStructure, Packer, PackingError};
use polyxtal_geometry::cell::PeriodicCell;

/// Graphite-like species used throughout: c = 3.35 Å, a = 2.46 Å.
fn graphite(count: usize, radius: f64, padding: f64) -> GrainSpecies {
    GrainSpecies::new(count, radius, padding, 0.0, 3.35, 2.46, 0.0).unwrap()
}

#[test]
fn test_reference_two_grain_run() {
    // Cell 100³, seed 1, one species {count 2, radius 10, padding 1}.
    let mut packer = Packer::new(
        [100.0, 100.0, 100.0],
        vec![graphite(2, 10.0, 1.0)],
        1,
        1_000_000,
    )
    .unwrap();
    let mut structure = CollectedStructure::default();
    let summary = packer.run(&mut structure).unwrap();

    // Exactly two grains, each with a positive fill count.
    assert_eq!(summary.total_grains, 2);
    assert_eq!(structure.grains.len(), 2);
    assert!(structure.atoms_per_grain.iter().all(|&n| n > 0));

    // The running total equals the sum of per-grain fill counts.
    let per_grain_sum: usize = structure.atoms_per_grain.iter().sum();
    assert_eq!(summary.total_atoms, per_grain_sum as u64);
    assert_eq!(structure.atoms.len(), per_grain_sum);

    // The two spheres do not overlap under any periodic image.
    let cell = PeriodicCell::new([100.0, 100.0, 100.0]);
    let separation = structure.grains[0].separation(&structure.grains[1], &cell);
    assert!(
        separation >= 20.0,
        "Grain separation {} below the sum of radii",
        separation
    );
}

#[test]
fn test_all_grain_pairs_stay_separated() {
    let extents = [80.0, 80.0, 80.0];
    let species = vec![graphite(6, 8.0, 0.5), graphite(10, 5.0, 0.5)];
    let mut packer = Packer::new(extents, species, 2026, 1_000_000).unwrap();
    let mut structure = CollectedStructure::default();
    packer.run(&mut structure).unwrap();

    let cell = PeriodicCell::new(extents);
    let grains = &structure.grains;
    assert_eq!(grains.len(), 16);
    for i in 0..grains.len() {
        for j in (i + 1)..grains.len() {
            let separation = grains[i].separation(&grains[j], &cell);
            let contact = grains[i].radius + grains[j].radius;
            assert!(
                separation >= contact,
                "Grains {} and {} separated by {} < {}",
                i,
                j,
                separation,
                contact
            );
        }
    }
}

#[test]
fn test_atoms_end_up_inside_the_cell() {
    let extents = [60.0, 45.0, 70.0];
    let mut packer = Packer::new(extents, vec![graphite(4, 7.0, 1.0)], 11, 1_000_000).unwrap();
    let mut structure = CollectedStructure::default();
    packer.run(&mut structure).unwrap();

    for atom in &structure.atoms {
        for axis in 0..3 {
            assert!(
                atom[axis] >= 0.0 && atom[axis] <= extents[axis],
                "Atom coordinate {} outside [0, {}]",
                atom[axis],
                extents[axis]
            );
        }
    }
}

#[test]
fn test_same_seed_reproduces_the_run() {
    let build = || {
        Packer::new(
            [90.0, 90.0, 90.0],
            vec![graphite(5, 9.0, 1.0)],
            77,
            1_000_000,
        )
        .unwrap()
    };

    let mut first = CollectedStructure::default();
    build().run(&mut first).unwrap();
    let mut second = CollectedStructure::default();
    build().run(&mut second).unwrap();

    assert_eq!(first.atoms.len(), second.atoms.len());
    assert_eq!(first.atoms, second.atoms);
    let first_centres: Vec<[f64; 3]> = first.grains.iter().map(|g| g.centre).collect();
    let second_centres: Vec<[f64; 3]> = second.grains.iter().map(|g| g.centre).collect();
    assert_eq!(first_centres, second_centres);
}

#[test]
fn test_over_dense_run_terminates_with_exhaustion() {
    // 1000 grains of radius 50 cannot fit a 10 Å cell: the first grain
    // places, every later candidate overlaps some periodic image. The run
    // must fail cleanly instead of hanging or silently under-placing.
    let mut packer = Packer::new(
        [10.0, 10.0, 10.0],
        vec![graphite(1000, 50.0, 1.0)],
        7,
        2_000,
    )
    .unwrap();
    let mut structure = CollectedStructure::default();
    let result = packer.run(&mut structure);

    match result {
        Err(PackingError::PlacementExhausted {
            grain,
            species,
            radius,
            attempts,
        }) => {
            assert_eq!(grain, 1);
            assert_eq!(species, 0);
            assert_eq!(radius, 50.0);
            assert_eq!(attempts, 2_000);
        }
        Ok(summary) => panic!(
            "Over-dense run placed {} grains instead of failing",
            summary.total_grains
        ),
        Err(other) => panic!("Expected placement exhaustion, got: {}", other),
    }
}

#[test]
fn test_placement_failure_reports_no_partial_species_summary() {
    // Two species; the second cannot fit. The error surfaces instead of a
    // summary, and the sink holds only what was placed before the failure.
    let species = vec![graphite(1, 4.0, 0.5), graphite(2, 30.0, 0.5)];
    let mut packer = Packer::new([20.0, 20.0, 20.0], species, 3, 500).unwrap();
    let mut structure = CollectedStructure::default();
    let result = packer.run(&mut structure);

    assert!(matches!(
        result,
        Err(PackingError::PlacementExhausted { species: 1, .. })
    ));
    assert!(structure.grains.len() >= 1);
    assert!(structure.grains.len() <= 2);
}
