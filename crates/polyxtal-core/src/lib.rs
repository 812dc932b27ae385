//! # Polyxtal Core
//!
//! The packing engine of the polyxtal structure generator. Spherical
//! crystalline grains are placed at random non-overlapping positions inside
//! a periodic cell by rejection sampling, filled with hexagonal lattice
//! atoms, rotated to their assigned orientation, and wrapped back into the
//! cell.
//!
//! ## Architecture
//!
//! [`packing::Packer`] owns the seeded random generator and the growing
//! grain sequence, and drives the per-grain pipeline
//! place → fill → rotate → wrap. Completed grains and their atom buffers are
//! handed to a [`packing::StructureSink`], the seam behind which output
//! handling lives.
//!
//! ## Modules
//!
//! - [`grain`] — Placed grains and per-species parameters.
//! - [`packing`] — The driver, the structure sink, and the error taxonomy.

pub mod grain;
pub mod packing;
