//! # Polyxtal Geometry
//!
//! Geometric building blocks for the polyxtal structure generator:
//!
//! - **Periodic cell** ([`cell`]) — Orthorhombic periodic boundaries with
//!   single-correction wrap-around and minimum-image distances.
//! - **Hexagonal lattice** ([`lattice`]) — The fixed 8-atom hexagonal-prism
//!   unit cell and its replication into spherical volumes.
//! - **Rotations** ([`rotation`]) — Rigid axis rotations composed in a fixed
//!   order, and their inverses.

pub mod cell;
pub mod lattice;
pub mod rotation;
