#![warn(clippy::all, clippy::cargo, clippy::nursery, clippy::pedantic)]
#![warn(missing_docs)]

//! `moocore` — algorithms for assessing and comparing the quality of
//! multi-objective optimization outputs: Pareto dominance, hypervolume (exact
//! and approximate), unary quality indicators, the empirical attainment
//! function (EAF), weighted hypervolume variants, Vorob'ev statistics, and
//! uniform sampling of nondominated sets.

pub mod api;
pub mod avl;
pub mod dataset;
pub mod dominance;
pub mod eaf;
pub mod error;
pub mod hv;
pub mod hv_approx;
pub mod indicators;
pub mod manifold;
pub mod rng;
pub mod vorob;
pub mod whv;

pub use error::{MooError, ParseError, Result};
