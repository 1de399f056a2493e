//! # dsm-core: Solved-model data model
//!
//! Shared types for post-processing a solved energy-system dispatch model
//! with demand-side management (DSM).
//!
//! ## Design Philosophy
//!
//! The solver is treated as an opaque provider of named sequences:
//! - **Result blocks**: per node, every attached flow and internal variable
//!   ([`NodeSequences`]), keyed by component pair ([`SequenceKey`])
//! - **Declarations**: the input series the DSM demand node was declared with
//!   ([`DemandDeclaration`]: demand, capacity up, capacity down)
//! - **Index**: one hourly [`TimeIndex`] shared by all of them
//!
//! Consumers depend on the [`ResultStore`] and [`NodeDeclarations`] traits so
//! they can be fed from a JSON dump, a test fixture or a live solver binding.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use dsm_core::*;
//!
//! let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
//! let mut model = SolvedModel::new(TimeIndex::hourly(start, 2));
//! model
//!     .add_sequence("bus_elec", SequenceKey::flow("wind", "bus_elec"), vec![10.0, 12.0])
//!     .unwrap();
//!
//! let wind = model.node("bus_elec").unwrap().flow("wind", "bus_elec").unwrap();
//! assert_eq!(wind, &[10.0, 12.0]);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - [`DsmError`] and [`DsmResult`]
//! - [`index`] - the shared [`TimeIndex`]
//! - [`store`] - result blocks and the [`ResultStore`] trait
//! - [`model`] - the in-memory [`SolvedModel`]

pub mod error;
pub mod index;
pub mod model;
pub mod store;

pub use error::{DsmError, DsmResult};
pub use index::TimeIndex;
pub use model::{DemandDeclaration, NodeDeclarations, SolvedModel};
pub use store::{NodeSequences, ResultStore, Sequence, SequenceKey};
