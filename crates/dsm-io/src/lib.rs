//! # dsm-io: Solved-model import & output folders
//!
//! Input/output support around the plotting pipeline.
//!
//! ## Quick Start: Load a Solved Model
//!
//! ```rust,no_run
//! use dsm_core::ResultStore;
//! use dsm_io::importers::load_solved_model;
//!
//! fn main() -> anyhow::Result<()> {
//!     let model = load_solved_model("results/base_a.json")?;
//!     println!("Timesteps: {}", model.index().len());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! ### Importers ([`importers`])
//! - [`importers::load_solved_model`] - solver JSON dump into a [`dsm_core::SolvedModel`]
//!
//! ### Helpers ([`helpers`])
//! - [`helpers::ensure_folder`] / [`helpers::make_directory`] - idempotent folder creation
//!
//! ## Error Handling
//!
//! All public APIs return `anyhow::Result<T>`; the underlying
//! [`dsm_core::DsmError`] stays reachable through `root_cause()`.

pub mod helpers;
pub mod importers;

pub use helpers::{ensure_folder, make_directory, FolderStatus};
pub use importers::{load_solved_model, parse_solved_model};
