//! Feature preprocessing applied between feature building and the model.
//!
//! - **Missing values**: [`MissingValuePolicy`] resolves undefined lag,
//!   rolling and change values (zero-fill by default)
//! - **Normalization**: [`StandardScaler`] standardizes model inputs with
//!   statistics from the training split only
//!
//! # Example
//!
//! ```
//! use event_forecaster::preprocessing::{MissingValuePolicy, StandardScaler};
//! use ndarray::array;
//!
//! let filled = MissingValuePolicy::Zero.fill(&[None, Some(2.0)]);
//! assert_eq!(filled, vec![0.0, 2.0]);
//!
//! let scaler = StandardScaler::fit(&array![[1.0], [3.0]]).unwrap();
//! let z = scaler.transform(&array![[2.0]]).unwrap();
//! assert_eq!(z[[0, 0]], 0.0);
//! ```

pub mod fill;
pub mod normalization;

pub use fill::MissingValuePolicy;
pub use normalization::{Normalizer, StandardScaler, ZScoreNormalizer};
