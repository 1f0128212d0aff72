//! Single-match football analytics.
//!
//! Two engines share this crate:
//! - [`xg`] turns a shooter/defender/goalkeeper snapshot into a geometric
//!   feature vector and scores it with an injected model.
//! - [`analysis`] rebuilds passing networks, cumulative xG and action counts
//!   from one match's event log, read through [`events::EventLogView`].

pub mod analysis;
pub mod dashboard;
pub mod error;
pub mod events;
pub mod fixtures;
pub mod geometry;
pub mod xg;

pub use error::{AnalyticsError, Result};
