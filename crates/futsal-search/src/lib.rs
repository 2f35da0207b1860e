//! The futsal availability search pipeline.
//!
//! Resolves a search center, walks the reservation listing, keeps slots on
//! the requested date, classifies them against the requested time, and
//! groups the survivors into one [`futsal_core::VenueAvailability`] per venue.

pub mod aggregate;
pub mod error;
pub mod pipeline;
pub mod source;

pub use aggregate::{group, Aggregator};
pub use error::SearchError;
pub use pipeline::{assemble, SearchOutcome, SearchPipeline, SearchStatus};
pub use source::{GeoResolver, SlotSource};
