//! Core record model and export pipeline for the repeater registry.
//!
//! Records flow one way: the registry is loaded, the tone codec classifies
//! each record's tone field, and the exporters reshape the records into
//! device channel tables. The clusterer groups the same records into map pins.

pub mod cluster;
pub mod export;
pub mod prelude;
pub mod record;
pub mod telemetry;
pub mod tone;

pub use prelude::{ChannelExporter, RepeaterError, RepeaterResult};
