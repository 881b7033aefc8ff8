pub mod registry;
pub mod repeater;

pub use registry::Registry;
pub use repeater::{format_offset, format_output_freq, Coordinates, Mode, RepeaterRecord};
