pub mod dual_mode;
pub mod generic_fm;
pub mod profile;
pub mod table;

pub use dual_mode::{DualModeExporter, DUAL_MODE_COLUMNS};
pub use generic_fm::{GenericFmExporter, GENERIC_FM_COLUMNS};
pub use profile::{Band, DualModeProfile, GenericFmProfile};
pub use table::ChannelTable;
