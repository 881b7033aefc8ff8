pub mod clusterer;
pub mod distance;
pub mod linkage;
pub mod pins;

pub use clusterer::{ProximityClusterer, DEFAULT_THRESHOLD};
pub use distance::DistanceMatrix;
pub use linkage::complete_linkage_labels;
pub use pins::{render_markers, MapPin};
