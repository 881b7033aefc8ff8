use crate::cluster::distance::DistanceMatrix;
use crate::cluster::linkage::complete_linkage_labels;
use crate::cluster::pins::MapPin;
use crate::record::{Coordinates, RepeaterRecord};
use crate::telemetry::LogManager;

/// Repeaters closer than this (in degrees) share a pin.
pub const DEFAULT_THRESHOLD: f64 = 0.03;

/// Groups repeaters into map pins by geographic proximity.
pub struct ProximityClusterer {
    threshold: f64,
    logger: LogManager,
}

impl ProximityClusterer {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            logger: LogManager::new("map"),
        }
    }

    /// Builds one pin per cluster, ordered by each cluster's first member.
    /// Records without coordinates are left off the map.
    pub fn pins(&self, records: &[RepeaterRecord]) -> Vec<MapPin> {
        let located: Vec<(&RepeaterRecord, Coordinates)> = records
            .iter()
            .filter_map(|record| record.coordinates.map(|coords| (record, coords)))
            .collect();
        let unlocated = records.len() - located.len();
        if unlocated > 0 {
            self.logger.record(&format!(
                "{} repeaters without coordinates left off the map",
                unlocated
            ));
        }

        let points: Vec<Coordinates> = located.iter().map(|(_, coords)| *coords).collect();
        let matrix = DistanceMatrix::from_points(&points);
        let labels = complete_linkage_labels(&matrix, self.threshold);
        let cluster_count = labels.iter().max().map_or(0, |max| max + 1);

        let mut members: Vec<Vec<(&RepeaterRecord, Coordinates)>> =
            vec![Vec::new(); cluster_count];
        for (&label, &entry) in labels.iter().zip(located.iter()) {
            members[label].push(entry);
        }

        let pins: Vec<MapPin> = members
            .into_iter()
            .filter(|cluster| !cluster.is_empty())
            .map(|cluster| build_pin(&cluster))
            .collect();
        self.logger.record(&format!(
            "{} pins for {} located repeaters",
            pins.len(),
            located.len()
        ));
        pins
    }
}

impl Default for ProximityClusterer {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

fn build_pin(cluster: &[(&RepeaterRecord, Coordinates)]) -> MapPin {
    let count = cluster.len() as f64;
    let lat = cluster.iter().map(|(_, c)| c.lat).sum::<f64>() / count;
    let lon = cluster.iter().map(|(_, c)| c.lon).sum::<f64>() / count;
    let lines = cluster
        .iter()
        .map(|(record, _)| {
            format!(
                "{} {}",
                record.callsign.as_deref().unwrap_or_default(),
                record.output_freq_mhz.as_deref().unwrap_or_default()
            )
        })
        .collect();
    MapPin {
        coordinates: Coordinates::new(lat, lon),
        lines,
    }
}
