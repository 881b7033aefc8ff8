use crate::record::Coordinates;

/// One map annotation covering every repeater in a cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct MapPin {
    /// Mean of the member coordinates.
    pub coordinates: Coordinates,
    /// One `"{callsign} {frequency}"` entry per member, in registry order.
    pub lines: Vec<String>,
}

impl MapPin {
    /// Popup text, each member on its own line.
    pub fn label(&self) -> String {
        self.lines.iter().map(|line| format!("{}<br>", line)).collect()
    }

    pub fn coordinates_text(&self) -> String {
        format!("[{:.10}, {:.10}]", self.coordinates.lat, self.coordinates.lon)
    }

    /// Leaflet marker statement for the map widget.
    pub fn to_marker(&self) -> String {
        format!(
            "L.marker({}).bindPopup('{}').addTo(map);",
            self.coordinates_text(),
            self.label().replace('\\', "\\\\").replace('\'', "\\'")
        )
    }
}

pub fn render_markers(pins: &[MapPin]) -> String {
    pins.iter()
        .map(MapPin::to_marker)
        .collect::<Vec<_>>()
        .join("\n")
}
