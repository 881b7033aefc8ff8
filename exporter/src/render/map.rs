use crate::render::substitute;
use rptcore::cluster::{render_markers, MapPin};

pub const PINS_PLACEHOLDER: &str = "{{ repeater_pins }}";

/// Substitutes the marker statements into `template`, or returns them bare
/// when there is no template.
pub fn render_map(template: Option<&str>, pins: &[MapPin]) -> String {
    let markers = render_markers(pins);
    match template {
        Some(template) => substitute(template, PINS_PLACEHOLDER, &markers),
        None => {
            let mut text = markers;
            if !text.is_empty() {
                text.push('\n');
            }
            text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rptcore::record::Coordinates;

    fn pin() -> MapPin {
        MapPin {
            coordinates: Coordinates::new(42.0, -71.0),
            lines: vec!["W1ABC 146.940".into()],
        }
    }

    #[test]
    fn template_placeholder_is_replaced() {
        let page = render_map(Some("<script>\n{{ repeater_pins }}\n</script>"), &[pin()]);
        assert_eq!(
            page,
            "<script>\nL.marker([42.0000000000, -71.0000000000]).bindPopup('W1ABC 146.940<br>').addTo(map);\n</script>"
        );
    }

    #[test]
    fn bare_markers_without_template() {
        assert_eq!(render_map(None, &[]), "");
        assert!(render_map(None, &[pin(), pin()]).ends_with("addTo(map);\n"));
        assert_eq!(render_map(None, &[pin(), pin()]).lines().count(), 2);
    }
}
