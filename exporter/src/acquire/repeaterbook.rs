use anyhow::Context;
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use rptcore::record::{format_offset, format_output_freq, Coordinates, RepeaterRecord};
use scraper::{Html, Selector};
use std::time::Duration;

static MAP_CENTRE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"center:\s*(\[[^\]]*\])").expect("map centre pattern is valid"));

const CALLSIGN_LINK: &str = "msResult.php?call=";

/// Something that can turn a lookup key into a partial repeater record.
pub trait RecordSource {
    /// No key yields an empty record. A key the source does not know also
    /// yields an empty record; only transport failures are errors.
    fn lookup(&self, id: Option<&str>) -> anyhow::Result<RepeaterRecord>;
}

/// Scrapes the RepeaterBook details page.
pub struct RepeaterBookClient {
    details_url: String,
    http: reqwest::blocking::Client,
}

impl RepeaterBookClient {
    pub fn new(details_url: &str) -> anyhow::Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("building RepeaterBook HTTP client")?;
        Ok(Self {
            details_url: details_url.to_string(),
            http,
        })
    }
}

impl RecordSource for RepeaterBookClient {
    fn lookup(&self, id: Option<&str>) -> anyhow::Result<RepeaterRecord> {
        let Some(id) = id.map(str::trim).filter(|id| !id.is_empty()) else {
            return Ok(RepeaterRecord::default());
        };

        let url = format!("{}&ID={}", self.details_url, id);
        info!("looking up RepeaterBook ID {}", id);
        let body = self
            .http
            .get(&url)
            .send()
            .with_context(|| format!("fetching {}", url))?
            .error_for_status()
            .with_context(|| format!("fetching {}", url))?
            .text()
            .with_context(|| format!("reading response from {}", url))?;

        Ok(parse_details_page(&body))
    }
}

fn clean_cell(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn callsign_from_href(href: &str) -> Option<String> {
    let (_, rest) = href.split_once(CALLSIGN_LINK)?;
    let call = rest.split('&').next()?.trim();
    (!call.is_empty()).then(|| call.to_string())
}

/// Text of the cell following the one labelled `label`.
fn labelled<'a>(cells: &'a [String], label: &str) -> Option<&'a str> {
    let position = cells.iter().position(|cell| cell == label)?;
    cells
        .get(position + 1)
        .map(String::as_str)
        .filter(|value| !value.is_empty())
}

/// Extracts callsign, downlink, offset, uplink tone and map centre from a
/// details page. Fields that cannot be found or parsed are left absent.
pub fn parse_details_page(html: &str) -> RepeaterRecord {
    let document = Html::parse_document(html);
    let link_selector = Selector::parse(&format!("a[href*=\"{}\"]", CALLSIGN_LINK))
        .expect("callsign link selector is valid");
    let cell_selector = Selector::parse("td").expect("table cell selector is valid");

    let Some(callsign) = document
        .select(&link_selector)
        .filter_map(|link| link.value().attr("href"))
        .find_map(callsign_from_href)
    else {
        warn!("RepeaterBook page has no callsign; treating as not found");
        return RepeaterRecord::default();
    };

    let cells: Vec<String> = document
        .select(&cell_selector)
        .map(|cell| clean_cell(&cell.text().collect::<String>()))
        .collect();

    let output_freq_mhz = labelled(&cells, "Downlink:")
        .and_then(|text| text.parse::<f64>().ok())
        .map(format_output_freq);
    let offset_mhz = labelled(&cells, "Offset:")
        .and_then(|text| text.split_whitespace().next())
        .and_then(|text| text.parse::<f64>().ok())
        .map(format_offset);
    let tone = labelled(&cells, "Uplink Tone:").map(str::to_string);
    let coordinates = MAP_CENTRE
        .captures(html)
        .and_then(|caps| Coordinates::parse(&caps[1]));

    if output_freq_mhz.is_none() {
        warn!("{}: no downlink frequency on RepeaterBook page", callsign);
    }
    if coordinates.is_none() {
        warn!("{}: no usable map centre on RepeaterBook page", callsign);
    }

    RepeaterRecord {
        callsign: Some(callsign),
        output_freq_mhz,
        offset_mhz,
        tone,
        coordinates,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "<html><body>\n\
<a href=\"msResult.php?call=W1ABC&state_id=53\">W1ABC</a>\n\
<table>\n\
<tr><td>Downlink:</td>\n<td>146.94</td></tr>\n\
<tr><td>Uplink Tone:</td>\n<td>146.2</td></tr>\n\
<tr><td>Offset:</td>\n<td>\n0.6 MHz</td></tr>\n\
</table>\n\
<script>var map = L.map('map', {\n center: [42.3601, -71.0589],\n zoom: 13});</script>\n\
</body></html>";

    #[test]
    fn details_page_is_parsed_into_formatted_fields() {
        let record = parse_details_page(PAGE);
        assert_eq!(record.callsign.as_deref(), Some("W1ABC"));
        assert_eq!(record.output_freq_mhz.as_deref(), Some("146.940"));
        assert_eq!(record.offset_mhz.as_deref(), Some("+0.6"));
        assert_eq!(record.tone.as_deref(), Some("146.2"));
        assert_eq!(record.coordinates, Some(Coordinates::new(42.3601, -71.0589)));
        assert!(record.mode.is_none());
    }

    #[test]
    fn crlf_and_reindented_markup_parse_the_same() {
        let page = "<html>\r\n  <body>\r\n    <a class=\"call\" href=\"/repeaters/msResult.php?call=W1ABC&amp;state_id=53\">\r\n      W1ABC\r\n    </a>\r\n\
    <table class=\"details\">\r\n      <tbody>\r\n        <tr>\r\n          <td class=\"label\">\r\n            Downlink:\r\n          </td>\r\n\
          <td>  146.94  </td>\r\n        </tr>\r\n        <tr>\r\n          <td>Uplink Tone:</td>\r\n          <td><b>146.2</b></td>\r\n        </tr>\r\n\
        <tr>\r\n          <td>Offset:</td>\r\n          <td>\r\n            0.6 MHz\r\n          </td>\r\n        </tr>\r\n      </tbody>\r\n    </table>\r\n\
    <script>\r\n      var map = L.map('map', {\r\n        center:   [42.3601, -71.0589],\r\n        zoom: 13\r\n      });\r\n    </script>\r\n  </body>\r\n</html>\r\n";

        assert_eq!(parse_details_page(page), parse_details_page(PAGE));
    }

    #[test]
    fn page_without_tone_or_centre_leaves_them_absent() {
        let page = "<a href=\"msResult.php?call=K1XYZ&x=1\">K1XYZ</a>\n\
<table><tr><td>Downlink:</td><td>442.0125</td></tr>\n\
<tr><td>Offset:</td><td>-5.0 MHz</td></tr>\n\
<tr><td>Uplink Tone:</td><td></td></tr></table>";
        let record = parse_details_page(page);
        assert_eq!(record.callsign.as_deref(), Some("K1XYZ"));
        assert_eq!(record.output_freq_mhz.as_deref(), Some("442.0125"));
        assert_eq!(record.offset_mhz.as_deref(), Some("-5.0"));
        assert!(record.tone.is_none());
        assert!(record.coordinates.is_none());
    }

    #[test]
    fn not_found_page_yields_empty_record() {
        assert!(parse_details_page("<html>No repeater found</html>").is_empty());
    }

    #[test]
    fn missing_key_skips_the_network() {
        let client = RepeaterBookClient::new("http://127.0.0.1:9/details.php?state_id=53").unwrap();
        assert!(client.lookup(None).unwrap().is_empty());
        assert!(client.lookup(Some("  ")).unwrap().is_empty());
    }
}
