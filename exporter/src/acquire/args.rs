use clap::Args;
use rptcore::record::{Coordinates, RepeaterRecord};

/// Fields for a new repeater supplied on the command line. They override
/// anything looked up from RepeaterBook.
#[derive(Args, Debug, Clone, Default)]
pub struct CandidateArgs {
    /// Short group name, e.g. the owning club
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub loc: Option<String>,
    /// RepeaterBook ID to look the repeater up by
    #[arg(long)]
    pub id: Option<String>,
    #[arg(long)]
    pub call: Option<String>,
    /// Output frequency in MHz
    #[arg(long)]
    pub freq: Option<String>,
    /// Signed offset in MHz, e.g. -0.6
    #[arg(long, allow_hyphen_values = true)]
    pub offset: Option<String>,
    /// CTCSS frequency, DCS code (D023N) or DMR descriptor
    #[arg(long)]
    pub tone: Option<String>,
    #[arg(long, default_value = "FM")]
    pub mode: String,
    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    pub lon: Option<f64>,
    #[arg(long = "long_name", visible_alias = "long-name")]
    pub long_name: Option<String>,
    /// Group website
    #[arg(long)]
    pub url: Option<String>,
}

impl CandidateArgs {
    /// Empty values are dropped; coordinates need both halves.
    pub fn to_record(&self) -> RepeaterRecord {
        let coordinates = match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
            _ => None,
        };
        RepeaterRecord {
            group_name: non_empty(self.name.as_deref()),
            callsign: non_empty(self.call.as_deref()),
            location: non_empty(self.loc.as_deref()),
            mode: non_empty(Some(self.mode.as_str())),
            output_freq_mhz: non_empty(self.freq.as_deref()),
            offset_mhz: non_empty(self.offset.as_deref()),
            tone: non_empty(self.tone.as_deref()),
            coordinates,
            long_name: non_empty(self.long_name.as_deref()),
            website: non_empty(self.url.as_deref()),
            ..Default::default()
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        candidate: CandidateArgs,
    }

    #[test]
    fn parses_flags_into_record() {
        let cli = Cli::parse_from([
            "rptexport", "--call", "W1ABC", "--freq", "146.940", "--offset", "-0.6", "--lat",
            "42.0", "--lon", "-71.0", "--name", "",
        ]);
        let record = cli.candidate.to_record();

        assert_eq!(record.callsign.as_deref(), Some("W1ABC"));
        assert_eq!(record.offset_mhz.as_deref(), Some("-0.6"));
        assert_eq!(record.mode.as_deref(), Some("FM"));
        assert_eq!(record.coordinates, Some(Coordinates::new(42.0, -71.0)));
        assert!(record.group_name.is_none());
    }

    #[test]
    fn zero_latitude_is_kept_but_half_coordinates_are_not() {
        let both = CandidateArgs {
            lat: Some(0.0),
            lon: Some(-71.0),
            ..Default::default()
        };
        assert_eq!(both.to_record().coordinates, Some(Coordinates::new(0.0, -71.0)));

        let half = CandidateArgs {
            lat: Some(42.0),
            ..Default::default()
        };
        assert!(half.to_record().coordinates.is_none());
    }
}
