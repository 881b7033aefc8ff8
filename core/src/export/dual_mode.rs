use crate::export::profile::DualModeProfile;
use crate::export::table::ChannelTable;
use crate::prelude::{ChannelExporter, RepeaterError, RepeaterResult};
use crate::record::{Mode, RepeaterRecord};
use crate::telemetry::{LogManager, MetricsRecorder};
use crate::tone::Tone;

pub const DUAL_MODE_COLUMNS: &[&str] = &[
    "Channel Name",
    "Receive Frequency",
    "Transmit Frequency",
    "Channel Type",
    "DMR MODE",
    "Band Width",
    "CTCSS/DCS Encode",
    "Contact",
    "Contact TG/DMR ID",
    "Color Code",
    "Slot",
    "Scan List",
];

/// One AnyTone D878 channel.
#[derive(Debug, Clone, PartialEq)]
struct D878Row {
    channel_name: String,
    receive_mhz: f64,
    transmit_mhz: f64,
    digital: bool,
    band_width: &'static str,
    encode: Option<String>,
    contact: Option<String>,
    contact_id: Option<String>,
    color_code: Option<String>,
    slot: Option<String>,
    scan_list: String,
}

impl D878Row {
    fn into_cells(self) -> Vec<Option<String>> {
        let (channel_type, dmr_mode) = if self.digital {
            ("D-Digital", "1")
        } else {
            ("A-Analog", "0")
        };
        vec![
            Some(self.channel_name),
            Some(format_mhz(self.receive_mhz)),
            Some(format_mhz(self.transmit_mhz)),
            Some(channel_type.to_string()),
            Some(dmr_mode.to_string()),
            Some(self.band_width.to_string()),
            self.encode,
            self.contact,
            self.contact_id,
            self.color_code,
            self.slot,
            Some(self.scan_list),
        ]
    }
}

/// Analog + DMR export in the AnyTone D878 CPS layout, 2 m then 70 cm.
pub struct DualModeExporter {
    profile: DualModeProfile,
    logger: LogManager,
}

impl DualModeExporter {
    pub fn new(profile: DualModeProfile) -> Self {
        Self {
            profile,
            logger: LogManager::new("d878"),
        }
    }

    fn accepts(mode: &Mode) -> bool {
        matches!(mode, Mode::Fm | Mode::Nbfm | Mode::Dmr | Mode::Fusion)
    }

    fn band_of(&self, mhz: f64) -> Option<usize> {
        self.profile.bands.iter().position(|band| band.contains(mhz))
    }

    fn build_row(
        &self,
        record: &RepeaterRecord,
        mode: &Mode,
        receive_mhz: f64,
        offset_mhz: f64,
    ) -> RepeaterResult<D878Row> {
        let channel_name = record
            .callsign
            .clone()
            .ok_or_else(|| RepeaterError::missing(record, "Callsign"))?;

        let digital = *mode == Mode::Dmr;
        let band_width = match mode {
            Mode::Fm | Mode::Fusion => "25K",
            _ => "12.5K",
        };

        let mut row = D878Row {
            channel_name,
            receive_mhz: round_khz(receive_mhz),
            transmit_mhz: round_khz(receive_mhz + offset_mhz),
            digital,
            band_width,
            encode: None,
            contact: None,
            contact_id: None,
            color_code: Some(self.profile.default_color_code.clone()),
            slot: None,
            scan_list: self.profile.scan_list.clone(),
        };

        match record.tone_code() {
            Tone::Dmr(captures) => {
                if !captures.is_matched() {
                    self.logger.degrade(&RepeaterError::MalformedTone {
                        callsign: record.display_name().to_string(),
                        tone: record.tone.clone().unwrap_or_default(),
                    });
                }
                row.contact = captures.contact;
                row.contact_id = captures.id;
                row.color_code = captures.color;
                row.slot = captures.slot;
            }
            Tone::Dcs { code } => row.encode = Some(format!("D{}N", code)),
            Tone::Ctcss(value) => row.encode = Some(value),
            Tone::Absent => {}
        }

        Ok(row)
    }
}

impl Default for DualModeExporter {
    fn default() -> Self {
        Self::new(DualModeProfile::default())
    }
}

impl ChannelExporter for DualModeExporter {
    fn name(&self) -> &'static str {
        "AnyTone D878"
    }

    fn export(&self, records: &[RepeaterRecord]) -> ChannelTable {
        let metrics = MetricsRecorder::new();
        let mut by_band: Vec<Vec<Vec<Option<String>>>> =
            vec![Vec::new(); self.profile.bands.len()];

        for record in records {
            let Some(mode) = record.mode().filter(Self::accepts) else {
                metrics.record_filtered();
                continue;
            };
            let receive = parse_mhz(record.output_freq_mhz.as_deref());
            let offset = parse_mhz(record.offset_mhz.as_deref());
            let (receive, offset) = match (receive, offset) {
                (Some(receive), Some(offset)) => (receive, offset),
                (None, _) => {
                    self.logger.skip(&RepeaterError::missing(record, "Output (MHz)"));
                    metrics.record_skipped();
                    continue;
                }
                (_, None) => {
                    self.logger.skip(&RepeaterError::missing(record, "Offset (MHz)"));
                    metrics.record_skipped();
                    continue;
                }
            };
            let Some(band) = self.band_of(receive) else {
                metrics.record_filtered();
                continue;
            };
            match self.build_row(record, &mode, receive, offset) {
                Ok(row) => {
                    by_band[band].push(row.into_cells());
                    metrics.record_kept();
                }
                Err(err) => {
                    self.logger.skip(&err);
                    metrics.record_skipped();
                }
            }
        }

        let table = ChannelTable {
            target: self.name(),
            index_label: "No.",
            columns: DUAL_MODE_COLUMNS,
            rows: by_band.into_iter().flatten().collect(),
            total: records.len(),
            metrics: metrics.snapshot(),
        };
        self.logger.record(&table.summary());
        table
    }
}

fn parse_mhz(text: Option<&str>) -> Option<f64> {
    text?.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn round_khz(mhz: f64) -> f64 {
    (mhz * 1000.0).round() / 1000.0
}

/// Shortest text for an already-rounded frequency, always with a decimal
/// point (`146.34`, `446.0`).
fn format_mhz(mhz: f64) -> String {
    let text = mhz.to_string();
    if text.contains('.') {
        text
    } else {
        format!("{}.0", text)
    }
}
