use crate::export::profile::GenericFmProfile;
use crate::export::table::ChannelTable;
use crate::prelude::{ChannelExporter, RepeaterError, RepeaterResult};
use crate::record::{Mode, RepeaterRecord};
use crate::telemetry::{LogManager, MetricsRecorder};
use crate::tone::Tone;

pub const GENERIC_FM_COLUMNS: &[&str] = &[
    "Name",
    "Frequency",
    "Duplex",
    "Offset",
    "Tone",
    "rToneFreq",
    "cToneFreq",
    "DtcsCode",
    "DtcsPolarity",
    "Mode",
    "TStep",
    "Skip",
    "Comment",
    "URCALL",
    "RPT1CALL",
    "RPT2CALL",
    "DVCODE",
];

/// One CHIRP memory channel.
#[derive(Debug, Clone, PartialEq)]
struct ChirpRow {
    name: String,
    frequency: String,
    duplex: char,
    offset: String,
    tone: &'static str,
    r_tone_freq: Option<String>,
    c_tone_freq: String,
    dtcs_code: String,
    dtcs_polarity: String,
    mode: &'static str,
    tuning_step: String,
    comment: String,
}

impl ChirpRow {
    fn into_cells(self) -> Vec<Option<String>> {
        vec![
            Some(self.name),
            Some(self.frequency),
            Some(self.duplex.to_string()),
            Some(self.offset),
            Some(self.tone.to_string()),
            self.r_tone_freq,
            Some(self.c_tone_freq),
            Some(self.dtcs_code),
            Some(self.dtcs_polarity),
            Some(self.mode.to_string()),
            Some(self.tuning_step),
            None,
            Some(self.comment),
            None,
            None,
            None,
            None,
        ]
    }
}

/// Analog-only export in CHIRP's CSV layout.
pub struct GenericFmExporter {
    profile: GenericFmProfile,
    logger: LogManager,
}

impl GenericFmExporter {
    pub fn new(profile: GenericFmProfile) -> Self {
        Self {
            profile,
            logger: LogManager::new("chirp"),
        }
    }

    /// CHIRP's name for a mode, or `None` when the mode is not analog FM.
    fn chirp_mode(mode: &Mode) -> Option<&'static str> {
        match mode {
            Mode::Fm | Mode::Fusion => Some("FM"),
            Mode::Nbfm => Some("NFM"),
            _ => None,
        }
    }

    fn build_row(&self, record: &RepeaterRecord, mode: &'static str) -> RepeaterResult<ChirpRow> {
        let name = record
            .callsign
            .clone()
            .ok_or_else(|| RepeaterError::missing(record, "Callsign"))?;
        let frequency = record
            .output_freq_mhz
            .clone()
            .ok_or_else(|| RepeaterError::missing(record, "Output (MHz)"))?;
        let (duplex, magnitude) = record
            .offset_mhz
            .as_deref()
            .and_then(split_offset)
            .ok_or_else(|| RepeaterError::missing(record, "Offset (MHz)"))?;

        let mut row = ChirpRow {
            comment: format!("{} - {}", name, frequency),
            name,
            frequency,
            duplex,
            offset: format!("{:.6}", magnitude),
            tone: "Tone",
            r_tone_freq: None,
            c_tone_freq: self.profile.placeholder_tone.clone(),
            dtcs_code: self.profile.default_dtcs_code.clone(),
            dtcs_polarity: self.profile.dtcs_polarity.clone(),
            mode,
            tuning_step: self.profile.tuning_step.clone(),
        };

        match record.tone_code() {
            Tone::Ctcss(value) => row.r_tone_freq = Some(value),
            Tone::Dcs { code } => {
                row.tone = "DTCS";
                row.dtcs_code = code;
                row.r_tone_freq = Some(self.profile.placeholder_tone.clone());
            }
            Tone::Absent | Tone::Dmr(_) => {}
        }

        Ok(row)
    }
}

impl Default for GenericFmExporter {
    fn default() -> Self {
        Self::new(GenericFmProfile::default())
    }
}

impl ChannelExporter for GenericFmExporter {
    fn name(&self) -> &'static str {
        "Chirp"
    }

    fn export(&self, records: &[RepeaterRecord]) -> ChannelTable {
        let metrics = MetricsRecorder::new();
        let mut rows = Vec::new();

        for record in records {
            let Some(mode) = record.mode().as_ref().and_then(Self::chirp_mode) else {
                metrics.record_filtered();
                continue;
            };
            match self.build_row(record, mode) {
                Ok(row) => {
                    rows.push(row.into_cells());
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
            index_label: "Location",
            columns: GENERIC_FM_COLUMNS,
            rows,
            total: records.len(),
            metrics: metrics.snapshot(),
        };
        self.logger.record(&table.summary());
        table
    }
}

/// Splits a signed offset such as `-0.6` into its direction and magnitude.
fn split_offset(text: &str) -> Option<(char, f64)> {
    let mut chars = text.chars();
    let sign = chars.next().filter(|c| *c == '+' || *c == '-')?;
    let magnitude = chars.as_str().trim().parse::<f64>().ok()?;
    Some((sign, magnitude))
}
