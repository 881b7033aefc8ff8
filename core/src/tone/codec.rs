use crate::record::Mode;
use once_cell::sync::Lazy;
use regex::Regex;

// e.g. "CC2/TS1 BEARS1 TG/312488"
static DMR_TONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"CC(?P<color>\d+)/TS(?P<slot>[12]) (?P<contact>\S+) TG/(?P<id>\d+)")
        .expect("DMR tone pattern is valid")
});

/// Digital fields decoded from a DMR tone string. All `None` when the
/// string does not match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DmrCaptures {
    pub color: Option<String>,
    pub slot: Option<String>,
    pub contact: Option<String>,
    pub id: Option<String>,
}

impl DmrCaptures {
    pub fn decode(text: &str) -> Self {
        match DMR_TONE.captures(text) {
            Some(caps) => {
                let field = |name: &str| caps.name(name).map(|m| m.as_str().to_string());
                Self {
                    color: field("color"),
                    slot: field("slot"),
                    contact: field("contact"),
                    id: field("id"),
                }
            }
            None => Self::default(),
        }
    }

    pub fn is_matched(&self) -> bool {
        self.color.is_some()
    }
}

/// Classified tone field of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tone {
    /// No tone recorded.
    Absent,
    /// Plain sub-audible frequency, e.g. `146.2`.
    Ctcss(String),
    /// Digital coded squelch, e.g. `D023N` or `D023[N]`; holds the 3-digit code.
    Dcs { code: String },
    Dmr(DmrCaptures),
}

impl Tone {
    /// The mode gates the DMR pattern; the `D` prefix rule applies to every
    /// other mode, so a DMR tone string is never read as DCS.
    pub fn classify(mode: &Mode, raw: Option<&str>) -> Self {
        if *mode == Mode::Dmr {
            return Tone::Dmr(raw.map(DmrCaptures::decode).unwrap_or_default());
        }
        match raw {
            None => Tone::Absent,
            Some(text) if text.starts_with('D') => Tone::Dcs {
                code: text.chars().skip(1).take(3).collect(),
            },
            Some(text) => Tone::Ctcss(text.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctcss_passes_through() {
        assert_eq!(
            Tone::classify(&Mode::Fm, Some("146.2")),
            Tone::Ctcss("146.2".into())
        );
        assert_eq!(Tone::classify(&Mode::Fm, None), Tone::Absent);
    }

    #[test]
    fn dcs_code_is_characters_one_to_four() {
        assert_eq!(
            Tone::classify(&Mode::Nbfm, Some("D023N")),
            Tone::Dcs { code: "023".into() }
        );
        assert_eq!(
            Tone::classify(&Mode::Fm, Some("D754[I]")),
            Tone::Dcs { code: "754".into() }
        );
    }

    #[test]
    fn dmr_tone_decodes_captures() {
        let tone = Tone::classify(&Mode::Dmr, Some("CC2/TS1 BEARS1 TG/312488"));
        assert_eq!(
            tone,
            Tone::Dmr(DmrCaptures {
                color: Some("2".into()),
                slot: Some("1".into()),
                contact: Some("BEARS1".into()),
                id: Some("312488".into()),
            })
        );
    }

    #[test]
    fn dmr_mode_wins_over_dcs_prefix() {
        let tone = Tone::classify(&Mode::Dmr, Some("D023N"));
        assert_eq!(tone, Tone::Dmr(DmrCaptures::default()));
    }

    #[test]
    fn malformed_dmr_tone_yields_absent_captures() {
        let captures = DmrCaptures::decode("CC1/TS3 LOCAL TG/9");
        assert!(!captures.is_matched());
        assert_eq!(captures, DmrCaptures::default());
    }
}
