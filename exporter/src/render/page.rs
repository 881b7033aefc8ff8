//! Summary and listing pages for the published site.

use crate::render::substitute;
use chrono::NaiveDateTime;
use rptcore::record::RepeaterRecord;
use std::collections::BTreeMap;

pub const DATE_FORMAT: &str = "%A %B %d at %H:%M";

const DEFAULT_INDEX: &str =
    "{{ n_repeaters }} repeaters from {{ n_groups }} groups, last updated {{ date_updated }}.\n";
const DEFAULT_REPEATERS: &str = "{{ table }}\n\n{{ associations }}";

#[derive(Clone, Copy)]
enum Align {
    Left,
    Right,
}

const TABLE_COLUMNS: [(&str, Align); 7] = [
    ("Group Name", Align::Left),
    ("Callsign", Align::Left),
    ("Location", Align::Left),
    ("Mode", Align::Left),
    ("Output (MHz)", Align::Right),
    ("Offset (MHz)", Align::Right),
    ("Tone (Hz)", Align::Right),
];

pub fn render_index(
    template: Option<&str>,
    n_repeaters: usize,
    n_groups: usize,
    updated: NaiveDateTime,
) -> String {
    let page = template.unwrap_or(DEFAULT_INDEX);
    let page = substitute(page, "{{ n_repeaters }}", &n_repeaters.to_string());
    let page = substitute(
        &page,
        "{{ date_updated }}",
        &updated.format(DATE_FORMAT).to_string(),
    );
    substitute(&page, "{{ n_groups }}", &n_groups.to_string())
}

pub fn render_repeaters(template: Option<&str>, records: &[RepeaterRecord]) -> String {
    let page = template.unwrap_or(DEFAULT_REPEATERS);
    let page = substitute(page, "{{ table }}", &markdown_table(records));
    substitute(&page, "{{ associations }}", &associations(records))
}

fn table_cells(record: &RepeaterRecord) -> [&str; 7] {
    [
        &record.group_name,
        &record.callsign,
        &record.location,
        &record.mode,
        &record.output_freq_mhz,
        &record.offset_mhz,
        &record.tone,
    ]
    .map(|field| field.as_deref().unwrap_or(""))
}

/// Pipe-style markdown table of the registry, raw mode text included.
pub fn markdown_table(records: &[RepeaterRecord]) -> String {
    let rows: Vec<[&str; 7]> = records.iter().map(table_cells).collect();
    let widths: Vec<usize> = TABLE_COLUMNS
        .iter()
        .enumerate()
        .map(|(idx, (header, _))| {
            rows.iter()
                .map(|row| row[idx].chars().count())
                .chain(std::iter::once(header.chars().count() + 2))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |cells: &[&str]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .zip(TABLE_COLUMNS.iter())
            .map(|((cell, &width), (_, align))| match align {
                Align::Left => format!("{:<width$}", cell, width = width),
                Align::Right => format!("{:>width$}", cell, width = width),
            })
            .collect();
        format!("| {} |", padded.join(" | "))
    };

    let rule: Vec<String> = widths
        .iter()
        .zip(TABLE_COLUMNS.iter())
        .map(|(&width, (_, align))| match align {
            Align::Left => format!(":{}", "-".repeat(width + 1)),
            Align::Right => format!("{}:", "-".repeat(width + 1)),
        })
        .collect();

    let headers: Vec<&str> = TABLE_COLUMNS.iter().map(|(header, _)| *header).collect();
    let mut lines = vec![line(&headers[..]), format!("|{}|", rule.join("|"))];
    lines.extend(rows.iter().map(|row| line(&row[..])));
    lines.join("\n")
}

/// One definition entry per group, sorted by group name, using the first
/// long name and website recorded for it.
pub fn associations(records: &[RepeaterRecord]) -> String {
    let mut groups: BTreeMap<&str, (Option<&str>, Option<&str>)> = BTreeMap::new();
    for record in records {
        let Some(group) = record.group_name.as_deref() else {
            continue;
        };
        let entry = groups.entry(group).or_default();
        entry.0 = entry.0.or(record.long_name.as_deref());
        entry.1 = entry.1.or(record.website.as_deref());
    }

    groups
        .into_iter()
        .map(|(short, (long, url))| {
            format!(
                "{}\n: [{}]({})\n\n",
                short,
                long.unwrap_or_default(),
                url.unwrap_or_default()
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn repeater(group: &str, call: &str, mode: &str) -> RepeaterRecord {
        RepeaterRecord {
            group_name: Some(group.into()),
            callsign: Some(call.into()),
            mode: Some(mode.into()),
            output_freq_mhz: Some("145.160".into()),
            offset_mhz: Some("-0.6".into()),
            ..Default::default()
        }
    }

    #[test]
    fn index_counts_and_date_are_filled_in() {
        let updated = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(14, 5, 0)
            .unwrap();
        let page = render_index(
            Some("{{ n_repeaters }} machines, {{ n_groups }} clubs. Updated {{ date_updated }}."),
            12,
            4,
            updated,
        );
        assert_eq!(page, "12 machines, 4 clubs. Updated Saturday March 09 at 14:05.");
        assert!(render_index(None, 1, 1, updated).starts_with("1 repeaters from 1 groups"));
    }

    #[test]
    fn table_is_padded_and_aligned() {
        let mut first = repeater("RRA", "W1ABC", "FM[1]");
        first.location = Some("Boston".into());
        first.output_freq_mhz = Some("146.940".into());
        first.tone = Some("146.2".into());
        let records = vec![first, repeater("MMRA", "K1DS", "DStar")];

        assert_eq!(
            markdown_table(&records),
            "| Group Name   | Callsign   | Location   | Mode   |   Output (MHz) |   Offset (MHz) |   Tone (Hz) |\n\
|:-------------|:-----------|:-----------|:-------|---------------:|---------------:|------------:|\n\
| RRA          | W1ABC      | Boston     | FM[1]  |        146.940 |           -0.6 |       146.2 |\n\
| MMRA         | K1DS       |            | DStar  |        145.160 |           -0.6 |             |"
        );
    }

    #[test]
    fn associations_are_sorted_and_use_first_known_values() {
        let mut rra = repeater("RRA", "W1ABC", "FM");
        rra.website = Some("https://rra.example".into());
        let mut rra_second = repeater("RRA", "W1XYZ", "FM");
        rra_second.long_name = Some("Roundabout Radio Association".into());
        rra_second.website = Some("https://other.example".into());
        let mut mmra = repeater("MMRA", "K1DS", "DStar");
        mmra.long_name = Some("Metro Mountain Repeater Association".into());
        let ungrouped = RepeaterRecord {
            callsign: Some("N1Q".into()),
            ..Default::default()
        };

        let text = associations(&[rra, rra_second, mmra, ungrouped]);
        assert_eq!(
            text,
            "MMRA\n: [Metro Mountain Repeater Association]()\n\n\
RRA\n: [Roundabout Radio Association](https://rra.example)\n\n"
        );
    }

    #[test]
    fn repeaters_page_fills_both_placeholders() {
        let records = vec![repeater("RRA", "W1ABC", "FM")];
        let page = render_repeaters(
            Some("# Repeaters\n{{ table }}\n## Groups\n{{ associations }}"),
            &records,
        );
        assert!(page.starts_with("# Repeaters\n| Group Name"));
        assert!(page.ends_with("## Groups\nRRA\n: []()\n\n"));
    }
}
