use crate::prelude::RepeaterResult;
use crate::telemetry::Metrics;
use std::io;

/// A derived, never-persisted channel table in a target's column order.
///
/// Rows carry no index of their own; the 1-based channel number is the row
/// position and is written under `index_label`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelTable {
    pub target: &'static str,
    pub index_label: &'static str,
    pub columns: &'static [&'static str],
    pub rows: Vec<Vec<Option<String>>>,
    /// Size of the registry the table was derived from.
    pub total: usize,
    pub metrics: Metrics,
}

impl ChannelTable {
    pub fn kept(&self) -> usize {
        self.rows.len()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} : {} of {} compatible repeaters.",
            self.target,
            self.kept(),
            self.total
        )
    }

    /// Cell lookup by 1-based channel number and column name.
    pub fn cell(&self, channel: usize, column: &str) -> Option<&str> {
        let col = self.columns.iter().position(|name| *name == column)?;
        let row = self.rows.get(channel.checked_sub(1)?)?;
        row.get(col)?.as_deref()
    }

    pub fn column(&self, column: &str) -> Vec<Option<&str>> {
        match self.columns.iter().position(|name| *name == column) {
            Some(col) => self
                .rows
                .iter()
                .map(|row| row.get(col).and_then(|cell| cell.as_deref()))
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn write_csv<W: io::Write>(&self, writer: W) -> RepeaterResult<()> {
        let mut csv_writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(writer);

        let mut header = Vec::with_capacity(self.columns.len() + 1);
        header.push(self.index_label);
        header.extend_from_slice(self.columns);
        csv_writer.write_record(&header)?;

        for (idx, row) in self.rows.iter().enumerate() {
            let channel = (idx + 1).to_string();
            let mut record = Vec::with_capacity(row.len() + 1);
            record.push(channel.as_str());
            record.extend(row.iter().map(|cell| cell.as_deref().unwrap_or("")));
            csv_writer.write_record(&record)?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    pub fn to_csv_bytes(&self) -> RepeaterResult<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ChannelTable {
        ChannelTable {
            target: "Test",
            index_label: "No.",
            columns: &["Name", "Note"],
            rows: vec![
                vec![Some("W1ABC".into()), None],
                vec![Some("K1XYZ".into()), Some("a, b".into())],
            ],
            total: 5,
            metrics: Metrics::default(),
        }
    }

    #[test]
    fn csv_has_index_column_and_blank_cells() {
        let text = String::from_utf8(sample().to_csv_bytes().unwrap()).unwrap();
        assert_eq!(text, "No.,Name,Note\n1,W1ABC,\n2,K1XYZ,\"a, b\"\n");
    }

    #[test]
    fn summary_and_lookup() {
        let table = sample();
        assert_eq!(table.summary(), "Test : 2 of 5 compatible repeaters.");
        assert_eq!(table.cell(2, "Name"), Some("K1XYZ"));
        assert_eq!(table.cell(1, "Note"), None);
        assert_eq!(table.cell(0, "Name"), None);
        assert_eq!(table.column("Name"), vec![Some("W1ABC"), Some("K1XYZ")]);
    }
}
