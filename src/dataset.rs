use crate::extractor::BucketSamples;
use shakmaty::Square;
use std::collections::HashSet;
use std::io::{self, Write};

/// 64 square values + rating + turn + start + end
pub const NUM_COLUMNS: usize = 68;

pub type Row = [i16; NUM_COLUMNS];

/// Flattens every retained sample into a row, bucket by bucket, removing
/// exact-duplicate rows. First occurrence wins, so the output order is
/// deterministic for a fixed input.
pub fn build_rows(buckets: &BucketSamples) -> Vec<Row> {
    let mut rows = Vec::new();
    let mut seen: HashSet<Row> = HashSet::new();

    for (bucket, samples) in buckets {
        for sample in samples {
            let mut row = [0i16; NUM_COLUMNS];
            for (i, value) in sample.board.iter().enumerate() {
                row[i] = *value as i16;
            }
            row[64] = *bucket as i16;
            row[65] = sample.turn as i16;
            row[66] = sample.start as i16;
            row[67] = sample.end as i16;

            if seen.insert(row) {
                rows.push(row);
            }
        }
    }

    rows
}

/// Writes the table as CSV: a header naming all 68 columns, then one line
/// per row. No index column. An empty row set yields a header-only file.
pub fn write_csv(rows: &[Row], write: &mut dyn Write) -> io::Result<()> {
    let mut header: Vec<String> = Square::ALL.iter().map(|sq| sq.to_string()).collect();
    header.extend(["rating", "turn", "start", "end"].map(String::from));
    writeln!(write, "{}", header.join(","))?;

    for row in rows {
        let line = row
            .iter()
            .map(|value| value.to_string())
            .collect::<Vec<_>>()
            .join(",");
        writeln!(write, "{}", line)?;
    }

    Ok(())
}
