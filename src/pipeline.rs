use crate::dataset;
use crate::extractor::{Extractor, ExtractorConfig};
use crate::reader::{GameOutcome, GameStream, ReaderConfig, SkipReason};
use clap::Args;
use indicatif::{HumanCount, ProgressBar, ProgressStyle};
use std::error::Error;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use zstd::Encoder;

#[derive(Args)]
pub struct BuildDatasetCommand {
    /// Path or URL of a .pgn or .pgn.zst file to read games
    #[arg(long, value_name = "input")]
    input: String,

    /// Output .csv (or .csv.zst) file to write the dataset
    #[arg(long, value_name = "output")]
    output: String,

    /// Whether to compress the output CSV with the ZSTD algorithm
    #[arg(long, default_value = "false")]
    compress: bool,

    /// Game filter configuration
    #[clap(flatten)]
    reader_config: ReaderConfig,

    /// Bucket retention configuration
    #[clap(flatten)]
    extractor_config: ExtractorConfig,
}

#[derive(Debug, Default)]
pub struct PipelineReport {
    pub games_accepted: u64,
    pub skipped_missing_headers: u64,
    pub skipped_wrong_time_control: u64,
    pub skipped_mismatched_ratings: u64,
    pub samples_extracted: u64,
    pub buckets_kept: usize,
    pub buckets_dropped: usize,
    pub rows_written: u64,
    pub duplicates_removed: u64,
}

pub fn build_dataset(cmd: BuildDatasetCommand) -> Result<(), Box<dyn Error>> {
    println!("Input: {}", cmd.input);
    println!("Output: {}", cmd.output);
    println!("Write compressed: {}", cmd.compress);

    let report = run(
        &cmd.input,
        &cmd.output,
        cmd.reader_config,
        cmd.extractor_config,
        cmd.compress,
    )?;

    println!(
        "Done. Accepted games: {} (skipped: {} headers, {} time control, {} rating mismatch)",
        report.games_accepted,
        report.skipped_missing_headers,
        report.skipped_wrong_time_control,
        report.skipped_mismatched_ratings,
    );
    println!(
        "Buckets kept: {} (dropped {} under the sample threshold)",
        report.buckets_kept, report.buckets_dropped
    );
    println!(
        "Rows written: {} ({} duplicates removed)",
        report.rows_written, report.duplicates_removed
    );

    Ok(())
}

/// Runs the whole pipeline: stream games from the archive, replay accepted
/// ones into rating buckets, drop underpopulated buckets, flatten and
/// deduplicate, then write the CSV. The output file is only created once
/// the full table has been assembled in memory.
pub fn run(
    input: &str,
    output: &str,
    reader_config: ReaderConfig,
    extractor_config: ExtractorConfig,
    compress: bool,
) -> Result<PipelineReport, Box<dyn Error>> {
    let mut report = PipelineReport::default();
    let mut stream = GameStream::new(open_input(input)?, reader_config);
    let mut extractor = Extractor::new();

    let bar = ProgressBar::new_spinner().with_style(
        ProgressStyle::default_spinner()
            .template(
                "{spinner:.green} [Elapsed {elapsed_precise}] [Games {human_pos} @ {per_sec}] {msg}",
            )
            .unwrap(),
    );

    while let Some(outcome) = stream.next_game()? {
        bar.inc(1);

        match outcome {
            GameOutcome::Accepted(game) => {
                report.samples_extracted += extractor.add_game(&game) as u64;
                report.games_accepted += 1;
                bar.set_message(format!(
                    "[Samples {}]",
                    HumanCount(report.samples_extracted)
                ));
            }
            GameOutcome::Skipped(SkipReason::MissingHeaders) => {
                report.skipped_missing_headers += 1;
            }
            GameOutcome::Skipped(SkipReason::WrongTimeControl) => {
                report.skipped_wrong_time_control += 1;
            }
            GameOutcome::Skipped(SkipReason::MismatchedRatings) => {
                report.skipped_mismatched_ratings += 1;
            }
        }
    }
    bar.finish();

    let buckets_seen = extractor.bucket_count();
    let buckets = extractor.finish(&extractor_config);

    let retained: u64 = buckets.values().map(|s| s.len() as u64).sum();
    report.buckets_kept = buckets.len();
    report.buckets_dropped = buckets_seen - buckets.len();

    let rows = dataset::build_rows(&buckets);
    report.rows_written = rows.len() as u64;
    report.duplicates_removed = retained - report.rows_written;

    let mut writer = open_output(output, compress)?;
    dataset::write_csv(&rows, &mut writer)?;
    writer.flush()?;

    Ok(report)
}

fn open_input(input: &str) -> Result<Box<dyn io::Read>, Box<dyn Error>> {
    // raw data stream (may be compressed)
    let raw_reader: Box<dyn io::Read> = if input.starts_with("http") {
        Box::new(reqwest::blocking::get(input)?)
    } else {
        Box::new(File::open(input)?)
    };

    // decompress if necessary
    if input.ends_with(".zst") {
        Ok(Box::new(zstd::Decoder::new(raw_reader)?))
    } else {
        Ok(raw_reader)
    }
}

fn open_output(output: &str, compress: bool) -> Result<Box<dyn Write>, Box<dyn Error>> {
    let output_file = File::create(output)?;

    if compress {
        // the encoder is buffered internally
        Ok(Box::new(Encoder::new(output_file, 3)?.auto_finish()))
    } else {
        Ok(Box::new(BufWriter::new(output_file)))
    }
}
