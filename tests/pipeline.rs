use pgn_dataset::extractor::ExtractorConfig;
use pgn_dataset::pipeline;
use pgn_dataset::reader::ReaderConfig;
use std::fs;
use std::path::PathBuf;

const TWO_MOVE_GAME: &str = "\
[Event \"Rated Rapid game\"]
[White \"alice\"]
[Black \"bob\"]
[Result \"1-0\"]
[WhiteElo \"1550\"]
[BlackElo \"1550\"]
[TimeControl \"600+0\"]

1. e4 e5 1-0

";

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("pgn_dataset_{}_{}", std::process::id(), name))
}

fn run_pipeline(name: &str, pgn: &str, min_bucket_samples: usize) -> Vec<Vec<i16>> {
    let input = temp_path(&format!("{}.pgn", name));
    let output = temp_path(&format!("{}.csv", name));
    fs::write(&input, pgn).unwrap();

    pipeline::run(
        input.to_str().unwrap(),
        output.to_str().unwrap(),
        ReaderConfig {
            time_control: "600+0".to_string(),
        },
        ExtractorConfig { min_bucket_samples },
        false,
    )
    .unwrap();

    let text = fs::read_to_string(&output).unwrap();
    fs::remove_file(&input).unwrap();
    fs::remove_file(&output).unwrap();

    let mut lines = text.lines();
    let header: Vec<&str> = lines.next().unwrap().split(',').collect();
    assert_eq!(header.len(), 68);
    assert_eq!(header[0], "a1");
    assert_eq!(header[28], "e4");
    assert_eq!(&header[64..], ["rating", "turn", "start", "end"]);

    lines
        .map(|line| line.split(',').map(|v| v.parse().unwrap()).collect())
        .collect()
}

#[test]
fn two_move_game_round_trip() {
    let rows = run_pipeline("round_trip", TWO_MOVE_GAME, 0);
    assert_eq!(rows.len(), 2);

    // first row: the standard starting arrangement, white to move, e2 -> e4
    let first = &rows[0];
    let start_rank: [i16; 8] = [4, 2, 3, 5, 6, 3, 2, 4];
    for file in 0..8 {
        assert_eq!(first[file], start_rank[file]);
        assert_eq!(first[8 + file], 1);
        assert_eq!(first[48 + file], -1);
        assert_eq!(first[56 + file], -start_rank[file]);
    }
    assert_eq!(&first[64..], [15, 1, 12, 28]);

    // second row: black to move, e7 -> e5
    let second = &rows[1];
    assert_eq!(second[28], 1); // white pawn now on e4
    assert_eq!(second[12], 0);
    assert_eq!(&second[64..], [15, -1, 52, 36]);
}

#[test]
fn mismatched_rating_buckets_produce_no_rows() {
    let pgn = TWO_MOVE_GAME.replace("[BlackElo \"1550\"]", "[BlackElo \"1650\"]");
    assert!(run_pipeline("mismatched", &pgn, 0).is_empty());
}

#[test]
fn wrong_time_control_produces_no_rows() {
    let pgn = TWO_MOVE_GAME.replace("600+0", "300+3");
    assert!(run_pipeline("wrong_tc", &pgn, 0).is_empty());
}

#[test]
fn identical_games_deduplicate() {
    let pgn = format!("{}{}", TWO_MOVE_GAME, TWO_MOVE_GAME);
    let rows = run_pipeline("dedup", &pgn, 0);
    assert_eq!(rows.len(), 2);
}

#[test]
fn underpopulated_buckets_are_dropped() {
    // the game yields 2 samples; a threshold of 3 drops its bucket
    assert!(run_pipeline("below_threshold", TWO_MOVE_GAME, 3).is_empty());
    assert_eq!(run_pipeline("at_threshold", TWO_MOVE_GAME, 2).len(), 2);
}

#[test]
fn buckets_emit_in_ascending_order() {
    let low = TWO_MOVE_GAME
        .replace("[WhiteElo \"1550\"]", "[WhiteElo \"1250\"]")
        .replace("[BlackElo \"1550\"]", "[BlackElo \"1250\"]")
        .replace("1. e4 e5 1-0", "1. d4 d5 1-0");
    let pgn = format!("{}{}", TWO_MOVE_GAME, low);

    let rows = run_pipeline("bucket_order", &pgn, 0);
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0][64], 12);
    assert_eq!(rows[1][64], 12);
    assert_eq!(rows[2][64], 15);
    assert_eq!(rows[3][64], 15);
}

#[test]
fn unreadable_input_is_an_error() {
    let output = temp_path("never_written.csv");
    let result = pipeline::run(
        temp_path("does_not_exist.pgn").to_str().unwrap(),
        output.to_str().unwrap(),
        ReaderConfig {
            time_control: "600+0".to_string(),
        },
        ExtractorConfig {
            min_bucket_samples: 0,
        },
        false,
    );

    assert!(result.is_err());
    // no partial output file is left behind
    assert!(!output.exists());
}
