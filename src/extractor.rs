use crate::encoding::{encode_board, turn_sign, EncodedBoard};
use crate::reader::TaggedGame;
use clap::Args;
use shakmaty::{Chess, File, Move, Position, Square};
use std::collections::BTreeMap;

#[derive(Args, Clone)]
pub struct ExtractorConfig {
    /// Drop rating buckets holding fewer samples than this
    #[arg(long, value_name = "min-bucket-samples", default_value = "1000000")]
    pub min_bucket_samples: usize,
}

/// One labeled training sample: the position before a half-move was played,
/// whose turn it was, and the move's endpoints as linear square indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub board: EncodedBoard,
    pub turn: i8,
    pub start: u8,
    pub end: u8,
}

/// Retained samples, keyed by rating bucket. BTreeMap keeps the
/// cross-bucket traversal order deterministic for a fixed input.
pub type BucketSamples = BTreeMap<u32, Vec<Sample>>;

/// Start and end squares of a move, with castling expressed as the king
/// moving to the g- or c-file (the convention the dataset columns use)
fn move_endpoints(mov: &Move) -> (Square, Square) {
    match mov {
        Move::Castle { king, rook } => {
            let file = if king < rook { File::G } else { File::C };
            (*king, Square::from_coords(file, king.rank()))
        }
        _ => (
            mov.from().expect("standard chess has no drops"),
            mov.to(),
        ),
    }
}

/// Replays accepted games and accumulates one sample per half-move into
/// the game's rating bucket
pub struct Extractor {
    buckets: BucketSamples,
}

impl Extractor {
    pub fn new() -> Self {
        Extractor {
            buckets: BTreeMap::new(),
        }
    }

    /// Replays a game from the starting position, recording each position
    /// *before* its move is applied. Returns the number of samples added.
    /// The archive is assumed pre-validated: an illegal recorded move is a
    /// contract violation and panics.
    pub fn add_game(&mut self, game: &TaggedGame) -> usize {
        let samples = self.buckets.entry(game.bucket).or_default();
        let mut pos = Chess::default();

        for san_plus in &game.sans {
            let mov = san_plus
                .san
                .to_move(&pos)
                .expect("archive contains an illegal move");
            let (start, end) = move_endpoints(&mov);

            samples.push(Sample {
                board: encode_board(pos.board()),
                turn: turn_sign(pos.turn()),
                start: start as u8,
                end: end as u8,
            });

            pos = pos.play(&mov).expect("archive contains an illegal move");
        }

        game.sans.len()
    }

    /// Total samples accumulated so far, across all buckets
    pub fn sample_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Drops every bucket with fewer samples than the configured minimum.
    /// Underpopulated buckets are removed entirely, never merged or padded.
    pub fn finish(self, config: &ExtractorConfig) -> BucketSamples {
        let mut buckets = self.buckets;
        buckets.retain(|_, samples| samples.len() >= config.min_bucket_samples);
        buckets
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}
