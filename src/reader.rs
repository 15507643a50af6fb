use clap::Args;
use pgn_reader::{BufferedReader, RawHeader, SanPlus, Skip, Visitor};
use std::io::{self, Read};
use std::mem;

#[derive(Args, Clone)]
pub struct ReaderConfig {
    /// Only accept games recorded with this exact time control
    #[arg(long, value_name = "time-control", default_value = "600+0")]
    pub time_control: String,
}

/// An accepted game, tagged with the rating bucket both players share
pub struct TaggedGame {
    /// floor(elo / 100), equal for both sides
    pub bucket: u32,
    pub sans: Vec<SanPlus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Rating or time-control header absent or unparseable
    MissingHeaders,
    /// Time control differs from the configured one
    WrongTimeControl,
    /// The two players fall in different rating buckets
    MismatchedRatings,
}

/// Per-record outcome. End of archive is `None` from the stream, an I/O
/// error is `Err`; neither is conflated with a rejected record.
pub enum GameOutcome {
    Accepted(TaggedGame),
    Skipped(SkipReason),
}

pub struct GameVisitor {
    config: ReaderConfig,

    // headers of the current game
    time_control: Option<String>,
    white_elo: Option<u32>,
    black_elo: Option<u32>,

    skip: Option<SkipReason>,
    sans: Vec<SanPlus>,
}

impl GameVisitor {
    pub fn new(config: ReaderConfig) -> Self {
        GameVisitor {
            config,

            time_control: None,
            white_elo: None,
            black_elo: None,

            skip: None,
            sans: Vec::new(),
        }
    }

    fn filter(&self) -> Option<SkipReason> {
        let (Some(time_control), Some(white_elo), Some(black_elo)) =
            (&self.time_control, self.white_elo, self.black_elo)
        else {
            return Some(SkipReason::MissingHeaders);
        };

        if *time_control != self.config.time_control {
            Some(SkipReason::WrongTimeControl)
        } else if white_elo / 100 != black_elo / 100 {
            Some(SkipReason::MismatchedRatings)
        } else {
            None
        }
    }
}

impl Visitor for GameVisitor {
    type Result = GameOutcome;

    fn begin_game(&mut self) {
        self.time_control = None;
        self.white_elo = None;
        self.black_elo = None;
        self.skip = None;
        self.sans.clear();
    }

    fn header(&mut self, key: &[u8], value: RawHeader<'_>) {
        let value = String::from_utf8_lossy(value.as_bytes());

        match key {
            b"TimeControl" => self.time_control = Some(value.to_string()),
            b"WhiteElo" => self.white_elo = value.parse().ok(),
            b"BlackElo" => self.black_elo = value.parse().ok(),
            _ => {}
        }
    }

    fn end_headers(&mut self) -> Skip {
        self.skip = self.filter();
        Skip(self.skip.is_some())
    }

    fn begin_variation(&mut self) -> Skip {
        Skip(true)
    }

    fn san(&mut self, san_plus: SanPlus) {
        self.sans.push(san_plus);
    }

    fn end_game(&mut self) -> Self::Result {
        match self.skip.take() {
            Some(reason) => GameOutcome::Skipped(reason),
            None => GameOutcome::Accepted(TaggedGame {
                // both sides are in the same bucket, checked in end_headers
                bucket: self.white_elo.unwrap_or(0) / 100,
                sans: mem::take(&mut self.sans),
            }),
        }
    }
}

/// Streams games out of a PGN archive one at a time, without loading the
/// whole archive into memory. Malformed movetext is resynchronized past by
/// the underlying reader at the next game boundary.
pub struct GameStream<R> {
    reader: BufferedReader<R>,
    visitor: GameVisitor,
}

impl<R: Read> GameStream<R> {
    pub fn new(read: R, config: ReaderConfig) -> Self {
        GameStream {
            reader: BufferedReader::new(read),
            visitor: GameVisitor::new(config),
        }
    }

    /// `Ok(None)` is a clean end of archive
    pub fn next_game(&mut self) -> io::Result<Option<GameOutcome>> {
        self.reader.read_game(&mut self.visitor)
    }
}
