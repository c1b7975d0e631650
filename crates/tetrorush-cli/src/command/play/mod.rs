use std::path::PathBuf;

use tetrorush_engine::{PieceSeed, SessionConfig};

use crate::{high_score::HighScoreStore, tui::Runtime};

use self::app::PlayApp;

mod app;

const DEFAULT_TICK_RATE: f64 = 60.0;
pub(super) const DEFAULT_HIGH_SCORE_FILE: &str = "./data/highscore.json";

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Game updates per second
    #[clap(long, default_value_t = DEFAULT_TICK_RATE)]
    pub(super) tick_rate: f64,
    /// Piece sequence seed (32 hex digits). Random for every game when omitted
    #[clap(long)]
    pub(super) seed: Option<PieceSeed>,
    /// Path to the high score file
    #[clap(long, default_value = DEFAULT_HIGH_SCORE_FILE)]
    high_score_file: PathBuf,
    /// Hide the landing preview of the falling piece
    #[clap(long)]
    pub(super) no_ghost: bool,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            tick_rate: DEFAULT_TICK_RATE,
            seed: None,
            high_score_file: PathBuf::from(DEFAULT_HIGH_SCORE_FILE),
            no_ghost: false,
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        tick_rate,
        seed,
        high_score_file,
        no_ghost,
    } = arg;

    anyhow::ensure!(
        tick_rate.is_finite() && *tick_rate > 0.0,
        "tick rate must be a positive number: {tick_rate}"
    );

    let store = HighScoreStore::load(high_score_file)?;
    let config = SessionConfig {
        seed: *seed,
        ..SessionConfig::default()
    };

    let mut app = PlayApp::new(config, store, *tick_rate).show_ghost(!*no_ghost);
    Runtime::new().run(&mut app)?;
    app.into_result()
}
