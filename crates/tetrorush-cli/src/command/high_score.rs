use std::path::PathBuf;

use crate::high_score::HighScoreStore;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct HighScoreArg {
    /// Path to the high score file
    #[clap(long, default_value = super::play::DEFAULT_HIGH_SCORE_FILE)]
    high_score_file: PathBuf,
    /// Clear the stored high score
    #[clap(long)]
    reset: bool,
}

pub(crate) fn run(arg: &HighScoreArg) -> anyhow::Result<()> {
    let HighScoreArg {
        high_score_file,
        reset,
    } = arg;

    let mut store = HighScoreStore::load(high_score_file)?;
    if *reset {
        store.reset()?;
        eprintln!("High score reset: {}", store.path().display());
        return Ok(());
    }

    let record = store.record();
    match record.achieved_at {
        Some(achieved_at) => println!(
            "{} (achieved at {})",
            record.score,
            achieved_at.format("%Y-%m-%d %H:%M:%S UTC")
        ),
        None => println!("{}", record.score),
    }
    Ok(())
}
