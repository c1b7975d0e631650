mod command;
mod high_score;
mod tui;
mod util;
mod view;

fn main() -> anyhow::Result<()> {
    command::run()
}
