mod app;
mod render;
mod theme;

use app::{App, AppAction};
use clap::{Parser, ValueEnum};
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, Write};
use std::time::{Duration, Instant};
use treebuild_core::{Difficulty, SessionState};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DifficultyArg {
    Easy,
    Medium,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Medium => Difficulty::Medium,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ThemeArg {
    Dark,
    Light,
}

#[derive(Parser)]
#[command(name = "treebuild", version, about = "Rebuild a scrambled binary search tree")]
struct Args {
    /// Start immediately at this difficulty, skipping the menu
    #[arg(short, long, value_enum)]
    difficulty: Option<DifficultyArg>,

    /// Fixed generation seed, for reproducible puzzles
    #[arg(short, long)]
    seed: Option<u64>,

    /// Color theme
    #[arg(short, long, value_enum, default_value = "dark")]
    theme: ThemeArg,
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    // Engine logging goes to stderr, opt-in via RUST_LOG (redirect 2> to
    // keep the alternate screen clean)
    if let Ok(filter) = tracing_subscriber::EnvFilter::try_from_default_env() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Run the app
    let result = run_app(&mut stdout, args);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout, LeaveAlternateScreen)?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

fn run_app(stdout: &mut io::Stdout, args: Args) -> io::Result<()> {
    let mut app = App::new(
        args.difficulty.map(Into::into),
        args.seed,
        matches!(args.theme, ThemeArg::Dark),
    );
    let mut last_tick = Instant::now();

    loop {
        // The win screen animates; everything else just keeps the clock fresh
        let tick_rate = if app.session.state() == SessionState::Won {
            Duration::from_millis(50)
        } else {
            Duration::from_millis(200)
        };

        render::render(stdout, &app)?;
        stdout.flush()?;

        // Handle input with timeout so ticks keep firing
        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                // Handle Ctrl+C
                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                    break;
                }

                match app.handle_key(key) {
                    AppAction::Continue => {}
                    AppAction::Quit => break,
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}
