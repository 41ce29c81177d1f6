use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use rand::Rng;
use std::fs::File;
use std::io::{self, Stdout};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

use maze_runner::config::Settings;
use maze_runner::input::KeyHold;
use maze_runner::particles::ParticleField;
use maze_runner::render::{render, Renderer};
use maze_runner::{Dir, GameResult, GameState};

fn main() -> GameResult<()> {
    let settings = Settings::from_env()?;
    init_logging(&settings)?;

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout, &settings);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

/// The terminal owns stdout, so logs only go to a file when one is named.
fn init_logging(settings: &Settings) -> GameResult<()> {
    let Some(path) = &settings.log_path else {
        return Ok(());
    };
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn dir_for(code: KeyCode) -> Option<Dir> {
    match code {
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('w') => Some(Dir::Up),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('s') => Some(Dir::Down),
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('a') => Some(Dir::Left),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('d') => Some(Dir::Right),
        _ => None,
    }
}

fn run(stdout: &mut Stdout, settings: &Settings) -> GameResult<()> {
    let mut rng = rand::thread_rng();
    let seed = settings.seed.unwrap_or_else(|| rng.gen());
    info!(seed, level = settings.start_level, "starting game");

    let mut state = GameState::starting_at(settings.start_level, seed);
    let mut particles = ParticleField::new();
    let mut renderer = Renderer::new();
    let mut keys = KeyHold::new();
    let frame_time = Duration::from_millis(settings.frame_ms);
    let mut level = state.level;

    loop {
        let frame_start = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(key)
                    if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) =>
                {
                    let quit = key.code == KeyCode::Char('q')
                        || key.code == KeyCode::Esc
                        || (key.code == KeyCode::Char('c')
                            && key.modifiers.contains(KeyModifiers::CONTROL));
                    if quit {
                        info!(score = state.score, level = state.level, "quit");
                        return Ok(());
                    }
                    if let Some(dir) = dir_for(key.code) {
                        let now = Instant::now();
                        keys.press(dir, now);
                        state.request_move(keys.held(now));
                    }
                }
                Event::Resize(_, _) => renderer.invalidate(),
                _ => {}
            }
        }

        state.tick();
        if state.level != level {
            level = state.level;
            particles.clear();
            keys.clear();
        }
        for event in state.drain_events() {
            particles.spawn(&event, &mut rng);
        }
        particles.update();
        render(stdout, &state, &particles, &mut renderer)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}
