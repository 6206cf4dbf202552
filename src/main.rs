//! Terminal cubetris runner (default binary).
//!
//! Board size and seed come from `CUBETRIS_*` environment variables (see
//! `BoardConfig::from_env`). Set `CUBETRIS_LOG=<file>` to write `tracing`
//! output there, filtered by `RUST_LOG`.

use std::fs::File;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cubetris::core::{BoardConfig, BoardController, BoardSnapshot};
use cubetris::input::{handle_key_event, should_pause, should_quit, InputHandler};
use cubetris::term::{BoardView, EventFeed, FrameBuffer, TerminalRenderer, Viewport};
use cubetris::types::{BoardCommand, BoardEvent, TICK_MS};

const ENV_LOG: &str = "CUBETRIS_LOG";

fn main() -> Result<()> {
    init_logging()?;

    let config = BoardConfig::from_env().context("invalid board configuration")?;
    let mut board = BoardController::new(config)?;
    info!(
        side_width = board.dims().side_width(),
        board_height = board.dims().board_height(),
        seed = board.config().seed,
        "starting board"
    );

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut board);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn init_logging() -> Result<()> {
    let Some(path) = std::env::var_os(ENV_LOG) else {
        return Ok(());
    };
    let file = File::create(&path).with_context(|| format!("cannot create log file {path:?}"))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,cubetris_core=debug")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run(term: &mut TerminalRenderer, board: &mut BoardController) -> Result<()> {
    board.start();

    let view = BoardView::default();
    let mut input = InputHandler::new();
    let mut fb = FrameBuffer::new(0, 0);
    let mut snap = BoardSnapshot::default();
    let mut feed = EventFeed::new();
    let mut events: Vec<BoardEvent> = Vec::with_capacity(64);
    let mut paused = false;

    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(TICK_MS as u64);

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        board.snapshot_into(&mut snap);
        view.render_into(&snap, &feed, paused, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => match key.kind {
                    KeyEventKind::Press => {
                        if should_quit(key) {
                            info!("quit requested");
                            return Ok(());
                        }
                        if should_pause(key) {
                            paused = !paused;
                            if input.is_hurrying() {
                                board.apply_command(BoardCommand::Ease);
                            }
                            input.reset();
                            continue;
                        }
                        if paused {
                            continue;
                        }

                        if let Some(command) = input.handle_key_press(key.code) {
                            board.apply_command(command);
                        }
                        match handle_key_event(key) {
                            // Held keys go through the input handler above.
                            Some(BoardCommand::MoveLeft | BoardCommand::MoveRight | BoardCommand::Hurry)
                            | None => {}
                            Some(command) => {
                                board.apply_command(command);
                            }
                        }
                    }
                    KeyEventKind::Repeat => {
                        // Terminal auto-repeat is replaced by DAS/ARR.
                    }
                    KeyEventKind::Release => {
                        if let Some(command) = input.handle_key_release(key.code) {
                            board.apply_command(command);
                        }
                    }
                },
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            if paused {
                continue;
            }

            for command in input.update(TICK_MS) {
                board.apply_command(command);
            }
            board.update(TICK_MS);

            board.drain_events_into(&mut events);
            feed.extend(&events);
            events.clear();
        }
    }
}
