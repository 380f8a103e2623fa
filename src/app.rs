//! Terminal application — the session loop, HUD overlay, and teardown.
//!
//! Owns the terminal for the duration of one session: raw mode and the
//! alternate screen are entered on start and restored on every exit path.
//! The loop polls key events with a short timeout, advances the one-second
//! ticker, steps pending catalog loads, and redraws.

use std::io::{self, Write};
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{cursor, event, execute, queue, style, terminal};
use rand::{SeedableRng, rngs::StdRng};

use crate::catalog::{CatalogLoader, EnemyCatalog, FsSource};
use crate::input;
use crate::session::{Outcome, Session, Snapshot};
use crate::sink::PatternSink;
use crate::ticker::Ticker;

/// Rows reserved above the backdrop for the HUD.
const HUD_ROWS: u16 = 3;
const FRAME_TIME: Duration = Duration::from_millis(50);

pub struct App {
    session: Session<PatternSink>,
    loader: CatalogLoader<FsSource>,
    ticker: Ticker,
    hud_visible: bool,
}

impl App {
    pub fn new(data_dir: &Path, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        App {
            session: Session::new(EnemyCatalog::new(), PatternSink::new(), rng),
            loader: CatalogLoader::new(FsSource::new(data_dir)),
            ticker: Ticker::new(0, Instant::now()),
            hud_visible: true,
        }
    }

    /// Run the session until quit. Restores the terminal on exit, even on
    /// error.
    pub fn run(&mut self) -> Result<()> {
        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All),
        )?;

        let result = self.run_loop(&mut stdout);

        let _ = execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();

        result
    }

    fn run_loop(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        // Tick 0 happens at startup: first load attempt, first refresh.
        self.loader.step(0, self.session.catalog_mut());
        self.session.on_tick(0);

        loop {
            if event::poll(FRAME_TIME)? {
                match event::read()? {
                    event::Event::Key(key) if key.kind == event::KeyEventKind::Press => {
                        if let Some(action) = input::map_key(key.code) {
                            let tick = self.ticker.current();
                            match self.session.apply(action, tick) {
                                Outcome::Continue => {}
                                Outcome::ToggleHud => {
                                    self.hud_visible = !self.hud_visible;
                                    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
                                }
                                Outcome::Quit => break,
                            }
                        }
                    }
                    event::Event::Resize(_, _) => {
                        execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
                    }
                    _ => {}
                }
            }

            if let Some(tick) = self.ticker.poll(Instant::now()) {
                self.loader.step(tick, self.session.catalog_mut());
                self.session.on_tick(tick);
            }

            self.draw(stdout)?;
        }

        Ok(())
    }

    fn draw(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        let (width, height) = terminal::size()?;
        let top = if self.hud_visible { HUD_ROWS } else { 0 };
        self.session
            .sink_mut()
            .draw(stdout, width, height.saturating_sub(top), top)?;

        if self.hud_visible {
            let tick = self.ticker.current();
            let snapshot = self.session.snapshot(tick);
            self.render_hud(stdout, width, &snapshot, tick)?;
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // HUD
    // -----------------------------------------------------------------------

    fn render_hud(
        &self,
        stdout: &mut io::Stdout,
        width: u16,
        snapshot: &Snapshot,
        tick: u64,
    ) -> Result<()> {
        let cycle = match snapshot.countdown {
            Some(countdown) => format!(
                "({} % {})  next in {}s",
                tick, snapshot.refresh_seconds, countdown
            ),
            None => "(refresh suspended)".to_string(),
        };
        let state_line = format!(" [{}, {}]  {}", snapshot.layer1, snapshot.layer2, cycle);

        let data_line = if let Some(error) = &snapshot.catalog_error {
            format!(" catalog error: {error}")
        } else if !snapshot.catalog_ready {
            " catalog: loading...".to_string()
        } else if snapshot.enemies.is_empty() {
            " enemies: (none for this pair)".to_string()
        } else {
            format!(" enemies: {}", snapshot.enemies.join(", "))
        };

        print_hud_line(stdout, 0, width, &state_line, style::Attribute::Bold)?;
        print_hud_line(stdout, 1, width, &data_line, style::Attribute::Reset)?;

        queue!(
            stdout,
            cursor::MoveTo(0, 2),
            terminal::Clear(terminal::ClearType::CurrentLine),
            style::Print(" "),
        )?;
        let items: &[&str] = &[
            "[Space] random",
            "[0] zero",
            "[1][2] one layer",
            "[+][-][=] refresh",
            "[arrows] shift",
            "[Esc] hud",
            "[q] quit",
        ];
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                queue!(stdout, style::Print("  "))?;
            }
            print_menu_item(stdout, item)?;
        }
        stdout.flush()?;
        Ok(())
    }
}

fn print_hud_line(
    stdout: &mut io::Stdout,
    row: u16,
    width: u16,
    text: &str,
    attr: style::Attribute,
) -> Result<()> {
    let line: String = text.chars().take(width as usize).collect();
    queue!(
        stdout,
        cursor::MoveTo(0, row),
        terminal::Clear(terminal::ClearType::CurrentLine),
        style::SetAttribute(attr),
        style::Print(line),
        style::SetAttribute(style::Attribute::Reset),
    )?;
    Ok(())
}

/// Print a menu item, bolding the `[key]` part and dimming the rest.
fn print_menu_item(stdout: &mut io::Stdout, item: &str) -> Result<()> {
    let keys_end = item.rfind(']').map_or(0, |i| i + 1);
    queue!(
        stdout,
        style::SetAttribute(style::Attribute::Bold),
        style::Print(&item[..keys_end]),
        style::SetAttribute(style::Attribute::Reset),
        style::SetAttribute(style::Attribute::Dim),
        style::Print(&item[keys_end..]),
        style::SetAttribute(style::Attribute::Reset),
    )?;
    Ok(())
}
