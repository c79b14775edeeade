//! Terminal lifecycle and the top-level draw loop.

use std::io;
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    widgets::Paragraph,
    Frame, Terminal,
};

use crate::error::{Result, TrawlError};
use crate::shell::{Shell, ShellState};

use super::components::StatusBar;
use super::events::{Event, EventHandler};

/// Tick interval for the event pump.
const TICK_RATE: Duration = Duration::from_millis(100);

/// Run the interactive session until the shell quits.
pub fn run(mut shell: Shell) -> Result<()> {
    enable_raw_mode().map_err(|e| {
        TrawlError::io(
            "Cannot start the shell - no interactive terminal available \
             (use --no-interactive for scripted output)",
            e,
        )
    })?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| TrawlError::io("Failed to enter alternate screen", e))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal =
        Terminal::new(backend).map_err(|e| TrawlError::io("Failed to create terminal", e))?;

    let result = run_loop(&mut terminal, &mut shell);

    // Restore the terminal before reporting anything.
    disable_raw_mode().map_err(|e| TrawlError::io("Failed to disable raw mode", e))?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .map_err(|e| TrawlError::io("Failed to leave alternate screen", e))?;
    terminal
        .show_cursor()
        .map_err(|e| TrawlError::io("Failed to show cursor", e))?;

    if let Some(farewell) = shell.farewell() {
        println!("{farewell}");
    }
    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    shell: &mut Shell,
) -> Result<()> {
    let events = EventHandler::new(TICK_RATE);

    // Seed the session with the real terminal size.
    if let Ok((cols, rows)) = crossterm::terminal::size() {
        shell.handle_event(&Event::Resize(cols, rows));
    }

    loop {
        terminal
            .draw(|f| draw(f, shell))
            .map_err(|e| TrawlError::io("Failed to draw the shell", e))?;

        match events.next() {
            Ok(ev) => shell.handle_event(&ev),
            Err(_) => break,
        }

        if shell.state() == ShellState::Quitting {
            break;
        }
    }
    Ok(())
}

fn draw(f: &mut Frame, shell: &Shell) {
    let areas = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(f.area());

    let text = shell.view(areas[0].height);
    f.render_widget(Paragraph::new(text), areas[0]);

    let state = match shell.state() {
        ShellState::Prompting => "prompt",
        ShellState::Handoff => "interactive",
        ShellState::Quitting => "quitting",
    };
    StatusBar::new(shell.prompt_path(), state, shell.theme()).render(f, areas[1]);
}
