use std::io;
use std::io::IsTerminal;

use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use treeline::app::App;
use treeline::config::ConfigStore;
use treeline::event_loop::run_app;
use treeline::logging;

fn main() -> Result<()> {
    if !io::stdin().is_terminal() {
        anyhow::bail!("treeline must be run in an interactive terminal");
    }

    let store = ConfigStore::open_default().context("Failed to locate config directory")?;
    logging::init(&store.log_path());
    let config = store.load().context("Failed to load configuration")?;

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode - are you in a terminal?")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let mut app = App::new(store, config);
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal (always try to restore even on error)
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    result
}
