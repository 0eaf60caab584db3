//! Terminal diagnostics lens
//!
//! Opens files in a language server and shows the lens panel for the active one: an indicator
//! face per severity and the error/warning counts.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p diag-lens-tui -- src/main.rs src/lib.rs
//! ```
//!
//! # LSP
//!
//! `rust-analyzer` is used by default. Any stdio server works:
//!
//! ```bash
//! DIAG_LENS_LSP_CMD=pylsp DIAG_LENS_LSP_LANGUAGE_ID=python cargo run -p diag-lens-tui -- foo.py
//! ```
//!
//! If the server cannot be started the panel still runs, showing zero counts.
//!
//! # Logging
//!
//! `DIAG_LENS_LOG=/tmp/lens.log RUST_LOG=debug` writes logs to a file.
//!
//! # Keys
//!
//! - Tab: next file
//! - e / d: enable / disable the lens
//! - s: send `didSave` for the active file
//! - q / Esc: quit

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use diag_lens::{
    DocumentUri, LensEvent, LensHost, PanelRenderer, PanelView, PresentationDriver, VisualTier,
};
use diag_lens_lsp::{LspLensHost, LspLensSession, LspLensSessionOptions};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};
use std::{
    env, fs,
    io::{self, stdout},
    path::{Path, PathBuf},
    process::{self, Command as ProcessCommand, Stdio},
    sync::mpsc,
    time::Duration,
};

/// Keeps the last rendered view for drawing.
#[derive(Debug, Default)]
struct PanelState {
    view: PanelView,
    renders: u64,
}

impl PanelRenderer for PanelState {
    fn render(&mut self, view: &PanelView) {
        self.view = *view;
        self.renders += 1;
    }
}

fn tier_face(tier: VisualTier) -> &'static str {
    match tier {
        VisualTier::Resting => "(^_^)",
        VisualTier::Uneasy => "(-_-)",
        VisualTier::Distressed => "(>_<)",
        VisualTier::Critical => "(x_x)",
    }
}

fn tier_color(tier: VisualTier) -> Color {
    match tier {
        VisualTier::Resting => Color::Green,
        VisualTier::Uneasy => Color::Yellow,
        VisualTier::Distressed => Color::LightRed,
        VisualTier::Critical => Color::Red,
    }
}

fn guess_lsp_language_id(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "rs" => "rust",
        "toml" => "toml",
        "json" => "json",
        "py" => "python",
        "js" => "javascript",
        "ts" => "typescript",
        "go" => "go",
        "c" | "h" => "c",
        "cc" | "cpp" | "cxx" | "hpp" => "cpp",
        _ => "plaintext",
    }
}

fn init_logging() {
    let Some(path) = env::var_os("DIAG_LENS_LOG") else {
        return;
    };
    match fs::File::create(&path) {
        Ok(file) => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off"))
                .target(env_logger::Target::Pipe(Box::new(file)))
                .init();
        }
        Err(err) => eprintln!("cannot open log file {}: {err}", PathBuf::from(path).display()),
    }
}

struct App {
    driver: PresentationDriver<LspLensHost, PanelState>,
    session: Option<LspLensSession>,
    events: mpsc::Receiver<LensEvent>,
    should_quit: bool,
    status_message: String,
}

impl App {
    fn new(files: &[PathBuf]) -> io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        let mut driver = PresentationDriver::new(LspLensHost::new(), PanelState::default());
        driver.attach_panel();
        driver.start_refresh(tx).map_err(io::Error::other)?;

        let mut app = Self {
            driver,
            session: None,
            events: rx,
            should_quit: false,
            status_message: String::new(),
        };
        app.start_lsp(files);

        for path in files {
            app.open_file(path)?;
        }
        Ok(app)
    }

    fn start_lsp(&mut self, files: &[PathBuf]) {
        let cmd_name = env::var("DIAG_LENS_LSP_CMD")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "rust-analyzer".to_string());

        let mut parts = cmd_name.split_whitespace();
        let Some(program) = parts.next() else {
            return;
        };
        let mut cmd = ProcessCommand::new(program);
        cmd.args(parts);
        cmd.stderr(Stdio::null());

        let root = env::current_dir()
            .ok()
            .or_else(|| files.first().and_then(|f| f.parent()).map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."));

        match LspLensSession::start(LspLensSessionOptions::new(cmd, &root)) {
            Ok(session) => {
                self.session = Some(session);
                self.status_message = format!("connected: {cmd_name}");
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                self.status_message = format!("LSP server not found: {program} (counts stay 0)");
            }
            Err(err) => {
                self.status_message = format!("LSP start failed: {err}");
            }
        }
    }

    fn open_file(&mut self, path: &Path) -> io::Result<()> {
        let text = fs::read_to_string(path)?;
        let uri = DocumentUri::from_path(path);
        let language_id = env::var("DIAG_LENS_LSP_LANGUAGE_ID")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| guess_lsp_language_id(path).to_string());

        let event = match self.session.as_mut() {
            Some(session) => {
                session.open_document(self.driver.host_mut(), uri, &language_id, &text)?
            }
            None => self.driver.host_mut().store_mut().open(uri),
        };
        self.driver.handle(event);
        Ok(())
    }

    fn poll_lsp(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match session.poll(self.driver.host_mut()) {
            Ok(events) => {
                for event in events {
                    self.driver.handle(event);
                }
            }
            Err(err) => {
                log::warn!("language server connection lost: {err}");
                self.status_message = format!("LSP disconnected: {err}");
                self.session = None;
            }
        }
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.driver.handle(event);
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => {
                if let Some(event) = self.driver.host_mut().store_mut().cycle_active() {
                    self.driver.handle(event);
                }
            }
            KeyCode::Char('e') => {
                self.driver.handle(LensEvent::Enable);
                self.status_message = "lens enabled".to_string();
            }
            KeyCode::Char('d') => {
                self.driver.handle(LensEvent::Disable);
                self.status_message = "lens disabled".to_string();
            }
            KeyCode::Char('s') => self.save_active(),
            _ => {}
        }
    }

    fn save_active(&mut self) {
        let Some(uri) = self.driver.host().active_document() else {
            return;
        };
        let Some(session) = self.session.as_mut() else {
            self.status_message = "no language server".to_string();
            return;
        };
        self.status_message = match session.save_document(&uri) {
            Ok(()) => format!("didSave: {uri}"),
            Err(err) => format!("didSave failed: {err}"),
        };
    }

    fn render(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),
                Constraint::Length(6),
                Constraint::Length(1),
            ])
            .split(f.area());

        self.render_files(f, chunks[0]);
        self.render_panel(f, chunks[1]);

        let status = Paragraph::new(format!(
            " {} | Tab: next  e/d: enable/disable  s: save  q: quit",
            self.status_message
        ))
        .style(Style::default().fg(Color::Black).bg(Color::Gray));
        f.render_widget(status, chunks[2]);
    }

    fn render_files(&self, f: &mut Frame, area: ratatui::layout::Rect) {
        let store = self.driver.host().store();
        let active = store.active_document();
        let items: Vec<ListItem> = store
            .open_documents()
            .iter()
            .map(|uri| {
                let label = uri
                    .to_file_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| uri.to_string());
                let count = store.diagnostics(uri).len();
                let style = if active.as_ref() == Some(uri) {
                    Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else {
                    Style::default()
                };
                ListItem::new(format!("{label}  [{count}]")).style(style)
            })
            .collect();

        let list = List::new(items).block(Block::default().borders(Borders::ALL).title(" Files "));
        f.render_widget(list, area);
    }

    fn render_panel(&self, f: &mut Frame, area: ratatui::layout::Rect) {
        let panel = &self.driver.renderer().view;
        let title = if panel.enabled {
            " Diagnostics "
        } else {
            " Diagnostics (disabled) "
        };

        let face = |tier: VisualTier| {
            Span::styled(
                format!(" {} ", tier_face(tier)),
                Style::default()
                    .fg(tier_color(tier))
                    .add_modifier(Modifier::BOLD),
            )
        };

        let lines = vec![
            Line::from(vec![
                face(panel.error_tier),
                Span::raw(panel.error_label()),
            ]),
            Line::from(vec![
                face(panel.warning_tier),
                Span::raw(panel.warning_label()),
            ]),
            Line::from(Span::styled(
                format!(" renders: {}", self.driver.renderer().renders),
                Style::default().fg(Color::DarkGray),
            )),
        ];

        let block = Block::default().borders(Borders::ALL).title(title);
        f.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn shutdown(&mut self) {
        self.driver.stop_refresh();
        if let Some(session) = self.session.take()
            && let Err(err) = session.shutdown(Duration::from_secs(2))
        {
            log::warn!("language server shutdown failed: {err}");
        }
    }
}

/// Files named on the command line, or the usage line if there are none.
fn file_args(args: &[String]) -> Result<Vec<PathBuf>, String> {
    let program = args.first().map_or("diag-lens-tui", String::as_str);
    match args.get(1..) {
        Some(files) if !files.is_empty() => Ok(files.iter().map(PathBuf::from).collect()),
        _ => Err(format!("usage: {program} <file>...")),
    }
}

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();
    let files = match file_args(&args) {
        Ok(files) => files,
        Err(usage) => {
            eprintln!("{usage}");
            process::exit(1);
        }
    };
    init_logging();

    let mut app = App::new(&files)?;

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    app.shutdown();

    if let Err(err) = result {
        eprintln!("error: {}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        app.poll_lsp();
        app.drain_events();
        terminal.draw(|f| app.render(f))?;

        if app.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
        {
            app.handle_key_event(key);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_args() {
        let args = vec!["lens".to_string(), "a.rs".to_string(), "b.rs".to_string()];
        assert_eq!(
            file_args(&args),
            Ok(vec![PathBuf::from("a.rs"), PathBuf::from("b.rs")])
        );
        assert_eq!(
            file_args(&args[..1]),
            Err("usage: lens <file>...".to_string())
        );
    }

    #[test]
    fn test_file_args_without_argv0() {
        assert_eq!(
            file_args(&[]),
            Err("usage: diag-lens-tui <file>...".to_string())
        );
    }
}
