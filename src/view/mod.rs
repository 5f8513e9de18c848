//! Terminal host and rendering (impure shell)

pub mod host;
pub mod sheet;

pub use host::{TerminalHost, SHEET_CHROME_ROWS};
pub use sheet::{truncate_to_width, BottomSheet, GRAB_HANDLE, SCREEN_BACKGROUND};

use crate::animation::{SheetPose, Timeline};
use crate::config::ResolvedConfig;
use crate::gesture::{PointerOutcome, PointerTracker};
use crate::lifecycle::PresentationController;
use crate::model::Frame;
use crate::state::SheetPhase;
use crossterm::{
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
        MouseEventKind,
    },
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Paragraph},
    Terminal,
};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, trace};

/// Poll interval while a transition is running (about 60 fps).
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Poll interval while nothing moves.
const IDLE_INTERVAL: Duration = Duration::from_millis(250);

/// Errors that can occur during TUI operations
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),
}

/// Where the current mouse press started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PressTarget {
    Sheet,
    Backdrop,
}

/// Demo application: one screen, one bottom sheet.
///
/// Generic over backend to support testing with TestBackend
pub struct SheetApp<B>
where
    B: Backend,
{
    terminal: Terminal<B>,
    controller: PresentationController<TerminalHost, Timeline>,
    pointer: PointerTracker,
    press_target: Option<PressTarget>,
    started: Instant,
    use_color: bool,
}

impl SheetApp<CrosstermBackend<Stdout>> {
    /// Create and initialize the application on the real terminal
    ///
    /// Sets up terminal in raw mode with alternate screen and mouse capture
    pub fn new(config: &ResolvedConfig, use_color: bool) -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        stdout.execute(crossterm::event::EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Self::with_terminal(terminal, config, use_color)
    }

    /// Run the event loop until the user quits (q or Ctrl+C)
    ///
    /// Polls at frame rate while the sheet animates and falls back to a slow
    /// idle poll otherwise.
    pub fn run(&mut self) -> Result<(), TuiError> {
        self.draw()?;
        let mut last_frame = Instant::now();

        loop {
            let timeout = if self.is_animating() {
                FRAME_INTERVAL
            } else {
                IDLE_INTERVAL
            };

            let was_animating = self.is_animating();
            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) => {
                        if self.handle_key(key) {
                            return Ok(()); // User quit
                        }
                    }
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    Event::Resize(width, height) => self.handle_resize(width, height),
                    _ => {}
                }
            }

            let now = Instant::now();
            self.advance_frame(was_animating, now.duration_since(last_frame));
            last_frame = now;
            self.draw()?;
        }
    }
}

impl<B> SheetApp<B>
where
    B: Backend,
{
    /// Build the application on an already initialized terminal.
    pub fn with_terminal(
        terminal: Terminal<B>,
        config: &ResolvedConfig,
        use_color: bool,
    ) -> Result<Self, TuiError> {
        let size = terminal.size()?;
        let viewport = Rect::new(0, 0, size.width, size.height);
        let host = TerminalHost::new(viewport, config.items);
        let controller = PresentationController::new(host, Timeline::default())
            .with_config(config.sheet.clone());

        Ok(Self {
            terminal,
            controller,
            pointer: PointerTracker::new(),
            press_target: None,
            started: Instant::now(),
            use_color,
        })
    }

    /// The presentation controller driving the sheet.
    pub fn controller(&self) -> &PresentationController<TerminalHost, Timeline> {
        &self.controller
    }

    /// The terminal being drawn to.
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    /// Phase of the current session, `Hidden` when there is none.
    pub fn phase(&self) -> SheetPhase {
        self.controller.phase()
    }

    /// Presented pose, as currently drawn.
    pub fn pose(&self) -> SheetPose {
        self.controller.animator().pose()
    }

    /// `true` while any transition or dim smoothing is running.
    pub fn is_animating(&self) -> bool {
        self.controller.animator().is_animating()
    }

    /// Handle a key press. Returns `true` when the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }

        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Char(' ') | KeyCode::Char('p') => {
                if self.controller.present().is_ok() {
                    info!("sheet presented");
                }
            }
            KeyCode::Esc => self.controller.request_dismiss(),
            _ => {}
        }
        false
    }

    /// Handle a mouse event using wall-clock time for velocity.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        let at = self.started.elapsed();
        self.handle_mouse_at(mouse, at);
    }

    /// Handle a mouse event that happened `at` after some fixed origin.
    ///
    /// Presses on the sheet become drags; presses on the backdrop that end
    /// as taps dismiss the sheet.
    pub fn handle_mouse_at(&mut self, mouse: MouseEvent, at: Duration) {
        if !self.controller.is_presented() {
            self.pointer.cancel();
            self.press_target = None;
            return;
        }

        let point = self.controller.host().point_at(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let target = if self.sheet_frame().is_some_and(|frame| frame.contains(point)) {
                    PressTarget::Sheet
                } else {
                    PressTarget::Backdrop
                };
                trace!(?point, ?target, "pointer down");
                self.press_target = Some(target);
                self.pointer.press(point, at);
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let samples = self.pointer.moved(point, at);
                if self.press_target == Some(PressTarget::Sheet) {
                    for sample in samples {
                        self.controller.handle_drag(sample);
                    }
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let samples = self.pointer.moved(point, at);
                let outcome = self.pointer.release(point, at);
                let target = self.press_target.take();

                match (target, outcome) {
                    (Some(PressTarget::Sheet), PointerOutcome::Drag(ended)) => {
                        for sample in samples {
                            self.controller.handle_drag(sample);
                        }
                        self.controller.handle_drag(ended);
                    }
                    (Some(PressTarget::Backdrop), PointerOutcome::Tap(_)) => {
                        debug!("backdrop tapped");
                        self.controller.request_dismiss();
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }

    /// Record the new terminal size.
    ///
    /// An active session keeps the resting position it captured when it was
    /// presented; the new size applies from the next presentation.
    pub fn handle_resize(&mut self, width: u16, height: u16) {
        debug!("Handling resize to {}x{}", width, height);
        self.controller
            .host_mut()
            .set_viewport(Rect::new(0, 0, width, height));
    }

    /// Advance animations by `dt` and deliver their completions.
    pub fn tick(&mut self, dt: Duration) {
        let completed = self.controller.animator_mut().advance(dt);
        for id in completed {
            self.controller.animation_completed(id);
        }
    }

    /// Step one frame of the event loop.
    ///
    /// `elapsed` is the wall time since the previous frame. Animations only
    /// consume it if they were already running when the frame began; one
    /// started by input during an idle wait starts from its first frame.
    pub fn advance_frame(&mut self, was_animating: bool, elapsed: Duration) {
        let dt = if was_animating {
            elapsed
        } else {
            Duration::ZERO
        };
        self.tick(dt);
    }

    /// Render the current frame
    pub fn draw(&mut self) -> Result<(), TuiError> {
        let pose = self.pose();
        let phase = self.controller.phase();
        let host = self.controller.host();
        let sheet = self.controller.session().map(|machine| {
            (
                machine.config(),
                host.sheet_rect(pose.offset, machine.content_height()),
            )
        });
        let items = host.items();
        let use_color = self.use_color;

        self.terminal.draw(|frame| {
            let area = frame.area();
            frame.render_widget(screen(phase, use_color), area);
            if let Some((config, rect)) = sheet {
                frame.render_widget(
                    BottomSheet::new(config, rect, pose.dim_alpha)
                        .items(items)
                        .use_color(use_color),
                    area,
                );
            }
        })?;

        Ok(())
    }

    /// Frame of the sheet at its presented offset, in points.
    fn sheet_frame(&self) -> Option<Frame> {
        let machine = self.controller.session()?;
        let container = self.controller.host().container_frame();
        let height = machine.content_height();
        let offset = self.pose().offset;
        Some(Frame::new(
            container.x,
            offset - height / 2.0,
            container.width,
            height,
        ))
    }
}

/// Background screen with key hints and the current phase.
fn screen(phase: SheetPhase, use_color: bool) -> Paragraph<'static> {
    let mut block = Block::default();
    if use_color {
        let (r, g, b) = SCREEN_BACKGROUND;
        block = block.style(Style::default().bg(Color::Rgb(r, g, b)).fg(Color::Gray));
    }

    Paragraph::new(vec![
        Line::from(" bottomsheet"),
        Line::from(""),
        Line::from(" space/p  present the sheet"),
        Line::from(" drag     pull the sheet down"),
        Line::from(" click    backdrop to dismiss"),
        Line::from(" esc      dismiss"),
        Line::from(" q        quit"),
        Line::from(""),
        Line::from(format!(" phase: {:?}", phase)),
    ])
    .block(block)
}

/// Initialize and run the application
///
/// Handles terminal setup, runs the event loop, and ensures cleanup on exit.
///
/// Note: Logging must be initialized by caller before calling this function.
pub fn run(config: &ResolvedConfig, use_color: bool) -> Result<(), TuiError> {
    let mut app = SheetApp::new(config, use_color)?;

    // Run the app and ensure cleanup happens even on error
    let result = app.run();

    // Always restore terminal state
    restore_terminal()?;

    result
}

/// Restore terminal to normal state
///
/// Disables raw mode, mouse capture, and leaves alternate screen
fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(crossterm::event::DisableMouseCapture)?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}
