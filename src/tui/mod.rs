//! Terminal front end: event loop, effect execution and screen setup

pub mod keys;
pub mod testing;

use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tracing::debug;

use crate::config::Config;
use crate::viewer::{
    handle_message, AnchorRequest, DocumentWidget, Effect, StatusLine, ViewerMsg,
    ViewerOptions, ViewerState,
};

const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Rows scrolled per mouse wheel tick
const WHEEL_SCROLL_ROWS: usize = 3;

/// Owns the viewer state and executes the effects its reducer emits.
///
/// Growth effects re-enter the reducer synchronously; timer effects are
/// spawned as tasks that feed messages back through the channel.
pub struct Runtime {
    state: ViewerState,
    msg_tx: mpsc::UnboundedSender<ViewerMsg>,
    msg_rx: mpsc::UnboundedReceiver<ViewerMsg>,
}

impl Runtime {
    pub fn new(state: ViewerState) -> Self {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        Self {
            state,
            msg_tx,
            msg_rx,
        }
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    /// A sender for feeding messages in from outside the event loop
    pub fn sender(&self) -> mpsc::UnboundedSender<ViewerMsg> {
        self.msg_tx.clone()
    }

    pub fn dispatch(&mut self, msg: ViewerMsg) {
        let effect = handle_message(&mut self.state, msg);
        self.execute(effect);
    }

    fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::None => {}
            Effect::Batch(effects) => {
                for e in effects {
                    self.execute(e);
                }
            }
            Effect::GrowWindowTo { target, epoch } => {
                self.dispatch(ViewerMsg::GrowWindowTo { target, epoch });
            }
            Effect::ScheduleCommitWait { epoch, seq } => {
                let tx = self.msg_tx.clone();
                let wait = self.state.options().commit_wait;
                tokio::spawn(async move {
                    tokio::time::sleep(wait).await;
                    let _ = tx.send(ViewerMsg::CommitWaitElapsed { epoch, seq });
                });
            }
            Effect::ScheduleHighlightExpiry { seq, after } => {
                let tx = self.msg_tx.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(after).await;
                    let _ = tx.send(ViewerMsg::HighlightExpired { seq });
                });
            }
        }
    }

    /// Drain queued messages (timer callbacks). Returns how many were handled.
    pub fn process_pending(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.dispatch(msg);
            processed += 1;
        }
        processed
    }

    /// Acknowledge the frame just drawn. Returns true if the viewer consumed
    /// the commit (an anchor may have resolved), meaning a redraw is due.
    pub fn acknowledge_frame(&mut self) -> bool {
        if !self.state.awaiting_commit() {
            return false;
        }
        let epoch = self.state.epoch();
        self.dispatch(ViewerMsg::RenderCommitted { epoch });
        true
    }
}

enum InputMode {
    Normal,
    /// Collecting an element id after ':'
    GotoPrompt(String),
}

pub async fn run(raw: String, config: Config) -> io::Result<()> {
    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, raw, &config).await;
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    raw: String,
    config: &Config,
) -> io::Result<()> {
    let options = ViewerOptions {
        chunk_size: config.chunk_size,
        marker: config.section_marker.clone(),
        proximity_margin: config.proximity_margin,
        commit_wait: Duration::from_millis(config.commit_wait_ms),
    };
    let initial_height = terminal.size()?.height.saturating_sub(1) as usize;
    let mut runtime = Runtime::new(ViewerState::new(options, initial_height));
    runtime.dispatch(ViewerMsg::SetDocument(raw));

    let mut input_mode = InputMode::Normal;

    loop {
        let processed = runtime.process_pending();

        terminal.draw(|frame| {
            let area = frame.area();
            let doc_area = Rect {
                height: area.height.saturating_sub(1),
                ..area
            };
            if runtime.state().viewport().height() != doc_area.height as usize {
                runtime.dispatch(ViewerMsg::SetViewportHeight(doc_area.height as usize));
            }
            let buf = frame.buffer_mut();
            DocumentWidget::new(runtime.state()).render(doc_area, buf, &config.theme);
            if area.height > 0 {
                let status_area = Rect::new(area.x, area.bottom() - 1, area.width, 1);
                let status = StatusLine::new(runtime.state());
                match &input_mode {
                    InputMode::GotoPrompt(id) => {
                        let prompt = format!(":{id}");
                        status.with_message(&prompt).render(status_area, buf);
                    }
                    InputMode::Normal => status.render(status_area, buf),
                }
            }
        })?;

        // A committed frame can resolve a pending anchor; redraw right away
        // so the scroll and highlight show without waiting for input.
        if runtime.acknowledge_frame() || processed > 0 {
            continue;
        }

        if !event::poll(EVENT_POLL_INTERVAL)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) => match &mut input_mode {
                InputMode::Normal => match keys::key_to_action(key) {
                    Some(keys::KeyAction::Quit) => return Ok(()),
                    Some(keys::KeyAction::OpenGotoPrompt) => {
                        input_mode = InputMode::GotoPrompt(String::new());
                    }
                    Some(keys::KeyAction::Msg(msg)) => runtime.dispatch(msg),
                    None => {}
                },
                InputMode::GotoPrompt(buffer) => match key.code {
                    event::KeyCode::Esc => input_mode = InputMode::Normal,
                    event::KeyCode::Enter => {
                        let id = std::mem::take(buffer);
                        input_mode = InputMode::Normal;
                        if !id.is_empty() {
                            debug!(element_id = %id, "goto anchor requested");
                            let request = AnchorRequest::new(id).with_highlight(Some(
                                Duration::from_millis(config.highlight_duration_ms),
                            ));
                            runtime.dispatch(ViewerMsg::ScrollToAnchor(request));
                        }
                    }
                    event::KeyCode::Backspace => {
                        buffer.pop();
                    }
                    event::KeyCode::Char(c) => buffer.push(c),
                    _ => {}
                },
            },
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollUp => {
                    runtime.dispatch(ViewerMsg::ScrollUp(WHEEL_SCROLL_ROWS))
                }
                MouseEventKind::ScrollDown => {
                    runtime.dispatch(ViewerMsg::ScrollDown(WHEEL_SCROLL_ROWS))
                }
                _ => {}
            },
            Event::Resize(_, height) => {
                runtime.dispatch(ViewerMsg::SetViewportHeight(
                    height.saturating_sub(1) as usize,
                ));
            }
            _ => {}
        }
    }
}
