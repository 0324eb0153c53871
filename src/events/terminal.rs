use crate::state::{State, View};
use crate::wizard::Screen;
use anyhow::Result;
use crossterm::{
    event,
    event::{Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
};
use log::*;
use std::{
    sync::mpsc,
    thread,
    time::{Duration, Instant},
};

/// Specify terminal event poll rate in milliseconds.
///
const TICK_RATE_IN_MS: u64 = 60;

/// Specify different terminal event types.
///
#[derive(Debug)]
pub enum Event<I> {
    Input(I),
    Tick,
}

/// Specify struct for managing terminal events channel.
///
pub struct Handler {
    rx: mpsc::Receiver<Event<KeyEvent>>,
    _tx: mpsc::Sender<Event<KeyEvent>>,
}

impl Handler {
    /// Return new instance after spawning new input polling thread. The
    /// thread stops once the receiving side is dropped.
    ///
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let tx_clone = tx.clone();
        thread::spawn(move || loop {
            let tick_rate = Duration::from_millis(TICK_RATE_IN_MS);
            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                        if tx_clone.send(Event::Input(key)).is_err() {
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(e) => warn!("Failed to read terminal event: {}", e),
                },
                Ok(false) => {}
                Err(e) => warn!("Failed to poll terminal events: {}", e),
            }
            if tx_clone.send(Event::Tick).is_err() {
                break;
            }
        });
        Handler { rx, _tx: tx }
    }

    /// Receive next terminal event and handle it accordingly. Returns result
    /// with value true if should continue or false if exit was requested.
    ///
    pub fn handle_next(&self, state: &mut State) -> Result<bool> {
        match self.rx.recv()? {
            Event::Input(event) => Ok(handle_key(state, event, Instant::now())),
            Event::Tick => {
                state.tick(Instant::now());
                Ok(true)
            }
        }
    }
}

impl Default for Handler {
    fn default() -> Self {
        Handler::new()
    }
}

/// Apply one key press to state. Returns false if exit was requested.
///
pub fn handle_key(state: &mut State, event: KeyEvent, now: Instant) -> bool {
    let KeyEvent {
        code, modifiers, ..
    } = event;

    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        debug!("Processing exit terminal event '{:?}'...", event);
        return false;
    }

    if state.has_dialog() {
        match code {
            KeyCode::Enter | KeyCode::Char('y') => state.confirm_dialog(),
            KeyCode::Esc | KeyCode::Char('n') => state.dismiss_dialog(),
            _ => {}
        }
        return true;
    }

    if state.current_view() == View::ChangeRequest {
        match code {
            KeyCode::Esc => state.close_change_request(),
            KeyCode::Enter if modifiers.contains(KeyModifiers::ALT) => {
                state.change_request_char('\n')
            }
            KeyCode::Enter => state.submit_change_request(),
            KeyCode::Backspace => state.change_request_backspace(),
            KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
                state.change_request_char(c)
            }
            _ => {}
        }
        return true;
    }

    match state.current_screen() {
        Screen::Home => match code {
            KeyCode::Enter | KeyCode::Char('n') => state.start_enrollment(),
            KeyCode::Char('s') => state.open_change_request(),
            KeyCode::Char('t') => state.show_terms(),
            KeyCode::Char('q') => {
                debug!("Received quit request from home screen.");
                return false;
            }
            _ => {}
        },
        Screen::Completed => match code {
            KeyCode::Enter | KeyCode::Esc => state.go_home(),
            KeyCode::Char('d') => state.show_documents_link(),
            _ => {}
        },
        _ if state.is_submitting() => {}
        _ => handle_step_key(state, code, modifiers, now),
    }
    true
}

fn handle_step_key(state: &mut State, code: KeyCode, modifiers: KeyModifiers, now: Instant) {
    if modifiers.contains(KeyModifiers::CONTROL) {
        match code {
            KeyCode::Char('e') => state.show_documents_link(),
            KeyCode::Char('t') => state.show_terms(),
            _ => {}
        }
        return;
    }
    match code {
        KeyCode::Tab | KeyCode::Down => {
            state.next_focus();
        }
        KeyCode::BackTab | KeyCode::Up => {
            state.previous_focus();
        }
        KeyCode::Right => state.cycle_choice(true, now),
        KeyCode::Left => state.cycle_choice(false, now),
        KeyCode::Enter => state.submit_step(),
        KeyCode::Esc => state.back(),
        KeyCode::Backspace => state.backspace(now),
        KeyCode::Char(c) => state.input_char(c, now),
        _ => {}
    }
}
