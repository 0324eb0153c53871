use crate::api::Api;
use crate::config::Config;
use crate::error::AppError;
use crate::events::network::{Event as NetworkEvent, Handler as NetworkEventHandler};
use crate::events::terminal::Handler as TerminalEventHandler;
use crate::logger::{CustomLogger, LogBuffer};
use crate::state::State;
use crate::wizard::Assembler;
use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::*;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io::{self, stdout};
use std::sync::Arc;
use tokio::sync::Mutex;

pub type NetworkEventSender = std::sync::mpsc::Sender<NetworkEvent>;
type NetworkEventReceiver = std::sync::mpsc::Receiver<NetworkEvent>;

/// Oversees event processing, state management, and terminal output.
///
pub struct App {
    state: Arc<Mutex<State>>,
    config: Config,
}

impl App {
    /// Start a new application according to the given configuration. Returns
    /// the result of the application execution.
    ///
    pub async fn start(config: Config) -> Result<()> {
        let logs = LogBuffer::default();
        CustomLogger::new(config.level_filter()?).install(logs.clone())?;

        info!("Starting application...");
        debug!("Using API at {}.", config.api_base_url);
        let (tx, rx) = std::sync::mpsc::channel::<NetworkEvent>();
        let mut app = App {
            state: Arc::new(Mutex::new(State::new(tx, &config, logs))),
            config,
        };
        app.start_network(rx)?;
        app.start_ui().await?;

        info!("Exiting application...");
        Ok(())
    }

    /// Start a separate thread for asynchronous state mutations.
    ///
    fn start_network(&self, net_receiver: NetworkEventReceiver) -> Result<()> {
        debug!("Creating new thread for asynchronous networking...");
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|e| AppError::RuntimeCreation(e.to_string()))?;
        let cloned_state = Arc::clone(&self.state);
        let api = Api::new(&self.config.api_base_url, self.config.request_timeout());
        let assembler = Assembler::new(api, self.config.require_consent);
        std::thread::spawn(move || {
            runtime.block_on(async {
                let mut network_event_handler =
                    NetworkEventHandler::new(&cloned_state, &assembler);
                while let Ok(network_event) = net_receiver.recv() {
                    match network_event_handler.handle(network_event).await {
                        Ok(_) => (),
                        Err(e) => error!("Failed to handle network event: {}", e),
                    }
                }
            })
        });
        Ok(())
    }

    /// Begin the terminal event poll on a separate thread before starting the
    /// render loop on the main thread. Return the result following an exit
    /// request or unrecoverable error.
    ///
    async fn start_ui(&mut self) -> Result<()> {
        debug!("Starting user interface on main thread...");
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        enable_raw_mode()?;

        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        terminal.hide_cursor()?;

        let result = self.run_loop(&mut terminal).await;

        disable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, LeaveAlternateScreen, DisableMouseCapture)?;
        terminal.show_cursor()?;

        result
    }

    async fn run_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let terminal_event_handler = TerminalEventHandler::new();
        loop {
            let mut state = self.state.lock().await;
            if let Ok(size) = terminal.size() {
                state.set_terminal_size(size);
            };
            terminal.draw(|frame| crate::ui::render(frame, &mut state))?;
            if !terminal_event_handler.handle_next(&mut state)? {
                debug!("Received application exit request.");
                break;
            }
        }
        Ok(())
    }
}
