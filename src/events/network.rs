use crate::state::State;
use crate::wizard::{Assembler, Consent};
use anyhow::Result;
use log::*;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Specify different network event types.
///
#[derive(Debug, Clone)]
pub enum Event {
    SubmitEnrollment { consent: Consent },
}

/// Specify struct for managing state with network events.
///
pub struct Handler<'a> {
    state: &'a Arc<Mutex<State>>,
    assembler: &'a Assembler,
}

impl<'a> Handler<'a> {
    /// Return new instance with reference to state.
    ///
    pub fn new(state: &'a Arc<Mutex<State>>, assembler: &'a Assembler) -> Self {
        Handler { state, assembler }
    }

    /// Handle network events by type.
    ///
    pub async fn handle(&mut self, event: Event) -> Result<()> {
        debug!("Processing network event '{:?}'...", event);
        match event {
            Event::SubmitEnrollment { consent } => self.submit_enrollment(consent).await?,
        }
        Ok(())
    }

    /// Send the stored enrollment and report the outcome back to state. The
    /// state lock is not held while requests are in flight, so the interface
    /// keeps rendering the spinner.
    ///
    async fn submit_enrollment(&mut self, consent: Consent) -> Result<()> {
        let mut store = {
            let state = self.state.lock().await;
            state.submission_store()
        };
        let result = self.assembler.submit(&mut store, consent).await;
        if let Err(e) = &result {
            error!("Enrollment submission failed: {}", e);
        }
        let mut state = self.state.lock().await;
        state.finish_submission(result);
        Ok(())
    }
}
