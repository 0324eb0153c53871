use super::dialog::Dialog;
use super::navigation::{Focusable, View};
use crate::app::NetworkEventSender;
use crate::config::Config;
use crate::contact;
use crate::events::network::Event as NetworkEvent;
use crate::logger::LogBuffer;
use crate::ui::{Theme, SPINNER_FRAME_COUNT};
use crate::wizard::{mask, Consent, Receipt, Screen, StepOutcome, SubmissionError, Wizard, WizardStore};
use log::*;
use ratatui::layout::Rect;
use std::time::Instant;

const SUCCESS_MESSAGE: &str = "Cadastro completo realizado!";

/// Houses data representative of application state.
///
pub struct State {
    net_sender: Option<NetworkEventSender>,
    wizard: Wizard,
    view: View,
    cursor: usize,
    dialog: Option<Dialog>,
    submitting: bool,
    logs: LogBuffer,
    contact_email: String,
    terms_url: String,
    require_consent: bool,
    change_request: String,
    terminal_size: Rect,
    spinner_index: usize,
    theme: Theme,
}

/// Defines default application state.
///
impl Default for State {
    fn default() -> State {
        let config = Config::default();
        State {
            net_sender: None,
            wizard: Wizard::new(config.debounce()),
            view: View::Wizard,
            cursor: 0,
            dialog: None,
            submitting: false,
            logs: LogBuffer::default(),
            contact_email: config.contact_email,
            terms_url: config.terms_url,
            require_consent: config.require_consent,
            change_request: String::new(),
            terminal_size: Rect::default(),
            spinner_index: 0,
            theme: Theme::default(),
        }
    }
}

impl State {
    /// Return new state wired to the network thread.
    ///
    pub fn new(net_sender: NetworkEventSender, config: &Config, logs: LogBuffer) -> Self {
        State {
            net_sender: Some(net_sender),
            wizard: Wizard::new(config.debounce()),
            logs,
            contact_email: config.contact_email.clone(),
            terms_url: config.terms_url.clone(),
            require_consent: config.require_consent,
            ..State::default()
        }
    }

    pub fn get_wizard(&self) -> &Wizard {
        &self.wizard
    }

    pub fn get_wizard_mut(&mut self) -> &mut Wizard {
        &mut self.wizard
    }

    pub fn current_view(&self) -> View {
        self.view
    }

    pub fn current_screen(&self) -> Screen {
        self.wizard.screen()
    }

    pub fn get_dialog(&self) -> Option<&Dialog> {
        self.dialog.as_ref()
    }

    pub fn has_dialog(&self) -> bool {
        self.dialog.is_some()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn get_logs(&self) -> &LogBuffer {
        &self.logs
    }

    pub fn get_change_request(&self) -> &str {
        &self.change_request
    }

    pub fn get_theme(&self) -> &Theme {
        &self.theme
    }

    /// Update the terminal size.
    ///
    pub fn set_terminal_size(&mut self, size: Rect) -> &mut Self {
        self.terminal_size = size;
        self
    }

    pub fn get_terminal_size(&self) -> &Rect {
        &self.terminal_size
    }

    /// Advance the spinner index.
    ///
    pub fn advance_spinner_index(&mut self) -> &mut Self {
        self.spinner_index += 1;
        if self.spinner_index >= SPINNER_FRAME_COUNT {
            self.spinner_index = 0;
        }
        self
    }

    /// Return the current spinner index.
    ///
    pub fn get_spinner_index(&self) -> &usize {
        &self.spinner_index
    }

    /// Things that can hold focus on the current step, in display order.
    ///
    pub fn focusables(&self) -> Vec<Focusable> {
        let Some(form) = self.wizard.form() else {
            return Vec::new();
        };
        let mut items = Vec::new();
        if form.has_toggle() {
            items.push(Focusable::Toggle);
        }
        items.extend(form.visible_fields().into_iter().map(Focusable::Field));
        items
    }

    /// The focused item. The cursor is clamped because fields can disappear
    /// when a gate closes or a section is switched off.
    ///
    pub fn focused(&self) -> Option<Focusable> {
        let items = self.focusables();
        let last = items.len().checked_sub(1)?;
        items.get(self.cursor.min(last)).copied()
    }

    pub fn next_focus(&mut self) -> &mut Self {
        let count = self.focusables().len();
        if count > 0 {
            self.cursor = (self.cursor.min(count - 1) + 1) % count;
        }
        self
    }

    pub fn previous_focus(&mut self) -> &mut Self {
        let count = self.focusables().len();
        if count > 0 {
            let current = self.cursor.min(count - 1);
            self.cursor = if current == 0 { count - 1 } else { current - 1 };
        }
        self
    }

    /// Open the first step with a clean wizard.
    ///
    pub fn start_enrollment(&mut self) {
        self.wizard.start();
        self.view = View::Wizard;
        self.cursor = 0;
        self.dialog = None;
    }

    /// Leave the completion screen.
    ///
    pub fn go_home(&mut self) {
        self.wizard.go_home();
        self.cursor = 0;
    }

    /// Go back one step. Leaving the first step abandons the enrollment.
    ///
    pub fn back(&mut self) {
        if self.submitting {
            return;
        }
        if self.wizard.screen() == Screen::Student {
            self.wizard.abandon();
        } else {
            self.wizard.back();
        }
        self.cursor = 0;
    }

    /// Type a character into the focused item. Space flips the section switch
    /// and cycles choice fields, which otherwise ignore typing.
    ///
    pub fn input_char(&mut self, c: char, now: Instant) {
        match self.focused() {
            Some(Focusable::Toggle) if c == ' ' => self.toggle_section(),
            Some(Focusable::Field(field)) if field.options().is_some() => {
                if c == ' ' {
                    self.cycle_choice(true, now);
                }
            }
            Some(Focusable::Field(field)) => {
                let mut value = self.field_value(field);
                value.push(c);
                self.wizard.edit(field, &value, now);
            }
            _ => {}
        }
    }

    /// Delete the last character of the focused field. Masked fields lose
    /// their last digit, dropping any trailing separator with it.
    ///
    pub fn backspace(&mut self, now: Instant) {
        let Some(field) = self.focused().and_then(|f| f.field()) else {
            return;
        };
        let mut value = match field.mask() {
            Some(_) => mask::strip(&self.field_value(field)),
            None => self.field_value(field),
        };
        if value.pop().is_some() {
            self.wizard.edit(field, &value, now);
        }
    }

    /// Select the next or previous option of the focused choice field.
    ///
    pub fn cycle_choice(&mut self, forward: bool, now: Instant) {
        let Some(field) = self.focused().and_then(|f| f.field()) else {
            return;
        };
        let Some(options) = field.options() else {
            return;
        };
        let current = self.field_value(field);
        let count = options.len();
        let index = match options.iter().position(|o| o.value == current) {
            Some(i) if forward => (i + 1) % count,
            Some(i) => (i + count - 1) % count,
            None if forward => 0,
            None => count - 1,
        };
        self.wizard.edit(field, options[index].value, now);
    }

    /// Flip the "has guardian" switch of the current step.
    ///
    pub fn toggle_section(&mut self) {
        if let Err(e) = self.wizard.toggle_section() {
            error!("Failed to switch section: {}", e);
            self.dialog = Some(Dialog::Error(e.to_string()));
        }
        self.cursor = 0;
    }

    /// Press "next" on the current step. On the last step this leads to the
    /// consent question or straight to the submission.
    ///
    pub fn submit_step(&mut self) {
        if self.submitting {
            debug!("Ignoring submit while a submission is in flight.");
            return;
        }
        let final_step = self.wizard.is_final_step();
        match self.wizard.submit_current() {
            Some(StepOutcome::Advance) if final_step => {
                if self.require_consent {
                    self.dialog = Some(Dialog::Consent);
                } else {
                    self.submit_or_report(Consent::NotGiven);
                }
            }
            Some(StepOutcome::Advance) => self.cursor = 0,
            Some(StepOutcome::Blocked(report)) => {
                self.dialog = Some(Dialog::Blocked(report.summary()));
            }
            Some(StepOutcome::Failed(message)) => self.dialog = Some(Dialog::Error(message)),
            None => {}
        }
    }

    /// Accept the open dialog (Enter / y).
    ///
    pub fn confirm_dialog(&mut self) {
        match self.dialog.take() {
            Some(Dialog::Consent) => self.submit_or_report(Consent::Given),
            Some(Dialog::Blocked(_)) | Some(Dialog::Error(_)) => self.retry_step(),
            Some(Dialog::Info { .. }) | None => {}
        }
    }

    /// Reject the open dialog (Esc / n). Dismissing the blocked-step dialog
    /// discards the step's progress.
    ///
    pub fn dismiss_dialog(&mut self) {
        match self.dialog.take() {
            Some(Dialog::Blocked(_)) => {
                self.wizard.cancel_current();
                self.cursor = 0;
            }
            Some(Dialog::Consent) => {
                info!("Data-use consent declined.");
                self.retry_step();
                self.dialog = Some(Dialog::Error(
                    SubmissionError::ConsentRequired.user_message(),
                ));
            }
            Some(Dialog::Error(_)) => self.retry_step(),
            Some(Dialog::Info { .. }) | None => {}
        }
    }

    /// Hand the stored enrollment to the network thread. Only one submission
    /// may be in flight.
    ///
    pub fn request_submission(&mut self, consent: Consent) -> Result<(), SubmissionError> {
        if self.submitting {
            return Err(SubmissionError::AlreadySubmitting);
        }
        if self.require_consent && consent != Consent::Given {
            return Err(SubmissionError::ConsentRequired);
        }
        let Some(sender) = self.net_sender.as_ref() else {
            warn!("No network thread attached, submission dropped.");
            return Err(SubmissionError::Unavailable);
        };
        info!("Queueing enrollment submission.");
        if let Err(e) = sender.send(NetworkEvent::SubmitEnrollment { consent }) {
            error!("Failed to queue submission: {}", e);
            return Err(SubmissionError::Unavailable);
        }
        self.submitting = true;
        Ok(())
    }

    /// Copy of the store for the network thread, which sends it without
    /// holding the state lock.
    ///
    pub fn submission_store(&self) -> WizardStore {
        self.wizard.store().clone()
    }

    /// Apply the result of a finished submission.
    ///
    pub fn finish_submission(&mut self, result: Result<Receipt, SubmissionError>) {
        self.submitting = false;
        match result {
            Ok(receipt) => {
                info!(
                    "Enrollment of student {} finished after {} request(s).",
                    receipt.student_id, receipt.requests
                );
                self.wizard.complete();
                self.cursor = 0;
                self.dialog = Some(Dialog::Info {
                    title: "Sucesso".to_string(),
                    body: SUCCESS_MESSAGE.to_string(),
                });
            }
            Err(e) => {
                warn!("Enrollment submission failed: {}", e);
                self.retry_step();
                self.dialog = Some(Dialog::Error(e.user_message()));
            }
        }
    }

    /// Show the link for mailing the enrollment documents.
    ///
    pub fn show_documents_link(&mut self) {
        let name = self.wizard.student_name();
        self.dialog = Some(
            match contact::documents_mailto(&self.contact_email, name.as_deref()) {
                Ok(link) => Dialog::Info {
                    title: "Envio de Documentos".to_string(),
                    body: link.to_string(),
                },
                Err(e) => Dialog::Error(e.to_string()),
            },
        );
    }

    /// Show the link to the school terms.
    ///
    pub fn show_terms(&mut self) {
        self.dialog = Some(match contact::terms_link(&self.terms_url) {
            Ok(link) => Dialog::Info {
                title: "Termos".to_string(),
                body: link.to_string(),
            },
            Err(e) => Dialog::Error(e.to_string()),
        });
    }

    pub fn open_change_request(&mut self) {
        self.view = View::ChangeRequest;
        self.change_request.clear();
    }

    pub fn close_change_request(&mut self) {
        self.view = View::Wizard;
    }

    pub fn change_request_char(&mut self, c: char) {
        self.change_request.push(c);
    }

    pub fn change_request_backspace(&mut self) {
        self.change_request.pop();
    }

    /// Turn the typed request into a mail link.
    ///
    pub fn submit_change_request(&mut self) {
        match contact::change_request_mailto(&self.contact_email, &self.change_request) {
            Ok(link) => {
                debug!("Change request link built.");
                self.change_request.clear();
                self.view = View::Wizard;
                self.dialog = Some(Dialog::Info {
                    title: "Solicitação de alteração".to_string(),
                    body: link.to_string(),
                });
            }
            Err(e) => self.dialog = Some(Dialog::Error(e.to_string())),
        }
    }

    /// Periodic update: due validations and the spinner.
    ///
    pub fn tick(&mut self, now: Instant) {
        self.wizard.tick(now);
        if self.submitting {
            self.advance_spinner_index();
        }
    }

    fn submit_or_report(&mut self, consent: Consent) {
        if let Err(e) = self.request_submission(consent) {
            self.retry_step();
            self.dialog = Some(Dialog::Error(e.user_message()));
        }
    }

    fn retry_step(&mut self) {
        if let Some(form) = self.wizard.form_mut() {
            form.retry();
        }
    }

    fn field_value(&self, field: crate::wizard::Field) -> String {
        self.wizard
            .form()
            .map(|form| form.value(field).to_string())
            .unwrap_or_default()
    }
}
