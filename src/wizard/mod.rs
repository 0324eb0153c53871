//! Pre-enrollment wizard engine.
//!
//! The [`Wizard`] owns the [`WizardStore`] and one [`StepForm`] per step, and
//! moves between screens. Only the current step is interactive, and it is the
//! only writer of the store until the final submission is assembled.

pub mod assembler;
pub mod debounce;
mod error;
pub mod mask;
pub mod records;
pub mod step;
pub mod store;
pub mod validators;

pub use assembler::{Assembler, Consent, Receipt, SubmissionError};
pub use error::WizardError;
pub use records::GuardianKind;
pub use step::{FormView, StepKind, StepOutcome, StepPhase, StepReport};
pub use store::{WizardSnapshot, WizardStore};
pub use validators::Field;

use log::*;
use std::time::{Duration, Instant};
use step::{GuardianStep, HouseholdStep, ObservationsStep, StepForm, StudentStep};

/// Screens of the enrollment flow, in order.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Screen {
    Home,
    Student,
    MaternalGuardian,
    PaternalGuardian,
    Observations,
    Household,
    Completed,
}

impl Screen {
    /// Screens that carry a step form.
    ///
    pub const STEPS: [Screen; 5] = [
        Screen::Student,
        Screen::MaternalGuardian,
        Screen::PaternalGuardian,
        Screen::Observations,
        Screen::Household,
    ];

    pub fn next(self) -> Screen {
        match self {
            Screen::Home => Screen::Student,
            Screen::Student => Screen::MaternalGuardian,
            Screen::MaternalGuardian => Screen::PaternalGuardian,
            Screen::PaternalGuardian => Screen::Observations,
            Screen::Observations => Screen::Household,
            Screen::Household | Screen::Completed => Screen::Completed,
        }
    }

    pub fn previous(self) -> Screen {
        match self {
            Screen::Home | Screen::Student | Screen::Completed => Screen::Home,
            Screen::MaternalGuardian => Screen::Student,
            Screen::PaternalGuardian => Screen::MaternalGuardian,
            Screen::Observations => Screen::PaternalGuardian,
            Screen::Household => Screen::Observations,
        }
    }

    pub fn is_step(self) -> bool {
        Screen::STEPS.contains(&self)
    }

    /// One-based position among the step screens.
    ///
    pub fn position(self) -> Option<usize> {
        Screen::STEPS.iter().position(|s| *s == self).map(|i| i + 1)
    }
}

/// Navigation controller for the enrollment flow.
///
#[derive(Debug)]
pub struct Wizard {
    store: WizardStore,
    student: StepForm<StudentStep>,
    maternal: StepForm<GuardianStep>,
    paternal: StepForm<GuardianStep>,
    observations: StepForm<ObservationsStep>,
    household: StepForm<HouseholdStep>,
    screen: Screen,
    debounce: Duration,
}

impl Wizard {
    /// Return a new wizard on the home screen.
    ///
    pub fn new(debounce: Duration) -> Self {
        Wizard {
            store: WizardStore::new(),
            student: StepForm::new(StudentStep, debounce),
            maternal: StepForm::new(GuardianStep::new(GuardianKind::Maternal), debounce),
            paternal: StepForm::new(GuardianStep::new(GuardianKind::Paternal), debounce),
            observations: StepForm::new(ObservationsStep, debounce),
            household: StepForm::new(HouseholdStep, debounce),
            screen: Screen::Home,
            debounce,
        }
    }

    /// Begin a fresh enrollment: drop any stale data and open the first step.
    ///
    pub fn start(&mut self) {
        info!("Starting a new enrollment.");
        self.reset();
        self.screen = Screen::Student;
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn store(&self) -> &WizardStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut WizardStore {
        &mut self.store
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// The form of the current screen, if it is a step.
    ///
    pub fn form(&self) -> Option<&dyn FormView> {
        match self.screen {
            Screen::Student => Some(&self.student),
            Screen::MaternalGuardian => Some(&self.maternal),
            Screen::PaternalGuardian => Some(&self.paternal),
            Screen::Observations => Some(&self.observations),
            Screen::Household => Some(&self.household),
            Screen::Home | Screen::Completed => None,
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut dyn FormView> {
        self.parts().0
    }

    /// Current form and the store, borrowed together.
    ///
    fn parts(&mut self) -> (Option<&mut dyn FormView>, &mut WizardStore) {
        let Wizard {
            store,
            student,
            maternal,
            paternal,
            observations,
            household,
            screen,
            ..
        } = self;
        let form: Option<&mut dyn FormView> = match screen {
            Screen::Student => Some(student),
            Screen::MaternalGuardian => Some(maternal),
            Screen::PaternalGuardian => Some(paternal),
            Screen::Observations => Some(observations),
            Screen::Household => Some(household),
            Screen::Home | Screen::Completed => None,
        };
        (form, store)
    }

    /// Edit a field of the current step.
    ///
    pub fn edit(&mut self, field: Field, value: &str, now: Instant) {
        if let Some(form) = self.form_mut() {
            form.edit(field, value, now);
        }
    }

    /// Press "next" on the current step. A valid step is stored and, unless it
    /// is the last one, the wizard moves to the following screen. The last
    /// step stays put until the submission completes.
    ///
    pub fn submit_current(&mut self) -> Option<StepOutcome> {
        let screen = self.screen;
        let (form, store) = self.parts();
        let outcome = form?.submit(store);
        if outcome == StepOutcome::Advance && screen != Screen::Household {
            self.screen = screen.next();
            debug!("Moved to screen {:?}.", self.screen);
        }
        Some(outcome)
    }

    /// Flip the current step's section switch, if it has one.
    ///
    pub fn toggle_section(&mut self) -> Result<(), WizardError> {
        let (form, store) = self.parts();
        match form {
            Some(form) if form.has_toggle() => {
                let active = !form.section_active();
                form.set_section_active(active, store)
            }
            _ => Ok(()),
        }
    }

    /// Go back one screen without validating or touching the store.
    ///
    pub fn back(&mut self) {
        if let Some(form) = self.form_mut() {
            form.retry();
        }
        self.screen = self.screen.previous();
        debug!("Moved back to screen {:?}.", self.screen);
    }

    /// Discard the current step's draft. Navigation does not move.
    ///
    pub fn cancel_current(&mut self) {
        if let Some(form) = self.form_mut() {
            form.cancel();
        }
    }

    /// Run due debounced validations on the current step.
    ///
    pub fn tick(&mut self, now: Instant) {
        if let Some(form) = self.form_mut() {
            form.tick(now);
        }
    }

    /// Whether the current screen is the step that triggers final submission.
    ///
    pub fn is_final_step(&self) -> bool {
        self.screen == Screen::Household
    }

    /// Student name used in the documents e-mail, from the store or, before
    /// the first step is confirmed, from its draft.
    ///
    pub fn student_name(&self) -> Option<String> {
        let name = match self.store.student() {
            Some(student) => student.name.clone(),
            None => self.student.value(Field::StudentName).trim().to_string(),
        };
        (!name.is_empty()).then_some(name)
    }

    /// Finish after a successful submission.
    ///
    pub fn complete(&mut self) {
        info!("Enrollment submitted, clearing wizard data.");
        self.reset();
        self.screen = Screen::Completed;
    }

    /// Leave the flow, discarding everything entered.
    ///
    pub fn abandon(&mut self) {
        info!("Enrollment abandoned.");
        self.reset();
        self.screen = Screen::Home;
    }

    /// Return to the home screen from the completion screen. Data is kept.
    ///
    pub fn go_home(&mut self) {
        self.screen = Screen::Home;
    }

    fn reset(&mut self) {
        let debounce = self.debounce;
        *self = Wizard::new(debounce);
    }
}

impl Default for Wizard {
    fn default() -> Self {
        Wizard::new(Duration::from_millis(300))
    }
}
