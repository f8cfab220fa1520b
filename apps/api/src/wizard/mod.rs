// Wizard state for the multi-step profile form. Each step is a pure transform
// (state, input) -> state; the server keeps no wizard state between requests.

pub mod handlers;
pub mod state;

pub use state::{advance, to_upsert_payload, ProfileForm, StepInput, WizardState};
