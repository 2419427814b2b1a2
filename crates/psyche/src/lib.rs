//! Per-agent mental state: confidence, fatigue, daily risk budget and the
//! emotional bias that colors every decision an agent makes.
//!
//! State lives in a [`MentalStateStore`] constructed at startup and shared by
//! handle; there is no global. Time is injected through [`Clock`] so tests
//! can drive the daily reset deterministically.

mod clock;
mod modifiers;
mod state;
mod store;

pub use clock::{Clock, SystemClock};
pub use modifiers::{mental_modifiers, MentalModifiers};
pub use state::AgentMentalState;
pub use store::MentalStateStore;
