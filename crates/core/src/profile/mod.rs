//! Investment risk profile module - models, collaborator traits and the gate.

mod profile_gate;
mod profile_model;
mod profile_traits;

pub use profile_gate::InvestmentProfileGate;
pub use profile_model::{InvestmentProfile, ProfileAnswer, ProfileQuestion, QuestionOption};
pub use profile_traits::{ProfileApiClient, QuestionnaireResponder};
