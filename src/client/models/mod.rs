//! Teammate API data models

mod teammate;

pub use teammate::{Persona, Teammate, TeammateRequest};
