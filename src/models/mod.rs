pub mod cycle;
pub mod symptom;

pub use cycle::{CycleEntry, Flow};
pub use symptom::{SymptomDetail, SymptomDuration, SymptomEntry, MAX_SCORE, MIN_SCORE};
