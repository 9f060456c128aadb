pub mod talent;

pub use talent::{Aesthetic, NewTalent, Talent, TalentPatch, TalentSummary};
