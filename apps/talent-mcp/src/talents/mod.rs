// Talent data access: criteria matching, the built-in dataset, and the
// service that chooses between a configured store and that dataset.

pub mod criteria;
pub mod fallback;
pub mod service;

pub use criteria::Criteria;
pub use service::TalentService;
