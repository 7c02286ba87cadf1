// Lead scoring engine: pure, deterministic, no LLM calls.

pub mod lead;

pub use lead::{score, BudgetLevel, CompanySize, Engagement, ScoreResult, Urgency};
