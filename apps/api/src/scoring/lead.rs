//! Lead Scoring: point-based qualification of a prospect from four form selections.
//!
//! Each dimension contributes a bounded number of points. The raw sum is rescaled
//! to 0–100 against the table's maximum and bucketed into three tiers:
//! high-intent (≥80), warm (50–79), early-stage (<50).

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Input enumerations (serialized as the exact form labels)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompanySize {
    #[serde(rename = "Student / Individual")]
    Individual,
    #[serde(rename = "Startup (1-10)")]
    Startup,
    #[serde(rename = "Small Business (10-50)")]
    Small,
    #[serde(rename = "Medium Business (50-200)")]
    Medium,
    #[serde(rename = "Enterprise (200+)")]
    Enterprise,
}

impl CompanySize {
    pub const ALL: [CompanySize; 5] = [
        CompanySize::Individual,
        CompanySize::Startup,
        CompanySize::Small,
        CompanySize::Medium,
        CompanySize::Enterprise,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CompanySize::Individual => "Student / Individual",
            CompanySize::Startup => "Startup (1-10)",
            CompanySize::Small => "Small Business (10-50)",
            CompanySize::Medium => "Medium Business (50-200)",
            CompanySize::Enterprise => "Enterprise (200+)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetLevel {
    Low,
    Moderate,
    High,
}

impl BudgetLevel {
    pub const ALL: [BudgetLevel; 3] = [BudgetLevel::Low, BudgetLevel::Moderate, BudgetLevel::High];

    pub fn label(self) -> &'static str {
        match self {
            BudgetLevel::Low => "Low",
            BudgetLevel::Moderate => "Moderate",
            BudgetLevel::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Urgency {
    #[serde(rename = "Just Exploring")]
    Exploring,
    #[serde(rename = "Considering Options")]
    Considering,
    #[serde(rename = "Ready to Buy Soon")]
    ReadyToBuy,
}

impl Urgency {
    pub const ALL: [Urgency; 3] = [Urgency::Exploring, Urgency::Considering, Urgency::ReadyToBuy];

    pub fn label(self) -> &'static str {
        match self {
            Urgency::Exploring => "Just Exploring",
            Urgency::Considering => "Considering Options",
            Urgency::ReadyToBuy => "Ready to Buy Soon",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Engagement {
    #[serde(rename = "Visited Website Once")]
    VisitedOnce,
    #[serde(rename = "Downloaded Brochure")]
    DownloadedBrochure,
    #[serde(rename = "Requested Demo / Contacted Sales")]
    RequestedDemo,
}

impl Engagement {
    pub const ALL: [Engagement; 3] = [
        Engagement::VisitedOnce,
        Engagement::DownloadedBrochure,
        Engagement::RequestedDemo,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Engagement::VisitedOnce => "Visited Website Once",
            Engagement::DownloadedBrochure => "Downloaded Brochure",
            Engagement::RequestedDemo => "Requested Demo / Contacted Sales",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Weights
// ────────────────────────────────────────────────────────────────────────────

/// Points per option, one row per dimension. Rows are ordered like the `ALL` arrays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringWeights {
    pub company_size: [u32; 5],
    pub budget_level: [u32; 3],
    pub urgency: [u32; 3],
    pub engagement: [u32; 3],
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            company_size: [10, 10, 15, 20, 30],
            budget_level: [10, 20, 30],
            urgency: [5, 15, 25],
            engagement: [5, 15, 25],
        }
    }
}

impl ScoringWeights {
    /// Highest achievable raw score under this table.
    pub fn max_score(&self) -> u32 {
        fn row_max(row: &[u32]) -> u32 {
            row.iter().copied().max().unwrap_or(0)
        }
        row_max(&self.company_size)
            + row_max(&self.budget_level)
            + row_max(&self.urgency)
            + row_max(&self.engagement)
    }

    pub fn company_size_points(&self, size: CompanySize) -> u32 {
        self.company_size[size as usize]
    }

    pub fn budget_points(&self, budget: BudgetLevel) -> u32 {
        self.budget_level[budget as usize]
    }

    pub fn urgency_points(&self, urgency: Urgency) -> u32 {
        self.urgency[urgency as usize]
    }

    pub fn engagement_points(&self, engagement: Engagement) -> u32 {
        self.engagement[engagement as usize]
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Output
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Classification {
    EarlyStage,
    Warm,
    HighIntent,
}

impl Classification {
    pub const HIGH_INTENT_THRESHOLD: u32 = 80;
    pub const WARM_THRESHOLD: u32 = 50;

    /// Tier for a normalized (0–100) score.
    pub fn from_normalized(normalized: u32) -> Self {
        if normalized >= Self::HIGH_INTENT_THRESHOLD {
            Classification::HighIntent
        } else if normalized >= Self::WARM_THRESHOLD {
            Classification::Warm
        } else {
            Classification::EarlyStage
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Classification::EarlyStage => "early-stage",
            Classification::Warm => "warm",
            Classification::HighIntent => "high-intent",
        }
    }

    /// Follow-up guidance shown next to the score.
    pub fn follow_up(self) -> &'static str {
        match self {
            Classification::HighIntent => "High-Quality Lead: Prioritize Immediately",
            Classification::Warm => "Moderate Lead: Nurture Strategically",
            Classification::EarlyStage => "Early-Stage Lead: Add to Marketing Funnel",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreResult {
    pub raw_score: u32,
    pub max_score: u32,
    pub normalized_score: u32, // 0 – 100
    pub classification: Classification,
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring
// ────────────────────────────────────────────────────────────────────────────

/// Scores a lead against the default weight table.
pub fn score(
    company_size: CompanySize,
    budget_level: BudgetLevel,
    urgency: Urgency,
    engagement: Engagement,
) -> ScoreResult {
    score_with(
        &ScoringWeights::default(),
        company_size,
        budget_level,
        urgency,
        engagement,
    )
}

pub fn score_with(
    weights: &ScoringWeights,
    company_size: CompanySize,
    budget_level: BudgetLevel,
    urgency: Urgency,
    engagement: Engagement,
) -> ScoreResult {
    let raw_score = weights.company_size_points(company_size)
        + weights.budget_points(budget_level)
        + weights.urgency_points(urgency)
        + weights.engagement_points(engagement);
    let max_score = weights.max_score();
    let normalized_score = normalize(raw_score, max_score);

    ScoreResult {
        raw_score,
        max_score,
        normalized_score,
        classification: Classification::from_normalized(normalized_score),
    }
}

/// round(raw / max × 100), half rounded up. A zero maximum scores 0.
pub fn normalize(raw: u32, max: u32) -> u32 {
    if max == 0 {
        return 0;
    }
    (raw * 100 + max / 2) / max
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
