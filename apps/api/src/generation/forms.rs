//! Form payloads for the three assistant sections, with the pre-filled defaults
//! users start from.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::scoring::{BudgetLevel, CompanySize, Engagement, ScoreResult, Urgency};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MarketingBudget {
    #[default]
    Low,
    Medium,
    High,
}

impl MarketingBudget {
    pub const ALL: [MarketingBudget; 3] = [
        MarketingBudget::Low,
        MarketingBudget::Medium,
        MarketingBudget::High,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MarketingBudget::Low => "Low",
            MarketingBudget::Medium => "Medium",
            MarketingBudget::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CampaignGoal {
    #[default]
    #[serde(rename = "Brand Awareness")]
    BrandAwareness,
    #[serde(rename = "Lead Generation")]
    LeadGeneration,
    #[serde(rename = "Sales Conversion")]
    SalesConversion,
}

impl CampaignGoal {
    pub const ALL: [CampaignGoal; 3] = [
        CampaignGoal::BrandAwareness,
        CampaignGoal::LeadGeneration,
        CampaignGoal::SalesConversion,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CampaignGoal::BrandAwareness => "Brand Awareness",
            CampaignGoal::LeadGeneration => "Lead Generation",
            CampaignGoal::SalesConversion => "Sales Conversion",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Campaign strategy
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignForm {
    pub business_type: String,
    pub target_audience: String,
    #[serde(default)]
    pub budget: MarketingBudget,
    #[serde(default)]
    pub goal: CampaignGoal,
}

impl Default for CampaignForm {
    fn default() -> Self {
        Self {
            business_type: "SaaS productivity app".to_string(),
            target_audience: "College students and young professionals".to_string(),
            budget: MarketingBudget::default(),
            goal: CampaignGoal::default(),
        }
    }
}

impl CampaignForm {
    pub fn validate(&self) -> Result<(), AppError> {
        require_text("business_type", &self.business_type)?;
        require_text("target_audience", &self.target_audience)
    }

    pub fn slots(&self) -> [(&'static str, &str); 4] {
        [
            ("business_type", self.business_type.as_str()),
            ("target_audience", self.target_audience.as_str()),
            ("budget", self.budget.label()),
            ("goal", self.goal.label()),
        ]
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Sales pitch
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitchForm {
    pub product_name: String,
    pub product_description: String,
    pub target_customer: String,
    pub unique_value: String,
}

impl Default for PitchForm {
    fn default() -> Self {
        Self {
            product_name: "FocusFlow App".to_string(),
            product_description: "A productivity app that helps students manage tasks, \
                                  deadlines, and focus sessions efficiently."
                .to_string(),
            target_customer: "College students struggling with time management".to_string(),
            unique_value: "AI-powered smart scheduling and distraction tracking".to_string(),
        }
    }
}

impl PitchForm {
    pub fn validate(&self) -> Result<(), AppError> {
        require_text("product_name", &self.product_name)?;
        require_text("product_description", &self.product_description)?;
        require_text("target_customer", &self.target_customer)?;
        require_text("unique_value", &self.unique_value)
    }

    pub fn slots(&self) -> [(&'static str, &str); 4] {
        [
            ("product_name", self.product_name.as_str()),
            ("product_description", self.product_description.as_str()),
            ("target_customer", self.target_customer.as_str()),
            ("unique_value", self.unique_value.as_str()),
        ]
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Lead scoring
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadForm {
    pub company_size: CompanySize,
    pub budget_level: BudgetLevel,
    pub urgency: Urgency,
    pub engagement: Engagement,
}

impl Default for LeadForm {
    fn default() -> Self {
        Self {
            company_size: CompanySize::Individual,
            budget_level: BudgetLevel::Low,
            urgency: Urgency::Exploring,
            engagement: Engagement::VisitedOnce,
        }
    }
}

impl LeadForm {
    pub fn score(&self) -> ScoreResult {
        crate::scoring::score(
            self.company_size,
            self.budget_level,
            self.urgency,
            self.engagement,
        )
    }

    /// Slots for the advisory prompt, including the computed score.
    pub fn advisory_slots(&self, result: &ScoreResult) -> Vec<(&'static str, String)> {
        vec![
            ("company_size", self.company_size.label().to_string()),
            ("budget_level", self.budget_level.label().to_string()),
            ("urgency", self.urgency.label().to_string()),
            ("engagement", self.engagement.label().to_string()),
            ("raw_score", result.raw_score.to_string()),
            ("max_score", result.max_score.to_string()),
            ("normalized_score", result.normalized_score.to_string()),
            ("classification", result.classification.as_str().to_string()),
        ]
    }
}

/// Every free-text field must carry something to interpolate; values are otherwise
/// passed through untouched.
fn require_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}
