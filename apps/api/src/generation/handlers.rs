//! Axum route handlers for the assistant sections.
//!
//! Generation failures are not HTTP errors: the handler still answers 200 and
//! carries the error text in `output` with `ok: false`.

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use crate::errors::AppError;
use crate::generation::forms::{CampaignForm, CampaignGoal, LeadForm, MarketingBudget, PitchForm};
use crate::generation::prompts::PromptIntent;
use crate::llm_client::{Credential, GenerationResult};
use crate::scoring::{BudgetLevel, CompanySize, Engagement, ScoreResult, Urgency};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct GenerationResponse {
    pub output: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential: Option<Credential>,
}

impl From<GenerationResult> for GenerationResponse {
    fn from(result: GenerationResult) -> Self {
        let ok = result.is_success();
        let credential = result.credential();
        Self {
            output: result.into_text(),
            ok,
            credential,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LeadScoreResponse {
    pub score: ScoreResult,
    pub follow_up: &'static str,
}

impl From<ScoreResult> for LeadScoreResponse {
    fn from(score: ScoreResult) -> Self {
        Self {
            follow_up: score.classification.follow_up(),
            score,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LeadAdviceResponse {
    #[serde(flatten)]
    pub lead: LeadScoreResponse,
    pub advice: GenerationResponse,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/forms/defaults
///
/// Pre-filled values and selectable options for every section.
pub async fn handle_form_defaults() -> Json<Value> {
    fn labels<T: Copy>(all: &[T], label: fn(T) -> &'static str) -> Vec<&'static str> {
        all.iter().map(|v| label(*v)).collect()
    }

    Json(json!({
        "campaign_strategy": {
            "defaults": CampaignForm::default(),
            "options": {
                "budget": labels(&MarketingBudget::ALL, MarketingBudget::label),
                "goal": labels(&CampaignGoal::ALL, CampaignGoal::label),
            }
        },
        "sales_pitch": {
            "defaults": PitchForm::default(),
        },
        "lead_scoring": {
            "defaults": LeadForm::default(),
            "options": {
                "company_size": labels(&CompanySize::ALL, CompanySize::label),
                "budget_level": labels(&BudgetLevel::ALL, BudgetLevel::label),
                "urgency": labels(&Urgency::ALL, Urgency::label),
                "engagement": labels(&Engagement::ALL, Engagement::label),
            }
        }
    }))
}

/// POST /api/v1/campaign-strategy
pub async fn handle_campaign_strategy(
    State(state): State<AppState>,
    Json(form): Json<CampaignForm>,
) -> Result<Json<GenerationResponse>, AppError> {
    form.validate()?;

    let prompt = state
        .templates
        .render(PromptIntent::CampaignStrategy, &form.slots());
    info!("Generating campaign strategy for '{}'", form.business_type);

    Ok(Json(state.llm.generate(&prompt).await.into()))
}

/// POST /api/v1/sales-pitch
pub async fn handle_sales_pitch(
    State(state): State<AppState>,
    Json(form): Json<PitchForm>,
) -> Result<Json<GenerationResponse>, AppError> {
    form.validate()?;

    let prompt = state.templates.render(PromptIntent::SalesPitch, &form.slots());
    info!("Generating sales pitch for '{}'", form.product_name);

    Ok(Json(state.llm.generate(&prompt).await.into()))
}

/// POST /api/v1/leads/score
///
/// Pure scoring, no LLM call.
pub async fn handle_lead_score(Json(form): Json<LeadForm>) -> Json<LeadScoreResponse> {
    let score = form.score();
    info!(
        "Lead scored {}/{} ({})",
        score.raw_score,
        score.max_score,
        score.classification.as_str()
    );
    Json(score.into())
}

/// POST /api/v1/leads/advise
///
/// Scores the lead, then asks the model for follow-up advice on that score.
pub async fn handle_lead_advice(
    State(state): State<AppState>,
    Json(form): Json<LeadForm>,
) -> Json<LeadAdviceResponse> {
    let score = form.score();

    let owned_slots = form.advisory_slots(&score);
    let slots: Vec<(&str, &str)> = owned_slots
        .iter()
        .map(|(name, value)| (*name, value.as_str()))
        .collect();
    let prompt = state.templates.render(PromptIntent::LeadAdvisory, &slots);

    let advice = state.llm.generate(&prompt).await.into();

    Json(LeadAdviceResponse {
        lead: score.into(),
        advice,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
