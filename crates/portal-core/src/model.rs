//! Research report domain model.

use crate::ReportId;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Analyst recommendation for a security.
///
/// Variants are declared from most negative to most positive, so the derived
/// ordering follows the rating scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rating {
    StrongSell,
    Sell,
    Hold,
    Buy,
    StrongBuy,
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StrongSell => write!(f, "STRONG_SELL"),
            Self::Sell => write!(f, "SELL"),
            Self::Hold => write!(f, "HOLD"),
            Self::Buy => write!(f, "BUY"),
            Self::StrongBuy => write!(f, "STRONG_BUY"),
        }
    }
}

/// Kind of research publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportType {
    /// First coverage of a security.
    Initiation,
    Update,
    Quarterly,
    /// Short note on a market event.
    Flash,
    /// Full analysis including a financial model.
    DeepDive,
    Credit,
}

impl std::fmt::Display for ReportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initiation => write!(f, "INITIATION"),
            Self::Update => write!(f, "UPDATE"),
            Self::Quarterly => write!(f, "QUARTERLY"),
            Self::Flash => write!(f, "FLASH"),
            Self::DeepDive => write!(f, "DEEP_DIVE"),
            Self::Credit => write!(f, "CREDIT"),
        }
    }
}

/// Risk assessment attached to a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Speculative,
}

/// A report as submitted by an analyst, before derivation.
///
/// `rating` is optional here so that a missing rating can be rejected with a
/// validation error instead of a deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSubmission {
    pub analyst_id: i64,
    pub security_id: i64,
    pub report_type: ReportType,
    pub title: String,
    pub executive_summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_text: Option<String>,
    #[serde(default)]
    pub rating: Option<Rating>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_rating: Option<Rating>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::decimal::option"
    )]
    pub target_price: Option<BigDecimal>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::decimal::option"
    )]
    pub previous_target: Option<BigDecimal>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::decimal::option"
    )]
    pub current_price: Option<BigDecimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<RiskLevel>,
    #[serde(default, alias = "investmentCatalysts")]
    pub catalysts: Vec<String>,
    #[serde(default)]
    pub key_risks: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ReportSubmission {
    /// Create a submission with the required descriptive fields.
    ///
    /// Everything else starts empty; use the `with_*` methods to fill it in.
    pub fn new(
        analyst_id: i64,
        security_id: i64,
        report_type: ReportType,
        title: impl Into<String>,
        executive_summary: impl Into<String>,
    ) -> Self {
        Self {
            analyst_id,
            security_id,
            report_type,
            title: title.into(),
            executive_summary: executive_summary.into(),
            full_text: None,
            rating: None,
            previous_rating: None,
            target_price: None,
            previous_target: None,
            current_price: None,
            risk_level: None,
            catalysts: Vec::new(),
            key_risks: Vec::new(),
            tags: Vec::new(),
        }
    }

    pub fn with_rating(mut self, rating: Rating) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_previous_rating(mut self, rating: Rating) -> Self {
        self.previous_rating = Some(rating);
        self
    }

    pub fn with_target_price(mut self, price: BigDecimal) -> Self {
        self.target_price = Some(price);
        self
    }

    pub fn with_current_price(mut self, price: BigDecimal) -> Self {
        self.current_price = Some(price);
        self
    }

    pub fn with_risk_level(mut self, level: RiskLevel) -> Self {
        self.risk_level = Some(level);
        self
    }
}

/// A published research report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchReport {
    /// Assigned by the report store; `None` until persisted.
    #[serde(default)]
    pub id: Option<ReportId>,
    pub analyst_id: i64,
    pub security_id: i64,
    pub published_at: DateTime<Utc>,
    pub report_type: ReportType,
    pub title: String,
    pub executive_summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_text: Option<String>,
    pub rating: Rating,
    #[serde(default)]
    pub previous_rating: Option<Rating>,
    pub rating_changed: bool,
    #[serde(default, with = "crate::decimal::option")]
    pub target_price: Option<BigDecimal>,
    #[serde(default, with = "crate::decimal::option")]
    pub previous_target: Option<BigDecimal>,
    #[serde(default, with = "crate::decimal::option")]
    pub current_price: Option<BigDecimal>,
    /// Percentage gap between target and current price, two decimals.
    #[serde(default, with = "crate::decimal::two_places")]
    pub implied_upside: Option<BigDecimal>,
    #[serde(default)]
    pub risk_level: Option<RiskLevel>,
    #[serde(default)]
    pub catalysts: Vec<String>,
    #[serde(default)]
    pub key_risks: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}
