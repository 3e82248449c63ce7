//! Report mutation policy.
//!
//! Turns a [`ReportSubmission`] into a [`ResearchReport`], deriving
//! `rating_changed` and `implied_upside`. Apart from reading the clock in
//! [`derive_report`], this is pure computation.

use crate::error::ValidationError;
use crate::model::{Rating, ReportSubmission, ResearchReport};
use bigdecimal::{BigDecimal, RoundingMode};
use chrono::{DateTime, Utc};

/// Number of fractional digits kept for the implied upside.
pub const UPSIDE_SCALE: i64 = 2;

/// Derive a report from a submission, stamping it with the current time.
pub fn derive_report(submission: ReportSubmission) -> Result<ResearchReport, ValidationError> {
    derive_report_at(submission, Utc::now())
}

/// Derive a report from a submission with an explicit publication time.
pub fn derive_report_at(
    submission: ReportSubmission,
    published_at: DateTime<Utc>,
) -> Result<ResearchReport, ValidationError> {
    let rating = submission.rating.ok_or(ValidationError::MissingRating)?;
    let rating_changed = rating_changed(submission.previous_rating, rating);
    let implied_upside = implied_upside(
        submission.target_price.as_ref(),
        submission.current_price.as_ref(),
    );

    Ok(ResearchReport {
        id: None,
        analyst_id: submission.analyst_id,
        security_id: submission.security_id,
        published_at,
        report_type: submission.report_type,
        title: submission.title,
        executive_summary: submission.executive_summary,
        full_text: submission.full_text,
        rating,
        previous_rating: submission.previous_rating,
        rating_changed,
        target_price: submission.target_price,
        previous_target: submission.previous_target,
        current_price: submission.current_price,
        implied_upside,
        risk_level: submission.risk_level,
        catalysts: submission.catalysts,
        key_risks: submission.key_risks,
        tags: submission.tags,
    })
}

/// A rating counts as changed only when a previous rating was supplied and
/// differs from the current one.
pub fn rating_changed(previous: Option<Rating>, current: Rating) -> bool {
    previous.is_some_and(|previous| previous != current)
}

/// `(target - current) * 100 / current`, rounded half-up to two decimals.
///
/// Returns `None` when either price is missing or the current price is not
/// strictly positive.
pub fn implied_upside(
    target: Option<&BigDecimal>,
    current: Option<&BigDecimal>,
) -> Option<BigDecimal> {
    let (target, current) = (target?, current?);
    if *current <= BigDecimal::from(0) {
        return None;
    }

    let upside = (target - current) * BigDecimal::from(100) / current.clone();
    Some(upside.with_scale_round(UPSIDE_SCALE, RoundingMode::HalfUp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ReportType;
    use std::str::FromStr;

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    fn submission() -> ReportSubmission {
        ReportSubmission::new(
            1,
            7,
            ReportType::Update,
            "Roche Flash",
            "Pipeline readout ahead of expectations.",
        )
        .with_rating(Rating::Buy)
    }

    #[test]
    fn test_no_previous_rating_is_not_a_change() {
        let report = derive_report(submission()).unwrap();
        assert!(!report.rating_changed);
    }

    #[test]
    fn test_same_previous_rating_is_not_a_change() {
        let report = derive_report(submission().with_previous_rating(Rating::Buy)).unwrap();
        assert!(!report.rating_changed);
    }

    #[test]
    fn test_different_previous_rating_is_a_change() {
        for previous in [Rating::StrongSell, Rating::Sell, Rating::Hold, Rating::StrongBuy] {
            let report = derive_report(submission().with_previous_rating(previous)).unwrap();
            assert!(report.rating_changed, "{previous} -> BUY should be a change");
        }
    }

    #[test]
    fn test_implied_upside_whole_percent() {
        let report = derive_report(
            submission()
                .with_target_price(dec("120.00"))
                .with_current_price(dec("100.00")),
        )
        .unwrap();

        let upside = report.implied_upside.unwrap();
        assert_eq!(upside, dec("20.00"));
        assert_eq!(upside.to_string(), "20.00");
    }

    #[test]
    fn test_implied_upside_rounds_half_up() {
        let report = derive_report(
            submission()
                .with_target_price(dec("130.00"))
                .with_current_price(dec("110.00")),
        )
        .unwrap();

        assert_eq!(report.implied_upside.unwrap().to_string(), "18.18");

        // 0.125 -> 0.13
        let upside = implied_upside(Some(&dec("100.125")), Some(&dec("100"))).unwrap();
        assert_eq!(upside.to_string(), "0.13");
    }

    #[test]
    fn test_implied_upside_can_be_negative() {
        let upside = implied_upside(Some(&dec("90")), Some(&dec("100"))).unwrap();
        assert_eq!(upside, dec("-10.00"));
    }

    #[test]
    fn test_implied_upside_absent_without_both_prices() {
        let report = derive_report(submission().with_target_price(dec("120"))).unwrap();
        assert!(report.implied_upside.is_none());

        let report = derive_report(submission().with_current_price(dec("100"))).unwrap();
        assert!(report.implied_upside.is_none());
    }

    #[test]
    fn test_implied_upside_absent_for_non_positive_price() {
        assert!(implied_upside(Some(&dec("120")), Some(&dec("0"))).is_none());
        assert!(implied_upside(Some(&dec("120")), Some(&dec("-5.50"))).is_none());
    }

    #[test]
    fn test_missing_rating_is_rejected() {
        let mut submission = submission();
        submission.rating = None;

        let err = derive_report(submission).unwrap_err();
        assert_eq!(err, ValidationError::MissingRating);
    }

    #[test]
    fn test_other_fields_pass_through() {
        let published_at = Utc::now();
        let mut input = submission()
            .with_previous_rating(Rating::Hold)
            .with_target_price(dec("105"));
        input.tags = vec!["Switzerland".into(), "Dividend".into()];
        input.full_text = Some("Full analysis".into());

        let report = derive_report_at(input.clone(), published_at).unwrap();

        assert_eq!(report.id, None);
        assert_eq!(report.published_at, published_at);
        assert_eq!(report.title, input.title);
        assert_eq!(report.security_id, 7);
        assert_eq!(report.previous_rating, Some(Rating::Hold));
        assert_eq!(report.target_price, Some(dec("105")));
        assert_eq!(report.tags, input.tags);
        assert_eq!(report.full_text.as_deref(), Some("Full analysis"));
    }
}
