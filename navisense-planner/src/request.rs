//! Planning request assembly
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::constants::{DEFAULT_BUDGET, DEFAULT_CURRENCY, DEFAULT_GROUP_SIZE, DEFAULT_PACE};
use crate::form::{GroupSize, TripForm, non_blank};
use crate::wizard::{BudgetTier, Pace, ValidationError, WizardState};

/// Immutable snapshot posted to the itinerary service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    #[serde(rename = "from")]
    pub origin: String,
    #[serde(rename = "to")]
    pub destination: String,
    pub start_date: NaiveDate,
    pub nights: u32,
    pub budget: BudgetTier,
    pub purposes: Vec<String>,
    pub pace: Pace,
    pub checkpoints: Vec<String>,
    pub accommodation: Option<String>,
    pub group_size: GroupSize,
    pub special_needs: Option<String>,
    pub total_budget: Option<f64>,
    pub currency: String,
}

impl PlanRequest {
    /// Days spanned by the trip.
    #[must_use]
    pub const fn days(&self) -> u32 {
        self.nights + 1
    }
}

fn currency_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[A-Z]{3}$").ok())
        .as_ref()
}

#[must_use]
pub fn is_currency_code_valid(code: &str) -> bool {
    currency_pattern().is_some_and(|re| re.is_match(code))
}

/// Assemble the request from the wizard selections and the trip form.
///
/// Every wizard step is re-validated first, so a request can only exist for a
/// fully valid wizard.
///
/// # Errors
///
/// Returns the first failing step's [`ValidationError`], or
/// [`ValidationError::InvalidCurrency`] for a malformed currency.
pub fn build_request(
    wizard: &WizardState,
    form: &TripForm,
    today: NaiveDate,
) -> Result<PlanRequest, ValidationError> {
    wizard.validate_all(form, today)?;
    let start_date = form.start_date.ok_or(ValidationError::MissingStartDate)?;

    let currency = form
        .currency
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map_or_else(|| DEFAULT_CURRENCY.to_string(), str::to_ascii_uppercase);
    if !is_currency_code_valid(&currency) {
        return Err(ValidationError::InvalidCurrency(currency));
    }

    Ok(PlanRequest {
        origin: form.origin.trim().to_string(),
        destination: form.destination.trim().to_string(),
        start_date,
        nights: wizard.nights(),
        budget: wizard.selected_budget.unwrap_or(DEFAULT_BUDGET),
        purposes: wizard.selected_purposes().to_vec(),
        pace: wizard.selected_pace.unwrap_or(DEFAULT_PACE),
        checkpoints: wizard.checkpoints().to_vec(),
        accommodation: non_blank(form.accommodation.as_deref()),
        group_size: form.group_size.unwrap_or(DEFAULT_GROUP_SIZE),
        special_needs: non_blank(form.special_needs.as_deref()),
        total_budget: form.total_budget.filter(|b| b.is_finite() && *b > 0.0),
        currency,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn ready() -> (WizardState, TripForm) {
        let mut wizard = WizardState::new();
        wizard.select_budget(BudgetTier::Budget);
        wizard.toggle_purpose("food");
        wizard.select_pace(Pace::Fast);
        wizard.add_checkpoint("Lonavala");
        wizard.set_nights(3);
        let form = TripForm {
            origin: "  Mumbai ".to_string(),
            destination: " Goa\t".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 12, 20),
            accommodation: Some("  ".to_string()),
            special_needs: Some(" wheelchair access ".to_string()),
            total_budget: Some(0.0),
            ..TripForm::default()
        };
        (wizard, form)
    }

    #[test]
    fn builds_trimmed_request_with_defaults() {
        let (wizard, form) = ready();
        let request = build_request(&wizard, &form, today()).unwrap();
        assert_eq!(request.origin, "Mumbai");
        assert_eq!(request.destination, "Goa");
        assert_eq!(request.group_size, GroupSize::Couple);
        assert_eq!(request.currency, "INR");
        assert_eq!(request.accommodation, None);
        assert_eq!(request.special_needs.as_deref(), Some("wheelchair access"));
        assert_eq!(request.total_budget, None);
        assert_eq!(request.days(), 4);
    }

    #[test]
    fn refuses_before_wizard_is_complete() {
        let (mut wizard, form) = ready();
        wizard.selected_pace = None;
        assert_eq!(
            build_request(&wizard, &form, today()),
            Err(ValidationError::MissingPace)
        );
        let blank = TripForm::default();
        assert_eq!(
            build_request(&wizard, &blank, today()),
            Err(ValidationError::MissingOrigin)
        );
    }

    #[test]
    fn currency_is_normalized_and_checked() {
        let (wizard, mut form) = ready();
        form.currency = Some(" usd ".to_string());
        assert_eq!(
            build_request(&wizard, &form, today()).unwrap().currency,
            "USD"
        );
        form.currency = Some("rupees".to_string());
        assert!(matches!(
            build_request(&wizard, &form, today()),
            Err(ValidationError::InvalidCurrency(_))
        ));
    }

    #[test]
    fn serializes_wire_field_names() {
        let (wizard, mut form) = ready();
        form.total_budget = Some(50_000.0);
        let request = build_request(&wizard, &form, today()).unwrap();
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "from": "Mumbai",
                "to": "Goa",
                "start_date": "2026-12-20",
                "nights": 3,
                "budget": "budget",
                "purposes": ["food"],
                "pace": "fast",
                "checkpoints": ["Lonavala"],
                "accommodation": null,
                "group_size": "couple",
                "special_needs": "wheelchair access",
                "total_budget": 50000.0,
                "currency": "INR"
            })
        );
    }
}
