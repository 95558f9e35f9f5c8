//! Structured trip request.
//!
//! [`TripRequest`] is the validated, normalised input to a pipeline run.
//! Priority and budget arrive as free-form strings at the API boundary and are
//! normalised (lower-cased, trimmed) into closed enums at construction;
//! unrecognised values fall back to the defaults rather than erroring, since
//! they only steer prompt wording. Date ordering *is* validated: a run with an
//! inverted range can never produce a sensible itinerary.

use crate::tripforge::pipeline::PipelineError;
use chrono::NaiveDate;

/// What the traveller cares most about. Drives the interest phrase embedded in
/// the task prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Scenery,
    Food,
    History,
    Culture,
    All,
}

impl Priority {
    /// Normalise a free-form priority tag. Unrecognised input falls back to
    /// [`Priority::All`].
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "scenery" => Priority::Scenery,
            "food" => Priority::Food,
            "history" => Priority::History,
            "culture" => Priority::Culture,
            _ => Priority::All,
        }
    }

    /// The normalised tag as it appears in prompts and the wire API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Scenery => "scenery",
            Priority::Food => "food",
            Priority::History => "history",
            Priority::Culture => "culture",
            Priority::All => "all",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Budget tier mentioned in the task prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetLevel {
    Budget,
    Moderate,
    Flexible,
    Luxury,
}

impl BudgetLevel {
    /// Normalise a free-form budget tag. Unrecognised input falls back to
    /// [`BudgetLevel::Flexible`].
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "budget" => BudgetLevel::Budget,
            "moderate" => BudgetLevel::Moderate,
            "flexible" => BudgetLevel::Flexible,
            "luxury" => BudgetLevel::Luxury,
            _ => BudgetLevel::Flexible,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetLevel::Budget => "budget",
            BudgetLevel::Moderate => "moderate",
            BudgetLevel::Flexible => "flexible",
            BudgetLevel::Luxury => "luxury",
        }
    }
}

impl std::fmt::Display for BudgetLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated travel planning request.
///
/// # Examples
///
/// ```
/// use tripforge::request::{Priority, TripRequest};
///
/// let request = TripRequest::new("Tokyo", "Japan", "2025-10-10", "2025-10-17")
///     .unwrap()
///     .with_priority("food")
///     .with_departure_airport("LHR");
///
/// assert_eq!(request.priority, Priority::Food);
/// assert_eq!(request.duration_days(), 7);
/// ```
#[derive(Debug, Clone)]
pub struct TripRequest {
    pub destination_city: String,
    pub destination_country: String,
    pub depart_date: NaiveDate,
    pub return_date: NaiveDate,
    pub priority: Priority,
    pub budget_level: BudgetLevel,
    /// IATA code; stages infer a sensible airport when absent.
    pub departure_airport: Option<String>,
    /// IATA code; stages infer a sensible airport when absent.
    pub destination_airport: Option<String>,
    /// Free-text preferences, appended verbatim to the task prompt.
    pub additional_preferences: Option<String>,
}

impl TripRequest {
    /// Create a request with the mandatory fields, parsing ISO (`YYYY-MM-DD`)
    /// dates and validating that the departure does not come after the return.
    ///
    /// Priority defaults to `all` and budget to `flexible`; override with the
    /// `with_*` builders.
    ///
    /// # Errors
    ///
    /// [`PipelineError::InvalidDateRange`] when either date fails to parse or
    /// `depart_date > return_date`.
    pub fn new(
        destination_city: impl Into<String>,
        destination_country: impl Into<String>,
        depart_date: &str,
        return_date: &str,
    ) -> Result<Self, PipelineError> {
        let parse = |raw: &str| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| PipelineError::InvalidDateRange(format!("invalid date '{}'", raw)))
        };
        let depart = parse(depart_date)?;
        let ret = parse(return_date)?;
        if depart > ret {
            return Err(PipelineError::InvalidDateRange(format!(
                "depart date {} is after return date {}",
                depart, ret
            )));
        }

        Ok(TripRequest {
            destination_city: destination_city.into(),
            destination_country: destination_country.into(),
            depart_date: depart,
            return_date: ret,
            priority: Priority::All,
            budget_level: BudgetLevel::Flexible,
            departure_airport: None,
            destination_airport: None,
            additional_preferences: None,
        })
    }

    /// Set the priority tag (normalised; unknown values fall back to `all`).
    pub fn with_priority(mut self, priority: &str) -> Self {
        self.priority = Priority::parse(priority);
        self
    }

    /// Set the budget tier (normalised; unknown values fall back to `flexible`).
    pub fn with_budget_level(mut self, budget: &str) -> Self {
        self.budget_level = BudgetLevel::parse(budget);
        self
    }

    pub fn with_departure_airport(mut self, code: impl Into<String>) -> Self {
        self.departure_airport = Some(code.into());
        self
    }

    pub fn with_destination_airport(mut self, code: impl Into<String>) -> Self {
        self.destination_airport = Some(code.into());
        self
    }

    pub fn with_additional_preferences(mut self, preferences: impl Into<String>) -> Self {
        self.additional_preferences = Some(preferences.into());
        self
    }

    /// Trip length in days (`return - depart`). Zero for a same-day trip.
    pub fn duration_days(&self) -> i64 {
        (self.return_date - self.depart_date).num_days()
    }

    /// `"City, Country"` as used in prompts and document headings.
    pub fn destination(&self) -> String {
        format!("{}, {}", self.destination_city, self.destination_country)
    }
}
