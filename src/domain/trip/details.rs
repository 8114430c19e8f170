//! Trip header fields and their validation.

use crate::domain::foundation::{Timestamp, ValidationError};

pub const NAME_MAX: usize = 100;
pub const NOTES_MAX: usize = 1000;

/// Validated header of a trip.
#[derive(Debug, Clone, PartialEq)]
pub struct TripDetails {
    pub trip_name: String,
    pub destination_city: String,
    pub destination_country: String,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub notes: String,
    pub is_public: bool,
    pub budget: f64,
}

/// Raw create request, before validation.
#[derive(Debug, Clone, Default)]
pub struct TripDraft {
    pub trip_name: Option<String>,
    pub destination_city: Option<String>,
    pub destination_country: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub notes: Option<String>,
    pub is_public: Option<bool>,
    pub budget: Option<f64>,
}

/// Partial edit. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct TripUpdate {
    pub trip_name: Option<String>,
    pub destination_city: Option<String>,
    pub destination_country: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub notes: Option<String>,
    pub is_public: Option<bool>,
    pub budget: Option<f64>,
}

impl TripDetails {
    /// Validates a create request, reporting every failing field.
    pub fn from_draft(draft: TripDraft) -> Result<Self, Vec<ValidationError>> {
        let mut errors = Vec::new();

        let trip_name = bounded_text(
            draft.trip_name.as_deref().unwrap_or(""),
            "tripName",
            "Trip name must be between 1 and 100 characters",
            &mut errors,
        );
        let destination_city = bounded_text(
            draft.destination_city.as_deref().unwrap_or(""),
            "destinationCity",
            "Destination city is required and must be less than 100 characters",
            &mut errors,
        );
        let destination_country = bounded_text(
            draft.destination_country.as_deref().unwrap_or(""),
            "destinationCountry",
            "Destination country is required and must be less than 100 characters",
            &mut errors,
        );
        let start_date = date(
            draft.start_date.as_deref().unwrap_or(""),
            "startDate",
            "Start date must be a valid date",
            &mut errors,
        );
        let end_date = date(
            draft.end_date.as_deref().unwrap_or(""),
            "endDate",
            "End date must be a valid date",
            &mut errors,
        );
        let notes = notes(draft.notes.as_deref().unwrap_or(""), &mut errors);
        let budget = budget(draft.budget.unwrap_or(0.0), &mut errors);

        if let (Some(start), Some(end)) = (start_date, end_date) {
            check_order(&start, &end, &mut errors);
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        let (
            Some(trip_name),
            Some(destination_city),
            Some(destination_country),
            Some(start_date),
            Some(end_date),
            Some(notes),
            Some(budget),
        ) = (
            trip_name,
            destination_city,
            destination_country,
            start_date,
            end_date,
            notes,
            budget,
        )
        else {
            return Err(errors);
        };

        Ok(Self {
            trip_name,
            destination_city,
            destination_country,
            start_date,
            end_date,
            notes,
            is_public: draft.is_public.unwrap_or(false),
            budget,
        })
    }

    /// Merges an edit; date ordering is checked on the merged result.
    pub fn merge(&self, update: TripUpdate) -> Result<Self, Vec<ValidationError>> {
        let mut errors = Vec::new();
        let mut next = self.clone();

        if let Some(name) = update.trip_name {
            if let Some(v) = bounded_text(
                &name,
                "tripName",
                "Trip name must be between 1 and 100 characters",
                &mut errors,
            ) {
                next.trip_name = v;
            }
        }
        if let Some(city) = update.destination_city {
            if let Some(v) = bounded_text(
                &city,
                "destinationCity",
                "Destination city must be less than 100 characters",
                &mut errors,
            ) {
                next.destination_city = v;
            }
        }
        if let Some(country) = update.destination_country {
            if let Some(v) = bounded_text(
                &country,
                "destinationCountry",
                "Destination country must be less than 100 characters",
                &mut errors,
            ) {
                next.destination_country = v;
            }
        }
        if let Some(raw) = update.start_date {
            if let Some(v) = date(&raw, "startDate", "Start date must be a valid date", &mut errors) {
                next.start_date = v;
            }
        }
        if let Some(raw) = update.end_date {
            if let Some(v) = date(&raw, "endDate", "End date must be a valid date", &mut errors) {
                next.end_date = v;
            }
        }
        if let Some(raw) = update.notes {
            if let Some(v) = notes(&raw, &mut errors) {
                next.notes = v;
            }
        }
        if let Some(is_public) = update.is_public {
            next.is_public = is_public;
        }
        if let Some(raw) = update.budget {
            if let Some(v) = budget(raw, &mut errors) {
                next.budget = v;
            }
        }

        if errors.is_empty() {
            check_order(&next.start_date, &next.end_date, &mut errors);
        }

        if errors.is_empty() {
            Ok(next)
        } else {
            Err(errors)
        }
    }
}

fn bounded_text(
    raw: &str,
    field: &str,
    message: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<String> {
    let trimmed = raw.trim();
    let len = trimmed.chars().count();
    if len == 0 || len > NAME_MAX {
        errors.push(ValidationError::out_of_range(field, message));
        return None;
    }
    Some(trimmed.to_string())
}

fn date(raw: &str, field: &str, message: &str, errors: &mut Vec<ValidationError>) -> Option<Timestamp> {
    match Timestamp::parse_iso(raw) {
        Some(ts) => Some(ts),
        None => {
            errors.push(ValidationError::invalid_format(field, message));
            None
        }
    }
}

fn notes(raw: &str, errors: &mut Vec<ValidationError>) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.chars().count() > NOTES_MAX {
        errors.push(ValidationError::out_of_range(
            "notes",
            "Notes must be less than 1000 characters",
        ));
        return None;
    }
    Some(trimmed.to_string())
}

fn budget(raw: f64, errors: &mut Vec<ValidationError>) -> Option<f64> {
    if !raw.is_finite() || raw < 0.0 {
        errors.push(ValidationError::out_of_range(
            "budget",
            "Budget must be a non-negative number",
        ));
        return None;
    }
    Some(raw)
}

fn check_order(start: &Timestamp, end: &Timestamp, errors: &mut Vec<ValidationError>) {
    if !end.is_after(start) {
        errors.push(ValidationError::invalid_format(
            "endDate",
            "End date must be after start date",
        ));
    }
}
