//! Task prompt generation.
//!
//! Turns a [`TripRequest`] into the natural-language task text handed to the
//! first pipeline stage. Pure and deterministic: no I/O, no clock reads, same
//! output for the same request.

use crate::tripforge::request::{Priority, TripRequest};

/// Natural-language interest phrase for a priority tag.
///
/// The table is exhaustive over [`Priority`]; free-form input was already
/// collapsed onto the enum (unknown tags become `All`) at request construction.
pub fn interest_phrase(priority: Priority) -> &'static str {
    match priority {
        Priority::Scenery => "seeing beautiful landscapes, scenic views, and natural attractions",
        Priority::Food => "trying authentic local cuisine, visiting markets, and food experiences",
        Priority::History => "exploring historical sites, museums, and cultural landmarks",
        Priority::Culture => "experiencing local culture, traditions, and authentic activities",
        Priority::All => {
            "experiencing everything the destination has to offer - culture, food, history, and scenery"
        }
    }
}

/// Build the task prompt that seeds the document pipeline.
///
/// Embeds destination, formatted dates, trip duration, airport mentions (with
/// generic fallback text when absent), the interest phrase, and the budget
/// tier; free-text preferences are appended verbatim when present.
///
/// # Examples
///
/// ```
/// use tripforge::prompt::build_travel_prompt;
/// use tripforge::request::TripRequest;
///
/// let request = TripRequest::new("Tokyo", "Japan", "2025-10-10", "2025-10-17")
///     .unwrap()
///     .with_priority("food");
///
/// let prompt = build_travel_prompt(&request);
/// assert!(prompt.contains("Tokyo, Japan"));
/// assert!(prompt.contains("7 days"));
/// assert!(prompt.contains("trying authentic local cuisine"));
/// ```
pub fn build_travel_prompt(request: &TripRequest) -> String {
    let duration = request.duration_days();
    let depart_formatted = request.depart_date.format("%B %d, %Y").to_string();
    let return_formatted = request.return_date.format("%B %d, %Y").to_string();

    let interests = interest_phrase(request.priority);

    let departure_info = match &request.departure_airport {
        Some(code) => format!("from {}", code),
        None => "from my location".to_string(),
    };
    let destination_info = match &request.destination_airport {
        Some(code) => format!("to {}", code),
        None => String::new(),
    };

    let mut prompt = format!(
        "I want to plan a trip to {destination} for {duration} days from {depart} to {ret}.\n\n\
         I'll be traveling {departure_info} {destination_info}. \n\n\
         I'm interested in {interests}.\n\n\
         I need help with flights, accommodation, and a detailed itinerary. \
         My budget is {budget} but I prefer good value options.",
        destination = request.destination(),
        duration = duration,
        depart = depart_formatted,
        ret = return_formatted,
        departure_info = departure_info,
        destination_info = destination_info,
        interests = interests,
        budget = request.budget_level,
    );

    if let Some(preferences) = &request.additional_preferences {
        prompt.push_str(&format!("\n\nAdditional preferences: {}", preferences));
    }

    prompt
}
