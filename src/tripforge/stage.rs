//! Pipeline stage configuration.
//!
//! A [`StageSpec`] is an immutable record built once per run: a role name, the
//! full instruction text for that role (parameterised by the trip request), an
//! optional placeholder token the stage is responsible for replacing in the
//! shared document, and an optional completion marker the stage appends when
//! done. Nothing here is mutable global state; [`travel_stages`] is a pure
//! function of the request.

use crate::tripforge::booking::{airbnb_url, google_images_url, kayak_url, skyscanner_url};
use crate::tripforge::request::TripRequest;

/// Placeholder the flights stage replaces.
pub const FLIGHTS_PLACEHOLDER: &str = "<!-- FLIGHTS_PLACEHOLDER -->";
/// Placeholder the accommodation stage replaces.
pub const ACCOMMODATION_PLACEHOLDER: &str = "<!-- ACCOMMODATION_PLACEHOLDER -->";
/// Sentinel the terminal stage emits when the document is finished.
pub const COMPLETION_SENTINEL: &str = "DOCUMENT_READY";

/// One step in the fixed stage sequence.
#[derive(Debug, Clone)]
pub struct StageSpec {
    /// Stage identifier, used in version records and events (e.g. `"ItineraryAgent"`).
    pub name: String,
    /// System-prompt text sent on every invocation of this stage.
    pub instructions: String,
    /// Placeholder token this stage replaces in the shared document, if any.
    pub placeholder: Option<String>,
    /// Marker the stage appends to signal hand-off to the next stage, if any.
    /// The terminal stage emits the pipeline sentinel instead.
    pub completion_marker: Option<String>,
}

impl StageSpec {
    pub fn new(name: impl Into<String>, instructions: impl Into<String>) -> Self {
        StageSpec {
            name: name.into(),
            instructions: instructions.into(),
            placeholder: None,
            completion_marker: None,
        }
    }

    pub fn with_placeholder(mut self, token: impl Into<String>) -> Self {
        self.placeholder = Some(token.into());
        self
    }

    pub fn with_completion_marker(mut self, marker: impl Into<String>) -> Self {
        self.completion_marker = Some(marker.into());
        self
    }
}

/// Collect every marker string the extractor must strip: each stage's
/// completion marker plus the pipeline sentinel.
pub fn marker_strings(stages: &[StageSpec], sentinel: &str) -> Vec<String> {
    let mut markers: Vec<String> = stages
        .iter()
        .filter_map(|s| s.completion_marker.clone())
        .collect();
    markers.push(sentinel.to_string());
    markers
}

/// Build the standard five-stage travel pipeline for a request.
///
/// Order is fixed: itinerary skeleton, image links, flights, accommodation,
/// then the terminal critic. Each stage edits the shared document produced by
/// the previous one; the placeholders in the skeleton tell the flights and
/// accommodation stages exactly where to write.
pub fn travel_stages(request: &TripRequest) -> Vec<StageSpec> {
    vec![
        itinerary_stage(request),
        images_stage(),
        flights_stage(request),
        accommodation_stage(request),
        critic_stage(),
    ]
}

fn itinerary_stage(request: &TripRequest) -> StageSpec {
    let instructions = format!(
        r#"You are the lead itinerary planner. You START the travel planning document.

TRIP DETAILS:
- Destination: {destination}
- Priority Focus: {priority}
- Budget Level: {budget}

Create a comprehensive travel plan document in proper markdown tailored to these preferences.

FORMATTING RULES:
1. Start with a clear markdown document structure
2. Use proper markdown headers (# ## ###)
3. Include the placeholder comments below exactly as written so later stages can find and replace them
4. Your output must be a complete, well-formatted markdown document
5. Tailor activities to the priority focus ({priority})

Use this EXACT structure:
```markdown
# {destination} Travel Plan

## Trip Overview
- **Duration:** {duration} days
- **Dates:** {depart} to {ret}
- **Budget:** {budget}
- **Focus:** {priority}

## Recommended Base Locations
[List strategic cities/areas to stay with brief explanations]

## Day-by-Day Itinerary

### Day 1: [Theme/Focus]
**Morning (9:00-12:00)**
- [Activity with specific location and details]

**Afternoon (12:00-17:00)**
- [Activity with specific location and details]

**Evening (17:00-21:00)**
- [Activity with specific location and details]

[Continue for each day...]

{flights_placeholder}

{accommodation_placeholder}

## Travel Tips & Practical Information
[Include local tips, booking advice, cultural notes]
```

After creating the document, end with: "{marker}"."#,
        destination = request.destination(),
        priority = request.priority,
        budget = request.budget_level,
        duration = request.duration_days(),
        depart = request.depart_date.format("%Y-%m-%d"),
        ret = request.return_date.format("%Y-%m-%d"),
        flights_placeholder = FLIGHTS_PLACEHOLDER,
        accommodation_placeholder = ACCOMMODATION_PLACEHOLDER,
        marker = ITINERARY_MARKER,
    );

    StageSpec::new("ItineraryAgent", instructions).with_completion_marker(ITINERARY_MARKER)
}

fn images_stage() -> StageSpec {
    let example = google_images_url("Tokyo, Japan");
    let instructions = format!(
        r###"You are the images specialist. You will receive a complete travel document with a detailed itinerary.

Your job:
1. Take the ENTIRE existing travel document
2. Identify notable locations, attractions, landmarks and restaurants mentioned in the "## Day-by-Day Itinerary" section ONLY
3. Generate a Google Images search URL for each: spaces become +, commas become %2C, format https://www.google.com/search?q=[encoded_location]&tbm=isch
   Example: "Tokyo, Japan" becomes {example}
4. Replace each location name with a markdown link: [Location Name](Google Images URL)
5. Return the COMPLETE updated document

RULES:
- ONLY modify the "## Day-by-Day Itinerary" section; keep everything else exactly the same
- Only link specific places; never link generic words like "train", "hotel", "lunch"

After updating, end with: "{marker}"."###,
        example = example,
        marker = IMAGES_MARKER,
    );

    StageSpec::new("ImagesAgent", instructions).with_completion_marker(IMAGES_MARKER)
}

fn flights_stage(request: &TripRequest) -> StageSpec {
    // When both airports are known the exact URLs are computed here and the
    // model only pastes them; otherwise it infers airports and applies the
    // documented formats.
    let route_help = match (&request.departure_airport, &request.destination_airport) {
        (Some(from), Some(to)) => format!(
            "Route: {from} to {to}. Use EXACTLY these booking URLs:\n\
             - Kayak: {kayak}\n\
             - Skyscanner: {skyscanner}",
            from = from,
            to = to,
            kayak = kayak_url(from, to, request.depart_date, request.return_date),
            skyscanner = skyscanner_url(from, to, request.depart_date, request.return_date),
        ),
        _ => format!(
            "Departure airport: {dep}\nDestination airport: {dest}\n\
             For major cities use the main international airport (Tokyo: NRT or HND, \
             London: LHR, Paris: CDG, New York: JFK).\n\
             Generate booking URLs with these formats:\n\
             - Kayak: https://www.kayak.co.uk/flights/[FROM]-[TO]/{depart}/{ret}?sort=bestflight_a\n\
             - Skyscanner: https://www.skyscanner.net/transport/flights/[from_lower]/[to_lower]/{depart_short}/{ret_short}/ \
             (lowercase codes, YYMMDD dates)",
            dep = request
                .departure_airport
                .as_deref()
                .unwrap_or("Not specified - infer an appropriate airport"),
            dest = request
                .destination_airport
                .as_deref()
                .unwrap_or("Not specified - infer an appropriate airport for the destination"),
            depart = request.depart_date.format("%Y-%m-%d"),
            ret = request.return_date.format("%Y-%m-%d"),
            depart_short = request.depart_date.format("%y%m%d"),
            ret_short = request.return_date.format("%y%m%d"),
        ),
    };

    let instructions = format!(
        r#"You are the flight specialist. You will receive a complete travel document with a flights placeholder.

TRAVEL DATES: {depart} to {ret}

{route_help}

Your job:
1. Take the ENTIRE existing travel document
2. Replace "{placeholder}" with this flight section:

```markdown
## Flight Information

**Route:** [FROM] -> [TO]
**Dates:** {depart} to {ret}

### Booking Links:
- **[Kayak - Compare Prices]([KAYAK_URL])**
- **[Skyscanner - Flexible Dates]([SKYSCANNER_URL])**
```

3. Preserve ALL existing content, including every link added by earlier stages
4. Return the COMPLETE updated document

After updating, end with: "{marker}"."#,
        depart = request.depart_date.format("%Y-%m-%d"),
        ret = request.return_date.format("%Y-%m-%d"),
        route_help = route_help,
        placeholder = FLIGHTS_PLACEHOLDER,
        marker = FLIGHTS_MARKER,
    );

    StageSpec::new("FlightsAgent", instructions)
        .with_placeholder(FLIGHTS_PLACEHOLDER)
        .with_completion_marker(FLIGHTS_MARKER)
}

fn accommodation_stage(request: &TripRequest) -> StageSpec {
    let example = airbnb_url(
        &request.destination(),
        request.depart_date,
        request.return_date,
    );
    let instructions = format!(
        r###"You are the accommodation specialist. You will receive a complete travel document with an accommodation placeholder.

STAY DETAILS:
- Destination: {destination}
- Check-in: {checkin}
- Check-out: {checkout}

For each recommended base location, generate an Airbnb search URL:
https://www.airbnb.co.uk/s/[FORMATTED_DESTINATION]/homes?checkin={checkin}&checkout={checkout}&adults=2
where commas in the location become "--" and spaces become "-".
Example for the destination itself: {example}

Your job:
1. Take the ENTIRE existing travel document
2. Identify each base location in the "## Recommended Base Locations" section
3. Replace "{placeholder}" with:

```markdown
## Accommodation Options

### Recommended Areas:

#### [Location 1 Name]
- **[Browse Airbnb Properties]([AIRBNB_URL_1])**

[Continue for each base location...]

### Booking Tips:
- Book early for better rates and availability
- Consider proximity to public transportation
- Look for properties with flexible cancellation policies
```

4. Return the COMPLETE updated document with all content intact

After completing, end with: "{marker}"."###,
        destination = request.destination(),
        checkin = request.depart_date.format("%Y-%m-%d"),
        checkout = request.return_date.format("%Y-%m-%d"),
        example = example,
        placeholder = ACCOMMODATION_PLACEHOLDER,
        marker = ACCOMMODATION_MARKER,
    );

    StageSpec::new("AccommodationAgent", instructions)
        .with_placeholder(ACCOMMODATION_PLACEHOLDER)
        .with_completion_marker(ACCOMMODATION_MARKER)
}

fn critic_stage() -> StageSpec {
    let instructions = format!(
        r#"You are the quality control critic and final document processor.

Your job:
1. Review the complete travel document for quality and completeness
2. Ensure no placeholder comments remain (no "{flights}" or "{accommodation}")
3. Check that the document follows proper markdown formatting
4. If the document is complete, output "{sentinel}" followed by the final, clean markdown document

If anything is missing or incorrect, provide specific feedback on what needs to be fixed instead."#,
        flights = FLIGHTS_PLACEHOLDER,
        accommodation = ACCOMMODATION_PLACEHOLDER,
        sentinel = COMPLETION_SENTINEL,
    );

    StageSpec::new("CriticAgent", instructions)
}

const ITINERARY_MARKER: &str = "ITINERARY_COMPLETE - Ready for ImagesAgent";
const IMAGES_MARKER: &str = "IMAGES_COMPLETE - Ready for FlightsAgent";
const FLIGHTS_MARKER: &str = "FLIGHTS_COMPLETE - Ready for AccommodationAgent";
const ACCOMMODATION_MARKER: &str = "ACCOMMODATION_COMPLETE - Ready for CriticAgent";
