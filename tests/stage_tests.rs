use tripforge::booking::{airbnb_url, google_images_url, kayak_url, skyscanner_url};
use tripforge::request::TripRequest;
use tripforge::stage::{
    marker_strings, travel_stages, ACCOMMODATION_PLACEHOLDER, COMPLETION_SENTINEL,
    FLIGHTS_PLACEHOLDER,
};

fn request() -> TripRequest {
    TripRequest::new("Tokyo", "Japan", "2025-10-10", "2025-10-17")
        .unwrap()
        .with_priority("food")
        .with_budget_level("moderate")
}

#[test]
fn test_five_stages_in_fixed_order() {
    let stages = travel_stages(&request());
    let names: Vec<&str> = stages.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "ItineraryAgent",
            "ImagesAgent",
            "FlightsAgent",
            "AccommodationAgent",
            "CriticAgent"
        ]
    );
}

#[test]
fn test_handoff_markers_chain_the_stages() {
    let stages = travel_stages(&request());
    assert_eq!(
        stages[0].completion_marker.as_deref(),
        Some("ITINERARY_COMPLETE - Ready for ImagesAgent")
    );
    assert_eq!(
        stages[1].completion_marker.as_deref(),
        Some("IMAGES_COMPLETE - Ready for FlightsAgent")
    );
    assert_eq!(
        stages[2].completion_marker.as_deref(),
        Some("FLIGHTS_COMPLETE - Ready for AccommodationAgent")
    );
    assert_eq!(
        stages[3].completion_marker.as_deref(),
        Some("ACCOMMODATION_COMPLETE - Ready for CriticAgent")
    );
    // The terminal stage signals through the sentinel, not a hand-off marker.
    assert_eq!(stages[4].completion_marker, None);
}

#[test]
fn test_itinerary_instructions_seed_the_placeholders() {
    let stages = travel_stages(&request());
    let itinerary = &stages[0].instructions;
    assert!(itinerary.contains(FLIGHTS_PLACEHOLDER));
    assert!(itinerary.contains(ACCOMMODATION_PLACEHOLDER));
    assert!(itinerary.contains("Tokyo, Japan"));
    assert!(itinerary.contains("7 days"));
    assert!(itinerary.contains("food"));
    assert!(itinerary.contains("moderate"));
}

#[test]
fn test_placeholder_ownership() {
    let stages = travel_stages(&request());
    assert_eq!(stages[2].placeholder.as_deref(), Some(FLIGHTS_PLACEHOLDER));
    assert_eq!(
        stages[3].placeholder.as_deref(),
        Some(ACCOMMODATION_PLACEHOLDER)
    );
    assert_eq!(stages[0].placeholder, None);
    assert_eq!(stages[4].placeholder, None);
}

#[test]
fn test_flights_stage_embeds_exact_urls_when_airports_known() {
    let request = request()
        .with_departure_airport("LHR")
        .with_destination_airport("NRT");
    let stages = travel_stages(&request);
    let flights = &stages[2].instructions;

    assert!(flights.contains(
        "https://www.kayak.co.uk/flights/LHR-NRT/2025-10-10/2025-10-17?sort=bestflight_a"
    ));
    assert!(flights
        .contains("https://www.skyscanner.net/transport/flights/lhr/nrt/251010/251017/"));
}

#[test]
fn test_flights_stage_describes_formats_when_airports_unknown() {
    let stages = travel_stages(&request());
    let flights = &stages[2].instructions;
    assert!(flights.contains("infer an appropriate airport"));
    assert!(flights.contains("2025-10-10"));
    assert!(flights.contains("251010"));
}

#[test]
fn test_accommodation_stage_embeds_airbnb_example() {
    let stages = travel_stages(&request());
    let accommodation = &stages[3].instructions;
    assert!(accommodation.contains(
        "https://www.airbnb.co.uk/s/Tokyo--Japan/homes?checkin=2025-10-10&checkout=2025-10-17&adults=2"
    ));
}

#[test]
fn test_critic_stage_mentions_sentinel() {
    let stages = travel_stages(&request());
    assert!(stages[4].instructions.contains(COMPLETION_SENTINEL));
}

#[test]
fn test_marker_strings_cover_all_handoffs_plus_sentinel() {
    let stages = travel_stages(&request());
    let markers = marker_strings(&stages, COMPLETION_SENTINEL);
    assert_eq!(markers.len(), 5);
    assert_eq!(markers.last().map(String::as_str), Some("DOCUMENT_READY"));
}

#[test]
fn test_booking_url_formats() {
    let depart = request().depart_date;
    let ret = request().return_date;

    assert_eq!(
        google_images_url("Senso-ji Temple, Tokyo"),
        "https://www.google.com/search?q=Senso-ji+Temple%2C+Tokyo&tbm=isch"
    );
    assert_eq!(
        kayak_url("lhr", "nrt", depart, ret),
        "https://www.kayak.co.uk/flights/LHR-NRT/2025-10-10/2025-10-17?sort=bestflight_a"
    );
    assert_eq!(
        skyscanner_url("LHR", "NRT", depart, ret),
        "https://www.skyscanner.net/transport/flights/lhr/nrt/251010/251017/"
    );
    assert_eq!(
        airbnb_url("Shinjuku, Tokyo", depart, ret),
        "https://www.airbnb.co.uk/s/Shinjuku--Tokyo/homes?checkin=2025-10-10&checkout=2025-10-17&adults=2"
    );
}
