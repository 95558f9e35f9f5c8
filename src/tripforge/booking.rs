//! Deterministic booking and image-search URL templates.
//!
//! No live data is fetched anywhere in the pipeline: "booking" means handing
//! the traveller a pre-filled search URL on the relevant site. The formats
//! here are baked into the stage instruction templates so the LLM emits links
//! matching these builders.

use chrono::NaiveDate;

/// Google Images search URL for a location name.
///
/// Spaces become `+`, commas `%2C`, everything else is percent-encoded.
///
/// ```
/// use tripforge::booking::google_images_url;
///
/// assert_eq!(
///     google_images_url("Tokyo, Japan"),
///     "https://www.google.com/search?q=Tokyo%2C+Japan&tbm=isch"
/// );
/// ```
pub fn google_images_url(location: &str) -> String {
    let encoded = urlencoding::encode(location).replace("%20", "+");
    format!("https://www.google.com/search?q={}&tbm=isch", encoded)
}

/// Kayak round-trip flight search URL.
///
/// ```
/// use chrono::NaiveDate;
/// use tripforge::booking::kayak_url;
///
/// let depart = NaiveDate::from_ymd_opt(2025, 10, 10).unwrap();
/// let ret = NaiveDate::from_ymd_opt(2025, 10, 17).unwrap();
/// assert_eq!(
///     kayak_url("LHR", "NRT", depart, ret),
///     "https://www.kayak.co.uk/flights/LHR-NRT/2025-10-10/2025-10-17?sort=bestflight_a"
/// );
/// ```
pub fn kayak_url(from: &str, to: &str, depart: NaiveDate, ret: NaiveDate) -> String {
    format!(
        "https://www.kayak.co.uk/flights/{}-{}/{}/{}?sort=bestflight_a",
        from.to_uppercase(),
        to.to_uppercase(),
        depart.format("%Y-%m-%d"),
        ret.format("%Y-%m-%d"),
    )
}

/// Skyscanner round-trip flight search URL.
///
/// Skyscanner wants lowercase airport codes and `YYMMDD` dates.
///
/// ```
/// use chrono::NaiveDate;
/// use tripforge::booking::skyscanner_url;
///
/// let depart = NaiveDate::from_ymd_opt(2025, 10, 10).unwrap();
/// let ret = NaiveDate::from_ymd_opt(2025, 10, 17).unwrap();
/// assert_eq!(
///     skyscanner_url("LHR", "NRT", depart, ret),
///     "https://www.skyscanner.net/transport/flights/lhr/nrt/251010/251017/"
/// );
/// ```
pub fn skyscanner_url(from: &str, to: &str, depart: NaiveDate, ret: NaiveDate) -> String {
    format!(
        "https://www.skyscanner.net/transport/flights/{}/{}/{}/{}/",
        from.to_lowercase(),
        to.to_lowercase(),
        depart.format("%y%m%d"),
        ret.format("%y%m%d"),
    )
}

/// Airbnb stay search URL for a location and date range.
///
/// Commas become `--`, spaces `-`, two adults assumed.
///
/// ```
/// use chrono::NaiveDate;
/// use tripforge::booking::airbnb_url;
///
/// let checkin = NaiveDate::from_ymd_opt(2025, 10, 10).unwrap();
/// let checkout = NaiveDate::from_ymd_opt(2025, 10, 17).unwrap();
/// assert_eq!(
///     airbnb_url("Tokyo, Japan", checkin, checkout),
///     "https://www.airbnb.co.uk/s/Tokyo--Japan/homes?checkin=2025-10-10&checkout=2025-10-17&adults=2"
/// );
/// ```
pub fn airbnb_url(location: &str, checkin: NaiveDate, checkout: NaiveDate) -> String {
    let formatted = location
        .replace(", ", "--")
        .replace(',', "--")
        .replace(' ', "-");
    format!(
        "https://www.airbnb.co.uk/s/{}/homes?checkin={}&checkout={}&adults=2",
        formatted,
        checkin.format("%Y-%m-%d"),
        checkout.format("%Y-%m-%d"),
    )
}
