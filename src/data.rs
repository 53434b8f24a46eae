//! Built-in reference table of Australian ski resorts.

use crate::error::ResortError;
use crate::resort::{Resort, ResortRecord, build_resorts};

/// resort, rating (0–5), difficulty (0–3), lifts, adult, youth, child,
/// accommodation, access, elevation, season
type Row = (
    &'static str,
    f64,
    f64,
    u32,
    f64,
    f64,
    f64,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
);

static REFERENCE_ROWS: &[Row] = &[
    ("BawBaw", 2.5, 1.3, 7, 89.0, 68.0, 54.0, "avg", "car", "1450m - 1560m", "mid june - late sep"),
    ("Hotham", 3.7, 2.2, 14, 243.0, 134.0, 0.0, "above avg", "car, train, plane", "1450m - 1845m", "early june - late sep"),
    ("Falls Creek", 3.6, 2.040816327, 15, 243.0, 134.0, 0.0, "above avg", "car, train, plane", "1500m - 1780m", "early june - late sep"),
    ("Buller", 3.7, 2.149473684, 20, 243.0, 140.0, 140.0, "above avg", "car, train, plane", "1380m - 1780m", "early june - early oct"),
    ("Selwyn", 2.6, 1.2, 8, 119.0, 95.0, 35.0, "avg", "car", "1492m - 1614m", "mid june - early sep"),
    ("Thredbo", 3.8, 1.942307692, 15, 240.0, 129.0, 140.0, "above avg", "car, train, plane", "1365m - 2037m", "early june - late sep"),
    ("Perisher", 3.7, 1.769230769, 47, 264.0, 145.0, 0.0, "above avg", "car, train, plane", "1605m - 2034m", "mid june - early oct"),
    ("Charlotte", 2.6, 2.0, 4, 175.0, 0.0, 114.0, "avg", "car, train, plane", "1765m - 1954m", "mid june - late sep"),
];

/// The reference resort table as raw records.
pub fn reference_records() -> Vec<ResortRecord> {
    REFERENCE_ROWS
        .iter()
        .map(
            |&(resort, rating, difficulty, lifts, adult, youth, child, accom, access, elevation, season)| {
                ResortRecord {
                    resort: resort.to_string(),
                    rating_5: rating,
                    difficulty_3: difficulty,
                    lifts,
                    adult_price: adult,
                    youth_price: youth,
                    child_price: child,
                    accom_level: accom.to_string(),
                    access: access.to_string(),
                    elevation: elevation.to_string(),
                    season_text: season.to_string(),
                }
            },
        )
        .collect()
}

/// The reference resort table with seasons parsed for `year`.
pub fn reference_resorts(year: i32) -> Result<Vec<Resort>, ResortError> {
    build_resorts(&reference_records(), year)
}
