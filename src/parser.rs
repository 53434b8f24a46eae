//! Parser for informal season descriptions such as `"mid june - early oct"`.

use chrono::NaiveDate;

use crate::error::SeasonParseError;

/// Day of month used when a qualifier is not `early`, `mid` or `late`.
pub const DEFAULT_DAY: u32 = 15;

/// Maps a qualifier word onto a day of the month.
///
/// | Qualifier | Day |
/// |-----------|-----|
/// | early     | 7   |
/// | mid       | 15  |
/// | late      | 25  |
/// | other     | 15  |
pub fn qualifier_day(qualifier: &str) -> u32 {
    match qualifier.to_ascii_lowercase().as_str() {
        "early" => 7,
        "mid" => 15,
        "late" => 25,
        _ => DEFAULT_DAY,
    }
}

/// Maps a month token onto its number using the first three letters.
///
/// Only the winter months a resort can be open in are accepted.
pub fn month_number(token: &str) -> Result<u32, SeasonParseError> {
    let prefix: String = token.chars().take(3).collect::<String>().to_lowercase();

    match prefix.as_str() {
        "jun" => Ok(6),
        "jul" => Ok(7),
        "aug" => Ok(8),
        "sep" => Ok(9),
        "oct" => Ok(10),
        _ => Err(SeasonParseError::UnknownMonth {
            token: token.to_string(),
        }),
    }
}

/// Parses one side of a season range, e.g. `"late sep"`.
///
/// Tokens after the month are ignored.
pub fn parse_season_part(part: &str, year: i32) -> Result<NaiveDate, SeasonParseError> {
    let mut tokens = part.split_whitespace();

    let (Some(qualifier), Some(month)) = (tokens.next(), tokens.next()) else {
        return Err(SeasonParseError::MissingToken {
            part: part.trim().to_string(),
        });
    };

    let month = month_number(month)?;
    let day = qualifier_day(qualifier);

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(SeasonParseError::InvalidDate { year, month, day })
}

/// Parses a full season description into `(season_start, season_end)`.
///
/// # Errors
///
/// Returns an error if the text is not two dash-separated parts, a month is
/// not one of jun..oct, or the end date precedes the start date.
pub fn parse_season(text: &str, year: i32) -> Result<(NaiveDate, NaiveDate), SeasonParseError> {
    let parts: Vec<&str> = text.split('-').map(str::trim).collect();

    let [start, end] = parts.as_slice() else {
        return Err(SeasonParseError::Malformed {
            text: text.to_string(),
        });
    };

    let start = parse_season_part(start, year)?;
    let end = parse_season_part(end, year)?;

    if end < start {
        return Err(SeasonParseError::EndBeforeStart { start, end });
    }

    Ok((start, end))
}
