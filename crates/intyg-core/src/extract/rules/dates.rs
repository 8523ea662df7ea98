//! Date and service-period extraction.
//!
//! Accepts `YYYY-MM-DD`, `YY-MM-DD`, `D/M YYYY` and compact `YYYYMMDD` /
//! `YYMMDD`, with `.`, `-`, `/` or space between the parts. Two-digit years
//! are read as 20YY. A compact date directly followed by four more digits is
//! a personal id and is never taken as a date.

use chrono::NaiveDate;
use regex::Captures;

use super::patterns::{DATE_TOKEN, PERSONAL_ID_TAIL, RANGE_JOINER};
use super::text::tidy;
use super::{ExtractionMatch, FieldExtractor};
use crate::models::certificate::ServicePeriod;

/// Date field extractor.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<NaiveDate>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for caps in DATE_TOKEN.captures_iter(text) {
            let Some(full_match) = caps.get(0) else {
                continue;
            };

            // Compact forms only: a separated date is never a personal id head
            let compact = caps.get(7).is_some() || caps.get(10).is_some();
            if compact && PERSONAL_ID_TAIL.is_match(&text[full_match.end()..]) {
                continue;
            }

            if let Some(date) = date_from_captures(&caps) {
                results.push(
                    ExtractionMatch::new(date, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                );
            }
        }

        results
    }
}

fn group(caps: &Captures<'_>, i: usize) -> Option<u32> {
    caps.get(i).and_then(|m| m.as_str().parse().ok())
}

fn date_from_captures(caps: &Captures<'_>) -> Option<NaiveDate> {
    let (year, month, day) = if let Some(year) = group(caps, 1) {
        (year, group(caps, 2)?, group(caps, 3)?)
    } else if let Some(first) = group(caps, 4) {
        let second = group(caps, 5)?;
        let third_raw = caps.get(6)?.as_str();
        let third: u32 = third_raw.parse().ok()?;
        if third_raw.len() == 4 || third > 31 {
            // D/M/Y
            (third, second, first)
        } else {
            // YY-MM-DD
            (first, second, third)
        }
    } else if let Some(year) = group(caps, 7) {
        (year, group(caps, 8)?, group(caps, 9)?)
    } else {
        (group(caps, 10)?, group(caps, 11)?, group(caps, 12)?)
    };

    NaiveDate::from_ymd_opt(expand_year(year) as i32, month, day)
}

fn expand_year(year: u32) -> u32 {
    if year < 100 { 2000 + year } else { year }
}

/// ISO 8601 representation used throughout the records.
pub fn to_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// First two dates found anywhere in the text, as (start, end).
pub fn extract_dates(text: &str) -> (Option<NaiveDate>, Option<NaiveDate>) {
    let mut dates = DateExtractor::new().extract_all(text).into_iter().map(|m| m.value);
    (dates.next(), dates.next())
}

/// Two dates joined by a dash (or "till"), with the byte span they cover.
fn find_range(text: &str) -> Option<(NaiveDate, NaiveDate, usize, usize)> {
    let tokens = DateExtractor::new().extract_all(text);
    tokens.windows(2).find_map(|pair| {
        let (start, end) = (&pair[0], &pair[1]);
        let (s0, s1) = start.position?;
        let (e0, e1) = end.position?;
        RANGE_JOINER
            .is_match(&text[s1..e0])
            .then_some((start.value, end.value, s0, e1))
    })
}

/// Service period from a short field value such as `270101-270401`.
///
/// Prefers an explicit range; otherwise takes the first two dates found.
pub fn extract_period(text: &str) -> Option<ServicePeriod> {
    if let Some((start, end, _, _)) = find_range(text) {
        return Some(ServicePeriod {
            start_date: Some(to_iso(start)),
            end_date: Some(to_iso(end)),
        });
    }

    let (start, end) = extract_dates(text);
    let period = ServicePeriod {
        start_date: start.map(to_iso),
        end_date: end.map(to_iso),
    };
    (!period.is_empty()).then_some(period)
}

/// Service period only when an explicit range is present.
///
/// Safe to run over a whole document, where stray single dates (signing date,
/// form revision) must not be mistaken for the service period.
pub fn extract_period_range(text: &str) -> Option<ServicePeriod> {
    find_range(text).map(|(start, end, _, _)| ServicePeriod {
        start_date: Some(to_iso(start)),
        end_date: Some(to_iso(end)),
    })
}

/// Split a combined "site and period" value into the text and the period.
pub fn split_text_and_period(line: &str) -> (Option<String>, Option<ServicePeriod>) {
    if let Some((start, end, s, e)) = find_range(line) {
        let rest = format!("{} {}", &line[..s], &line[e..]);
        let period = ServicePeriod {
            start_date: Some(to_iso(start)),
            end_date: Some(to_iso(end)),
        };
        return (non_empty(tidy(&rest)), Some(period));
    }

    let tokens = DateExtractor::new().extract_all(line);
    if tokens.is_empty() {
        return (non_empty(tidy(line)), None);
    }

    let mut rest = String::with_capacity(line.len());
    let mut cursor = 0;
    for token in tokens.iter().take(2) {
        if let Some((s, e)) = token.position {
            rest.push_str(&line[cursor..s]);
            rest.push(' ');
            cursor = e;
        }
    }
    rest.push_str(&line[cursor..]);

    let mut dates = tokens.iter().map(|t| to_iso(t.value));
    let period = ServicePeriod {
        start_date: dates.next(),
        end_date: dates.next(),
    };
    (non_empty(tidy(&rest)), Some(period))
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn period(start: &str, end: &str) -> ServicePeriod {
        ServicePeriod {
            start_date: Some(start.to_string()),
            end_date: Some(end.to_string()),
        }
    }

    #[test]
    fn test_compact_range() {
        assert_eq!(extract_period("270101-270401"), Some(period("2027-01-01", "2027-04-01")));
        assert_eq!(extract_period("270101 - 270401"), Some(period("2027-01-01", "2027-04-01")));
    }

    #[test]
    fn test_iso_range_with_en_dash() {
        assert_eq!(
            extract_period("2025-01-01 \u{2013} 2025-04-01"),
            Some(period("2025-01-01", "2025-04-01"))
        );
        assert_eq!(
            extract_period("2025.01.01 till 2025/04/01"),
            Some(period("2025-01-01", "2025-04-01"))
        );
    }

    #[test]
    fn test_day_month_year() {
        assert_eq!(
            extract_period("1/10 2024 - 31/12 2024"),
            Some(period("2024-10-01", "2024-12-31"))
        );
    }

    #[test]
    fn test_personal_id_is_not_a_date() {
        assert_eq!(extract_period("861027-4857"), None);
        assert_eq!(extract_period("19861027-4857"), None);
    }

    #[test]
    fn test_invalid_calendar_date_dropped() {
        assert_eq!(extract_period("271301-271399"), None);
        assert_eq!(
            extract_period("270230-270401"),
            Some(ServicePeriod {
                start_date: Some("2027-04-01".to_string()),
                end_date: None,
            })
        );
    }

    #[test]
    fn test_range_only_ignores_single_dates() {
        assert_eq!(extract_period_range("Ort och datum Lund 2025-05-02"), None);
        assert_eq!(
            extract_period_range("Period 250101-250401\nLund 2025-05-02"),
            Some(period("2025-01-01", "2025-04-01"))
        );
    }

    #[test]
    fn test_split_site_and_period() {
        let (site, p) = split_text_and_period("Kirurgkliniken, Lund 250101-250401");
        assert_eq!(site.as_deref(), Some("Kirurgkliniken, Lund"));
        assert_eq!(p, Some(period("2025-01-01", "2025-04-01")));

        let (site, p) = split_text_and_period("Medicinkliniken Malmö");
        assert_eq!(site.as_deref(), Some("Medicinkliniken Malmö"));
        assert_eq!(p, None);
    }

    #[test]
    fn test_extract_dates_two_digit_year() {
        let (start, end) = extract_dates("24.01.15");
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(end, None);
    }
}
