/// "Area Affected" free-text parser
///
/// Later annual summaries describe the affected area as free text. Two
/// dialects occur:
///
/// - **State-only**: `"Texas: Gulf coast, Louisiana: New Orleans area"`; only
///   the name in front of each colon is kept, as a statewide location.
/// - **County-bearing**: `"Ohio: Lucas County, Wood County; Michigan: Wayne County;"`;
///   semicolon-separated groups, each matching one production:
///
/// ```text
/// group     := statewide | counties | shared
/// statewide := state (", " state)*                -- no ": "
/// counties  := state ": " county (", " county)*   -- one state
/// shared    := state (", " state)+ ": " county    -- several states, one county
/// ```
///
/// Groups that match none of these are rejected instead of guessed at.
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use crate::outage::models::ParsedLocation;
use crate::utils::collapse_whitespace;

/// Separators only count with their trailing space, so "1,200" or "10:30"
/// inside a description stay whole
const STATE_SEP: &str = ": ";
const LIST_SEP: &str = ", ";

const COUNTY_MARKERS: [&str; 2] = ["County", "Parish"];
const COUNTY_SUFFIXES: [&str; 2] = [" County", " Parish"];

/// Placeholders older cleaned files use for "no county"
const NULL_MARKERS: [&str; 3] = ["None", "nan", "NaN"];

/// Complete footnote markers such as "[3]"
static FOOTNOTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\[\]]*\]").expect("Invalid footnote regex"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AreaParseError {
    #[error("segment {segment:?} does not pair every state with a description")]
    UnpairedTokens { segment: String },

    #[error("segment {segment:?} has more than one state/county separator")]
    RepeatedSeparator { segment: String },

    #[error("segment {segment:?} lists several states with several counties")]
    AmbiguousStateList { segment: String },

    #[error("segment {segment:?} has a county without a state")]
    OrphanCounty { segment: String },

    #[error("segment {segment:?} has an empty state name")]
    EmptyState { segment: String },

    #[error("no location found in {text:?}")]
    NoLocations { text: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaDialect {
    StateOnly,
    CountyBearing,
}

impl AreaDialect {
    /// Pick the grammar for a prepared area text
    ///
    /// County/Parish keywords always mean county-bearing text. Without them, a
    /// group holding several "State: description" pairs is state-only; a
    /// single "State: list" per group is read as counties.
    pub fn classify(text: &str) -> Self {
        if COUNTY_MARKERS.iter().any(|marker| text.contains(marker)) {
            return AreaDialect::CountyBearing;
        }
        if groups(text).any(|group| group.matches(STATE_SEP).count() > 1) {
            AreaDialect::StateOnly
        } else {
            AreaDialect::CountyBearing
        }
    }
}

/// Parse one "Area Affected" cell into locations, in reading order
///
/// Blank input yields no locations; any other input yields at least one or
/// an error.
///
/// # Examples
///
/// ```
/// use outage_history::outage::{parse_area, ParsedLocation};
///
/// assert_eq!(
///     parse_area("Ohio: Lucas County, Wood County; Michigan: Wayne County;").unwrap(),
///     vec![
///         ParsedLocation::county("Ohio", "Lucas"),
///         ParsedLocation::county("Ohio", "Wood"),
///         ParsedLocation::county("Michigan", "Wayne"),
///     ]
/// );
/// assert!(parse_area("  ").unwrap().is_empty());
/// ```
pub fn parse_area(raw: &str) -> Result<Vec<ParsedLocation>, AreaParseError> {
    let text = prepare(raw);
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let dialect = AreaDialect::classify(&text);
    let mut locations = Vec::new();
    for group in groups(&text) {
        match dialect {
            AreaDialect::StateOnly => parse_state_only_group(group, &mut locations)?,
            AreaDialect::CountyBearing => parse_county_group(group, &mut locations)?,
        }
    }

    if locations.is_empty() {
        return Err(AreaParseError::NoLocations { text });
    }
    Ok(locations)
}

/// Build the location of a row from separate State / County columns
pub fn parse_columns(
    state: Option<&str>,
    county: Option<&str>,
) -> Result<ParsedLocation, AreaParseError> {
    let state = state.map(clean_value).unwrap_or_default();
    if state.is_empty() {
        return Err(AreaParseError::EmptyState {
            segment: county.unwrap_or_default().to_string(),
        });
    }

    let county = county
        .map(clean_county)
        .filter(|c| !c.is_empty() && !NULL_MARKERS.contains(&c.as_str()));

    Ok(ParsedLocation {
        state: state.to_string(),
        county,
    })
}

fn prepare(raw: &str) -> String {
    let without_footnotes = FOOTNOTE_RE.replace_all(raw, " ");
    collapse_whitespace(&without_footnotes)
}

/// Semicolon groups with trailing separators removed; blank groups skipped
fn groups(text: &str) -> impl Iterator<Item = &str> {
    text.split(';')
        .map(|group| group.trim().trim_end_matches([':', ',']).trim_end())
        .filter(|group| !group.is_empty())
}

fn parse_state_only_group(
    group: &str,
    locations: &mut Vec<ParsedLocation>,
) -> Result<(), AreaParseError> {
    if !group.contains(STATE_SEP) {
        return push_statewide(group, locations);
    }

    let tokens: Vec<&str> = group
        .split(STATE_SEP)
        .flat_map(|part| part.split(LIST_SEP))
        .collect();
    if tokens.len() % 2 != 0 {
        return Err(AreaParseError::UnpairedTokens {
            segment: group.to_string(),
        });
    }

    for pair in tokens.chunks(2) {
        let state = clean_value(pair[0]);
        if state.is_empty() {
            return Err(AreaParseError::EmptyState {
                segment: group.to_string(),
            });
        }
        locations.push(ParsedLocation::statewide(state));
    }
    Ok(())
}

fn parse_county_group(
    group: &str,
    locations: &mut Vec<ParsedLocation>,
) -> Result<(), AreaParseError> {
    let mut parts = group.split(STATE_SEP);
    let head = parts.next().unwrap_or_default();
    let tail = parts.next();
    if parts.next().is_some() {
        return Err(AreaParseError::RepeatedSeparator {
            segment: group.to_string(),
        });
    }

    let Some(tail) = tail else {
        return push_statewide(group, locations);
    };

    let states = split_list(head, |v| clean_value(v).to_string());
    if states.is_empty() {
        return Err(AreaParseError::EmptyState {
            segment: group.to_string(),
        });
    }
    let counties = split_list(tail, clean_county);

    match (states.as_slice(), counties.as_slice()) {
        // "Texas:" or "Texas: [2]" - statewide after cleanup
        (_, []) => {
            locations.extend(states.iter().cloned().map(ParsedLocation::statewide));
        }
        ([state], _) => {
            locations.extend(
                counties
                    .iter()
                    .map(|county| ParsedLocation::county(state.clone(), county.clone())),
            );
        }
        // several states sharing one trailing county
        (_, [county]) => {
            locations.extend(
                states
                    .iter()
                    .map(|state| ParsedLocation::county(state.clone(), county.clone())),
            );
        }
        _ => {
            return Err(AreaParseError::AmbiguousStateList {
                segment: group.to_string(),
            })
        }
    }
    Ok(())
}

/// A colon-less group: every comma-separated name is a whole state
fn push_statewide(
    group: &str,
    locations: &mut Vec<ParsedLocation>,
) -> Result<(), AreaParseError> {
    let states = split_list(group, |v| clean_value(v).to_string());
    if states.is_empty() {
        return Err(AreaParseError::EmptyState {
            segment: group.to_string(),
        });
    }
    if states.iter().any(|s| has_county_suffix(s)) {
        return Err(AreaParseError::OrphanCounty {
            segment: group.to_string(),
        });
    }
    locations.extend(states.into_iter().map(ParsedLocation::statewide));
    Ok(())
}

fn split_list<F>(text: &str, clean: F) -> Vec<String>
where
    F: Fn(&str) -> String,
{
    text.split(LIST_SEP)
        .map(clean)
        .filter(|value| !value.is_empty())
        .collect()
}

/// Strip a trailing ';'/':' and anything from a stray bracket onward
fn clean_value(value: &str) -> &str {
    let value = value.trim().trim_end_matches([';', ':']);
    let value = match value.find(['[', ']']) {
        Some(idx) => &value[..idx],
        None => value,
    };
    value.trim()
}

fn clean_county(value: &str) -> String {
    let value = clean_value(value);
    COUNTY_SUFFIXES
        .iter()
        .find_map(|suffix| value.strip_suffix(suffix))
        .unwrap_or(value)
        .trim()
        .to_string()
}

fn has_county_suffix(value: &str) -> bool {
    COUNTY_SUFFIXES.iter().any(|suffix| value.ends_with(suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn county(state: &str, county: &str) -> ParsedLocation {
        ParsedLocation::county(state, county)
    }

    fn statewide(state: &str) -> ParsedLocation {
        ParsedLocation::statewide(state)
    }

    #[test]
    fn test_state_only_pairs() {
        assert_eq!(
            parse_area("S1: a, S2: b").unwrap(),
            vec![statewide("S1"), statewide("S2")]
        );
    }

    #[test]
    fn test_state_only_descriptions() {
        assert_eq!(
            parse_area("Texas: Gulf coast, Louisiana: New Orleans area").unwrap(),
            vec![statewide("Texas"), statewide("Louisiana")]
        );
    }

    #[test]
    fn test_numbers_and_clock_times_inside_descriptions() {
        assert_eq!(
            parse_area("Texas: 1,200 customers, Louisiana: 300 customers").unwrap(),
            vec![statewide("Texas"), statewide("Louisiana")]
        );
        assert_eq!(
            parse_area("Texas: storms after 10:30, Louisiana: flooding").unwrap(),
            vec![statewide("Texas"), statewide("Louisiana")]
        );
    }

    #[test]
    fn test_state_only_unpaired_is_malformed() {
        assert_eq!(
            parse_area("Texas: storms, wind, Louisiana: ice"),
            Err(AreaParseError::UnpairedTokens {
                segment: "Texas: storms, wind, Louisiana: ice".to_string()
            })
        );
    }

    #[test]
    fn test_counties_across_groups() {
        assert_eq!(
            parse_area("Ohio: Lucas, Wood; Michigan: Wayne").unwrap(),
            vec![
                county("Ohio", "Lucas"),
                county("Ohio", "Wood"),
                county("Michigan", "Wayne")
            ]
        );
    }

    #[test]
    fn test_shared_trailing_county() {
        assert_eq!(
            parse_area("Maryland, Virginia: Fairfax").unwrap(),
            vec![county("Maryland", "Fairfax"), county("Virginia", "Fairfax")]
        );
    }

    #[test]
    fn test_shared_trailing_county_with_suffix() {
        assert_eq!(
            parse_area("Maryland, Virginia: Fairfax County;").unwrap(),
            vec![county("Maryland", "Fairfax"), county("Virginia", "Fairfax")]
        );
    }

    #[test]
    fn test_county_and_parish_suffixes() {
        assert_eq!(
            parse_area("Illinois: Cook County").unwrap(),
            vec![county("Illinois", "Cook")]
        );
        assert_eq!(
            parse_area("Louisiana: Caddo Parish, Bossier Parish;").unwrap(),
            vec![county("Louisiana", "Caddo"), county("Louisiana", "Bossier")]
        );
    }

    #[test]
    fn test_stray_bracket_truncation() {
        assert_eq!(
            parse_area("Texas: Harris][3").unwrap(),
            vec![county("Texas", "Harris")]
        );
    }

    #[test]
    fn test_footnote_markers_removed() {
        assert_eq!(
            parse_area("Texas: Harris County[1], Fort Bend County [2];").unwrap(),
            vec![county("Texas", "Harris"), county("Texas", "Fort Bend")]
        );
    }

    #[test]
    fn test_trailing_separators() {
        assert_eq!(
            parse_area("Ohio: Lucas County;:").unwrap(),
            vec![county("Ohio", "Lucas")]
        );
        assert_eq!(parse_area("Texas:").unwrap(), vec![statewide("Texas")]);
    }

    #[test]
    fn test_statewide_group_among_county_groups() {
        assert_eq!(
            parse_area("Ohio: Lucas County; Michigan;").unwrap(),
            vec![county("Ohio", "Lucas"), statewide("Michigan")]
        );
    }

    #[test]
    fn test_wrapped_cell_text() {
        assert_eq!(
            parse_area("Ohio:\nLucas County,\n  Wood County;").unwrap(),
            vec![county("Ohio", "Lucas"), county("Ohio", "Wood")]
        );
    }

    #[test]
    fn test_several_states_several_counties_is_malformed() {
        assert!(matches!(
            parse_area("Maryland, Virginia: Fairfax County, Loudoun County"),
            Err(AreaParseError::AmbiguousStateList { .. })
        ));
    }

    #[test]
    fn test_repeated_separator_is_malformed() {
        assert!(matches!(
            parse_area("Ohio: Lucas County, Michigan: Wayne County"),
            Err(AreaParseError::RepeatedSeparator { .. })
        ));
    }

    #[test]
    fn test_orphan_county_is_malformed() {
        assert!(matches!(
            parse_area("Ohio: Lucas County; Wood County"),
            Err(AreaParseError::OrphanCounty { .. })
        ));
    }

    #[test]
    fn test_empty_state_is_malformed() {
        assert!(matches!(
            parse_area(": Lucas County"),
            Err(AreaParseError::EmptyState { .. })
        ));
    }

    #[test]
    fn test_blank_input() {
        assert_eq!(parse_area("").unwrap(), vec![]);
        assert_eq!(parse_area(" \n ").unwrap(), vec![]);
    }

    #[test]
    fn test_only_separators() {
        assert!(matches!(
            parse_area(";;"),
            Err(AreaParseError::NoLocations { .. })
        ));
    }

    #[test]
    fn test_classify() {
        assert_eq!(AreaDialect::classify("S1: a, S2: b"), AreaDialect::StateOnly);
        assert_eq!(
            AreaDialect::classify("Florida: Duval, Orange"),
            AreaDialect::CountyBearing
        );
        assert_eq!(
            AreaDialect::classify("Ohio: Lucas County, Michigan: Wayne County"),
            AreaDialect::CountyBearing
        );
        assert_eq!(AreaDialect::classify("Texas"), AreaDialect::CountyBearing);
        assert_eq!(
            AreaDialect::classify("Florida: Duval, Orange until 10:30"),
            AreaDialect::CountyBearing
        );
    }

    #[test]
    fn test_parse_columns() {
        assert_eq!(
            parse_columns(Some("Texas"), Some("Harris County")).unwrap(),
            county("Texas", "Harris")
        );
        assert_eq!(
            parse_columns(Some("Texas"), Some("None")).unwrap(),
            statewide("Texas")
        );
        assert_eq!(parse_columns(Some("Texas"), None).unwrap(), statewide("Texas"));
        assert!(parse_columns(None, Some("Harris")).is_err());
    }
}
