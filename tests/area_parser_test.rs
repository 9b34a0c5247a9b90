// Area grammar through the public API, one test per documented form

use outage_history::outage::{expand, parse_area, AreaParseError, OutageEvent, ParsedLocation};

use chrono::{NaiveDate, NaiveTime};

fn statewide(state: &str) -> ParsedLocation {
    ParsedLocation::statewide(state)
}

fn county(state: &str, county: &str) -> ParsedLocation {
    ParsedLocation::county(state, county)
}

#[test]
fn test_state_description_pairs_are_statewide() {
    assert_eq!(
        parse_area("S1: a, S2: b").unwrap(),
        vec![statewide("S1"), statewide("S2")]
    );
    assert_eq!(
        parse_area("Texas: Southeast, Louisiana: Southwest;").unwrap(),
        vec![statewide("Texas"), statewide("Louisiana")]
    );
}

#[test]
fn test_descriptions_with_thousands_separators() {
    assert_eq!(
        parse_area("Texas: 1,200 customers, Louisiana: 300 customers").unwrap(),
        vec![statewide("Texas"), statewide("Louisiana")]
    );
}

#[test]
fn test_descriptions_with_clock_times() {
    assert_eq!(
        parse_area("Texas: storms after 10:30, Louisiana: flooding").unwrap(),
        vec![statewide("Texas"), statewide("Louisiana")]
    );
    assert_eq!(
        parse_area("Florida: Duval, Orange until 10:30").unwrap(),
        vec![county("Florida", "Duval"), county("Florida", "Orange until 10:30")]
    );
}

#[test]
fn test_counties_per_state_group() {
    assert_eq!(
        parse_area("Ohio: Lucas, Wood; Michigan: Wayne").unwrap(),
        vec![
            county("Ohio", "Lucas"),
            county("Ohio", "Wood"),
            county("Michigan", "Wayne"),
        ]
    );
}

#[test]
fn test_states_sharing_a_county() {
    assert_eq!(
        parse_area("Maryland, Virginia: Fairfax").unwrap(),
        vec![county("Maryland", "Fairfax"), county("Virginia", "Fairfax")]
    );
}

#[test]
fn test_county_and_parish_suffixes_are_stripped() {
    assert_eq!(
        parse_area("Illinois: Cook County").unwrap(),
        vec![county("Illinois", "Cook")]
    );
    assert_eq!(
        parse_area("Louisiana: Orleans Parish, Jefferson Parish").unwrap(),
        vec![county("Louisiana", "Orleans"), county("Louisiana", "Jefferson")]
    );
}

#[test]
fn test_bracket_artifacts() {
    assert_eq!(
        parse_area("Texas: Harris][3").unwrap(),
        vec![county("Texas", "Harris")]
    );
}

#[test]
fn test_malformed_areas() {
    assert!(matches!(
        parse_area("Ohio: Lucas: Wood"),
        Err(AreaParseError::UnpairedTokens { .. })
    ));
    assert!(parse_area("Ohio: Lucas County, Michigan: Wayne County").is_err());
}

#[test]
fn test_expanded_length_matches_locations() {
    let event = OutageEvent {
        start_date: NaiveDate::from_ymd_opt(2018, 3, 2).unwrap(),
        start_time: NaiveTime::from_hms_opt(4, 0, 0).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2018, 3, 4).unwrap(),
        end_time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
        customers_affected: Some(75_000),
    };

    for text in [
        "Massachusetts: Plymouth County, Barnstable County;",
        "New York: Westchester; Connecticut: Fairfield, New Haven",
        "Virginia",
    ] {
        let locations = parse_area(text).unwrap();
        let records = expand(&event, &locations);
        assert_eq!(records.len(), locations.len(), "{text}");
        assert!(records.iter().all(|r| r.customers_affected == Some(75_000)));
    }
}
