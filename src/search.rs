use serde_json::{Map, Value};

/// Hard cap on results returned by a single search.
pub const SEARCH_LIMIT: usize = 50;

/// Which field(s) of a site record a query is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Exact site-number lookup, numeric-padding tolerant, at most one hit.
    Site,
    /// Substring over service address + city + state, case-insensitive.
    Address,
    /// Substring over the city field, case-insensitive.
    City,
    /// Substring over the brand field, case-insensitive.
    Brand,
    /// Substring over the IP field, case-sensitive.
    Ip,
}

impl SearchMode {
    /// Parse a query-string mode, coercing anything unrecognized to `Site`.
    pub fn from_query(mode: &str) -> SearchMode {
        match mode {
            "address" => SearchMode::Address,
            "city" => SearchMode::City,
            "brand" => SearchMode::Brand,
            "ip" => SearchMode::Ip,
            _ => SearchMode::Site,
        }
    }
}

/// Scan the site collection in order and return the rows matching `query`
/// under the given mode.
///
/// A blank query returns nothing without scanning. `Site` mode stops at the
/// first hit, so duplicate site numbers yield only the earliest row; the
/// other modes stop at [`SEARCH_LIMIT`]. Entries that are not JSON objects
/// are skipped.
pub fn search(sites: &[Value], query: &str, mode: SearchMode) -> Vec<Value> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    let query_lower = query.to_lowercase();
    let query_digits = digits(query);

    let mut results = Vec::new();
    for row in sites {
        let Some(record) = row.as_object() else {
            continue;
        };
        let matched = match mode {
            SearchMode::Site => site_matches(record, &query_digits),
            SearchMode::Address => {
                let joined = ["Service Address", "City", "State"]
                    .iter()
                    .filter_map(|key| non_empty_str(record, key))
                    .collect::<Vec<&str>>()
                    .join(" ")
                    .to_lowercase();
                joined.contains(&query_lower)
            }
            SearchMode::City => field(record, &["City"]).to_lowercase().contains(&query_lower),
            SearchMode::Brand => field(record, &["Brand", "brand"])
                .to_lowercase()
                .contains(&query_lower),
            SearchMode::Ip => {
                let ip = field(record, &["IP: Address", "IP Address", "IP"]).trim();
                ip.contains(query) || ip == query
            }
        };
        if matched {
            results.push(row.clone());
            if mode == SearchMode::Site || results.len() >= SEARCH_LIMIT {
                break;
            }
        }
    }
    results
}

fn site_matches(record: &Map<String, Value>, query_digits: &str) -> bool {
    if query_digits.is_empty() {
        return false;
    }
    let site_digits = digits(field(record, &["Site#", "Site"]).trim());
    if site_digits.is_empty() {
        return false;
    }
    site_digits == query_digits || pad4(&site_digits) == pad4(query_digits)
}

fn digits(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

fn pad4(s: &str) -> String {
    format!("{s:0>4}")
}

/// First non-empty string value among `keys`, or `""`. Empty strings fall
/// through to the next key, matching how the front end populates records.
fn field<'a>(record: &'a Map<String, Value>, keys: &[&str]) -> &'a str {
    keys.iter()
        .find_map(|key| non_empty_str(record, key))
        .unwrap_or("")
}

fn non_empty_str<'a>(record: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    record
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn sites(text: &str) -> Vec<Value> {
        parse(text).into_iter().map(Value::Object).collect()
    }

    fn site_field<'a>(row: &'a Value, key: &str) -> &'a str {
        row.get(key).and_then(Value::as_str).unwrap_or("")
    }

    #[test]
    fn blank_query_returns_nothing() {
        let data = sites("Site#\tCity\tState\n0007\tReno\tNV");
        assert!(search(&data, "", SearchMode::City).is_empty());
        assert!(search(&data, "   ", SearchMode::Site).is_empty());
    }

    #[test]
    fn site_mode_normalizes_numeric_padding() {
        let data = sites("Site#\tCity\tState\n0007\tReno\tNV");
        for query in ["7", "07", "0007"] {
            let results = search(&data, query, SearchMode::Site);
            assert_eq!(results.len(), 1, "query {query:?}");
            assert_eq!(site_field(&results[0], "City"), "Reno");
        }
    }

    #[test]
    fn site_mode_ignores_non_digit_characters_in_query() {
        let data = sites("Site#\tCity\tState\n0007\tReno\tNV");
        let results = search(&data, "site 7", SearchMode::Site);
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn site_mode_without_digits_matches_nothing() {
        let data = sites("Site#\tCity\tState\n0007\tReno\tNV");
        assert!(search(&data, "reno", SearchMode::Site).is_empty());
    }

    #[test]
    fn site_mode_stops_at_first_match() {
        let data = sites("Site#\tCity\tState\n0007\tReno\tNV\n0007\tSparks\tNV");
        let results = search(&data, "7", SearchMode::Site);
        assert_eq!(results.len(), 1);
        assert_eq!(site_field(&results[0], "City"), "Reno");
    }

    #[test]
    fn site_mode_falls_back_to_site_key() {
        let data = sites("Site\tCity\tState\n12\tBoise\tID");
        let results = search(&data, "0012", SearchMode::Site);
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn address_mode_joins_address_city_state() {
        let data = sites("Site#\tService Address\tCity\tState\n0007\t1 Main St\tReno\tNV");
        assert_eq!(search(&data, "main st reno", SearchMode::Address).len(), 1);
        assert_eq!(search(&data, "RENO NV", SearchMode::Address).len(), 1);
        assert!(search(&data, "boise", SearchMode::Address).is_empty());
    }

    #[test]
    fn address_mode_skips_absent_fields_when_joining() {
        let data = sites("Site#\tCity\tState\n0007\tReno\tNV");
        assert_eq!(search(&data, "reno nv", SearchMode::Address).len(), 1);
    }

    #[test]
    fn city_mode_is_case_insensitive_substring() {
        let data = sites("Site#\tCity\tState\n0007\tReno\tNV\n0012\tBoise\tID");
        let results = search(&data, "REN", SearchMode::City);
        assert_eq!(results.len(), 1);
        assert_eq!(site_field(&results[0], "Site#"), "0007");
    }

    #[test]
    fn brand_mode_checks_both_key_casings() {
        let data = sites("Site#\tBrand\tCity\n0007\tAcme\tReno\n0012\t\tBoise");
        assert_eq!(search(&data, "acme", SearchMode::Brand).len(), 1);

        let lower = sites("Site#\tbrand\tCity\n0013\tZeta\tOgden");
        assert_eq!(search(&lower, "zeta", SearchMode::Brand).len(), 1);
    }

    #[test]
    fn ip_mode_is_case_sensitive_substring() {
        let data = sites("Site#\tIP: Address\tCity\n0007\t10.1.2.3\tReno");
        assert_eq!(search(&data, "10.1.2", SearchMode::Ip).len(), 1);
        assert_eq!(search(&data, "10.1.2.3", SearchMode::Ip).len(), 1);
        assert!(search(&data, "10.9", SearchMode::Ip).is_empty());
    }

    #[test]
    fn ip_mode_checks_key_variants_in_order() {
        let data = sites("Site#\tIP Address\tCity\n0007\t10.1.2.3\tReno");
        assert_eq!(search(&data, "10.1.2.3", SearchMode::Ip).len(), 1);

        let bare = sites("Site#\tIP\tCity\n0012\t10.4.5.6\tBoise");
        assert_eq!(search(&bare, "10.4", SearchMode::Ip).len(), 1);
    }

    #[test]
    fn results_are_capped_at_fifty_in_collection_order() {
        let mut text = String::from("Site#\tCity\tState\n");
        for n in 0..80 {
            text.push_str(&format!("{n:04}\tReno\tNV\n"));
        }
        let data = sites(&text);
        let results = search(&data, "reno", SearchMode::City);
        assert_eq!(results.len(), SEARCH_LIMIT);
        assert_eq!(site_field(&results[0], "Site#"), "0000");
        assert_eq!(site_field(&results[49], "Site#"), "0049");
    }

    #[test]
    fn non_object_rows_are_skipped() {
        let mut data = sites("Site#\tCity\tState\n0007\tReno\tNV");
        data.insert(0, Value::String("stray".to_string()));
        data.insert(1, Value::Null);
        let results = search(&data, "reno", SearchMode::City);
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn unknown_mode_coerces_to_site() {
        assert_eq!(SearchMode::from_query("nonsense"), SearchMode::Site);
        assert_eq!(SearchMode::from_query(""), SearchMode::Site);
        assert_eq!(SearchMode::from_query("ip"), SearchMode::Ip);
    }
}
