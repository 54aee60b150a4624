use std::collections::HashMap;

use url::Url;

use crate::types::TrackingData;

/// Query parameters captured for attribution.
const TRACKED_PARAMS: [&str; 8] = [
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_content",
    "utm_term",
    "fbclid",
    "gclid",
    "ttclid",
];

/// Resolves the client IP for a request, honoring `X-Forwarded-For`.
///
/// When the header is present the first comma-separated entry wins, since
/// proxies append their upstream peer to the end of the chain. Without the
/// header, or when the first entry is empty, the socket peer address is
/// used as-is.
pub fn resolve_client_ip(remote_addr: &str, forwarded_for: Option<&str>) -> String {
    forwarded_for
        .and_then(|header| header.split(',').next())
        .map(str::trim)
        .filter(|first| !first.is_empty())
        .unwrap_or(remote_addr)
        .to_string()
}

/// Extracts attribution data from the landing URL and client cookies.
///
/// For repeated query parameters the first non-empty occurrence wins and
/// values are form-urlencoded decoded. A URL that does not parse is treated
/// as having no query string; cookie-derived fields are still populated.
pub fn extract_tracking_data(
    full_url: &str,
    browser_data: &serde_json::Map<String, serde_json::Value>,
) -> TrackingData {
    let mut params = first_query_values(full_url);

    let cookie = |key: &str| {
        browser_data
            .get(key)
            .and_then(|value| value.as_str())
            .filter(|value| !value.is_empty())
            .map(|value| value.to_string())
    };

    let fbclid = params.remove("fbclid");
    // Facebook click ids double as the fbc cookie value when the cookie
    // itself has not been set yet.
    let fbc = fbclid.clone().or_else(|| cookie("fbcCookie"));

    TrackingData {
        utm_source: params.remove("utm_source"),
        utm_medium: params.remove("utm_medium"),
        utm_campaign: params.remove("utm_campaign"),
        utm_content: params.remove("utm_content"),
        utm_term: params.remove("utm_term"),
        fbclid,
        gclid: params.remove("gclid"),
        ttclid: params.remove("ttclid"),
        fbp: cookie("fbpCookie"),
        fbc,
    }
}

fn first_query_values(full_url: &str) -> HashMap<String, String> {
    let mut values = HashMap::new();
    if let Ok(url) = Url::parse(full_url) {
        for (key, value) in url.query_pairs() {
            if value.is_empty() || !TRACKED_PARAMS.contains(&key.as_ref()) {
                continue;
            }
            values
                .entry(key.into_owned())
                .or_insert_with(|| value.into_owned());
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn browser_data(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_resolve_client_ip_without_header() {
        assert_eq!(resolve_client_ip("203.0.113.9", None), "203.0.113.9");
    }

    #[test]
    fn test_resolve_client_ip_single_forwarded_entry() {
        assert_eq!(
            resolve_client_ip("10.0.0.1", Some("198.51.100.7")),
            "198.51.100.7"
        );
    }

    #[test]
    fn test_resolve_client_ip_takes_first_of_chain() {
        assert_eq!(
            resolve_client_ip("10.0.0.1", Some(" 198.51.100.7 , 70.41.3.18, 150.172.238.178")),
            "198.51.100.7"
        );
    }

    #[test]
    fn test_resolve_client_ip_empty_header_falls_back_to_peer() {
        assert_eq!(resolve_client_ip("203.0.113.9", Some("")), "203.0.113.9");
        assert_eq!(resolve_client_ip("203.0.113.9", Some("   ")), "203.0.113.9");
        assert_eq!(
            resolve_client_ip("203.0.113.9", Some(" , 70.41.3.18")),
            "203.0.113.9"
        );
    }

    #[test]
    fn test_extracts_known_params_and_ignores_others() {
        let data = extract_tracking_data(
            "https://shop.example/landing?utm_source=newsletter&utm_medium=email&page=2&ref=abc",
            &browser_data(json!({})),
        );
        assert_eq!(data.utm_source.as_deref(), Some("newsletter"));
        assert_eq!(data.utm_medium.as_deref(), Some("email"));
        assert_eq!(data.utm_campaign, None);
        assert_eq!(data.gclid, None);
    }

    #[test]
    fn test_first_occurrence_wins_for_repeated_params() {
        let data = extract_tracking_data(
            "https://shop.example/?utm_source=first&utm_source=second",
            &browser_data(json!({})),
        );
        assert_eq!(data.utm_source.as_deref(), Some("first"));
    }

    #[test]
    fn test_empty_values_are_skipped() {
        let data = extract_tracking_data(
            "https://shop.example/?utm_source=&utm_source=newsletter&utm_term=",
            &browser_data(json!({})),
        );
        assert_eq!(data.utm_source.as_deref(), Some("newsletter"));
        assert_eq!(data.utm_term, None);
    }

    #[test]
    fn test_values_are_form_urlencoded_decoded() {
        let data = extract_tracking_data(
            "https://shop.example/?utm_campaign=spring%20sale&utm_term=running+shoes",
            &browser_data(json!({})),
        );
        assert_eq!(data.utm_campaign.as_deref(), Some("spring sale"));
        assert_eq!(data.utm_term.as_deref(), Some("running shoes"));
    }

    #[test]
    fn test_unparseable_url_yields_no_query_params() {
        let data = extract_tracking_data(
            "not a url at all",
            &browser_data(json!({"fbpCookie": "fb.1.1700000000.123456"})),
        );
        assert_eq!(data.utm_source, None);
        assert_eq!(data.fbp.as_deref(), Some("fb.1.1700000000.123456"));
    }

    #[test]
    fn test_url_without_query_string() {
        let data = extract_tracking_data("https://shop.example/pricing", &browser_data(json!({})));
        assert_eq!(data, TrackingData::default());
    }

    #[test]
    fn test_fbclid_populates_fbc() {
        let data = extract_tracking_data(
            "https://shop.example/?fbclid=IwAR123",
            &browser_data(json!({"fbcCookie": "fb.1.1700000000.IwAR999"})),
        );
        assert_eq!(data.fbclid.as_deref(), Some("IwAR123"));
        assert_eq!(data.fbc.as_deref(), Some("IwAR123"));
    }

    #[test]
    fn test_fbc_falls_back_to_cookie_without_fbclid() {
        let data = extract_tracking_data(
            "https://shop.example/?utm_source=fb",
            &browser_data(json!({"fbcCookie": "fb.1.1700000000.IwAR999"})),
        );
        assert_eq!(data.fbclid, None);
        assert_eq!(data.fbc.as_deref(), Some("fb.1.1700000000.IwAR999"));
    }

    #[test]
    fn test_empty_and_non_string_cookies_are_ignored() {
        let data = extract_tracking_data(
            "https://shop.example/",
            &browser_data(json!({"fbpCookie": "", "fbcCookie": 42})),
        );
        assert_eq!(data.fbp, None);
        assert_eq!(data.fbc, None);
    }

    #[test]
    fn test_non_null_fields_collects_only_present_values() {
        let data = extract_tracking_data(
            "https://shop.example/?gclid=Cj0K&utm_source=google",
            &browser_data(json!({"fbpCookie": "fb.1.1700000000.123456"})),
        );
        let fields = data.non_null_fields();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields["utm_source"], "google");
        assert_eq!(fields["gclid"], "Cj0K");
        assert_eq!(fields["fbp"], "fb.1.1700000000.123456");
    }
}
