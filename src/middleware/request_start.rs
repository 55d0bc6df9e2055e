use once_cell::sync::Lazy;
use regex::Regex;

/// Header set by the edge proxy / load balancer when it first saw the request.
pub const REQUEST_START_HEADER: &str = "x-request-start";

/// The whole value is a number, optionally padded: `"  1700000000.5 "`.
static BARE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*([\d+.]+)\s*$").unwrap());

/// `t=<number>` anywhere in the value. Unanchored so a leading server name
/// (`"edge-1 t=1700000000.25"`) is skipped.
static EMBEDDED: Lazy<Regex> = Lazy::new(|| Regex::new(r"t=([\d+.]+)").unwrap());

/// Extracts the Unix timestamp (seconds) from an `X-Request-Start` value.
///
/// The bare form is tried first and the `t=` form second, so `"t=123.45"`
/// falls through to the embedded match. A captured number that does not
/// parse as a finite float (`"1.2.3"`) gives `None`, never a default.
pub fn extract_timestamp(value: Option<&str>) -> Option<f64> {
    let value = value.filter(|v| !v.is_empty())?;

    capture(&BARE, value)
        .or_else(|| capture(&EMBEDDED, value))
        .and_then(|text| text.parse::<f64>().ok())
        .filter(|ts| ts.is_finite())
}

fn capture<'a>(pattern: &Regex, value: &'a str) -> Option<&'a str> {
    pattern
        .captures(value)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn absent_or_empty_yields_nothing() {
        assert_eq!(extract_timestamp(None), None);
        assert_eq!(extract_timestamp(Some("")), None);
        assert_eq!(extract_timestamp(Some("   ")), None);
    }

    #[test]
    fn bare_number_with_padding() {
        assert_eq!(
            extract_timestamp(Some("  1700000000.5  ")),
            Some(1_700_000_000.5)
        );
        assert_eq!(extract_timestamp(Some("1700000000")), Some(1_700_000_000.0));
    }

    #[test]
    fn embedded_form_skips_leading_server_name() {
        assert_eq!(
            extract_timestamp(Some("edge-server-1 t=1700000000.25")),
            Some(1_700_000_000.25)
        );
    }

    #[test]
    fn t_prefix_alone_falls_through_to_embedded_form() {
        assert_eq!(extract_timestamp(Some("t=123.45")), Some(123.45));
    }

    #[test]
    fn first_t_pair_wins() {
        assert_eq!(
            extract_timestamp(Some("t=1700000000.1 t=1700000099.9")),
            Some(1_700_000_000.1)
        );
    }

    #[test]
    fn unparseable_numbers_yield_nothing() {
        assert_eq!(extract_timestamp(Some("1.2.3")), None);
        assert_eq!(extract_timestamp(Some("t=...")), None);
        assert_eq!(extract_timestamp(Some("t=")), None);
    }

    #[test]
    fn unrelated_values_yield_nothing() {
        assert_eq!(extract_timestamp(Some("yesterday")), None);
        assert_eq!(extract_timestamp(Some("ts=abc")), None);
        assert_eq!(extract_timestamp(Some("-5")), None);
    }

    proptest! {
        #[test]
        fn recovers_embedded_timestamp(
            ts in 0.0f64..1.0e12,
            server in "[a-z0-9-]{0,16}",
        ) {
            let value = if server.is_empty() {
                format!("t={ts}")
            } else {
                format!("{server} t={ts}")
            };
            prop_assert_eq!(extract_timestamp(Some(value.as_str())), Some(ts));
        }

        #[test]
        fn recovers_bare_timestamp(
            ts in 0.0f64..1.0e12,
            left in "[ \t]{0,4}",
            right in "[ \t]{0,4}",
        ) {
            let value = format!("{left}{ts}{right}");
            prop_assert_eq!(extract_timestamp(Some(value.as_str())), Some(ts));
        }
    }
}
