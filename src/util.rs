use time::{
    format_description::well_known::{Iso8601, Rfc3339},
    OffsetDateTime,
};

/// Parses an ISO 8601 timestamp into seconds since the Unix epoch.
///
/// The server writes `Last-Modified` as RFC 3339 in UTC
/// (`2014-05-23T21:14:01Z`), which is tried first. Other ISO 8601 forms with
/// an explicit offset are accepted as a fallback.
///
/// # Returns
///
/// `None` when `value` is not a timestamp with an offset.
///
/// # Examples
///
/// ```rust
/// assert_eq!(parse_unix_time("2014-05-23T21:14:01Z"), Some(1_400_879_641));
/// assert_eq!(parse_unix_time("notadate"), None);
/// ```
#[must_use]
pub fn parse_unix_time(value: &str) -> Option<i64> {
    let value = value.trim();
    OffsetDateTime::parse(value, &Rfc3339)
        .or_else(|_| OffsetDateTime::parse(value, &Iso8601::PARSING))
        .map(OffsetDateTime::unix_timestamp)
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_utc_timestamps() {
        assert_eq!(parse_unix_time("2014-05-23T21:14:01Z"), Some(1_400_879_641));
        assert_eq!(parse_unix_time("1970-01-01T00:00:00Z"), Some(0));
    }

    #[test]
    fn honours_offsets() {
        assert_eq!(
            parse_unix_time("2014-05-23T23:14:01+02:00"),
            Some(1_400_879_641)
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_unix_time("notadate"), None);
        assert_eq!(parse_unix_time(""), None);
    }
}
