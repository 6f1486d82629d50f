/// Upstream endpoints and the fixed bounds applied to every query.
/// These constants keep the list, detail and probe paths consistent with each other.

// Demo host shown when a caller does not name one
pub const DEFAULT_HOST_ID: &str = "63ea8385a8d65900205da7a4";

// Upstream endpoints
pub const UNIVERSE_TOKEN_URL: &str = "https://www.universe.com/oauth/token";
pub const UNIVERSE_GRAPHQL_URL: &str = "https://www.universe.com/graphql";

// Environment variables holding the client-credentials pair
pub const CLIENT_ID_ENV: &str = "UNIVERSE_CLIENT_ID";
pub const CLIENT_SECRET_ENV: &str = "UNIVERSE_CLIENT_SECRET";

// Query bounds
pub const MAX_TIMESLOT_LIMIT: u32 = 1000;
pub const LIST_EVENT_LIMIT: u32 = 50;
pub const DETAIL_TIMESLOT_LIMIT: u32 = 50;
pub const PROBE_EVENT_LIMIT: u32 = 5;

// Cache lifetimes
pub const LIST_CACHE_TTL_MS: i64 = 60 * 1000;
pub const DETAIL_CACHE_TTL_MS: i64 = 5 * 60 * 1000;

// Photo sizes requested from the upstream image service (width, height)
pub const LIST_EVENT_PHOTO_SIZE: (u32, u32) = (400, 400);
pub const LIST_COVER_PHOTO_SIZE: (u32, u32) = (800, 400);
pub const DETAIL_EVENT_PHOTO_SIZE: (u32, u32) = (400, 400);
pub const DETAIL_COVER_PHOTO_SIZE: (u32, u32) = (1200, 800);
pub const DETAIL_ADDITIONAL_IMAGE_SIZE: (u32, u32) = (1200, 800);

pub const DEFAULT_PORT: u16 = 3000;

/// Map a raw `timeslotLimit` query value to the limit actually sent upstream.
///
/// The value is read as a number and floored; anything missing, non-numeric,
/// non-finite or not positive falls back to [`MAX_TIMESLOT_LIMIT`].
pub fn effective_timeslot_limit(raw: Option<&str>) -> u32 {
    let parsed = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|n| n.is_finite() && *n > 0.0);

    match parsed {
        Some(n) => (n.floor() as u64).clamp(1, MAX_TIMESLOT_LIMIT as u64) as u32,
        None => MAX_TIMESLOT_LIMIT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeslot_limit_clamps_to_maximum() {
        assert_eq!(effective_timeslot_limit(Some("5000")), 1000);
        assert_eq!(effective_timeslot_limit(Some("1000")), 1000);
    }

    #[test]
    fn test_timeslot_limit_falls_back_to_default() {
        assert_eq!(effective_timeslot_limit(None), 1000);
        assert_eq!(effective_timeslot_limit(Some("")), 1000);
        assert_eq!(effective_timeslot_limit(Some("0")), 1000);
        assert_eq!(effective_timeslot_limit(Some("-3")), 1000);
        assert_eq!(effective_timeslot_limit(Some("abc")), 1000);
        assert_eq!(effective_timeslot_limit(Some("inf")), 1000);
        assert_eq!(effective_timeslot_limit(Some("NaN")), 1000);
    }

    #[test]
    fn test_timeslot_limit_floors_fractions() {
        assert_eq!(effective_timeslot_limit(Some("12.9")), 12);
        assert_eq!(effective_timeslot_limit(Some(" 7 ")), 7);
        // Positive but below one still asks for a single slot
        assert_eq!(effective_timeslot_limit(Some("0.4")), 1);
    }
}
