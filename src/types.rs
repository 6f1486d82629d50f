use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::cta::CtaDecision;

/// A bookable start/end interval, identified only by its position in the list.
/// Timestamps are passed through exactly as the upstream sent them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub start_at: Option<String>,
    pub end_at: Option<String>,
}

impl TimeSlot {
    pub fn start_instant(&self) -> Option<DateTime<FixedOffset>> {
        self.start_at.as_deref().and_then(parse_instant)
    }
}

/// RFC 3339 timestamp, or an offset-less ISO 8601 one read as UTC
pub fn parse_instant(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw).ok().or_else(|| {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc().fixed_offset())
    })
}

/// List item returned by the events endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    pub id: String,
    pub title: String,
    pub url: Option<String>,
    pub age_limit: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub sold_out: bool,
    pub allow_waitlist: bool,
    pub capacity: i64,
    pub tickets_sold: i64,
    pub cover_image_url: Option<String>,
    pub event_photo_url: Option<String>,
    pub time_slots: Vec<TimeSlot>,
    pub cta: CtaDecision,
}

impl EventSummary {
    /// Earliest parseable slot start; slots with a missing or unreadable
    /// start are left out of the comparison
    pub fn earliest_start(&self) -> Option<DateTime<FixedOffset>> {
        self.time_slots.iter().filter_map(TimeSlot::start_instant).min()
    }
}

/// Full event view: every summary field plus the descriptive ones
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetail {
    #[serde(flatten)]
    pub summary: EventSummary,
    pub description: Option<String>,
    pub accessibility_description: Option<String>,
    pub address: Option<String>,
    pub venue_name: Option<String>,
    pub additional_images: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventListResponse {
    pub events: Vec<EventSummary>,
    pub total_count: i64,
}

/// Order events by their earliest timeslot start; events without any
/// readable timeslot start go last. The sort is stable, so ties keep upstream order.
pub fn sort_chronologically(events: &mut [EventSummary]) {
    events.sort_by(|a, b| match (a.earliest_start(), b.earliest_start()) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}
