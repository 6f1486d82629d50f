//! Typed shapes of the upstream GraphQL payloads.
//!
//! Every field the upstream may omit or null is optional here; anything that
//! fails to fit these shapes is rejected as a query error on ingress.

use serde::{Deserialize, Deserializer};

/// A paged upstream list (`{ totalCount, nodes }`)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    pub total_count: Option<i64>,
    pub nodes: Option<Vec<T>>,
}

impl<T> Connection<T> {
    pub fn into_nodes(self) -> Vec<T> {
        self.nodes.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhotoRef {
    pub url: Option<String>,
}

/// Non-empty photo URL, or `None`
pub fn photo_url(photo: Option<PhotoRef>) -> Option<String> {
    photo.and_then(|p| p.url).filter(|url| !url.is_empty())
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamTimeSlot {
    pub start_at: Option<String>,
    pub end_at: Option<String>,
    /// Only present for timed-entry events on the detail query
    pub capacity: Option<i64>,
    pub attendee_count: Option<i64>,
}

impl UpstreamTimeSlot {
    pub fn carries_counts(&self) -> bool {
        self.capacity.is_some() || self.attendee_count.is_some()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamEvent {
    pub id: String,
    pub title: Option<String>,
    pub url: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub age_limit: Option<String>,
    pub description: Option<String>,
    pub accessibility_description: Option<String>,
    pub event_photo: Option<PhotoRef>,
    pub cover_photo: Option<PhotoRef>,
    pub additional_images: Option<Vec<PhotoRef>>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub tickets_sold: Option<i64>,
    pub sold_out: Option<bool>,
    pub allow_waitlist: Option<bool>,
    pub capacity: Option<i64>,
    pub upcoming_total_capacity: Option<i64>,
    pub address: Option<String>,
    pub venue_name: Option<String>,
    pub time_slots: Option<Connection<UpstreamTimeSlot>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HostEventsData {
    pub host: Option<HostNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HostNode {
    pub events: Option<Connection<UpstreamEvent>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventDetailData {
    pub event: Option<UpstreamEvent>,
}

// Age limits come back as labels for some hosts and bare numbers for others
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    }))
}
