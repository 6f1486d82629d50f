use serde_json::json;

use crate::app::ports::GraphQLRequest;
use crate::constants::{
    DETAIL_ADDITIONAL_IMAGE_SIZE, DETAIL_COVER_PHOTO_SIZE, DETAIL_EVENT_PHOTO_SIZE,
    DETAIL_TIMESLOT_LIMIT, LIST_COVER_PHOTO_SIZE, LIST_EVENT_LIMIT, LIST_EVENT_PHOTO_SIZE,
    PROBE_EVENT_LIMIT,
};

/// Lightweight host listing: posted events only, timeslots as start/end pairs.
pub fn event_list(host_id: &str, timeslot_limit: u32) -> GraphQLRequest {
    let query = format!(
        r#"
        query GetEvents($hostId: ID!) {{
          host(id: $hostId) {{
            events(states: [POSTED]) {{
              totalCount
              nodes(limit: {event_limit}, offset: 0) {{
                id
                title
                url
                ageLimit
                eventPhoto {{
                  url(width: {ep_w}, height: {ep_h})
                }}
                coverPhoto {{
                  url(width: {cp_w}, height: {cp_h})
                }}
                minPrice
                maxPrice
                ticketsSold
                soldOut
                allowWaitlist
                capacity
                upcomingTotalCapacity
                timeSlots {{
                  nodes(limit: {timeslot_limit}, offset: 0) {{
                    startAt
                    endAt
                  }}
                }}
              }}
            }}
          }}
        }}
        "#,
        event_limit = LIST_EVENT_LIMIT,
        ep_w = LIST_EVENT_PHOTO_SIZE.0,
        ep_h = LIST_EVENT_PHOTO_SIZE.1,
        cp_w = LIST_COVER_PHOTO_SIZE.0,
        cp_h = LIST_COVER_PHOTO_SIZE.1,
        timeslot_limit = timeslot_limit,
    );

    GraphQLRequest {
        query,
        variables: Some(json!({ "hostId": host_id })),
    }
}

/// Full single-event view, including per-slot counts for timed-entry events.
pub fn event_detail(event_id: &str) -> GraphQLRequest {
    let query = format!(
        r#"
        query GetEventDetail($id: ID!) {{
          event(id: $id) {{
            id
            title
            url
            description(format: HTML)
            ageLimit
            accessibilityDescription(format: HTML)
            eventPhoto {{
              url(width: {ep_w}, height: {ep_h})
            }}
            additionalImages {{
              url(width: {ai_w}, height: {ai_h})
            }}
            coverPhoto {{
              url(width: {cp_w}, height: {cp_h})
            }}
            minPrice
            maxPrice
            ticketsSold
            soldOut
            allowWaitlist
            capacity
            upcomingTotalCapacity
            address
            venueName
            timeSlots {{
              nodes(limit: {timeslot_limit}, offset: 0) {{
                startAt
                endAt
                capacity
                attendeeCount
              }}
            }}
          }}
        }}
        "#,
        ep_w = DETAIL_EVENT_PHOTO_SIZE.0,
        ep_h = DETAIL_EVENT_PHOTO_SIZE.1,
        ai_w = DETAIL_ADDITIONAL_IMAGE_SIZE.0,
        ai_h = DETAIL_ADDITIONAL_IMAGE_SIZE.1,
        cp_w = DETAIL_COVER_PHOTO_SIZE.0,
        cp_h = DETAIL_COVER_PHOTO_SIZE.1,
        timeslot_limit = DETAIL_TIMESLOT_LIMIT,
    );

    GraphQLRequest {
        query,
        variables: Some(json!({ "id": event_id })),
    }
}

/// Connectivity probe: a few events with their first and last slot and slot count.
pub fn probe(host_id: &str) -> GraphQLRequest {
    let query = format!(
        r#"
        query ProbeEvents($hostId: ID!) {{
          host(id: $hostId) {{
            events(states: [POSTED]) {{
              nodes(limit: {event_limit}) {{
                title
                firstTimeSlot: timeSlots(first: 1) {{
                  nodes {{
                    startAt
                    endAt
                  }}
                }}
                lastTimeSlot: timeSlots(last: 1) {{
                  nodes {{
                    startAt
                    endAt
                  }}
                }}
                timeSlots {{
                  totalCount
                }}
              }}
            }}
          }}
        }}
        "#,
        event_limit = PROBE_EVENT_LIMIT,
    );

    GraphQLRequest {
        query,
        variables: Some(json!({ "hostId": host_id })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_embeds_limits() {
        let req = event_list("host-1", 25);
        assert!(req.query.contains("GetEvents"));
        assert!(req.query.contains("nodes(limit: 50, offset: 0)"));
        assert!(req.query.contains("nodes(limit: 25, offset: 0)"));
        assert!(req.query.contains("url(width: 800, height: 400)"));
        assert!(!req.query.contains("attendeeCount"));
        assert_eq!(req.variables.unwrap()["hostId"], "host-1");
    }

    #[test]
    fn test_detail_query_requests_full_fields() {
        let req = event_detail("evt-9");
        for field in [
            "description(format: HTML)",
            "venueName",
            "soldOut",
            "allowWaitlist",
            "attendeeCount",
        ] {
            assert!(req.query.contains(field), "missing {}", field);
        }
        assert!(req.query.contains("nodes(limit: 50, offset: 0)"));
        assert_eq!(req.variables.unwrap()["id"], "evt-9");
    }

    #[test]
    fn test_probe_query_is_bounded() {
        let req = probe("host-1");
        assert!(req.query.contains("nodes(limit: 5)"));
        assert!(req.query.contains("firstTimeSlot"));
    }
}
