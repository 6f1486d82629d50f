use crate::cta::{CtaDecision, CtaInput};
use crate::gateway::schema::{photo_url, UpstreamEvent, UpstreamTimeSlot};
use crate::types::{EventDetail, EventSummary, TimeSlot};

/// Derived `(capacity, tickets_sold)`.
///
/// Capacity is the first non-zero of the event capacity and the upcoming
/// total capacity. When both are zero or missing and the timeslots carry
/// their own counts (timed-entry events), both values are summed across slots.
pub fn derive_capacity(event: &UpstreamEvent) -> (i64, i64) {
    let capacity = [event.capacity, event.upcoming_total_capacity]
        .into_iter()
        .flatten()
        .find(|c| *c != 0)
        .unwrap_or(0);
    let tickets_sold = event.tickets_sold.unwrap_or(0);

    if capacity != 0 {
        return (capacity, tickets_sold);
    }

    let slots: &[UpstreamTimeSlot] = event
        .time_slots
        .as_ref()
        .and_then(|c| c.nodes.as_deref())
        .unwrap_or(&[]);

    if !slots.iter().any(UpstreamTimeSlot::carries_counts) {
        return (0, tickets_sold);
    }

    let slot_capacity: i64 = slots.iter().filter_map(|s| s.capacity).sum();
    let slot_sold: i64 = slots.iter().filter_map(|s| s.attendee_count).sum();
    (slot_capacity, slot_sold)
}

pub fn summarize(event: UpstreamEvent) -> EventSummary {
    let (capacity, tickets_sold) = derive_capacity(&event);
    let sold_out = event.sold_out.unwrap_or(false);
    let allow_waitlist = event.allow_waitlist.unwrap_or(false);

    let time_slots = event
        .time_slots
        .map(|c| c.into_nodes())
        .unwrap_or_default()
        .into_iter()
        .map(|slot| TimeSlot {
            start_at: slot.start_at,
            end_at: slot.end_at,
        })
        .collect();

    let cta = CtaDecision::evaluate(CtaInput {
        sold_out,
        allow_waitlist,
        tickets_sold: Some(tickets_sold),
        capacity: Some(capacity),
    });

    EventSummary {
        id: event.id,
        title: event.title.unwrap_or_default(),
        url: event.url,
        age_limit: event.age_limit,
        min_price: event.min_price,
        max_price: event.max_price,
        sold_out,
        allow_waitlist,
        capacity,
        tickets_sold,
        cover_image_url: photo_url(event.cover_photo),
        event_photo_url: photo_url(event.event_photo),
        time_slots,
        cta,
    }
}

pub fn detail(mut event: UpstreamEvent) -> EventDetail {
    let description = event.description.take();
    let accessibility_description = event.accessibility_description.take();
    let address = event.address.take();
    let venue_name = event.venue_name.take();
    let additional_images = event
        .additional_images
        .take()
        .unwrap_or_default()
        .into_iter()
        .filter_map(|img| photo_url(Some(img)))
        .collect();

    EventDetail {
        summary: summarize(event),
        description,
        accessibility_description,
        address,
        venue_name,
        additional_images,
    }
}
