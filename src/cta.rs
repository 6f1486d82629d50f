//! Purchase-button classification.
//!
//! Every event resolves to exactly one of three call-to-action outcomes:
//! buy tickets, join the waitlist, or a disabled "Sold Out" button.

use serde::{Deserialize, Serialize};

/// Availability fields the classification depends on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CtaInput {
    pub sold_out: bool,
    pub allow_waitlist: bool,
    pub tickets_sold: Option<i64>,
    pub capacity: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CtaLabel {
    #[serde(rename = "Get Tickets")]
    GetTickets,
    #[serde(rename = "Join Waitlist")]
    JoinWaitlist,
    #[serde(rename = "Sold Out")]
    SoldOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CtaDecision {
    pub label: CtaLabel,
    pub sold_out: bool,
    pub use_waitlist: bool,
    pub disabled: bool,
}

impl CtaDecision {
    pub fn evaluate(input: CtaInput) -> Self {
        let sold_out = is_sold_out(&input);
        let use_waitlist = sold_out && input.allow_waitlist;
        let disabled = sold_out && !input.allow_waitlist;

        let label = if use_waitlist {
            CtaLabel::JoinWaitlist
        } else if disabled {
            CtaLabel::SoldOut
        } else {
            CtaLabel::GetTickets
        };

        Self {
            label,
            sold_out,
            use_waitlist,
            disabled,
        }
    }
}

/// Sold out when flagged upstream or when a known capacity has been reached.
/// A zero or missing capacity never implies sold out.
pub fn is_sold_out(input: &CtaInput) -> bool {
    if input.sold_out {
        return true;
    }
    match input.capacity {
        Some(capacity) if capacity > 0 => input.tickets_sold.unwrap_or(0) >= capacity,
        _ => false,
    }
}
