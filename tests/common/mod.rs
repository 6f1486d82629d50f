#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use event_gateway::app::ports::{
    Clock, GraphQLPort, GraphQLRequest, TokenExchangePort, TokenGrant,
};
use event_gateway::config::ClientCredentials;
use event_gateway::error::{GatewayError, Result};
use event_gateway::gateway::{EventGateway, GatewayPorts, GatewaySettings};

pub struct ManualClock(pub AtomicI64);

impl ManualClock {
    pub fn advance(&self, ms: i64) {
        self.0.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Token endpoint double counting exchanges; can be switched to reject
pub struct MockTokenEndpoint {
    pub calls: AtomicUsize,
    pub reject: AtomicBool,
}

#[async_trait]
impl TokenExchangePort for MockTokenEndpoint {
    async fn exchange(&self, _credentials: &ClientCredentials) -> Result<TokenGrant> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.reject.load(Ordering::SeqCst) {
            return Err(GatewayError::UpstreamAuth("invalid_client".into()));
        }
        Ok(TokenGrant {
            access_token: Some(format!("token-{}", n)),
            expires_in: Some(7200.0),
        })
    }
}

/// GraphQL endpoint double answering by operation name
pub struct MockGraphQL {
    pub list_calls: AtomicUsize,
    pub detail_calls: AtomicUsize,
    pub probe_calls: AtomicUsize,
    pub fail: AtomicBool,
    /// `hostId` or `id` variable of the most recent query
    pub last_target: Mutex<Option<String>>,
}

impl MockGraphQL {
    pub fn last_target(&self) -> Option<String> {
        self.last_target.lock().unwrap().clone()
    }
}

#[async_trait]
impl GraphQLPort for MockGraphQL {
    async fn execute(&self, _token: &str, request: &GraphQLRequest) -> Result<Value> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(GatewayError::UpstreamQuery(
                "GraphQL errors: upstream unavailable".into(),
            ));
        }
        let variables = request.variables.clone().unwrap_or(Value::Null);
        let target = variables["hostId"].as_str().or(variables["id"].as_str());
        *self.last_target.lock().unwrap() = target.map(str::to_string);

        if request.query.contains("GetEventDetail") {
            self.detail_calls.fetch_add(1, Ordering::SeqCst);
            return Ok(detail_payload(variables["id"].as_str().unwrap_or_default()));
        }
        if request.query.contains("ProbeEvents") {
            self.probe_calls.fetch_add(1, Ordering::SeqCst);
            return Ok(json!({ "host": { "events": { "nodes": [
                { "title": "Sample", "timeSlots": { "totalCount": 2 } }
            ]}}}));
        }
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(list_payload(variables["hostId"].as_str().unwrap_or_default()))
    }
}

fn list_payload(host_id: &str) -> Value {
    if host_id == "empty-host" {
        return json!({ "host": { "events": { "totalCount": 0, "nodes": [] } } });
    }
    if host_id == "ragged-host" {
        return json!({ "host": { "events": {
            "totalCount": 2,
            "nodes": [
                {
                    "id": "unscheduled",
                    "title": "Unscheduled",
                    "timeSlots": { "nodes": [ { "startAt": null, "endAt": null } ] }
                },
                {
                    "id": "local-time",
                    "title": "Local Time",
                    "timeSlots": { "nodes": [
                        { "startAt": "2024-06-01T18:00:00", "endAt": "2024-06-01T20:00:00Z" }
                    ]}
                }
            ]
        }}});
    }
    json!({ "host": { "events": {
        "totalCount": 3,
        "nodes": [
            {
                "id": "spring-gala",
                "title": "Spring Gala",
                "url": "https://tickets.example/spring-gala",
                "ageLimit": "21+",
                "eventPhoto": { "url": "https://img.example/gala-400.jpg" },
                "coverPhoto": { "url": "https://img.example/gala-cover.jpg" },
                "minPrice": 25.0,
                "maxPrice": 80.0,
                "ticketsSold": 0,
                "soldOut": true,
                "allowWaitlist": false,
                "capacity": 200,
                "upcomingTotalCapacity": 200,
                "timeSlots": { "nodes": [
                    { "startAt": "2024-03-01T19:00:00Z", "endAt": "2024-03-01T23:00:00Z" }
                ]}
            },
            {
                "id": "tbd",
                "title": "Date To Be Announced",
                "soldOut": false,
                "allowWaitlist": false,
                "timeSlots": { "nodes": [] }
            },
            {
                "id": "winter-market",
                "title": "Winter Market",
                "soldOut": true,
                "allowWaitlist": true,
                "capacity": null,
                "upcomingTotalCapacity": 150,
                "ticketsSold": 150,
                "timeSlots": { "nodes": [
                    { "startAt": "2024-02-01T10:00:00Z", "endAt": "2024-02-01T16:00:00Z" },
                    { "startAt": "2024-01-15T10:00:00Z", "endAt": "2024-01-15T16:00:00Z" }
                ]}
            }
        ]
    }}})
}

fn detail_payload(event_id: &str) -> Value {
    if event_id == "missing" {
        return json!({ "event": null });
    }
    json!({ "event": {
        "id": event_id,
        "title": "Museum Timed Entry",
        "url": "https://tickets.example/museum",
        "description": "<p>Walk through the galleries.</p>",
        "accessibilityDescription": "<p>Wheelchair accessible.</p>",
        "ageLimit": null,
        "eventPhoto": { "url": "https://img.example/museum-400.jpg" },
        "additionalImages": [
            { "url": "https://img.example/museum-1.jpg" },
            { "url": "https://img.example/museum-2.jpg" }
        ],
        "coverPhoto": { "url": "https://img.example/museum-cover.jpg" },
        "minPrice": 0.0,
        "maxPrice": 15.0,
        "ticketsSold": 0,
        "soldOut": false,
        "allowWaitlist": false,
        "capacity": 0,
        "upcomingTotalCapacity": 0,
        "address": "1 Museum Way",
        "venueName": "City Museum",
        "timeSlots": { "nodes": [
            {
                "startAt": "2024-01-15T10:00:00Z",
                "endAt": "2024-01-15T11:00:00Z",
                "capacity": 50,
                "attendeeCount": 10
            },
            {
                "startAt": "2024-01-15T11:00:00Z",
                "endAt": "2024-01-15T12:00:00Z",
                "capacity": 30,
                "attendeeCount": 5
            }
        ]}
    }})
}

pub struct TestGateway {
    pub gateway: EventGateway,
    pub tokens: Arc<MockTokenEndpoint>,
    pub graphql: Arc<MockGraphQL>,
    pub clock: Arc<ManualClock>,
}

pub fn test_gateway() -> TestGateway {
    let tokens = Arc::new(MockTokenEndpoint {
        calls: AtomicUsize::new(0),
        reject: AtomicBool::new(false),
    });
    let graphql = Arc::new(MockGraphQL {
        list_calls: AtomicUsize::new(0),
        detail_calls: AtomicUsize::new(0),
        probe_calls: AtomicUsize::new(0),
        fail: AtomicBool::new(false),
        last_target: Mutex::new(None),
    });
    let clock = Arc::new(ManualClock(AtomicI64::new(1_700_000_000_000)));

    let ports = GatewayPorts {
        token_exchange: tokens.clone(),
        graphql: graphql.clone(),
        clock: clock.clone(),
    };
    let credentials = Some(ClientCredentials {
        client_id: "client".into(),
        client_secret: "secret".into(),
    });

    TestGateway {
        gateway: EventGateway::new(ports, credentials, GatewaySettings::default()),
        tokens,
        graphql,
        clock,
    }
}

pub fn count(counter: &AtomicUsize) -> usize {
    counter.load(Ordering::SeqCst)
}
