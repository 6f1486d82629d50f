// Reqwest- and chrono-backed implementations of the app ports
pub mod clock;
pub mod graphql_adapter;
pub mod http_client;
pub mod oauth_adapter;

pub use clock::SystemClock;
pub use graphql_adapter::ReqwestGraphQL;
pub use http_client::build_http_client;
pub use oauth_adapter::ReqwestTokenExchange;
