pub mod latency;
pub mod request_start;

pub use latency::{request_latency_middleware, unix_now, LatencyObserver};
pub use request_start::{extract_timestamp, REQUEST_START_HEADER};
