pub mod latest_wins_queue;
pub mod request_coordinator;
pub mod throttle;
