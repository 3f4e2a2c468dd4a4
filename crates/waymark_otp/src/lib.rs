pub mod error;
pub mod geocoder_client;
pub mod otp_client;
pub mod plan_response;
pub mod reachable_response;
