pub mod secret;
pub mod sensitive_data;
