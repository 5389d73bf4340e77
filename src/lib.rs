pub mod configuration;
pub mod domain;
pub mod resend_client;
pub mod routes;
pub mod startup;
pub mod telemetry;
pub mod turnstile_client;
