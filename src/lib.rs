pub mod config;
pub mod contact_form;
pub mod domain;
pub mod email_client;
mod routes;
pub mod startup;
pub mod telemetry;
mod util;

pub use routes::SEND_EMAIL_PATH;
pub use startup::run;
