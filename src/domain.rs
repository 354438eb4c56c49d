mod contact_email;
mod contact_message;

pub use contact_email::ContactEmail;
pub use contact_message::{ContactMessage, ContactRequest};
