// Lead forwarding: form submissions in, notification email or CRM record out.
// Nothing is stored locally.

pub mod crm;
pub mod email;
pub mod handlers;
pub mod models;
pub mod provider;
pub mod render;
