pub mod signature;
pub mod webhook_payload;
pub mod webhook_route;
