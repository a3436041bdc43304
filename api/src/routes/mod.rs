pub mod root_route;
pub mod webhook;
