pub mod api_router;
pub mod config;
pub mod dashboard;
pub mod directory;
pub mod realtime;
pub mod shared;
pub mod tickets;
