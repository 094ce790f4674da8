pub mod http_client;
pub mod tick_scheduler;

pub use http_client::ApiClient;
pub use tick_scheduler::TickScheduler;
