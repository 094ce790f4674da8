pub mod offline_client;
pub mod quiz_api;
pub mod quiz_client;

pub use offline_client::OfflineQuizApi;
pub use quiz_api::QuizApi;
pub use quiz_client::QuizClient;
