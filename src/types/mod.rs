// Public modules
pub mod chat_completion;
pub mod server_record;
pub mod turn;

// Re-exports
pub use chat_completion::{
    ChatCompletionChoice, ChatCompletionMessage, ChatCompletionRequest, ChatCompletionResponse,
};
pub use server_record::{ServerRecord, ServerUrl};
pub use turn::{Role, Turn};
