pub mod llm_service;
pub mod prompts;
pub mod question_generator;
pub mod response_parser;
pub mod type_selector;

pub use llm_service::{ChatBackend, LlmService};
pub use question_generator::{QuestionGenerator, QuestionSource};
pub use type_selector::{random_question_types, select_question_types, QUESTION_COUNT};
