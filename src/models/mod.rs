pub mod question;
pub mod quiz;

pub use question::{
    GeneratedQuestion, MultipleChoiceQuestion, NumberedQuestion, OxQuestion, QuestionType,
    ShortAnswerQuestion,
};
pub use quiz::{QuizRequest, QuizResult, DEFAULT_DIFFICULTY, MAX_DIFFICULTY, MIN_DIFFICULTY};
