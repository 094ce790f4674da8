pub mod loaders;
pub mod question;
pub mod quiz;
pub mod submission;

pub use loaders::{load_quiz_fixture, QuizFixture};
pub use question::{Question, QuestionView};
pub use quiz::{Availability, ClassroomQuiz, Quiz};
pub use submission::{
    AnswerSnapshot, LeaderboardEntry, QuestionOutcome, QuizResult, StudentRef, SubmissionAck,
    SubmitAnswersRequest,
};
