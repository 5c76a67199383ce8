pub mod answer_key;
pub mod loaders;
pub mod payload;
pub mod result;

pub use answer_key::{AnswerKey, AnswerKeyItem, EvaluationParameter, QuestionType};
pub use loaders::{load_answer_key, save_answer_key, scan_booklets};
pub use payload::EncodedFile;
pub use result::{GradedQuestion, ParameterScore, StudentResult};
