pub mod key_synthesizer;
pub mod payload_encoder;
pub mod prompts;
pub mod report_generator;
pub mod submission_grader;
pub mod warn_writer;

pub use key_synthesizer::KeySynthesizer;
pub use payload_encoder::encode_file;
pub use report_generator::{audit_totals, generate_csv, summarize, ReportSummary, TotalMismatch};
pub use submission_grader::{RetryPolicy, SubmissionGrader};
pub use warn_writer::WarnWriter;
