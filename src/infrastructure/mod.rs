pub mod sleeper;

pub use sleeper::{RecordingSleeper, Sleeper, TokioSleeper};
