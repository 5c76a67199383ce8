pub mod answer_key_loader;
pub mod booklet_scanner;

pub use answer_key_loader::{load_answer_key, save_answer_key};
pub use booklet_scanner::scan_booklets;
