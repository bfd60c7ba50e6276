//! JSON file implementations of the repository ports.

mod json_file;
mod json_settings_repository;
mod json_word_list_repository;

pub use json_settings_repository::JsonSettingsRepository;
pub use json_word_list_repository::JsonWordListRepository;

pub(crate) use json_file::{read_json, write_json};
