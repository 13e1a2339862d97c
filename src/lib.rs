pub mod config;
pub mod db;
pub mod error;
pub mod files;
pub mod question_catalog;
pub mod ui;
pub mod utils;

pub use db::stats;
pub use db::store::{AnswerRow, SurveyStore};
pub use error::{StoreError, StoreResult};
