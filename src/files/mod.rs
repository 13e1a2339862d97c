pub mod file_manager;
pub mod manifest;
pub mod report_writer;
