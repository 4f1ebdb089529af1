//! Embassy tasks

pub mod show;

pub use show::show_task;
