pub mod calculation;
pub mod certificate;
pub mod config;
pub mod report;
pub mod rules;
pub mod work_item;
