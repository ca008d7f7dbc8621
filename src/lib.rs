//! sitefeed: report feed ingestion, selection and rendering for a static site.
//!
//! A page load picks a [`pipeline::PageMode`], runs the matching pipeline
//! through a [`pipeline::Bootstrap`], and reports staged progress until the
//! preloader is hidden. Update notice visibility is tracked separately by
//! [`notice::NoticeController`] against a [`state::StateStore`].

pub mod config;
pub mod feed;
pub mod notice;
pub mod pipeline;
pub mod progress;
pub mod render;
pub mod reports;
pub mod scheduler;
pub mod state;
pub mod util;

pub use config::{load_settings, Config, Settings};
