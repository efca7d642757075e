//! Smart Video Learning Tool - a backend that turns YouTube videos into study material
//!
//! This library extracts the caption transcript of a YouTube video and asks an
//! OpenAI-compatible model for a summary, key learning points and a
//! ten-question multiple-choice quiz, exposed over a small JSON HTTP API.

pub mod cli;
pub mod config;
pub mod extractors;
pub mod generator;
pub mod server;
pub mod transcript;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use extractors::{validate_url, VideoId};
pub use generator::{LearningPackage, LearningPackageGenerator, QuizQuestion};
pub use transcript::{TranscriptService, TranscriptSource};
