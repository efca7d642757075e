use clap::builder::BoolishValueParser;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::AppEnv;

#[derive(Parser)]
#[command(
    name = "vidlearn",
    about = "Smart Video Learning Tool - turn YouTube videos into summaries, key points and quizzes",
    version,
    long_about = "An HTTP backend that extracts YouTube transcripts and uses an OpenAI-compatible model to generate exam-focused study packages: a short summary, key learning points and a 10-question multiple-choice quiz."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to a YAML configuration file
    #[arg(short, long, global = true, value_name = "FILE", env = "VIDLEARN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(flatten)]
    pub settings: SettingsArgs,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Inspect the effective configuration
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,
    },
}

/// Settings that override the configuration file, usually set through the environment
#[derive(Args, Debug, Default, Clone)]
pub struct SettingsArgs {
    /// Address to bind
    #[arg(long, global = true, env = "HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, global = true, env = "PORT")]
    pub port: Option<u16>,

    /// Deployment environment
    #[arg(long, global = true, value_enum, env = "APP_ENV")]
    pub app_env: Option<AppEnv>,

    /// Debug mode
    #[arg(long, global = true, env = "DEBUG", value_parser = BoolishValueParser::new())]
    pub debug: Option<bool>,

    /// Frontend origin allowed by CORS
    #[arg(long, global = true, env = "FRONTEND_URL")]
    pub frontend_url: Option<String>,

    /// API key for the text-completion provider
    #[arg(long, global = true, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Chat completions endpoint
    #[arg(long, global = true, env = "OPENAI_API_URL")]
    pub openai_api_url: Option<String>,

    /// Model name
    #[arg(long, global = true, env = "OPENAI_MODEL")]
    pub openai_model: Option<String>,

    /// Output token ceiling per generation call
    #[arg(long, global = true, env = "OPENAI_MAX_TOKENS")]
    pub openai_max_tokens: Option<u32>,

    /// Run summary, key point and quiz generation concurrently
    #[arg(long, global = true, env = "CONCURRENT_GENERATION", value_parser = BoolishValueParser::new())]
    pub concurrent_generation: Option<bool>,

    /// Caption language requested from YouTube
    #[arg(long, global = true, env = "TRANSCRIPT_LANGUAGE")]
    pub transcript_language: Option<String>,
}
