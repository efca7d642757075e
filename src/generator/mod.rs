//! Learning package generation.
//!
//! A transcript goes through four ordered stages: validation, summary, key
//! points and quiz. Each generation stage makes exactly one call to the
//! text-completion provider. The first failing stage aborts the run and
//! every output produced so far is dropped, so callers either get a complete
//! [`LearningPackage`] or a [`GenerationError`] naming the failed [`Stage`].

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod llm;
pub mod parse;
pub mod prompts;

pub use llm::{CompletionClient, CompletionRequest, LlmError, OpenAiClient};
pub use parse::{parse_key_points, parse_quiz, QuizError};

/// Number of questions every quiz must contain
pub const QUIZ_LENGTH: usize = 10;

/// Number of answer options per question
pub const OPTIONS_PER_QUESTION: usize = 4;

/// Sampling temperature used for every generation stage
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Position of the correct option, serialized as `"A"`..`"D"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerLetter {
    A,
    B,
    C,
    D,
}

impl AnswerLetter {
    pub fn from_letter(letter: &str) -> Option<Self> {
        match letter {
            "A" => Some(AnswerLetter::A),
            "B" => Some(AnswerLetter::B),
            "C" => Some(AnswerLetter::C),
            "D" => Some(AnswerLetter::D),
            _ => None,
        }
    }

    /// Zero-based index into [`QuizQuestion::options`]
    pub fn index(&self) -> usize {
        match self {
            AnswerLetter::A => 0,
            AnswerLetter::B => 1,
            AnswerLetter::C => 2,
            AnswerLetter::D => 3,
        }
    }
}

/// A multiple-choice question with exactly four options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: [String; OPTIONS_PER_QUESTION],
    pub correct_answer: AnswerLetter,
}

impl QuizQuestion {
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_answer.index()]
    }
}

/// Summary, key points and quiz generated from one transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningPackage {
    pub summary: String,
    pub key_points: Vec<String>,
    pub quiz: Vec<QuizQuestion>,
}

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ValidateTranscript,
    Summary,
    KeyPoints,
    Quiz,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::ValidateTranscript => write!(f, "validate_transcript"),
            Stage::Summary => write!(f, "summary"),
            Stage::KeyPoints => write!(f, "key_points"),
            Stage::Quiz => write!(f, "quiz"),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum GenerationError {
    #[error("Transcript is empty")]
    EmptyTranscript,

    #[error("Summary generation failed: {0}")]
    SummaryGenerationFailed(#[source] LlmError),

    #[error("Key points generation failed: {0}")]
    KeyPointsGenerationFailed(#[source] LlmError),

    #[error("Quiz generation failed: {0}")]
    QuizGenerationFailed(#[source] QuizError),
}

impl GenerationError {
    /// The stage that produced this failure
    pub fn stage(&self) -> Stage {
        match self {
            GenerationError::EmptyTranscript => Stage::ValidateTranscript,
            GenerationError::SummaryGenerationFailed(_) => Stage::Summary,
            GenerationError::KeyPointsGenerationFailed(_) => Stage::KeyPoints,
            GenerationError::QuizGenerationFailed(_) => Stage::Quiz,
        }
    }
}

/// Sampling and scheduling settings for the generator
#[derive(Debug, Clone)]
pub struct GeneratorSettings {
    pub temperature: f32,
    pub max_tokens: u32,

    /// Run the three generation stages concurrently instead of in order
    pub concurrent: bool,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: 2000,
            concurrent: false,
        }
    }
}

/// Turns transcripts into learning packages using a text-completion provider
pub struct LearningPackageGenerator {
    client: Box<dyn CompletionClient>,
    settings: GeneratorSettings,
}

impl LearningPackageGenerator {
    pub fn new(client: Box<dyn CompletionClient>, settings: GeneratorSettings) -> Self {
        Self { client, settings }
    }

    /// Run every stage and assemble the package
    pub async fn generate_learning_package(
        &self,
        transcript: &str,
    ) -> Result<LearningPackage, GenerationError> {
        if transcript.trim().is_empty() {
            tracing::warn!("Refusing to generate a learning package from an empty transcript");
            return Err(GenerationError::EmptyTranscript);
        }

        let (summary, key_points, quiz) = if self.settings.concurrent {
            tokio::try_join!(
                self.generate_summary(transcript),
                self.generate_key_points(transcript),
                self.generate_quiz(transcript),
            )?
        } else {
            let summary = self.generate_summary(transcript).await?;
            let key_points = self.generate_key_points(transcript).await?;
            let quiz = self.generate_quiz(transcript).await?;
            (summary, key_points, quiz)
        };

        tracing::info!(
            "Learning package assembled: {} key points, {} questions",
            key_points.len(),
            quiz.len()
        );

        Ok(LearningPackage {
            summary,
            key_points,
            quiz,
        })
    }

    /// Generate a 2-3 sentence exam-focused summary
    pub async fn generate_summary(&self, transcript: &str) -> Result<String, GenerationError> {
        tracing::info!("Generating summary");

        let raw = self
            .complete(prompts::SUMMARY_SYSTEM_PROMPT, prompts::summary_prompt(transcript))
            .await
            .map_err(|e| log_failure(GenerationError::SummaryGenerationFailed(e)))?;

        Ok(raw.trim().to_string())
    }

    /// Generate the key learning points
    pub async fn generate_key_points(&self, transcript: &str) -> Result<Vec<String>, GenerationError> {
        tracing::info!("Generating key points");

        let raw = self
            .complete(prompts::KEY_POINTS_SYSTEM_PROMPT, prompts::key_points_prompt(transcript))
            .await
            .map_err(|e| log_failure(GenerationError::KeyPointsGenerationFailed(e)))?;

        let points = parse_key_points(&raw);
        tracing::debug!("Parsed {} key points", points.len());

        Ok(points)
    }

    /// Generate exactly [`QUIZ_LENGTH`] multiple-choice questions
    pub async fn generate_quiz(&self, transcript: &str) -> Result<Vec<QuizQuestion>, GenerationError> {
        tracing::info!("Generating quiz");

        let raw = self
            .complete(prompts::QUIZ_SYSTEM_PROMPT, prompts::quiz_prompt(transcript))
            .await
            .map_err(QuizError::from)
            .map_err(|e| log_failure(GenerationError::QuizGenerationFailed(e)))?;

        parse_quiz(raw.trim()).map_err(|e| log_failure(GenerationError::QuizGenerationFailed(e)))
    }

    async fn complete(&self, system: &str, prompt: String) -> Result<String, LlmError> {
        self.client
            .complete(CompletionRequest {
                system: system.to_string(),
                prompt,
                temperature: self.settings.temperature,
                max_tokens: self.settings.max_tokens,
            })
            .await
    }
}

fn log_failure(error: GenerationError) -> GenerationError {
    tracing::warn!("Stage {} failed: {}", error.stage(), error);
    error
}
