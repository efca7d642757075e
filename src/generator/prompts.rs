//! Prompt templates for the three generation stages.

pub const SUMMARY_SYSTEM_PROMPT: &str = "You are an expert educator creating study materials.";

pub const KEY_POINTS_SYSTEM_PROMPT: &str = "You are an expert educator identifying key concepts.";

pub const QUIZ_SYSTEM_PROMPT: &str = "You are an expert educator creating quiz questions. \
You MUST generate EXACTLY 10 questions in valid JSON format.";

pub fn summary_prompt(transcript: &str) -> String {
    format!(
        r#"You are an expert educator creating study materials for students.

Task: write a concise, exam-focused summary of the video transcript below.

Requirements:
- 2-3 sentences at most
- Cover only the most important concepts
- Use simple, clear academic language
- Leave out examples and side details
- Plain text only, no headings or lists

Transcript:
{transcript}

Summary:"#
    )
}

pub fn key_points_prompt(transcript: &str) -> String {
    format!(
        r#"You are an expert educator identifying key concepts in video content.

Task: extract 5-7 KEY LEARNING POINTS from the transcript below.

Requirements:
- Each point is one CORE CONCEPT from the transcript
- Number the points as a list: 1., 2., 3., ...
- One clear sentence per point
- NO REPETITION: every point must be distinct
- Simple, actionable language, starting with a strong verb where possible

Transcript:
{transcript}

Key Learning Points:"#
    )
}

pub fn quiz_prompt(transcript: &str) -> String {
    format!(
        r#"You are an expert educator writing multiple-choice quiz questions.

Task: write EXACTLY 10 multiple-choice questions based on the transcript below.

CRITICAL CONSTRAINTS:
- Generate EXACTLY 10 questions, no more and no less
- Every question must be answerable from the transcript
- Every question has 4 unique options (A, B, C, D)
- The correct answer is one of: A, B, C or D
- No trick questions and no ambiguous answers
- All 4 options are plausible, only one is correct
- Test understanding rather than rote memory

Output format (valid JSON only):
[
  {{
    "question": "Question text?",
    "options": ["option A", "option B", "option C", "option D"],
    "correct_answer": "A"
  }}
]

Transcript:
{transcript}

Quiz Questions (MUST be exactly 10):"#
    )
}
