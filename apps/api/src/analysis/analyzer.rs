//! Mock analysis: content-blind by contract.
//!
//! The analyzer accepts the uploaded file's path and the job description,
//! but neither influences the output: scores are uniform draws and every
//! string list is a constant. Only the generated id and the two score draws
//! vary between calls. Do not add content sensitivity here.
//!
//! Randomness is drawn through the `ScoreSource` trait so tests can pin
//! deterministic outputs.

use std::ops::RangeInclusive;
use std::path::Path;
use std::sync::Arc;

use rand::Rng;
use uuid::Uuid;

use crate::models::analysis::{AnalysisResult, SkillsBreakdown};

pub const SCORE_RANGE: RangeInclusive<u32> = 70..=95;
pub const ATS_RANGE: RangeInclusive<u32> = 75..=95;

const KEYWORDS: [&str; 5] = [
    "leadership",
    "project management",
    "React",
    "TypeScript",
    "UI/UX",
];

const MISSING_KEYWORDS: [&str; 3] = ["Python", "Flask", "data analysis"];

const PRESENT_SKILLS: [&str; 5] = [
    "JavaScript",
    "React",
    "HTML/CSS",
    "Git",
    "Responsive Design",
];

const MISSING_SKILLS: [&str; 4] = ["Python", "Flask", "SQL", "Data Visualization"];

const IMPROVEMENTS: [&str; 4] = [
    "Add more quantifiable achievements",
    "Include Python and Flask experience if applicable",
    "Tailor your professional summary to highlight relevant experience",
    "Add SQL and database management skills",
];

// ────────────────────────────────────────────────────────────────────────────
// Score source
// ────────────────────────────────────────────────────────────────────────────

/// Source of the two score draws. Implement to swap the default thread-rng
/// backend, e.g. for a pinned source in tests.
pub trait ScoreSource: Send + Sync {
    fn draw(&self, range: RangeInclusive<u32>) -> u32;
}

/// Default backend: uniform draws from the thread-local RNG.
pub struct ThreadRngScores;

impl ScoreSource for ThreadRngScores {
    fn draw(&self, range: RangeInclusive<u32>) -> u32 {
        rand::thread_rng().gen_range(range)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Analyzer
// ────────────────────────────────────────────────────────────────────────────

/// Produces a fresh synthetic analysis for every call.
#[derive(Clone)]
pub struct MockAnalyzer {
    scores: Arc<dyn ScoreSource>,
}

impl MockAnalyzer {
    pub fn new(scores: Arc<dyn ScoreSource>) -> Self {
        Self { scores }
    }

    /// (file path, job description) → result. Both inputs are accepted and
    /// ignored.
    pub fn analyze(&self, _file_path: &Path, _job_description: &str) -> AnalysisResult {
        AnalysisResult {
            id: new_analysis_id(),
            score: self.scores.draw(SCORE_RANGE),
            keywords: to_strings(&KEYWORDS),
            missing_keywords: to_strings(&MISSING_KEYWORDS),
            skills: SkillsBreakdown {
                present: to_strings(&PRESENT_SKILLS),
                missing: to_strings(&MISSING_SKILLS),
            },
            improvements: to_strings(&IMPROVEMENTS),
            ats_compatibility: self.scores.draw(ATS_RANGE),
        }
    }
}

/// First 8 hex chars of a v4 UUID: short, opaque, 16^8 collision space.
fn new_analysis_id() -> String {
    let mut id = Uuid::new_v4().to_string();
    id.truncate(8);
    id
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
