use serde::{Deserialize, Serialize};

/// A completed resume analysis, exactly as returned to API clients.
///
/// Field order matches the wire format; keys are camelCase on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub id: String,
    pub score: u32,
    pub keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub skills: SkillsBreakdown,
    pub improvements: Vec<String>,
    pub ats_compatibility: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillsBreakdown {
    pub present: Vec<String>,
    pub missing: Vec<String>,
}
