//! Display languages and the localized try summary.

use serde::{Deserialize, Serialize};

use crate::analysis::TrySummary;

/// Languages the exhibit cycles through, in button order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    Hebrew,
    English,
    Arabic,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Hebrew, Language::English, Language::Arabic];

    /// Next language in the cycle, wrapping back to Hebrew
    pub fn next(self) -> Self {
        match self {
            Language::Hebrew => Language::English,
            Language::English => Language::Arabic,
            Language::Arabic => Language::Hebrew,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::Hebrew => "he",
            Language::English => "en",
            Language::Arabic => "ar",
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            Language::Hebrew => "כח סוס",
            Language::English => "Horsepower",
            Language::Arabic => "نتائج قوة الحصان",
        }
    }

    /// Right-to-left scripts are right-aligned on the panel
    pub fn is_rtl(self) -> bool {
        matches!(self, Language::Hebrew | Language::Arabic)
    }
}

/// Format the last-try summary for the panel.
///
/// Height is shown in centimetres, everything else with one decimal except
/// horsepower, which needs two to be readable at human power levels.
pub fn summary_text(language: Language, mass_kg: f64, summary: &TrySummary) -> String {
    let height_cm = summary.distance_mm / 10.0;
    let seconds = summary.duration_s;
    let watts = summary.peak_watts;
    let hp = summary.peak_hp;

    match language {
        Language::Hebrew => format!(
            "הרמתם {mass_kg} ק\"ג לגובה {height_cm:.1} ס\"מ\n\
             תוך {seconds:.1} שניות\n\
             ההספק שהפקתם מגופכם הוא\n\
             {watts:.1} וואט = {hp:.2} כח סוס"
        ),
        Language::English => format!(
            "You lifted {mass_kg} kg to a height of {height_cm:.1} cm\n\
             It took {seconds:.1} seconds\n\
             The power you produced is\n\
             {watts:.1} watts = {hp:.2} horsepower"
        ),
        Language::Arabic => format!(
            "رفعت {mass_kg} كغم إلى ارتفاع {height_cm:.1} سم\n\
             استغرقت {seconds:.1} ثانية\n\
             الطاقة التي انتجتها هي\n\
             {watts:.1} واط = {hp:.2} حصان"
        ),
    }
}
