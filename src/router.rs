//! Keyword-based model selection
//!
//! Categories are checked in a fixed priority order (reasoning, visual,
//! creative); the first category with any substring match wins, and a message
//! matching nothing goes to the reasoning model.

use serde::Serialize;

use crate::config::ModelChoice;

const REASONING_KEYWORDS: &[&str] = &[
    "تحليل", "حلل", "فكر", "استنتج", "خطة", "استراتيجية", "مشكلة", "حل", "منطق", "تفكير",
    "دراسة", "بحث", "تقييم", "مقارنة", "analyze", "think", "strategy", "plan", "problem",
    "solve", "logic", "reasoning",
];

const VISUAL_KEYWORDS: &[&str] = &[
    "صورة", "رسم", "تصميم", "موقع", "واجهة", "html", "css", "javascript", "كود", "برمجة",
    "تطبيق", "image", "draw", "design", "website", "code", "programming", "ui", "interface",
];

const CREATIVE_KEYWORDS: &[&str] = &[
    "قصة", "اكتب", "أنشئ", "إبداعي", "شعر", "مقال", "محتوى", "تسويق", "رسالة", "نص", "story",
    "write", "creative", "content", "article", "marketing", "text", "poetry",
];

/// Keyword sets in priority order
pub const KEYWORD_TABLE: &[(ModelChoice, &[&str])] = &[
    (ModelChoice::Reasoning, REASONING_KEYWORDS),
    (ModelChoice::Visual, VISUAL_KEYWORDS),
    (ModelChoice::Creative, CREATIVE_KEYWORDS),
];

/// Used when nothing matches
pub const DEFAULT_CHOICE: ModelChoice = ModelChoice::Reasoning;

/// Why a choice was made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteReason {
    Explicit,
    Keyword { keyword: &'static str },
    Default,
}

/// A routing decision together with its reason
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RouteDecision {
    pub choice: ModelChoice,
    pub reason: RouteReason,
}

/// Pick the model family for `message`
///
/// An explicit preference always wins.
#[must_use]
pub fn select_model(message: &str, preference: Option<ModelChoice>) -> ModelChoice {
    explain(message, preference).choice
}

/// Same as [`select_model`], also reporting which rule fired
#[must_use]
pub fn explain(message: &str, preference: Option<ModelChoice>) -> RouteDecision {
    if let Some(choice) = preference {
        return RouteDecision {
            choice,
            reason: RouteReason::Explicit,
        };
    }

    let lowered = message.to_lowercase();
    KEYWORD_TABLE
        .iter()
        .find_map(|(choice, keywords)| {
            keywords
                .iter()
                .copied()
                .find(|keyword| lowered.contains(keyword))
                .map(|keyword| RouteDecision {
                    choice: *choice,
                    reason: RouteReason::Keyword { keyword },
                })
        })
        .unwrap_or(RouteDecision {
            choice: DEFAULT_CHOICE,
            reason: RouteReason::Default,
        })
}
