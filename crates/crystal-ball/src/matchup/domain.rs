use std::collections::BTreeMap;

/// Attribute name to numeric value (or weight). Ordered so scoring iterates deterministically.
pub type AttributeMap = BTreeMap<String, f64>;

/// Marker reported in place of a winner name when both scores are identical.
pub const DRAW_LABEL: &str = "Draw";

/// A named contestant with numeric attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Competitor {
    pub name: String,
    pub attributes: AttributeMap,
}

impl Competitor {
    pub fn new(name: impl Into<String>, attributes: AttributeMap) -> Self {
        Self {
            name: name.into(),
            attributes,
        }
    }
}

/// A named contest with per-attribute weights. Weights may be negative.
#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    pub name: String,
    pub weights: AttributeMap,
}

impl Activity {
    pub fn new(name: impl Into<String>, weights: AttributeMap) -> Self {
        Self {
            name: name.into(),
            weights,
        }
    }
}

/// Which of the two compared competitors came out ahead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Winner(String),
    Draw,
}

impl Verdict {
    /// Winner name, or the draw marker.
    pub fn label(&self) -> &str {
        match self {
            Verdict::Winner(name) => name,
            Verdict::Draw => DRAW_LABEL,
        }
    }

    pub fn is_draw(&self) -> bool {
        matches!(self, Verdict::Draw)
    }

    /// Literal float comparison; exact equality is a draw. Callers reject non-finite scores first.
    pub(crate) fn from_scores(
        competitor1: &str,
        score1: f64,
        competitor2: &str,
        score2: f64,
    ) -> Self {
        if score1 == score2 {
            Verdict::Draw
        } else if score1 > score2 {
            Verdict::Winner(competitor1.to_string())
        } else {
            Verdict::Winner(competitor2.to_string())
        }
    }
}

/// Outcome of a single head-to-head comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonResult {
    pub activity: String,
    pub competitor1: String,
    pub score1: f64,
    pub competitor2: String,
    pub score2: f64,
    pub margin: f64,
    pub verdict: Verdict,
    pub commentary: Option<String>,
}

impl ComparisonResult {
    pub(crate) fn from_scores(
        activity: &str,
        competitor1: &str,
        score1: f64,
        competitor2: &str,
        score2: f64,
    ) -> Self {
        Self {
            activity: activity.to_string(),
            competitor1: competitor1.to_string(),
            score1,
            competitor2: competitor2.to_string(),
            score2,
            margin: (score1 - score2).abs(),
            verdict: Verdict::from_scores(competitor1, score1, competitor2, score2),
            commentary: None,
        }
    }

    pub fn winner_label(&self) -> &str {
        self.verdict.label()
    }
}
