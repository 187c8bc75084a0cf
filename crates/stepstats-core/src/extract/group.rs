use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Nested sections of a `HighScore` whose children become prefixed columns.
///
/// Iteration order is the order the sections are flattened into a row.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, IntoStaticStr, Display,
)]
pub enum ScoreGroup {
    #[strum(serialize = "TapNoteScores")]
    TapNoteScores,
    #[strum(serialize = "HoldNoteScores")]
    HoldNoteScores,
    #[strum(serialize = "RadarValues")]
    RadarValues,
}

impl ScoreGroup {
    /// Element name of the section under `HighScore`
    pub fn tag(&self) -> &'static str {
        self.into()
    }

    /// Column prefix, e.g. `tapnotescores`
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::TapNoteScores => "tapnotescores",
            Self::HoldNoteScores => "holdnotescores",
            Self::RadarValues => "radarvalues",
        }
    }

    /// Column name for a child element of this section
    pub fn column(&self, child_tag: &str) -> String {
        format!("{}_{}", self.prefix(), child_tag.to_lowercase())
    }

    /// Whether `tag` names one of the reserved sections (case-sensitive)
    pub fn is_group_tag(tag: &str) -> bool {
        tag.parse::<ScoreGroup>().is_ok()
    }
}
