// Player records and the closed set of fields the table operates on.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DatasetError;

/// Highest valid RAS value. RAS lives in `[0, RAS_MAX]`.
pub const RAS_MAX: f64 = 10.0;

const PROFILE_SEARCH_BASE: &str = "https://ras.football/search/";

// ---------------------------------------------------------------------------
// DraftYear
// ---------------------------------------------------------------------------

/// Draft information as published: usually a year, sometimes free text
/// such as "2019 Round 2" or "Undrafted".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DraftYear {
    Year(i32),
    Text(String),
}

impl DraftYear {
    /// Parse draft text. A string that holds only an integer is a year.
    pub fn from_text(s: &str) -> Self {
        let trimmed = s.trim();
        match trimmed.parse::<i32>() {
            Ok(year) => DraftYear::Year(year),
            Err(_) => DraftYear::Text(trimmed.to_string()),
        }
    }

    fn field_value(&self) -> FieldValue<'_> {
        match self {
            DraftYear::Year(y) => FieldValue::Year(*y),
            DraftYear::Text(s) => FieldValue::Text(s),
        }
    }
}

impl Default for DraftYear {
    fn default() -> Self {
        DraftYear::Text("Unknown".to_string())
    }
}

impl fmt::Display for DraftYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DraftYear::Year(y) => write!(f, "{y}"),
            DraftYear::Text(s) => f.write_str(s),
        }
    }
}

// ---------------------------------------------------------------------------
// PlayerRecord
// ---------------------------------------------------------------------------

/// One athlete from the processed dataset.
///
/// `player` is the identity key within a single load. `ras_score`, when
/// present, is within `[0, 10]`; use [`valid_ras`] when building records
/// from untrusted input.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    pub player: String,
    pub position: String,
    pub ras_score: Option<f64>,
    pub pro_bowl_count: u32,
    pub college: String,
    pub draft_year: DraftYear,
    pub profile_url: Option<String>,
}

impl PlayerRecord {
    /// Build a record with the required fields. Out-of-range scores are
    /// dropped to absent.
    pub fn new(
        player: impl Into<String>,
        position: impl Into<String>,
        ras_score: Option<f64>,
        pro_bowl_count: u32,
    ) -> Self {
        PlayerRecord {
            player: player.into(),
            position: position.into(),
            ras_score: valid_ras(ras_score),
            pro_bowl_count,
            college: String::new(),
            draft_year: DraftYear::default(),
            profile_url: None,
        }
    }

    pub fn with_college(mut self, college: impl Into<String>) -> Self {
        self.college = college.into();
        self
    }

    pub fn with_draft_year(mut self, draft_year: DraftYear) -> Self {
        self.draft_year = draft_year;
        self
    }

    pub fn with_profile_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.profile_url = if url.trim().is_empty() { None } else { Some(url) };
        self
    }

    /// Read one field through the closed accessor set.
    pub fn value(&self, field: Field) -> FieldValue<'_> {
        match field {
            Field::Player => FieldValue::Text(&self.player),
            Field::Position => FieldValue::Text(&self.position),
            Field::RasScore => self
                .ras_score
                .map_or(FieldValue::Absent, FieldValue::Number),
            Field::ProBowlCount => FieldValue::Count(self.pro_bowl_count),
            Field::College => FieldValue::Text(&self.college),
            Field::DraftYear => self.draft_year.field_value(),
        }
    }

    /// Link to the player's RAS profile. Without a stored URL, falls back to
    /// the ras.football search page for the slugged name.
    pub fn profile_link(&self) -> String {
        if let Some(url) = &self.profile_url {
            return url.clone();
        }
        let slug = self
            .player
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-");
        format!("{PROFILE_SEARCH_BASE}{slug}/")
    }

    /// RAS formatted for display, `N/A` when absent.
    pub fn ras_display(&self) -> String {
        self.ras_score
            .map(|r| format!("{r:.2}"))
            .unwrap_or_else(|| "N/A".to_string())
    }
}

/// Keep a score only if it is finite and within `[0, 10]`.
pub fn valid_ras(score: Option<f64>) -> Option<f64> {
    score.filter(|s| s.is_finite() && (0.0..=RAS_MAX).contains(s))
}

// ---------------------------------------------------------------------------
// Field
// ---------------------------------------------------------------------------

/// The columns a table can be sorted or filtered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Player,
    Position,
    RasScore,
    ProBowlCount,
    College,
    DraftYear,
}

impl Field {
    /// Column order in the player table.
    pub const ALL: [Field; 6] = [
        Field::Player,
        Field::Position,
        Field::RasScore,
        Field::ProBowlCount,
        Field::College,
        Field::DraftYear,
    ];

    /// Canonical identifier, matching the JSON field name.
    pub fn key(&self) -> &'static str {
        match self {
            Field::Player => "player",
            Field::Position => "position",
            Field::RasScore => "rasScore",
            Field::ProBowlCount => "proBowlCount",
            Field::College => "college",
            Field::DraftYear => "draftYear",
        }
    }

    /// Column header text.
    pub fn label(&self) -> &'static str {
        match self {
            Field::Player => "Player",
            Field::Position => "Position",
            Field::RasScore => "RAS",
            Field::ProBowlCount => "Pro Bowls",
            Field::College => "College",
            Field::DraftYear => "Draft Year",
        }
    }

    /// The field after this one in column order, wrapping around.
    pub fn next(&self) -> Field {
        let idx = Field::ALL.iter().position(|f| f == self).unwrap_or(0);
        Field::ALL[(idx + 1) % Field::ALL.len()]
    }

    /// Parse a filter value typed as this field's value type.
    ///
    /// `N/A` stands for an absent score on `rasScore`.
    pub fn parse_value(&self, raw: &str) -> Result<FilterValue, DatasetError> {
        let invalid = || DatasetError::InvalidFilterValue {
            field: self.key().to_string(),
            value: raw.to_string(),
        };
        let trimmed = raw.trim();
        match self {
            Field::Player | Field::Position | Field::College => {
                Ok(FilterValue::Text(trimmed.to_string()))
            }
            Field::RasScore => {
                if trimmed.eq_ignore_ascii_case("n/a") {
                    return Ok(FilterValue::Absent);
                }
                let score: f64 = trimmed.parse().map_err(|_| invalid())?;
                valid_ras(Some(score))
                    .map(FilterValue::Number)
                    .ok_or_else(invalid)
            }
            Field::ProBowlCount => trimmed
                .parse::<u32>()
                .map(FilterValue::Count)
                .map_err(|_| invalid()),
            Field::DraftYear => Ok(match DraftYear::from_text(trimmed) {
                DraftYear::Year(y) => FilterValue::Year(y),
                DraftYear::Text(s) => FilterValue::Text(s),
            }),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Field {
    type Err = DatasetError;

    /// Accepts the canonical keys and the column names of the original
    /// processed export (`RAS_numeric`, `Pro_Bowls_numeric`, `Draft`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "player" | "name" => Ok(Field::Player),
            "position" | "pos" => Ok(Field::Position),
            "rasscore" | "ras" | "ras_numeric" => Ok(Field::RasScore),
            "probowlcount" | "pro_bowls_numeric" | "probowls" | "pro_bowls" => {
                Ok(Field::ProBowlCount)
            }
            "college" => Ok(Field::College),
            "draftyear" | "draft" | "draft_year" => Ok(Field::DraftYear),
            _ => Err(DatasetError::UnknownField(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// SortDirection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    pub fn toggle(&self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Header arrow shown next to the sorted column.
    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "↑",
            SortDirection::Descending => "↓",
        }
    }
}

// ---------------------------------------------------------------------------
// Field values
// ---------------------------------------------------------------------------

/// A borrowed view of one field of one record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Number(f64),
    Count(u32),
    Year(i32),
    Absent,
}

impl FieldValue<'_> {
    fn rank(&self) -> u8 {
        match self {
            FieldValue::Absent => 0,
            FieldValue::Number(_) | FieldValue::Count(_) | FieldValue::Year(_) => 1,
            FieldValue::Text(_) => 2,
        }
    }

    /// Total order used by sorting.
    ///
    /// Absent is below every present value. Numeric values compare
    /// numerically, text lexicographically. Within `draftYear`, years sort
    /// before free text.
    pub fn compare(&self, other: &FieldValue<'_>) -> Ordering {
        match (self, other) {
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            (FieldValue::Number(a), FieldValue::Number(b)) => a.total_cmp(b),
            (FieldValue::Count(a), FieldValue::Count(b)) => a.cmp(b),
            (FieldValue::Year(a), FieldValue::Year(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// An owned value to match a field against.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Number(f64),
    Count(u32),
    Year(i32),
    Absent,
}

impl FilterValue {
    pub fn as_field_value(&self) -> FieldValue<'_> {
        match self {
            FilterValue::Text(s) => FieldValue::Text(s),
            FilterValue::Number(n) => FieldValue::Number(*n),
            FilterValue::Count(c) => FieldValue::Count(*c),
            FilterValue::Year(y) => FieldValue::Year(*y),
            FilterValue::Absent => FieldValue::Absent,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Text(s) => f.write_str(s),
            FilterValue::Number(n) => write!(f, "{n}"),
            FilterValue::Count(c) => write!(f, "{c}"),
            FilterValue::Year(y) => write!(f, "{y}"),
            FilterValue::Absent => f.write_str("N/A"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_drops_out_of_range_ras() {
        assert_eq!(PlayerRecord::new("A", "WR", Some(10.5), 0).ras_score, None);
        assert_eq!(PlayerRecord::new("A", "WR", Some(-0.1), 0).ras_score, None);
        assert_eq!(PlayerRecord::new("A", "WR", Some(f64::NAN), 0).ras_score, None);
        assert_eq!(PlayerRecord::new("A", "WR", Some(0.0), 0).ras_score, Some(0.0));
        assert_eq!(PlayerRecord::new("A", "WR", Some(10.0), 0).ras_score, Some(10.0));
    }

    #[test]
    fn field_parses_canonical_and_legacy_names() {
        assert_eq!("rasScore".parse::<Field>().unwrap(), Field::RasScore);
        assert_eq!("RAS_numeric".parse::<Field>().unwrap(), Field::RasScore);
        assert_eq!("Pro_Bowls_numeric".parse::<Field>().unwrap(), Field::ProBowlCount);
        assert_eq!("Draft".parse::<Field>().unwrap(), Field::DraftYear);
        assert_eq!("Player".parse::<Field>().unwrap(), Field::Player);
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err = "fortyTime".parse::<Field>().unwrap_err();
        assert_eq!(err, DatasetError::UnknownField("fortyTime".to_string()));
    }

    #[test]
    fn field_next_wraps() {
        assert_eq!(Field::Player.next(), Field::Position);
        assert_eq!(Field::DraftYear.next(), Field::Player);
    }

    #[test]
    fn absent_is_below_every_present_value() {
        assert_eq!(
            FieldValue::Absent.compare(&FieldValue::Number(0.0)),
            Ordering::Less
        );
        assert_eq!(
            FieldValue::Number(0.0).compare(&FieldValue::Absent),
            Ordering::Greater
        );
        assert_eq!(FieldValue::Absent.compare(&FieldValue::Absent), Ordering::Equal);
    }

    #[test]
    fn years_sort_before_draft_text() {
        assert_eq!(
            FieldValue::Year(2024).compare(&FieldValue::Text("2019 Round 2")),
            Ordering::Less
        );
    }

    #[test]
    fn draft_year_from_text() {
        assert_eq!(DraftYear::from_text(" 2017 "), DraftYear::Year(2017));
        assert_eq!(
            DraftYear::from_text("2019 Round 2"),
            DraftYear::Text("2019 Round 2".to_string())
        );
    }

    #[test]
    fn parse_value_types_by_field() {
        assert_eq!(
            Field::RasScore.parse_value("9.5").unwrap(),
            FilterValue::Number(9.5)
        );
        assert_eq!(Field::RasScore.parse_value("N/A").unwrap(), FilterValue::Absent);
        assert_eq!(
            Field::ProBowlCount.parse_value("3").unwrap(),
            FilterValue::Count(3)
        );
        assert_eq!(
            Field::DraftYear.parse_value("2020").unwrap(),
            FilterValue::Year(2020)
        );
        assert!(Field::RasScore.parse_value("fast").is_err());
        assert!(Field::RasScore.parse_value("11").is_err());
        assert!(Field::ProBowlCount.parse_value("-1").is_err());
    }

    #[test]
    fn ras_display_formats_or_marks_missing() {
        assert_eq!(PlayerRecord::new("A", "WR", Some(9.5), 0).ras_display(), "9.50");
        assert_eq!(PlayerRecord::new("A", "WR", None, 0).ras_display(), "N/A");
    }

    #[test]
    fn profile_link_prefers_stored_url() {
        let rec = PlayerRecord::new("Calvin Johnson", "WR", Some(9.9), 6)
            .with_profile_url("https://ras.football/calvin-johnson/");
        assert_eq!(rec.profile_link(), "https://ras.football/calvin-johnson/");
    }

    #[test]
    fn profile_link_falls_back_to_search_slug() {
        let rec = PlayerRecord::new("Aaron  Donald Jr", "DT", Some(9.6), 8);
        assert_eq!(
            rec.profile_link(),
            "https://ras.football/search/aaron-donald-jr/"
        );
    }

    #[test]
    fn empty_profile_url_is_absent() {
        let rec = PlayerRecord::new("A", "WR", None, 0).with_profile_url("  ");
        assert!(rec.profile_url.is_none());
    }
}
