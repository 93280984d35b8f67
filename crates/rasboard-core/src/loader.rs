// Loading the static data resources.
//
// Each resource is a local file or an http(s) URL. A fetch either yields a
// parsed value or a `LoadError`; there is no retry and no timeout. Players
// come from the processed JSON export or, optionally, the raw scrape CSV.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::correlation::CorrelationMatrix;
use crate::error::LoadError;
use crate::predictions::PredictionSet;
use crate::record::{valid_ras, DraftYear, PlayerRecord};

/// Position assigned to rows that do not name one.
pub const UNKNOWN_POSITION: &str = "Unknown";

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Where a resource is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Http(String),
}

impl DataSource {
    /// `http://` and `https://` strings are URLs; anything else is a path.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DataSource::Http(trimmed.to_string())
        } else {
            DataSource::File(PathBuf::from(trimmed))
        }
    }

    /// True when the resource name ends in `.csv`.
    pub fn is_csv(&self) -> bool {
        let name = match self {
            DataSource::File(path) => path.to_string_lossy().to_ascii_lowercase(),
            DataSource::Http(url) => url
                .split(['?', '#'])
                .next()
                .unwrap_or_default()
                .to_ascii_lowercase(),
        };
        name.ends_with(".csv")
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Http(url) => f.write_str(url),
        }
    }
}

// ---------------------------------------------------------------------------
// Load state
// ---------------------------------------------------------------------------

/// A successfully loaded resource and when it arrived.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T> {
    pub data: T,
    pub source: String,
    pub loaded_at: DateTime<Local>,
}

impl<T> Snapshot<T> {
    pub fn new(data: T, source: &DataSource) -> Self {
        Snapshot {
            data,
            source: source.to_string(),
            loaded_at: Local::now(),
        }
    }
}

/// Lifecycle of one resource as the view sees it.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState<T> {
    #[default]
    Loading,
    Loaded(Snapshot<T>),
    /// User-facing failure message; the view renders it inline.
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn from_result(result: Result<T, LoadError>, source: &DataSource) -> Self {
        match result {
            Ok(data) => LoadState::Loaded(Snapshot::new(data, source)),
            Err(e) => LoadState::Failed(e.to_string()),
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(snapshot) => Some(&snapshot.data),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> Option<&Snapshot<T>> {
        match self {
            LoadState::Loaded(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }
}

// ---------------------------------------------------------------------------
// Fetching
// ---------------------------------------------------------------------------

/// Read the raw bytes of a resource. A non-success HTTP status is an error.
pub async fn fetch_bytes(source: &DataSource) -> Result<Vec<u8>, LoadError> {
    match source {
        DataSource::File(path) => tokio::fs::read(path).await.map_err(|e| LoadError::Io {
            path: path.clone(),
            source: e,
        }),
        DataSource::Http(url) => {
            let transport = |e| LoadError::Transport {
                url: url.clone(),
                source: e,
            };
            let response = reqwest::get(url).await.map_err(transport)?;
            let status = response.status();
            if !status.is_success() {
                return Err(LoadError::Status {
                    url: url.clone(),
                    status: status.as_u16(),
                });
            }
            let body = response.bytes().await.map_err(transport)?;
            debug!("fetched {} bytes from {}", body.len(), url);
            Ok(body.to_vec())
        }
    }
}

/// Fetch a resource and parse it as JSON.
pub async fn fetch_json<T: DeserializeOwned>(source: &DataSource) -> Result<T, LoadError> {
    let bytes = fetch_bytes(source).await?;
    serde_json::from_slice(&bytes).map_err(|e| LoadError::Parse {
        origin: source.to_string(),
        source: e,
    })
}

/// Load player records. `.csv` sources go through the CSV import.
pub async fn load_players(source: &DataSource) -> Result<Vec<PlayerRecord>, LoadError> {
    let players = if source.is_csv() {
        let bytes = fetch_bytes(source).await?;
        players_from_csv_reader(bytes.as_slice()).map_err(|e| LoadError::Csv {
            origin: source.to_string(),
            source: e,
        })?
    } else {
        let rows: Vec<Value> = fetch_json(source).await?;
        players_from_values(rows)
    };
    info!("Loaded {} players from {}", players.len(), source);
    Ok(players)
}

pub async fn load_correlations(source: &DataSource) -> Result<CorrelationMatrix, LoadError> {
    let matrix: CorrelationMatrix = fetch_json(source).await?;
    let anomalies = matrix.diagonal_anomalies();
    if !anomalies.is_empty() {
        warn!("correlation diagonal is not 1 for: {}", anomalies.join(", "));
    }
    info!("Loaded {}x{} correlation matrix from {}", matrix.len(), matrix.len(), source);
    Ok(matrix)
}

pub async fn load_predictions(source: &DataSource) -> Result<PredictionSet, LoadError> {
    let set: PredictionSet = fetch_json(source).await?;
    info!("Loaded {} prediction points from {}", set.len(), source);
    Ok(set)
}

/// Synchronous CSV import from a local file.
pub fn load_players_csv(path: &Path) -> Result<Vec<PlayerRecord>, LoadError> {
    let file = std::fs::File::open(path).map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    players_from_csv_reader(file).map_err(|e| LoadError::Csv {
        origin: path.display().to_string(),
        source: e,
    })
}

// ---------------------------------------------------------------------------
// Player normalization
// ---------------------------------------------------------------------------

const PLAYER_KEYS: &[&str] = &["player", "Player", "Name", "name"];
const POSITION_KEYS: &[&str] = &["position", "Position", "Pos", "pos"];
const RAS_KEYS: &[&str] = &["rasScore", "RAS_numeric", "RAS", "ras"];
const PRO_BOWL_KEYS: &[&str] = &[
    "proBowlCount",
    "Pro_Bowls_numeric",
    "Pro Bowls",
    "ProBowls",
    "Pro_Bowls",
];
const COLLEGE_KEYS: &[&str] = &["college", "College"];
const DRAFT_KEYS: &[&str] = &["draftYear", "Draft", "draft", "Draft Year"];
const PROFILE_KEYS: &[&str] = &["profileUrl", "Profile_URL"];

/// First present key. Nulls and blank strings count as missing.
fn lookup<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| {
        obj.get(*k).filter(|v| match v {
            Value::Null => false,
            Value::String(s) => !s.trim().is_empty(),
            _ => true,
        })
    })
}

fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn count(value: Option<&Value>) -> Option<u32> {
    number(value)
        .filter(|n| n.is_finite() && *n >= 0.0 && *n <= f64::from(u32::MAX))
        .map(|n| n.round() as u32)
}

fn draft_year(value: Option<&Value>) -> DraftYear {
    match value {
        Some(Value::Number(n)) => n
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() <= f64::from(i32::MAX))
            .map(|f| DraftYear::Year(f as i32))
            .unwrap_or_else(|| DraftYear::Text(n.to_string())),
        Some(Value::String(s)) => DraftYear::from_text(s),
        _ => DraftYear::default(),
    }
}

fn player_from_value(value: &Value) -> Option<PlayerRecord> {
    let Some(obj) = value.as_object() else {
        warn!("skipping player entry that is not an object");
        return None;
    };
    let Some(name) = text(lookup(obj, PLAYER_KEYS)) else {
        warn!("skipping player entry without a name");
        return None;
    };

    let position = text(lookup(obj, POSITION_KEYS)).unwrap_or_else(|| {
        warn!("player '{}' has no position, using '{}'", name, UNKNOWN_POSITION);
        UNKNOWN_POSITION.to_string()
    });

    let raw_ras = lookup(obj, RAS_KEYS);
    let ras_score = valid_ras(number(raw_ras));
    if raw_ras.is_some() && ras_score.is_none() {
        debug!("player '{}' has an unusable RAS value, treating as absent", name);
    }

    let pro_bowl_count = count(lookup(obj, PRO_BOWL_KEYS)).unwrap_or_else(|| {
        warn!("player '{}' has no valid Pro Bowl count, using 0", name);
        0
    });

    let mut record = PlayerRecord::new(name, position, ras_score, pro_bowl_count)
        .with_college(text(lookup(obj, COLLEGE_KEYS)).unwrap_or_default())
        .with_draft_year(draft_year(lookup(obj, DRAFT_KEYS)));
    if let Some(url) = text(lookup(obj, PROFILE_KEYS)) {
        record = record.with_profile_url(url);
    }
    Some(record)
}

/// Keep the first record for each player name.
fn dedup_players(records: Vec<PlayerRecord>) -> Vec<PlayerRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|r| {
            let first = seen.insert(r.player.clone());
            if !first {
                warn!("duplicate player '{}', keeping the first record", r.player);
            }
            first
        })
        .collect()
}

/// Normalize raw JSON rows into records. Malformed rows degrade or are
/// skipped with a warning; they never fail the whole load.
pub fn players_from_values(rows: Vec<Value>) -> Vec<PlayerRecord> {
    dedup_players(rows.iter().filter_map(player_from_value).collect())
}

/// Import the raw scrape CSV. Column names are matched the same way as the
/// JSON keys, so `Name`/`Pos`/`RAS`/`ProBowls` exports work unchanged.
pub fn players_from_csv_reader<R: Read>(rdr: R) -> Result<Vec<PlayerRecord>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut records = Vec::new();
    for result in reader.deserialize::<HashMap<String, String>>() {
        match result {
            Ok(row) => {
                let obj: Map<String, Value> = row
                    .into_iter()
                    .map(|(k, v)| (k.trim().to_string(), Value::String(v)))
                    .collect();
                if let Some(record) = player_from_value(&Value::Object(obj)) {
                    records.push(record);
                }
            }
            Err(e) => {
                warn!("skipping malformed player row: {}", e);
            }
        }
    }
    Ok(dedup_players(records))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
