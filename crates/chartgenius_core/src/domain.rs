//! crates/chartgenius_core/src/domain.rs
//!
//! Defines the core data structures for the application.
//! The serde shapes here double as the model's response contract, the
//! persisted record layout and the HTTP payloads, so field names follow the
//! camelCase JSON contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

//=========================================================================================
// Charts
//=========================================================================================

/// The fixed set of chart types the model may choose from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartType {
    Bar,
    HorizontalBar,
    Line,
    Area,
    Pie,
    Radar,
    Funnel,
    RadialBar,
}

impl ChartType {
    pub const ALL: [ChartType; 8] = [
        ChartType::Bar,
        ChartType::HorizontalBar,
        ChartType::Line,
        ChartType::Area,
        ChartType::Pie,
        ChartType::Radar,
        ChartType::Funnel,
        ChartType::RadialBar,
    ];

    /// The wire name used in the JSON contract.
    pub fn as_str(self) -> &'static str {
        match self {
            ChartType::Bar => "bar",
            ChartType::HorizontalBar => "horizontalBar",
            ChartType::Line => "line",
            ChartType::Area => "area",
            ChartType::Pie => "pie",
            ChartType::Radar => "radar",
            ChartType::Funnel => "funnel",
            ChartType::RadialBar => "radialBar",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

/// One labelled value of a chart series. Order within a series is significant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDataPoint {
    pub name: String,
    pub value: f64,
}

/// A declarative chart description produced by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub chart_type: ChartType,
    pub x_axis_label: String,
    pub y_axis_label: String,
    pub data: Vec<ChartDataPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

//=========================================================================================
// Content Blocks
//=========================================================================================

/// The payload of a block. Being an enum, a block can never carry both prose
/// and a chart, or neither.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BlockBody {
    Text {
        content: String,
    },
    Chart {
        #[serde(rename = "chartConfig")]
        chart_config: ChartConfig,
    },
}

/// One ordered unit of an enhanced document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub id: String,
    #[serde(flatten)]
    pub body: BlockBody,
}

impl ContentBlock {
    pub fn is_chart(&self) -> bool {
        matches!(self.body, BlockBody::Chart { .. })
    }

    /// The prose of a text block, `None` for charts.
    pub fn text(&self) -> Option<&str> {
        match &self.body {
            BlockBody::Text { content } => Some(content),
            BlockBody::Chart { .. } => None,
        }
    }
}

/// Text layout orientation, derived from script content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ltr,
    Rtl,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ltr" => Some(Direction::Ltr),
            "rtl" => Some(Direction::Rtl),
            _ => None,
        }
    }
}

//=========================================================================================
// Documents
//=========================================================================================

/// A persisted analysis result, owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedDocument {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub excerpt: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    pub blocks: Vec<ContentBlock>,
    pub original_text: String,
    pub chart_count: usize,
    pub direction: Direction,
}

/// What an analysis request hands back to its caller.
///
/// Guests never touch persistence, so their result carries no owner or id.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum AnalysisResult {
    Persisted {
        document: SavedDocument,
    },
    Ephemeral {
        blocks: Vec<ContentBlock>,
        original_text: String,
        chart_count: usize,
        direction: Direction,
    },
}

impl AnalysisResult {
    pub fn blocks(&self) -> &[ContentBlock] {
        match self {
            AnalysisResult::Persisted { document } => &document.blocks,
            AnalysisResult::Ephemeral { blocks, .. } => blocks,
        }
    }
}

/// Dashboard totals for one user's workspace.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceSummary {
    pub total_documents: usize,
    pub total_charts: usize,
    pub recent: Vec<SavedDocument>,
}

//=========================================================================================
// Users and Sessions
//=========================================================================================

// Represents a user - used throughout app
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

// Only used internally for login/signup - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub hashed_password: String,
}

impl UserCredentials {
    pub fn into_user(self) -> User {
        User {
            id: self.user_id,
            name: self.name,
            email: self.email,
        }
    }
}

// Represents a browser login session (auth cookie)
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub id: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}
