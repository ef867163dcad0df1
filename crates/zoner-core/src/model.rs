use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Font size assumed when the extractor did not report one.
pub const DEFAULT_FONT_SIZE: f32 = 10.0;

/// Axis-aligned bounding box `(x0, y0, x1, y1)` in the extractor's coordinates.
///
/// Serialized as a four-element array. Missing, `null` or short arrays
/// deserialize to the empty box `(0, 0, 0, 0)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(into = "[f32; 4]")]
pub struct BBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BBox {
    pub const EMPTY: BBox = BBox {
        x0: 0.0,
        y0: 0.0,
        x1: 0.0,
        y1: 0.0,
    };

    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        BBox { x0, y0, x1, y1 }
    }

    /// True when no geometry is known.
    pub fn is_empty(&self) -> bool {
        *self == BBox::EMPTY
    }

    /// Coordinate-wise min/max of both boxes. The empty box is the identity.
    pub fn union(&self, other: &BBox) -> BBox {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        BBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Union over a sequence of boxes; empty when the sequence carries no geometry.
    pub fn enclosing<'a>(boxes: impl IntoIterator<Item = &'a BBox>) -> BBox {
        boxes
            .into_iter()
            .fold(BBox::EMPTY, |acc, b| acc.union(b))
    }
}

impl From<[f32; 4]> for BBox {
    fn from(v: [f32; 4]) -> Self {
        BBox::new(v[0], v[1], v[2], v[3])
    }
}

impl From<BBox> for [f32; 4] {
    fn from(b: BBox) -> Self {
        [b.x0, b.y0, b.x1, b.y1]
    }
}

impl<'de> Deserialize<'de> for BBox {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: Option<Vec<Option<f32>>> = Option::deserialize(deserializer)?;
        Ok(match raw {
            Some(v) if v.len() >= 4 => BBox::new(
                v[0].unwrap_or(0.0),
                v[1].unwrap_or(0.0),
                v[2].unwrap_or(0.0),
                v[3].unwrap_or(0.0),
            ),
            _ => BBox::EMPTY,
        })
    }
}

impl fmt::Display for BBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.1}, {:.1}, {:.1}, {:.1})",
            self.x0, self.y0, self.x1, self.y1
        )
    }
}

/// One positioned unit of extracted text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawFragment")]
pub struct Fragment {
    pub text: String,
    pub bbox: BBox,
    pub font_name: String,
    pub font_size: f32,
    /// 1-based page number; 0 until the owning page assigns it.
    pub page: usize,
}

impl Fragment {
    pub fn new(text: impl Into<String>, bbox: BBox, font_name: impl Into<String>, font_size: f32) -> Self {
        Fragment {
            text: text.into(),
            bbox,
            font_name: font_name.into(),
            font_size,
            page: 1,
        }
    }

    pub fn on_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    pub fn is_bold(&self) -> bool {
        self.font_name.to_lowercase().contains("bold")
    }

    /// Typographic role of the fragment.
    pub fn role(&self) -> FragmentRole {
        if self.font_size >= 18.0 || (self.is_bold() && self.font_size >= 14.0) {
            FragmentRole::Heading
        } else if ["Zwischensumme", "Umsatzsteuer", "Gesamtbetrag"]
            .iter()
            .any(|label| self.text.contains(label))
        {
            FragmentRole::Label
        } else {
            FragmentRole::Paragraph
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentRole {
    Heading,
    Label,
    Paragraph,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FontField {
    Name(String),
    Info {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        size: Option<f32>,
    },
}

/// Wire shape of a fragment; every field is optional.
#[derive(Deserialize)]
struct RawFragment {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    bbox: BBox,
    #[serde(default)]
    font: Option<FontField>,
    #[serde(default, alias = "font_size")]
    size: Option<f32>,
    #[serde(default)]
    font_name: Option<String>,
    #[serde(default)]
    page: Option<usize>,
}

impl From<RawFragment> for Fragment {
    fn from(raw: RawFragment) -> Self {
        let (font_name, nested_size) = match raw.font {
            Some(FontField::Name(name)) => (Some(name), None),
            Some(FontField::Info { name, size }) => (name, size),
            None => (None, None),
        };
        let font_size = nested_size
            .or(raw.size)
            .filter(|s| s.is_finite() && *s > 0.0)
            .unwrap_or(DEFAULT_FONT_SIZE);

        Fragment {
            text: raw.text.unwrap_or_default(),
            bbox: raw.bbox,
            font_name: font_name
                .or(raw.font_name)
                .unwrap_or_else(|| "unknown".into()),
            font_size,
            page: raw.page.unwrap_or(0),
        }
    }
}

/// All fragments of one page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub page: usize,
    #[serde(default, alias = "elements")]
    pub fragments: Vec<Fragment>,
    /// Page height, needed only for top-down coordinates.
    #[serde(default, alias = "page_height", skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
}

/// A table as returned by the upstream table detector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    #[serde(default, alias = "table_id")]
    pub id: usize,
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default)]
    pub accuracy: f32,
    #[serde(default)]
    pub bbox: BBox,
    #[serde(default, alias = "data", deserialize_with = "deserialize_rows")]
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Rows after the header row.
    pub fn data_rows(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or(&[])
    }
}

fn default_page() -> usize {
    1
}

fn deserialize_rows<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Vec<String>>, D::Error> {
    let raw: Option<Vec<Vec<serde_json::Value>>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|row| row.into_iter().map(cell_to_string).collect())
        .collect())
}

fn cell_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Everything the upstream extractors produced for one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentInput {
    #[serde(default)]
    pub pages: Vec<Page>,
    #[serde(default)]
    pub tables: Vec<RawTable>,
}

impl DocumentInput {
    /// Assign missing page numbers: pages default to their 1-based position,
    /// fragments inherit their page's number.
    pub fn normalized(mut self) -> Self {
        for (idx, page) in self.pages.iter_mut().enumerate() {
            if page.page == 0 {
                page.page = idx + 1;
            }
            for fragment in &mut page.fragments {
                if fragment.page == 0 {
                    fragment.page = page.page;
                }
            }
        }
        self
    }

    pub fn fragment_count(&self) -> usize {
        self.pages.iter().map(|p| p.fragments.len()).sum()
    }
}

/// Semantic zone of a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkType {
    Header,
    Addresses,
    LineItems,
    Totals,
    Footer,
    TableData,
}

impl ChunkType {
    /// Zones a fragment can be classified into, in emission order.
    pub const ZONES: [ChunkType; 5] = [
        ChunkType::Header,
        ChunkType::Addresses,
        ChunkType::LineItems,
        ChunkType::Totals,
        ChunkType::Footer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkType::Header => "header",
            ChunkType::Addresses => "addresses",
            ChunkType::LineItems => "line_items",
            ChunkType::Totals => "totals",
            ChunkType::Footer => "footer",
            ChunkType::TableData => "table_data",
        }
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a chunk's label was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Derivation {
    /// Totals keyword or right-margin amount.
    KeywordTotals,
    /// Matched the ordered content pattern table.
    ContentPattern,
    /// Line-items column header label.
    ColumnHeader { bold: bool },
    /// One of the position/visual fallback rules.
    Spatial,
    /// Above/below the page midpoint, nothing else matched.
    PositionalDefault,
    /// Built from a detected table.
    Table,
    /// Fused from two chunks.
    Merged,
    /// Averaged over members with different derivations.
    Mixed,
}

/// A classified span of document content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub content: String,
    pub chunk_type: ChunkType,
    #[serde(default)]
    pub source_fragments: Vec<Fragment>,
    pub bbox: BBox,
    pub page: usize,
    pub confidence: f32,
    /// Set on a `line_items` chunk that only holds the column header labels.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub column_header: bool,
    pub derivation: Derivation,
}

impl Chunk {
    pub fn is_column_header(&self) -> bool {
        self.chunk_type == ChunkType::LineItems && self.column_header
    }
}

/// Clamp a confidence into `[0, 1]`; NaN becomes 0.
pub fn clamp_confidence(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionSource {
    TableColumn,
    ContentHeuristic,
}

/// Candidate human-readable name of a line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionName {
    pub name: String,
    pub source: PositionSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BBox>,
}
