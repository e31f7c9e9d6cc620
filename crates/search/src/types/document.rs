//! Document kinds, their records, and the static per-kind descriptor table.
//!
//! The descriptor table is the single source of truth for which fields exist,
//! which analyzer each field uses, which fields the search phrase runs against
//! and which kind a market lookup cross-references. Both index creation and
//! query building read it; nothing inspects record types at runtime.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field names shared by the records and the query builder.
pub mod fields {
    /// Record identifier.
    pub const ID: &str = "id";
    /// Display name.
    pub const NAME: &str = "name";
    /// Previous display name of a property.
    pub const FORMER_NAME: &str = "formerName";
    /// Street address of a property.
    pub const STREET_ADDRESS: &str = "streetAddress";
    /// City of a property.
    pub const CITY: &str = "city";
    /// Market shared by both kinds; the cross-reference key.
    pub const MARKET: &str = "market";
    /// State or region.
    pub const STATE: &str = "state";
    /// Latitude as supplied by the caller.
    pub const LATITUDE: &str = "latitude";
    /// Longitude as supplied by the caller.
    pub const LONGITUDE: &str = "longitude";
}

/// The two indexed record kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    /// Property records.
    Property,
    /// Management company records.
    Management,
}

impl DocumentKind {
    /// Every kind, in declaration order.
    pub const ALL: [DocumentKind; 2] = [DocumentKind::Property, DocumentKind::Management];

    /// Returns the static descriptor for this kind.
    pub fn descriptor(&self) -> &'static KindDescriptor {
        match self {
            DocumentKind::Property => &PROPERTY_DESCRIPTOR,
            DocumentKind::Management => &MANAGEMENT_DESCRIPTOR,
        }
    }

    /// The kind a market lookup from this kind runs against.
    pub fn cross_reference(&self) -> DocumentKind {
        self.descriptor().cross_reference
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Property => write!(f, "property"),
            DocumentKind::Management => write!(f, "management"),
        }
    }
}

/// How a field is analyzed at index time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyzerKind {
    /// Edge n-gram prefix matching (`partial_text`).
    Partial,
    /// Stemmed full-text matching (`full_text`).
    FullText,
    /// Standard tokenizer with English stop words (`standard_english`).
    StandardEnglish,
    /// Exact keyword.
    Keyword,
    /// Numeric identifier.
    Numeric,
}

/// One field of a kind's mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// JSON field name.
    pub name: &'static str,
    /// Analyzer assignment.
    pub analyzer: AnalyzerKind,
}

const fn field(name: &'static str, analyzer: AnalyzerKind) -> FieldSpec {
    FieldSpec { name, analyzer }
}

/// Static description of a document kind.
#[derive(Debug)]
pub struct KindDescriptor {
    /// The kind described.
    pub kind: DocumentKind,
    /// Declared display name; the base of the physical index name.
    pub display_name: &'static str,
    /// Field mapping.
    pub fields: &'static [FieldSpec],
    /// Fields the search phrase is matched against.
    pub phrase_fields: &'static [&'static str],
    /// Kind that market lookups from this kind target.
    pub cross_reference: DocumentKind,
}

impl KindDescriptor {
    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

static PROPERTY_FIELDS: [FieldSpec; 9] = [
    field(fields::ID, AnalyzerKind::Numeric),
    field(fields::NAME, AnalyzerKind::FullText),
    field(fields::FORMER_NAME, AnalyzerKind::FullText),
    field(fields::STREET_ADDRESS, AnalyzerKind::Partial),
    field(fields::CITY, AnalyzerKind::Partial),
    field(fields::MARKET, AnalyzerKind::StandardEnglish),
    field(fields::STATE, AnalyzerKind::StandardEnglish),
    field(fields::LATITUDE, AnalyzerKind::Keyword),
    field(fields::LONGITUDE, AnalyzerKind::Keyword),
];

static MANAGEMENT_FIELDS: [FieldSpec; 4] = [
    field(fields::ID, AnalyzerKind::Numeric),
    field(fields::NAME, AnalyzerKind::FullText),
    field(fields::MARKET, AnalyzerKind::StandardEnglish),
    field(fields::STATE, AnalyzerKind::StandardEnglish),
];

static PROPERTY_DESCRIPTOR: KindDescriptor = KindDescriptor {
    kind: DocumentKind::Property,
    display_name: "properties",
    fields: &PROPERTY_FIELDS,
    phrase_fields: &[fields::NAME, fields::FORMER_NAME, fields::STREET_ADDRESS],
    cross_reference: DocumentKind::Management,
};

static MANAGEMENT_DESCRIPTOR: KindDescriptor = KindDescriptor {
    kind: DocumentKind::Management,
    display_name: "managements",
    fields: &MANAGEMENT_FIELDS,
    phrase_fields: &[fields::NAME],
    cross_reference: DocumentKind::Property,
};

/// A property record.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDocument {
    /// Caller-assigned identifier; the engine generates one when absent.
    #[serde(default, alias = "propertyId", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub former_name: String,
    #[serde(default)]
    pub street_address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub market: String,
    #[serde(default)]
    pub state: String,
    #[serde(default, alias = "lat", skip_serializing_if = "Option::is_none")]
    pub latitude: Option<String>,
    #[serde(default, alias = "lng", skip_serializing_if = "Option::is_none")]
    pub longitude: Option<String>,
}

/// A management company record.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagementDocument {
    /// Caller-assigned identifier; the engine generates one when absent.
    #[serde(default, alias = "mgmtId", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub market: String,
    #[serde(default)]
    pub state: String,
}

/// Either record kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Document {
    /// A property record.
    Property(PropertyDocument),
    /// A management record.
    Management(ManagementDocument),
}

impl Document {
    /// The record's kind.
    pub fn kind(&self) -> DocumentKind {
        match self {
            Document::Property(_) => DocumentKind::Property,
            Document::Management(_) => DocumentKind::Management,
        }
    }

    /// Identifier to store the record under, if the caller assigned one.
    pub fn id(&self) -> Option<String> {
        match self {
            Document::Property(p) => p.id,
            Document::Management(m) => m.id,
        }
        .map(|id| id.to_string())
    }

    /// The JSON source written to the engine.
    pub fn to_source(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

impl From<PropertyDocument> for Document {
    fn from(doc: PropertyDocument) -> Self {
        Document::Property(doc)
    }
}

impl From<ManagementDocument> for Document {
    fn from(doc: ManagementDocument) -> Self {
        Document::Management(doc)
    }
}
