//! Core types: documents, filters, and the result envelope.

mod document;
mod filter;
mod response;

pub use document::{
    AnalyzerKind, Document, DocumentKind, FieldSpec, KindDescriptor, ManagementDocument,
    PropertyDocument, fields,
};
pub use filter::{DEFAULT_PAGE_SIZE, FilterSpec};
pub(crate) use filter::non_blank;
pub use response::{ErrorCode, IndexPayload, Response, SearchPayload, State};
