//! Core of the bulk upload pipeline.
//!
//! [`BulkUploader`] runs the stages in order: unflatten the sheet rows,
//! resolve keys and concepts, build the tile forest, convert values per
//! datatype and finalize the diagnostics. The document operations
//! (annotate, summary, undo) work on previously generated business data.

pub mod annotate;
pub mod dates;
pub mod error;
pub mod geometry;
pub mod identity;
pub mod ids;
pub mod mapper;
pub mod prerequisites;
pub mod summary;
pub mod tiles;
pub mod undo;
pub mod uploader;
pub mod wkt;

pub use annotate::annotate_document;
pub use dates::{normalize_date, parse_date};
pub use error::FatalError;
pub use geometry::{feature_collection, geojson_from_wkt, shape_check, stamp_node_id};
pub use identity::{IdentityCache, ResourceResolver};
pub use mapper::DatatypeMapper;
pub use prerequisites::PrerequisiteResolver;
pub use summary::{ImportSummary, business_id, summarize};
pub use tiles::{TileBuilder, new_tile};
pub use undo::{UndoReport, undo_document};
pub use uploader::{Backend, BulkUploader, RunOutput};
pub use wkt::{WktError, parse_wkt};
