//! Report document layout and PDF rendering.
//!
//! `sections` turns aggregator output into [`Section`]s, `layout` paginates
//! them into a [`Document`] and `pdf` serialises that to bytes.
//!
//! [`Section`]: contracts::shared::report_document::Section

pub mod layout;
pub mod pdf;
pub mod sections;
pub mod text;

pub use layout::{compose, Document, DocumentHeader, Element, InvalidSectionError, Page, PageLayout};
pub use pdf::render_pdf;
