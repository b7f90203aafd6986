//! Web service that turns uploaded manuscripts into KDP-ready PDFs.
//!
//! `POST /format` accepts a `.docx` upload or pasted text plus layout fields,
//! typesets the book with [`pdf_typeset`] and stores the result through an
//! [`storage::ArtifactStore`], answering with the PDF's public URL.

pub mod api;
pub mod config;
pub mod error;
pub mod form;
pub mod scratch;
pub mod state;
pub mod storage;

pub use api::{build_router, start_server};
pub use config::ServiceConfig;
pub use error::{Result, ServiceError};
pub use state::AppState;
