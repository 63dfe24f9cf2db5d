//! Document and protocol exporters: CSV, BibTeX, RIS (§4.5), plus the
//! PRISMA-aligned Markdown protocol and the `StrategyExportBundle` writer
//! that composes all of the above under `<project>/export/`.

pub mod bibtex;
pub mod bundle;
pub mod csv_export;
pub mod exporter;
pub mod markdown;
pub mod ris;

pub use bibtex::BibtexExporter;
pub use bundle::{export_bundle, BundleInputs};
pub use csv_export::CsvExporter;
pub use exporter::Exporter;
pub use markdown::render_markdown_protocol;
pub use ris::RisExporter;
