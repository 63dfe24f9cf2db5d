//! The `Exporter` contract: a pure function from documents to bytes.

use slr_artifact::Document;

pub trait Exporter {
    /// Short name used in filenames, e.g. `"csv"`.
    fn name(&self) -> &'static str;

    /// File extension without the leading dot.
    fn extension(&self) -> &'static str;

    fn export(&self, documents: &[Document]) -> Vec<u8>;
}
