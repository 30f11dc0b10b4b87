//! Document merge backend.
//!
//! The pipeline only needs "append these inputs, in order, into one output".
//! [`LopdfMerger`] does that for PDFs by renumbering each input's objects,
//! chaining every page under a single page tree and saving the result.
//! Outlines (bookmarks) of the inputs are dropped.

use crate::error::MergeFailure;
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// What a successful merge produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeStats {
    pub documents: usize,
    pub pages: usize,
}

/// Appends `inputs` in order into a new document at `output`.
///
/// `output` is a scratch path owned by the caller; implementations may
/// create or truncate it but must not write anywhere else.
pub trait DocumentMerger {
    fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<MergeStats, MergeFailure>;
}

/// PDF merger backed by `lopdf`
#[derive(Debug, Clone)]
pub struct LopdfMerger {
    version: String,
    compress: bool,
}

impl Default for LopdfMerger {
    fn default() -> Self {
        Self {
            version: "1.5".to_string(),
            compress: true,
        }
    }
}

impl LopdfMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable stream compression of the output
    pub fn without_compression(mut self) -> Self {
        self.compress = false;
        self
    }

    fn load(path: &Path) -> Result<Document, MergeFailure> {
        Document::load(path).map_err(|e| MergeFailure::UnreadableInput {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    fn combine(
        &self,
        documents: Vec<(PathBuf, Document)>,
        output: &Path,
    ) -> Result<(Document, usize), MergeFailure> {
        let mut merged = Document::with_version(self.version.as_str());
        let mut max_id = 1;

        // Pages in input order, already carrying their inherited attributes
        let mut pages: Vec<(ObjectId, Dictionary)> = Vec::new();
        let mut catalog: Option<Dictionary> = None;

        for (path, mut doc) in documents {
            doc.renumber_objects_with(max_id);
            max_id = doc.max_id + 1;

            for (_, page_id) in doc.get_pages() {
                let page = flatten_page(&doc, page_id).map_err(|e| {
                    MergeFailure::UnreadableInput {
                        path: path.clone(),
                        reason: e.to_string(),
                    }
                })?;
                pages.push((page_id, page));
            }

            for (object_id, object) in doc.objects {
                let kind = object.type_name().unwrap_or_default().to_string();
                match kind.as_str() {
                    "Catalog" => {
                        if catalog.is_none() {
                            catalog = object.as_dict().ok().cloned();
                        }
                    }
                    // The page tree is rebuilt below; outlines would point at stale ids
                    "Pages" | "Page" | "Outlines" | "Outline" => {}
                    _ => {
                        merged.objects.insert(object_id, object);
                    }
                }
            }
        }

        if pages.is_empty() {
            return Err(MergeFailure::WriteOutput {
                path: output.to_path_buf(),
                reason: "inputs contain no pages".to_string(),
            });
        }

        let pages_id: ObjectId = (max_id, 0);
        let catalog_id: ObjectId = (max_id + 1, 0);

        let page_count = pages.len();
        let mut kids = Vec::with_capacity(page_count);
        for (page_id, mut page) in pages {
            page.set("Parent", pages_id);
            merged.objects.insert(page_id, Object::Dictionary(page));
            kids.push(Object::Reference(page_id));
        }

        merged.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count as i64,
            }),
        );

        let mut catalog = catalog.unwrap_or_else(Dictionary::new);
        catalog.set("Type", "Catalog");
        catalog.set("Pages", pages_id);
        catalog.remove(b"Outlines");
        merged.objects.insert(catalog_id, Object::Dictionary(catalog));

        merged.trailer.set("Root", catalog_id);
        merged.max_id = catalog_id.0;
        merged.renumber_objects();

        Ok((merged, page_count))
    }
}

/// Page attributes a page may inherit from its ancestors in the page tree
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Copy of the page at `page_id` with inherited attributes made explicit, so
/// it stays intact once moved under a different page tree.
fn flatten_page(doc: &Document, page_id: ObjectId) -> lopdf::Result<Dictionary> {
    let mut page = doc.get_dictionary(page_id)?.clone();
    let mut visited = HashSet::new();
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();

    while let Some(node_id) = parent {
        if !visited.insert(node_id) {
            break;
        }
        let node = doc.get_dictionary(node_id)?;
        for key in INHERITABLE_KEYS {
            if !page.has(key) {
                if let Ok(value) = node.get(key) {
                    page.set(key.to_vec(), value.clone());
                }
            }
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    Ok(page)
}

impl DocumentMerger for LopdfMerger {
    fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<MergeStats, MergeFailure> {
        let documents = inputs
            .iter()
            .map(|path| Self::load(path).map(|doc| (path.clone(), doc)))
            .collect::<Result<Vec<_>, _>>()?;

        let (mut merged, pages) = self.combine(documents, output)?;

        if self.compress {
            merged.compress();
        }

        merged
            .save(output)
            .map_err(|e| MergeFailure::WriteOutput {
                path: output.to_path_buf(),
                reason: e.to_string(),
            })?;

        tracing::debug!(
            documents = inputs.len(),
            pages,
            output = %output.display(),
            "Wrote merged document"
        );

        Ok(MergeStats {
            documents: inputs.len(),
            pages,
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::fs;

    /// Build a minimal PDF with `page_count` blank A4 pages
    pub fn write_pdf(path: &Path, page_count: usize) {
        build_pdf(path, page_count, None);
    }

    /// Like [`write_pdf`], but square pages of `size` whose MediaBox is only
    /// set on the page tree node
    pub fn write_pdf_with_inherited_box(path: &Path, page_count: usize, size: i64) {
        build_pdf(path, page_count, Some(size));
    }

    fn media_box(width: i64, height: i64) -> Vec<Object> {
        vec![0.into(), 0.into(), width.into(), height.into()]
    }

    fn build_pdf(path: &Path, page_count: usize, inherited: Option<i64>) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let kids: Vec<Object> = (0..page_count)
            .map(|_| {
                let mut page = dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                };
                if inherited.is_none() {
                    page.set("MediaBox", media_box(595, 842));
                }
                Object::Reference(doc.add_object(page))
            })
            .collect();

        let mut pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count as i64,
        };
        if let Some(size) = inherited {
            pages.set("MediaBox", media_box(size, size));
        }
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        doc.save(path).unwrap();
    }

    /// Test double: output bytes are the input bytes concatenated in order
    #[derive(Debug, Default)]
    pub struct ConcatMerger;

    impl DocumentMerger for ConcatMerger {
        fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<MergeStats, MergeFailure> {
            let mut bytes = Vec::new();
            for input in inputs {
                let content = fs::read(input).map_err(|e| MergeFailure::UnreadableInput {
                    path: input.clone(),
                    reason: e.to_string(),
                })?;
                bytes.extend(content);
            }
            fs::write(output, bytes).map_err(|e| MergeFailure::WriteOutput {
                path: output.to_path_buf(),
                reason: e.to_string(),
            })?;
            Ok(MergeStats {
                documents: inputs.len(),
                pages: inputs.len(),
            })
        }
    }

    /// Test double that writes some bytes and then fails
    #[derive(Debug, Default)]
    pub struct FailingMerger;

    impl DocumentMerger for FailingMerger {
        fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<MergeStats, MergeFailure> {
            fs::write(output, b"partial").ok();
            Err(MergeFailure::UnreadableInput {
                path: inputs.first().cloned().unwrap_or_default(),
                reason: "corrupt input".to_string(),
            })
        }
    }
}
