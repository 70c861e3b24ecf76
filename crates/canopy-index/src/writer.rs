//! Value-set writer for canopy indexes.
//!
//! Applies [`ValueSet`]s to a physical index: delete-then-add for updates,
//! delete only for deletion records. Changes become visible to searchers
//! once [`commit`](ValueSetWriter::commit) is called.

use std::sync::Arc;

use tantivy::{IndexWriter as TantivyIndexWriter, TantivyDocument, Term};

use crate::{
    error::IndexError,
    manager::IndexHandle,
    value_set::{PATH_VALUE, ValueSet},
};

/// Default heap size for the index writer (50 MB).
const DEFAULT_HEAP_SIZE: usize = 50_000_000;

/// Writes value sets to one named index.
pub struct ValueSetWriter {
    /// Shared index handle.
    handle: Arc<IndexHandle>,
    /// The underlying Tantivy writer.
    writer: TantivyIndexWriter,
}

impl std::fmt::Debug for ValueSetWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueSetWriter")
            .field("index", &self.handle.name)
            .finish_non_exhaustive()
    }
}

impl ValueSetWriter {
    /// Opens a writer against an index handle.
    pub(crate) fn open(handle: Arc<IndexHandle>) -> Result<Self, IndexError> {
        let writer = handle
            .index
            .writer(DEFAULT_HEAP_SIZE)
            .map_err(|e| IndexError::create_index(&handle.name, &e))?;

        Ok(Self { handle, writer })
    }

    /// Applies one value set to the index.
    ///
    /// Any existing document with the same id is removed first, so
    /// re-indexing an entity replaces it. A deletion record removes the id
    /// and adds nothing back. The change is staged until [`commit`] is
    /// called.
    ///
    /// [`commit`]: Self::commit
    pub fn apply(&mut self, set: &ValueSet) -> Result<(), IndexError> {
        let schema = &self.handle.schema;

        let id_term = Term::from_field_text(schema.id, &set.id);
        self.writer.delete_term(id_term);

        let Some(values) = &set.values else {
            return Ok(());
        };

        let mut doc = TantivyDocument::new();
        doc.add_text(schema.id, &set.id);

        if let Some(category) = &set.category {
            doc.add_text(schema.category, category);
        }
        if let Some(item_type) = &set.item_type {
            doc.add_text(schema.item_type, item_type);
        }

        if let Some(path) = set.first_text(PATH_VALUE) {
            doc.add_text(schema.path, path);
            for prefix in ancestor_prefixes(path) {
                doc.add_text(schema.path_prefixes, &prefix);
            }
        }

        for (name, field_values) in values {
            if name == PATH_VALUE {
                continue;
            }
            // Fields the schema does not know are simply not indexed
            let Some(field) = schema.text_field(name) else {
                continue;
            };
            for value in field_values {
                doc.add_text(field, value.to_string());
            }
        }

        self.writer
            .add_document(doc)
            .map_err(|e| IndexError::write(&e))?;
        Ok(())
    }

    /// Applies multiple value sets to the index.
    pub fn apply_all(&mut self, sets: &[ValueSet]) -> Result<(), IndexError> {
        for set in sets {
            self.apply(set)?;
        }
        Ok(())
    }

    /// Commits all staged changes, making them visible to searchers.
    pub fn commit(&mut self) -> Result<(), IndexError> {
        self.writer.commit().map_err(|e| IndexError::commit(&e))?;
        Ok(())
    }

    /// Rolls back any uncommitted changes.
    pub fn rollback(&mut self) -> Result<(), IndexError> {
        self.writer.rollback().map_err(|e| IndexError::commit(&e))?;
        Ok(())
    }

    /// Returns the number of committed documents in the index.
    pub fn num_docs(&self) -> Result<u64, IndexError> {
        let reader = self
            .handle
            .index
            .reader()
            .map_err(|e| IndexError::execute(&e))?;
        Ok(reader.searcher().num_docs())
    }
}

/// Expands an ancestor id chain into one term per chain prefix.
///
/// `-1,1023,1045` yields `-1`, `-1,1023`, and `-1,1023,1045`, so an exact
/// term match on any prefix selects the node and all of its descendants.
fn ancestor_prefixes(path: &str) -> Vec<String> {
    let mut prefixes = Vec::new();
    let mut current = String::new();

    for segment in path.split(',') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        if !current.is_empty() {
            current.push(',');
        }
        current.push_str(segment);
        prefixes.push(current.clone());
    }

    prefixes
}
