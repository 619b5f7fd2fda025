//! Per-segment binary doc values.
//!
//! Doc values are column-oriented per-document values the host can fetch by
//! document id during scoring, independent of the inverted index. This
//! module defines the accessor the scoring session reads through, plus an
//! in-memory segment used by tests, the command-line tool and benchmarks.

use std::fmt;
use std::io;

use ahash::AHashMap;

use crate::codec;
use crate::error::{FastCosineError, Result};

/// Document id within one segment.
pub type DocId = u32;

/// Forward-only cursor over one binary doc-values field of one segment.
///
/// Document ids passed to [`advance_exact`](Self::advance_exact) must be
/// strictly increasing. What happens otherwise is up to the implementation.
pub trait BinaryDocValues: Send {
    /// Position on `doc_id`. Returns whether the document has a value.
    fn advance_exact(&mut self, doc_id: DocId) -> io::Result<bool>;

    /// Raw bytes of the current document's value.
    fn binary_value(&mut self) -> io::Result<&[u8]>;
}

/// One immutable index segment, as seen by the scorer.
pub trait SegmentReader: Send + Sync + fmt::Debug {
    /// Position of this segment within its index.
    fn ord(&self) -> usize;

    /// One past the largest document id in the segment.
    fn max_doc(&self) -> DocId;

    /// Open a cursor over `field`, or `None` if no document in this segment has it.
    fn binary_doc_values(&self, field: &str) -> io::Result<Option<Box<dyn BinaryDocValues + '_>>>;
}

/// Sparse values of one field in one segment.
#[derive(Debug, Clone, Default)]
pub struct FieldDocValues {
    values: Vec<Option<Vec<u8>>>,
}

impl FieldDocValues {
    /// Set the value for a document.
    ///
    /// Fails for `u32::MAX`, which has no room for a `max_doc` above it.
    pub fn set(&mut self, doc_id: DocId, value: Vec<u8>) -> Result<()> {
        let slots = slots_for(doc_id)? as usize;

        if slots > self.values.len() {
            self.values.resize(slots, None);
        }

        self.values[doc_id as usize] = Some(value);
        Ok(())
    }

    /// Get the value for a document.
    pub fn get(&self, doc_id: DocId) -> Option<&[u8]> {
        self.values.get(doc_id as usize).and_then(|v| v.as_deref())
    }

    /// Number of document slots.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Cursor over a [`FieldDocValues`].
#[derive(Debug)]
pub struct MemoryBinaryDocValues<'a> {
    values: &'a FieldDocValues,
    current: Option<DocId>,
}

impl<'a> MemoryBinaryDocValues<'a> {
    /// Create a cursor positioned before the first document.
    pub fn new(values: &'a FieldDocValues) -> Self {
        MemoryBinaryDocValues {
            values,
            current: None,
        }
    }
}

impl BinaryDocValues for MemoryBinaryDocValues<'_> {
    fn advance_exact(&mut self, doc_id: DocId) -> io::Result<bool> {
        if let Some(current) = self.current
            && doc_id <= current
        {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("cannot advance backwards from doc {current} to doc {doc_id}"),
            ));
        }

        self.current = Some(doc_id);
        Ok(self.values.get(doc_id).is_some())
    }

    fn binary_value(&mut self) -> io::Result<&[u8]> {
        self.current
            .and_then(|doc_id| self.values.get(doc_id))
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no value for current document"))
    }
}

/// In-memory segment holding binary doc values for any number of fields.
#[derive(Debug, Clone, Default)]
pub struct MemorySegment {
    ord: usize,
    max_doc: DocId,
    fields: AHashMap<String, FieldDocValues>,
}

impl MemorySegment {
    /// Create an empty segment.
    pub fn new(ord: usize) -> Self {
        MemorySegment {
            ord,
            ..Default::default()
        }
    }

    /// Store raw bytes for a document.
    pub fn add_value(&mut self, doc_id: DocId, field: &str, value: Vec<u8>) -> Result<()> {
        let max_doc = slots_for(doc_id)?;
        self.fields
            .entry(field.to_string())
            .or_default()
            .set(doc_id, value)?;
        self.max_doc = self.max_doc.max(max_doc);
        Ok(())
    }

    /// Encode and store a vector for a document.
    pub fn add_vector(&mut self, doc_id: DocId, field: &str, vector: &[f64]) -> Result<()> {
        let encoded = codec::encode(vector)?;
        self.add_value(doc_id, field, encoded)
    }

    /// Reserve a document id that has no value in any field.
    pub fn add_empty(&mut self, doc_id: DocId) -> Result<()> {
        self.max_doc = self.max_doc.max(slots_for(doc_id)?);
        Ok(())
    }

    /// Field values, if the field exists in this segment.
    pub fn field(&self, field: &str) -> Option<&FieldDocValues> {
        self.fields.get(field)
    }
}

/// Number of id slots needed to hold `doc_id`.
fn slots_for(doc_id: DocId) -> Result<DocId> {
    doc_id.checked_add(1).ok_or_else(|| {
        FastCosineError::invalid_argument(format!("doc id {doc_id} is out of range"))
    })
}

impl SegmentReader for MemorySegment {
    fn ord(&self) -> usize {
        self.ord
    }

    fn max_doc(&self) -> DocId {
        self.max_doc
    }

    fn binary_doc_values(&self, field: &str) -> io::Result<Option<Box<dyn BinaryDocValues + '_>>> {
        Ok(self.fields.get(field).map(|values| {
            Box::new(MemoryBinaryDocValues::new(values)) as Box<dyn BinaryDocValues + '_>
        }))
    }
}
