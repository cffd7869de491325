//! Reassembly of hydrated files
//!
//! Concatenates a fully hydrated file's chunks back into the original
//! byte sequence. The chunk list is treated as unordered input and
//! defensively re-sorted by index; a file that is not fully hydrated is
//! rejected outright rather than ever producing truncated output.

use crate::chunk::Chunk;
use crate::file::ChunkedFile;
use crate::{CoreError, Result};
use bytes::Bytes;

/// The reassembled byte sequence, tagged with its filename
#[derive(Clone, Debug, PartialEq)]
pub struct MergedFile {
    pub filename: String,
    pub data: Bytes,
}

/// Merge a hydrated file back into its original bytes
///
/// Hydration is checked structurally, chunk by chunk; the stored
/// `status` field is not trusted. The result length must equal the size
/// recorded at split time.
pub fn merge_file(file: &ChunkedFile) -> Result<MergedFile> {
    let mut completed = Vec::with_capacity(file.chunks.len());
    for chunk in &file.chunks {
        match chunk {
            Chunk::Completed(c) => completed.push(c.as_ref()),
            Chunk::Dry(id) => {
                return Err(CoreError::Validation(format!(
                    "cannot merge file {}: chunk {} is unresolved",
                    file.id, id
                )));
            }
        }
    }

    completed.sort_by_key(|c| c.index);

    let total: usize = completed.iter().map(|c| c.payload.data.len()).sum();
    let mut data = Vec::with_capacity(total);
    for chunk in &completed {
        data.extend_from_slice(&chunk.payload.data);
    }

    if data.len() as u64 != file.size {
        return Err(CoreError::MergedSizeMismatch {
            expected: file.size,
            actual: data.len() as u64,
        });
    }

    Ok(MergedFile {
        filename: file.filename.clone(),
        data: Bytes::from(data),
    })
}
