//! Collection helpers

use crate::constants::CHUNK_SIZE_ERROR_MSG;
use ckit_domain::error::{Error, Result};

/// Split `items` into consecutive chunks of at most `max_chunk_size`
///
/// An empty input gives no chunks; a zero chunk size is an error.
///
/// ```
/// use ckit_infrastructure::utils::split_array;
///
/// let chunks = split_array(&[1, 2, 3, 4, 5], 2).unwrap();
/// assert_eq!(chunks, vec![vec![1, 2], vec![3, 4], vec![5]]);
/// ```
pub fn split_array<T: Clone>(items: &[T], max_chunk_size: usize) -> Result<Vec<Vec<T>>> {
    if max_chunk_size == 0 {
        return Err(Error::invalid_argument(CHUNK_SIZE_ERROR_MSG));
    }
    Ok(items
        .chunks(max_chunk_size)
        .map(<[T]>::to_vec)
        .collect())
}
