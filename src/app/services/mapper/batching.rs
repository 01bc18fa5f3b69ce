//! Batch splitting for rate-limited submission

/// Split items into consecutive chunks of at most `chunk_size`, preserving order
///
/// A chunk size of zero is treated as one.
pub fn chunk_measurements<T: Clone>(items: &[T], chunk_size: usize) -> Vec<Vec<T>> {
    items
        .chunks(chunk_size.max(1))
        .map(<[T]>::to_vec)
        .collect()
}
