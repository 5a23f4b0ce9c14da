//! Splitting a catalog into provider-sized chunks

use catsync_core::catalog::Catalog;

/// Split `catalog` into ordered chunks of at most `size` keys
///
/// Concatenating the chunks reproduces `catalog` exactly. An empty catalog
/// yields no chunks. A `size` of zero is treated as one.
#[must_use]
pub fn chunk(catalog: &Catalog, size: usize) -> Vec<Catalog> {
    let size = size.max(1);
    let mut chunks = Vec::with_capacity(catalog.len().div_ceil(size));
    let mut current = Catalog::with_capacity(size.min(catalog.len()));

    for (key, value) in catalog {
        current.insert(key.clone(), value.clone());
        if current.len() == size {
            chunks.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
