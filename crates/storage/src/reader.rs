//! Paged table reader.

use async_stream::try_stream;
use futures_util::Stream;
use movies_etl_core::RawRow;

use crate::error::StorageError;
use crate::traits::TableSource;

/// Lazily scan `table`, fetching `page_size` rows at a time until a page
/// comes back empty.
///
/// At most one page is held in memory. The stream is finite and not
/// restartable; call again to re-scan. The first store error ends it.
pub fn read_table<'a, S>(
    store: &'a S,
    table: &'a str,
    page_size: usize,
) -> impl Stream<Item = Result<RawRow, StorageError>> + Send + 'a
where
    S: TableSource + ?Sized,
{
    let page_size = page_size.max(1);
    try_stream! {
        let mut offset = 0usize;
        loop {
            let page = store.fetch_page(table, offset, page_size).await?;
            if page.is_empty() {
                break;
            }
            offset = offset.saturating_add(page.len());
            tracing::trace!(table, offset, "fetched page");
            for row in page {
                yield row;
            }
        }
        tracing::debug!(table, rows = offset, "table scan complete");
    }
}
