//! Paginated item listing for one category
//!
//! Pages are requested one after another starting at page 1 until the
//! accumulated item count reaches the category's declared count. A page that
//! fails is logged and counted as empty; it is not retried. Because a source
//! may declare more items than it can deliver, every listing runs against an
//! attempt budget (and an optional deadline) and ends in
//! [`Error::PaginationExhausted`] once that is spent.

use std::time::Instant;

use tokio::sync::broadcast;

use crate::config::PaginationConfig;
use crate::error::{Error, Result};
use crate::source::CatalogSource;
use crate::types::{Category, Event, Item};

/// List exactly `category.declared_count` items, or fail with `PaginationExhausted`
pub(crate) async fn list_category_items(
    source: &dyn CatalogSource,
    category: &Category,
    pagination: &PaginationConfig,
    event_tx: &broadcast::Sender<Event>,
) -> Result<Vec<Item>> {
    let declared = category.declared_count;
    let started = Instant::now();
    let mut items: Vec<Item> = Vec::new();
    let mut page: u32 = 1;
    let mut attempts: u32 = 0;
    let mut page_size_hint: Option<usize> = None;

    while items.len() < declared {
        let budget = pagination.attempt_budget(declared, page_size_hint);
        let out_of_time = pagination
            .max_elapsed
            .is_some_and(|limit| started.elapsed() >= limit);

        if attempts >= budget || out_of_time {
            tracing::warn!(
                category = %category.title,
                attempts,
                budget,
                collected = items.len(),
                declared,
                out_of_time,
                "giving up on category listing"
            );
            return Err(Error::PaginationExhausted {
                category: category.title.clone(),
                attempts,
                collected: items.len(),
                declared,
            });
        }

        attempts += 1;
        match source.fetch_item_page(category, page).await {
            Ok(fetched) => {
                let count = fetched.items.len();
                tracing::debug!(category = %category.title, page, items = count, "fetched page");
                event_tx
                    .send(Event::PageFetched {
                        category: category.title.clone(),
                        page,
                        items: count,
                    })
                    .ok();

                if let Some(size) = fetched.page_size.filter(|s| *s > 0) {
                    page_size_hint = Some(size);
                } else if count > 0 {
                    page_size_hint = Some(count);
                }
                items.extend(fetched.items);
            }
            Err(e) => {
                tracing::warn!(category = %category.title, page, error = %e, "skipping failed page");
                event_tx
                    .send(Event::PageFailed {
                        category: category.title.clone(),
                        page,
                        error: e.to_string(),
                    })
                    .ok();
            }
        }

        page = page.saturating_add(1);
    }

    // Sources may overshoot on the last page
    items.truncate(declared);
    Ok(items)
}
