//! Store lookups: name → id for pinned stores, id → display name for cards.

use std::collections::BTreeSet;
use std::sync::PoisonError;

use dealsdb_core::Deal;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::SourceError;
use crate::postgrest::literal_ilike;

use super::{RestSource, Rows};

const STORES_TABLE: &str = "cleaned_stores";

#[derive(Debug, Deserialize)]
struct StoreRow {
    id: Uuid,
    #[serde(default)]
    cleaned_name: Option<String>,
}

impl RestSource {
    /// Finds the store whose display name equals `name`, ignoring case.
    pub(super) async fn resolve_store_id(&self, name: &str) -> Result<Option<Uuid>, SourceError> {
        if let Some(id) = self.cached_store_id(name) {
            return Ok(Some(id));
        }

        let mut url = self.table_url(STORES_TABLE)?;
        url.query_pairs_mut()
            .append_pair("select", "id,cleaned_name")
            .append_pair("cleaned_name", &literal_ilike(name, true))
            .append_pair("limit", "1");

        let Rows { rows, .. } = self
            .get_rows::<StoreRow>(url, &format!("store lookup for \"{name}\""))
            .await?;
        let Some(row) = rows.into_iter().next() else {
            return Ok(None);
        };
        self.remember(row.id, row.cleaned_name);
        Ok(Some(row.id))
    }

    /// Fills `store_name` on every deal, falling back to the brand.
    ///
    /// Ids missing from the cache are fetched in one request. A failed lookup
    /// is logged and leaves the brand fallback in place.
    pub(super) async fn enrich_store_names(&self, deals: &mut [Deal]) {
        let missing: BTreeSet<Uuid> = {
            let cache = self
                .store_names
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            deals
                .iter()
                .filter_map(|d| d.store_id)
                .filter(|id| !cache.contains_key(id))
                .collect()
        };

        if !missing.is_empty() {
            if let Err(e) = self.load_store_names(&missing).await {
                tracing::warn!(error = %e, stores = missing.len(), "store name lookup failed");
            }
        }

        let cache = self
            .store_names
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        for deal in deals.iter_mut() {
            let name = deal
                .store_id
                .and_then(|id| cache.get(&id).cloned().flatten())
                .or_else(|| deal.brand.clone());
            deal.store_name = name;
        }
    }

    async fn load_store_names(&self, ids: &BTreeSet<Uuid>) -> Result<(), SourceError> {
        let list: Vec<String> = ids.iter().map(Uuid::to_string).collect();
        let mut url = self.table_url(STORES_TABLE)?;
        url.query_pairs_mut()
            .append_pair("select", "id,cleaned_name")
            .append_pair("id", &format!("in.({})", list.join(",")));

        let Rows { rows, .. } = self
            .get_rows::<StoreRow>(url, "store names")
            .await?;

        let mut cache = self
            .store_names
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        for id in ids {
            cache.entry(*id).or_insert(None);
        }
        for row in rows {
            let name = row.cleaned_name.filter(|n| !n.trim().is_empty());
            cache.insert(row.id, name);
        }
        Ok(())
    }

    fn cached_store_id(&self, name: &str) -> Option<Uuid> {
        let cache = self
            .store_names
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        cache.iter().find_map(|(id, cached)| {
            cached
                .as_deref()
                .filter(|n| n.eq_ignore_ascii_case(name))
                .map(|_| *id)
        })
    }

    fn remember(&self, id: Uuid, name: Option<String>) {
        let name = name.filter(|n| !n.trim().is_empty());
        self.store_names
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, name);
    }
}
