use std::{cmp::Reverse, collections::HashMap, path::Path};

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::{debug, info};
use userdata_model::{CatalogItem, ItemId, ItemKind, UserData, UserId};

use super::{CatalogSeed, ItemCatalog, ItemQuery};
use crate::error::{CatalogError, Result};

/// Guards ancestor walks against cyclic parent links in hand-written seeds.
const MAX_ANCESTOR_DEPTH: usize = 64;

/// Concurrent in-process catalog.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    items: DashMap<ItemId, CatalogItem>,
    user_data: DashMap<(UserId, ItemId), UserData>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a seed, rejecting items whose parent is missing.
    pub fn from_seed(seed: CatalogSeed) -> Result<Self> {
        let catalog = Self::new();
        for item in seed.items {
            catalog.insert(item);
        }

        for item in catalog.items.iter() {
            if let Some(parent_id) = item.parent_id
                && !catalog.items.contains_key(&parent_id)
            {
                return Err(CatalogError::UnknownParent(item.id));
            }
        }

        for entry in seed.user_data {
            catalog.set_user_data(entry.user_id, entry.item_id, entry.data);
        }

        info!(
            items = catalog.items.len(),
            user_data = catalog.user_data.len(),
            "catalog seeded"
        );
        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading catalog seed");
        Self::from_seed(CatalogSeed::from_path(path)?)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn insert(&self, item: CatalogItem) {
        self.items.insert(item.id, item);
    }

    pub fn set_user_data(&self, user: UserId, item: ItemId, data: UserData) {
        self.user_data.insert((user, item), data);
    }

    pub fn user_data(&self, user: UserId, item: ItemId) -> Option<UserData> {
        self.user_data.get(&(user, item)).map(|entry| entry.clone())
    }

    /// Whether `ancestor` appears anywhere on `item`'s parent chain.
    fn is_descendant_of(&self, item: &CatalogItem, ancestor: ItemId) -> bool {
        let mut current = item.parent_id;
        for _ in 0..MAX_ANCESTOR_DEPTH {
            match current {
                Some(id) if id == ancestor => return true,
                Some(id) => {
                    current = self.items.get(&id).and_then(|p| p.parent_id)
                }
                None => return false,
            }
        }
        false
    }

    fn matches_parent(
        &self,
        item: &CatalogItem,
        parent_id: Option<ItemId>,
        recursive: bool,
    ) -> bool {
        match parent_id {
            None => true,
            Some(parent) if recursive => self.is_descendant_of(item, parent),
            Some(parent) => item.parent_id == Some(parent),
        }
    }

    fn snapshot(&self) -> Vec<CatalogItem> {
        self.items.iter().map(|entry| entry.value().clone()).collect()
    }

    /// Items matching `query`, sorted by name.
    pub fn query(&self, query: &ItemQuery) -> Vec<CatalogItem> {
        let mut items: Vec<_> = self
            .snapshot()
            .into_iter()
            .filter(|item| query.accepts_kind(item.kind))
            .filter(|item| {
                self.matches_parent(item, query.parent_id, query.recursive)
            })
            .collect();

        items.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        page(items, query.start_index, query.limit)
    }

    /// Started but unfinished items for `user`, most recently played first.
    pub fn resume_items(
        &self,
        user: UserId,
        query: &ItemQuery,
    ) -> Vec<CatalogItem> {
        let mut in_progress: Vec<_> = self
            .snapshot()
            .into_iter()
            .filter(|item| query.accepts_kind(item.kind))
            .filter(|item| {
                self.matches_parent(item, query.parent_id, true)
            })
            .filter_map(|item| {
                let data = self.user_data(user, item.id)?;
                data.is_in_progress()
                    .then_some((data.last_played_date, item))
            })
            .collect();

        in_progress.sort_by_key(|(last_played, _)| Reverse(*last_played));
        page(
            in_progress.into_iter().map(|(_, item)| item).collect(),
            query.start_index,
            query.limit,
        )
    }

    /// The episode after the last one `user` finished, per started series.
    ///
    /// Series without any played episode are skipped, as are series whose
    /// final episode has been played. Results are ordered by the series'
    /// most recent play.
    pub fn next_up(
        &self,
        user: UserId,
        series_id: Option<ItemId>,
        limit: Option<usize>,
    ) -> Vec<CatalogItem> {
        let mut by_series: HashMap<ItemId, Vec<CatalogItem>> = HashMap::new();
        for item in self.snapshot() {
            if item.kind != ItemKind::Episode {
                continue;
            }
            let Some(owner) = item.series_id else {
                continue;
            };
            if series_id.is_some_and(|wanted| wanted != owner) {
                continue;
            }
            by_series.entry(owner).or_default().push(item);
        }

        let mut picks = Vec::new();
        for (_, mut episodes) in by_series {
            episodes.sort_by_key(|episode| {
                (
                    episode.parent_index_number.unwrap_or(0),
                    episode.index_number.unwrap_or(0),
                )
            });

            let played: Vec<_> = episodes
                .iter()
                .map(|episode| self.user_data(user, episode.id))
                .collect();

            let Some(last_played) = played
                .iter()
                .rposition(|data| data.as_ref().is_some_and(|d| d.played))
            else {
                continue;
            };

            let last_played_at = played[last_played]
                .as_ref()
                .and_then(|data| data.last_played_date);

            let next = episodes
                .into_iter()
                .enumerate()
                .skip(last_played + 1)
                .find(|(idx, _)| {
                    !played[*idx].as_ref().is_some_and(|d| d.played)
                });

            if let Some((_, episode)) = next {
                picks.push((last_played_at, episode));
            }
        }

        picks.sort_by_key(|(last_played_at, _)| Reverse(*last_played_at));
        page(picks.into_iter().map(|(_, item)| item).collect(), 0, limit)
    }

    /// Newest playable items under `query.parent_id`, newest first.
    pub fn latest_items(&self, query: &ItemQuery) -> Vec<CatalogItem> {
        let mut items: Vec<_> = self
            .snapshot()
            .into_iter()
            .filter(|item| {
                if query.include_item_types.is_empty() {
                    !item.kind.is_container()
                } else {
                    query.accepts_kind(item.kind)
                }
            })
            .filter(|item| {
                self.matches_parent(item, query.parent_id, true)
            })
            .collect();

        items.sort_by_key(|item| Reverse(item.date_created));
        page(items, query.start_index, query.limit)
    }
}

fn page(
    items: Vec<CatalogItem>,
    start_index: usize,
    limit: Option<usize>,
) -> Vec<CatalogItem> {
    let remaining = items.into_iter().skip(start_index);
    match limit {
        Some(limit) => remaining.take(limit).collect(),
        None => remaining.collect(),
    }
}

#[async_trait]
impl ItemCatalog for InMemoryCatalog {
    async fn get_item(&self, id: ItemId) -> Result<Option<CatalogItem>> {
        Ok(self.items.get(&id).map(|entry| entry.value().clone()))
    }
}
