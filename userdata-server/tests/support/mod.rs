use std::sync::Arc;

use axum_test::TestServer;
use chrono::{Duration, TimeZone, Utc};
use tempfile::TempDir;
use userdata_core::{DisableUserDataConfig, InMemoryCatalog, PluginSettings};
use userdata_model::{CatalogItem, ItemId, ItemKind, UserData, UserId};
use userdata_server::{
    AppState, create_app,
    infra::{
        config::{Config, PluginStoreConfig},
        settings_store::PluginSettingsStore,
    },
};

/// Ids of the seeded catalog.
// Not every test binary touches every id
#[allow(unused)]
#[derive(Debug, Clone, Copy)]
pub struct Fixture {
    pub user: UserId,
    pub movies_library: ItemId,
    pub shows_library: ItemId,
    pub shelf: ItemId,
    pub box_set: ItemId,
    pub movie: ItemId,
    pub series: ItemId,
    pub watched_episode: ItemId,
    pub next_episode: ItemId,
}

#[allow(unused)]
#[derive(Debug)]
pub struct TestHost {
    pub server: TestServer,
    pub state: AppState,
    pub fixture: Fixture,
    _dir: Option<TempDir>,
}

fn seeded_catalog() -> (InMemoryCatalog, Fixture) {
    let base = Utc
        .with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
        .single()
        .expect("valid date");
    let catalog = InMemoryCatalog::new();
    let user = UserId::new();

    let movies = CatalogItem::new("Movies", ItemKind::CollectionFolder);
    let shows = CatalogItem::new("Shows", ItemKind::CollectionFolder);
    let shelf =
        CatalogItem::new("Shelf", ItemKind::Folder).with_parent(movies.id);
    let box_set = CatalogItem::new("Trilogy", ItemKind::BoxSet)
        .with_parent(movies.id)
        .created_at(base);
    let movie = CatalogItem::new("Alpha", ItemKind::Movie)
        .with_parent(shelf.id)
        .created_at(base + Duration::days(1));
    let series = CatalogItem::new("Show", ItemKind::Series)
        .with_parent(shows.id)
        .created_at(base);
    let watched = CatalogItem::new("Pilot", ItemKind::Episode)
        .with_parent(series.id)
        .with_series(series.id)
        .with_episode_number(1, 1)
        .created_at(base + Duration::days(2));
    let next = CatalogItem::new("Second", ItemKind::Episode)
        .with_parent(series.id)
        .with_series(series.id)
        .with_episode_number(1, 2)
        .created_at(base + Duration::days(3));

    let fixture = Fixture {
        user,
        movies_library: movies.id,
        shows_library: shows.id,
        shelf: shelf.id,
        box_set: box_set.id,
        movie: movie.id,
        series: series.id,
        watched_episode: watched.id,
        next_episode: next.id,
    };

    for item in [movies, shows, shelf, box_set, movie, series, watched, next] {
        catalog.insert(item);
    }

    catalog.set_user_data(
        user,
        fixture.movie,
        UserData {
            playback_position_ticks: 42_000_000,
            is_favorite: true,
            last_played_date: Some(base + Duration::days(5)),
            ..UserData::default()
        },
    );
    catalog.set_user_data(
        user,
        fixture.watched_episode,
        UserData {
            played: true,
            play_count: 1,
            last_played_date: Some(base + Duration::days(4)),
            ..UserData::default()
        },
    );

    (catalog, fixture)
}

fn host(
    store: PluginSettingsStore,
    config: Config,
    dir: Option<TempDir>,
) -> TestHost {
    let (catalog, fixture) = seeded_catalog();
    let state =
        AppState::new(Arc::new(config), Arc::new(catalog), Arc::new(store));
    let server =
        TestServer::new(create_app(state.clone())).expect("test server");

    TestHost {
        server,
        state,
        fixture,
        _dir: dir,
    }
}

/// Host whose plugin settings live in memory only.
#[allow(unused)]
pub fn build_host(config: DisableUserDataConfig) -> TestHost {
    let settings = PluginSettings {
        disable_user_data: config,
        ..PluginSettings::default()
    };
    host(
        PluginSettingsStore::in_memory(settings),
        Config::default(),
        None,
    )
}

/// Host persisting plugin settings under a fresh temp directory.
#[allow(unused)]
pub fn build_persistent_host() -> TestHost {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings_path = dir.path().join("plugins.toml");
    let store = PluginSettingsStore::open(&settings_path).expect("open store");
    let config = Config {
        plugins: PluginStoreConfig { settings_path },
        ..Config::default()
    };
    host(store, config, Some(dir))
}
