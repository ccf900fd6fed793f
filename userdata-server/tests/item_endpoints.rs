use axum::http::StatusCode;
use userdata_core::{DisableUserDataConfig, SuppressionRule};
use userdata_model::{ItemDto, ItemKind, QueryResult};

#[path = "support/mod.rs"]
mod support;
use support::{TestHost, build_host};

fn only(rule: SuppressionRule) -> DisableUserDataConfig {
    DisableUserDataConfig::default().with_rule(rule, true)
}

fn assert_user_data(items: &[ItemDto], present: bool) {
    assert!(!items.is_empty(), "expected a non-empty listing");
    for item in items {
        assert_eq!(
            item.user_data.is_some(),
            present,
            "unexpected UserData on {}",
            item.name
        );
    }
}

async fn get_listing(host: &TestHost, path: &str) -> Vec<ItemDto> {
    let response = host.server.get(path).await;
    response.assert_status_ok();
    response.json::<QueryResult<ItemDto>>().items
}

#[tokio::test]
async fn resume_keeps_user_data_while_rule_is_off() {
    let host = build_host(only(SuppressionRule::NextUp));
    let user = host.fixture.user;

    let items =
        get_listing(&host, &format!("/Users/{user}/Items/Resume")).await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, host.fixture.movie);
    assert_user_data(&items, true);
    let data = items[0].user_data.as_ref().expect("user data");
    assert!(data.is_favorite);
}

#[tokio::test]
async fn resume_drops_user_data_when_continue_watching_is_on() {
    let host = build_host(only(SuppressionRule::ContinueWatching));
    let user = host.fixture.user;

    let items =
        get_listing(&host, &format!("/UserItems/Resume?userId={user}")).await;
    assert_user_data(&items, false);

    let items =
        get_listing(&host, &format!("/Users/{user}/Items/Resume")).await;
    assert_user_data(&items, false);
}

#[tokio::test]
async fn next_up_suppression_overrides_client_request() {
    let host = build_host(only(SuppressionRule::NextUp));
    let user = host.fixture.user;

    let items = get_listing(
        &host,
        &format!("/Shows/NextUp?userId={user}&EnableUserData=true"),
    )
    .await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, host.fixture.next_episode);
    assert_user_data(&items, false);
}

#[tokio::test]
async fn latest_drops_user_data_when_recently_added_is_on() {
    let host = build_host(only(SuppressionRule::RecentlyAdded));
    let user = host.fixture.user;

    let response =
        host.server.get(&format!("/Users/{user}/Items/Latest")).await;
    response.assert_status_ok();
    let items = response.json::<Vec<ItemDto>>();
    assert_eq!(items[0].id, host.fixture.next_episode);
    assert!(items.iter().all(|item| !item.kind.is_container()));
    assert_user_data(&items, false);

    let response = host
        .server
        .get(&format!("/Items/Latest?userId={user}"))
        .await;
    assert_user_data(&response.json::<Vec<ItemDto>>(), false);
}

#[tokio::test]
async fn library_root_listing_is_a_collection() {
    let host = build_host(only(SuppressionRule::Collections));
    let (user, library) = (host.fixture.user, host.fixture.movies_library);

    let items = get_listing(
        &host,
        &format!("/Users/{user}/Items?parentId={library}&recursive=true"),
    )
    .await;
    assert!(items.iter().any(|item| item.id == host.fixture.movie));
    assert_user_data(&items, false);
}

#[tokio::test]
async fn plain_folder_listing_keeps_user_data() {
    let host = build_host(only(SuppressionRule::Collections));
    let (user, shelf) = (host.fixture.user, host.fixture.shelf);

    let items =
        get_listing(&host, &format!("/Items?userId={user}&parentId={shelf}"))
            .await;
    assert_eq!(items.len(), 1);
    assert_user_data(&items, true);
}

#[tokio::test]
async fn box_set_type_filter_suppresses_regardless_of_parent() {
    let host = build_host(only(SuppressionRule::Collections));
    let (user, shows) = (host.fixture.user, host.fixture.shows_library);

    let items = get_listing(
        &host,
        &format!(
            "/Users/{user}/Items?parentId={shows}&recursive=true&includeItemTypes=Series,BoxSet"
        ),
    )
    .await;
    assert!(items.iter().any(|item| item.kind == ItemKind::Series));
    assert_user_data(&items, false);
}

#[tokio::test]
async fn malformed_parent_id_is_a_client_error_not_a_suppression_failure() {
    let host = build_host(only(SuppressionRule::Collections));
    let user = host.fixture.user;

    // The layer ignores the value; the handler rejects it.
    let response = host
        .server
        .get(&format!("/Users/{user}/Items?parentId=not-a-guid"))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn globally_disabled_plugin_changes_nothing() {
    let mut config = DisableUserDataConfig::all();
    config.enabled = false;
    let host = build_host(config);
    let user = host.fixture.user;

    for path in [
        format!("/Users/{user}/Items/Resume"),
        format!("/Shows/NextUp?userId={user}"),
        format!("/Users/{user}/Items?parentId={}", host.fixture.movies_library),
    ] {
        assert_user_data(&get_listing(&host, &path).await, true);
    }
}

#[tokio::test]
async fn host_still_honours_client_opt_out() {
    let host = build_host(DisableUserDataConfig::default());
    let user = host.fixture.user;

    let items = get_listing(
        &host,
        &format!("/Users/{user}/Items/Resume?enableUserData=false"),
    )
    .await;
    assert_user_data(&items, false);
}

#[tokio::test]
async fn resume_without_user_is_rejected() {
    let host = build_host(DisableUserDataConfig::default());
    host.server
        .get("/UserItems/Resume")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unmodelled_item_types_do_not_fail_a_suppressed_listing() {
    let host = build_host(only(SuppressionRule::Collections));
    let (user, shows) = (host.fixture.user, host.fixture.shows_library);

    let items = get_listing(
        &host,
        &format!(
            "/Users/{user}/Items?parentId={shows}&recursive=true&includeItemTypes=Series,BoxSet,Video"
        ),
    )
    .await;
    assert!(items.iter().all(|item| item.kind == ItemKind::Series));
    assert_user_data(&items, false);
}
