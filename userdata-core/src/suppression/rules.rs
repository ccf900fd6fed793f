//! Pure request predicates behind each suppression rule.

use userdata_model::ItemId;

use crate::query::QueryParams;

/// Query parameter listing the item types a listing wants.
pub const INCLUDE_ITEM_TYPES: &str = "includeItemTypes";
/// Query parameter naming the folder being browsed.
pub const PARENT_ID: &str = "parentId";
/// Item type of collections.
pub const BOX_SET: &str = "BoxSet";

// Path suffixes of the home screen rows
pub const RESUME_SUFFIX: &str = "/Resume";
pub const NEXT_UP_SUFFIX: &str = "/NextUp";
pub const LATEST_SUFFIX: &str = "/Latest";

/// `includeItemTypes` names `BoxSet`, exactly, in any position.
pub fn includes_box_sets(query: &QueryParams) -> bool {
    query.contains_value(INCLUDE_ITEM_TYPES, BOX_SET)
}

/// First `parentId` value, if it is a well-formed id.
///
/// Only the first value is considered; later repeats are ignored.
pub fn parent_id(query: &QueryParams) -> Option<ItemId> {
    query
        .first(PARENT_ID)
        .and_then(|raw| ItemId::parse(raw).ok())
}

/// ASCII case-insensitive `ends_with`.
pub fn path_ends_with(path: &str, suffix: &str) -> bool {
    let (path, suffix) = (path.as_bytes(), suffix.as_bytes());
    path.len() >= suffix.len()
        && path[path.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}
