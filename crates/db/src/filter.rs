//! Query filter builder for resource listing.
//!
//! Each helper mutates a statement or predicate in place and performs no I/O.
//! Column names come from the closed [`SearchField`] and [`SortField`] enums,
//! so nothing outside the allow-lists can reach the generated SQL.

use catalog_core::resource::{SearchField, SortField, SortOrder};
use sea_orm::sea_query::{LikeExpr, Order};
use sea_orm::{ColumnTrait, Condition, QueryTrait, Select};

use crate::entities::resources;

/// Escape character used in generated `LIKE` patterns.
pub const LIKE_ESCAPE: char = '\\';

/// Restricts `select` to live rows unless `include_deleted` is set.
pub fn apply_deleted_filter(select: &mut Select<resources::Entity>, include_deleted: bool) {
    if !include_deleted {
        select
            .query()
            .and_where(resources::Column::IsDeleted.eq(false));
    }
}

/// Restricts `select` to rows whose `search_by` column contains `search`.
///
/// Matching is a case-sensitive substring match. Wildcards in `search` are
/// matched literally. Nothing is applied unless both arguments are present
/// and `search` is non-empty.
pub fn apply_search_filter(
    select: &mut Select<resources::Entity>,
    search: Option<&str>,
    search_by: Option<SearchField>,
) {
    let (Some(search), Some(field)) = (search, search_by) else {
        return;
    };
    if search.is_empty() {
        return;
    }

    let pattern = format!("%{}%", escape_like(search));
    select
        .query()
        .and_where(search_column(field).like(LikeExpr::new(pattern).escape(LIKE_ESCAPE)));
}

/// Orders `select` by `order_by` in `order` direction.
///
/// `id ASC` is always appended so rows with equal sort keys keep a stable
/// order across pages.
pub fn apply_sort_order(
    select: &mut Select<resources::Entity>,
    order: Option<SortOrder>,
    order_by: Option<SortField>,
) {
    let query = select.query();
    if let (Some(order), Some(field)) = (order, order_by) {
        query.order_by((resources::Entity, sort_column(field)), sort_direction(order));
    }
    query.order_by((resources::Entity, resources::Column::Id), Order::Asc);
}

/// Adds the live-row restriction to a single-row lookup predicate unless
/// `include_deleted` is set.
pub fn apply_deleted_predicate(predicate: &mut Condition, include_deleted: bool) {
    if !include_deleted {
        let current = std::mem::replace(predicate, Condition::all());
        *predicate = Condition::all()
            .add(current)
            .add(resources::Column::IsDeleted.eq(false));
    }
}

/// Maps a searchable field to its column.
#[must_use]
pub const fn search_column(field: SearchField) -> resources::Column {
    match field {
        SearchField::Name => resources::Column::Name,
        SearchField::Description => resources::Column::Description,
    }
}

/// Maps a sortable field to its column.
#[must_use]
pub const fn sort_column(field: SortField) -> resources::Column {
    match field {
        SortField::CreatedAt => resources::Column::CreatedAt,
        SortField::UpdatedAt => resources::Column::UpdatedAt,
        SortField::Name => resources::Column::Name,
        SortField::Description => resources::Column::Description,
    }
}

const fn sort_direction(order: SortOrder) -> Order {
    match order {
        SortOrder::Asc => Order::Asc,
        SortOrder::Desc => Order::Desc,
    }
}

/// Escapes `LIKE` wildcards and the escape character itself.
#[must_use]
pub fn escape_like(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len());
    for ch in search.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(ch);
    }
    escaped
}
