// Copyright (c) Wanderlust Team
// SPDX-License-Identifier: Apache-2.0

//! Cursor pagination over a fully materialized, newest-first list.

use serde::Serialize;

pub const DEFAULT_LIMIT: usize = 20;
pub const MAX_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T, C> {
    pub items: Vec<T>,
    pub next_cursor: Option<C>,
    pub has_more: bool,
}

impl<T, C> Page<T, C> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            next_cursor: None,
            has_more: false,
        }
    }
}

pub fn clamp_limit(limit: Option<usize>) -> usize {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

/// Drop everything up to and including the item whose key equals `cursor`.
///
/// A cursor that is not present (stale or deleted) restarts from the beginning.
pub fn resume_after<T, C, K>(items: Vec<T>, cursor: Option<&C>, key: K) -> Vec<T>
where
    C: PartialEq,
    K: Fn(&T) -> C,
{
    let Some(cursor) = cursor else {
        return items;
    };
    match items.iter().position(|item| key(item) == *cursor) {
        Some(pos) => items.into_iter().skip(pos + 1).collect(),
        None => items,
    }
}

/// Take `limit + 1` items to detect a further page, return `limit` of them.
///
/// The next cursor is the key of the last returned item.
pub fn take_page<T, C, K>(items: impl IntoIterator<Item = T>, limit: usize, key: K) -> Page<T, C>
where
    K: Fn(&T) -> C,
{
    let mut items: Vec<T> = items.into_iter().take(limit + 1).collect();
    let has_more = items.len() > limit;
    items.truncate(limit);

    let next_cursor = if has_more { items.last().map(&key) } else { None };

    Page {
        items,
        next_cursor,
        has_more,
    }
}
