//! Response envelope helpers.

use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct Message {
    pub message: &'static str,
}

/// `{"message": "..."}` with 200.
pub fn message(message: &'static str) -> (StatusCode, Json<Message>) {
    (StatusCode::OK, Json(Message { message }))
}

pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(data))
}

pub fn ok<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::OK, Json(data))
}

#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageMeta {
    pub page: u32,
    pub per_page: u32,
    pub total_items: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PageMeta {
    pub fn new(page: u32, per_page: u32, total_items: i64) -> Self {
        let per = i64::from(per_page.max(1));
        let total_pages = (total_items.max(0) + per - 1) / per;
        Self {
            page,
            per_page,
            total_items,
            total_pages,
            has_next: i64::from(page) < total_pages,
            has_prev: page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta_for_empty_table() {
        let m = PageMeta::new(1, 20, 0);
        assert_eq!(m.total_pages, 0);
        assert!(!m.has_next);
        assert!(!m.has_prev);
    }

    #[test]
    fn meta_rounds_pages_up() {
        let m = PageMeta::new(2, 20, 41);
        assert_eq!(m.total_pages, 3);
        assert!(m.has_next);
        assert!(m.has_prev);
        let last = PageMeta::new(3, 20, 41);
        assert!(!last.has_next);
    }

    #[test]
    fn page_serializes_in_declared_order() {
        let page = Page {
            items: vec![1, 2],
            meta: PageMeta::new(1, 2, 2),
        };
        let s = serde_json::to_string(&page).unwrap();
        assert_eq!(
            s,
            r#"{"items":[1,2],"meta":{"page":1,"per_page":2,"total_items":2,"total_pages":1,"has_next":false,"has_prev":false}}"#
        );
    }
}
