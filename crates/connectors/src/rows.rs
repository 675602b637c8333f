//! Full-table retrieval over the remote offset/limit pagination.
//!
//! Page `k` (0-based) is requested with `offset = k * page_size` and `limit = page_size`. The
//! loop ends at the first page with no rows; the total row count is never known up front.
//! Pages are fetched strictly one after another and the first failure aborts the whole fetch,
//! discarding everything accumulated so far.

use crate::fields::Fields;
use crate::normalize::normalize_value;
use crate::remote::{RemoteApi, RemoteRow};
use loopstudio_common::config::PaginationSettings;
use loopstudio_error::{Result, StudioError};
use serde::Serialize;
use serde_json::Value;

/// One output row, values in requested-field order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub values: Vec<Value>,
}

pub async fn fetch_all_rows(
    api: &RemoteApi,
    workspace: &str,
    table: &str,
    requested: &Fields,
    pagination: &PaginationSettings,
) -> Result<Vec<Row>> {
    let page_size = pagination.page_size;
    if page_size == 0 {
        return Err(StudioError::config("pagination.page_size must be at least 1"));
    }

    let mut rows = Vec::new();
    let mut page: usize = 0;

    loop {
        let offset = page.checked_mul(page_size).ok_or_else(|| {
            StudioError::debug(format!(
                "Row offset overflow at page {} (page size {})",
                page, page_size
            ))
        })?;

        let data = api.data_page(workspace, table, offset, page_size).await?;
        tracing::debug!(workspace, table, offset, rows = data.rows.len(), "Fetched page");

        if data.rows.is_empty() {
            break;
        }

        if let Some(max_pages) = pagination.max_pages {
            if page >= max_pages {
                return Err(StudioError::user(format!(
                    "Table {}/{} has more than {} pages of {} rows",
                    workspace, table, max_pages, page_size
                ))
                .with_hint("Raise pagination.max_pages or remove the limit"));
            }
        }

        rows.reserve(data.rows.len());
        for remote in &data.rows {
            rows.push(extract_row(remote, requested)?);
        }

        page += 1;
    }

    tracing::info!(workspace, table, rows = rows.len(), pages = page, "Fetched table");
    Ok(rows)
}

/// Pick the requested fields out of a remote row and normalize them.
pub fn extract_row(remote: &RemoteRow, requested: &Fields) -> Result<Row> {
    let values = requested
        .iter()
        .map(|field| normalize_value(field, remote.get(&field.id)))
        .collect::<Result<Vec<_>>>()?;
    Ok(Row { values })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::fields_from_columns;
    use crate::remote::{AuthMode, Column, ColumnType};
    use crate::testing::StubFetcher;
    use serde_json::json;
    use std::sync::Arc;
    use url::Url;

    const BASE: &str = "https://api.example.com/api/v1.0";

    fn api(fetcher: &Arc<StubFetcher>) -> RemoteApi {
        RemoteApi::new(fetcher.clone(), Url::parse(BASE).unwrap())
    }

    fn settings(page_size: usize) -> PaginationSettings {
        PaginationSettings {
            page_size,
            max_pages: None,
        }
    }

    fn number_fields(n: usize) -> Fields {
        let columns: Vec<Column> = (0..n)
            .map(|i| Column {
                name: format!("c{}", i),
                tpe: ColumnType::Number,
            })
            .collect();
        fields_from_columns(&columns).unwrap()
    }

    fn page_of(start: usize, len: usize) -> Value {
        let rows: Vec<Value> = (start..start + len)
            .map(|i| json!({"0": format!("row-{}", i), "1": i}))
            .collect();
        json!({ "rows": rows })
    }

    fn data_url(offset: usize, limit: usize) -> String {
        format!(
            "{}/workspaces/ws/tables/t/data?offset={}&limit={}",
            BASE, offset, limit
        )
    }

    #[tokio::test]
    async fn test_concatenates_pages_until_empty() {
        let fetcher = Arc::new(StubFetcher::default());
        fetcher.push_ok(page_of(0, 3));
        fetcher.push_ok(page_of(3, 3));
        fetcher.push_ok(page_of(6, 1));
        fetcher.push_ok(json!({"rows": []}));

        let rows = fetch_all_rows(&api(&fetcher), "ws", "t", &number_fields(1), &settings(3))
            .await
            .unwrap();

        let values: Vec<Value> = rows.into_iter().map(|r| r.values[0].clone()).collect();
        assert_eq!(values, (0..7).map(|i| json!(i)).collect::<Vec<_>>());

        // k non-empty pages + 1 empty page
        assert_eq!(
            fetcher.request_urls(),
            vec![data_url(0, 3), data_url(3, 3), data_url(6, 3), data_url(9, 3)]
        );
        assert!(fetcher
            .requests()
            .iter()
            .all(|(_, auth)| *auth == AuthMode::Required));
    }

    #[tokio::test]
    async fn test_empty_first_page_issues_one_request() {
        let fetcher = Arc::new(StubFetcher::default());
        fetcher.push_ok(json!({"rows": []}));

        let rows = fetch_all_rows(&api(&fetcher), "ws", "t", &number_fields(1), &settings(500))
            .await
            .unwrap();

        assert!(rows.is_empty());
        assert_eq!(fetcher.request_urls(), vec![data_url(0, 500)]);
    }

    #[tokio::test]
    async fn test_short_page_is_not_terminal() {
        // A short page does not end the loop; only an empty page does.
        let fetcher = Arc::new(StubFetcher::default());
        fetcher.push_ok(page_of(0, 2));
        fetcher.push_ok(json!({"rows": []}));

        let rows = fetch_all_rows(&api(&fetcher), "ws", "t", &number_fields(1), &settings(500))
            .await
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(fetcher.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_page_discards_everything() {
        let fetcher = Arc::new(StubFetcher::default());
        fetcher.push_ok(page_of(0, 2));
        fetcher.push_err(StudioError::remote_fetch(data_url(2, 2), "HTTP status 500"));
        fetcher.push_ok(page_of(4, 2));

        let err = fetch_all_rows(&api(&fetcher), "ws", "t", &number_fields(1), &settings(2))
            .await
            .unwrap_err();

        assert!(err.is_user_facing());
        assert!(err.message.contains("offset=2"));
        // nothing after the failure is requested
        assert_eq!(fetcher.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_requested_subset_order() {
        let fetcher = Arc::new(StubFetcher::default());
        fetcher.push_ok(json!({"rows": [
            {"0": "a", "1": 10, "2": "two", "3": 30, "4": "four", "5": "five"},
            {"0": "b", "1": 11, "2": "deux", "5": "cinq"}
        ]}));
        fetcher.push_ok(json!({"rows": []}));

        let all = number_fields(5);
        let requested = all.for_ids(&["2", "5"]).unwrap();
        let rows = fetch_all_rows(&api(&fetcher), "ws", "t", &requested, &settings(500))
            .await
            .unwrap();

        assert_eq!(
            rows,
            vec![
                Row {
                    values: vec![json!("two"), json!("five")]
                },
                Row {
                    values: vec![json!("deux"), json!("cinq")]
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_keys_become_null() {
        let fetcher = Arc::new(StubFetcher::default());
        fetcher.push_ok(json!({"rows": [{"0": "a"}]}));
        fetcher.push_ok(json!({"rows": []}));

        let rows = fetch_all_rows(&api(&fetcher), "ws", "t", &number_fields(2), &settings(500))
            .await
            .unwrap();
        assert_eq!(rows[0].values, vec![Value::Null, Value::Null]);
    }

    #[tokio::test]
    async fn test_max_pages_fails_instead_of_truncating() {
        let fetcher = Arc::new(StubFetcher::default());
        fetcher.push_ok(page_of(0, 1));
        fetcher.push_ok(page_of(1, 1));
        fetcher.push_ok(page_of(2, 1));

        let pagination = PaginationSettings {
            page_size: 1,
            max_pages: Some(2),
        };
        let err = fetch_all_rows(&api(&fetcher), "ws", "t", &number_fields(1), &pagination)
            .await
            .unwrap_err();

        assert!(err.is_user_facing());
        assert!(err.message.contains("more than 2 pages"));
    }

    #[tokio::test]
    async fn test_max_pages_allows_exact_fit() {
        let fetcher = Arc::new(StubFetcher::default());
        fetcher.push_ok(page_of(0, 1));
        fetcher.push_ok(page_of(1, 1));
        fetcher.push_ok(json!({"rows": []}));

        let pagination = PaginationSettings {
            page_size: 1,
            max_pages: Some(2),
        };
        let rows = fetch_all_rows(&api(&fetcher), "ws", "t", &number_fields(1), &pagination)
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn test_bad_date_aborts_fetch() {
        let columns = vec![Column {
            name: "ts".to_string(),
            tpe: ColumnType::Date,
        }];
        let fields = fields_from_columns(&columns).unwrap();

        let fetcher = Arc::new(StubFetcher::default());
        fetcher.push_ok(json!({"rows": [{"1": "2020-01-02T03:04:05Z"}, {"1": "not a date"}]}));

        let err = fetch_all_rows(&api(&fetcher), "ws", "t", &fields, &settings(500))
            .await
            .unwrap_err();
        assert!(err.message.contains("not a date"));
    }
}
