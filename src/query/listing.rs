use serde::{Deserialize, Serialize};

use super::sort::SortKey;
use crate::config::ListingConfig;
use crate::database::models::item::Item;

/// Raw listing query parameters.
///
/// All fields arrive as optional strings; bad numbers coerce to defaults the
/// same way the query layer has always treated them, rather than rejecting
/// the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListingParams {
    pub search: Option<String>,
    pub category: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Normalized listing query, ready to be turned into SQL
#[derive(Debug, Clone, PartialEq)]
pub struct ListingQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub sort: SortKey,
    pub page: i64,
    pub limit: i64,
}

impl ListingQuery {
    pub fn from_params(params: ListingParams, config: &ListingConfig) -> Self {
        let search = params
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        // `all` (or absence) means no category restriction
        let category = params.category.filter(|c| !c.is_empty() && c != "all");

        let page = parse_positive(params.page.as_deref()).unwrap_or(1);

        let mut limit = parse_positive(params.limit.as_deref()).unwrap_or(config.default_limit);
        if let Some(max) = config.max_limit {
            if limit > max {
                tracing::warn!("listing limit {} exceeds max {}, capping to max", limit, max);
                limit = max;
            }
        }

        Self {
            search,
            category,
            sort: SortKey::parse(params.sort.as_deref()),
            page,
            limit,
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }

    /// Full page query: filters, sort, and pagination window
    pub fn to_select_sql(&self) -> (String, Vec<String>) {
        let (where_clause, params) = self.where_clause();

        let sql = [
            "SELECT * FROM \"items\"".to_string(),
            where_clause,
            self.sort.order_sql().to_string(),
            format!("LIMIT {} OFFSET {}", self.limit, self.offset()),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        (sql, params)
    }

    /// Count twin of the page query: same filters, no sort or window
    pub fn to_count_sql(&self) -> (String, Vec<String>) {
        let (where_clause, params) = self.where_clause();

        let sql = ["SELECT COUNT(*) as count FROM \"items\"".to_string(), where_clause]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        (sql, params)
    }

    fn where_clause(&self) -> (String, Vec<String>) {
        let mut conditions = Vec::new();
        let mut params = Vec::new();

        if let Some(search) = &self.search {
            params.push(format!("%{}%", escape_like(search)));
            let n = params.len();
            conditions.push(format!(
                "(\"name\" ILIKE ${n} OR \"description\" ILIKE ${n})"
            ));
        }

        if let Some(category) = &self.category {
            params.push(category.clone());
            conditions.push(format!("\"category\" = ${}", params.len()));
        }

        if conditions.is_empty() {
            (String::new(), params)
        } else {
            (format!("WHERE {}", conditions.join(" AND ")), params)
        }
    }
}

/// Escape LIKE metacharacters so search input matches literally
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// One page of items plus pagination metadata
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPage {
    pub items: Vec<Item>,
    pub total_items: i64,
    pub current_page: i64,
    pub num_of_pages: i64,
}

impl ItemPage {
    pub fn new(items: Vec<Item>, total_items: i64, query: &ListingQuery) -> Self {
        Self {
            items,
            total_items,
            current_page: query.page,
            num_of_pages: num_of_pages(total_items, query.limit),
        }
    }
}

/// `ceil(total_items / limit)`; zero matches yield zero pages
pub fn num_of_pages(total_items: i64, limit: i64) -> i64 {
    if limit <= 0 {
        return 0;
    }
    (total_items + limit - 1) / limit
}

fn parse_positive(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.parse::<i64>().ok()).filter(|n| *n >= 1)
}
