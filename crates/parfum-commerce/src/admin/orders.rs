//! Back-office orders table: search, filters, sort and paging.

use crate::checkout::{Order, OrderStatus};
use crate::error::CommerceError;
use crate::money::Money;
use crate::search::Pagination;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

/// Rows per page in the orders table.
pub const ORDERS_PAGE_SIZE: i64 = 20;

/// Sort order for the orders table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderSort {
    #[default]
    Newest,
    TotalDesc,
    TotalAsc,
    /// Status key, alphabetically.
    Status,
}

impl OrderSort {
    pub const ALL: [OrderSort; 4] = [
        OrderSort::Newest,
        OrderSort::TotalDesc,
        OrderSort::TotalAsc,
        OrderSort::Status,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSort::Newest => "newest",
            OrderSort::TotalDesc => "total_desc",
            OrderSort::TotalAsc => "total_asc",
            OrderSort::Status => "status",
        }
    }

    fn sort(&self, rows: &mut [Order]) {
        match self {
            OrderSort::Newest => rows.sort_by_key(|o| Reverse(o.created_at)),
            OrderSort::TotalDesc => rows.sort_by_key(|o| Reverse(o.total_bani)),
            OrderSort::TotalAsc => rows.sort_by_key(|o| o.total_bani),
            OrderSort::Status => rows.sort_by(|a, b| a.status.as_str().cmp(b.status.as_str())),
        }
    }
}

impl fmt::Display for OrderSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderSort {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderSort::ALL
            .into_iter()
            .find(|sort| sort.as_str() == s)
            .ok_or_else(|| CommerceError::UnknownSort(s.to_string()))
    }
}

/// Filter sent to the backend when listing orders.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    /// Inclusive lower bound on creation time.
    pub created_from: Option<DateTime<Utc>>,
    /// Exclusive upper bound on creation time.
    pub created_to: Option<DateTime<Utc>>,
}

impl OrderFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn created_between(
        mut self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Self {
        self.created_from = from;
        self.created_to = to;
        self
    }

    pub fn matches(&self, order: &Order) -> bool {
        self.status.map_or(true, |s| order.status == s)
            && self.created_from.map_or(true, |from| order.created_at >= from)
            && self.created_to.map_or(true, |to| order.created_at < to)
    }
}

/// One page of the orders table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrdersPage {
    pub rows: Vec<Order>,
    pub pagination: Pagination,
}

impl OrdersPage {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// State of the orders table controls.
///
/// Changing any filter or the sort order goes back to page 1.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrdersView {
    search: String,
    status: Option<OrderStatus>,
    min_total_lei: Option<f64>,
    max_total_lei: Option<f64>,
    sort: OrderSort,
    page: i64,
}

impl Default for OrdersView {
    fn default() -> Self {
        Self {
            search: String::new(),
            status: None,
            min_total_lei: None,
            max_total_lei: None,
            sort: OrderSort::default(),
            page: 1,
        }
    }
}

impl OrdersView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn status(&self) -> Option<OrderStatus> {
        self.status
    }

    pub fn sort(&self) -> OrderSort {
        self.sort
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn total_range_lei(&self) -> (Option<f64>, Option<f64>) {
        (self.min_total_lei, self.max_total_lei)
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
        self.page = 1;
    }

    pub fn set_status(&mut self, status: Option<OrderStatus>) {
        self.status = status;
        self.page = 1;
    }

    pub fn set_min_total(&mut self, lei: Option<f64>) {
        self.min_total_lei = lei;
        self.page = 1;
    }

    pub fn set_max_total(&mut self, lei: Option<f64>) {
        self.max_total_lei = lei;
        self.page = 1;
    }

    pub fn set_sort(&mut self, sort: OrderSort) {
        self.sort = sort;
        self.page = 1;
    }

    /// Go to a page. Values below 1 become 1.
    pub fn set_page(&mut self, page: i64) {
        self.page = page.max(1);
    }

    /// The part of the view the backend can filter on.
    pub fn remote_filter(&self) -> OrderFilter {
        OrderFilter {
            status: self.status,
            ..OrderFilter::default()
        }
    }

    /// Search text and total bounds, prepared once per `apply`.
    fn criteria(&self) -> Criteria {
        Criteria {
            query: self.search.trim().to_lowercase(),
            status: self.status,
            min_bani: self.min_total_lei.map(|lei| Money::from_decimal(lei).amount_bani),
            max_bani: self.max_total_lei.map(|lei| Money::from_decimal(lei).amount_bani),
        }
    }

    /// Search, filter, sort and slice the current page.
    ///
    /// A page beyond the end shows the last page instead.
    pub fn apply(&self, orders: &[Order]) -> OrdersPage {
        let criteria = self.criteria();
        let mut rows: Vec<Order> = orders
            .iter()
            .filter(|o| criteria.matches(o))
            .cloned()
            .collect();
        self.sort.sort(&mut rows);

        let pagination = Pagination::new(self.page, ORDERS_PAGE_SIZE, rows.len() as i64);
        let rows = rows
            .into_iter()
            .skip(pagination.offset() as usize)
            .take(ORDERS_PAGE_SIZE as usize)
            .collect();

        OrdersPage { rows, pagination }
    }
}

struct Criteria {
    query: String,
    status: Option<OrderStatus>,
    min_bani: Option<i64>,
    max_bani: Option<i64>,
}

impl Criteria {
    fn matches(&self, order: &Order) -> bool {
        let text_ok = self.query.is_empty()
            || [
                order.id.as_str(),
                order.customer_name.as_str(),
                order.customer_email.as_str(),
                order.customer_phone.as_str(),
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(&self.query));

        text_ok
            && self.status.map_or(true, |s| order.status == s)
            && self.min_bani.map_or(true, |min| order.total_bani >= min)
            && self.max_bani.map_or(true, |max| order.total_bani <= max)
    }
}
