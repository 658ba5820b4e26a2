//! Query objects for filtered, ordered and paginated listings.
//!
//! Each query turns its filters into a `Select` scoped to one account;
//! [`fetch_page`] runs it with the requested page.

mod customer;
mod event;
mod fulfillment;
mod invoice;
mod order;
mod sales_report;

pub use customer::CustomerQuery;
pub use event::EventQuery;
pub use fulfillment::FulfillmentQuery;
pub use invoice::InvoiceQuery;
pub use order::OrderQuery;
pub use sales_report::SalesReportQuery;

use chrono::{DateTime, NaiveDate, Utc};
use orderdesk_shared::types::{PageRequest, PageResponse};
use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, SelectorTrait};

/// Runs a select with pagination and wraps the rows with page metadata.
///
/// # Errors
///
/// Returns an error if either the count or the page query fails.
pub async fn fetch_page<'db, C, S>(
    db: &'db C,
    select: S,
    page: &PageRequest,
) -> Result<PageResponse<<S::Selector as SelectorTrait>::Item>, DbErr>
where
    C: ConnectionTrait,
    S: PaginatorTrait<'db, C>,
    <S::Selector as SelectorTrait>::Item: Send + Sync,
{
    let page = page.clone().normalized();
    let paginator = select.paginate(db, page.limit());
    let total = paginator.num_items().await?;
    let data = paginator.fetch_page(page.page_index()).await?;
    Ok(PageResponse::new(data, &page, total))
}

/// Case-insensitive substring match on a column.
pub(crate) fn ilike<E>(column: E::Column, term: &str) -> SimpleExpr
where
    E: EntityTrait,
{
    Expr::expr(Func::lower(Expr::col((E::default(), column))))
        .like(LikeExpr::new(contains_pattern(term)).escape('\\'))
}

/// `%term%` with LIKE wildcards in the term matched literally.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::from("%");
    for c in term.trim().to_lowercase().chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Start of a day in UTC.
pub(crate) fn day_start(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Start of the day after, the exclusive upper bound of an inclusive range.
pub(crate) fn day_end_exclusive(day: NaiveDate) -> DateTime<Utc> {
    day.succ_opt().map_or(DateTime::<Utc>::MAX_UTC, day_start)
}

/// Blank search terms are ignored.
pub(crate) fn non_blank(term: Option<&String>) -> Option<&str> {
    term.map(|t| t.trim()).filter(|t| !t.is_empty())
}
