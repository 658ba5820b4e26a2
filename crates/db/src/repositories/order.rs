//! Order repository: orders, their lines and the validate transition.
//!
//! Line changes lock the order row, rewrite the line and recompute the
//! order total in the same transaction.

use chrono::Utc;
use orderdesk_core::audit::AuditEntry;
use orderdesk_core::order::{
    OrderLifecycle, format_order_reference, line_total, order_total, validate_line,
};
use orderdesk_core::{DomainError, DomainResult};
use orderdesk_shared::types::{Currency, PageResponse};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::Actor;
use super::account::{AccountRepository, Sequence};
use super::audit::AuditRepository;
use super::customer::clean;
use crate::entities::{customers, order_lines, orders, sea_orm_active_enums};
use crate::error::map_db_err;
use crate::queries::{OrderQuery, fetch_page};

/// A line to add to an order.
#[derive(Debug, Clone)]
pub struct NewLineInput {
    /// What is sold.
    pub description: String,
    /// Stock keeping unit.
    pub sku: Option<String>,
    /// Quantity, > 0.
    pub quantity: i32,
    /// Unit price, >= 0.
    pub unit_price: Decimal,
}

/// Changes to an existing line.
#[derive(Debug, Clone, Default)]
pub struct UpdateLineInput {
    /// What is sold.
    pub description: Option<String>,
    /// Stock keeping unit; `Some(None)` clears it.
    pub sku: Option<Option<String>>,
    /// Quantity, > 0.
    pub quantity: Option<i32>,
    /// Unit price, >= 0.
    pub unit_price: Option<Decimal>,
}

/// Input for creating an order.
#[derive(Debug, Clone, Default)]
pub struct CreateOrderInput {
    /// Ordering customer.
    pub customer_id: Option<Uuid>,
    /// Order currency, defaults to the account currency.
    pub currency: Option<Currency>,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Initial lines.
    pub lines: Vec<NewLineInput>,
}

/// Changes to an order header. `Some(None)` clears a field.
#[derive(Debug, Clone, Default)]
pub struct UpdateOrderInput {
    /// Ordering customer, only while the order is pending.
    pub customer_id: Option<Option<Uuid>>,
    /// Free-text notes.
    pub notes: Option<Option<String>>,
}

/// An order with its lines in position order.
#[derive(Debug, Clone)]
pub struct OrderWithLines {
    /// The order.
    pub order: orders::Model,
    /// Its lines.
    pub lines: Vec<order_lines::Model>,
}

/// Order repository.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    db: DatabaseConnection,
}

impl OrderRepository {
    /// Creates a new order repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists orders of an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(
        &self,
        account_id: Uuid,
        query: &OrderQuery,
    ) -> DomainResult<PageResponse<orders::Model>> {
        fetch_page(&self.db, query.select(account_id), &query.page)
            .await
            .map_err(map_db_err)
    }

    /// Finds an order of an account.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the order does not belong to the account.
    pub async fn find(&self, account_id: Uuid, id: Uuid) -> DomainResult<orders::Model> {
        find_scoped(&self.db, account_id, id).await
    }

    /// Finds an order with its lines.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the order does not belong to the account.
    pub async fn find_with_lines(&self, account_id: Uuid, id: Uuid) -> DomainResult<OrderWithLines> {
        let order = self.find(account_id, id).await?;
        let lines = load_lines(&self.db, order.id).await?;
        Ok(OrderWithLines { order, lines })
    }

    /// Creates a pending order with the next reference of the account.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for invalid lines, `NotFound` for an unknown
    /// customer.
    pub async fn create(
        &self,
        actor: Actor,
        input: CreateOrderInput,
    ) -> DomainResult<OrderWithLines> {
        let mut line_totals = Vec::with_capacity(input.lines.len());
        for line in &input.lines {
            validate_new_line(line)?;
            line_totals.push(line_total(line.quantity, line.unit_price)?);
        }
        let total = order_total(line_totals)?;

        let txn = self.db.begin().await.map_err(map_db_err)?;

        if let Some(customer_id) = input.customer_id {
            ensure_customer(&txn, actor.account_id, customer_id).await?;
        }

        let (account, sequence) =
            AccountRepository::allocate(&txn, actor.account_id, Sequence::Order).await?;
        let currency = input
            .currency
            .map_or(account.currency, |c| c.to_string());

        let now = Utc::now().into();
        let order = orders::ActiveModel {
            id: Set(Uuid::now_v7()),
            account_id: Set(actor.account_id),
            customer_id: Set(input.customer_id),
            reference: Set(format_order_reference(sequence)),
            status: Set(sea_orm_active_enums::OrderStatus::Pending),
            currency: Set(currency),
            total_amount: Set(total),
            notes: Set(clean(input.notes)),
            cancellation_reason: Set(None),
            validated_at: Set(None),
            invoiced_at: Set(None),
            cancelled_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(map_db_err)?;

        let mut lines = Vec::with_capacity(input.lines.len());
        for (position, line) in (0_i32..).zip(input.lines) {
            lines.push(insert_line(&txn, order.id, position, line).await?);
        }

        AuditRepository::record(&txn, actor, &order, vec![AuditEntry::created(&order)]).await?;
        txn.commit().await.map_err(map_db_err)?;

        tracing::info!(order_id = %order.id, reference = %order.reference, "order created");
        Ok(OrderWithLines { order, lines })
    }

    /// Updates customer and notes of an order.
    ///
    /// # Errors
    ///
    /// Returns `OrderNotEditable` when changing the customer of an order that
    /// is no longer pending.
    pub async fn update(
        &self,
        actor: Actor,
        id: Uuid,
        input: UpdateOrderInput,
    ) -> DomainResult<orders::Model> {
        let txn = self.db.begin().await.map_err(map_db_err)?;
        let before = find_locked(&txn, actor.account_id, id).await?;

        let mut active: orders::ActiveModel = before.clone().into();
        if let Some(customer_id) = input.customer_id {
            OrderLifecycle::ensure_editable(before.status.into())?;
            if let Some(customer_id) = customer_id {
                ensure_customer(&txn, actor.account_id, customer_id).await?;
            }
            active.customer_id = Set(customer_id);
        }
        if let Some(notes) = input.notes {
            active.notes = Set(clean(notes));
        }

        if !active.is_changed() {
            return Ok(before);
        }

        let after = active.update(&txn).await.map_err(map_db_err)?;
        AuditRepository::record(&txn, actor, &after, AuditEntry::updated(&before, &after)).await?;
        txn.commit().await.map_err(map_db_err)?;

        Ok(after)
    }

    /// Deletes a pending or cancelled order with its lines, invoices and
    /// fulfillments.
    ///
    /// # Errors
    ///
    /// Returns `OrderNotDeletable` for validated or invoiced orders.
    pub async fn delete(&self, actor: Actor, id: Uuid) -> DomainResult<()> {
        let txn = self.db.begin().await.map_err(map_db_err)?;
        let order = find_locked(&txn, actor.account_id, id).await?;
        OrderLifecycle::ensure_deletable(order.status.into())?;

        AuditRepository::record(&txn, actor, &order, vec![AuditEntry::deleted(&order)]).await?;
        order.delete(&txn).await.map_err(map_db_err)?;
        txn.commit().await.map_err(map_db_err)?;

        tracing::info!(order_id = %id, "order deleted");
        Ok(())
    }

    /// Appends a line to a pending order.
    ///
    /// # Errors
    ///
    /// Returns `OrderNotEditable` unless the order is pending, `Validation`
    /// for an invalid line.
    pub async fn add_line(
        &self,
        actor: Actor,
        order_id: Uuid,
        input: NewLineInput,
    ) -> DomainResult<OrderWithLines> {
        validate_new_line(&input)?;

        let txn = self.db.begin().await.map_err(map_db_err)?;
        let order = find_locked(&txn, actor.account_id, order_id).await?;
        OrderLifecycle::ensure_editable(order.status.into())?;

        let position = next_position(&txn, order.id).await?;
        insert_line(&txn, order.id, position, input).await?;

        let result = refresh_total(&txn, actor, order).await?;
        txn.commit().await.map_err(map_db_err)?;
        Ok(result)
    }

    /// Changes a line of a pending order.
    ///
    /// # Errors
    ///
    /// Returns `OrderNotEditable` unless the order is pending, `NotFound` for
    /// an unknown line, `Validation` for invalid values.
    pub async fn update_line(
        &self,
        actor: Actor,
        order_id: Uuid,
        line_id: Uuid,
        input: UpdateLineInput,
    ) -> DomainResult<OrderWithLines> {
        let txn = self.db.begin().await.map_err(map_db_err)?;
        let order = find_locked(&txn, actor.account_id, order_id).await?;
        OrderLifecycle::ensure_editable(order.status.into())?;
        let line = find_line(&txn, order.id, line_id).await?;

        let quantity = input.quantity.unwrap_or(line.quantity);
        let unit_price = input.unit_price.unwrap_or(line.unit_price);
        validate_line(quantity, unit_price)?;

        let mut active: order_lines::ActiveModel = line.into();
        if let Some(description) = input.description {
            active.description = Set(required_description(&description)?);
        }
        if let Some(sku) = input.sku {
            active.sku = Set(clean(sku));
        }
        active.quantity = Set(quantity);
        active.unit_price = Set(unit_price);
        active.total_price = Set(line_total(quantity, unit_price)?);
        active.update(&txn).await.map_err(map_db_err)?;

        let result = refresh_total(&txn, actor, order).await?;
        txn.commit().await.map_err(map_db_err)?;
        Ok(result)
    }

    /// Removes a line from a pending order.
    ///
    /// # Errors
    ///
    /// Returns `OrderNotEditable` unless the order is pending, `NotFound` for
    /// an unknown line.
    pub async fn remove_line(
        &self,
        actor: Actor,
        order_id: Uuid,
        line_id: Uuid,
    ) -> DomainResult<OrderWithLines> {
        let txn = self.db.begin().await.map_err(map_db_err)?;
        let order = find_locked(&txn, actor.account_id, order_id).await?;
        OrderLifecycle::ensure_editable(order.status.into())?;

        let line = find_line(&txn, order.id, line_id).await?;
        line.delete(&txn).await.map_err(map_db_err)?;

        let result = refresh_total(&txn, actor, order).await?;
        txn.commit().await.map_err(map_db_err)?;
        Ok(result)
    }

    /// Validates a pending order that has at least one line.
    ///
    /// # Errors
    ///
    /// Returns `EmptyOrder`, `AlreadyCancelled` or `InvalidTransition`.
    pub async fn validate(&self, actor: Actor, id: Uuid) -> DomainResult<orders::Model> {
        let txn = self.db.begin().await.map_err(map_db_err)?;
        let before = find_locked(&txn, actor.account_id, id).await?;

        let line_count = order_lines::Entity::find()
            .filter(order_lines::Column::OrderId.eq(before.id))
            .count(&txn)
            .await
            .map_err(map_db_err)?;
        let line_count = usize::try_from(line_count).unwrap_or(usize::MAX);

        let action = OrderLifecycle::validate(before.status.into(), line_count)?;

        let mut active: orders::ActiveModel = before.clone().into();
        active.status = Set(action.new_status().into());
        active.validated_at = Set(Some(Utc::now().into()));
        let after = active.update(&txn).await.map_err(map_db_err)?;

        AuditRepository::record(&txn, actor, &after, AuditEntry::updated(&before, &after)).await?;
        txn.commit().await.map_err(map_db_err)?;

        tracing::info!(order_id = %id, "order validated");
        Ok(after)
    }
}

/// Loads an order of an account.
pub(crate) async fn find_scoped<C>(conn: &C, account_id: Uuid, id: Uuid) -> DomainResult<orders::Model>
where
    C: ConnectionTrait,
{
    orders::Entity::find_by_id(id)
        .filter(orders::Column::AccountId.eq(account_id))
        .one(conn)
        .await
        .map_err(map_db_err)?
        .ok_or(DomainError::not_found("order", id))
}

/// Loads an order of an account with `FOR UPDATE`.
pub(crate) async fn find_locked<C>(conn: &C, account_id: Uuid, id: Uuid) -> DomainResult<orders::Model>
where
    C: ConnectionTrait,
{
    orders::Entity::find_by_id(id)
        .filter(orders::Column::AccountId.eq(account_id))
        .lock_exclusive()
        .one(conn)
        .await
        .map_err(map_db_err)?
        .ok_or(DomainError::not_found("order", id))
}

async fn load_lines<C>(conn: &C, order_id: Uuid) -> DomainResult<Vec<order_lines::Model>>
where
    C: ConnectionTrait,
{
    order_lines::Entity::find()
        .filter(order_lines::Column::OrderId.eq(order_id))
        .order_by_asc(order_lines::Column::Position)
        .order_by_asc(order_lines::Column::Id)
        .all(conn)
        .await
        .map_err(map_db_err)
}

async fn find_line<C>(conn: &C, order_id: Uuid, line_id: Uuid) -> DomainResult<order_lines::Model>
where
    C: ConnectionTrait,
{
    order_lines::Entity::find_by_id(line_id)
        .filter(order_lines::Column::OrderId.eq(order_id))
        .one(conn)
        .await
        .map_err(map_db_err)?
        .ok_or(DomainError::not_found("order line", line_id))
}

async fn ensure_customer<C>(conn: &C, account_id: Uuid, customer_id: Uuid) -> DomainResult<()>
where
    C: ConnectionTrait,
{
    let exists = customers::Entity::find_by_id(customer_id)
        .filter(customers::Column::AccountId.eq(account_id))
        .count(conn)
        .await
        .map_err(map_db_err)?;
    if exists == 0 {
        return Err(DomainError::not_found("customer", customer_id));
    }
    Ok(())
}

async fn next_position<C>(conn: &C, order_id: Uuid) -> DomainResult<i32>
where
    C: ConnectionTrait,
{
    let last: Option<i32> = order_lines::Entity::find()
        .select_only()
        .column_as(order_lines::Column::Position.max(), "max_position")
        .filter(order_lines::Column::OrderId.eq(order_id))
        .into_tuple::<Option<i32>>()
        .one(conn)
        .await
        .map_err(map_db_err)?
        .flatten();
    Ok(last.map_or(0, |p| p + 1))
}

async fn insert_line<C>(
    conn: &C,
    order_id: Uuid,
    position: i32,
    input: NewLineInput,
) -> DomainResult<order_lines::Model>
where
    C: ConnectionTrait,
{
    let now = Utc::now().into();
    order_lines::ActiveModel {
        id: Set(Uuid::now_v7()),
        order_id: Set(order_id),
        description: Set(required_description(&input.description)?),
        sku: Set(clean(input.sku)),
        quantity: Set(input.quantity),
        unit_price: Set(input.unit_price),
        total_price: Set(line_total(input.quantity, input.unit_price)?),
        position: Set(position),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
    .map_err(map_db_err)
}

/// Recomputes the order total from its lines and audits the change.
async fn refresh_total<C>(
    conn: &C,
    actor: Actor,
    before: orders::Model,
) -> DomainResult<OrderWithLines>
where
    C: ConnectionTrait,
{
    let lines = load_lines(conn, before.id).await?;
    let total = order_total(lines.iter().map(|l| l.total_price))?;

    if total == before.total_amount {
        return Ok(OrderWithLines {
            order: before,
            lines,
        });
    }

    let mut active: orders::ActiveModel = before.clone().into();
    active.total_amount = Set(total);
    let after = active.update(conn).await.map_err(map_db_err)?;
    AuditRepository::record(conn, actor, &after, AuditEntry::updated(&before, &after)).await?;

    Ok(OrderWithLines {
        order: after,
        lines,
    })
}

fn validate_new_line(line: &NewLineInput) -> DomainResult<()> {
    required_description(&line.description)?;
    validate_line(line.quantity, line.unit_price)
}

fn required_description(description: &str) -> DomainResult<String> {
    let description = description.trim();
    if description.is_empty() {
        Err(DomainError::Validation(
            "line description must not be blank".to_string(),
        ))
    } else {
        Ok(description.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_validate_new_line() {
        let line = NewLineInput {
            description: "Widget".to_string(),
            sku: None,
            quantity: 2,
            unit_price: dec!(9.99),
        };
        assert!(validate_new_line(&line).is_ok());

        let blank = NewLineInput {
            description: "  ".to_string(),
            ..line.clone()
        };
        assert!(validate_new_line(&blank).is_err());

        let zero = NewLineInput {
            quantity: 0,
            ..line
        };
        assert!(validate_new_line(&zero).is_err());
    }
}
