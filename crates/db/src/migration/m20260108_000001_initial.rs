//! Initial database migration.
//!
//! Creates the enum types, tables, indexes and `updated_at` triggers.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: TENANTS & CUSTOMERS
        // ============================================================
        db.execute_unprepared(ACCOUNTS_SQL).await?;
        db.execute_unprepared(CUSTOMERS_SQL).await?;

        // ============================================================
        // PART 3: ORDERS & INVOICES
        // ============================================================
        db.execute_unprepared(ORDERS_SQL).await?;
        db.execute_unprepared(ORDER_LINES_SQL).await?;
        db.execute_unprepared(INVOICES_SQL).await?;

        // ============================================================
        // PART 4: FULFILLMENT
        // ============================================================
        db.execute_unprepared(FULFILLMENT_SERVICES_SQL).await?;
        db.execute_unprepared(FULFILLMENTS_SQL).await?;

        // ============================================================
        // PART 5: AUDIT TRAIL
        // ============================================================
        db.execute_unprepared(RESOURCES_SQL).await?;
        db.execute_unprepared(ACCOUNT_EVENTS_SQL).await?;

        // ============================================================
        // PART 6: TRIGGERS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
CREATE TYPE order_status AS ENUM ('pending', 'validated', 'invoiced', 'cancelled');

CREATE TYPE invoice_status AS ENUM ('draft', 'sent', 'paid', 'cancelled');

CREATE TYPE fulfillment_status AS ENUM (
    'pending',
    'processing',
    'shipped',
    'delivered',
    'cancelled'
);

CREATE TYPE event_action AS ENUM ('created', 'updated', 'deleted');
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id                  UUID PRIMARY KEY,
    name                VARCHAR(255) NOT NULL,
    slug                VARCHAR(100) NOT NULL UNIQUE,
    currency            VARCHAR(3) NOT NULL DEFAULT 'EUR',
    default_tax_rate    NUMERIC(5, 4) NOT NULL DEFAULT 0.2000,
    invoice_prefix      VARCHAR(20) NOT NULL DEFAULT 'INV',
    next_order_number   BIGINT NOT NULL DEFAULT 1,
    next_invoice_number BIGINT NOT NULL DEFAULT 1,
    created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_accounts_tax_rate CHECK (default_tax_rate BETWEEN 0 AND 1),
    CONSTRAINT chk_accounts_sequences CHECK (next_order_number > 0 AND next_invoice_number > 0)
);
";

const CUSTOMERS_SQL: &str = r"
CREATE TABLE customers (
    id            UUID PRIMARY KEY,
    account_id    UUID NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    first_name    VARCHAR(100) NOT NULL DEFAULT '',
    last_name     VARCHAR(100) NOT NULL DEFAULT '',
    email         VARCHAR(255) NOT NULL,
    phone         VARCHAR(50),
    company_name  VARCHAR(255),
    address_line1 VARCHAR(255),
    address_line2 VARCHAR(255),
    postal_code   VARCHAR(20),
    city          VARCHAR(100),
    country       VARCHAR(2),
    created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at    TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_customers_account_email UNIQUE (account_id, email),
    CONSTRAINT chk_customers_email_lower CHECK (email = LOWER(email)),
    CONSTRAINT chk_customers_name CHECK (first_name <> '' OR last_name <> '')
);

CREATE INDEX idx_customers_account ON customers(account_id, last_name, first_name);
";

const ORDERS_SQL: &str = r"
CREATE TABLE orders (
    id                  UUID PRIMARY KEY,
    account_id          UUID NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    customer_id         UUID REFERENCES customers(id) ON DELETE SET NULL,
    reference           VARCHAR(20) NOT NULL,
    status              order_status NOT NULL DEFAULT 'pending',
    currency            VARCHAR(3) NOT NULL,
    total_amount        NUMERIC(14, 2) NOT NULL DEFAULT 0,
    notes               TEXT,
    cancellation_reason TEXT,
    validated_at        TIMESTAMPTZ,
    invoiced_at         TIMESTAMPTZ,
    cancelled_at        TIMESTAMPTZ,
    created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_orders_account_reference UNIQUE (account_id, reference),
    CONSTRAINT chk_orders_total CHECK (total_amount >= 0)
);

CREATE INDEX idx_orders_account_status ON orders(account_id, status);
CREATE INDEX idx_orders_customer ON orders(customer_id);
CREATE INDEX idx_orders_created ON orders(account_id, created_at DESC);
";

const ORDER_LINES_SQL: &str = r"
CREATE TABLE order_lines (
    id          UUID PRIMARY KEY,
    order_id    UUID NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
    description VARCHAR(500) NOT NULL,
    sku         VARCHAR(100),
    quantity    INTEGER NOT NULL,
    unit_price  NUMERIC(14, 2) NOT NULL,
    total_price NUMERIC(14, 2) NOT NULL,
    position    INTEGER NOT NULL DEFAULT 0,
    created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_order_lines_quantity CHECK (quantity > 0),
    CONSTRAINT chk_order_lines_price CHECK (unit_price >= 0)
);

CREATE INDEX idx_order_lines_order ON order_lines(order_id, position);
";

const INVOICES_SQL: &str = r"
CREATE TABLE invoices (
    id           UUID PRIMARY KEY,
    account_id   UUID NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    order_id     UUID NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
    number       VARCHAR(50) NOT NULL,
    status       invoice_status NOT NULL DEFAULT 'draft',
    currency     VARCHAR(3) NOT NULL,
    amount       NUMERIC(14, 2) NOT NULL,
    tax_rate     NUMERIC(5, 4) NOT NULL,
    tax_amount   NUMERIC(14, 2) NOT NULL,
    total_amount NUMERIC(14, 2) NOT NULL,
    issued_on    DATE NOT NULL,
    due_on       DATE NOT NULL,
    sent_at      TIMESTAMPTZ,
    paid_at      TIMESTAMPTZ,
    cancelled_at TIMESTAMPTZ,
    created_at   TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at   TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_invoices_account_number UNIQUE (account_id, number),
    CONSTRAINT chk_invoices_total CHECK (total_amount = amount + tax_amount),
    CONSTRAINT chk_invoices_tax_rate CHECK (tax_rate BETWEEN 0 AND 1),
    CONSTRAINT chk_invoices_due CHECK (due_on >= issued_on)
);

-- At most one open (not cancelled) invoice per order
CREATE UNIQUE INDEX uq_invoices_open_order ON invoices(order_id)
    WHERE status <> 'cancelled';

CREATE INDEX idx_invoices_account_status ON invoices(account_id, status);
CREATE INDEX idx_invoices_issued ON invoices(account_id, issued_on);
";

const FULFILLMENT_SERVICES_SQL: &str = r"
CREATE TABLE fulfillment_services (
    id                    UUID PRIMARY KEY,
    account_id            UUID NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    name                  VARCHAR(100) NOT NULL,
    carrier               VARCHAR(100),
    tracking_url_template VARCHAR(500),
    active                BOOLEAN NOT NULL DEFAULT TRUE,
    created_at            TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at            TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_fulfillment_services_account_name UNIQUE (account_id, name),
    CONSTRAINT chk_fulfillment_services_template CHECK (
        tracking_url_template IS NULL OR tracking_url_template LIKE '%{tracking_number}%'
    )
);
";

const FULFILLMENTS_SQL: &str = r"
CREATE TABLE fulfillments (
    id                     UUID PRIMARY KEY,
    account_id             UUID NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    order_id               UUID NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
    fulfillment_service_id UUID REFERENCES fulfillment_services(id) ON DELETE SET NULL,
    status                 fulfillment_status NOT NULL DEFAULT 'pending',
    carrier                VARCHAR(100),
    tracking_number        VARCHAR(100),
    tracking_url           VARCHAR(500),
    shipped_at             TIMESTAMPTZ,
    delivered_at           TIMESTAMPTZ,
    cancelled_at           TIMESTAMPTZ,
    created_at             TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at             TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_fulfillments_order ON fulfillments(order_id);
CREATE INDEX idx_fulfillments_account_status ON fulfillments(account_id, status);
";

const RESOURCES_SQL: &str = r"
CREATE TABLE resources (
    id            UUID PRIMARY KEY,
    account_id    UUID NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    resource_type VARCHAR(50) NOT NULL,
    resource_id   UUID NOT NULL,
    label         VARCHAR(255) NOT NULL,
    created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_resources_type_id UNIQUE (resource_type, resource_id)
);
";

const ACCOUNT_EVENTS_SQL: &str = r"
CREATE TABLE account_events (
    id           UUID PRIMARY KEY,
    account_id   UUID NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    resource_ref UUID NOT NULL REFERENCES resources(id) ON DELETE CASCADE,
    author_id    UUID,
    action       event_action NOT NULL,
    field        VARCHAR(100),
    old_value    TEXT,
    new_value    TEXT,
    message      TEXT NOT NULL,
    created_at   TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_account_events_account ON account_events(account_id, created_at DESC);
CREATE INDEX idx_account_events_resource ON account_events(resource_ref);
";

const TRIGGERS_SQL: &str = r"
CREATE OR REPLACE FUNCTION set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = NOW();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_accounts_updated_at BEFORE UPDATE ON accounts
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_customers_updated_at BEFORE UPDATE ON customers
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_orders_updated_at BEFORE UPDATE ON orders
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_order_lines_updated_at BEFORE UPDATE ON order_lines
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_invoices_updated_at BEFORE UPDATE ON invoices
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_fulfillment_services_updated_at BEFORE UPDATE ON fulfillment_services
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_fulfillments_updated_at BEFORE UPDATE ON fulfillments
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

-- Audit rows are append-only
CREATE OR REPLACE FUNCTION prevent_event_mutation()
RETURNS TRIGGER AS $$
BEGIN
    RAISE EXCEPTION 'account_events are append-only';
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_account_events_immutable BEFORE UPDATE ON account_events
    FOR EACH ROW EXECUTE FUNCTION prevent_event_mutation();
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS account_events CASCADE;
DROP TABLE IF EXISTS resources CASCADE;
DROP TABLE IF EXISTS fulfillments CASCADE;
DROP TABLE IF EXISTS fulfillment_services CASCADE;
DROP TABLE IF EXISTS invoices CASCADE;
DROP TABLE IF EXISTS order_lines CASCADE;
DROP TABLE IF EXISTS orders CASCADE;
DROP TABLE IF EXISTS customers CASCADE;
DROP TABLE IF EXISTS accounts CASCADE;

DROP FUNCTION IF EXISTS prevent_event_mutation() CASCADE;
DROP FUNCTION IF EXISTS set_updated_at() CASCADE;

DROP TYPE IF EXISTS event_action;
DROP TYPE IF EXISTS fulfillment_status;
DROP TYPE IF EXISTS invoice_status;
DROP TYPE IF EXISTS order_status;
";
