//! PostgreSQL schema for the ledger and saga state.
//!
//! Applied idempotently at startup and by the test harness. Money columns
//! are NUMERIC, FSM state columns are SMALLINT (codes defined by the state
//! enums), timestamps are TIMESTAMPTZ.

pub const CREATE_CUSTOMERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS customers_tb (
    customer_id     BIGINT PRIMARY KEY,
    pix_key         TEXT UNIQUE,
    spread_multiplier NUMERIC NOT NULL DEFAULT 1,
    affiliate_customer_id BIGINT,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

pub const CREATE_ACCOUNTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS accounts_tb (
    account_id      BIGSERIAL PRIMARY KEY,
    customer_id     BIGINT NOT NULL UNIQUE,
    currency        TEXT NOT NULL DEFAULT 'BRL',
    balance         NUMERIC NOT NULL DEFAULT 0 CHECK (balance >= 0),
    blocked_amount  NUMERIC NOT NULL DEFAULT 0 CHECK (blocked_amount >= 0 AND blocked_amount <= balance),
    version         BIGINT NOT NULL DEFAULT 0,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

pub const CREATE_TRANSACTIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS transactions_tb (
    tx_id           BIGSERIAL PRIMARY KEY,
    account_id      BIGINT NOT NULL REFERENCES accounts_tb(account_id),
    tx_type         SMALLINT NOT NULL,
    amount          NUMERIC NOT NULL,
    balance_before  NUMERIC NOT NULL,
    balance_after   NUMERIC NOT NULL,
    status          SMALLINT NOT NULL,
    reference       TEXT NOT NULL UNIQUE,
    external_id     TEXT UNIQUE,
    related_tx_id   BIGINT REFERENCES transactions_tb(tx_id),
    metadata        JSONB,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

pub const CREATE_CONVERSIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS conversions_tb (
    conversion_id   TEXT PRIMARY KEY,
    customer_id     BIGINT NOT NULL,
    side            SMALLINT NOT NULL,
    state           SMALLINT NOT NULL,
    network         SMALLINT NOT NULL,
    target_wallet_id BIGINT,
    brl_charged     NUMERIC,
    brl_exchanged   NUMERIC,
    brl_from_exchange NUMERIC,
    spread_brl      NUMERIC,
    usdt_expected   NUMERIC,
    usdt_received   NUMERIC,
    usdt_purchased  NUMERIC,
    usdt_withdrawn  NUMERIC,
    exchange_trading_fee NUMERIC,
    exchange_withdraw_fee NUMERIC,
    affiliate_commission NUMERIC,
    gross_profit    NUMERIC,
    net_profit      NUMERIC,
    bank_end_to_end_id TEXT,
    exchange_order_id  TEXT,
    exchange_withdrawal_id TEXT,
    exchange_deposit_id TEXT UNIQUE,
    chain_tx_hash   TEXT,
    failure_stage   TEXT,
    error_message   TEXT,
    metadata        JSONB,
    retry_count     INT NOT NULL DEFAULT 0,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

pub const CREATE_PAYOUTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS payouts_tb (
    payout_id       BIGSERIAL PRIMARY KEY,
    customer_id     BIGINT NOT NULL,
    amount          NUMERIC NOT NULL,
    pix_key         TEXT NOT NULL,
    request_id      TEXT NOT NULL UNIQUE,
    debit_tx_id     BIGINT NOT NULL REFERENCES transactions_tb(tx_id),
    end_to_end_id   TEXT UNIQUE,
    state           SMALLINT NOT NULL,
    error_message   TEXT,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

pub const CREATE_WALLETS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS wallets_tb (
    wallet_id       BIGSERIAL PRIMARY KEY,
    customer_id     BIGINT NOT NULL,
    network         SMALLINT NOT NULL,
    address         TEXT NOT NULL,
    private_key     TEXT,
    is_main         BOOLEAN NOT NULL DEFAULT FALSE,
    exchange_whitelisted BOOLEAN NOT NULL DEFAULT FALSE,
    cached_balance  NUMERIC,
    balance_cached_at TIMESTAMPTZ,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (customer_id, network, address)
)
"#;

pub const CREATE_ORPHAN_DEPOSITS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS orphan_deposits_tb (
    deposit_id      TEXT PRIMARY KEY,
    amount          NUMERIC NOT NULL,
    chain           TEXT NOT NULL,
    tx_hash         TEXT,
    deposited_at    TIMESTAMPTZ NOT NULL,
    flagged_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_transactions_account ON transactions_tb (account_id, created_at)",
    "CREATE INDEX IF NOT EXISTS idx_conversions_state ON conversions_tb (state, updated_at)",
    "CREATE INDEX IF NOT EXISTS idx_conversions_customer ON conversions_tb (customer_id, created_at)",
    "CREATE INDEX IF NOT EXISTS idx_payouts_state ON payouts_tb (state, updated_at)",
    "CREATE INDEX IF NOT EXISTS idx_wallets_customer ON wallets_tb (customer_id, network)",
];

/// All table DDL in dependency order.
pub const ALL_TABLES: &[&str] = &[
    CREATE_CUSTOMERS_TABLE,
    CREATE_ACCOUNTS_TABLE,
    CREATE_TRANSACTIONS_TABLE,
    CREATE_CONVERSIONS_TABLE,
    CREATE_PAYOUTS_TABLE,
    CREATE_WALLETS_TABLE,
    CREATE_ORPHAN_DEPOSITS_TABLE,
];
