//! SQL schema for the Topdeck SQLite store.
//!
//! Executed once at pool startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS players (
    player_id INTEGER PRIMARY KEY,
    name      TEXT NOT NULL,
    email     TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS shops (
    shop_id INTEGER PRIMARY KEY,
    name    TEXT NOT NULL UNIQUE,
    address TEXT,
    phone   TEXT
);

CREATE TABLE IF NOT EXISTS cards (
    card_id INTEGER PRIMARY KEY,
    name    TEXT NOT NULL,
    rarity  TEXT
);

CREATE TABLE IF NOT EXISTS products (
    product_id INTEGER PRIMARY KEY,
    name       TEXT NOT NULL,
    kind       TEXT NOT NULL,            -- 'single' | 'booster' | 'accessory'
    card_id    INTEGER REFERENCES cards(card_id)
);

-- Two-stage stock, warehouse side. Rows are created on first restock and
-- kept once the quantity reaches zero.
CREATE TABLE IF NOT EXISTS shop_storage (
    shop_id    INTEGER NOT NULL REFERENCES shops(shop_id),
    product_id INTEGER NOT NULL REFERENCES products(product_id),
    qty        INTEGER NOT NULL CHECK (qty >= 0),
    PRIMARY KEY (shop_id, product_id)
);

-- Two-stage stock, public side: what buyers see, with a price.
CREATE TABLE IF NOT EXISTS shop_shelf (
    shop_id    INTEGER NOT NULL REFERENCES shops(shop_id),
    product_id INTEGER NOT NULL REFERENCES products(product_id),
    qty        INTEGER NOT NULL CHECK (qty >= 0),
    price      INTEGER NOT NULL CHECK (price > 0),
    PRIMARY KEY (shop_id, product_id)
);

-- Sales are strictly append-only.
-- No UPDATE or DELETE is ever issued against these two tables.
CREATE TABLE IF NOT EXISTS sales (
    sale_id     INTEGER PRIMARY KEY,
    occurred_at TEXT NOT NULL,           -- RFC 3339 UTC
    player_id   INTEGER NOT NULL REFERENCES players(player_id),
    shop_id     INTEGER NOT NULL REFERENCES shops(shop_id)
);

CREATE TABLE IF NOT EXISTS sale_lines (
    sale_id    INTEGER NOT NULL REFERENCES sales(sale_id),
    product_id INTEGER NOT NULL REFERENCES products(product_id),
    qty        INTEGER NOT NULL CHECK (qty > 0),
    unit_price INTEGER NOT NULL CHECK (unit_price > 0),
    PRIMARY KEY (sale_id, product_id)
);

-- Row absent means zero; debiting to zero deletes the row.
CREATE TABLE IF NOT EXISTS card_holdings (
    player_id INTEGER NOT NULL REFERENCES players(player_id),
    card_id   INTEGER NOT NULL REFERENCES cards(card_id),
    qty       INTEGER NOT NULL CHECK (qty > 0),
    PRIMARY KEY (player_id, card_id)
);

CREATE TABLE IF NOT EXISTS decks (
    deck_id INTEGER PRIMARY KEY,
    name    TEXT NOT NULL
);

-- A deck has exactly one owning player.
CREATE TABLE IF NOT EXISTS deck_ownership (
    deck_id   INTEGER PRIMARY KEY REFERENCES decks(deck_id),
    player_id INTEGER NOT NULL REFERENCES players(player_id)
);

-- Same zero-row rule as card_holdings.
CREATE TABLE IF NOT EXISTS deck_requirements (
    deck_id INTEGER NOT NULL REFERENCES decks(deck_id),
    card_id INTEGER NOT NULL REFERENCES cards(card_id),
    qty     INTEGER NOT NULL CHECK (qty > 0),
    PRIMARY KEY (deck_id, card_id)
);

CREATE TABLE IF NOT EXISTS events (
    event_id   INTEGER PRIMARY KEY,
    name       TEXT NOT NULL,
    format     TEXT NOT NULL,
    date       TEXT NOT NULL,            -- ISO 8601 date
    time       TEXT NOT NULL,            -- HH:MM:SS
    size       TEXT NOT NULL,            -- 'small' | 'local' | 'regional' | 'major'
    round_type TEXT NOT NULL,
    shop_id    INTEGER NOT NULL REFERENCES shops(shop_id)
);

-- The (player, event) primary key backs duplicate-registration detection.
CREATE TABLE IF NOT EXISTS event_registrations (
    player_id     INTEGER NOT NULL REFERENCES players(player_id),
    event_id      INTEGER NOT NULL REFERENCES events(event_id),
    deck_id       INTEGER NOT NULL REFERENCES decks(deck_id),
    registered_at TEXT NOT NULL,
    PRIMARY KEY (player_id, event_id)
);

CREATE INDEX IF NOT EXISTS sale_lines_product_idx     ON sale_lines(product_id);
CREATE INDEX IF NOT EXISTS registrations_event_idx    ON event_registrations(event_id);
CREATE INDEX IF NOT EXISTS deck_requirements_card_idx ON deck_requirements(card_id);

PRAGMA user_version = 1;
";
