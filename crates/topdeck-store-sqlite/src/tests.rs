//! Integration tests for `SqliteMarket` against a scratch database file.
//!
//! Concurrency tests clone the store (the pool is shared) and spawn tasks,
//! so they exercise real contention on the write lock.

use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use tempfile::TempDir;
use topdeck_core::{
  Error,
  event::{EventSize, NewEvent},
  id::{CardId, PlayerId, ProductId, ShopId},
  store::MarketStore,
};

use crate::{PoolConfig, SqliteMarket};

async fn market() -> (SqliteMarket, TempDir) {
  let dir = tempfile::tempdir().expect("temp dir");
  let market = SqliteMarket::open(dir.path().join("market.db"), PoolConfig::default())
    .await
    .expect("open market");
  (market, dir)
}

/// A market seeded with one player, one shop, one card, and two products —
/// a single linked to the card and a booster with no card link.
struct Seed {
  market:  SqliteMarket,
  _dir:    TempDir,
  player:  PlayerId,
  shop:    ShopId,
  card:    CardId,
  single:  ProductId,
  booster: ProductId,
}

async fn seeded() -> Seed {
  let (market, _dir) = market().await;
  let player = market.add_player("Aki", "aki@example.com").await.unwrap();
  let shop = market
    .add_shop("Card Haven", Some("1 Main St"), Some("555-0101"))
    .await
    .unwrap();
  let card = market.add_card("Storm Drake", Some("rare")).await.unwrap();
  let single = market
    .add_product("Storm Drake", "single", Some(card))
    .await
    .unwrap();
  let booster = market
    .add_product("Core Set Booster", "booster", None)
    .await
    .unwrap();
  Seed { market, _dir, player, shop, card, single, booster }
}

fn event_input(shop: ShopId, size: EventSize) -> NewEvent {
  NewEvent {
    name:       "Friday Night Standard".to_string(),
    format:     "standard".to_string(),
    date:       NaiveDate::from_ymd_opt(2026, 9, 4).unwrap(),
    time:       NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
    size,
    round_type: "swiss".to_string(),
    shop_id:    shop,
  }
}

// ─── Inventory ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn restock_creates_storage_row() {
  let s = seeded().await;

  let level = s.market.restock(s.shop, s.single, 10).await.unwrap();
  assert_eq!(level.qty, 10);

  let stored = s.market.storage_level(s.shop, s.single).await.unwrap().unwrap();
  assert_eq!(stored.qty, 10);
}

#[tokio::test]
async fn restock_accumulates() {
  let s = seeded().await;

  s.market.restock(s.shop, s.single, 10).await.unwrap();
  let level = s.market.restock(s.shop, s.single, 5).await.unwrap();
  assert_eq!(level.qty, 15);
}

#[tokio::test]
async fn restock_rejects_nonpositive_qty() {
  let s = seeded().await;

  let err = s.market.restock(s.shop, s.single, 0).await.unwrap_err();
  assert!(matches!(err, Error::InvalidQuantity(0)));

  let err = s.market.restock(s.shop, s.single, -3).await.unwrap_err();
  assert!(matches!(err, Error::InvalidQuantity(-3)));
}

#[tokio::test]
async fn restock_unknown_shop_errors() {
  let s = seeded().await;
  let err = s.market.restock(ShopId(999), s.single, 1).await.unwrap_err();
  assert!(matches!(err, Error::ShopNotFound(ShopId(999))));
}

#[tokio::test]
async fn list_to_shelf_moves_stock_and_sets_price() {
  let s = seeded().await;

  s.market.restock(s.shop, s.single, 10).await.unwrap();
  let listing = s.market.list_to_shelf(s.shop, s.single, 4, 20).await.unwrap();
  assert_eq!(listing.qty, 4);
  assert_eq!(listing.price, 20);

  let stored = s.market.storage_level(s.shop, s.single).await.unwrap().unwrap();
  assert_eq!(stored.qty, 6);
}

#[tokio::test]
async fn list_to_shelf_insufficient_storage_changes_nothing() {
  let s = seeded().await;

  // No storage row at all yet.
  let err = s.market.list_to_shelf(s.shop, s.single, 1, 10).await.unwrap_err();
  assert!(matches!(
    err,
    Error::InsufficientStock { requested: 1, available: 0 }
  ));

  s.market.restock(s.shop, s.single, 3).await.unwrap();
  let err = s.market.list_to_shelf(s.shop, s.single, 5, 10).await.unwrap_err();
  assert!(matches!(
    err,
    Error::InsufficientStock { requested: 5, available: 3 }
  ));

  let stored = s.market.storage_level(s.shop, s.single).await.unwrap().unwrap();
  assert_eq!(stored.qty, 3);
  assert!(s.market.shelf_listing(s.shop, s.single).await.unwrap().is_none());
}

#[tokio::test]
async fn list_to_shelf_adds_qty_and_overwrites_price() {
  let s = seeded().await;

  s.market.restock(s.shop, s.single, 10).await.unwrap();
  s.market.list_to_shelf(s.shop, s.single, 4, 20).await.unwrap();
  let listing = s.market.list_to_shelf(s.shop, s.single, 2, 25).await.unwrap();

  assert_eq!(listing.qty, 6);
  assert_eq!(listing.price, 25);
}

#[tokio::test]
async fn stock_is_conserved_across_restocks_and_listings() {
  let s = seeded().await;

  s.market.restock(s.shop, s.single, 8).await.unwrap();
  s.market.list_to_shelf(s.shop, s.single, 5, 15).await.unwrap();
  s.market.restock(s.shop, s.single, 4).await.unwrap();
  s.market.list_to_shelf(s.shop, s.single, 7, 12).await.unwrap();

  let stored = s.market.storage_level(s.shop, s.single).await.unwrap().unwrap();
  let shelf = s.market.shelf_listing(s.shop, s.single).await.unwrap().unwrap();
  assert_eq!(stored.qty + shelf.qty, 12);
  assert_eq!(stored.qty, 0);
  assert_eq!(shelf.qty, 12);
}

// ─── Purchases ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn purchase_decrements_shelf_and_records_sale() {
  let s = seeded().await;
  s.market.restock(s.shop, s.single, 5).await.unwrap();
  s.market.list_to_shelf(s.shop, s.single, 5, 10).await.unwrap();

  let receipt = s.market.purchase(s.player, s.shop, s.single, 3).await.unwrap();
  assert_eq!(receipt.amount_due, 30);
  assert_eq!(receipt.shelf_remaining, 2);

  let shelf = s.market.shelf_listing(s.shop, s.single).await.unwrap().unwrap();
  assert_eq!(shelf.qty, 2);

  let (sale, lines) =
    s.market.sale_with_lines(receipt.sale_id).await.unwrap().unwrap();
  assert_eq!(sale.buyer_id, s.player);
  assert_eq!(sale.shop_id, s.shop);
  assert_eq!(lines.len(), 1);
  assert_eq!(lines[0].product_id, s.single);
  assert_eq!(lines[0].qty, 3);
  assert_eq!(lines[0].unit_price, 10);

  // The product links to a card, so the buyer is credited.
  let holding = s.market.holding(s.player, s.card).await.unwrap().unwrap();
  assert_eq!(holding.qty, 3);
}

#[tokio::test]
async fn purchase_beyond_shelf_stock_fails_and_changes_nothing() {
  let s = seeded().await;
  s.market.restock(s.shop, s.single, 5).await.unwrap();
  s.market.list_to_shelf(s.shop, s.single, 5, 10).await.unwrap();
  s.market.purchase(s.player, s.shop, s.single, 3).await.unwrap();

  let err = s.market.purchase(s.player, s.shop, s.single, 10).await.unwrap_err();
  assert!(matches!(
    err,
    Error::InsufficientStock { requested: 10, available: 2 }
  ));

  let shelf = s.market.shelf_listing(s.shop, s.single).await.unwrap().unwrap();
  assert_eq!(shelf.qty, 2);
  let holding = s.market.holding(s.player, s.card).await.unwrap().unwrap();
  assert_eq!(holding.qty, 3);
}

#[tokio::test]
async fn purchase_without_card_link_skips_credit() {
  let s = seeded().await;
  s.market.restock(s.shop, s.booster, 6).await.unwrap();
  s.market.list_to_shelf(s.shop, s.booster, 6, 4).await.unwrap();

  let receipt = s.market.purchase(s.player, s.shop, s.booster, 2).await.unwrap();
  assert_eq!(receipt.amount_due, 8);

  assert!(s.market.holding(s.player, s.card).await.unwrap().is_none());
}

#[tokio::test]
async fn purchase_unknown_listing_errors() {
  let s = seeded().await;
  let err = s.market.purchase(s.player, s.shop, s.single, 1).await.unwrap_err();
  assert!(matches!(err, Error::ListingNotFound { .. }));
}

#[tokio::test]
async fn purchase_rejects_nonpositive_qty() {
  let s = seeded().await;
  let err = s.market.purchase(s.player, s.shop, s.single, 0).await.unwrap_err();
  assert!(matches!(err, Error::InvalidQuantity(0)));
}

#[tokio::test]
async fn buying_out_a_listing_keeps_the_zero_row() {
  let s = seeded().await;
  s.market.restock(s.shop, s.booster, 2).await.unwrap();
  s.market.list_to_shelf(s.shop, s.booster, 2, 4).await.unwrap();

  s.market.purchase(s.player, s.shop, s.booster, 2).await.unwrap();

  // Sold out, but the listing row survives at zero quantity.
  let shelf = s.market.shelf_listing(s.shop, s.booster).await.unwrap().unwrap();
  assert_eq!(shelf.qty, 0);
  assert_eq!(shelf.price, 4);
}

#[tokio::test]
async fn concurrent_purchases_never_oversell() {
  let s = seeded().await;
  s.market.restock(s.shop, s.single, 3).await.unwrap();
  s.market.list_to_shelf(s.shop, s.single, 3, 10).await.unwrap();

  let mut handles = Vec::new();
  for _ in 0..8 {
    let market = s.market.clone();
    let (player, shop, product) = (s.player, s.shop, s.single);
    handles.push(tokio::spawn(async move {
      market.purchase(player, shop, product, 1).await
    }));
  }

  let mut ok = 0;
  for handle in handles {
    match handle.await.unwrap() {
      Ok(_) => ok += 1,
      Err(Error::InsufficientStock { .. }) => {}
      Err(other) => panic!("unexpected failure: {other:?}"),
    }
  }
  assert_eq!(ok, 3);

  let shelf = s.market.shelf_listing(s.shop, s.single).await.unwrap().unwrap();
  assert_eq!(shelf.qty, 0);
  let holding = s.market.holding(s.player, s.card).await.unwrap().unwrap();
  assert_eq!(holding.qty, 3);
}

// ─── Collection ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn credit_creates_and_accumulates() {
  let s = seeded().await;

  let holding = s.market.credit_card(s.player, s.card, 2).await.unwrap();
  assert_eq!(holding.qty, 2);

  let holding = s.market.credit_card(s.player, s.card, 3).await.unwrap();
  assert_eq!(holding.qty, 5);
}

#[tokio::test]
async fn debit_decrements() {
  let s = seeded().await;
  s.market.credit_card(s.player, s.card, 5).await.unwrap();

  let remaining = s.market.debit_card(s.player, s.card, 2).await.unwrap();
  assert_eq!(remaining, 3);
  let holding = s.market.holding(s.player, s.card).await.unwrap().unwrap();
  assert_eq!(holding.qty, 3);
}

#[tokio::test]
async fn debit_to_zero_deletes_the_row() {
  let s = seeded().await;
  s.market.credit_card(s.player, s.card, 4).await.unwrap();

  let remaining = s.market.debit_card(s.player, s.card, 4).await.unwrap();
  assert_eq!(remaining, 0);
  assert!(s.market.holding(s.player, s.card).await.unwrap().is_none());
}

#[tokio::test]
async fn debit_beyond_holding_errors() {
  let s = seeded().await;
  s.market.credit_card(s.player, s.card, 1).await.unwrap();

  let err = s.market.debit_card(s.player, s.card, 2).await.unwrap_err();
  assert!(matches!(
    err,
    Error::InsufficientQuantity { requested: 2, available: 1 }
  ));

  // An absent row is zero, not an error class of its own.
  let other = s.market.add_card("Mire Troll", None).await.unwrap();
  let err = s.market.debit_card(s.player, other, 1).await.unwrap_err();
  assert!(matches!(
    err,
    Error::InsufficientQuantity { requested: 1, available: 0 }
  ));
}

#[tokio::test]
async fn credit_unknown_card_errors() {
  let s = seeded().await;
  let err = s.market.credit_card(s.player, CardId(999), 1).await.unwrap_err();
  assert!(matches!(err, Error::CardNotFound(CardId(999))));
}

// ─── Decks ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_deck_sets_owner() {
  let s = seeded().await;

  let deck = s.market.create_deck(s.player, "Mono Blue".to_string()).await.unwrap();
  assert_eq!(deck.owner_id, s.player);
  assert_eq!(deck.name, "Mono Blue");

  assert_eq!(s.market.deck_owner(deck.deck_id).await.unwrap(), s.player);
}

#[tokio::test]
async fn set_requirement_overwrites_rather_than_adds() {
  let s = seeded().await;
  let deck = s.market.create_deck(s.player, "Tempo".to_string()).await.unwrap();

  s.market.set_deck_requirement(deck.deck_id, s.card, 4).await.unwrap();
  s.market.set_deck_requirement(deck.deck_id, s.card, 2).await.unwrap();

  let missing = s.market.missing_cards(s.player, deck.deck_id).await.unwrap();
  assert_eq!(missing.len(), 1);
  assert_eq!(missing[0].shortfall, 2);
}

#[tokio::test]
async fn set_requirement_zero_deletes_and_is_idempotent() {
  let s = seeded().await;
  let deck = s.market.create_deck(s.player, "Tempo".to_string()).await.unwrap();

  s.market.set_deck_requirement(deck.deck_id, s.card, 4).await.unwrap();
  s.market.set_deck_requirement(deck.deck_id, s.card, 0).await.unwrap();
  // Deleting an absent requirement is a no-op, not an error.
  s.market.set_deck_requirement(deck.deck_id, s.card, 0).await.unwrap();

  assert!(s.market.missing_cards(s.player, deck.deck_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_cards_orders_by_shortfall_then_card_id() {
  let s = seeded().await;
  let deck = s.market.create_deck(s.player, "Brew".to_string()).await.unwrap();

  let a = s.card;
  let b = s.market.add_card("Bog Wurm", None).await.unwrap();
  let c = s.market.add_card("Cinder Fox", None).await.unwrap();
  let d = s.market.add_card("Dune Strider", None).await.unwrap();

  s.market.set_deck_requirement(deck.deck_id, a, 4).await.unwrap();
  s.market.set_deck_requirement(deck.deck_id, b, 2).await.unwrap();
  s.market.set_deck_requirement(deck.deck_id, c, 6).await.unwrap();
  s.market.set_deck_requirement(deck.deck_id, d, 3).await.unwrap();

  s.market.credit_card(s.player, a, 1).await.unwrap(); // shortfall 3
  s.market.credit_card(s.player, c, 6).await.unwrap(); // fully held

  let missing = s.market.missing_cards(s.player, deck.deck_id).await.unwrap();
  let got: Vec<(CardId, i64)> =
    missing.iter().map(|m| (m.card_id, m.shortfall)).collect();
  // 3/3 tie between a and d breaks on the lower card id.
  assert_eq!(got, vec![(a, 3), (d, 3), (b, 2)]);
}

#[tokio::test]
async fn missing_cards_unknown_deck_errors() {
  let s = seeded().await;
  let err = s
    .market
    .missing_cards(s.player, topdeck_core::id::DeckId(999))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::DeckNotFound(_)));
}

// ─── Events ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_event_roundtrip() {
  let s = seeded().await;

  let event = s
    .market
    .create_event(event_input(s.shop, EventSize::Regional))
    .await
    .unwrap();

  let fetched = s.market.event(event.event_id).await.unwrap();
  assert_eq!(fetched.name, "Friday Night Standard");
  assert_eq!(fetched.size, EventSize::Regional);
  assert_eq!(fetched.size.capacity(), 32);
  assert_eq!(fetched.shop_id, s.shop);
  assert_eq!(fetched.date, NaiveDate::from_ymd_opt(2026, 9, 4).unwrap());
}

#[tokio::test]
async fn join_registers_player() {
  let s = seeded().await;
  let deck = s.market.create_deck(s.player, "Tempo".to_string()).await.unwrap();
  let event =
    s.market.create_event(event_input(s.shop, EventSize::Small)).await.unwrap();

  let reg =
    s.market.join_event(s.player, event.event_id, deck.deck_id).await.unwrap();
  assert_eq!(reg.player_id, s.player);
  assert_eq!(reg.deck_id, deck.deck_id);

  assert_eq!(s.market.registration_count(event.event_id).await.unwrap(), 1);
}

#[tokio::test]
async fn duplicate_join_errors() {
  let s = seeded().await;
  let deck = s.market.create_deck(s.player, "Tempo".to_string()).await.unwrap();
  let event =
    s.market.create_event(event_input(s.shop, EventSize::Small)).await.unwrap();

  s.market.join_event(s.player, event.event_id, deck.deck_id).await.unwrap();
  let err = s
    .market
    .join_event(s.player, event.event_id, deck.deck_id)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::DuplicateRegistration { .. }));
  assert_eq!(s.market.registration_count(event.event_id).await.unwrap(), 1);
}

#[tokio::test]
async fn join_unknown_event_errors() {
  let s = seeded().await;
  let deck = s.market.create_deck(s.player, "Tempo".to_string()).await.unwrap();
  let err = s
    .market
    .join_event(s.player, topdeck_core::id::EventId(999), deck.deck_id)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::EventNotFound(_)));
}

async fn players(market: &SqliteMarket, n: usize) -> Vec<PlayerId> {
  let mut out = Vec::with_capacity(n);
  for i in 0..n {
    let email = format!("p{i}@example.com");
    out.push(market.add_player(&format!("Player {i}"), &email).await.unwrap());
  }
  out
}

#[tokio::test]
async fn capacity_is_enforced_sequentially() {
  let s = seeded().await;
  let deck = s.market.create_deck(s.player, "Tempo".to_string()).await.unwrap();
  let event =
    s.market.create_event(event_input(s.shop, EventSize::Small)).await.unwrap();

  let entrants = players(&s.market, 9).await;
  for player in &entrants[..8] {
    s.market.join_event(*player, event.event_id, deck.deck_id).await.unwrap();
  }

  let err = s
    .market
    .join_event(entrants[8], event.event_id, deck.deck_id)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::CapacityExceeded { capacity: 8 }));
  assert_eq!(s.market.registration_count(event.event_id).await.unwrap(), 8);
}

#[tokio::test]
async fn concurrent_joins_never_exceed_capacity() {
  let s = seeded().await;
  let deck = s.market.create_deck(s.player, "Tempo".to_string()).await.unwrap();
  let event =
    s.market.create_event(event_input(s.shop, EventSize::Small)).await.unwrap();

  let entrants = players(&s.market, 12).await;
  let mut handles = Vec::new();
  for player in entrants {
    let market = s.market.clone();
    let (event_id, deck_id) = (event.event_id, deck.deck_id);
    handles.push(tokio::spawn(async move {
      market.join_event(player, event_id, deck_id).await
    }));
  }

  let mut ok = 0;
  for handle in handles {
    match handle.await.unwrap() {
      Ok(_) => ok += 1,
      Err(Error::CapacityExceeded { capacity: 8 }) => {}
      Err(other) => panic!("unexpected failure: {other:?}"),
    }
  }
  assert_eq!(ok, 8);
  assert_eq!(s.market.registration_count(event.event_id).await.unwrap(), 8);
}

#[tokio::test]
async fn race_for_the_last_slot_admits_exactly_one() {
  let s = seeded().await;
  let deck = s.market.create_deck(s.player, "Tempo".to_string()).await.unwrap();
  let event =
    s.market.create_event(event_input(s.shop, EventSize::Small)).await.unwrap();

  let entrants = players(&s.market, 9).await;
  for player in &entrants[..7] {
    s.market.join_event(*player, event.event_id, deck.deck_id).await.unwrap();
  }

  let mut handles = Vec::new();
  for player in &entrants[7..] {
    let market = s.market.clone();
    let (player, event_id, deck_id) = (*player, event.event_id, deck.deck_id);
    handles.push(tokio::spawn(async move {
      market.join_event(player, event_id, deck_id).await
    }));
  }

  let mut ok = 0;
  let mut full = 0;
  for handle in handles {
    match handle.await.unwrap() {
      Ok(_) => ok += 1,
      Err(Error::CapacityExceeded { .. }) => full += 1,
      Err(other) => panic!("unexpected failure: {other:?}"),
    }
  }
  assert_eq!((ok, full), (1, 1));
  assert_eq!(s.market.registration_count(event.event_id).await.unwrap(), 8);
}

#[tokio::test]
async fn withdraw_frees_a_slot() {
  let s = seeded().await;
  let deck = s.market.create_deck(s.player, "Tempo".to_string()).await.unwrap();
  let event =
    s.market.create_event(event_input(s.shop, EventSize::Small)).await.unwrap();

  let entrants = players(&s.market, 9).await;
  for player in &entrants[..8] {
    s.market.join_event(*player, event.event_id, deck.deck_id).await.unwrap();
  }

  s.market.withdraw_from_event(entrants[0], event.event_id).await.unwrap();
  assert_eq!(s.market.registration_count(event.event_id).await.unwrap(), 7);

  s.market.join_event(entrants[8], event.event_id, deck.deck_id).await.unwrap();
  assert_eq!(s.market.registration_count(event.event_id).await.unwrap(), 8);
}

#[tokio::test]
async fn withdraw_is_idempotent_but_requires_the_event() {
  let s = seeded().await;
  let event =
    s.market.create_event(event_input(s.shop, EventSize::Small)).await.unwrap();

  // Never registered; still fine.
  s.market.withdraw_from_event(s.player, event.event_id).await.unwrap();

  let err = s
    .market
    .withdraw_from_event(s.player, topdeck_core::id::EventId(999))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::EventNotFound(_)));
}

// ─── Pool ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn pool_exhaustion_surfaces_typed_failure() {
  let dir = tempfile::tempdir().expect("temp dir");
  let config = PoolConfig {
    min_connections: 1,
    max_connections: 1,
    acquire_timeout: Duration::from_millis(50),
    busy_timeout:    Duration::from_millis(100),
  };
  let market = SqliteMarket::open(dir.path().join("market.db"), config)
    .await
    .expect("open market");

  // Occupy the only connection with a slow unit of work.
  let busy = market.clone();
  let hold = tokio::spawn(async move {
    busy
      .pool()
      .transaction(|_tx| {
        std::thread::sleep(Duration::from_millis(400));
        Ok(())
      })
      .await
  });

  tokio::time::sleep(Duration::from_millis(100)).await;
  let err = market.add_card("Stalled", None).await.unwrap_err();
  assert!(matches!(err, Error::PoolExhausted));
  assert!(err.is_retryable());

  hold.await.unwrap().unwrap();
}

#[tokio::test]
async fn abandoned_work_rolls_back_instead_of_committing() {
  let s = seeded().await;

  let busy = s.market.clone();
  let (shop, product) = (s.shop, s.single);
  let handle = tokio::spawn(async move {
    busy
      .pool()
      .transaction(move |tx| {
        tx.execute(
          "INSERT INTO shop_storage (shop_id, product_id, qty) VALUES (?1, ?2, 7)",
          rusqlite::params![shop.0, product.0],
        )
        .unwrap();
        std::thread::sleep(Duration::from_millis(300));
        Ok(())
      })
      .await
  });

  // Drop the caller while its work is still running on the worker thread.
  tokio::time::sleep(Duration::from_millis(100)).await;
  handle.abort();
  assert!(handle.await.unwrap_err().is_cancelled());

  // Let the worker thread reach its commit point; it must roll back.
  tokio::time::sleep(Duration::from_millis(400)).await;
  assert!(s.market.storage_level(shop, product).await.unwrap().is_none());
}

#[tokio::test]
async fn close_during_in_flight_work_completes_it() {
  let dir = tempfile::tempdir().expect("temp dir");
  let market = SqliteMarket::open(dir.path().join("market.db"), PoolConfig::default())
    .await
    .expect("open market");

  let busy = market.clone();
  let hold = tokio::spawn(async move {
    busy
      .pool()
      .transaction(|_tx| {
        std::thread::sleep(Duration::from_millis(200));
        Ok(())
      })
      .await
  });

  tokio::time::sleep(Duration::from_millis(50)).await;
  market.close().await;

  // Work already holding a connection finishes normally...
  hold.await.unwrap().unwrap();
  // ...but nothing new gets in.
  let err = market.add_card("Late", None).await.unwrap_err();
  assert!(matches!(err, Error::PoolExhausted));
}
