//! The purchase engine: shelf stock → sale record → buyer credit, atomically.
//!
//! The whole flow runs inside one immediate transaction, so the shelf read
//! here is stable against concurrent purchases of the same listing: the
//! second buyer sees the first buyer's committed decrement before its own
//! sufficiency check. A partial purchase (stock gone but no sale, or a sale
//! with no credit) is never observable.

use chrono::Utc;
use rusqlite::Transaction;
use topdeck_core::{
  Error, Result,
  id::{PlayerId, ProductId, SaleId, ShopId},
  sale::{Receipt, Sale, SaleLine},
};

use crate::{
  catalog::linked_card,
  collection::credit_tx,
  encode::{decode_dt, encode_dt},
  error::SqliteResultExt as _,
  inventory::shelf_listing_tx,
};

pub(crate) fn purchase_tx(
  tx: &Transaction<'_>,
  buyer: PlayerId,
  shop: ShopId,
  product: ProductId,
  qty: i64,
) -> Result<Receipt> {
  let listing = shelf_listing_tx(tx, shop, product)?
    .ok_or(Error::ListingNotFound { shop, product })?;

  if listing.qty < qty {
    return Err(Error::InsufficientStock { requested: qty, available: listing.qty });
  }

  tx.execute(
    "UPDATE shop_shelf SET qty = qty - ?3
     WHERE shop_id = ?1 AND product_id = ?2",
    rusqlite::params![shop.0, product.0, qty],
  )
  .db_err()?;

  tx.execute(
    "INSERT INTO sales (occurred_at, player_id, shop_id) VALUES (?1, ?2, ?3)",
    rusqlite::params![encode_dt(Utc::now()), buyer.0, shop.0],
  )
  .db_err()?;
  let sale = SaleId(tx.last_insert_rowid());

  tx.execute(
    "INSERT INTO sale_lines (sale_id, product_id, qty, unit_price)
     VALUES (?1, ?2, ?3, ?4)",
    rusqlite::params![sale.0, product.0, qty, listing.price],
  )
  .db_err()?;

  // Singles resolve to a card; sealed product and accessories do not.
  if let Some(card) = linked_card(tx, product)? {
    credit_tx(tx, buyer, card, qty)?;
  }

  Ok(Receipt {
    sale_id:         sale,
    amount_due:      qty * listing.price,
    shelf_remaining: listing.qty - qty,
  })
}

pub(crate) fn sale_with_lines_tx(
  tx: &Transaction<'_>,
  sale: SaleId,
) -> Result<Option<(Sale, Vec<SaleLine>)>> {
  use rusqlite::OptionalExtension as _;

  let header: Option<(String, i64, i64)> = tx
    .query_row(
      "SELECT occurred_at, player_id, shop_id FROM sales WHERE sale_id = ?1",
      rusqlite::params![sale.0],
      |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
    )
    .optional()
    .db_err()?;

  let Some((occurred_at, player_id, shop_id)) = header else {
    return Ok(None);
  };

  let mut stmt = tx
    .prepare(
      "SELECT product_id, qty, unit_price FROM sale_lines
       WHERE sale_id = ?1 ORDER BY product_id",
    )
    .db_err()?;
  let lines = stmt
    .query_map(rusqlite::params![sale.0], |row| {
      Ok(SaleLine {
        sale_id:    sale,
        product_id: ProductId(row.get(0)?),
        qty:        row.get(1)?,
        unit_price: row.get(2)?,
      })
    })
    .db_err()?
    .collect::<rusqlite::Result<Vec<_>>>()
    .db_err()?;

  Ok(Some((
    Sale {
      sale_id:     sale,
      occurred_at: decode_dt(&occurred_at)?,
      buyer_id:    PlayerId(player_id),
      shop_id:     ShopId(shop_id),
    },
    lines,
  )))
}
