//! Inventory ledger: the storage ↔ shelf stock lifecycle for one shop.
//!
//! Both tables keep their rows once created, so a product that sells out
//! stays visible as a zero-quantity listing. The conservation invariant for
//! any (shop, product): `storage + shelf` only ever changes through restock.

use rusqlite::{OptionalExtension as _, Transaction};
use topdeck_core::{
  Error, Result,
  id::{ProductId, ShopId},
  inventory::{ShelfListing, StorageLevel},
};

use crate::{
  catalog::{ensure_product, ensure_shop},
  error::SqliteResultExt as _,
};

pub(crate) fn restock_tx(
  tx: &Transaction<'_>,
  shop: ShopId,
  product: ProductId,
  qty: i64,
) -> Result<StorageLevel> {
  ensure_shop(tx, shop)?;
  ensure_product(tx, product)?;

  tx.execute(
    "INSERT INTO shop_storage (shop_id, product_id, qty) VALUES (?1, ?2, ?3)
     ON CONFLICT (shop_id, product_id) DO UPDATE SET qty = qty + excluded.qty",
    rusqlite::params![shop.0, product.0, qty],
  )
  .db_err()?;

  let qty = storage_qty_tx(tx, shop, product)?.unwrap_or(0);
  Ok(StorageLevel { shop_id: shop, product_id: product, qty })
}

pub(crate) fn list_to_shelf_tx(
  tx: &Transaction<'_>,
  shop: ShopId,
  product: ProductId,
  qty: i64,
  price: i64,
) -> Result<ShelfListing> {
  ensure_shop(tx, shop)?;
  ensure_product(tx, product)?;

  // An absent storage row is simply zero stock.
  let available = storage_qty_tx(tx, shop, product)?.unwrap_or(0);
  if available < qty {
    return Err(Error::InsufficientStock { requested: qty, available });
  }

  tx.execute(
    "UPDATE shop_storage SET qty = qty - ?3
     WHERE shop_id = ?1 AND product_id = ?2",
    rusqlite::params![shop.0, product.0, qty],
  )
  .db_err()?;

  // Quantity adds to any existing shelf stock; the price is overwritten
  // with the newly supplied one.
  tx.execute(
    "INSERT INTO shop_shelf (shop_id, product_id, qty, price)
     VALUES (?1, ?2, ?3, ?4)
     ON CONFLICT (shop_id, product_id)
       DO UPDATE SET qty = qty + excluded.qty, price = excluded.price",
    rusqlite::params![shop.0, product.0, qty, price],
  )
  .db_err()?;

  shelf_listing_tx(tx, shop, product)?
    .ok_or(Error::ListingNotFound { shop, product })
}

pub(crate) fn storage_qty_tx(
  tx: &Transaction<'_>,
  shop: ShopId,
  product: ProductId,
) -> Result<Option<i64>> {
  tx.query_row(
    "SELECT qty FROM shop_storage WHERE shop_id = ?1 AND product_id = ?2",
    rusqlite::params![shop.0, product.0],
    |row| row.get(0),
  )
  .optional()
  .db_err()
}

pub(crate) fn shelf_listing_tx(
  tx: &Transaction<'_>,
  shop: ShopId,
  product: ProductId,
) -> Result<Option<ShelfListing>> {
  tx.query_row(
    "SELECT qty, price FROM shop_shelf WHERE shop_id = ?1 AND product_id = ?2",
    rusqlite::params![shop.0, product.0],
    |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)),
  )
  .optional()
  .db_err()
  .map(|found| {
    found.map(|(qty, price)| ShelfListing {
      shop_id: shop,
      product_id: product,
      qty,
      price,
    })
  })
}
