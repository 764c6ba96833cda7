//! Session-backed shopping cart.
//!
//! The cart lives in the visitor's session under [`session_keys::CART`] as a
//! JSON object:
//!
//! ```json
//! { "12": { "quantity": 2, "price": "100000" } }
//! ```
//!
//! Prices are canonical decimal text so they survive the JSON round trip
//! without float drift, and are parsed back into `Decimal` on every read.
//!
//! A [`Cart`] is loaded once per request with [`Cart::attach`], mutated in
//! memory, and written back with [`Cart::commit`]. Nothing reaches the session
//! store until `commit` runs, and `commit` only writes when a mutation happened.
//!
//! Enriching lines with live product data is a separate step,
//! [`Cart::enrich`], which returns a read-only [`EnrichedCart`] projection.

use std::collections::{BTreeMap, HashMap};
use std::future::Future;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tower_sessions::session::Error as SessionError;

use glowmart_core::{ProductId, parse_money_lenient};

use crate::db::RepositoryError;
use crate::models::{Product, session_keys};

/// Largest quantity one line can hold. Order lines store quantities as `INT`.
#[allow(clippy::cast_lossless)]
pub const MAX_LINE_QUANTITY: i64 = i32::MAX as i64;

/// Resolves product IDs to catalog records.
pub trait CatalogLookup {
    /// Fetch every product in `ids` in one batch. Unknown IDs are skipped.
    fn products_by_ids(
        &self,
        ids: &[ProductId],
    ) -> impl Future<Output = Result<Vec<Product>, RepositoryError>> + Send;
}

/// One persisted cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub quantity: i64,
    /// Unit price snapshot as decimal text.
    #[serde(default)]
    pub price: Option<String>,
}

impl CartLine {
    /// Unit price as an exact decimal; malformed or missing text reads as zero.
    #[must_use]
    pub fn unit_price(&self) -> Decimal {
        parse_money_lenient(self.price.as_deref())
    }

    /// `unit_price * quantity`, saturating at `Decimal::MAX`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price().saturating_mul(Decimal::from(self.quantity))
    }
}

/// Persisted mapping of product ID text to line.
pub type CartLines = BTreeMap<String, CartLine>;

/// A visitor's cart for the duration of one request.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: CartLines,
    modified: bool,
    cleared: bool,
}

impl Cart {
    /// Load the cart from the session.
    ///
    /// A missing entry is initialized to an empty mapping and written back
    /// right away. An entry that no longer deserializes is treated the same
    /// way.
    ///
    /// # Errors
    ///
    /// Returns the session store error if the session cannot be read or
    /// written.
    pub async fn attach(session: &Session) -> Result<Self, SessionError> {
        let stored = match session.get::<CartLines>(session_keys::CART).await {
            Ok(stored) => stored,
            Err(SessionError::SerdeJson(e)) => {
                tracing::warn!(error = %e, "Discarding unreadable cart from session");
                None
            }
            Err(e) => return Err(e),
        };

        if let Some(lines) = stored {
            return Ok(Self::from_lines(lines));
        }

        session.insert(session_keys::CART, CartLines::new()).await?;
        Ok(Self::default())
    }

    /// Build a cart over an already-loaded mapping.
    ///
    /// Lines with a non-positive quantity are dropped on load and oversized
    /// quantities are capped at [`MAX_LINE_QUANTITY`].
    #[must_use]
    pub fn from_lines(mut lines: CartLines) -> Self {
        lines.retain(|_, line| line.quantity > 0);
        for line in lines.values_mut() {
            line.quantity = line.quantity.min(MAX_LINE_QUANTITY);
        }
        Self {
            lines,
            modified: false,
            cleared: false,
        }
    }

    /// Add `quantity` units of `product`, or set the quantity outright when
    /// `override_quantity` is true.
    ///
    /// The unit price is snapshotted (sale price when positive) only when
    /// the line is first created. The resulting quantity is capped at
    /// [`MAX_LINE_QUANTITY`], and a line whose quantity is not positive is
    /// removed.
    pub fn add(&mut self, product: &Product, quantity: i64, override_quantity: bool) {
        let key = product.id.to_string();
        let line = self.lines.entry(key.clone()).or_insert_with(|| CartLine {
            quantity: 0,
            price: Some(product.current_price().to_string()),
        });

        let quantity = if override_quantity {
            quantity
        } else {
            line.quantity.saturating_add(quantity)
        };
        line.quantity = quantity.min(MAX_LINE_QUANTITY);

        if line.quantity <= 0 {
            self.lines.remove(&key);
        }

        self.cleared = false;
        self.mark_modified();
    }

    /// Decrease a line's quantity by one, removing it at zero.
    ///
    /// No-op when the product is not in the cart.
    pub fn decrease(&mut self, product_id: ProductId) {
        let key = product_id.to_string();
        let Some(line) = self.lines.get_mut(&key) else {
            return;
        };

        line.quantity -= 1;
        if line.quantity <= 0 {
            self.lines.remove(&key);
        }
        self.mark_modified();
    }

    /// Remove a line regardless of quantity. No-op when absent.
    pub fn remove(&mut self, product_id: ProductId) {
        if self.lines.remove(&product_id.to_string()).is_some() {
            self.mark_modified();
        }
    }

    /// Drop the whole cart. The session entry is deleted on commit.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.cleared = true;
        self.mark_modified();
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn count(&self) -> i64 {
        self.lines
            .values()
            .fold(0_i64, |count, line| count.saturating_add(line.quantity))
    }

    /// Exact sum of `unit_price * quantity` over all lines, saturating at
    /// `Decimal::MAX`.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        saturating_sum(self.lines.values().map(CartLine::line_total))
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether there are uncommitted changes.
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.modified
    }

    /// Persisted lines keyed by product ID text.
    #[must_use]
    pub const fn lines(&self) -> &CartLines {
        &self.lines
    }

    /// Get the line for one product.
    #[must_use]
    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.get(&product_id.to_string())
    }

    /// Product IDs of all lines. Keys that are not valid IDs are skipped.
    #[must_use]
    pub fn product_ids(&self) -> Vec<ProductId> {
        self.lines.keys().filter_map(|key| key.parse().ok()).collect()
    }

    /// Resolve every line's product in one catalog call.
    ///
    /// # Errors
    ///
    /// Returns the catalog error if the lookup fails.
    pub async fn enrich<C: CatalogLookup>(
        &self,
        catalog: &C,
    ) -> Result<EnrichedCart, RepositoryError> {
        let products = catalog.products_by_ids(&self.product_ids()).await?;
        Ok(EnrichedCart::new(self.lines.clone(), products))
    }

    /// Write pending changes back to the session.
    ///
    /// # Errors
    ///
    /// Returns the session store error if the write fails.
    pub async fn commit(&mut self, session: &Session) -> Result<(), SessionError> {
        if !self.modified {
            return Ok(());
        }

        if self.cleared {
            session.remove_value(session_keys::CART).await?;
        } else {
            session.insert(session_keys::CART, &self.lines).await?;
        }

        self.modified = false;
        Ok(())
    }

    const fn mark_modified(&mut self) {
        self.modified = true;
    }
}

/// Read-only snapshot of a cart joined with live product records.
#[derive(Debug, Clone)]
pub struct EnrichedCart {
    lines: CartLines,
    products: HashMap<ProductId, Product>,
}

impl EnrichedCart {
    /// Join lines with the products the catalog returned.
    #[must_use]
    pub fn new(lines: CartLines, products: Vec<Product>) -> Self {
        let products = products.into_iter().map(|p| (p.id, p)).collect();
        Self { lines, products }
    }

    /// Iterate the enriched lines. Each call starts a fresh pass.
    pub fn iter(&self) -> impl Iterator<Item = CartItem<'_>> + '_ {
        self.lines.iter().map(|(key, line)| {
            let product = key
                .parse::<ProductId>()
                .ok()
                .and_then(|id| self.products.get(&id));
            CartItem {
                product_id: key,
                product,
                quantity: line.quantity,
                unit_price: line.unit_price(),
                line_total: line.line_total(),
            }
        })
    }

    /// Exact sum of line totals, saturating at `Decimal::MAX`.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        saturating_sum(self.iter().map(|item| item.line_total))
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether there are no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

fn saturating_sum(totals: impl Iterator<Item = Decimal>) -> Decimal {
    totals.fold(Decimal::ZERO, Decimal::saturating_add)
}

/// One enriched cart line. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem<'a> {
    pub product_id: &'a str,
    /// The live product, or `None` if it has left the catalog.
    pub product: Option<&'a Product>,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use std::str::FromStr;
    use std::sync::Arc;

    use chrono::Utc;
    use tower_sessions::MemoryStore;

    use super::*;

    pub(crate) fn product(id: i32, price: i64, sale_price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            description: String::new(),
            price: Decimal::from(price),
            sale_price: Decimal::from(sale_price),
            stock_quantity: 10,
            status: true,
            image_url: None,
            category_id: None,
            brand_id: None,
            created_at: Utc::now(),
        }
    }

    pub(crate) fn memory_session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    /// Catalog backed by a fixed product list.
    pub(crate) struct FixedCatalog(pub Vec<Product>);

    impl CatalogLookup for FixedCatalog {
        async fn products_by_ids(
            &self,
            ids: &[ProductId],
        ) -> Result<Vec<Product>, RepositoryError> {
            Ok(self
                .0
                .iter()
                .filter(|p| ids.contains(&p.id))
                .cloned()
                .collect())
        }
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_sale_price_ignored_when_zero_and_quantity_accumulates() {
        let a = product(1, 100_000, 0);
        let mut cart = Cart::default();

        cart.add(&a, 2, false);
        assert_eq!(cart.line(a.id).unwrap().unit_price(), dec("100000"));

        cart.add(&a, 3, false);
        assert_eq!(cart.line(a.id).unwrap().quantity, 5);
        assert_eq!(cart.total_price(), dec("500000"));
    }

    #[test]
    fn test_positive_sale_price_is_snapshotted() {
        let a = product(1, 100_000, 79_000);
        let mut cart = Cart::default();
        cart.add(&a, 1, false);
        assert_eq!(cart.line(a.id).unwrap().price.as_deref(), Some("79000"));
    }

    #[test]
    fn test_unit_price_not_refreshed_on_later_adds() {
        let mut a = product(1, 100_000, 0);
        let mut cart = Cart::default();
        cart.add(&a, 1, false);

        a.price = Decimal::from(150_000);
        cart.add(&a, 1, false);

        assert_eq!(cart.line(a.id).unwrap().unit_price(), dec("100000"));
        assert_eq!(cart.total_price(), dec("200000"));
    }

    #[test]
    fn test_override_is_idempotent() {
        let a = product(1, 10, 0);
        let mut cart = Cart::default();
        cart.add(&a, 4, true);
        cart.add(&a, 4, true);
        assert_eq!(cart.count(), 4);
    }

    #[test]
    fn test_decrease_removes_at_zero_then_noops() {
        let a = product(1, 10, 0);
        let mut cart = Cart::default();
        cart.add(&a, 1, false);

        cart.decrease(a.id);
        assert!(cart.line(a.id).is_none());
        assert!(cart.is_empty());

        cart.decrease(a.id);
        assert!(cart.is_empty());
        assert_eq!(cart.count(), 0);
    }

    #[test]
    fn test_remove_unconditional_and_absent_noop() {
        let a = product(1, 10, 0);
        let b = product(2, 20, 0);
        let mut cart = Cart::default();
        cart.add(&a, 7, false);
        cart.add(&b, 1, false);

        cart.remove(a.id);
        assert!(cart.line(a.id).is_none());
        assert_eq!(cart.count(), 1);

        let mut untouched = Cart::default();
        untouched.remove(a.id);
        assert!(!untouched.is_modified());
    }

    #[test]
    fn test_non_positive_add_prunes_line() {
        let a = product(1, 10, 0);
        let mut cart = Cart::default();
        cart.add(&a, 2, false);
        cart.add(&a, -5, false);
        assert!(cart.line(a.id).is_none());

        cart.add(&a, 0, true);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_count_matches_lines_over_mixed_sequence() {
        let products: Vec<Product> = (1..=4).map(|i| product(i, 1_000, 0)).collect();
        let mut cart = Cart::default();

        for (step, p) in products.iter().cycle().take(24).enumerate() {
            match step % 5 {
                0 | 1 => cart.add(p, 2, false),
                2 => cart.decrease(p.id),
                3 => cart.add(p, 3, true),
                _ => cart.remove(p.id),
            }

            let sum: i64 = cart.lines().values().map(|l| l.quantity).sum();
            assert_eq!(cart.count(), sum);
            assert!(cart.lines().values().all(|l| l.quantity > 0));
        }
    }

    #[test]
    fn test_huge_quantity_is_capped() {
        let a = product(1, 10, 0);
        let mut cart = Cart::default();

        cart.add(&a, i64::MAX, false);
        assert_eq!(cart.line(a.id).unwrap().quantity, MAX_LINE_QUANTITY);

        cart.add(&a, i64::MAX, false);
        assert_eq!(cart.line(a.id).unwrap().quantity, MAX_LINE_QUANTITY);

        cart.add(&a, MAX_LINE_QUANTITY - 1, true);
        cart.add(&a, 5, false);
        assert_eq!(cart.count(), MAX_LINE_QUANTITY);
    }

    #[test]
    fn test_override_at_cap() {
        let a = product(1, 10, 0);
        let mut cart = Cart::default();

        cart.add(&a, MAX_LINE_QUANTITY, true);
        assert_eq!(cart.count(), MAX_LINE_QUANTITY);

        cart.add(&a, MAX_LINE_QUANTITY + 1, true);
        assert_eq!(cart.count(), MAX_LINE_QUANTITY);

        cart.decrease(a.id);
        assert_eq!(cart.count(), MAX_LINE_QUANTITY - 1);
    }

    #[test]
    fn test_count_and_total_over_many_capped_lines() {
        let mut cart = Cart::default();
        for id in 1..=3 {
            cart.add(&product(id, 10, 0), i64::MAX, false);
        }

        let sum: i64 = cart.lines().values().map(|l| l.quantity).sum();
        assert_eq!(cart.count(), sum);
        assert_eq!(cart.count(), 3 * MAX_LINE_QUANTITY);
        assert_eq!(cart.total_price(), Decimal::from(30 * MAX_LINE_QUANTITY));
    }

    #[tokio::test]
    async fn test_extreme_prices_saturate_instead_of_panicking() {
        let mut cart = Cart::default();
        cart.add(&product(1, 10_000_000_000, 0), i64::MAX, false);
        assert_eq!(
            cart.total_price(),
            Decimal::from(10_000_000_000_i64) * Decimal::from(MAX_LINE_QUANTITY)
        );

        let huge = Cart::from_lines(CartLines::from([
            (
                "1".to_string(),
                CartLine {
                    quantity: i64::MAX,
                    price: Some(Decimal::MAX.to_string()),
                },
            ),
            (
                "2".to_string(),
                CartLine {
                    quantity: 2,
                    price: Some(Decimal::MAX.to_string()),
                },
            ),
        ]));
        assert_eq!(huge.line(ProductId::new(1)).unwrap().quantity, MAX_LINE_QUANTITY);
        assert_eq!(huge.total_price(), Decimal::MAX);
        assert_eq!(huge.count(), MAX_LINE_QUANTITY + 2);

        let enriched = huge.enrich(&FixedCatalog(Vec::new())).await.unwrap();
        assert_eq!(enriched.total_price(), Decimal::MAX);
    }

    #[test]
    fn test_total_is_exact_decimal() {
        let mut cart = Cart::from_lines(CartLines::from([(
            "9".to_string(),
            CartLine {
                quantity: 3,
                price: Some("19999.99".to_string()),
            },
        )]));
        assert_eq!(cart.total_price(), dec("59999.97"));

        cart.decrease(ProductId::new(9));
        assert_eq!(cart.total_price(), dec("39999.98"));
    }

    #[test]
    fn test_malformed_price_counts_as_zero() {
        let cart = Cart::from_lines(CartLines::from([
            (
                "1".to_string(),
                CartLine {
                    quantity: 2,
                    price: Some("not-a-number".to_string()),
                },
            ),
            (
                "2".to_string(),
                CartLine {
                    quantity: 1,
                    price: None,
                },
            ),
            (
                "3".to_string(),
                CartLine {
                    quantity: 1,
                    price: Some("5".to_string()),
                },
            ),
        ]));
        assert_eq!(cart.total_price(), dec("5"));
        assert_eq!(cart.count(), 4);
    }

    #[test]
    fn test_from_lines_drops_non_positive() {
        let cart = Cart::from_lines(CartLines::from([(
            "1".to_string(),
            CartLine {
                quantity: -1,
                price: Some("5".to_string()),
            },
        )]));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_session_json_contract() {
        let mut cart = Cart::default();
        cart.add(&product(12, 100_000, 0), 2, false);

        let json = serde_json::to_value(cart.lines()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "12": { "quantity": 2, "price": "100000" } })
        );
    }

    #[tokio::test]
    async fn test_attach_empty_session_initializes_entry() {
        let session = memory_session();
        let cart = Cart::attach(&session).await.unwrap();

        assert_eq!(cart.count(), 0);
        assert_eq!(cart.total_price(), Decimal::ZERO);

        let stored: Option<CartLines> = session.get(session_keys::CART).await.unwrap();
        assert_eq!(stored, Some(CartLines::new()));
    }

    #[tokio::test]
    async fn test_attach_discards_unreadable_entry() {
        let session = memory_session();
        session
            .insert(session_keys::CART, "garbage")
            .await
            .unwrap();

        let cart = Cart::attach(&session).await.unwrap();
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_commit_round_trips_through_session() {
        let session = memory_session();
        let mut cart = Cart::attach(&session).await.unwrap();
        cart.add(&product(3, 0, 0), 1, false);
        cart.lines.get_mut("3").unwrap().price = Some("19999.99".to_string());
        cart.add(&product(3, 0, 0), 2, false);
        cart.commit(&session).await.unwrap();
        assert!(!cart.is_modified());

        let reloaded = Cart::attach(&session).await.unwrap();
        assert_eq!(reloaded.count(), 3);
        assert_eq!(reloaded.total_price(), dec("59999.97"));
    }

    #[tokio::test]
    async fn test_uncommitted_changes_not_visible() {
        let session = memory_session();
        let mut cart = Cart::attach(&session).await.unwrap();
        cart.add(&product(1, 10, 0), 1, false);

        let other_view = Cart::attach(&session).await.unwrap();
        assert!(other_view.is_empty());
    }

    #[tokio::test]
    async fn test_clear_removes_session_entry() {
        let session = memory_session();
        let mut cart = Cart::attach(&session).await.unwrap();
        cart.add(&product(1, 10, 0), 1, false);
        cart.commit(&session).await.unwrap();

        cart.clear();
        cart.commit(&session).await.unwrap();

        let stored: Option<CartLines> = session.get(session_keys::CART).await.unwrap();
        assert!(stored.is_none());
        assert!(Cart::attach(&session).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_enrich_attaches_products_and_keeps_orphans() {
        let a = product(1, 100, 0);
        let b = product(2, 250, 200);
        let mut cart = Cart::default();
        cart.add(&a, 2, false);
        cart.add(&b, 1, false);
        cart.add(&product(3, 5, 0), 4, false);

        let catalog = FixedCatalog(vec![a.clone(), b.clone()]);
        let enriched = cart.enrich(&catalog).await.unwrap();

        let items: Vec<CartItem<'_>> = enriched.iter().collect();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].product.map(|p| p.id), Some(a.id));
        assert_eq!(items[0].line_total, dec("200"));
        assert_eq!(items[1].unit_price, dec("200"));
        assert!(items[2].product.is_none());
        assert_eq!(items[2].line_total, dec("20"));

        // A second pass yields the same sequence.
        assert_eq!(enriched.iter().count(), 3);
        assert_eq!(enriched.total_price(), cart.total_price());

        // Enrichment never touches the cart itself.
        assert!(cart.lines().values().all(|l| l.quantity > 0));
        assert_eq!(cart.count(), 7);
    }
}
