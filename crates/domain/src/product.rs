//! Product catalog: the `Product` document and typed access to it.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use common::ProductId;
use doc_store::{Collection, DocumentStore, DocumentStoreExt, PutOptions, Revision, Stored};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, Result};

/// A product in the catalog, including its live stock quantity.
///
/// The stock quantity is part of the product document itself, so stock
/// decrements are revision-checked writes of the whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub image: String,
    /// Unit price.
    pub price: f64,
    /// Units in stock. Never negative in a stored document.
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating or replacing a product. The store assigns the
/// identifier and creation timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    pub price: f64,
    pub quantity: i64,
}

fn validate(new: &NewProduct) -> Result<()> {
    if new.name.trim().is_empty() {
        return Err(DomainError::MissingField("name"));
    }
    if new.price < 0.0 {
        return Err(DomainError::InvalidPrice { price: new.price });
    }
    if new.quantity < 0 {
        return Err(DomainError::InvalidQuantity {
            quantity: new.quantity,
        });
    }
    Ok(())
}

/// Typed access to product documents.
///
/// The catalog is the only read path for prices and stock, and the only
/// write path for stock decrements.
#[derive(Clone)]
pub struct CatalogStore<D: DocumentStore> {
    store: D,
}

impl<D: DocumentStore> CatalogStore<D> {
    /// Creates a new catalog store over the given document store.
    pub fn new(store: D) -> Self {
        Self { store }
    }

    /// Loads a single product by identifier.
    #[tracing::instrument(skip(self))]
    pub async fn product_by_id(&self, id: &ProductId) -> Result<Option<Stored<Product>>> {
        Ok(self.store.get_typed(Collection::Products, id.as_str()).await?)
    }

    /// Loads the products matching the given identifiers.
    ///
    /// Identifiers with no catalog record are absent from the returned map;
    /// the caller decides whether absence is an error.
    #[tracing::instrument(skip(self))]
    pub async fn products_by_ids(
        &self,
        ids: &[ProductId],
    ) -> Result<HashMap<ProductId, Stored<Product>>> {
        let raw_ids: Vec<String> = ids.iter().map(|id| id.as_str().to_string()).collect();
        let raws = self.store.find_by_ids(Collection::Products, &raw_ids).await?;

        let mut products = HashMap::with_capacity(raws.len());
        for raw in raws {
            let stored: Stored<Product> = raw.into_typed()?;
            products.insert(stored.doc.id.clone(), stored);
        }
        Ok(products)
    }

    /// Lists all products in the catalog.
    pub async fn list_products(&self) -> Result<Vec<Stored<Product>>> {
        let raws = self.store.list(Collection::Products).await?;
        raws.into_iter()
            .map(|raw| Ok(raw.into_typed()?))
            .collect()
    }

    /// Creates a product with a freshly minted identifier.
    #[tracing::instrument(skip(self))]
    pub async fn create_product(&self, new: NewProduct) -> Result<Stored<Product>> {
        validate(&new)?;

        let product = Product {
            id: ProductId::new(Uuid::new_v4().to_string()),
            name: new.name,
            description: new.description,
            image: new.image,
            price: new.price,
            quantity: new.quantity,
            created_at: Utc::now(),
        };

        let rev = self
            .store
            .put_typed(
                Collection::Products,
                product.id.as_str(),
                &product,
                PutOptions::expect_new(),
            )
            .await?;

        Ok(Stored { rev, doc: product })
    }

    /// Replaces an existing product's fields at the revision it was read.
    #[tracing::instrument(skip(self, current))]
    pub async fn update_product(
        &self,
        current: &Stored<Product>,
        new: NewProduct,
    ) -> Result<Stored<Product>> {
        validate(&new)?;

        let product = Product {
            id: current.doc.id.clone(),
            name: new.name,
            description: new.description,
            image: new.image,
            price: new.price,
            quantity: new.quantity,
            created_at: current.doc.created_at,
        };

        let rev = self.put_product(&product, current.rev).await?;
        Ok(Stored { rev, doc: product })
    }

    /// Writes a product at the given revision (compare-and-swap).
    ///
    /// Returns the new revision on success; fails with a revision conflict
    /// if the stored document moved since it was read.
    pub async fn put_product(&self, product: &Product, expected_rev: Revision) -> Result<Revision> {
        Ok(self
            .store
            .put_typed(
                Collection::Products,
                product.id.as_str(),
                product,
                PutOptions::expect_rev(expected_rev),
            )
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use doc_store::{DocStoreError, MemoryDocumentStore};

    use super::*;

    fn new_product(name: &str, price: f64, quantity: i64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            description: String::new(),
            image: String::new(),
            price,
            quantity,
        }
    }

    fn catalog() -> CatalogStore<MemoryDocumentStore> {
        CatalogStore::new(MemoryDocumentStore::new())
    }

    #[tokio::test]
    async fn create_product_assigns_id_and_first_revision() {
        let catalog = catalog();
        let stored = catalog
            .create_product(new_product("widget", 10.0, 100))
            .await
            .unwrap();

        assert!(!stored.doc.id.as_str().is_empty());
        assert_eq!(stored.rev, Revision::first());
        assert_eq!(stored.doc.name, "widget");
        assert_eq!(stored.doc.quantity, 100);
    }

    #[tokio::test]
    async fn create_product_rejects_bad_payloads() {
        let catalog = catalog();

        let err = catalog
            .create_product(new_product("", 10.0, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::MissingField("name")));

        let err = catalog
            .create_product(new_product("widget", -1.0, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidPrice { .. }));

        let err = catalog
            .create_product(new_product("widget", 1.0, -5))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidQuantity { quantity: -5 }));
    }

    #[tokio::test]
    async fn product_by_id_roundtrip() {
        let catalog = catalog();
        let created = catalog
            .create_product(new_product("widget", 10.0, 100))
            .await
            .unwrap();

        let fetched = catalog
            .product_by_id(&created.doc.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched, created);

        let missing = catalog
            .product_by_id(&ProductId::new("nope"))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn products_by_ids_returns_found_subset() {
        let catalog = catalog();
        let a = catalog
            .create_product(new_product("a", 1.0, 1))
            .await
            .unwrap();
        let b = catalog
            .create_product(new_product("b", 2.0, 2))
            .await
            .unwrap();

        let ids = vec![
            a.doc.id.clone(),
            ProductId::new("missing"),
            b.doc.id.clone(),
        ];
        let products = catalog.products_by_ids(&ids).await.unwrap();

        assert_eq!(products.len(), 2);
        assert!(products.contains_key(&a.doc.id));
        assert!(products.contains_key(&b.doc.id));
        assert!(!products.contains_key(&ProductId::new("missing")));
    }

    #[tokio::test]
    async fn products_by_ids_is_repeatable_without_writes() {
        let catalog = catalog();
        let a = catalog
            .create_product(new_product("a", 1.0, 1))
            .await
            .unwrap();
        let b = catalog
            .create_product(new_product("b", 2.0, 2))
            .await
            .unwrap();

        let ids = vec![a.doc.id.clone(), b.doc.id.clone()];
        let first = catalog.products_by_ids(&ids).await.unwrap();
        let second = catalog.products_by_ids(&ids).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn list_products_returns_everything() {
        let catalog = catalog();
        catalog
            .create_product(new_product("a", 1.0, 1))
            .await
            .unwrap();
        catalog
            .create_product(new_product("b", 2.0, 2))
            .await
            .unwrap();

        let all = catalog.list_products().await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn update_product_replaces_fields_and_bumps_revision() {
        let catalog = catalog();
        let created = catalog
            .create_product(new_product("widget", 10.0, 100))
            .await
            .unwrap();

        let updated = catalog
            .update_product(&created, new_product("widget v2", 12.0, 90))
            .await
            .unwrap();

        assert_eq!(updated.rev, created.rev.next());
        assert_eq!(updated.doc.id, created.doc.id);
        assert_eq!(updated.doc.name, "widget v2");
        assert_eq!(updated.doc.price, 12.0);
        assert_eq!(updated.doc.quantity, 90);
        assert_eq!(updated.doc.created_at, created.doc.created_at);
    }

    #[tokio::test]
    async fn update_product_with_stale_read_conflicts() {
        let catalog = catalog();
        let created = catalog
            .create_product(new_product("widget", 10.0, 100))
            .await
            .unwrap();

        catalog
            .update_product(&created, new_product("widget v2", 12.0, 90))
            .await
            .unwrap();

        // Second update still holds the original revision.
        let err = catalog
            .update_product(&created, new_product("widget v3", 13.0, 80))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::Store(DocStoreError::RevisionConflict { .. })
        ));
    }

    #[tokio::test]
    async fn put_product_is_a_compare_and_swap() {
        let catalog = catalog();
        let created = catalog
            .create_product(new_product("widget", 10.0, 100))
            .await
            .unwrap();

        let mut product = created.doc.clone();
        product.quantity -= 10;
        let rev2 = catalog.put_product(&product, created.rev).await.unwrap();
        assert_eq!(rev2, created.rev.next());

        // Writing again with the stale revision fails.
        let err = catalog
            .put_product(&product, created.rev)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::Store(DocStoreError::RevisionConflict { .. })
        ));

        let fetched = catalog
            .product_by_id(&created.doc.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.doc.quantity, 90);
        assert_eq!(fetched.rev, rev2);
    }
}
