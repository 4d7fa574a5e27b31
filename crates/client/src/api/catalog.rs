//! Product catalog gateway: products, categories, brands.
//!
//! Read-only and credential-free. Listings and product details are cached
//! in memory with a TTL (default one hour); all reads go through the retry
//! policy for idempotent GETs.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use moka::future::Cache;
use serde::Deserialize;
use tracing::{debug, instrument};

use freshcart_core::{BrandId, CategoryId, Price, ProductId};

use crate::api::ApiClient;
use crate::api::envelope::{ItemEnvelope, ListEnvelope};
use crate::error::ApiError;
use crate::types::{Brand, Category, Product};

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct ProductWire {
    #[serde(rename = "_id")]
    id: ProductId,
    title: String,
    description: Option<String>,
    #[serde(rename = "imageCover")]
    image_cover: Option<String>,
    price: Price,
    #[serde(rename = "ratingsAverage", default)]
    ratings_average: f64,
    #[serde(rename = "ratingsQuantity", default)]
    ratings_quantity: u32,
    category: Option<CategoryWire>,
    brand: Option<BrandWire>,
    #[serde(rename = "createdAt")]
    created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct CategoryWire {
    #[serde(rename = "_id")]
    id: CategoryId,
    name: String,
    image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BrandWire {
    #[serde(rename = "_id")]
    id: BrandId,
    name: String,
    image: Option<String>,
}

impl From<CategoryWire> for Category {
    fn from(wire: CategoryWire) -> Self {
        Self {
            id: wire.id,
            name: wire.name,
            image: wire.image,
        }
    }
}

impl From<BrandWire> for Brand {
    fn from(wire: BrandWire) -> Self {
        Self {
            id: wire.id,
            name: wire.name,
            image: wire.image,
        }
    }
}

impl From<ProductWire> for Product {
    fn from(wire: ProductWire) -> Self {
        Self {
            id: wire.id,
            title: wire.title,
            description: wire.description,
            image_cover: wire.image_cover,
            price: wire.price,
            ratings_average: wire.ratings_average,
            ratings_quantity: wire.ratings_quantity,
            category: wire.category.map(Category::from),
            brand: wire.brand.map(Brand::from),
            created_at: wire.created_at,
        }
    }
}

// =============================================================================
// Gateway
// =============================================================================

/// Raw catalog reads, one method per endpoint.
///
/// The trait seam lets tests substitute canned listings and count fetches.
#[allow(async_fn_in_trait)]
pub trait CatalogGateway: Send + Sync {
    /// GET `/products`.
    async fn products(&self) -> Result<Vec<Product>, ApiError>;
    /// GET `/products/{id}`.
    async fn product(&self, id: &ProductId) -> Result<Product, ApiError>;
    /// GET `/categories`.
    async fn categories(&self) -> Result<Vec<Category>, ApiError>;
    /// GET `/brands`.
    async fn brands(&self) -> Result<Vec<Brand>, ApiError>;
}

/// HTTP implementation of [`CatalogGateway`].
#[derive(Clone)]
pub struct HttpCatalogGateway {
    api: ApiClient,
}

impl HttpCatalogGateway {
    /// Create a gateway on the shared API client.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

impl CatalogGateway for HttpCatalogGateway {
    #[instrument(skip(self))]
    async fn products(&self) -> Result<Vec<Product>, ApiError> {
        let envelope: ListEnvelope<ProductWire> =
            self.api.get_with_retry("products", None).await?;
        Ok(envelope.into_items().into_iter().map(Product::from).collect())
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn product(&self, id: &ProductId) -> Result<Product, ApiError> {
        let envelope: ItemEnvelope<ProductWire> = self
            .api
            .get_with_retry(&format!("products/{id}"), None)
            .await?;
        envelope
            .into_outcome()
            .map(Product::from)
            .map_err(|message| ApiError::Rejected { message })
    }

    #[instrument(skip(self))]
    async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        let envelope: ListEnvelope<CategoryWire> =
            self.api.get_with_retry("categories", None).await?;
        Ok(envelope.into_items().into_iter().map(Category::from).collect())
    }

    #[instrument(skip(self))]
    async fn brands(&self) -> Result<Vec<Brand>, ApiError> {
        let envelope: ListEnvelope<BrandWire> = self.api.get_with_retry("brands", None).await?;
        Ok(envelope.into_items().into_iter().map(Brand::from).collect())
    }
}

// =============================================================================
// Cached Client
// =============================================================================

/// Cache key for catalog responses.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
enum CacheKey {
    Products,
    Product(ProductId),
    Categories,
    Brands,
}

/// Cached value types.
#[derive(Clone)]
enum CacheValue {
    Products(Arc<Vec<Product>>),
    Product(Arc<Product>),
    Categories(Arc<Vec<Category>>),
    Brands(Arc<Vec<Brand>>),
}

/// Catalog reads with an in-memory TTL cache in front of the gateway.
#[derive(Clone)]
pub struct CatalogClient<G = HttpCatalogGateway> {
    inner: Arc<CatalogClientInner<G>>,
}

struct CatalogClientInner<G> {
    gateway: G,
    cache: Cache<CacheKey, CacheValue>,
}

impl<G: CatalogGateway> CatalogClient<G> {
    /// Create a client with the given cache TTL and capacity.
    #[must_use]
    pub fn new(gateway: G, ttl: std::time::Duration, capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .build();

        Self {
            inner: Arc::new(CatalogClientInner { gateway, cache }),
        }
    }

    /// The full product listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn products(&self) -> Result<Arc<Vec<Product>>, ApiError> {
        if let Some(CacheValue::Products(products)) =
            self.inner.cache.get(&CacheKey::Products).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let products = Arc::new(self.inner.gateway.products().await?);
        self.inner
            .cache
            .insert(CacheKey::Products, CacheValue::Products(Arc::clone(&products)))
            .await;
        Ok(products)
    }

    /// A single product by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the request fails.
    pub async fn product(&self, id: &ProductId) -> Result<Arc<Product>, ApiError> {
        let key = CacheKey::Product(id.clone());
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for product");
            return Ok(product);
        }

        let product = Arc::new(self.inner.gateway.product(id).await?);
        self.inner
            .cache
            .insert(key, CacheValue::Product(Arc::clone(&product)))
            .await;
        Ok(product)
    }

    /// All product categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn categories(&self) -> Result<Arc<Vec<Category>>, ApiError> {
        if let Some(CacheValue::Categories(categories)) =
            self.inner.cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let categories = Arc::new(self.inner.gateway.categories().await?);
        self.inner
            .cache
            .insert(
                CacheKey::Categories,
                CacheValue::Categories(Arc::clone(&categories)),
            )
            .await;
        Ok(categories)
    }

    /// All product brands.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn brands(&self) -> Result<Arc<Vec<Brand>>, ApiError> {
        if let Some(CacheValue::Brands(brands)) = self.inner.cache.get(&CacheKey::Brands).await {
            debug!("Cache hit for brands");
            return Ok(brands);
        }

        let brands = Arc::new(self.inner.gateway.brands().await?);
        self.inner
            .cache
            .insert(CacheKey::Brands, CacheValue::Brands(Arc::clone(&brands)))
            .await;
        Ok(brands)
    }

    /// Invalidate all cached data.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;

    struct FakeCatalog {
        calls: AtomicUsize,
    }

    impl FakeCatalog {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }

        fn sample_product(id: &str) -> Product {
            Product {
                id: ProductId::new(id),
                title: "Woman Shawl".to_owned(),
                description: None,
                image_cover: None,
                price: Price::from(149u32),
                ratings_average: 4.8,
                ratings_quantity: 300,
                category: None,
                brand: None,
                created_at: None,
            }
        }
    }

    impl CatalogGateway for FakeCatalog {
        async fn products(&self) -> Result<Vec<Product>, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![Self::sample_product("P1")])
        }

        async fn product(&self, id: &ProductId) -> Result<Product, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Self::sample_product(id.as_str()))
        }

        async fn categories(&self) -> Result<Vec<Category>, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }

        async fn brands(&self) -> Result<Vec<Brand>, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn second_listing_read_is_served_from_cache() {
        let client = CatalogClient::new(FakeCatalog::new(), Duration::from_secs(60), 100);

        let first = client.products().await.expect("first read");
        let second = client.products().await.expect("second read");

        assert_eq!(first, second);
        assert_eq!(client.inner.gateway.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn products_are_cached_per_id() {
        let client = CatalogClient::new(FakeCatalog::new(), Duration::from_secs(60), 100);

        client.product(&ProductId::new("P1")).await.expect("read");
        client.product(&ProductId::new("P1")).await.expect("read");
        client.product(&ProductId::new("P2")).await.expect("read");

        assert_eq!(client.inner.gateway.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalidate_all_forces_a_refetch() {
        let client = CatalogClient::new(FakeCatalog::new(), Duration::from_secs(60), 100);

        client.products().await.expect("read");
        client.invalidate_all().await;
        client.products().await.expect("read");

        assert_eq!(client.inner.gateway.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn product_wire_decodes_api_shape() {
        let raw = r#"{
            "_id": "6428ebc6dc1175abc65ca0b9",
            "title": "Woman Shawl",
            "description": "Soft and warm",
            "imageCover": "https://cdn.example/shawl.jpg",
            "price": 149,
            "ratingsAverage": 4.8,
            "ratingsQuantity": 300,
            "category": { "_id": "c1", "name": "Women's Fashion", "image": null },
            "brand": { "_id": "b1", "name": "DeFacto", "image": null },
            "createdAt": "2023-04-02T10:21:17.623Z"
        }"#;

        let product = Product::from(
            serde_json::from_str::<ProductWire>(raw).expect("decode"),
        );
        assert_eq!(product.id, ProductId::new("6428ebc6dc1175abc65ca0b9"));
        assert_eq!(product.price, Price::from(149u32));
        assert_eq!(
            product.category.as_ref().map(|c| c.name.as_str()),
            Some("Women's Fashion")
        );
        assert!(product.created_at.is_some());
    }
}
