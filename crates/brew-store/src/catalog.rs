//! # Promotion Catalog
//!
//! Read side of the content store that publishes promotion documents.
//!
//! Every query is a fresh read. An editor who deactivates a promotion or
//! changes its value affects the next cart operation, not the next restart.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use brew_core::Promotion;
use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// Promotion lookups against the content store.
#[async_trait]
pub trait PromotionCatalog: Send + Sync {
    /// Finds the promotion published under `code` (case-insensitive).
    ///
    /// Inactive and expired promotions are returned as-is; eligibility is
    /// decided by the cart.
    async fn find_by_code(&self, code: &str) -> StoreResult<Option<Promotion>>;

    /// All auto promotions, live or not.
    async fn auto_promotions(&self) -> StoreResult<Vec<Promotion>>;
}

fn matches_code(promotion: &Promotion, code: &str) -> bool {
    promotion
        .code
        .as_deref()
        .is_some_and(|c| c.trim().eq_ignore_ascii_case(code.trim()))
}

// =============================================================================
// In-Memory Catalog
// =============================================================================

/// Fixed list of promotions.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    promotions: Vec<Promotion>,
}

impl InMemoryCatalog {
    pub fn new(promotions: Vec<Promotion>) -> Self {
        InMemoryCatalog { promotions }
    }

    pub fn promotions(&self) -> &[Promotion] {
        &self.promotions
    }
}

#[async_trait]
impl PromotionCatalog for InMemoryCatalog {
    async fn find_by_code(&self, code: &str) -> StoreResult<Option<Promotion>> {
        Ok(self
            .promotions
            .iter()
            .find(|p| matches_code(p, code))
            .cloned())
    }

    async fn auto_promotions(&self) -> StoreResult<Vec<Promotion>> {
        Ok(self
            .promotions
            .iter()
            .filter(|p| p.is_auto())
            .cloned()
            .collect())
    }
}

// =============================================================================
// JSON File Catalog
// =============================================================================

/// Promotions read from a JSON array on disk.
///
/// A missing file is an empty catalog. A file that is not a JSON array of
/// promotions is a `Catalog` error.
#[derive(Debug, Clone)]
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileCatalog { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> StoreResult<Vec<Promotion>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = ?self.path, "Promotions file not found, catalog is empty");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(StoreError::Catalog(format!(
                    "failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        serde_json::from_str(&contents).map_err(|e| {
            StoreError::Catalog(format!("failed to parse {}: {}", self.path.display(), e))
        })
    }
}

#[async_trait]
impl PromotionCatalog for JsonFileCatalog {
    async fn find_by_code(&self, code: &str) -> StoreResult<Option<Promotion>> {
        let promotions = self.read_all().await?;
        Ok(promotions.into_iter().find(|p| matches_code(p, code)))
    }

    async fn auto_promotions(&self) -> StoreResult<Vec<Promotion>> {
        let promotions = self.read_all().await?;
        Ok(promotions.into_iter().filter(Promotion::is_auto).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brew_core::{DiscountType, PromotionType};

    fn promo(code: Option<&str>, promotion_type: PromotionType) -> Promotion {
        Promotion {
            code: code.map(str::to_string),
            name: code.unwrap_or("Auto").to_string(),
            promotion_type,
            discount_type: DiscountType::Percentage,
            discount_value: 10,
            min_subtotal_cents: None,
            valid_until: None,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_in_memory_lookup_ignores_case() {
        let catalog = InMemoryCatalog::new(vec![
            promo(Some("spring10"), PromotionType::Manual),
            promo(None, PromotionType::Auto),
        ]);

        let found = catalog.find_by_code("SPRING10").await.unwrap();
        assert_eq!(found.unwrap().code.as_deref(), Some("spring10"));
        assert!(catalog.find_by_code("NOPE").await.unwrap().is_none());
        assert_eq!(catalog.auto_promotions().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_json_catalog_reads_documents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("promotions.json");
        std::fs::write(
            &path,
            r#"[
                {"code": "SPRING10", "name": "Spring Sale", "type": "manual",
                 "discountType": "percentage", "discountValue": 10},
                {"name": "Free Bag Over $50", "type": "auto",
                 "discountType": "fixed_amount", "discountValue": 500,
                 "minSubtotalCents": 5000, "isActive": false}
            ]"#,
        )
        .unwrap();

        let catalog = JsonFileCatalog::new(&path);
        let spring = catalog.find_by_code("spring10").await.unwrap().unwrap();
        assert_eq!(spring.name, "Spring Sale");
        assert!(spring.is_active);

        let autos = catalog.auto_promotions().await.unwrap();
        assert_eq!(autos.len(), 1);
        assert!(!autos[0].is_active);
    }

    #[tokio::test]
    async fn test_json_catalog_sees_edits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("promotions.json");
        let catalog = JsonFileCatalog::new(&path);

        assert!(catalog.auto_promotions().await.unwrap().is_empty());

        std::fs::write(
            &path,
            r#"[{"code": "LATE", "name": "Late", "discountType": "percentage", "discountValue": 5}]"#,
        )
        .unwrap();
        assert!(catalog.find_by_code("LATE").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_json_catalog_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("promotions.json");
        std::fs::write(&path, "not json").unwrap();

        let err = JsonFileCatalog::new(&path).find_by_code("X").await.unwrap_err();
        assert!(matches!(err, StoreError::Catalog(_)));
    }
}
