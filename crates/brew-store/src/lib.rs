//! # brew-store: The Live Cart
//!
//! Wraps the pure cart in `brew-core` with everything that touches the
//! outside world: key/value persistence, the promotion content store,
//! change broadcast and configuration.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           brew-store                                    │
//! │                                                                         │
//! │                        ┌───────────────────┐                            │
//! │   StorefrontConfig ───►│     CartStore     │◄─── subscribe()            │
//! │   (config.rs)          │  Mutex<Cart>      │                            │
//! │                        └──┬─────────┬───┬──┘                            │
//! │                           │         │   │                               │
//! │              ┌────────────▼──┐  ┌───▼───────────┐  ┌────────────────┐   │
//! │              │  CartStorage  │  │PromotionCatalog│ │   CartEvents   │   │
//! │              │  Memory/File  │  │ InMemory/Json  │ │   broadcast    │   │
//! │              └───────────────┘  └────────────────┘ └────────────────┘   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust,no_run
//! use brew_store::{CartStore, CartStoreOptions, FileStorage, JsonFileCatalog, StorefrontConfig};
//!
//! # async fn run() -> brew_store::StoreResult<()> {
//! let config = StorefrontConfig::load_or_default(None);
//! let store = CartStore::open(
//!     FileStorage::new(config.data_dir()),
//!     JsonFileCatalog::new(config.promotions_path()),
//!     CartStoreOptions::from(&config),
//! );
//!
//! let cart = store.apply_promo_code("SPRING10").await?;
//! println!("total: {}", cart.total);
//! # Ok(())
//! # }
//! ```

pub mod cart_store;
pub mod catalog;
pub mod config;
pub mod error;
pub mod events;
pub mod storage;

pub use cart_store::{CartStore, CartStoreOptions};
pub use catalog::{InMemoryCatalog, JsonFileCatalog, PromotionCatalog};
pub use config::{StorageBackend, StorefrontConfig};
pub use error::{StoreError, StoreResult};
pub use events::{CartEvent, CartEvents};
pub use storage::{CartStorage, FileStorage, MemoryStorage};
