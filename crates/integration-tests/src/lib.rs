//! Integration tests for Pixel Arcade.
//!
//! # Test Categories
//!
//! - `checkout_flow` - the commit sequence end to end
//! - `session_feed` - reactive store streams into the session
//! - `reward_redemption` - points-for-rewards exchange
//!
//! Tests run against the in-memory stores seeded by [`TestContext`]; no
//! external services are required. Failure injection uses the store doubles
//! in this crate ([`FailingOrderStore`], [`GatedOrderStore`]).

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::{Mutex, Notify, Semaphore};

use pixel_arcade_core::{
    AddressId, Email, Money, OrderId, ProductCode, RewardId, RewardKind, UserId,
};
use pixel_arcade_storefront::config::{LoyaltyConfig, ShippingConfig};
use pixel_arcade_storefront::db::{
    AddressStore, MemoryAddressStore, MemoryOrderStore, MemoryProductStore, MemoryRewardStore,
    MemoryUserRewardStore, MemoryUserStore, OrderStore, ProductStore, RepositoryError,
    UserRewardStore, UserStore,
};
use pixel_arcade_storefront::models::{
    Address, HeldReward, Order, OrderLine, Product, Reward, User,
};
use pixel_arcade_storefront::services::checkout::{CheckoutSession, OrderService, SharedSession};
use pixel_arcade_storefront::services::rewards::RewardService;
use pixel_arcade_storefront::shipping::TableRateResolver;

/// Initialize test logging. Safe to call from every test; only the first
/// call takes effect.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Seeded in-memory stores plus the engine configuration tests run against.
pub struct TestContext {
    pub products: Arc<MemoryProductStore>,
    pub users: Arc<MemoryUserStore>,
    pub addresses: Arc<MemoryAddressStore>,
    pub rewards: Arc<MemoryRewardStore>,
    pub user_rewards: Arc<MemoryUserRewardStore>,
    pub orders: Arc<MemoryOrderStore>,
    pub resolver: Arc<TableRateResolver>,
    pub loyalty: LoyaltyConfig,
}

/// Seeded user: active, zero points.
pub const SHOPPER: UserId = UserId::new(1);
/// Seeded user: suspended, 500 points.
pub const SUSPENDED: UserId = UserId::new(2);
/// Seeded user: active, 500 points.
pub const COLLECTOR: UserId = UserId::new(3);

/// Seeded reward: 10% off, costs 100 points.
pub const TEN_PERCENT: RewardId = RewardId::new(1);
/// Seeded reward: free shipping, costs 150 points.
pub const FREE_SHIPPING: RewardId = RewardId::new(2);
/// Seeded reward: 5000 off, costs 600 points.
pub const BIG_DISCOUNT: RewardId = RewardId::new(3);

impl TestContext {
    /// Build a context with a small seeded catalog, three users, one
    /// primary address each, and three reward definitions.
    pub async fn seeded() -> Self {
        init_tracing();

        let ctx = Self {
            products: Arc::new(MemoryProductStore::new()),
            users: Arc::new(MemoryUserStore::new()),
            addresses: Arc::new(MemoryAddressStore::new()),
            rewards: Arc::new(MemoryRewardStore::new()),
            user_rewards: Arc::new(MemoryUserRewardStore::new()),
            orders: Arc::new(MemoryOrderStore::new()),
            resolver: Arc::new(TableRateResolver::from(&ShippingConfig::default())),
            loyalty: LoyaltyConfig::default(),
        };

        for (code, name, category, price, stock) in [
            ("JM001", "Dice Set", "Board Games", 1000, 10),
            ("AC002", "Gamer Headset", "Accessories", 10_000, 5),
            ("PP301", "Limited Poster", "Collectibles", 2000, 0),
        ] {
            ctx.products
                .upsert(product(code, name, category, price, stock))
                .await
                .expect("seed product");
        }

        for (id, name, email, is_active, points) in [
            (SHOPPER, "Valentina Rojas", "valentina@example.com", true, 0),
            (SUSPENDED, "Marco Díaz", "marco@example.com", false, 500),
            (COLLECTOR, "Sofía Pérez", "sofia@example.com", true, 500),
        ] {
            ctx.users
                .insert(User {
                    id,
                    name: name.to_owned(),
                    email: Email::parse(email).expect("seed email"),
                    is_active,
                    points,
                })
                .await
                .expect("seed user");
        }

        for (id, user_id, region) in [
            (1, SHOPPER, "Metropolitana"),
            (2, SUSPENDED, "Metropolitana"),
            (3, COLLECTOR, "Valparaíso"),
        ] {
            ctx.addresses
                .add(Address {
                    id: AddressId::new(id),
                    user_id,
                    street: "Av. Providencia 1234".to_owned(),
                    unit: None,
                    region: region.to_owned(),
                    commune: "Centro".to_owned(),
                    is_primary: true,
                })
                .await
                .expect("seed address");
        }

        for (id, title, kind, value, points_cost) in [
            (TEN_PERCENT, "10% off", RewardKind::PercentageDiscount, 10, 100),
            (FREE_SHIPPING, "Free shipping", RewardKind::FreeShipping, 0, 150),
            (BIG_DISCOUNT, "5000 off", RewardKind::AmountDiscount, 5000, 600),
        ] {
            ctx.rewards
                .upsert(Reward {
                    id,
                    title: title.to_owned(),
                    description: String::new(),
                    kind,
                    value: Decimal::from(value),
                    points_cost,
                })
                .await;
        }

        ctx
    }

    /// A fresh checkout session priced with this context's resolver.
    pub fn session(&self) -> SharedSession {
        Arc::new(Mutex::new(CheckoutSession::new(self.resolver.clone())))
    }

    /// An order service wired to this context's stores.
    pub fn order_service(&self) -> OrderService {
        self.order_service_with_orders(self.orders.clone())
    }

    /// An order service with a substitute order store (failure doubles).
    pub fn order_service_with_orders(&self, orders: Arc<dyn OrderStore>) -> OrderService {
        OrderService::new(
            self.products.clone(),
            self.users.clone(),
            self.user_rewards.clone(),
            orders,
            self.loyalty.clone(),
        )
    }

    /// A reward service wired to this context's stores.
    pub fn reward_service(&self) -> RewardService {
        RewardService::new(
            self.rewards.clone(),
            self.user_rewards.clone(),
            self.users.clone(),
        )
    }

    /// Current stock of a seeded product.
    pub async fn stock_of(&self, code: &str) -> i32 {
        self.products
            .get(&code.parse::<ProductCode>().expect("product code"))
            .await
            .expect("product store")
            .expect("seeded product")
            .stock
    }

    /// Current points balance of a seeded user.
    pub async fn points_of(&self, user_id: UserId) -> i64 {
        self.users
            .get(user_id)
            .await
            .expect("user store")
            .expect("seeded user")
            .points
    }

    /// IDs of rewards the user currently holds.
    pub async fn held_ids(&self, user_id: UserId) -> Vec<RewardId> {
        self.user_rewards
            .watch_for_user(user_id)
            .await
            .borrow()
            .clone()
    }

    /// Grant a user a held reward directly (as if previously redeemed).
    pub async fn hold_reward(&self, user_id: UserId, reward_id: RewardId) {
        self.user_rewards
            .add(HeldReward { user_id, reward_id })
            .await
            .expect("hold reward");
    }

    /// The user's primary seeded address.
    pub async fn primary_address(&self, user_id: UserId) -> Address {
        self.addresses
            .watch_for_user(user_id)
            .await
            .borrow()
            .iter()
            .find(|a| a.is_primary)
            .cloned()
            .expect("seeded primary address")
    }

    /// A seeded product, read back from the store.
    pub async fn product(&self, code: &str) -> Product {
        self.products
            .get(&code.parse::<ProductCode>().expect("product code"))
            .await
            .expect("product store")
            .expect("seeded product")
    }
}

fn product(code: &str, name: &str, category: &str, price: i64, stock: i32) -> Product {
    Product {
        code: code.parse().expect("product code"),
        name: name.to_owned(),
        category: category.to_owned(),
        unit_price: Money::from(price),
        description: String::new(),
        stock,
        image_url: None,
        average_rating: 0.0,
    }
}

// =============================================================================
// Failure doubles
// =============================================================================

/// [`OrderStore`] whose appends always fail, as if the backend were down.
pub struct FailingOrderStore;

#[async_trait]
impl OrderStore for FailingOrderStore {
    async fn append(&self, _order: Order, _lines: Vec<OrderLine>) -> Result<(), RepositoryError> {
        Err(RepositoryError::Storage("order backend unavailable".to_owned()))
    }

    async fn get(&self, _id: OrderId) -> Result<Option<(Order, Vec<OrderLine>)>, RepositoryError> {
        Ok(None)
    }
}

/// [`OrderStore`] that parks every append until released, so tests can hold
/// a commit in flight deterministically.
pub struct GatedOrderStore {
    inner: MemoryOrderStore,
    entered: Notify,
    release: Semaphore,
}

impl GatedOrderStore {
    /// Create a gated store with no releases queued.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryOrderStore::new(),
            entered: Notify::new(),
            release: Semaphore::new(0),
        })
    }

    /// Wait until an append has started and is parked at the gate.
    pub async fn wait_until_entered(&self) {
        self.entered.notified().await;
    }

    /// Let one parked append proceed.
    pub fn release_one(&self) {
        self.release.add_permits(1);
    }

    /// Orders landed so far.
    pub async fn count(&self) -> usize {
        self.inner.count().await
    }
}

#[async_trait]
impl OrderStore for GatedOrderStore {
    async fn append(&self, order: Order, lines: Vec<OrderLine>) -> Result<(), RepositoryError> {
        self.entered.notify_one();
        let permit = self
            .release
            .acquire()
            .await
            .map_err(|_| RepositoryError::Storage("gate closed".to_owned()))?;
        permit.forget();
        self.inner.append(order, lines).await
    }

    async fn get(&self, id: OrderId) -> Result<Option<(Order, Vec<OrderLine>)>, RepositoryError> {
        self.inner.get(id).await
    }
}
