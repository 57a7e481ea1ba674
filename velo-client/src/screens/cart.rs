use velo_model::{Product, ProductId};

use crate::api::ShopClient;
use crate::error::ClientError;
use crate::screens::in_flight::InFlight;
use crate::session::Session;

/// 导航栏上的购物车数量
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CartBadge {
    count: u32,
}

impl CartBadge {
    pub fn count(&self) -> u32 {
        self.count
    }

    /// 未登录或请求失败时显示 0，不向上报错
    pub async fn refresh(&mut self, client: &ShopClient, session: Session) {
        self.count = match session {
            Session::Anonymous => 0,
            Session::User(_) => client.cart_count(session).await.unwrap_or_else(|e| {
                tracing::warn!(error = %e, "failed to fetch cart count");
                0
            }),
        };
    }
}

/// 商品卡片上的“加入购物车”
#[derive(Debug)]
pub struct ProductCard {
    product: Product,
    adding: InFlight,
}

impl ProductCard {
    pub fn new(product: Product) -> Self {
        Self { product, adding: InFlight::default() }
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn id(&self) -> ProductId {
        self.product.id
    }

    pub fn is_adding(&self) -> bool {
        self.adding.get()
    }

    pub fn adding_flag(&self) -> InFlight {
        self.adding.clone()
    }

    /// 每次加一件；未登录时返回 `NoSession`，不发请求
    pub async fn add_to_cart(&mut self, client: &ShopClient, session: Session) -> Result<(), ClientError> {
        let adding = self.adding.start();
        let result = client.add_to_cart(session, self.product.id, 1).await;
        drop(adding);

        if let Err(e) = &result {
            tracing::warn!(product_id = self.product.id, error = %e, "add to cart failed");
        }
        result
    }
}
