use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;
use velo_model::{
    Category, DashboardStats, HomePage, NewProduct, Order, OrderStatus, Product, ProductId, ProductPatch, UserId,
};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::session::Session;

/// 订单列表的查询方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderListing {
    Admin,
    User(UserId),
}

#[derive(Debug, Default, Deserialize)]
struct Cart {
    #[serde(default)]
    items: Vec<CartItem>,
}

#[derive(Debug, Deserialize)]
struct CartItem {
    quantity: u32,
}

/// `velo-api` 的 HTTP 客户端
#[derive(Debug, Clone)]
pub struct ShopClient {
    http: Client,
    base_url: String,
}

impl ShopClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            http: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    pub async fn list_products(&self, category: Option<Category>) -> Result<Vec<Product>, ClientError> {
        let mut request = self.http.get(self.url("/products"));
        if let Some(category) = category {
            request = request.query(&[("category", category.as_ref())]);
        }
        self.send(request).await
    }

    pub async fn get_product(&self, id: ProductId) -> Result<Product, ClientError> {
        self.send(self.http.get(self.url(&format!("/products/{id}")))).await
    }

    /// 先在本地校验，不合法时不发请求
    pub async fn create_product(&self, form: &NewProduct) -> Result<Product, ClientError> {
        form.validate()?;
        self.send(self.http.post(self.url("/products")).json(form)).await
    }

    pub async fn update_product(&self, id: ProductId, patch: &ProductPatch) -> Result<Product, ClientError> {
        patch.validate()?;
        self.send(self.http.put(self.url(&format!("/products/{id}"))).json(patch)).await
    }

    pub async fn delete_product(&self, id: ProductId) -> Result<(), ClientError> {
        let _: Value = self.send(self.http.delete(self.url(&format!("/products/{id}")))).await?;
        Ok(())
    }

    pub async fn list_orders(&self, listing: OrderListing) -> Result<Vec<Order>, ClientError> {
        let request = self.http.get(self.url("/orders"));
        let request = match listing {
            OrderListing::Admin => request.query(&[("role", "ADMIN")]),
            OrderListing::User(user_id) => request.query(&[("userId", user_id)]),
        };
        self.send(request).await
    }

    pub async fn update_order_status(&self, id: i64, status: OrderStatus) -> Result<Order, ClientError> {
        self.send(
            self.http
                .put(self.url(&format!("/orders/{id}")))
                .json(&json!({ "status": status })),
        )
            .await
    }

    pub async fn home_page(&self) -> Result<HomePage, ClientError> {
        self.send(self.http.get(self.url("/home"))).await
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ClientError> {
        self.send(self.http.get(self.url("/admin/stats"))).await
    }

    pub async fn add_to_cart(
        &self,
        session: Session,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), ClientError> {
        let user_id = session.user_id().ok_or(ClientError::NoSession)?;

        let response = self
            .http
            .post(self.url("/cart"))
            .json(&json!({ "userId": user_id, "productId": product_id, "quantity": quantity }))
            .send()
            .await?;
        check_status(response).await?;

        Ok(())
    }

    /// 购物车里商品件数之和
    pub async fn cart_count(&self, session: Session) -> Result<u32, ClientError> {
        let user_id = session.user_id().ok_or(ClientError::NoSession)?;

        let cart: Option<Cart> = self
            .send(self.http.get(self.url("/cart")).query(&[("userId", user_id)]))
            .await?;

        Ok(cart.unwrap_or_default().items.iter().map(|item| item.quantity).sum())
    }
}

async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = error_message(&text).unwrap_or_else(|| {
        status.canonical_reason().unwrap_or("request failed").to_string()
    });
    tracing::warn!(%status, %message, "API request failed");

    Err(ClientError::Api { status, message })
}

/// 兼容 `{"error": {"details": ..}}` 和 `{"error": ".."}` 两种错误体
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let error = value.get("error")?;
    if let Some(message) = error.as_str() {
        return Some(message.to_string());
    }
    error
        .get("details")
        .or_else(|| error.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use reqwest::StatusCode;
    use rust_decimal_macros::dec;

    fn client(server: &MockServer) -> ShopClient {
        ShopClient::new(&ClientConfig { base_url: server.base_url() })
    }

    fn bike_json() -> Value {
        json!({
            "id": 1,
            "name": "VTT Alpha",
            "description": "VTT tout suspendu",
            "price": 500.0,
            "image": "/images/vtt.png",
            "category": "bicyclettes",
            "stock": 0,
            "isPinned": false,
            "createdAt": "2024-05-01T10:00:00Z"
        })
    }

    #[test]
    fn test_error_message_shapes() {
        assert_eq!(
            error_message(r#"{"error":{"message":"Resource not found","details":"Not found: Product 9"}}"#),
            Some("Not found: Product 9".to_string())
        );
        assert_eq!(error_message(r#"{"error":"Erreur mise à jour"}"#), Some("Erreur mise à jour".to_string()));
        assert_eq!(error_message("Internal Server Error"), None);
    }

    #[tokio::test]
    async fn test_list_products_sends_category() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/products").query_param("category", "bicyclettes");
                then.status(200).json_body(json!([bike_json()]));
            })
            .await;

        let products = client(&server).list_products(Some(Category::Bicyclettes)).await.unwrap();

        mock.assert_async().await;
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].price, dec!(500));
    }

    #[tokio::test]
    async fn test_invalid_form_is_not_sent() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/products");
                then.status(201).json_body(bike_json());
            })
            .await;

        let form = NewProduct {
            name: "VTT Alpha".to_string(),
            description: "VTT".to_string(),
            price: dec!(-5),
            image: "/images/vtt.png".to_string(),
            category: Category::Bicyclettes,
            stock: 1,
            is_pinned: false,
        };
        let result = client(&server).create_product(&form).await;

        assert!(matches!(result, Err(ClientError::Validation(_))));
        mock.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_delete_missing_product_is_api_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(DELETE).path("/api/products/9");
                then.status(404).json_body(json!({
                    "error": { "message": "Resource not found", "details": "Not found: Product with ID 9 not found" }
                }));
            })
            .await;

        let err = client(&server).delete_product(9).await.unwrap_err();

        assert!(err.is_not_found());
        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert!(message.contains("9"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_cart_requires_session() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/cart");
                then.status(200);
            })
            .await;

        let result = client(&server).add_to_cart(Session::Anonymous, 1, 1).await;

        assert!(matches!(result, Err(ClientError::NoSession)));
        mock.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_add_to_cart_posts_session_user() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/cart")
                    .json_body(json!({ "userId": 4, "productId": 2, "quantity": 1 }));
                then.status(200).json_body(json!({ "success": true }));
            })
            .await;

        client(&server).add_to_cart(Session::User(4), 2, 1).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_cart_count_sums_quantities() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/cart").query_param("userId", "4");
                then.status(200).json_body(json!({ "items": [{ "quantity": 2 }, { "quantity": 3 }] }));
            })
            .await;

        assert_eq!(client(&server).cart_count(Session::User(4)).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_empty_cart_body_counts_zero() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/cart");
                then.status(200).json_body(Value::Null);
            })
            .await;

        assert_eq!(client(&server).cart_count(Session::User(4)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_get_product() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/products/1");
                then.status(200).json_body(bike_json());
            })
            .await;

        let product = client(&server).get_product(1).await.unwrap();

        mock.assert_async().await;
        assert_eq!(product.name, "VTT Alpha");
        assert_eq!(product.category, Category::Bicyclettes);
        assert!(!product.in_stock());
    }

    #[tokio::test]
    async fn test_home_page() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/home");
                then.status(200).json_body(json!({
                    "pinned": [],
                    "recent": [bike_json()],
                    "categoryCounts": { "bicyclettes": 1, "pièces": 4, "accessoires": 2 },
                    "totalProducts": 7
                }));
            })
            .await;

        let home = client(&server).home_page().await.unwrap();

        assert!(home.pinned.is_empty());
        assert_eq!(home.recent[0].id, 1);
        assert_eq!(home.category_counts.get(Category::Pieces), 4);
        assert_eq!(home.total_products, 7);
    }

    #[tokio::test]
    async fn test_dashboard_stats() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/admin/stats");
                then.status(200).json_body(json!({
                    "totalProducts": 12,
                    "totalOrders": 5,
                    "totalUsers": 3,
                    "pendingOrders": 2,
                    "totalRevenue": 1250.5,
                    "recentOrders": []
                }));
            })
            .await;

        let stats = client(&server).dashboard_stats().await.unwrap();

        assert_eq!(stats.pending_orders, 2);
        assert_eq!(stats.total_revenue, dec!(1250.5));
        assert!(stats.recent_orders.is_empty());
    }

    #[tokio::test]
    async fn test_dashboard_server_error_is_api_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/admin/stats");
                then.status(500).json_body(json!({
                    "error": { "message": "Database error", "details": "Database error: pool timed out" }
                }));
            })
            .await;

        let err = client(&server).dashboard_stats().await.unwrap_err();

        assert!(matches!(err, ClientError::Api { status, .. } if status == StatusCode::INTERNAL_SERVER_ERROR));
    }
}
