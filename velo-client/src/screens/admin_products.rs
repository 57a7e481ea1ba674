use validator::Validate;
use velo_model::{Category, CategoryCounts, NewProduct, Product, ProductId, ProductPatch};

use crate::api::ShopClient;
use crate::error::ClientError;
use crate::filter::{CategoryFilter, FilterState, PriceRange};
use crate::mutation::{mutate, MutationOutcome};
use crate::screens::in_flight::InFlight;

/// 删除前向用户确认
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// 后台商品管理页
#[derive(Debug)]
pub struct ProductAdmin {
    client: ShopClient,
    products: Vec<Product>,
    filters: FilterState,
    editing: Option<ProductId>,
    busy: InFlight,
}

impl ProductAdmin {
    pub fn new(client: ShopClient) -> Self {
        Self {
            client,
            products: Vec::new(),
            filters: FilterState {
                price: PriceRange::unbounded(),
                ..Default::default()
            },
            editing: None,
            busy: InFlight::default(),
        }
    }

    pub async fn load(&mut self) -> Result<(), ClientError> {
        self.products = self.client.list_products(None).await?;
        Ok(())
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// 只按大类和关键字筛选，保持服务端的顺序
    pub fn visible(&self) -> Vec<&Product> {
        self.products.iter().filter(|p| self.filters.matches(p)).collect()
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filters.search = search.into();
    }

    pub fn select_category(&mut self, category: Option<Category>) {
        self.filters.select_category(category.map_or(CategoryFilter::All, CategoryFilter::Only));
    }

    pub fn category_counts(&self) -> CategoryCounts {
        CategoryCounts::tally(&self.products)
    }

    /// 表单提交中
    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }

    /// 供界面在提交期间读取的句柄
    pub fn busy_flag(&self) -> InFlight {
        self.busy.clone()
    }

    pub fn editing(&self) -> Option<ProductId> {
        self.editing
    }

    /// 进入编辑模式，返回用现有数据填好的表单
    pub fn begin_edit(&mut self, id: ProductId) -> Option<NewProduct> {
        let product = self.products.iter().find(|p| p.id == id)?;
        let form = NewProduct {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            image: product.image.clone(),
            category: product.category,
            stock: product.stock,
            is_pinned: product.is_pinned,
        };
        self.editing = Some(id);
        Some(form)
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// 编辑模式下更新，否则新增。表单不合法时不发请求。
    pub async fn submit(&mut self, form: NewProduct) -> MutationOutcome<()> {
        if let Err(e) = form.validate() {
            return MutationOutcome::Failed(e.into());
        }

        let busy = self.busy.start();
        let outcome = match self.editing {
            Some(id) => {
                let patch = ProductPatch::from(form);
                mutate(self.client.update_product(id, &patch), || self.client.list_products(None)).await
            }
            None => mutate(self.client.create_product(&form), || self.client.list_products(None)).await,
        };
        drop(busy);

        if outcome.was_written() {
            self.editing = None;
        }
        self.apply(outcome)
    }

    /// 用户取消时返回 `None`，不发任何请求
    pub async fn delete(&mut self, id: ProductId, confirm: &impl Confirm) -> Option<MutationOutcome<()>> {
        let prompt = match self.products.iter().find(|p| p.id == id) {
            Some(product) => format!("Êtes-vous sûr de vouloir supprimer \"{}\" ?", product.name),
            None => "Êtes-vous sûr de vouloir supprimer ce produit ?".to_string(),
        };
        if !confirm.confirm(&prompt) {
            return None;
        }

        let outcome = mutate(self.client.delete_product(id), || self.client.list_products(None)).await;

        if outcome.was_written() && self.editing == Some(id) {
            self.editing = None;
        }
        Some(self.apply(outcome))
    }

    fn apply(&mut self, outcome: MutationOutcome<Vec<Product>>) -> MutationOutcome<()> {
        outcome.map(|products| self.products = products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use httpmock::prelude::*;
    use rust_decimal_macros::dec;
    use serde_json::{json, Value};
    use std::time::Duration;

    fn product_json(id: i64, name: &str, category: &str, stock: i32) -> Value {
        json!({
            "id": id,
            "name": name,
            "description": format!("{name} description"),
            "price": 100.0,
            "image": format!("/images/{id}.png"),
            "category": category,
            "stock": stock,
            "isPinned": false,
            "createdAt": "2024-05-01T10:00:00Z"
        })
    }

    fn form(name: &str) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            description: "Description".to_string(),
            price: dec!(100),
            image: "/images/new.png".to_string(),
            category: Category::Accessoires,
            stock: 3,
            is_pinned: false,
        }
    }

    async fn loaded(server: &MockServer, products: Value) -> ProductAdmin {
        let mut list = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/products");
                then.status(200).json_body(products);
            })
            .await;

        let mut admin = ProductAdmin::new(ShopClient::new(&ClientConfig { base_url: server.base_url() }));
        admin.load().await.unwrap();
        list.delete_async().await;
        admin
    }

    #[tokio::test]
    async fn test_create_refreshes_list() {
        let server = MockServer::start_async().await;
        let mut admin = loaded(&server, json!([product_json(1, "VTT Alpha", "bicyclettes", 0)])).await;

        let create = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/products").json_body_partial(r#"{"name":"Casque Beta"}"#);
                then.status(201).json_body(product_json(2, "Casque Beta", "accessoires", 3));
            })
            .await;
        let refresh = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/products");
                then.status(200).json_body(json!([
                    product_json(2, "Casque Beta", "accessoires", 3),
                    product_json(1, "VTT Alpha", "bicyclettes", 0)
                ]));
            })
            .await;

        let outcome = admin.submit(form("Casque Beta")).await;

        assert!(outcome.is_applied());
        assert!(!admin.is_busy());
        create.assert_async().await;
        refresh.assert_async().await;
        assert_eq!(admin.products().len(), 2);
        assert_eq!(admin.category_counts().get(Category::Accessoires), 1);
    }

    #[tokio::test]
    async fn test_busy_while_submit_in_flight() {
        let server = MockServer::start_async().await;
        let mut admin = loaded(&server, json!([])).await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/products");
                then.status(201)
                    .delay(Duration::from_millis(300))
                    .json_body(product_json(2, "Casque Beta", "accessoires", 3));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/products");
                then.status(200).json_body(json!([product_json(2, "Casque Beta", "accessoires", 3)]));
            })
            .await;

        let busy = admin.busy_flag();
        assert!(!busy.get());

        let (outcome, seen) = tokio::join!(admin.submit(form("Casque Beta")), async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            busy.get()
        });

        assert!(seen, "busy must be visible while the request is pending");
        assert!(outcome.is_applied());
        assert!(!busy.get());
    }

    #[tokio::test]
    async fn test_invalid_form_issues_nothing() {
        let server = MockServer::start_async().await;
        let mut admin = loaded(&server, json!([])).await;
        let create = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/products");
                then.status(201);
            })
            .await;

        let mut invalid = form("Casque Beta");
        invalid.price = dec!(-5);
        let outcome = admin.submit(invalid).await;

        assert!(matches!(outcome, MutationOutcome::Failed(ClientError::Validation(_))));
        create.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_edit_sends_put_and_leaves_edit_mode() {
        let server = MockServer::start_async().await;
        let mut admin = loaded(&server, json!([product_json(1, "VTT Alpha", "bicyclettes", 0)])).await;

        let update = server
            .mock_async(|when, then| {
                when.method(PUT).path("/api/products/1").json_body_partial(r#"{"stock":5}"#);
                then.status(200).json_body(product_json(1, "VTT Alpha", "bicyclettes", 5));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/products");
                then.status(200).json_body(json!([product_json(1, "VTT Alpha", "bicyclettes", 5)]));
            })
            .await;

        let mut form = admin.begin_edit(1).unwrap();
        assert_eq!(admin.editing(), Some(1));
        form.stock = 5;
        let outcome = admin.submit(form).await;

        assert!(outcome.is_applied());
        update.assert_async().await;
        assert_eq!(admin.editing(), None);
        assert_eq!(admin.products()[0].stock, 5);
    }

    #[tokio::test]
    async fn test_declined_delete_issues_nothing() {
        let server = MockServer::start_async().await;
        let mut admin = loaded(&server, json!([product_json(1, "VTT Alpha", "bicyclettes", 0)])).await;
        let delete = server
            .mock_async(|when, then| {
                when.method(DELETE).path("/api/products/1");
                then.status(200).json_body(json!({ "success": true }));
            })
            .await;

        let outcome = admin.delete(1, &|prompt: &str| {
            assert!(prompt.contains("VTT Alpha"));
            false
        }).await;

        assert!(outcome.is_none());
        delete.assert_hits_async(0).await;
        assert_eq!(admin.products().len(), 1);
    }

    #[tokio::test]
    async fn test_confirmed_delete_of_missing_product_fails() {
        let server = MockServer::start_async().await;
        let mut admin = loaded(&server, json!([product_json(1, "VTT Alpha", "bicyclettes", 0)])).await;
        server
            .mock_async(|when, then| {
                when.method(DELETE).path("/api/products/1");
                then.status(404).json_body(json!({
                    "error": { "message": "Resource not found", "details": "Not found: Product with ID 1 not found" }
                }));
            })
            .await;
        let refresh = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/products");
                then.status(200).json_body(json!([]));
            })
            .await;

        let outcome = admin.delete(1, &|_: &str| true).await.unwrap();

        assert!(outcome.error().is_some_and(ClientError::is_not_found));
        refresh.assert_hits_async(0).await;
        assert_eq!(admin.products().len(), 1);
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_old_list() {
        let server = MockServer::start_async().await;
        let mut admin = loaded(&server, json!([product_json(1, "VTT Alpha", "bicyclettes", 0)])).await;
        server
            .mock_async(|when, then| {
                when.method(DELETE).path("/api/products/1");
                then.status(200).json_body(json!({ "success": true }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/products");
                then.status(500).json_body(json!({ "error": { "message": "Database error" } }));
            })
            .await;

        let outcome = admin.delete(1, &|_: &str| true).await.unwrap();

        assert!(matches!(outcome, MutationOutcome::RefreshFailed(_)));
        assert_eq!(admin.products().len(), 1);
    }

    #[tokio::test]
    async fn test_visible_uses_category_and_search() {
        let server = MockServer::start_async().await;
        let mut admin = loaded(
            &server,
            json!([
                product_json(1, "VTT Alpha", "bicyclettes", 0),
                product_json(2, "Casque Beta", "accessoires", 3),
                product_json(3, "Casque enfant", "accessoires", 0)
            ]),
        )
            .await;

        admin.select_category(Some(Category::Accessoires));
        assert_eq!(admin.visible().len(), 2);

        admin.set_search("enfant");
        let visible: Vec<i64> = admin.visible().iter().map(|p| p.id).collect();
        assert_eq!(visible, vec![3]);

        admin.select_category(None);
        admin.set_search("");
        assert_eq!(admin.visible().len(), 3);
    }

    #[test]
    fn test_expensive_products_stay_visible() {
        let mut admin = ProductAdmin::new(ShopClient::new(&ClientConfig::default()));
        admin.products = vec![serde_json::from_value(json!({
            "id": 5,
            "name": "Vélo cargo",
            "description": "Biporteur",
            "price": 12500.0,
            "image": "/images/5.png",
            "category": "bicyclettes",
            "stock": 1,
            "isPinned": false,
            "createdAt": "2024-05-01T10:00:00Z"
        }))
        .unwrap()];

        assert_eq!(admin.visible().len(), 1);
    }
}
