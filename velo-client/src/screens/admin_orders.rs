use velo_model::{Order, OrderStatus};

use crate::api::{OrderListing, ShopClient};
use crate::error::ClientError;
use crate::mutation::{mutate, MutationOutcome};

/// 后台订单管理页
#[derive(Debug)]
pub struct OrderAdmin {
    client: ShopClient,
    orders: Vec<Order>,
    selected: Option<i64>,
}

impl OrderAdmin {
    pub fn new(client: ShopClient) -> Self {
        Self {
            client,
            orders: Vec::new(),
            selected: None,
        }
    }

    pub async fn load(&mut self) -> Result<(), ClientError> {
        self.orders = self.client.list_orders(OrderListing::Admin).await?;
        Ok(())
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn select(&mut self, id: i64) {
        self.selected = Some(id);
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&Order> {
        let id = self.selected?;
        self.orders.iter().find(|o| o.id == id)
    }

    pub fn count_with_status(&self, status: OrderStatus) -> usize {
        self.orders.iter().filter(|o| o.status == status).count()
    }

    /// 任意状态之间都可以切换。成功后重新拉取列表并取消选中。
    pub async fn set_status(&mut self, id: i64, status: OrderStatus) -> MutationOutcome<()> {
        let outcome = mutate(self.client.update_order_status(id, status), || {
            self.client.list_orders(OrderListing::Admin)
        })
            .await;

        // 写入成功就取消选中，即使随后的刷新失败
        if outcome.was_written() {
            tracing::info!(order_id = id, %status, "order status changed");
            self.selected = None;
        }

        outcome.map(|orders| self.orders = orders)
    }
}
