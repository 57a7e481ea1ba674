use sqlx::{MySqlPool, mysql::MySqlPoolOptions};

use crate::config::Config;
use crate::error::AppError;

pub async fn init_mysql(config: &Config) -> Result<MySqlPool, AppError> {
    tracing::info!(
        max_connections = config.database.max_connections,
        "Initializing MySQL connection pool"
    );

    let pool = MySqlPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;

    Ok(pool)
}

// 初始化数据库表
pub async fn init_schema(pool: &MySqlPool) -> Result<(), AppError> {
    // 用户表
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id BIGINT AUTO_INCREMENT PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL UNIQUE,
            created_at DATETIME(6) NOT NULL DEFAULT CURRENT_TIMESTAMP(6)
        )
        "#
    )
        .execute(pool)
        .await?;

    // 商品表
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id BIGINT AUTO_INCREMENT PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            description TEXT NOT NULL,
            price DECIMAL(10, 2) NOT NULL,
            image VARCHAR(500) NOT NULL,
            category VARCHAR(32) NOT NULL,
            stock INT NOT NULL DEFAULT 0,
            is_pinned BOOLEAN NOT NULL DEFAULT FALSE,
            created_at DATETIME(6) NOT NULL,
            INDEX idx_category (category),
            INDEX idx_pinned_created (is_pinned, created_at)
        )
        "#
    )
        .execute(pool)
        .await?;

    // 订单表
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS orders (
            id BIGINT AUTO_INCREMENT PRIMARY KEY,
            order_number VARCHAR(64) NOT NULL UNIQUE,
            user_id BIGINT NOT NULL,
            total DECIMAL(10, 2) NOT NULL,
            status VARCHAR(16) NOT NULL DEFAULT 'PENDING',
            payment_method VARCHAR(64) NOT NULL,
            created_at DATETIME(6) NOT NULL,
            INDEX idx_user (user_id),
            INDEX idx_status (status),
            INDEX idx_created_at (created_at),
            CONSTRAINT fk_orders_user FOREIGN KEY (user_id) REFERENCES users (id)
        )
        "#
    )
        .execute(pool)
        .await?;

    // 订单明细表，商品被引用时不能删除
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS order_items (
            id BIGINT AUTO_INCREMENT PRIMARY KEY,
            order_id BIGINT NOT NULL,
            product_id BIGINT NOT NULL,
            quantity INT NOT NULL,
            price DECIMAL(10, 2) NOT NULL,
            INDEX idx_order (order_id),
            CONSTRAINT fk_items_order FOREIGN KEY (order_id) REFERENCES orders (id) ON DELETE CASCADE,
            CONSTRAINT fk_items_product FOREIGN KEY (product_id) REFERENCES products (id)
        )
        "#
    )
        .execute(pool)
        .await?;

    tracing::info!("Database schema ready");

    Ok(())
}
