use std::borrow::Cow;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use validator::{Validate, ValidationError};

pub type ProductId = i64;

/// 商品大类
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter, AsRefStr,
)]
pub enum Category {
    #[serde(rename = "bicyclettes")]
    #[strum(serialize = "bicyclettes")]
    Bicyclettes,
    #[serde(rename = "pièces")]
    #[strum(serialize = "pièces")]
    Pieces,
    #[serde(rename = "accessoires")]
    #[strum(serialize = "accessoires")]
    Accessoires,
}

impl Category {
    pub fn subcategories(self) -> &'static [Subcategory] {
        use Subcategory::*;
        match self {
            Self::Bicyclettes => &[Vtt, Route, Urbains, Electriques, Enfants],
            Self::Pieces => &[Freins, Chaines, Pneus, Pedaliers, Derailleurs, Roues],
            Self::Accessoires => &[Casques, Lumieres, Sacoches, Antivols, Vetements, Outils],
        }
    }
}

/// 商店页的子分类筛选项。
///
/// 商品表没有子分类字段，筛选时用关键字在名称和描述里做子串匹配。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter, AsRefStr,
)]
pub enum Subcategory {
    #[serde(rename = "VTT")]
    #[strum(serialize = "VTT")]
    Vtt,
    #[serde(rename = "Route")]
    #[strum(serialize = "Route")]
    Route,
    #[serde(rename = "Urbains")]
    #[strum(serialize = "Urbains")]
    Urbains,
    #[serde(rename = "Électriques")]
    #[strum(serialize = "Électriques")]
    Electriques,
    #[serde(rename = "Enfants")]
    #[strum(serialize = "Enfants")]
    Enfants,
    #[serde(rename = "Freins")]
    #[strum(serialize = "Freins")]
    Freins,
    #[serde(rename = "Chaînes")]
    #[strum(serialize = "Chaînes")]
    Chaines,
    #[serde(rename = "Pneus")]
    #[strum(serialize = "Pneus")]
    Pneus,
    #[serde(rename = "Pédaliers")]
    #[strum(serialize = "Pédaliers")]
    Pedaliers,
    #[serde(rename = "Dérailleurs")]
    #[strum(serialize = "Dérailleurs")]
    Derailleurs,
    #[serde(rename = "Roues")]
    #[strum(serialize = "Roues")]
    Roues,
    #[serde(rename = "Casques")]
    #[strum(serialize = "Casques")]
    Casques,
    #[serde(rename = "Lumières")]
    #[strum(serialize = "Lumières")]
    Lumieres,
    #[serde(rename = "Sacoches")]
    #[strum(serialize = "Sacoches")]
    Sacoches,
    #[serde(rename = "Antivols")]
    #[strum(serialize = "Antivols")]
    Antivols,
    #[serde(rename = "Vêtements")]
    #[strum(serialize = "Vêtements")]
    Vetements,
    #[serde(rename = "Outils")]
    #[strum(serialize = "Outils")]
    Outils,
}

impl Subcategory {
    pub fn category(self) -> Category {
        use Subcategory::*;
        match self {
            Vtt | Route | Urbains | Electriques | Enfants => Category::Bicyclettes,
            Freins | Chaines | Pneus | Pedaliers | Derailleurs | Roues => Category::Pieces,
            Casques | Lumieres | Sacoches | Antivols | Vetements | Outils => Category::Accessoires,
        }
    }

    /// 匹配用的小写关键字
    pub fn keyword(self) -> String {
        self.as_ref().to_lowercase()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image: String,
    pub category: Category,
    pub stock: i32,
    pub is_pinned: bool,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// 名称或描述是否包含 `needle`（`needle` 需已转为小写）。
    pub fn mentions(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.description.to_lowercase().contains(needle)
    }

    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// 后台新增商品的表单
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    #[validate(custom(function = "not_blank", message = "Name cannot be empty"))]
    pub name: String,
    #[validate(custom(function = "not_blank", message = "Description cannot be empty"))]
    pub description: String,
    #[validate(custom(function = "non_negative_price"))]
    pub price: Decimal,
    #[validate(custom(function = "not_blank", message = "Image cannot be empty"))]
    pub image: String,
    pub category: Category,
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: i32,
    #[serde(default)]
    pub is_pinned: bool,
}

/// 后台修改商品：只覆盖提交了的字段
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "not_blank", message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "not_blank", message = "Description cannot be empty"))]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "non_negative_price"))]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "not_blank", message = "Image cannot be empty"))]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_pinned: Option<bool>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply_to(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(image) = self.image {
            product.image = image;
        }
        if let Some(category) = self.category {
            product.category = category;
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(is_pinned) = self.is_pinned {
            product.is_pinned = is_pinned;
        }
    }
}

impl From<NewProduct> for ProductPatch {
    fn from(form: NewProduct) -> Self {
        Self {
            name: Some(form.name),
            description: Some(form.description),
            price: Some(form.price),
            image: Some(form.image),
            category: Some(form.category),
            stock: Some(form.stock),
            is_pinned: Some(form.is_pinned),
        }
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn non_negative_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ValidationError::new("negative_price")
            .with_message(Cow::Borrowed("Price cannot be negative")));
    }
    Ok(())
}
