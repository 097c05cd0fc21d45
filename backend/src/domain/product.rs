//! Catalogue products.
//!
//! Prices are integer minor units. The rating aggregate fields are derived
//! from reviews and are never part of a [`ProductDraft`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::entity_id::entity_id;
use super::{RatingSummary, UserId};

entity_id! {
    /// Stable product identifier.
    ProductId
}

pub const PRODUCT_NAME_MIN: usize = 3;
pub const PRODUCT_NAME_MAX: usize = 50;
pub const DESCRIPTION_MIN: usize = 10;
pub const DESCRIPTION_MAX: usize = 500;
/// Smallest stock level accepted when inventory is provided.
pub const INVENTORY_MIN: i32 = 15;
pub const DEFAULT_IMAGE: &str = "/uploads/example.jpeg";
pub const DEFAULT_COLOR: &str = "#222";

/// Validation errors for product drafts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProductValidationError {
    #[error("Please provide name")]
    EmptyName,
    #[error("name must be between {min} and {max} characters")]
    NameLength { min: usize, max: usize },
    #[error("price must not be negative")]
    NegativePrice,
    #[error("Please provide description")]
    EmptyDescription,
    #[error("description must be between {min} and {max} characters")]
    DescriptionLength { min: usize, max: usize },
    #[error("Please provide category")]
    EmptyCategory,
    #[error("{value} is not a supported category")]
    UnknownCategory { value: String },
    #[error("Please provide company")]
    EmptyCompany,
    #[error("{value} is not supported")]
    UnknownCompany { value: String },
    #[error("Please provide colors")]
    NoColors,
    #[error("inventory must be at least {min}")]
    InventoryTooLow { min: i32 },
}

impl ProductValidationError {
    /// Payload field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyName | Self::NameLength { .. } => "name",
            Self::NegativePrice => "price",
            Self::EmptyDescription | Self::DescriptionLength { .. } => "description",
            Self::EmptyCategory | Self::UnknownCategory { .. } => "category",
            Self::EmptyCompany | Self::UnknownCompany { .. } => "company",
            Self::NoColors => "colors",
            Self::InventoryTooLow { .. } => "inventory",
        }
    }
}

/// Product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProductCategory {
    Office,
    Kitchen,
    Bedroom,
}

impl ProductCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Office => "office",
            Self::Kitchen => "kitchen",
            Self::Bedroom => "bedroom",
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductCategory {
    type Err = ProductValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Err(ProductValidationError::EmptyCategory),
            "office" => Ok(Self::Office),
            "kitchen" => Ok(Self::Kitchen),
            "bedroom" => Ok(Self::Bedroom),
            other => Err(ProductValidationError::UnknownCategory {
                value: other.to_owned(),
            }),
        }
    }
}

/// Manufacturer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Company {
    Ikea,
    Liddy,
    Marcos,
}

impl Company {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ikea => "ikea",
            Self::Liddy => "liddy",
            Self::Marcos => "marcos",
        }
    }
}

impl fmt::Display for Company {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Company {
    type Err = ProductValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Err(ProductValidationError::EmptyCompany),
            "ikea" => Ok(Self::Ikea),
            "liddy" => Ok(Self::Liddy),
            "marcos" => Ok(Self::Marcos),
            other => Err(ProductValidationError::UnknownCompany {
                value: other.to_owned(),
            }),
        }
    }
}

/// Unvalidated product fields as received from a client.
///
/// Optional fields fall back to catalogue defaults during validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductInput {
    pub name: String,
    pub price: Option<i64>,
    pub description: String,
    pub image: Option<String>,
    pub category: String,
    pub company: String,
    pub colors: Option<Vec<String>>,
    pub featured: Option<bool>,
    pub free_shipping: Option<bool>,
    pub inventory: Option<i32>,
}

/// Validated editable product fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub price: i64,
    pub description: String,
    pub image: String,
    pub category: ProductCategory,
    pub company: Company,
    pub colors: Vec<String>,
    pub featured: bool,
    pub free_shipping: bool,
    pub inventory: Option<i32>,
}

impl TryFrom<ProductInput> for ProductDraft {
    type Error = ProductValidationError;

    fn try_from(input: ProductInput) -> Result<Self, Self::Error> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(ProductValidationError::EmptyName);
        }
        if !(PRODUCT_NAME_MIN..=PRODUCT_NAME_MAX).contains(&name.chars().count()) {
            return Err(ProductValidationError::NameLength {
                min: PRODUCT_NAME_MIN,
                max: PRODUCT_NAME_MAX,
            });
        }

        let price = input.price.unwrap_or(0);
        if price < 0 {
            return Err(ProductValidationError::NegativePrice);
        }

        let description = input.description.as_str();
        if description.trim().is_empty() {
            return Err(ProductValidationError::EmptyDescription);
        }
        if !(DESCRIPTION_MIN..=DESCRIPTION_MAX).contains(&description.chars().count()) {
            return Err(ProductValidationError::DescriptionLength {
                min: DESCRIPTION_MIN,
                max: DESCRIPTION_MAX,
            });
        }

        let category = input.category.parse::<ProductCategory>()?;
        let company = input.company.parse::<Company>()?;

        let colors = input
            .colors
            .unwrap_or_else(|| vec![DEFAULT_COLOR.to_owned()]);
        if colors.is_empty() {
            return Err(ProductValidationError::NoColors);
        }

        if input.inventory.is_some_and(|inventory| inventory < INVENTORY_MIN) {
            return Err(ProductValidationError::InventoryTooLow { min: INVENTORY_MIN });
        }

        let image = input
            .image
            .filter(|image| !image.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_IMAGE.to_owned());

        Ok(Self {
            name: name.to_owned(),
            price,
            description: description.to_owned(),
            image,
            category,
            company,
            colors,
            featured: input.featured.unwrap_or(false),
            free_shipping: input.free_shipping.unwrap_or(false),
            inventory: input.inventory,
        })
    }
}

/// Catalogue entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[schema(value_type = String)]
    pub id: ProductId,
    #[schema(example = "accent chair")]
    pub name: String,
    /// Price in minor units.
    #[schema(example = 25999)]
    pub price: i64,
    pub description: String,
    pub image: String,
    pub category: ProductCategory,
    pub company: Company,
    pub colors: Vec<String>,
    pub featured: bool,
    pub free_shipping: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory: Option<i32>,
    pub average_rating: i32,
    pub num_of_reviews: i32,
    /// Admin who created the entry.
    #[schema(value_type = String)]
    #[serde(rename = "user")]
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Build a fresh product with an empty rating aggregate.
    pub fn create(draft: ProductDraft, owner: UserId, now: DateTime<Utc>) -> Self {
        let ProductDraft {
            name,
            price,
            description,
            image,
            category,
            company,
            colors,
            featured,
            free_shipping,
            inventory,
        } = draft;
        Self {
            id: ProductId::random(),
            name,
            price,
            description,
            image,
            category,
            company,
            colors,
            featured,
            free_shipping,
            inventory,
            average_rating: 0,
            num_of_reviews: 0,
            user_id: owner,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the editable fields, leaving identity and aggregate intact.
    pub fn apply(&mut self, draft: ProductDraft, now: DateTime<Utc>) {
        self.name = draft.name;
        self.price = draft.price;
        self.description = draft.description;
        self.image = draft.image;
        self.category = draft.category;
        self.company = draft.company;
        self.colors = draft.colors;
        self.featured = draft.featured;
        self.free_shipping = draft.free_shipping;
        self.inventory = draft.inventory;
        self.updated_at = now;
    }

    pub fn rating_summary(&self) -> RatingSummary {
        RatingSummary {
            average_rating: self.average_rating,
            num_of_reviews: self.num_of_reviews,
        }
    }
}
