//! Read-only product catalog
//!
//! Loaded once at startup from a JSON document shaped as
//! `{ "<category>": { "<item>": { "<quantity>": <price> } } }`.
//! Document order is kept and is the order used for menus and search.

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Price in whole currency units
pub type Price = u64;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("Catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Catalog must be an object of categories")]
    NotAnObject,
    #[error("Catalog has no categories")]
    Empty,
    #[error("Category {0:?} must be an object of items")]
    InvalidCategory(String),
    #[error("Item {item:?} in {category:?} must be an object of quantity options")]
    InvalidItem { category: String, item: String },
    #[error("Item {item:?} has no quantity options")]
    NoOptions { item: String },
    #[error("Price for {item:?} ({quantity}) must be a non-negative integer")]
    InvalidPrice { item: String, quantity: String },
    #[error("Item {item:?} appears in both {first:?} and {second:?}")]
    DuplicateItem {
        item: String,
        first: String,
        second: String,
    },
}

/// One purchasable quantity of an item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantityOption {
    pub label: String,
    pub price: Price,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub name: String,
    pub options: Vec<QuantityOption>,
}

impl Item {
    pub fn option(&self, label: &str) -> Option<&QuantityOption> {
        self.options.iter().find(|o| o.label == label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub items: Vec<Item>,
}

impl Category {
    pub fn item(&self, name: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.name == name)
    }
}

/// A search match: the item and the category that owns it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub category: String,
    pub item: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    categories: Vec<Category>,
}

impl Catalog {
    /// Load and validate a catalog file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let value: Value = serde_json::from_str(raw)?;
        let Value::Object(root) = value else {
            return Err(CatalogError::NotAnObject);
        };
        if root.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut categories = Vec::with_capacity(root.len());
        for (category_name, items) in root {
            let Value::Object(items) = items else {
                return Err(CatalogError::InvalidCategory(category_name));
            };
            let items = parse_items(&category_name, items)?;
            categories.push(Category {
                name: category_name,
                items,
            });
        }

        let catalog = Self { categories };
        catalog.check_unique_items()?;
        Ok(catalog)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn item(&self, category: &str, item: &str) -> Option<&Item> {
        self.category(category).and_then(|c| c.item(item))
    }

    /// Case-insensitive substring match over every item name, in catalog order
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.categories
            .iter()
            .flat_map(|category| {
                category.items.iter().filter_map(|item| {
                    item.name.to_lowercase().contains(&needle).then(|| SearchHit {
                        category: category.name.clone(),
                        item: item.name.clone(),
                    })
                })
            })
            .collect()
    }

    fn check_unique_items(&self) -> Result<(), CatalogError> {
        let mut owners: HashMap<&str, &str> = HashMap::new();
        for category in &self.categories {
            for item in &category.items {
                if let Some(first) = owners.insert(&item.name, &category.name) {
                    return Err(CatalogError::DuplicateItem {
                        item: item.name.clone(),
                        first: first.to_string(),
                        second: category.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

fn parse_items(category: &str, items: Map<String, Value>) -> Result<Vec<Item>, CatalogError> {
    let mut parsed = Vec::with_capacity(items.len());
    for (item_name, options) in items {
        let Value::Object(options) = options else {
            return Err(CatalogError::InvalidItem {
                category: category.to_string(),
                item: item_name,
            });
        };
        if options.is_empty() {
            return Err(CatalogError::NoOptions { item: item_name });
        }
        let mut quantity_options = Vec::with_capacity(options.len());
        for (label, price) in options {
            let Some(price) = price.as_u64() else {
                return Err(CatalogError::InvalidPrice {
                    item: item_name,
                    quantity: label,
                });
            };
            quantity_options.push(QuantityOption { label, price });
        }
        parsed.push(Item {
            name: item_name,
            options: quantity_options,
        });
    }
    Ok(parsed)
}
