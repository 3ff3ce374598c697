//! crates/lessonflow_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any web framework or storage backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::Catalog;

/// A course offered in the storefront. Defined once at startup, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Course {
    pub id: String,
    pub name: String,
    pub price: u32,
    pub full_price: u32,
}

impl Course {
    pub fn is_discounted(&self) -> bool {
        self.full_price > self.price
    }
}

/// The ordered, duplicate-free list of course ids a session intends to buy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    course_ids: Vec<String>,
}

impl Cart {
    pub fn course_ids(&self) -> &[String] {
        &self.course_ids
    }

    pub fn is_empty(&self) -> bool {
        self.course_ids.is_empty()
    }

    /// Adds a course if the catalog knows it and it is not already in the cart.
    /// Returns `true` when the cart changed.
    pub fn add(&mut self, course_id: &str, catalog: &Catalog) -> bool {
        if catalog.get(course_id).is_none() {
            return false;
        }
        if self.course_ids.iter().any(|id| id == course_id) {
            return false;
        }
        self.course_ids.push(course_id.to_string());
        true
    }

    pub fn clear(&mut self) {
        self.course_ids.clear();
    }

    /// Resolves the cart against the catalog, preserving insertion order.
    pub fn items<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Course> {
        self.course_ids
            .iter()
            .filter_map(|id| catalog.get(id))
            .collect()
    }

    pub fn total(&self, catalog: &Catalog) -> u32 {
        self.items(catalog).iter().map(|c| c.price).sum()
    }
}

/// Severity of a one-shot message shown on the next page render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashLevel {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

/// A browser session (identified by a cookie) with its login flag and cart.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Option<String>,
    pub cart: Cart,
    pub flashes: Vec<Flash>,
    pub created_at: DateTime<Utc>,
    pub last_accessed_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id,
            user_id: None,
            cart: Cart::default(),
            flashes: Vec::new(),
            created_at: now,
            last_accessed_at: now,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.user_id.is_some()
    }

    /// Login is a stub: any caller becomes the same placeholder user.
    pub fn log_in(&mut self) {
        self.user_id = Some("temp_user_123".to_string());
    }

    /// Drops the login flag only; the cart survives a logout.
    pub fn log_out(&mut self) {
        self.user_id = None;
    }

    pub fn flash(&mut self, level: FlashLevel, message: impl Into<String>) {
        self.flashes.push(Flash {
            level,
            message: message.into(),
        });
    }

    /// Returns and clears pending flash messages.
    pub fn take_flashes(&mut self) -> Vec<Flash> {
        std::mem::take(&mut self.flashes)
    }
}
