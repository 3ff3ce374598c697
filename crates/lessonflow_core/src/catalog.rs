//! crates/lessonflow_core/src/catalog.rs
//!
//! The static course catalog and the promo code table.

use serde::Serialize;

use crate::domain::Course;

/// Read-only course list, kept in display order.
#[derive(Debug, Clone)]
pub struct Catalog {
    courses: Vec<Course>,
}

impl Catalog {
    pub fn new(courses: Vec<Course>) -> Self {
        Self { courses }
    }

    /// The courses sold by the storefront.
    pub fn builtin() -> Self {
        let course = |id: &str, name: &str, price: u32, full_price: u32| Course {
            id: id.to_string(),
            name: name.to_string(),
            price,
            full_price,
        };

        Self::new(vec![
            course("math-basic", "Mathematics. Basic exam-prep course", 399, 799),
            course("english-b1b2", "English, B1-B2", 899, 899),
            course("physics-basic", "Physics. Basic exam-prep course", 699, 699),
            course("history-full", "History. Basic and advanced exam-prep courses", 799, 1199),
            course("chemistry-full", "Chemistry. Basic and advanced exam-prep courses", 999, 1499),
            course("biology-full", "Biology. Basic and advanced exam-prep courses", 999, 1299),
        ])
    }

    pub fn get(&self, course_id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == course_id)
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }
}

const PROMO_CODES: &[(&str, f64)] = &[("START2025", 0.2), ("MPIT2025", 0.3), ("FREE", 1.0)];

/// Fractional discount for a promo code. Codes are trimmed and case-insensitive.
/// Unknown codes yield `0.0`.
pub fn promo_discount(code: &str) -> f64 {
    let normalized = code.trim().to_uppercase();
    PROMO_CODES
        .iter()
        .find(|(known, _)| *known == normalized)
        .map(|(_, discount)| *discount)
        .unwrap_or(0.0)
}

/// The outcome of applying a promo code to a cart total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromoOutcome {
    pub success: bool,
    pub discounted_total: f64,
    pub message: String,
}

pub fn apply_promo(code: &str, total: u32) -> PromoOutcome {
    let discount = promo_discount(code);
    let discounted = f64::from(total) * (1.0 - discount);
    let discounted_total = (discounted * 100.0).round() / 100.0;
    let success = discount > 0.0;

    PromoOutcome {
        success,
        discounted_total,
        message: if success {
            "Promo code applied!".to_string()
        } else {
            "Invalid promo code.".to_string()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promo_codes_are_case_insensitive() {
        let outcome = apply_promo("mpit2025", 1000);
        assert!(outcome.success);
        assert_eq!(outcome.discounted_total, 700.0);

        assert_eq!(promo_discount("  start2025 "), 0.2);
        assert_eq!(apply_promo("Free", 1898).discounted_total, 0.0);
    }

    #[test]
    fn unknown_promo_leaves_total_unchanged() {
        let outcome = apply_promo("BOGUS", 1000);
        assert!(!outcome.success);
        assert_eq!(outcome.discounted_total, 1000.0);
        assert_eq!(outcome.message, "Invalid promo code.");
    }

    #[test]
    fn discounted_total_is_rounded_to_cents() {
        // 399 * 0.8 = 319.2 exactly; 799 * 0.7 = 559.3 needs rounding away from float noise.
        assert_eq!(apply_promo("START2025", 399).discounted_total, 319.2);
        assert_eq!(apply_promo("MPIT2025", 799).discounted_total, 559.3);
    }

    #[test]
    fn builtin_catalog_lookups() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.courses().len(), 6);

        let math = catalog.get("math-basic").unwrap();
        assert_eq!(math.price, 399);
        assert!(math.is_discounted());
        assert!(!catalog.get("english-b1b2").unwrap().is_discounted());
        assert!(catalog.get("nope").is_none());
    }
}
