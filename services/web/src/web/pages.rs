//! services/web/src/web/pages.rs
//!
//! Server-rendered HTML for both applications.
//!
//! Pages are tera templates compiled into the binary and loaded once at startup.
//! Tera escapes every interpolated value in `.html` templates.

use axum::{http::StatusCode, response::Html};
use lessonflow_core::domain::{Course, Flash};
use lessonflow_core::generation::known_subjects;
use lessonflow_core::lesson::DEFAULT_LEVEL;
use lessonflow_core::Catalog;
use tera::{Context, Tera};
use tracing::error;

/// Models offered in the assistant UI.
const MODEL_CHOICES: &[&str] = &["deepseek-v3.2-chat", "gpt-4o-mini", "qwen2.5", "llama3"];

const LEVEL_CHOICES: &[&str] = &[DEFAULT_LEVEL, "advanced"];

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../../templates/base.html")),
    ("macros.html", include_str!("../../templates/macros.html")),
    ("landing.html", include_str!("../../templates/landing.html")),
    ("register.html", include_str!("../../templates/register.html")),
    ("assistant.html", include_str!("../../templates/assistant.html")),
    ("cart.html", include_str!("../../templates/cart.html")),
    ("checkout.html", include_str!("../../templates/checkout.html")),
    ("success.html", include_str!("../../templates/success.html")),
    ("rules.html", include_str!("../../templates/rules.html")),
    ("faq.html", include_str!("../../templates/faq.html")),
    ("pricing.html", include_str!("../../templates/pricing.html")),
    ("about.html", include_str!("../../templates/about.html")),
    ("materials.html", include_str!("../../templates/materials.html")),
];

pub type PageResult = Result<Html<String>, StatusCode>;

/// The compiled page templates of both applications.
pub struct Pages {
    tera: Tera,
}

impl Pages {
    /// Parses every template; a syntax error or a missing parent fails here.
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.iter().copied())?;
        Ok(Self { tera })
    }

    fn render(&self, template: &str, context: &Context) -> PageResult {
        self.tera.render(template, context).map(Html).map_err(|e| {
            error!(template, error = ?e, "Failed to render page");
            StatusCode::INTERNAL_SERVER_ERROR
        })
    }

    fn static_page(&self, template: &str, logged_in: bool) -> PageResult {
        let mut context = Context::new();
        context.insert("logged_in", &logged_in);
        self.render(template, &context)
    }

    //=====================================================================================
    // Storefront Pages
    //=====================================================================================

    pub fn landing(&self, catalog: &Catalog, logged_in: bool) -> PageResult {
        let mut context = Context::new();
        context.insert("logged_in", &logged_in);
        context.insert("courses", catalog.courses());
        self.render("landing.html", &context)
    }

    pub fn register(&self, logged_in: bool) -> PageResult {
        self.static_page("register.html", logged_in)
    }

    pub fn assistant(&self, default_model: &str) -> PageResult {
        let subjects: Vec<&str> = known_subjects().collect();
        let mut context = Context::new();
        context.insert("logged_in", &true);
        context.insert("subjects", &subjects);
        context.insert("models", MODEL_CHOICES);
        context.insert("default_model", default_model);
        self.render("assistant.html", &context)
    }

    pub fn cart(&self, items: &[&Course], total: u32, flashes: &[Flash]) -> PageResult {
        let mut context = Context::new();
        context.insert("logged_in", &true);
        context.insert("items", items);
        context.insert("total", &total);
        context.insert("flashes", flashes);
        self.render("cart.html", &context)
    }

    pub fn checkout(&self, items: &[&Course], total: u32) -> PageResult {
        let mut context = Context::new();
        context.insert("logged_in", &true);
        context.insert("items", items);
        context.insert("total", &total);
        self.render("checkout.html", &context)
    }

    pub fn purchase_success(&self) -> PageResult {
        self.static_page("success.html", true)
    }

    //=====================================================================================
    // Informational Pages
    //=====================================================================================

    pub fn rules(&self, logged_in: bool) -> PageResult {
        self.static_page("rules.html", logged_in)
    }

    pub fn faq(&self, logged_in: bool) -> PageResult {
        self.static_page("faq.html", logged_in)
    }

    pub fn pricing(&self, catalog: &Catalog, logged_in: bool) -> PageResult {
        let mut context = Context::new();
        context.insert("logged_in", &logged_in);
        context.insert("courses", catalog.courses());
        self.render("pricing.html", &context)
    }

    pub fn about(&self, logged_in: bool) -> PageResult {
        self.static_page("about.html", logged_in)
    }

    //=====================================================================================
    // Lesson-Material Generator Page
    //=====================================================================================

    pub fn materials_index(&self) -> PageResult {
        let mut context = Context::new();
        context.insert("levels", LEVEL_CHOICES);
        self.render("materials.html", &context)
    }
}
