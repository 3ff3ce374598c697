pub mod auth;
pub mod cart;
pub mod materials;
pub mod middleware;
pub mod pages;
pub mod rest;
pub mod router;
pub mod site;
pub mod state;

pub use router::{materials_router, storefront_router};
pub use state::{AppState, MaterialsState};
