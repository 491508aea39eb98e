//! API root listing the entry points.

use axum::extract::State;

use crate::hypermedia::{Hal, Links, LinksModel, SELF_REL};

/// Builds the root links: `self`, `employees`, `orders`.
pub fn root_links(base_url: &str) -> Links {
    let base = base_url.trim_end_matches('/');
    Links::new()
        .with(SELF_REL, format!("{base}/"))
        .with("employees", format!("{base}/employees"))
        .with("orders", format!("{base}/orders"))
}

/// GET / — returns links to every collection.
pub async fn get(State(links): State<Links>) -> Hal<LinksModel> {
    Hal(LinksModel { links })
}
