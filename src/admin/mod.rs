//! Admin API: full CRUD over every content kind behind the authorization gate.

pub mod auth;
pub mod handlers;

use axum::{routing::get, Router};

use self::handlers::*;
use crate::content::{
    BlogPost, Destination, Event, FixedDeparture, Inquiry, Offer, Package, Page, Resource,
    Testimonial,
};
use crate::http::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/admin/status", get(get_status))
        .merge(crud_routes::<Destination>())
        .merge(crud_routes::<Package>())
        .merge(crud_routes::<Event>())
        .merge(crud_routes::<FixedDeparture>())
        .merge(crud_routes::<Offer>())
        .merge(crud_routes::<Testimonial>())
        .merge(crud_routes::<BlogPost>())
        .merge(crud_routes::<Page>())
        .merge(inbox_routes::<Inquiry>())
}

fn crud_routes<T: Resource>() -> Router<AppState> {
    Router::new()
        .route(&format!("/api/admin/{}", T::KIND), get(list_all::<T>).post(create::<T>))
        .route(
            &format!("/api/admin/{}/{{id}}", T::KIND),
            get(get_one::<T>).put(update::<T>).delete(delete::<T>),
        )
}

/// Read and delete only; items arrive through the public API.
fn inbox_routes<T: Resource>() -> Router<AppState> {
    Router::new()
        .route(&format!("/api/admin/{}", T::KIND), get(list_all::<T>))
        .route(
            &format!("/api/admin/{}/{{id}}", T::KIND),
            get(get_one::<T>).delete(delete::<T>),
        )
}
