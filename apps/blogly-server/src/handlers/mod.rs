//! HTTP handlers and route configuration.

mod health;
mod posts;
mod tags;
mod users;


use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, web};
use tera::Context;

use blogly_core::DomainError;
use blogly_core::domain::{Post, Tag, User};

use crate::flash::{self, IncomingFlashes};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Largest accepted form body. Post content is unbounded text.
const FORM_LIMIT: usize = 2 * 1024 * 1024;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // Non-numeric ids and malformed bodies get the same HTML pages as other errors.
    cfg.app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| AppError::NotFound(err.to_string()).into()),
    )
    .app_data(
        web::FormConfig::default()
            .limit(FORM_LIMIT)
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .route("/", web::get().to(index))
    .route("/health", web::get().to(health::health_check))
    .service(
        web::scope("/users")
            .service(web::resource("").route(web::get().to(users::list)))
            .service(
                web::resource("/new")
                    .route(web::get().to(users::new_form))
                    .route(web::post().to(users::create)),
            )
            .service(web::resource("/{id}").route(web::get().to(users::show)))
            .service(
                web::resource("/{id}/edit")
                    .route(web::get().to(users::edit_form))
                    .route(web::post().to(users::update)),
            )
            .service(web::resource("/{id}/delete").route(web::post().to(users::delete)))
            .service(
                web::resource("/{id}/posts/new")
                    .route(web::get().to(posts::new_form))
                    .route(web::post().to(posts::create)),
            ),
    )
    .service(
        web::scope("/posts")
            .service(web::resource("/{id}").route(web::get().to(posts::show)))
            .service(
                web::resource("/{id}/edit")
                    .route(web::get().to(posts::edit_form))
                    .route(web::post().to(posts::update)),
            )
            .service(web::resource("/{id}/delete").route(web::post().to(posts::delete))),
    )
    .service(
        web::scope("/tags")
            .service(web::resource("").route(web::get().to(tags::list)))
            .service(
                web::resource("/new")
                    .route(web::get().to(tags::new_form))
                    .route(web::post().to(tags::create)),
            )
            .service(web::resource("/{id}").route(web::get().to(tags::show)))
            .service(
                web::resource("/{id}/edit")
                    .route(web::get().to(tags::edit_form))
                    .route(web::post().to(tags::update)),
            )
            .service(web::resource("/{id}/delete").route(web::post().to(tags::delete))),
    )
    .default_service(web::to(not_found));
}

/// GET / - the user listing doubles as the home page.
async fn index() -> HttpResponse {
    flash::redirect("/users")
}

async fn not_found() -> AppResult<HttpResponse> {
    Err(AppError::NotFound("No such page".to_string()))
}

/// Render `template` with `ctx`, showing and consuming pending flash messages.
fn render(
    state: &AppState,
    flashes: &IncomingFlashes,
    template: &str,
    mut ctx: Context,
) -> AppResult<HttpResponse> {
    ctx.insert("flashes", flashes.messages());
    let body = state.templates.render(template, &ctx)?;

    let mut resp = HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body);
    flashes.clear_on(&mut resp);
    Ok(resp)
}

async fn fetch_user(state: &AppState, id: i32) -> AppResult<User> {
    state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("User", id).into())
}

async fn fetch_post(state: &AppState, id: i32) -> AppResult<Post> {
    state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Post", id).into())
}

async fn fetch_tag(state: &AppState, id: i32) -> AppResult<Tag> {
    state
        .tags
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Tag", id).into())
}
