//! User pages.

use actix_web::{HttpResponse, web};
use tera::Context;

use blogly_core::domain::UserInput;
use blogly_core::{DomainError, RepoError};
use blogly_shared::UserForm;

use super::{fetch_user, render};
use crate::flash::{self, FlashMessage, IncomingFlashes};
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn validate(form: UserForm) -> Result<UserInput, DomainError> {
    UserInput::new(
        form.first_name.as_deref(),
        form.last_name.as_deref(),
        form.image_url.as_deref(),
    )
}

/// GET /users
pub async fn list(state: web::Data<AppState>, flashes: IncomingFlashes) -> AppResult<HttpResponse> {
    let users = state.users.list().await?;

    let mut ctx = Context::new();
    ctx.insert("users", &users);
    render(&state, &flashes, "users/list.html", ctx)
}

/// GET /users/new
pub async fn new_form(
    state: web::Data<AppState>,
    flashes: IncomingFlashes,
) -> AppResult<HttpResponse> {
    render(&state, &flashes, "users/new.html", Context::new())
}

/// POST /users/new
pub async fn create(
    state: web::Data<AppState>,
    form: web::Form<UserForm>,
) -> AppResult<HttpResponse> {
    let input = match validate(form.into_inner()) {
        Ok(input) => input,
        Err(e) => return flash::redirect_back("/users/new", e),
    };

    let user = state.users.create(input).await?;
    tracing::info!(user_id = user.id, "User created");

    Ok(flash::redirect_with(
        "/users",
        FlashMessage::success(format!("Added {}", user.full_name())),
    ))
}

/// GET /users/{id}
pub async fn show(
    state: web::Data<AppState>,
    flashes: IncomingFlashes,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let user = fetch_user(&state, path.into_inner()).await?;
    let posts = state.posts.find_by_user_id(user.id).await?;

    let mut ctx = Context::new();
    ctx.insert("user", &user);
    ctx.insert("posts", &posts);
    render(&state, &flashes, "users/detail.html", ctx)
}

/// GET /users/{id}/edit
pub async fn edit_form(
    state: web::Data<AppState>,
    flashes: IncomingFlashes,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let user = fetch_user(&state, path.into_inner()).await?;

    let mut ctx = Context::new();
    ctx.insert("user", &user);
    render(&state, &flashes, "users/edit.html", ctx)
}

/// POST /users/{id}/edit
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    form: web::Form<UserForm>,
) -> AppResult<HttpResponse> {
    let user = fetch_user(&state, path.into_inner()).await?;

    let input = match validate(form.into_inner()) {
        Ok(input) => input,
        Err(e) => return flash::redirect_back(&format!("/users/{}/edit", user.id), e),
    };

    let user = state.users.update(user.id, input).await?;
    tracing::info!(user_id = user.id, "User updated");

    Ok(flash::redirect_with(
        "/users",
        FlashMessage::success(format!("Updated {}", user.full_name())),
    ))
}

/// POST /users/{id}/delete
///
/// Refused while the user still owns posts.
pub async fn delete(state: web::Data<AppState>, path: web::Path<i32>) -> AppResult<HttpResponse> {
    let user = fetch_user(&state, path.into_inner()).await?;
    let detail_page = format!("/users/{}", user.id);
    let still_owns_posts = || {
        DomainError::InUse(format!(
            "{} still has posts; delete them first",
            user.full_name()
        ))
    };

    let posts = state.posts.find_by_user_id(user.id).await?;
    if !posts.is_empty() {
        return flash::redirect_back(&detail_page, still_owns_posts());
    }

    match state.users.delete(user.id).await {
        Ok(()) => {}
        // A post was added between the check and the delete.
        Err(RepoError::Constraint(_)) => {
            return flash::redirect_back(&detail_page, still_owns_posts());
        }
        Err(e) => return Err(e.into()),
    }
    tracing::info!(user_id = user.id, "User deleted");

    Ok(flash::redirect_with(
        "/users",
        FlashMessage::success(format!("Deleted {}", user.full_name())),
    ))
}
