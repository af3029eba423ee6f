//! Tag pages.
//!
//! Tag names are unique. Both the pre-check here and the unique index
//! behind the repository produce the same flash message.

use actix_web::{HttpResponse, web};
use tera::Context;

use blogly_core::domain::TagInput;
use blogly_core::{DomainError, RepoError};
use blogly_shared::TagForm;

use super::{fetch_tag, render};
use crate::flash::{self, FlashMessage, IncomingFlashes};
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn name_taken(name: &str) -> DomainError {
    DomainError::Duplicate(format!("A tag named \"{name}\" already exists"))
}

/// Validate the form and make sure no tag other than `except` has the name.
async fn validate(
    state: &AppState,
    form: TagForm,
    except: Option<i32>,
) -> Result<TagInput, DomainError> {
    let input = TagInput::new(form.name.as_deref())?;

    let existing = state
        .tags
        .find_by_name(&input.name)
        .await
        .map_err(|e| DomainError::Internal(e.to_string()))?;
    match existing {
        Some(tag) if Some(tag.id) != except => Err(name_taken(&input.name)),
        _ => Ok(input),
    }
}

/// GET /tags
pub async fn list(state: web::Data<AppState>, flashes: IncomingFlashes) -> AppResult<HttpResponse> {
    let tags = state.tags.list().await?;

    let mut ctx = Context::new();
    ctx.insert("tags", &tags);
    render(&state, &flashes, "tags/list.html", ctx)
}

/// GET /tags/new
pub async fn new_form(
    state: web::Data<AppState>,
    flashes: IncomingFlashes,
) -> AppResult<HttpResponse> {
    render(&state, &flashes, "tags/new.html", Context::new())
}

/// POST /tags/new
pub async fn create(
    state: web::Data<AppState>,
    form: web::Form<TagForm>,
) -> AppResult<HttpResponse> {
    const FORM_PAGE: &str = "/tags/new";

    let input = match validate(&state, form.into_inner(), None).await {
        Ok(input) => input,
        Err(e) => return flash::redirect_back(FORM_PAGE, e),
    };
    let name = input.name.clone();

    let tag = match state.tags.create(input).await {
        Ok(tag) => tag,
        Err(RepoError::Duplicate(_)) => return flash::redirect_back(FORM_PAGE, name_taken(&name)),
        Err(e) => return Err(e.into()),
    };
    tracing::info!(tag_id = tag.id, name = %tag.name, "Tag created");

    Ok(flash::redirect_with(
        "/tags",
        FlashMessage::success(format!("Added tag \"{}\"", tag.name)),
    ))
}

/// GET /tags/{id}
pub async fn show(
    state: web::Data<AppState>,
    flashes: IncomingFlashes,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let tag = fetch_tag(&state, path.into_inner()).await?;
    let posts = state.tags.find_posts(tag.id).await?;

    let mut ctx = Context::new();
    ctx.insert("tag", &tag);
    ctx.insert("posts", &posts);
    render(&state, &flashes, "tags/detail.html", ctx)
}

/// GET /tags/{id}/edit
pub async fn edit_form(
    state: web::Data<AppState>,
    flashes: IncomingFlashes,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let tag = fetch_tag(&state, path.into_inner()).await?;

    let mut ctx = Context::new();
    ctx.insert("tag", &tag);
    render(&state, &flashes, "tags/edit.html", ctx)
}

/// POST /tags/{id}/edit
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    form: web::Form<TagForm>,
) -> AppResult<HttpResponse> {
    let tag = fetch_tag(&state, path.into_inner()).await?;
    let form_page = format!("/tags/{}/edit", tag.id);

    let input = match validate(&state, form.into_inner(), Some(tag.id)).await {
        Ok(input) => input,
        Err(e) => return flash::redirect_back(&form_page, e),
    };
    let name = input.name.clone();

    let tag = match state.tags.update(tag.id, input).await {
        Ok(tag) => tag,
        Err(RepoError::Duplicate(_)) => return flash::redirect_back(&form_page, name_taken(&name)),
        Err(e) => return Err(e.into()),
    };
    tracing::info!(tag_id = tag.id, name = %tag.name, "Tag renamed");

    Ok(flash::redirect_with(
        "/tags",
        FlashMessage::success(format!("Updated tag \"{}\"", tag.name)),
    ))
}

/// POST /tags/{id}/delete
///
/// Posts keep existing; only their links to the tag go.
pub async fn delete(state: web::Data<AppState>, path: web::Path<i32>) -> AppResult<HttpResponse> {
    let tag = fetch_tag(&state, path.into_inner()).await?;

    state.tags.delete(tag.id).await?;
    tracing::info!(tag_id = tag.id, name = %tag.name, "Tag deleted");

    Ok(flash::redirect_with(
        "/tags",
        FlashMessage::success(format!("Deleted tag \"{}\"", tag.name)),
    ))
}
