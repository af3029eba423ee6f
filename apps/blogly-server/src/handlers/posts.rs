//! Post pages. Posts are created from their author's page.

use actix_web::{HttpResponse, web};
use tera::Context;

use blogly_core::{DomainError, RepoError};
use blogly_core::domain::PostInput;
use blogly_shared::PostForm;

use super::{fetch_post, fetch_user, render};
use crate::flash::{self, FlashMessage, IncomingFlashes};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// Raw `application/x-www-form-urlencoded` pairs; `tag_ids` repeats.
type FormPairs = web::Form<Vec<(String, String)>>;

fn tag_gone() -> DomainError {
    DomainError::Validation("One of the selected tags no longer exists".to_string())
}

/// Validate a submitted post form, including that every checked tag exists.
async fn validate(state: &AppState, pairs: Vec<(String, String)>) -> Result<PostInput, DomainError> {
    let form = PostForm::from_pairs(pairs);
    let tag_ids = form
        .parsed_tag_ids()
        .map_err(|e| DomainError::Validation(e.to_string()))?;
    let input = PostInput::new(form.title.as_deref(), form.content.as_deref(), tag_ids)?;

    let known = state
        .tags
        .find_by_ids(&input.tag_ids)
        .await
        .map_err(|e| DomainError::Internal(e.to_string()))?;
    if known.len() != input.tag_ids.len() {
        return Err(tag_gone());
    }

    Ok(input)
}

/// GET /users/{id}/posts/new
pub async fn new_form(
    state: web::Data<AppState>,
    flashes: IncomingFlashes,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let user = fetch_user(&state, path.into_inner()).await?;
    let tags = state.tags.list().await?;

    let mut ctx = Context::new();
    ctx.insert("user", &user);
    ctx.insert("tags", &tags);
    ctx.insert("selected", &Vec::<i32>::new());
    render(&state, &flashes, "posts/new.html", ctx)
}

/// POST /users/{id}/posts/new
pub async fn create(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    form: FormPairs,
) -> AppResult<HttpResponse> {
    let user = fetch_user(&state, path.into_inner()).await?;

    let form_page = format!("/users/{}/posts/new", user.id);

    let input = match validate(&state, form.into_inner()).await {
        Ok(input) => input,
        Err(e) => return flash::redirect_back(&form_page, e),
    };

    let post = match state.posts.create(user.id, input).await {
        Ok(post) => post,
        // A checked tag was deleted after validation.
        Err(RepoError::Constraint(_)) => return flash::redirect_back(&form_page, tag_gone()),
        Err(e) => return Err(e.into()),
    };
    tracing::info!(post_id = post.id, user_id = user.id, "Post created");

    Ok(flash::redirect_with(
        &format!("/users/{}", user.id),
        FlashMessage::success(format!("Added \"{}\"", post.title)),
    ))
}

/// GET /posts/{id}
pub async fn show(
    state: web::Data<AppState>,
    flashes: IncomingFlashes,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let post = fetch_post(&state, path.into_inner()).await?;
    let author = fetch_user(&state, post.user_id).await?;
    let tags = state.posts.find_tags(post.id).await?;

    let mut ctx = Context::new();
    ctx.insert("post", &post);
    ctx.insert("author", &author);
    ctx.insert("tags", &tags);
    render(&state, &flashes, "posts/detail.html", ctx)
}

/// GET /posts/{id}/edit
pub async fn edit_form(
    state: web::Data<AppState>,
    flashes: IncomingFlashes,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let post = fetch_post(&state, path.into_inner()).await?;
    let tags = state.tags.list().await?;
    let selected: Vec<i32> = state
        .posts
        .find_tags(post.id)
        .await?
        .into_iter()
        .map(|t| t.id)
        .collect();

    let mut ctx = Context::new();
    ctx.insert("post", &post);
    ctx.insert("tags", &tags);
    ctx.insert("selected", &selected);
    render(&state, &flashes, "posts/edit.html", ctx)
}

/// POST /posts/{id}/edit
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    form: FormPairs,
) -> AppResult<HttpResponse> {
    let post = fetch_post(&state, path.into_inner()).await?;

    let form_page = format!("/posts/{}/edit", post.id);

    let input = match validate(&state, form.into_inner()).await {
        Ok(input) => input,
        Err(e) => return flash::redirect_back(&form_page, e),
    };

    let post = match state.posts.update(post.id, input).await {
        Ok(post) => post,
        Err(RepoError::Constraint(_)) => return flash::redirect_back(&form_page, tag_gone()),
        Err(e) => return Err(e.into()),
    };
    tracing::info!(post_id = post.id, "Post updated");

    Ok(flash::redirect_with(
        &format!("/posts/{}", post.id),
        FlashMessage::success("Post updated"),
    ))
}

/// POST /posts/{id}/delete
///
/// Tag links go with the post.
pub async fn delete(state: web::Data<AppState>, path: web::Path<i32>) -> AppResult<HttpResponse> {
    let post = fetch_post(&state, path.into_inner()).await?;

    state.posts.delete(post.id).await?;
    tracing::info!(post_id = post.id, user_id = post.user_id, "Post deleted");

    Ok(flash::redirect_with(
        &format!("/users/{}", post.user_id),
        FlashMessage::success(format!("Deleted \"{}\"", post.title)),
    ))
}
