//! Post handlers: list, detail, create, update, delete.

use actix_web::{HttpResponse, http::header, web};
use uuid::Uuid;

use blog_core::DomainError;
use blog_core::domain::Post;
use blog_core::form::{PostForm, PostInput, Validated};

use crate::middleware::error::AppResult;
use crate::state::AppState;
use crate::views::{
    PostConfirmDeleteTemplate, PostDetailTemplate, PostFormTemplate, PostListTemplate, paths,
    render,
};

fn redirect(location: String) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

async fn load_post(state: &AppState, id: Uuid) -> AppResult<Post> {
    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::post_not_found(id))?;
    Ok(post)
}

/// GET /
pub async fn index() -> HttpResponse {
    redirect(paths::post_list())
}

/// GET /posts/
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.find_all().await?;
    render(&PostListTemplate::new(&posts))
}

/// GET /posts/{id}/
pub async fn detail(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let post = load_post(&state, path.into_inner()).await?;
    render(&PostDetailTemplate::new(&post))
}

/// GET /posts/new/
pub async fn create_form() -> AppResult<HttpResponse> {
    render(&PostFormTemplate::create(&PostForm::unbound()))
}

/// POST /posts/new/
pub async fn create(
    state: web::Data<AppState>,
    body: web::Form<PostInput>,
) -> AppResult<HttpResponse> {
    match PostForm::bind(body.into_inner()).validate(None) {
        Validated::Valid(post) => {
            let post = state.posts.save(post).await?;
            tracing::info!(post_id = %post.id, "Post created");
            Ok(redirect(paths::post_detail(post.id)))
        }
        Validated::Invalid(form) => {
            tracing::debug!(fields = ?form.errors().fields().collect::<Vec<_>>(), "Rejected new post");
            render(&PostFormTemplate::create(&form))
        }
    }
}

/// GET /posts/{id}/edit/
pub async fn edit_form(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = load_post(&state, path.into_inner()).await?;
    render(&PostFormTemplate::edit(&PostForm::for_post(&post), &post))
}

/// POST /posts/{id}/edit/
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Form<PostInput>,
) -> AppResult<HttpResponse> {
    let existing = load_post(&state, path.into_inner()).await?;

    match PostForm::bind(body.into_inner()).validate(Some(existing.clone())) {
        Validated::Valid(post) => {
            let post = state.posts.save(post).await?;
            tracing::info!(post_id = %post.id, "Post updated");
            Ok(redirect(paths::post_detail(post.id)))
        }
        Validated::Invalid(form) => {
            tracing::debug!(
                post_id = %existing.id,
                fields = ?form.errors().fields().collect::<Vec<_>>(),
                "Rejected post edit"
            );
            render(&PostFormTemplate::edit(&form, &existing))
        }
    }
}

/// GET /posts/{id}/delete/
pub async fn confirm_delete(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = load_post(&state, path.into_inner()).await?;
    render(&PostConfirmDeleteTemplate::new(&post))
}

/// POST /posts/{id}/delete/
pub async fn delete(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let post = load_post(&state, path.into_inner()).await?;
    state.posts.delete(post.id).await?;
    tracing::info!(post_id = %post.id, "Post deleted");
    Ok(redirect(paths::post_list()))
}
