//! Server-rendered pages and the view models behind them.

use actix_web::{HttpResponse, http::StatusCode, http::header::ContentType};
use askama::Template;

use blog_core::domain::Post;
use blog_core::form::{PostField, PostForm};

use crate::middleware::error::{AppError, AppResult};

/// URL builders for every page, so handlers and templates agree on paths.
pub mod paths {
    use uuid::Uuid;

    pub fn post_list() -> String {
        "/posts/".to_string()
    }

    pub fn post_create() -> String {
        "/posts/new/".to_string()
    }

    pub fn post_detail(id: Uuid) -> String {
        format!("/posts/{id}/")
    }

    pub fn post_edit(id: Uuid) -> String {
        format!("/posts/{id}/edit/")
    }

    pub fn post_delete(id: Uuid) -> String {
        format!("/posts/{id}/delete/")
    }
}

const TIMESTAMP_FORMAT: &str = "%B %-d, %Y %H:%M UTC";
const CONTENT_ROWS: usize = 8;

#[derive(Clone)]
pub struct PostView {
    pub title: String,
    pub content: String,
    pub author: String,
    pub created_at: String,
    pub updated_at: Option<String>,
    pub detail_href: String,
    pub edit_href: String,
    pub delete_href: String,
}

impl From<&Post> for PostView {
    fn from(post: &Post) -> Self {
        let edited = post.updated_at > post.created_at;
        Self {
            title: post.title.clone(),
            content: post.content.clone(),
            author: post.author.clone(),
            created_at: post.created_at.format(TIMESTAMP_FORMAT).to_string(),
            updated_at: edited.then(|| post.updated_at.format(TIMESTAMP_FORMAT).to_string()),
            detail_href: paths::post_detail(post.id),
            edit_href: paths::post_edit(post.id),
            delete_href: paths::post_delete(post.id),
        }
    }
}

#[derive(Clone)]
pub struct FieldView {
    pub name: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub value: String,
    pub errors: Vec<String>,
    pub max_length: Option<usize>,
    pub multiline: bool,
    pub rows: usize,
}

#[derive(Clone)]
pub struct FormView {
    pub fields: Vec<FieldView>,
    pub has_errors: bool,
}

impl From<&PostForm> for FormView {
    fn from(form: &PostForm) -> Self {
        let fields = PostField::ALL
            .into_iter()
            .map(|field| FieldView {
                name: field.name(),
                label: field.label(),
                placeholder: field.placeholder(),
                value: form.value(field).to_string(),
                errors: form.errors().get(field).to_vec(),
                max_length: field.max_length(),
                multiline: field.is_multiline(),
                rows: CONTENT_ROWS,
            })
            .collect();

        Self {
            fields,
            has_errors: !form.errors().is_empty(),
        }
    }
}

#[derive(Template)]
#[template(path = "posts/list.html")]
pub struct PostListTemplate {
    pub posts: Vec<PostView>,
    pub new_post_href: String,
}

impl PostListTemplate {
    pub fn new(posts: &[Post]) -> Self {
        Self {
            posts: posts.iter().map(PostView::from).collect(),
            new_post_href: paths::post_create(),
        }
    }
}

#[derive(Template)]
#[template(path = "posts/detail.html")]
pub struct PostDetailTemplate {
    pub post: PostView,
    pub list_href: String,
}

impl PostDetailTemplate {
    pub fn new(post: &Post) -> Self {
        Self {
            post: PostView::from(post),
            list_href: paths::post_list(),
        }
    }
}

#[derive(Template)]
#[template(path = "posts/form.html")]
pub struct PostFormTemplate {
    pub heading: &'static str,
    pub action: String,
    pub submit_label: &'static str,
    pub cancel_href: String,
    pub form: FormView,
    pub post: Option<PostView>,
}

impl PostFormTemplate {
    pub fn create(form: &PostForm) -> Self {
        Self {
            heading: "Create Post",
            action: paths::post_create(),
            submit_label: "Create",
            cancel_href: paths::post_list(),
            form: FormView::from(form),
            post: None,
        }
    }

    /// `post` is the stored record, not the submitted values.
    pub fn edit(form: &PostForm, post: &Post) -> Self {
        Self {
            heading: "Edit Post",
            action: paths::post_edit(post.id),
            submit_label: "Save",
            cancel_href: paths::post_detail(post.id),
            form: FormView::from(form),
            post: Some(PostView::from(post)),
        }
    }
}

#[derive(Template)]
#[template(path = "posts/confirm_delete.html")]
pub struct PostConfirmDeleteTemplate {
    pub post: PostView,
}

impl PostConfirmDeleteTemplate {
    pub fn new(post: &Post) -> Self {
        Self {
            post: PostView::from(post),
        }
    }
}

#[derive(Template)]
#[template(path = "errors/error.html")]
pub struct ErrorTemplate {
    pub status: u16,
    pub title: &'static str,
    pub detail: Option<String>,
    pub list_href: String,
}

impl ErrorTemplate {
    pub fn new(status: StatusCode, title: &'static str, detail: Option<String>) -> Self {
        Self {
            status: status.as_u16(),
            title,
            detail,
            list_href: paths::post_list(),
        }
    }
}

/// Render a page as `200 OK`.
pub fn render<T: Template>(template: &T) -> AppResult<HttpResponse> {
    render_with_status(template, StatusCode::OK)
}

pub fn render_with_status<T: Template>(template: &T, status: StatusCode) -> AppResult<HttpResponse> {
    let body = template
        .render()
        .map_err(|e| AppError::Internal(format!("template rendering failed: {e}")))?;

    Ok(HttpResponse::build(status)
        .content_type(ContentType::html())
        .body(body))
}

#[cfg(test)]
mod tests {
    use blog_core::domain::PostDraft;
    use blog_core::form::{PostInput, Validated};
    use uuid::Uuid;

    use super::*;

    fn post() -> Post {
        Post::new(PostDraft {
            title: "Hello".to_string(),
            content: "World".to_string(),
            author: "Alice".to_string(),
        })
    }

    #[test]
    fn test_paths() {
        let id = Uuid::nil();
        assert_eq!(
            paths::post_detail(id),
            "/posts/00000000-0000-0000-0000-000000000000/"
        );
        assert!(paths::post_edit(id).ends_with("/edit/"));
        assert!(paths::post_delete(id).ends_with("/delete/"));
    }

    #[test]
    fn test_fresh_post_has_no_edit_timestamp() {
        let view = PostView::from(&post());
        assert!(view.updated_at.is_none());
    }

    #[test]
    fn test_form_view_carries_errors_in_field_order() {
        let Validated::Invalid(form) = PostForm::bind(PostInput::default()).validate(None) else {
            panic!("expected invalid form");
        };

        let view = FormView::from(&form);
        let names: Vec<_> = view.fields.iter().map(|f| f.name).collect();
        assert_eq!(names, ["title", "content", "author"]);
        assert!(view.has_errors);
        assert!(view.fields.iter().all(|f| !f.errors.is_empty()));
        assert!(view.fields[1].multiline);
    }

    #[test]
    fn test_detail_escapes_user_content() {
        let mut post = post();
        post.title = "<script>alert(1)</script>".to_string();

        let html = PostDetailTemplate::new(&post).render().unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&#60;script&#62;"));
    }
}
