//! Post form - the validation boundary between submitted input and a
//! persistable [`Post`].
//!
//! A form is either unbound (blank, or initialised from an existing post
//! for editing) or bound to submitted [`PostInput`]. Validating a bound
//! form yields [`Validated::Valid`] with a ready-to-save post, or
//! [`Validated::Invalid`] carrying the submitted values and per-field
//! error messages for re-display.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Post, PostDraft};

pub const TITLE_MAX_LENGTH: usize = 200;
pub const AUTHOR_MAX_LENGTH: usize = 100;

const REQUIRED_MESSAGE: &str = "This field is required.";
const NULL_CHARACTER_MESSAGE: &str = "Null characters are not allowed.";

/// Raw submitted values. Missing keys deserialize as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: String,
}

impl From<&Post> for PostInput {
    fn from(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            content: post.content.clone(),
            author: post.author.clone(),
        }
    }
}

/// The editable fields of a post, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PostField {
    Title,
    Content,
    Author,
}

impl PostField {
    pub const ALL: [PostField; 3] = [PostField::Title, PostField::Content, PostField::Author];

    /// Form key as submitted by the browser.
    pub fn name(self) -> &'static str {
        match self {
            PostField::Title => "title",
            PostField::Content => "content",
            PostField::Author => "author",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PostField::Title => "Title",
            PostField::Content => "Content",
            PostField::Author => "Author",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            PostField::Title => "Enter title",
            PostField::Content => "Write your post content",
            PostField::Author => "Author name",
        }
    }

    pub fn max_length(self) -> Option<usize> {
        match self {
            PostField::Title => Some(TITLE_MAX_LENGTH),
            PostField::Content => None,
            PostField::Author => Some(AUTHOR_MAX_LENGTH),
        }
    }

    /// Rendered as a textarea rather than a single-line input.
    pub fn is_multiline(self) -> bool {
        matches!(self, PostField::Content)
    }

    fn value(self, input: &PostInput) -> &str {
        match self {
            PostField::Title => &input.title,
            PostField::Content => &input.content,
            PostField::Author => &input.author,
        }
    }
}

/// Error messages keyed by field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<PostField, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: PostField, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn get(&self, field: PostField) -> &[String] {
        self.0.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fields that failed validation, in display order.
    pub fn fields(&self) -> impl Iterator<Item = PostField> + '_ {
        self.0.keys().copied()
    }
}

/// Outcome of validating a bound form.
#[derive(Debug)]
pub enum Validated {
    Valid(Post),
    Invalid(PostForm),
}

#[derive(Debug, Clone, Default)]
pub struct PostForm {
    input: PostInput,
    errors: FieldErrors,
    bound: bool,
}

impl PostForm {
    /// Blank form for creating a post.
    pub fn unbound() -> Self {
        Self::default()
    }

    /// Unbound form pre-populated from an existing post.
    pub fn for_post(post: &Post) -> Self {
        Self {
            input: PostInput::from(post),
            ..Self::default()
        }
    }

    /// Form bound to submitted data, not yet validated.
    pub fn bind(input: PostInput) -> Self {
        Self {
            input,
            errors: FieldErrors::default(),
            bound: true,
        }
    }

    pub fn is_bound(&self) -> bool {
        self.bound
    }

    pub fn value(&self, field: PostField) -> &str {
        field.value(&self.input)
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Validate the bound input.
    ///
    /// With `instance` set the existing post is updated in place (keeping its
    /// id); otherwise a new post is built. Nothing is persisted here.
    pub fn validate(mut self, instance: Option<Post>) -> Validated {
        match clean(&self.input) {
            Ok(draft) => {
                let post = match instance {
                    Some(mut post) => {
                        post.apply(draft);
                        post
                    }
                    None => Post::new(draft),
                };
                Validated::Valid(post)
            }
            Err(errors) => {
                self.bound = true;
                self.errors = errors;
                Validated::Invalid(self)
            }
        }
    }
}

/// Strip and check every field, collecting all failures rather than
/// stopping at the first.
pub fn clean(input: &PostInput) -> Result<PostDraft, FieldErrors> {
    let mut errors = FieldErrors::default();

    let cleaned = PostField::ALL.map(|field| {
        let value = field.value(input).trim();
        if value.is_empty() {
            errors.add(field, REQUIRED_MESSAGE);
            return value.to_string();
        }
        if let Some(max) = field.max_length() {
            let length = value.chars().count();
            if length > max {
                errors.add(
                    field,
                    format!("Ensure this value has at most {max} characters (it has {length})."),
                );
            }
        }
        // PostgreSQL text columns cannot store NUL.
        if value.contains('\0') {
            errors.add(field, NULL_CHARACTER_MESSAGE);
        }
        value.to_string()
    });

    if !errors.is_empty() {
        return Err(errors);
    }

    let [title, content, author] = cleaned;
    Ok(PostDraft {
        title,
        content,
        author,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: &str, content: &str, author: &str) -> PostInput {
        PostInput {
            title: title.to_string(),
            content: content.to_string(),
            author: author.to_string(),
        }
    }

    #[test]
    fn test_valid_input_builds_new_post() {
        let form = PostForm::bind(input("Hello", "World", "Alice"));

        let Validated::Valid(post) = form.validate(None) else {
            panic!("expected valid form");
        };
        assert_eq!(post.title, "Hello");
        assert_eq!(post.content, "World");
        assert_eq!(post.author, "Alice");
    }

    #[test]
    fn test_values_are_stripped() {
        let draft = clean(&input("  Hello \n", "\tWorld  ", " Alice ")).unwrap();
        assert_eq!(draft.title, "Hello");
        assert_eq!(draft.content, "World");
        assert_eq!(draft.author, "Alice");
    }

    #[test]
    fn test_each_empty_field_is_reported() {
        for field in PostField::ALL {
            let mut data = input("Hello", "World", "Alice");
            match field {
                PostField::Title => data.title.clear(),
                PostField::Content => data.content = "   ".to_string(),
                PostField::Author => data.author.clear(),
            }

            let errors = clean(&data).unwrap_err();
            assert_eq!(errors.fields().collect::<Vec<_>>(), vec![field]);
            assert_eq!(errors.get(field), ["This field is required."]);
        }
    }

    #[test]
    fn test_all_errors_collected() {
        let errors = clean(&PostInput::default()).unwrap_err();
        assert_eq!(errors.fields().count(), 3);
    }

    #[test]
    fn test_length_limits_count_characters() {
        let title = "é".repeat(TITLE_MAX_LENGTH);
        assert!(clean(&input(&title, "World", "Alice")).is_ok());

        let too_long = "a".repeat(TITLE_MAX_LENGTH + 1);
        let errors = clean(&input(&too_long, "World", "Alice")).unwrap_err();
        assert_eq!(
            errors.get(PostField::Title),
            ["Ensure this value has at most 200 characters (it has 201)."]
        );

        let author = "b".repeat(AUTHOR_MAX_LENGTH + 1);
        let errors = clean(&input("Hello", "World", &author)).unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec![PostField::Author]);
    }

    #[test]
    fn test_null_characters_are_rejected() {
        let errors = clean(&input("a\0b", "World", "Alice")).unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec![PostField::Title]);
        assert_eq!(
            errors.get(PostField::Title),
            ["Null characters are not allowed."]
        );

        let errors = clean(&input("Hello", "line\0break", "Al\0ice")).unwrap_err();
        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            vec![PostField::Content, PostField::Author]
        );
    }

    #[test]
    fn test_invalid_form_keeps_submitted_values() {
        let form = PostForm::bind(input("", "Some text", "Bob"));

        let Validated::Invalid(form) = form.validate(None) else {
            panic!("expected invalid form");
        };
        assert!(form.is_bound());
        assert_eq!(form.value(PostField::Content), "Some text");
        assert_eq!(form.value(PostField::Author), "Bob");
        assert!(!form.errors().get(PostField::Title).is_empty());
        assert!(form.errors().get(PostField::Content).is_empty());
    }

    #[test]
    fn test_update_preserves_id() {
        let Validated::Valid(original) =
            PostForm::bind(input("Hello", "World", "Alice")).validate(None)
        else {
            panic!("expected valid form");
        };

        let form = PostForm::bind(input("Hello again", "More", "Alice"));
        let Validated::Valid(updated) = form.validate(Some(original.clone())) else {
            panic!("expected valid form");
        };

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.created_at, original.created_at);
        assert_eq!(updated.title, "Hello again");
        assert_eq!(updated.content, "More");
    }

    #[test]
    fn test_edit_form_is_prepopulated_and_unbound() {
        let Validated::Valid(post) =
            PostForm::bind(input("Hello", "World", "Alice")).validate(None)
        else {
            panic!("expected valid form");
        };

        let form = PostForm::for_post(&post);
        assert!(!form.is_bound());
        assert_eq!(form.value(PostField::Title), "Hello");
        assert!(form.errors().is_empty());
    }
}
