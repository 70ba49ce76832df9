//! Input validation for mutations.
//!
//! Failures are reported field by field so the caller can re-render a form;
//! they never abort the request pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub const MAX_TITLE_LEN: usize = 256;
pub const MAX_USERNAME_LEN: usize = 150;
pub const MIN_PASSWORD_LEN: usize = 8;

/// Payload for creating or editing a post.
#[derive(Debug, Clone, Deserialize)]
pub struct PostInput {
    pub title: String,
    pub text: String,
    pub category_id: Uuid,
    pub location_id: Option<Uuid>,
    pub pub_date: DateTime<Utc>,
    #[serde(default = "default_published")]
    pub is_published: bool,
    pub image: Option<String>,
}

fn default_published() -> bool {
    true
}

impl PostInput {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        if self.title.trim().is_empty() {
            errors.push(FieldError::new("title", "title is required"));
        } else if self.title.len() > MAX_TITLE_LEN {
            errors.push(FieldError::new(
                "title",
                format!("title must be at most {MAX_TITLE_LEN} characters"),
            ));
        }
        if self.text.trim().is_empty() {
            errors.push(FieldError::new("text", "text is required"));
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Payload for creating or editing a comment.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentInput {
    pub text: String,
}

impl CommentInput {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        if self.text.trim().is_empty() {
            errors.push(FieldError::new("text", "comment text is required"));
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Payload for editing the viewer's own profile.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileInput {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl ProfileInput {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        validate_username(&self.username, &mut errors);
        if !self.email.contains('@') {
            errors.push(FieldError::new("email", "invalid email address"));
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Payload for registering a new account.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationInput {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub email: String,
}

impl RegistrationInput {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        validate_username(&self.username, &mut errors);
        if self.password.len() < MIN_PASSWORD_LEN {
            errors.push(FieldError::new(
                "password",
                format!("password must be at least {MIN_PASSWORD_LEN} characters"),
            ));
        }
        if !self.email.is_empty() && !self.email.contains('@') {
            errors.push(FieldError::new("email", "invalid email address"));
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

fn validate_username(username: &str, errors: &mut Vec<FieldError>) {
    if username.is_empty() {
        errors.push(FieldError::new("username", "username is required"));
    } else if username.len() > MAX_USERNAME_LEN {
        errors.push(FieldError::new(
            "username",
            format!("username must be at most {MAX_USERNAME_LEN} characters"),
        ));
    } else if !username
        .chars()
        .all(|c| c.is_alphanumeric() || "@.+-_".contains(c))
    {
        errors.push(FieldError::new(
            "username",
            "username may contain only letters, digits and @.+-_",
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_input() -> PostInput {
        PostInput {
            title: "A day in the mountains".into(),
            text: "It was windy.".into(),
            category_id: Uuid::new_v4(),
            location_id: None,
            pub_date: Utc::now(),
            is_published: true,
            image: None,
        }
    }

    #[test]
    fn valid_post_passes() {
        assert!(post_input().validate().is_ok());
    }

    #[test]
    fn empty_title_and_text_are_both_reported() {
        let input = PostInput {
            title: "  ".into(),
            text: String::new(),
            ..post_input()
        };
        let errors = input.validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["title", "text"]);
    }

    #[test]
    fn overlong_title_is_rejected() {
        let input = PostInput {
            title: "x".repeat(MAX_TITLE_LEN + 1),
            ..post_input()
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn empty_comment_text_is_rejected() {
        let errors = CommentInput { text: " \n".into() }.validate().unwrap_err();
        assert_eq!(errors[0].field, "text");
    }

    #[test]
    fn username_charset_is_enforced() {
        let input = ProfileInput {
            username: "has spaces".into(),
            email: "a@b.example".into(),
            first_name: String::new(),
            last_name: String::new(),
        };
        assert_eq!(input.validate().unwrap_err()[0].field, "username");

        let ok = ProfileInput {
            username: "ok.user+tag_1".into(),
            email: "a@b.example".into(),
            first_name: String::new(),
            last_name: String::new(),
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn short_password_is_rejected() {
        let input = RegistrationInput {
            username: "newcomer".into(),
            password: "short".into(),
            email: String::new(),
        };
        assert_eq!(input.validate().unwrap_err()[0].field, "password");
    }
}
