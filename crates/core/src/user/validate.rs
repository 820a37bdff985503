//! Checks applied to user bodies before passwords are hashed.
use super::model::{NewUser, UserUpdate};
use crate::validation::{is_email, ValidationErrors};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_NAME_LEN: usize = 120;

fn check_email(email: &str, errors: &mut ValidationErrors) {
    if email.trim().is_empty() {
        errors.push("email", "is required");
    } else if !is_email(email.trim()) {
        errors.push("email", "must be a valid email address");
    }
}

fn check_password(password: &str, errors: &mut ValidationErrors) {
    if password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(
            "password",
            format!("must be at least {MIN_PASSWORD_LEN} characters"),
        );
    }
}

fn check_name(name: &str, errors: &mut ValidationErrors) {
    if name.chars().count() > MAX_NAME_LEN {
        errors.push("name", format!("must be at most {MAX_NAME_LEN} characters"));
    }
}

pub fn validate_new_user(user: &NewUser) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_email(&user.email, &mut errors);
    check_password(&user.password, &mut errors);
    check_name(&user.name, &mut errors);
    errors.into_result(())
}

pub fn validate_user_update(update: &UserUpdate) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if let Some(email) = &update.email {
        check_email(email, &mut errors);
    }
    if let Some(password) = &update.password {
        check_password(password, &mut errors);
    }
    if let Some(name) = &update.name {
        check_name(name, &mut errors);
    }
    errors.into_result(())
}

/// Emails are compared case-insensitively; store them lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str, password: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password: password.to_string(),
            name: "Guest".to_string(),
            role: None,
        }
    }

    #[test]
    fn accepts_valid_registration() {
        assert!(validate_new_user(&new_user("guest@example.com", "long enough")).is_ok());
    }

    #[test]
    fn rejects_short_password_and_bad_email() {
        let errors = validate_new_user(&new_user("guest", "short")).unwrap_err();
        let fields: Vec<_> = errors.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["email", "password"]);
    }

    #[test]
    fn update_checks_only_present_fields() {
        assert!(validate_user_update(&UserUpdate::default()).is_ok());
        let update = UserUpdate {
            password: Some("123".to_string()),
            ..UserUpdate::default()
        };
        assert!(validate_user_update(&update).is_err());
    }

    #[test]
    fn normalizes_email() {
        assert_eq!(normalize_email("  Admin@Carlton.MG "), "admin@carlton.mg");
    }
}
