//! Naming conventions
//!
//! Every identifier in the generated project derives from the declared
//! entity names through the helpers in this module. Table case splits on
//! every uppercase letter rather than on word boundaries, so `APIKey`
//! becomes `a_p_i_key` and not `api_key`. The transformation is not
//! invertible; the resolver always carries the original entity name
//! alongside any derived identifier.

/// Convert an entity name to its table form.
///
/// A `_` is inserted before every uppercase letter except the first
/// character, then the whole string is lowercased.
///
/// # Example
///
/// ```
/// use crudforge_schema::naming::to_table_case;
///
/// assert_eq!(to_table_case("UserProfile"), "user_profile");
/// assert_eq!(to_table_case("APIKey"), "a_p_i_key");
/// ```
pub fn to_table_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_ascii_uppercase() && i > 0 {
            out.push('_');
        }
        out.extend(ch.to_lowercase());
    }
    out
}

/// Convert an entity name to its URL path form.
///
/// Same splitting rule as [`to_table_case`], joined with `-` instead of `_`.
pub fn to_dash_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_ascii_uppercase() && i > 0 {
            out.push('-');
        }
        out.extend(ch.to_lowercase());
    }
    out
}

/// Lowercase the first character, leaving the rest untouched.
///
/// Entity names are PascalCase, so this yields the camelCase variable
/// name used for model instances.
pub fn to_lower_camel(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Default foreign key column name for a target entity.
pub fn foreign_key_for(entity_name: &str) -> String {
    format!("{}_id", to_table_case(entity_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_table_case_simple() {
        assert_eq!(to_table_case("User"), "user");
        assert_eq!(to_table_case("UserProfile"), "user_profile");
    }

    #[test]
    fn test_table_case_splits_every_uppercase() {
        assert_eq!(to_table_case("APIKey"), "a_p_i_key");
        assert_eq!(to_table_case("OAuthToken"), "o_auth_token");
    }

    #[test]
    fn test_dash_case() {
        assert_eq!(to_dash_case("UserProfile"), "user-profile");
        assert_eq!(to_dash_case("Store"), "store");
    }

    #[test]
    fn test_lower_camel_only_touches_first_char() {
        assert_eq!(to_lower_camel("UserProfile"), "userProfile");
        assert_eq!(to_lower_camel("APIKey"), "aPIKey");
        assert_eq!(to_lower_camel(""), "");
    }

    #[test]
    fn test_foreign_key_default() {
        assert_eq!(foreign_key_for("User"), "user_id");
        assert_eq!(foreign_key_for("BlogPost"), "blog_post_id");
    }
}
