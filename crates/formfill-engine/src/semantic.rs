use formfill_common::dom::DomElement;

/// Tags that are directly interactive or fillable.
pub const SEMANTIC_TAGS: &[&str] = &["input", "textarea", "select", "button", "a", "label"];

/// ARIA roles that mark a widget the user can act on.
pub const SEMANTIC_ROLES: &[&str] = &[
    "button", "textbox", "link", "checkbox", "radio", "combobox", "searchbox", "switch",
];

pub fn is_semantic_tag(tag: &str) -> bool {
    SEMANTIC_TAGS.contains(&tag)
}

pub fn is_semantic_role(role: Option<&str>) -> bool {
    role.is_some_and(|r| SEMANTIC_ROLES.contains(&r))
}

/// `contenteditable` counts when present as `"true"` or bare (empty).
pub fn is_content_editable(value: Option<&str>) -> bool {
    matches!(value, Some("true") | Some(""))
}

pub fn is_semantic_element<E: DomElement>(element: &E) -> bool {
    is_semantic_tag(&element.tag())
        || is_semantic_role(element.attribute("role").as_deref())
        || is_content_editable(element.attribute("contenteditable").as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_membership() {
        for tag in ["input", "textarea", "select", "button", "a", "label"] {
            assert!(is_semantic_tag(tag), "{tag}");
        }
        assert!(!is_semantic_tag("div"));
        assert!(!is_semantic_tag("span"));
    }

    #[test]
    fn role_membership_is_exact() {
        assert!(is_semantic_role(Some("combobox")));
        assert!(!is_semantic_role(Some("Button")));
        assert!(!is_semantic_role(Some("dialog")));
        assert!(!is_semantic_role(None));
    }

    #[test]
    fn contenteditable_values() {
        assert!(is_content_editable(Some("true")));
        assert!(is_content_editable(Some("")));
        assert!(!is_content_editable(Some("false")));
        assert!(!is_content_editable(Some("plaintext-only")));
        assert!(!is_content_editable(None));
    }
}
