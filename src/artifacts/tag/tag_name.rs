use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::tag::{HEAD_REF_NAME, INVALID_TAG_NAME_REGEX, REF_ALIASES};
use crate::errors::{RepositoryError, Result};
use std::sync::LazyLock;

static INVALID_TAG_NAME: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(INVALID_TAG_NAME_REGEX).expect("tag name regex is valid")
});

/// Name of an entry in the tag namespace
///
/// Names follow the usual ref naming rules; they may be hierarchical
/// (`release/1.0`) and are compared case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagName(String);

impl TagName {
    pub fn try_parse(name: &str) -> Result<Self> {
        let invalid = |reason: &str| RepositoryError::InvalidTagName {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        if name.is_empty() {
            return Err(invalid("tag name cannot be empty"));
        }
        if INVALID_TAG_NAME.is_match(name) {
            return Err(invalid("contains a forbidden character or sequence"));
        }
        if name == HEAD_REF_NAME || REF_ALIASES.contains_key(name) {
            return Err(invalid("reserved reference name"));
        }
        if ObjectId::is_full_hex(name) {
            return Err(invalid("would be ambiguous with a commit id"));
        }

        Ok(Self(name.to_string()))
    }
}

impl AsRef<str> for TagName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TagName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::proptest;
    use rstest::rstest;

    proptest! {
        #[test]
        fn accepts_plain_and_hierarchical_names(
            prefix in "[a-zA-Z0-9_-]+",
            suffix in "[a-zA-Z0-9_-]+"
        ) {
            assert!(TagName::try_parse(&prefix).is_ok());
            assert!(TagName::try_parse(&format!("{prefix}/{suffix}")).is_ok());
        }

        #[test]
        fn rejects_special_characters(
            prefix in "[a-zA-Z0-9_-]+",
            suffix in "[a-zA-Z0-9_-]+",
            special_char in r"[\*:\?\[\\^~ ]"
        ) {
            let name = format!("{prefix}{special_char}{suffix}");
            assert!(matches!(
                TagName::try_parse(&name),
                Err(RepositoryError::InvalidTagName { .. })
            ));
        }
    }

    #[rstest]
    #[case("v1.0")]
    #[case("release/2024-01")]
    #[case("Release_Candidate")]
    fn accepts_common_tag_names(#[case] name: &str) {
        assert_eq!(TagName::try_parse(name).unwrap().as_ref(), name);
    }

    #[rstest]
    #[case("")]
    #[case(".hidden")]
    #[case("a/.hidden")]
    #[case("a..b")]
    #[case("/leading")]
    #[case("trailing/")]
    #[case("double//slash")]
    #[case("name.lock")]
    #[case("at@{brace")]
    #[case("HEAD")]
    #[case("@")]
    #[case("0123456789abcdef0123456789abcdef01234567")]
    fn rejects_invalid_tag_names(#[case] name: &str) {
        assert!(TagName::try_parse(name).is_err(), "{name:?} should be rejected");
    }
}
