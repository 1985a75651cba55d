//! Type paths — canonical identifiers like `skills/scm/git/commit-analyzer`.
//!
//! The first segment is always a category plural; everything after it is the
//! type's directory path inside that category. Type paths are the only
//! cross-type reference form and are case-sensitive.

use crate::error::{Error, Result};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The six type kinds. `plural()` names the category directory under a
/// source base; `singular()` names the kind itself (and the `<singular>.yaml`
/// manifest fallback).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Context,
    Persona,
    Skill,
    Workflow,
    Prompt,
    Template,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Context,
        Category::Persona,
        Category::Skill,
        Category::Workflow,
        Category::Prompt,
        Category::Template,
    ];

    pub fn singular(self) -> &'static str {
        match self {
            Self::Context => "context",
            Self::Persona => "persona",
            Self::Skill => "skill",
            Self::Workflow => "workflow",
            Self::Prompt => "prompt",
            Self::Template => "template",
        }
    }

    // "context" is its own plural; the category directory shares the name.
    pub fn plural(self) -> &'static str {
        match self {
            Self::Context => "context",
            Self::Persona => "personas",
            Self::Skill => "skills",
            Self::Workflow => "workflows",
            Self::Prompt => "prompts",
            Self::Template => "templates",
        }
    }

    pub fn from_plural(s: &str) -> Option<Category> {
        Self::ALL.into_iter().find(|c| c.plural() == s)
    }

    pub fn from_singular(s: &str) -> Option<Category> {
        Self::ALL.into_iter().find(|c| c.singular() == s)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.singular())
    }
}

/// A validated type path: `<category-plural>/<segments>/<name>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypePath {
    path: String,
    category: Category,
}

impl TypePath {
    /// Parse and validate. Rejects unknown category prefixes, empty
    /// segments, and paths with fewer than two segments.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::invalid_type_path(s, "empty"));
        }
        if s.starts_with('/') || s.ends_with('/') {
            return Err(Error::invalid_type_path(s, "leading or trailing slash"));
        }
        let mut segments = s.split('/');
        let first = segments.next().unwrap_or_default();
        let category = Category::from_plural(first)
            .ok_or_else(|| Error::invalid_type_path(s, format!("unknown category '{}'", first)))?;
        let mut rest = 0;
        for seg in segments {
            if seg.is_empty() {
                return Err(Error::invalid_type_path(s, "empty segment"));
            }
            rest += 1;
        }
        if rest == 0 {
            return Err(Error::invalid_type_path(s, "missing type name after category"));
        }
        Ok(Self {
            path: s.to_string(),
            category,
        })
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// Last segment — the type's own name.
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Path with the leading category segment stripped.
    pub fn without_category(&self) -> &str {
        self.path
            .split_once('/')
            .map(|(_, rest)| rest)
            .unwrap_or(&self.path)
    }

    /// Link-sync directory name: category stripped, slashes flattened to
    /// hyphens (`context/spring-boot/error-handling` → `spring-boot-error-handling`).
    pub fn flattened(&self) -> String {
        self.without_category().replace('/', "-")
    }
}

impl std::fmt::Display for TypePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path)
    }
}

impl std::str::FromStr for TypePath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for TypePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.path)
    }
}

impl<'de> Deserialize<'de> for TypePath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        TypePath::parse(&s).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singular_plural_map() {
        assert_eq!(Category::Context.plural(), "context");
        assert_eq!(Category::Persona.plural(), "personas");
        assert_eq!(Category::from_plural("skills"), Some(Category::Skill));
        assert_eq!(Category::from_plural("skill"), None);
        assert_eq!(Category::from_singular("workflow"), Some(Category::Workflow));
        for c in Category::ALL {
            assert_eq!(Category::from_plural(c.plural()), Some(c));
            assert_eq!(Category::from_singular(c.singular()), Some(c));
        }
    }

    #[test]
    fn parse_valid() {
        let tp = TypePath::parse("skills/scm/git/commit-analyzer").unwrap();
        assert_eq!(tp.category(), Category::Skill);
        assert_eq!(tp.name(), "commit-analyzer");
        assert_eq!(tp.without_category(), "scm/git/commit-analyzer");
        assert_eq!(tp.as_str(), "skills/scm/git/commit-analyzer");
    }

    #[test]
    fn parse_rejects_unknown_category() {
        assert!(TypePath::parse("widgets/foo").is_err());
        assert!(TypePath::parse("skill/foo").is_err()); // singular is not a category dir
    }

    #[test]
    fn parse_rejects_bare_category() {
        assert!(TypePath::parse("skills").is_err());
        assert!(TypePath::parse("").is_err());
        assert!(TypePath::parse("skills//x").is_err());
        assert!(TypePath::parse("/skills/x").is_err());
    }

    #[test]
    fn flattened_strips_category_and_hyphenates() {
        let tp = TypePath::parse("context/spring-boot/error-handling").unwrap();
        assert_eq!(tp.flattened(), "spring-boot-error-handling");
        let tp = TypePath::parse("personas/senior-java-dev").unwrap();
        assert_eq!(tp.flattened(), "senior-java-dev");
    }

    #[test]
    fn serde_roundtrip() {
        let tp = TypePath::parse("prompts/code-review").unwrap();
        let json = serde_json::to_string(&tp).unwrap();
        assert_eq!(json, "\"prompts/code-review\"");
        let back: TypePath = serde_json::from_str(&json).unwrap();
        assert_eq!(tp, back);
        assert!(serde_json::from_str::<TypePath>("\"nope/x\"").is_err());
    }
}
