//! URI-addressed resources.

use nirs_core::{ControlError, NirsControlPlane};

pub const CATEGORIES_URI: &str = "list://categories";
pub const DEMOS_URI: &str = "list://demos";

/// `(uri template, name, description)` for each parameterized resource.
pub const TEMPLATES: &[(&str, &str, &str)] = &[
    (
        "category://{category}",
        "category",
        "Modules in one category, each with a one-line description.",
    ),
    (
        "module://{category}/{name}",
        "module",
        "Extracted metadata and full source of one module.",
    ),
    ("demo://{demo}", "demo", "Full code of a demo script."),
];

/// A parsed resource URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceUri {
    Categories,
    Demos,
    Category(String),
    Module { category: String, name: String },
    Demo(String),
}

impl ResourceUri {
    /// Returns `None` for unknown schemes and malformed paths.
    #[must_use]
    pub fn parse(uri: &str) -> Option<Self> {
        let (scheme, rest) = uri.split_once("://")?;
        if rest.is_empty() {
            return None;
        }
        match scheme {
            "list" => match rest {
                "categories" => Some(Self::Categories),
                "demos" => Some(Self::Demos),
                _ => None,
            },
            "category" if !rest.contains('/') => Some(Self::Category(rest.to_string())),
            "module" => {
                let (category, name) = rest.split_once('/')?;
                if category.is_empty() || name.is_empty() || name.contains('/') {
                    return None;
                }
                Some(Self::Module {
                    category: category.to_string(),
                    name: name.to_string(),
                })
            }
            "demo" if !rest.contains('/') => Some(Self::Demo(rest.to_string())),
            _ => None,
        }
    }

    /// Resolves the resource to its markdown document.
    ///
    /// # Errors
    /// Returns `ControlError` if a file backing the resource cannot be read.
    pub fn read(&self, control: &NirsControlPlane) -> Result<String, ControlError> {
        match self {
            Self::Categories => Ok(control.list_categories()),
            Self::Demos => control.list_demos(),
            Self::Category(category) => control.get_category(category),
            Self::Module { category, name } => control.get_module(category, name),
            Self::Demo(demo) => control.get_demo(demo),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_schemes() {
        assert_eq!(ResourceUri::parse("list://categories"), Some(ResourceUri::Categories));
        assert_eq!(ResourceUri::parse("list://demos"), Some(ResourceUri::Demos));
        assert_eq!(
            ResourceUri::parse("category://modules"),
            Some(ResourceUri::Category("modules".to_string()))
        );
        assert_eq!(
            ResourceUri::parse("module://modules/BandPassFilter"),
            Some(ResourceUri::Module {
                category: "modules".to_string(),
                name: "BandPassFilter".to_string(),
            })
        );
        assert_eq!(
            ResourceUri::parse("demo://basic_glm"),
            Some(ResourceUri::Demo("basic_glm".to_string()))
        );
    }

    #[test]
    fn rejects_malformed_uris() {
        for uri in [
            "list://other",
            "category://",
            "category://a/b",
            "module://modules",
            "module://modules/",
            "module:///Foo",
            "module://a/b/c",
            "file://etc/passwd",
            "modules",
        ] {
            assert_eq!(ResourceUri::parse(uri), None, "{uri}");
        }
    }
}
