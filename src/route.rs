//! Free-form route records.
//!
//! A route is one `[section]` of the rendered config. In an option file it is
//! written as a TOML table with a mandatory `route` key naming the section;
//! every other key is kept, in file order, as an [`Atom`].

use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};
use std::fmt;

use crate::atom::Atom;
use crate::ini::IniDocument;

/// Key that names the section. Removed from the section body.
pub const ROUTE_KEY: &str = "route";

#[derive(Debug, Clone, PartialEq)]
pub struct RouteRecord {
    /// Section header text.
    pub name: String,
    settings: Vec<(String, Atom)>,
}

impl RouteRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            settings: Vec::new(),
        }
    }

    /// Set a key, replacing an earlier value in place so ordering is stable.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Atom>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Atom>) {
        let key = key.into();
        let value = value.into();
        match self.settings.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.settings.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Atom> {
        self.settings.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn settings(&self) -> &[(String, Atom)] {
        &self.settings
    }

    /// Append this route as a section of `doc`.
    pub fn append_to(&self, doc: &mut IniDocument) {
        let section = doc.section(self.name.clone());
        for (key, value) in &self.settings {
            section.set(key.clone(), value);
        }
    }
}

struct RouteVisitor;

impl<'de> Visitor<'de> for RouteVisitor {
    type Value = RouteRecord;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a table with a `{}` key", ROUTE_KEY)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RouteRecord, A::Error> {
        let mut name: Option<String> = None;
        let mut settings = Vec::new();

        while let Some(key) = map.next_key::<String>()? {
            if key == ROUTE_KEY {
                if name.is_some() {
                    return Err(de::Error::duplicate_field(ROUTE_KEY));
                }
                name = Some(map.next_value()?);
            } else {
                let value: Atom = map.next_value()?;
                settings.push((key, value));
            }
        }

        let name = name.ok_or_else(|| de::Error::missing_field(ROUTE_KEY))?;
        Ok(RouteRecord { name, settings })
    }
}

impl<'de> Deserialize<'de> for RouteRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RouteVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(serde::Deserialize)]
    struct Doc {
        routes: Vec<RouteRecord>,
    }

    #[test]
    fn test_route_key_becomes_name() {
        let doc: Doc = toml::from_str(
            r#"
            [[routes]]
            route = "example.org"
            root = "/srv/gemini/example.org"
            "#,
        )
        .unwrap();

        let route = &doc.routes[0];
        assert_eq!(route.name, "example.org");
        assert!(route.get(ROUTE_KEY).is_none());
        assert_eq!(
            route.get("root"),
            Some(&Atom::Str("/srv/gemini/example.org".to_string()))
        );
    }

    #[test]
    fn test_keys_keep_file_order() {
        let doc: Doc = toml::from_str(
            r#"
            [[routes]]
            zebra = 1
            route = "a"
            apple = true
            mango = "m"
            "#,
        )
        .unwrap();

        let keys: Vec<&str> = doc.routes[0]
            .settings()
            .iter()
            .map(|(k, _)| k.as_str())
            .collect();
        assert_eq!(keys, ["zebra", "apple", "mango"]);
    }

    #[test]
    fn test_missing_route_key_is_rejected() {
        let err = toml::from_str::<Doc>("[[routes]]\nroot = \"/srv\"\n")
            .err()
            .expect("missing route key must fail");
        assert!(err.to_string().contains("route"), "unexpected error: {}", err);
    }

    #[test]
    fn test_non_string_route_name_is_rejected() {
        assert!(toml::from_str::<Doc>("[[routes]]\nroute = 5\n").is_err());
    }

    #[test]
    fn test_nested_table_value_is_rejected() {
        let text = "[[routes]]\nroute = \"a\"\n[routes.inner]\nx = 1\n";
        assert!(toml::from_str::<Doc>(text).is_err());
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let route = RouteRecord::new("a")
            .with("first", 1i64)
            .with("second", 2i64)
            .with("first", 3i64);
        assert_eq!(
            route.settings(),
            &[
                ("first".to_string(), Atom::Int(3)),
                ("second".to_string(), Atom::Int(2)),
            ]
        );
    }

    #[test]
    fn test_append_to_renders_section() {
        let mut doc = IniDocument::new();
        RouteRecord::new("example.org")
            .with("lang", "en")
            .with("auto-index", true)
            .append_to(&mut doc);
        assert_eq!(doc.render(), "[example.org]\nlang = en\nauto-index = true\n");
    }
}
