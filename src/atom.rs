//! Leaf values that can appear in a rendered config file.
//!
//! An [`Atom`] is the closed set of scalar types a free-form route record may
//! hold. Anything else (arrays, nested tables) is rejected while the option
//! file is being deserialized, so the renderer never has to handle it.

use serde::de::{self, Deserialize, Deserializer, Visitor};
use serde::{Serialize, Serializer};
use std::fmt;

/// A scalar config value.
#[derive(Debug, Clone, PartialEq)]
pub enum Atom {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl fmt::Display for Atom {
    /// Config-file encoding: `null`, `true`/`false`, decimal numbers,
    /// strings verbatim.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Null => f.write_str("null"),
            Atom::Bool(b) => write!(f, "{}", b),
            Atom::Int(i) => write!(f, "{}", i),
            Atom::Float(x) => {
                let text = x.to_string();
                // Keep floats distinguishable from integers
                if x.is_finite() && !text.contains('.') {
                    write!(f, "{}.0", text)
                } else {
                    f.write_str(&text)
                }
            }
            Atom::Str(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Atom {
    fn from(value: bool) -> Self {
        Atom::Bool(value)
    }
}

impl From<i64> for Atom {
    fn from(value: i64) -> Self {
        Atom::Int(value)
    }
}

impl From<f64> for Atom {
    fn from(value: f64) -> Self {
        Atom::Float(value)
    }
}

impl From<&str> for Atom {
    fn from(value: &str) -> Self {
        Atom::Str(value.to_string())
    }
}

impl From<String> for Atom {
    fn from(value: String) -> Self {
        Atom::Str(value)
    }
}

impl Serialize for Atom {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Atom::Null => serializer.serialize_unit(),
            Atom::Bool(b) => serializer.serialize_bool(*b),
            Atom::Int(i) => serializer.serialize_i64(*i),
            Atom::Float(x) => serializer.serialize_f64(*x),
            Atom::Str(s) => serializer.serialize_str(s),
        }
    }
}

struct AtomVisitor;

impl<'de> Visitor<'de> for AtomVisitor {
    type Value = Atom;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("null, a boolean, a number or a string")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Atom, E> {
        Ok(Atom::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Atom, E> {
        Ok(Atom::Null)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Atom, E> {
        Ok(Atom::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Atom, E> {
        Ok(Atom::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Atom, E> {
        i64::try_from(v)
            .map(Atom::Int)
            .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &"a 64-bit signed integer"))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Atom, E> {
        Ok(Atom::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Atom, E> {
        Ok(Atom::Str(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Atom, E> {
        Ok(Atom::Str(v))
    }
}

impl<'de> Deserialize<'de> for Atom {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AtomVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_renders_lowercase_word() {
        assert_eq!(Atom::Bool(true).to_string(), "true");
        assert_eq!(Atom::Bool(false).to_string(), "false");
    }

    #[test]
    fn test_numbers_render_as_decimal() {
        assert_eq!(Atom::Int(1965).to_string(), "1965");
        assert_eq!(Atom::Int(-3).to_string(), "-3");
        assert_eq!(Atom::Float(0.25).to_string(), "0.25");
        assert_eq!(Atom::Float(2.0).to_string(), "2.0");
    }

    #[test]
    fn test_string_renders_verbatim() {
        let atom = Atom::from("/srv/gemini/example.org  ");
        assert_eq!(atom.to_string(), "/srv/gemini/example.org  ");
    }

    #[test]
    fn test_null_renders_as_word() {
        assert_eq!(Atom::Null.to_string(), "null");
    }

    #[test]
    fn test_deserialize_scalars_from_toml() {
        #[derive(serde::Deserialize)]
        struct Doc {
            a: Atom,
            b: Atom,
            c: Atom,
            d: Atom,
        }

        let doc: Doc = toml::from_str("a = true\nb = 7\nc = 1.5\nd = \"x\"\n").unwrap();
        assert_eq!(doc.a, Atom::Bool(true));
        assert_eq!(doc.b, Atom::Int(7));
        assert_eq!(doc.c, Atom::Float(1.5));
        assert_eq!(doc.d, Atom::Str("x".to_string()));
    }

    #[test]
    fn test_deserialize_rejects_arrays() {
        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Doc {
            a: Atom,
        }

        let err = toml::from_str::<Doc>("a = [1, 2]\n").unwrap_err();
        assert!(
            err.to_string().contains("null, a boolean, a number or a string"),
            "unexpected error: {}",
            err
        );
    }

    #[test]
    fn test_json_null_is_atom_null() {
        let atom: Atom = serde_json::from_str("null").unwrap();
        assert_eq!(atom, Atom::Null);
        assert_eq!(serde_json::to_string(&Atom::Int(4)).unwrap(), "4");
    }
}
