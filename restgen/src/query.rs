//! Query string assembly.
//!
//! Generated methods push every query binding in declaration order and
//! append [`QueryBuilder::finish`] to the path:
//!
//! ```
//! use restgen::{QueryBuilder, ValuePolicy};
//!
//! let mut query = QueryBuilder::new();
//! query.push("page", &2u32, ValuePolicy::OmitNullOrDefault);
//! query.push("per_page", &50u32, ValuePolicy::OmitNullOrDefault);
//! query.push("state", &None::<String>, ValuePolicy::OmitNullOrDefault);
//! assert_eq!(query.finish(), "?page=2&per_page=50");
//! ```

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

pub use restgen_define::ValuePolicy;

/// Characters left unescaped in query keys and values (RFC 3986 unreserved).
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// A value that can be written to the query string.
pub trait QueryValue {
    /// Renders the value, or `None` when the value is null.
    fn to_query(&self) -> Option<String>;

    /// Returns `true` when the value equals its type's default.
    fn is_default(&self) -> bool;
}

/// Accumulates `key=value` pairs, percent-encoding both sides.
#[derive(Debug, Default, Clone)]
pub struct QueryBuilder {
    pairs: Vec<(String, String)>,
}

impl QueryBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `key` with `value` unless `policy` omits it.
    pub fn push<V: QueryValue + ?Sized>(&mut self, key: &str, value: &V, policy: ValuePolicy) {
        let rendered = match value.to_query() {
            Some(_) if policy == ValuePolicy::OmitNullOrDefault && value.is_default() => return,
            Some(rendered) => rendered,
            None if policy == ValuePolicy::Always => String::new(),
            None => return,
        };

        self.pairs.push((encode(key), encode(&rendered)));
    }

    /// Returns `true` if no pair has been written.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Renders the query string, `?` included, or an empty string.
    pub fn finish(&self) -> String {
        if self.pairs.is_empty() {
            return String::new();
        }

        let joined = self
            .pairs
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&");
        format!("?{joined}")
    }
}

fn encode(raw: &str) -> String {
    utf8_percent_encode(raw, QUERY_COMPONENT).to_string()
}

impl<T: QueryValue + ?Sized> QueryValue for &T {
    fn to_query(&self) -> Option<String> {
        (**self).to_query()
    }

    fn is_default(&self) -> bool {
        (**self).is_default()
    }
}

impl<T: QueryValue> QueryValue for Option<T> {
    fn to_query(&self) -> Option<String> {
        self.as_ref().and_then(QueryValue::to_query)
    }

    fn is_default(&self) -> bool {
        self.as_ref().is_none_or(QueryValue::is_default)
    }
}

impl QueryValue for str {
    fn to_query(&self) -> Option<String> {
        Some(self.to_string())
    }

    fn is_default(&self) -> bool {
        self.is_empty()
    }
}

impl QueryValue for String {
    fn to_query(&self) -> Option<String> {
        Some(self.clone())
    }

    fn is_default(&self) -> bool {
        self.is_empty()
    }
}

impl QueryValue for bool {
    fn to_query(&self) -> Option<String> {
        Some(self.to_string())
    }

    fn is_default(&self) -> bool {
        !*self
    }
}

impl QueryValue for char {
    fn to_query(&self) -> Option<String> {
        Some(self.to_string())
    }

    fn is_default(&self) -> bool {
        *self == '\0'
    }
}

/// Lists are written as one comma-separated value.
impl<T: QueryValue> QueryValue for [T] {
    fn to_query(&self) -> Option<String> {
        let items: Vec<String> = self.iter().filter_map(QueryValue::to_query).collect();
        Some(items.join(","))
    }

    fn is_default(&self) -> bool {
        self.is_empty()
    }
}

impl<T: QueryValue> QueryValue for Vec<T> {
    fn to_query(&self) -> Option<String> {
        self.as_slice().to_query()
    }

    fn is_default(&self) -> bool {
        self.is_empty()
    }
}

macro_rules! numeric_query_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl QueryValue for $ty {
                fn to_query(&self) -> Option<String> {
                    Some(self.to_string())
                }

                fn is_default(&self) -> bool {
                    *self == <$ty>::default()
                }
            }
        )*
    };
}

numeric_query_value!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64
);
