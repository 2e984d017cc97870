//! Query string parameters

/// One query parameter value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Text(String),
    /// Sent as the literal `true` or `false`
    Bool(bool),
    Int(i64),
    /// Sent as one repeated key per element
    List(Vec<String>),
}

impl QueryValue {
    fn push_pairs(&self, name: &str, out: &mut Vec<(String, String)>) {
        match self {
            QueryValue::Text(text) => out.push((name.to_owned(), text.clone())),
            QueryValue::Bool(flag) => out.push((name.to_owned(), flag.to_string())),
            QueryValue::Int(n) => out.push((name.to_owned(), n.to_string())),
            QueryValue::List(items) => {
                out.extend(items.iter().map(|item| (name.to_owned(), item.clone())));
            }
        }
    }
}

impl From<&str> for QueryValue {
    fn from(text: &str) -> Self {
        QueryValue::Text(text.to_owned())
    }
}

impl From<String> for QueryValue {
    fn from(text: String) -> Self {
        QueryValue::Text(text)
    }
}

impl From<bool> for QueryValue {
    fn from(flag: bool) -> Self {
        QueryValue::Bool(flag)
    }
}

impl From<i64> for QueryValue {
    fn from(n: i64) -> Self {
        QueryValue::Int(n)
    }
}

impl From<u32> for QueryValue {
    fn from(n: u32) -> Self {
        QueryValue::Int(i64::from(n))
    }
}

impl<S: Into<String>> From<Vec<S>> for QueryValue {
    fn from(items: Vec<S>) -> Self {
        QueryValue::List(items.into_iter().map(Into::into).collect())
    }
}

/// Ordered query parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    params: Vec<(String, QueryValue)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// Add the parameter only when `value` is present
    #[must_use]
    pub fn param_opt<V: Into<QueryValue>>(self, name: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.param(name, value),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Flattened `(name, value)` pairs in insertion order
    pub fn pairs(&self) -> Vec<(String, String)> {
        let mut out = Vec::with_capacity(self.params.len());
        for (name, value) in &self.params {
            value.push_pairs(name, &mut out);
        }
        out
    }
}
