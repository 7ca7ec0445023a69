use crate::consts::headers::CONTENT_LEN;

/// Ordered header list with case-insensitive lookup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    pub values: Vec<(String, String)>,
}

impl HeaderMap {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Replaces an existing header of the same name or appends a new one
    pub fn insert(&mut self, name: &str, value: String) {
        match self
            .values
            .iter_mut()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
        {
            Some((_, existing)) => *existing = value,
            None => self.values.push((name.to_owned(), value)),
        }
    }

    pub fn content_length(&self) -> Option<usize> {
        self.get(CONTENT_LEN).and_then(|value| value.parse().ok())
    }
}

impl<const N: usize> From<[(&str, &str); N]> for HeaderMap {
    fn from(value: [(&str, &str); N]) -> Self {
        Self {
            values: value
                .into_iter()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect(),
        }
    }
}
