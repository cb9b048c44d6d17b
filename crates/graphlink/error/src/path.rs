use std::fmt;

/// Path to the response-tree position an error originated from.
#[derive(Debug, PartialEq, Eq, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ErrorPath(Vec<ErrorPathSegment>);

impl std::ops::Deref for ErrorPath {
    type Target = Vec<ErrorPathSegment>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::ops::DerefMut for ErrorPath {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

#[derive(Debug, PartialEq, Eq, Clone, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum ErrorPathSegment {
    Field(String),
    Index(usize),
}

impl From<Vec<ErrorPathSegment>> for ErrorPath {
    fn from(segments: Vec<ErrorPathSegment>) -> Self {
        ErrorPath(segments)
    }
}

impl FromIterator<ErrorPathSegment> for ErrorPath {
    fn from_iter<I: IntoIterator<Item = ErrorPathSegment>>(iter: I) -> Self {
        ErrorPath(iter.into_iter().collect())
    }
}

impl From<&str> for ErrorPathSegment {
    fn from(field: &str) -> Self {
        ErrorPathSegment::Field(field.to_string())
    }
}

impl From<String> for ErrorPathSegment {
    fn from(field: String) -> Self {
        ErrorPathSegment::Field(field)
    }
}

impl From<usize> for ErrorPathSegment {
    fn from(index: usize) -> Self {
        ErrorPathSegment::Index(index)
    }
}

impl fmt::Display for ErrorPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            match segment {
                ErrorPathSegment::Field(field) => f.write_str(field)?,
                ErrorPathSegment::Index(index) => write!(f, "{index}")?,
            }
        }
        Ok(())
    }
}
