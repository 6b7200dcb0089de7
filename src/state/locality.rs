use std::fmt;

/// One crawl unit: a locality within a region
///
/// Supplied by the caller and never modified; it scopes both the listing URL
/// and the output file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocalityTarget {
    pub region_code: String,
    pub locality_name: String,
}

impl LocalityTarget {
    pub fn new(region_code: &str, locality_name: &str) -> Self {
        Self {
            region_code: region_code.to_string(),
            locality_name: locality_name.to_string(),
        }
    }
}

impl fmt::Display for LocalityTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.region_code, self.locality_name)
    }
}
