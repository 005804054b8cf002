use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three energy models evaluated for every conformer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Method {
    /// The most expensive, most trusted method all others are compared against.
    Reference,
    CheapA,
    CheapB,
}

impl Method {
    pub const ALL: [Method; 3] = [Method::Reference, Method::CheapA, Method::CheapB];
    pub const CHEAP: [Method; 2] = [Method::CheapA, Method::CheapB];
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Reference => write!(f, "reference"),
            Method::CheapA => write!(f, "cheap-a"),
            Method::CheapB => write!(f, "cheap-b"),
        }
    }
}

/// Human-readable labels of the three methods, persisted with the energy database so
/// that a reloaded database reports under the same names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSet {
    pub reference: String,
    pub cheap_a: String,
    pub cheap_b: String,
}

impl MethodSet {
    pub fn label(&self, method: Method) -> &str {
        match method {
            Method::Reference => &self.reference,
            Method::CheapA => &self.cheap_a,
            Method::CheapB => &self.cheap_b,
        }
    }
}

impl Default for MethodSet {
    fn default() -> Self {
        Self {
            reference: "wB97X-D4".to_string(),
            cheap_a: "GFN2".to_string(),
            cheap_b: "GP3".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_resolve_per_method() {
        let set = MethodSet::default();
        assert_eq!(set.label(Method::Reference), "wB97X-D4");
        assert_eq!(set.label(Method::CheapA), "GFN2");
        assert_eq!(set.label(Method::CheapB), "GP3");
    }

    #[test]
    fn cheap_methods_exclude_reference() {
        assert!(!Method::CHEAP.contains(&Method::Reference));
        assert_eq!(Method::ALL.len(), 3);
    }
}
