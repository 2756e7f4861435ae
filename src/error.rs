use thiserror::Error;

/// Recoverable failures of the geometry kernel and the field simulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    /// No unique answer exists for the requested geometric construction
    /// (e.g. a line parallel to a plane, or a zero-length bisector).
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(&'static str),

    /// An operation needed at least one panel but the layout is empty.
    #[error("panel set is empty")]
    EmptyPanelSet,

    /// A physical quantity that must be strictly positive was not.
    #[error("invalid physical parameter {name}: {value}")]
    InvalidPhysicalParameter { name: &'static str, value: f64 },

    /// Scenario parameters that cannot produce a finite computation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let e = FieldError::InvalidPhysicalParameter {
            name: "mass",
            value: -1.0,
        };
        assert_eq!(e.to_string(), "invalid physical parameter mass: -1");
        assert_eq!(FieldError::EmptyPanelSet.to_string(), "panel set is empty");
    }
}
