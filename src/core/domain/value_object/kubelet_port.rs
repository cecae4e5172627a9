use crate::core::domain::error::ValidationError;

/// Port the kubelet listens on when it is addressed directly.
pub const DEFAULT_KUBELET_PORT: u16 = 10250;

/// A validated kubelet port number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KubeletPort(u16);

impl KubeletPort {
    /// Creates a validated port.
    pub fn new(port: u16) -> Result<Self, ValidationError> {
        validate_port(port)?;
        Ok(Self(port))
    }

    /// Returns the port number.
    pub fn get(&self) -> u16 {
        self.0
    }
}

impl Default for KubeletPort {
    fn default() -> Self {
        Self(DEFAULT_KUBELET_PORT)
    }
}

/// Validates a port number.
pub(crate) fn validate_port(port: u16) -> Result<(), ValidationError> {
    if port == 0 {
        return Err(ValidationError::Field {
            field: "port".to_string(),
            message: "Port cannot be 0".to_string(),
        });
    }
    Ok(())
}
