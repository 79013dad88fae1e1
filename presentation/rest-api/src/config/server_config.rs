const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Server configuration for HTTP listener
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub ip: String,
    pub port: String,
    pub max_body_bytes: usize,
}

impl ServerConfig {
    /// Load server configuration through `lookup`
    ///
    /// Environment variables:
    /// - SERVICE_IP: IP address to bind (default: "127.0.0.1")
    /// - SERVICE_PORT: Port to bind (default: "8080")
    /// - MAX_BODY_BYTES: Largest accepted request body (default: 10 MiB)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let ip = lookup("SERVICE_IP").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = lookup("SERVICE_PORT").unwrap_or_else(|| "8080".to_string());
        let max_body_bytes = lookup("MAX_BODY_BYTES")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_MAX_BODY_BYTES);

        Self {
            ip,
            port,
            max_body_bytes,
        }
    }

    /// Get the bind address as "ip:port"
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.ip, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_create_bind_address_from_ip_and_port() {
        // Arrange
        let config = ServerConfig {
            ip: "0.0.0.0".to_string(),
            port: "3000".to_string(),
            max_body_bytes: 1024,
        };

        // Act
        let address = config.bind_address();

        // Assert
        assert_eq!(address, "0.0.0.0:3000");
    }

    #[test]
    fn should_default_to_ten_megabyte_body_limit() {
        let config = ServerConfig::from_lookup(|_| None);

        assert_eq!(config.max_body_bytes, 10 * 1024 * 1024);
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn should_ignore_unparsable_body_limit() {
        let config = ServerConfig::from_lookup(|name| {
            (name == "MAX_BODY_BYTES").then(|| "ten megabytes".to_string())
        });

        assert_eq!(config.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
    }
}
