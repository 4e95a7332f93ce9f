use dt_wsdl::{DocumentResolver, SchemaLoadError, SchemaLocation};

/// Reads schema documents from the filesystem.
pub struct FileResolver;

impl DocumentResolver for FileResolver {
    fn fetch(&self, location: &SchemaLocation) -> Result<String, SchemaLoadError> {
        std::fs::read_to_string(location.as_str()).map_err(|e| SchemaLoadError::Fetch {
            location: location.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Fetches schema documents over HTTP with a blocking client. Timeout
/// policy at this boundary belongs to the caller's environment, not
/// the core.
pub struct HttpResolver {
    client: reqwest::blocking::Client,
}

impl HttpResolver {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl DocumentResolver for HttpResolver {
    fn fetch(&self, location: &SchemaLocation) -> Result<String, SchemaLoadError> {
        let fetch_error = |reason: String| SchemaLoadError::Fetch {
            location: location.to_string(),
            reason,
        };
        let response = self
            .client
            .get(location.as_str())
            .send()
            .map_err(|e| fetch_error(e.to_string()))?;
        let response = response
            .error_for_status()
            .map_err(|e| fetch_error(e.to_string()))?;
        response.text().map_err(|e| fetch_error(e.to_string()))
    }
}

/// Pick a resolver for the root location's transport.
pub fn resolver_for(location: &SchemaLocation) -> Box<dyn DocumentResolver> {
    if location.is_remote() {
        Box::new(HttpResolver::new())
    } else {
        Box::new(FileResolver)
    }
}
