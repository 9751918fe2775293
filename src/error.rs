use error_chain::error_chain;

error_chain!{
    errors {
        ClientInitialization {
            description("failed to initialize client")
        }
        InvalidUrl(url: String) {
            description("invalid URL")
            display("invalid URL: {}", url)
        }
        Api(status: u16, body: String) {
            description("error returned from API")
            display("API returned HTTP {}: {}", status, body)
        }
        Http {
            description("HTTP error")
        }
        JsonDecode(value: String) {
            description("invalid JSON")
            display("could not parse JSON:\n{}", value)
        }
        Validation(entity: &'static str, reason: String) {
            description("invalid entity")
            display("invalid {}: {}", entity, reason)
        }
        MissingDomain(id: String) {
            description("status has no domain")
            display("status {} was not tagged with a domain", id)
        }
        NotResolvable(uri: String) {
            description("status could not be resolved on this instance")
            display("could not resolve {} on the acting instance", uri)
        }
        TaskFailed(reason: String) {
            description("background task failed")
            display("background task failed: {}", reason)
        }
    }
}

impl Error {
    pub(crate) fn validation<S: ToString>(entity: &'static str, reason: S) -> Self {
        ErrorKind::Validation(entity, reason.to_string()).into()
    }

    /// True when the error was raised while validating an entity.
    pub fn is_validation(&self) -> bool {
        matches!(self.kind(), ErrorKind::Validation(..))
    }
}
