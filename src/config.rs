#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SameSiteNoneConfig {
    pub(crate) promote: bool,
    pub(crate) duplicate: bool,
    pub(crate) secure_only: bool,
}

impl Default for SameSiteNoneConfig {
    fn default() -> Self {
        Self {
            promote: true,
            duplicate: true,
            secure_only: false,
        }
    }
}

impl SameSiteNoneConfig {
    /// Promote incoming fallback cookies to their primary names and hide them from the request.
    #[must_use]
    pub fn with_promotion(mut self, promote: bool) -> Self {
        self.promote = promote;
        self
    }

    /// Emit a fallback twin for every outgoing `SameSite=None` cookie.
    #[must_use]
    pub fn with_duplication(mut self, duplicate: bool) -> Self {
        self.duplicate = duplicate;
        self
    }

    /// Only emit fallback twins for cookies that also carry `Secure`.
    ///
    /// Clients that understand `SameSite=None` drop such cookies when they are not `Secure`, so
    /// an insecure one is usually a misconfiguration rather than something worth duplicating.
    #[must_use]
    pub fn with_secure_only(mut self, secure_only: bool) -> Self {
        self.secure_only = secure_only;
        self
    }
}
