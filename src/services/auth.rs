/// Shared-secret checks for the two protected actions.
///
/// Each check is configured independently; an unset secret means the check
/// always passes. The two gates accept tokens through different channels:
/// viewing matches the `t` query parameter or the `X-Index-Token` header
/// (either may match), while uploading takes the first present value among
/// the `token` query parameter, the `token` form field, and the
/// `X-Upload-Token` header, in that order.
#[derive(Clone)]
pub struct AccessGate {
    index_token: Option<String>,
    upload_token: Option<String>,
}

impl AccessGate {
    /// Empty secrets disable the corresponding check.
    pub fn new(index_token: &str, upload_token: &str) -> Self {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Self {
            index_token: non_empty(index_token),
            upload_token: non_empty(upload_token),
        }
    }

    pub fn view_allowed(&self, query: Option<&str>, header: Option<&str>) -> bool {
        let Some(secret) = self.index_token.as_deref() else {
            return true;
        };
        query == Some(secret) || header == Some(secret)
    }

    /// First present channel wins: a wrong value in a higher-priority
    /// channel fails even if a lower-priority one would have matched.
    pub fn upload_allowed(
        &self,
        query: Option<&str>,
        form: Option<&str>,
        header: Option<&str>,
    ) -> bool {
        let Some(secret) = self.upload_token.as_deref() else {
            return true;
        };
        query.or(form).or(header) == Some(secret)
    }
}
