use std::convert::Infallible;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

pub const USER_EMAIL_HEADER: &str = "x-user-email";

/// Identity used by profile and render calls that arrive without a header.
pub const DEMO_USER_EMAIL: &str = "demo@local";

/// The caller's email taken from the `x-user-email` header, if present and non-blank.
#[derive(Debug, Clone, PartialEq)]
pub struct UserEmail(pub Option<String>);

impl UserEmail {
    pub fn or_demo(&self) -> &str {
        self.0.as_deref().unwrap_or(DEMO_USER_EMAIL)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for UserEmail
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let email = parts
            .headers
            .get(USER_EMAIL_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        Ok(UserEmail(email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(req: Request<()>) -> UserEmail {
        let (mut parts, _) = req.into_parts();
        UserEmail::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_reads_header() {
        let req = Request::builder()
            .header(USER_EMAIL_HEADER, " ada@example.com ")
            .body(())
            .unwrap();
        assert_eq!(extract(req).await.0.as_deref(), Some("ada@example.com"));
    }

    #[tokio::test]
    async fn test_blank_header_falls_back_to_demo() {
        let req = Request::builder()
            .header(USER_EMAIL_HEADER, "   ")
            .body(())
            .unwrap();
        let email = extract(req).await;
        assert_eq!(email.0, None);
        assert_eq!(email.or_demo(), DEMO_USER_EMAIL);
    }
}
