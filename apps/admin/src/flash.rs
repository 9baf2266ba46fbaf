//! # Flash Messages
//!
//! One-time messages carried from a successful write to the next page.
//!
//! ```text
//!   POST /bodegas ──► 303 Location: /bodegas
//!                     Set-Cookie: flash=message=Bodega+creada+exitosamente.
//!
//!   GET /bodegas  ──► 200 { ..., "flash": { "message": "Bodega creada exitosamente." } }
//!                     Set-Cookie: flash=; Max-Age=0
//! ```
//!
//! The cookie value is a form-urlencoded pair list, so it never contains
//! spaces, commas or semicolons.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::HeaderValue;
use axum::response::{AppendHeaders, IntoResponse, Redirect, Response};
use serde::Serialize;
use url::form_urlencoded;

pub const COOKIE_NAME: &str = "flash";

const MESSAGE_KEY: &str = "message";

/// Flash props sent with every page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlashProps {
    pub message: Option<String>,
}

/// The flash message pending for this request, if any.
///
/// Extracting it does not clear the cookie; [`crate::page::Page`] does that
/// when it renders a consumed message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flash(pub Option<String>);

impl Flash {
    pub fn into_props(self) -> FlashProps {
        FlashProps { message: self.0 }
    }

    pub fn is_some(&self) -> bool {
        self.0.is_some()
    }
}

impl<S> FromRequestParts<S> for Flash
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let message = parts
            .headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(read_cookie);
        Ok(Flash(message))
    }
}

/// Finds and decodes the flash message in one `Cookie` header.
fn read_cookie(header: &str) -> Option<String> {
    let raw = header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == COOKIE_NAME).then_some(value)
    })?;

    form_urlencoded::parse(raw.as_bytes())
        .find(|(key, _)| key == MESSAGE_KEY)
        .map(|(_, value)| value.into_owned())
        .filter(|message| !message.is_empty())
}

/// `Set-Cookie` value carrying a message.
pub fn set_cookie(message: &str) -> String {
    let encoded = form_urlencoded::Serializer::new(String::new())
        .append_pair(MESSAGE_KEY, message)
        .finish();
    format!("{COOKIE_NAME}={encoded}; Path=/; HttpOnly; SameSite=Lax")
}

/// `Set-Cookie` value expiring the flash cookie.
pub fn clear_cookie() -> HeaderValue {
    HeaderValue::from_static("flash=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax")
}

/// 303 redirect to `to` with a flash message for the next page.
pub fn redirect_with(to: &str, message: &str) -> Response {
    (
        AppendHeaders([(SET_COOKIE, set_cookie(message))]),
        Redirect::to(to),
    )
        .into_response()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};

    #[test]
    fn test_cookie_value_is_header_safe() {
        let cookie = set_cookie("Bodega creada exitosamente; ok, sí");
        assert!(cookie.starts_with("flash=message=Bodega+creada+exitosamente"));
        let value = cookie.split(';').next().unwrap();
        assert!(!value.contains(' '));
        assert!(!value.contains(','));
        assert!(HeaderValue::from_str(&cookie).is_ok());
    }

    #[test]
    fn test_read_cookie_among_others() {
        let cookie = set_cookie("Producto creado exitosamente.");
        let value = cookie.split(';').next().unwrap();
        let header = format!("theme=dark; {value}; other=1");
        assert_eq!(
            read_cookie(&header).as_deref(),
            Some("Producto creado exitosamente.")
        );
        assert_eq!(read_cookie("theme=dark"), None);
        assert_eq!(read_cookie("flash="), None);
    }

    #[test]
    fn test_redirect_is_303_with_cookie() {
        let response = redirect_with("/vendedores", "Vendedor creado exitosamente.");
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], "/vendedores");
        let cookie = response.headers()[SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("flash=message=Vendedor+creado"));
    }

    #[tokio::test]
    async fn test_extractor() {
        let request = Request::builder()
            .header(COOKIE, "flash=message=Hola+mundo")
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();
        let flash = Flash::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(flash, Flash(Some("Hola mundo".into())));

        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();
        let none = Flash::from_request_parts(&mut parts, &()).await.unwrap();
        assert!(!none.is_some());
    }
}
