//! One-shot flash messages carried across a redirect in a cookie.
//!
//! A POST handler answers with a redirect and sets the `_flash` cookie; the
//! next rendered page shows the messages and expires the cookie.

use std::future::{Ready, ready};

use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload};
use percent_encoding::{NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use serde::{Deserialize, Serialize};

use blogly_core::DomainError;

use crate::middleware::error::AppResult;

pub const FLASH_COOKIE: &str = "_flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: Level,
    pub message: String,
}

impl FlashMessage {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }
}

fn encode(messages: &[FlashMessage]) -> String {
    // Serializing plain structs of strings cannot fail.
    let json = serde_json::to_string(messages).unwrap_or_default();
    utf8_percent_encode(&json, NON_ALPHANUMERIC).to_string()
}

fn decode(raw: &str) -> Vec<FlashMessage> {
    percent_decode_str(raw)
        .decode_utf8()
        .ok()
        .and_then(|json| serde_json::from_str(&json).ok())
        .unwrap_or_default()
}

fn cookie(value: String) -> Cookie<'static> {
    Cookie::build(FLASH_COOKIE, value)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish()
}

/// `302 Found` pointing at `location`.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// `302 Found` pointing at `location`, carrying one flash message.
pub fn redirect_with(location: &str, message: FlashMessage) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .cookie(cookie(encode(&[message])))
        .finish()
}

/// Send the user back to the form at `location` with the rule they broke.
///
/// Only errors a user can fix are flashed; anything else propagates.
pub fn redirect_back(location: &str, err: DomainError) -> AppResult<HttpResponse> {
    let message = match err {
        DomainError::Validation(msg) | DomainError::Duplicate(msg) | DomainError::InUse(msg) => msg,
        other => return Err(other.into()),
    };
    tracing::debug!(%location, %message, "Rejected form submission");
    Ok(redirect_with(location, FlashMessage::error(message)))
}

/// Flash messages set by the previous response.
#[derive(Debug, Clone, Default)]
pub struct IncomingFlashes(Vec<FlashMessage>);

impl IncomingFlashes {
    pub fn messages(&self) -> &[FlashMessage] {
        &self.0
    }

    /// Expire the flash cookie on `resp` if any messages were shown.
    pub fn clear_on(&self, resp: &mut HttpResponse) {
        if self.0.is_empty() {
            return;
        }
        if let Err(e) = resp.add_removal_cookie(&cookie(String::new())) {
            tracing::warn!("Failed to expire flash cookie: {}", e);
        }
    }
}

impl FromRequest for IncomingFlashes {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let messages = req
            .cookie(FLASH_COOKIE)
            .map(|c| decode(c.value()))
            .unwrap_or_default();

        ready(Ok(Self(messages)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_cookie_value_survives_special_characters() {
        let messages = vec![FlashMessage::error("Tag \"a; b\" already exists, sorry")];
        let encoded = encode(&messages);

        assert!(encoded.chars().all(|c| c.is_ascii_alphanumeric() || c == '%'));
        assert_eq!(decode(&encoded), messages);
    }

    #[test]
    fn test_garbage_cookie_yields_no_messages() {
        assert!(decode("%7Bnot json").is_empty());
        assert!(decode("%FF%FE").is_empty());
    }

    #[test]
    fn test_validation_errors_are_flashed() {
        let resp = redirect_back(
            "/users/new",
            DomainError::Validation("The first name is required".to_string()),
        )
        .unwrap();

        assert_eq!(resp.status(), actix_web::http::StatusCode::FOUND);
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/users/new");
        let cookie = resp
            .cookies()
            .find(|c| c.name() == FLASH_COOKIE)
            .expect("flash cookie should be set");
        assert_eq!(
            decode(cookie.value()),
            vec![FlashMessage::error("The first name is required")]
        );
    }

    #[test]
    fn test_internal_errors_are_not_flashed() {
        let result = redirect_back("/users/new", DomainError::Internal("db down".to_string()));
        assert!(result.is_err());
    }

    #[actix_web::test]
    async fn test_extractor_reads_and_clears_cookie() {
        let raw = encode(&[FlashMessage::success("Saved")]);
        let req = TestRequest::default()
            .cookie(Cookie::new(FLASH_COOKIE, raw))
            .to_http_request();

        let flashes = IncomingFlashes::extract(&req).await.unwrap();
        assert_eq!(flashes.messages(), &[FlashMessage::success("Saved")]);

        let mut resp = HttpResponse::Ok().finish();
        flashes.clear_on(&mut resp);
        let removal = resp.cookies().next().expect("removal cookie");
        assert_eq!(removal.name(), FLASH_COOKIE);
        assert_eq!(removal.value(), "");
    }
}
