//! Cookie transport for the attribution token.

use actix_web::HttpRequest;
use actix_web::cookie::{Cookie, SameSite};

use crate::config::SameSitePolicy;
use crate::errors::Result;

use super::token::AttributionToken;

/// Builds and reads the attribution cookie according to configuration.
pub struct TokenCookieBuilder {
    cookie_name: String,
    same_site: SameSite,
    secure: bool,
    domain: Option<String>,
    max_age_secs: u64,
}

impl TokenCookieBuilder {
    pub fn from_config() -> Self {
        let config = crate::config::get_config();

        let same_site = match config.tracking.cookie_same_site {
            SameSitePolicy::Strict => SameSite::Strict,
            SameSitePolicy::None => SameSite::None,
            SameSitePolicy::Lax => SameSite::Lax,
        };

        Self {
            cookie_name: config.tracking.cookie_name.clone(),
            same_site,
            secure: config.tracking.cookie_secure,
            domain: config.tracking.cookie_domain.clone(),
            max_age_secs: config.tracking.cookie_max_age,
        }
    }

    fn build_cookie_base(
        &self,
        value: String,
        max_age: actix_web::cookie::time::Duration,
    ) -> Cookie<'static> {
        let mut cookie = Cookie::new(self.cookie_name.clone(), value);
        cookie.set_path("/".to_string());
        cookie.set_http_only(true);
        cookie.set_secure(self.secure);
        cookie.set_same_site(self.same_site);
        cookie.set_max_age(max_age);
        if let Some(ref domain) = self.domain {
            cookie.set_domain(domain.clone());
        }
        cookie
    }

    /// Cookie carrying a pending token; replaces any previous token.
    pub fn build_token_cookie(&self, token: &AttributionToken) -> Result<Cookie<'static>> {
        let value = token.encode()?;
        Ok(self.build_cookie_base(
            value,
            actix_web::cookie::time::Duration::seconds(self.max_age_secs as i64),
        ))
    }

    /// Expired empty cookie, used to delete a consumed token.
    pub fn build_expired_token_cookie(&self) -> Cookie<'static> {
        self.build_cookie_base(String::new(), actix_web::cookie::time::Duration::ZERO)
    }

    /// Read the pending token off a request; malformed values read as none.
    pub fn read_token(&self, req: &HttpRequest) -> Option<AttributionToken> {
        let cookie = req.cookie(&self.cookie_name)?;
        AttributionToken::decode(cookie.value())
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use std::collections::HashMap;

    fn builder() -> TokenCookieBuilder {
        TokenCookieBuilder {
            cookie_name: "ot_attribution".to_string(),
            same_site: SameSite::Lax,
            secure: false,
            domain: None,
            max_age_secs: 3600,
        }
    }

    #[test]
    fn test_token_cookie_attributes() {
        let token = AttributionToken::new("abc1234", HashMap::new());
        let cookie = builder().build_token_cookie(&token).unwrap();

        assert_eq!(cookie.name(), "ot_attribution");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert!(cookie.max_age().unwrap().whole_seconds() > 0);
    }

    #[test]
    fn test_expired_cookie_is_empty_and_zero_aged() {
        let cookie = builder().build_expired_token_cookie();
        assert_eq!(cookie.value(), "");
        assert_eq!(
            cookie.max_age(),
            Some(actix_web::cookie::time::Duration::ZERO)
        );
    }

    #[test]
    fn test_read_token_from_request() {
        let b = builder();
        let token = AttributionToken::new(
            "abc1234",
            HashMap::from([("pid".to_string(), "7".to_string())]),
        );
        let cookie = b.build_token_cookie(&token).unwrap();

        let req = TestRequest::get().cookie(cookie).to_http_request();
        let read = b.read_token(&req).unwrap();
        assert_eq!(read, token);
    }

    #[test]
    fn test_read_token_absent_or_garbage() {
        let b = builder();

        let req = TestRequest::get().to_http_request();
        assert!(b.read_token(&req).is_none());

        let req = TestRequest::get()
            .cookie(Cookie::new("ot_attribution", "garbage"))
            .to_http_request();
        assert!(b.read_token(&req).is_none());
    }
}
