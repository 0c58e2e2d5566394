use std::future::{ready, Ready};

use actix_web::{dev::Payload, http::header::Header, web::Data, FromRequest, HttpRequest};
use actix_web_httpauth::headers::authorization::{Authorization, Basic};
use log::warn;

use crate::{error::ApiError, repos::file::utils::hashing_composite_key};

/// The single dashboard account, kept only as a digest of `user:password`
#[derive(Clone, Debug)]
pub struct AdminCredentials {
    digest: String,
}

impl AdminCredentials {
    pub fn new(user: &str, password: &str) -> AdminCredentials {
        AdminCredentials {
            digest: hashing_composite_key(&[user, ":", password]),
        }
    }

    pub fn matches(&self, user: &str, password: &str) -> bool {
        hashing_composite_key(&[user, ":", password]) == self.digest
    }
}

/// Proof that the request carried valid Basic credentials for the dashboard.
#[derive(Clone, Debug)]
pub struct AdminSession {
    pub user: String,
}

fn authenticate(req: &HttpRequest) -> Result<AdminSession, ApiError> {
    let credentials = req
        .app_data::<Data<AdminCredentials>>()
        .ok_or(ApiError::Unauthorized)?;

    let header = Authorization::<Basic>::parse(req).map_err(|_| ApiError::Unauthorized)?;
    let basic = header.as_ref();
    let user = basic.user_id();
    let password = basic.password().ok_or(ApiError::Unauthorized)?;

    if !credentials.matches(user, password) {
        warn!("Rejected dashboard login for {user:?} on {}", req.path());
        return Err(ApiError::Unauthorized);
    }

    Ok(AdminSession {
        user: user.to_owned(),
    })
}

impl FromRequest for AdminSession {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
