//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::web;

use crate::domain::ports::{
    MockLoginService, MockProductsCommand, MockProductsQuery, MockUsersCommand, MockUsersQuery,
};
use crate::domain::{AccessClaims, Email, Role, User, UserId, Username};

use super::state::{HttpState, HttpStatePorts};
use super::validation::json_error_handler;

pub(crate) const ADA_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
pub(crate) const BEARER: &str = "Bearer test-token";

/// Build a user named `ada` with the given role.
pub(crate) fn sample_user(role: Role) -> User {
    User::new(
        UserId::new(ADA_ID).expect("fixture id"),
        Email::new("ada@example.com").expect("fixture email"),
        Username::new("ada").expect("fixture username"),
        role,
    )
}

/// Mock driving ports; unexpected calls panic.
#[derive(Default)]
pub(crate) struct TestPorts {
    pub login: MockLoginService,
    pub users_command: MockUsersCommand,
    pub users: MockUsersQuery,
    pub products: MockProductsQuery,
    pub products_command: MockProductsCommand,
}

impl TestPorts {
    /// Accept any bearer token as `user` and resolve `user` by id.
    pub(crate) fn authenticate_as(&mut self, user: &User) {
        let claims = AccessClaims::from(user);
        self.login
            .expect_verify_token()
            .returning(move |_| Ok(claims.clone()));
        let stored = user.clone();
        self.users
            .expect_find_by_id()
            .returning(move |_| Ok(stored.clone()));
    }

    pub(crate) fn into_state(self) -> HttpState {
        HttpState::new(HttpStatePorts {
            login: Arc::new(self.login),
            users_command: Arc::new(self.users_command),
            users: Arc::new(self.users),
            products: Arc::new(self.products),
            products_command: Arc::new(self.products_command),
        })
    }
}

/// JSON extractor config matching the production app.
pub(crate) fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}
