//! Builders turning settings and a database pool into HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::warn;
use uuid::Uuid;
use zeroize::Zeroizing;

use storefront::domain::ports::PasswordHasher;
use storefront::domain::{AuthService, ImageService, ProductsService, UsersService};
use storefront::inbound::http::state::{HttpState, HttpStatePorts};
use storefront::outbound::image_host::{CloudinaryCredentials, CloudinaryImageHost};
use storefront::outbound::persistence::{
    DbPool, DieselImageRepository, DieselProductRepository, DieselUserRepository,
};
use storefront::outbound::security::{Argon2PasswordHasher, JwtTokenService};

use super::StartupError;
use super::config::AppSettings;

fn required<'a>(value: Option<&'a str>, setting: &'static str) -> Result<&'a str, StartupError> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(StartupError::MissingSetting(setting))
}

/// Resolve the token signing secret.
///
/// Debug builds fall back to a per-process secret so local runs work without
/// configuration; tokens then stop verifying after a restart.
fn jwt_secret(settings: &AppSettings) -> Result<Zeroizing<String>, StartupError> {
    match required(settings.jwt_secret.as_deref(), "jwt_secret") {
        Ok(secret) => Ok(Zeroizing::new(secret.to_owned())),
        Err(_) if cfg!(debug_assertions) => {
            warn!("STOREFRONT_JWT_SECRET unset; using an ephemeral signing secret (dev only)");
            Ok(Zeroizing::new(format!(
                "{}{}",
                Uuid::new_v4().simple(),
                Uuid::new_v4().simple()
            )))
        }
        Err(err) => Err(err),
    }
}

pub(super) fn build_token_service(settings: &AppSettings) -> Result<JwtTokenService, StartupError> {
    let secret = jwt_secret(settings)?;
    JwtTokenService::new(
        secret.as_bytes(),
        settings.jwt_ttl(),
        Arc::new(DefaultClock),
    )
    .map_err(|err| StartupError::Component(err.to_string()))
}

pub(super) fn build_image_host(
    settings: &AppSettings,
) -> Result<CloudinaryImageHost, StartupError> {
    let credentials = CloudinaryCredentials {
        cloud_name: required(
            settings.cloudinary_cloud_name.as_deref(),
            "cloudinary_cloud_name",
        )?
        .to_owned(),
        api_key: required(settings.cloudinary_api_key.as_deref(), "cloudinary_api_key")?
            .to_owned(),
        api_secret: Zeroizing::new(
            required(
                settings.cloudinary_api_secret.as_deref(),
                "cloudinary_api_secret",
            )?
            .to_owned(),
        ),
    };
    CloudinaryImageHost::new(
        settings.cloudinary_api_base(),
        credentials,
        settings.image_host_timeout(),
        Arc::new(DefaultClock),
    )
    .map_err(|err| StartupError::Component(err.to_string()))
}

/// Wire repositories, adapters and services into the shared HTTP state.
///
/// # Errors
///
/// Returns [`StartupError`] when a required setting is missing or an adapter
/// rejects its configuration.
pub(super) fn build_http_state(
    settings: &AppSettings,
    pool: &DbPool,
) -> Result<web::Data<HttpState>, StartupError> {
    let user_repo = Arc::new(DieselUserRepository::new(pool.clone()));
    let hasher = Arc::new(
        Argon2PasswordHasher::new(settings.password_cost())
            .map_err(|err| StartupError::Component(err.to_string()))?,
    );
    let decoy_hash = hasher
        .hash(&Uuid::new_v4().to_string())
        .map_err(|err| StartupError::Component(err.to_string()))?;
    let tokens = Arc::new(build_token_service(settings)?);
    let host = Arc::new(build_image_host(settings)?);

    let users = Arc::new(UsersService::new(user_repo.clone(), hasher.clone()));
    let auth = Arc::new(AuthService::new(
        user_repo.clone(),
        hasher,
        tokens,
        decoy_hash,
    ));
    let images = ImageService::new(Arc::new(DieselImageRepository::new(pool.clone())), host);
    let products = Arc::new(ProductsService::new(
        Arc::new(DieselProductRepository::new(pool.clone())),
        user_repo,
        images,
    ));

    let state = HttpState::new(HttpStatePorts {
        login: auth,
        users_command: users.clone(),
        users,
        products: products.clone(),
        products_command: products,
    })
    .with_max_image_bytes(settings.max_image_bytes());
    Ok(web::Data::new(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use ortho_config::OrthoConfig;
    use rstest::rstest;
    use storefront::domain::ports::TokenService;
    use storefront::domain::{AccessClaims, UserId};

    const SETTINGS_KEYS: [&str; 5] = [
        "STOREFRONT_JWT_SECRET",
        "STOREFRONT_CLOUDINARY_CLOUD_NAME",
        "STOREFRONT_CLOUDINARY_API_KEY",
        "STOREFRONT_CLOUDINARY_API_SECRET",
        "STOREFRONT_CLOUDINARY_API_BASE",
    ];

    fn settings_from(pairs: &[(&str, &str)]) -> AppSettings {
        let vars = SETTINGS_KEYS.iter().map(|key| {
            let value = pairs
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, value)| (*value).to_owned());
            (*key, value)
        });
        let _guard = lock_env(vars);
        AppSettings::load_from_iter([OsString::from("storefront")]).expect("config should load")
    }

    #[rstest]
    fn token_service_signs_with_configured_secret() {
        let settings = settings_from(&[("STOREFRONT_JWT_SECRET", "s3cret")]);
        let service = build_token_service(&settings).expect("token service");
        let claims = AccessClaims {
            sub: UserId::random(),
            username: "ada".to_owned(),
        };
        let token = service.issue(&claims).expect("issue");
        assert_eq!(service.verify(token.as_str()).expect("verify"), claims);
    }

    #[rstest]
    fn image_host_targets_configured_cloud() {
        let settings = settings_from(&[
            ("STOREFRONT_CLOUDINARY_CLOUD_NAME", "demo"),
            ("STOREFRONT_CLOUDINARY_API_KEY", "key"),
            ("STOREFRONT_CLOUDINARY_API_SECRET", "secret"),
            ("STOREFRONT_CLOUDINARY_API_BASE", "http://127.0.0.1:9/v1_1"),
        ]);
        let host = build_image_host(&settings).expect("image host");
        assert_eq!(
            host.upload_url().as_str(),
            "http://127.0.0.1:9/v1_1/demo/image/upload"
        );
    }

    #[rstest]
    #[case(&[("STOREFRONT_CLOUDINARY_API_KEY", "key"), ("STOREFRONT_CLOUDINARY_API_SECRET", "secret")], "cloudinary_cloud_name")]
    #[case(&[("STOREFRONT_CLOUDINARY_CLOUD_NAME", "demo"), ("STOREFRONT_CLOUDINARY_API_SECRET", "secret")], "cloudinary_api_key")]
    #[case(&[("STOREFRONT_CLOUDINARY_CLOUD_NAME", "demo"), ("STOREFRONT_CLOUDINARY_API_KEY", "  ")], "cloudinary_api_key")]
    fn image_host_requires_credentials(
        #[case] pairs: &[(&str, &str)],
        #[case] missing: &'static str,
    ) {
        let settings = settings_from(pairs);
        let err = build_image_host(&settings).err().expect("missing credential");
        assert!(matches!(err, StartupError::MissingSetting(name) if name == missing));
    }
}
