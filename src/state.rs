use ratingsapp_config::JwtConfig;
use ratingsapp_core::password::PASSWORD_HASH_COST;
use ratingsapp_db::Repositories;

use crate::modules::auth::service::AuthService;
use crate::modules::ratings::service::RatingService;
use crate::modules::roles::service::RoleService;
use crate::modules::users::service::UserService;

#[derive(Clone)]
pub struct AppState {
    pub jwt_config: JwtConfig,
    pub auth: AuthService,
    pub users: UserService,
    pub roles: RoleService,
    pub ratings: RatingService,
}

impl AppState {
    pub fn new(repositories: Repositories, jwt_config: JwtConfig) -> Self {
        Self::with_hash_cost(repositories, jwt_config, PASSWORD_HASH_COST)
    }

    /// Same as [`AppState::new`] with a custom bcrypt cost for new passwords.
    pub fn with_hash_cost(repositories: Repositories, jwt_config: JwtConfig, cost: u32) -> Self {
        let Repositories {
            users,
            roles,
            ratings,
        } = repositories;

        Self {
            auth: AuthService::new(users.clone(), jwt_config.clone()),
            users: UserService::with_hash_cost(users.clone(), roles.clone(), cost),
            roles: RoleService::new(roles),
            ratings: RatingService::new(ratings, users),
            jwt_config,
        }
    }
}
