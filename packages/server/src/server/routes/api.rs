use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::domains::{admin, auth, exchanges, favorites, messages, sustainability, toys, users};

/// Everything under `/api` except `/api/auth`
pub fn api_routes() -> Router {
    Router::new()
        // Users
        .route("/users/me", patch(users::edges::update_me))
        .route("/users/:id", get(users::edges::get_user))
        .route("/users/:id/toys", get(users::edges::get_user_toys))
        .route(
            "/users/:id/sustainability",
            get(users::edges::get_user_sustainability),
        )
        // Toys
        .route(
            "/toys",
            get(toys::edges::list_toys).post(toys::edges::create_toy),
        )
        .route(
            "/toys/:id",
            get(toys::edges::get_toy)
                .patch(toys::edges::update_toy)
                .delete(toys::edges::delete_toy),
        )
        .route(
            "/toys/:id/favorite",
            post(favorites::edges::add_favorite).delete(favorites::edges::remove_favorite),
        )
        .route("/toys/:id/requests", post(exchanges::edges::create_request))
        .route("/favorites", get(favorites::edges::list_favorites))
        // Exchange requests
        .route("/requests", get(exchanges::edges::list_requests))
        .route("/requests/:id", patch(exchanges::edges::update_request))
        // Messages
        .route("/messages", post(messages::edges::send_message))
        .route(
            "/messages/conversations",
            get(messages::edges::list_conversations),
        )
        .route("/messages/unread-count", get(messages::edges::unread_count))
        .route(
            "/messages/with/:user_id",
            get(messages::edges::get_conversation),
        )
        .route(
            "/messages/with/:user_id/read",
            post(messages::edges::mark_conversation_read),
        )
        // Sustainability
        .route(
            "/sustainability/leaderboard",
            get(sustainability::edges::get_leaderboard),
        )
        .route(
            "/sustainability/community",
            get(sustainability::edges::get_community_stats),
        )
        // Admin
        .route("/admin/users", get(admin::edges::list_users))
        .route("/admin/toys/:id", delete(admin::edges::remove_toy))
        .route("/admin/stats", get(admin::edges::stats))
}

/// `/api/auth`; mounted separately so it can carry its own rate limit
pub fn auth_routes() -> Router {
    Router::new()
        .route("/register", post(auth::edges::register))
        .route("/login", post(auth::edges::login))
        .route("/logout", post(auth::edges::logout))
        .route("/me", get(auth::edges::me))
}
