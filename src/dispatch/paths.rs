//! Candidate path tables, one per logical operation, in priority order.
//!
//! Deployments differ in route layout (legacy names, `/api` prefixes), so each
//! operation lists every equivalent path it may live under.

pub const RECOMMEND: &[&str] = &[
    "/recommend",
    "/api/recommend",
    "/recommendations",
    "/api/recommendations",
];

pub const WATCHLIST_ADD: &[&str] = &[
    "/watchlist/add",
    "/api/watchlist/add",
    "/watchlist",
    "/api/watchlist",
];

pub const WATCHLIST_REMOVE: &[&str] = &[
    "/watchlist/remove",
    "/api/watchlist/remove",
    "/watchlist/delete",
    "/api/watchlist/delete",
    "/watchlist",
    "/api/watchlist",
];

pub const WATCHLIST_FETCH: &[&str] = &["/watchlist", "/api/watchlist"];

pub const AUTH_REGISTER: &[&str] = &["/auth/register"];

pub const AUTH_LOGIN: &[&str] = &["/auth/login"];

pub const AUTH_ME: &[&str] = &["/auth/me"];

pub const SEARCH_SEMANTIC: &[&str] = &["/search/semantic", "/api/search/semantic"];

pub const SEARCH_SIMILAR: &[&str] = &["/search/more-like-this", "/api/search/more-like-this"];
