//! Navigation links per role.

use serde::Serialize;

use crate::role::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub href: &'static str,
    pub label: &'static str,
}

const fn link(href: &'static str, label: &'static str) -> NavLink {
    NavLink { href, label }
}

const GUEST_LINKS: &[NavLink] = &[
    link("/", "home"),
    link("/about", "about"),
    link("/products", "products"),
];

const USER_LINKS: &[NavLink] = &[
    link("/user", "user"),
    link("/favorites", "favorites"),
    link("/reviews", "reviews"),
    link("/cart", "cart"),
    link("/orders", "orders"),
];

const ADMIN_LINKS: &[NavLink] = &[link("/admin/sales", "dashboard")];

const ADMIN_SIDEBAR: &[NavLink] = &[
    link("/admin/sales", "sales"),
    link("/admin/products", "products"),
    link("/admin/products/create", "create product"),
    link("/admin/tasks", "tasks"),
];

/// Links shown in the navbar dropdown. Each role sees everything the role
/// below it sees, plus its own entries.
pub fn nav_links(role: Role) -> Vec<NavLink> {
    let mut links = GUEST_LINKS.to_vec();
    if role.has_permission(Role::User) {
        links.extend_from_slice(USER_LINKS);
    }
    if role.has_permission(Role::Admin) {
        links.extend_from_slice(ADMIN_LINKS);
    }
    links
}

/// Links in the admin sidebar.
pub fn admin_sidebar_links() -> &'static [NavLink] {
    ADMIN_SIDEBAR
}
