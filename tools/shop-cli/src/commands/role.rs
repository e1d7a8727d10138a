//! Classify a user id and show what they can reach.

use anyhow::Result;
use serde_json::json;
use shop_auth::{admin_sidebar_links, classify, nav_links, AdminRegistry};
use shop_commerce::UserId;

use super::RoleArgs;
use crate::context::Context;

pub async fn run(args: RoleArgs, ctx: &Context) -> Result<()> {
    let admins = AdminRegistry::new(ctx.config.auth.admin_user_ids.iter().cloned());
    let user_id = args.user_id.map(UserId::new);
    let role = classify(user_id.as_ref(), &admins);
    let links = nav_links(role);

    if ctx.output.is_json() {
        ctx.output.json(&json!({ "user_id": user_id, "role": role, "links": links }));
        return Ok(());
    }

    let who = user_id.as_ref().map_or("guest", |id| id.as_str());
    ctx.output.header(&format!("{who}: {role}"));
    for link in &links {
        ctx.output.list_item(&format!("{} ({})", link.label, link.href));
    }
    if role.is_admin() {
        ctx.output.info("admin sidebar:");
        for link in admin_sidebar_links() {
            ctx.output.list_item(&format!("{} ({})", link.label, link.href));
        }
    }
    if admins.is_empty() {
        ctx.output.warn("no admin user ids configured");
    }
    Ok(())
}
