use dish_core::AuthData;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::auth::AuthResolveArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ResolvedAuth {
    pub user_id: String,
    #[serde(flatten)]
    pub data: AuthData,
    pub from_cache: bool,
}

impl ResolvedAuth {
    pub fn new(user_id: impl Into<String>, data: AuthData) -> Self {
        Self {
            user_id: user_id.into(),
            from_cache: data.from_cache,
            data,
        }
    }
}

pub async fn handle(
    args: &AuthResolveArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let auth = ctx.auth_service()?;
    let data = if args.refresh {
        auth.refresh_auth_data_silently(&args.user_id).await
    } else {
        auth.get_user_auth_data(&args.user_id).await
    };
    output(&ResolvedAuth::new(&args.user_id, data), flags.format)
}

#[cfg(test)]
mod tests {
    use dish_core::{AuthData, UserRole};
    use pretty_assertions::assert_eq;

    use super::ResolvedAuth;

    #[test]
    fn from_cache_is_reported() {
        let data = AuthData {
            role: Some(UserRole::Admin),
            client_id: None,
            restaurant_name: None,
            has_linked_client_record: false,
            error: None,
            from_cache: false,
        }
        .with_from_cache();

        let value = serde_json::to_value(ResolvedAuth::new("u1", data)).expect("json");
        assert_eq!(value["userId"], "u1");
        assert_eq!(value["role"], "admin");
        assert_eq!(value["fromCache"], true);
    }

    #[test]
    fn unresolved_carries_error() {
        let value = serde_json::to_value(ResolvedAuth::new("u2", AuthData::unresolved("boom")))
            .expect("json");
        assert_eq!(value["error"], "boom");
        assert!(value["role"].is_null());
        assert_eq!(value["fromCache"], false);
    }
}
