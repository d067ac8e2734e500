//! Admin management: add an admin by user id, or remove one after confirmation.
//! The caller never appears in the removal list, and the target is checked again at confirm time.

use abot_core::{Keyboard, Result};
use storage::AdminRecord;
use teloxide::utils::html::escape;
use tracing::info;

use super::{expect_buttons, FlowContext, FlowState, Input, Step, StoreResultExt};
use crate::callback::Callback;
use crate::menus::{button, single_column};
use crate::screens::{home_button, Screen};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManageAdminsState {
    AwaitingId,
    SelectingAdmin,
    Confirming { admin_id: i64 },
}

impl ManageAdminsState {
    pub fn name(&self) -> &'static str {
        match self {
            ManageAdminsState::AwaitingId => "awaiting_id",
            ManageAdminsState::SelectingAdmin => "selecting_admin",
            ManageAdminsState::Confirming { .. } => "confirming",
        }
    }
}

fn back_home() -> Keyboard {
    Keyboard::new().row(vec![
        button("🔙 Ortga", Callback::AdminPanel),
        home_button(),
    ])
}

fn outcome(text: &str) -> Screen {
    Screen::new(text, back_home())
}

/// Dynamic admins other than the caller.
async fn removable_admins(ctx: &FlowContext<'_>) -> Result<Vec<AdminRecord>> {
    let caller = ctx.user.id;
    Ok(ctx
        .identity
        .list_admins()
        .await
        .db()?
        .into_iter()
        .filter(|a| a.id != caller)
        .collect())
}

fn admin_label(admin: &AdminRecord) -> String {
    if admin.name.trim().is_empty() {
        admin.id.to_string()
    } else {
        format!("{} ({})", admin.name, admin.id)
    }
}

pub async fn enter_add(ctx: &FlowContext<'_>) -> Result<Option<FlowState>> {
    ctx.show(&Screen::new(
        "🆔 Yangi adminning foydalanuvchi ID sini yuboring:",
        back_home(),
    ))
    .await?;
    Ok(Some(FlowState::ManageAdmins(ManageAdminsState::AwaitingId)))
}

pub async fn enter_delete(ctx: &FlowContext<'_>) -> Result<Option<FlowState>> {
    let admins = removable_admins(ctx).await?;
    if admins.is_empty() {
        ctx.show(&outcome("📛 Siz yagona adminsiz. O‘zingizni o‘chira olmaysiz!"))
            .await?;
        return Ok(None);
    }
    let items = admins
        .iter()
        .map(|a| button(admin_label(a), Callback::RemoveAdmin(a.id)))
        .collect();
    ctx.show(&Screen::new(
        "🗑 Qaysi adminni o‘chirmoqchisiz?",
        single_column(items, vec![button("🔙 Ortga", Callback::AdminManageAdmins)]),
    ))
    .await?;
    Ok(Some(FlowState::ManageAdmins(ManageAdminsState::SelectingAdmin)))
}

pub async fn step(
    ctx: &FlowContext<'_>,
    state: ManageAdminsState,
    input: Input<'_>,
) -> Result<Step<ManageAdminsState>> {
    use ManageAdminsState::*;

    match (state, input) {
        (AwaitingId, Input::Text(text)) => {
            let Ok(new_id) = text.trim().parse::<i64>() else {
                ctx.send(&outcome("❌ Noto‘g‘ri ID. Iltimos, raqam yuboring."))
                    .await?;
                return Ok(Step::Next(AwaitingId));
            };
            if ctx.admins.is_admin(new_id).await {
                ctx.send(&outcome("⚠️ Bu foydalanuvchi allaqachon admin."))
                    .await?;
                return Ok(Step::Next(AwaitingId));
            }
            let name = ctx
                .identity
                .get_user(new_id)
                .await
                .db()?
                .map(|u| u.name)
                .unwrap_or_default();
            ctx.identity.add_admin(new_id, &name).await.db()?;
            info!(admin_id = new_id, added_by = ctx.user.id, "Admin added");
            ctx.send(&outcome("✅ Yangi admin muvaffaqiyatli qo‘shildi!"))
                .await?;
            Ok(Step::Done)
        }
        (AwaitingId, Input::Click(_)) => Ok(Step::Unhandled(AwaitingId)),
        (AwaitingId, _) => {
            ctx.send(&outcome("❌ Noto‘g‘ri ID. Iltimos, raqam yuboring."))
                .await?;
            Ok(Step::Next(AwaitingId))
        }

        (SelectingAdmin, Input::Click(Callback::RemoveAdmin(id))) => {
            let admins = removable_admins(ctx).await?;
            let Some(target) = admins.iter().find(|a| a.id == *id) else {
                ctx.show(&outcome("❌ Admin topilmadi.")).await?;
                return Ok(Step::Done);
            };
            ctx.show(&Screen::new(
                format!(
                    "⚠️ <b>{}</b> adminlikdan o‘chirilsinmi?",
                    escape(&admin_label(target))
                ),
                Keyboard::new()
                    .single(button("✅ Ha, o‘chirilsin", Callback::ConfirmRemoveAdmin))
                    .single(button("🔙 Ortga", Callback::AdminDeleteAdmin)),
            ))
            .await?;
            Ok(Step::Next(Confirming {
                admin_id: target.id,
            }))
        }
        (Confirming { admin_id }, Input::Click(Callback::ConfirmRemoveAdmin)) => {
            let admins = removable_admins(ctx).await?;
            if admins.is_empty() {
                ctx.show(&outcome("📛 Siz yagona adminsiz. O‘zingizni o‘chira olmaysiz!"))
                    .await?;
                return Ok(Step::Done);
            }
            if !admins.iter().any(|a| a.id == admin_id)
                || !ctx.identity.remove_admin(admin_id).await.db()?
            {
                ctx.show(&outcome("❌ Admin topilmadi.")).await?;
                return Ok(Step::Done);
            }
            info!(admin_id = admin_id, removed_by = ctx.user.id, "Admin removed");
            ctx.show(&outcome("✅ Admin muvaffaqiyatli o‘chirildi.")).await?;
            Ok(Step::Done)
        }
        (state, input) => expect_buttons(ctx, state, input).await,
    }
}
