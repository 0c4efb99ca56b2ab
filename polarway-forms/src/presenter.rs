//! Presentation layer seam and the session driver
//!
//! A [`Presenter`] renders prompts, notices, and tables. Any UI that can ask
//! for text, offer a single choice, and show a table satisfies it; the
//! binary ships a terminal implementation.

use async_trait::async_trait;
use tracing::debug;

use crate::auth::Role;
use crate::controller::{Notice, SessionController, View};
use crate::error::Result;
use crate::schema::{Gender, RecordTable};

/// Inputs and outputs the session needs from a UI
///
/// `None` from an input method means the user ended the interaction.
#[async_trait]
pub trait Presenter: Send {
    /// Single choice among `options`; returns the chosen index
    async fn choose(&mut self, prompt: &str, options: &[&str]) -> Result<Option<usize>>;

    /// Free text; `secret` inputs should not be echoed
    async fn text_input(&mut self, label: &str, secret: bool) -> Result<Option<String>>;

    async fn notify(&mut self, notice: &Notice) -> Result<()>;

    async fn show_table(&mut self, table: &RecordTable) -> Result<()>;
}

const ROLES: [Role; 2] = [Role::Admin, Role::User];
const USER_ACTIONS: [&str; 2] = ["Login", "Sign-up"];
const ADMIN_MENU: [&str; 3] = ["Submit record", "Show data", "Quit"];
const USER_MENU: [&str; 2] = ["Refresh", "Quit"];

/// Drive one session until the presenter ends it
///
/// Returns `Err` only for fatal errors (credential file gone).
pub async fn run_session<P: Presenter + ?Sized>(
    controller: &mut SessionController,
    presenter: &mut P,
) -> Result<()> {
    loop {
        let keep_going = match controller.state().role() {
            None => authenticate_step(controller, presenter).await?,
            Some(Role::Admin) => admin_step(controller, presenter).await?,
            Some(Role::User) => user_step(controller, presenter).await?,
        };
        if !keep_going {
            debug!(session = %controller.session().id, "Session ended by presenter");
            return Ok(());
        }
    }
}

async fn authenticate_step<P: Presenter + ?Sized>(
    controller: &mut SessionController,
    presenter: &mut P,
) -> Result<bool> {
    let labels = ROLES.map(|r| r.path_label());
    let Some(choice) = presenter.choose("Select your role", &labels).await? else {
        return Ok(false);
    };
    let Some(&role) = ROLES.get(choice) else {
        return Ok(false);
    };
    controller.select_role(role);

    let signing_up = match role {
        Role::Admin => false,
        Role::User => {
            let Some(action) = presenter
                .choose("Do you want to Sign-up or Login?", &USER_ACTIONS)
                .await?
            else {
                return Ok(false);
            };
            match action {
                0 => false,
                1 => true,
                _ => return Ok(false),
            }
        }
    };

    let (user_label, pass_label) = match (role, signing_up) {
        (Role::Admin, _) => ("Admin Username", "Admin Password"),
        (Role::User, false) => ("Username", "Password"),
        (Role::User, true) => ("New Username", "New Password"),
    };
    let Some(username) = presenter.text_input(user_label, false).await? else {
        return Ok(false);
    };
    let Some(password) = presenter.text_input(pass_label, true).await? else {
        return Ok(false);
    };

    let notice = if signing_up {
        controller.sign_up(&username, &password).await?
    } else {
        controller.login(&username, &password).await?
    };
    presenter.notify(&notice).await?;

    if let Some(banner) = controller.banner() {
        presenter.notify(&Notice::Info(banner)).await?;
    }
    Ok(true)
}

async fn admin_step<P: Presenter + ?Sized>(
    controller: &mut SessionController,
    presenter: &mut P,
) -> Result<bool> {
    let Some(action) = presenter
        .choose("Admin Access: You can both submit and view data.", &ADMIN_MENU)
        .await?
    else {
        return Ok(false);
    };

    match action {
        0 => {
            let Some(name) = presenter.text_input("Enter your name", false).await? else {
                return Ok(false);
            };
            let labels: Vec<&str> = Gender::ALL.iter().map(|g| g.as_str()).collect();
            let Some(idx) = presenter.choose("Select your gender", &labels).await? else {
                return Ok(false);
            };
            let notice = controller.submit(&name, Gender::ALL.get(idx).copied()).await?;
            presenter.notify(&notice).await?;
            Ok(true)
        }
        1 => {
            show(controller, presenter).await?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

async fn user_step<P: Presenter + ?Sized>(
    controller: &mut SessionController,
    presenter: &mut P,
) -> Result<bool> {
    presenter
        .notify(&Notice::Info("User Access: You can only view data.".into()))
        .await?;
    show(controller, presenter).await?;

    match presenter.choose("What next?", &USER_MENU).await? {
        Some(0) => Ok(true),
        _ => Ok(false),
    }
}

async fn show<P: Presenter + ?Sized>(
    controller: &SessionController,
    presenter: &mut P,
) -> Result<()> {
    match controller.view().await? {
        View::Table(table) => presenter.show_table(&table).await,
        View::Notice(notice) => presenter.notify(&notice).await,
    }
}
