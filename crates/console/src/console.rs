//! The assembled console: session, routing, the user list and its dialogs.
//!
//! [`Console`] is what a front end drives. It owns exactly one of each
//! component and wires the session handle into the directory client calls.

use userdesk_core::{DomainResult, UserId, UserRecord};

use crate::client::DirectoryApi;
use crate::error::{ConsoleError, DirectoryError, StoreError, SurfaceError};
use crate::list::{FetchOutcome, FetchPhase, ListController};
use crate::login::LoginSurface;
use crate::mutation::{DeleteWorkflow, EditForm, EditWorkflow, MutationOutcome};
use crate::notification::Notifications;
use crate::session::{Session, TokenStore};
use crate::shell::{Route, gate};

pub struct Console<D, S> {
    api: D,
    session: Session<S>,
    route: Route,
    login: LoginSurface,
    list: ListController,
    edit: EditWorkflow,
    delete: DeleteWorkflow,
    notifications: Notifications,
}

impl<D: DirectoryApi, S: TokenStore> Console<D, S> {
    /// Start on the user list if the session is already authenticated.
    pub fn new(api: D, session: Session<S>) -> Self {
        let route = gate(Route::Users, session.is_authenticated());
        Self {
            api,
            session,
            route,
            login: LoginSurface::new(),
            list: ListController::new(),
            edit: EditWorkflow::new(),
            delete: DeleteWorkflow::new(),
            notifications: Notifications::new(),
        }
    }

    /// Resolve `path` through the route gate. Entering the user list for the
    /// first time loads its first page.
    pub async fn navigate(&mut self, path: &str) -> Route {
        self.route = gate(Route::from_path(path), self.session.is_authenticated());
        if self.route == Route::Users && self.list.phase() == &FetchPhase::Idle {
            self.list.refresh(&self.api, &mut self.notifications).await;
        }
        self.route
    }

    pub async fn sign_in(&mut self, email: &str, password: &str) -> Route {
        self.login.email = email.to_string();
        self.login.password = password.to_string();
        let next = self.login.submit(&self.api, &mut self.session).await;
        self.navigate(next.path()).await
    }

    /// Clear the session and drop everything loaded under it.
    pub async fn sign_out(&mut self) -> Result<Route, StoreError> {
        self.list = ListController::new();
        self.edit = EditWorkflow::new();
        self.delete = DeleteWorkflow::new();
        self.route = Route::Login;
        self.session.logout().await?;
        Ok(self.route)
    }

    pub async fn go_to_page(&mut self, page: u32) -> DomainResult<FetchOutcome> {
        self.list.load(&self.api, page, &mut self.notifications).await
    }

    pub async fn refresh(&mut self) -> FetchOutcome {
        self.list.refresh(&self.api, &mut self.notifications).await
    }

    pub fn search(&mut self, query: impl Into<String>) {
        self.list.set_query(query);
    }

    /// Fetch a single record straight from the directory.
    pub async fn show(&self, id: UserId) -> Result<UserRecord, DirectoryError> {
        self.api.get_user(id).await
    }

    /// Open the edit dialog for `id`, fetching the record if it is not on the
    /// loaded page.
    pub async fn start_edit(&mut self, id: UserId) -> Result<(), ConsoleError> {
        if self.edit.surface().is_open() {
            return Err(SurfaceError::AlreadyOpen.into());
        }
        let record = match self.list.roster().get(id) {
            Some(record) => record.clone(),
            None => self.api.get_user(id).await?,
        };
        self.edit.open(&record)?;
        Ok(())
    }

    pub fn edit_form_mut(&mut self) -> Option<&mut EditForm> {
        self.edit.form_mut()
    }

    pub fn cancel_edit(&mut self) -> Result<(), SurfaceError> {
        self.edit.cancel()
    }

    pub async fn commit_edit(&mut self) -> Result<MutationOutcome, SurfaceError> {
        self.edit
            .commit(&self.api, &mut self.list, &mut self.notifications)
            .await
    }

    pub fn start_delete(&mut self, id: UserId) -> Result<(), SurfaceError> {
        self.delete.open(id)
    }

    pub fn cancel_delete(&mut self) -> Result<(), SurfaceError> {
        self.delete.cancel()
    }

    pub async fn commit_delete(&mut self) -> Result<MutationOutcome, SurfaceError> {
        self.delete
            .commit(&self.api, &mut self.list, &mut self.notifications)
            .await
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    pub fn login(&self) -> &LoginSurface {
        &self.login
    }

    pub fn list(&self) -> &ListController {
        &self.list
    }

    pub fn edit(&self) -> &EditWorkflow {
        &self.edit
    }

    pub fn delete(&self) -> &DeleteWorkflow {
        &self.delete
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut Notifications {
        &mut self.notifications
    }
}
