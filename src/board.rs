use crate::{
    Collaborators,
    config::Config,
    error::{AppError, Result, UserNotice},
    infrastructure::{identity::UserDirectory, pixels::PixelService},
    services::{
        interaction::{
            Completed, InteractionController, Pending,
            types::{Modal, Submission, Workflow},
        },
        pixel_map::{PixelMap, types::PixelSnapshot},
        session::{CheckedToken, SessionStore, TokenCheck, types::AuthGrant},
        wallet::{ProviderKind, WalletConnection, WalletRegistry},
        wish::{WishCoordinator, WishDraft},
    },
};
use std::sync::Arc;

/// Owns every piece of interaction state. A session change is fully applied to the
/// [`SessionStore`] before the controller evaluates the resulting transition.
///
/// Suspending operations come in pairs: `begin_*` returns a [`Pending`] for the host to
/// await, `apply_*` takes the [`Completed`] result back. Results whose ticket went stale in
/// the meantime are dropped and `apply_*` returns `Ok(false)`.
pub struct WishBoard {
    config: Config,
    session: SessionStore,
    wallets: WalletRegistry,
    controller: InteractionController,
    coordinator: WishCoordinator,
    pixel_service: Arc<dyn PixelService>,
    pixel_map: PixelMap,
}

impl WishBoard {
    pub fn new(config: Config, collaborators: Collaborators) -> Result<Self> {
        config.validate()?;

        let directory = UserDirectory::new(collaborators.identity, &config.session);
        let controller = InteractionController::new(config.wish.default_color.clone());

        Ok(Self {
            session: SessionStore::new(collaborators.storage, directory),
            wallets: WalletRegistry::new(collaborators.host),
            controller,
            coordinator: WishCoordinator::new(collaborators.pixels.clone()),
            pixel_service: collaborators.pixels,
            pixel_map: PixelMap::new(),
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn wallets(&self) -> &WalletRegistry {
        &self.wallets
    }

    pub fn pixel_map(&self) -> &PixelMap {
        &self.pixel_map
    }

    pub fn workflow(&self) -> &Workflow {
        self.controller.workflow()
    }

    pub fn submission(&self) -> Option<&Submission> {
        self.controller.submission()
    }

    pub fn modals(&self) -> Vec<Modal> {
        self.controller.modals()
    }

    pub fn available_wallets(&self) -> Vec<ProviderKind> {
        self.wallets.list_available()
    }

    /// Restores persisted sessions and hands back the stored token's validation, if there is
    /// one, for the host to await.
    pub fn restore_session(&mut self) -> Result<Option<TokenCheck>> {
        let token = self.session.restore()?;
        Ok(token.map(|token| self.session.validate_token(token)))
    }

    /// An expired token is not an error here: the session downgrades and the returned
    /// notice (always silent) says so.
    pub fn apply_token_check(&mut self, checked: CheckedToken) -> Result<Option<UserNotice>> {
        match self.session.apply_validation(checked) {
            Ok(()) => {
                self.resume_after_login();
                Ok(None)
            }
            Err(error @ AppError::SessionExpired) => {
                self.controller.on_signed_out();
                Ok(Some(error.user_safe_format()))
            }
            Err(error) => Err(error),
        }
    }

    pub async fn rehydrate(&mut self) -> Result<Option<UserNotice>> {
        match self.restore_session()? {
            Some(check) => {
                let checked = check.wait().await;
                self.apply_token_check(checked)
            }
            None => Ok(None),
        }
    }

    pub async fn refresh_pixels(&mut self) -> Result<()> {
        self.pixel_map.refresh(self.pixel_service.as_ref()).await
    }

    pub fn click_pixel(&mut self, pixel_id: u32) -> Result<&Workflow> {
        let pixel = self
            .pixel_map
            .get(pixel_id)
            .cloned()
            .ok_or_else(|| AppError::InvalidParams(format!("Unknown pixel {pixel_id}")))?;
        self.controller.click_pixel(pixel, &self.session)
    }

    /// Click with a snapshot supplied by the host rather than looked up in the local map.
    pub fn click(&mut self, pixel: PixelSnapshot) -> Result<&Workflow> {
        self.controller.click_pixel(pixel, &self.session)
    }

    pub fn open_login(&mut self) -> Result<()> {
        self.controller.open_login()
    }

    pub fn begin_login(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<Pending<Result<AuthGrant>>> {
        let ticket = self.controller.login_ticket()?;
        Ok(Pending::new(ticket, self.session.login(email, password)))
    }

    pub fn begin_register(
        &mut self,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<Pending<Result<AuthGrant>>> {
        let ticket = self.controller.login_ticket()?;
        let registration = self.session.register(email, password, confirm_password)?;
        Ok(Pending::new(ticket, registration))
    }

    pub fn apply_login(&mut self, completed: Completed<Result<AuthGrant>>) -> Result<bool> {
        if !self.controller.is_current(completed.ticket) {
            tracing::debug!(
                generation = completed.ticket.generation(),
                "Discarding stale login result"
            );
            return Ok(false);
        }

        let grant = completed.value?;
        self.session.set_auth(grant)?;
        self.resume_after_login();
        Ok(true)
    }

    /// The pixel held by the login prompt may have been claimed since it was clicked.
    fn resume_after_login(&mut self) {
        self.controller
            .refresh_pending(|pixel_id| self.pixel_map.get(pixel_id).cloned());
        self.controller.on_authenticated(&self.session);
    }

    pub fn logout(&mut self) -> Result<()> {
        self.session.logout()?;
        self.controller.on_signed_out();
        Ok(())
    }

    pub fn open_wallet_modal(&mut self) {
        self.controller.open_wallet_modal();
    }

    pub fn close_wallet_modal(&mut self) {
        self.controller.close_wallet_modal();
    }

    pub fn begin_connect(
        &mut self,
        kind: ProviderKind,
    ) -> Result<Pending<Result<WalletConnection>>> {
        let ticket = self.controller.connect_ticket()?;
        Ok(Pending::new(ticket, self.wallets.connect(kind)))
    }

    pub fn begin_auto_connect(&mut self) -> Result<Pending<Result<WalletConnection>>> {
        let ticket = self.controller.connect_ticket()?;
        Ok(Pending::new(ticket, self.wallets.auto_connect()))
    }

    pub fn apply_wallet(
        &mut self,
        completed: Completed<Result<WalletConnection>>,
    ) -> Result<bool> {
        if !self.controller.is_current(completed.ticket) {
            tracing::debug!(
                generation = completed.ticket.generation(),
                "Discarding stale wallet connection"
            );
            return Ok(false);
        }

        let connection = completed.value?;
        let address = connection.address.clone();
        self.session.set_wallet(connection)?;
        self.controller.on_wallet_connected(&address);
        Ok(true)
    }

    pub fn disconnect_wallet(&mut self) -> Result<()> {
        self.session.clear_wallet()
    }

    pub fn edit_draft(&mut self, edit: impl FnOnce(&mut WishDraft)) -> Result<()> {
        self.controller.edit_draft(edit)
    }

    /// Validation failures return before the pixel service is called.
    pub fn begin_submit(&mut self) -> Result<Pending<Result<PixelSnapshot>>> {
        let (ticket, pixel_id, payload) = self.controller.begin_submit()?;
        Ok(Pending::new(ticket, self.coordinator.submit(pixel_id, payload)))
    }

    /// The pixel map learns about a confirmed claim even when the form has moved on.
    pub fn apply_submission(
        &mut self,
        completed: Completed<Result<PixelSnapshot>>,
    ) -> Result<bool> {
        if let Ok(pixel) = &completed.value {
            self.pixel_map.record(pixel.clone());
        }
        self.controller.finish_submit(completed)
    }

    pub fn cancel(&mut self) -> Result<()> {
        self.controller.cancel()
    }

    pub fn close(&mut self) -> Result<()> {
        self.controller.close()
    }
}
