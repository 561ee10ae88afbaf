use crate::{
    error::{AppError, Result},
    services::{
        interaction::types::{Lane, Modal, Submission, Ticket, Workflow},
        pixel_map::types::PixelSnapshot,
        session::SessionStore,
        wish::{WishDraft, WishPayload, validate},
    },
};

pub mod types;

pub use types::{Completed, Pending};

/// Finite-state machine deciding which dialog is shown.
///
/// Every entry into a workflow bumps the workflow generation, and every open or close of
/// the wallet overlay bumps the wallet generation. Results of suspended operations are
/// applied only while the ticket they were started with is still current.
#[derive(Debug)]
pub struct InteractionController {
    workflow: Workflow,
    wallet_modal_open: bool,
    workflow_generation: u64,
    wallet_generation: u64,
    default_color: String,
}

impl InteractionController {
    pub fn new(default_color: impl Into<String>) -> Self {
        Self {
            workflow: Workflow::Idle,
            wallet_modal_open: false,
            workflow_generation: 0,
            wallet_generation: 0,
            default_color: default_color.into(),
        }
    }

    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    pub fn submission(&self) -> Option<&Submission> {
        match &self.workflow {
            Workflow::SubmittingWish(submission) => Some(submission),
            _ => None,
        }
    }

    pub fn is_wallet_modal_open(&self) -> bool {
        self.wallet_modal_open
    }

    pub fn modals(&self) -> Vec<Modal> {
        let mut modals = Vec::with_capacity(2);
        match self.workflow {
            Workflow::Idle => {}
            Workflow::ViewingWish(_) => modals.push(Modal::ViewWish),
            Workflow::SubmittingWish(_) => modals.push(Modal::SubmitWish),
            Workflow::RequiringLogin(_) => modals.push(Modal::Login),
        }
        if self.wallet_modal_open {
            modals.push(Modal::ConnectWallet);
        }
        modals
    }

    fn enter(&mut self, next: Workflow) {
        self.workflow_generation += 1;
        tracing::debug!(
            from = self.workflow.name(),
            to = next.name(),
            generation = self.workflow_generation,
            "Workflow transition"
        );
        self.workflow = next;
    }

    fn start_submission(&self, pixel: PixelSnapshot, session: &SessionStore) -> Workflow {
        let draft = WishDraft::new(self.default_color.clone(), session.wallet_address());
        Workflow::SubmittingWish(Submission::new(pixel, draft))
    }

    pub fn click_pixel(
        &mut self,
        pixel: PixelSnapshot,
        session: &SessionStore,
    ) -> Result<&Workflow> {
        if !self.workflow.is_idle() {
            return Err(AppError::InvalidWorkflowTransition);
        }

        let next = if pixel.has_wish {
            Workflow::ViewingWish(pixel)
        } else if session.is_authenticated() {
            self.start_submission(pixel, session)
        } else {
            Workflow::RequiringLogin(Some(pixel))
        };

        self.enter(next);
        Ok(&self.workflow)
    }

    /// Header login button: login without a pending pixel.
    pub fn open_login(&mut self) -> Result<()> {
        match self.workflow {
            Workflow::Idle => {
                self.enter(Workflow::RequiringLogin(None));
                Ok(())
            }
            Workflow::RequiringLogin(_) => Ok(()),
            _ => Err(AppError::InvalidWorkflowTransition),
        }
    }

    /// Swaps the pixel held by the login prompt for a fresher snapshot, if one is known.
    pub fn refresh_pending(&mut self, latest: impl FnOnce(u32) -> Option<PixelSnapshot>) {
        if let Workflow::RequiringLogin(Some(pixel)) = &mut self.workflow
            && let Some(fresh) = latest(pixel.pixel_id)
        {
            *pixel = fresh;
        }
    }

    /// A pending pixel resumes into the submission form, or into the wish view when it has
    /// been claimed in the meantime.
    pub fn on_authenticated(&mut self, session: &SessionStore) {
        if !session.is_authenticated() {
            return;
        }

        let Workflow::RequiringLogin(pending) = &self.workflow else {
            return;
        };

        let next = match pending.clone() {
            Some(pixel) if pixel.has_wish => Workflow::ViewingWish(pixel),
            Some(pixel) => self.start_submission(pixel, session),
            None => Workflow::Idle,
        };
        self.enter(next);
    }

    pub fn on_signed_out(&mut self) {
        if let Workflow::SubmittingWish(submission) = &self.workflow {
            let pixel = submission.pixel.clone();
            self.enter(Workflow::RequiringLogin(Some(pixel)));
        }
    }

    /// The main workflow does not move.
    pub fn on_wallet_connected(&mut self, address: &str) {
        if let Workflow::SubmittingWish(submission) = &mut self.workflow {
            submission.draft.wallet_address = address.to_string();
        }
        self.close_wallet_modal();
    }

    pub fn cancel(&mut self) -> Result<()> {
        match self.workflow {
            Workflow::Idle => Ok(()),
            Workflow::RequiringLogin(_) | Workflow::SubmittingWish(_) => {
                self.enter(Workflow::Idle);
                Ok(())
            }
            Workflow::ViewingWish(_) => Err(AppError::InvalidWorkflowTransition),
        }
    }

    pub fn close(&mut self) -> Result<()> {
        match self.workflow {
            Workflow::Idle => Ok(()),
            Workflow::ViewingWish(_) => {
                self.enter(Workflow::Idle);
                Ok(())
            }
            _ => Err(AppError::InvalidWorkflowTransition),
        }
    }

    pub fn edit_draft(&mut self, edit: impl FnOnce(&mut WishDraft)) -> Result<()> {
        match &mut self.workflow {
            Workflow::SubmittingWish(submission) if !submission.in_flight => {
                edit(&mut submission.draft);
                Ok(())
            }
            _ => Err(AppError::InvalidWorkflowTransition),
        }
    }

    pub fn open_wallet_modal(&mut self) {
        if !self.wallet_modal_open {
            self.wallet_generation += 1;
            self.wallet_modal_open = true;
        }
    }

    pub fn close_wallet_modal(&mut self) {
        if self.wallet_modal_open {
            self.wallet_generation += 1;
            self.wallet_modal_open = false;
        }
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        match ticket.lane() {
            Lane::Workflow => ticket.generation() == self.workflow_generation,
            Lane::Wallet => {
                self.wallet_modal_open && ticket.generation() == self.wallet_generation
            }
        }
    }

    pub fn login_ticket(&self) -> Result<Ticket> {
        match self.workflow {
            Workflow::RequiringLogin(_) => {
                Ok(Ticket::new(Lane::Workflow, self.workflow_generation))
            }
            _ => Err(AppError::InvalidWorkflowTransition),
        }
    }

    /// Wallet connects run either from the wallet overlay or from the button inside the
    /// submission form.
    pub fn connect_ticket(&self) -> Result<Ticket> {
        if self.wallet_modal_open {
            return Ok(Ticket::new(Lane::Wallet, self.wallet_generation));
        }
        match self.workflow {
            Workflow::SubmittingWish(_) => {
                Ok(Ticket::new(Lane::Workflow, self.workflow_generation))
            }
            _ => Err(AppError::InvalidWorkflowTransition),
        }
    }

    /// A validation failure is kept on the submission for inline display.
    pub fn begin_submit(&mut self) -> Result<(Ticket, u32, WishPayload)> {
        let ticket = Ticket::new(Lane::Workflow, self.workflow_generation);

        let Workflow::SubmittingWish(submission) = &mut self.workflow else {
            return Err(AppError::InvalidWorkflowTransition);
        };
        if submission.in_flight {
            return Err(AppError::InvalidWorkflowTransition);
        }

        match validate(&submission.draft) {
            Ok(payload) => {
                submission.in_flight = true;
                submission.last_error = None;
                Ok((ticket, submission.pixel.pixel_id, payload))
            }
            Err(error) => {
                submission.last_error = Some(error.user_safe_format().message);
                Err(error)
            }
        }
    }

    /// Returns `Ok(false)` when the result is stale. On rejection the form stays open with
    /// the draft intact.
    pub fn finish_submit(
        &mut self,
        completed: Completed<Result<PixelSnapshot>>,
    ) -> Result<bool> {
        if !self.is_current(completed.ticket) {
            tracing::debug!(
                generation = completed.ticket.generation(),
                "Discarding stale submission result"
            );
            return Ok(false);
        }

        match completed.value {
            Ok(pixel) => {
                self.enter(Workflow::ViewingWish(pixel));
                Ok(true)
            }
            Err(error) => {
                if let Workflow::SubmittingWish(submission) = &mut self.workflow {
                    submission.in_flight = false;
                    submission.last_error = Some(error.user_safe_format().message);
                }
                Err(error)
            }
        }
    }
}
