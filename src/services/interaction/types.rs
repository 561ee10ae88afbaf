use futures::future::BoxFuture;

use crate::services::{pixel_map::types::PixelSnapshot, wish::types::WishDraft};

/// Independent generation counters: the main workflow, and the wallet overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lane {
    Workflow,
    Wallet,
}

/// Identifies the workflow entry a suspended operation was started from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    lane: Lane,
    generation: u64,
}

impl Ticket {
    pub(crate) fn new(lane: Lane, generation: u64) -> Self {
        Self { lane, generation }
    }

    pub fn lane(&self) -> Lane {
        self.lane
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// A suspended operation handed to the host. Await it with [`Pending::wait`] and give the
/// [`Completed`] value back to the board.
pub struct Pending<T> {
    ticket: Ticket,
    future: BoxFuture<'static, T>,
}

impl<T> Pending<T> {
    pub fn new(ticket: Ticket, future: BoxFuture<'static, T>) -> Self {
        Self { ticket, future }
    }

    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    pub async fn wait(self) -> Completed<T> {
        Completed {
            ticket: self.ticket,
            value: self.future.await,
        }
    }
}

#[derive(Debug)]
pub struct Completed<T> {
    pub ticket: Ticket,
    pub value: T,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub pixel: PixelSnapshot,
    pub draft: WishDraft,
    pub in_flight: bool,
    pub last_error: Option<String>,
}

impl Submission {
    pub fn new(pixel: PixelSnapshot, draft: WishDraft) -> Self {
        Self {
            pixel,
            draft,
            in_flight: false,
            last_error: None,
        }
    }
}

/// Main interaction lane. Exactly one is active; the wallet overlay is tracked beside it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Workflow {
    #[default]
    Idle,
    ViewingWish(PixelSnapshot),
    SubmittingWish(Submission),
    /// `None` when login was opened from the header rather than from a pixel.
    RequiringLogin(Option<PixelSnapshot>),
}

impl Workflow {
    pub fn name(&self) -> &'static str {
        match self {
            Workflow::Idle => "idle",
            Workflow::ViewingWish(_) => "viewing_wish",
            Workflow::SubmittingWish(_) => "submitting_wish",
            Workflow::RequiringLogin(_) => "requiring_login",
        }
    }

    pub fn pixel(&self) -> Option<&PixelSnapshot> {
        match self {
            Workflow::Idle => None,
            Workflow::ViewingWish(pixel) => Some(pixel),
            Workflow::SubmittingWish(submission) => Some(&submission.pixel),
            Workflow::RequiringLogin(pending) => pending.as_ref(),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Workflow::Idle)
    }
}

/// Dialogs the host should have open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    ViewWish,
    SubmitWish,
    Login,
    ConnectWallet,
}
