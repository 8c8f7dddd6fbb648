//! Rendering contract.
//!
//! The core never draws anything. It describes what should change as
//! [`RenderOp`]s, sound cues as [`Sfx`] and overlays as [`Presentation`]s,
//! then hands them to a [`Renderer`]. Renderer failures are logged and
//! swallowed; they never reach the state that triggered them.

use thiserror::Error;
use tracing::{debug, warn};

use crate::cards::CardId;
use crate::core::PlayerId;
use crate::rules::Controls;
use crate::zones::Zone;

/// Status line shown to the viewer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnHint {
    Yours,
    Opponent,
    RoundOver,
    /// No round has been received yet.
    Waiting,
}

/// One change to the rendered board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderOp {
    /// Drop every card element (new-round rebuild).
    ClearAll,
    /// Create a card element.
    Materialize {
        card: CardId,
        zone: Zone,
        index: usize,
        face_down: bool,
    },
    /// Relocate an existing element to another zone.
    Move {
        card: CardId,
        from: Zone,
        to: Zone,
        index: usize,
        animate: bool,
    },
    /// Reposition an element within its zone.
    Reorder { card: CardId, zone: Zone, index: usize },
    Remove { card: CardId, zone: Zone },
    SetFaceDown { card: CardId, face_down: bool },
    /// Number of back-only placeholders for the opponent's hand.
    OpponentHandCount(usize),
    /// Highlight a card the opponent just put on their stage.
    MarkOpponentPlay(CardId),
    Controls(Controls),
    TurnHint(TurnHint),
    /// Highlighted hand card, if any.
    Selection(Option<CardId>),
}

/// Sound cues.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sfx {
    CardDeal,
    CardFly,
    CardChoose,
}

impl Sfx {
    /// Asset name of the cue.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Sfx::CardDeal => "card_deal",
            Sfx::CardFly => "card_fly",
            Sfx::CardChoose => "card_choose",
        }
    }
}

/// Overlays driven by the round lifecycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Presentation {
    /// A new round is on the table.
    RoundIntro { open: CardId },
    /// The guessed card next to the real hidden card.
    RevealComparison { chosen: CardId, hidden: CardId },
    RoundOver { winner: PlayerId, viewer_won: bool },
    DismissRoundOver,
    GuessPicker { candidates: Vec<CardId> },
    CloseGuessPicker,
}

/// A renderer backend refused an operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("render backend failed: {0}")]
pub struct RenderError(pub String);

/// Rendering backend.
pub trait Renderer {
    fn apply(&mut self, op: &RenderOp) -> Result<(), RenderError>;

    fn play_sfx(&mut self, sfx: Sfx) -> Result<(), RenderError>;

    fn present(&mut self, presentation: &Presentation) -> Result<(), RenderError>;
}

/// Everything one event wants rendered, in emission order per channel.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewUpdate {
    pub ops: Vec<RenderOp>,
    pub sfx: Vec<Sfx>,
    pub presentations: Vec<Presentation>,
}

impl ViewUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty() && self.sfx.is_empty() && self.presentations.is_empty()
    }

    /// Append another update after this one.
    pub fn extend(&mut self, other: ViewUpdate) {
        self.ops.extend(other.ops);
        self.sfx.extend(other.sfx);
        self.presentations.extend(other.presentations);
    }
}

/// Push an update to `renderer`, swallowing failures.
pub fn render_update<R: Renderer + ?Sized>(renderer: &mut R, update: &ViewUpdate) {
    for op in &update.ops {
        if let Err(err) = renderer.apply(op) {
            warn!(?op, %err, "render op failed");
        }
    }
    for &sfx in &update.sfx {
        if let Err(err) = renderer.play_sfx(sfx) {
            warn!(sfx = sfx.name(), %err, "sfx failed");
        }
    }
    for presentation in &update.presentations {
        if let Err(err) = renderer.present(presentation) {
            warn!(?presentation, %err, "presentation failed");
        }
    }
}

/// Renderer that keeps everything it is given. Used by tests and the demo.
#[derive(Clone, Debug, Default)]
pub struct RecordingRenderer {
    pub ops: Vec<RenderOp>,
    pub sfx: Vec<Sfx>,
    pub presentations: Vec<Presentation>,
    /// Reject every call after recording it.
    pub fail: bool,
}

impl RecordingRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Renderer whose every call fails.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Forget what has been recorded so far.
    pub fn clear(&mut self) {
        self.ops.clear();
        self.sfx.clear();
        self.presentations.clear();
    }

    fn outcome(&self) -> Result<(), RenderError> {
        if self.fail {
            Err(RenderError("recording renderer set to fail".to_string()))
        } else {
            Ok(())
        }
    }
}

impl Renderer for RecordingRenderer {
    fn apply(&mut self, op: &RenderOp) -> Result<(), RenderError> {
        self.ops.push(op.clone());
        self.outcome()
    }

    fn play_sfx(&mut self, sfx: Sfx) -> Result<(), RenderError> {
        self.sfx.push(sfx);
        self.outcome()
    }

    fn present(&mut self, presentation: &Presentation) -> Result<(), RenderError> {
        self.presentations.push(presentation.clone());
        self.outcome()
    }
}

/// Renderer that writes everything to the `tracing` log.
#[derive(Clone, Debug)]
pub struct LogRenderer {
    viewer: PlayerId,
}

impl LogRenderer {
    #[must_use]
    pub fn new(viewer: PlayerId) -> Self {
        Self { viewer }
    }
}

impl Renderer for LogRenderer {
    fn apply(&mut self, op: &RenderOp) -> Result<(), RenderError> {
        debug!(viewer = %self.viewer, ?op, "render");
        Ok(())
    }

    fn play_sfx(&mut self, sfx: Sfx) -> Result<(), RenderError> {
        debug!(viewer = %self.viewer, sfx = sfx.name(), "sfx");
        Ok(())
    }

    fn present(&mut self, presentation: &Presentation) -> Result<(), RenderError> {
        debug!(viewer = %self.viewer, ?presentation, "present");
        Ok(())
    }
}
