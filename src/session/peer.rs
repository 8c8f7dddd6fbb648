//! Single dispatch point for everything a peer receives.
//!
//! A `Peer` starts `Connecting`: it has a transport but no seat, and it
//! keeps only the newest snapshot that arrives. `Ready` seats it as host
//! or guest. From then on every frame is decoded into a [`Message`] and
//! matched exhaustively against the seat; a message meant for the other
//! seat is dropped.

use std::mem;

use tracing::{debug, info, warn};

use crate::core::{GameRng, GameState, SessionConfig};
use crate::error::ConfigError;
use crate::protocol::{Intent, Message};
use crate::render::{render_update, Renderer, ViewUpdate};
use crate::rules::{RoundRules, TurnCheck};
use crate::transport::Transport;

use super::event::{LocalInput, PeerEvent, Seat};
use super::guest::GuestSession;
use super::host::{Committed, HostSession};
use super::view::LocalView;

/// Whether the event loop should keep going.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Who holds authority once seated.
#[derive(Debug)]
pub enum Authority<T> {
    Host(HostSession<T>),
    Guest(GuestSession<T>),
}

#[derive(Debug)]
enum Phase<T> {
    Connecting {
        transport: T,
        buffered: Option<GameState>,
    },
    InGame {
        authority: Authority<T>,
        view: LocalView,
    },
    /// Only observable while a transition is in progress.
    Closed,
}

/// One end of a duel: transport, seat, local view and renderer.
#[derive(Debug)]
pub struct Peer<T, R> {
    phase: Phase<T>,
    renderer: R,
    config: SessionConfig,
    rules: RoundRules,
}

impl<T: Transport, R: Renderer> Peer<T, R> {
    /// Unseated peer. The config is checked here, before any round exists.
    pub fn new(transport: T, renderer: R, config: SessionConfig) -> Result<Self, ConfigError> {
        let rules = RoundRules::new(&config)?;
        Ok(Self {
            phase: Phase::Connecting {
                transport,
                buffered: None,
            },
            renderer,
            config,
            rules,
        })
    }

    /// Seat once `Ready` has been handled.
    #[must_use]
    pub fn seat(&self) -> Option<Seat> {
        match &self.phase {
            Phase::InGame {
                authority: Authority::Host(_),
                ..
            } => Some(Seat::Host),
            Phase::InGame {
                authority: Authority::Guest(_),
                ..
            } => Some(Seat::Guest),
            _ => None,
        }
    }

    #[must_use]
    pub fn view(&self) -> Option<&LocalView> {
        match &self.phase {
            Phase::InGame { view, .. } => Some(view),
            _ => None,
        }
    }

    /// Authoritative state, on the host only.
    #[must_use]
    pub fn host_state(&self) -> Option<&GameState> {
        match &self.phase {
            Phase::InGame {
                authority: Authority::Host(host),
                ..
            } => host.state(),
            _ => None,
        }
    }

    /// Snapshot held back while waiting for a seat.
    #[must_use]
    pub fn buffered(&self) -> Option<&GameState> {
        match &self.phase {
            Phase::Connecting { buffered, .. } => buffered.as_ref(),
            _ => None,
        }
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Handle one event to completion.
    ///
    /// `Disconnected` returns `Flow::Stop` and the peer is done. The
    /// loopback link has no reconnect path: both ends share one connected
    /// flag that never turns back on, so a seated peer cannot see another
    /// `Ready`. A transport that reconnects would need a new `Peer`.
    pub fn handle(&mut self, event: PeerEvent) -> Flow {
        let update = match event {
            PeerEvent::Ready(seat) => self.on_ready(seat),
            PeerEvent::Frame(bytes) => match Message::from_bytes(&bytes) {
                Ok(message) => self.on_message(message),
                Err(err) => {
                    warn!(%err, len = bytes.len(), "malformed frame dropped");
                    ViewUpdate::default()
                }
            },
            PeerEvent::Input(input) => self.on_input(input),
            PeerEvent::Disconnected => {
                info!(seat = ?self.seat(), "peer disconnected");
                return Flow::Stop;
            }
        };
        render_update(&mut self.renderer, &update);
        Flow::Continue
    }

    fn on_ready(&mut self, seat: Seat) -> ViewUpdate {
        let (transport, buffered) = match mem::replace(&mut self.phase, Phase::Closed) {
            Phase::Connecting {
                transport,
                buffered,
            } => (transport, buffered),
            other => {
                debug!(?seat, "already seated, ready ignored");
                self.phase = other;
                return ViewUpdate::default();
            }
        };

        info!(?seat, role = %seat.role(), "seated");
        let mut view = LocalView::new(seat.role());
        let (authority, update) = match seat {
            Seat::Host => {
                if buffered.is_some() {
                    debug!("host discards snapshot received before seating");
                }
                let rng = GameRng::from_seed_option(self.config.seed);
                let mut host = HostSession::with_rules(transport, self.rules.clone(), rng);
                let committed = host.deal();
                let update = apply_committed(&mut view, committed);
                (Authority::Host(host), update)
            }
            Seat::Guest => {
                let guest = GuestSession::with_rules(
                    transport,
                    self.rules.clone(),
                    self.config.optimistic_guest,
                );
                let update = buffered.map_or_else(ViewUpdate::default, |state| {
                    view.apply_snapshot(state)
                });
                (Authority::Guest(guest), update)
            }
        };

        self.phase = Phase::InGame { authority, view };
        update
    }

    fn on_message(&mut self, message: Message) -> ViewUpdate {
        match &mut self.phase {
            Phase::Connecting { buffered, .. } => {
                match message {
                    Message::State(state) => {
                        if buffered.is_some() {
                            debug!("buffered snapshot replaced by newer one");
                        }
                        *buffered = Some(state);
                    }
                    other => debug!(kind = other.kind(), "message before seating dropped"),
                }
                ViewUpdate::default()
            }
            Phase::InGame {
                authority: Authority::Host(host),
                view,
            } => match message {
                Message::Intent(intent) => host
                    .handle_intent(intent, Seat::Guest.role())
                    .map_or_else(ViewUpdate::default, |c| apply_committed(view, c)),
                Message::State(_) | Message::Reveal(_) => {
                    debug!(kind = message.kind(), "host ignores host-only message");
                    ViewUpdate::default()
                }
            },
            Phase::InGame {
                authority: Authority::Guest(_),
                view,
            } => match message {
                Message::State(state) => view.apply_snapshot(state),
                Message::Reveal(reveal) => view.on_reveal(reveal),
                Message::Intent(intent) => {
                    debug!(?intent, "guest ignores intent");
                    ViewUpdate::default()
                }
            },
            Phase::Closed => ViewUpdate::default(),
        }
    }

    fn on_input(&mut self, input: LocalInput) -> ViewUpdate {
        let Phase::InGame { authority, view } = &mut self.phase else {
            debug!(?input, "input before seating ignored");
            return ViewUpdate::default();
        };

        match input {
            LocalInput::Select(card) => return view.select(card),
            LocalInput::OpenGuessPicker => return view.open_guess_picker(),
            LocalInput::CloseGuessPicker => return view.close_guess_picker(),
            _ => {}
        }

        match authority {
            Authority::Host(host) => host_input(host, view, input),
            Authority::Guest(guest) => match input {
                LocalInput::Play => match view.selected() {
                    Some(card) => guest.play(view, card),
                    None => ViewUpdate::default(),
                },
                LocalInput::EndTurn => guest.end_turn(view),
                LocalInput::NewRound => {
                    guest.new_round();
                    ViewUpdate::default()
                }
                LocalInput::Guess(card) => guest.guess(view, card),
                LocalInput::Select(_)
                | LocalInput::OpenGuessPicker
                | LocalInput::CloseGuessPicker => ViewUpdate::default(),
            },
        }
    }
}

fn host_input<T: Transport>(
    host: &mut HostSession<T>,
    view: &mut LocalView,
    input: LocalInput,
) -> ViewUpdate {
    let me = view.viewer();
    let committed = match input {
        LocalInput::Play => view
            .selected()
            .and_then(|card| host.play(me, card, TurnCheck::Enforce)),
        LocalInput::EndTurn => host.end_turn(me),
        LocalInput::NewRound => Some(host.deal()),
        LocalInput::Guess(card) => {
            if !view.controls().guess {
                debug!(%card, "guess not available");
                return ViewUpdate::default();
            }
            let mut update = view.close_guess_picker();
            if let Some(committed) = host.handle_intent(
                Intent::Guess {
                    id: card,
                    from: Some(me),
                },
                me,
            ) {
                update.extend(apply_committed(view, committed));
            }
            return update;
        }
        LocalInput::Select(_) | LocalInput::OpenGuessPicker | LocalInput::CloseGuessPicker => None,
    };
    committed.map_or_else(ViewUpdate::default, |c| apply_committed(view, c))
}

/// Reconcile the host's own view from what it just broadcast.
fn apply_committed(view: &mut LocalView, committed: Committed) -> ViewUpdate {
    let mut update = view.apply_snapshot(committed.snapshot);
    if let Some(reveal) = committed.reveal {
        update.extend(view.on_reveal(reveal));
    }
    update
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Reveal;
    use crate::render::{Presentation, RecordingRenderer};
    use crate::transport::MockTransport;

    fn peer() -> (Peer<MockTransport, RecordingRenderer>, MockTransport) {
        let transport = MockTransport::new();
        let config = SessionConfig::new().with_seed(42);
        (Peer::new(transport.clone(), RecordingRenderer::new(), config).unwrap(), transport)
    }

    fn frame(message: &Message) -> PeerEvent {
        PeerEvent::Frame(message.to_bytes().unwrap())
    }

    fn dealt() -> GameState {
        crate::rules::RoundRules::default().deal(&mut crate::core::GameRng::new(3), 0)
    }

    #[test]
    fn test_host_deals_on_ready() {
        let (mut peer, transport) = peer();
        assert_eq!(peer.handle(PeerEvent::Ready(Seat::Host)), Flow::Continue);

        assert_eq!(peer.seat(), Some(Seat::Host));
        assert!(peer.host_state().is_some());
        assert_eq!(transport.sent_states().len(), 1);
        assert!(peer.renderer().sfx.contains(&crate::render::Sfx::CardDeal));
    }

    #[test]
    fn test_guest_buffers_newest_snapshot_until_ready() {
        let (mut peer, _) = peer();
        let first = dealt();
        let mut second = first.clone();
        second.version += 1;

        peer.handle(frame(&Message::State(first)));
        peer.handle(frame(&Message::State(second.clone())));
        assert_eq!(peer.buffered(), Some(&second));
        assert!(peer.renderer().ops.is_empty());

        peer.handle(PeerEvent::Ready(Seat::Guest));
        assert_eq!(peer.view().unwrap().confirmed(), Some(&second));
        assert!(!peer.renderer().ops.is_empty());
    }

    #[test]
    fn test_host_discards_buffer_and_deals() {
        let (mut peer, _) = peer();
        let mut stray = dealt();
        stray.version = 1;
        peer.handle(frame(&Message::State(stray.clone())));
        peer.handle(PeerEvent::Ready(Seat::Host));

        let state = peer.host_state().unwrap();
        assert_ne!(state.version, stray.version);
        assert_eq!(peer.view().unwrap().confirmed().map(|s| s.version), Some(state.version));
    }

    #[test]
    fn test_malformed_frame_is_dropped() {
        let (mut peer, _) = peer();
        peer.handle(PeerEvent::Ready(Seat::Guest));
        assert_eq!(peer.handle(PeerEvent::Frame(b"{oops".to_vec())), Flow::Continue);
        assert!(peer.view().unwrap().confirmed().is_none());
    }

    #[test]
    fn test_seat_mismatched_messages_ignored() {
        let (mut host, _) = peer();
        host.handle(PeerEvent::Ready(Seat::Host));
        let before = host.host_state().cloned();
        host.handle(frame(&Message::State(dealt())));
        assert_eq!(host.host_state().cloned(), before);

        let (mut guest, transport) = peer();
        guest.handle(PeerEvent::Ready(Seat::Guest));
        guest.handle(frame(&Message::Intent(Intent::New)));
        assert!(guest.view().unwrap().confirmed().is_none());
        assert!(transport.sent_messages().is_empty());
    }

    #[test]
    fn test_second_ready_ignored() {
        let (mut peer, transport) = peer();
        peer.handle(PeerEvent::Ready(Seat::Host));
        peer.handle(PeerEvent::Ready(Seat::Guest));
        assert_eq!(peer.seat(), Some(Seat::Host));
        assert_eq!(transport.sent_states().len(), 1);
    }

    #[test]
    fn test_disconnect_stops() {
        let (mut peer, _) = peer();
        assert_eq!(peer.handle(PeerEvent::Disconnected), Flow::Stop);
    }

    #[test]
    fn test_guest_reveal_then_state_presents_round_over_last() {
        let (mut peer, _) = peer();
        peer.handle(PeerEvent::Ready(Seat::Guest));
        let mut state = dealt();
        peer.handle(frame(&Message::State(state.clone())));

        let hidden = state.special.hidden.id;
        peer.handle(frame(&Message::Reveal(Reveal {
            chosen_id: hidden,
            hidden_id: hidden,
        })));
        assert!(!peer
            .renderer()
            .presentations
            .iter()
            .any(|p| matches!(p, Presentation::RoundOver { .. })));

        let guesser = state.turn;
        crate::rules::RoundRules::default().resolve_guess(&mut state, guesser, hidden);
        state.flags.is_new_round = false;
        peer.handle(frame(&Message::State(state)));

        let last = peer.renderer().presentations.last().unwrap();
        assert!(matches!(last, Presentation::RoundOver { .. }));
    }
}
