//! # duel-loopback
//!
//! Plays a few rounds between two bots over an in-memory link, with the
//! full host/guest pipeline: intents, snapshots, prediction and
//! reconciliation. Render output goes to the log.
//!
//! ## Example
//!
//! ```bash
//! RUST_LOG=card_feel=debug duel-loopback --seed 7 --rounds 3
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use card_feel::rules::guess_candidates;
use card_feel::session::{pump, Flow};
use card_feel::transport::Endpoint;
use card_feel::{
    GameRng, LocalInput, LogRenderer, LoopbackLink, Peer, RoomCode, Seat, SessionConfig,
    Transport,
};

/// Bot-vs-bot duel over a loopback link.
#[derive(Parser, Debug)]
#[command(name = "duel-loopback")]
#[command(version, about, long_about = None)]
struct Cli {
    /// TOML session config
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Seed for dealing and for the bots
    #[arg(long, short)]
    seed: Option<u64>,

    /// Rounds to play before hanging up
    #[arg(long, short, default_value = "3")]
    rounds: u32,

    /// Render guest moves only once the host confirms them
    #[arg(long)]
    pessimistic: bool,

    /// Give up after this many idle iterations
    #[arg(long, default_value = "1000")]
    max_steps: u32,
}

type Bot = Peer<card_feel::ChannelTransport, LogRenderer>;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => SessionConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => SessionConfig::new(),
    };
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if cli.pessimistic {
        config.optimistic_guest = false;
    }

    let mut rng = GameRng::from_seed_option(config.seed);
    let room = RoomCode::generate(&mut rng);
    info!(room = %room, host = %room.host_peer_id(), seed = rng.seed(), "opening table");

    let LoopbackLink {
        host: mut host_end,
        guest: mut guest_end,
    } = LoopbackLink::connected();

    let mut host = Peer::new(
        host_end.transport.clone(),
        LogRenderer::new(Seat::Host.role()),
        config.clone(),
    )?;
    let mut guest = Peer::new(
        guest_end.transport.clone(),
        LogRenderer::new(Seat::Guest.role()),
        config,
    )?;

    let mut finished = 0;
    let mut last_ended = None;
    let mut steps = 0;

    loop {
        let flows = [
            pump(&mut host, &mut host_end.events),
            pump(&mut guest, &mut guest_end.events),
        ];
        if flows.contains(&Flow::Stop) {
            break;
        }

        if let Some(state) = host.host_state().filter(|s| s.ended) {
            if last_ended != Some(state.version) {
                last_ended = Some(state.version);
                finished += 1;
                info!(round = finished, winner = ?state.winner, "round finished");
                if finished >= cli.rounds {
                    host_end.transport.disconnect();
                    continue;
                }
                host_end.input(LocalInput::NewRound);
                continue;
            }
        }

        let acted = act(&host, &host_end, &mut rng) || act(&guest, &guest_end, &mut rng);
        if !acted {
            steps += 1;
            if steps >= cli.max_steps {
                warn!(steps, "no progress, hanging up");
                host_end.transport.disconnect();
            }
        }
    }

    info!(rounds = finished, connected = host_end.transport.is_connected(), "table closed");
    Ok(())
}

/// Queue one input for `peer` if it holds the turn.
fn act(peer: &Bot, endpoint: &Endpoint, rng: &mut GameRng) -> bool {
    let Some(view) = peer.view() else {
        return false;
    };
    let Some(state) = view.effective() else {
        return false;
    };
    let me = view.viewer();
    let controls = view.controls();
    let hand = &state.hands[me];

    if controls.guess && (hand.is_empty() || rng.gen_bool(0.2)) {
        let candidates = guess_candidates(state, me);
        if let Some(&card) = rng.choose(&candidates) {
            endpoint.input(LocalInput::OpenGuessPicker);
            endpoint.input(LocalInput::Guess(card));
            return true;
        }
    }
    if controls.play && !hand.is_empty() {
        let index = rng.gen_range_usize(0..hand.len());
        endpoint.input(LocalInput::Select(hand[index]));
        endpoint.input(LocalInput::Play);
        return true;
    }
    if controls.end {
        endpoint.input(LocalInput::EndTurn);
        return true;
    }
    false
}
