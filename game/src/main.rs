use anyhow::Result;
use bevy_app::App;
use bevy_time::{TimePlugin, TimeUpdateStrategy};
use clap::Parser;
use tokio::time::{self, Duration, Instant, MissedTickBehavior};
use tracing::{info, warn};

use game::{
    SimPlugin,
    components::Player,
    config::{Args, init_tracing, load_wave_book},
    resources::{NetIds, PeerRole, SimRng, SimSettings, WaveProgress},
};

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    let book = load_wave_book(args.wave_book.as_deref())?;
    let tick_duration = Duration::from_nanos(1_000_000_000 / u64::from(args.tick_rate));

    let mut app = App::new();
    app.add_plugins(TimePlugin)
        .insert_resource(TimeUpdateStrategy::ManualDuration(tick_duration))
        .insert_resource(SimSettings {
            players: args.players,
            autopilot: !args.no_autopilot,
            wave_limit: args.waves,
        })
        .insert_resource(SimRng::seeded(args.seed))
        .insert_resource(WaveProgress::with_book(book))
        .insert_resource(PeerRole::Solo)
        .insert_resource(NetIds::for_role(PeerRole::Solo))
        .add_plugins(SimPlugin);

    info!(
        "starting run: seed {}, {} player(s), {} ticks/s",
        args.seed, args.players, args.tick_rate
    );

    let mut interval = args.realtime.then(|| {
        let mut interval = time::interval(tick_duration);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        interval
    });

    let mut tick: u64 = 0;
    loop {
        if let Some(interval) = interval.as_mut() {
            interval.tick().await;
        }

        let update_start = Instant::now();
        app.update();
        let update_elapsed = update_start.elapsed();

        if args.realtime && update_elapsed > tick_duration {
            warn!(
                "tick {} took {:.2}ms (exceeded {:.2}ms budget)",
                tick,
                update_elapsed.as_secs_f64() * 1000.0,
                tick_duration.as_secs_f64() * 1000.0
            );
        }

        tick += 1;
        if app.world().resource::<WaveProgress>().run_over {
            break;
        }
        if args.max_ticks.is_some_and(|max| tick >= max) {
            warn!("stopping after {tick} ticks");
            break;
        }
    }

    let waves = app.world().resource::<WaveProgress>().history.len();
    info!("run over after {tick} ticks, {waves} wave(s) cleared");

    let mut players = app.world_mut().query::<&Player>();
    for player in players.iter(app.world()) {
        info!(
            "player {}: score {}, money {}{}",
            player.slot.0 + 1,
            player.score,
            player.money,
            if player.downed { " (downed)" } else { "" }
        );
    }

    Ok(())
}
