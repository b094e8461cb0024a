use std::time::Duration;

use raven_content::TunableTable;
use raven_core::{
    ArenaLayout, BotStatus, Delivery, DispatchOutcome, EntityId, MessageKind, Payload, Team,
    Vector2D, World,
};
use raven_runtime::{CombatEvent, Event, Runtime, RuntimeConfig, Topic};
use tokio::time::timeout;

fn arena() -> ArenaLayout {
    ArenaLayout::new(500.0, 500.0)
        .with_boundary_walls()
        .with_spawn_point(Vector2D::new(60.0, 60.0))
        .with_spawn_point(Vector2D::new(440.0, 440.0))
        .with_spawn_point(Vector2D::new(60.0, 440.0))
}

/// Manual stepping only; the cadence stays off so tests control time.
fn manual() -> RuntimeConfig {
    RuntimeConfig {
        autostart: false,
        ..RuntimeConfig::default()
    }
}

#[tokio::test]
async fn building_without_an_arena_fails() {
    assert!(Runtime::builder().build().await.is_err());
}

#[tokio::test]
async fn fatal_damage_is_published_on_the_combat_topic() {
    let runtime = Runtime::builder()
        .config(manual())
        .layout(arena())
        .bot(Team::Neutral)
        .bot(Team::Neutral)
        .build()
        .await
        .expect("runtime starts");
    let handle = runtime.handle();
    let mut combat = handle.subscribe(Topic::Combat);

    handle.step(1).await.expect("step");
    let [shooter, victim] = [EntityId(0), EntityId(1)];
    let outcome = handle
        .dispatch(
            Delivery::Immediate,
            shooter,
            victim,
            MessageKind::Damage,
            Payload::Damage(500),
        )
        .await
        .expect("dispatch");
    assert_eq!(outcome, DispatchOutcome::Delivered { consumed: true });

    let killed = timeout(Duration::from_secs(1), async {
        loop {
            match combat.recv().await {
                Ok(Event::Combat(CombatEvent::BotKilled { victim, killer, .. })) => {
                    return (victim, killer);
                }
                Ok(_) => continue,
                Err(error) => panic!("combat topic closed: {error}"),
            }
        }
    })
    .await
    .expect("kill event arrives");
    assert_eq!(killed, (victim, shooter));

    let scores = handle.scoreboard().await.expect("scoreboard");
    assert_eq!(scores[0].score, 1);
    assert_eq!(scores[1].status, BotStatus::Dead);

    drop(handle);
    runtime.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn delayed_telegrams_arrive_after_their_delay() {
    let runtime = Runtime::builder()
        .config(manual())
        .layout(arena())
        .bot(Team::Neutral)
        .build()
        .await
        .expect("runtime starts");
    let handle = runtime.handle();
    handle.step(1).await.expect("step");
    let bot = EntityId(0);

    let outcome = handle
        .dispatch(
            Delivery::Delayed(0.05),
            EntityId::WORLD,
            bot,
            MessageKind::Damage,
            Payload::Damage(10),
        )
        .await
        .expect("dispatch");
    assert_eq!(outcome, DispatchOutcome::Queued);

    handle.step(1).await.expect("step");
    assert_eq!(handle.bot(bot).await.unwrap().unwrap().health, 100);

    handle.step(3).await.expect("step");
    assert_eq!(handle.bot(bot).await.unwrap().unwrap().health, 90);
}

#[tokio::test]
async fn every_tick_is_announced() {
    let runtime = Runtime::builder()
        .config(manual())
        .layout(arena())
        .bot(Team::Neutral)
        .build()
        .await
        .expect("runtime starts");
    let handle = runtime.handle();
    let mut ticks = handle.subscribe(Topic::Tick);

    assert_eq!(handle.step(2).await.expect("step"), 2);

    for expected in 1..=2 {
        match ticks.recv().await.expect("tick event") {
            Event::Tick(tick) => {
                assert_eq!(tick.tick, expected);
                assert_eq!(tick.alive_bots, 1);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
}

#[tokio::test]
async fn parallel_and_sequential_updates_both_run_a_match() {
    for parallel_bots in [true, false] {
        let config = RuntimeConfig {
            parallel_bots,
            ..manual()
        };
        let runtime = Runtime::builder()
            .config(config)
            .layout(arena())
            .seed(11)
            .bot(Team::Neutral)
            .bot(Team::Neutral)
            .bot(Team::Neutral)
            .build()
            .await
            .expect("runtime starts");
        let handle = runtime.handle();

        handle.step(240).await.expect("step");

        let (ticks, time) = handle.time().await.expect("time");
        assert_eq!(ticks, 240);
        assert!((time - 4.0).abs() < 1e-6);
        let scores = handle.scoreboard().await.expect("scoreboard");
        assert_eq!(scores.len(), 3);
        for entry in scores {
            assert!((0..=100).contains(&entry.health));
        }
    }
}

#[tokio::test]
async fn possession_round_trips_through_the_handle() {
    let tunables = TunableTable::raven_defaults().expect("stock tunables");
    let world = World::from_tunables(arena(), &tunables, 3).expect("world builds");
    let runtime = Runtime::builder()
        .config(manual())
        .world(world)
        .build()
        .await
        .expect("runtime starts");
    let handle = runtime.handle();
    let bot = handle.add_bot(Team::Neutral).await.expect("bot added");

    assert!(!handle.possess(bot).await.expect("possess"));
    handle.step(1).await.expect("step");
    assert!(handle.possess(bot).await.expect("possess"));
    assert!(
        handle
            .move_possessed_to(Vector2D::new(200.0, 200.0), false)
            .await
            .expect("move")
    );
    assert_eq!(handle.exorcise().await.expect("exorcise"), Some(bot));
    assert!(handle.possess(EntityId(77)).await.is_err());
}

#[tokio::test]
async fn the_cadence_ticks_on_its_own() {
    let config = RuntimeConfig {
        tick_interval: Duration::from_millis(2),
        ..RuntimeConfig::default()
    };
    let runtime = Runtime::builder()
        .config(config)
        .layout(arena())
        .build()
        .await
        .expect("runtime starts");
    let handle = runtime.handle();
    let mut ticks = handle.subscribe(Topic::Tick);

    let first = timeout(Duration::from_secs(2), ticks.recv())
        .await
        .expect("a tick within the timeout")
        .expect("tick topic open");
    assert!(matches!(first, Event::Tick(_)));

    handle.set_running(false).await.expect("pause");
}
