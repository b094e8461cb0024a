use raven_core::{
    ArenaLayout, BotConfig, Delivery, DispatchOutcome, EntityId, MessageKind, Payload, Team,
    Vector2D, WeaponConfig, WeaponType, World, WorldEvent,
};

fn world() -> (World, EntityId, EntityId) {
    let layout = ArenaLayout::new(400.0, 400.0)
        .with_spawn_point(Vector2D::new(50.0, 50.0))
        .with_spawn_point(Vector2D::new(350.0, 350.0))
        .with_weapon_cache(Team::Neutral, Vector2D::new(200.0, 200.0), 10.0);
    let mut world = World::new(layout, BotConfig::default(), WeaponConfig::default(), 1);
    let cache = world.caches().next().map(|cache| cache.id()).unwrap();
    let bot = world.add_bot(Team::Neutral).unwrap();
    world.update_lifecycle();
    (world, cache, bot)
}

fn deposit(world: &mut World, cache: EntityId, delay: f64, kind: WeaponType) -> DispatchOutcome {
    world.dispatch_message(
        Delivery::Delayed(delay),
        EntityId::WORLD,
        cache,
        MessageKind::DepositWeapon,
        Payload::Weapon(kind),
    )
}

#[test]
fn delayed_telegrams_wait_for_their_dispatch_time() {
    let (mut world, _, bot) = world();
    world.begin_tick(10.0);

    let outcome = world.dispatch_message(
        Delivery::Delayed(2.0),
        EntityId::WORLD,
        bot,
        MessageKind::Damage,
        Payload::Damage(10),
    );
    assert_eq!(outcome, DispatchOutcome::Queued);

    world.begin_tick(0.5);
    assert_eq!(world.bot(bot).unwrap().health(), 100);
    world.begin_tick(1.0);
    assert_eq!(world.bot(bot).unwrap().health(), 100);
    assert_eq!(world.pending_messages(), 1);

    world.begin_tick(0.6);
    assert_eq!(world.bot(bot).unwrap().health(), 90);
    assert_eq!(world.pending_messages(), 0);
}

#[test]
fn due_telegrams_arrive_in_dispatch_time_order() {
    let (mut world, cache, _) = world();

    deposit(&mut world, cache, 3.0, WeaponType::RailGun);
    deposit(&mut world, cache, 1.0, WeaponType::Shotgun);
    deposit(&mut world, cache, 2.0, WeaponType::RocketLauncher);
    deposit(&mut world, cache, 2.0, WeaponType::GrenadeLauncher);

    world.begin_tick(5.0);

    let stock = world.caches().next().unwrap().weapons().to_vec();
    assert_eq!(
        stock,
        vec![
            WeaponType::Shotgun,
            WeaponType::RocketLauncher,
            WeaponType::GrenadeLauncher,
            WeaponType::RailGun,
        ]
    );
}

#[test]
fn non_positive_delays_are_delivered_immediately() {
    let (mut world, cache, _) = world();

    assert_eq!(
        deposit(&mut world, cache, 0.0, WeaponType::Shotgun),
        DispatchOutcome::Delivered { consumed: true }
    );
    assert_eq!(
        deposit(&mut world, cache, -4.0, WeaponType::RailGun),
        DispatchOutcome::Delivered { consumed: true }
    );
    assert_eq!(world.pending_messages(), 0);
}

#[test]
fn queued_telegrams_to_removed_bots_are_dropped() {
    let (mut world, _, bot) = world();
    world.set_event_recording(true);
    world.dispatch_message(
        Delivery::Delayed(1.0),
        EntityId::WORLD,
        bot,
        MessageKind::Damage,
        Payload::Damage(10),
    );
    world.remove_bot(bot).unwrap();

    world.begin_tick(2.0);

    let dropped = world
        .drain_events()
        .into_iter()
        .filter(|event| matches!(event, WorldEvent::TelegramDropped { telegram } if telegram.receiver == bot))
        .count();
    assert_eq!(dropped, 1);
}
