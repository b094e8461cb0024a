use raven_core::{
    ArenaLayout, BotConfig, BotStatus, Delivery, DispatchOutcome, EntityId, MessageKind, Outbox,
    Payload, ProjectileKind, ProjectileRequest, Team, Vector2D, WeaponConfig, WeaponType, World,
};

const FRAME: f64 = 1.0 / 60.0;

fn arena() -> ArenaLayout {
    ArenaLayout::new(400.0, 400.0)
        .with_boundary_walls()
        .with_spawn_point(Vector2D::new(50.0, 50.0))
        .with_spawn_point(Vector2D::new(80.0, 50.0))
}

fn world_with_two_bots(layout: ArenaLayout, teams: [Team; 2]) -> (World, EntityId, EntityId) {
    let mut world = World::new(layout, BotConfig::default(), WeaponConfig::default(), 42);
    let shooter = world.add_bot(teams[0]).expect("spawn points exist");
    let victim = world.add_bot(teams[1]).expect("spawn points exist");
    world.update_lifecycle();
    (world, shooter, victim)
}

fn damage(world: &mut World, from: EntityId, to: EntityId, amount: u32) -> DispatchOutcome {
    world.dispatch_message(
        Delivery::Immediate,
        from,
        to,
        MessageKind::Damage,
        Payload::Damage(amount),
    )
}

/// Two hits, the second fatal: the victim dies once and the shooter is
/// credited with exactly one kill.
#[test]
fn lethal_damage_scores_one_kill() {
    let (mut world, shooter, victim) = world_with_two_bots(arena(), [Team::Neutral; 2]);

    let outcome = damage(&mut world, shooter, victim, 30);
    assert_eq!(outcome, DispatchOutcome::Delivered { consumed: true });
    assert_eq!(world.bot(victim).unwrap().health(), 70);
    assert_eq!(world.bot(victim).unwrap().status(), BotStatus::Alive);

    damage(&mut world, shooter, victim, 80);
    assert_eq!(world.bot(victim).unwrap().status(), BotStatus::Dead);
    assert_eq!(world.bot(victim).unwrap().health(), 0);
    assert_eq!(world.bot(shooter).unwrap().score(), 1);

    // Hitting a corpse changes nothing.
    damage(&mut world, shooter, victim, 80);
    assert_eq!(world.bot(shooter).unwrap().score(), 1);
}

/// A dead bot comes back through the spawning state with a clean slate.
#[test]
fn dead_bots_respawn_with_full_health() {
    let (mut world, shooter, victim) = world_with_two_bots(arena(), [Team::Neutral; 2]);
    world
        .bot_mut(victim)
        .unwrap()
        .body_mut()
        .weapons_mut()
        .add_weapon(WeaponType::RailGun);
    damage(&mut world, shooter, victim, 500);

    world.update_lifecycle();
    assert_eq!(world.bot(victim).unwrap().status(), BotStatus::Spawning);

    world.update_lifecycle();
    let bot = world.bot(victim).unwrap();
    assert_eq!(bot.status(), BotStatus::Alive);
    assert_eq!(bot.health(), 100);
    assert!(!bot.body().weapons().has_weapon(WeaponType::RailGun));
    assert!(world.layout().spawn_points().contains(&bot.position()));
}

/// A grenade that lands between two bots damages both, shooter included,
/// and only once however long its blast animation runs.
#[test]
fn grenade_blast_is_applied_once() {
    let (mut world, shooter, victim) = world_with_two_bots(arena(), [Team::Neutral; 2]);
    let mut outbox = Outbox::new();
    outbox.fire(ProjectileRequest {
        kind: ProjectileKind::Grenade,
        shooter,
        origin: Vector2D::new(50.0, 50.0),
        heading: Vector2D::UNIT_X,
        target: Vector2D::new(80.0, 50.0),
    });
    world.flush_outbox(outbox);
    assert_eq!(world.projectiles().len(), 1);

    for _ in 0..200 {
        world.begin_tick(FRAME);
        world.update_projectiles();
    }

    let damage = i32::try_from(WeaponConfig::default().grenade.damage).unwrap();
    assert!(world.projectiles().is_empty());
    assert_eq!(world.bot(victim).unwrap().health(), 100 - damage);
    assert_eq!(world.bot(shooter).unwrap().health(), 100 - damage);
}

/// A team bot that dies without the full loadout stocks its team's cache
/// with the weapons it was missing.
#[test]
fn dying_team_bots_stock_their_cache() {
    let layout = arena()
        .with_weapon_cache(Team::Red, Vector2D::new(300.0, 300.0), 10.0)
        .with_weapon_cache(Team::Blue, Vector2D::new(300.0, 100.0), 10.0)
        .with_team_mode(true);
    let (mut world, shooter, victim) = world_with_two_bots(layout, [Team::Blue, Team::Red]);
    world
        .bot_mut(victim)
        .unwrap()
        .body_mut()
        .weapons_mut()
        .add_weapon(WeaponType::RailGun);

    damage(&mut world, shooter, victim, 200);
    damage(&mut world, shooter, victim, 200);

    let stock = |team: Team| -> Vec<WeaponType> {
        world
            .caches()
            .find(|cache| cache.team() == team)
            .map(|cache| cache.weapons().to_vec())
            .unwrap_or_default()
    };
    assert_eq!(
        stock(Team::Red),
        vec![WeaponType::Shotgun, WeaponType::RocketLauncher]
    );
    assert!(stock(Team::Blue).is_empty());
}

/// Bots left to their own devices for a while keep their health within
/// bounds and never linger alive at zero health.
#[test]
fn free_running_match_keeps_health_consistent() {
    let layout = ArenaLayout::new(400.0, 400.0)
        .with_boundary_walls()
        .with_spawn_point(Vector2D::new(60.0, 60.0))
        .with_spawn_point(Vector2D::new(340.0, 340.0))
        .with_spawn_point(Vector2D::new(60.0, 340.0));
    let mut world = World::new(layout, BotConfig::default(), WeaponConfig::default(), 7);
    for _ in 0..3 {
        world.add_bot(Team::Neutral).unwrap();
    }

    for _ in 0..600 {
        world.tick(FRAME);
        for bot in world.registry().bots() {
            assert!((0..=bot.body().max_health()).contains(&bot.health()));
            if bot.status() == BotStatus::Alive {
                assert!(bot.health() > 0);
            }
        }
    }
    assert!(world.now() > 9.9);
}
