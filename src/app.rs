use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use autostash_blocks::BlockRegistry;
use autostash_items::{ExclusionSet, ItemCatalog};
use autostash_runtime::{ChainOutcome, Coordinator, Message, RequestStatus, RequesterId};

use crate::config::Config;
use crate::scene::{Scene, SceneWorld};
use crate::{Cli, Command};

/// Wall-clock length of one simulated tick while a search is outstanding.
const TICK: Duration = Duration::from_millis(50);

#[derive(Debug, Default)]
pub struct RunSummary {
    pub ticks: u64,
    pub messages: Vec<(RequesterId, Message)>,
    pub finished: Vec<ChainOutcome>,
}

pub fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let config = Config::load_or_init(&cli.config)?;
    let registry = Arc::new(match &cli.blocks {
        Some(p) => BlockRegistry::load_from_path(p)?,
        None => BlockRegistry::bundled()?,
    });
    let catalog = Arc::new(match &cli.items {
        Some(p) => ItemCatalog::from_path(p)?,
        None => ItemCatalog::bundled()?,
    });
    let scene = Scene::load(&cli.scene, &registry, &catalog)?;
    let requester = match cli.player {
        Some(id) => id,
        None => scene
            .world
            .players()
            .next()
            .map(|(id, _)| id)
            .ok_or("scene has no players")?,
    };
    let command = cli.command.clone().unwrap_or(Command::DepositAll);

    let (mut world, mut coord) = build(scene, registry, catalog, &config);
    let summary = execute(&mut coord, &mut world, requester, &command, cli.max_ticks)?;

    for (who, msg) in &summary.messages {
        let name = world.player(*who).map(|p| p.name.as_str()).unwrap_or("?");
        println!("[{}] {}", name, msg);
    }
    for at in world.container_positions() {
        if let Some(inv) = world.container(at) {
            log::debug!("container {} {:?}: {} item(s)", at, inv.kind, inv.total_items());
        }
    }
    log::info!("finished after {} tick(s)", summary.ticks);
    Ok(())
}

/// Wires the scene's rules and the config into a coordinator.
pub fn build(
    scene: Scene,
    registry: Arc<BlockRegistry>,
    catalog: Arc<ItemCatalog>,
    config: &Config,
) -> (SceneWorld, Coordinator) {
    let exclusions = ExclusionSet::from_names(
        config.deposit.excluded_items.iter().map(String::as_str),
        &catalog,
    );
    let Scene {
        world,
        gate,
        policy,
    } = scene;
    let coord = Coordinator::new(registry, catalog)
        .with_exclusions(exclusions)
        .with_vertical_reach(config.search.vertical_reach)
        .with_gate(gate)
        .with_policy(policy);
    (world, coord)
}

/// Issues `command` for `requester` and ticks until the coordinator goes idle.
pub fn execute(
    coord: &mut Coordinator,
    world: &mut SceneWorld,
    requester: RequesterId,
    command: &Command,
    max_ticks: u64,
) -> Result<RunSummary, Box<dyn Error>> {
    let eye = world
        .player(requester)
        .map(|p| p.eye)
        .ok_or_else(|| format!("no player with id {}", requester))?;
    let mut summary = RunSummary::default();

    match command {
        Command::DepositAll => {
            if coord.request_deposit_all(world, requester, eye)? == RequestStatus::Denied {
                log::info!("requester {} may not deposit-all", requester);
            }
        }
        Command::QuickDeposit { at } => {
            coord.quick_deposit(world, requester, *at);
        }
    }

    while !coord.is_idle() {
        if summary.ticks >= max_ticks {
            log::warn!("stopping after {} tick(s) with work still pending", max_ticks);
            break;
        }
        if coord.pending_searches() > 0 {
            coord.wait_for_search(TICK);
        }
        let report = coord.tick(world);
        summary.finished.extend(report.finished.into_iter().map(|(_, o)| o));
        summary.ticks += 1;
    }
    summary.messages = world.take_messages();
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use autostash_chunk::VoxelCoord;

    const DEMO: &str = include_str!("../scenes/demo.toml");

    fn setup(text: &str) -> (SceneWorld, Coordinator) {
        let registry = Arc::new(BlockRegistry::bundled().unwrap());
        let catalog = Arc::new(ItemCatalog::bundled().unwrap());
        let scene = Scene::from_toml_str(text, &registry, &catalog).unwrap();
        build(scene, registry, catalog, &Config::default())
    }

    #[test]
    fn demo_scene_deposits_into_reachable_chests() {
        let (mut world, mut coord) = setup(DEMO);
        let summary = execute(&mut coord, &mut world, 1, &Command::DepositAll, 200).unwrap();
        assert_eq!(summary.finished.len(), 1);
        let ChainOutcome::Completed(totals) = summary.finished[0] else {
            panic!("chain should complete");
        };
        assert!(totals.total_items_moved > 0);
        assert_eq!(
            summary.messages,
            vec![(
                1,
                Message::SuccessfulDepositAll {
                    moved: totals.total_items_moved
                }
            )]
        );
    }

    #[test]
    fn quick_deposit_needs_no_ticks() {
        let text = r#"
            [world]
            floor = "stone"
            [[container]]
            at = [1, 1, 0]
            items = [{ slot = 0, item = "bread", count = 1 }]
            [[player]]
            id = 4
            name = "kit"
            eye = [0, 2, 0]
            items = [{ slot = 2, item = "bread", count = 9 }]
        "#;
        let (mut world, mut coord) = setup(text);
        let cmd = Command::QuickDeposit {
            at: VoxelCoord::new(1, 1, 0),
        };
        let summary = execute(&mut coord, &mut world, 4, &cmd, 10).unwrap();
        assert_eq!(summary.ticks, 0);
        assert_eq!(summary.messages[0].1.to_string(), "Deposited 9 items.");
        assert_eq!(world.container(VoxelCoord::new(1, 1, 0)).unwrap().total_items(), 10);
    }

    #[test]
    fn excluded_items_stay_with_the_player() {
        let text = r#"
            [world]
            floor = "stone"
            [[container]]
            at = [2, 1, 0]
            items = [{ slot = 0, item = "arrow", count = 1 }]
            [[player]]
            id = 1
            name = "robin"
            eye = [0, 2, 0]
            items = [{ slot = 9, item = "arrow", count = 32 }]
        "#;
        let (mut world, mut coord) = setup(text);
        let summary = execute(&mut coord, &mut world, 1, &Command::DepositAll, 50).unwrap();
        assert_eq!(
            summary.messages,
            vec![(1, Message::SuccessfulDepositAll { moved: 0 })]
        );
        assert_eq!(world.player(1).unwrap().inventory.get(9).unwrap().count, 32);
    }

    #[test]
    fn unknown_requester_is_an_error() {
        let (mut world, mut coord) = setup(DEMO);
        assert!(execute(&mut coord, &mut world, 999, &Command::DepositAll, 5).is_err());
    }
}
